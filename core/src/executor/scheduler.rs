use std::time::Instant;

use crate::provider::Credentials;

use super::output::{
    emit_duplicate_task, emit_run_end, emit_run_start, emit_stage_end, emit_stage_start,
    emit_task_skipped,
};
use super::runner::execute_batch;
use super::task_executor::TaskExecutor;
use super::types::{Pipeline, PipelineReport, PipelineStage, ResultsMap, SkippedTask, Task};

/// State threaded from one stage to the next.
#[derive(Debug, Default)]
struct StageAccumulator {
    results: ResultsMap,
    skipped: Vec<SkippedTask>,
}

/// Split a stage into tasks that may run now and tasks that never will.
///
/// A task is ready when every dependency already has a successful outcome.
/// Dependencies that are unknown, failed, or live in the same or a later
/// stage are all "unmet"; such a task is skipped for the rest of the run.
pub fn partition_ready<'a>(
    stage_id: usize,
    stage: &'a PipelineStage,
    results: &ResultsMap,
) -> (Vec<&'a Task>, Vec<SkippedTask>) {
    let mut ready = Vec::with_capacity(stage.tasks.len());
    let mut skipped = Vec::new();

    for task in &stage.tasks {
        let unmet: Vec<String> = task
            .dependencies
            .iter()
            .filter(|dep| !results.get(dep.as_str()).is_some_and(|o| o.success))
            .cloned()
            .collect();

        if unmet.is_empty() {
            ready.push(task);
        } else {
            skipped.push(SkippedTask {
                task_id: task.id.clone(),
                stage: stage_id,
                unmet_dependencies: unmet,
            });
        }
    }

    (ready, skipped)
}

/// Run every stage in order; a stage starts only after the previous one settled.
///
/// Never fails: task failures are recorded in `results`, gated tasks in
/// `skipped`. If the same id is produced twice, the later outcome wins.
pub async fn execute_pipeline(
    pipeline: &Pipeline,
    executor: &TaskExecutor,
    credentials: &Credentials,
    max_parallel: Option<usize>,
) -> PipelineReport {
    let start = Instant::now();
    emit_run_start(&pipeline.id, pipeline.stages.len(), pipeline.task_count());

    let mut acc = StageAccumulator::default();
    for (stage_id, stage) in pipeline.stages.iter().enumerate() {
        acc = execute_stage(
            acc,
            &pipeline.id,
            stage_id,
            stage,
            executor,
            credentials,
            max_parallel,
        )
        .await;
    }

    let duration_ms = start.elapsed().as_millis() as u64;
    emit_run_end(&pipeline.id, acc.results.len(), acc.skipped.len(), duration_ms);

    PipelineReport {
        pipeline_id: pipeline.id.clone(),
        results: acc.results,
        skipped: acc.skipped,
        duration_ms,
    }
}

async fn execute_stage(
    mut acc: StageAccumulator,
    pipeline_id: &str,
    stage_id: usize,
    stage: &PipelineStage,
    executor: &TaskExecutor,
    credentials: &Credentials,
    max_parallel: Option<usize>,
) -> StageAccumulator {
    let (ready, skipped) = partition_ready(stage_id, stage, &acc.results);
    emit_stage_start(pipeline_id, stage_id, &stage.name, ready.len(), stage.tasks.len());
    for s in &skipped {
        emit_task_skipped(pipeline_id, s);
    }

    let outcomes = execute_batch(ready, executor, credentials, max_parallel).await;
    emit_stage_end(pipeline_id, stage_id, &outcomes);

    for outcome in outcomes {
        if acc.results.contains_key(&outcome.task_id) {
            emit_duplicate_task(pipeline_id, stage_id, &outcome.task_id);
        }
        acc.results.insert(outcome.task_id.clone(), outcome);
    }
    acc.skipped.extend(skipped);
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::types::Outcome;
    use crate::provider::{ProviderRequest, TextParams};

    fn task(id: &str, deps: &[&str]) -> Task {
        Task::new(id, ProviderRequest::OpenAi(TextParams::default()))
            .with_dependencies(deps.iter().copied())
    }

    fn results(entries: &[(&str, bool)]) -> ResultsMap {
        entries
            .iter()
            .map(|(id, ok)| {
                let outcome = if *ok {
                    Outcome::succeeded(*id, crate::executor::types::TaskPayload::video_job("j"), 0)
                } else {
                    Outcome::failed(*id, "nope", 0)
                };
                (id.to_string(), outcome)
            })
            .collect()
    }

    #[test]
    fn test_no_dependencies_is_ready() {
        let stage = PipelineStage::new("s", vec![task("a", &[])]);
        let (ready, skipped) = partition_ready(0, &stage, &ResultsMap::new());
        assert_eq!(ready.len(), 1);
        assert!(skipped.is_empty());
    }

    #[test]
    fn test_successful_dependency_is_ready() {
        let stage = PipelineStage::new("s", vec![task("b", &["a"])]);
        let (ready, _) = partition_ready(1, &stage, &results(&[("a", true)]));
        assert_eq!(ready[0].id, "b");
    }

    #[test]
    fn test_failed_dependency_is_skipped() {
        let stage = PipelineStage::new("s", vec![task("b", &["a"])]);
        let (ready, skipped) = partition_ready(1, &stage, &results(&[("a", false)]));
        assert!(ready.is_empty());
        assert_eq!(
            skipped,
            vec![SkippedTask {
                task_id: "b".into(),
                stage: 1,
                unmet_dependencies: vec!["a".into()],
            }]
        );
    }

    #[test]
    fn test_missing_dependency_is_skipped() {
        let stage = PipelineStage::new("s", vec![task("b", &["ghost"]), task("c", &[])]);
        let (ready, skipped) = partition_ready(0, &stage, &ResultsMap::new());
        assert_eq!(ready.iter().map(|t| t.id.as_str()).collect::<Vec<_>>(), vec!["c"]);
        assert_eq!(skipped[0].unmet_dependencies, vec!["ghost".to_string()]);
    }

    #[test]
    fn test_only_unmet_dependencies_are_reported() {
        let stage = PipelineStage::new("s", vec![task("d", &["a", "b", "c"])]);
        let (_, skipped) = partition_ready(2, &stage, &results(&[("a", true), ("b", false)]));
        assert_eq!(
            skipped[0].unmet_dependencies,
            vec!["b".to_string(), "c".to_string()]
        );
    }
}
