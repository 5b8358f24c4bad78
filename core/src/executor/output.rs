//! Structured execution events, emitted through `tracing`.

use crate::error::ProviderError;

use super::types::{Outcome, SkippedTask, Task, TaskPayload};

const TARGET_EXECUTOR: &str = "conductor.executor";
const TARGET_PIPELINE: &str = "conductor.pipeline";

pub fn emit_batch_start(task_count: usize, max_parallel: Option<usize>) {
    tracing::debug!(
        target: TARGET_EXECUTOR,
        stage = "batch.start",
        tasks = task_count,
        max_parallel = ?max_parallel
    );
}

pub fn emit_batch_end(outcomes: &[Outcome], duration_ms: u64) {
    let failed = outcomes.iter().filter(|o| !o.success).count();
    tracing::info!(
        target: TARGET_EXECUTOR,
        stage = "batch.end",
        tasks = outcomes.len(),
        failed,
        duration_ms,
        "Batch finished"
    );
}

pub fn emit_task_start(task: &Task) {
    tracing::debug!(
        target: TARGET_EXECUTOR,
        stage = "task.start",
        task_id = %task.id,
        provider = ?task.provider(),
        kind = ?task.kind
    );
}

pub fn emit_task_end(task: &Task, result: &Result<TaskPayload, ProviderError>, duration_ms: u64) {
    match result {
        Ok(_) => tracing::debug!(
            target: TARGET_EXECUTOR,
            stage = "task.end",
            task_id = %task.id,
            provider = ?task.provider(),
            duration_ms,
            "Task succeeded"
        ),
        Err(err) => tracing::warn!(
            target: TARGET_EXECUTOR,
            stage = "task.end",
            task_id = %task.id,
            provider = ?task.provider(),
            error_class = err.class(),
            error = %err,
            duration_ms,
            "Task failed"
        ),
    }
}

pub fn emit_run_start(pipeline_id: &str, stages: usize, tasks: usize) {
    tracing::info!(
        target: TARGET_PIPELINE,
        stage = "run.start",
        pipeline_id,
        stages,
        tasks,
        "Pipeline started"
    );
}

pub fn emit_run_end(pipeline_id: &str, executed: usize, skipped: usize, duration_ms: u64) {
    tracing::info!(
        target: TARGET_PIPELINE,
        stage = "run.end",
        pipeline_id,
        executed,
        skipped,
        duration_ms,
        "Pipeline finished"
    );
}

pub fn emit_stage_start(pipeline_id: &str, stage_id: usize, name: &str, ready: usize, total: usize) {
    tracing::info!(
        target: TARGET_PIPELINE,
        stage = "stage.start",
        pipeline_id,
        stage_id,
        stage_name = name,
        ready,
        total
    );
}

pub fn emit_stage_end(pipeline_id: &str, stage_id: usize, outcomes: &[Outcome]) {
    let failed = outcomes.iter().filter(|o| !o.success).count();
    tracing::info!(
        target: TARGET_PIPELINE,
        stage = "stage.end",
        pipeline_id,
        stage_id,
        completed = outcomes.len(),
        failed
    );
}

pub fn emit_task_skipped(pipeline_id: &str, skipped: &SkippedTask) {
    tracing::warn!(
        target: TARGET_PIPELINE,
        pipeline_id,
        stage_id = skipped.stage,
        task_id = %skipped.task_id,
        unmet = ?skipped.unmet_dependencies,
        "Skipping task: dependencies not satisfied"
    );
}

pub fn emit_duplicate_task(pipeline_id: &str, stage_id: usize, task_id: &str) {
    tracing::warn!(
        target: TARGET_PIPELINE,
        pipeline_id,
        stage_id,
        task_id,
        "Duplicate task id; the later outcome replaces the earlier one"
    );
}
