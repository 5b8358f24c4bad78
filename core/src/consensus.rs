//! Textual consensus over several sub-agents' answers.

use crate::executor::types::Outcome;

pub const NO_RESULTS_MESSAGE: &str = "No successful results to synthesize.";
pub const SECTION_DIVIDER: &str = "\n\n---\n\n";

/// Concatenate successful outputs with a per-agent heading.
///
/// One success is passed through verbatim; several are emitted as
/// `## AGENT` sections in input order, separated by a horizontal rule.
/// Outcomes without textual content count as unsuccessful here.
pub fn build_consensus(outcomes: &[Outcome]) -> String {
    let successes: Vec<(&str, &str)> = outcomes
        .iter()
        .filter(|o| o.success)
        .filter_map(|o| {
            let content = o.result.as_ref()?.text()?;
            let label = o.agent.as_deref().unwrap_or(&o.task_id);
            Some((label, content))
        })
        .collect();

    match successes.as_slice() {
        [] => NO_RESULTS_MESSAGE.to_string(),
        [(_, content)] => (*content).to_string(),
        many => many
            .iter()
            .map(|(label, content)| format!("## {}\n\n{}", label.to_uppercase(), content))
            .collect::<Vec<_>>()
            .join(SECTION_DIVIDER),
    }
}
