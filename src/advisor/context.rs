//! Prompt context assembly
//!
//! Builds the full prompt handed to the generation backend: a fixed
//! instructional preamble (the advisor persona), the serialized objective
//! and signal snapshot, and the caller's query. Assembly is a pure function
//! of its inputs — identical snapshots and query produce identical context.

use crate::types::{Objective, Signal};

/// Advisor persona and output instructions.
///
/// The responder cross-references current work against objectives, flags
/// correlations between weak signals and stakeholder risk, and produces
/// executive briefings on request.
const EXECUTIVE_ADVISORY_PROMPT: &str = r#"You are the strategic advisor behind an executive dashboard.
Your role: cross-reference current tasks against the active objectives, flag
correlations between weak signals and stakeholder risk, and produce concise
executive briefings on request.

### ACTIVE OBJECTIVES
{objectives}

### RECENT SIGNALS (newest first)
{signals}

### QUERY
{query}

### INSTRUCTIONS
1. Ground every claim in the objectives and signals above.
2. Call out any weak signal that correlates with stakeholder or delivery risk.
3. If the strategic context is empty, state that plainly instead of inventing state.
4. Answer as a brief, direct executive briefing. No preamble."#;

/// Build the full prompt for the generation backend.
pub fn build_prompt(objectives: &[Objective], signals: &[Signal], query: &str) -> String {
    EXECUTIVE_ADVISORY_PROMPT
        .replace("{objectives}", &format_objectives(objectives))
        .replace("{signals}", &format_signals(signals))
        .replace("{query}", query)
}

fn format_objectives(objectives: &[Objective]) -> String {
    if objectives.is_empty() {
        return "No active objectives.".to_string();
    }

    objectives
        .iter()
        .map(|o| {
            format!(
                "- [{:.0}%] {} (owner: {}, target: {})",
                o.progress * 100.0,
                o.title,
                o.owner_id,
                o.target_metric
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn format_signals(signals: &[Signal]) -> String {
    if signals.is_empty() {
        return "No recent signals.".to_string();
    }

    signals
        .iter()
        .map(|s| {
            format!(
                "- [{}] {} (source: {}, weight {:.2})",
                s.created_at.to_rfc3339(),
                s.text,
                s.source,
                s.weight
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}
