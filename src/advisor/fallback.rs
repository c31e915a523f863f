//! Template-based advisory generation (degraded mode)
//!
//! Produces a deterministic advisory when the generation backend is absent,
//! disabled, timed out, or returned an error. The template reports what was
//! actually considered — counts, objective titles, signal texts — and echoes
//! the query verbatim. It never asserts anything the snapshot does not
//! contain.
//!
//! Template output is tagged `source: template` so the dashboard can display
//! a degraded-mode banner.

use crate::types::{Objective, Signal};

/// Render the deterministic templated advisory.
///
/// Pure function of `(objectives, signals, query)`: identical inputs yield
/// identical text.
pub fn template_response(objectives: &[Objective], signals: &[Signal], query: &str) -> String {
    if objectives.is_empty() && signals.is_empty() {
        return format!(
            "No active strategic context is available: 0 active objectives and \
             0 recent signals were considered. Query received: \"{query}\". \
             Add objectives and signals to the strategic store to receive a \
             grounded briefing."
        );
    }

    let mut out = format!(
        "Strategic snapshot: {} active objective{} and {} recent signal{} \
         considered for query \"{query}\".",
        objectives.len(),
        plural(objectives.len()),
        signals.len(),
        plural(signals.len()),
    );

    if !objectives.is_empty() {
        out.push_str("\n\nActive objectives:");
        for o in objectives {
            out.push_str(&format!(
                "\n- {} ({:.0}% toward {})",
                o.title,
                o.progress * 100.0,
                o.target_metric
            ));
        }
    }

    if !signals.is_empty() {
        out.push_str("\n\nRecent signals (newest first):");
        for s in signals {
            out.push_str(&format!("\n- {} (source: {})", s.text, s.source));
        }
    }

    out.push_str(
        "\n\nThis is a templated summary of stored context only; the \
         generation capability was not used.",
    );

    out
}

fn plural(n: usize) -> &'static str {
    if n == 1 {
        ""
    } else {
        "s"
    }
}
