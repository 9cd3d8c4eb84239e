//! Transformation pipeline for generated model source
//!
//! The pipeline is a sequential fold over pure text rewrites: the fixed
//! rules of [`rules::FIXED_RULES`] in their declared order, then one
//! neutralization pass per caller-supplied circular field name, then a final
//! scan for pwiz's cycle marker.
//!
//! Re-running the pipeline on already-rewritten text is unsupported: the
//! matchers assume pwiz's pre-rewrite shape. A second run is a no-op for
//! most rules but not guaranteed safe, and no fixed point is promised.

mod circular;
mod rules;

pub use circular::neutralize_circular_field;
pub use rules::{RewriteRule, BASE_MODEL_NAME, CLASS_PREFIX, CYCLE_MARKER, FIXED_RULES};

use tracing::debug;

/// Result of one pipeline run.
#[derive(Debug, Clone)]
pub struct RewriteOutcome {
    /// The fully rewritten source text.
    pub text: String,
    /// True when pwiz's cycle marker survives all rewrites: the caller
    /// under-specified the circular field names and the generated module may
    /// not import until they are supplied on a subsequent run.
    pub cycle_warning: bool,
}

/// Run every rewrite over `source` and report whether unresolved reference
/// cycles remain.
///
/// Rules that match nothing are silent no-ops; neutralization of a field
/// name that does not occur is likewise a no-op. Nothing here touches the
/// filesystem; callers persist the result.
pub fn rewrite_models(source: &str, circular_fields: &[String]) -> RewriteOutcome {
    let mut text = source.to_owned();

    for rule in rules::FIXED_RULES {
        let rewritten = (rule.apply)(&text);
        if rewritten != text {
            debug!(rule = rule.name, "rule rewrote the source");
        }
        text = rewritten;
    }

    for field in circular_fields {
        text = circular::neutralize_circular_field(&text, field);
    }

    let cycle_warning = text.contains(rules::CYCLE_MARKER);
    RewriteOutcome { text, cycle_warning }
}
