//! Diff reporting for rewritten model files
//!
//! Purely diagnostic: the unified diff between the generator's output and
//! the rewritten text is persisted to a well-known temporary location for
//! inspection. It never feeds back into the pipeline and never changes the
//! exit status; an empty diff still writes a (possibly empty) file.

use std::fs;
use std::io;
use std::path::Path;

use similar::TextDiff;
use tracing::debug;

/// Where the rewrite diff lands when diagnostics are requested.
pub const DIFF_REPORT_PATH: &str = "/tmp/supamodel_rewrite_diff.txt";

/// Compute a unified line diff of (original, rewritten) and write it to
/// `path`.
pub fn report_diff(original: &str, rewritten: &str, path: &Path) -> io::Result<()> {
    let diff = TextDiff::from_lines(original, rewritten);
    let unified = diff
        .unified_diff()
        .context_radius(3)
        .header("generated", "rewritten")
        .to_string();

    fs::write(path, unified)?;
    debug!(path = %path.display(), "rewrite diff written");
    Ok(())
}
