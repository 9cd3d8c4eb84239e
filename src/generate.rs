//! Regeneration driver
//!
//! Orchestrates one end-to-end run: coerce pwiz into seeing `auth.users`,
//! introspect the schema into the model file, format, apply the rewrite
//! pipeline in place, format again. The heavy lifting is in [`crate::rewrite`];
//! everything here is thin process and file plumbing.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::client::{DatabaseConfig, DbSession};
use crate::diff;
use crate::error::{GenResult, ModelGenError};
use crate::rewrite::rewrite_models;

/// pwiz only walks the default search path, so it never emits a model for
/// `auth.users`, the table nearly every Supabase schema references. An
/// empty clone in `public` coerces the model into existence; it is dropped
/// again right after introspection.
const COERCE_USERS_SQL: &str =
    "CREATE TABLE public.users AS SELECT * FROM auth.users WHERE FALSE";

const DROP_COERCED_USERS_SQL: &str = "DROP TABLE public.users";

/// Options for one regeneration run.
#[derive(Debug, Clone)]
pub struct GenerateOptions {
    /// The model file to (re)generate and rewrite in place.
    pub model_file: PathBuf,
    /// Relationship field names to neutralize, without the `_id` suffix.
    pub circular_deps_fields: Vec<String>,
    /// Persist a unified diff of the rewrite to [`diff::DIFF_REPORT_PATH`].
    pub report_diff: bool,
}

/// Run a full regeneration: introspect, rewrite, format.
///
/// Returns the cycle-warning flag from the pipeline. The temporary
/// `public.users` table is dropped whether or not introspection succeeded,
/// and a leftover table from an earlier aborted run does not abort this one.
pub async fn regenerate_models(
    session: &DbSession,
    config: &DatabaseConfig,
    opts: &GenerateOptions,
) -> GenResult<bool> {
    info!(file = %opts.model_file.display(), "regenerating models");

    if let Err(err) = session.execute(COERCE_USERS_SQL).await {
        warn!(%err, "could not materialize public.users; the Users model may be missing");
    }

    let introspected = introspect_schema(config).await;
    if let Err(err) = session.execute(DROP_COERCED_USERS_SQL).await {
        warn!(%err, "could not drop the temporary public.users table");
    }
    fs::write(&opts.model_file, introspected?)?;

    format_model_file(&opts.model_file).await;
    let cycle_warning = adjust_model_file(
        &opts.model_file,
        &opts.circular_deps_fields,
        opts.report_diff,
    )?;
    format_model_file(&opts.model_file).await;

    info!(file = %opts.model_file.display(), cycle_warning, "model file rewritten");
    Ok(cycle_warning)
}

/// Rewrite a generated model file in place and report whether unresolved
/// reference cycles remain.
///
/// This is the file-level entry point around the pure pipeline: read once,
/// rewrite in memory, write once. Nothing is written if any rule input
/// fails to load.
pub fn adjust_model_file(
    path: &Path,
    circular_fields: &[String],
    report_diff: bool,
) -> GenResult<bool> {
    let original = fs::read_to_string(path).map_err(|err| match err.kind() {
        io::ErrorKind::NotFound => {
            ModelGenError::Config(format!("model file {} does not exist", path.display()))
        }
        _ => ModelGenError::Io(err),
    })?;

    let outcome = rewrite_models(&original, circular_fields);
    fs::write(path, &outcome.text)?;

    if report_diff {
        // Diagnostic only: a failed diff write must not fail the run.
        if let Err(err) = diff::report_diff(
            &original,
            &outcome.text,
            Path::new(diff::DIFF_REPORT_PATH),
        ) {
            warn!(%err, "could not write the rewrite diff");
        }
    }

    Ok(outcome.cycle_warning)
}

/// Run pwiz against the configured database and return its stdout.
///
/// The password travels via `PGPASSWORD` in the child environment; on argv
/// it would be visible to every local process.
async fn introspect_schema(config: &DatabaseConfig) -> GenResult<String> {
    let output = Command::new("python")
        .args(["-m", "pwiz", "-e", "postgresql"])
        .arg("-H")
        .arg(&config.host)
        .arg("-p")
        .arg(config.port.to_string())
        .arg("-u")
        .arg(&config.username)
        .arg(&config.database)
        .env("PGPASSWORD", &config.password)
        .output()
        .await?;

    if !output.status.success() {
        return Err(ModelGenError::Tool {
            tool: "pwiz".to_string(),
            status: output.status.to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        });
    }

    let text = String::from_utf8_lossy(&output.stdout).into_owned();
    if text.is_empty() {
        warn!("pwiz produced no output; the database may have no visible tables");
    }
    Ok(text)
}

/// Format the model file with black, best effort. The rewrite rules expect
/// black's quote normalization on the raw pwiz output, but a missing
/// formatter should not strand an otherwise valid regeneration.
async fn format_model_file(path: &Path) {
    match Command::new("black").arg(path).output().await {
        Ok(output) if output.status.success() => {
            debug!(file = %path.display(), "formatted with black");
        }
        Ok(output) => {
            warn!(
                status = %output.status,
                "black exited non-zero; continuing with unformatted output"
            );
        }
        Err(err) => {
            warn!(%err, "black is not available; continuing with unformatted output");
        }
    }
}
