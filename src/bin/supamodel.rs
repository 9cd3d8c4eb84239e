//! Model regeneration CLI
//!
//! Connects to the database, regenerates the model file with pwiz, and
//! rewrites it into deferred-initialization base models.
//!
//! Usage:
//!   supamodel path/to/models.py \
//!     --host localhost --port 54322 \
//!     --circular-deps-fields merged_into,parent_org \
//!     --diff -v
//!
//! The password defaults to the local Supabase stack and can come from
//! PGPASSWORD (a .env file is honored).

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use colored::Colorize;

use supamodel::{regenerate_models, DatabaseConfig, DbSession, GenerateOptions};

#[derive(Parser, Debug)]
#[command(name = "supamodel")]
#[command(version)]
#[command(about = "Regenerate peewee models from a Supabase Postgres schema")]
struct Args {
    /// Path of the model file to (re)generate
    model_file: PathBuf,

    /// Host for the database
    #[arg(long, default_value = "localhost")]
    host: String,

    /// Port for the database
    #[arg(long, default_value_t = 54322)]
    port: u16,

    /// Username for the database
    #[arg(long, default_value = "postgres")]
    username: String,

    /// Database name
    #[arg(long, default_value = "postgres")]
    database: String,

    /// Password for the database
    #[arg(long, env = "PGPASSWORD", default_value = "postgres")]
    password: String,

    /// Comma-separated relationship field names to neutralize for circular
    /// dependencies (without the _id suffix)
    #[arg(long, value_delimiter = ',')]
    circular_deps_fields: Vec<String>,

    /// Write a unified diff of the rewrite to /tmp for inspection
    #[arg(long)]
    diff: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let level = if args.verbose {
        tracing::Level::DEBUG
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()),
        )
        .init();

    match run(args).await {
        Ok(false) => ExitCode::SUCCESS,
        Ok(true) => {
            eprintln!(
                "{}: reference cycles remain; the generated models may not import until \
                 --circular-deps-fields names the offending fields",
                "warning".yellow().bold()
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}: {:#}", "error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<bool> {
    let config = DatabaseConfig {
        host: args.host,
        port: args.port,
        username: args.username,
        password: args.password,
        database: args.database,
    };

    let opts = GenerateOptions {
        model_file: args.model_file,
        // clap hands us [""] for an empty --circular-deps-fields value.
        circular_deps_fields: args
            .circular_deps_fields
            .into_iter()
            .filter(|f| !f.is_empty())
            .collect(),
        report_diff: args.diff,
    };

    let session = DbSession::connect(&config).await?;
    let result = regenerate_models(&session, &config, &opts).await;
    // Release the connection on both paths before surfacing the result.
    session.close().await;

    Ok(result?)
}
