//! supamodel - deferred-initialization model regeneration
//!
//! Regenerates peewee model files from a Supabase Postgres schema and
//! rewrites pwiz's eagerly-connected output into deferred-initialization
//! base models: the live `PostgresqlDatabase` construction becomes an import
//! of a lazily-configured proxy, generated classes gain a `Base` prefix and
//! schema metadata, and circular foreign-key references are neutralized into
//! raw id columns.
//!
//! The rewrite core is pure text-in/text-out; database access and the pwiz
//! and black subprocesses live at the edges.
//!
//! ## Quick Start
//!
//! ```
//! use supamodel::rewrite_models;
//!
//! let generated = r#"database = PostgresqlDatabase('postgres', **{'host': 'localhost'})
//!
//! class BaseModel(Model):
//!     class Meta:
//!         database = database
//!
//! class Users(BaseModel):
//!     class Meta:
//!         table_name = "users"
//! "#;
//!
//! let outcome = rewrite_models(generated, &[]);
//! assert!(outcome.text.contains("class BaseUsers(BaseDatabaseModel):"));
//! assert!(outcome.text.contains("schema = \"auth\""));
//! assert!(!outcome.cycle_warning);
//! ```

// Core error handling
pub mod error;

// Pure text transformation pipeline
pub mod rewrite;

// Diagnostic diff reporting
pub mod diff;

// Introspection connection lifecycle
pub mod client;

// Driver: pwiz + black + pipeline orchestration
pub mod generate;

pub use client::{DatabaseConfig, DbSession};
pub use error::{GenResult, ModelGenError};
pub use generate::{adjust_model_file, regenerate_models, GenerateOptions};
pub use rewrite::{rewrite_models, RewriteOutcome};
