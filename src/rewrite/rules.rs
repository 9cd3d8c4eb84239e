//! Fixed rewrite rules for pwiz output
//!
//! Each rule is a pure function of the whole file text. The rules run in the
//! fixed order of [`FIXED_RULES`]; the order is load-bearing because later
//! matchers assume earlier rewrites already happened (the auth-schema
//! override only matches lines the schema-injection rule produced).
//!
//! A matcher that finds nothing is a silent no-op: pwiz's exact output shape
//! varies between versions, and a missing shape is not an error.

use std::sync::LazyLock;

use regex::Regex;

/// Final name of the generated base model class. Deliberately not
/// `BaseModel`, which collides with pydantic in downstream code.
pub const BASE_MODEL_NAME: &str = "BaseDatabaseModel";

/// Prefix applied to every generated class name, marking it "do not edit,
/// subclass instead".
pub const CLASS_PREFIX: &str = "Base";

/// Comment marker pwiz leaves next to relationship fields it could not
/// declare in dependency order.
pub const CYCLE_MARKER: &str = "Possible reference cycle";

/// Replacement for the eager database construction: generated models import
/// the deferred proxy from the companion runtime package instead.
const PROXY_IMPORT: &str = "\
# NOTE: this file is fully generated; manual edits will be overwritten on the next run.
# database_proxy defers the heavy PostgresqlDatabase construction until the runtime
# configures it, so importing these models never touches the database.
from supamodel.client import database_proxy";

// =============================================================================
// MATCHERS
// =============================================================================

/// The module-scope eager connection statement; the argument list may span
/// several lines, hence `(?s)`.
static EAGER_DATABASE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)database = PostgresqlDatabase\(.*?\)").unwrap());

/// A generated class declaration whose base is the generic base model.
static GENERATED_CLASS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"class (\w+)\(BaseModel\)").unwrap());

/// A relationship target in keyword form, `model=<Identifier>`.
static RELATION_TARGET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"model=(\w+)").unwrap());

/// A table-name assignment with a double-quoted literal. pwiz sometimes
/// emits single quotes; the driver formats with black before rewriting,
/// which normalizes them.
static TABLE_NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#"table_name = "(\w+)""#).unwrap());

// =============================================================================
// RULES
// =============================================================================

/// Named pipeline step. Rules are pure: text in, text out, no other state.
pub struct RewriteRule {
    pub name: &'static str,
    pub apply: fn(&str) -> String,
}

/// The fixed rules in application order.
///
/// Reordering entries here is a semantic change, not a cleanup: the users
/// override expects schema injection to have run, and the generic base
/// rename expects the per-class renames to have consumed every
/// `(BaseModel)` reference first.
pub const FIXED_RULES: &[RewriteRule] = &[
    RewriteRule {
        name: "deferred-database substitution",
        apply: substitute_deferred_database,
    },
    RewriteRule {
        name: "proxy reference fix-up",
        apply: fix_proxy_reference,
    },
    RewriteRule {
        name: "base class renaming",
        apply: prefix_generated_classes,
    },
    RewriteRule {
        name: "relation target renaming",
        apply: prefix_relation_targets,
    },
    RewriteRule {
        name: "schema annotation injection",
        apply: inject_schema_annotations,
    },
    RewriteRule {
        name: "auth schema override for users",
        apply: relocate_users_schema,
    },
    RewriteRule {
        name: "generic base class rename",
        apply: rename_generic_base_class,
    },
];

/// Replace the eager `database = PostgresqlDatabase(...)` statement with the
/// proxy import, so importing the generated module never opens a connection.
fn substitute_deferred_database(data: &str) -> String {
    EAGER_DATABASE_RE.replace_all(data, PROXY_IMPORT).into_owned()
}

/// The base Meta block assigns the module-scope handle to itself
/// (`database = database`); point it at the proxy introduced by the
/// previous rule instead.
fn fix_proxy_reference(data: &str) -> String {
    data.replace("database = database", "database = database_proxy")
}

/// `class Orders(BaseModel)` becomes `class BaseOrders(BaseDatabaseModel)`.
/// Hand-written subclasses take the unprefixed names.
fn prefix_generated_classes(data: &str) -> String {
    GENERATED_CLASS_RE
        .replace_all(
            data,
            format!("class {CLASS_PREFIX}${{1}}({BASE_MODEL_NAME})"),
        )
        .into_owned()
}

/// Rewrite every `model=<Identifier>` to the prefixed class name.
///
/// This is deliberately lenient: it rewrites every occurrence of the
/// textual shape, including ones that are not relationship declarations.
/// Known accepted false-positive risk.
fn prefix_relation_targets(data: &str) -> String {
    RELATION_TARGET_RE
        .replace_all(data, format!("model={CLASS_PREFIX}${{1}}"))
        .into_owned()
}

/// Prepend `schema = "public"` to every table-name assignment, at the Meta
/// block indentation.
fn inject_schema_annotations(data: &str) -> String {
    TABLE_NAME_RE
        .replace_all(data, "schema = \"public\"\n        table_name = \"${1}\"")
        .into_owned()
}

/// Supabase keeps user identities in the auth schema; move the `users`
/// table there. Matches only the line pair produced by schema injection.
fn relocate_users_schema(data: &str) -> String {
    data.replace(
        "schema = \"public\"\n        table_name = \"users\"",
        "schema = \"auth\"\n        table_name = \"users\"",
    )
}

/// Rename pwiz's own `class BaseModel` declaration. Runs last among the
/// renames: every subclass reference was already rewritten to
/// [`BASE_MODEL_NAME`] by the base-class renaming rule.
fn rename_generic_base_class(data: &str) -> String {
    data.replace("class BaseModel", &format!("class {BASE_MODEL_NAME}"))
}

// =============================================================================
// TESTS
// =============================================================================
