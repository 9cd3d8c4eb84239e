//! Circular-dependency neutralization
//!
//! pwiz cannot declare two mutually referencing classes without a forward
//! reference it does not emit. Rather than patch forward references (the
//! mechanism differs between pwiz versions), the named relationship field is
//! erased and replaced with a raw foreign-key column: relationship traversal
//! is lost, import-time correctness is gained.

use regex::{NoExpand, Regex};

/// Replace every relationship-field declaration named exactly `field` with a
/// plain nullable id column, `<field>_id = UUIDField(null=True)`.
///
/// The match is anchored at the four-space field indentation and spans from
/// the assignment to the end of the `ForeignKeyField` parameter list, which
/// black may have wrapped across several lines. A field name that does not
/// occur in `data` is a silent no-op.
pub fn neutralize_circular_field(data: &str, field: &str) -> String {
    let pattern = format!(
        r"(?m)^    {} = ForeignKeyField\((?s:.*?)\)",
        regex::escape(field)
    );
    let matcher = Regex::new(&pattern).expect("escaped field name forms a valid pattern");

    let replacement = format!(
        "    # Raw id column; a ForeignKeyField here would close a reference cycle.\n    {field}_id = UUIDField(null=True)"
    );
    matcher.replace_all(data, NoExpand(&replacement)).into_owned()
}
