use std::fmt::Write;

use super::model::Record;

pub const DETAILS_HEADER: &str = "Account Details:";
pub const NO_DETAILS: &str = "No account details to display.";

/// Render a record as a text block: a header line, then `- <column>: <value>`
/// per field in table column order. `None` yields [`NO_DETAILS`].
pub fn format_details(record: Option<&Record<'_>>) -> String {
    let Some(record) = record else {
        return NO_DETAILS.to_string();
    };
    if record.is_empty() {
        return NO_DETAILS.to_string();
    }

    let mut text = String::new();
    let _ = writeln!(text, "{DETAILS_HEADER}");
    for (column, value) in record.fields() {
        let _ = writeln!(text, "- {column}: {value}");
    }
    text
}
