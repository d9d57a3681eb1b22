//! Fixed property schema of the assignment database.
//!
//! The Notion client builds databases and pages from these names, and the
//! reconciliation engine reads entries back through them. Renaming a column
//! in Notion breaks matching.

use std::fmt;

/// Placeholder assignment name Canvas emits for grade exceptions.
pub const SENTINEL_ASSIGNMENT_NAME: &str = "SYS_EXCEPTION_GRADE";

/// Title used when an assignment has no name.
pub const UNTITLED: &str = "Untitled";

pub const PROP_NAME: &str = "Name";
pub const PROP_DUE_DATE: &str = "Due Date";
pub const PROP_ASSIGNMENT_ID: &str = "Assignment Id";
pub const PROP_SUBJECT_ID: &str = "Subject Id";
pub const PROP_URL: &str = "Assignment URL";

/// Notion property types used by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyKind {
    Title,
    Date,
    Number,
    RichText,
    Url,
}

impl PropertyKind {
    /// The `type` tag Notion uses on the wire.
    pub fn as_str(self) -> &'static str {
        match self {
            PropertyKind::Title => "title",
            PropertyKind::Date => "date",
            PropertyKind::Number => "number",
            PropertyKind::RichText => "rich_text",
            PropertyKind::Url => "url",
        }
    }
}

impl fmt::Display for PropertyKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Column layout of a database created by `coursework`.
pub const ASSIGNMENT_SCHEMA: [(&str, PropertyKind); 5] = [
    (PROP_NAME, PropertyKind::Title),
    (PROP_DUE_DATE, PropertyKind::Date),
    (PROP_ASSIGNMENT_ID, PropertyKind::Number),
    (PROP_SUBJECT_ID, PropertyKind::RichText),
    (PROP_URL, PropertyKind::Url),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_has_exactly_one_title_column() {
        let titles = ASSIGNMENT_SCHEMA
            .iter()
            .filter(|(_, kind)| *kind == PropertyKind::Title)
            .count();
        assert_eq!(titles, 1);
    }

    #[test]
    fn assignment_id_column_is_numeric() {
        let (_, kind) = ASSIGNMENT_SCHEMA
            .iter()
            .find(|(name, _)| *name == PROP_ASSIGNMENT_ID)
            .expect("assignment id column");
        assert_eq!(kind.as_str(), "number");
    }
}
