//! Domain types shared by the clients, the reconciliation engine and the CLI.
//!
//! Canvas records ([`Course`], [`Assignment`]) are fetched fresh on every run.
//! [`DatabaseEntry`] mirrors a Notion page that already carries an assignment
//! id; the destination store owns those rows and this crate never deletes them.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::schema::SENTINEL_ASSIGNMENT_NAME;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// Canvas assignment id. The join key between Canvas and Notion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssignmentId(pub u64);

impl fmt::Display for AssignmentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for AssignmentId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Canvas course id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CourseId(pub u64);

impl fmt::Display for CourseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<u64> for CourseId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// Opaque Notion page id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageId(pub String);

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for PageId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for PageId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

/// Opaque Notion database id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatabaseId(pub String);

impl fmt::Display for DatabaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl From<String> for DatabaseId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for DatabaseId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

// ---------------------------------------------------------------------------
// Canvas records
// ---------------------------------------------------------------------------

/// A course the authenticated Canvas user is enrolled in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    /// Canvas omits the name for access-restricted enrollments.
    #[serde(default)]
    pub name: Option<String>,
}

impl Course {
    pub fn display_name(&self) -> String {
        match self.name.as_deref().map(str::trim) {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => format!("Course {}", self.id),
        }
    }
}

/// A gradable task fetched from Canvas.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Assignment {
    /// `None` when the record carried no usable numeric id.
    pub id: Option<AssignmentId>,
    pub name: Option<String>,
    /// ISO 8601 timestamp or calendar date, passed through verbatim.
    pub due_at: Option<String>,
    pub course_id: CourseId,
    pub html_url: Option<String>,
}

impl Assignment {
    /// True for the placeholder record Canvas emits for grade exceptions.
    pub fn is_sentinel(&self) -> bool {
        self.name.as_deref() == Some(SENTINEL_ASSIGNMENT_NAME)
    }
}

// ---------------------------------------------------------------------------
// Notion records
// ---------------------------------------------------------------------------

/// A Notion page whose "Assignment Id" property is a number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseEntry {
    pub page_id: PageId,
    pub assignment_id: AssignmentId,
    #[serde(default)]
    pub due_date: Option<String>,
    #[serde(default)]
    pub url: Option<String>,
}

/// Property values for a page that does not exist yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatePayload {
    pub assignment_id: AssignmentId,
    pub title: String,
    pub due_date: String,
    pub subject_id: String,
    pub url: Option<String>,
}

/// Mutable property values for an existing page.
///
/// Name, assignment id and subject id are fixed at creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdatePayload {
    pub page_id: PageId,
    pub assignment_id: AssignmentId,
    pub due_date: String,
    pub url: Option<String>,
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn assignment(name: Option<&str>) -> Assignment {
        Assignment {
            id: Some(AssignmentId(7)),
            name: name.map(str::to_owned),
            due_at: None,
            course_id: CourseId(3),
            html_url: None,
        }
    }

    #[test]
    fn newtype_display() {
        assert_eq!(AssignmentId::from(42).to_string(), "42");
        assert_eq!(CourseId::from(9).to_string(), "9");
        assert_eq!(PageId::from("p-1").to_string(), "p-1");
        assert_eq!(DatabaseId::from(String::from("db")).to_string(), "db");
    }

    #[test]
    fn sentinel_detection_is_exact() {
        assert!(assignment(Some("SYS_EXCEPTION_GRADE")).is_sentinel());
        assert!(!assignment(Some("sys_exception_grade")).is_sentinel());
        assert!(!assignment(Some("HW1")).is_sentinel());
        assert!(!assignment(None).is_sentinel());
    }

    #[test]
    fn course_display_name_falls_back_to_id() {
        let named = Course {
            id: CourseId(1),
            name: Some("Linear Algebra".into()),
        };
        let blank = Course {
            id: CourseId(2),
            name: Some("   ".into()),
        };
        let unnamed = Course {
            id: CourseId(3),
            name: None,
        };
        assert_eq!(named.display_name(), "Linear Algebra");
        assert_eq!(blank.display_name(), "Course 2");
        assert_eq!(unnamed.display_name(), "Course 3");
    }
}
