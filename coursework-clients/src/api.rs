//! Client seams consumed by the sync driver and the CLI selector.
//!
//! The concrete reqwest clients implement these traits; tests swap in
//! in-memory fakes.

use std::future::Future;

use coursework_core::types::{
    Assignment, Course, CourseId, CreatePayload, DatabaseEntry, DatabaseId, PageId, UpdatePayload,
};

use crate::error::ClientResult;

/// Read-only view of the learning-management system.
pub trait CanvasApi {
    /// Courses the authenticated user is enrolled in.
    fn list_courses(&self) -> impl Future<Output = ClientResult<Vec<Course>>> + Send;

    /// Every assignment of `course`, all pages concatenated.
    fn list_assignments(
        &self,
        course: CourseId,
    ) -> impl Future<Output = ClientResult<Vec<Assignment>>> + Send;
}

/// Object type a Notion search is restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchKind {
    Page,
    Database,
}

impl SearchKind {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchKind::Page => "page",
            SearchKind::Database => "database",
        }
    }
}

/// One search result: an object id and its plain-text title.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
    pub id: String,
    pub title: String,
}

/// The destination store.
pub trait NotionApi {
    fn search(
        &self,
        query: &str,
        kind: SearchKind,
    ) -> impl Future<Output = ClientResult<Vec<SearchHit>>> + Send;

    /// Rows of `database` whose "Assignment Id" property is a number.
    /// Other rows are dropped before they reach reconciliation.
    fn query_database(
        &self,
        database: &DatabaseId,
    ) -> impl Future<Output = ClientResult<Vec<DatabaseEntry>>> + Send;

    /// Create an assignment database under `parent` with the fixed schema.
    fn create_database(
        &self,
        parent: &PageId,
        title: &str,
    ) -> impl Future<Output = ClientResult<DatabaseId>> + Send;

    fn create_page(
        &self,
        database: &DatabaseId,
        payload: &CreatePayload,
    ) -> impl Future<Output = ClientResult<PageId>> + Send;

    fn update_page(
        &self,
        payload: &UpdatePayload,
    ) -> impl Future<Output = ClientResult<PageId>> + Send;
}
