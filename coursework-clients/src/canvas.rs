//! Canvas LMS REST client (`/api/v1`).
//!
//! Canvas paginates with an RFC 5988 `Link` header; every list call follows
//! `rel="next"` until it disappears.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};

use coursework_core::types::{Assignment, AssignmentId, Course, CourseId};

use crate::api::CanvasApi;
use crate::error::{ClientError, ClientResult, Service};
use crate::http::{build_http, read_json};

const PER_PAGE: u32 = 100;

/// Authenticated Canvas client.
#[derive(Debug, Clone)]
pub struct CanvasClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl CanvasClient {
    /// `base_url` is the institution root, e.g. `https://canvas.example.edu`.
    pub fn new(base_url: &str, token: impl Into<String>) -> ClientResult<Self> {
        Ok(Self {
            http: build_http(Service::Canvas)?,
            base_url: normalize_base_url(base_url),
            token: token.into(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn api_url(&self, path: &str) -> String {
        format!("{}/api/v1{path}", self.base_url)
    }

    async fn get_all<T: DeserializeOwned>(&self, first: String) -> ClientResult<Vec<T>> {
        let mut items = Vec::new();
        let mut next = Some(first);
        while let Some(url) = next.take() {
            tracing::debug!(%url, "GET canvas");
            let response = self
                .http
                .get(&url)
                .bearer_auth(&self.token)
                .send()
                .await
                .map_err(|e| ClientError::http(Service::Canvas, e))?;
            next = response
                .headers()
                .get(reqwest::header::LINK)
                .and_then(|value| value.to_str().ok())
                .and_then(next_link);
            let mut page: Vec<T> = read_json(Service::Canvas, response).await?;
            items.append(&mut page);
        }
        Ok(items)
    }
}

impl CanvasApi for CanvasClient {
    async fn list_courses(&self) -> ClientResult<Vec<Course>> {
        let url = self.api_url(&format!("/courses?per_page={PER_PAGE}"));
        let raw: Vec<CanvasCourse> = self.get_all(url).await?;
        let courses: Vec<Course> = raw.into_iter().filter_map(CanvasCourse::into_course).collect();
        tracing::debug!(count = courses.len(), "fetched canvas courses");
        Ok(courses)
    }

    async fn list_assignments(&self, course: CourseId) -> ClientResult<Vec<Assignment>> {
        let url = self.api_url(&format!("/courses/{course}/assignments?per_page={PER_PAGE}"));
        let raw: Vec<CanvasAssignment> = self.get_all(url).await?;
        let assignments: Vec<Assignment> = raw
            .into_iter()
            .map(|a| a.into_assignment(course))
            .collect();
        tracing::debug!(%course, count = assignments.len(), "fetched canvas assignments");
        Ok(assignments)
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct CanvasCourse {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
}

impl CanvasCourse {
    fn into_course(self) -> Option<Course> {
        Some(Course {
            id: CourseId(self.id?),
            name: self.name,
        })
    }
}

#[derive(Debug, Deserialize)]
struct CanvasAssignment {
    #[serde(default, deserialize_with = "lenient_id")]
    id: Option<u64>,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    due_at: Option<String>,
    #[serde(default, deserialize_with = "lenient_id")]
    course_id: Option<u64>,
    #[serde(default)]
    html_url: Option<String>,
}

impl CanvasAssignment {
    fn into_assignment(self, requested: CourseId) -> Assignment {
        Assignment {
            id: self.id.map(AssignmentId),
            name: self.name,
            due_at: self.due_at.filter(|d| !d.trim().is_empty()),
            course_id: self.course_id.map(CourseId).unwrap_or(requested),
            html_url: self.html_url,
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
    Number(u64),
    Text(String),
    Other(serde_json::Value),
}

/// Accept ids as JSON numbers or numeric strings (Canvas string-id mode).
fn lenient_id<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<RawId>::deserialize(deserializer)? {
        Some(RawId::Number(n)) => Some(n),
        Some(RawId::Text(s)) => s.trim().parse().ok(),
        Some(RawId::Other(_)) | None => None,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Trim whitespace and trailing slashes, drop a pasted `/api/v1` suffix and
/// default to `https://` when no scheme is given.
pub fn normalize_base_url(raw: &str) -> String {
    let mut url = raw.trim().trim_end_matches('/').to_string();
    if let Some(stripped) = url.strip_suffix("/api/v1") {
        url = stripped.trim_end_matches('/').to_string();
    }
    if !url.starts_with("http://") && !url.starts_with("https://") {
        url = format!("https://{url}");
    }
    url
}

/// The `rel="next"` target of a `Link` header, if any.
pub(crate) fn next_link(header: &str) -> Option<String> {
    header.split(',').find_map(|part| {
        let mut segments = part.split(';');
        let target = segments
            .next()?
            .trim()
            .strip_prefix('<')?
            .strip_suffix('>')?;
        segments
            .any(|param| matches!(param.trim(), r#"rel="next""# | "rel=next"))
            .then(|| target.to_string())
    })
}
