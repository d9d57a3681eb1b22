//! Notion REST client (`https://api.notion.com/v1`).
//!
//! Request bodies are built by free functions so their shape can be checked
//! without a network round-trip. Search and database queries follow
//! `has_more` / `next_cursor` until exhausted.

use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::{json, Map, Value};

use coursework_core::schema::{
    ASSIGNMENT_SCHEMA, PROP_ASSIGNMENT_ID, PROP_DUE_DATE, PROP_NAME, PROP_SUBJECT_ID, PROP_URL,
};
use coursework_core::types::{
    AssignmentId, CreatePayload, DatabaseEntry, DatabaseId, PageId, UpdatePayload,
};

use crate::api::{NotionApi, SearchHit, SearchKind};
use crate::error::{ClientError, ClientResult, Service};
use crate::http::{build_http, read_json};

pub const NOTION_API: &str = "https://api.notion.com/v1";
pub const NOTION_VERSION: &str = "2022-06-28";
const PAGE_SIZE: u32 = 100;

/// Authenticated Notion client.
#[derive(Debug, Clone)]
pub struct NotionClient {
    http: reqwest::Client,
    base_url: String,
    token: String,
}

impl NotionClient {
    pub fn new(token: impl Into<String>) -> ClientResult<Self> {
        Self::with_base_url(token, NOTION_API)
    }

    /// Client against a non-default endpoint (proxies, local test servers).
    pub fn with_base_url(token: impl Into<String>, base_url: &str) -> ClientResult<Self> {
        Ok(Self {
            http: build_http(Service::Notion)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.into(),
        })
    }

    async fn send<T: DeserializeOwned>(
        &self,
        method: reqwest::Method,
        path: &str,
        body: &Value,
    ) -> ClientResult<T> {
        let url = format!("{}{path}", self.base_url);
        tracing::debug!(%method, %url, "notion request");
        let response = self
            .http
            .request(method, &url)
            .bearer_auth(&self.token)
            .header("Notion-Version", NOTION_VERSION)
            .json(body)
            .send()
            .await
            .map_err(|e| ClientError::http(Service::Notion, e))?;
        read_json(Service::Notion, response).await
    }

    /// POST a list endpoint until `has_more` is false.
    async fn collect_all(
        &self,
        path: &str,
        body_for: impl Fn(Option<&str>) -> Value,
    ) -> ClientResult<Vec<RawObject>> {
        let mut results = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let body = body_for(cursor.as_deref());
            let mut page: ListResponse = self.send(reqwest::Method::POST, path, &body).await?;
            results.append(&mut page.results);
            match page.next_cursor {
                Some(next) if page.has_more => cursor = Some(next),
                _ => break,
            }
        }
        Ok(results)
    }
}

impl NotionApi for NotionClient {
    async fn search(&self, query: &str, kind: SearchKind) -> ClientResult<Vec<SearchHit>> {
        let objects = self
            .collect_all("/search", |cursor| search_body(query, kind, cursor))
            .await?;
        Ok(objects.iter().map(search_hit).collect())
    }

    async fn query_database(&self, database: &DatabaseId) -> ClientResult<Vec<DatabaseEntry>> {
        let path = format!("/databases/{database}/query");
        let pages = self.collect_all(&path, query_body).await?;
        let total = pages.len();
        let entries: Vec<DatabaseEntry> = pages.iter().filter_map(entry_from_page).collect();
        if entries.len() < total {
            tracing::debug!(
                ignored = total - entries.len(),
                "pages without a numeric {PROP_ASSIGNMENT_ID} ignored"
            );
        }
        Ok(entries)
    }

    async fn create_database(&self, parent: &PageId, title: &str) -> ClientResult<DatabaseId> {
        let body = create_database_body(parent, title);
        let created: ObjectRef = self.send(reqwest::Method::POST, "/databases", &body).await?;
        Ok(DatabaseId(created.id))
    }

    async fn create_page(
        &self,
        database: &DatabaseId,
        payload: &CreatePayload,
    ) -> ClientResult<PageId> {
        let body = create_page_body(database, payload);
        let created: ObjectRef = self.send(reqwest::Method::POST, "/pages", &body).await?;
        Ok(PageId(created.id))
    }

    async fn update_page(&self, payload: &UpdatePayload) -> ClientResult<PageId> {
        let path = format!("/pages/{}", payload.page_id);
        let body = update_page_body(payload);
        let updated: ObjectRef = self.send(reqwest::Method::PATCH, &path, &body).await?;
        Ok(PageId(updated.id))
    }
}

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
struct ListResponse {
    #[serde(default)]
    results: Vec<RawObject>,
    #[serde(default)]
    has_more: bool,
    #[serde(default)]
    next_cursor: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ObjectRef {
    id: String,
}

/// A page or database as returned by search and query.
#[derive(Debug, Deserialize)]
pub(crate) struct RawObject {
    id: String,
    #[serde(default)]
    object: String,
    /// Databases carry their title at the top level.
    #[serde(default)]
    title: Vec<Value>,
    #[serde(default)]
    properties: Map<String, Value>,
}

// ---------------------------------------------------------------------------
// Response mapping
// ---------------------------------------------------------------------------

/// Keep a page only when its "Assignment Id" property is a non-negative
/// integral number. Text-typed or empty ids are not coerced.
pub(crate) fn entry_from_page(page: &RawObject) -> Option<DatabaseEntry> {
    let id_prop = page.properties.get(PROP_ASSIGNMENT_ID)?;
    if id_prop.get("type").and_then(Value::as_str) != Some("number") {
        return None;
    }
    let number = id_prop.get("number")?;
    let assignment_id = match number.as_u64() {
        Some(n) => n,
        None => {
            let f = number.as_f64()?;
            if f < 0.0 || f.fract() != 0.0 || f > u64::MAX as f64 {
                return None;
            }
            f as u64
        }
    };

    let due_date = page
        .properties
        .get(PROP_DUE_DATE)
        .and_then(|p| p.pointer("/date/start"))
        .and_then(Value::as_str)
        .map(str::to_owned);
    let url = page
        .properties
        .get(PROP_URL)
        .and_then(|p| p.get("url"))
        .and_then(Value::as_str)
        .map(str::to_owned);

    Some(DatabaseEntry {
        page_id: PageId(page.id.clone()),
        assignment_id: AssignmentId(assignment_id),
        due_date,
        url,
    })
}

fn search_hit(object: &RawObject) -> SearchHit {
    let rich_text = if object.object == "database" {
        Some(object.title.as_slice())
    } else {
        object
            .properties
            .values()
            .find(|p| p.get("type").and_then(Value::as_str) == Some("title"))
            .and_then(|p| p.get("title"))
            .and_then(Value::as_array)
            .map(Vec::as_slice)
    };
    SearchHit {
        id: object.id.clone(),
        title: rich_text.map(plain_text).unwrap_or_default(),
    }
}

fn plain_text(parts: &[Value]) -> String {
    parts
        .iter()
        .filter_map(|part| part.get("plain_text").and_then(Value::as_str))
        .collect()
}

// ---------------------------------------------------------------------------
// Request bodies
// ---------------------------------------------------------------------------

pub(crate) fn search_body(query: &str, kind: SearchKind, cursor: Option<&str>) -> Value {
    let mut body = json!({
        "query": query,
        "filter": { "property": "object", "value": kind.as_str() },
        "page_size": PAGE_SIZE,
    });
    if let Some(cursor) = cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}

pub(crate) fn query_body(cursor: Option<&str>) -> Value {
    let mut body = json!({ "page_size": PAGE_SIZE });
    if let Some(cursor) = cursor {
        body["start_cursor"] = json!(cursor);
    }
    body
}

fn text(content: &str) -> Value {
    json!([{ "type": "text", "text": { "content": content } }])
}

pub(crate) fn create_database_body(parent: &PageId, title: &str) -> Value {
    let properties: Map<String, Value> = ASSIGNMENT_SCHEMA
        .iter()
        .map(|(name, kind)| {
            let mut config = Map::new();
            config.insert(kind.as_str().to_string(), json!({}));
            (name.to_string(), Value::Object(config))
        })
        .collect();
    json!({
        "parent": { "type": "page_id", "page_id": parent.0 },
        "title": text(title),
        "properties": properties,
    })
}

pub(crate) fn create_page_body(database: &DatabaseId, payload: &CreatePayload) -> Value {
    json!({
        "parent": { "database_id": database.0 },
        "properties": {
            PROP_NAME: { "title": text(&payload.title) },
            PROP_DUE_DATE: { "date": { "start": payload.due_date } },
            PROP_ASSIGNMENT_ID: { "number": payload.assignment_id.0 },
            PROP_SUBJECT_ID: { "rich_text": text(&payload.subject_id) },
            PROP_URL: { "url": payload.url },
        },
    })
}

pub(crate) fn update_page_body(payload: &UpdatePayload) -> Value {
    json!({
        "properties": {
            PROP_DUE_DATE: { "date": { "start": payload.due_date } },
            PROP_URL: { "url": payload.url },
        },
    })
}
