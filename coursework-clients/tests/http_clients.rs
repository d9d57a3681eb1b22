//! End-to-end client tests against a throwaway HTTP/1.1 server on localhost.
//!
//! The server answers each accepted connection with the next canned response
//! and records the request head (plus body) so tests can assert on paths,
//! headers and payloads.

use std::io::{BufRead, BufReader, Read, Write};
use std::net::TcpListener;
use std::sync::{Arc, Mutex};
use std::thread;

use coursework_clients::{CanvasApi, CanvasClient, ClientError, NotionApi, NotionClient};
use coursework_core::types::{AssignmentId, CourseId, DatabaseId, PageId, UpdatePayload};

struct Canned {
    status: &'static str,
    headers: Vec<String>,
    body: String,
}

impl Canned {
    fn ok(body: &str) -> Self {
        Self::status("200 OK", body)
    }

    fn status(status: &'static str, body: &str) -> Self {
        Self {
            status,
            headers: vec![],
            body: body.to_string(),
        }
    }
}

type Recorded = Arc<Mutex<Vec<String>>>;

/// Bind an ephemeral port; the caller builds its script once the base URL is
/// known (Canvas `Link` headers must point back at the server).
fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
    let base = format!("http://{}", listener.local_addr().expect("addr"));
    (listener, base)
}

/// Serve `responses` in order, one per connection.
fn serve(listener: TcpListener, responses: Vec<Canned>) -> Recorded {
    let seen: Recorded = Arc::new(Mutex::new(Vec::new()));
    let log = Arc::clone(&seen);
    thread::spawn(move || {
        for canned in responses {
            let Ok((mut stream, _)) = listener.accept() else {
                return;
            };
            let mut reader = BufReader::new(stream.try_clone().expect("clone"));
            let mut request = String::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                if reader.read_line(&mut line).unwrap_or(0) == 0 || line == "\r\n" {
                    break;
                }
                if let Some(value) = line.to_ascii_lowercase().strip_prefix("content-length:") {
                    content_length = value.trim().parse().unwrap_or(0);
                }
                request.push_str(&line);
            }
            let mut body = vec![0u8; content_length];
            let _ = reader.read_exact(&mut body);
            request.push_str(&String::from_utf8_lossy(&body));
            log.lock().unwrap().push(request);

            let mut response = format!(
                "HTTP/1.1 {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n",
                canned.status,
                canned.body.len()
            );
            for header in &canned.headers {
                response.push_str(header);
                response.push_str("\r\n");
            }
            response.push_str("\r\n");
            response.push_str(&canned.body);
            let _ = stream.write_all(response.as_bytes());
            let _ = stream.flush();
        }
    });
    seen
}

// ---------------------------------------------------------------------------
// Canvas
// ---------------------------------------------------------------------------

#[tokio::test]
async fn canvas_follows_link_header_across_pages() {
    let (listener, base) = bind();
    let next = format!("{base}/api/v1/courses/5/assignments?page=2&per_page=100");
    let seen = serve(
        listener,
        vec![
            Canned {
                status: "200 OK",
                headers: vec![format!(r#"Link: <{next}>; rel="next""#)],
                body: r#"[{"id": 1, "name": "HW1", "due_at": "2024-01-01T23:59:00Z", "course_id": 5}]"#
                    .to_string(),
            },
            Canned::ok(r#"[{"id": "2", "name": "HW2", "due_at": null, "course_id": 5}]"#),
        ],
    );

    let client = CanvasClient::new(&format!("{base}/"), "canvas-token").expect("client");
    let assignments = client.list_assignments(CourseId(5)).await.expect("list");

    assert_eq!(assignments.len(), 2);
    assert_eq!(assignments[0].id, Some(AssignmentId(1)));
    assert_eq!(assignments[1].id, Some(AssignmentId(2)));
    assert_eq!(assignments[1].due_at, None);

    let requests = seen.lock().unwrap();
    assert_eq!(requests.len(), 2);
    assert!(
        requests[0].starts_with("GET /api/v1/courses/5/assignments?per_page=100 "),
        "got: {}",
        requests[0]
    );
    assert!(requests[1].contains("page=2"));
    assert!(requests[0]
        .to_ascii_lowercase()
        .contains("authorization: bearer canvas-token"));
}

#[tokio::test]
async fn canvas_error_is_not_classified_as_notion() {
    let (listener, base) = bind();
    serve(
        listener,
        vec![Canned::status(
            "401 Unauthorized",
            r#"{"errors":[{"message":"Invalid access token."}]}"#,
        )],
    );

    let client = CanvasClient::new(&base, "bad").expect("client");
    let err = client.list_courses().await.unwrap_err();
    assert!(!err.is_notion());
    match err {
        ClientError::Canvas { status, message } => {
            assert_eq!(status, 401);
            assert_eq!(message, "Invalid access token.");
        }
        other => panic!("expected Canvas error, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Notion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn notion_query_pages_through_cursor_and_drops_text_ids() {
    let (listener, base) = bind();
    let first = r#"{
        "object": "list",
        "results": [
            {"object": "page", "id": "p1", "properties": {
                "Assignment Id": {"type": "number", "number": 1},
                "Due Date": {"type": "date", "date": {"start": "2024-01-01"}}
            }},
            {"object": "page", "id": "p-text", "properties": {
                "Assignment Id": {"type": "rich_text", "rich_text": []}
            }}
        ],
        "has_more": true,
        "next_cursor": "cursor-2"
    }"#;
    let second = r#"{
        "object": "list",
        "results": [
            {"object": "page", "id": "p2", "properties": {
                "Assignment Id": {"type": "number", "number": 2}
            }}
        ],
        "has_more": false,
        "next_cursor": null
    }"#;
    let seen = serve(listener, vec![Canned::ok(first), Canned::ok(second)]);

    let client = NotionClient::with_base_url("secret_x", &base).expect("client");
    let entries = client
        .query_database(&DatabaseId::from("db-1"))
        .await
        .expect("query");

    let ids: Vec<_> = entries.iter().map(|e| e.page_id.0.as_str()).collect();
    assert_eq!(ids, vec!["p1", "p2"]);
    assert_eq!(entries[0].due_date.as_deref(), Some("2024-01-01"));

    let requests = seen.lock().unwrap();
    assert!(requests[0].starts_with("POST /databases/db-1/query "));
    assert!(requests[0]
        .to_ascii_lowercase()
        .contains("notion-version: 2022-06-28"));
    assert!(!requests[0].contains("start_cursor"));
    assert!(requests[1].contains(r#""start_cursor":"cursor-2""#));
}

#[tokio::test]
async fn notion_update_patches_page_and_surfaces_api_errors() {
    let (listener, base) = bind();
    let seen = serve(
        listener,
        vec![
            Canned::ok(r#"{"object": "page", "id": "p1"}"#),
            Canned::status(
                "400 Bad Request",
                r#"{"object":"error","status":400,"code":"validation_error","message":"Due Date is not a property that exists."}"#,
            ),
        ],
    );

    let client = NotionClient::with_base_url("secret_x", &base).expect("client");
    let payload = UpdatePayload {
        page_id: PageId::from("p1"),
        assignment_id: AssignmentId(1),
        due_date: "2024-02-01".into(),
        url: None,
    };

    let updated = client.update_page(&payload).await.expect("update");
    assert_eq!(updated, PageId::from("p1"));

    let err = client.update_page(&payload).await.unwrap_err();
    assert!(err.is_notion());
    assert!(matches!(err, ClientError::Notion { status: 400, .. }), "got: {err}");

    let requests = seen.lock().unwrap();
    assert!(requests[0].starts_with("PATCH /pages/p1 "));
    assert!(requests[0].contains(r#""Due Date""#));
    assert!(!requests[0].contains(r#""Name""#));
}
