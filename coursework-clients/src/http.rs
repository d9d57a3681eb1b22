//! Response handling shared by both clients.

use serde::de::DeserializeOwned;
use serde::Deserialize;

use crate::error::{ClientError, ClientResult, Service};

pub(crate) const USER_AGENT: &str = concat!("coursework/", env!("CARGO_PKG_VERSION"));

/// Build the reqwest client used by one service.
pub(crate) fn build_http(service: Service) -> ClientResult<reqwest::Client> {
    reqwest::Client::builder()
        .user_agent(USER_AGENT)
        .build()
        .map_err(|e| ClientError::http(service, e))
}

/// Read the body, map non-success statuses to API errors, decode JSON.
pub(crate) async fn read_json<T: DeserializeOwned>(
    service: Service,
    response: reqwest::Response,
) -> ClientResult<T> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|e| ClientError::http(service, e))?;
    if !status.is_success() {
        return Err(api_error(service, status.as_u16(), &body));
    }
    decode(service, &body)
}

pub(crate) fn decode<T: DeserializeOwned>(service: Service, body: &str) -> ClientResult<T> {
    serde_json::from_str(body).map_err(|source| ClientError::Decode { service, source })
}

#[derive(Deserialize)]
struct NotionErrorBody {
    #[serde(default)]
    code: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct CanvasErrorBody {
    #[serde(default)]
    errors: Vec<CanvasErrorMessage>,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Deserialize)]
struct CanvasErrorMessage {
    message: String,
}

/// Turn an error response into the service's error variant.
pub(crate) fn api_error(service: Service, status: u16, body: &str) -> ClientError {
    match service {
        Service::Notion => {
            let parsed = serde_json::from_str::<NotionErrorBody>(body).ok();
            let code = parsed
                .as_ref()
                .and_then(|b| b.code.clone())
                .unwrap_or_else(|| "unknown".to_string());
            let message = parsed
                .and_then(|b| b.message)
                .unwrap_or_else(|| snippet(body));
            ClientError::Notion {
                status,
                code,
                message,
            }
        }
        Service::Canvas => {
            let message = serde_json::from_str::<CanvasErrorBody>(body)
                .ok()
                .and_then(|b| {
                    let joined = b
                        .errors
                        .into_iter()
                        .map(|e| e.message)
                        .collect::<Vec<_>>()
                        .join("; ");
                    if joined.is_empty() {
                        b.message
                    } else {
                        Some(joined)
                    }
                })
                .unwrap_or_else(|| snippet(body));
            ClientError::Canvas { status, message }
        }
    }
}

fn snippet(body: &str) -> String {
    const MAX: usize = 200;
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_string();
    }
    match trimmed.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}…", &trimmed[..cut]),
        None => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notion_error_body_is_parsed() {
        let body = r#"{"object":"error","status":400,"code":"validation_error","message":"Assignment Id is not a property that exists."}"#;
        match api_error(Service::Notion, 400, body) {
            ClientError::Notion {
                status,
                code,
                message,
            } => {
                assert_eq!(status, 400);
                assert_eq!(code, "validation_error");
                assert!(message.contains("Assignment Id"));
            }
            other => panic!("expected Notion error, got {other:?}"),
        }
    }

    #[test]
    fn canvas_error_messages_are_joined() {
        let body = r#"{"errors":[{"message":"Invalid access token."},{"message":"expired"}]}"#;
        match api_error(Service::Canvas, 401, body) {
            ClientError::Canvas { status, message } => {
                assert_eq!(status, 401);
                assert_eq!(message, "Invalid access token.; expired");
            }
            other => panic!("expected Canvas error, got {other:?}"),
        }
    }

    #[test]
    fn non_json_body_falls_back_to_snippet() {
        let body = "<html>".to_string() + &"x".repeat(500);
        match api_error(Service::Canvas, 502, &body) {
            ClientError::Canvas { message, .. } => {
                assert!(message.starts_with("<html>"));
                assert!(message.ends_with('…'));
                assert!(message.chars().count() <= 201);
            }
            other => panic!("expected Canvas error, got {other:?}"),
        }
    }

    #[test]
    fn empty_body_is_named() {
        match api_error(Service::Notion, 500, "  ") {
            ClientError::Notion { code, message, .. } => {
                assert_eq!(code, "unknown");
                assert_eq!(message, "empty response body");
            }
            other => panic!("expected Notion error, got {other:?}"),
        }
    }
}
