use anyhow::{anyhow, Context, Result};
use async_trait::async_trait;
use log::debug;
use reqwest::{Client, Method, StatusCode};
use serde_json::Value;

use crate::models::SessionRecord;

use super::FocusApi;

/// HTTP implementation of [`FocusApi`].
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: Client::new(),
            base_url,
        }
    }

    async fn post(&self, path: &str) -> Result<Value> {
        self.request(Method::POST, path).await
    }

    async fn get(&self, path: &str) -> Result<Value> {
        self.request(Method::GET, path).await
    }

    async fn request(&self, method: Method, path: &str) -> Result<Value> {
        let url = format!("{}{}", self.base_url, path);
        debug!("{method} {url}");

        let response = self
            .http
            .request(method, &url)
            .header("Content-Type", "application/json")
            .send()
            .await
            .with_context(|| format!("request to {url} failed"))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .with_context(|| format!("reading response body from {url} failed"))?;

        // POST payloads are ignored beyond the status check, so a non-JSON
        // success body is treated as absent rather than rejected.
        let body: Option<Value> = if text.is_empty() {
            None
        } else {
            serde_json::from_str(&text).ok()
        };

        if !status.is_success() {
            return Err(anyhow!(failure_message(status, body.as_ref())));
        }

        Ok(body.unwrap_or(Value::Null))
    }
}

/// Pick the failure message out of an error response: the body's `error`
/// field, then its `message` field, then the status' reason phrase.
fn failure_message(status: StatusCode, body: Option<&Value>) -> String {
    body.and_then(|data| {
        data.get("error")
            .and_then(Value::as_str)
            .or_else(|| data.get("message").and_then(Value::as_str))
            .map(str::to_string)
    })
    .unwrap_or_else(|| {
        status
            .canonical_reason()
            .map(str::to_string)
            .unwrap_or_else(|| status.to_string())
    })
}

#[async_trait]
impl FocusApi for ApiClient {
    async fn start_focus(&self, user_id: i64) -> Result<()> {
        self.post(&format!("/api/focus/start/{user_id}")).await?;
        Ok(())
    }

    async fn start_break(&self, user_id: i64) -> Result<()> {
        self.post(&format!("/api/focus/break/start/{user_id}")).await?;
        Ok(())
    }

    async fn end_break(&self, user_id: i64) -> Result<()> {
        self.post(&format!("/api/focus/break/end/{user_id}")).await?;
        Ok(())
    }

    async fn end_focus(&self, user_id: i64) -> Result<()> {
        self.post(&format!("/api/focus/end/{user_id}")).await?;
        Ok(())
    }

    async fn fetch_history(&self, user_id: i64) -> Result<Vec<SessionRecord>> {
        let body = self.get(&format!("/api/focus/history/{user_id}")).await?;
        if body.is_null() {
            return Ok(Vec::new());
        }
        serde_json::from_value(body).context("history payload did not match the session schema")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_wins_over_message_field() {
        let body = serde_json::json!({
            "error": "session already active",
            "message": "should not be used"
        });
        assert_eq!(
            failure_message(StatusCode::CONFLICT, Some(&body)),
            "session already active"
        );
    }

    #[test]
    fn message_field_used_when_error_absent() {
        let body = serde_json::json!({ "message": "user not found" });
        assert_eq!(
            failure_message(StatusCode::NOT_FOUND, Some(&body)),
            "user not found"
        );
    }

    #[test]
    fn status_text_is_the_last_resort() {
        assert_eq!(
            failure_message(StatusCode::INTERNAL_SERVER_ERROR, None),
            "Internal Server Error"
        );

        let body = serde_json::json!({ "detail": "irrelevant shape" });
        assert_eq!(
            failure_message(StatusCode::BAD_GATEWAY, Some(&body)),
            "Bad Gateway"
        );
    }

    #[test]
    fn base_url_trailing_slash_is_trimmed() {
        let client = ApiClient::new("http://localhost:5173/");
        assert_eq!(client.base_url, "http://localhost:5173");
    }
}
