//! Client for the remote summarization service.
//!
//! The service speaks a small JSON contract:
//! - `GET /` answers 200 while the service is up
//! - `POST /summarize` `{content, max_length}` → `{summary}`
//! - `POST /suggest-tags` `{content, title, max_tags}` → `{tags}`
//!
//! Failures come back as non-2xx with an optional `{detail}` body; 408 means
//! the model took too long.

use axum::http::StatusCode;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

use crate::config::AiConfig;
use crate::thinkable::strip_thoughts;

pub const DEFAULT_SUMMARY_LENGTH: usize = 200;
pub const DEFAULT_MAX_TAGS: usize = 5;
pub const MIN_CONTENT_CHARS: usize = 10;

const SUMMARY_TIMEOUT: Duration = Duration::from_secs(180);
const TAGS_TIMEOUT: Duration = Duration::from_secs(120);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Error, Debug)]
pub enum AiError {
    #[error("AI features are disabled")]
    Disabled,

    #[error("{0}")]
    InvalidInput(String),

    #[error("The request took too long, try shortening the note")]
    Timeout,

    #[error("AI service unavailable: {0}")]
    Unavailable(String),

    #[error("{detail}")]
    Rejected { status: u16, detail: String },

    #[error("Unexpected response from AI service: {0}")]
    InvalidResponse(String),
}

impl AiError {
    pub fn status(&self) -> StatusCode {
        match self {
            AiError::Disabled => StatusCode::SERVICE_UNAVAILABLE,
            AiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AiError::Timeout => StatusCode::REQUEST_TIMEOUT,
            AiError::Rejected { status, .. } if *status == 400 => StatusCode::BAD_REQUEST,
            AiError::Unavailable(_) | AiError::Rejected { .. } | AiError::InvalidResponse(_) => {
                StatusCode::BAD_GATEWAY
            }
        }
    }
}

impl From<reqwest::Error> for AiError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            AiError::Timeout
        } else if e.is_decode() {
            AiError::InvalidResponse(e.to_string())
        } else {
            AiError::Unavailable(e.to_string())
        }
    }
}

// ============================================================================
// Wire Types
// ============================================================================

#[derive(Serialize)]
struct SummaryRequest<'a> {
    content: &'a str,
    max_length: usize,
}

#[derive(Deserialize)]
struct SummaryResponse {
    summary: String,
}

#[derive(Serialize)]
struct TagsRequest<'a> {
    content: &'a str,
    title: &'a str,
    max_tags: usize,
}

#[derive(Deserialize)]
struct TagsResponse {
    #[serde(default)]
    tags: Vec<String>,
}

#[derive(Deserialize)]
struct ErrorDetail {
    detail: Option<String>,
}

// ============================================================================
// Client
// ============================================================================

#[derive(Clone)]
pub struct AiClient {
    http: reqwest::Client,
    base_url: String,
    enabled: bool,
}

impl AiClient {
    pub fn new(config: &AiConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.base_url.trim_end_matches('/').to_string(),
            enabled: config.enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Probe the service root. Never fails; an unreachable service is
    /// simply reported as unavailable.
    pub async fn is_available(&self) -> bool {
        if !self.enabled {
            return false;
        }
        match self
            .http
            .get(&self.base_url)
            .timeout(HEALTH_TIMEOUT)
            .send()
            .await
        {
            Ok(r) => r.status().is_success(),
            Err(e) => {
                tracing::debug!("AI service probe failed: {}", e);
                false
            }
        }
    }

    /// Ask for a summary of `content`. The result is returned verbatim,
    /// including any `<think>` reasoning.
    pub async fn summarize(&self, content: &str, max_length: usize) -> Result<String, AiError> {
        if content.trim().is_empty() {
            return Err(AiError::InvalidInput(
                "The note has no content to summarize".to_string(),
            ));
        }
        let body = SummaryRequest {
            content,
            max_length,
        };
        let resp: SummaryResponse = self.post_json("/summarize", &body, SUMMARY_TIMEOUT).await?;
        Ok(resp.summary)
    }

    /// Ask for tag suggestions, cleaned with [`clean_tags`].
    pub async fn suggest_tags(
        &self,
        content: &str,
        title: &str,
        max_tags: usize,
    ) -> Result<Vec<String>, AiError> {
        if title.trim().is_empty() {
            return Err(AiError::InvalidInput(
                "A title is needed to suggest tags".to_string(),
            ));
        }
        check_content(content)?;
        let body = TagsRequest {
            content,
            title,
            max_tags,
        };
        let resp: TagsResponse = self.post_json("/suggest-tags", &body, TAGS_TIMEOUT).await?;
        Ok(clean_tags(&resp.tags, max_tags))
    }

    async fn post_json<B: Serialize, R: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
        timeout: Duration,
    ) -> Result<R, AiError> {
        if !self.enabled {
            return Err(AiError::Disabled);
        }

        let url = format!("{}{}", self.base_url, path);
        tracing::info!(%url, "calling AI service");

        let response = self.http.post(&url).json(body).timeout(timeout).send().await?;
        let status = response.status();

        // reqwest and axum carry different `http` versions; compare raw codes
        if status.as_u16() == 408 {
            tracing::warn!(%url, "AI service reported a processing timeout");
            return Err(AiError::Timeout);
        }
        if !status.is_success() {
            let detail = response
                .json::<ErrorDetail>()
                .await
                .ok()
                .and_then(|d| d.detail)
                .unwrap_or_else(|| format!("AI service returned {}", status.as_u16()));
            tracing::warn!(%url, status = status.as_u16(), "AI service rejected request: {}", detail);
            return Err(AiError::Rejected {
                status: status.as_u16(),
                detail,
            });
        }

        Ok(response.json::<R>().await?)
    }
}

fn check_content(content: &str) -> Result<(), AiError> {
    if content.trim().chars().count() < MIN_CONTENT_CHARS {
        return Err(AiError::InvalidInput(
            "The note is too short for AI assistance".to_string(),
        ));
    }
    Ok(())
}

/// Strip `<think>` regions from suggested tags, drop blanks and duplicates,
/// and keep at most `max_tags`.
pub fn clean_tags(tags: &[String], max_tags: usize) -> Vec<String> {
    let mut cleaned: Vec<String> = Vec::new();
    for tag in tags {
        let tag = strip_thoughts(tag);
        if !tag.is_empty() && !cleaned.contains(&tag) {
            cleaned.push(tag);
        }
    }
    cleaned.truncate(max_tags);
    cleaned
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_clean_tags_strips_thoughts() {
        let raw = tags(&["<think>the note is about rust</think>rust", " web ", "", "rust"]);
        assert_eq!(clean_tags(&raw, 5), vec!["rust", "web"]);
    }

    #[test]
    fn test_clean_tags_caps_count() {
        let raw = tags(&["a", "b", "c", "d"]);
        assert_eq!(clean_tags(&raw, 2), vec!["a", "b"]);
    }

    #[test]
    fn test_check_content_minimum() {
        assert!(check_content("   short   ").is_err());
        assert!(check_content("long enough text").is_ok());
    }

    #[tokio::test]
    async fn test_disabled_client_short_circuits() {
        let client = AiClient::new(&AiConfig {
            base_url: "http://127.0.0.1:9".to_string(),
            enabled: false,
        });
        assert!(!client.is_available().await);
        let err = client
            .summarize("this content is long enough", DEFAULT_SUMMARY_LENGTH)
            .await
            .unwrap_err();
        assert!(matches!(err, AiError::Disabled));
    }

    #[test]
    fn test_error_status() {
        assert_eq!(AiError::Timeout.status(), StatusCode::REQUEST_TIMEOUT);
        let rejected = AiError::Rejected {
            status: 400,
            detail: "too short".into(),
        };
        assert_eq!(rejected.status(), StatusCode::BAD_REQUEST);
        assert_eq!(rejected.to_string(), "too short");
    }
}
