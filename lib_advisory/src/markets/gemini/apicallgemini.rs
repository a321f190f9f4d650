use crate::guard::CooldownGuard;
use crate::loggers::loggerlocal::LoggerLocal;
use crate::retrieve::api_http::ApiClient;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::Arc;
use thiserror::Error;

/// Default Gemini API endpoint.
const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

/// Failure modes of a generation request, ordered by how the callers
/// react: the first two are expected sentinels, the rest are transient.
#[derive(Debug, Error)]
pub enum GeminiError {
    /// No API key configured; the request was never issued.
    #[error("Gemini API key is not configured")]
    NoKey,

    /// The shared cooldown is active, or the server answered 429.
    #[error("Gemini requests are rate limited")]
    RateLimited,

    /// Non-2xx response that is not a rate-limit signal.
    #[error("Gemini HTTP error: status {status}")]
    Http { status: u16 },

    /// Transport-level failure after retries.
    #[error("Gemini transport error: {0}")]
    Transport(String),

    /// A 2xx response that carried no usable candidate text.
    #[error("Gemini returned an empty response")]
    Empty,
}

/// Client for the Gemini `generateContent` operation.
///
/// All fetchers share one instance, and with it the one process-wide
/// [`CooldownGuard`]: a 429 on any prompt suppresses every prompt for
/// the cooldown window.
pub struct ApiCallGemini {
    client: ApiClient,
    api_key: Option<String>,
    cooldown: Arc<CooldownGuard>,
    logger: Arc<LoggerLocal>,
}

impl ApiCallGemini {
    /// Creates a client against the production endpoint.
    pub fn new(
        api_key: Option<String>,
        cooldown: Arc<CooldownGuard>,
        logger: Arc<LoggerLocal>,
    ) -> Self {
        Self::with_base_url(GEMINI_BASE_URL, api_key, cooldown, logger)
    }

    /// Creates a client against an explicit endpoint (test servers).
    pub fn with_base_url(
        base_url: &str,
        api_key: Option<String>,
        cooldown: Arc<CooldownGuard>,
        logger: Arc<LoggerLocal>,
    ) -> Self {
        Self {
            client: ApiClient::new(base_url, None),
            api_key,
            cooldown,
            logger,
        }
    }

    /// Whether a key is configured at all.
    pub fn has_key(&self) -> bool {
        self.api_key.is_some()
    }

    /// Shared guard, for callers that need to consult it directly.
    pub fn cooldown(&self) -> &CooldownGuard {
        &self.cooldown
    }

    /// Generates text for a prompt.
    ///
    /// Checks the key and the cooldown before any network activity. On a
    /// 429 or RESOURCE_EXHAUSTED reply the cooldown is armed before the
    /// error is returned, so sibling fetchers short-circuit immediately.
    pub async fn generate(
        &self,
        model: &str,
        prompt: &str,
        grounding: bool,
    ) -> Result<String, GeminiError> {
        let api_key = self.api_key.as_ref().ok_or(GeminiError::NoKey)?;
        if self.cooldown.is_cooling_down() {
            return Err(GeminiError::RateLimited);
        }

        let mut body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }]
        });
        if grounding {
            body["tools"] = json!([{ "google_search": {} }]);
        }

        let mut headers = HeaderMap::new();
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(b"x-goog-api-key"),
            HeaderValue::from_str(api_key),
        ) {
            headers.insert(name, value);
        }

        let path = format!("v1beta/models/{}:generateContent", model);
        let response = self
            .client
            .request::<Value, Value>(Method::POST, &path, Some(headers), Some(body))
            .await
            .map_err(|e| GeminiError::Transport(e.to_string()))?;

        if response.is_rate_limited() || resource_exhausted(response.error_body.as_deref()) {
            self.logger
                .warn("Gemini rate limit hit; starting cooldown", None)
                .await;
            self.cooldown.start_cooldown();
            return Err(GeminiError::RateLimited);
        }

        if !response.success {
            self.logger
                .error(
                    &format!("Gemini request failed with status {}", response.status),
                    response
                        .error_body
                        .as_ref()
                        .map(|b| json!({ "body": b })),
                )
                .await;
            return Err(GeminiError::Http {
                status: response.status,
            });
        }

        let payload = response.data.ok_or(GeminiError::Empty)?;
        let text = candidate_text(&payload);
        if text.is_empty() {
            return Err(GeminiError::Empty);
        }
        Ok(text)
    }
}

/// Whether an error body carries the resource-exhausted marker some
/// deployments use instead of a bare 429 status.
fn resource_exhausted(error_body: Option<&str>) -> bool {
    error_body
        .map(|b| b.contains("RESOURCE_EXHAUSTED") || b.contains("429"))
        .unwrap_or(false)
}

/// Joins the text parts of the first candidate.
fn candidate_text(payload: &Value) -> String {
    let parts = &payload["candidates"][0]["content"]["parts"];
    match parts.as_array() {
        Some(parts) => parts
            .iter()
            .filter_map(|p| p["text"].as_str())
            .collect::<Vec<_>>()
            .join(""),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn candidate_text_joins_parts() {
        let payload = json!({
            "candidates": [{
                "content": { "parts": [{ "text": "hello " }, { "text": "world" }] }
            }]
        });
        assert_eq!(candidate_text(&payload), "hello world");
    }

    #[test]
    fn candidate_text_is_empty_without_candidates() {
        assert_eq!(candidate_text(&json!({})), "");
        assert_eq!(candidate_text(&json!({"candidates": []})), "");
    }

    #[test]
    fn resource_exhausted_detection() {
        assert!(resource_exhausted(Some(
            "{\"error\":{\"status\":\"RESOURCE_EXHAUSTED\"}}"
        )));
        assert!(resource_exhausted(Some("error code 429")));
        assert!(!resource_exhausted(Some("internal error")));
        assert!(!resource_exhausted(None));
    }
}
