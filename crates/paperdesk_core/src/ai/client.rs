//! Chat-completion HTTP client and error classification.
//!
//! # Responsibility
//! - POST `{model, messages, temperature, max_tokens, stream:false}` with
//!   bearer authorization and extract `choices[0].message.content`.
//! - Map raw transport/HTTP failures onto the error kinds surfaced to the
//!   user.
//!
//! # Invariants
//! - A 2xx response missing the expected content field is a hard
//!   `MalformedResponse`, never an empty success.
//! - Classification is heuristic and lossy by design; anything unmatched
//!   falls through to `Unknown` with a generic user-facing message.

use crate::service::context_service::ChatMessage;
use log::{info, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use reqwest::blocking::Client;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::time::Instant;

/// Completion endpoint used when none is configured.
pub const DEFAULT_ENDPOINT: &str = "https://api.z.ai/api/coding/paas/v4/chat/completions";

/// Model identifier used when none is configured.
pub const DEFAULT_MODEL: &str = "glm-5";

static RATE_LIMIT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)rate|too many requests").expect("valid rate-limit regex"));
static CONTEXT_SIZE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)context|token|length").expect("valid context-size regex"));

/// Generation-call failure, classified for user presentation.
#[derive(Debug)]
pub enum AiError {
    /// Transport-level failure; the host was never reached.
    NetworkFailure(String),
    /// Credential rejected by the service (401/403).
    AuthRejected,
    /// Too many requests (429 or rate-limit wording).
    RateLimited,
    /// Request rejected for size/length reasons (400/413 or wording).
    ContextTooLarge,
    /// 5xx-class server failure.
    ServiceUnavailable { status: u16 },
    /// 2xx response missing `choices[0].message.content`.
    MalformedResponse,
    /// Anything the heuristics could not place.
    Unknown(String),
}

impl AiError {
    /// Short user-facing title for the notification surface.
    pub fn title(&self) -> &'static str {
        match self {
            Self::NetworkFailure(_) => "Connection Failed",
            Self::AuthRejected => "Invalid API Key",
            Self::RateLimited => "Rate Limited",
            Self::ContextTooLarge => "Context Too Large",
            Self::ServiceUnavailable { .. } => "Server Error",
            Self::MalformedResponse => "Unexpected Response",
            Self::Unknown(_) => "API Error",
        }
    }

    /// User-facing body text for the notification surface.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::NetworkFailure(_) => {
                "Could not reach the server. Check your internet connection and try again."
            }
            Self::AuthRejected => {
                "Your API key was rejected. Check that it is correct in the prompt configuration."
            }
            Self::RateLimited => "You have sent too many requests. Wait a moment and try again.",
            Self::ContextTooLarge => {
                "Your context is too large for the model to process. Try excluding some papers \
                 from context, reducing the max token setting, or deactivating folders."
            }
            Self::ServiceUnavailable { .. } => {
                "The API server encountered an error. This is likely temporary; try again in a moment."
            }
            Self::MalformedResponse => {
                "The service answered in an unexpected format. Try again; if it persists, check the model setting."
            }
            Self::Unknown(_) => "An unexpected error occurred. Please try again.",
        }
    }
}

impl Display for AiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NetworkFailure(detail) => write!(f, "network failure: {detail}"),
            Self::AuthRejected => write!(f, "credential rejected by service"),
            Self::RateLimited => write!(f, "rate limited by service"),
            Self::ContextTooLarge => write!(f, "request rejected for context size"),
            Self::ServiceUnavailable { status } => write!(f, "service unavailable: HTTP {status}"),
            Self::MalformedResponse => write!(f, "response missing choices[0].message.content"),
            Self::Unknown(detail) => write!(f, "unclassified generation error: {detail}"),
        }
    }
}

impl Error for AiError {}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f64,
    max_tokens: u32,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Blocking completion client.
///
/// The core stays synchronous; the embedding shell dispatches calls off its
/// interaction thread and hands the settled result back to the generation
/// service.
pub struct CompletionClient {
    http: Client,
    endpoint: String,
    model: String,
}

impl Default for CompletionClient {
    fn default() -> Self {
        Self::new(DEFAULT_ENDPOINT, DEFAULT_MODEL)
    }
}

impl CompletionClient {
    /// Creates a client for the given endpoint and model.
    pub fn new(endpoint: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            http: Client::new(),
            endpoint: endpoint.into(),
            model: model.into(),
        }
    }

    /// Returns the configured model identifier.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Sends one non-streaming completion request.
    pub fn complete(
        &self,
        api_key: &str,
        messages: &[ChatMessage],
        temperature: f64,
        max_tokens: u32,
    ) -> Result<String, AiError> {
        let started_at = Instant::now();
        let body = CompletionRequest {
            model: &self.model,
            messages,
            temperature,
            max_tokens,
            stream: false,
        };

        let response = self
            .http
            .post(&self.endpoint)
            .header("Authorization", format!("Bearer {api_key}"))
            .json(&body)
            .send()
            .map_err(classify_transport_error)?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|err| AiError::Unknown(err.to_string()))?;

        if !status.is_success() {
            let error = classify_http_error(status, &text);
            warn!(
                "event=completion module=ai status=error http_status={} duration_ms={} kind={}",
                status.as_u16(),
                started_at.elapsed().as_millis(),
                error.title()
            );
            return Err(error);
        }

        let parsed: CompletionResponse =
            serde_json::from_str(&text).map_err(|_| AiError::MalformedResponse)?;
        let content = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or(AiError::MalformedResponse)?;

        info!(
            "event=completion module=ai status=ok duration_ms={} response_chars={}",
            started_at.elapsed().as_millis(),
            content.chars().count()
        );
        Ok(content)
    }
}

fn classify_transport_error(err: reqwest::Error) -> AiError {
    if err.is_connect() || err.is_timeout() {
        AiError::NetworkFailure(err.to_string())
    } else {
        AiError::Unknown(err.to_string())
    }
}

/// Classifies a non-2xx response from status code and body wording.
///
/// Ordering mirrors user impact: credentials, throttling, size, server
/// health. Status codes win over wording; wording only widens the net.
pub fn classify_http_error(status: StatusCode, body: &str) -> AiError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => AiError::AuthRejected,
        StatusCode::TOO_MANY_REQUESTS => AiError::RateLimited,
        StatusCode::BAD_REQUEST | StatusCode::PAYLOAD_TOO_LARGE => AiError::ContextTooLarge,
        status if status.is_server_error() => AiError::ServiceUnavailable {
            status: status.as_u16(),
        },
        _ if RATE_LIMIT_RE.is_match(body) => AiError::RateLimited,
        _ if CONTEXT_SIZE_RE.is_match(body) => AiError::ContextTooLarge,
        status => AiError::Unknown(format!("HTTP {}: {body}", status.as_u16())),
    }
}
