//! Cross-surface request/response wire shapes and transport seam.
//!
//! The transport treats unhandled faults as silent disconnects, so every
//! response — including every failure — travels as a structured
//! `{success, data?, error?}` payload.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Request kind for opening the full manager surface.
pub const OPEN_MANAGER: &str = "OPEN_MANAGER";
/// Request kind for reading the cached bookmark tree.
pub const GET_BOOKMARKS: &str = "GET_BOOKMARKS";

/// A request from a UI surface, discriminated by `kind`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Message {
    /// Discriminator, e.g. [`GET_BOOKMARKS`].
    #[serde(rename = "type")]
    pub kind: String,
    /// Request-specific payload, if any.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<Value>,
}

impl Message {
    /// Build a payload-less request of the given kind.
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
            payload: None,
        }
    }
}

/// Response envelope delivered back to the requesting surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Response {
    /// Whether the request was handled successfully.
    pub success: bool,
    /// Response data on success.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    /// Failure reason on error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl Response {
    /// A successful response carrying data.
    pub fn ok(data: Value) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// A successful response without data.
    pub fn ok_empty() -> Self {
        Self {
            success: true,
            data: None,
            error: None,
        }
    }

    /// A structured failure.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Errors from the messaging transport itself, as opposed to failures
/// reported inside a [`Response`].
#[derive(Error, Debug)]
pub enum TransportError {
    /// No endpoint is listening for requests.
    #[error("receiving end does not exist")]
    Disconnected,
}

/// The cross-process messaging collaborator.
///
/// Views send requests through this seam so they can fall back to a
/// direct store fetch when the background coordinator is unreachable.
#[async_trait]
pub trait Messenger: Send + Sync {
    /// Send a request and await its response.
    async fn send(&self, message: Message) -> Result<Response, TransportError>;
}
