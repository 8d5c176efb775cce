//! Wire request/response shapes for the five RPC methods (§6).
//!
//! These are deliberately thin: the method names, field names, and error
//! conditions are taken verbatim from the interface table, not invented.

use serde::{Deserialize, Serialize};

/// `Create` request: `{size: u32, type: string}`.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    /// Requested region size in bytes.
    pub size: u32,
    /// Wire type tag, e.g. `"int"`, `"string"`.
    #[serde(rename = "type")]
    pub type_tag: String,
}

/// `Create` response: `{id: u32}`.
#[derive(Debug, Serialize)]
pub struct CreateResponse {
    /// The newly allocated region's id.
    pub id: u32,
}

/// `Set` request: `{id: u32, value: string}`.
#[derive(Debug, Deserialize)]
pub struct SetRequest {
    /// Target region id.
    pub id: u32,
    /// External string encoding of the value (§6).
    pub value: String,
}

/// `Get` request: `{id: u32}`.
#[derive(Debug, Deserialize)]
pub struct GetRequest {
    /// Target region id.
    pub id: u32,
}

/// `Get` response: `{value: string}`.
#[derive(Debug, Serialize)]
pub struct GetResponse {
    /// External string encoding of the region's current value.
    pub value: String,
}

/// Request shared by `IncreaseRefCount` and `DecreaseRefCount`: `{id: u32}`.
#[derive(Debug, Deserialize)]
pub struct RefCountRequest {
    /// Target region id.
    pub id: u32,
}

/// Standard response envelope for every RPC method, matching this
/// codebase's usual `ApiResponse<T>` wrapper.
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// Whether the operation succeeded.
    pub success: bool,
    /// Response payload, present only on success.
    pub data: Option<T>,
    /// Error message, present only on failure.
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    /// Wraps a successful result.
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    /// Wraps a failure with no payload.
    pub fn err(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }
}
