//! JSON response payload.
//!
//! Serialized as `{"status": ..., "body": ...}` with fields in that order, so
//! the rejection body is byte-for-byte stable across responses.

use crate::config;
use serde::{Deserialize, Serialize};

/// Response body written by the endpoint and by the rejection path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub status: String,
    pub body: String,
}

impl Message {
    /// A `"Successful"` message with the given body.
    pub fn success(body: impl Into<String>) -> Self {
        Self {
            status: config::STATUS_SUCCESSFUL.to_string(),
            body: body.into(),
        }
    }

    /// A `"Request Failed"` message with the given body.
    pub fn failure(body: impl Into<String>) -> Self {
        Self {
            status: config::STATUS_FAILED.to_string(),
            body: body.into(),
        }
    }

    /// The rejection written when no token is available.
    pub fn capacity_exceeded() -> Self {
        Self::failure(config::CAPACITY_EXCEEDED_BODY)
    }
}
