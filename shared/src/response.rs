//! API Response types
//!
//! Standardized API response structure for the entire framework.
//! Every endpoint, success or failure, answers with this envelope:
//!
//! ```json
//! {
//!     "success": true,
//!     "data": { ... },
//!     "message": "optional human-readable text",
//!     "count": 10,
//!     "total": 42
//! }
//! ```

use serde::{Deserialize, Serialize};

/// Unified API response structure
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded
    pub success: bool,
    /// Response data (omitted on errors)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message (errors, or informational on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Number of items in `data` (list endpoints)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    /// Total number of matching items (when `data` is a page)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<usize>,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: None,
            count: None,
            total: None,
        }
    }

    /// Create a successful response with custom message
    pub fn ok_with_message(data: T, message: impl Into<String>) -> Self {
        Self {
            message: Some(message.into()),
            ..Self::ok(data)
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            message: Some(message.into()),
            count: None,
            total: None,
        }
    }

    /// Attach list counters
    pub fn with_count(mut self, count: usize, total: usize) -> Self {
        self.count = Some(count);
        self.total = Some(total);
        self
    }
}

impl<T> ApiResponse<Vec<T>> {
    /// Successful list response; `count` derived from the payload
    pub fn list(data: Vec<T>) -> Self {
        let count = data.len();
        Self::ok(data).with_count(count, count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn envelope_shape() {
        let json = serde_json::to_value(ApiResponse::ok(1)).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"], 1);
        assert!(json.get("message").is_none());

        let json = serde_json::to_value(ApiResponse::<()>::error("boom")).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], "boom");
        assert!(json.get("data").is_none());
    }

    #[test]
    fn list_counters() {
        let json = serde_json::to_value(ApiResponse::list(vec![1, 2, 3])).unwrap();
        assert_eq!(json["count"], 3);
        assert_eq!(json["total"], 3);
    }
}
