//! # Response Envelopes
//!
//! Payload shapes returned by the directory service.

use serde::Serialize;

use crate::model::UserRecord;

/// One page of a list query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageEnvelope<T: Serialize = UserRecord> {
    pub success: bool,
    /// Items on this page
    pub count: u64,
    /// Items matching the query across all pages
    pub total: u64,
    pub total_pages: u64,
    pub current_page: u64,
    pub data: Vec<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T: Serialize> PageEnvelope<T> {
    pub fn new(data: Vec<T>, total: u64, total_pages: u64, current_page: u64) -> Self {
        Self {
            success: true,
            count: data.len() as u64,
            total,
            total_pages,
            current_page,
            data,
            error: None,
        }
    }

    /// Empty page reporting a read failure
    pub fn failed(current_page: u64, error: impl Into<String>) -> Self {
        Self {
            success: false,
            count: 0,
            total: 0,
            total_pages: 0,
            current_page,
            data: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// Single record response
#[derive(Debug, Clone, Serialize)]
pub struct SingleResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> SingleResponse<T> {
    pub fn new(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Delete response, carrying an empty object as `data`
#[derive(Debug, Clone, Serialize)]
pub struct DeleteResponse {
    pub success: bool,
    pub data: serde_json::Map<String, serde_json::Value>,
}

impl DeleteResponse {
    pub fn success() -> Self {
        Self {
            success: true,
            data: serde_json::Map::new(),
        }
    }
}

/// Reset response
#[derive(Debug, Clone, Serialize)]
pub struct ResetResponse {
    pub success: bool,
    pub message: &'static str,
}

impl ResetResponse {
    pub fn success() -> Self {
        Self {
            success: true,
            message: "In-memory database has been reset",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_page_envelope_serialization() {
        let page = PageEnvelope::new(vec![json!({"_id": "1"})], 4, 4, 2);

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["count"], 1);
        assert_eq!(json["totalPages"], 4);
        assert_eq!(json["currentPage"], 2);
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_failed_envelope() {
        let page: PageEnvelope = PageEnvelope::failed(3, "backend error: gone");

        let json = serde_json::to_value(&page).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["total"], 0);
        assert_eq!(json["currentPage"], 3);
        assert_eq!(json["data"], json!([]));
        assert_eq!(json["error"], "backend error: gone");
    }

    #[test]
    fn test_delete_response_has_empty_data() {
        let json = serde_json::to_value(DeleteResponse::success()).unwrap();
        assert_eq!(json, json!({"success": true, "data": {}}));
    }
}
