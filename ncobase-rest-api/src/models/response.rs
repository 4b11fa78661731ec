use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{DateTime, Utc};
use ncobase_api_types::CursorPage;
use serde::{Deserialize, Serialize};

/// Success envelope: `{"code":0,"message":"ok","data":...}`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: T,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<ResponseMeta>,
    #[serde(skip)]
    status: Option<u16>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResponseMeta {
    pub pagination: PaginationMeta,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    pub cursor: Option<String>,
    pub next_cursor: Option<String>,
    pub prev_cursor: Option<String>,
    pub has_next_page: bool,
    pub has_prev_page: bool,
    pub total: u64,
    pub limit: u64,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            code: 0,
            message: "ok".to_string(),
            data,
            meta: None,
            status: None,
        }
    }

    /// 201 with the created resource
    pub fn created(data: T) -> Self {
        Self {
            status: Some(StatusCode::CREATED.as_u16()),
            ..Self::ok(data)
        }
    }
}

impl<T> ApiResponse<Vec<T>> {
    pub fn page(page: CursorPage<T>) -> Self {
        let pagination = PaginationMeta {
            cursor: page.cursor,
            next_cursor: page.next_cursor,
            prev_cursor: page.prev_cursor,
            has_next_page: page.has_next_page,
            has_prev_page: page.has_prev_page,
            total: page.total,
            limit: page.limit,
        };
        Self {
            meta: Some(ResponseMeta { pagination }),
            ..Self::ok(page.items)
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        let status = self
            .status
            .and_then(|s| StatusCode::from_u16(s).ok())
            .unwrap_or(StatusCode::OK);
        (status, Json(self)).into_response()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy() -> Self {
        Self {
            status: "healthy".to_string(),
            timestamp: Utc::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ncobase_api_types::CursorInput;
    use serde_json::json;

    #[test]
    fn test_envelope_shape() {
        let value = serde_json::to_value(ApiResponse::ok(json!({"id": "t1"}))).unwrap();
        assert_eq!(value, json!({"code": 0, "message": "ok", "data": {"id": "t1"}}));
    }

    #[test]
    fn test_page_meta() {
        let rows: Vec<String> = (0..3).map(|i| format!("{:03}", i)).collect();
        let page = CursorPage::from_window(rows, &CursorInput::first(2), 3, |s| s.clone());
        let value = serde_json::to_value(ApiResponse::page(page)).unwrap();

        assert_eq!(value["data"], json!(["000", "001"]));
        assert_eq!(value["meta"]["pagination"]["next_cursor"], json!("001"));
        assert_eq!(value["meta"]["pagination"]["has_next_page"], json!(true));
        assert_eq!(value["meta"]["pagination"]["total"], json!(3));
    }
}
