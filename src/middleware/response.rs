use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use serde_json::json;

use crate::api::pagination::PageInfo;

/// Wrapper for API responses that applies the success envelope
#[derive(Debug)]
pub struct ApiResponse<T: Serialize> {
    data: T,
    status_code: StatusCode,
    page: Option<(usize, PageInfo)>,
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful API response with 200 status
    pub fn success(data: T) -> Self {
        Self {
            data,
            status_code: StatusCode::OK,
            page: None,
        }
    }

    /// Create a 201 Created response
    pub fn created(data: T) -> Self {
        Self {
            data,
            status_code: StatusCode::CREATED,
            page: None,
        }
    }

    /// Create a list response carrying a result count and pagination block
    pub fn paginated(data: T, results: usize, info: PageInfo) -> Self {
        Self {
            data,
            status_code: StatusCode::OK,
            page: Some((results, info)),
        }
    }

    /// Create a 204 No Content response
    pub fn no_content() -> ApiResponse<()> {
        ApiResponse {
            data: (),
            status_code: StatusCode::NO_CONTENT,
            page: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        // For 204 No Content, return an empty response
        if self.status_code == StatusCode::NO_CONTENT {
            return self.status_code.into_response();
        }

        let data_value = match serde_json::to_value(&self.data) {
            Ok(value) => value,
            Err(e) => {
                tracing::error!("Failed to serialize response data: {}", e);
                return (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "status": "error",
                        "message": "Failed to serialize response data"
                    })),
                )
                    .into_response();
            }
        };

        let mut envelope = json!({
            "status": "success",
            "data": data_value,
        });

        if let Some((results, info)) = self.page {
            envelope["results"] = json!(results);
            match serde_json::to_value(&info) {
                Ok(value) => envelope["pagination"] = value,
                Err(e) => {
                    tracing::error!("Failed to serialize pagination block: {}", e);
                }
            }
        }

        (self.status_code, Json(envelope)).into_response()
    }
}

// Convenience type alias for handler return values
pub type ApiResult<T> = Result<ApiResponse<T>, crate::error::ApiError>;
