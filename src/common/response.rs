use axum::{
    Json,
    http::StatusCode as HttpStatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Standard API response wrapper
///
/// Provides a consistent response format for the probe endpoints.
///
/// # Example
/// ```
/// use bootwright::common::ApiResponse;
/// use axum::http::StatusCode;
///
/// let ready: ApiResponse<bool> = ApiResponse::success(true);
/// assert!(ready.success);
///
/// let pending: ApiResponse<bool> = ApiResponse::error(StatusCode::SERVICE_UNAVAILABLE, "warming up");
/// assert_eq!(pending.error.unwrap().code, "Service Unavailable");
/// ```
#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ApiError>,

    pub success: bool,

    #[serde(skip)]
    pub http_status: HttpStatusCode,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub code: String,
    pub message: String,
}

impl ApiResponse<()> {
    /// Successful response without a payload
    pub fn ok() -> Self {
        Self {
            data: None,
            error: None,
            success: true,
            http_status: HttpStatusCode::OK,
        }
    }
}

impl<T: Serialize> ApiResponse<T> {
    /// Create a successful response with data
    ///
    /// Defaults to HTTP 200 OK.
    pub fn success(data: T) -> Self {
        Self {
            data: Some(data),
            error: None,
            success: true,
            http_status: HttpStatusCode::OK,
        }
    }

    /// Create an error response
    ///
    /// The error `code` is the status's canonical reason phrase.
    pub fn error(status: HttpStatusCode, message: impl Into<String>) -> ApiResponse<T> {
        ApiResponse {
            data: None,
            error: Some(ApiError {
                code: status
                    .canonical_reason()
                    .unwrap_or_else(|| status.as_str())
                    .to_string(),
                message: message.into(),
            }),
            success: false,
            http_status: status,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        (self.http_status, Json(self)).into_response()
    }
}
