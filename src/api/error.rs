use crate::auth::TokenError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use timesheet_connector::ConnectorError;
use tracing::warn;

/// Error response
#[derive(Debug, Serialize, PartialEq)]
pub struct ErrorResponse {
    pub error: String,

    /// Status returned by the Timesheet API, when it rejected the call
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_status: Option<u16>,

    /// Raw Timesheet API response body, verbatim
    #[serde(skip_serializing_if = "Option::is_none")]
    pub upstream_body: Option<String>,
}

/// Application error types for the platform endpoints
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Unauthorized(String),
    NotFound(String),
    BadGateway {
        message: String,
        upstream_status: Option<u16>,
        upstream_body: Option<String>,
    },
}

impl AppError {
    fn bad_gateway(message: String) -> Self {
        AppError::BadGateway {
            message,
            upstream_status: None,
            upstream_body: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error, upstream_status, upstream_body) = match self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None, None),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg, None, None),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None, None),
            AppError::BadGateway {
                message,
                upstream_status,
                upstream_body,
            } => (StatusCode::BAD_GATEWAY, message, upstream_status, upstream_body),
        };

        let body = Json(ErrorResponse {
            error,
            upstream_status,
            upstream_body,
        });

        (status, body).into_response()
    }
}

impl From<ConnectorError> for AppError {
    fn from(err: ConnectorError) -> Self {
        let message = err.to_string();
        if err.is_validation() {
            return AppError::BadRequest(message);
        }
        match err {
            ConnectorError::UnknownResource(_) => AppError::NotFound(message),
            ConnectorError::Auth(_) => AppError::Unauthorized(message),
            ConnectorError::Upstream { status, body } => {
                warn!(status = status, "Timesheet API rejected the request");
                AppError::BadGateway {
                    message,
                    upstream_status: Some(status),
                    upstream_body: Some(body),
                }
            }
            // transport and decode failures
            _ => {
                warn!(error = %message, "Timesheet API call failed");
                AppError::bad_gateway(message)
            }
        }
    }
}

impl From<TokenError> for AppError {
    fn from(err: TokenError) -> Self {
        AppError::Unauthorized(format!("Invalid token: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn render(err: AppError) -> (StatusCode, serde_json::Value) {
        let response = err.into_response();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_errors_are_bad_request() {
        let (status, body) = render(ConnectorError::InvalidRange("unknown selector '12'".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid date range: unknown selector '12'");

        let (status, _) = render(ConnectorError::InvalidWebhook("missing".into()).into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let err = ConnectorError::invalid_input("'page' is out of range");
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], "Invalid input: 'page' is out of range");
    }

    #[tokio::test]
    async fn test_auth_error_is_unauthorized() {
        let (status, body) = render(ConnectorError::Auth("expired".into()).into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Authentication failed: expired");
    }

    #[tokio::test]
    async fn test_upstream_error_carries_body() {
        let err = ConnectorError::Upstream {
            status: 500,
            body: "boom".into(),
        };
        let (status, body) = render(err.into()).await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(body["upstream_status"], 500);
        assert_eq!(body["upstream_body"], "boom");
    }

    #[tokio::test]
    async fn test_unknown_resource_is_not_found() {
        let (status, body) = render(ConnectorError::UnknownResource("invoice".into()).into()).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body.get("upstream_status").is_none());
    }

    #[tokio::test]
    async fn test_token_error() {
        let (status, body) = render(TokenError::Missing.into()).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED);
        assert_eq!(body["error"], "Invalid token: Authorization token not provided");
    }
}
