use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};

use crate::application::validation::{FieldErrors, UseCaseError};

/// Wire shape shared by every response, success or failure.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    pub status: u16,
    pub code: &'static str,
}

pub fn status_code_label(status: StatusCode) -> &'static str {
    match status {
        StatusCode::OK => "Ok",
        StatusCode::CREATED => "created",
        StatusCode::BAD_REQUEST => "bad request",
        StatusCode::UNAUTHORIZED => "unauthorized",
        StatusCode::FORBIDDEN => "forbidden",
        StatusCode::NOT_FOUND => "not found",
        StatusCode::METHOD_NOT_ALLOWED => "method not allowed",
        StatusCode::PAYLOAD_TOO_LARGE => "payload too large",
        s if s.is_server_error() => "internal error",
        _ => "error",
    }
}

fn render<T: Serialize>(status: StatusCode, message: String, data: Option<T>) -> Response {
    let body = Envelope {
        success: status.is_success(),
        message,
        data,
        status: status.as_u16(),
        code: status_code_label(status),
    };
    (status, Json(body)).into_response()
}

#[derive(Debug)]
pub struct ApiResponse<T> {
    status: StatusCode,
    message: &'static str,
    data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(message: &'static str, data: T) -> Self {
        Self {
            status: StatusCode::OK,
            message,
            data: Some(data),
        }
    }

    pub fn created(message: &'static str, data: T) -> Self {
        Self {
            status: StatusCode::CREATED,
            message,
            data: Some(data),
        }
    }
}

impl ApiResponse<()> {
    /// 200 with the `data` key omitted.
    pub fn done(message: &'static str) -> Self {
        Self {
            status: StatusCode::OK,
            message,
            data: None,
        }
    }
}

impl<T: Serialize> IntoResponse for ApiResponse<T> {
    fn into_response(self) -> Response {
        render(self.status, self.message.to_string(), self.data)
    }
}

pub const NOT_AUTHENTICATED: &str = "Authentication credentials were not provided.";
pub const INVALID_TOKEN: &str = "Invalid token.";
pub const INACTIVE_USER: &str = "User inactive or deleted.";
pub const MALFORMED_DETAIL: &str = "Request body must be a JSON object.";

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("validation error")]
    Validation(FieldErrors),
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("{0} id is required")]
    MissingId(&'static str),
    #[error("{0}")]
    NotFound(&'static str),
    #[error("malformed payload")]
    MalformedPayload,
    #[error("request body rejected with {0}")]
    BodyRejected(StatusCode),
    #[error("method not allowed")]
    MethodNotAllowed,
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<UseCaseError> for ApiError {
    fn from(e: UseCaseError) -> Self {
        match e {
            UseCaseError::Validation(errors) => ApiError::Validation(errors),
            UseCaseError::Internal(err) => ApiError::Internal(err),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Validation(errors) => render(
                StatusCode::BAD_REQUEST,
                "Validation Error".into(),
                Some(errors),
            ),
            ApiError::InvalidCredentials => render(
                StatusCode::BAD_REQUEST,
                "Invalid Credentials".into(),
                Some(json!({})),
            ),
            ApiError::MissingId(resource) => render::<Value>(
                StatusCode::BAD_REQUEST,
                format!("{resource} id is required"),
                None,
            ),
            ApiError::NotFound(message) => {
                render::<Value>(StatusCode::NOT_FOUND, message.into(), None)
            }
            ApiError::MalformedPayload => render(
                StatusCode::BAD_REQUEST,
                "Malformed payload".into(),
                Some(json!({ "detail": MALFORMED_DETAIL })),
            ),
            ApiError::BodyRejected(StatusCode::PAYLOAD_TOO_LARGE) => render::<Value>(
                StatusCode::PAYLOAD_TOO_LARGE,
                "Payload too large".into(),
                None,
            ),
            ApiError::BodyRejected(status) => render(
                status,
                "Malformed payload".into(),
                Some(json!({ "detail": MALFORMED_DETAIL })),
            ),
            ApiError::MethodNotAllowed => render::<Value>(
                StatusCode::METHOD_NOT_ALLOWED,
                "Method not allowed".into(),
                None,
            ),
            ApiError::Unauthorized(message) => {
                let mut res = render::<Value>(StatusCode::UNAUTHORIZED, message.into(), None);
                res.headers_mut()
                    .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Token"));
                res
            }
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "request_failed");
                render::<Value>(
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".into(),
                    None,
                )
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::to_bytes;

    async fn body_json(res: Response) -> Value {
        let bytes = to_bytes(res.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn success_envelope_carries_data() {
        let res = ApiResponse::created("Post Created", json!({"id": 1})).into_response();
        assert_eq!(res.status(), StatusCode::CREATED);
        assert_eq!(
            body_json(res).await,
            json!({
                "success": true,
                "message": "Post Created",
                "data": {"id": 1},
                "status": 201,
                "code": "created",
            })
        );
    }

    #[tokio::test]
    async fn data_is_omitted_when_absent() {
        let body = body_json(ApiResponse::done("Post Deleted").into_response()).await;
        assert!(body.get("data").is_none());
        assert_eq!(body["code"], "Ok");
    }

    #[tokio::test]
    async fn validation_error_lists_fields() {
        let res = ApiError::Validation(FieldErrors::single("title", "This field is required."))
            .into_response();
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body = body_json(res).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Validation Error");
        assert_eq!(body["data"]["title"][0], "This field is required.");
        assert_eq!(body["code"], "bad request");
    }

    #[tokio::test]
    async fn internal_errors_hide_details() {
        let res = ApiError::Internal(anyhow::anyhow!("connection refused: secret-host")).into_response();
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let text = serde_json::to_string(&body_json(res).await).unwrap();
        assert!(!text.contains("secret-host"));
    }

    #[tokio::test]
    async fn unauthorized_sets_challenge_header() {
        let res = ApiError::Unauthorized(INVALID_TOKEN).into_response();
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(res.headers()[header::WWW_AUTHENTICATE], "Token");
    }

    #[tokio::test]
    async fn oversized_body_is_reported_as_too_large() {
        let res = ApiError::BodyRejected(StatusCode::PAYLOAD_TOO_LARGE).into_response();
        assert_eq!(res.status(), StatusCode::PAYLOAD_TOO_LARGE);
        let body = body_json(res).await;
        assert_eq!(body["message"], "Payload too large");
        assert_eq!(body["code"], "payload too large");
    }
}
