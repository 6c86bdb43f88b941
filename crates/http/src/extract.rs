//! Request extractors with catalog error semantics.

use axum::{
    body::Bytes,
    extract::{FromRequest, Request},
};
use serde::de::DeserializeOwned;

use crate::error::AppError;

/// JSON request body decoded with `serde_json`.
///
/// Unlike `axum::Json` this does not require a `Content-Type` header, and
/// every failure (unreadable body, syntax error, wrong field type) becomes
/// [`AppError::MalformedInput`] carrying the decoder's message.
///
/// That includes bodies over axum's default 2 MiB limit: they are answered
/// with `400 malformed_input`, not `413 Payload Too Large`.
#[derive(Debug, Clone)]
pub struct JsonBody<T>(pub T);

impl<T, S> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rejection| AppError::malformed_input(rejection.body_text()))?;

        serde_json::from_slice(&bytes)
            .map(JsonBody)
            .map_err(|err| AppError::malformed_input(err.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Payload {
        name: String,
    }

    fn request(body: &'static str) -> Request {
        axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap()
    }

    #[tokio::test]
    async fn decodes_without_content_type() {
        let JsonBody(payload) = JsonBody::<Payload>::from_request(request(r#"{"name":"x"}"#), &())
            .await
            .unwrap();
        assert_eq!(payload.name, "x");
    }

    #[tokio::test]
    async fn syntax_error_is_malformed_input() {
        let err = JsonBody::<Payload>::from_request(request("{not json"), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedInput { .. }));
    }

    #[tokio::test]
    async fn empty_body_is_malformed_input() {
        let err = JsonBody::<Payload>::from_request(request(""), &())
            .await
            .unwrap_err();
        match err {
            AppError::MalformedInput { message } => assert!(message.contains("EOF")),
            other => panic!("expected malformed input, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn oversized_body_is_malformed_input() {
        let body = format!(r#"{{"name":"{}"}}"#, "x".repeat(3 * 1024 * 1024));
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .body(Body::from(body))
            .unwrap();

        let err = JsonBody::<Payload>::from_request(req, &()).await.unwrap_err();
        assert!(matches!(err, AppError::MalformedInput { .. }));
        assert_eq!(err.status(), axum::http::StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn type_mismatch_is_malformed_input() {
        let err = JsonBody::<Payload>::from_request(request(r#"{"name":7}"#), &())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::MalformedInput { .. }));
    }
}
