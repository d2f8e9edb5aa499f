use axum::{
    body::Bytes,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
};
use serde::{Deserialize, de::DeserializeOwned};

use crate::application::validation::Submitted;
use crate::presentation::http::envelope::ApiError;

/// JSON body extractor whose failures render as the envelope.
///
/// An empty body reads as `{}` so endpoints can report missing fields themselves.
pub struct JsonBody<T>(pub T);

#[axum::async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|rej| {
                tracing::debug!(status = %rej.status(), reason = %rej.body_text(), "body_rejected");
                ApiError::BodyRejected(rej.status())
            })?;
        let raw: &[u8] = if bytes.iter().all(u8::is_ascii_whitespace) {
            b"{}"
        } else {
            &bytes
        };
        serde_json::from_slice(raw)
            .map(JsonBody)
            .map_err(|e| {
                tracing::debug!(error = %e, "malformed_payload");
                ApiError::MalformedPayload
            })
    }
}

/// Integer id from the `:id` path segment. Anything else is a 404, like an unmatched route.
pub struct Pk(pub i64);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Pk
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|_| ApiError::NotFound("Not found"))?;
        raw.parse::<i64>()
            .map(Pk)
            .map_err(|_| ApiError::NotFound("Not found"))
    }
}

#[derive(Debug, Clone)]
pub enum DoubleOption<T> {
    NotProvided,
    Null,
    Some(T),
}

impl<T> Default for DoubleOption<T> {
    fn default() -> Self {
        DoubleOption::NotProvided
    }
}

impl<T> DoubleOption<T> {
    pub fn into_submitted(self) -> Submitted<T> {
        match self {
            DoubleOption::NotProvided => None,
            DoubleOption::Null => Some(None),
            DoubleOption::Some(v) => Some(Some(v)),
        }
    }
}

pub fn deserialize_double_option<'de, D, T>(deserializer: D) -> Result<DoubleOption<T>, D::Error>
where
    D: serde::Deserializer<'de>,
    T: serde::Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(|opt| match opt {
        None => DoubleOption::Null,
        Some(value) => DoubleOption::Some(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Deserialize)]
    struct Probe {
        #[serde(default, deserialize_with = "deserialize_double_option")]
        title: DoubleOption<String>,
    }

    #[test]
    fn distinguishes_missing_null_and_value() {
        let p: Probe = serde_json::from_str("{}").unwrap();
        assert_eq!(p.title.into_submitted(), None);
        let p: Probe = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(p.title.into_submitted(), Some(None));
        let p: Probe = serde_json::from_str(r#"{"title": "x"}"#).unwrap();
        assert_eq!(p.title.into_submitted(), Some(Some("x".to_string())));
    }
}
