//! Request body extractor accepting JSON or HTML form submissions

use axum::{
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
    Form, Json,
};
use serde::de::DeserializeOwned;
use std::convert::Infallible;

/// Decoded request body
///
/// Never rejects: a missing or undecodable body becomes `T::default()`, so
/// handlers answer with their normal "missing field" outcome.
#[derive(Debug)]
pub struct Payload<T>(pub T);

impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Default + Send,
{
    type Rejection = Infallible;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Some(content_type) = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_ascii_lowercase)
        else {
            return Ok(Payload(T::default()));
        };

        let decoded = if content_type.starts_with("application/x-www-form-urlencoded") {
            Form::<T>::from_request(req, state)
                .await
                .map(|Form(v)| v)
                .map_err(|e| e.body_text())
        } else {
            Json::<T>::from_request(req, state)
                .await
                .map(|Json(v)| v)
                .map_err(|e| e.body_text())
        };

        match decoded {
            Ok(value) => Ok(Payload(value)),
            Err(reason) => {
                tracing::warn!(%content_type, %reason, "Ignoring undecodable request body");
                Ok(Payload(T::default()))
            }
        }
    }
}
