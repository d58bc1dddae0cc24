use std::convert::Infallible;
use std::env;

use axum::body::{Bytes, Full};
use axum::http::{Response, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use serde_json::json;

pub mod key;

/// Where the relay reads the NASA key from. The value is looked up on every
/// request and never cached
#[derive(Debug, Clone)]
pub enum KeySource {
    Environment(String),
    Fixed(Option<String>),
}

impl KeySource {
    pub fn read(&self) -> Option<String> {
        let value = match self {
            KeySource::Environment(name) => env::var(name).ok(),
            KeySource::Fixed(value) => value.clone(),
        };
        value.filter(|key| !key.trim().is_empty())
    }
}

pub struct Context {
    pub key_source: KeySource,
}

pub enum AppError {
    ConfigMissing,
}

impl IntoResponse for AppError {
    type Body = Full<Bytes>;
    type BodyError = Infallible;

    fn into_response(self) -> Response<Self::Body> {
        let (status, error_message) = match self {
            AppError::ConfigMissing => (
                StatusCode::INTERNAL_SERVER_ERROR,
                "NASA API key not configured".to_owned(),
            ),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
