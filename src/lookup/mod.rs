use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::StatusCode;
use thiserror::Error;

pub use apod::ApodClient;
pub use flow::LookupFlow;
pub use relay::RelayClient;

use crate::models::{ApodPayload, Query};
use crate::request::HttpError;

mod apod;
pub mod flow;
mod relay;

pub const GENERIC_FAILURE: &str = "Failed to retrieve data. Please try again.";
pub const IMAGE_FAILURE: &str = "Failed to load the image";

#[derive(Error, Debug)]
pub enum LookupError {
    #[error("Please pick a date first")]
    EmptyInput,
    #[error("{0:?} is not a date in YYYY-MM-DD format")]
    InvalidDate(String),
    #[error("{0} is in the future")]
    FutureDate(NaiveDate),
    #[error("Could not reach the key relay")]
    RelayUnreachable(#[source] HttpError),
    #[error("Key relay answered with {0}")]
    RelayRejected(StatusCode),
    #[error("APOD answered with {0}")]
    UpstreamHttp(StatusCode),
    #[error("Could not reach APOD")]
    UpstreamNetwork(#[source] reqwest::Error),
    #[error("APOD returned an unexpected body")]
    MalformedPayload(#[source] HttpError),
    #[error("Failed to load image from {url}: {reason}")]
    ImageDecode { url: String, reason: String },
}

impl LookupError {
    /// Input errors never leave the date picker, everything else ends the lookup
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            LookupError::EmptyInput | LookupError::InvalidDate(_) | LookupError::FutureDate(_)
        )
    }

    /// What the user gets to see. The details only go to the logs
    pub fn user_message(&self) -> &'static str {
        match self {
            LookupError::ImageDecode { .. } => IMAGE_FAILURE,
            _ => GENERIC_FAILURE,
        }
    }
}

/// Hands out the api key needed to talk to NASA
#[async_trait]
pub trait KeyRelay: Send + Sync {
    async fn api_key(&self) -> Result<String, LookupError>;
}

/// Source of astronomy picture entries
#[async_trait]
pub trait ApodSource: Send + Sync {
    async fn fetch(&self, api_key: &str, query: &Query) -> Result<ApodPayload, LookupError>;
}
