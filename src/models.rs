use std::fmt::Display;

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::lookup::LookupError;

pub const DEFAULT_TITLE: &str = "NASA Astronomy Picture";

pub const KEY_ROUTE: &str = "/api/nasa-key";

/// Body served by the relay on [`KEY_ROUTE`]
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct KeyResponse {
    pub api_key: String,
}

/// A single day to look up. APOD only publishes one entry per day so
/// nothing finer than a date is ever needed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Query {
    date: NaiveDate,
}

impl Query {
    /// Validates raw user input against `today`
    pub fn parse(input: &str, today: NaiveDate) -> Result<Self, LookupError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(LookupError::EmptyInput);
        }
        let date = NaiveDate::parse_from_str(input, "%Y-%m-%d")
            .map_err(|_| LookupError::InvalidDate(input.to_owned()))?;
        if date > today {
            return Err(LookupError::FutureDate(date));
        }
        Ok(Self { date })
    }

    pub fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.date.format("%Y-%m-%d"))
    }
}

/// NASA publishes in US time but the picker has always used the UTC date
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Image,
    Video,
    #[serde(other)]
    Other,
}

/// Everything is optional, the API drops fields freely depending on the
/// kind of media published that day
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApodPayload {
    pub title: Option<String>,
    pub explanation: Option<String>,
    pub media_type: Option<MediaType>,
    pub hdurl: Option<String>,
    pub url: Option<String>,
    pub date: Option<String>,
    pub copyright: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LookupResult {
    Image {
        url: String,
        title: String,
        explanation: Option<String>,
    },
    NoImage {
        title: String,
        explanation: Option<String>,
    },
    Error {
        message: String,
    },
}

impl ApodPayload {
    /// Only high resolution images are displayed, videos and entries without
    /// an `hdurl` fall back to the placeholder
    pub fn classify(self) -> LookupResult {
        let title = self
            .title
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_owned());
        let explanation = self.explanation.filter(|text| !text.is_empty());
        match (self.media_type, self.hdurl) {
            (Some(MediaType::Image), Some(url)) if !url.is_empty() => LookupResult::Image {
                url,
                title,
                explanation,
            },
            _ => LookupResult::NoImage { title, explanation },
        }
    }
}

impl From<&LookupError> for LookupResult {
    fn from(err: &LookupError) -> Self {
        LookupResult::Error {
            message: err.user_message().to_owned(),
        }
    }
}
