use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use url::Url;

use crate::models::{ApodPayload, Query};
use crate::request::{parse_successful_response, HttpError};

use super::{ApodSource, LookupError};

pub struct ApodClient {
    client: Client,
    base_url: Url,
}

impl ApodClient {
    pub fn new(client: Client, base_url: Url) -> Self {
        Self { client, base_url }
    }

    pub fn build_url(&self, api_key: &str, query: &Query) -> Url {
        let mut url = self.base_url.clone();
        url.query_pairs_mut()
            .append_pair("api_key", api_key)
            .append_pair("date", &query.to_string());
        url
    }
}

#[async_trait]
impl ApodSource for ApodClient {
    async fn fetch(&self, api_key: &str, query: &Query) -> Result<ApodPayload, LookupError> {
        let url = self.build_url(api_key, query);
        debug!("Fetching APOD entry for {}", query);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(LookupError::UpstreamNetwork)?;
        match parse_successful_response::<ApodPayload>(response).await {
            Ok(payload) => Ok(payload),
            Err(HttpError::FailStatus(ctx)) => {
                error!("APOD answered {} for {}: {}", ctx.code, query, ctx.body);
                Err(LookupError::UpstreamHttp(ctx.code))
            }
            Err(HttpError::ReqwestError(err)) => Err(LookupError::UpstreamNetwork(err)),
            Err(unexpected) => Err(LookupError::MalformedPayload(unexpected)),
        }
    }
}
