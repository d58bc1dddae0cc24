use async_trait::async_trait;
use log::{debug, error};
use reqwest::Client;
use url::Url;

use crate::models::{KeyResponse, KEY_ROUTE};
use crate::request::{parse_successful_response, HttpError};

use super::{KeyRelay, LookupError};

/// Asks the same-origin relay for the NASA key. The key is requested
/// again for every lookup and never kept around
pub struct RelayClient {
    client: Client,
    endpoint: Url,
}

impl RelayClient {
    /// The route is resolved below the relay url, so a relay mounted under a
    /// path prefix keeps it
    pub fn new(client: Client, relay_url: &Url) -> Result<Self, url::ParseError> {
        let mut base = relay_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        Ok(Self {
            client,
            endpoint: base.join(KEY_ROUTE.trim_start_matches('/'))?,
        })
    }
}

#[async_trait]
impl KeyRelay for RelayClient {
    async fn api_key(&self) -> Result<String, LookupError> {
        debug!("Requesting api key from {}", self.endpoint);
        let response = self
            .client
            .get(self.endpoint.clone())
            .send()
            .await
            .map_err(|err| LookupError::RelayUnreachable(HttpError::ReqwestError(err)))?;
        match parse_successful_response::<KeyResponse>(response).await {
            Ok(KeyResponse { api_key }) => Ok(api_key),
            Err(HttpError::FailStatus(ctx)) => {
                error!("Key relay refused with {}: {}", ctx.code, ctx.body);
                Err(LookupError::RelayRejected(ctx.code))
            }
            Err(other) => Err(LookupError::RelayUnreachable(other)),
        }
    }
}
