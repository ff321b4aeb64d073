//! HTTP client shared by the document-store backends

use std::time::Duration;

use reqwest::{Client, RequestBuilder};
use secrecy::{ExposeSecret, SecretString};
use serde::{de::DeserializeOwned, Serialize};
use tracing::{debug, error};

use crate::errors::WizardError;

/// API key sent as a query parameter, e.g. `?key=...`
#[derive(Debug, Clone)]
pub struct ApiKey {
    pub name: &'static str,
    pub value: SecretString,
}

/// JSON-over-HTTP client for a single backend base URL
pub struct HttpClient {
    client: Client,
    base_url: String,
    api_key: Option<ApiKey>,
}

impl HttpClient {
    /// Create a new HTTP client
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, WizardError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: None,
        })
    }

    /// Create a new HTTP client that authenticates every request
    pub fn with_api_key(base_url: &str, timeout: Duration, api_key: ApiKey) -> Result<Self, WizardError> {
        let mut client = Self::new(base_url, timeout)?;
        client.api_key = Some(api_key);
        Ok(client)
    }

    fn authenticate(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.api_key {
            Some(ApiKey { name, value }) => request.query(&[(*name, value.expose_secret())]),
            None => request,
        }
    }

    /// Make a POST request with a JSON body
    pub async fn post<T: DeserializeOwned, B: Serialize>(&self, path: &str, body: &B) -> Result<T, WizardError> {
        let url = format!("{}{}", self.base_url, path);
        debug!("POST {}", url);

        let request = self.authenticate(self.client.post(&url).json(body));
        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            error!("HTTP POST failed: {} - {}", status, body);
            return Err(WizardError::HttpStatus {
                status: status.as_u16(),
                body,
            });
        }

        let body = response.json().await?;
        Ok(body)
    }
}
