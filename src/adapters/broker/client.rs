//! Brokerage HTTP Client - Authenticated Single-Attempt REST Client
//!
//! Wraps reqwest with bearer-token authentication and response
//! classification into the `PortError` taxonomy. Deliberately performs ONE
//! attempt per call: the trading loop's resilient wrapper owns retries, so
//! stacking another retry layer here would multiply the attempt budget.

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest::{Client, Response, StatusCode};
use serde::Serialize;
use tracing::debug;

use crate::ports::PortError;

use super::types::{AccountDto, AccountsResponse};

/// Environment variable holding the brokerage API token.
pub const TOKEN_ENV_VAR: &str = "BROKER_API_TOKEN";

/// Configuration for the brokerage HTTP client.
#[derive(Debug, Clone)]
pub struct BrokerClientConfig {
    /// Base URL for the brokerage REST API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
}

/// Authenticated HTTP client for the brokerage REST API.
pub struct BrokerClient {
    /// Underlying HTTP client.
    http: Client,
    /// Client configuration.
    config: BrokerClientConfig,
    /// Bearer token, never logged.
    token: String,
}

impl BrokerClient {
    /// Create a new brokerage client with the given token.
    pub fn new(token: String, config: BrokerClientConfig) -> Result<Self> {
        anyhow::ensure!(!token.is_empty(), "brokerage API token is empty");
        let http = Client::builder()
            .timeout(config.timeout)
            .pool_max_idle_per_host(2)
            .build()
            .context("Failed to build HTTP client")?;

        Ok(Self {
            http,
            config,
            token,
        })
    }

    /// Create a client with the token taken from `BROKER_API_TOKEN`.
    pub fn from_env(config: BrokerClientConfig) -> Result<Self> {
        let token = std::env::var(TOKEN_ENV_VAR)
            .with_context(|| format!("{TOKEN_ENV_VAR} not set"))?;
        Self::new(token, config)
    }

    /// Execute a GET request.
    pub async fn get(&self, path: &str) -> Result<Response, PortError> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(path, "GET");
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.token)
            .send()
            .await
            .map_err(|e| PortError::Transport(e.into()))?;
        Self::classify(response, path).await
    }

    /// Execute a POST request with a JSON body.
    pub async fn post<B: Serialize + ?Sized>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<Response, PortError> {
        let url = format!("{}{}", self.config.base_url, path);
        debug!(path, "POST");
        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.token)
            .json(body)
            .send()
            .await
            .map_err(|e| PortError::Transport(e.into()))?;
        Self::classify(response, path).await
    }

    /// List the accounts visible to the token.
    ///
    /// Used at startup both to validate the credential and to pick the
    /// account the loop runs against.
    pub async fn accounts(&self) -> Result<Vec<AccountDto>, PortError> {
        let response = self.get("/accounts").await?;
        let parsed: AccountsResponse = response
            .json()
            .await
            .map_err(|e| PortError::Transport(e.into()))?;
        Ok(parsed.accounts)
    }

    /// Map an HTTP response onto the port error taxonomy.
    async fn classify(response: Response, path: &str) -> Result<Response, PortError> {
        match response.status() {
            status if status.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(PortError::NotFound(path.to_string())),
            StatusCode::BAD_REQUEST | StatusCode::UNPROCESSABLE_ENTITY => {
                let body = response.text().await.unwrap_or_default();
                Err(PortError::Rejected(body))
            }
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(PortError::Transport(anyhow::anyhow!(
                    "API error {status}: {body}"
                )))
            }
        }
    }
}
