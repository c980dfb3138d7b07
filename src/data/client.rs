//! TheSportsDB API client
//!
//! Fetches the league catalogue and season badges. The client performs no
//! caching of its own; `SportsService` layers the cache and request coalescing
//! on top of any `SportsApi`.

use reqwest::Client;
use std::future::Future;
use thiserror::Error;

use super::{League, LeaguesResponse, SeasonsResponse};
use crate::config::ApiConfig;

/// Errors that can occur when talking to the sports API
#[derive(Debug, Error)]
pub enum SportsApiError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    /// Failed to parse JSON response
    #[error("Failed to parse JSON response: {0}")]
    ParseError(#[from] serde_json::Error),

    /// Server answered with a non-success status
    #[error("Unexpected HTTP status: {0}")]
    UnexpectedStatus(u16),
}

/// Read-only access to the remote league data
pub trait SportsApi: Send + Sync + 'static {
    /// Fetches every league, normalizing a null list to empty
    fn list_leagues(&self) -> impl Future<Output = Result<Vec<League>, SportsApiError>> + Send;

    /// Fetches the badge URL of a league's most recent badge-bearing season
    fn season_badge(
        &self,
        league_id: &str,
    ) -> impl Future<Output = Result<Option<String>, SportsApiError>> + Send;
}

/// `SportsApi` over HTTP
#[derive(Debug, Clone)]
pub struct HttpSportsApi {
    http_client: Client,
    config: ApiConfig,
}

impl Default for HttpSportsApi {
    fn default() -> Self {
        Self::new(ApiConfig::default())
    }
}

impl HttpSportsApi {
    pub fn new(config: ApiConfig) -> Self {
        Self::with_client(Client::new(), config)
    }

    /// Create a client with a custom HTTP client (e.g., one with a timeout)
    pub fn with_client(http_client: Client, config: ApiConfig) -> Self {
        Self {
            http_client,
            config,
        }
    }

    pub fn config(&self) -> &ApiConfig {
        &self.config
    }

    async fn get_text(&self, request: reqwest::RequestBuilder) -> Result<String, SportsApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(SportsApiError::UnexpectedStatus(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}

impl SportsApi for HttpSportsApi {
    fn list_leagues(&self) -> impl Future<Output = Result<Vec<League>, SportsApiError>> + Send {
        async move {
            let url = self.config.leagues_url();
            tracing::debug!(%url, "fetching leagues");

            let text = self.get_text(self.http_client.get(&url)).await?;
            let response: LeaguesResponse = serde_json::from_str(&text)?;
            Ok(response.into_leagues())
        }
    }

    fn season_badge(
        &self,
        league_id: &str,
    ) -> impl Future<Output = Result<Option<String>, SportsApiError>> + Send {
        async move {
            let url = self.config.seasons_url();
            tracing::debug!(%url, league_id, "fetching season badge");

            let request = self
                .http_client
                .get(&url)
                .query(&[("badge", "1"), ("id", league_id)]);
            let text = self.get_text(request).await?;
            let response: SeasonsResponse = serde_json::from_str(&text)?;
            Ok(response.first_badge())
        }
    }
}
