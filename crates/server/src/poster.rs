//! Poster lookup collaborator.
//!
//! Poster images come from an external service (OMDb by default). The
//! collaborator is modelled as a trait so the service can be tested without
//! the network. The contract is strict: one attempt, a bounded timeout, and
//! every failure mode — transport error, non-success status, missing or
//! `"N/A"` poster — degrades to the [`POSTER_PLACEHOLDER`] sentinel. Nothing
//! ever propagates past this boundary.

use async_trait::async_trait;
use pipeline::features::clean_text;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, warn};

/// Sentinel returned when no poster could be resolved. The front-end renders
/// its own placeholder art when it sees this value.
pub const POSTER_PLACEHOLDER: &str = "placeholder";

/// Demo API key shipped with the original deployment.
pub const DEFAULT_OMDB_API_KEY: &str = "thewdb";

const OMDB_ENDPOINT: &str = "http://www.omdbapi.com/";
const LOOKUP_TIMEOUT: Duration = Duration::from_secs(6);

/// External poster lookup seam.
#[async_trait]
pub trait PosterProvider: Send + Sync {
    /// Resolve a poster URL for `(title, release_date)`.
    ///
    /// Infallible by contract: implementations must map every internal
    /// failure to [`POSTER_PLACEHOLDER`].
    async fn poster_url(&self, title: &str, release_date: Option<&str>) -> String;
}

/// OMDb-backed poster provider.
pub struct OmdbPosterProvider {
    http: reqwest::Client,
    endpoint: String,
    api_key: String,
}

#[derive(Debug, Deserialize)]
struct OmdbResponse {
    #[serde(rename = "Poster")]
    poster: Option<String>,
}

impl OmdbPosterProvider {
    pub fn new(api_key: impl Into<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(LOOKUP_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            endpoint: OMDB_ENDPOINT.to_string(),
            api_key: api_key.into(),
        })
    }

    /// Point the provider at a different endpoint (tests).
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    async fn fetch(&self, title: &str, release_date: Option<&str>) -> anyhow::Result<Option<String>> {
        // OMDb matches better on a punctuation-free title; the year narrows
        // remakes down.
        let query_title = clean_text(title);
        // `get` rejects a slice that would split a character, so an unusual
        // date just loses its year instead of panicking.
        let year = release_date.and_then(|d| d.get(..4)).unwrap_or("");

        let response = self
            .http
            .get(&self.endpoint)
            .query(&[
                ("t", query_title.as_str()),
                ("y", year),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            anyhow::bail!("poster service returned status {}", response.status());
        }

        let body: OmdbResponse = response.json().await?;
        Ok(body.poster.filter(|p| p != "N/A"))
    }
}

#[async_trait]
impl PosterProvider for OmdbPosterProvider {
    async fn poster_url(&self, title: &str, release_date: Option<&str>) -> String {
        // Single attempt; on any failure the sentinel goes out instead.
        match self.fetch(title, release_date).await {
            Ok(Some(url)) => url,
            Ok(None) => {
                debug!(title, "no poster available");
                POSTER_PLACEHOLDER.to_string()
            }
            Err(err) => {
                warn!(title, error = %err, "poster lookup failed");
                POSTER_PLACEHOLDER.to_string()
            }
        }
    }
}
