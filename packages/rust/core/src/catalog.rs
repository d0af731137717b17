//! Upstream catalog API client.
//!
//! Every resource is served as one JSON array at `<base_url>/<resource>`.
//! Records are decoded one by one; a record that does not fit its shape is
//! skipped without failing the rest of the listing.

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use holocron_shared::{HolocronError, Result};

use crate::records::FilmRecord;

const USER_AGENT: &str = concat!("holocron/", env!("CARGO_PKG_VERSION"));

/// Fetches full resource listings from the catalog API.
#[derive(Debug, Clone)]
pub struct CatalogClient {
    client: Client,
    base_url: String,
}

impl CatalogClient {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| HolocronError::Network(format!("failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn resource_url(&self, resource: &str) -> String {
        format!("{}/{resource}", self.base_url)
    }

    /// The full film catalog.
    pub async fn fetch_films(&self) -> Result<Vec<FilmRecord>> {
        self.fetch("films").await
    }

    /// Every record of `resource`, in upstream order.
    pub async fn fetch<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>> {
        let url = self.resource_url(resource);
        debug!(%url, "fetching catalog");

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| HolocronError::Network(format!("{url}: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            return Err(HolocronError::Network(format!("{url}: HTTP {status}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| HolocronError::Network(format!("{url}: body read failed: {e}")))?;

        let raw: Vec<Value> = serde_json::from_str(&body)
            .map_err(|e| HolocronError::parse(format!("{url}: {e}")))?;
        let total = raw.len();

        let records: Vec<T> = raw
            .into_iter()
            .enumerate()
            .filter_map(|(index, record)| match serde_json::from_value(record) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(%url, index, error = %e, "skipping malformed catalog record");
                    None
                }
            })
            .collect();
        debug!(%url, count = records.len(), skipped = total - records.len(), "catalog fetched");
        Ok(records)
    }
}
