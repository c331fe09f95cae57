//! Client for the random.org integers API.
//!
//! The API answers a plain HTTP GET with newline-separated integers as
//! `text/plain`. Request construction, transport, and payload parsing all
//! live here; the rest of the service only ever sees [`IntegerSource`].

use super::IntegerSource;
use crate::server::config::ServerConfig;
use crate::server::error::{Error, Result};
use async_trait::async_trait;
use core::time::Duration;
use reqwest::header::CONTENT_TYPE;
use stddev_core::types::Integer;
use url::Url;

/// Fixed query parameters the integers API expects for a single-column,
/// base-10, plain-text response drawn from a fresh randomization.
const FIXED_QUERY: [(&str, &str); 4] = [
    ("col", "1"),
    ("base", "10"),
    ("format", "plain"),
    ("rnd", "new"),
];

/// Production [`IntegerSource`] backed by the random.org integers API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Debug, Clone)]
pub struct RandomOrgSource {
    client: reqwest::Client,
    base_url: Url,
    min: i64,
    max: i64,
}

impl RandomOrgSource {
    /// Creates a source from the service configuration.
    ///
    /// The underlying HTTP client enforces the configured per-draw timeout.
    /// No retries are attempted at this layer.
    pub fn new(config: &ServerConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.source_timeout_secs))
            .build()
            .map_err(|e| Error::RequestInit {
                context: e.to_string(),
            })?;

        Ok(Self {
            client,
            base_url: config.source_url.clone(),
            min: config.source_min,
            max: config.source_max,
        })
    }

    /// Builds the request URL for one `quantity`-sized draw.
    fn request_url(&self, quantity: usize) -> Url {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.clear();
            for (key, value) in FIXED_QUERY {
                query.append_pair(key, value);
            }
            query.append_pair("min", &self.min.to_string());
            query.append_pair("max", &self.max.to_string());
            query.append_pair("num", &quantity.to_string());
        }
        url
    }
}

#[async_trait]
impl IntegerSource for RandomOrgSource {
    async fn integers(&self, quantity: usize) -> Result<Vec<Integer>> {
        let response = self.client.get(self.request_url(quantity)).send().await?;

        let status = response.status();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .unwrap_or_default()
            .to_owned();
        // The body is read before the status check so a failure response can
        // be reported with its payload.
        let body = response.text().await?;

        if !status.is_success() {
            return Err(Error::Status { status, body });
        }

        if !valid_content_type(&content_type) {
            return Err(Error::ContentType(content_type));
        }

        parse_integers(&body)
    }
}

/// Parses a plain-text payload of newline-separated integers.
///
/// Lines are trimmed and blank lines skipped; any other unparsable line
/// fails the whole payload.
fn parse_integers(body: &str) -> Result<Vec<Integer>> {
    let mut integers = Vec::new();
    for line in body.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value = line.parse::<Integer>().map_err(|_| Error::ParseInteger {
            line: line.to_owned(),
        })?;
        integers.push(value);
    }
    Ok(integers)
}

/// The integers API serves `text/plain`; parameters after `;` are ignored.
fn valid_content_type(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|main| main.trim() == "text/plain")
}
