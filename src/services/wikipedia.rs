//! Wikipedia summaries over the MediaWiki action API
//!
//! A lookup is two requests: a full-text search for the best matching
//! title, then a plain-text extract of that page's intro limited to a
//! number of sentences.

use super::LookupService;
use crate::{MedibotError, Result};
use reqwest::blocking::Client;
use serde::Deserialize;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Why a lookup produced no summary
#[derive(Error, Debug)]
pub enum LookupError {
    #[error("nothing to look up")]
    EmptyQuery,

    #[error("no page found for {0:?}")]
    NotFound(String),

    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct WikipediaConfig {
    /// MediaWiki action API endpoint
    pub endpoint: String,

    /// Per-request timeout in seconds
    pub timeout_secs: u64,

    pub user_agent: String,
}

impl Default for WikipediaConfig {
    fn default() -> Self {
        Self {
            endpoint: "https://en.wikipedia.org/w/api.php".to_string(),
            timeout_secs: 10,
            user_agent: concat!("medibot/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    query: SearchQuery,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    search: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
struct SearchHit {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ExtractResponse {
    query: ExtractQuery,
}

#[derive(Debug, Deserialize)]
struct ExtractQuery {
    pages: HashMap<String, ExtractPage>,
}

#[derive(Debug, Deserialize)]
struct ExtractPage {
    #[serde(default)]
    extract: Option<String>,
}

/// Title of the best search hit, if any
fn parse_search(body: &str) -> std::result::Result<Option<String>, LookupError> {
    let response: SearchResponse = serde_json::from_str(body)?;
    Ok(response.query.search.into_iter().next().map(|hit| hit.title))
}

/// First non-empty extract in an extracts response
fn parse_extract(body: &str) -> std::result::Result<Option<String>, LookupError> {
    let response: ExtractResponse = serde_json::from_str(body)?;
    Ok(response
        .query
        .pages
        .into_values()
        .filter_map(|page| page.extract)
        .map(|extract| extract.trim().to_string())
        .find(|extract| !extract.is_empty()))
}

/// Blocking Wikipedia client
pub struct WikipediaClient {
    client: Client,
    config: WikipediaConfig,
}

impl WikipediaClient {
    pub fn new(config: WikipediaConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent.clone())
            .build()
            .map_err(|e| MedibotError::ConfigError(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    fn get(&self, params: &[(&str, &str)]) -> std::result::Result<String, LookupError> {
        let body = self
            .client
            .get(&self.config.endpoint)
            .query(&[("action", "query"), ("format", "json")])
            .query(params)
            .send()?
            .error_for_status()?
            .text()?;
        Ok(body)
    }

    fn best_title(&self, query: &str) -> std::result::Result<String, LookupError> {
        let body = self.get(&[("list", "search"), ("srsearch", query), ("srlimit", "1")])?;
        parse_search(&body)?.ok_or_else(|| LookupError::NotFound(query.to_string()))
    }
}

impl LookupService for WikipediaClient {
    fn summarize(&self, query: &str, max_sentences: usize) -> std::result::Result<String, LookupError> {
        let query = query.trim();
        if query.is_empty() {
            return Err(LookupError::EmptyQuery);
        }

        let title = self.best_title(query)?;
        debug!("Best Wikipedia match for {:?}: {:?}", query, title);

        let sentences = max_sentences.max(1).to_string();
        let body = self.get(&[
            ("prop", "extracts"),
            ("exintro", "1"),
            ("explaintext", "1"),
            ("redirects", "1"),
            ("exsentences", sentences.as_str()),
            ("titles", title.as_str()),
        ])?;

        parse_extract(&body)?.ok_or(LookupError::NotFound(title))
    }
}
