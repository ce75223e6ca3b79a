//! Qiita article search source implementation.

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use crate::config::Config;
use crate::models::Article;
use crate::sources::{ArticleSource, SearchError};

/// Qiita article search source
///
/// Uses the Qiita v2 REST API. Queries are scoped to article titles and a
/// single page of results is fetched per search.
#[derive(Debug, Clone)]
pub struct QiitaSource {
    client: Client,
    base_url: String,
    per_page: usize,
}

impl QiitaSource {
    /// Create a new Qiita source with default settings
    pub fn new() -> Self {
        Self::with_config(&Config::default())
    }

    /// Create a source with explicit configuration
    ///
    /// Tests point `base_url` at a local mock server.
    pub fn with_config(config: &Config) -> Self {
        let client = Client::builder()
            .user_agent(concat!(
                env!("CARGO_PKG_NAME"),
                "/",
                env!("CARGO_PKG_VERSION")
            ))
            .timeout(Duration::from_secs(config.api.timeout_secs))
            .connect_timeout(Duration::from_secs(config.api.connect_timeout_secs))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: config.api.base_url.clone(),
            per_page: config.api.per_page,
        }
    }

    /// Build the search request URL
    fn search_url(&self, query: &str) -> Result<Url, SearchError> {
        let mut url = Url::parse(&format!("{}/items", self.base_url))
            .map_err(|e| SearchError::InvalidRequest(format!("bad endpoint URL: {}", e)))?;

        url.query_pairs_mut()
            .append_pair("query", &format!("title:{}", query))
            .append_pair("per_page", &self.per_page.to_string());

        Ok(url)
    }
}

impl Default for QiitaSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ArticleSource for QiitaSource {
    fn name(&self) -> &str {
        "Qiita"
    }

    async fn search(&self, query: &str) -> Result<Vec<Article>, SearchError> {
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let url = self.search_url(query)?;
        debug!(%url, "searching qiita");

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(SearchError::Transport(format!(
                "qiita returned status {}",
                response.status()
            )));
        }

        // Read the body first so a connection drop mid-body stays Transport
        // and only a shape mismatch becomes Decoding.
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::Transport(format!("failed to read response body: {}", e)))?;

        let articles: Vec<Article> = serde_json::from_str(&body)?;

        Ok(articles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_search_url_parameters() {
        let source = QiitaSource::new();
        let url = source.search_url("rx").unwrap();

        let pairs: Vec<(String, String)> = url
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();

        assert_eq!(url.path(), "/api/v2/items");
        assert!(pairs.contains(&("query".to_string(), "title:rx".to_string())));
        assert!(pairs.contains(&("per_page".to_string(), "20".to_string())));
    }

    #[test]
    fn test_search_url_encodes_query_text() {
        let source = QiitaSource::new();
        let url = source.search_url("async await").unwrap();

        let (_, value) = url
            .query_pairs()
            .find(|(k, _)| k == "query")
            .unwrap();
        assert_eq!(value, "title:async await");
        // The raw string form must not contain an unescaped space.
        assert!(!url.as_str().contains(' '));
    }

    #[tokio::test]
    async fn test_empty_query_short_circuits() {
        // Unroutable base URL: a network call would fail, the short-circuit
        // must not make one.
        let mut config = Config::default();
        config.api.base_url = "http://192.0.2.1/api/v2".to_string();

        let source = QiitaSource::with_config(&config);
        let articles = source.search("").await.unwrap();
        assert!(articles.is_empty());
    }
}
