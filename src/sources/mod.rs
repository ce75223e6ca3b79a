//! Article search sources.
//!
//! This module defines the [`ArticleSource`] trait, the seam between the
//! query pipeline and the network. The pipeline only ever talks to a
//! `dyn ArticleSource`, so tests swap the real [`QiitaSource`] for the
//! scripted [`MockSource`] without touching pipeline code.

mod qiita;

pub mod mock;

pub use mock::MockSource;
pub use qiita::QiitaSource;

use crate::models::Article;
use async_trait::async_trait;

/// A backend that can search for articles.
#[async_trait]
pub trait ArticleSource: Send + Sync + std::fmt::Debug {
    /// Human-readable name of this source (used in logs)
    fn name(&self) -> &str;

    /// Search for articles whose title matches the query.
    ///
    /// An empty query succeeds with an empty list without touching the
    /// network.
    async fn search(&self, query: &str) -> Result<Vec<Article>, SearchError>;
}

/// Errors that can occur when searching a source.
///
/// Causes are carried as strings so the error stays `Clone` and can travel
/// through broadcast channels to every observer.
#[derive(Debug, Clone, thiserror::Error)]
pub enum SearchError {
    /// The request URL could not be constructed
    #[error("invalid search request: {0}")]
    InvalidRequest(String),

    /// Network or HTTP error
    #[error("network error: {0}")]
    Transport(String),

    /// The response body did not match the expected shape
    #[error("failed to decode response: {0}")]
    Decoding(String),
}

impl From<reqwest::Error> for SearchError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            SearchError::Decoding(err.to_string())
        } else {
            SearchError::Transport(err.to_string())
        }
    }
}

impl From<serde_json::Error> for SearchError {
    fn from(err: serde_json::Error) -> Self {
        SearchError::Decoding(err.to_string())
    }
}
