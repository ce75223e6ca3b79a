//! # Qiita Search
//!
//! The core of a single-screen article search client: a debounced,
//! de-duplicated, cancelable query pipeline over the Qiita article API.
//!
//! ## Architecture
//!
//! The library is organized into several modules:
//!
//! - [`models`]: Core data structures (Article, User)
//! - [`sources`]: Search backends behind the [`ArticleSource`] trait
//! - [`pipeline`]: The reactive query pipeline
//! - [`config`]: Configuration management
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use qiita_search::{QiitaSource, SearchPipeline};
//!
//! # #[tokio::main]
//! # async fn main() {
//! let pipeline = SearchPipeline::new(Arc::new(QiitaSource::new()));
//! let mut results = pipeline.results();
//!
//! pipeline.set_query_text("rust");
//! results.changed().await.unwrap();
//! println!("{} articles", results.borrow().len());
//! # }
//! ```

pub mod config;
pub mod models;
pub mod pipeline;
pub mod sources;

// Re-export commonly used types
pub use models::{Article, User};
pub use pipeline::SearchPipeline;
pub use sources::{ArticleSource, QiitaSource, SearchError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
