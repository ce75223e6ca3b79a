//! Mock source for testing purposes.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::models::{Article, User};
use crate::sources::{ArticleSource, SearchError};

/// A scripted reply for one query.
#[derive(Debug, Clone)]
struct MockReply {
    delay: Duration,
    outcome: Result<Vec<Article>, SearchError>,
}

/// A mock source that returns predefined responses.
///
/// Queries with no scripted reply succeed with an empty list. Replies can
/// carry an artificial delay so tests can exercise out-of-order completion
/// under virtual time.
#[derive(Debug, Default)]
pub struct MockSource {
    replies: Mutex<HashMap<String, MockReply>>,
    calls: Mutex<Vec<String>>,
}

impl MockSource {
    /// Create a new mock source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful reply for `query`.
    pub fn respond_with(&self, query: impl Into<String>, articles: Vec<Article>) {
        self.script(query, Duration::ZERO, Ok(articles));
    }

    /// Script a successful reply delivered after `delay`.
    pub fn respond_after(
        &self,
        query: impl Into<String>,
        delay: Duration,
        articles: Vec<Article>,
    ) {
        self.script(query, delay, Ok(articles));
    }

    /// Script a failure for `query`.
    pub fn fail_with(&self, query: impl Into<String>, error: SearchError) {
        self.script(query, Duration::ZERO, Err(error));
    }

    /// Queries received so far, in call order.
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn script(
        &self,
        query: impl Into<String>,
        delay: Duration,
        outcome: Result<Vec<Article>, SearchError>,
    ) {
        self.replies
            .lock()
            .unwrap()
            .insert(query.into(), MockReply { delay, outcome });
    }
}

#[async_trait]
impl ArticleSource for MockSource {
    fn name(&self) -> &str {
        "Mock Source"
    }

    async fn search(&self, query: &str) -> Result<Vec<Article>, SearchError> {
        self.calls.lock().unwrap().push(query.to_string());

        let reply = self.replies.lock().unwrap().get(query).cloned();
        match reply {
            Some(reply) => {
                if reply.delay > Duration::ZERO {
                    tokio::time::sleep(reply.delay).await;
                }
                reply.outcome
            }
            None => Ok(Vec::new()),
        }
    }
}

/// Helper function to create a mock article for testing.
pub fn make_article(title: &str, url: &str, user_id: &str) -> Article {
    Article::new(
        title,
        url,
        User::new(
            user_id,
            format!("user {}", user_id),
            format!("https://example.com/{}.png", user_id),
        ),
    )
}
