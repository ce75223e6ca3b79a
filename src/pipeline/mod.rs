//! The debounced query pipeline.
//!
//! [`SearchPipeline`] is the stateful core of the search screen: it consumes
//! raw text edits and selection events and produces four observable outputs
//! for a presentation layer to render.
//!
//! Inputs (push):
//!
//! - [`SearchPipeline::set_query_text`] on every keystroke/edit
//! - [`SearchPipeline::select_item`] when the user picks a result
//!
//! Outputs (subscribe):
//!
//! - [`SearchPipeline::results`] - latest settled article list
//! - [`SearchPipeline::is_loading`] - whether a request is in flight
//! - [`SearchPipeline::errors`] - fire-once failure notifications
//! - [`SearchPipeline::navigations`] - fire-once navigation signals
//!
//! Edits are debounced, duplicate queries are suppressed, and each forwarded
//! query supersedes any still-pending request: forwarded queries are tagged
//! with a monotonically increasing sequence number, and a completion whose
//! sequence is no longer current is dropped without touching any output.
//! The last forwarded query wins regardless of network completion order.
//!
//! All output mutation happens on one worker task, so observers never see
//! interleaved partial updates. Dropping the pipeline tears the worker down
//! and stops all emissions.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_stream::wrappers::{BroadcastStream, WatchStream};
use tracing::{debug, warn};
use url::Url;

use crate::config::Config;
use crate::models::Article;
use crate::sources::{ArticleSource, SearchError};

/// Capacity of the fire-once output channels. A slow observer loses old
/// emissions rather than blocking the worker.
const EVENT_CHANNEL_CAPACITY: usize = 16;

/// Input events pushed by the presentation layer.
#[derive(Debug)]
enum Input {
    QueryChanged(String),
    ItemSelected(Article),
}

/// Outcome of one spawned search request, tagged with its sequence number.
#[derive(Debug)]
struct Settled {
    seq: u64,
    outcome: Result<Vec<Article>, SearchError>,
}

/// Reactive controller turning text edits into debounced, de-duplicated,
/// cancelable search requests.
///
/// One instance per screen session; state is discarded on drop.
#[derive(Debug)]
pub struct SearchPipeline {
    input_tx: mpsc::UnboundedSender<Input>,
    results_rx: watch::Receiver<Vec<Article>>,
    loading_rx: watch::Receiver<bool>,
    error_tx: broadcast::Sender<SearchError>,
    nav_tx: broadcast::Sender<Url>,
    worker: JoinHandle<()>,
}

impl SearchPipeline {
    /// Create a pipeline over `source` with default settings.
    pub fn new(source: Arc<dyn ArticleSource>) -> Self {
        Self::with_config(source, &Config::default())
    }

    /// Create a pipeline with explicit configuration.
    pub fn with_config(source: Arc<dyn ArticleSource>, config: &Config) -> Self {
        let (input_tx, input_rx) = mpsc::unbounded_channel();
        let (results_tx, results_rx) = watch::channel(Vec::new());
        let (loading_tx, loading_rx) = watch::channel(false);
        let (error_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        let (nav_tx, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);

        let worker = Worker {
            source,
            debounce: Duration::from_millis(config.pipeline.debounce_ms),
            results_tx,
            loading_tx,
            error_tx: error_tx.clone(),
            nav_tx: nav_tx.clone(),
            pending: None,
            deadline: None,
            last_forwarded: None,
            seq: 0,
            current_seq: 0,
        };

        Self {
            input_tx,
            results_rx,
            loading_rx,
            error_tx,
            nav_tx,
            worker: tokio::spawn(worker.run(input_rx)),
        }
    }

    /// Push a text edit. Call on every keystroke; the pipeline debounces.
    pub fn set_query_text(&self, text: impl Into<String>) {
        let _ = self.input_tx.send(Input::QueryChanged(text.into()));
    }

    /// Push a selection. A parseable article URL becomes a navigation
    /// signal; an unparseable one is dropped silently.
    pub fn select_item(&self, article: &Article) {
        let _ = self.input_tx.send(Input::ItemSelected(article.clone()));
    }

    /// Latest settled result list.
    pub fn results(&self) -> watch::Receiver<Vec<Article>> {
        self.results_rx.clone()
    }

    /// Whether a request is in flight for the latest forwarded query.
    ///
    /// Observers only see real transitions; re-sends of the same value are
    /// suppressed.
    pub fn is_loading(&self) -> watch::Receiver<bool> {
        self.loading_rx.clone()
    }

    /// Fire-once failure notifications, one per failed search.
    ///
    /// Emissions are not retained: a receiver only sees failures that happen
    /// after it subscribed.
    pub fn errors(&self) -> broadcast::Receiver<SearchError> {
        self.error_tx.subscribe()
    }

    /// Fire-once navigation signals derived from selections.
    pub fn navigations(&self) -> broadcast::Receiver<Url> {
        self.nav_tx.subscribe()
    }

    /// [`Self::results`] as a stream. Yields the current value first.
    pub fn result_stream(&self) -> WatchStream<Vec<Article>> {
        WatchStream::new(self.results_rx.clone())
    }

    /// [`Self::is_loading`] as a stream. Yields the current value first.
    pub fn loading_stream(&self) -> WatchStream<bool> {
        WatchStream::new(self.loading_rx.clone())
    }

    /// [`Self::errors`] as a stream.
    pub fn error_stream(&self) -> BroadcastStream<SearchError> {
        BroadcastStream::new(self.error_tx.subscribe())
    }

    /// [`Self::navigations`] as a stream.
    pub fn navigation_stream(&self) -> BroadcastStream<Url> {
        BroadcastStream::new(self.nav_tx.subscribe())
    }
}

impl Drop for SearchPipeline {
    fn drop(&mut self) {
        // No output may reach a disposed observer once the owner is gone.
        self.worker.abort();
    }
}

/// Worker state. Lives on its own task; the only out-of-line work is the
/// network call, whose outcome is marshaled back with its sequence tag.
struct Worker {
    source: Arc<dyn ArticleSource>,
    debounce: Duration,
    results_tx: watch::Sender<Vec<Article>>,
    loading_tx: watch::Sender<bool>,
    error_tx: broadcast::Sender<SearchError>,
    nav_tx: broadcast::Sender<Url>,
    /// Text waiting out the debounce quiet period
    pending: Option<String>,
    /// Absolute deadline at which `pending` becomes a candidate
    deadline: Option<Instant>,
    /// Last query that passed duplicate suppression
    last_forwarded: Option<String>,
    /// Monotonically increasing request sequence
    seq: u64,
    /// Sequence of the query whose outcome may still update state
    current_seq: u64,
}

impl Worker {
    async fn run(mut self, mut input_rx: mpsc::UnboundedReceiver<Input>) {
        let (settled_tx, mut settled_rx) = mpsc::unbounded_channel::<Settled>();

        loop {
            let deadline = self.deadline;
            tokio::select! {
                input = input_rx.recv() => match input {
                    Some(Input::QueryChanged(text)) => {
                        // Every edit re-arms the quiet period.
                        self.pending = Some(text);
                        self.deadline = Some(Instant::now() + self.debounce);
                    }
                    Some(Input::ItemSelected(article)) => self.select(&article),
                    // Owner dropped the pipeline.
                    None => break,
                },
                _ = async {
                    match deadline {
                        Some(at) => tokio::time::sleep_until(at).await,
                        None => std::future::pending::<()>().await,
                    }
                }, if deadline.is_some() => {
                    self.deadline = None;
                    if let Some(text) = self.pending.take() {
                        self.forward(text, &settled_tx);
                    }
                }
                Some(settled) = settled_rx.recv() => self.settle(settled),
            }
        }
    }

    /// Advance a debounced candidate through duplicate suppression and, if
    /// it survives, start a request for it.
    fn forward(&mut self, text: String, settled_tx: &mpsc::UnboundedSender<Settled>) {
        if self.last_forwarded.as_deref() == Some(text.as_str()) {
            debug!(query = %text, "duplicate query suppressed");
            return;
        }
        self.last_forwarded = Some(text.clone());

        // Any in-flight request is superseded from this point on.
        self.seq += 1;
        self.current_seq = self.seq;

        if text.is_empty() {
            // Cleared input settles immediately; loading must not flicker.
            self.results_tx.send_replace(Vec::new());
            self.set_loading(false);
            return;
        }

        debug!(query = %text, seq = self.seq, source = self.source.name(), "starting search");
        self.set_loading(true);

        let source = Arc::clone(&self.source);
        let settled_tx = settled_tx.clone();
        let seq = self.seq;
        tokio::spawn(async move {
            let outcome = source.search(&text).await;
            // The worker may already be gone; a failed send is fine.
            let _ = settled_tx.send(Settled { seq, outcome });
        });
    }

    /// Apply a settled request, unless a newer query superseded it.
    fn settle(&mut self, settled: Settled) {
        if settled.seq != self.current_seq {
            debug!(
                seq = settled.seq,
                current = self.current_seq,
                "stale response dropped"
            );
            return;
        }

        self.set_loading(false);
        match settled.outcome {
            Ok(articles) => {
                self.results_tx.send_replace(articles);
            }
            Err(err) => {
                warn!(error = %err, source = self.source.name(), "search failed");
                let _ = self.error_tx.send(err);
                // Clear results so the UI never shows stale rows next to an
                // error.
                self.results_tx.send_replace(Vec::new());
            }
        }
    }

    fn select(&self, article: &Article) {
        match Url::parse(&article.url) {
            Ok(url) => {
                let _ = self.nav_tx.send(url);
            }
            Err(err) => {
                debug!(url = %article.url, error = %err, "unparseable article URL ignored");
            }
        }
    }

    fn set_loading(&self, loading: bool) {
        self.loading_tx.send_if_modified(|value| {
            if *value == loading {
                false
            } else {
                *value = loading;
                true
            }
        });
    }
}
