//! Basic usage example for the article search pipeline.
//!
//! This example plays the role of the presentation layer: it pushes one
//! query into the pipeline, renders the settled results, then selects the
//! first article and prints the navigation URL a UI would open.

use std::sync::Arc;

use qiita_search::{QiitaSource, SearchPipeline};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let query = std::env::args().nth(1).unwrap_or_else(|| "rust".to_string());

    let pipeline = SearchPipeline::new(Arc::new(QiitaSource::new()));
    let mut results = pipeline.results();
    let mut errors = pipeline.errors();
    let mut navigations = pipeline.navigations();

    println!("Searching Qiita for \"{}\"...", query);
    pipeline.set_query_text(&query);

    tokio::select! {
        // A failure also clears results, so check the error channel first.
        biased;
        err = errors.recv() => {
            eprintln!("Search failed: {}", err?);
            return Ok(());
        }
        changed = results.changed() => {
            changed?;
        }
    }

    let articles = results.borrow().clone();
    println!("Found {} articles\n", articles.len());

    for (i, article) in articles.iter().enumerate() {
        println!("{}. {}", i + 1, article.title);
        println!("   by {} ({})", article.user.display_name, article.user.id);
        println!("   {}", article.url);
    }

    if let Some(first) = articles.first() {
        pipeline.select_item(first);
        let url = navigations.recv().await?;
        println!("\nSelecting the first article would open {}", url);
    }

    Ok(())
}
