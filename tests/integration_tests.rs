//! Integration tests for the article search core.
//!
//! These tests drive the Qiita source and the full pipeline against a mock
//! HTTP server.

use std::sync::Arc;
use std::time::Duration;

use qiita_search::config::Config;
use qiita_search::pipeline::SearchPipeline;
use qiita_search::sources::{ArticleSource, QiitaSource, SearchError};

const TWO_ARTICLES: &str = r#"[
    {
        "title": "Getting started with RxSwift",
        "url": "https://example.com/articles/1",
        "user": {
            "id": "alice",
            "name": "Alice",
            "profile_image_url": "https://example.com/alice.png"
        }
    },
    {
        "title": "Reactive pipelines in practice",
        "url": "https://example.com/articles/2",
        "user": {
            "id": "bob",
            "name": "Bob",
            "profile_image_url": "https://example.com/bob.png"
        }
    }
]"#;

fn test_config(base_url: &str) -> Config {
    let mut config = Config::default();
    config.api.base_url = base_url.to_string();
    // Short quiet period keeps real-time tests quick.
    config.pipeline.debounce_ms = 50;
    config
}

fn search_mock(server: &mut mockito::Server, query: &str) -> mockito::Mock {
    server
        .mock("GET", "/items")
        .match_query(mockito::Matcher::AllOf(vec![
            mockito::Matcher::UrlEncoded("query".into(), format!("title:{}", query)),
            mockito::Matcher::UrlEncoded("per_page".into(), "20".into()),
        ]))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(TWO_ARTICLES)
}

/// The source decodes a well-formed response into articles.
#[tokio::test]
async fn test_search_decodes_articles() {
    let mut server = mockito::Server::new_async().await;
    let mock = search_mock(&mut server, "rx").create_async().await;

    let source = QiitaSource::with_config(&test_config(&server.url()));
    let articles = source.search("rx").await.unwrap();

    assert_eq!(articles.len(), 2);
    assert_eq!(articles[0].title, "Getting started with RxSwift");
    assert_eq!(articles[0].user.display_name, "Alice");
    assert_eq!(articles[1].user.avatar_url, "https://example.com/bob.png");

    mock.assert_async().await;
}

/// A non-success HTTP status surfaces as a transport failure.
#[tokio::test]
async fn test_server_error_is_transport_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/items")
        .match_query(mockito::Matcher::Any)
        .with_status(500)
        .create_async()
        .await;

    let source = QiitaSource::with_config(&test_config(&server.url()));
    let err = source.search("rx").await.unwrap_err();

    assert!(matches!(err, SearchError::Transport(_)));
}

/// A body that is not the expected shape surfaces as a decoding failure,
/// distinct from transport failures.
#[tokio::test]
async fn test_shape_mismatch_is_decoding_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/items")
        .match_query(mockito::Matcher::Any)
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"message": "this is not an array of articles"}"#)
        .create_async()
        .await;

    let source = QiitaSource::with_config(&test_config(&server.url()));
    let err = source.search("rx").await.unwrap_err();

    assert!(matches!(err, SearchError::Decoding(_)));
}

/// End-to-end: a burst of edits settles into one request, and the pipeline
/// exposes the decoded articles with loading resolved and no error.
#[tokio::test]
async fn test_pipeline_end_to_end() {
    let mut server = mockito::Server::new_async().await;
    let mock = search_mock(&mut server, "rx").expect(1).create_async().await;

    let config = test_config(&server.url());
    let source = Arc::new(QiitaSource::with_config(&config));
    let pipeline = SearchPipeline::with_config(source, &config);

    let mut results = pipeline.results();
    let mut errors = pipeline.errors();

    pipeline.set_query_text("r");
    pipeline.set_query_text("rx");

    tokio::time::timeout(Duration::from_secs(5), results.changed())
        .await
        .expect("search did not settle in time")
        .unwrap();

    assert_eq!(results.borrow().len(), 2);
    assert!(!*pipeline.is_loading().borrow());
    assert!(errors.try_recv().is_err());

    mock.assert_async().await;
}

/// End-to-end failure: the error output fires once and results stay empty.
#[tokio::test]
async fn test_pipeline_end_to_end_failure() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/items")
        .match_query(mockito::Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let config = test_config(&server.url());
    let source = Arc::new(QiitaSource::with_config(&config));
    let pipeline = SearchPipeline::with_config(source, &config);

    let mut results = pipeline.results();
    let mut errors = pipeline.errors();

    pipeline.set_query_text("swift");

    let err = tokio::time::timeout(Duration::from_secs(5), errors.recv())
        .await
        .expect("failure did not surface in time")
        .unwrap();

    assert!(matches!(err, SearchError::Transport(_)));
    // The failure also cleared results.
    results.changed().await.unwrap();
    assert!(results.borrow().is_empty());
    assert!(!*pipeline.is_loading().borrow());
}
