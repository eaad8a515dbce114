use interfaces_github_trending::index::{
    fetch_trending, FetchTrendingError, FetchTrendingPageError, Since, USER_AGENT,
};
use mockito::Matcher;
use reqwest::Client;

const PAGE: &str = r#"
<html><body>
<article class="Box-row">
  <h2><a href="/tokio-rs/tokio">tokio-rs / tokio</a></h2>
  <p class="col-9">A runtime for writing reliable asynchronous applications.</p>
  <span itemprop="programmingLanguage">Rust</span>
  <a href="/tokio-rs/tokio/stargazers">27,001</a>
  <span class="d-inline-block float-sm-right">88 stars this week</span>
</article>
</body></html>
"#;

#[tokio::test]
async fn fetches_language_filtered_page() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/trending/rust")
        .match_query(Matcher::UrlEncoded("since".into(), "weekly".into()))
        .match_header("user-agent", USER_AGENT)
        .with_status(200)
        .with_body(PAGE)
        .create_async()
        .await;

    let records = fetch_trending(&Client::new(), &server.url(), Some("rust"), Since::Weekly)
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "tokio-rs/tokio");
    assert_eq!(records[0].stars, Some(27_001));
    assert_eq!(records[0].stars_today, Some(88));
}

#[tokio::test]
async fn http_error_status_is_fatal() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("GET", "/trending")
        .match_query(Matcher::Any)
        .with_status(503)
        .create_async()
        .await;

    let err = fetch_trending(&Client::new(), &server.url(), None, Since::Daily)
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchTrendingError::FetchTrendingPage {
            source: FetchTrendingPageError::UnexpectedStatus { .. }
        }
    ));
}
