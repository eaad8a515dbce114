use interfaces_feishu_auth::index::{fetch_tenant_access_token, FetchTenantAccessTokenError};
use mockito::Matcher;
use reqwest::Client;
use serde_json::json;

const PATH: &str = "/open-apis/auth/v3/tenant_access_token/internal";

#[tokio::test]
async fn exchanges_credentials_for_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", PATH)
        .match_body(Matcher::Json(json!({"app_id": "cli_a", "app_secret": "s3cret"})))
        .with_status(200)
        .with_body(r#"{"code":0,"msg":"ok","tenant_access_token":"t-abc","expire":7200}"#)
        .create_async()
        .await;

    let token = fetch_tenant_access_token(&Client::new(), &server.url(), "cli_a", "s3cret")
        .await
        .unwrap();

    mock.assert_async().await;
    assert_eq!(token, "t-abc");
}

#[tokio::test]
async fn non_zero_code_in_body_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(200)
        .with_body(r#"{"code":10003,"msg":"invalid param"}"#)
        .create_async()
        .await;

    let err = fetch_tenant_access_token(&Client::new(), &server.url(), "x", "y")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        FetchTenantAccessTokenError::Api { code: Some(10003), .. }
    ));
}

#[tokio::test]
async fn http_error_status_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", PATH)
        .with_status(500)
        .with_body("boom")
        .create_async()
        .await;

    let err = fetch_tenant_access_token(&Client::new(), &server.url(), "x", "y")
        .await
        .unwrap_err();

    assert!(matches!(err, FetchTenantAccessTokenError::UnexpectedStatus { .. }));
}
