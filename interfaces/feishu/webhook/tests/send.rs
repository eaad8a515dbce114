use interfaces_feishu_webhook::index::{send_card, Card, CardElement, SendCardError};
use mockito::Matcher;
use reqwest::Client;
use serde_json::json;

fn card() -> Card {
    Card::new("Hello", "blue", vec![CardElement::markdown("body")])
}

#[tokio::test]
async fn posts_interactive_message() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/open-apis/bot/v2/hook/abc")
        .match_body(Matcher::PartialJson(json!({
            "msg_type": "interactive",
            "card": {"header": {"title": {"content": "Hello"}}}
        })))
        .with_status(200)
        .with_body(r#"{"code":0,"msg":"success","data":{}}"#)
        .create_async()
        .await;

    let url = format!("{}/open-apis/bot/v2/hook/abc", server.url());
    send_card(&Client::new(), &url, &card()).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn non_zero_code_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/hook")
        .with_status(200)
        .with_body(r#"{"code":19021,"msg":"sign match fail"}"#)
        .create_async()
        .await;

    let url = format!("{}/hook", server.url());
    let err = send_card(&Client::new(), &url, &card()).await.unwrap_err();

    assert!(matches!(err, SendCardError::Api { code: Some(19021), .. }));
}

#[tokio::test]
async fn http_error_keeps_response_body() {
    let mut server = mockito::Server::new_async().await;
    let _mock = server
        .mock("POST", "/hook")
        .with_status(400)
        .with_body("bad request")
        .create_async()
        .await;

    let url = format!("{}/hook", server.url());
    let err = send_card(&Client::new(), &url, &card()).await.unwrap_err();

    assert_eq!(err.to_string(), "UnexpectedStatus: 400 Bad Request: bad request");
    match err {
        SendCardError::UnexpectedStatus { status, body } => {
            assert_eq!(status.as_u16(), 400);
            assert_eq!(body, "bad request");
        }
        other => panic!("unexpected error: {other}"),
    }
}
