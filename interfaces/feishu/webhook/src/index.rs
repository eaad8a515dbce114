use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const SEND_TIMEOUT: Duration = Duration::from_secs(10);

/// Interactive card, JSON 2.0 layout.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Card {
    pub schema: String,
    pub header: CardHeader,
    pub body: CardBody,
}

impl Card {
    pub fn new(title: impl Into<String>, template: impl Into<String>, elements: Vec<CardElement>) -> Self {
        Self {
            schema: "2.0".to_string(),
            header: CardHeader {
                title: PlainText::new(title),
                template: template.into(),
            },
            body: CardBody { elements },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardHeader {
    pub title: PlainText,
    /// Header colour, e.g. `blue`.
    pub template: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CardBody {
    pub elements: Vec<CardElement>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tag", rename = "plain_text")]
pub struct PlainText {
    pub content: String,
}

impl PlainText {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "tag", rename_all = "snake_case")]
pub enum CardElement {
    Markdown {
        content: String,
    },
    Hr,
    Button {
        text: PlainText,
        #[serde(rename = "type")]
        kind: String,
        url: String,
    },
}

impl CardElement {
    pub fn markdown(content: impl Into<String>) -> Self {
        CardElement::Markdown {
            content: content.into(),
        }
    }
}

#[derive(Serialize)]
struct WebhookMessage<'a> {
    msg_type: &'static str,
    card: &'a Card,
}

#[derive(Debug, Deserialize)]
struct WebhookResponse {
    code: Option<i64>,
    #[serde(default)]
    msg: String,
}

#[derive(Debug, Error)]
pub enum SendCardError {
    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },

    #[error("UnexpectedStatus: {status}: {body}")]
    UnexpectedStatus { status: StatusCode, body: String },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },

    #[error("DeserializeResponseBody: {source}")]
    DeserializeResponseBody {
        #[from]
        source: serde_json::Error,
    },

    #[error("Api: code {code:?}: {msg}")]
    Api { code: Option<i64>, msg: String },
}

pub async fn send_card(client: &Client, webhook_url: &str, card: &Card) -> Result<(), SendCardError> {
    let response = client
        .post(webhook_url)
        .json(&WebhookMessage {
            msg_type: "interactive",
            card,
        })
        .timeout(SEND_TIMEOUT)
        .send()
        .await
        .map_err(|source| SendCardError::RequestSend { source })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| SendCardError::ResponseRead { source })?;

    if !status.is_success() {
        debug!(%status, response = %body, "Webhook rejected card");
        return Err(SendCardError::UnexpectedStatus { status, body });
    }

    let parsed: WebhookResponse = serde_json::from_str(&body)?;
    if parsed.code != Some(0) {
        return Err(SendCardError::Api {
            code: parsed.code,
            msg: parsed.msg,
        });
    }

    Ok(())
}
