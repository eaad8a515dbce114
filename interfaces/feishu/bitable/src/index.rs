use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

const BATCH_CREATE_TIMEOUT: Duration = Duration::from_secs(15);

/// A row as the Bitable API expects it: the column values live under `fields`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BitableRecord<F> {
    pub fields: F,
}

#[derive(Serialize)]
struct BatchCreateRequest<'a, F> {
    records: &'a [BitableRecord<F>],
}

#[derive(Debug, Deserialize)]
struct BatchCreateResponse {
    code: Option<i64>,
    #[serde(default)]
    msg: String,
}

#[derive(Debug, Error)]
pub enum BatchCreateRecordsError {
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

pub fn batch_create_url(base_url: &str, app_token: &str, table_id: &str) -> String {
    format!(
        "{}/open-apis/bitable/v1/apps/{app_token}/tables/{table_id}/records/batch_create",
        base_url.trim_end_matches('/')
    )
}

/// Inserts `records` in one request and returns how many were sent.
/// An empty slice issues no request.
pub async fn batch_create_records<F: Serialize>(
    client: &Client,
    base_url: &str,
    tenant_access_token: &str,
    app_token: &str,
    table_id: &str,
    records: &[BitableRecord<F>],
) -> Result<usize, BatchCreateRecordsError> {
    if records.is_empty() {
        return Ok(0);
    }

    let url = batch_create_url(base_url, app_token, table_id);
    debug!(%url, count = records.len(), "Submitting Bitable batch_create");

    let response = client
        .post(&url)
        .header("Authorization", format!("Bearer {tenant_access_token}"))
        .header("Content-Type", "application/json; charset=utf-8")
        .json(&BatchCreateRequest { records })
        .timeout(BATCH_CREATE_TIMEOUT)
        .send()
        .await
        .map_err(|source| BatchCreateRecordsError::RequestSend { source })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| BatchCreateRecordsError::ResponseRead { source })?;

    if !status.is_success() {
        return Err(BatchCreateRecordsError::UnexpectedStatus { status, body });
    }

    let parsed: BatchCreateResponse = serde_json::from_str(&body)?;
    if parsed.code != Some(0) {
        return Err(BatchCreateRecordsError::Api {
            code: parsed.code,
            msg: parsed.msg,
        });
    }

    Ok(records.len())
}
