use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub const FEISHU_BASE_URL: &str = "https://open.feishu.cn";

const TENANT_TOKEN_PATH: &str = "/open-apis/auth/v3/tenant_access_token/internal";
const TOKEN_TIMEOUT: Duration = Duration::from_secs(10);

#[derive(Serialize)]
struct TenantTokenRequest<'a> {
    app_id: &'a str,
    app_secret: &'a str,
}

#[derive(Debug, Deserialize)]
pub struct TenantTokenResponse {
    pub code: Option<i64>,
    #[serde(default)]
    pub msg: String,
    pub tenant_access_token: Option<String>,
    /// Seconds until the token expires.
    pub expire: Option<u64>,
}

#[derive(Debug, Error)]
pub enum FetchTenantAccessTokenError {
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

    #[error("Missing tenant_access_token in auth response")]
    TokenMissing,
}

/// Exchanges the app credentials for a `tenant_access_token`.
pub async fn fetch_tenant_access_token(
    client: &Client,
    base_url: &str,
    app_id: &str,
    app_secret: &str,
) -> Result<String, FetchTenantAccessTokenError> {
    let url = format!("{}{TENANT_TOKEN_PATH}", base_url.trim_end_matches('/'));

    let response = client
        .post(&url)
        .json(&TenantTokenRequest { app_id, app_secret })
        .timeout(TOKEN_TIMEOUT)
        .send()
        .await
        .map_err(|source| FetchTenantAccessTokenError::RequestSend { source })?;

    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| FetchTenantAccessTokenError::ResponseRead { source })?;

    if !status.is_success() {
        return Err(FetchTenantAccessTokenError::UnexpectedStatus { status, body });
    }

    let parsed: TenantTokenResponse = serde_json::from_str(&body)?;
    if parsed.code != Some(0) {
        return Err(FetchTenantAccessTokenError::Api {
            code: parsed.code,
            msg: parsed.msg,
        });
    }

    debug!(expire = ?parsed.expire, "Obtained tenant access token");
    parsed
        .tenant_access_token
        .ok_or(FetchTenantAccessTokenError::TokenMissing)
}
