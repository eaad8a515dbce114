use chrono::{Datelike, NaiveDate, NaiveTime};
use interfaces_feishu_auth::index::{fetch_tenant_access_token, FetchTenantAccessTokenError};
use interfaces_feishu_bitable::index::{batch_create_records, BatchCreateRecordsError, BitableRecord};
use interfaces_github_trending::index::{Since, TrendingRecord};
use reqwest::Client;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::config::FeishuConfig;

pub const SOURCE_NAME: &str = "github-trending";

/// Spoken-language filter of the listing; the run never narrows it.
const SPOKEN_LANGUAGE_ALL: &str = "all";

/// Column values of one Bitable row.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct TableFields {
    pub rank: usize,
    pub repo: String,
    pub owner: String,
    pub spoken_language: String,
    pub language: String,
    pub stars: u64,
    pub today_stars: u64,
    pub description: String,
    #[serde(rename = "URL")]
    pub url: LinkField,
    /// Milliseconds since the epoch, midnight UTC of the run date.
    pub date: i64,
    pub source: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkField {
    pub link: String,
    pub text: String,
}

pub type TableRow = BitableRecord<TableFields>;

/// `github-trending:<since>:<bucket>:<language>`, bucketed by ISO week, month or day.
pub fn build_source_tag(since: Since, language: Option<&str>, date: NaiveDate) -> String {
    let lang_key = language
        .filter(|lang| !lang.is_empty())
        .unwrap_or("all")
        .to_lowercase();

    let bucket = match since {
        Since::Weekly => {
            let week = date.iso_week();
            format!("{}-W{:02}", week.year(), week.week())
        }
        Since::Monthly => date.format("%Y-%m").to_string(),
        Since::Daily => date.format("%Y-%m-%d").to_string(),
    };

    format!("{SOURCE_NAME}:{since}:{bucket}:{lang_key}")
}

pub fn date_timestamp_ms(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp_millis()
}

fn split_owner(full_name: &str) -> &str {
    full_name
        .split_once('/')
        .map_or(full_name, |(owner, _)| owner)
}

/// Maps the first `limit` records to rows ranked from 1.
pub fn build_table_rows(
    records: &[TrendingRecord],
    language: Option<&str>,
    since: Since,
    limit: usize,
    date: NaiveDate,
) -> Vec<TableRow> {
    let date_ms = date_timestamp_ms(date);
    let source = build_source_tag(since, language, date);

    records
        .iter()
        .take(limit)
        .enumerate()
        .map(|(idx, record)| BitableRecord {
            fields: TableFields {
                rank: idx + 1,
                repo: record.name.clone(),
                owner: split_owner(&record.name).to_string(),
                spoken_language: SPOKEN_LANGUAGE_ALL.to_string(),
                language: record.language.clone(),
                stars: record.stars.unwrap_or(0),
                today_stars: record.stars_today.unwrap_or(0),
                description: record.description.clone(),
                url: LinkField {
                    link: record.url.clone(),
                    text: record.name.clone(),
                },
                date: date_ms,
                source: source.clone(),
            },
        })
        .collect()
}

#[derive(Debug, Error)]
pub enum WriteTableError {
    #[error("Bitable app token / table id not set")]
    TableNotConfigured,

    #[error("FEISHU_APP_ID / FEISHU_APP_SECRET not set")]
    CredentialsMissing,

    #[error("FetchTenantAccessToken: {source}")]
    FetchTenantAccessToken {
        #[from]
        source: FetchTenantAccessTokenError,
    },

    #[error("BatchCreateRecords: {source}")]
    BatchCreateRecords {
        #[from]
        source: BatchCreateRecordsError,
    },
}

/// Obtains a tenant token from the configured app credentials.
pub async fn tenant_access_token(
    client: &Client,
    feishu: &FeishuConfig,
    feishu_base_url: &str,
) -> Result<String, WriteTableError> {
    let (Some(app_id), Some(app_secret)) = (&feishu.app_id, &feishu.app_secret) else {
        return Err(WriteTableError::CredentialsMissing);
    };

    Ok(fetch_tenant_access_token(client, feishu_base_url, app_id, app_secret).await?)
}

/// Writes `rows` in a single batch. Nothing is requested when `rows` is empty.
pub async fn write_table(
    client: &Client,
    feishu: &FeishuConfig,
    feishu_base_url: &str,
    rows: &[TableRow],
) -> Result<usize, WriteTableError> {
    if rows.is_empty() {
        return Ok(0);
    }

    let (Some(app_token), Some(table_id)) = (&feishu.bitable_app_token, &feishu.bitable_table_id)
    else {
        return Err(WriteTableError::TableNotConfigured);
    };

    let token = tenant_access_token(client, feishu, feishu_base_url).await?;
    let written =
        batch_create_records(client, feishu_base_url, &token, app_token, table_id, rows).await?;

    info!("Wrote {written} records to Feishu Bitable");
    Ok(written)
}
