use chrono::NaiveDate;
use interfaces_feishu_webhook::index::{send_card, SendCardError};
use interfaces_github_trending::index::{fetch_trending, FetchTrendingError};
use reqwest::Client;
use thiserror::Error;
use tracing::{error, info, warn};

use crate::card::build_card;
use crate::config::Config;
use crate::table::{build_table_rows, write_table, WriteTableError};

/// Failures that abort the run.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("Feishu webhook URL not provided. Use --webhook or set FEISHU_WEBHOOK_URL env.")]
    WebhookMissing,

    #[error("FetchTrending: {source}")]
    FetchTrending {
        #[from]
        source: FetchTrendingError,
    },

    #[error("SendCard: {source}")]
    SendCard {
        #[from]
        source: SendCardError,
    },
}

#[derive(Debug)]
pub enum TableOutcome {
    /// Bitable settings incomplete, nothing attempted.
    NotConfigured,
    Written(usize),
    Failed(WriteTableError),
}

#[derive(Debug)]
pub enum RunReport {
    /// The listing had no repositories; nothing was written or sent.
    NothingFound,
    Delivered { records: usize, table: TableOutcome },
}

/// One fetch → table → card pass. `today` is the UTC date rows are stamped with.
pub async fn run(client: &Client, config: &Config, today: NaiveDate) -> Result<RunReport, RunError> {
    let webhook_url = config.webhook_url.as_deref().ok_or(RunError::WebhookMissing)?;
    let language = config.language.as_deref();

    let records = fetch_trending(
        client,
        &config.endpoints.github_base_url,
        language,
        config.since,
    )
    .await?;

    if records.is_empty() {
        warn!("No trending repositories found.");
        return Ok(RunReport::NothingFound);
    }

    let table = if !config.feishu.table_ready() {
        info!("Bitable env vars not fully set; skip writing to table.");
        TableOutcome::NotConfigured
    } else {
        let rows = build_table_rows(&records, language, config.since, config.limit, today);
        match write_table(client, &config.feishu, &config.endpoints.feishu_base_url, &rows).await {
            Ok(written) => TableOutcome::Written(written),
            Err(err) => {
                error!(error = %err, "Failed to write records to Bitable");
                TableOutcome::Failed(err)
            }
        }
    };

    let card = build_card(&records, language, config.since, config.limit);
    send_card(client, webhook_url, &card).await?;

    info!(records = records.len(), "Sent GitHub Trending card to Feishu");
    Ok(RunReport::Delivered {
        records: records.len(),
        table,
    })
}
