use std::process::ExitCode;

use chrono::Utc;
use clap::Parser;
use interfaces_github_trending::index::Since;
use projects_trending_digest::{
    config::{non_empty, Config, Endpoints, FeishuConfig, ENV_WEBHOOK_URL},
    pipeline::{run, RunError, RunReport, TableOutcome},
};
use reqwest::Client;
use thiserror::Error;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "trending_digest")]
#[command(version)]
#[command(about = "Fetch GitHub Trending, write to Feishu Bitable, and send a Feishu interactive card.")]
struct Cli {
    /// Programming language, e.g. python, rust, go. Default: all languages.
    #[arg(long = "lang")]
    lang: Option<String>,

    /// Trending period: daily, weekly or monthly.
    #[arg(long, default_value = "daily")]
    since: Since,

    /// How many top repos to include.
    #[arg(long, default_value_t = 10)]
    limit: usize,

    /// Feishu webhook URL. Falls back to FEISHU_WEBHOOK_URL.
    #[arg(long, env = ENV_WEBHOOK_URL, hide_env_values = true)]
    webhook: Option<String>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, default_value = "info")]
    log_level: String,
}

impl Cli {
    fn into_config(self) -> Config {
        Config {
            language: non_empty(self.lang),
            since: self.since,
            limit: self.limit,
            webhook_url: non_empty(self.webhook),
            feishu: FeishuConfig::from_env(),
            endpoints: Endpoints::default(),
        }
    }
}

#[derive(Debug, Error)]
pub enum MainError {
    #[error("TracingInit: {source}")]
    TracingInit {
        #[source]
        source: utils_trace::TracingInitError,
    },

    #[error(transparent)]
    Run {
        #[from]
        source: RunError,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // A missing .env file is fine.
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match digest(cli).await {
        Ok(report) => {
            summarize(&report);
            ExitCode::SUCCESS
        }
        Err(err @ MainError::TracingInit { .. }) => {
            eprintln!("{err}");
            ExitCode::FAILURE
        }
        Err(err) => {
            error!(error = %err, "Run failed");
            ExitCode::FAILURE
        }
    }
}

async fn digest(cli: Cli) -> Result<RunReport, MainError> {
    utils_trace::init(&cli.log_level).map_err(|source| MainError::TracingInit { source })?;

    let config = cli.into_config();
    let client = Client::new();

    Ok(run(&client, &config, Utc::now().date_naive()).await?)
}

fn summarize(report: &RunReport) {
    match report {
        RunReport::NothingFound => {}
        RunReport::Delivered { records, table } => {
            let table = match table {
                TableOutcome::NotConfigured => "skipped",
                TableOutcome::Written(_) => "written",
                TableOutcome::Failed(_) => "failed",
            };
            info!(records, table, "Done");
        }
    }
}
