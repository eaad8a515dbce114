use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use reqwest::{Client, StatusCode};
use scraper::{ElementRef, Html, Selector};
use thiserror::Error;
use tracing::{debug, info};

pub const GITHUB_BASE_URL: &str = "https://github.com";
pub const USER_AGENT: &str = "Mozilla/5.0 (compatible; GitHubTrendingBot/1.0)";

const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Time window of the trending listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Since {
    Daily,
    Weekly,
    Monthly,
}

impl Since {
    pub fn as_str(&self) -> &'static str {
        match self {
            Since::Daily => "daily",
            Since::Weekly => "weekly",
            Since::Monthly => "monthly",
        }
    }

    /// Capitalised form used in headings.
    pub fn label(&self) -> &'static str {
        match self {
            Since::Daily => "Daily",
            Since::Weekly => "Weekly",
            Since::Monthly => "Monthly",
        }
    }
}

impl fmt::Display for Since {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Error)]
#[error("InvalidSince: expected one of daily, weekly, monthly, got {value:?}")]
pub struct ParseSinceError {
    pub value: String,
}

impl FromStr for Since {
    type Err = ParseSinceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(Since::Daily),
            "weekly" => Ok(Since::Weekly),
            "monthly" => Ok(Since::Monthly),
            other => Err(ParseSinceError {
                value: other.to_string(),
            }),
        }
    }
}

/// One repository row of the trending listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrendingRecord {
    /// `owner/repo`
    pub name: String,
    pub url: String,
    pub description: String,
    pub language: String,
    pub stars: Option<u64>,
    pub stars_today: Option<u64>,
}

pub fn build_trending_url(base_url: &str, language: Option<&str>, since: Since) -> String {
    let base = base_url.trim_end_matches('/');
    match language {
        Some(lang) if !lang.is_empty() => format!("{base}/trending/{lang}?since={since}"),
        _ => format!("{base}/trending?since={since}"),
    }
}

#[derive(Debug, Error)]
pub enum FetchTrendingPageError {
    #[error("RequestSend: {source}")]
    RequestSend { source: reqwest::Error },

    #[error("UnexpectedStatus: {status} for {url}")]
    UnexpectedStatus { status: StatusCode, url: String },

    #[error("ResponseRead: {source}")]
    ResponseRead { source: reqwest::Error },
}

pub async fn fetch_trending_page(
    client: &Client,
    base_url: &str,
    language: Option<&str>,
    since: Since,
) -> Result<String, FetchTrendingPageError> {
    let url = build_trending_url(base_url, language, since);
    debug!(%url, "Fetching trending page");

    let response = client
        .get(&url)
        .header("User-Agent", USER_AGENT)
        .timeout(FETCH_TIMEOUT)
        .send()
        .await
        .map_err(|source| FetchTrendingPageError::RequestSend { source })?;

    let status = response.status();
    if !status.is_success() {
        return Err(FetchTrendingPageError::UnexpectedStatus { status, url });
    }

    response
        .text()
        .await
        .map_err(|source| FetchTrendingPageError::ResponseRead { source })
}

#[derive(Debug, Error)]
pub enum ExtractRecordsError {
    #[error("SelectorParse: {selector}: {message}")]
    SelectorParse {
        selector: &'static str,
        message: String,
    },
}

struct Selectors {
    block: Selector,
    title: Selector,
    link: Selector,
    description: Selector,
    paragraph: Selector,
    language: Selector,
    stargazers: Selector,
    stars_today: Selector,
}

impl Selectors {
    fn compile() -> Result<Self, ExtractRecordsError> {
        Ok(Self {
            block: compile("article.Box-row")?,
            title: compile("h2")?,
            link: compile("a")?,
            description: compile("p.col-9")?,
            paragraph: compile("p")?,
            language: compile(r#"span[itemprop="programmingLanguage"]"#)?,
            stargazers: compile(r#"a[href$="/stargazers"]"#)?,
            stars_today: compile("span.d-inline-block.float-sm-right")?,
        })
    }
}

fn compile(selector: &'static str) -> Result<Selector, ExtractRecordsError> {
    Selector::parse(selector).map_err(|err| ExtractRecordsError::SelectorParse {
        selector,
        message: err.to_string(),
    })
}

/// Field accessors over one `article.Box-row`. Every accessor is best-effort and
/// yields `None` when the markup does not carry the field.
struct RepoBlock<'a> {
    element: ElementRef<'a>,
    selectors: &'a Selectors,
}

impl<'a> RepoBlock<'a> {
    fn first(&self, selector: &Selector) -> Option<ElementRef<'a>> {
        self.element.select(selector).next()
    }

    /// `/owner/repo`, taken from the first link of the heading.
    fn repo_path(&self) -> Option<String> {
        let heading = self.first(&self.selectors.title)?;
        let link = heading.select(&self.selectors.link).next()?;
        let href = link.value().attr("href")?.trim();
        (!href.is_empty()).then(|| href.to_string())
    }

    fn description(&self) -> Option<String> {
        self.first(&self.selectors.description)
            .or_else(|| self.first(&self.selectors.paragraph))
            .map(collapsed_text)
    }

    fn language(&self) -> Option<String> {
        self.first(&self.selectors.language).map(collapsed_text)
    }

    fn stars(&self) -> Option<u64> {
        let text = collapsed_text(self.first(&self.selectors.stargazers)?);
        parse_count(&text)
    }

    /// "1,234 stars today" / "567 stars this week"
    fn stars_today(&self) -> Option<u64> {
        let text = collapsed_text(self.first(&self.selectors.stars_today)?);
        parse_count(text.split_whitespace().next()?)
    }

    fn into_record(self) -> Option<TrendingRecord> {
        let path = self.repo_path()?;
        Some(TrendingRecord {
            name: path.trim_start_matches('/').to_string(),
            url: format!("{GITHUB_BASE_URL}{path}"),
            description: self.description().unwrap_or_default(),
            language: self.language().unwrap_or_default(),
            stars: self.stars(),
            stars_today: self.stars_today(),
        })
    }
}

fn collapsed_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses a GitHub count such as `12,345`. Anything else yields `None`.
pub fn parse_count(text: &str) -> Option<u64> {
    text.trim().replace(',', "").parse().ok()
}

/// Extracts every repository block that has a title link; blocks without one are skipped.
pub fn extract_records(html: &str) -> Result<Vec<TrendingRecord>, ExtractRecordsError> {
    let selectors = Selectors::compile()?;
    let document = Html::parse_document(html);

    let mut records = Vec::new();
    let mut skipped = 0usize;
    for element in document.select(&selectors.block) {
        let block = RepoBlock {
            element,
            selectors: &selectors,
        };
        match block.into_record() {
            Some(record) => records.push(record),
            None => skipped += 1,
        }
    }

    debug!(records = records.len(), skipped, "Extracted trending blocks");
    Ok(records)
}

#[derive(Debug, Error)]
pub enum FetchTrendingError {
    #[error("FetchTrendingPage: {source}")]
    FetchTrendingPage {
        #[from]
        source: FetchTrendingPageError,
    },

    #[error("ExtractRecords: {source}")]
    ExtractRecords {
        #[from]
        source: ExtractRecordsError,
    },
}

pub async fn fetch_trending(
    client: &Client,
    base_url: &str,
    language: Option<&str>,
    since: Since,
) -> Result<Vec<TrendingRecord>, FetchTrendingError> {
    let html = fetch_trending_page(client, base_url, language, since).await?;
    let records = extract_records(&html)?;
    info!(count = records.len(), since = %since, language = language.unwrap_or("all"), "Fetched GitHub trending");
    Ok(records)
}
