//! GitHub trending digest for Feishu
//!
//! - trending page scraping lives in `interfaces_github_trending`
//! - `table` maps records to Bitable rows and writes them
//! - `card` renders the interactive card sent to the group webhook
//! - `pipeline` runs one fetch → table → card pass
//! - Reads FEISHU_* env vars through `config`

pub mod card;
pub mod config;
pub mod pipeline;
pub mod table;
