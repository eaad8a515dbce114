use interfaces_feishu_auth::index::FEISHU_BASE_URL;
use interfaces_github_trending::index::{Since, GITHUB_BASE_URL};

pub const ENV_WEBHOOK_URL: &str = "FEISHU_WEBHOOK_URL";
pub const ENV_APP_ID: &str = "FEISHU_APP_ID";
pub const ENV_APP_SECRET: &str = "FEISHU_APP_SECRET";
pub const ENV_BITABLE_APP_TOKEN: &str = "FEISHU_BITABLE_APP_TOKEN";
pub const ENV_BITABLE_TABLE_ID: &str = "FEISHU_BITABLE_TABLE_ID";

/// Everything one run needs, resolved once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    pub language: Option<String>,
    pub since: Since,
    pub limit: usize,
    pub webhook_url: Option<String>,
    pub feishu: FeishuConfig,
    pub endpoints: Endpoints,
}

/// Base URLs of the remote services.
#[derive(Debug, Clone)]
pub struct Endpoints {
    pub github_base_url: String,
    pub feishu_base_url: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            github_base_url: GITHUB_BASE_URL.to_string(),
            feishu_base_url: FEISHU_BASE_URL.to_string(),
        }
    }
}

/// Feishu app credentials and the target Bitable table.
#[derive(Debug, Clone, Default)]
pub struct FeishuConfig {
    pub app_id: Option<String>,
    pub app_secret: Option<String>,
    pub bitable_app_token: Option<String>,
    pub bitable_table_id: Option<String>,
}

impl FeishuConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        Self {
            app_id: non_empty(lookup(ENV_APP_ID)),
            app_secret: non_empty(lookup(ENV_APP_SECRET)),
            bitable_app_token: non_empty(lookup(ENV_BITABLE_APP_TOKEN)),
            bitable_table_id: non_empty(lookup(ENV_BITABLE_TABLE_ID)),
        }
    }

    /// True when every setting the table write needs is present.
    pub fn table_ready(&self) -> bool {
        self.app_id.is_some()
            && self.app_secret.is_some()
            && self.bitable_app_token.is_some()
            && self.bitable_table_id.is_some()
    }
}

pub fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
