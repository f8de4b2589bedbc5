use crate::utils::error::Result;
use crate::utils::validation::{validate_chat_id, validate_non_empty_string, Validate};
use serde::{Deserialize, Serialize};

pub const DRY_RUN_VAR: &str = "DRY_RUN";
pub const TELEGRAM_TOKEN_VAR: &str = "TELEGRAM_TOKEN";
pub const TELEGRAM_CHAT_ID_VAR: &str = "TELEGRAM_CHAT_ID";

pub const DUMMY_TOKEN: &str = "dummy-token";
pub const DUMMY_CHAT_ID: &str = "1";

/// 爬蟲啟動時需要的執行設定。離線檢查只用預設值，不會改動行程環境變數。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScraperSettings {
    pub dry_run: bool,
    pub telegram_token: String,
    pub telegram_chat_id: String,
}

impl ScraperSettings {
    pub fn offline() -> Self {
        Self {
            dry_run: true,
            telegram_token: DUMMY_TOKEN.to_string(),
            telegram_chat_id: DUMMY_CHAT_ID.to_string(),
        }
    }

    /// 環境變數未設定時才套用離線預設值
    pub fn offline_from_env() -> Self {
        Self::offline_from_lookup(|name| std::env::var(name).ok())
    }

    pub fn offline_from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::offline();
        let dry_run = lookup(DRY_RUN_VAR)
            .map(|v| parse_flag(&v))
            .unwrap_or(defaults.dry_run);

        Self {
            dry_run,
            telegram_token: lookup(TELEGRAM_TOKEN_VAR).unwrap_or(defaults.telegram_token),
            telegram_chat_id: lookup(TELEGRAM_CHAT_ID_VAR).unwrap_or(defaults.telegram_chat_id),
        }
    }

    pub fn uses_dummy_credentials(&self) -> bool {
        self.telegram_token == DUMMY_TOKEN
    }
}

impl Default for ScraperSettings {
    fn default() -> Self {
        Self::offline()
    }
}

impl Validate for ScraperSettings {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("telegram_token", &self.telegram_token)?;
        validate_chat_id("telegram_chat_id", &self.telegram_chat_id)?;
        Ok(())
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
