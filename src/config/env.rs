use crate::utils::error::{RateError, Result};
use crate::utils::redact::Secret;

pub const ENDPOINT_VAR: &str = "RATE_QUOTE_ENDPOINT";
pub const TOKEN_VAR: &str = "RATE_QUOTE_TOKEN";
pub const TIMEOUT_VAR: &str = "RATE_QUOTE_TIMEOUT_SECONDS";
pub const TRANSACTION_SOURCE_VAR: &str = "RATE_QUOTE_TRANSACTION_SOURCE";

/// 覆寫 `[api]` 區段的單一來源（環境變數或命令列）
#[derive(Debug, Clone, Default)]
pub struct ApiOverrides {
    pub endpoint: Option<String>,
    pub token: Option<Secret>,
    pub timeout_seconds: Option<u64>,
    pub transaction_source: Option<String>,
}

impl ApiOverrides {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 由任意查詢函式取值，空字串視為未設定
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let timeout_seconds = match get(TIMEOUT_VAR) {
            Some(raw) => Some(raw.trim().parse::<u64>().map_err(|e| {
                RateError::InvalidConfigValue {
                    field: TIMEOUT_VAR.to_string(),
                    value: raw.clone(),
                    reason: format!("Not a whole number of seconds: {}", e),
                }
            })?),
            None => None,
        };

        Ok(Self {
            endpoint: get(ENDPOINT_VAR),
            token: get(TOKEN_VAR).map(Secret::new),
            timeout_seconds,
            transaction_source: get(TRANSACTION_SOURCE_VAR),
        })
    }

    pub fn is_empty(&self) -> bool {
        self.endpoint.is_none()
            && self.token.is_none()
            && self.timeout_seconds.is_none()
            && self.transaction_source.is_none()
    }
}
