use crate::config::env::ApiOverrides;
use crate::config::toml_config::TomlConfig;
use crate::core::ConfigProvider;
use crate::domain::model::RateRequest;
use crate::utils::error::{RateError, Result};
use crate::utils::redact::Secret;
use crate::utils::validation::{validate_required_field, validate_resolved, Validate};
use std::time::Duration;

/// 合併檔案、環境變數與命令列後的最終設定
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub endpoint: String,
    pub credential: Secret,
    pub timeout: Option<Duration>,
    pub transaction_source: Option<String>,
}

impl ClientSettings {
    /// 依序套用覆寫（後者優先），驗證後拆成客戶端設定與報價請求
    pub fn resolve<I>(mut config: TomlConfig, layers: I) -> Result<(Self, RateRequest)>
    where
        I: IntoIterator<Item = ApiOverrides>,
    {
        for overrides in layers {
            config.api.apply(overrides);
        }

        // 先檢查必要欄位，未展開的佔位符回報為缺少而非格式錯誤
        let endpoint = validate_required_field("api.endpoint", &config.api.endpoint)?.clone();
        validate_resolved("api.endpoint", &endpoint)?;

        let credential = validate_required_field("api.token", &config.api.token)?.clone();
        validate_resolved("api.token", credential.expose())?;
        if credential.is_empty() {
            return Err(RateError::MissingConfig {
                field: "api.token".to_string(),
            });
        }

        config.validate()?;

        let timeout = config.api.timeout_seconds.map(Duration::from_secs);

        // 空字串或未展開的佔位符視為未設定
        let transaction_source = config
            .api
            .transaction_source
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty() && !s.contains("${"))
            .map(str::to_string);

        tracing::debug!(
            "Resolved settings: endpoint={}, credential={}, timeout={:?}",
            endpoint,
            credential,
            timeout
        );

        let settings = Self {
            endpoint,
            credential,
            timeout,
            transaction_source,
        };

        Ok((settings, config.rate_request))
    }
}

impl ConfigProvider for ClientSettings {
    fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn credential(&self) -> &str {
        self.credential.expose()
    }

    fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    fn transaction_source(&self) -> Option<&str> {
        self.transaction_source.as_deref()
    }
}
