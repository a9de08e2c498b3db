use crate::config::env::ApiOverrides;
use crate::domain::model::RateRequest;
use crate::utils::error::{RateError, Result};
use crate::utils::redact::Secret;
use crate::utils::validation::{validate_range, validate_url, Validate};
use regex::Regex;
use serde::Deserialize;
use std::path::Path;

pub const MAX_TIMEOUT_SECONDS: u64 = 600;

#[derive(Debug, Clone, Deserialize)]
pub struct TomlConfig {
    #[serde(default)]
    pub api: ApiConfig,
    pub rate_request: RateRequest,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiConfig {
    pub endpoint: Option<String>,
    pub token: Option<Secret>,
    pub timeout_seconds: Option<u64>,
    pub transaction_source: Option<String>,
}

impl ApiConfig {
    /// 以覆寫值取代檔案中的設定，未提供的欄位保持不變
    pub fn apply(&mut self, overrides: ApiOverrides) {
        if let Some(endpoint) = overrides.endpoint {
            self.endpoint = Some(endpoint);
        }
        if let Some(token) = overrides.token {
            self.token = Some(token);
        }
        if let Some(timeout) = overrides.timeout_seconds {
            self.timeout_seconds = Some(timeout);
        }
        if let Some(source) = overrides.transaction_source {
            self.transaction_source = Some(source);
        }
    }
}

impl TomlConfig {
    /// 從 TOML 檔案載入配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| RateError::Config {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_toml_str(&content)
    }

    /// 從 TOML 字串解析配置
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content)?;

        toml::from_str(&processed_content).map_err(|e| RateError::ConfigValidation {
            field: "toml_parsing".to_string(),
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// 替換環境變數 (例如 ${UPS_ACCESS_TOKEN})，未設定的保留原樣
    fn substitute_env_vars(content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| RateError::Config {
            message: format!("Invalid placeholder pattern: {}", e),
        })?;

        let result = re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        });

        Ok(result.to_string())
    }

    pub fn validate_config(&self) -> Result<()> {
        if let Some(endpoint) = &self.api.endpoint {
            validate_url("api.endpoint", endpoint)?;
        }

        if let Some(timeout) = self.api.timeout_seconds {
            validate_range("api.timeout_seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }

        self.rate_request.validate()
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.validate_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SHIPMENT: &str = r#"
[rate_request.shipment.shipper]
name = "Pro Keepers Line GmbH"
shipper_number = "G224H8"
address = { address_line = ["Industriestraat 345"], city = "Tegelen", state_province_code = "PJ", postal_code = "5931", country_code = "NL" }

[rate_request.shipment.ship_to]
name = "Max Mustermann"
address = { address_line = ["3851 Pleasant Hill Road"], city = "Boca Raton", state_province_code = "FL", postal_code = "33487", country_code = "US" }

[rate_request.shipment.ship_from]
name = "Pro Keepers Line GmbH"
address = { address_line = ["Industriestraat 345"], city = "Tegelen", state_province_code = "PJ", postal_code = "5931", country_code = "NL" }

[[rate_request.shipment.payment_details.shipment_charge]]
type = "01"
bill_shipper = { account_number = "G224H8" }

[rate_request.shipment.service]
code = "65"
description = "UPS Worldwide Saver"

[rate_request.shipment.package]
packaging_type = { code = "02", description = "Packaging" }
dimensions = { unit_of_measurement = { code = "CM", description = "Centimeter" }, length = 10, width = 10, height = 10 }
package_weight = { unit_of_measurement = { code = "KGS", description = "Kilograms" }, weight = 1 }

[rate_request.shipment.shipment_rating_options]
negotiated_rates = true
"#;

    #[test]
    fn test_parse_basic_toml_config() {
        let toml_content = format!(
            r#"
[api]
endpoint = "https://onlinetools.ups.com/api/rating/v2409/Rate"
timeout_seconds = 30

[rate_request.request.transaction_reference]
customer_context = "test"
{}"#,
            SHIPMENT
        );

        let config = TomlConfig::from_toml_str(&toml_content).unwrap();

        assert_eq!(
            config.api.endpoint.as_deref(),
            Some("https://onlinetools.ups.com/api/rating/v2409/Rate")
        );
        assert_eq!(config.api.timeout_seconds, Some(30));
        assert!(config.api.token.is_none());
        assert_eq!(config.rate_request.customer_context(), "test");
        assert_eq!(config.rate_request.shipment.ship_to.address.country_code, "US");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_env_var_substitution() {
        std::env::set_var("RATE_QUOTE_TEST_TOKEN", "substituted-token");

        let toml_content = format!(
            r#"
[api]
token = "${{RATE_QUOTE_TEST_TOKEN}}"
transaction_source = "${{RATE_QUOTE_TEST_UNSET_VAR}}"
{}"#,
            SHIPMENT
        );

        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert_eq!(
            config.api.token.as_ref().map(Secret::expose),
            Some("substituted-token")
        );
        // 未設定的變數保留佔位符
        assert_eq!(
            config.api.transaction_source.as_deref(),
            Some("${RATE_QUOTE_TEST_UNSET_VAR}")
        );

        std::env::remove_var("RATE_QUOTE_TEST_TOKEN");
    }

    #[test]
    fn test_config_validation() {
        let toml_content = format!(
            r#"
[api]
endpoint = "invalid-url"
{}"#,
            SHIPMENT
        );

        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_timeout_out_of_range() {
        let toml_content = format!(
            r#"
[api]
timeout_seconds = 0
{}"#,
            SHIPMENT
        );

        let config = TomlConfig::from_toml_str(&toml_content).unwrap();
        assert!(matches!(
            config.validate(),
            Err(RateError::InvalidConfigValue { field, .. }) if field == "api.timeout_seconds"
        ));
    }

    #[test]
    fn test_missing_shipment_is_parse_error() {
        let result = TomlConfig::from_toml_str("[api]\nendpoint = \"https://example.com\"\n");

        assert!(matches!(result, Err(RateError::ConfigValidation { .. })));
    }

    #[test]
    fn test_apply_overrides() {
        let mut api = ApiConfig {
            endpoint: Some("https://file.example.com/rate".to_string()),
            token: Some(Secret::new("file-token")),
            timeout_seconds: Some(10),
            transaction_source: None,
        };

        api.apply(ApiOverrides {
            endpoint: None,
            token: Some(Secret::new("env-token")),
            timeout_seconds: None,
            transaction_source: Some("rating".to_string()),
        });

        assert_eq!(api.endpoint.as_deref(), Some("https://file.example.com/rate"));
        assert_eq!(api.token.as_ref().map(Secret::expose), Some("env-token"));
        assert_eq!(api.timeout_seconds, Some(10));
        assert_eq!(api.transaction_source.as_deref(), Some("rating"));
    }

    #[test]
    fn test_config_from_file() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(SHIPMENT.as_bytes()).unwrap();

        let config = TomlConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.rate_request.shipment.service.code, "65");
        assert!(config.api.endpoint.is_none());
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let result = TomlConfig::from_file("/nonexistent/rate_quote.toml");

        assert!(matches!(result, Err(RateError::Config { .. })));
    }
}
