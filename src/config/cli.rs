use crate::config::env::ApiOverrides;
use crate::config::toml_config::MAX_TIMEOUT_SECONDS;
use crate::utils::error::Result;
use crate::utils::redact::Secret;
use crate::utils::validation::{validate_range, validate_url, Validate};
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone, Parser)]
#[command(name = "rate-quote")]
#[command(about = "Request a shipping rate quote from a carrier rating API")]
pub struct CliConfig {
    #[arg(long, short, default_value = "rate_quote.toml", help = "Path to the TOML config file")]
    pub config: PathBuf,

    #[arg(long, help = "Rating endpoint URL (overrides api.endpoint)")]
    pub endpoint: Option<String>,

    #[arg(long, env = "RATE_QUOTE_TOKEN", hide_env_values = true, help = "Bearer token")]
    pub token: Option<Secret>,

    #[arg(long, help = "Request timeout in seconds")]
    pub timeout_seconds: Option<u64>,

    #[arg(long, help = "Value sent in the transactionSrc header")]
    pub transaction_source: Option<String>,

    #[arg(long, help = "Print a table of rated services instead of the raw response")]
    pub summary: bool,

    #[arg(long, help = "Print the endpoint, headers and payload before sending")]
    pub dump_request: bool,

    #[arg(
        long,
        requires = "dump_request",
        help = "Show the bearer token in the request dump instead of redacting it"
    )]
    pub reveal_credentials: bool,

    #[arg(long, value_enum, default_value_t = LogFormat::Text)]
    pub log_format: LogFormat,

    #[arg(long, short, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn api_overrides(&self) -> ApiOverrides {
        ApiOverrides {
            endpoint: self.endpoint.clone(),
            token: self.token.clone(),
            timeout_seconds: self.timeout_seconds,
            transaction_source: self.transaction_source.clone(),
        }
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        if let Some(endpoint) = &self.endpoint {
            validate_url("--endpoint", endpoint)?;
        }
        if let Some(timeout) = self.timeout_seconds {
            validate_range("--timeout-seconds", timeout, 1, MAX_TIMEOUT_SECONDS)?;
        }
        Ok(())
    }
}
