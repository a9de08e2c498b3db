pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

#[cfg(feature = "cli")]
pub use crate::config::CliConfig;

pub use crate::config::{ApiOverrides, ClientSettings, TomlConfig};
pub use crate::core::{client::RateClient, engine::QuoteEngine};
pub use crate::domain::model::RateRequest;
pub use crate::utils::error::{RateError, Result};
