#[cfg(feature = "cli")]
pub mod cli;
pub mod env;
pub mod settings;
pub mod toml_config;

#[cfg(feature = "cli")]
pub use cli::{CliConfig, LogFormat};
pub use env::ApiOverrides;
pub use settings::ClientSettings;
pub use toml_config::{ApiConfig, TomlConfig};
