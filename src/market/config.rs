//! Endpoint and credential configuration for the market adapters.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::time::Duration;

/// Default location of the optional config file (extension is inferred).
pub const DEFAULT_CONFIG_PATH: &str = "config/dashboard";

/// Environment variable prefix, e.g. `BUDGET_DASH__FRED_API_KEY`.
pub const ENV_PREFIX: &str = "BUDGET_DASH";

/// Where the adapters fetch from and which keys they use.
///
/// Keys are never compiled in; they come from a config file or the
/// environment.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct MarketConfig {
    /// Per-request timeout in seconds.
    pub timeout_secs: u64,
    pub user_agent: String,
    pub quotes_base_url: String,
    pub rates_base_url: String,
    pub metals_base_url: String,
    pub metals_api_key: Option<String>,
    pub crypto_base_url: String,
    pub fred_base_url: String,
    pub fred_api_key: Option<String>,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: concat!("budget-engine/", env!("CARGO_PKG_VERSION")).to_string(),
            quotes_base_url: "https://query1.finance.yahoo.com".to_string(),
            rates_base_url: "https://api.exchangerate-api.com".to_string(),
            metals_base_url: "https://metals-api.com/api".to_string(),
            metals_api_key: None,
            crypto_base_url: "https://api.coingecko.com/api/v3".to_string(),
            fred_base_url: "https://api.stlouisfed.org/fred".to_string(),
            fred_api_key: None,
        }
    }
}

impl std::fmt::Debug for MarketConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        fn redact(key: &Option<String>) -> &'static str {
            if key.is_some() {
                "<redacted>"
            } else {
                "<unset>"
            }
        }
        f.debug_struct("MarketConfig")
            .field("timeout_secs", &self.timeout_secs)
            .field("user_agent", &self.user_agent)
            .field("quotes_base_url", &self.quotes_base_url)
            .field("rates_base_url", &self.rates_base_url)
            .field("metals_base_url", &self.metals_base_url)
            .field("metals_api_key", &redact(&self.metals_api_key))
            .field("crypto_base_url", &self.crypto_base_url)
            .field("fred_base_url", &self.fred_base_url)
            .field("fred_api_key", &redact(&self.fred_api_key))
            .finish()
    }
}

impl MarketConfig {
    /// Load from `config/dashboard.{toml,...}` (optional) and the environment.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(DEFAULT_CONFIG_PATH)
    }

    /// Load from the given file (optional) and the environment.
    ///
    /// Environment variables win over the file.
    pub fn load_from(path: &str) -> Result<Self, ConfigError> {
        let builder = Config::builder()
            .add_source(File::with_name(path).required(false))
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true),
            );
        Self::build(builder)
    }

    /// Parse a TOML document. Missing keys keep their defaults.
    pub fn from_toml_str(toml: &str) -> Result<Self, ConfigError> {
        Self::build(Config::builder().add_source(File::from_str(toml, FileFormat::Toml)))
    }

    fn build(builder: ConfigBuilder<DefaultState>) -> Result<Self, ConfigError> {
        let config: Self = builder.build()?.try_deserialize()?;
        log::debug!("market config: {:?}", config);
        Ok(config)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.max(1))
    }
}
