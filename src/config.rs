use std::env;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::Deserialize;

/// Fallback listener port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 18018;

const STRIPE_TEST_KEY_PREFIX: &str = "sk_test_";

/// Top-level application configuration loaded from file + environment.
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub stripe: StripeSection,
    pub webhookdb: WebhookdbSection,
    pub logging: LoggingSection,
}

impl AppConfig {
    /// Load configuration from disk and environment.
    ///
    /// The flat `STRIPE_API_KEY` / `WEBHOOKDB_URL` / `WEBHOOKDB_TABLE` /
    /// `PORT` variables stay authoritative over anything in the file, so the
    /// service keeps working with the same environment the original demos
    /// documented.
    pub fn load() -> Result<Self> {
        let config_path = env::var("DEMO_CONFIG").unwrap_or_else(|_| "config.toml".to_string());

        let mut builder = config::Config::builder();

        if Path::new(&config_path).exists() {
            builder = builder.add_source(config::File::from(PathBuf::from(&config_path)));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("DEMO")
                .separator("_")
                .try_parsing(true),
        );

        let settings = builder.build()?;
        let mut config: Self = settings.try_deserialize()?;

        if let Ok(key) = env::var("STRIPE_API_KEY") {
            config.stripe.api_key = key;
        }
        if let Ok(url) = env::var("WEBHOOKDB_URL") {
            config.webhookdb.url = url;
        }
        if let Ok(table) = env::var("WEBHOOKDB_TABLE") {
            config.webhookdb.table = table;
        }
        if let Ok(port) = env::var("PORT") {
            config.server.port = Some(port.parse().context("invalid PORT")?);
        }

        if config.logging.level.trim().is_empty() {
            config.logging.level = "info".to_string();
        }

        config.validate()?;

        Ok(config)
    }

    /// Reject configurations the service must not start with.
    pub fn validate(&self) -> Result<()> {
        if self.stripe.api_key.trim().is_empty() {
            bail!("Must set STRIPE_API_KEY");
        }
        if !self.stripe.api_key.starts_with(STRIPE_TEST_KEY_PREFIX) {
            bail!(
                "This app only works with your Stripe private test key ({} prefix)",
                STRIPE_TEST_KEY_PREFIX
            );
        }
        if self.webhookdb.url.trim().is_empty() {
            bail!("Must set WEBHOOKDB_URL");
        }
        if self.webhookdb.table.trim().is_empty() {
            bail!("Must set WEBHOOKDB_TABLE");
        }
        // The table name is interpolated into the search SQL, so it must be
        // a plain (optionally schema-qualified) identifier.
        if !is_sql_identifier(&self.webhookdb.table) {
            bail!(
                "WEBHOOKDB_TABLE must be a plain SQL identifier, got '{}'",
                self.webhookdb.table
            );
        }
        Ok(())
    }
}

fn is_sql_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    let leading_ok = matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_');
    leading_ok && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '.')
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub host: String,
    /// Listener port; `None` falls back to [`DEFAULT_PORT`].
    pub port: Option<u16>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct StripeSection {
    pub api_key: String,
    /// Upstream API origin; tests point this at a stub server.
    pub api_base: String,
}

impl Default for StripeSection {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            api_base: "https://api.stripe.com".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct WebhookdbSection {
    /// Connection string for the database holding the replicated resources.
    pub url: String,
    /// Table populated by the WebhookDB ingestion process.
    pub table: String,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct LoggingSection {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}
