use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;

use chrono_tz::Tz;

use crate::clients::page_client::DEFAULT_TIMEOUT;
use crate::models::error::ConfigError;
use crate::service::event_pipeline::DEFAULT_EVENT_HOST;

const DEFAULT_CONFIG_FILE: &str = ".env";

/// Key/value pairs from a dotenv-style file.
#[derive(Debug, Default, Clone)]
pub struct AppConfig {
    values: HashMap<String, String>,
}

impl AppConfig {
    /// Reads `CONFIG_FILE`, or `.env` when it exists; empty otherwise.
    pub fn load() -> Result<Self, ConfigError> {
        match env::var("CONFIG_FILE") {
            Ok(path) => Self::from_file(&path),
            Err(_) if Path::new(DEFAULT_CONFIG_FILE).exists() => Self::from_file(DEFAULT_CONFIG_FILE),
            Err(_) => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &str) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
            path: path.to_string(),
            reason: e.to_string(),
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut values = HashMap::new();
        for (idx, line) in content.lines().enumerate() {
            let trimmed = line.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }
            let trimmed = trimmed.strip_prefix("export ").unwrap_or(trimmed);
            let Some((key, value)) = trimmed.split_once('=') else {
                return Err(ConfigError::InvalidLine {
                    line: idx + 1,
                    content: line.to_string(),
                });
            };
            let key = key.trim();
            let mut value = value.trim().to_string();
            if value.len() >= 2
                && ((value.starts_with('"') && value.ends_with('"'))
                    || (value.starts_with('\'') && value.ends_with('\'')))
            {
                value = value[1..value.len() - 1].to_string();
            }
            values.insert(key.to_string(), value);
        }
        Ok(Self { values })
    }

    /// File value first, then the process environment.
    pub fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .cloned()
            .or_else(|| env::var(key).ok())
            .filter(|v| !v.trim().is_empty())
    }

    fn require(&self, key: &'static str) -> Result<String, ConfigError> {
        self.get(key).ok_or(ConfigError::Missing(key))
    }

    fn require_id(&self, key: &'static str) -> Result<u64, ConfigError> {
        let value = self.require(key)?;
        value
            .trim()
            .parse::<u64>()
            .map_err(|_| ConfigError::Invalid { key, value })
    }
}

/// Settings needed to scrape pages, independent of Discord credentials.
#[derive(Debug, Clone)]
pub struct ScrapeSettings {
    pub timezone: Tz,
    pub event_host: String,
    pub fetch_timeout: Duration,
}

impl ScrapeSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        let timezone = match config.get("EVENT_TIMEZONE") {
            Some(name) => name
                .trim()
                .parse::<Tz>()
                .map_err(|_| ConfigError::Invalid {
                    key: "EVENT_TIMEZONE",
                    value: name,
                })?,
            None => Tz::UTC,
        };
        let fetch_timeout = match config.get("FETCH_TIMEOUT_SECS") {
            Some(secs) => secs
                .trim()
                .parse::<u64>()
                .ok()
                .filter(|s| *s > 0)
                .map(Duration::from_secs)
                .ok_or(ConfigError::Invalid {
                    key: "FETCH_TIMEOUT_SECS",
                    value: secs,
                })?,
            None => DEFAULT_TIMEOUT,
        };
        Ok(Self {
            timezone,
            event_host: config
                .get("EVENT_HOST")
                .unwrap_or_else(|| DEFAULT_EVENT_HOST.to_string()),
            fetch_timeout,
        })
    }
}

#[derive(Debug, Clone)]
pub struct BotSettings {
    pub discord_token: String,
    pub guild_id: u64,
    pub scrape: ScrapeSettings,
}

impl BotSettings {
    pub fn from_config(config: &AppConfig) -> Result<Self, ConfigError> {
        Ok(Self {
            discord_token: config.require("DISCORD_TOKEN")?,
            guild_id: config.require_id("GUILD_ID")?,
            scrape: ScrapeSettings::from_config(config)?,
        })
    }

    pub fn application_id(config: &AppConfig) -> Result<u64, ConfigError> {
        config.require_id("CLIENT_ID")
    }
}
