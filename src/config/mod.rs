use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::{
    core::utils::{ensure_dir, PathResolver},
    errors::{LedgerError, Result},
    ledger::SummaryPeriod,
    utils::persistence::{read_json, write_json_atomic},
};

const DEFAULT_API_URL: &str = "http://127.0.0.1:5000";
const DEFAULT_LEDGER: &str = "default";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Base URL of the finance backend.
    #[serde(default = "Config::default_api_url")]
    pub api_url: String,
    #[serde(default = "Config::default_currency_symbol")]
    pub currency_symbol: String,
    #[serde(default)]
    pub default_period: SummaryPeriod,
    #[serde(default = "Config::default_ledger")]
    pub ledger_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_url: Self::default_api_url(),
            currency_symbol: Self::default_currency_symbol(),
            default_period: SummaryPeriod::default(),
            ledger_name: Self::default_ledger(),
        }
    }
}

impl Config {
    pub const KEYS: [&'static str; 4] =
        ["api_url", "currency_symbol", "default_period", "ledger_name"];

    fn default_api_url() -> String {
        DEFAULT_API_URL.into()
    }

    fn default_currency_symbol() -> String {
        "$".into()
    }

    fn default_ledger() -> String {
        DEFAULT_LEDGER.into()
    }

    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        let value = value.trim();
        match key.to_ascii_lowercase().as_str() {
            "api_url" => {
                if !(value.starts_with("http://") || value.starts_with("https://")) {
                    return Err(LedgerError::validation(
                        "api_url",
                        "must start with http:// or https://",
                    ));
                }
                self.api_url = value.trim_end_matches('/').to_string();
            }
            "currency_symbol" => self.currency_symbol = value.to_string(),
            "default_period" => {
                let period = SummaryPeriod::from_tag(value);
                if let SummaryPeriod::Unrecognized(tag) = period {
                    return Err(LedgerError::validation(
                        "default_period",
                        format!("`{tag}` is not one of weekly, monthly, all"),
                    ));
                }
                self.default_period = period;
            }
            "ledger_name" => {
                if value.is_empty() {
                    return Err(LedgerError::validation("ledger_name", "must not be empty"));
                }
                self.ledger_name = value.to_string();
            }
            other => {
                return Err(LedgerError::InvalidRef(format!(
                    "unknown config key `{other}`"
                )))
            }
        }
        Ok(())
    }

    pub fn get_value(&self, key: &str) -> Option<String> {
        match key.to_ascii_lowercase().as_str() {
            "api_url" => Some(self.api_url.clone()),
            "currency_symbol" => Some(self.currency_symbol.clone()),
            "default_period" => Some(self.default_period.tag().to_string()),
            "ledger_name" => Some(self.ledger_name.clone()),
            _ => None,
        }
    }
}

pub struct ConfigManager {
    path: PathBuf,
}

impl ConfigManager {
    pub fn new() -> Result<Self> {
        Self::from_base(PathResolver::base_dir())
    }

    pub fn with_base_dir(base: PathBuf) -> Result<Self> {
        Self::from_base(base)
    }

    fn from_base(base: PathBuf) -> Result<Self> {
        ensure_dir(&base)?;
        ensure_dir(&PathResolver::config_dir_in(&base))?;
        Ok(Self {
            path: PathResolver::config_file_in(&base),
        })
    }

    pub fn load(&self) -> Result<Config> {
        if self.path.exists() {
            read_json(&self.path)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self, config: &Config) -> Result<()> {
        write_json_atomic(config, &self.path)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}
