//! Ledger configuration with TOML file support.

use serde::{Deserialize, Serialize};
use sprout_types::{AccountId, Rate};

use crate::LedgerError;

/// Per-second rate new ledgers start with (5e10 at 1e18 precision).
pub const DEFAULT_GLOBAL_RATE: u64 = 50_000_000_000;

/// Configuration for a ledger instance.
///
/// Can be loaded from a TOML file via [`LedgerConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Account holding the admin capability.
    #[serde(default = "default_admin")]
    pub admin: AccountId,

    /// Initial global rate, per second at 1e18 precision.
    #[serde(default = "default_rate_per_second")]
    pub initial_rate_per_second: u64,

    /// Initial global rate as a simple annual figure in basis points.
    /// Converted to the per-second convention; overrides
    /// `initial_rate_per_second` when set.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_apy_bps: Option<u64>,

    /// Accounts granted the mint-and-burn capability at start.
    #[serde(default)]
    pub minters: Vec<AccountId>,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Serde default helpers ──────────────────────────────────────────────

fn default_admin() -> AccountId {
    AccountId::new("admin")
}

fn default_rate_per_second() -> u64 {
    DEFAULT_GLOBAL_RATE
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

// ── Impl ───────────────────────────────────────────────────────────────

impl LedgerConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<std::path::Path>) -> Result<Self, LedgerError> {
        let content =
            std::fs::read_to_string(path).map_err(|e| LedgerError::Config(e.to_string()))?;
        Self::from_toml_str(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, LedgerError> {
        toml::from_str(s).map_err(|e| LedgerError::Config(e.to_string()))
    }

    /// Serialize the configuration to a TOML string.
    pub fn to_toml_string(&self) -> Result<String, LedgerError> {
        toml::to_string_pretty(self).map_err(|e| LedgerError::Config(e.to_string()))
    }

    /// The starting global rate in the per-second convention.
    pub fn initial_rate(&self) -> Result<Rate, LedgerError> {
        match self.initial_apy_bps {
            Some(bps) => Rate::from_annual_bps(bps as u128)
                .ok_or_else(|| LedgerError::Config(format!("initial_apy_bps {bps} out of range"))),
            None => Ok(Rate::new(self.initial_rate_per_second as u128)),
        }
    }
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            admin: default_admin(),
            initial_rate_per_second: default_rate_per_second(),
            initial_apy_bps: None,
            minters: Vec::new(),
            log_format: default_log_format(),
            log_level: default_log_level(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_round_trips_through_toml() {
        let config = LedgerConfig::default();
        let toml_str = config.to_toml_string().expect("should serialize");
        let parsed = LedgerConfig::from_toml_str(&toml_str).expect("should parse");
        assert_eq!(parsed.admin, config.admin);
        assert_eq!(parsed.initial_rate_per_second, config.initial_rate_per_second);
        assert_eq!(parsed.initial_apy_bps, None);
    }

    #[test]
    fn minimal_toml_uses_defaults() {
        let config = LedgerConfig::from_toml_str("").expect("empty toml should use defaults");
        assert_eq!(config.admin, AccountId::new("admin"));
        assert_eq!(config.initial_rate().unwrap(), Rate::new(DEFAULT_GLOBAL_RATE as u128));
        assert_eq!(config.log_format, "human");
        assert!(config.minters.is_empty());
    }

    #[test]
    fn partial_toml_overrides() {
        let toml = r#"
            admin = "treasury"
            minters = ["vault"]
            initial_apy_bps = 500
        "#;
        let config = LedgerConfig::from_toml_str(toml).expect("should parse");
        assert_eq!(config.admin, AccountId::new("treasury"));
        assert_eq!(config.minters, vec![AccountId::new("vault")]);
        assert_eq!(config.initial_rate().unwrap(), Rate::from_annual_bps(500).unwrap());
        assert_eq!(config.log_level, "info"); // default
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "initial_rate_per_second = 1234").unwrap();
        let config = LedgerConfig::from_toml_file(file.path()).expect("should load");
        assert_eq!(config.initial_rate().unwrap(), Rate::new(1234));
    }

    #[test]
    fn missing_file_returns_config_error() {
        let result = LedgerConfig::from_toml_file("/nonexistent/sprout.toml");
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }

    #[test]
    fn malformed_toml_returns_config_error() {
        let result = LedgerConfig::from_toml_str("initial_rate_per_second = \"fast\"");
        assert!(matches!(result, Err(LedgerError::Config(_))));
    }
}
