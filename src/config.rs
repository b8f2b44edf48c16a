//! Configuration types for unregd
//!
//! Manages the contract identity (its own account, the RAM payer, the core
//! token symbol), the initial RAM allocation and where the database lives.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::types::{AccountName, Symbol};

/// Global configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalConfig {
    pub contract: ContractConfig,
    pub storage: StorageConfig,
}

/// Contract identity and claim policy
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContractConfig {
    /// The contract's own account; the only actor allowed to administer it
    ///
    /// Also creates claimed accounts and funds their stake and liquid balance.
    pub account: AccountName,

    /// Account that pays for the initial RAM of claimed accounts
    pub ram_payer: AccountName,

    /// Native token symbol; balances and price ceilings must use it
    pub core_symbol: Symbol,

    /// RAM bought for each claimed account, in bytes
    pub ram_allocation_bytes: u64,
}

/// Database location and locking
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Optional custom data directory (defaults to `~/.unregd/data`)
    pub data_dir: Option<String>,

    /// How long a writer waits on the database lock, in milliseconds
    pub busy_timeout_ms: u64,
}

impl StorageConfig {
    pub fn busy_timeout(&self) -> Duration {
        Duration::from_millis(self.busy_timeout_ms)
    }
}

impl Default for GlobalConfig {
    fn default() -> Self {
        Self {
            contract: ContractConfig {
                account: AccountName::new("eosio.unregd").expect("valid default account"),
                ram_payer: AccountName::new("eosio.regram").expect("valid default account"),
                core_symbol: Symbol::new(4, "EOS").expect("valid default symbol"),
                ram_allocation_bytes: 8 * 1024,
            },
            storage: StorageConfig {
                data_dir: None,
                busy_timeout_ms: 5_000,
            },
        }
    }
}

impl GlobalConfig {
    /// Resolve the data directory (custom or default)
    pub fn data_dir(&self) -> Result<PathBuf, ConfigError> {
        match &self.storage.data_dir {
            Some(dir) => Ok(PathBuf::from(dir)),
            None => Ok(default_config_dir()?.join("data")),
        }
    }
}

/// Configuration error types
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Config directory not found")]
    DirectoryNotFound,
}

/// Configuration overrides from CLI arguments or environment variables
#[derive(Debug, Default, Clone)]
pub struct ConfigOverrides {
    pub contract_account: Option<String>,
    pub ram_payer: Option<String>,
    pub core_symbol: Option<String>,
    pub ram_allocation_bytes: Option<u64>,
    pub data_dir: Option<String>,
}

impl ConfigOverrides {
    /// Create empty overrides
    pub fn new() -> Self {
        Self::default()
    }

    /// Create overrides from `UNREGD_*` environment variables
    pub fn from_env() -> Self {
        Self {
            contract_account: std::env::var("UNREGD_CONTRACT_ACCOUNT").ok(),
            ram_payer: std::env::var("UNREGD_RAM_PAYER").ok(),
            core_symbol: std::env::var("UNREGD_CORE_SYMBOL").ok(),
            ram_allocation_bytes: std::env::var("UNREGD_RAM_BYTES")
                .ok()
                .and_then(|s| s.parse().ok()),
            data_dir: std::env::var("UNREGD_DATA_DIR").ok(),
        }
    }

    /// Merge with another set of overrides (other takes precedence)
    pub fn merge(mut self, other: Self) -> Self {
        if other.contract_account.is_some() {
            self.contract_account = other.contract_account;
        }
        if other.ram_payer.is_some() {
            self.ram_payer = other.ram_payer;
        }
        if other.core_symbol.is_some() {
            self.core_symbol = other.core_symbol;
        }
        if other.ram_allocation_bytes.is_some() {
            self.ram_allocation_bytes = other.ram_allocation_bytes;
        }
        if other.data_dir.is_some() {
            self.data_dir = other.data_dir;
        }
        self
    }
}

/// Get the default configuration directory path
///
/// Returns: `~/.unregd/`
pub fn default_config_dir() -> Result<PathBuf, ConfigError> {
    dirs::home_dir()
        .map(|home| home.join(".unregd"))
        .ok_or(ConfigError::DirectoryNotFound)
}

/// Get the default configuration file path
///
/// Returns: `~/.unregd/config.json`
pub fn default_config_path() -> Result<PathBuf, ConfigError> {
    Ok(default_config_dir()?.join("config.json"))
}

/// Load configuration from file with overrides
///
/// # Priority (highest to lowest):
/// 1. CLI overrides (passed as argument)
/// 2. Environment variables
/// 3. Config file
/// 4. Defaults
///
/// # Example
///
/// ```ignore
/// use unregd::config::{load_config, ConfigOverrides};
///
/// let mut cli_overrides = ConfigOverrides::new();
/// cli_overrides.data_dir = Some("/tmp/unregd".to_string());
///
/// let config = load_config(None, cli_overrides)?;
/// ```
pub fn load_config(
    config_path: Option<&Path>,
    cli_overrides: ConfigOverrides,
) -> Result<GlobalConfig, ConfigError> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    let mut config = if path.exists() {
        let contents = std::fs::read_to_string(&path)?;
        serde_json::from_str(&contents)?
    } else {
        GlobalConfig::default()
    };

    let overrides = ConfigOverrides::from_env().merge(cli_overrides);
    apply_overrides(&mut config, overrides)?;

    Ok(config)
}

/// Save configuration to file
///
/// Creates parent directories if they don't exist.
pub fn save_config(config: &GlobalConfig, config_path: Option<&Path>) -> Result<(), ConfigError> {
    let path = match config_path {
        Some(p) => p.to_path_buf(),
        None => default_config_path()?,
    };

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config)?;
    std::fs::write(&path, json)?;

    Ok(())
}

/// Apply configuration overrides
pub fn apply_overrides(config: &mut GlobalConfig, overrides: ConfigOverrides) -> Result<(), ConfigError> {
    if let Some(account) = overrides.contract_account {
        config.contract.account = account
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("contract account: {}", e)))?;
    }
    if let Some(payer) = overrides.ram_payer {
        config.contract.ram_payer = payer
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("RAM payer: {}", e)))?;
    }
    if let Some(symbol) = overrides.core_symbol {
        config.contract.core_symbol = symbol
            .parse()
            .map_err(|e| ConfigError::Invalid(format!("core symbol: {}", e)))?;
    }
    if let Some(bytes) = overrides.ram_allocation_bytes {
        if bytes == 0 {
            return Err(ConfigError::Invalid("RAM allocation must be positive".to_string()));
        }
        config.contract.ram_allocation_bytes = bytes;
    }
    if let Some(data_dir) = overrides.data_dir {
        config.storage.data_dir = Some(data_dir);
    }
    Ok(())
}
