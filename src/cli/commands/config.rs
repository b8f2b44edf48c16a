//! Config command implementations

use crate::config::{ConfigError, ConfigOverrides, GlobalConfig};

/// Initialize configuration file with defaults
///
/// Global overrides given on the command line are written into the file.
pub fn init(overrides: ConfigOverrides) -> Result<(), ConfigError> {
    let mut config = GlobalConfig::default();
    crate::config::apply_overrides(&mut config, overrides)?;

    // Save to default location
    crate::config::save_config(&config, None)?;

    let config_path = crate::config::default_config_path()?;
    println!("✓ Configuration initialized");
    println!("  Config file:      {}", config_path.display());
    println!("  Contract account: {}", config.contract.account);
    println!("  RAM payer:        {}", config.contract.ram_payer);
    println!("  Core symbol:      {}", config.contract.core_symbol);
    println!("  RAM per account:  {} bytes", config.contract.ram_allocation_bytes);

    Ok(())
}
