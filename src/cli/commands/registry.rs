//! Registry administration commands

use crate::config::{load_config, ConfigError, ConfigOverrides};
use crate::error::ContractError;
use crate::manager::{ClaimManager, ManagerError};
use crate::provisioner::validate_address_text;
use crate::types::{Asset, AssetError};

use super::resolve_actor;

#[derive(Debug, thiserror::Error)]
pub enum RegistryCommandError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Manager error: {0}")]
    Manager(#[from] ManagerError),

    #[error("{0}")]
    Contract(#[from] ContractError),

    #[error("Invalid argument: {0}")]
    Asset(#[from] AssetError),
}

/// Add or replace a pending balance
pub fn add(
    address: String,
    balance: String,
    actor: Option<String>,
    overrides: ConfigOverrides,
) -> Result<(), RegistryCommandError> {
    let config = load_config(None, overrides)?;
    let actor = resolve_actor(actor, &config)?;
    let balance: Asset = balance.parse()?;

    let mut manager = ClaimManager::open(config)?;
    let record = manager.add(&actor, &address, &balance)?;

    println!("✓ Pending balance recorded");
    println!("  ID:      {}", record.id);
    println!("  Address: {}", record.ethereum_address);
    println!("  Balance: {}", record.balance);

    Ok(())
}

/// Move a pending balance to a different address
pub fn change_address(
    old_address: String,
    new_address: String,
    actor: Option<String>,
    overrides: ConfigOverrides,
) -> Result<(), RegistryCommandError> {
    let config = load_config(None, overrides)?;
    let actor = resolve_actor(actor, &config)?;

    let mut manager = ClaimManager::open(config)?;
    let record = manager.change_address(&actor, &old_address, &new_address)?;

    println!("✓ Pending balance moved");
    println!("  ID:      {}", record.id);
    println!("  Address: {}", record.ethereum_address);
    println!("  Balance: {}", record.balance);

    Ok(())
}

/// Set the RAM price ceiling
pub fn set_max_price(
    amount: String,
    actor: Option<String>,
    overrides: ConfigOverrides,
) -> Result<(), RegistryCommandError> {
    let config = load_config(None, overrides)?;
    let actor = resolve_actor(actor, &config)?;
    let amount: Asset = amount.parse()?;

    let mut manager = ClaimManager::open(config)?;
    manager.set_max_price(&actor, &amount)?;

    println!("✓ Maximum RAM price set to {}", amount);

    Ok(())
}

/// Show one pending balance
pub fn show(address: String, overrides: ConfigOverrides) -> Result<(), RegistryCommandError> {
    let config = load_config(None, overrides)?;
    let address = validate_address_text(&address).map_err(ContractError::from)?;

    let manager = ClaimManager::open(config)?;
    match manager.pending_balance(&address)? {
        Some(record) => {
            println!("Pending balance:");
            println!("  ID:      {}", record.id);
            println!("  Address: {}", record.ethereum_address);
            println!("  Balance: {}", record.balance);
        }
        None => println!("No pending balance for {}", address),
    }

    Ok(())
}

/// List all pending balances
pub fn list(overrides: ConfigOverrides) -> Result<(), RegistryCommandError> {
    let config = load_config(None, overrides)?;
    let manager = ClaimManager::open(config)?;

    let records = manager.pending_balances()?;
    let max_price = manager.max_price()?;

    match max_price {
        Some(price) => println!("Maximum RAM price: {}", price),
        None => println!("Maximum RAM price: not set"),
    }

    if records.is_empty() {
        println!("No pending balances");
        return Ok(());
    }

    println!("Pending balances ({}):", records.len());
    for record in records {
        println!(
            "  {:>6}  {}  {}",
            record.id, record.ethereum_address, record.balance
        );
    }

    Ok(())
}
