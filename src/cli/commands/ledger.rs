//! Local host ledger commands

use crate::config::{load_config, ConfigError, ConfigOverrides};
use crate::error::ContractError;
use crate::ledger::LedgerError;
use crate::manager::{ClaimManager, ManagerError};
use crate::types::{AccountName, Asset, AssetError};

use super::resolve_actor;

#[derive(Debug, thiserror::Error)]
pub enum LedgerCommandError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Manager error: {0}")]
    Manager(#[from] ManagerError),

    #[error("{0}")]
    Contract(#[from] ContractError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),

    #[error("Invalid argument: {0}")]
    Asset(#[from] AssetError),
}

/// Credit new tokens to an account
pub fn issue(
    to: String,
    quantity: String,
    memo: String,
    overrides: ConfigOverrides,
) -> Result<(), LedgerCommandError> {
    let config = load_config(None, overrides)?;
    let to: AccountName = to.parse()?;
    let quantity: Asset = quantity.parse()?;

    let mut manager = ClaimManager::open(config)?;
    manager.issue(&to, &quantity, &memo)?;

    println!("✓ Issued {} to {}", quantity, to);

    Ok(())
}

/// Create an account controlled by a single key
pub fn create_account(
    name: String,
    public_key: String,
    creator: Option<String>,
    overrides: ConfigOverrides,
) -> Result<(), LedgerCommandError> {
    let config = load_config(None, overrides)?;
    let creator = resolve_actor(creator, &config)?;
    let name: AccountName = name.parse()?;

    let mut manager = ClaimManager::open(config)?;
    manager.create_account(&creator, &name, &public_key)?;

    println!("✓ Account '{}' created by {}", name, creator);

    Ok(())
}

/// Reset the RAM market reserves
pub fn set_ram_market(
    base_bytes: u64,
    quote: String,
    overrides: ConfigOverrides,
) -> Result<(), LedgerCommandError> {
    let config = load_config(None, overrides)?;
    let quote: Asset = quote.parse()?;

    let mut manager = ClaimManager::open(config)?;
    manager.set_ram_market(base_bytes, &quote)?;

    let price = manager
        .ram_market()?
        .ok_or(LedgerError::RamMarketMissing)?
        .price_for(manager.config().contract.ram_allocation_bytes)?;

    println!("✓ RAM market set: {} bytes against {}", base_bytes, quote);
    println!(
        "  Price of {} bytes: {}",
        manager.config().contract.ram_allocation_bytes,
        price
    );

    Ok(())
}

/// Show an account with its balance, stake and RAM
pub fn account(name: String, overrides: ConfigOverrides) -> Result<(), LedgerCommandError> {
    let config = load_config(None, overrides)?;
    let name: AccountName = name.parse()?;

    let manager = ClaimManager::open(config)?;
    let Some(info) = manager.account_info(&name)? else {
        println!("Account '{}' does not exist", name);
        return Ok(());
    };

    let ledger = manager.ledger();
    let symbol = &manager.config().contract.core_symbol;
    let balance = ledger.balance_of(&name, symbol)?;

    println!("Account: {}", info.name);
    println!("  Creator:  {}", info.creator);
    println!("  Created:  {}", info.created_at.to_rfc3339());
    for key in &info.owner.keys {
        println!("  Owner:    {} (weight {})", key.key, key.weight);
    }
    for key in &info.active.keys {
        println!("  Active:   {} (weight {})", key.key, key.weight);
    }
    println!("  Liquid:   {}", balance);
    match ledger.stake_of(&name, &name)? {
        Some((net, cpu)) => println!("  Staked:   net {}, cpu {}", net, cpu),
        None => println!("  Staked:   none"),
    }
    println!("  RAM:      {} bytes", info.ram_bytes);

    Ok(())
}
