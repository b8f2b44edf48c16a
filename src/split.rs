//! Balance splitting policy
//!
//! A claimed balance is divided into a liquid part and two stake halves:
//!
//! | balance (minor units) | liquid  |
//! |-----------------------|---------|
//! | > 110000              | 100000  |
//! | > 30000               | 20000   |
//! | otherwise             | 1000    |
//!
//! The rest is staked, half to CPU and half to NET; NET takes the odd unit.

use crate::types::Asset;

/// Smallest balance that can be split
pub const MIN_SPLIT_BALANCE: i64 = 1000;

const LARGE_BALANCE: i64 = 110_000;
const MEDIUM_BALANCE: i64 = 30_000;

const LARGE_LIQUID: i64 = 100_000;
const MEDIUM_LIQUID: i64 = 20_000;
const SMALL_LIQUID: i64 = 1_000;

/// Split errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SplitError {
    #[error("Insufficient balance to split: {0}")]
    InsufficientBalance(Asset),

    #[error("Split of {balance} does not add up: net {net} + cpu {cpu} + liquid {liquid}")]
    SumMismatch {
        balance: Asset,
        net: Asset,
        cpu: Asset,
        liquid: Asset,
    },
}

/// Result of splitting a balance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplitBalance {
    pub stake_net: Asset,
    pub stake_cpu: Asset,
    pub liquid: Asset,
}

impl SplitBalance {
    /// Sum of all three parts, `None` on overflow
    pub fn total(&self) -> Option<i64> {
        self.stake_net
            .amount
            .checked_add(self.stake_cpu.amount)?
            .checked_add(self.liquid.amount)
    }
}

/// Split `balance` into stake and liquid parts
///
/// # Errors
///
/// `InsufficientBalance` below [`MIN_SPLIT_BALANCE`]; `SumMismatch` if the
/// parts do not add back up to the input.
///
/// # Example
///
/// ```
/// use unregd::split::split;
/// use unregd::types::Asset;
///
/// let parts = split(&"20.0000 EOS".parse::<Asset>().unwrap()).unwrap();
/// assert_eq!(parts.liquid.amount, 100_000);
/// assert_eq!(parts.stake_cpu.amount, 50_000);
/// assert_eq!(parts.stake_net.amount, 50_000);
/// ```
pub fn split(balance: &Asset) -> Result<SplitBalance, SplitError> {
    let amount = balance.amount;
    if amount < MIN_SPLIT_BALANCE {
        return Err(SplitError::InsufficientBalance(balance.clone()));
    }

    let liquid = if amount > LARGE_BALANCE {
        LARGE_LIQUID
    } else if amount > MEDIUM_BALANCE {
        MEDIUM_LIQUID
    } else {
        SMALL_LIQUID
    };

    let to_split = amount - liquid;
    let cpu = to_split / 2;
    let net = to_split - cpu;

    let symbol = balance.symbol.clone();
    let parts = SplitBalance {
        stake_net: Asset::new(net, symbol.clone()),
        stake_cpu: Asset::new(cpu, symbol.clone()),
        liquid: Asset::new(liquid, symbol),
    };

    if parts.total() != Some(amount) {
        return Err(SplitError::SumMismatch {
            balance: balance.clone(),
            net: parts.stake_net,
            cpu: parts.stake_cpu,
            liquid: parts.liquid,
        });
    }

    Ok(parts)
}
