//! Host ledger interface
//!
//! The contract provisions accounts through these primitives: account
//! directory, token ledger, staking and the RAM market. `LocalLedger` is a
//! SQLite implementation sharing the contract's database.

pub mod local;

use serde::{Deserialize, Serialize};

use crate::codec::PublicKey;
use crate::types::{AccountName, Asset, AssetError};

pub use local::{AccountInfo, LocalLedger, RamMarket};

/// Host ledger errors
#[derive(Debug, thiserror::Error)]
pub enum LedgerError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Asset error: {0}")]
    Asset(#[from] AssetError),

    #[error("Account not found: {0}")]
    AccountNotFound(AccountName),

    #[error("Account already exists: {0}")]
    AccountExists(AccountName),

    #[error("Insufficient funds in {account}: has {available}, needs {required}")]
    InsufficientFunds {
        account: AccountName,
        available: Asset,
        required: Asset,
    },

    #[error("Quantity must be positive: {0}")]
    NonPositiveQuantity(Asset),

    #[error("RAM market is not initialized")]
    RamMarketMissing,

    #[error("RAM market cannot supply {0} bytes")]
    InsufficientRam(u64),

    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// Key and its voting weight within an authority
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyWeight {
    pub key: PublicKey,
    pub weight: u16,
}

/// Permission authority: satisfied when key weights reach `threshold`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    pub threshold: u32,
    pub keys: Vec<KeyWeight>,
}

impl Authority {
    /// Threshold-1 authority over a single weight-1 key
    pub fn single_key(key: PublicKey) -> Self {
        Self {
            threshold: 1,
            keys: vec![KeyWeight { key, weight: 1 }],
        }
    }

    /// Authority no key can satisfy, used for system accounts
    pub fn empty() -> Self {
        Self {
            threshold: 1,
            keys: Vec::new(),
        }
    }
}

/// Primitives the contract consumes from the host chain
///
/// Every call is expected to run inside the caller's atomic unit: if a later
/// step fails, the effects of earlier calls are discarded with it.
pub trait HostLedger {
    fn account_exists(&self, name: &AccountName) -> Result<bool, LedgerError>;

    fn create_account(
        &self,
        creator: &AccountName,
        name: &AccountName,
        owner: &Authority,
        active: &Authority,
    ) -> Result<(), LedgerError>;

    /// Tokens needed to buy `bytes` of RAM at the current market price
    fn ram_price_for(&self, bytes: u64) -> Result<Asset, LedgerError>;

    /// Spend `tokens` from `payer` on RAM for `receiver`; returns bytes bought
    fn buy_ram(
        &self,
        payer: &AccountName,
        receiver: &AccountName,
        tokens: &Asset,
    ) -> Result<u64, LedgerError>;

    /// Stake `net` and `cpu` from `from` to `receiver`
    ///
    /// With `transfer` set, the stake is owned by the receiver.
    fn delegate_stake(
        &self,
        from: &AccountName,
        receiver: &AccountName,
        net: &Asset,
        cpu: &Asset,
        transfer: bool,
    ) -> Result<(), LedgerError>;

    fn transfer(
        &self,
        from: &AccountName,
        to: &AccountName,
        quantity: &Asset,
        memo: &str,
    ) -> Result<(), LedgerError>;

    fn issue(&self, to: &AccountName, quantity: &Asset, memo: &str) -> Result<(), LedgerError>;
}
