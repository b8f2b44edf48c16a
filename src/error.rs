//! Contract error taxonomy
//!
//! Every rejected operation maps to one [`ErrorKind`]. Only
//! `InternalInvariant` is fatal: it means the contract's own arithmetic is
//! wrong and no retry can succeed.

use crate::codec::CodecError;
use crate::crypto::CryptoError;
use crate::ledger::LedgerError;
use crate::split::SplitError;
use crate::storage::StorageError;
use crate::types::{AccountName, Asset, AssetError};

/// Malformed request shape, rejected before any state is read
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("Signature must be exactly {expected} bytes, got {actual}")]
    SignatureLength { expected: usize, actual: usize },

    #[error("Account name must be exactly 12 characters, got {0}")]
    AccountNameLength(usize),

    #[error("Account name may only contain a-z and 1-5, found {0:?}")]
    AccountNameCharacter(char),

    #[error("Ethereum address should have exactly 42 characters, got {0}")]
    AddressLength(usize),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Asset(#[from] AssetError),
}

/// Claim refused by contract policy
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PolicyError {
    #[error("No maximum RAM price configured")]
    PriceCeilingUnset,

    #[error("Price of RAM too high: {price} exceeds maximum {ceiling}")]
    PriceTooHigh { price: Asset, ceiling: Asset },

    #[error("Insufficient balance to split: {0}")]
    InsufficientBalance(Asset),
}

/// Error class reported to callers
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Format,
    NotFound,
    Conflict,
    Policy,
    Crypto,
    Unauthorized,
    InternalInvariant,
    Storage,
    Ledger,
}

/// Errors returned by contract operations
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    #[error("Format error: {0}")]
    Format(#[from] FormatError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Policy error: {0}")]
    Policy(#[from] PolicyError),

    #[error("Crypto error: {0}")]
    Crypto(#[from] CryptoError),

    #[error("Missing required authority of {0}")]
    Unauthorized(AccountName),

    #[error("Internal invariant violated: {0}")]
    InternalInvariant(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] LedgerError),
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ContractError::Format(_) => ErrorKind::Format,
            ContractError::NotFound(_) => ErrorKind::NotFound,
            ContractError::Conflict(_) => ErrorKind::Conflict,
            ContractError::Policy(_) => ErrorKind::Policy,
            ContractError::Crypto(_) => ErrorKind::Crypto,
            ContractError::Unauthorized(_) => ErrorKind::Unauthorized,
            ContractError::InternalInvariant(_) => ErrorKind::InternalInvariant,
            ContractError::Storage(_) => ErrorKind::Storage,
            ContractError::Ledger(_) => ErrorKind::Ledger,
        }
    }

    /// True when the error indicates a defect rather than a bad request
    pub fn is_fatal(&self) -> bool {
        self.kind() == ErrorKind::InternalInvariant
    }
}

impl From<StorageError> for ContractError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::NotFound(address) => {
                ContractError::NotFound(format!("no pending balance for {}", address))
            }
            StorageError::AddressTaken(address) => {
                ContractError::Conflict(format!("{} already has a pending balance", address))
            }
            other => ContractError::Storage(other),
        }
    }
}

impl From<rusqlite::Error> for ContractError {
    fn from(err: rusqlite::Error) -> Self {
        ContractError::Storage(StorageError::Sqlite(err))
    }
}

impl From<CodecError> for ContractError {
    fn from(err: CodecError) -> Self {
        ContractError::Format(FormatError::Codec(err))
    }
}

impl From<AssetError> for ContractError {
    fn from(err: AssetError) -> Self {
        ContractError::Format(FormatError::Asset(err))
    }
}

impl From<SplitError> for ContractError {
    fn from(err: SplitError) -> Self {
        match err {
            SplitError::InsufficientBalance(balance) => {
                ContractError::Policy(PolicyError::InsufficientBalance(balance))
            }
            mismatch @ SplitError::SumMismatch { .. } => {
                ContractError::InternalInvariant(mismatch.to_string())
            }
        }
    }
}
