//! Storage data models
//!
//! Rows of the pending balance registry and the patch applied on upsert.

use serde::{Deserialize, Serialize};

use crate::codec::EthereumAddress;
use crate::types::Asset;

/// Balance awaiting a claim by the owner of `ethereum_address`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingBalanceRecord {
    /// Sequential primary key
    pub id: i64,

    /// Normalized address (also the unique index key)
    pub ethereum_address: EthereumAddress,

    /// Claimable balance
    pub balance: Asset,
}

/// Field updates for a registry upsert
///
/// Inserting a new record requires every field; updating an existing record
/// replaces only the fields that are set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecordPatch {
    pub ethereum_address: Option<EthereumAddress>,
    pub balance: Option<Asset>,
}

impl RecordPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ethereum_address(mut self, address: EthereumAddress) -> Self {
        self.ethereum_address = Some(address);
        self
    }

    pub fn balance(mut self, balance: Asset) -> Self {
        self.balance = Some(balance);
        self
    }

    /// Apply the set fields to `record`
    pub fn apply_to(&self, record: &mut PendingBalanceRecord) {
        if let Some(address) = self.ethereum_address {
            record.ethereum_address = address;
        }
        if let Some(balance) = &self.balance {
            record.balance = balance.clone();
        }
    }
}
