//! Claim manager - Main integration layer
//!
//! Coordinates config, storage and the local host ledger. Every state-changing
//! operation runs in one immediate SQLite transaction: it commits only when the
//! whole operation succeeds and rolls back on any error.

use rusqlite::{Connection, TransactionBehavior};

use crate::codec::{parse_public_key, EthereumAddress};
use crate::config::{ConfigError, GlobalConfig};
use crate::error::ContractError;
use crate::ledger::{AccountInfo, Authority, HostLedger, LocalLedger, RamMarket};
use crate::provisioner::{AccountProvisioner, ClaimReceipt, ClaimRequest};
use crate::storage::{
    self, PendingBalanceRecord, PendingBalanceRegistry, SettingsStore, StorageError,
};
use crate::types::{AccountName, Asset};
use crate::verifier::TaposAnchor;

/// Errors that can occur while opening the manager
#[derive(Debug, thiserror::Error)]
pub enum ManagerError {
    #[error("Config error: {0}")]
    Config(#[from] ConfigError),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Ledger error: {0}")]
    Ledger(#[from] crate::ledger::LedgerError),
}

/// Main claim manager
///
/// Owns the database connection; `&mut self` on every write serializes
/// operations within a process, the immediate transaction across processes.
pub struct ClaimManager {
    /// Global configuration
    config: GlobalConfig,

    /// Contract database (registry, settings, local ledger)
    conn: Connection,
}

impl ClaimManager {
    /// Open the contract database in the configured data directory
    ///
    /// Creates the schema on first use and makes sure the contract and RAM
    /// payer accounts exist on the local ledger.
    ///
    /// # Example
    ///
    /// ```ignore
    /// use unregd::config::GlobalConfig;
    /// use unregd::manager::ClaimManager;
    ///
    /// let manager = ClaimManager::open(GlobalConfig::default())?;
    /// ```
    pub fn open(config: GlobalConfig) -> Result<Self, ManagerError> {
        let data_dir = config.data_dir()?;
        let conn = storage::open_database(&data_dir, config.storage.busy_timeout())?;
        Self::with_connection(config, conn)
    }

    /// Use an already opened connection (e.g. in-memory for tests)
    pub fn with_connection(config: GlobalConfig, conn: Connection) -> Result<Self, ManagerError> {
        storage::init_schema(&conn)?;
        LocalLedger::init_schema(&conn)?;

        let ledger = LocalLedger::new(&conn);
        ledger.ensure_system_account(&config.contract.account)?;
        ledger.ensure_system_account(&config.contract.ram_payer)?;

        Ok(Self { config, conn })
    }

    pub fn config(&self) -> &GlobalConfig {
        &self.config
    }

    /// Run `op` against a provisioner inside one transaction
    fn atomically<T, F>(&mut self, op: F) -> Result<T, ContractError>
    where
        F: for<'t> FnOnce(&AccountProvisioner<'t, LocalLedger<'t>>) -> Result<T, ContractError>,
    {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;

        let result = {
            let ledger = LocalLedger::new(&tx);
            let provisioner = AccountProvisioner::new(
                &self.config.contract,
                PendingBalanceRegistry::new(&tx),
                SettingsStore::new(&tx),
                &ledger,
            );
            op(&provisioner)
        };

        match result {
            Ok(value) => {
                tx.commit()?;
                Ok(value)
            }
            Err(e) => {
                // Dropping the transaction rolls it back
                log::debug!("Rolling back: {}", e);
                Err(e)
            }
        }
    }

    /// Upsert a pending balance (contract authority required)
    pub fn add(
        &mut self,
        actor: &AccountName,
        address: &str,
        balance: &Asset,
    ) -> Result<PendingBalanceRecord, ContractError> {
        self.atomically(|p| p.add(actor, address, balance))
    }

    /// Move a pending balance to another address (contract authority required)
    pub fn change_address(
        &mut self,
        actor: &AccountName,
        old_address: &str,
        new_address: &str,
    ) -> Result<PendingBalanceRecord, ContractError> {
        self.atomically(|p| p.change_address(actor, old_address, new_address))
    }

    /// Set the RAM price ceiling (contract authority required)
    pub fn set_max_price(&mut self, actor: &AccountName, amount: &Asset) -> Result<(), ContractError> {
        self.atomically(|p| p.set_max_price(actor, amount))
    }

    /// Claim a pending balance into a new account
    pub fn claim(
        &mut self,
        anchor: TaposAnchor,
        request: &ClaimRequest,
    ) -> Result<ClaimReceipt, ContractError> {
        self.atomically(|p| p.claim(anchor, request))
    }

    pub fn pending_balance(
        &self,
        address: &EthereumAddress,
    ) -> Result<Option<PendingBalanceRecord>, ContractError> {
        Ok(PendingBalanceRegistry::new(&self.conn).find(address)?)
    }

    pub fn pending_balances(&self) -> Result<Vec<PendingBalanceRecord>, ContractError> {
        Ok(PendingBalanceRegistry::new(&self.conn).list()?)
    }

    pub fn max_price(&self) -> Result<Option<Asset>, ContractError> {
        Ok(SettingsStore::new(&self.conn).get_max_allocation_price()?)
    }

    /// Read-only view of the local ledger
    pub fn ledger(&self) -> LocalLedger<'_> {
        LocalLedger::new(&self.conn)
    }

    /// Credit new tokens to `to` on the local ledger
    pub fn issue(&mut self, to: &AccountName, quantity: &Asset, memo: &str) -> Result<(), ContractError> {
        quantity.require_symbol(&self.config.contract.core_symbol)?;
        self.with_ledger(|ledger| Ok(ledger.issue(to, quantity, memo)?))
    }

    /// Create an account on the local ledger controlled by `public_key`
    pub fn create_account(
        &mut self,
        creator: &AccountName,
        name: &AccountName,
        public_key: &str,
    ) -> Result<(), ContractError> {
        let authority = Authority::single_key(parse_public_key(public_key)?);
        self.with_ledger(|ledger| Ok(ledger.create_account(creator, name, &authority, &authority)?))
    }

    /// Reset the local RAM market reserves
    pub fn set_ram_market(&mut self, base_bytes: u64, quote: &Asset) -> Result<(), ContractError> {
        quote.require_symbol(&self.config.contract.core_symbol)?;
        self.with_ledger(|ledger| Ok(ledger.set_ram_market(base_bytes, quote)?))
    }

    pub fn ram_market(&self) -> Result<Option<RamMarket>, ContractError> {
        Ok(self.ledger().ram_market()?)
    }

    pub fn account_info(&self, name: &AccountName) -> Result<Option<AccountInfo>, ContractError> {
        Ok(self.ledger().account(name)?)
    }

    fn with_ledger<T>(
        &mut self,
        op: impl FnOnce(&LocalLedger<'_>) -> Result<T, ContractError>,
    ) -> Result<T, ContractError> {
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)?;
        let value = op(&LocalLedger::new(&tx))?;
        tx.commit()?;
        Ok(value)
    }
}
