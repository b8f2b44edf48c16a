//! Pending balance registry
//!
//! SQLite table of claimable balances keyed by a sequential id, with a unique
//! index on the raw 20-byte Ethereum address. The registry borrows a
//! connection so that it can run inside a caller's transaction.

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::models::{PendingBalanceRecord, RecordPatch};
use super::StorageError;
use crate::codec::EthereumAddress;
use crate::types::{Asset, Symbol};

/// Registry view over a connection or transaction
pub struct PendingBalanceRegistry<'c> {
    conn: &'c Connection,
}

impl<'c> PendingBalanceRegistry<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Create the registry table and its address index
    pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS pending_balances (
                id INTEGER PRIMARY KEY,
                ethereum_address TEXT NOT NULL,
                address_key BLOB NOT NULL,
                balance_amount INTEGER NOT NULL,
                balance_symbol TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_pending_balances_address
             ON pending_balances(address_key)",
            [],
        )?;

        log::debug!("✓ Registry schema initialized");

        Ok(())
    }

    /// Insert a record for `address`, or patch the existing one
    ///
    /// # Returns
    ///
    /// The record as stored after the upsert
    pub fn upsert(
        &self,
        address: &EthereumAddress,
        patch: RecordPatch,
    ) -> Result<PendingBalanceRecord, StorageError> {
        let record = match self.find(address)? {
            Some(mut existing) => {
                patch.apply_to(&mut existing);
                self.write(&existing)?;
                log::debug!("✓ Updated registry record (id={})", existing.id);
                existing
            }
            None => {
                let balance = patch.balance.ok_or(StorageError::IncompleteRecord("balance"))?;
                let record = PendingBalanceRecord {
                    id: self.next_id()?,
                    ethereum_address: patch.ethereum_address.unwrap_or(*address),
                    balance,
                };
                self.conn.execute(
                    "INSERT INTO pending_balances
                     (id, ethereum_address, address_key, balance_amount, balance_symbol)
                     VALUES (?1, ?2, ?3, ?4, ?5)",
                    params![
                        record.id,
                        record.ethereum_address.to_string(),
                        &record.ethereum_address.as_bytes()[..],
                        record.balance.amount,
                        record.balance.symbol.to_string(),
                    ],
                )?;
                log::debug!("✓ Inserted registry record (id={})", record.id);
                record
            }
        };

        Ok(record)
    }

    /// Look up the record for `address`
    pub fn find(
        &self,
        address: &EthereumAddress,
    ) -> Result<Option<PendingBalanceRecord>, StorageError> {
        let row = self
            .conn
            .query_row(
                "SELECT id, ethereum_address, balance_amount, balance_symbol
                 FROM pending_balances WHERE address_key = ?1",
                params![&address.as_bytes()[..]],
                raw_record,
            )
            .optional()?;

        row.map(RawRecord::into_record).transpose()
    }

    /// Move the record for `old` to `new`
    ///
    /// # Errors
    ///
    /// `NotFound` if `old` has no record, `AddressTaken` if `new` already has one.
    pub fn rename(
        &self,
        old: &EthereumAddress,
        new: &EthereumAddress,
    ) -> Result<PendingBalanceRecord, StorageError> {
        let mut record = self.find(old)?.ok_or(StorageError::NotFound(*old))?;

        if old == new {
            return Ok(record);
        }
        if self.find(new)?.is_some() {
            return Err(StorageError::AddressTaken(*new));
        }

        RecordPatch::new().ethereum_address(*new).apply_to(&mut record);
        self.write(&record)?;

        log::debug!("✓ Renamed registry record {} -> {}", old, new);

        Ok(record)
    }

    /// Delete the record for `address`
    pub fn remove(&self, address: &EthereumAddress) -> Result<PendingBalanceRecord, StorageError> {
        let record = self.find(address)?.ok_or(StorageError::NotFound(*address))?;

        self.conn
            .execute("DELETE FROM pending_balances WHERE id = ?1", params![record.id])?;

        log::debug!("✓ Removed registry record (id={})", record.id);

        Ok(record)
    }

    /// All records ordered by id
    pub fn list(&self) -> Result<Vec<PendingBalanceRecord>, StorageError> {
        let mut stmt = self.conn.prepare(
            "SELECT id, ethereum_address, balance_amount, balance_symbol
             FROM pending_balances ORDER BY id",
        )?;
        let rows = stmt.query_map([], raw_record)?;

        let mut records = Vec::new();
        for row in rows {
            records.push(row?.into_record()?);
        }
        Ok(records)
    }

    /// Number of live records
    pub fn count(&self) -> Result<u64, StorageError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM pending_balances", [], |row| row.get(0))?;
        Ok(count as u64)
    }

    /// Next sequential id: one past the largest, starting at 0
    fn next_id(&self) -> Result<i64, StorageError> {
        let next: i64 = self.conn.query_row(
            "SELECT COALESCE(MAX(id) + 1, 0) FROM pending_balances",
            [],
            |row| row.get(0),
        )?;
        Ok(next)
    }

    /// Rewrite every column of an existing row
    fn write(&self, record: &PendingBalanceRecord) -> Result<(), StorageError> {
        self.conn.execute(
            "UPDATE pending_balances
             SET ethereum_address = ?1, address_key = ?2, balance_amount = ?3, balance_symbol = ?4
             WHERE id = ?5",
            params![
                record.ethereum_address.to_string(),
                &record.ethereum_address.as_bytes()[..],
                record.balance.amount,
                record.balance.symbol.to_string(),
                record.id,
            ],
        )?;
        Ok(())
    }
}

/// Row as read from SQLite, before text columns are parsed
struct RawRecord {
    id: i64,
    ethereum_address: String,
    balance_amount: i64,
    balance_symbol: String,
}

fn raw_record(row: &Row<'_>) -> rusqlite::Result<RawRecord> {
    Ok(RawRecord {
        id: row.get(0)?,
        ethereum_address: row.get(1)?,
        balance_amount: row.get(2)?,
        balance_symbol: row.get(3)?,
    })
}

impl RawRecord {
    fn into_record(self) -> Result<PendingBalanceRecord, StorageError> {
        let ethereum_address: EthereumAddress = self
            .ethereum_address
            .parse()
            .map_err(|e| StorageError::InvalidData(format!("stored address: {}", e)))?;
        let symbol: Symbol = self
            .balance_symbol
            .parse()
            .map_err(|e| StorageError::InvalidData(format!("stored symbol: {}", e)))?;

        Ok(PendingBalanceRecord {
            id: self.id,
            ethereum_address,
            balance: Asset::new(self.balance_amount, symbol),
        })
    }
}
