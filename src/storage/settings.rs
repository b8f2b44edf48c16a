//! Contract settings
//!
//! Single-row table holding the most the contract will pay for a new
//! account's initial RAM allocation.

use rusqlite::{params, Connection, OptionalExtension};

use super::StorageError;
use crate::types::{Asset, Symbol};

/// Fixed primary key of the settings row
const SETTINGS_ID: i64 = 1;

/// Settings view over a connection or transaction
pub struct SettingsStore<'c> {
    conn: &'c Connection,
}

impl<'c> SettingsStore<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS settings (
                id INTEGER PRIMARY KEY CHECK(id = 1),
                max_price_amount INTEGER NOT NULL,
                max_price_symbol TEXT NOT NULL
            )",
            [],
        )?;
        Ok(())
    }

    /// Create or overwrite the allocation price ceiling
    pub fn set_max_allocation_price(&self, amount: &Asset) -> Result<(), StorageError> {
        self.conn.execute(
            "INSERT INTO settings (id, max_price_amount, max_price_symbol)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                max_price_amount = excluded.max_price_amount,
                max_price_symbol = excluded.max_price_symbol",
            params![SETTINGS_ID, amount.amount, amount.symbol.to_string()],
        )?;

        log::debug!("✓ Max allocation price set to {}", amount);

        Ok(())
    }

    /// Current ceiling, `None` until one has been set
    pub fn get_max_allocation_price(&self) -> Result<Option<Asset>, StorageError> {
        let row: Option<(i64, String)> = self
            .conn
            .query_row(
                "SELECT max_price_amount, max_price_symbol FROM settings WHERE id = ?1",
                params![SETTINGS_ID],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .optional()?;

        row.map(|(amount, symbol)| {
            let symbol: Symbol = symbol
                .parse()
                .map_err(|e| StorageError::InvalidData(format!("stored symbol: {}", e)))?;
            Ok(Asset::new(amount, symbol))
        })
        .transpose()
    }
}
