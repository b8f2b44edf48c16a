//! Storage layer for contract state
//!
//! One SQLite database holds the pending balance registry, the settings row
//! and the local host ledger, so a claim can touch all of them inside a
//! single transaction.

pub mod models;
pub mod registry;
pub mod settings;

use std::path::Path;
use std::time::Duration;

use rusqlite::Connection;

use crate::codec::EthereumAddress;

pub use models::{PendingBalanceRecord, RecordPatch};
pub use registry::PendingBalanceRegistry;
pub use settings::SettingsStore;

/// Database file name inside the data directory
pub const DATABASE_FILE: &str = "unregd.db";

/// Storage errors
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("No pending balance for {0}")]
    NotFound(EthereumAddress),

    #[error("Address {0} already has a pending balance")]
    AddressTaken(EthereumAddress),

    #[error("New record is missing its {0}")]
    IncompleteRecord(&'static str),
}

/// Open (creating if needed) the contract database in `data_dir`
///
/// # Arguments
///
/// * `data_dir` - Directory holding the database (created if missing)
/// * `busy_timeout` - How long a writer waits for the database lock
pub fn open_database<P: AsRef<Path>>(
    data_dir: P,
    busy_timeout: Duration,
) -> Result<Connection, StorageError> {
    std::fs::create_dir_all(data_dir.as_ref())?;
    let db_path = data_dir.as_ref().join(DATABASE_FILE);

    log::info!("Opening contract database: {}", db_path.display());

    let conn = Connection::open(&db_path)?;
    conn.busy_timeout(busy_timeout)?;

    init_schema(&conn)?;

    Ok(conn)
}

/// Create the registry and settings tables
pub fn init_schema(conn: &Connection) -> Result<(), StorageError> {
    PendingBalanceRegistry::init_schema(conn)?;
    SettingsStore::init_schema(conn)?;
    Ok(())
}
