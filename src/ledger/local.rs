//! Local host ledger
//!
//! SQLite-backed account directory, token balances, delegated stakes and a
//! constant-product RAM market. All tables live in the contract database so
//! provisioning and registry updates commit or roll back together.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension};
use serde::Serialize;

use super::{Authority, HostLedger, LedgerError};
use crate::types::{AccountName, Asset, Symbol};

/// Ledger view over a connection or transaction
pub struct LocalLedger<'c> {
    conn: &'c Connection,
}

/// RAM market reserves: bytes for sale and the token side of the pool
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RamMarket {
    pub base_bytes: u64,
    pub quote: Asset,
}

impl RamMarket {
    /// Tokens needed to take `bytes` out of the pool, rounded up
    pub fn price_for(&self, bytes: u64) -> Result<Asset, LedgerError> {
        if bytes >= self.base_bytes {
            return Err(LedgerError::InsufficientRam(bytes));
        }
        let numerator = self.quote.amount as u128 * bytes as u128;
        let denominator = (self.base_bytes - bytes) as u128;
        let price = numerator.div_ceil(denominator);

        let amount = i64::try_from(price)
            .map_err(|_| LedgerError::InvalidData(format!("RAM price overflow for {} bytes", bytes)))?;
        Ok(Asset::new(amount, self.quote.symbol.clone()))
    }

    /// Bytes bought by paying `tokens` into the pool
    pub fn bytes_for(&self, tokens: &Asset) -> u64 {
        let paid = tokens.amount as u128;
        let bytes = self.base_bytes as u128 * paid / (self.quote.amount as u128 + paid);
        bytes as u64
    }
}

/// Account as seen by `unregd ledger account`
#[derive(Debug, Clone, Serialize)]
pub struct AccountInfo {
    pub name: AccountName,
    pub creator: AccountName,
    pub owner: Authority,
    pub active: Authority,
    pub created_at: DateTime<Utc>,
    pub ram_bytes: u64,
}

impl<'c> LocalLedger<'c> {
    pub fn new(conn: &'c Connection) -> Self {
        Self { conn }
    }

    /// Create the ledger tables
    pub fn init_schema(conn: &Connection) -> Result<(), LedgerError> {
        conn.execute(
            "CREATE TABLE IF NOT EXISTS accounts (
                name TEXT PRIMARY KEY,
                creator TEXT NOT NULL,
                owner_authority TEXT NOT NULL,
                active_authority TEXT NOT NULL,
                created_at TEXT NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS token_balances (
                account TEXT NOT NULL,
                symbol TEXT NOT NULL,
                amount INTEGER NOT NULL,
                PRIMARY KEY (account, symbol)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS delegated_stakes (
                owner TEXT NOT NULL,
                receiver TEXT NOT NULL,
                symbol TEXT NOT NULL,
                net_amount INTEGER NOT NULL,
                cpu_amount INTEGER NOT NULL,
                PRIMARY KEY (owner, receiver)
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS ram_holdings (
                account TEXT PRIMARY KEY,
                bytes INTEGER NOT NULL
            )",
            [],
        )?;

        conn.execute(
            "CREATE TABLE IF NOT EXISTS ram_market (
                id INTEGER PRIMARY KEY CHECK(id = 1),
                base_bytes INTEGER NOT NULL,
                quote_amount INTEGER NOT NULL,
                quote_symbol TEXT NOT NULL
            )",
            [],
        )?;

        log::debug!("✓ Ledger schema initialized");

        Ok(())
    }

    /// Create a keyless system account if it does not exist yet
    pub fn ensure_system_account(&self, name: &AccountName) -> Result<(), LedgerError> {
        if self.account_exists(name)? {
            return Ok(());
        }
        self.insert_account(name, name, &Authority::empty(), &Authority::empty())?;
        log::info!("Created system account {}", name);
        Ok(())
    }

    /// Reset the RAM market reserves
    pub fn set_ram_market(&self, base_bytes: u64, quote: &Asset) -> Result<(), LedgerError> {
        if quote.amount <= 0 || base_bytes == 0 {
            return Err(LedgerError::NonPositiveQuantity(quote.clone()));
        }
        let base_bytes = i64::try_from(base_bytes)
            .map_err(|_| LedgerError::InvalidData(format!("base bytes too large: {}", base_bytes)))?;

        self.conn.execute(
            "INSERT INTO ram_market (id, base_bytes, quote_amount, quote_symbol)
             VALUES (1, ?1, ?2, ?3)
             ON CONFLICT(id) DO UPDATE SET
                base_bytes = excluded.base_bytes,
                quote_amount = excluded.quote_amount,
                quote_symbol = excluded.quote_symbol",
            params![base_bytes, quote.amount, quote.symbol.to_string()],
        )?;
        Ok(())
    }

    pub fn ram_market(&self) -> Result<Option<RamMarket>, LedgerError> {
        let row: Option<(i64, i64, String)> = self
            .conn
            .query_row(
                "SELECT base_bytes, quote_amount, quote_symbol FROM ram_market WHERE id = 1",
                [],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        row.map(|(base_bytes, quote_amount, symbol)| {
            Ok(RamMarket {
                base_bytes: base_bytes as u64,
                quote: Asset::new(quote_amount, parse_symbol(&symbol)?),
            })
        })
        .transpose()
    }

    /// Liquid balance of `account` in `symbol` (zero when never credited)
    pub fn balance_of(&self, account: &AccountName, symbol: &Symbol) -> Result<Asset, LedgerError> {
        let amount: Option<i64> = self
            .conn
            .query_row(
                "SELECT amount FROM token_balances WHERE account = ?1 AND symbol = ?2",
                params![account.as_str(), symbol.to_string()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(Asset::new(amount.unwrap_or(0), symbol.clone()))
    }

    /// `(net, cpu)` staked by `owner` to `receiver`
    pub fn stake_of(
        &self,
        owner: &AccountName,
        receiver: &AccountName,
    ) -> Result<Option<(Asset, Asset)>, LedgerError> {
        let row: Option<(String, i64, i64)> = self
            .conn
            .query_row(
                "SELECT symbol, net_amount, cpu_amount FROM delegated_stakes
                 WHERE owner = ?1 AND receiver = ?2",
                params![owner.as_str(), receiver.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
            )
            .optional()?;

        row.map(|(symbol, net, cpu)| {
            let symbol = parse_symbol(&symbol)?;
            Ok((Asset::new(net, symbol.clone()), Asset::new(cpu, symbol)))
        })
        .transpose()
    }

    pub fn ram_bytes(&self, account: &AccountName) -> Result<u64, LedgerError> {
        let bytes: Option<i64> = self
            .conn
            .query_row(
                "SELECT bytes FROM ram_holdings WHERE account = ?1",
                params![account.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(bytes.unwrap_or(0) as u64)
    }

    pub fn account(&self, name: &AccountName) -> Result<Option<AccountInfo>, LedgerError> {
        let row: Option<(String, String, String, String)> = self
            .conn
            .query_row(
                "SELECT creator, owner_authority, active_authority, created_at
                 FROM accounts WHERE name = ?1",
                params![name.as_str()],
                |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?, row.get(3)?)),
            )
            .optional()?;

        let Some((creator, owner, active, created_at)) = row else {
            return Ok(None);
        };

        let created_at = DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| LedgerError::InvalidData(format!("created_at: {}", e)))?
            .with_timezone(&Utc);

        Ok(Some(AccountInfo {
            name: name.clone(),
            creator: creator.parse()?,
            owner: serde_json::from_str(&owner)?,
            active: serde_json::from_str(&active)?,
            created_at,
            ram_bytes: self.ram_bytes(name)?,
        }))
    }

    fn insert_account(
        &self,
        creator: &AccountName,
        name: &AccountName,
        owner: &Authority,
        active: &Authority,
    ) -> Result<(), LedgerError> {
        self.conn.execute(
            "INSERT INTO accounts (name, creator, owner_authority, active_authority, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                name.as_str(),
                creator.as_str(),
                serde_json::to_string(owner)?,
                serde_json::to_string(active)?,
                Utc::now().to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    fn require_account(&self, name: &AccountName) -> Result<(), LedgerError> {
        if !self.account_exists(name)? {
            return Err(LedgerError::AccountNotFound(name.clone()));
        }
        Ok(())
    }

    fn credit(&self, account: &AccountName, quantity: &Asset) -> Result<(), LedgerError> {
        self.conn.execute(
            "INSERT INTO token_balances (account, symbol, amount) VALUES (?1, ?2, ?3)
             ON CONFLICT(account, symbol) DO UPDATE SET amount = amount + excluded.amount",
            params![account.as_str(), quantity.symbol.to_string(), quantity.amount],
        )?;
        Ok(())
    }

    fn debit(&self, account: &AccountName, quantity: &Asset) -> Result<(), LedgerError> {
        let available = self.balance_of(account, &quantity.symbol)?;
        if available.amount < quantity.amount {
            return Err(LedgerError::InsufficientFunds {
                account: account.clone(),
                available,
                required: quantity.clone(),
            });
        }

        self.conn.execute(
            "UPDATE token_balances SET amount = amount - ?1 WHERE account = ?2 AND symbol = ?3",
            params![quantity.amount, account.as_str(), quantity.symbol.to_string()],
        )?;
        Ok(())
    }
}

impl HostLedger for LocalLedger<'_> {
    fn account_exists(&self, name: &AccountName) -> Result<bool, LedgerError> {
        let found: Option<i64> = self
            .conn
            .query_row(
                "SELECT 1 FROM accounts WHERE name = ?1",
                params![name.as_str()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(found.is_some())
    }

    fn create_account(
        &self,
        creator: &AccountName,
        name: &AccountName,
        owner: &Authority,
        active: &Authority,
    ) -> Result<(), LedgerError> {
        self.require_account(creator)?;
        if self.account_exists(name)? {
            return Err(LedgerError::AccountExists(name.clone()));
        }
        self.insert_account(creator, name, owner, active)?;
        log::debug!("newaccount {} by {}", name, creator);
        Ok(())
    }

    fn ram_price_for(&self, bytes: u64) -> Result<Asset, LedgerError> {
        self.ram_market()?
            .ok_or(LedgerError::RamMarketMissing)?
            .price_for(bytes)
    }

    fn buy_ram(
        &self,
        payer: &AccountName,
        receiver: &AccountName,
        tokens: &Asset,
    ) -> Result<u64, LedgerError> {
        if tokens.amount <= 0 {
            return Err(LedgerError::NonPositiveQuantity(tokens.clone()));
        }
        self.require_account(receiver)?;
        let market = self.ram_market()?.ok_or(LedgerError::RamMarketMissing)?;
        tokens.require_symbol(&market.quote.symbol)?;

        self.debit(payer, tokens)?;

        let bytes = market.bytes_for(tokens);
        self.conn.execute(
            "UPDATE ram_market SET base_bytes = base_bytes - ?1, quote_amount = quote_amount + ?2
             WHERE id = 1",
            params![bytes as i64, tokens.amount],
        )?;
        self.conn.execute(
            "INSERT INTO ram_holdings (account, bytes) VALUES (?1, ?2)
             ON CONFLICT(account) DO UPDATE SET bytes = bytes + excluded.bytes",
            params![receiver.as_str(), bytes as i64],
        )?;

        log::debug!("buyram {} -> {}: {} for {} bytes", payer, receiver, tokens, bytes);
        Ok(bytes)
    }

    fn delegate_stake(
        &self,
        from: &AccountName,
        receiver: &AccountName,
        net: &Asset,
        cpu: &Asset,
        transfer: bool,
    ) -> Result<(), LedgerError> {
        cpu.require_symbol(&net.symbol)?;
        if net.amount < 0 {
            return Err(LedgerError::NonPositiveQuantity(net.clone()));
        }
        if cpu.amount < 0 {
            return Err(LedgerError::NonPositiveQuantity(cpu.clone()));
        }
        let total = net.checked_add(cpu)?;
        if total.is_zero() {
            return Err(LedgerError::NonPositiveQuantity(total));
        }
        self.require_account(receiver)?;

        self.debit(from, &total)?;

        let owner = if transfer { receiver } else { from };
        self.conn.execute(
            "INSERT INTO delegated_stakes (owner, receiver, symbol, net_amount, cpu_amount)
             VALUES (?1, ?2, ?3, ?4, ?5)
             ON CONFLICT(owner, receiver) DO UPDATE SET
                net_amount = net_amount + excluded.net_amount,
                cpu_amount = cpu_amount + excluded.cpu_amount",
            params![
                owner.as_str(),
                receiver.as_str(),
                net.symbol.to_string(),
                net.amount,
                cpu.amount
            ],
        )?;

        log::debug!("delegatebw {} -> {}: net {} cpu {}", from, receiver, net, cpu);
        Ok(())
    }

    fn transfer(
        &self,
        from: &AccountName,
        to: &AccountName,
        quantity: &Asset,
        memo: &str,
    ) -> Result<(), LedgerError> {
        if quantity.amount <= 0 {
            return Err(LedgerError::NonPositiveQuantity(quantity.clone()));
        }
        self.require_account(to)?;

        self.debit(from, quantity)?;
        self.credit(to, quantity)?;

        log::debug!("transfer {} -> {}: {} ({:?})", from, to, quantity, memo);
        Ok(())
    }

    fn issue(&self, to: &AccountName, quantity: &Asset, memo: &str) -> Result<(), LedgerError> {
        if quantity.amount <= 0 {
            return Err(LedgerError::NonPositiveQuantity(quantity.clone()));
        }
        self.require_account(to)?;
        self.credit(to, quantity)?;

        log::debug!("issue {} -> {} ({:?})", quantity, to, memo);
        Ok(())
    }
}

fn parse_symbol(text: &str) -> Result<Symbol, LedgerError> {
    text.parse()
        .map_err(|e| LedgerError::InvalidData(format!("stored symbol: {}", e)))
}
