//! Shared types for unregd
//!
//! Fixed-point token amounts, their currency symbols and host account names.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Largest precision a symbol may carry (10^18 still fits in an i64)
pub const MAX_PRECISION: u8 = 18;

/// Asset and name parsing errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AssetError {
    #[error("Invalid symbol: {0}")]
    InvalidSymbol(String),

    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    #[error("Symbol mismatch: expected {expected}, got {actual}")]
    SymbolMismatch { expected: Symbol, actual: Symbol },

    #[error("Amount overflow")]
    Overflow,

    #[error("Invalid account name: {0}")]
    InvalidAccountName(String),
}

/// Currency symbol: decimal precision plus an upper-case code of 1-7 letters
///
/// Text form is `"<precision>,<CODE>"`, e.g. `"4,EOS"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Symbol {
    precision: u8,
    code: String,
}

impl Symbol {
    pub fn new(precision: u8, code: &str) -> Result<Self, AssetError> {
        let valid_code = !code.is_empty()
            && code.len() <= 7
            && code.bytes().all(|b| b.is_ascii_uppercase());

        if !valid_code || precision > MAX_PRECISION {
            return Err(AssetError::InvalidSymbol(format!("{},{}", precision, code)));
        }

        Ok(Self {
            precision,
            code: code.to_string(),
        })
    }

    pub fn precision(&self) -> u8 {
        self.precision
    }

    pub fn code(&self) -> &str {
        &self.code
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.precision, self.code)
    }
}

impl FromStr for Symbol {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (precision, code) = s
            .split_once(',')
            .ok_or_else(|| AssetError::InvalidSymbol(s.to_string()))?;
        let precision = precision
            .trim()
            .parse::<u8>()
            .map_err(|_| AssetError::InvalidSymbol(s.to_string()))?;
        Symbol::new(precision, code.trim())
    }
}

impl TryFrom<String> for Symbol {
    type Error = AssetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Symbol> for String {
    fn from(symbol: Symbol) -> Self {
        symbol.to_string()
    }
}

/// Fixed-point amount in minor units, tagged with its symbol
///
/// `Asset::new(123456, 4,EOS)` displays as `"12.3456 EOS"`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Asset {
    pub amount: i64,
    pub symbol: Symbol,
}

impl Asset {
    pub fn new(amount: i64, symbol: Symbol) -> Self {
        Self { amount, symbol }
    }

    pub fn zero(symbol: Symbol) -> Self {
        Self::new(0, symbol)
    }

    pub fn is_zero(&self) -> bool {
        self.amount == 0
    }

    /// Fails unless `self` carries `expected`
    pub fn require_symbol(&self, expected: &Symbol) -> Result<(), AssetError> {
        if &self.symbol != expected {
            return Err(AssetError::SymbolMismatch {
                expected: expected.clone(),
                actual: self.symbol.clone(),
            });
        }
        Ok(())
    }

    pub fn checked_add(&self, other: &Asset) -> Result<Asset, AssetError> {
        other.require_symbol(&self.symbol)?;
        let amount = self
            .amount
            .checked_add(other.amount)
            .ok_or(AssetError::Overflow)?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }

    pub fn checked_sub(&self, other: &Asset) -> Result<Asset, AssetError> {
        other.require_symbol(&self.symbol)?;
        let amount = self
            .amount
            .checked_sub(other.amount)
            .ok_or(AssetError::Overflow)?;
        Ok(Asset::new(amount, self.symbol.clone()))
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let precision = self.symbol.precision as u32;
        let sign = if self.amount < 0 { "-" } else { "" };
        let magnitude = self.amount.unsigned_abs();

        if precision == 0 {
            return write!(f, "{}{} {}", sign, magnitude, self.symbol.code);
        }

        let scale = 10u64.pow(precision);
        write!(
            f,
            "{}{}.{:0width$} {}",
            sign,
            magnitude / scale,
            magnitude % scale,
            self.symbol.code,
            width = precision as usize
        )
    }
}

impl FromStr for Asset {
    type Err = AssetError;

    /// Parse `"<amount> <CODE>"`; precision is the number of fractional digits
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || AssetError::InvalidAmount(s.to_string());

        let (number, code) = s.trim().split_once(' ').ok_or_else(invalid)?;
        let (negative, digits) = match number.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, number),
        };

        let (whole, fraction) = match digits.split_once('.') {
            Some((w, f)) if !f.is_empty() => (w, f),
            Some(_) => return Err(invalid()),
            None => (digits, ""),
        };

        if whole.is_empty()
            || !whole.bytes().all(|b| b.is_ascii_digit())
            || !fraction.bytes().all(|b| b.is_ascii_digit())
        {
            return Err(invalid());
        }

        let precision = u8::try_from(fraction.len()).map_err(|_| invalid())?;
        let symbol = Symbol::new(precision, code.trim())?;

        let mut amount: i64 = 0;
        for b in whole.bytes().chain(fraction.bytes()) {
            amount = amount
                .checked_mul(10)
                .and_then(|a| a.checked_add((b - b'0') as i64))
                .ok_or(AssetError::Overflow)?;
        }

        Ok(Asset::new(if negative { -amount } else { amount }, symbol))
    }
}

impl TryFrom<String> for Asset {
    type Error = AssetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Asset> for String {
    fn from(asset: Asset) -> Self {
        asset.to_string()
    }
}

/// Host ledger account name: 1-12 characters from `a-z`, `1-5` and `.`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct AccountName(String);

impl AccountName {
    pub fn new(name: &str) -> Result<Self, AssetError> {
        let valid = !name.is_empty()
            && name.len() <= 12
            && name
                .bytes()
                .all(|b| matches!(b, b'a'..=b'z' | b'1'..=b'5' | b'.'));

        if !valid {
            return Err(AssetError::InvalidAccountName(name.to_string()));
        }
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AccountName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for AccountName {
    type Err = AssetError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AccountName::new(s)
    }
}

impl TryFrom<String> for AccountName {
    type Error = AssetError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        AccountName::new(&value)
    }
}

impl From<AccountName> for String {
    fn from(name: AccountName) -> Self {
        name.0
    }
}
