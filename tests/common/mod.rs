//! Common test utilities for unregd integration tests
//!
//! This module provides shared test infrastructure including:
//! - Test environment with a temporary contract database
//! - A seeded local ledger (funded contract, RAM market, price ceiling)
//! - Deterministic claimant keys and public key strings

#![allow(dead_code)]

use secp256k1::{Secp256k1, SecretKey};
use std::path::PathBuf;
use tempfile::TempDir;
use unregd::client::{eth_address_from_secret, sign_claim};
use unregd::codec::EthereumAddress;
use unregd::config::GlobalConfig;
use unregd::manager::ClaimManager;
use unregd::provisioner::ClaimRequest;
use unregd::types::{AccountName, Asset};
use unregd::verifier::TaposAnchor;

const BASE58_ALPHABET: &[u8; 58] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// RAM market reserves used by the seeded ledger
pub const RAM_BASE_BYTES: u64 = 1_000_000;
pub const RAM_QUOTE: &str = "1000.0000 EOS";

/// 8192 bytes out of the seeded market cost 8.2597 EOS
pub const SEEDED_RAM_PRICE: i64 = 82_597;

/// Price ceiling set by `TestEnv::new`
pub const SEEDED_MAX_PRICE: &str = "10.0000 EOS";

/// Initialize logger for tests
///
/// Safe to call multiple times (subsequent calls are no-ops).
pub fn init_test_logger() {
    let _ = env_logger::builder()
        .is_test(true)
        .filter_level(log::LevelFilter::Debug)
        .try_init();

    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push(".env");
    dotenv::from_path(&path).ok();
}

pub fn asset(text: &str) -> Asset {
    text.parse().expect("valid asset literal")
}

pub fn account(name: &str) -> AccountName {
    name.parse().expect("valid account literal")
}

/// Encode bytes as base-58 (variable width)
pub fn encode_base58(bytes: &[u8]) -> String {
    // Little-endian base-58 digits
    let mut digits: Vec<u8> = Vec::new();
    for &byte in bytes {
        let mut carry = byte as u32;
        for digit in digits.iter_mut() {
            carry += (*digit as u32) << 8;
            *digit = (carry % 58) as u8;
            carry /= 58;
        }
        while carry > 0 {
            digits.push((carry % 58) as u8);
            carry /= 58;
        }
    }

    let leading_zeros = bytes.iter().take_while(|b| **b == 0).count();
    let mut text = "1".repeat(leading_zeros);
    text.extend(digits.iter().rev().map(|d| BASE58_ALPHABET[*d as usize] as char));
    text
}

/// Legacy `EOS...` string for a compressed point (checksum bytes are zero)
pub fn legacy_key_string(point: &[u8; 33]) -> String {
    let mut body = point.to_vec();
    body.extend_from_slice(&[0u8; 4]);
    format!("EOS{}", encode_base58(&body))
}

/// Deterministic secret key from a one-byte seed (seed must be non-zero)
pub fn secret_key(seed: u8) -> SecretKey {
    SecretKey::from_slice(&[seed; 32]).expect("valid secret key")
}

/// An Ethereum key holder claiming a balance
pub struct Claimant {
    pub secret_key: SecretKey,
    pub address: EthereumAddress,
}

impl Claimant {
    pub fn new(seed: u8) -> Self {
        let secret_key = secret_key(seed);
        let address = eth_address_from_secret(&secret_key);
        Self {
            secret_key,
            address,
        }
    }

    /// Signed request creating `account`, controlled by `public_key`
    pub fn request(&self, anchor: TaposAnchor, account: &str, public_key: &str) -> ClaimRequest {
        let name: AccountName = account.parse().expect("valid account literal");
        let signature = sign_claim(&self.secret_key, anchor, public_key, &name);
        ClaimRequest {
            signature: signature.to_vec(),
            account: account.to_string(),
            public_key: public_key.to_string(),
        }
    }
}

/// Public key string for the new account's authority
pub fn account_public_key(seed: u8) -> String {
    let secp = Secp256k1::signing_only();
    let point = secp256k1::PublicKey::from_secret_key(&secp, &secret_key(seed)).serialize();
    legacy_key_string(&point)
}

pub fn test_anchor() -> TaposAnchor {
    TaposAnchor::new(4321, 0xdead_beef)
}

/// Test environment with automatic cleanup
pub struct TestEnv {
    /// Temporary directory (auto-cleanup on drop)
    _temp_dir: TempDir,

    /// Data directory holding the contract database
    pub data_dir: PathBuf,

    /// Configuration pointing at `data_dir`
    pub config: GlobalConfig,

    pub manager: ClaimManager,
}

impl TestEnv {
    /// Fresh database with funded system accounts, a RAM market and a price ceiling
    pub fn new() -> Self {
        let mut env = Self::unseeded();

        let contract = env.contract_account();
        let ram_payer = env.config.contract.ram_payer.clone();

        env.manager
            .issue(&contract, &asset("1000000.0000 EOS"), "seed")
            .expect("Failed to fund contract");
        env.manager
            .issue(&ram_payer, &asset("10000.0000 EOS"), "seed")
            .expect("Failed to fund RAM payer");
        env.manager
            .set_ram_market(RAM_BASE_BYTES, &asset(RAM_QUOTE))
            .expect("Failed to set RAM market");
        env.manager
            .set_max_price(&contract, &asset(SEEDED_MAX_PRICE))
            .expect("Failed to set max price");

        env
    }

    /// Fresh database with only the system accounts
    pub fn unseeded() -> Self {
        init_test_logger();

        let temp_dir = TempDir::new().expect("Failed to create temporary directory for test");
        let data_dir = temp_dir.path().join("data");

        let mut config = GlobalConfig::default();
        config.storage.data_dir = Some(data_dir.to_string_lossy().to_string());

        let manager = ClaimManager::open(config.clone()).expect("Failed to open claim manager");

        Self {
            _temp_dir: temp_dir,
            data_dir,
            config,
            manager,
        }
    }

    pub fn contract_account(&self) -> AccountName {
        self.config.contract.account.clone()
    }

    /// Record a pending balance as the contract
    pub fn seed_balance(&mut self, address: &EthereumAddress, balance: &str) {
        let contract = self.contract_account();
        self.manager
            .add(&contract, &address.to_string(), &asset(balance))
            .expect("Failed to add pending balance");
    }

    /// Open a second connection to the same database
    pub fn reopen(&self) -> ClaimManager {
        ClaimManager::open(self.config.clone()).expect("Failed to reopen claim manager")
    }
}
