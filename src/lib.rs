//! unregd
//!
//! Lets holders of an Ethereum token snapshot claim their balance as a new
//! account. An administrator loads pending balances keyed by Ethereum
//! address; a claimant proves control of the address with a recoverable
//! signature and gets an account with staked resources and a liquid balance.

pub mod cli;
pub mod client;
pub mod codec;
pub mod config;
pub mod crypto;
pub mod error;
pub mod ledger;
pub mod manager;
pub mod provisioner;
pub mod split;
pub mod storage;
pub mod types;
pub mod verifier;
