//! Account provisioning
//!
//! Runs a claim from request validation through account creation, and the
//! admin operations that maintain the registry and settings. Operations here
//! do not commit anything themselves: `ClaimManager` runs each one inside a
//! database transaction and only commits when it returns `Ok`.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::codec::{parse_hex_address, parse_public_key, EthereumAddress, ETHEREUM_ADDRESS_TEXT_LEN};
use crate::config::ContractConfig;
use crate::crypto::SIGNATURE_LEN;
use crate::error::{ContractError, FormatError, PolicyError};
use crate::ledger::{Authority, HostLedger};
use crate::split::{split, SplitBalance};
use crate::storage::{PendingBalanceRecord, PendingBalanceRegistry, RecordPatch, SettingsStore};
use crate::types::{AccountName, Asset};
use crate::verifier::{recover_identity, ClaimMessage, TaposAnchor};

/// Length of a claimable account name
pub const CLAIM_ACCOUNT_NAME_LEN: usize = 12;

/// Claim request as submitted by the claimant
#[derive(Debug, Clone)]
pub struct ClaimRequest {
    /// 66-byte recoverable signature over the claim message
    pub signature: Vec<u8>,

    /// Name of the account to create
    pub account: String,

    /// Public key string controlling the new account
    pub public_key: String,
}

/// Stage of a claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimState {
    Validating,
    Verifying,
    Splitting,
    PriceChecking,
    Provisioning,
    Committed,
}

/// Outcome of a successful claim
#[derive(Debug, Clone, Serialize)]
pub struct ClaimReceipt {
    pub account: AccountName,
    pub ethereum_address: EthereumAddress,
    pub record_id: i64,
    pub balance: Asset,
    pub stake_net: Asset,
    pub stake_cpu: Asset,
    pub liquid: Asset,
    pub ram_price: Asset,
    pub ram_bytes: u64,
    pub claimed_at: DateTime<Utc>,
}

/// Contract operations over one unit of storage and ledger state
pub struct AccountProvisioner<'a, L: HostLedger> {
    contract: &'a ContractConfig,
    registry: PendingBalanceRegistry<'a>,
    settings: SettingsStore<'a>,
    ledger: &'a L,
}

impl<'a, L: HostLedger> AccountProvisioner<'a, L> {
    pub fn new(
        contract: &'a ContractConfig,
        registry: PendingBalanceRegistry<'a>,
        settings: SettingsStore<'a>,
        ledger: &'a L,
    ) -> Self {
        Self {
            contract,
            registry,
            settings,
            ledger,
        }
    }

    /// Record (or replace) the claimable balance of an Ethereum address
    pub fn add(
        &self,
        actor: &AccountName,
        address: &str,
        balance: &Asset,
    ) -> Result<PendingBalanceRecord, ContractError> {
        self.require_auth(actor)?;
        balance.require_symbol(&self.contract.core_symbol)?;
        let address = validate_address_text(address)?;

        let patch = RecordPatch::new()
            .ethereum_address(address)
            .balance(balance.clone());
        let record = self.registry.upsert(&address, patch)?;

        log::info!("Pending balance for {} set to {}", address, record.balance);

        Ok(record)
    }

    /// Move a pending balance to a different Ethereum address
    pub fn change_address(
        &self,
        actor: &AccountName,
        old_address: &str,
        new_address: &str,
    ) -> Result<PendingBalanceRecord, ContractError> {
        self.require_auth(actor)?;
        let old_address = validate_address_text(old_address)?;
        let new_address = validate_address_text(new_address)?;

        let record = self.registry.rename(&old_address, &new_address)?;

        log::info!("Pending balance moved from {} to {}", old_address, new_address);

        Ok(record)
    }

    /// Set the most the contract pays for a new account's RAM
    pub fn set_max_price(&self, actor: &AccountName, amount: &Asset) -> Result<(), ContractError> {
        self.require_auth(actor)?;
        amount.require_symbol(&self.contract.core_symbol)?;

        self.settings.set_max_allocation_price(amount)?;

        log::info!("Maximum RAM price set to {}", amount);

        Ok(())
    }

    /// Claim a pending balance into a new account
    ///
    /// The claimant signs `"<ref_block_num>,<ref_block_prefix>,<public key>,<account>"`
    /// with the Ethereum key holding the balance. The signer's address is
    /// recovered from the signature; no address is taken from the request.
    pub fn claim(
        &self,
        anchor: TaposAnchor,
        request: &ClaimRequest,
    ) -> Result<ClaimReceipt, ContractError> {
        let mut state = ClaimState::Validating;
        let result = self.run_claim(anchor, request, &mut state);

        if let Err(e) = &result {
            log::warn!(
                "Claim for {:?} rejected while {:?}: {}",
                request.account,
                state,
                e
            );
        }

        result
    }

    fn run_claim(
        &self,
        anchor: TaposAnchor,
        request: &ClaimRequest,
        state: &mut ClaimState,
    ) -> Result<ClaimReceipt, ContractError> {
        let signature = validate_signature(&request.signature)?;
        let account = validate_claim_account(&request.account)?;
        let public_key = parse_public_key(&request.public_key)?;

        if self.ledger.account_exists(&account)? {
            return Err(ContractError::Conflict(format!(
                "account {} already exists",
                account
            )));
        }

        advance(state, ClaimState::Verifying, &account);
        let message = ClaimMessage::new(anchor, &request.public_key, &account);
        let identity = recover_identity(&message, &signature)?;
        let record = self
            .registry
            .find(&identity.ethereum_address)?
            .ok_or_else(|| {
                ContractError::NotFound(format!(
                    "no pending balance for {}",
                    identity.ethereum_address
                ))
            })?;

        advance(state, ClaimState::Splitting, &account);
        let parts = split(&record.balance)?;
        check_split(&record.balance, &parts)?;

        advance(state, ClaimState::PriceChecking, &account);
        let ceiling = self
            .settings
            .get_max_allocation_price()?
            .ok_or(PolicyError::PriceCeilingUnset)?;
        let ram_price = self.ledger.ram_price_for(self.contract.ram_allocation_bytes)?;
        ram_price.require_symbol(&ceiling.symbol)?;
        if ram_price.amount > ceiling.amount {
            return Err(PolicyError::PriceTooHigh {
                price: ram_price,
                ceiling,
            }
            .into());
        }

        advance(state, ClaimState::Provisioning, &account);
        let authority = Authority::single_key(public_key);
        self.ledger
            .create_account(&self.contract.account, &account, &authority, &authority)?;
        let ram_bytes = self
            .ledger
            .buy_ram(&self.contract.ram_payer, &account, &ram_price)?;
        if !(parts.stake_net.is_zero() && parts.stake_cpu.is_zero()) {
            self.ledger.delegate_stake(
                &self.contract.account,
                &account,
                &parts.stake_net,
                &parts.stake_cpu,
                true,
            )?;
        }
        if !parts.liquid.is_zero() {
            self.ledger
                .transfer(&self.contract.account, &account, &parts.liquid, "")?;
        }
        self.registry.remove(&identity.ethereum_address)?;

        advance(state, ClaimState::Committed, &account);
        log::info!(
            "✓ {} claimed {} into {} (net {}, cpu {}, liquid {})",
            identity.ethereum_address,
            record.balance,
            account,
            parts.stake_net,
            parts.stake_cpu,
            parts.liquid
        );

        Ok(ClaimReceipt {
            account,
            ethereum_address: identity.ethereum_address,
            record_id: record.id,
            balance: record.balance,
            stake_net: parts.stake_net,
            stake_cpu: parts.stake_cpu,
            liquid: parts.liquid,
            ram_price,
            ram_bytes,
            claimed_at: Utc::now(),
        })
    }

    fn require_auth(&self, actor: &AccountName) -> Result<(), ContractError> {
        if actor != &self.contract.account {
            return Err(ContractError::Unauthorized(self.contract.account.clone()));
        }
        Ok(())
    }
}

fn advance(state: &mut ClaimState, next: ClaimState, account: &AccountName) {
    log::debug!("claim {}: {:?} -> {:?}", account, state, next);
    *state = next;
}

fn check_split(balance: &Asset, parts: &SplitBalance) -> Result<(), ContractError> {
    if parts.total() != Some(balance.amount) {
        return Err(ContractError::InternalInvariant(format!(
            "split of {} does not add up",
            balance
        )));
    }
    Ok(())
}

/// Require an exactly 66-byte signature
pub fn validate_signature(signature: &[u8]) -> Result<[u8; SIGNATURE_LEN], FormatError> {
    signature
        .try_into()
        .map_err(|_| FormatError::SignatureLength {
            expected: SIGNATURE_LEN,
            actual: signature.len(),
        })
}

/// Require a 12-character name over `a-z1-5`
pub fn validate_claim_account(name: &str) -> Result<AccountName, FormatError> {
    let length = name.chars().count();
    if length != CLAIM_ACCOUNT_NAME_LEN {
        return Err(FormatError::AccountNameLength(length));
    }
    if let Some(bad) = name
        .chars()
        .find(|c| !matches!(c, 'a'..='z' | '1'..='5'))
    {
        return Err(FormatError::AccountNameCharacter(bad));
    }
    Ok(AccountName::new(name)?)
}

/// Require `0x` + 40 hex digits
pub fn validate_address_text(text: &str) -> Result<EthereumAddress, FormatError> {
    let length = text.chars().count();
    if length != ETHEREUM_ADDRESS_TEXT_LEN {
        return Err(FormatError::AddressLength(length));
    }
    Ok(parse_hex_address(text)?)
}
