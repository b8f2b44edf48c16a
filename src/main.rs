//! unregd CLI
//!
//! Command-line interface for loading snapshot balances and claiming them as accounts

use clap::Parser;
use std::process;
use unregd::cli::args::{Cli, Commands, ConfigAction, LedgerAction};
use unregd::cli::commands;
use unregd::config::ConfigOverrides;

fn main() {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();

    // Build config overrides from global arguments
    let overrides = ConfigOverrides {
        contract_account: cli.contract_account.clone(),
        ram_payer: cli.ram_payer.clone(),
        core_symbol: cli.core_symbol.clone(),
        ram_allocation_bytes: cli.ram_bytes,
        data_dir: cli.data_dir.clone(),
    };

    let result: Result<(), Box<dyn std::error::Error>> = match cli.command {
        Commands::Config { action } => match action {
            ConfigAction::Init => commands::config::init(overrides).map_err(Into::into),
        },

        Commands::Add {
            address,
            balance,
            actor,
        } => commands::registry::add(address, balance, actor, overrides).map_err(Into::into),

        Commands::ChangeAddress {
            old_address,
            new_address,
            actor,
        } => commands::registry::change_address(old_address, new_address, actor, overrides)
            .map_err(Into::into),

        Commands::SetMaxPrice { amount, actor } => {
            commands::registry::set_max_price(amount, actor, overrides).map_err(Into::into)
        }

        Commands::Claim {
            signature,
            account,
            public_key,
            anchor,
        } => commands::claim::claim(signature, account, public_key, anchor, overrides)
            .map_err(Into::into),

        Commands::Show { address } => commands::registry::show(address, overrides).map_err(Into::into),

        Commands::List => commands::registry::list(overrides).map_err(Into::into),

        Commands::EthAddress { secret_key } => {
            commands::client::eth_address(secret_key).map_err(Into::into)
        }

        Commands::SignClaim {
            secret_key,
            account,
            public_key,
            anchor,
        } => commands::client::sign(secret_key, account, public_key, anchor).map_err(Into::into),

        Commands::Ledger { action } => match action {
            LedgerAction::Issue { to, quantity, memo } => {
                commands::ledger::issue(to, quantity, memo, overrides).map_err(Into::into)
            }

            LedgerAction::CreateAccount {
                name,
                public_key,
                creator,
            } => commands::ledger::create_account(name, public_key, creator, overrides)
                .map_err(Into::into),

            LedgerAction::SetRamMarket { base_bytes, quote } => {
                commands::ledger::set_ram_market(base_bytes, quote, overrides).map_err(Into::into)
            }

            LedgerAction::Account { name } => {
                commands::ledger::account(name, overrides).map_err(Into::into)
            }
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
