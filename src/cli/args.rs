//! CLI argument definitions using clap

use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "unregd",
    version,
    about = "unregd - Claim Ethereum snapshot balances as new accounts",
    long_about = None
)]
pub struct Cli {
    /// Contract account (overrides config)
    #[arg(long, global = true)]
    pub contract_account: Option<String>,

    /// Account paying for new accounts' RAM (overrides config)
    #[arg(long, global = true)]
    pub ram_payer: Option<String>,

    /// Core token symbol, e.g. "4,EOS" (overrides config)
    #[arg(long, global = true)]
    pub core_symbol: Option<String>,

    /// RAM bytes bought per claimed account (overrides config)
    #[arg(long, global = true)]
    pub ram_bytes: Option<u64>,

    /// Custom data directory for the contract database
    #[arg(long, global = true)]
    pub data_dir: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Initialize or manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Add or replace the pending balance of an Ethereum address
    Add {
        /// Ethereum address ("0x" + 40 hex digits)
        address: String,

        /// Balance, e.g. "150.0000 EOS"
        balance: String,

        /// Acting account; omitted means the contract account
        #[arg(long)]
        actor: Option<String>,
    },

    /// Move a pending balance to a different Ethereum address
    ChangeAddress {
        /// Address currently holding the balance
        old_address: String,

        /// Address to move it to
        new_address: String,

        /// Acting account; omitted means the contract account
        #[arg(long)]
        actor: Option<String>,
    },

    /// Set the maximum RAM price paid per claimed account
    SetMaxPrice {
        /// Price ceiling, e.g. "1.0000 EOS"
        amount: String,

        /// Acting account; omitted means the contract account
        #[arg(long)]
        actor: Option<String>,
    },

    /// Claim a pending balance into a new account
    Claim {
        /// 66-byte signature as hex
        #[arg(short, long)]
        signature: String,

        /// Account to create (12 characters, a-z and 1-5)
        #[arg(short, long)]
        account: String,

        /// Public key controlling the new account
        #[arg(short, long)]
        public_key: String,

        #[command(flatten)]
        anchor: AnchorArgs,
    },

    /// Show the pending balance of an Ethereum address
    Show {
        /// Ethereum address
        address: String,
    },

    /// List all pending balances
    List,

    /// Print the Ethereum address of a secret key
    EthAddress {
        /// 32-byte secret key as hex
        #[arg(long)]
        secret_key: String,
    },

    /// Sign a claim with an Ethereum secret key
    SignClaim {
        /// 32-byte secret key as hex
        #[arg(long)]
        secret_key: String,

        /// Account to create
        #[arg(short, long)]
        account: String,

        /// Public key controlling the new account
        #[arg(short, long)]
        public_key: String,

        #[command(flatten)]
        anchor: AnchorArgs,
    },

    /// Inspect and administer the local host ledger
    Ledger {
        #[command(subcommand)]
        action: LedgerAction,
    },
}

/// Transaction reference block a claim is bound to
#[derive(Args, Debug, Clone)]
pub struct AnchorArgs {
    /// Reference block id as hex (alternative to num + prefix)
    #[arg(long, conflicts_with_all = ["ref_block_num", "ref_block_prefix"])]
    pub block_id: Option<String>,

    /// Reference block number (low 16 bits)
    #[arg(long, requires = "ref_block_prefix")]
    pub ref_block_num: Option<u32>,

    /// Reference block prefix
    #[arg(long, requires = "ref_block_num")]
    pub ref_block_prefix: Option<u32>,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Initialize configuration file with defaults
    Init,
}

#[derive(Subcommand, Debug)]
pub enum LedgerAction {
    /// Credit new tokens to an account
    Issue {
        /// Receiving account
        to: String,

        /// Quantity, e.g. "1000.0000 EOS"
        quantity: String,

        /// Memo
        #[arg(short, long, default_value = "")]
        memo: String,
    },

    /// Create an account controlled by a public key
    CreateAccount {
        /// Account name
        name: String,

        /// Public key for owner and active authority
        public_key: String,

        /// Creator (defaults to the contract account)
        #[arg(long)]
        creator: Option<String>,
    },

    /// Reset the RAM market reserves
    SetRamMarket {
        /// Bytes available for sale
        base_bytes: u64,

        /// Token reserve, e.g. "1000000.0000 EOS"
        quote: String,
    },

    /// Show an account with its balance, stake and RAM
    Account {
        /// Account name
        name: String,
    },
}
