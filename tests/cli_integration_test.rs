//! CLI Integration Test
//!
//! Runs the actual CLI binary through a full claim: fund the ledger, load a
//! pending balance, sign a claim with the claimant's key and submit it.

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

const SECRET_KEY: &str = "0101010101010101010101010101010101010101010101010101010101010101";
const DEV_KEY: &str = "EOS6MRyAjQq8ud7hVNYcfnVPJqcVpscN5So8BhtHuGYqET5GDW5CV";

/// Helper to run CLI commands and capture output
struct CliRunner {
    home_dir: PathBuf,
    data_dir: PathBuf,
    bin_path: PathBuf,
}

impl CliRunner {
    fn new(root: &Path) -> Self {
        Self {
            home_dir: root.join("home"),
            data_dir: root.join("data"),
            bin_path: PathBuf::from(env!("CARGO_BIN_EXE_unregd")),
        }
    }

    fn command(&self, args: &[&str]) -> Command {
        let mut command = Command::new(&self.bin_path);
        command
            .args(["--data-dir", self.data_dir.to_str().unwrap()])
            .args(args)
            .env("HOME", &self.home_dir)
            .env("RUST_LOG", "warn") // Suppress debug logs unless needed
            .env_remove("UNREGD_CONTRACT_ACCOUNT")
            .env_remove("UNREGD_RAM_PAYER")
            .env_remove("UNREGD_CORE_SYMBOL")
            .env_remove("UNREGD_RAM_BYTES")
            .env_remove("UNREGD_DATA_DIR");
        command
    }

    /// Run a CLI command and return stdout
    fn run(&self, args: &[&str]) -> Result<String, String> {
        let output = self
            .command(args)
            .output()
            .map_err(|e| format!("Failed to execute CLI: {}", e))?;

        if !output.status.success() {
            return Err(format!(
                "CLI command failed:\nstdout: {}\nstderr: {}",
                String::from_utf8_lossy(&output.stdout),
                String::from_utf8_lossy(&output.stderr)
            ));
        }

        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }

    /// Run a CLI command expected to fail and return stderr
    fn run_failing(&self, args: &[&str]) -> String {
        let output = self.command(args).output().expect("Failed to execute CLI");
        assert!(
            !output.status.success(),
            "Command {:?} should have failed:\n{}",
            args,
            String::from_utf8_lossy(&output.stdout)
        );
        String::from_utf8_lossy(&output.stderr).to_string()
    }
}

fn field<'a>(output: &'a str, label: &str) -> &'a str {
    output
        .lines()
        .find_map(|line| line.trim().strip_prefix(label))
        .map(str::trim)
        .unwrap_or_else(|| panic!("No {:?} in output:\n{}", label, output))
}

#[test]
fn test_cli_full_claim_flow() {
    let temp_dir = TempDir::new().unwrap();
    let cli = CliRunner::new(temp_dir.path());

    // Fund the contract and RAM payer, open the RAM market
    cli.run(&["ledger", "issue", "eosio.unregd", "100000.0000 EOS"]).unwrap();
    cli.run(&["ledger", "issue", "eosio.regram", "1000.0000 EOS"]).unwrap();
    let market = cli
        .run(&["ledger", "set-ram-market", "1000000", "1000.0000 EOS"])
        .unwrap();
    assert!(market.contains("8.2597 EOS"), "{}", market);
    cli.run(&["set-max-price", "10.0000 EOS"]).unwrap();

    // Claimant looks up their address; admin loads the balance
    let address = cli.run(&["eth-address", "--secret-key", SECRET_KEY]).unwrap();
    let address = address.trim();
    assert!(address.starts_with("0x") && address.len() == 42);
    cli.run(&["add", address, "150.0000 EOS"]).unwrap();

    let shown = cli.run(&["show", address]).unwrap();
    assert!(shown.contains("150.0000 EOS"), "{}", shown);

    // Sign and submit
    let signed = cli
        .run(&[
            "sign-claim",
            "--secret-key",
            SECRET_KEY,
            "--account",
            "alice1234512",
            "--public-key",
            DEV_KEY,
            "--ref-block-num",
            "4321",
            "--ref-block-prefix",
            "3735928559",
        ])
        .unwrap();
    assert_eq!(field(&signed, "Signer:"), address);
    let signature = field(&signed, "Signature:").to_string();
    assert_eq!(signature.len(), 132);

    let claimed = cli
        .run(&[
            "claim",
            "--signature",
            &signature,
            "--account",
            "alice1234512",
            "--public-key",
            DEV_KEY,
            "--ref-block-num",
            "4321",
            "--ref-block-prefix",
            "3735928559",
        ])
        .unwrap();
    assert!(claimed.contains("Account 'alice1234512' created"), "{}", claimed);
    assert_eq!(field(&claimed, "Liquid:"), "10.0000 EOS");

    // Account is on the ledger; the balance is gone
    let account = cli.run(&["ledger", "account", "alice1234512"]).unwrap();
    assert_eq!(field(&account, "Liquid:"), "10.0000 EOS");
    assert_eq!(field(&account, "Staked:"), "net 70.0000 EOS, cpu 70.0000 EOS");

    let list = cli.run(&["list"]).unwrap();
    assert!(list.contains("No pending balances"), "{}", list);

    // Replay is rejected
    let stderr = cli.run_failing(&[
        "claim",
        "--signature",
        &signature,
        "--account",
        "alice1234512",
        "--public-key",
        DEV_KEY,
        "--ref-block-num",
        "4321",
        "--ref-block-prefix",
        "3735928559",
    ]);
    assert!(stderr.contains("Error:"), "{}", stderr);
}

#[test]
fn test_cli_rejects_non_contract_actor() {
    let temp_dir = TempDir::new().unwrap();
    let cli = CliRunner::new(temp_dir.path());

    let stderr = cli.run_failing(&[
        "add",
        "0x00000000000000000000000000000000000000aa",
        "1.0000 EOS",
        "--actor",
        "mallory",
    ]);
    assert!(stderr.contains("Missing required authority"), "{}", stderr);

    let list = cli.run(&["list"]).unwrap();
    assert!(list.contains("No pending balances"), "{}", list);
}

#[test]
fn test_cli_admin_help_states_default_actor() {
    let temp_dir = TempDir::new().unwrap();
    let cli = CliRunner::new(temp_dir.path());

    for command in ["add", "change-address", "set-max-price"] {
        let help = cli.run(&[command, "--help"]).unwrap();
        assert!(
            help.contains("omitted means the contract account"),
            "{} help:\n{}",
            command,
            help
        );
    }
}

#[test]
fn test_cli_claim_requires_anchor() {
    let temp_dir = TempDir::new().unwrap();
    let cli = CliRunner::new(temp_dir.path());

    let stderr = cli.run_failing(&[
        "claim",
        "--signature",
        "00",
        "--account",
        "alice1234512",
        "--public-key",
        DEV_KEY,
    ]);
    assert!(stderr.contains("--block-id"), "{}", stderr);
}

#[test]
fn test_cli_config_init_writes_overrides() {
    let temp_dir = TempDir::new().unwrap();
    let cli = CliRunner::new(temp_dir.path());

    cli.run(&["--ram-bytes", "4096", "config", "init"]).unwrap();

    let config_path = temp_dir.path().join("home").join(".unregd").join("config.json");
    let contents = std::fs::read_to_string(config_path).unwrap();
    let config: unregd::config::GlobalConfig = serde_json::from_str(&contents).unwrap();

    assert_eq!(config.contract.ram_allocation_bytes, 4096);
    assert_eq!(config.contract.account.as_str(), "eosio.unregd");
}
