use crate::config::{Config, ConsensusConfig};
use crate::consensus::ChainValidator;
use crate::core::{Block, LedgerContext, Transaction};
use crate::crypto::hash::Hash256;
use crate::mining::Miner;
use crate::storage::ChainSnapshot;
use crate::wallet::Wallet;
use anyhow::Context;
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "pow-ledger")]
#[command(about = "Proof-of-work UTXO ledger: mine, validate and inspect chains")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    #[arg(long, help = "Enable debug logging")]
    pub debug: bool,

    #[arg(long, help = "Configuration file path")]
    pub config: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Build a two-block chain: genesis grants Alice 100, Alice pays Bob 20
    Demo {
        #[arg(long, help = "Leading zero hex digits required in block hashes")]
        difficulty: Option<u32>,

        #[arg(long, help = "Mining threads (0 = all cores)")]
        threads: Option<usize>,

        #[arg(long, help = "Write the resulting chain to this file")]
        output: Option<PathBuf>,
    },

    /// Replay a saved chain and report the first violation
    Validate {
        /// Chain file (defaults to the configured chain path)
        path: Option<PathBuf>,
    },

    /// Show height, tip and per-block details of a saved chain
    Info {
        /// Chain file (defaults to the configured chain path)
        path: Option<PathBuf>,

        #[arg(long, help = "List every transaction")]
        verbose: bool,
    },

    /// Print the effective configuration
    Config,
}

pub fn run_cli(config: Config) -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize logging once
    let _ = if cli.debug {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).try_init()
    } else {
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).try_init()
    };

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => config,
    };

    execute(cli.command, config)
}

pub fn execute(command: Commands, mut config: Config) -> anyhow::Result<()> {
    match command {
        Commands::Demo { difficulty, threads, output } => {
            if let Some(difficulty) = difficulty {
                config.consensus.difficulty = difficulty;
            }
            if let Some(threads) = threads {
                config.mining.threads = threads;
            }
            config.validate()?;

            let snapshot = run_demo(&config)?;
            if let Some(path) = output {
                snapshot.save(&path)?;
                println!("💾 Chain written to {}", path.display());
            }
            Ok(())
        }

        Commands::Validate { path } => {
            let path = path.unwrap_or_else(|| config.chain_path());
            validate_file(&path)
        }

        Commands::Info { path, verbose } => {
            let path = path.unwrap_or_else(|| config.chain_path());
            show_info(&path, verbose)
        }

        Commands::Config => {
            println!("⚙️  Configuration ({})", Config::config_path().display());
            println!("{}", serde_json::to_string_pretty(&config)?);
            Ok(())
        }
    }
}

/// Run the two-party scenario and return the resulting chain.
pub fn run_demo(config: &Config) -> anyhow::Result<ChainSnapshot> {
    let params: ConsensusConfig = config.consensus;
    let ledger = LedgerContext::with_miner(params, Miner::from_config(&config.mining))?;

    let coinbase = Wallet::new()?;
    let alice = Wallet::new()?;
    let bob = Wallet::new()?;

    println!("⛏️  Mining at difficulty {} with {} thread(s)", params.difficulty, ledger.miner().threads());

    let mut genesis_tx = Transaction::new(coinbase.public_key().clone(), alice.public_key().clone(), 100, vec![]);
    genesis_tx.sign(coinbase.private_key())?;
    ledger.apply_genesis(&mut genesis_tx)?;

    let mut genesis = Block::new(Hash256::zero());
    genesis.add_transaction(genesis_tx, &ledger)?;
    let genesis_hash = ledger.add_block(&mut genesis)?;
    println!("📦 Genesis block: {}", genesis_hash);
    print_balances(&ledger, &alice, &bob)?;

    let payment = alice.send_funds(&ledger, bob.public_key(), 20)?;
    let mut block = Block::new(genesis_hash);
    block.add_transaction(payment, &ledger)?;
    let hash = ledger.add_block(&mut block)?;
    println!("📦 Block 1: {}", hash);
    print_balances(&ledger, &alice, &bob)?;

    // A second attempt to spend the same funds must be rejected
    let replay = ledger.blocks()?
        .last()
        .and_then(|block| block.transactions.first().cloned());
    if let Some(mut replay) = replay {
        match ledger.apply_transaction(&mut replay) {
            Ok(_) => anyhow::bail!("Replayed transaction was accepted"),
            Err(e) => println!("🚫 Replayed transaction rejected: {}", e),
        }
    }

    match ledger.validate() {
        Ok(()) => println!("✅ Chain is valid"),
        Err(e) => anyhow::bail!("Chain failed validation: {}", e),
    }

    Ok(ledger.snapshot()?)
}

fn print_balances(ledger: &LedgerContext, alice: &Wallet, bob: &Wallet) -> anyhow::Result<()> {
    println!("💰 Alice: {}  Bob: {}", alice.balance(ledger)?, bob.balance(ledger)?);
    Ok(())
}

fn validate_file(path: &Path) -> anyhow::Result<()> {
    let snapshot = ChainSnapshot::load(path)
        .with_context(|| format!("Failed to read chain from {}", path.display()))?;
    let validator = ChainValidator::new(snapshot.difficulty);

    match validator.validate_chain(&snapshot.blocks, &snapshot.genesis_transaction) {
        Ok(()) => {
            println!("✅ Chain of {} blocks is valid", snapshot.blocks.len());
            Ok(())
        }
        Err(e) => {
            println!("❌ Chain is invalid: {}", e);
            Err(e.into())
        }
    }
}

fn show_info(path: &Path, verbose: bool) -> anyhow::Result<()> {
    let snapshot = ChainSnapshot::load(path)
        .with_context(|| format!("Failed to read chain from {}", path.display()))?;
    let tip = crate::consensus::validation::chain_tip(&snapshot.blocks);

    println!("⛓️  Chain Information:");
    println!("Height: {}", snapshot.blocks.len());
    println!("Tip hash: {}", tip);
    println!("Difficulty: {}", snapshot.difficulty);
    println!("Minimum transaction amount: {}", snapshot.minimum_transaction_amount);

    for (height, block) in snapshot.blocks.iter().enumerate() {
        let timestamp = chrono::DateTime::<chrono::Utc>::from_timestamp_millis(block.header.timestamp)
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| block.header.timestamp.to_string());

        println!();
        println!("📦 Block {}", height);
        println!("Hash: {}", block.hash);
        println!("Previous hash: {}", block.header.previous_hash);
        println!("Timestamp: {}", timestamp);
        println!("Nonce: {}", block.header.nonce);
        println!("Transactions: {}", block.transactions.len());

        if verbose {
            for tx in &block.transactions {
                let id = tx.id.map(|id| id.to_hex()).unwrap_or_else(|| "-".to_string());
                println!("  {} : {} -> {} ({})", id, tx.sender, tx.recipient, tx.amount);
            }
        }
    }

    Ok(())
}
