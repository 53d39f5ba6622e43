use pow_ledger::cli::commands::run_cli;
use pow_ledger::config::Config;

fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::load().unwrap_or_default();

    // Run CLI (logging is initialized there based on the debug flag)
    run_cli(config)?;

    Ok(())
}
