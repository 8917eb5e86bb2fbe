use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::DEFAULT_CONFIG_PATH;

/// tomox-mm: market maker for TomoX relayer pairs.
#[derive(Parser, Debug)]
#[command(name = "tomox-mm", version)]
pub struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,

    /// Path to the JSON config file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH, global = true)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Run the market maker loop for one pair
    MarketMaker(PairArgs),

    /// Print the reference price of a pair once
    Ticker(PairArgs),

    /// Print spot balances on the reference venue
    Balance,

    /// Cancel a single order
    Cancel(CancelArgs),
}

/// Arguments for subcommands scoped to one pair.
#[derive(Parser, Debug)]
pub struct PairArgs {
    /// Pair symbol as configured (e.g. BTC-TOMO)
    pub pair: String,
}

/// Arguments for the `cancel` subcommand.
#[derive(Parser, Debug)]
pub struct CancelArgs {
    /// Pair symbol whose signing key owns the order
    pub pair: String,

    /// Order hash (0x-prefixed)
    pub hash: String,

    /// Nonce to sign the cancellation with
    pub nonce: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_market_maker_with_globals() {
        let cli = Cli::parse_from([
            "tomox-mm",
            "market-maker",
            "BTC-TOMO",
            "--log-level",
            "debug",
            "--config",
            "cfg.json",
        ]);
        assert_eq!(cli.log_level, "debug");
        assert_eq!(cli.config, PathBuf::from("cfg.json"));
        assert!(matches!(cli.command, Command::MarketMaker(PairArgs { ref pair }) if pair == "BTC-TOMO"));
    }

    #[test]
    fn test_parse_cancel_defaults_config_path() {
        let cli = Cli::parse_from(["tomox-mm", "cancel", "ETH-TOMO", "0xabc", "42"]);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_PATH));
        match cli.command {
            Command::Cancel(args) => {
                assert_eq!(args.pair, "ETH-TOMO");
                assert_eq!(args.hash, "0xabc");
                assert_eq!(args.nonce, 42);
            }
            other => panic!("unexpected command {other:?}"),
        }
    }

    #[test]
    fn test_cli_definition_is_valid() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
