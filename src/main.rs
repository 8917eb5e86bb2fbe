mod cli;
mod client;
mod config;
mod error;
mod gateway;
mod mm;
mod price;
mod units;

use clap::Parser;
use cli::{CancelArgs, Command};
use config::FileConfig;
use error::MmError;
use gateway::ExchangeGateway;
use mm::bot::MarketMaker;
use mm::draws::RngDraws;
use price::XtClient;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio_util::sync::CancellationToken;
use tracing::info;

#[tokio::main]
async fn main() {
    let cli = cli::Cli::parse();

    // Initialize tracing
    let filter = cli
        .log_level
        .parse::<tracing_subscriber::filter::LevelFilter>()
        .unwrap_or(tracing_subscriber::filter::LevelFilter::INFO);

    tracing_subscriber::fmt()
        .with_max_level(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let _ = dotenvy::dotenv(); // load .env if present

    let result = match FileConfig::load(&cli.config) {
        Ok(file) => match cli.command {
            Command::MarketMaker(args) => run_market_maker(&file, &args.pair).await,
            Command::Ticker(args) => print_ticker(&file, &args.pair).await,
            Command::Balance => print_balance(&file).await,
            Command::Cancel(args) => cancel_one(&file, args).await,
        },
        Err(e) => Err(e),
    };

    if let Err(e) = result {
        tracing::error!(error = %e, "fatal error");
        std::process::exit(1);
    }
}

fn xt_client(file: &FileConfig) -> Result<XtClient, MmError> {
    let access_key = std::env::var("XT_ACCESS_KEY")
        .ok()
        .or_else(|| file.xt.access_key.clone());
    let secret_key = std::env::var("XT_SECRET_KEY")
        .ok()
        .or_else(|| file.xt.secret_key.clone());
    XtClient::new(&file.xt.url, access_key, secret_key)
}

async fn run_market_maker(file: &FileConfig, pair: &str) -> Result<(), MmError> {
    let config = file.market_maker_config(pair, std::env::var("PRIVATE_KEY").ok())?;

    let relayer = client::create_relayer_client(&file.relayer_url, &config.private_key).await?;
    client::verify_pair(&relayer, &config).await?;

    let draws = Box::new(RngDraws(StdRng::from_entropy()));
    let mut bot = MarketMaker::start(config, relayer, xt_client(file)?, draws).await?;

    // Shared cancellation token + signal handlers.
    let cancel = setup_signal_handlers();
    bot.run(cancel).await;
    Ok(())
}

async fn print_ticker(file: &FileConfig, pair: &str) -> Result<(), MmError> {
    let symbol = file
        .pairs
        .get(pair)
        .and_then(|p| p.ticker_symbol.clone())
        .unwrap_or_else(|| mm::config::derive_ticker_symbol(pair));
    let price = xt_client(file)?.get_latest_price(&symbol).await?;
    println!("{symbol}\t{price}");
    Ok(())
}

async fn print_balance(file: &FileConfig) -> Result<(), MmError> {
    let balances = xt_client(file)?.get_balance().await?;
    for (asset, balance) in &balances {
        println!("{asset}\t{}\t{}", balance.available, balance.freeze);
    }
    Ok(())
}

async fn cancel_one(file: &FileConfig, args: CancelArgs) -> Result<(), MmError> {
    let config = file.market_maker_config(&args.pair, std::env::var("PRIVATE_KEY").ok())?;
    let relayer = client::create_relayer_client(&file.relayer_url, &config.private_key).await?;
    ExchangeGateway::cancel_order(&relayer, &args.hash, args.nonce).await?;
    info!(pair = %config.pair, hash = %args.hash, nonce = args.nonce, "CANCEL");
    Ok(())
}

/// Register SIGINT and SIGTERM handlers that trigger the returned token.
fn setup_signal_handlers() -> CancellationToken {
    let cancel = CancellationToken::new();

    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        let _ = tokio::signal::ctrl_c().await;
        info!("received SIGINT, shutting down");
        cancel_clone.cancel();
    });

    #[cfg(unix)]
    {
        let cancel_clone = cancel.clone();
        tokio::spawn(async move {
            let mut sig = tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
                .expect("failed to register SIGTERM handler");
            sig.recv().await;
            info!("received SIGTERM, shutting down");
            cancel_clone.cancel();
        });
    }

    cancel
}
