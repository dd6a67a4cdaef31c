use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use tracing::Level;
use tracing_subscriber::filter::Targets;
use tracing_subscriber::prelude::*;

use utxo_merge::config::Config;
use utxo_merge::merge::merge_utxos;
use utxo_merge::merge_utils::listing::{listing_line, merge_summary};
use utxo_merge::merge_utils::selection_parser::SelectionParser;
use utxo_merge::merge_utils::utxo_filter::UtxoFilter;
use utxo_merge::prompt;
use utxo_merge::rpc::{NodeApi, RpcClient};

const NOT_MERGED: &str = "Not Merge UTXOs, Exit...";

#[derive(Parser, Debug)]
#[clap(version, about = "Merge account UTXOs into a single output")]
pub struct Cli {
    /// path to config file
    #[clap(long, value_parser)]
    config_path: Option<PathBuf>,

    /// API endpoint
    #[clap(short = 'o', long = "url", value_parser)]
    endpoint: Option<String>,

    /// HTTP Basic Auth Username
    #[clap(long, value_parser)]
    http_user: Option<String>,

    /// HTTP Basic Auth Password
    #[clap(long, value_parser)]
    http_pass: Option<String>,

    /// HTTPS Client Certificate
    #[clap(long = "cert", value_parser)]
    https_cert: Option<PathBuf>,

    /// HTTPS Client Key
    #[clap(long = "key", value_parser)]
    https_key: Option<PathBuf>,

    /// HTTPS CA Certificate
    #[clap(long = "ca", value_parser)]
    https_ca: Option<PathBuf>,

    /// Do not verify HTTPS server certificate
    #[clap(long, action)]
    no_verify: bool,

    /// Account Password
    #[clap(short = 'p', long = "pass", value_parser)]
    account_pass: Option<String>,

    /// Show UTXO list without merge
    #[clap(short = 'l', long = "list", action)]
    only_list: bool,

    /// UTXO to merge
    #[clap(short = 'm', long = "merge", value_parser)]
    merge_list: Option<String>,

    /// Transfer address
    #[clap(short = 'a', long, value_parser)]
    address: Option<String>,

    /// Confirm transfer
    #[clap(short = 'y', long = "yes", action)]
    confirm: bool,

    /// milliseconds to wait between fee estimation and rebuilding the transaction
    #[clap(long, value_parser)]
    rebuild_delay_ms: Option<u64>,

    /// debug logging
    #[clap(short = 'v', long, action)]
    verbose: bool,
}

#[tokio::main]
async fn main() {
    if let Err(err) = _main().await {
        eprintln!("Error: {:#}", err);
        std::process::exit(1);
    }
}

async fn _main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Start logging setup block
    let fmt_layer = tracing_subscriber::fmt::layer().with_writer(std::io::stderr);

    let filter = Targets::new()
        .with_target("reqwest", Level::WARN)
        .with_target("hyper", Level::WARN)
        .with_target("rustls", Level::WARN)
        .with_default(if cli.verbose { Level::DEBUG } else { Level::INFO });

    tracing_subscriber::registry()
        .with(fmt_layer)
        .with(filter)
        .init();

    let config = load_config(&cli)?;
    tracing::info!("Node endpoint {}", config.endpoint);

    let node = RpcClient::new(config.rpc_config()?).context("Failed to build RPC client")?;

    let listing = node
        .list_unspent_outputs()
        .await
        .context("Cannot list unspent outputs")?;
    let current_height = node
        .get_block_count()
        .await
        .context("Cannot get block count")?;
    tracing::info!("{} UTXOs at height {}", listing.len(), current_height);

    for (index, utxo) in listing.iter().enumerate() {
        println!("{}", listing_line(index, utxo, current_height));
    }

    if cli.only_list {
        return Ok(());
    }

    let selection = prompt::given_or_ask(cli.merge_list.clone(), || {
        prompt::read_line("Merge UTXOs (1,3,5 or 1-10 or all): ")
    })?;

    let filter = UtxoFilter::new(&listing, current_height);
    let outcome = filter.apply(
        SelectionParser::new(&selection, 0..listing.len()),
        |warning| println!("{}", warning),
    );

    if !outcome.is_mergeable() {
        println!("{}", NOT_MERGED);
        return Ok(());
    }

    let merge_set = filter.merge_set(&outcome);
    println!("{}", merge_summary(&merge_set));

    let address =
        prompt::given_or_ask(cli.address.clone(), || prompt::read_line("Transfer Address: "))?;
    let password = prompt::given_or_ask(cli.account_pass.clone(), || {
        prompt::read_secret("Account Password: ")
    })?;

    if !(cli.confirm || prompt::confirm("Confirm [y/N] ")?) {
        println!("{}", NOT_MERGED);
        return Ok(());
    }

    let tx_id = merge_utxos(
        &node,
        &merge_set,
        &address,
        &password,
        &config.merge_settings(),
    )
    .await
    .context("Merge failed")?;
    println!("{}", tx_id);

    Ok(())
}

fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config_path {
        Some(path) => {
            tracing::info!("Config file {:?}", path);
            Config::load(path)?
        }
        None => Config::default(),
    };

    if let Some(endpoint) = &cli.endpoint {
        config.endpoint = endpoint.clone();
    }
    if cli.http_user.is_some() {
        config.http_user = cli.http_user.clone();
    }
    if cli.http_pass.is_some() {
        config.http_pass = cli.http_pass.clone();
    }
    if cli.https_cert.is_some() {
        config.https_cert = cli.https_cert.clone();
    }
    if cli.https_key.is_some() {
        config.https_key = cli.https_key.clone();
    }
    if cli.https_ca.is_some() {
        config.https_ca = cli.https_ca.clone();
    }
    config.no_verify |= cli.no_verify;
    if let Some(delay) = cli.rebuild_delay_ms {
        config.rebuild_delay_ms = delay;
    }

    Ok(config)
}
