use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;

use alloy::{
    network::EthereumWallet,
    primitives::{Address, U256},
    providers::ProviderBuilder,
    signers::local::PrivateKeySigner,
};
use clap::Parser;
use eyre::WrapErr;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sweeper::{
    CancelHandle, ClientRegistry, Config, EnsService, NetworkId, RateLimiter, RpcClient,
    SelectionStore, SweepRun, Sweeper, Token, TransferResult,
};

#[derive(Parser)]
#[command(
    name = "sweeper",
    about = "Batch-transfer selected token balances to one destination"
)]
struct Args {
    /// Network configuration file.
    #[arg(long, default_value = "sweeper.toml")]
    config: PathBuf,

    /// JSON file listing discovered tokens and their checked flags.
    #[arg(long)]
    selection: PathBuf,

    /// Destination address or name, e.g. `vitalik.eth`.
    #[arg(long)]
    destination: String,

    /// Hex-encoded private key of the sending account.
    #[arg(long, env = "SWEEPER_PRIVATE_KEY", hide_env_values = true)]
    private_key: String,
}

/// One entry of the selection file, as produced by the balance-discovery
/// front-end.
#[derive(Debug, Deserialize)]
struct SelectionEntry {
    network: String,
    contract: String,
    ticker: String,
    /// Base-unit balance as a decimal string.
    balance: String,
    #[serde(default)]
    decimals: u8,
    #[serde(default)]
    checked: bool,
}

fn load_selection(path: &Path) -> eyre::Result<SelectionStore> {
    let raw = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read selection file {}", path.display()))?;
    let entries: Vec<SelectionEntry> =
        serde_json::from_str(&raw).wrap_err("failed to parse selection file")?;

    let mut store = SelectionStore::new();
    for entry in entries {
        let contract: Address = entry
            .contract
            .parse()
            .wrap_err_with(|| format!("bad contract address for {}", entry.ticker))?;
        let raw_balance = U256::from_str(&entry.balance)
            .wrap_err_with(|| format!("bad balance for {}", entry.ticker))?;
        store.insert(Token {
            network: NetworkId::new(entry.network),
            contract,
            ticker: entry.ticker,
            raw_balance,
            decimals: entry.decimals,
        });
        if entry.checked {
            store.set_checked(contract, true);
        }
    }
    Ok(store)
}

fn build_registry(config: &Config, wallet: &EthereumWallet) -> eyre::Result<ClientRegistry> {
    let mut registry = ClientRegistry::new();
    for (name, net) in &config.networks {
        let url = net
            .rpc_url
            .parse()
            .wrap_err_with(|| format!("bad rpc url for network {name}"))?;
        let provider = ProviderBuilder::new()
            .with_recommended_fillers()
            .wallet(wallet.clone())
            .on_http(url);

        let network = NetworkId::new(name.as_str());
        info!(%network, chain_id = net.chain_id, "registered client");
        registry.register(network.clone(), Arc::new(RpcClient::new(provider.clone())));

        if let Some(raw) = &net.ens_registry {
            let ens: Address = raw
                .parse()
                .wrap_err_with(|| format!("bad ens registry address for network {name}"))?;
            registry.register_name_service(network, Arc::new(EnsService::new(provider, ens)));
        }
    }
    Ok(registry)
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = Config::load(&args.config)?;

    let signer = PrivateKeySigner::from_str(args.private_key.trim())
        .wrap_err("invalid sending account private key")?;
    let account = signer.address();
    let wallet = EthereumWallet::from(signer);

    let registry = build_registry(&config, &wallet)?;
    let mut store = load_selection(&args.selection)?;

    let cancel = CancelHandle::new();
    let ctrlc = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            ctrlc.cancel();
        }
    });

    let sweeper = Sweeper::new(registry, RateLimiter::new(config.delay()));
    match sweeper
        .run(&mut store, &args.destination, Some(account), &cancel)
        .await?
    {
        SweepRun::NotStarted(reason) => {
            println!("nothing to do: {reason:?}");
        }
        SweepRun::Completed(outcomes) => {
            for outcome in &outcomes {
                let token = &outcome.token;
                match &outcome.result {
                    TransferResult::Success(hash) => {
                        println!("{} ({}): submitted {hash}", token.ticker, token.network);
                    }
                    TransferResult::SimulationFailed(reason) => {
                        println!("{} ({}): simulation failed: {reason}", token.ticker, token.network);
                    }
                    TransferResult::SubmissionFailed(reason) => {
                        println!("{} ({}): submission failed: {reason}", token.ticker, token.network);
                    }
                    TransferResult::Skipped(reason) => {
                        println!("{} ({}): skipped ({reason:?})", token.ticker, token.network);
                    }
                }
            }
            let sent = outcomes
                .iter()
                .filter(|o| o.result.is_success())
                .count();
            println!("{sent}/{} transfers submitted", outcomes.len());
        }
    }

    Ok(())
}
