use std::sync::Arc;

use eyre::{eyre, Result};

use dln_bridger::chains::known_chain;
use dln_bridger::config::Config;
use dln_bridger::evm::Erc20Ops;
use dln_bridger::{
    AllowanceGuard, BridgeOrchestrator, BridgeRequest, ChainBackend, ChainFamily, DlnClient,
    EvmBackend, EvmIdentity, SolanaBackend, SolanaIdentity, TokenRef,
};

fn main() -> Result<()> {
    // Install color-eyre for better error reporting
    color_eyre::install()?;

    // Run the async main
    tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?
        .block_on(async_main())
}

async fn async_main() -> Result<()> {
    init_logging();

    tracing::info!("Starting DLN bridger");

    let config = Config::load()?;
    tracing::info!(
        src_chain_id = config.route.src_chain_id,
        dst_chain_id = config.route.dst_chain_id,
        amount = config.route.amount,
        "Configuration loaded"
    );

    let (orchestrator, request) = build_run(&config)?;

    let tx_id = orchestrator.run_bridge(&request).await?;
    tracing::info!(tx_id = %tx_id, "Bridge order submitted");

    Ok(())
}

/// Materialize identities and backends from config and assemble one run.
///
/// Key material is loaded HERE, at the binary boundary, and handed to the
/// library as opaque identities.
fn build_run(config: &Config) -> Result<(BridgeOrchestrator, BridgeRequest)> {
    let source = known_chain(config.route.src_chain_id)
        .ok_or_else(|| eyre!("unknown source chain {}", config.route.src_chain_id))?;
    let dest = known_chain(config.route.dst_chain_id)
        .ok_or_else(|| eyre!("unknown destination chain {}", config.route.dst_chain_id))?;

    // Identities for each family present in the route. The source side
    // signs the order; the destination side supplies default addresses.
    let evm_identity = config
        .evm
        .as_ref()
        .map(|evm| EvmIdentity::from_private_key(&evm.private_key))
        .transpose()?;
    let solana_identity = config
        .solana
        .as_ref()
        .map(|solana| SolanaIdentity::from_base58(&solana.private_key))
        .transpose()?;

    let address_for = |family: ChainFamily| -> Result<String> {
        match family {
            ChainFamily::AccountBased => evm_identity
                .as_ref()
                .map(|id| id.address().to_string())
                .ok_or_else(|| eyre!("no EVM identity configured")),
            ChainFamily::InstructionBased => solana_identity
                .as_ref()
                .map(|id| id.pubkey().to_string())
                .ok_or_else(|| eyre!("no Solana identity configured")),
        }
    };

    let recipient = match &config.route.recipient {
        Some(recipient) => recipient.clone(),
        None => address_for(dest.family)?,
    };
    let src_authority = match &config.route.src_authority {
        Some(authority) => authority.clone(),
        None => address_for(source.family)?,
    };
    let dst_authority = match &config.route.dst_authority {
        Some(authority) => authority.clone(),
        None => recipient.clone(),
    };

    let (backend, guard): (Arc<dyn ChainBackend>, Option<AllowanceGuard>) = match source.family {
        ChainFamily::AccountBased => {
            let evm = config
                .evm
                .as_ref()
                .ok_or_else(|| eyre!("account-based source requires EVM configuration"))?;
            let identity = evm_identity
                .as_ref()
                .ok_or_else(|| eyre!("no EVM identity configured"))?;
            let backend = Arc::new(EvmBackend::new(&evm.rpc_url, source.chain_id, identity)?);
            let ops: Arc<dyn Erc20Ops> = backend.clone();
            let guard = AllowanceGuard::new(ops, identity.address(), config.approval.policy);
            (backend, Some(guard))
        }
        ChainFamily::InstructionBased => {
            let solana = config
                .solana
                .as_ref()
                .ok_or_else(|| eyre!("instruction-based source requires Solana configuration"))?;
            let identity = solana_identity
                .ok_or_else(|| eyre!("no Solana identity configured"))?;
            (Arc::new(SolanaBackend::new(&solana.rpc_url, identity)), None)
        }
    };

    let api = Arc::new(DlnClient::new(&config.api.base_url, config.timeouts.quote)?);

    let orchestrator =
        BridgeOrchestrator::new(api, backend, guard).with_timeouts(config.timeouts);
    let request = BridgeRequest {
        source_chain: source.chain_ref(),
        source_token: TokenRef::new(source.chain_id, config.route.src_token.clone()),
        dest_chain: dest.chain_ref(),
        dest_token: TokenRef::new(dest.chain_id, config.route.dst_token.clone()),
        amount: config.route.amount,
        recipient,
        src_authority,
        dst_authority,
    };

    Ok((orchestrator, request))
}

fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,dln_bridger=debug"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();
}
