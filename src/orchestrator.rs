//! Bridge orchestration
//!
//! Sequences quote → order construction → allowance guard (account-based
//! sources only) → sign/submit as a strictly sequential pipeline:
//!
//! `Quoting → Ordering → (CheckingAllowance → Approving)? → Submitting`
//!
//! No step is retried internally, and there is no rollback: a failure
//! after approval leaves the raised allowance in place (it is a ceiling,
//! not a one-shot). A caller wanting retry re-invokes
//! [`BridgeOrchestrator::run_bridge`] from scratch; two identical runs
//! produce two independent orders (no dedup).

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::{Address, U256};
use tracing::{debug, info};

use crate::backend::ChainBackend;
use crate::dln::client::DlnApi;
use crate::dln::quote::validate_route;
use crate::error::{BridgeError, BridgeResult};
use crate::evm::allowance::AllowanceGuard;
use crate::types::{ChainFamily, ChainRef, Step, TokenRef, TxId};

/// Per-step deadlines. Quotes are time-sensitive so the network calls get
/// tight bounds; approval confirmation can take a couple of block times.
#[derive(Debug, Clone, Copy)]
pub struct Timeouts {
    pub quote: Duration,
    pub order: Duration,
    pub allowance_read: Duration,
    pub approval: Duration,
    pub submit: Duration,
}

impl Default for Timeouts {
    fn default() -> Self {
        Self {
            quote: Duration::from_secs(10),
            order: Duration::from_secs(10),
            allowance_read: Duration::from_secs(10),
            approval: Duration::from_secs(120),
            submit: Duration::from_secs(30),
        }
    }
}

/// Everything one bridging run needs. All chain/token/address fields are
/// explicit; the binary resolves defaults (signer-derived authorities)
/// before building this.
#[derive(Debug, Clone)]
pub struct BridgeRequest {
    pub source_chain: ChainRef,
    pub source_token: TokenRef,
    pub dest_chain: ChainRef,
    pub dest_token: TokenRef,
    /// Requested amount in the source token's smallest unit. The provider
    /// may adjust this upward; the adjusted value drives the rest of the
    /// pipeline.
    pub amount: u128,
    /// Payout address on the destination chain
    pub recipient: String,
    /// Cancel/modify authority on the source chain
    pub src_authority: String,
    /// Cancel/modify authority on the destination chain
    pub dst_authority: String,
}

/// Drives one bridging run end to end.
pub struct BridgeOrchestrator {
    api: Arc<dyn DlnApi>,
    backend: Arc<dyn ChainBackend>,
    /// Present iff the source chain is account-based.
    allowance: Option<AllowanceGuard>,
    timeouts: Timeouts,
}

impl BridgeOrchestrator {
    pub fn new(
        api: Arc<dyn DlnApi>,
        backend: Arc<dyn ChainBackend>,
        allowance: Option<AllowanceGuard>,
    ) -> Self {
        Self {
            api,
            backend,
            allowance,
            timeouts: Timeouts::default(),
        }
    }

    pub fn with_timeouts(mut self, timeouts: Timeouts) -> Self {
        self.timeouts = timeouts;
        self
    }

    /// Run `fut` under the step's deadline, mapping expiry to a `Timeout`
    /// error distinct from the step's own failures.
    async fn bounded<T, F>(&self, step: Step, deadline: Duration, fut: F) -> BridgeResult<T>
    where
        F: Future<Output = BridgeResult<T>>,
    {
        debug!(step = %step, "Entering step");
        match tokio::time::timeout(deadline, fut).await {
            Ok(result) => result,
            Err(_) => Err(BridgeError::Timeout {
                step,
                seconds: deadline.as_secs(),
            }),
        }
    }

    /// Execute one bridging run. Returns the source-chain transaction
    /// identifier on success; the first failure propagates with the step
    /// at which it occurred ([`BridgeError::step`]).
    pub async fn run_bridge(&self, request: &BridgeRequest) -> BridgeResult<TxId> {
        validate_route(&request.source_token, request.amount, &request.dest_token)?;

        if self.backend.chain_id() != request.source_chain.chain_id {
            return Err(BridgeError::InvalidRoute(format!(
                "backend is connected to chain {} but the source chain is {}",
                self.backend.chain_id(),
                request.source_chain.chain_id
            )));
        }
        if self.backend.family() != request.source_chain.family {
            return Err(BridgeError::InvalidRoute(format!(
                "backend family {} does not match source chain family {}",
                self.backend.family(),
                request.source_chain.family
            )));
        }

        info!(
            src_chain = request.source_chain.chain_id,
            dst_chain = request.dest_chain.chain_id,
            amount = request.amount,
            native_fee_floor = request.source_chain.native_fee_floor,
            "Starting bridge run; signer must hold at least the fee floor in native currency"
        );

        let quote = self
            .bounded(
                Step::Quoting,
                self.timeouts.quote,
                self.api
                    .get_quote(&request.source_token, request.amount, &request.dest_token),
            )
            .await?;

        let order = self
            .bounded(
                Step::Ordering,
                self.timeouts.order,
                self.api.build_order(
                    &request.source_token,
                    &request.dest_token,
                    &quote,
                    &request.recipient,
                    &request.src_authority,
                    &request.dst_authority,
                ),
            )
            .await?;

        // Instruction-based chains use delegated signing; only
        // account-based sources need the allowance precondition.
        if request.source_chain.family == ChainFamily::AccountBased {
            let guard = self.allowance.as_ref().ok_or_else(|| {
                BridgeError::AllowanceRead {
                    token: request.source_token.address.clone(),
                    reason: "no allowance guard configured for account-based source".into(),
                }
            })?;

            let spender: Address = order
                .target()
                .ok_or_else(|| {
                    BridgeError::OrderConstruction(
                        "account-based order is missing the tx.to target".into(),
                    )
                })?
                .parse()
                .map_err(|e| {
                    BridgeError::OrderConstruction(format!("order target is not an address: {}", e))
                })?;
            let token: Address = request.source_token.address.parse().map_err(|e| {
                BridgeError::InvalidRoute(format!("source token is not an EVM address: {}", e))
            })?;

            // The guard must see the quote-adjusted amount: the original
            // request can be below what the provider will actually pull.
            let required = U256::from(quote.source_amount_in);

            // The read and the approval run under separate deadlines: a
            // stalled RPC read is a CheckingAllowance timeout, not an
            // Approving one.
            let current = self
                .bounded(
                    Step::CheckingAllowance,
                    self.timeouts.allowance_read,
                    guard.current_allowance(token, spender),
                )
                .await?;

            if current < required {
                self.bounded(
                    Step::Approving,
                    self.timeouts.approval,
                    guard.approve_shortfall(token, spender, current, required),
                )
                .await?;
            } else {
                debug!(
                    current = %current,
                    required = %required,
                    "Allowance sufficient, skipping approval"
                );
            }
        }

        let tx_id = self
            .bounded(
                Step::Submitting,
                self.timeouts.submit,
                self.backend.submit(&order),
            )
            .await?;

        info!(tx_id = %tx_id, "Bridge run complete");
        Ok(tx_id)
    }
}
