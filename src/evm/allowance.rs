//! ERC-20 allowance guard
//!
//! Ensures the DLN contract may pull the quoted source amount before the
//! bridge order is broadcast. Allowance is read fresh on every run, since
//! it can change out-of-band (another process, a prior partial run). An
//! insufficient allowance triggers exactly one approval transaction that
//! is confirmed before the pipeline continues.
//!
//! Not atomic with the later order submission: between `ensure_allowance`
//! returning and the broadcast, an out-of-band transaction could reduce
//! the allowance again. Known narrow race, accepted.

use std::sync::Arc;

use alloy::primitives::{Address, U256};
use async_trait::async_trait;
use tracing::{debug, info};

use crate::error::BridgeResult;

/// Read/approve operations on an ERC-20 token. Implemented by
/// [`crate::evm::EvmBackend`]; substituted in tests.
#[async_trait]
pub trait Erc20Ops: Send + Sync {
    /// Read the current allowance(owner, spender).
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> BridgeResult<U256>;

    /// Submit approve(spender, amount) and block until its receipt is
    /// observed and successful.
    async fn approve(&self, token: Address, spender: Address, amount: U256) -> BridgeResult<()>;
}

/// How much to approve when the current allowance is insufficient.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApprovalPolicy {
    /// Approve a fixed large ceiling so future runs skip the approval
    /// transaction. Leaves a standing allowance on the spender contract.
    Ceiling(U256),
    /// Approve exactly the required amount on every insufficient run.
    Exact,
}

impl Default for ApprovalPolicy {
    fn default() -> Self {
        // 1000 USDC in 6-decimal units
        ApprovalPolicy::Ceiling(U256::from(1_000_000_000u64))
    }
}

impl ApprovalPolicy {
    /// The amount an approval transaction should grant for `required`.
    /// A ceiling below the required amount is raised to it.
    pub fn approval_amount(&self, required: U256) -> U256 {
        match self {
            ApprovalPolicy::Ceiling(ceiling) => (*ceiling).max(required),
            ApprovalPolicy::Exact => required,
        }
    }
}

/// Guards the allowance precondition for account-based source chains.
pub struct AllowanceGuard {
    ops: Arc<dyn Erc20Ops>,
    owner: Address,
    policy: ApprovalPolicy,
}

impl AllowanceGuard {
    pub fn new(ops: Arc<dyn Erc20Ops>, owner: Address, policy: ApprovalPolicy) -> Self {
        Self { ops, owner, policy }
    }

    /// The allowance owner (the signer address).
    pub fn owner(&self) -> Address {
        self.owner
    }

    /// Read the current allowance(owner, spender) for `token`.
    pub async fn current_allowance(&self, token: Address, spender: Address) -> BridgeResult<U256> {
        self.ops.allowance(token, self.owner, spender).await
    }

    /// Approve per policy for a `required` amount that `current` does not
    /// cover. Blocks until the approval is confirmed.
    pub async fn approve_shortfall(
        &self,
        token: Address,
        spender: Address,
        current: U256,
        required: U256,
    ) -> BridgeResult<()> {
        let amount = self.policy.approval_amount(required);
        info!(
            token = %token,
            spender = %spender,
            current = %current,
            required = %required,
            approving = %amount,
            "Allowance insufficient, approving"
        );

        self.ops.approve(token, spender, amount).await
    }

    /// Ensure allowance(owner, spender) >= required, approving first when
    /// it is not. Returns without any transaction when already sufficient.
    pub async fn ensure_allowance(
        &self,
        token: Address,
        spender: Address,
        required: U256,
    ) -> BridgeResult<()> {
        let current = self.current_allowance(token, spender).await?;

        if current >= required {
            debug!(
                token = %token,
                spender = %spender,
                current = %current,
                required = %required,
                "Allowance sufficient, skipping approval"
            );
            return Ok(());
        }

        self.approve_shortfall(token, spender, current, required).await
    }
}
