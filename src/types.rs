//! Common types for cross-chain bridging
//!
//! Shared by the DLN client, the chain backends, and the orchestrator.

use std::fmt;

use alloy::primitives::FixedBytes;
use serde::{Deserialize, Serialize};
use solana_sdk::signature::Signature;

/// Chain family, which determines signing and authorization semantics.
///
/// Account-based chains use the allowance/approve pattern and contract
/// calls; instruction-based chains use delegated signing with ephemeral
/// freshness stamps and need no allowance step.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChainFamily {
    AccountBased,
    InstructionBased,
}

impl ChainFamily {
    pub fn as_str(&self) -> &'static str {
        match self {
            ChainFamily::AccountBased => "account_based",
            ChainFamily::InstructionBased => "instruction_based",
        }
    }
}

impl fmt::Display for ChainFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// One blockchain as the DLN network identifies it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainRef {
    pub family: ChainFamily,
    /// DLN numeric chain ID (EVM chain ID for EVM chains; 7565164 for Solana)
    pub chain_id: u64,
    /// Minimum native-currency amount (smallest unit) the signer should hold
    /// to cover the network's flat bridging fee. Logged pre-flight.
    pub native_fee_floor: u128,
}

/// A token on a specific chain: ERC-20 contract address or SPL mint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenRef {
    pub chain_id: u64,
    pub address: String,
}

impl TokenRef {
    pub fn new(chain_id: u64, address: impl Into<String>) -> Self {
        Self {
            chain_id,
            address: address.into(),
        }
    }
}

impl fmt::Display for TokenRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.address, self.chain_id)
    }
}

/// Native transaction identifier returned after broadcast.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TxId {
    /// EVM transaction hash
    Evm(FixedBytes<32>),
    /// Solana transaction signature
    Solana(Signature),
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TxId::Evm(hash) => write!(f, "0x{:x}", hash),
            TxId::Solana(sig) => write!(f, "{}", sig),
        }
    }
}

/// Pipeline step, used for state-transition logging and error context.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Step {
    Quoting,
    Ordering,
    CheckingAllowance,
    Approving,
    Submitting,
}

impl Step {
    pub fn as_str(&self) -> &'static str {
        match self {
            Step::Quoting => "quoting",
            Step::Ordering => "ordering",
            Step::CheckingAllowance => "checking_allowance",
            Step::Approving => "approving",
            Step::Submitting => "submitting",
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
