//! Typed error taxonomy for the bridging pipeline.
//!
//! Every error is terminal for the current run: each one reflects either an
//! invalid request or an external state change (price, allowance, network)
//! that makes a blind retry unsafe. The caller decides whether to re-quote,
//! re-approve, or abandon based on the variant.

use crate::types::Step;

/// Errors raised by the bridging pipeline.
#[derive(Debug, thiserror::Error)]
pub enum BridgeError {
    /// The requested route is invalid (same-chain bridge, zero amount,
    /// unparseable address). Raised before any network call.
    #[error("invalid route: {0}")]
    InvalidRoute(String),

    /// The quote endpoint failed or returned an unusable estimation.
    /// Not retried automatically: a stale retry could misquote.
    #[error("quote unavailable: {0}")]
    QuoteUnavailable(String),

    /// The order-construction endpoint failed or returned no usable `tx`
    /// payload. The caller must re-quote rather than retry with a
    /// different amount.
    #[error("order construction failed: {0}")]
    OrderConstruction(String),

    /// Reading the current token allowance failed.
    #[error("allowance read failed for token {token}: {reason}")]
    AllowanceRead { token: String, reason: String },

    /// The approval transaction was rejected or reverted. Fatal: an
    /// automatic retry could silently double-approve.
    #[error("allowance approval failed for spender {spender}: {reason}")]
    AllowanceApproval { spender: String, reason: String },

    /// The order payload could not be signed (malformed or wrong family).
    #[error("signing failed on chain {chain_id}: {reason}")]
    Signing { chain_id: u64, reason: String },

    /// The signed transaction was rejected at broadcast.
    #[error("submission rejected on chain {chain_id}: {reason}")]
    Submission { chain_id: u64, reason: String },

    /// A pipeline step exceeded its bounded deadline. Distinct from the
    /// other variants so callers can tell "try again" from "this call is
    /// fundamentally invalid".
    #[error("step {step} timed out after {seconds}s")]
    Timeout { step: Step, seconds: u64 },
}

impl BridgeError {
    /// The pipeline step at which this error occurred.
    pub fn step(&self) -> Step {
        match self {
            BridgeError::InvalidRoute(_) | BridgeError::QuoteUnavailable(_) => Step::Quoting,
            BridgeError::OrderConstruction(_) => Step::Ordering,
            BridgeError::AllowanceRead { .. } => Step::CheckingAllowance,
            BridgeError::AllowanceApproval { .. } => Step::Approving,
            BridgeError::Signing { .. } | BridgeError::Submission { .. } => Step::Submitting,
            BridgeError::Timeout { step, .. } => *step,
        }
    }
}

/// Convenience alias used throughout the pipeline.
pub type BridgeResult<T> = std::result::Result<T, BridgeError>;
