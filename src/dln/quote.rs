//! Quote request/response types and route validation
//!
//! The quote endpoint returns the provider's fee model applied to the
//! requested amount: the source amount may be adjusted UPWARD to cover
//! operating expenses, and the destination amount already reflects the
//! network's take when `prependOperatingExpenses` is set.

use serde::Serialize;
use serde_json::Value;

use crate::error::{BridgeError, BridgeResult};
use crate::types::TokenRef;

/// Query parameters for `GET /dln/order/quote`.
///
/// Serialized field names match the DLN API exactly. Amounts travel as
/// decimal strings in the token's smallest unit.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QuoteRequest {
    pub src_chain_id: u64,
    pub src_chain_token_in: String,
    pub src_chain_token_in_amount: String,
    pub dst_chain_id: u64,
    pub dst_chain_token_out: String,
    /// When true, the returned destination amount is net of the network's
    /// operating expenses. Surfaced explicitly because it changes the
    /// semantics of the returned amounts.
    pub prepend_operating_expenses: bool,
}

impl QuoteRequest {
    pub fn new(source: &TokenRef, source_amount: u128, dest: &TokenRef) -> Self {
        Self {
            src_chain_id: source.chain_id,
            src_chain_token_in: source.address.clone(),
            src_chain_token_in_amount: source_amount.to_string(),
            dst_chain_id: dest.chain_id,
            dst_chain_token_out: dest.address.clone(),
            prepend_operating_expenses: true,
        }
    }
}

/// A normalized price quote. Consumed immediately by order construction;
/// never persisted.
#[derive(Debug, Clone)]
pub struct Quote {
    /// Source amount the provider requires, possibly adjusted upward from
    /// the requested amount to cover fees. Order construction MUST use
    /// this value, not the caller's original request.
    pub source_amount_in: u128,
    /// Recommended destination payout, net of fees.
    pub dest_amount_out_recommended: u128,
    /// Whether operating expenses were netted into the amounts.
    pub prepend_operating_expenses: bool,
    /// Raw provider payload, retained for traceability.
    pub raw: Value,
}

impl Quote {
    /// Extract a quote from the provider's response JSON.
    ///
    /// `requested_amount` is the caller's original amount, used to enforce
    /// the provider's adjust-upward-only invariant.
    pub fn from_response(
        raw: Value,
        requested_amount: u128,
        prepend_operating_expenses: bool,
    ) -> BridgeResult<Self> {
        let source_amount_in =
            amount_at(&raw, &["estimation", "srcChainTokenIn", "amount"]).ok_or_else(|| {
                BridgeError::QuoteUnavailable(
                    "response missing estimation.srcChainTokenIn.amount".into(),
                )
            })?;
        let dest_amount_out_recommended =
            amount_at(&raw, &["estimation", "dstChainTokenOut", "recommendedAmount"]).ok_or_else(
                || {
                    BridgeError::QuoteUnavailable(
                        "response missing estimation.dstChainTokenOut.recommendedAmount".into(),
                    )
                },
            )?;

        if dest_amount_out_recommended == 0 {
            return Err(BridgeError::QuoteUnavailable(
                "recommended destination amount is zero".into(),
            ));
        }
        if source_amount_in < requested_amount {
            return Err(BridgeError::QuoteUnavailable(format!(
                "provider quoted source amount {} below requested {}",
                source_amount_in, requested_amount
            )));
        }

        Ok(Self {
            source_amount_in,
            dest_amount_out_recommended,
            prepend_operating_expenses,
            raw,
        })
    }
}

/// Reject routes that are invalid regardless of provider state. Runs
/// before any network call.
pub fn validate_route(source: &TokenRef, source_amount: u128, dest: &TokenRef) -> BridgeResult<()> {
    if source_amount == 0 {
        return Err(BridgeError::InvalidRoute(
            "source amount must be greater than zero".into(),
        ));
    }
    if source.chain_id == dest.chain_id {
        return Err(BridgeError::InvalidRoute(format!(
            "source and destination are both chain {}; same-chain bridging is not supported",
            source.chain_id
        )));
    }
    Ok(())
}

/// Walk a JSON path and parse the leaf as an integer amount.
///
/// The API sends decimal strings; be liberal and accept plain numbers too.
pub(crate) fn amount_at(value: &Value, path: &[&str]) -> Option<u128> {
    let mut current = value;
    for key in path {
        current = current.get(key)?;
    }
    match current {
        Value::String(s) => s.parse().ok(),
        Value::Number(n) => n.as_u64().map(u128::from),
        _ => None,
    }
}
