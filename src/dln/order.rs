//! Order request types and chain-specific payload parsing
//!
//! The create-tx endpoint returns an executable payload for the SOURCE
//! chain: a contract call (`to`/`data`/`value`) for account-based chains,
//! or a hex-encoded serialized transaction for instruction-based chains.

use serde::Serialize;
use serde_json::Value;

use crate::dln::quote::{amount_at, Quote};
use crate::error::{BridgeError, BridgeResult};
use crate::types::{ChainFamily, TokenRef};

/// Query parameters for `GET /dln/order/create-tx`.
///
/// Carries the quote-adjusted source amount and the recommended destination
/// amount, never the caller's originally requested amount. The provider's
/// fee model can raise the true required input between quote and
/// construction.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderRequest {
    pub src_chain_id: u64,
    pub src_chain_token_in: String,
    pub src_chain_token_in_amount: String,
    pub dst_chain_id: u64,
    pub dst_chain_token_out: String,
    pub dst_chain_token_out_amount: String,
    pub dst_chain_token_out_recipient: String,
    /// Address authorized to cancel/modify the order on the source chain
    pub src_chain_order_authority_address: String,
    /// Address authorized to cancel/modify the order on the destination chain
    pub dst_chain_order_authority_address: String,
}

impl OrderRequest {
    pub fn new(
        source: &TokenRef,
        dest: &TokenRef,
        quote: &Quote,
        recipient: &str,
        src_authority: &str,
        dst_authority: &str,
    ) -> Self {
        Self {
            src_chain_id: source.chain_id,
            src_chain_token_in: source.address.clone(),
            src_chain_token_in_amount: quote.source_amount_in.to_string(),
            dst_chain_id: dest.chain_id,
            dst_chain_token_out: dest.address.clone(),
            dst_chain_token_out_amount: quote.dest_amount_out_recommended.to_string(),
            dst_chain_token_out_recipient: recipient.to_string(),
            src_chain_order_authority_address: src_authority.to_string(),
            dst_chain_order_authority_address: dst_authority.to_string(),
        }
    }
}

/// Family-specific executable payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderPayload {
    /// ABI-encoded contract call for account-based chains
    AccountCall {
        /// The DLN contract to invoke (also the allowance spender)
        to: String,
        /// Hex-encoded calldata
        data: String,
        /// Native value to attach (covers the flat protocol fee)
        value: u128,
    },
    /// Hex-encoded serialized transaction for instruction-based chains
    InstructionBlob { data: String },
}

/// An executable bridge order. Created from a quote, consumed exactly once
/// by a chain backend, never persisted.
#[derive(Debug, Clone)]
pub struct Order {
    /// Source chain this order executes on
    pub source_chain_id: u64,
    pub payload: OrderPayload,
    /// Raw provider payload, retained for traceability
    pub raw: Value,
}

impl Order {
    /// Extract an order from the provider's response JSON.
    ///
    /// The payload shape decides the family: a `tx.to` field means an
    /// account-based contract call; its absence means an instruction blob.
    pub fn from_response(raw: Value, source_chain_id: u64) -> BridgeResult<Self> {
        let tx = raw.get("tx").ok_or_else(|| {
            BridgeError::OrderConstruction("response missing tx payload".into())
        })?;

        let data = tx
            .get("data")
            .and_then(Value::as_str)
            .filter(|d| !d.is_empty())
            .ok_or_else(|| BridgeError::OrderConstruction("tx payload missing data".into()))?
            .to_string();

        let payload = match tx.get("to").and_then(Value::as_str) {
            Some(to) => {
                // The native value carries the flat protocol fee; a contract
                // call without it reverts on-chain, so it must be present.
                let value = amount_at(tx, &["value"]).ok_or_else(|| {
                    BridgeError::OrderConstruction(
                        "tx payload missing or malformed value".into(),
                    )
                })?;
                OrderPayload::AccountCall {
                    to: to.to_string(),
                    data,
                    value,
                }
            }
            None => OrderPayload::InstructionBlob { data },
        };

        Ok(Self {
            source_chain_id,
            payload,
            raw,
        })
    }

    /// The chain family this payload targets.
    pub fn family(&self) -> ChainFamily {
        match self.payload {
            OrderPayload::AccountCall { .. } => ChainFamily::AccountBased,
            OrderPayload::InstructionBlob { .. } => ChainFamily::InstructionBased,
        }
    }

    /// The spender/contract invoked on the source chain, when the payload
    /// is an account call.
    pub fn target(&self) -> Option<&str> {
        match &self.payload {
            OrderPayload::AccountCall { to, .. } => Some(to),
            OrderPayload::InstructionBlob { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_quote() -> Quote {
        Quote {
            source_amount_in: 1_512_000,
            dest_amount_out_recommended: 1_489_000,
            prepend_operating_expenses: true,
            raw: Value::Null,
        }
    }

    #[test]
    fn test_order_request_uses_quote_amounts_not_caller_amounts() {
        let source = TokenRef::new(8453, crate::chains::tokens::USDC_BASE);
        let dest = TokenRef::new(42161, crate::chains::tokens::USDCE_ARBITRUM);
        let req = OrderRequest::new(
            &source,
            &dest,
            &sample_quote(),
            "0xrecipient",
            "0xsrcauth",
            "0xdstauth",
        );
        // Quote adjusted 1_500_000 -> 1_512_000; the request must carry the
        // adjusted value.
        assert_eq!(req.src_chain_token_in_amount, "1512000");
        assert_eq!(req.dst_chain_token_out_amount, "1489000");

        let encoded = serde_json::to_value(&req).unwrap();
        assert_eq!(encoded["srcChainTokenInAmount"], "1512000");
        assert_eq!(encoded["dstChainTokenOutRecipient"], "0xrecipient");
        assert_eq!(encoded["srcChainOrderAuthorityAddress"], "0xsrcauth");
        assert_eq!(encoded["dstChainOrderAuthorityAddress"], "0xdstauth");
    }

    #[test]
    fn test_order_parses_account_call() {
        let raw = json!({
            "tx": {
                "to": "0xeF4fB24aD0916217251F553c0596F8Edc630EB66",
                "data": "0xdeadbeef",
                "value": "1000000000000000"
            }
        });
        let order = Order::from_response(raw, 8453).unwrap();
        assert_eq!(order.family(), ChainFamily::AccountBased);
        assert_eq!(order.target(), Some("0xeF4fB24aD0916217251F553c0596F8Edc630EB66"));
        assert_eq!(
            order.payload,
            OrderPayload::AccountCall {
                to: "0xeF4fB24aD0916217251F553c0596F8Edc630EB66".into(),
                data: "0xdeadbeef".into(),
                value: 1_000_000_000_000_000,
            }
        );
    }

    #[test]
    fn test_order_parses_instruction_blob() {
        let raw = json!({ "tx": { "data": "0x0102ff" } });
        let order = Order::from_response(raw, crate::chains::SOLANA_CHAIN_ID).unwrap();
        assert_eq!(order.family(), ChainFamily::InstructionBased);
        assert_eq!(order.target(), None);
    }

    #[test]
    fn test_account_call_requires_value() {
        // A contract call without the native value cannot pay the flat fee
        let missing = json!({
            "tx": {
                "to": "0xeF4fB24aD0916217251F553c0596F8Edc630EB66",
                "data": "0xdeadbeef"
            }
        });
        let err = Order::from_response(missing, 8453).unwrap_err();
        assert!(matches!(err, BridgeError::OrderConstruction(_)));

        let malformed = json!({
            "tx": {
                "to": "0xeF4fB24aD0916217251F553c0596F8Edc630EB66",
                "data": "0xdeadbeef",
                "value": "not-a-number"
            }
        });
        let err = Order::from_response(malformed, 8453).unwrap_err();
        assert!(matches!(err, BridgeError::OrderConstruction(_)));

        // Instruction blobs carry no native value field at all
        let blob = json!({ "tx": { "data": "0x0102" } });
        assert!(Order::from_response(blob, 7_565_164).is_ok());
    }

    #[test]
    fn test_order_rejects_missing_tx() {
        let err = Order::from_response(json!({"errorId": 4}), 8453).unwrap_err();
        assert!(matches!(err, BridgeError::OrderConstruction(_)));
    }

    #[test]
    fn test_order_rejects_empty_data() {
        let err = Order::from_response(json!({"tx": {"data": ""}}), 8453).unwrap_err();
        assert!(matches!(err, BridgeError::OrderConstruction(_)));
    }
}
