//! Instruction-based chain backend
//!
//! Deserializes the DLN order payload into a versioned transaction,
//! restamps it with a blockhash fetched AT SUBMIT TIME (the payload may
//! have been built earlier, and a stale stamp gets the transaction
//! rejected), signs with the held keypair, and broadcasts.

use async_trait::async_trait;
use solana_client::nonblocking::rpc_client::RpcClient;
use solana_sdk::hash::Hash;
use solana_sdk::transaction::VersionedTransaction;
use tracing::{debug, info};

use crate::backend::ChainBackend;
use crate::chains::SOLANA_CHAIN_ID;
use crate::dln::order::{Order, OrderPayload};
use crate::error::{BridgeError, BridgeResult};
use crate::identity::SolanaIdentity;
use crate::types::{ChainFamily, TxId};

/// Instruction-based backend for the Solana ledger.
pub struct SolanaBackend {
    rpc: RpcClient,
    identity: SolanaIdentity,
}

impl SolanaBackend {
    /// Create a backend bound to one RPC endpoint and one keypair.
    pub fn new(rpc_url: &str, identity: SolanaIdentity) -> Self {
        info!(
            rpc_url = %rpc_url,
            pubkey = %identity.pubkey(),
            "Solana backend initialized"
        );
        Self {
            rpc: RpcClient::new(rpc_url.to_string()),
            identity,
        }
    }

    /// The signer's public key (default authority on this side).
    pub fn pubkey(&self) -> solana_sdk::pubkey::Pubkey {
        self.identity.pubkey()
    }
}

/// Decode an instruction-blob payload into an unsigned versioned
/// transaction.
pub(crate) fn decode_payload(order: &Order) -> BridgeResult<VersionedTransaction> {
    let OrderPayload::InstructionBlob { data } = &order.payload else {
        return Err(BridgeError::Signing {
            chain_id: SOLANA_CHAIN_ID,
            reason: "order payload is not an instruction blob".into(),
        });
    };

    let bytes = hex::decode(data.trim_start_matches("0x")).map_err(|e| BridgeError::Signing {
        chain_id: SOLANA_CHAIN_ID,
        reason: format!("invalid payload hex: {}", e),
    })?;

    bincode::deserialize(&bytes).map_err(|e| BridgeError::Signing {
        chain_id: SOLANA_CHAIN_ID,
        reason: format!("payload is not a versioned transaction: {}", e),
    })
}

/// Restamp the transaction's message with `blockhash` and sign it. The
/// stamp replaces whatever the payload was built with, so the returned
/// transaction always carries `blockhash`.
pub(crate) fn restamp_and_sign(
    tx: VersionedTransaction,
    blockhash: Hash,
    identity: &SolanaIdentity,
) -> BridgeResult<VersionedTransaction> {
    let mut message = tx.message;
    message.set_recent_blockhash(blockhash);

    VersionedTransaction::try_new(message, &[identity.keypair()]).map_err(|e| {
        BridgeError::Signing {
            chain_id: SOLANA_CHAIN_ID,
            reason: e.to_string(),
        }
    })
}

#[async_trait]
impl ChainBackend for SolanaBackend {
    fn family(&self) -> ChainFamily {
        ChainFamily::InstructionBased
    }

    fn chain_id(&self) -> u64 {
        SOLANA_CHAIN_ID
    }

    async fn submit(&self, order: &Order) -> BridgeResult<TxId> {
        let tx = decode_payload(order)?;

        // Freshness stamp is fetched now, not at order-construction time.
        let blockhash =
            self.rpc
                .get_latest_blockhash()
                .await
                .map_err(|e| BridgeError::Submission {
                    chain_id: SOLANA_CHAIN_ID,
                    reason: format!("blockhash fetch failed: {}", e),
                })?;
        debug!(blockhash = %blockhash, "Restamping transaction");

        let signed = restamp_and_sign(tx, blockhash, &self.identity)?;

        let signature =
            self.rpc
                .send_transaction(&signed)
                .await
                .map_err(|e| BridgeError::Submission {
                    chain_id: SOLANA_CHAIN_ID,
                    reason: e.to_string(),
                })?;

        info!(signature = %signature, "Bridge transaction broadcast");
        Ok(TxId::Solana(signature))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use solana_sdk::{
        message::Message, signature::Keypair, signer::Signer, system_instruction,
        transaction::Transaction,
    };

    /// Hex payload carrying a real (unsigned) versioned transaction, the
    /// shape the DLN create-tx endpoint returns for Solana sources.
    fn blob_payload(keypair: &Keypair) -> String {
        let instruction = system_instruction::transfer(&keypair.pubkey(), &keypair.pubkey(), 1);
        let message = Message::new(&[instruction], Some(&keypair.pubkey()));
        let tx = VersionedTransaction::from(Transaction::new_unsigned(message));
        format!("0x{}", hex::encode(bincode::serialize(&tx).unwrap()))
    }

    #[test]
    fn test_backend_family_and_chain() {
        let backend = SolanaBackend::new(
            "http://localhost:8899",
            SolanaIdentity::from_keypair(Keypair::new()),
        );
        assert_eq!(backend.family(), ChainFamily::InstructionBased);
        assert_eq!(backend.chain_id(), SOLANA_CHAIN_ID);
    }

    #[test]
    fn test_decode_payload_roundtrip() {
        let keypair = Keypair::new();
        let raw = json!({ "tx": { "data": blob_payload(&keypair) } });
        let order = Order::from_response(raw, SOLANA_CHAIN_ID).unwrap();

        let tx = decode_payload(&order).unwrap();
        assert_eq!(tx.message.static_account_keys()[0], keypair.pubkey());
    }

    #[test]
    fn test_restamp_and_sign_stamps_fresh_blockhash() {
        let keypair = Keypair::new();
        let raw = json!({ "tx": { "data": blob_payload(&keypair) } });
        let order = Order::from_response(raw, SOLANA_CHAIN_ID).unwrap();
        let tx = decode_payload(&order).unwrap();
        let stale = *tx.message.recent_blockhash();

        let fresh = Hash::new_unique();
        assert_ne!(stale, fresh);

        let identity = SolanaIdentity::from_keypair(keypair.insecure_clone());
        let signed = restamp_and_sign(tx, fresh, &identity).unwrap();

        // The signature must cover the restamped message, not the stale one
        assert_eq!(*signed.message.recent_blockhash(), fresh);
        assert_eq!(signed.signatures.len(), 1);
        assert!(signed.verify_with_results().iter().all(|ok| *ok));
    }

    #[test]
    fn test_restamp_and_sign_rejects_wrong_signer() {
        let keypair = Keypair::new();
        let raw = json!({ "tx": { "data": blob_payload(&keypair) } });
        let order = Order::from_response(raw, SOLANA_CHAIN_ID).unwrap();
        let tx = decode_payload(&order).unwrap();

        let other = SolanaIdentity::from_keypair(Keypair::new());
        let err = restamp_and_sign(tx, Hash::new_unique(), &other).unwrap_err();
        assert!(matches!(err, BridgeError::Signing { .. }));
    }

    #[test]
    fn test_decode_payload_rejects_account_call() {
        let raw = json!({ "tx": { "to": "0xabc", "data": "0x0102", "value": "0" } });
        let order = Order::from_response(raw, SOLANA_CHAIN_ID).unwrap();
        let err = decode_payload(&order).unwrap_err();
        assert!(matches!(err, BridgeError::Signing { .. }));
    }

    #[test]
    fn test_decode_payload_rejects_bad_hex() {
        let raw = json!({ "tx": { "data": "0xnothex" } });
        let order = Order::from_response(raw, SOLANA_CHAIN_ID).unwrap();
        let err = decode_payload(&order).unwrap_err();
        assert!(matches!(err, BridgeError::Signing { .. }));
    }

    #[test]
    fn test_decode_payload_rejects_non_transaction_bytes() {
        let raw = json!({ "tx": { "data": "0x0102030405" } });
        let order = Order::from_response(raw, SOLANA_CHAIN_ID).unwrap();
        let err = decode_payload(&order).unwrap_err();
        assert!(matches!(err, BridgeError::Signing { .. }));
    }
}
