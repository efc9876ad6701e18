//! Account-based chain backend
//!
//! Signs and broadcasts the DLN order as a contract call via an alloy
//! wallet provider, and exposes the ERC-20 operations the allowance guard
//! needs on the same connection.

use alloy::{
    network::{EthereumWallet, TransactionBuilder},
    primitives::{Address, Bytes, U256},
    providers::{Provider, ProviderBuilder, RootProvider},
    rpc::types::TransactionRequest,
    transports::http::{Client, Http},
};
use async_trait::async_trait;
use eyre::{eyre, Result};
use tracing::{debug, info};

use crate::backend::ChainBackend;
use crate::dln::order::{Order, OrderPayload};
use crate::error::{BridgeError, BridgeResult};
use crate::evm::allowance::Erc20Ops;
use crate::evm::contracts::ERC20;
use crate::identity::EvmIdentity;
use crate::types::{ChainFamily, TxId};

/// HTTP provider with a wallet filler attached.
#[allow(clippy::type_complexity)]
pub type WalletHttpProvider = alloy::providers::fillers::FillProvider<
    alloy::providers::fillers::JoinFill<
        alloy::providers::Identity,
        alloy::providers::fillers::WalletFiller<EthereumWallet>,
    >,
    RootProvider<Http<Client>>,
    Http<Client>,
    alloy::network::Ethereum,
>;

/// Account-based backend for one EVM chain.
pub struct EvmBackend {
    provider: WalletHttpProvider,
    chain_id: u64,
    signer_address: Address,
}

impl EvmBackend {
    /// Create a backend bound to one RPC endpoint and one signing identity.
    pub fn new(rpc_url: &str, chain_id: u64, identity: &EvmIdentity) -> Result<Self> {
        let provider = ProviderBuilder::new().wallet(identity.wallet()).on_http(
            rpc_url
                .parse()
                .map_err(|e| eyre!("Invalid RPC URL: {}", e))?,
        );

        info!(
            rpc_url = %rpc_url,
            chain_id = chain_id,
            address = %identity.address(),
            "EVM backend initialized"
        );

        Ok(Self {
            provider,
            chain_id,
            signer_address: identity.address(),
        })
    }

    /// The signer's address (allowance owner, default source authority).
    pub fn signer_address(&self) -> Address {
        self.signer_address
    }
}

#[async_trait]
impl ChainBackend for EvmBackend {
    fn family(&self) -> ChainFamily {
        ChainFamily::AccountBased
    }

    fn chain_id(&self) -> u64 {
        self.chain_id
    }

    async fn submit(&self, order: &Order) -> BridgeResult<TxId> {
        let OrderPayload::AccountCall { to, data, value } = &order.payload else {
            return Err(BridgeError::Signing {
                chain_id: self.chain_id,
                reason: "order payload is not an account call".into(),
            });
        };

        let to: Address = to.parse().map_err(|e| BridgeError::Signing {
            chain_id: self.chain_id,
            reason: format!("invalid target address {}: {}", to, e),
        })?;
        let calldata = hex::decode(data.trim_start_matches("0x")).map_err(|e| {
            BridgeError::Signing {
                chain_id: self.chain_id,
                reason: format!("invalid calldata hex: {}", e),
            }
        })?;

        let tx = TransactionRequest::default()
            .to(to)
            .input(Bytes::from(calldata).into())
            .value(U256::from(*value));

        debug!(to = %to, value = value, "Broadcasting bridge transaction");

        // Broadcast only; confirmation is the caller's concern.
        let pending = self
            .provider
            .send_transaction(tx)
            .await
            .map_err(|e| BridgeError::Submission {
                chain_id: self.chain_id,
                reason: e.to_string(),
            })?;

        let tx_hash = *pending.tx_hash();
        info!(tx_hash = %tx_hash, chain_id = self.chain_id, "Bridge transaction broadcast");
        Ok(TxId::Evm(tx_hash))
    }
}

#[async_trait]
impl Erc20Ops for EvmBackend {
    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> BridgeResult<U256> {
        let contract = ERC20::new(token, &self.provider);
        let allowance = contract
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| BridgeError::AllowanceRead {
                token: token.to_string(),
                reason: e.to_string(),
            })?;
        Ok(allowance._0)
    }

    async fn approve(&self, token: Address, spender: Address, amount: U256) -> BridgeResult<()> {
        let contract = ERC20::new(token, &self.provider);
        let pending = contract
            .approve(spender, amount)
            .send()
            .await
            .map_err(|e| BridgeError::AllowanceApproval {
                spender: spender.to_string(),
                reason: e.to_string(),
            })?;

        let tx_hash = *pending.tx_hash();
        info!(tx_hash = %tx_hash, spender = %spender, amount = %amount, "Approval sent, waiting for confirmation");

        // Block until the approval is observed; broadcasting the bridge
        // order while the approval is unconfirmed would race the allowance
        // change.
        let receipt = pending
            .get_receipt()
            .await
            .map_err(|e| BridgeError::AllowanceApproval {
                spender: spender.to_string(),
                reason: format!("no receipt for approval {}: {}", tx_hash, e),
            })?;

        if !receipt.status() {
            return Err(BridgeError::AllowanceApproval {
                spender: spender.to_string(),
                reason: format!("approval {} reverted", tx_hash),
            });
        }

        info!(tx_hash = %tx_hash, "Approval confirmed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn backend() -> EvmBackend {
        let identity = EvmIdentity::from_private_key(DEV_KEY).unwrap();
        EvmBackend::new("http://localhost:8545", 8453, &identity).unwrap()
    }

    #[test]
    fn test_backend_family_and_chain() {
        let backend = backend();
        assert_eq!(backend.family(), ChainFamily::AccountBased);
        assert_eq!(backend.chain_id(), 8453);
    }

    #[test]
    fn test_backend_rejects_bad_rpc_url() {
        let identity = EvmIdentity::from_private_key(DEV_KEY).unwrap();
        assert!(EvmBackend::new("not a url", 8453, &identity).is_err());
    }

    #[tokio::test]
    async fn test_submit_rejects_instruction_payload() {
        let order = Order::from_response(json!({"tx": {"data": "0x0102"}}), 8453).unwrap();
        let err = backend().submit(&order).await.unwrap_err();
        assert!(matches!(err, BridgeError::Signing { chain_id: 8453, .. }));
    }

    #[tokio::test]
    async fn test_submit_rejects_malformed_target() {
        let order = Order::from_response(
            json!({"tx": {"to": "not-an-address", "data": "0x0102", "value": "0"}}),
            8453,
        )
        .unwrap();
        let err = backend().submit(&order).await.unwrap_err();
        assert!(matches!(err, BridgeError::Signing { .. }));
    }

    #[tokio::test]
    async fn test_submit_rejects_malformed_calldata() {
        let order = Order::from_response(
            json!({"tx": {
                "to": "0xeF4fB24aD0916217251F553c0596F8Edc630EB66",
                "data": "0xzz",
                "value": "0"
            }}),
            8453,
        )
        .unwrap();
        let err = backend().submit(&order).await.unwrap_err();
        assert!(matches!(err, BridgeError::Signing { .. }));
    }
}
