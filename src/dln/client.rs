//! DLN HTTP API client
//!
//! Thin client over the quote and create-tx endpoints. The `DlnApi` trait
//! is the seam the orchestrator depends on, so tests can substitute a
//! canned implementation without a network.

use async_trait::async_trait;
use eyre::{Result, WrapErr};
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, info};

use crate::dln::order::{Order, OrderRequest};
use crate::dln::quote::{validate_route, Quote, QuoteRequest};
use crate::error::{BridgeError, BridgeResult};
use crate::types::TokenRef;

/// Price quoting and order construction against the bridge network.
#[async_trait]
pub trait DlnApi: Send + Sync {
    /// Fetch a fee-inclusive quote for moving `source_amount` of `source`
    /// to `dest`. Fails with `InvalidRoute` before any network call when
    /// the route is structurally invalid.
    async fn get_quote(
        &self,
        source: &TokenRef,
        source_amount: u128,
        dest: &TokenRef,
    ) -> BridgeResult<Quote>;

    /// Construct an executable order for a previously obtained quote.
    /// Always carries the quote's adjusted amounts.
    async fn build_order(
        &self,
        source: &TokenRef,
        dest: &TokenRef,
        quote: &Quote,
        recipient: &str,
        src_authority: &str,
        dst_authority: &str,
    ) -> BridgeResult<Order>;
}

/// HTTP client for the hosted DLN API.
pub struct DlnClient {
    base_url: String,
    client: Client,
}

impl DlnClient {
    /// Create a client with a bounded per-request timeout.
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .wrap_err("Failed to build DLN HTTP client")?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    /// GET a JSON document, with query parameters from a serializable
    /// request struct. Maps transport and non-2xx failures through `err`.
    async fn get_json<Q: Serialize + Sync>(
        &self,
        path: &str,
        query: &Q,
        err: fn(String) -> BridgeError,
    ) -> BridgeResult<Value> {
        let url = format!("{}/{}", self.base_url, path);
        let response = self
            .client
            .get(&url)
            .query(query)
            .send()
            .await
            .map_err(|e| err(format!("request to {} failed: {}", url, e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(err(format!("{} returned {}: {}", url, status, body)));
        }

        response
            .json()
            .await
            .map_err(|e| err(format!("{} returned malformed JSON: {}", url, e)))
    }
}

#[async_trait]
impl DlnApi for DlnClient {
    async fn get_quote(
        &self,
        source: &TokenRef,
        source_amount: u128,
        dest: &TokenRef,
    ) -> BridgeResult<Quote> {
        validate_route(source, source_amount, dest)?;

        let request = QuoteRequest::new(source, source_amount, dest);
        debug!(
            src_chain = source.chain_id,
            dst_chain = dest.chain_id,
            amount = source_amount,
            "Requesting quote"
        );

        let raw = self
            .get_json("dln/order/quote", &request, BridgeError::QuoteUnavailable)
            .await?;
        let quote = Quote::from_response(raw, source_amount, request.prepend_operating_expenses)?;

        info!(
            source_amount_in = quote.source_amount_in,
            dest_amount_out = quote.dest_amount_out_recommended,
            "Quote received"
        );
        Ok(quote)
    }

    async fn build_order(
        &self,
        source: &TokenRef,
        dest: &TokenRef,
        quote: &Quote,
        recipient: &str,
        src_authority: &str,
        dst_authority: &str,
    ) -> BridgeResult<Order> {
        let request = OrderRequest::new(source, dest, quote, recipient, src_authority, dst_authority);
        debug!(
            src_chain = source.chain_id,
            dst_chain = dest.chain_id,
            source_amount_in = quote.source_amount_in,
            recipient = recipient,
            "Requesting order construction"
        );

        let raw = self
            .get_json(
                "dln/order/create-tx",
                &request,
                BridgeError::OrderConstruction,
            )
            .await?;
        let order = Order::from_response(raw, source.chain_id)?;

        info!(
            family = %order.family(),
            target = order.target().unwrap_or("-"),
            "Order constructed"
        );
        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chains::tokens;

    fn client() -> DlnClient {
        // Unroutable base URL: validation failures must surface before any
        // network traffic, so these tests never actually connect.
        DlnClient::new("http://127.0.0.1:9/v1.0/", Duration::from_secs(1)).unwrap()
    }

    #[test]
    fn test_base_url_trailing_slash_trimmed() {
        assert_eq!(client().base_url, "http://127.0.0.1:9/v1.0");
    }

    #[tokio::test]
    async fn test_get_quote_rejects_same_chain_before_network() {
        let source = TokenRef::new(8453, tokens::USDC_BASE);
        let dest = TokenRef::new(8453, tokens::USDCE_ARBITRUM);
        let err = client()
            .get_quote(&source, 1_500_000, &dest)
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::InvalidRoute(_)));
    }

    #[tokio::test]
    async fn test_get_quote_rejects_zero_amount_before_network() {
        let source = TokenRef::new(8453, tokens::USDC_BASE);
        let dest = TokenRef::new(42161, tokens::USDCE_ARBITRUM);
        let err = client().get_quote(&source, 0, &dest).await.unwrap_err();
        assert!(matches!(err, BridgeError::InvalidRoute(_)));
    }
}
