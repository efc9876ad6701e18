//! DLN Liquidity Network Support Module
//!
//! Client for the DLN HTTP API: price quotes and pre-constructed order
//! transactions for cross-chain transfers.
//!
//! ## Submodules
//!
//! - `client` - HTTP client and the `DlnApi` trait the orchestrator uses
//! - `quote` - Quote request/response types and route validation
//! - `order` - Order request types and chain-specific payload parsing

pub mod client;
pub mod order;
pub mod quote;

// Re-export commonly used items
pub use client::{DlnApi, DlnClient};
pub use order::{Order, OrderPayload, OrderRequest};
pub use quote::{validate_route, Quote, QuoteRequest};
