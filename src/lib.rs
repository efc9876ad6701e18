//! DLN-Bridger: Cross-Chain Stablecoin Bridging
//!
//! This crate automates one recurring workflow: moving a stablecoin balance
//! from one chain to another through the DLN cross-chain liquidity network.
//!
//! - **DLN Module** - quote and order-construction client for the DLN API
//! - **EVM Module** - account-based backend, ERC-20 allowance guard
//! - **Solana Module** - instruction-based backend (restamp, sign, broadcast)
//! - **Orchestrator** - the quote → order → allowance → submit pipeline
//! - **Types / Errors** - shared route types and the typed failure taxonomy
//!
//! ## Usage
//!
//! ```ignore
//! use dln_bridger::{BridgeOrchestrator, BridgeRequest, DlnClient};
//!
//! let orchestrator = BridgeOrchestrator::new(api, backend, Some(guard));
//! let tx_id = orchestrator.run_bridge(&request).await?;
//! ```
//!
//! One run holds its signing identity exclusively; concurrent runs with the
//! same identity on the same chain risk nonce collisions and must be
//! serialized by the caller.

// Core modules
pub mod backend;
pub mod chains;
pub mod config;
pub mod dln;
pub mod error;
pub mod identity;
pub mod orchestrator;
pub mod types;

// Chain-family modules
pub mod evm;
pub mod solana;

// Re-export commonly used items at the crate root
pub use backend::ChainBackend;
pub use dln::{DlnApi, DlnClient, Order, OrderPayload, Quote};
pub use error::{BridgeError, BridgeResult};
pub use evm::{AllowanceGuard, ApprovalPolicy, EvmBackend};
pub use identity::{EvmIdentity, SolanaIdentity};
pub use orchestrator::{BridgeOrchestrator, BridgeRequest, Timeouts};
pub use solana::SolanaBackend;
pub use types::{ChainFamily, ChainRef, Step, TokenRef, TxId};
