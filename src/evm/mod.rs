//! EVM Chain Support Module
//!
//! Account-based backend for EVM-compatible chains: contract-call signing
//! via alloy, plus the ERC-20 allowance guard the bridge order depends on.
//!
//! ## Submodules
//!
//! - `contracts` - ERC-20 binding using alloy's sol! macro
//! - `backend` - account-based `ChainBackend` implementation
//! - `allowance` - allowance read/approve guard

pub mod allowance;
pub mod backend;
pub mod contracts;

// Re-export commonly used items
pub use allowance::{AllowanceGuard, ApprovalPolicy, Erc20Ops};
pub use backend::EvmBackend;
pub use contracts::ERC20;
