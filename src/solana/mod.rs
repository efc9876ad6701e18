//! Solana Chain Support Module
//!
//! Instruction-based backend: the DLN API ships a fully-constructed
//! serialized transaction; this module restamps it with a fresh blockhash,
//! re-signs it, and broadcasts it. No allowance step exists on this family.

pub mod backend;

pub use backend::SolanaBackend;
