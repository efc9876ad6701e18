//! Static registry of chains the DLN network serves
//!
//! Chain IDs, chain families, and native flat-fee floors, plus the DLN
//! contract deployment addresses and the USDC token addresses used by the
//! default routes. All values are fixed external configuration: the DLN
//! network assigns the IDs and collects the flat fees.

use crate::types::{ChainFamily, ChainRef};

/// DLN's numeric chain ID for Solana (not an EVM chain ID).
pub const SOLANA_CHAIN_ID: u64 = 7_565_164;

/// A chain known to the DLN network.
#[derive(Debug, Clone, Copy)]
pub struct KnownChain {
    /// Human-readable name, for logging
    pub name: &'static str,
    /// DLN numeric chain ID
    pub chain_id: u64,
    pub family: ChainFamily,
    /// Flat protocol fee in the native currency's smallest unit
    /// (wei or lamports). The signer must hold at least this much.
    pub native_fee_floor: u128,
}

impl KnownChain {
    /// Build a [`ChainRef`] for this chain.
    pub fn chain_ref(&self) -> ChainRef {
        ChainRef {
            family: self.family,
            chain_id: self.chain_id,
            native_fee_floor: self.native_fee_floor,
        }
    }
}

/// All chains the DLN network currently serves, with their flat fees.
pub const KNOWN_CHAINS: &[KnownChain] = &[
    KnownChain {
        name: "ethereum",
        chain_id: 1,
        family: ChainFamily::AccountBased,
        native_fee_floor: 1_000_000_000_000_000, // 0.001 ETH
    },
    KnownChain {
        name: "bnb-chain",
        chain_id: 56,
        family: ChainFamily::AccountBased,
        native_fee_floor: 5_000_000_000_000_000, // 0.005 BNB
    },
    KnownChain {
        name: "polygon",
        chain_id: 137,
        family: ChainFamily::AccountBased,
        native_fee_floor: 500_000_000_000_000_000, // 0.5 MATIC
    },
    KnownChain {
        name: "optimism",
        chain_id: 10,
        family: ChainFamily::AccountBased,
        native_fee_floor: 1_000_000_000_000_000, // 0.001 ETH
    },
    KnownChain {
        name: "arbitrum",
        chain_id: 42_161,
        family: ChainFamily::AccountBased,
        native_fee_floor: 1_000_000_000_000_000, // 0.001 ETH
    },
    KnownChain {
        name: "avalanche",
        chain_id: 43_114,
        family: ChainFamily::AccountBased,
        native_fee_floor: 50_000_000_000_000_000, // 0.05 AVAX
    },
    KnownChain {
        name: "base",
        chain_id: 8_453,
        family: ChainFamily::AccountBased,
        native_fee_floor: 1_000_000_000_000_000, // 0.001 ETH
    },
    KnownChain {
        name: "linea",
        chain_id: 59_144,
        family: ChainFamily::AccountBased,
        native_fee_floor: 1_000_000_000_000_000, // 0.001 ETH
    },
    KnownChain {
        name: "solana",
        chain_id: SOLANA_CHAIN_ID,
        family: ChainFamily::InstructionBased,
        native_fee_floor: 15_000_000, // 0.015 SOL
    },
];

/// Look up a known chain by its DLN chain ID.
pub fn known_chain(chain_id: u64) -> Option<&'static KnownChain> {
    KNOWN_CHAINS.iter().find(|c| c.chain_id == chain_id)
}

/// DLN contract deployment addresses.
pub mod dln_contracts {
    /// DlnSource on every EVM chain (same address on all of them)
    pub const EVM_DLN_SOURCE: &str = "0xeF4fB24aD0916217251F553c0596F8Edc630EB66";
    /// DlnDestination on every EVM chain
    pub const EVM_DLN_DESTINATION: &str = "0xe7351fd770a37282b91d153ee690b63579d6dd7f";
    /// CrosschainForwarder on every EVM chain
    pub const EVM_CROSSCHAIN_FORWARDER: &str = "0x663dc15d3c1ac63ff12e45ab68fea3f0a883c251";
    /// ExternalCallExecutor on every EVM chain
    pub const EVM_EXTERNAL_CALL_EXECUTOR: &str = "0xFC2CA4022d26AD4dCb3866ae30669669F6A28f19";
    /// DlnSource program on Solana
    pub const SOLANA_DLN_SOURCE: &str = "src5qyZHqTqecJV4aY6Cb6zDZLMDzrDKKezs22MPHr4";
    /// DlnDestination program on Solana
    pub const SOLANA_DLN_DESTINATION: &str = "dst5MGcFPoBeREFAA5E3tU5ij8m5uVYwkzkSAbsLbNo";
}

/// Stablecoin addresses for the default routes.
pub mod tokens {
    pub const USDC_BASE: &str = "0xd9aAEc86B65D86f6A7B5B1b0c42FFA531710b6CA";
    pub const USDCE_ARBITRUM: &str = "0xFF970A61A04b1cA14834A43f5dE4533eBDDB5CC8";
    pub const USDC_SOLANA: &str = "EPjFWdd5AufqSSqeM2qN1xzybapC8G4wEGGkZwyTDt1v";
}

/// Default DLN API base URL.
pub const DEFAULT_DLN_API_URL: &str = "https://api.dln.trade/v1.0";
