//! Run configuration for the bridging binary
//!
//! Loaded from a `.env` file or the process environment, validated before
//! any network activity. Secret-bearing sections redact their `Debug`
//! output. The library itself never reads these variables; the binary
//! materializes identities from this config and injects them.

use std::env;
use std::fmt;
use std::path::Path;
use std::time::Duration;

use alloy::primitives::U256;
use eyre::{eyre, Result, WrapErr};
use url::Url;

use crate::chains::{known_chain, DEFAULT_DLN_API_URL};
use crate::evm::allowance::ApprovalPolicy;
use crate::orchestrator::Timeouts;
use crate::types::ChainFamily;

/// Main configuration for one bridging run.
#[derive(Debug, Clone)]
pub struct Config {
    pub api: ApiConfig,
    pub route: RouteConfig,
    /// Required when the source chain is account-based, or when the
    /// destination-side recipient/authority must be derived from an EVM
    /// signer.
    pub evm: Option<EvmConfig>,
    /// Required when either side of the route is Solana.
    pub solana: Option<SolanaConfig>,
    pub approval: ApprovalConfig,
    pub timeouts: Timeouts,
}

/// DLN API endpoint configuration.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub base_url: String,
}

/// The route to bridge: chains, tokens, amount, and addresses.
#[derive(Debug, Clone)]
pub struct RouteConfig {
    pub src_chain_id: u64,
    pub src_token: String,
    pub dst_chain_id: u64,
    pub dst_token: String,
    /// Amount in the source token's smallest unit
    pub amount: u128,
    /// Payout address on the destination chain; defaults to the signer's
    /// own address on that chain's family when unset.
    pub recipient: Option<String>,
    pub src_authority: Option<String>,
    pub dst_authority: Option<String>,
}

/// EVM connection and signing configuration.
#[derive(Clone)]
pub struct EvmConfig {
    pub rpc_url: String,
    pub private_key: String,
}

/// Custom Debug that redacts private_key to prevent accidental log leakage.
impl fmt::Debug for EvmConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmConfig")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Solana connection and signing configuration.
#[derive(Clone)]
pub struct SolanaConfig {
    pub rpc_url: String,
    pub private_key: String,
}

/// Custom Debug that redacts private_key to prevent accidental log leakage.
impl fmt::Debug for SolanaConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolanaConfig")
            .field("rpc_url", &self.rpc_url)
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Allowance approval policy configuration.
#[derive(Debug, Clone)]
pub struct ApprovalConfig {
    pub policy: ApprovalPolicy,
}

/// Default functions
fn default_approval_ceiling() -> u128 {
    1_000_000_000 // 1000 USDC in 6-decimal units
}

fn default_quote_timeout() -> u64 {
    10
}

fn default_order_timeout() -> u64 {
    10
}

fn default_allowance_read_timeout() -> u64 {
    10
}

fn default_approval_timeout() -> u64 {
    120
}

fn default_submit_timeout() -> u64 {
    30
}

impl Config {
    /// Load configuration from environment variables.
    /// Loads .env file if present, then reads from environment.
    pub fn load() -> Result<Self> {
        Self::load_from_file(".env").or_else(|_| Self::load_from_env())
    }

    /// Load from a specific .env file path.
    pub fn load_from_file(path: &str) -> Result<Self> {
        if Path::new(path).exists() {
            dotenvy::from_filename(path)
                .wrap_err_with(|| format!("Failed to load .env file from {}", path))?;
        }
        Self::load_from_env()
    }

    /// Load configuration from environment variables.
    fn load_from_env() -> Result<Self> {
        let api = ApiConfig {
            base_url: env::var("DLN_API_URL").unwrap_or_else(|_| DEFAULT_DLN_API_URL.to_string()),
        };

        let route = RouteConfig {
            src_chain_id: env::var("SRC_CHAIN_ID")
                .map_err(|_| eyre!("SRC_CHAIN_ID environment variable is required"))?
                .parse()
                .wrap_err("SRC_CHAIN_ID must be a valid u64")?,
            src_token: env::var("SRC_TOKEN")
                .map_err(|_| eyre!("SRC_TOKEN environment variable is required"))?,
            dst_chain_id: env::var("DST_CHAIN_ID")
                .map_err(|_| eyre!("DST_CHAIN_ID environment variable is required"))?
                .parse()
                .wrap_err("DST_CHAIN_ID must be a valid u64")?,
            dst_token: env::var("DST_TOKEN")
                .map_err(|_| eyre!("DST_TOKEN environment variable is required"))?,
            amount: env::var("AMOUNT")
                .map_err(|_| eyre!("AMOUNT environment variable is required"))?
                .parse()
                .wrap_err("AMOUNT must be an integer in the token's smallest unit")?,
            recipient: env::var("RECIPIENT").ok(),
            src_authority: env::var("SRC_AUTHORITY").ok(),
            dst_authority: env::var("DST_AUTHORITY").ok(),
        };

        let evm = match (env::var("EVM_RPC_URL").ok(), env::var("EVM_PRIVATE_KEY").ok()) {
            (Some(rpc_url), Some(private_key)) => Some(EvmConfig {
                rpc_url,
                private_key,
            }),
            (None, None) => None,
            _ => {
                return Err(eyre!(
                    "EVM_RPC_URL and EVM_PRIVATE_KEY must be set together"
                ))
            }
        };

        let solana = match (
            env::var("SOLANA_RPC_URL").ok(),
            env::var("SOLANA_PRIVATE_KEY").ok(),
        ) {
            (Some(rpc_url), Some(private_key)) => Some(SolanaConfig {
                rpc_url,
                private_key,
            }),
            (None, None) => None,
            _ => {
                return Err(eyre!(
                    "SOLANA_RPC_URL and SOLANA_PRIVATE_KEY must be set together"
                ))
            }
        };

        let ceiling = env::var("APPROVAL_CEILING")
            .ok()
            .and_then(|v| v.parse::<u128>().ok())
            .unwrap_or_else(default_approval_ceiling);
        let policy = match env::var("APPROVAL_POLICY").as_deref() {
            Ok("exact") => ApprovalPolicy::Exact,
            Ok("ceiling") | Err(_) => ApprovalPolicy::Ceiling(U256::from(ceiling)),
            Ok(other) => {
                return Err(eyre!(
                    "APPROVAL_POLICY must be 'ceiling' or 'exact', got '{}'",
                    other
                ))
            }
        };
        let approval = ApprovalConfig { policy };

        let timeouts = Timeouts {
            quote: Duration::from_secs(
                env::var("QUOTE_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_quote_timeout),
            ),
            order: Duration::from_secs(
                env::var("ORDER_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_order_timeout),
            ),
            allowance_read: Duration::from_secs(
                env::var("ALLOWANCE_READ_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_allowance_read_timeout),
            ),
            approval: Duration::from_secs(
                env::var("APPROVAL_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_approval_timeout),
            ),
            submit: Duration::from_secs(
                env::var("SUBMIT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|v| v.parse().ok())
                    .unwrap_or_else(default_submit_timeout),
            ),
        };

        let config = Config {
            api,
            route,
            evm,
            solana,
            approval,
            timeouts,
        };

        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        Url::parse(&self.api.base_url).wrap_err("DLN_API_URL must be a valid URL")?;

        if self.route.amount == 0 {
            return Err(eyre!("AMOUNT must be greater than zero"));
        }
        if self.route.src_chain_id == self.route.dst_chain_id {
            return Err(eyre!(
                "SRC_CHAIN_ID and DST_CHAIN_ID are both {}; same-chain bridging is not supported",
                self.route.src_chain_id
            ));
        }
        if self.route.src_token.is_empty() {
            return Err(eyre!("SRC_TOKEN cannot be empty"));
        }
        if self.route.dst_token.is_empty() {
            return Err(eyre!("DST_TOKEN cannot be empty"));
        }

        let src = known_chain(self.route.src_chain_id)
            .ok_or_else(|| eyre!("SRC_CHAIN_ID {} is not a known chain", self.route.src_chain_id))?;
        let dst = known_chain(self.route.dst_chain_id)
            .ok_or_else(|| eyre!("DST_CHAIN_ID {} is not a known chain", self.route.dst_chain_id))?;

        // Each family in the route needs its connection config: the source
        // side signs, the destination side may derive default addresses.
        for chain in [src, dst] {
            match chain.family {
                ChainFamily::AccountBased if self.evm.is_none() => {
                    return Err(eyre!(
                        "chain {} ({}) requires EVM_RPC_URL and EVM_PRIVATE_KEY",
                        chain.chain_id,
                        chain.name
                    ));
                }
                ChainFamily::InstructionBased if self.solana.is_none() => {
                    return Err(eyre!(
                        "chain {} ({}) requires SOLANA_RPC_URL and SOLANA_PRIVATE_KEY",
                        chain.chain_id,
                        chain.name
                    ));
                }
                _ => {}
            }
        }

        if let Some(ref evm) = self.evm {
            if evm.rpc_url.is_empty() {
                return Err(eyre!("EVM_RPC_URL cannot be empty"));
            }
            let key = evm.private_key.strip_prefix("0x").unwrap_or(&evm.private_key);
            if key.len() != 64 || hex::decode(key).is_err() {
                return Err(eyre!("EVM_PRIVATE_KEY must be 32 hex-encoded bytes"));
            }
        }

        if let Some(ref solana) = self.solana {
            if solana.rpc_url.is_empty() {
                return Err(eyre!("SOLANA_RPC_URL cannot be empty"));
            }
            if solana.private_key.is_empty() {
                return Err(eyre!("SOLANA_PRIVATE_KEY cannot be empty"));
            }
        }

        Ok(())
    }
}
