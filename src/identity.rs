//! Signing identities
//!
//! Key material is materialized by the caller (the binary, a test harness)
//! and injected here; the pipeline itself never reads secrets from files or
//! the environment. Only derived addresses/public keys are ever surfaced;
//! `Debug` output redacts the keys.

use std::fmt;

use alloy::{network::EthereumWallet, primitives::Address, signers::local::PrivateKeySigner};
use eyre::{eyre, Result};
use solana_sdk::signature::{Keypair, Signer};
use solana_sdk::pubkey::Pubkey;

/// Account-based signing identity: a secp256k1 private key and its
/// derived EVM address.
pub struct EvmIdentity {
    signer: PrivateKeySigner,
}

impl EvmIdentity {
    /// Build from a hex private key (with or without 0x prefix).
    pub fn from_private_key(private_key: &str) -> Result<Self> {
        let signer: PrivateKeySigner = private_key
            .parse()
            .map_err(|e| eyre!("Invalid EVM private key: {}", e))?;
        Ok(Self { signer })
    }

    /// The derived signer address.
    pub fn address(&self) -> Address {
        self.signer.address()
    }

    /// Wallet wrapper for alloy provider builders.
    pub fn wallet(&self) -> EthereumWallet {
        EthereumWallet::from(self.signer.clone())
    }
}

/// Redacts the private key; only the derived address is shown.
impl fmt::Debug for EvmIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EvmIdentity")
            .field("address", &self.signer.address())
            .field("private_key", &"<redacted>")
            .finish()
    }
}

/// Instruction-based signing identity: an ed25519 keypair and its derived
/// public key.
pub struct SolanaIdentity {
    keypair: Keypair,
}

impl SolanaIdentity {
    /// Build from a base58-encoded 64-byte secret key (the format Solana
    /// wallets export).
    pub fn from_base58(secret: &str) -> Result<Self> {
        let bytes = bs58::decode(secret)
            .into_vec()
            .map_err(|e| eyre!("Invalid base58 Solana secret key: {}", e))?;
        let keypair = Keypair::from_bytes(&bytes)
            .map_err(|e| eyre!("Invalid Solana keypair bytes: {}", e))?;
        Ok(Self { keypair })
    }

    /// Build from an existing keypair (tests, external key loaders).
    pub fn from_keypair(keypair: Keypair) -> Self {
        Self { keypair }
    }

    /// The derived public key.
    pub fn pubkey(&self) -> Pubkey {
        self.keypair.pubkey()
    }

    /// The underlying keypair, for transaction signing.
    pub fn keypair(&self) -> &Keypair {
        &self.keypair
    }
}

/// Redacts the secret key; only the public key is shown.
impl fmt::Debug for SolanaIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SolanaIdentity")
            .field("pubkey", &self.keypair.pubkey())
            .field("secret_key", &"<redacted>")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Anvil's well-known first dev key, never used on a real network.
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    #[test]
    fn test_evm_identity_derives_address() {
        let identity = EvmIdentity::from_private_key(DEV_KEY).unwrap();
        assert_eq!(
            identity.address().to_string().to_lowercase(),
            "0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266"
        );
    }

    #[test]
    fn test_evm_identity_rejects_garbage() {
        assert!(EvmIdentity::from_private_key("0x1234").is_err());
        assert!(EvmIdentity::from_private_key("not-hex").is_err());
    }

    #[test]
    fn test_evm_identity_debug_redacts_key() {
        let identity = EvmIdentity::from_private_key(DEV_KEY).unwrap();
        let debug = format!("{:?}", identity);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains("ac0974bec39a17e36"));
    }

    #[test]
    fn test_solana_identity_roundtrip() {
        let keypair = Keypair::new();
        let encoded = bs58::encode(keypair.to_bytes()).into_string();
        let identity = SolanaIdentity::from_base58(&encoded).unwrap();
        assert_eq!(identity.pubkey(), keypair.pubkey());
    }

    #[test]
    fn test_solana_identity_debug_redacts_secret() {
        let identity = SolanaIdentity::from_keypair(Keypair::new());
        let secret_b58 = bs58::encode(identity.keypair().to_bytes()).into_string();
        let debug = format!("{:?}", identity);
        assert!(debug.contains("<redacted>"));
        assert!(!debug.contains(&secret_b58));
    }

    #[test]
    fn test_solana_identity_rejects_short_secret() {
        let short = bs58::encode([1u8; 16]).into_string();
        assert!(SolanaIdentity::from_base58(&short).is_err());
    }
}
