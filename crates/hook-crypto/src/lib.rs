// hook-crypto/src/lib.rs

//! Encoding and cryptographic helpers for the hook transaction pipeline
//!
//! This crate provides:
//! - Hex conversion of compiled bytecode and parameter names
//! - Content hashing (SHA-256 namespaces, SHA-512Half transaction ids)
//! - Deterministic key derivation from an account secret
//! - Digital signatures (SECP256k1, Ed25519)

pub mod codec;
pub mod hash;
pub mod keypair;
pub mod signature;

pub use codec::{buffer_to_hex, digest_hex, hex_to_buffer, string_to_hex};
pub use hash::{Hash, HashAlgorithm, Hashable};
pub use keypair::{KeyPair, PublicKey, SecretKey};
pub use signature::{Signature, SignatureScheme};

/// Result type for cryptographic operations
pub type CryptoResult<T> = Result<T, CryptoError>;

/// Errors that can occur during cryptographic operations
#[derive(Debug, thiserror::Error)]
pub enum CryptoError {
    #[error("Invalid signature")]
    InvalidSignature,

    #[error("Invalid public key")]
    InvalidPublicKey,

    #[error("Invalid secret key")]
    InvalidSecretKey,

    #[error("Invalid hex: {0}")]
    InvalidHex(String),
}
