// hook-crypto/src/keypair.rs

use crate::{hash::Hashable, CryptoError, CryptoResult, Signature, SignatureScheme};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Public key wrapper
#[derive(Clone, Serialize, Deserialize)]
pub struct PublicKey {
    scheme: SignatureScheme,
    bytes: Vec<u8>,
}

impl PublicKey {
    pub fn new(scheme: SignatureScheme, bytes: Vec<u8>) -> Self {
        Self { scheme, bytes }
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Upper-case hex as carried in `SigningPubKey`.
    ///
    /// Ed25519 keys get the ledger's `ED` marker byte in front so that the two
    /// schemes never produce the same 33-byte encoding.
    pub fn to_signing_hex(&self) -> String {
        match self.scheme {
            SignatureScheme::Secp256k1 => hex::encode_upper(&self.bytes),
            SignatureScheme::Ed25519 => format!("ED{}", hex::encode_upper(&self.bytes)),
        }
    }

    /// Parse a `SigningPubKey` value produced by [`PublicKey::to_signing_hex`]
    pub fn from_signing_hex(s: &str) -> CryptoResult<Self> {
        let (scheme, body) = match s.strip_prefix("ED") {
            Some(rest) if s.len() == 66 => (SignatureScheme::Ed25519, rest),
            _ => (SignatureScheme::Secp256k1, s),
        };
        let bytes = hex::decode(body)
            .map_err(|e| CryptoError::InvalidHex(e.to_string()))?;
        if bytes.is_empty() {
            return Err(CryptoError::InvalidPublicKey);
        }
        Ok(Self::new(scheme, bytes))
    }

    /// Verify a signature
    pub fn verify(&self, message: &[u8], signature: &Signature) -> CryptoResult<bool> {
        signature.verify(message, self)
    }
}

impl fmt::Debug for PublicKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "PublicKey({:?}, {}...)",
            self.scheme,
            hex::encode(&self.bytes[..8.min(self.bytes.len())])
        )
    }
}

impl PartialEq for PublicKey {
    fn eq(&self, other: &Self) -> bool {
        self.scheme == other.scheme && self.bytes == other.bytes
    }
}

impl Eq for PublicKey {}

/// Secret/Private key wrapper (kept private)
pub struct SecretKey {
    scheme: SignatureScheme,
    bytes: Vec<u8>,
}

impl SecretKey {
    pub fn new(scheme: SignatureScheme, bytes: Vec<u8>) -> Self {
        Self { scheme, bytes }
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Drop for SecretKey {
    fn drop(&mut self) {
        // Zero out the key material on drop
        self.bytes.iter_mut().for_each(|b| *b = 0);
    }
}

impl fmt::Debug for SecretKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretKey({:?}, [REDACTED])", self.scheme)
    }
}

/// Key pair containing both public and secret keys
pub struct KeyPair {
    scheme: SignatureScheme,
    public_key: PublicKey,
    secret_key: SecretKey,
}

impl KeyPair {
    /// Derive a keypair from an account secret.
    ///
    /// A secret of exactly 64 hex characters is taken as raw key material;
    /// anything else (a family seed, a passphrase) is reduced to 32 bytes with
    /// SHA-256. The same secret always yields the same keypair.
    pub fn from_secret(scheme: SignatureScheme, secret: &str) -> CryptoResult<Self> {
        let secret = secret.trim();
        if secret.is_empty() {
            return Err(CryptoError::InvalidSecretKey);
        }

        let seed: [u8; 32] = match hex::decode(secret) {
            Ok(bytes) if bytes.len() == 32 => {
                let mut seed = [0u8; 32];
                seed.copy_from_slice(&bytes);
                seed
            }
            _ => {
                let mut seed = [0u8; 32];
                seed.copy_from_slice(secret.hash().as_bytes());
                seed
            }
        };

        match scheme {
            SignatureScheme::Ed25519 => Self::ed25519_from_seed(&seed),
            SignatureScheme::Secp256k1 => Self::secp256k1_from_seed(&seed),
        }
    }

    fn ed25519_from_seed(seed: &[u8; 32]) -> CryptoResult<Self> {
        use ed25519_dalek::SigningKey;

        let signing_key = SigningKey::from_bytes(seed);
        let verifying_key = signing_key.verifying_key();

        Ok(Self {
            scheme: SignatureScheme::Ed25519,
            public_key: PublicKey::new(
                SignatureScheme::Ed25519,
                verifying_key.to_bytes().to_vec(),
            ),
            secret_key: SecretKey::new(
                SignatureScheme::Ed25519,
                signing_key.to_bytes().to_vec(),
            ),
        })
    }

    fn secp256k1_from_seed(seed: &[u8; 32]) -> CryptoResult<Self> {
        use secp256k1::{PublicKey as Secp256k1Pk, SecretKey as Secp256k1Sk, Secp256k1};

        let secp = Secp256k1::signing_only();
        let secret_key = Secp256k1Sk::from_slice(seed)
            .map_err(|_| CryptoError::InvalidSecretKey)?;
        let public_key = Secp256k1Pk::from_secret_key(&secp, &secret_key);

        Ok(Self {
            scheme: SignatureScheme::Secp256k1,
            public_key: PublicKey::new(
                SignatureScheme::Secp256k1,
                public_key.serialize().to_vec(),
            ),
            secret_key: SecretKey::new(
                SignatureScheme::Secp256k1,
                secret_key.secret_bytes().to_vec(),
            ),
        })
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    pub fn public_key(&self) -> &PublicKey {
        &self.public_key
    }

    /// Sign a message
    pub fn sign(&self, message: &[u8]) -> CryptoResult<Signature> {
        match self.scheme {
            SignatureScheme::Ed25519 => self.sign_ed25519(message),
            SignatureScheme::Secp256k1 => self.sign_secp256k1(message),
        }
    }

    fn sign_ed25519(&self, message: &[u8]) -> CryptoResult<Signature> {
        use ed25519_dalek::{Signature as Ed25519Sig, Signer, SigningKey};

        let signing_key = SigningKey::from_bytes(
            self.secret_key.as_bytes().try_into()
                .map_err(|_| CryptoError::InvalidSecretKey)?
        );

        let signature: Ed25519Sig = signing_key.sign(message);
        Ok(Signature::new(
            SignatureScheme::Ed25519,
            signature.to_bytes().to_vec(),
        ))
    }

    fn sign_secp256k1(&self, message: &[u8]) -> CryptoResult<Signature> {
        use secp256k1::{Message, SecretKey as Secp256k1Sk, Secp256k1};

        let secp = Secp256k1::signing_only();

        let secret_key = Secp256k1Sk::from_slice(self.secret_key.as_bytes())
            .map_err(|_| CryptoError::InvalidSecretKey)?;

        let msg_hash = message.hash();
        let msg = Message::from_digest_slice(msg_hash.as_bytes())
            .map_err(|_| CryptoError::InvalidSignature)?;

        let signature = secp.sign_ecdsa(&msg, &secret_key);
        Ok(Signature::new(
            SignatureScheme::Secp256k1,
            signature.serialize_der().to_vec(),
        ))
    }
}

impl fmt::Debug for KeyPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyPair")
            .field("scheme", &self.scheme)
            .field("public_key", &self.public_key)
            .field("secret_key", &"[REDACTED]")
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_derivation_is_deterministic() {
        let kp1 = KeyPair::from_secret(SignatureScheme::Secp256k1, "shhh-a-secret").unwrap();
        let kp2 = KeyPair::from_secret(SignatureScheme::Secp256k1, "shhh-a-secret").unwrap();
        assert_eq!(kp1.public_key(), kp2.public_key());
    }

    #[test]
    fn test_different_secrets_differ() {
        let kp1 = KeyPair::from_secret(SignatureScheme::Ed25519, "first").unwrap();
        let kp2 = KeyPair::from_secret(SignatureScheme::Ed25519, "second").unwrap();
        assert_ne!(kp1.public_key(), kp2.public_key());
    }

    #[test]
    fn test_raw_hex_secret() {
        let raw = "5f668a7ee96d944a4494cc947e4005e172d7ab3461ee5538f1f2a45a835e9657";
        let keypair = KeyPair::from_secret(SignatureScheme::Secp256k1, raw).unwrap();
        assert_eq!(hex::encode(keypair.secret_key.as_bytes()), raw);
    }

    #[test]
    fn test_empty_secret_rejected() {
        assert!(KeyPair::from_secret(SignatureScheme::Secp256k1, "  ").is_err());
    }

    #[test]
    fn test_signing_hex_marks_ed25519() {
        let ed = KeyPair::from_secret(SignatureScheme::Ed25519, "seed").unwrap();
        let hex = ed.public_key().to_signing_hex();
        assert!(hex.starts_with("ED"));
        assert_eq!(hex.len(), 66);

        let k1 = KeyPair::from_secret(SignatureScheme::Secp256k1, "seed").unwrap();
        assert_eq!(k1.public_key().to_signing_hex().len(), 66);
    }

    #[test]
    fn test_signing_hex_parses_back() {
        for scheme in [SignatureScheme::Ed25519, SignatureScheme::Secp256k1] {
            let keypair = KeyPair::from_secret(scheme, "seed").unwrap();
            let parsed = PublicKey::from_signing_hex(&keypair.public_key().to_signing_hex()).unwrap();
            assert_eq!(&parsed, keypair.public_key());
        }
    }

    #[test]
    fn test_sign_verify() {
        let keypair = KeyPair::from_secret(SignatureScheme::Ed25519, "seed").unwrap();
        let message = b"Hello, hooks!";
        let signature = keypair.sign(message).unwrap();
        assert!(keypair.public_key().verify(message, &signature).unwrap());
    }
}
