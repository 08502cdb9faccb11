// hook-core/src/signer.rs

use crate::{transaction::TransactionEnvelope, HookError, HookResult};
use hook_crypto::{Hash, HashAlgorithm, KeyPair, PublicKey, Signature, SignatureScheme};

/// Prefix mixed into the signing hash of a single-signed transaction
const SIGNING_PREFIX: [u8; 4] = *b"STX\0";

/// Prefix mixed into the transaction id hash
const TX_ID_PREFIX: [u8; 4] = *b"TXN\0";

/// A signed transaction ready for `submit`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// Upper-case hex blob
    pub tx_blob: String,
    /// Upper-case transaction id
    pub hash: String,
}

/// Signing capability the pipeline calls into.
///
/// Signing must not touch anything but its inputs; the orchestrator may call it
/// more than once per operation (fee estimation signs a draft).
pub trait TransactionSigner: Send + Sync {
    fn derive_credential(&self, secret: &str) -> HookResult<KeyPair>;

    fn sign(&self, envelope: &TransactionEnvelope, key: &KeyPair) -> HookResult<SignedTransaction>;
}

/// Signs the canonical JSON encoding of the envelope.
///
/// The blob is the hex of the signed JSON. Ledgers that only accept their
/// binary serialization need a different `TransactionSigner`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalSigner {
    scheme: SignatureScheme,
}

impl LocalSigner {
    pub fn new(scheme: SignatureScheme) -> Self {
        Self { scheme }
    }

    pub fn scheme(&self) -> SignatureScheme {
        self.scheme
    }

    /// Decode a blob produced by [`LocalSigner::sign`]
    pub fn decode(tx_blob: &str) -> HookResult<TransactionEnvelope> {
        let bytes = hook_crypto::hex_to_buffer(tx_blob)?;
        TransactionEnvelope::from_json_bytes(&bytes)
    }

    /// Check the signature embedded in a blob against its `SigningPubKey`
    pub fn verify(tx_blob: &str) -> HookResult<bool> {
        let signed = Self::decode(tx_blob)?;
        let (pub_hex, sig_hex) = match (&signed.signing_pub_key, &signed.txn_signature) {
            (Some(pk), Some(sig)) => (pk, sig),
            _ => return Ok(false),
        };

        let public_key = PublicKey::from_signing_hex(pub_hex)?;
        let sig_bytes = hook_crypto::hex_to_buffer(sig_hex)?;
        let signature = Signature::new(public_key.scheme(), sig_bytes);

        let mut unsigned = signed.unsigned();
        unsigned.signing_pub_key = signed.signing_pub_key.clone();
        let message = signing_message(&unsigned)?;

        Ok(public_key.verify(&message, &signature)?)
    }
}

impl TransactionSigner for LocalSigner {
    fn derive_credential(&self, secret: &str) -> HookResult<KeyPair> {
        Ok(KeyPair::from_secret(self.scheme, secret)?)
    }

    fn sign(&self, envelope: &TransactionEnvelope, key: &KeyPair) -> HookResult<SignedTransaction> {
        if key.scheme() != self.scheme {
            return Err(HookError::InvalidTransaction(format!(
                "Key scheme {:?} does not match signer scheme {:?}",
                key.scheme(),
                self.scheme
            )));
        }

        let mut tx = envelope.unsigned();
        tx.signing_pub_key = Some(key.public_key().to_signing_hex());

        let message = signing_message(&tx)?;
        let signature = key.sign(&message)?;
        tx.txn_signature = Some(signature.to_hex_upper());

        let blob = tx.to_json_bytes()?;
        let hash = Hash::prefixed(TX_ID_PREFIX, &blob, HashAlgorithm::Sha512Half);

        tracing::debug!("Signed {} for {} ({} bytes)", hash.to_hex_upper(), tx.account, blob.len());

        Ok(SignedTransaction {
            tx_blob: hex::encode_upper(&blob),
            hash: hash.to_hex_upper(),
        })
    }
}

/// Bytes the signature covers: prefix followed by the JSON without `TxnSignature`
fn signing_message(tx: &TransactionEnvelope) -> HookResult<Vec<u8>> {
    let body = tx.to_json_bytes()?;
    let mut message = Vec::with_capacity(SIGNING_PREFIX.len() + body.len());
    message.extend_from_slice(&SIGNING_PREFIX);
    message.extend_from_slice(&body);
    Ok(message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transaction::HookDefinition;

    fn envelope() -> TransactionEnvelope {
        TransactionEnvelope::set_hook("rSigner", 3, "100000", 21338, HookDefinition::removal())
    }

    #[test]
    fn test_sign_and_verify() {
        for scheme in [SignatureScheme::Secp256k1, SignatureScheme::Ed25519] {
            let signer = LocalSigner::new(scheme);
            let key = signer.derive_credential("sEdSomeSecret").unwrap();
            let signed = signer.sign(&envelope(), &key).unwrap();

            assert_eq!(signed.hash.len(), 64);
            assert!(LocalSigner::verify(&signed.tx_blob).unwrap());

            let decoded = LocalSigner::decode(&signed.tx_blob).unwrap();
            assert_eq!(decoded.account, "rSigner");
            assert!(decoded.is_signed());
        }
    }

    #[test]
    fn test_tampered_blob_fails_verification() {
        let signer = LocalSigner::default();
        let key = signer.derive_credential("secret").unwrap();
        let signed = signer.sign(&envelope(), &key).unwrap();

        let mut decoded = LocalSigner::decode(&signed.tx_blob).unwrap();
        decoded.fee = "1".into();
        let tampered = hex::encode_upper(decoded.to_json_bytes().unwrap());
        assert!(!LocalSigner::verify(&tampered).unwrap());
    }

    #[test]
    fn test_signing_does_not_mutate_input() {
        let signer = LocalSigner::default();
        let key = signer.derive_credential("secret").unwrap();
        let tx = envelope();
        signer.sign(&tx, &key).unwrap();
        assert!(!tx.is_signed());
        assert!(tx.signing_pub_key.is_none());
    }

    #[test]
    fn test_scheme_mismatch_rejected() {
        let signer = LocalSigner::new(SignatureScheme::Secp256k1);
        let ed_key = LocalSigner::new(SignatureScheme::Ed25519)
            .derive_credential("secret")
            .unwrap();
        assert!(signer.sign(&envelope(), &ed_key).is_err());
    }

    #[test]
    fn test_unsigned_blob_does_not_verify() {
        let blob = hex::encode_upper(envelope().to_json_bytes().unwrap());
        assert!(!LocalSigner::verify(&blob).unwrap());
    }
}
