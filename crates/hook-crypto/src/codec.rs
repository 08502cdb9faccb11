// hook-crypto/src/codec.rs

//! Hex conversion and namespace digests.
//!
//! Compiled bytecode travels as `CreateCode`, parameter names as
//! `HookParameterName`; both must be hex on the wire. Namespaces are never sent
//! raw, only as their SHA-256 digest.

use crate::{hash::Hashable, CryptoError, CryptoResult};

/// Render raw bytes as a contiguous lower-case hex string, two digits per byte.
///
/// `None` renders as the empty string (a file without compiled output).
pub fn buffer_to_hex(buffer: Option<&[u8]>) -> String {
    buffer.map(hex::encode).unwrap_or_default()
}

/// SHA-256 of the UTF-8 input as 64 lower-case hex characters.
///
/// Callers upper-case it before placing it in `HookNamespace`.
pub fn digest_hex(input: &str) -> String {
    input.hash().to_hex()
}

/// Upper-case hex of a string's UTF-8 bytes.
pub fn string_to_hex(input: &str) -> String {
    hex::encode_upper(input.as_bytes())
}

pub fn hex_to_buffer(input: &str) -> CryptoResult<Vec<u8>> {
    hex::decode(input).map_err(|e| CryptoError::InvalidHex(e.to_string()))
}
