//! SHA-256 digest service.
//!
//! The compression function comes from the `sha2` crate. This module only provides the boundary: explicit lengths,
//! fixed-size outputs and BIP-340 style tagged hashing.

use crate::digest::{HashDigest, DIGEST_SIZE};
use crate::error::BridgeError;
use log::trace;
use sha2::{Digest, Sha256};

/// Hash the first `length` bytes of `input` into `output`.
///
/// `output` must be exactly [`DIGEST_SIZE`] bytes and `length` may not exceed `input.len()`. On error `output` is
/// left untouched; on success it is completely overwritten.
pub fn sha256_into(output: &mut [u8], input: &[u8], length: usize) -> Result<(), BridgeError> {
    if output.len() != DIGEST_SIZE {
        return Err(BridgeError::invalid_argument(format!(
            "digest output buffer must be {DIGEST_SIZE} bytes, got {}",
            output.len()
        )));
    }
    let data = input.get(..length).ok_or_else(|| {
        BridgeError::invalid_argument(format!("requested {length} bytes from a {} byte input", input.len()))
    })?;
    trace!("Hashing {length} bytes with SHA-256");
    let mut hasher = Sha256::new();
    hasher.update(data);
    let hash = hasher.finalize();
    output.copy_from_slice(&hash);
    Ok(())
}

/// Compute the SHA-256 digest of `data`.
pub fn sha256<B: AsRef<[u8]>>(data: B) -> HashDigest {
    let hash = Sha256::digest(data.as_ref());
    let mut bytes = [0u8; DIGEST_SIZE];
    bytes.copy_from_slice(&hash);
    HashDigest::new(bytes)
}

/// Compute a tagged hash as defined in BIP-340: `SHA256(SHA256(tag) || SHA256(tag) || data)`.
pub fn tagged_sha256<T: AsRef<[u8]>, B: AsRef<[u8]>>(tag: T, data: B) -> HashDigest {
    let tag_hash = Sha256::digest(tag.as_ref());
    let hash = Sha256::new().chain_update(&tag_hash).chain_update(&tag_hash).chain_update(data.as_ref()).finalize();
    let mut bytes = [0u8; DIGEST_SIZE];
    bytes.copy_from_slice(&hash);
    HashDigest::new(bytes)
}
