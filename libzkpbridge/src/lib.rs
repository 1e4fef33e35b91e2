//! Bridge over the secp256k1-zkp primitives.
//!
//! Exposes three independent, stateless services:
//!
//! * [`hashes`]: SHA-256 over caller-supplied bytes, including BIP-340 tagged hashing.
//! * [`zeroization`]: constant-time, non-elidable conditional erasure of caller-owned memory.
//! * [`surjection`]: the canonical byte codec for surjection proofs.
//!
//! All buffers belong to the caller. Preconditions are checked at the boundary and reported as [`BridgeError`]s
//! before any work is done.

pub mod digest;
pub mod error;
pub mod hashes;
pub mod serialization;
pub mod surjection;
pub mod zeroization;

#[cfg(test)]
mod tests;

pub use digest::{HashDigest, Sha256Digest, DIGEST_SIZE};
pub use error::{BridgeError, ReadError};
pub use hashes::{sha256, sha256_into, tagged_sha256};
pub use serialization::{Readable, Writable};
pub use surjection::{ProofScalar, SurjectionProof};
pub use zeroization::{memczero, safe_compare, secure_zero, zero_out, EraseFlag, SecretBuffer};
