//! Surjection proof codec.
//!
//! A surjection proof shows that an output asset tag is a re-blinding of one of a set of input tags without revealing
//! which one. Proof construction and verification live in the primitives library; this module only moves proofs in
//! and out of their canonical byte form, which is compatible with libsecp256k1-zkp:
//!
//! ```text
//! | n_inputs: u16 LE | used_inputs bitmap: ceil(n_inputs / 8) | e0: 32 | s_0 .. s_{k-1}: 32 each |
//! ```
//!
//! where `k`, the ring size, is the number of bits set in the bitmap. Input `i` is a ring member when bit `i % 8` of
//! bitmap byte `i / 8` is set.

use crate::error::{BridgeError, ReadError};
use crate::serialization::{array_from_hex, from_hex, read_array, read_u16_le, to_hex, Readable, Writable};
use log::{debug, trace};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::io::{self, Read, Write};

/// Largest number of input tags a proof may commit to.
pub const MAX_N_INPUTS: usize = 256;
/// Largest ring size a proof may carry.
pub const MAX_USED_INPUTS: usize = 256;
pub const SCALAR_SIZE: usize = 32;
pub const BITMAP_SIZE: usize = MAX_N_INPUTS / 8;
/// Largest canonical encoding of a surjection proof.
pub const SERIALIZATION_BYTES_MAX: usize = serialization_bytes(MAX_N_INPUTS, MAX_USED_INPUTS);

/// Length of the canonical encoding of a proof over `n_inputs` inputs with `n_used_inputs` ring members.
pub const fn serialization_bytes(n_inputs: usize, n_used_inputs: usize) -> usize {
    2 + bitmap_len(n_inputs) + SCALAR_SIZE * (1 + n_used_inputs)
}

const fn bitmap_len(n_inputs: usize) -> usize {
    n_inputs.div_ceil(8)
}

/// A 32-byte Borromean signature scalar, stored exactly as it appears on the wire.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProofScalar(
    #[serde(serialize_with = "to_hex_array", deserialize_with = "array_from_hex")] pub [u8; SCALAR_SIZE],
);

fn to_hex_array<S: serde::Serializer>(bytes: &[u8; SCALAR_SIZE], s: S) -> Result<S::Ok, S::Error> {
    to_hex(bytes, s)
}

impl ProofScalar {
    pub fn as_bytes(&self) -> &[u8; SCALAR_SIZE] {
        &self.0
    }
}

impl From<[u8; SCALAR_SIZE]> for ProofScalar {
    fn from(bytes: [u8; SCALAR_SIZE]) -> Self {
        Self(bytes)
    }
}

impl fmt::Debug for ProofScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

impl fmt::Display for ProofScalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", hex::encode(self.0))
    }
}

/// A parsed surjection proof. Owns copies of all its data; nothing borrows from the buffer it was parsed from.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ProofRepr", into = "ProofRepr")]
pub struct SurjectionProof {
    /// Total number of input asset tags
    n_inputs: u16,
    /// Bitmap of which input tags are used in the proof. Bytes past `ceil(n_inputs / 8)` are always zero.
    used_inputs: [u8; BITMAP_SIZE],
    /// Borromean signature initial challenge, e0
    challenge: ProofScalar,
    /// One response scalar per ring member, in input order
    responses: Vec<ProofScalar>,
}

impl SurjectionProof {
    /// Build a proof from its parts.
    ///
    /// `used_inputs` must be exactly `ceil(n_inputs / 8)` bytes with no bits set at or past `n_inputs`, and there must
    /// be one response per set bit.
    pub fn new(
        n_inputs: usize,
        used_inputs: &[u8],
        challenge: ProofScalar,
        responses: Vec<ProofScalar>,
    ) -> Result<Self, BridgeError> {
        if n_inputs > MAX_N_INPUTS {
            return Err(BridgeError::invalid_argument(format!(
                "a surjection proof supports at most {MAX_N_INPUTS} inputs, got {n_inputs}"
            )));
        }
        if used_inputs.len() != bitmap_len(n_inputs) {
            return Err(BridgeError::invalid_argument(format!(
                "used inputs bitmap for {n_inputs} inputs must be {} bytes, got {}",
                bitmap_len(n_inputs),
                used_inputs.len()
            )));
        }
        let n_used = check_bitmap(n_inputs, used_inputs).map_err(BridgeError::InvalidArgument)?;
        if n_used != responses.len() {
            return Err(BridgeError::invalid_argument(format!(
                "{n_used} ring members need {n_used} responses, got {}",
                responses.len()
            )));
        }
        let mut bitmap = [0u8; BITMAP_SIZE];
        bitmap[..used_inputs.len()].copy_from_slice(used_inputs);
        // n_inputs <= MAX_N_INPUTS, which fits in a u16
        Ok(Self { n_inputs: n_inputs as u16, used_inputs: bitmap, challenge, responses })
    }

    /// Build a proof from the indices of the inputs that make up the ring. Indices must be distinct and below
    /// `n_inputs`; responses are matched to them in ascending index order.
    pub fn from_used_indices(
        n_inputs: usize,
        indices: &[usize],
        challenge: ProofScalar,
        responses: Vec<ProofScalar>,
    ) -> Result<Self, BridgeError> {
        if n_inputs > MAX_N_INPUTS {
            return Err(BridgeError::invalid_argument(format!(
                "a surjection proof supports at most {MAX_N_INPUTS} inputs, got {n_inputs}"
            )));
        }
        let mut bitmap = vec![0u8; bitmap_len(n_inputs)];
        for &i in indices {
            if i >= n_inputs {
                return Err(BridgeError::invalid_argument(format!(
                    "input index {i} is out of range for {n_inputs} inputs"
                )));
            }
            if bitmap[i / 8] & (1 << (i % 8)) != 0 {
                return Err(BridgeError::invalid_argument(format!("input index {i} is listed more than once")));
            }
            bitmap[i / 8] |= 1 << (i % 8);
        }
        Self::new(n_inputs, &bitmap, challenge, responses)
    }

    /// Parse a proof from its canonical encoding. The buffer must hold exactly one proof.
    pub fn parse(data: &[u8]) -> Result<Self, BridgeError> {
        let mut reader = data;
        let (n_inputs, used_inputs, n_used) = read_header(&mut reader).map_err(|e| {
            debug!("Rejected surjection proof header: {e}");
            BridgeError::from(e)
        })?;
        let expected = serialization_bytes(n_inputs as usize, n_used);
        if data.len() != expected {
            debug!("Surjection proof length mismatch. Expected {expected} bytes, got {}", data.len());
            let problem = if data.len() < expected { "truncated" } else { "has trailing bytes" };
            return Err(BridgeError::malformed(format!(
                "surjection proof with {n_inputs} inputs and {n_used} ring members is {expected} bytes; input of {} \
                 bytes {problem}",
                data.len()
            )));
        }
        let (challenge, responses) = read_body(&mut reader, n_used)?;
        trace!("Parsed surjection proof with {n_inputs} inputs and ring size {n_used}");
        Ok(Self { n_inputs, used_inputs, challenge, responses })
    }

    /// The canonical byte encoding of the proof, exactly [`Self::serialized_len`] bytes long.
    pub fn serialize(&self) -> Vec<u8> {
        Writable::serialize(self)
    }

    /// Write the canonical encoding into `out`, returning the number of bytes written. `out` must be at least
    /// [`Self::serialized_len`] bytes long and is left untouched otherwise.
    pub fn serialize_into(&self, out: &mut [u8]) -> Result<usize, BridgeError> {
        let len = self.serialized_len();
        if out.len() < len {
            return Err(BridgeError::invalid_argument(format!(
                "surjection proof needs {len} bytes but the output buffer holds {}",
                out.len()
            )));
        }
        let mut cursor = &mut out[..len];
        self.write(&mut cursor).map_err(|e| BridgeError::invalid_argument(e.to_string()))?;
        Ok(len)
    }

    pub fn serialized_len(&self) -> usize {
        serialization_bytes(self.n_inputs(), self.n_used_inputs())
    }

    pub fn n_inputs(&self) -> usize {
        self.n_inputs as usize
    }

    /// The ring size.
    pub fn n_used_inputs(&self) -> usize {
        self.responses.len()
    }

    /// The significant bytes of the used inputs bitmap.
    pub fn used_inputs(&self) -> &[u8] {
        &self.used_inputs[..bitmap_len(self.n_inputs())]
    }

    pub fn is_input_used(&self, index: usize) -> bool {
        index < self.n_inputs() && self.used_inputs[index / 8] & (1 << (index % 8)) != 0
    }

    pub fn used_indices(&self) -> Vec<usize> {
        (0..self.n_inputs()).filter(|&i| self.is_input_used(i)).collect()
    }

    pub fn challenge(&self) -> &ProofScalar {
        &self.challenge
    }

    pub fn responses(&self) -> &[ProofScalar] {
        &self.responses
    }
}

/// Returns the number of set bits, or a description of why the bitmap is inconsistent with `n_inputs`.
fn check_bitmap(n_inputs: usize, bitmap: &[u8]) -> Result<usize, String> {
    if n_inputs % 8 != 0 {
        let padding_mask = 0xFFu8 << (n_inputs % 8);
        if let Some(last) = bitmap.last() {
            if last & padding_mask != 0 {
                return Err(format!("used inputs bitmap marks inputs past the {n_inputs} declared"));
            }
        }
    }
    let n_used = bitmap.iter().map(|b| b.count_ones() as usize).sum::<usize>();
    if n_used > MAX_USED_INPUTS {
        return Err(format!("ring size {n_used} exceeds the maximum of {MAX_USED_INPUTS}"));
    }
    Ok(n_used)
}

fn read_header<R: Read + ?Sized>(reader: &mut R) -> Result<(u16, [u8; BITMAP_SIZE], usize), ReadError> {
    let n_inputs = read_u16_le(reader, "n_inputs")?;
    if n_inputs as usize > MAX_N_INPUTS {
        return Err(ReadError::new("n_inputs", format!("{n_inputs} exceeds the maximum of {MAX_N_INPUTS}")));
    }
    let mut used_inputs = [0u8; BITMAP_SIZE];
    let len = bitmap_len(n_inputs as usize);
    reader.read_exact(&mut used_inputs[..len]).map_err(|e| ReadError::new("used_inputs", e.to_string()))?;
    let n_used = check_bitmap(n_inputs as usize, &used_inputs[..len]).map_err(|e| ReadError::new("used_inputs", e))?;
    Ok((n_inputs, used_inputs, n_used))
}

fn read_body<R: Read + ?Sized>(reader: &mut R, n_used: usize) -> Result<(ProofScalar, Vec<ProofScalar>), ReadError> {
    let challenge = ProofScalar(read_array::<SCALAR_SIZE, _>(reader, "challenge")?);
    let responses = (0..n_used)
        .map(|_| read_array::<SCALAR_SIZE, _>(reader, "responses").map(ProofScalar))
        .collect::<Result<Vec<_>, _>>()?;
    Ok((challenge, responses))
}

impl Readable for SurjectionProof {
    fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self, ReadError> {
        let (n_inputs, used_inputs, n_used) = read_header(reader)?;
        let (challenge, responses) = read_body(reader, n_used)?;
        Ok(Self { n_inputs, used_inputs, challenge, responses })
    }
}

impl Writable for SurjectionProof {
    fn write<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_all(&self.n_inputs.to_le_bytes())?;
        writer.write_all(self.used_inputs())?;
        writer.write_all(&self.challenge.0)?;
        for s in &self.responses {
            writer.write_all(&s.0)?;
        }
        Ok(())
    }
}

#[derive(Serialize, Deserialize)]
struct ProofRepr {
    n_inputs: usize,
    #[serde(serialize_with = "to_hex", deserialize_with = "from_hex")]
    used_inputs: Vec<u8>,
    challenge: ProofScalar,
    responses: Vec<ProofScalar>,
}

impl From<SurjectionProof> for ProofRepr {
    fn from(proof: SurjectionProof) -> Self {
        ProofRepr {
            n_inputs: proof.n_inputs(),
            used_inputs: proof.used_inputs().to_vec(),
            challenge: proof.challenge,
            responses: proof.responses,
        }
    }
}

impl TryFrom<ProofRepr> for SurjectionProof {
    type Error = BridgeError;

    fn try_from(repr: ProofRepr) -> Result<Self, Self::Error> {
        SurjectionProof::new(repr.n_inputs, &repr.used_inputs, repr.challenge, repr.responses)
    }
}
