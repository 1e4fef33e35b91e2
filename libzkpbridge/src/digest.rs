use hex::{FromHex, FromHexError};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use subtle::ConstantTimeEq;

/// Size of a SHA-256 digest in bytes.
pub const DIGEST_SIZE: usize = 32;

/// A 256 bit SHA-256 digest.
#[derive(Clone, Copy, Default)]
pub struct HashDigest {
    data: [u8; DIGEST_SIZE],
}

pub type Sha256Digest = HashDigest;

impl HashDigest {
    pub const BYTE_COUNT: usize = DIGEST_SIZE;

    pub fn new(data: [u8; DIGEST_SIZE]) -> Self {
        HashDigest { data }
    }

    /// Build a digest from a slice, which must be exactly [`DIGEST_SIZE`] bytes long.
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let data: [u8; DIGEST_SIZE] = bytes.try_into().ok()?;
        Some(HashDigest { data })
    }

    /// Get the raw bytes of the digest.
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.data
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.data.to_vec()
    }

    pub fn into_bytes(self) -> [u8; DIGEST_SIZE] {
        self.data
    }
}

impl AsRef<[u8]> for HashDigest {
    fn as_ref(&self) -> &[u8] {
        &self.data
    }
}

impl From<[u8; DIGEST_SIZE]> for HashDigest {
    fn from(data: [u8; DIGEST_SIZE]) -> Self {
        HashDigest::new(data)
    }
}

impl FromHex for HashDigest {
    type Error = FromHexError;

    fn from_hex<T: AsRef<[u8]>>(hex: T) -> Result<Self, Self::Error> {
        let mut data = [0u8; DIGEST_SIZE];
        hex::decode_to_slice(hex, &mut data)?;
        Ok(HashDigest { data })
    }
}

impl ConstantTimeEq for HashDigest {
    fn ct_eq(&self, other: &Self) -> subtle::Choice {
        self.data.ct_eq(&other.data)
    }
}

impl PartialEq for HashDigest {
    fn eq(&self, other: &Self) -> bool {
        self.ct_eq(other).into()
    }
}

impl Eq for HashDigest {}

impl PartialOrd for HashDigest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HashDigest {
    fn cmp(&self, other: &Self) -> Ordering {
        self.data.cmp(&other.data)
    }
}

impl fmt::Display for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SHA256 digest: {}", hex::encode(self.data))
    }
}

impl fmt::Debug for HashDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HashDigest({})", hex::encode(self.data))
    }
}

impl Serialize for HashDigest {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        hex::encode(self.data).serialize(s)
    }
}

impl<'de> Deserialize<'de> for HashDigest {
    fn deserialize<De: Deserializer<'de>>(de: De) -> Result<Self, De::Error> {
        let hex_str = String::deserialize(de)?;
        let mut data = [0u8; DIGEST_SIZE];
        hex::decode_to_slice(&hex_str, &mut data).map_err(serde::de::Error::custom)?;
        Ok(Self::new(data))
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use hex::ToHex;

    const ABC: &str = "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad";

    #[test]
    fn hex_roundtrip() {
        let digest = HashDigest::from_hex(ABC).expect("valid hex");
        assert_eq!(digest.encode_hex::<String>(), ABC);
        assert_eq!(digest.encode_hex_upper::<String>(), ABC.to_uppercase());
        assert_eq!(digest.encode_hex::<String>(), hex::encode(digest.as_bytes()));
        assert!(HashDigest::from_hex("ba78").is_err());
    }

    #[test]
    fn display_names_the_algorithm() {
        let digest = HashDigest::from_hex(ABC).unwrap();
        assert_eq!(digest.to_string(), format!("SHA256 digest: {ABC}"));
    }

    #[test]
    fn ordering_is_lexicographic() {
        let mut low = [0u8; 32];
        let mut high = [0u8; 32];
        low[31] = 0xff;
        high[0] = 0x01;
        assert!(HashDigest::new(low) < HashDigest::new(high));
        assert_eq!(HashDigest::new(low).cmp(&HashDigest::new(low)), Ordering::Equal);
    }

    #[test]
    fn from_slice_requires_exact_length() {
        assert!(HashDigest::from_slice(&[0u8; 31]).is_none());
        assert!(HashDigest::from_slice(&[0u8; 33]).is_none());
        assert_eq!(HashDigest::from_slice(&[7u8; 32]), Some(HashDigest::new([7u8; 32])));
    }

    #[test]
    fn serde_uses_hex() {
        let digest = HashDigest::from_hex(ABC).unwrap();
        let json = serde_json::to_string(&digest).unwrap();
        assert_eq!(json, format!("\"{ABC}\""));
        let back: HashDigest = serde_json::from_str(&json).unwrap();
        assert_eq!(back, digest);
        assert!(serde_json::from_str::<HashDigest>("\"zz\"").is_err());
    }
}
