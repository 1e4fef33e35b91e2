use crate::error::ReadError;
use serde::{Deserialize, Deserializer, Serialize};
use std::io::{self, Read, Write};

pub trait Readable: Sized {
    fn read<R: Read + ?Sized>(reader: &mut R) -> Result<Self, ReadError>;
}

pub trait Writable {
    fn write<W: Write + ?Sized>(&self, writer: &mut W) -> io::Result<()>;

    fn serialize(&self) -> Vec<u8> {
        let mut buf = Vec::new();
        self.write(&mut buf).expect("writing to a Vec cannot fail");
        buf
    }
}

pub fn read_u16_le<R: Read + ?Sized>(reader: &mut R, field: &str) -> Result<u16, ReadError> {
    let mut buf = [0u8; 2];
    reader.read_exact(&mut buf).map_err(|e| ReadError::new(field, e.to_string()))?;
    Ok(u16::from_le_bytes(buf))
}

pub fn read_array<const N: usize, R: Read + ?Sized>(reader: &mut R, field: &str) -> Result<[u8; N], ReadError> {
    let mut buf = [0u8; N];
    reader.read_exact(&mut buf).map_err(|e| ReadError::new(field, e.to_string()))?;
    Ok(buf)
}

pub fn to_hex<S>(bytes: &[u8], s: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    hex::encode(bytes).serialize(s)
}

pub fn from_hex<'de, D>(de: D) -> Result<Vec<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let hex_str = String::deserialize(de)?;
    hex::decode(hex_str).map_err(|e| serde::de::Error::custom(format!("Invalid hex string: {e}")))
}

pub fn array_from_hex<'de, D>(de: D) -> Result<[u8; 32], D::Error>
where
    D: Deserializer<'de>,
{
    let hex_str = String::deserialize(de)?;
    let mut result = [0u8; 32];
    hex::decode_to_slice(hex_str, &mut result)
        .map_err(|e| serde::de::Error::custom(format!("Invalid hex string: {e}")))?;
    Ok(result)
}
