//! Constant-time, non-elidable memory erasure.
//!
//! [`memczero`] reads and writes every byte of the requested range with volatile accesses whatever the flag says, so
//! its running time depends on the length alone. Callers must not branch on secret data around these calls.

use crate::error::BridgeError;
use std::fmt;
use std::ops::{Deref, DerefMut};
use std::ptr;
use std::sync::atomic::{compiler_fence, Ordering};
use subtle::{Choice, ConditionallySelectable, ConstantTimeEq};
use zeroize::Zeroizing;

/// Selects whether [`memczero`] clears the region or leaves it as is. Only the values 0 and 1 are representable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum EraseFlag {
    Keep = 0,
    Erase = 1,
}

impl EraseFlag {
    fn choice(self) -> Choice {
        Choice::from(self as u8)
    }
}

impl From<bool> for EraseFlag {
    fn from(erase: bool) -> Self {
        if erase {
            EraseFlag::Erase
        } else {
            EraseFlag::Keep
        }
    }
}

impl TryFrom<i32> for EraseFlag {
    type Error = BridgeError;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(EraseFlag::Keep),
            1 => Ok(EraseFlag::Erase),
            v => Err(BridgeError::invalid_argument(format!("erase flag must be 0 or 1, got {v}"))),
        }
    }
}

impl TryFrom<u8> for EraseFlag {
    type Error = BridgeError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        EraseFlag::try_from(i32::from(value))
    }
}

/// Zero the first `length` bytes of `region` if `flag` is [`EraseFlag::Erase`], otherwise leave them unchanged.
///
/// Fails with `InvalidArgument`, without touching the region, if `length` exceeds the region.
pub fn memczero(region: &mut [u8], length: usize, flag: EraseFlag) -> Result<(), BridgeError> {
    let region_len = region.len();
    let target = region.get_mut(..length).ok_or_else(|| {
        BridgeError::invalid_argument(format!("cannot erase {length} bytes of a {region_len} byte region"))
    })?;
    conditional_zero(target, flag);
    Ok(())
}

/// [`memczero`] taking the flag as a C-style integer. Anything other than 0 or 1 is rejected.
pub fn secure_zero(region: &mut [u8], length: usize, flag: i32) -> Result<(), BridgeError> {
    let flag = EraseFlag::try_from(flag)?;
    memczero(region, length, flag)
}

/// Unconditionally wipe the whole region.
pub fn zero_out(region: &mut [u8]) {
    conditional_zero(region, EraseFlag::Erase);
}

/// Constant-time comparison of two byte strings. Strings of different lengths are never equal.
pub fn safe_compare(lhs: &[u8], rhs: &[u8]) -> bool {
    lhs.ct_eq(rhs).into()
}

fn conditional_zero(target: &mut [u8], flag: EraseFlag) {
    // 0x00 when erasing, 0xFF when keeping
    let keep_mask = u8::conditional_select(&0xFF, &0x00, flag.choice());
    for byte in target.iter_mut() {
        let p: *mut u8 = byte;
        // SAFETY: `p` is derived from a live, exclusive reference to an element of `target`, so it is valid for
        // reads and writes, properly aligned and not aliased for the duration of this block.
        unsafe {
            let current = ptr::read_volatile(p);
            ptr::write_volatile(p, current & keep_mask);
        }
    }
    compiler_fence(Ordering::SeqCst);
}

/// An owned byte buffer holding secret material. The contents are wiped when the buffer is dropped and never appear
/// in `Debug` output.
#[derive(Clone, Default)]
pub struct SecretBuffer(Zeroizing<Vec<u8>>);

impl SecretBuffer {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(Zeroizing::new(bytes))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Wipe the contents in place, keeping the length.
    pub fn wipe(&mut self) {
        zero_out(&mut self.0);
    }
}

impl From<Vec<u8>> for SecretBuffer {
    fn from(bytes: Vec<u8>) -> Self {
        Self::new(bytes)
    }
}

impl From<&[u8]> for SecretBuffer {
    fn from(bytes: &[u8]) -> Self {
        Self::new(bytes.to_vec())
    }
}

impl Deref for SecretBuffer {
    type Target = [u8];
    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl DerefMut for SecretBuffer {
    fn deref_mut(&mut self) -> &mut [u8] {
        &mut self.0
    }
}

impl AsRef<[u8]> for SecretBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.0
    }
}

impl PartialEq for SecretBuffer {
    fn eq(&self, other: &Self) -> bool {
        safe_compare(&self.0, &other.0)
    }
}

impl Eq for SecretBuffer {}

impl fmt::Debug for SecretBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SecretBuffer({} bytes, ***)", self.0.len())
    }
}
