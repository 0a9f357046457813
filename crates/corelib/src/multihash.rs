//! Multihash framing for BLAKE3 digests.
//!
//! Layout (bytes):
//! 0      algorithm code (0x1e)
//! 1      digest length (32)
//! 2..34  raw BLAKE3 output
//!
//! Both header fields are varints in general multihash; here each fits in a
//! single byte, so the framing is fixed-width.

use std::fmt;

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{DigestError, HashError};

/// Multicodec code for BLAKE3.
pub const CODE: u8 = 0x1e;
/// Raw digest length in bytes.
pub const SIZE: usize = 32;
pub const NAME: &str = "blake3";
pub const PREFIX_LEN: usize = 2;
/// Length of a framed digest (`code || size || digest`).
pub const MULTIHASH_LEN: usize = PREFIX_LEN + SIZE;

/// An immutable, framed BLAKE3 multihash.
///
/// The raw digest returned by [`Digest::digest`] borrows the tail of the
/// framed buffer rather than copying it. The buffer is owned and never
/// mutated after construction, so the view stays consistent with
/// [`Digest::bytes`].
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Digest {
    bytes: [u8; MULTIHASH_LEN],
}

impl Digest {
    /// Build a digest by letting `fill` write the raw hash behind the prefix.
    pub(crate) fn with_fill(fill: impl FnOnce(&mut [u8])) -> Self {
        let mut bytes = [0u8; MULTIHASH_LEN];
        bytes[0] = CODE;
        bytes[1] = SIZE as u8;
        fill(&mut bytes[PREFIX_LEN..]);
        Self { bytes }
    }

    /// Frame an existing raw BLAKE3 output.
    pub fn from_raw(raw: &[u8; SIZE]) -> Self {
        Self::with_fill(|out| out.copy_from_slice(raw))
    }

    /// Parse a framed multihash, checking length, code and size.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, DigestError> {
        let framed: [u8; MULTIHASH_LEN] =
            bytes.try_into().map_err(|_| DigestError::Length {
                expected: MULTIHASH_LEN,
                actual: bytes.len(),
            })?;
        if framed[0] != CODE {
            return Err(DigestError::Code(framed[0]));
        }
        if usize::from(framed[1]) != SIZE {
            return Err(DigestError::Size(framed[1]));
        }
        Ok(Self { bytes: framed })
    }

    pub fn code(&self) -> u8 {
        self.bytes[0]
    }

    pub fn size(&self) -> u8 {
        self.bytes[1]
    }

    /// The full frame: prefix followed by the raw digest.
    pub fn bytes(&self) -> &[u8; MULTIHASH_LEN] {
        &self.bytes
    }

    /// The raw digest, i.e. `bytes()[2..]`.
    pub fn digest(&self) -> &[u8] {
        &self.bytes[PREFIX_LEN..]
    }

    pub fn to_vec(&self) -> Vec<u8> {
        self.bytes.to_vec()
    }
}

impl AsRef<[u8]> for Digest {
    fn as_ref(&self) -> &[u8] {
        &self.bytes
    }
}

impl TryFrom<&[u8]> for Digest {
    type Error = DigestError;

    fn try_from(bytes: &[u8]) -> Result<Self, Self::Error> {
        Self::from_bytes(bytes)
    }
}

impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.bytes {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

impl fmt::Debug for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Digest({self})")
    }
}

impl Serialize for Digest {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.bytes)
    }
}

impl<'de> Deserialize<'de> for Digest {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Vec::<u8>::deserialize(deserializer)?;
        Digest::from_bytes(&raw).map_err(D::Error::custom)
    }
}

/// Number of bytes a `digest_into` call writes.
pub const fn output_len(as_multihash: bool) -> usize {
    if as_multihash {
        MULTIHASH_LEN
    } else {
        SIZE
    }
}

/// Write a digest into `output[offset..]`.
///
/// With `as_multihash` the code and size bytes are written first and `fill`
/// receives the following `SIZE` bytes; otherwise `fill` receives
/// `output[offset..offset + SIZE]` directly. Bounds are checked before any
/// byte is written.
pub fn frame_into(
    output: &mut [u8],
    offset: usize,
    as_multihash: bool,
    fill: impl FnOnce(&mut [u8]),
) -> Result<(), HashError> {
    let required = output_len(as_multihash);
    let capacity = output.len();
    let end = offset
        .checked_add(required)
        .filter(|end| *end <= capacity)
        .ok_or(HashError::BufferTooSmall {
            offset,
            required,
            capacity,
        })?;

    let target = &mut output[offset..end];
    let raw = if as_multihash {
        target[0] = CODE;
        target[1] = SIZE as u8;
        &mut target[PREFIX_LEN..]
    } else {
        target
    };
    fill(raw);
    Ok(())
}
