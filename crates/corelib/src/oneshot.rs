//! One-shot digests over a complete input.

use crate::engine::Engine;
use crate::errors::HashError;
use crate::multihash::{frame_into, Digest};

/// Framed digest of `input`.
pub fn digest<E: Engine>(engine: &E, input: &[u8]) -> Digest {
    Digest::with_fill(|raw| engine.hash_into(input, raw))
}

/// Hash `input` into `output[offset..]`, with or without the multihash prefix.
pub fn digest_into<E: Engine>(
    engine: &E,
    input: &[u8],
    output: &mut [u8],
    offset: usize,
    as_multihash: bool,
) -> Result<(), HashError> {
    frame_into(output, offset, as_multihash, |raw| engine.hash_into(input, raw))
}
