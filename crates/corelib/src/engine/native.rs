//! BLAKE3 implementation of [`Engine`] on top of the `blake3` crate.

use crate::engine::Engine;
use crate::errors::ActivationError;

/// In-process BLAKE3 engine.
///
/// A value of this type only comes out of [`NativeEngine::activate`], so
/// holding one means activation has completed.
///
/// ```compile_fail
/// let engine = b3mh_corelib::NativeEngine { _activated: () };
/// ```
#[derive(Debug)]
pub struct NativeEngine {
    _activated: (),
}

/// Opaque incremental state. Deliberately not `Clone`.
pub struct NativeStream {
    inner: blake3::Hasher,
}

impl NativeEngine {
    /// One-time setup. Nothing to load for the in-process engine, but it is
    /// still routed through the activation gate like any other engine.
    pub async fn activate() -> Result<Self, ActivationError> {
        Ok(Self::new())
    }

    pub(crate) fn new() -> Self {
        Self { _activated: () }
    }
}

impl Engine for NativeEngine {
    type Handle = NativeStream;

    const ID: &'static str = "blake3-native";

    fn create(&self) -> NativeStream {
        NativeStream {
            inner: blake3::Hasher::new(),
        }
    }

    fn write(&self, handle: &mut NativeStream, input: &[u8]) {
        handle.inner.update(input);
    }

    fn read_hash_into(&self, handle: &NativeStream, target: &mut [u8]) {
        // finalize_xof takes &self, so the stream keeps accepting input.
        handle.inner.finalize_xof().fill(target);
    }

    fn count(&self, handle: &NativeStream) -> u64 {
        handle.inner.count()
    }

    fn reset(&self, handle: &mut NativeStream) {
        handle.inner.reset();
    }

    fn hash_into(&self, input: &[u8], output: &mut [u8]) {
        let mut hasher = blake3::Hasher::new();
        #[cfg(feature = "parallel")]
        hasher.update_rayon(input);
        #[cfg(not(feature = "parallel"))]
        hasher.update(input);
        hasher.finalize_xof().fill(output);
    }
}
