//! Hash engine boundary.
//!
//! The engine owns the BLAKE3 compression state. Everything above it (gate,
//! framing, streaming lifecycle) treats it as a black box reached through
//! [`Engine`]. [`native::NativeEngine`] is the in-process implementation.

pub mod native;

pub use native::NativeEngine;

/// Incremental + one-shot hash primitive behind an opaque handle.
///
/// Output slices handed to [`Engine::read_hash_into`] and
/// [`Engine::hash_into`] are exactly the digest length; offset and bounds
/// handling belongs to the caller.
pub trait Engine: Send + Sync + Sized + 'static {
    /// Per-stream state. Owned by exactly one streaming hasher.
    type Handle: Send;

    /// Stable engine identifier, used in logs and activation errors.
    const ID: &'static str;

    /// Allocate a handle in the empty-input state.
    fn create(&self) -> Self::Handle;
    /// Absorb `input` into the handle's state.
    fn write(&self, handle: &mut Self::Handle, input: &[u8]);
    /// Write the hash of everything absorbed so far without finalizing.
    fn read_hash_into(&self, handle: &Self::Handle, target: &mut [u8]);
    /// Total bytes absorbed since creation or the last reset.
    fn count(&self, handle: &Self::Handle) -> u64;
    /// Return the handle to the empty-input state.
    fn reset(&self, handle: &mut Self::Handle);
    /// Release the handle. Called exactly once per handle.
    fn free(&self, handle: Self::Handle) {
        drop(handle);
    }
    /// Stateless hash of a complete input.
    fn hash_into(&self, input: &[u8], output: &mut [u8]);
}
