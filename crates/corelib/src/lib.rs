//! BLAKE3 digests in multihash framing (`0x1e || 32 || digest`).
//!
//! Three ways to hash: one-shot over a complete buffer, one-shot into a
//! caller buffer at an offset, and incrementally through a
//! [`StreamingHasher`]. The async entry points wait on a once-only
//! activation gate; [`activate`] returns a [`SyncHasher`] whose calls never
//! wait.

pub mod config;
pub mod engine;
pub mod errors;
pub mod facade;
pub mod gate;
pub mod multihash;
pub mod oneshot;
pub mod stream;

pub use config::Config;
pub use engine::{Engine, NativeEngine};
pub use errors::{ActivationError, DigestError, HashError};
pub use facade::{
    activate, activate_blocking, digest, digest_into, is_active, stream, Multihasher, SyncHasher,
};
pub use gate::ActivationGate;
pub use multihash::{Digest, CODE, MULTIHASH_LEN, NAME, SIZE};
pub use stream::StreamingHasher;

/// Version helper for CLI
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
