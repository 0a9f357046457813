//! Public hashing surface.
//!
//! Two families share one activation gate:
//! - async-gated: [`digest`], [`digest_into`], [`stream`] await activation
//!   on first use and complete immediately afterwards;
//! - pre-activated: [`activate`] returns a [`SyncHasher`] whose calls never
//!   wait.

use std::fmt;
use std::io::Read;
use std::sync::Arc;

use once_cell::sync::Lazy;

use crate::config::Config;
use crate::engine::{Engine, NativeEngine};
use crate::errors::{ActivationError, HashError};
use crate::gate::ActivationGate;
use crate::multihash::{Digest, CODE, NAME, SIZE};
use crate::oneshot;
use crate::stream::StreamingHasher;

static NATIVE: Lazy<Multihasher<NativeEngine>> = Lazy::new(Multihasher::native);

/// Hashing entry points bound to one engine and its activation gate.
pub struct Multihasher<E: Engine> {
    gate: ActivationGate<E>,
}

impl Multihasher<NativeEngine> {
    pub fn native() -> Self {
        Self::new(ActivationGate::new(NativeEngine::activate))
    }
}

impl<E: Engine> Multihasher<E> {
    pub fn new(gate: ActivationGate<E>) -> Self {
        Self { gate }
    }

    pub fn gate(&self) -> &ActivationGate<E> {
        &self.gate
    }

    pub async fn digest(&self, input: &[u8]) -> Result<Digest, ActivationError> {
        let engine = self.gate.ensure_ready().await?;
        Ok(oneshot::digest(&*engine, input))
    }

    pub async fn digest_into(
        &self,
        input: &[u8],
        output: &mut [u8],
        offset: usize,
        as_multihash: bool,
    ) -> Result<(), HashError> {
        let engine = self.gate.ensure_ready().await?;
        oneshot::digest_into(&*engine, input, output, offset, as_multihash)
    }

    pub async fn stream(&self) -> Result<StreamingHasher<E>, ActivationError> {
        let engine = self.gate.ensure_ready().await?;
        Ok(StreamingHasher::new(engine))
    }

    /// Wait for activation and hand back the synchronous bundle.
    pub async fn activate(&self) -> Result<SyncHasher<E>, ActivationError> {
        let engine = self.gate.ensure_ready().await?;
        Ok(SyncHasher { engine })
    }

    pub fn activate_blocking(&self) -> Result<SyncHasher<E>, ActivationError> {
        let engine = self.gate.ensure_ready_blocking()?;
        Ok(SyncHasher { engine })
    }
}

/// Pre-activated hasher. Holding one proves the engine is ready.
pub struct SyncHasher<E: Engine = NativeEngine> {
    engine: Arc<E>,
}

impl<E: Engine> Clone for SyncHasher<E> {
    fn clone(&self) -> Self {
        Self {
            engine: Arc::clone(&self.engine),
        }
    }
}

impl<E: Engine> fmt::Debug for SyncHasher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncHasher")
            .field("engine", &E::ID)
            .field("name", &NAME)
            .finish()
    }
}

impl<E: Engine> SyncHasher<E> {
    pub fn code(&self) -> u8 {
        CODE
    }

    pub fn size(&self) -> usize {
        SIZE
    }

    pub fn name(&self) -> &'static str {
        NAME
    }

    pub fn digest(&self, input: &[u8]) -> Digest {
        oneshot::digest(&*self.engine, input)
    }

    pub fn digest_into(
        &self,
        input: &[u8],
        output: &mut [u8],
        offset: usize,
        as_multihash: bool,
    ) -> Result<(), HashError> {
        oneshot::digest_into(&*self.engine, input, output, offset, as_multihash)
    }

    pub fn stream(&self) -> StreamingHasher<E> {
        StreamingHasher::new(Arc::clone(&self.engine))
    }

    /// Stream `reader` to EOF using `config.read_chunk_size` reads.
    /// Returns the digest and the number of bytes hashed.
    pub fn digest_reader<R: Read>(
        &self,
        reader: R,
        config: &Config,
    ) -> std::io::Result<(Digest, u64)> {
        let mut hasher = self.stream();
        let n = hasher.write_reader(reader, config.read_chunk_size)?;
        let digest = hasher.digest().map_err(std::io::Error::other)?;
        hasher.dispose();
        Ok((digest, n))
    }
}

/// Framed digest of `input`, activating the native engine on first use.
pub async fn digest(input: &[u8]) -> Result<Digest, ActivationError> {
    NATIVE.digest(input).await
}

pub async fn digest_into(
    input: &[u8],
    output: &mut [u8],
    offset: usize,
    as_multihash: bool,
) -> Result<(), HashError> {
    NATIVE.digest_into(input, output, offset, as_multihash).await
}

pub async fn stream() -> Result<StreamingHasher, ActivationError> {
    NATIVE.stream().await
}

pub async fn activate() -> Result<SyncHasher, ActivationError> {
    NATIVE.activate().await
}

pub fn activate_blocking() -> Result<SyncHasher, ActivationError> {
    NATIVE.activate_blocking()
}

/// Whether the process-wide native engine has been activated.
pub fn is_active() -> bool {
    NATIVE.gate().is_ready()
}
