//! Incremental hashing over chunks.
//!
//! Lifecycle: `Created -> (write | reset | digest)* -> Disposed`. Disposal is
//! terminal: every later call returns [`HashError::Disposed`]. `digest` is a
//! checkpoint, not a finalization; later writes extend the same stream.

use std::fmt;
use std::io::{self, Read};
use std::sync::Arc;

use tracing::trace;

use crate::engine::{Engine, NativeEngine};
use crate::errors::HashError;
use crate::multihash::{frame_into, Digest, CODE, NAME, SIZE};

/// Streaming BLAKE3 multihasher owning one engine handle.
pub struct StreamingHasher<E: Engine = NativeEngine> {
    engine: Arc<E>,
    // `None` once disposed.
    handle: Option<E::Handle>,
}

impl<E: Engine> StreamingHasher<E> {
    pub fn new(engine: Arc<E>) -> Self {
        let handle = engine.create();
        trace!(engine = E::ID, "streaming hasher created");
        Self {
            engine,
            handle: Some(handle),
        }
    }

    pub fn code(&self) -> u8 {
        CODE
    }

    pub fn size(&self) -> usize {
        SIZE
    }

    pub fn name(&self) -> &'static str {
        NAME
    }

    pub fn is_disposed(&self) -> bool {
        self.handle.is_none()
    }

    fn handle(&self) -> Result<&E::Handle, HashError> {
        self.handle.as_ref().ok_or(HashError::Disposed)
    }

    /// Append `input` to the stream. Empty chunks are accepted.
    pub fn write(&mut self, input: &[u8]) -> Result<&mut Self, HashError> {
        let handle = self.handle.as_mut().ok_or(HashError::Disposed)?;
        self.engine.write(handle, input);
        Ok(self)
    }

    /// Bytes written since creation or the last reset.
    pub fn count(&self) -> Result<u64, HashError> {
        Ok(self.engine.count(self.handle()?))
    }

    /// Framed digest of everything written so far. Does not consume the stream.
    pub fn digest(&self) -> Result<Digest, HashError> {
        let handle = self.handle()?;
        Ok(Digest::with_fill(|raw| {
            self.engine.read_hash_into(handle, raw)
        }))
    }

    /// Write the current digest into `output[offset..]`.
    pub fn digest_into(
        &mut self,
        output: &mut [u8],
        offset: usize,
        as_multihash: bool,
    ) -> Result<&mut Self, HashError> {
        let handle = self.handle()?;
        frame_into(output, offset, as_multihash, |raw| {
            self.engine.read_hash_into(handle, raw)
        })?;
        Ok(self)
    }

    /// Back to the empty-input state. The handle stays valid.
    pub fn reset(&mut self) -> Result<&mut Self, HashError> {
        let handle = self.handle.as_mut().ok_or(HashError::Disposed)?;
        self.engine.reset(handle);
        trace!(engine = E::ID, "streaming hasher reset");
        Ok(self)
    }

    /// Release the engine handle. A second call is a no-op.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.handle.take() {
            self.engine.free(handle);
            trace!(engine = E::ID, "streaming hasher disposed");
        }
    }

    /// Feed `reader` into the stream `chunk_size` bytes at a time until EOF.
    /// Returns the number of bytes read.
    pub fn write_reader<R: Read>(&mut self, mut reader: R, chunk_size: usize) -> io::Result<u64> {
        let mut buf = vec![0u8; chunk_size.max(1)];
        let mut total = 0u64;
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => return Ok(total),
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            };
            self.write(&buf[..n]).map_err(io::Error::other)?;
            total += n as u64;
        }
    }
}

impl<E: Engine> Drop for StreamingHasher<E> {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            trace!(engine = E::ID, "streaming hasher dropped without dispose");
            self.engine.free(handle);
        }
    }
}

impl<E: Engine> io::Write for StreamingHasher<E> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        StreamingHasher::write(self, buf).map_err(io::Error::other)?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        self.handle().map_err(io::Error::other)?;
        Ok(())
    }
}

impl<E: Engine> fmt::Debug for StreamingHasher<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StreamingHasher")
            .field("engine", &E::ID)
            .field("count", &self.count().ok())
            .field("disposed", &self.is_disposed())
            .finish()
    }
}
