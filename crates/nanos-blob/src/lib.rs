//! # Nanos Blob
//!
//! Exposes a readable byte stream of known size as a [`Blob`]. Services use
//! it to hand binary payloads to a transport without buffering them whole.
//!
//! Reads are sequential: each `read` must start where the previous one
//! stopped.

use std::io::{self, Read, Write};

use thiserror::Error;
use tracing::trace;

/// Chunk size used when copying from the source stream.
pub const BUFFER_SIZE: usize = 4096;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("offset {offset} does not match stream position {position}")]
    OffsetMismatch { offset: u64, position: u64 },

    #[error("blob i/o failed: {0}")]
    Io(#[from] io::Error),
}

/// A sized, readable resource.
pub trait Blob {
    /// Declared size in bytes.
    fn size(&self) -> u64;

    /// Copy up to `length` bytes starting at `offset` into `sink`.
    ///
    /// Returns the number of bytes written. On error the position still
    /// reflects every byte already taken from the source.
    fn read(&mut self, sink: &mut dyn Write, offset: u64, length: u64) -> Result<u64, BlobError>;
}

/// [`Blob`] over any [`Read`] implementation.
///
/// Dropping the blob drops, and thereby closes, the underlying reader.
#[derive(Debug)]
pub struct InputStreamBlob<R> {
    inner: R,
    size: u64,
    position: u64,
}

impl<R: Read> InputStreamBlob<R> {
    pub fn new(inner: R, size: u64) -> Self {
        Self {
            inner,
            size,
            position: 0,
        }
    }

    /// Bytes consumed so far.
    pub fn position(&self) -> u64 {
        self.position
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: Read> Blob for InputStreamBlob<R> {
    fn size(&self) -> u64 {
        self.size
    }

    fn read(&mut self, sink: &mut dyn Write, offset: u64, length: u64) -> Result<u64, BlobError> {
        if offset != self.position {
            return Err(BlobError::OffsetMismatch {
                offset,
                position: self.position,
            });
        }

        let mut buffer = [0u8; BUFFER_SIZE];
        let mut copied = 0u64;
        while copied < length {
            // Never pull more than remains of the requested window.
            let want = (length - copied).min(BUFFER_SIZE as u64) as usize;
            let n = match self.inner.read(&mut buffer[..want]) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };
            self.position += n as u64;
            copied += n as u64;
            sink.write_all(&buffer[..n])?;
        }

        trace!(copied, position = self.position, "blob read");
        Ok(copied)
    }
}
