//! Bounds-checked cursor over a borrowed byte slice.

use crate::config::{CodecConfig, DEFAULT_MAX_CONTAINER_LEN};
use crate::errors::{DecodeError, DecodeReason};

/// Read cursor for decoding.
///
/// The cursor never moves past the end of the slice; any read that would is a
/// [`DecodeReason::OverrunInput`] error and leaves the cursor where it was.
#[derive(Debug)]
pub struct DecodeBuffer<'b> {
    buf: &'b [u8],
    at: usize,
    max_container_len: usize,
}

impl<'b> DecodeBuffer<'b> {
    /// Constructs a new instance by wrapping a buffer and starting at the
    /// beginning.
    pub fn new(buf: &'b [u8]) -> Self {
        Self {
            buf,
            at: 0,
            max_container_len: DEFAULT_MAX_CONTAINER_LEN,
        }
    }

    /// Constructs a new instance that enforces the config's container bound.
    pub fn with_config(buf: &'b [u8], config: &CodecConfig) -> Self {
        Self {
            buf,
            at: 0,
            max_container_len: config.max_container_len(),
        }
    }

    /// Returns the length of the underlying buffer.
    pub fn len(&self) -> usize {
        self.buf.len()
    }

    /// Returns if the underlying buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// Returns the cursor position.
    pub fn position(&self) -> usize {
        self.at
    }

    /// Returns the total number of remaining bytes that can be read.
    pub fn remaining(&self) -> usize {
        self.len() - self.at
    }

    /// Returns the container bound in effect.
    pub fn max_container_len(&self) -> usize {
        self.max_container_len
    }

    /// Builds an error at the current cursor position.
    pub fn error(&self, reason: DecodeReason) -> DecodeError {
        DecodeError::new(self.at, self.len(), reason)
    }

    fn ensure(&self, wanted: usize) -> Result<(), DecodeError> {
        if wanted > self.remaining() {
            return Err(self.error(DecodeReason::OverrunInput {
                wanted,
                remaining: self.remaining(),
            }));
        }
        Ok(())
    }

    /// Reads the next byte without consuming it.
    pub fn peek_u8(&self) -> Result<u8, DecodeError> {
        self.ensure(1)?;
        Ok(self.buf[self.at])
    }

    /// Reads a single byte.
    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let b = self.peek_u8()?;
        self.at += 1;
        Ok(b)
    }

    /// Reads a fixed size buf.  This does NOT include length tagging.
    pub fn read_arr<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        self.ensure(N)?;
        let mut arr = [0; N];
        arr.copy_from_slice(&self.buf[self.at..self.at + N]);
        self.at += N;
        Ok(arr)
    }

    /// Reads a variable-size slice, borrowing from the underlying buffer.
    pub fn read_slice(&mut self, n: usize) -> Result<&'b [u8], DecodeError> {
        self.ensure(n)?;
        let slice = &self.buf[self.at..self.at + n];
        self.at += n;
        Ok(slice)
    }

    /// Checks a declared container length against the configured bound.
    pub fn check_container_len(&self, len: u64) -> Result<usize, DecodeError> {
        match usize::try_from(len) {
            Ok(n) if n <= self.max_container_len => Ok(n),
            _ => Err(self.error(DecodeReason::OverflowContainer {
                len,
                max: self.max_container_len,
            })),
        }
    }

    /// Makes a new decoder over a sub-span, sharing our container bound.
    pub(crate) fn sub(&self, buf: &'b [u8]) -> Self {
        Self {
            buf,
            at: 0,
            max_container_len: self.max_container_len,
        }
    }
}
