//! Growable write buffer with a reservation stack.

use std::ops::{Deref, DerefMut};

use tracing::trace;

use crate::config::{CodecConfig, DEFAULT_MAX_CONTAINER_LEN};

/// A reserved span ahead of the cursor.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
struct Alloc {
    /// Cursor position when the span was reserved.
    start: usize,

    /// Number of bytes that must be written before the pop.
    len: usize,

    /// Buffer length before the reservation.
    prior_len: usize,
}

/// Write cursor for encoding.
///
/// Writes land at the cursor, which only moves forward.  Bytes before the
/// cursor can be patched in place, which is how length prefixes are filled in
/// once the payload size is known.
#[derive(Debug)]
pub struct EncodeBuffer {
    buf: Vec<u8>,
    at: usize,
    allocs: Vec<Alloc>,
    max_container_len: usize,
}

impl EncodeBuffer {
    /// Constructs an empty buffer.
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Constructs an empty buffer with preallocated space.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: Vec::with_capacity(capacity),
            at: 0,
            allocs: Vec::new(),
            max_container_len: DEFAULT_MAX_CONTAINER_LEN,
        }
    }

    /// Constructs a buffer sized from a static size hint, unless the config
    /// overrides it.
    pub fn with_config(size_hint: usize, config: &CodecConfig) -> Self {
        let mut this = Self::with_capacity(config.initial_capacity().unwrap_or(size_hint));
        this.max_container_len = config.max_container_len();
        this
    }

    /// Returns the cursor position, which is also the number of bytes written.
    pub fn position(&self) -> usize {
        self.at
    }

    /// Returns the container bound in effect.
    pub fn max_container_len(&self) -> usize {
        self.max_container_len
    }

    /// Returns the number of open reservations.
    pub fn reservation_depth(&self) -> usize {
        self.allocs.len()
    }

    /// Writes a single byte at the cursor.
    pub fn write_u8(&mut self, b: u8) {
        self.insert_array(&[b]);
    }

    /// Writes raw bytes at the cursor, growing the buffer as needed.
    pub fn insert_array(&mut self, bytes: &[u8]) {
        let end = self.at + bytes.len();
        if end > self.buf.len() {
            self.buf.resize(end, 0);
        }
        self.buf[self.at..end].copy_from_slice(bytes);
        self.at = end;
    }

    /// Overwrites already-written bytes.
    ///
    /// # Panics
    ///
    /// If the span reaches past the cursor.
    pub fn patch(&mut self, offset: usize, bytes: &[u8]) {
        let end = offset + bytes.len();
        assert!(end <= self.at, "buf_encoder: patch past cursor");
        self.buf[offset..end].copy_from_slice(bytes);
    }

    /// Reserves `n` bytes ahead of the cursor.  They must all be written
    /// before the matching [`Self::pop_alloc`].
    ///
    /// Prefer [`Self::reserve`], which pops on every exit path.
    pub fn push_alloc(&mut self, n: usize) {
        trace!(n, depth = self.allocs.len(), "reserving encode buffer span");
        self.allocs.push(Alloc {
            start: self.at,
            len: n,
            prior_len: self.buf.len(),
        });
        self.buf.reserve(n);
    }

    /// Closes the innermost reservation.
    ///
    /// # Panics
    ///
    /// If there's no open reservation or it wasn't filled.  Both are bugs in
    /// the calling codec, not bad input.
    pub fn pop_alloc(&mut self) {
        let alloc = self
            .allocs
            .pop()
            .expect("buf_encoder: pop without matching push");
        assert!(
            self.at >= alloc.start + alloc.len,
            "buf_encoder: reservation of {} bytes not filled",
            alloc.len
        );
    }

    /// Drops the innermost reservation after a failure, discarding anything
    /// written into it.
    fn abandon_alloc(&mut self) {
        if let Some(alloc) = self.allocs.pop() {
            self.buf.truncate(alloc.prior_len);
            self.at = alloc.start;
        }
    }

    /// Opens a reservation scoped to the returned guard.
    pub fn reserve(&mut self, n: usize) -> Reservation<'_> {
        self.push_alloc(n);
        Reservation {
            buf: self,
            done: false,
        }
    }

    /// Finishes encoding, returning the written bytes.
    ///
    /// # Panics
    ///
    /// If a reservation is still open.
    pub fn into_vec(mut self) -> Vec<u8> {
        assert!(
            self.allocs.is_empty(),
            "buf_encoder: unclosed reservation"
        );
        self.buf.truncate(self.at);
        self.buf
    }
}

impl Default for EncodeBuffer {
    fn default() -> Self {
        Self::new()
    }
}

/// Scope guard for a reservation.
///
/// Derefs to the buffer so the reserved bytes can be written through it.
/// [`Reservation::finish`] checks the span was filled; dropping the guard
/// without finishing (on an error path) unwinds the reservation instead.
#[derive(Debug)]
pub struct Reservation<'a> {
    buf: &'a mut EncodeBuffer,
    done: bool,
}

impl Reservation<'_> {
    /// Closes the reservation.
    ///
    /// # Panics
    ///
    /// If the reserved span wasn't completely written.
    pub fn finish(mut self) {
        self.done = true;
        self.buf.pop_alloc();
    }
}

impl Deref for Reservation<'_> {
    type Target = EncodeBuffer;

    fn deref(&self) -> &Self::Target {
        self.buf
    }
}

impl DerefMut for Reservation<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.buf
    }
}

impl Drop for Reservation<'_> {
    fn drop(&mut self) {
        if !self.done {
            self.buf.abandon_alloc();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_patch() {
        let mut buf = EncodeBuffer::with_capacity(2);
        buf.insert_array(&[0, 0, 0, 0]);
        buf.write_u8(9);
        buf.patch(0, &[1, 2]);
        assert_eq!(buf.position(), 5);
        assert_eq!(buf.into_vec(), vec![1, 2, 0, 0, 9]);
    }

    #[test]
    fn test_reservation_filled() {
        let mut buf = EncodeBuffer::new();
        buf.write_u8(0xaa);
        let mut res = buf.reserve(3);
        res.insert_array(&[1, 2, 3]);
        assert_eq!(res.reservation_depth(), 1);
        res.finish();
        assert_eq!(buf.reservation_depth(), 0);
        assert_eq!(buf.into_vec(), vec![0xaa, 1, 2, 3]);
    }

    #[test]
    fn test_nested_reservations() {
        let mut buf = EncodeBuffer::new();
        buf.push_alloc(2);
        buf.write_u8(1);
        buf.push_alloc(1);
        buf.write_u8(2);
        buf.pop_alloc();
        buf.pop_alloc();
        assert_eq!(buf.into_vec(), vec![1, 2]);
    }

    #[test]
    #[should_panic(expected = "not filled")]
    fn test_unfilled_reservation_panics() {
        let mut buf = EncodeBuffer::new();
        let mut res = buf.reserve(2);
        res.write_u8(1);
        res.finish();
    }

    #[test]
    fn test_dropped_reservation_unwinds() {
        let mut buf = EncodeBuffer::new();
        buf.write_u8(7);
        {
            let mut res = buf.reserve(4);
            res.write_u8(1);
        }
        assert_eq!(buf.reservation_depth(), 0);
        assert_eq!(buf.position(), 1);
        assert_eq!(buf.into_vec(), vec![7]);
    }
}
