//! Per-call encode and decode settings.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Largest value a 4-byte compact integer can hold.  Used as the default
/// container bound, since lengths are compact-encoded.
pub const DEFAULT_MAX_CONTAINER_LEN: usize = 0x3fff_ffff;

/// Config for encoding and decoding values.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CodecConfig {
    /// Fail if a top-level decode leaves unread bytes.
    reject_trailing: bool,

    /// Longest string (in bytes) or array (in elements) accepted.
    max_container_len: usize,

    /// Overrides the static size hint when sizing encode buffers.
    initial_capacity: Option<usize>,
}

impl CodecConfig {
    /// Constructs the default config.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets whether trailing bytes are rejected.
    pub fn with_reject_trailing(mut self, reject: bool) -> Self {
        self.reject_trailing = reject;
        self
    }

    /// Sets the container length bound.
    pub fn with_max_container_len(mut self, max: usize) -> Self {
        self.max_container_len = max;
        self
    }

    /// Sets the initial encode buffer capacity.
    pub fn with_initial_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = Some(capacity);
        self
    }

    /// Gets whether trailing bytes are rejected.
    pub fn reject_trailing(&self) -> bool {
        self.reject_trailing
    }

    /// Gets the container length bound.
    pub fn max_container_len(&self) -> usize {
        self.max_container_len
    }

    /// Gets the initial encode buffer capacity, if overridden.
    pub fn initial_capacity(&self) -> Option<usize> {
        self.initial_capacity
    }
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            reject_trailing: true,
            max_container_len: DEFAULT_MAX_CONTAINER_LEN,
            initial_capacity: None,
        }
    }
}
