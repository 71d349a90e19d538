// src/tape.rs

//! Checkpoint tape for recording and restoring stage positions.
//!
//! A [`Tape`] is an ordered sequence of typed slots plus a read cursor.
//! Stages append their resumable state in a fixed, deterministic order
//! (outermost stage first, then its children), and read it back in exactly
//! the same order. The tape is positional: slots are never looked up by
//! name, and a nested stage tree relies on write/read symmetry to stay
//! aligned.
//!
//! Slots are serde-serializable so an external layer can persist a recorded
//! tape; this module defines only the in-memory slot order, not any on-disk
//! byte layout.

use serde::{Deserialize, Serialize};

use crate::error::{PipelineError, Result};

/// A single typed entry on a checkpoint tape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Slot {
    U64(u64),
    Bool(bool),
    Str(String),
    Bytes(Vec<u8>),
}

impl Slot {
    /// Name of this slot's type, for diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Slot::U64(_) => "u64",
            Slot::Bool(_) => "bool",
            Slot::Str(_) => "str",
            Slot::Bytes(_) => "bytes",
        }
    }
}

/// An ordered recording medium for stage positions.
///
/// Writing appends slots; reading consumes them front to back through an
/// internal cursor. Each `read_*` method takes a `strict` flag:
///
/// * `strict == true`: a missing or type-mismatched slot is a
///   [`PipelineError::Checkpoint`].
/// * `strict == false`: a missing or mismatched slot yields `Ok(None)` and
///   the caller falls back to its freshly-constructed default. A mismatched
///   slot is not consumed, so later reads stay aligned where possible.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Tape {
    slots: Vec<Slot>,
    #[serde(skip)]
    cursor: usize,
}

impl Tape {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a tape from slots produced elsewhere (e.g. a deserialized
    /// checkpoint), with the cursor at the front.
    pub fn from_slots(slots: Vec<Slot>) -> Self {
        Self { slots, cursor: 0 }
    }

    /// All recorded slots, in write order.
    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Number of slots not yet consumed by reads.
    pub fn remaining(&self) -> usize {
        self.slots.len() - self.cursor
    }

    /// Moves the read cursor back to the front of the tape.
    pub fn reset_cursor(&mut self) {
        self.cursor = 0;
    }

    /// Fails if any slot is left unread.
    ///
    /// Called by the consumer after reloading the outermost stage: leftover
    /// slots mean the tape was recorded by a differently shaped pipeline.
    pub fn expect_end(&self) -> Result<()> {
        if self.cursor == self.slots.len() {
            Ok(())
        } else {
            Err(PipelineError::checkpoint(format!(
                "{} unread slot(s) remain after reload",
                self.remaining()
            )))
        }
    }

    pub fn record_u64(&mut self, value: u64) {
        self.slots.push(Slot::U64(value));
    }

    pub fn record_bool(&mut self, value: bool) {
        self.slots.push(Slot::Bool(value));
    }

    pub fn record_str(&mut self, value: impl Into<String>) {
        self.slots.push(Slot::Str(value.into()));
    }

    pub fn record_bytes(&mut self, value: impl Into<Vec<u8>>) {
        self.slots.push(Slot::Bytes(value.into()));
    }

    pub fn read_u64(&mut self, strict: bool) -> Result<Option<u64>> {
        match self.slots.get(self.cursor) {
            Some(Slot::U64(value)) => {
                let value = *value;
                self.cursor += 1;
                Ok(Some(value))
            }
            Some(other) => self.mismatch("u64", other.kind(), strict),
            None => self.exhausted("u64", strict),
        }
    }

    pub fn read_bool(&mut self, strict: bool) -> Result<Option<bool>> {
        match self.slots.get(self.cursor) {
            Some(Slot::Bool(value)) => {
                let value = *value;
                self.cursor += 1;
                Ok(Some(value))
            }
            Some(other) => self.mismatch("bool", other.kind(), strict),
            None => self.exhausted("bool", strict),
        }
    }

    pub fn read_str(&mut self, strict: bool) -> Result<Option<String>> {
        match self.slots.get(self.cursor) {
            Some(Slot::Str(value)) => {
                let value = value.clone();
                self.cursor += 1;
                Ok(Some(value))
            }
            Some(other) => self.mismatch("str", other.kind(), strict),
            None => self.exhausted("str", strict),
        }
    }

    pub fn read_bytes(&mut self, strict: bool) -> Result<Option<Vec<u8>>> {
        match self.slots.get(self.cursor) {
            Some(Slot::Bytes(value)) => {
                let value = value.clone();
                self.cursor += 1;
                Ok(Some(value))
            }
            Some(other) => self.mismatch("bytes", other.kind(), strict),
            None => self.exhausted("bytes", strict),
        }
    }

    fn mismatch<T>(&self, expected: &str, found: &str, strict: bool) -> Result<Option<T>> {
        if strict {
            Err(PipelineError::checkpoint(format!(
                "expected {} slot at position {}, found {}",
                expected, self.cursor, found
            )))
        } else {
            tracing::debug!(
                "expected {} slot at position {}, found {}; using default state",
                expected,
                self.cursor,
                found
            );
            Ok(None)
        }
    }

    fn exhausted<T>(&self, expected: &str, strict: bool) -> Result<Option<T>> {
        if strict {
            Err(PipelineError::checkpoint(format!(
                "tape exhausted, expected {} slot at position {}",
                expected, self.cursor
            )))
        } else {
            Ok(None)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_symmetry() {
        let mut tape = Tape::new();
        tape.record_u64(42);
        tape.record_bool(true);
        tape.record_str("offset");
        tape.record_bytes(vec![1, 2, 3]);

        assert_eq!(tape.len(), 4);
        assert_eq!(tape.read_u64(true).unwrap(), Some(42));
        assert_eq!(tape.read_bool(true).unwrap(), Some(true));
        assert_eq!(tape.read_str(true).unwrap(), Some("offset".to_string()));
        assert_eq!(tape.read_bytes(true).unwrap(), Some(vec![1, 2, 3]));
        assert!(tape.expect_end().is_ok());
    }

    #[test]
    fn test_strict_exhausted() {
        let mut tape = Tape::new();
        tape.record_u64(1);

        assert_eq!(tape.read_u64(true).unwrap(), Some(1));
        let err = tape.read_u64(true).unwrap_err();
        assert!(matches!(err, PipelineError::Checkpoint { .. }));
    }

    #[test]
    fn test_strict_type_mismatch() {
        let mut tape = Tape::new();
        tape.record_bool(false);

        let err = tape.read_u64(true).unwrap_err();
        assert!(matches!(err, PipelineError::Checkpoint { .. }));
    }

    #[test]
    fn test_lenient_defaults_and_alignment() {
        let mut tape = Tape::new();
        tape.record_bool(true);

        // Mismatched read yields None without consuming the slot.
        assert_eq!(tape.read_u64(false).unwrap(), None);
        assert_eq!(tape.remaining(), 1);

        // The bool is still readable afterwards.
        assert_eq!(tape.read_bool(false).unwrap(), Some(true));

        // Reads past the end are None, never errors.
        assert_eq!(tape.read_u64(false).unwrap(), None);
    }

    #[test]
    fn test_expect_end_with_leftover_slots() {
        let mut tape = Tape::new();
        tape.record_u64(1);
        tape.record_u64(2);

        tape.read_u64(true).unwrap();
        let err = tape.expect_end().unwrap_err();
        assert!(matches!(err, PipelineError::Checkpoint { .. }));
    }

    #[test]
    fn test_reset_cursor() {
        let mut tape = Tape::new();
        tape.record_u64(7);

        assert_eq!(tape.read_u64(true).unwrap(), Some(7));
        tape.reset_cursor();
        assert_eq!(tape.read_u64(true).unwrap(), Some(7));
    }

    #[test]
    fn test_tape_serialization() {
        let mut tape = Tape::new();
        tape.record_u64(3);
        tape.record_bool(true);
        tape.record_str("pos");

        // Serialize with bincode, as an external persistence layer would.
        let encoded = bincode::serialize(&tape).unwrap();
        let mut decoded: Tape = bincode::deserialize(&encoded).unwrap();

        assert_eq!(decoded.slots(), tape.slots());
        assert_eq!(decoded.read_u64(true).unwrap(), Some(3));
        assert_eq!(decoded.read_bool(true).unwrap(), Some(true));
        assert_eq!(decoded.read_str(true).unwrap(), Some("pos".to_string()));
    }
}
