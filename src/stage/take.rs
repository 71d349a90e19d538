// src/stage/take.rs

use crate::error::{PipelineError, Result};
use crate::tape::Tape;

use super::traits::{BoxedStage, Stage, Value};

/// A stage that yields at most `count` values from its inner stage.
///
/// Exhausts when the cap is reached or when the inner stage runs out,
/// whichever comes first. Useful for bounding an otherwise infinite
/// pipeline, e.g. a repeat stage with no pass limit.
pub struct TakeStage {
    inner: BoxedStage,
    count: u64,
    taken: u64,
}

impl std::fmt::Debug for TakeStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TakeStage")
            .field("count", &self.count)
            .field("taken", &self.taken)
            .finish_non_exhaustive()
    }
}

impl TakeStage {
    /// A cap of zero is rejected at construction.
    pub fn new(inner: BoxedStage, count: u64) -> Result<Self> {
        if count == 0 {
            return Err(PipelineError::config("take count must be at least 1"));
        }

        Ok(Self {
            inner,
            count,
            taken: 0,
        })
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

impl Stage for TakeStage {
    fn next(&mut self) -> Result<Option<Value>> {
        if self.taken == self.count {
            return Ok(None);
        }

        match self.inner.next()? {
            Some(value) => {
                self.taken += 1;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.taken = 0;

        self.inner.reset()
    }

    fn record_position(&self, tape: &mut Tape, strict: bool) -> Result<()> {
        tape.record_u64(self.taken);

        self.inner.record_position(tape, strict)
    }

    fn reload_position(&mut self, tape: &mut Tape, strict: bool) -> Result<()> {
        let taken = tape.read_u64(strict)?;

        self.inner.reload_position(tape, strict)?;

        self.taken = taken.unwrap_or(0).min(self.count);

        Ok(())
    }

    fn is_infinite(&self) -> bool {
        false
    }
}
