// src/stage/repeat.rs

use crate::error::{PipelineError, Result};
use crate::tape::Tape;

use super::traits::{BoxedStage, Stage, Value};

/// A stage that re-iterates its inner stage a fixed or unbounded number of
/// times, concatenating the resulting streams.
///
/// When the inner stage exhausts, the combinator either terminates (bound
/// reached, or the inner stage turned out to be empty) or resets the inner
/// stage and starts the next pass. An inner stage that yields nothing on
/// its very first pass is never retried, so an empty source cannot cause
/// an unbounded empty-pass loop.
pub struct RepeatStage {
    inner: BoxedStage,
    num_repeats: Option<u64>,
    // True once the inner stage has yielded at least one value this
    // lifetime.
    has_data: bool,
    // Completed passes, 0-based. Never exceeds num_repeats when bounded.
    pass_nr: u64,
}

impl std::fmt::Debug for RepeatStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RepeatStage")
            .field("num_repeats", &self.num_repeats)
            .field("has_data", &self.has_data)
            .field("pass_nr", &self.pass_nr)
            .finish_non_exhaustive()
    }
}

impl RepeatStage {
    /// Wraps `inner` to repeat it `num_repeats` times, or forever when
    /// `num_repeats` is `None`.
    ///
    /// A bound of zero is rejected at construction.
    pub fn new(inner: BoxedStage, num_repeats: Option<u64>) -> Result<Self> {
        if num_repeats == Some(0) {
            return Err(PipelineError::config(
                "repeat count must be at least 1, or absent for unbounded repetition",
            ));
        }

        Ok(Self {
            inner,
            num_repeats,
            has_data: false,
            pass_nr: 0,
        })
    }

    pub fn num_repeats(&self) -> Option<u64> {
        self.num_repeats
    }

    /// Completed passes over the inner stage.
    pub fn pass_nr(&self) -> u64 {
        self.pass_nr
    }
}

impl Stage for RepeatStage {
    fn next(&mut self) -> Result<Option<Value>> {
        if let Some(num_repeats) = self.num_repeats {
            if self.pass_nr == num_repeats {
                return Ok(None);
            }
        }

        loop {
            if let Some(value) = self.inner.next()? {
                self.has_data = true;
                return Ok(Some(value));
            }

            // An inner stage that was empty on its first pass stays empty;
            // retrying it would loop forever.
            if !self.has_data {
                return Ok(None);
            }

            self.pass_nr += 1;

            if let Some(num_repeats) = self.num_repeats {
                if self.pass_nr == num_repeats {
                    return Ok(None);
                }
            }

            tracing::debug!("repeat stage starting pass {}", self.pass_nr);

            self.inner.reset()?;
        }
    }

    fn reset(&mut self) -> Result<()> {
        self.has_data = false;
        self.pass_nr = 0;

        self.inner.reset()
    }

    fn record_position(&self, tape: &mut Tape, strict: bool) -> Result<()> {
        tape.record_u64(self.pass_nr);
        tape.record_bool(self.has_data);

        self.inner.record_position(tape, strict)
    }

    fn reload_position(&mut self, tape: &mut Tape, strict: bool) -> Result<()> {
        // Own slots are read into temporaries and applied only after the
        // inner stage reloads, so a strict failure anywhere in the subtree
        // leaves this stage untouched.
        let pass_nr = tape.read_u64(strict)?;
        let has_data = tape.read_bool(strict)?;

        self.inner.reload_position(tape, strict)?;

        self.pass_nr = pass_nr.unwrap_or(0);
        self.has_data = has_data.unwrap_or(false);

        Ok(())
    }

    fn is_infinite(&self) -> bool {
        // With no bound the combinator keeps re-driving even a finite
        // inner stage forever; with a bound, only an inner stage that can
        // itself run forever makes the whole thing infinite.
        self.num_repeats.is_none() || self.inner.is_infinite()
    }
}
