// src/stage/source.rs

//! Synthetic in-memory leaf sources.
//!
//! Concrete file and record readers live outside this crate; any of them
//! can sit at the bottom of a pipeline by implementing [`Stage`]. The two
//! sources here are the in-crate representatives of that boundary: a
//! finite in-memory collection and an infinite counter.

use crate::error::{PipelineError, Result};
use crate::tape::Tape;

use super::traits::{Stage, Value};

/// A leaf stage that yields a fixed list of values in order.
pub struct ListStage {
    values: Vec<Value>,
    index: usize,
}

impl ListStage {
    pub fn new(values: Vec<Value>) -> Self {
        Self { values, index: 0 }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl Stage for ListStage {
    fn next(&mut self) -> Result<Option<Value>> {
        if self.index == self.values.len() {
            return Ok(None);
        }

        let value = self.values[self.index].clone();
        self.index += 1;

        Ok(Some(value))
    }

    fn reset(&mut self) -> Result<()> {
        self.index = 0;
        Ok(())
    }

    fn record_position(&self, tape: &mut Tape, _strict: bool) -> Result<()> {
        tape.record_u64(self.index as u64);
        Ok(())
    }

    fn reload_position(&mut self, tape: &mut Tape, strict: bool) -> Result<()> {
        let index = match tape.read_u64(strict)? {
            Some(index) => {
                if strict && index > self.values.len() as u64 {
                    // A position past the end means the tape was recorded
                    // over a different collection.
                    return Err(PipelineError::checkpoint(format!(
                        "list position {} out of range for {} value(s)",
                        index,
                        self.values.len()
                    )));
                }
                (index as usize).min(self.values.len())
            }
            None => 0,
        };

        self.index = index;

        Ok(())
    }

    fn is_infinite(&self) -> bool {
        false
    }
}

/// A leaf stage that counts upward forever.
///
/// Yields `start`, `start + step`, `start + 2 * step`, ... as decimal
/// strings, never exhausting.
pub struct CountStage {
    start: u64,
    step: u64,
    counter: u64,
}

impl CountStage {
    pub fn new(start: u64, step: u64) -> Self {
        Self {
            start,
            step,
            counter: 0,
        }
    }
}

impl Stage for CountStage {
    fn next(&mut self) -> Result<Option<Value>> {
        let n = self.start.wrapping_add(self.counter.wrapping_mul(self.step));
        self.counter += 1;

        Ok(Some(Value::from(n.to_string())))
    }

    fn reset(&mut self) -> Result<()> {
        self.counter = 0;
        Ok(())
    }

    fn record_position(&self, tape: &mut Tape, _strict: bool) -> Result<()> {
        tape.record_u64(self.counter);
        Ok(())
    }

    fn reload_position(&mut self, tape: &mut Tape, strict: bool) -> Result<()> {
        self.counter = tape.read_u64(strict)?.unwrap_or(0);
        Ok(())
    }

    fn is_infinite(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_yields_in_order() {
        let mut stage = ListStage::new(vec![Value::from("A"), Value::from("B")]);

        assert_eq!(stage.next().unwrap(), Some(Value::from("A")));
        assert_eq!(stage.next().unwrap(), Some(Value::from("B")));
        assert_eq!(stage.next().unwrap(), None);
        assert_eq!(stage.next().unwrap(), None);
        assert!(!stage.is_infinite());
    }

    #[test]
    fn test_empty_list() {
        let mut stage = ListStage::new(vec![]);

        assert!(stage.is_empty());
        assert_eq!(stage.next().unwrap(), None);
    }

    #[test]
    fn test_list_reset() {
        let mut stage = ListStage::new(vec![Value::from("A"), Value::from("B")]);

        stage.next().unwrap();
        stage.reset().unwrap();
        assert_eq!(stage.next().unwrap(), Some(Value::from("A")));
    }

    #[test]
    fn test_list_checkpoint_round_trip() {
        let values = vec![Value::from("A"), Value::from("B"), Value::from("C")];
        let mut stage = ListStage::new(values.clone());
        stage.next().unwrap();

        let mut tape = Tape::new();
        stage.record_position(&mut tape, true).unwrap();

        let mut restored = ListStage::new(values);
        restored.reload_position(&mut tape, true).unwrap();
        assert_eq!(restored.next().unwrap(), Some(Value::from("B")));
    }

    #[test]
    fn test_list_strict_reload_out_of_range() {
        let mut tape = Tape::new();
        tape.record_u64(9);

        let mut stage = ListStage::new(vec![Value::from("A")]);
        let err = stage.reload_position(&mut tape, true).unwrap_err();
        assert!(matches!(err, PipelineError::Checkpoint { .. }));
    }

    #[test]
    fn test_list_lenient_reload_clamps() {
        let mut tape = Tape::new();
        tape.record_u64(9);

        let mut stage = ListStage::new(vec![Value::from("A")]);
        stage.reload_position(&mut tape, false).unwrap();
        assert_eq!(stage.next().unwrap(), None);
    }

    #[test]
    fn test_count_is_infinite() {
        let mut stage = CountStage::new(10, 5);

        assert!(stage.is_infinite());
        assert_eq!(stage.next().unwrap(), Some(Value::from("10")));
        assert_eq!(stage.next().unwrap(), Some(Value::from("15")));
        assert_eq!(stage.next().unwrap(), Some(Value::from("20")));

        stage.reset().unwrap();
        assert_eq!(stage.next().unwrap(), Some(Value::from("10")));
    }

    #[test]
    fn test_count_checkpoint_round_trip() {
        let mut stage = CountStage::new(0, 1);
        for _ in 0..7 {
            stage.next().unwrap();
        }

        let mut tape = Tape::new();
        stage.record_position(&mut tape, true).unwrap();

        let mut restored = CountStage::new(0, 1);
        restored.reload_position(&mut tape, true).unwrap();
        assert_eq!(restored.next().unwrap(), Some(Value::from("7")));
    }
}
