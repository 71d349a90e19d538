// src/stage/traits.rs

use bytes::Bytes;

use crate::error::Result;
use crate::tape::Tape;

/// An opaque record flowing through the pipeline.
///
/// The payload is immutable and cheap to clone; stages pass it through
/// without inspecting its internal shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Value {
    data: Bytes,
}

impl Value {
    pub fn new(data: impl Into<Bytes>) -> Self {
        Self { data: data.into() }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::new(s.to_string().into_bytes())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::new(s.into_bytes())
    }
}

impl From<Vec<u8>> for Value {
    fn from(data: Vec<u8>) -> Self {
        Self::new(data)
    }
}

/// A pull-based, resettable, checkpointable producer of [`Value`]s.
///
/// Every pipeline element implements this capability set: leaf sources,
/// transform stages, and combinators alike. A stage tree has exactly one
/// logical consumer; none of these operations are designed for concurrent
/// invocation on the same instance.
pub trait Stage: Send {
    /// Returns the next value, or `Ok(None)` once exhausted.
    ///
    /// Must remain callable after exhaustion, continuing to return
    /// `Ok(None)` with no further side effects.
    fn next(&mut self) -> Result<Option<Value>>;

    /// Restores the state the stage had immediately after construction,
    /// discarding any in-progress position and buffered look-ahead.
    fn reset(&mut self) -> Result<()>;

    /// Appends this stage's resumable state to `tape`, then recurses into
    /// child stages. The slot order is fixed per stage shape; reload reads
    /// it back in exactly the same order.
    fn record_position(&self, tape: &mut Tape, strict: bool) -> Result<()>;

    /// Restores the position previously written by [`record_position`],
    /// then recurses into child stages.
    ///
    /// Under `strict == true` a missing, extra, or type-mismatched slot is
    /// a checkpoint error and no partial state is applied. Under
    /// `strict == false` missing state falls back to the stage's
    /// freshly-constructed default. After reloading the outermost stage of
    /// a tree, the consumer should call [`Tape::expect_end`] to reject
    /// tapes recorded by a differently shaped pipeline.
    ///
    /// [`record_position`]: Stage::record_position
    fn reload_position(&mut self, tape: &mut Tape, strict: bool) -> Result<()>;

    /// Whether `next()` can be called forever without permanently
    /// returning empty. Used upstream to decide whether epoch-based
    /// termination is meaningful.
    fn is_infinite(&self) -> bool;
}

/// An exclusively owned pipeline element.
///
/// Combinators own their inner stage through this; the ownership graph is
/// strictly tree shaped, with no sharing across consumers.
pub type BoxedStage = Box<dyn Stage>;

impl Stage for BoxedStage {
    fn next(&mut self) -> Result<Option<Value>> {
        (**self).next()
    }

    fn reset(&mut self) -> Result<()> {
        (**self).reset()
    }

    fn record_position(&self, tape: &mut Tape, strict: bool) -> Result<()> {
        (**self).record_position(tape, strict)
    }

    fn reload_position(&mut self, tape: &mut Tape, strict: bool) -> Result<()> {
        (**self).reload_position(tape, strict)
    }

    fn is_infinite(&self) -> bool {
        (**self).is_infinite()
    }
}
