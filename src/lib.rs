// src/lib.rs

//! Checkpointable Data-Loading Pipeline - Core Library
//!
//! This crate provides the core of a composable data-loading pipeline:
//! the pull-based stage contract, a repeat combinator for finite or
//! unbounded re-iteration, and the checkpoint tape protocol that lets a
//! consumer persist and resume its exact position in the stream.

pub mod error;
pub mod tape;

// Re-export commonly used types for convenience
pub use error::{PipelineError, Result};
pub use tape::{Slot, Tape};

pub mod stage;
pub use stage::{BoxedStage, CountStage, ListStage, RepeatStage, Stage, TakeStage, Value};
