// src/stage/mod.rs

//! Pipeline stages and the capability set they share.
//!
//! A pipeline is a tree of [`Stage`]s: leaf sources at the bottom,
//! combinators above them, and a single consumer pulling from the root.
//! Every stage produces values lazily, can be reset to its initial
//! position, and can record and reload its exact mid-stream position
//! through a [`Tape`], so a long-running consumer can persist its progress
//! and resume later without skipping or reprocessing records.
//!
//! # Example
//!
//! ```ignore
//! use pipeline_core::{ListStage, RepeatStage, Stage, Tape, Value};
//!
//! let inner = Box::new(ListStage::new(vec![Value::from("A"), Value::from("B")]));
//! let mut pipeline = RepeatStage::new(inner, Some(3))?;
//!
//! // Consume part of the stream, then checkpoint.
//! let first = pipeline.next()?;
//! let mut tape = Tape::new();
//! pipeline.record_position(&mut tape, true)?;
//!
//! // Later, an identically configured pipeline resumes from the tape.
//! let inner = Box::new(ListStage::new(vec![Value::from("A"), Value::from("B")]));
//! let mut resumed = RepeatStage::new(inner, Some(3))?;
//! resumed.reload_position(&mut tape, true)?;
//! tape.expect_end()?;
//! ```
//!
//! [`Tape`]: crate::tape::Tape

mod repeat;
mod source;
mod take;
mod traits;

pub use repeat::RepeatStage;
pub use source::{CountStage, ListStage};
pub use take::TakeStage;
pub use traits::{BoxedStage, Stage, Value};
