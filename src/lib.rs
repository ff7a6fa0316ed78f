//! Revise - spaced-repetition scheduling for solved coding problems
//!
//! Every accepted submission becomes a tracked problem. Its difficulty is
//! scored from mistakes and solve time, and revisions are scheduled at
//! growing intervals that reset when a revision goes badly.

pub mod clock;
pub mod domain;
pub mod error;
pub mod format;
pub mod id;
pub mod scheduler;
pub mod storage;

pub use error::{Result, RevisionError};
pub use scheduler::RevisionScheduler;
