//! Domain types for revise
//!
//! - Problem: a solved problem with its difficulty and revision state
//! - SolvedEvent: the inbound "submission accepted" message
//! - RevisionStore: the single persisted blob holding every problem

pub mod event;
pub mod problem;
pub mod store;

pub use event::SolvedEvent;
pub use problem::{DifficultyLevel, Problem, RevisionEntry, difficulty_score};
pub use store::{RevisionStats, RevisionStore};
