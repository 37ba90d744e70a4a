//! Core types for truth-table circuits.
//!
//! Signals are identified by the truth table they produce. This crate holds
//! the table arithmetic, the gate model, the circuit description with its JSON
//! wire form, and the error type shared by the scheduler and validator.

mod description;
mod error;
mod gate;
mod truth_table;

pub use description::*;
pub use error::*;
pub use gate::*;
pub use truth_table::*;
