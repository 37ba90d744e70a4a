//! Evaluation ordering for truth-table circuits.
//!
//! This crate turns an arbitrarily ordered list of proposed gates into an
//! evaluation order in which every signal is produced before it is read.
//!
//! # Key Features
//! - **Scheduling**: round-robin requeue with per-pass stall detection
//! - **Levelling**: groups scheduled gates by depth from the inputs
//!
//! # Example
//! ```
//! use tcsol_lvl::schedule;
//! use tcsol_types::{Gate, InputCount, TruthTable};
//!
//! let n = InputCount::new(2).unwrap();
//! let (a, b) = (TruthTable::new(0b1010), TruthTable::new(0b1100));
//! let g1 = Gate::nand(TruthTable::new(0b0111), a, b);
//! let g2 = Gate::not(TruthTable::new(0b1000), g1.output());
//!
//! let order = schedule(n, &[g2.clone(), g1.clone()], &[a, b]).unwrap();
//! assert_eq!(order, vec![g1, g2]);
//! ```

mod levels;
mod schedule;

pub use levels::*;
pub use schedule::*;

// Only used by the benches and by `test-log`.
#[cfg(test)]
use criterion as _;
#[cfg(test)]
use tracing_subscriber as _;
