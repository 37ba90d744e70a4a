//! Verification of truth-table circuits.
//!
//! [`validate`] schedules a [`CircuitDescription`](tcsol_types::CircuitDescription),
//! checks every gate against the function it claims to compute, and checks
//! the declared outputs are produced. [`Validator`] runs the semantic check
//! alone on gates that are already ordered.

mod pipeline;
mod validator;

pub use pipeline::*;
pub use validator::*;

// Used by the integration tests and `test-log`.
#[cfg(test)]
use {rand as _, rand_chacha as _, tracing_subscriber as _};
