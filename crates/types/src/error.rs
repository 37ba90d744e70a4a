//! Error types.

use crate::gate::GateKind;
use crate::truth_table::{Bits, MAX_INPUTS, MIN_INPUTS};

/// The first problem found while checking a circuit description.
///
/// Every table carried here is a [`Bits`], so messages print tables as
/// fixed-width binary strings.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    /// The description's input count is outside the supported range.
    #[error(
        "expected input count to be between {min} and {max}, got {0}",
        min = MIN_INPUTS,
        max = MAX_INPUTS
    )]
    InvalidInputCount(i64),

    /// A declared value is negative, non-integral, or wider than the mask.
    #[error("invalid truth table {value} (must be an integer in 0..={mask:#x})")]
    InvalidTruthTable {
        /// The offending value as it was written.
        value: String,
        /// Mask of the circuit's table width.
        mask: u64,
    },

    /// A gate's declared output is not what its operation computes.
    #[error(
        "{kind} gate claims to produce {declared} from `{}`, but that is actually {computed}",
        render_expr(*kind, operands)
    )]
    SemanticMismatch {
        /// Operation of the gate.
        kind: GateKind,
        /// Output the gate claims.
        declared: Bits,
        /// Output recomputed from the operands.
        computed: Bits,
        /// Declared operands, in order.
        operands: Vec<Bits>,
    },

    /// A gate reads a signal that has not been produced at its position.
    #[error(
        "{consumer} gate resulting in {consumer_output} uses truth table {missing_source}, \
         which hasn't been produced at this point; available: {}",
        join(available, ", ")
    )]
    UnavailableSource {
        /// Operation of the reading gate.
        consumer: GateKind,
        /// Output of the reading gate.
        consumer_output: Bits,
        /// The signal that was not available.
        missing_source: Bits,
        /// Every signal available at that point, in order of availability.
        available: Vec<Bits>,
    },

    /// A gate reads a signal no input or gate of the description produces.
    #[error("required truth table {missing} is unreachable")]
    UnreachableSource {
        /// The signal nothing produces.
        missing: Bits,
    },

    /// A group of gates depends on each other's outputs.
    #[error("detected a cycle involving the gates producing {}", join(stalled, ", "))]
    CycleDetected {
        /// Outputs of every gate left unscheduled when progress stopped.
        stalled: Vec<Bits>,
    },

    /// A gate has a shape the operation does not allow.
    #[error("invalid gate: {0}")]
    InvalidGate(String),

    /// A declared output is never produced.
    #[error("output {missing} is neither an input nor produced by any gate")]
    MissingOutput {
        /// The output that was not produced.
        missing: Bits,
    },

    /// The description has more gates than the caller allows.
    #[error("circuit has {gates} gates, more than the limit of {limit}")]
    GateBudgetExceeded {
        /// Number of gates in the description.
        gates: usize,
        /// Configured limit.
        limit: usize,
    },
}

fn join(tables: &[Bits], sep: &str) -> String {
    tables
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(sep)
}

fn render_expr(kind: GateKind, operands: &[Bits]) -> String {
    match kind {
        GateKind::Not => format!("NOT {}", join(operands, "")),
        GateKind::Nand => join(operands, " NAND "),
        GateKind::Or => join(operands, " OR "),
    }
}

/// Error returned when loading a description from JSON.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The document is not valid JSON of the expected shape.
    #[error("malformed circuit description: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed but describes an invalid circuit.
    #[error(transparent)]
    Invalid(#[from] ValidationError),
}
