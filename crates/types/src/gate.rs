//! Gate model.

use std::fmt;
use std::slice;

use serde::{Deserialize, Serialize};

use crate::truth_table::{InputCount, TruthTable};

/// Operation kind of a gate, as named in the `gate_type` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GateKind {
    /// Two-input NAND.
    Nand,
    /// Inverter.
    Not,
    /// N-ary OR.
    Or,
}

impl GateKind {
    /// Looks up a kind by its wire name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "nand" => Some(Self::Nand),
            "not" => Some(Self::Not),
            "or" => Some(Self::Or),
            _ => None,
        }
    }

    /// Wire name of the kind.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Nand => "nand",
            Self::Not => "not",
            Self::Or => "or",
        }
    }

    /// Fixed number of sources, or `None` for the n-ary OR.
    pub const fn arity(self) -> Option<usize> {
        match self {
            Self::Nand => Some(2),
            Self::Not => Some(1),
            Self::Or => None,
        }
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation and operands of a gate.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum GateOp {
    /// `¬(left ∧ right)`.
    Nand([TruthTable; 2]),
    /// `¬source`.
    Not(TruthTable),
    /// Union of the sources. A single source is an identity copy; zero
    /// sources is representable but never valid.
    Or(Vec<TruthTable>),
}

/// A proposed gate: its claimed output and how it claims to compute it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Gate {
    output: TruthTable,
    op: GateOp,
    delay: Option<u64>,
}

impl Gate {
    /// Creates a gate from its parts.
    pub fn new(output: TruthTable, op: GateOp) -> Self {
        Self {
            output,
            op,
            delay: None,
        }
    }

    /// A NAND gate.
    pub fn nand(output: TruthTable, left: TruthTable, right: TruthTable) -> Self {
        Self::new(output, GateOp::Nand([left, right]))
    }

    /// A NOT gate.
    pub fn not(output: TruthTable, source: TruthTable) -> Self {
        Self::new(output, GateOp::Not(source))
    }

    /// An OR gate.
    pub fn or(output: TruthTable, sources: Vec<TruthTable>) -> Self {
        Self::new(output, GateOp::Or(sources))
    }

    /// Attaches an informational delay.
    pub fn with_delay(mut self, delay: Option<u64>) -> Self {
        self.delay = delay;
        self
    }

    /// The table this gate claims to produce.
    pub fn output(&self) -> TruthTable {
        self.output
    }

    /// The operation and operands.
    pub fn op(&self) -> &GateOp {
        &self.op
    }

    /// The informational delay, if any.
    pub fn delay(&self) -> Option<u64> {
        self.delay
    }

    /// The operation kind.
    pub fn kind(&self) -> GateKind {
        match self.op {
            GateOp::Nand(_) => GateKind::Nand,
            GateOp::Not(_) => GateKind::Not,
            GateOp::Or(_) => GateKind::Or,
        }
    }

    /// Declared sources, in order.
    pub fn sources(&self) -> &[TruthTable] {
        match &self.op {
            GateOp::Nand(pair) => pair,
            GateOp::Not(source) => slice::from_ref(source),
            GateOp::Or(sources) => sources,
        }
    }

    /// Recomputes the output from the operands under the width of `n`.
    ///
    /// Returns `None` for an OR without sources.
    pub fn evaluate(&self, n: InputCount) -> Option<TruthTable> {
        match &self.op {
            GateOp::Nand([left, right]) => Some(left.nand(*right, n)),
            GateOp::Not(source) => Some(source.negate(n)),
            GateOp::Or(sources) => TruthTable::union(sources.iter().copied(), n),
        }
    }
}
