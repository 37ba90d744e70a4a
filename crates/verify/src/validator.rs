//! Semantic validation of an ordered gate list.

use ahash::RandomState;
use indexmap::IndexSet;
use tcsol_types::{Bits, Gate, InputCount, TruthTable, ValidationError};
use tracing::trace;

type TableSet = IndexSet<TruthTable, RandomState>;

/// Checks gates against the boolean function they claim to compute.
#[derive(Debug, Clone, Copy)]
pub struct Validator {
    n: InputCount,
}

impl Validator {
    /// Creates a validator for circuits over `n` inputs.
    pub fn new(n: InputCount) -> Self {
        Self { n }
    }

    /// The input count tables are checked against.
    pub fn input_count(&self) -> InputCount {
        self.n
    }

    /// Validates `gates`, which must already be in evaluation order, starting
    /// from the signals in `known`.
    ///
    /// Every table must fit the width of `n`, otherwise the result is
    /// [`ValidationError::InvalidTruthTable`]. For each gate the output is
    /// recomputed from the declared operands first, and a mismatch is reported before any availability problem of
    /// the same gate. Then every operand must have been produced by an input
    /// or an earlier gate. Stops at the first failure.
    pub fn validate(
        &self,
        gates: &[Gate],
        known: &[TruthTable],
    ) -> Result<AvailabilityTrace, ValidationError> {
        for tt in known {
            self.n.check(tt.value())?;
        }
        let mut available = known.iter().copied().collect::<TableSet>();
        let initial = available.len();

        for gate in gates {
            self.n.check(gate.output().value())?;
            for source in gate.sources() {
                self.n.check(source.value())?;
            }

            let Some(computed) = gate.evaluate(self.n) else {
                return Err(ValidationError::InvalidGate(format!(
                    "{} gate resulting in {} has no sources",
                    gate.kind(),
                    self.n.bits(gate.output())
                )));
            };

            if computed != gate.output() {
                return Err(ValidationError::SemanticMismatch {
                    kind: gate.kind(),
                    declared: self.n.bits(gate.output()),
                    computed: self.n.bits(computed),
                    operands: gate.sources().iter().map(|s| self.n.bits(*s)).collect(),
                });
            }

            for source in gate.sources() {
                if !available.contains(source) {
                    return Err(ValidationError::UnavailableSource {
                        consumer: gate.kind(),
                        consumer_output: self.n.bits(gate.output()),
                        missing_source: self.n.bits(*source),
                        available: available.iter().map(|tt| self.n.bits(*tt)).collect(),
                    });
                }
            }

            if !available.insert(gate.output()) {
                trace!(output = gate.output().value(), "gate reproduces a known signal");
            }
        }

        Ok(AvailabilityTrace {
            n: self.n,
            available,
            initial,
        })
    }
}

/// The signals available after a successful validation, in the order they
/// became available.
#[derive(Debug, Clone)]
pub struct AvailabilityTrace {
    n: InputCount,
    available: TableSet,
    initial: usize,
}

impl AvailabilityTrace {
    /// Whether `tt` was available at the end of the run.
    pub fn contains(&self, tt: TruthTable) -> bool {
        self.available.contains(&tt)
    }

    /// Every available signal, inputs first.
    pub fn available(&self) -> impl Iterator<Item = TruthTable> + '_ {
        self.available.iter().copied()
    }

    /// Signals first made available by a gate, in order.
    pub fn produced(&self) -> impl Iterator<Item = TruthTable> + '_ {
        self.available().skip(self.initial)
    }

    /// Number of available signals.
    pub fn len(&self) -> usize {
        self.available.len()
    }

    /// Whether nothing was available, i.e. no inputs and no gates.
    pub fn is_empty(&self) -> bool {
        self.available.is_empty()
    }

    /// Every available signal as fixed-width binary.
    pub fn render(&self) -> Vec<Bits> {
        self.available().map(|tt| self.n.bits(tt)).collect()
    }
}
