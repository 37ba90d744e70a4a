//! Whole-description verification.

use tcsol_lvl::{levels_of_ordered, schedule};
use tcsol_types::{CircuitDescription, Gate, GateKind, TruthTable, ValidationError};
use tracing::debug;

use crate::validator::{AvailabilityTrace, Validator};

/// Knobs for [`validate_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifyOptions {
    /// Fail with [`ValidationError::MissingOutput`] when a declared output is
    /// never produced.
    pub require_outputs: bool,

    /// Refuse descriptions with more gates than this.
    pub max_gates: Option<usize>,
}

impl Default for VerifyOptions {
    fn default() -> Self {
        Self {
            require_outputs: true,
            max_gates: None,
        }
    }
}

/// A description that passed verification, with its gates in evaluation
/// order.
#[derive(Debug, Clone)]
pub struct Verified {
    description: CircuitDescription,
    order: Vec<Gate>,
    trace: AvailabilityTrace,
    stats: CircuitStats,
}

impl Verified {
    /// The description as it was given.
    pub fn description(&self) -> &CircuitDescription {
        &self.description
    }

    /// Gates in evaluation order.
    pub fn order(&self) -> &[Gate] {
        &self.order
    }

    /// The description with its gates in evaluation order.
    pub fn ordered_description(&self) -> CircuitDescription {
        self.description.with_gates(self.order.clone())
    }

    /// Signals available once every gate ran.
    pub fn trace(&self) -> &AvailabilityTrace {
        &self.trace
    }

    /// Summary numbers.
    pub fn stats(&self) -> &CircuitStats {
        &self.stats
    }

    /// Graph edges `source -> output`, one per declared operand, in
    /// evaluation order. Nodes are identified by their truth table.
    pub fn edges(&self) -> impl Iterator<Item = (TruthTable, TruthTable)> + '_ {
        self.order
            .iter()
            .flat_map(|g| g.sources().iter().map(move |s| (*s, g.output())))
    }
}

/// Gate counts and shape of a verified circuit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CircuitStats {
    /// Number of NAND gates.
    pub nand_gates: usize,
    /// Number of NOT gates.
    pub not_gates: usize,
    /// Number of OR gates.
    pub or_gates: usize,
    /// Number of levels, i.e. the longest input-to-output gate path.
    pub depth: usize,
    /// Largest declared delay, if any gate declares one.
    pub max_delay: Option<u64>,
}

impl CircuitStats {
    fn collect(order: &[Gate], inputs: &[TruthTable]) -> Self {
        let mut stats = Self {
            depth: levels_of_ordered(order.iter().cloned(), inputs).len(),
            max_delay: order.iter().filter_map(Gate::delay).max(),
            ..Self::default()
        };
        for gate in order {
            match gate.kind() {
                GateKind::Nand => stats.nand_gates += 1,
                GateKind::Not => stats.not_gates += 1,
                GateKind::Or => stats.or_gates += 1,
            }
        }
        stats
    }

    /// Total number of gates.
    pub fn total_gates(&self) -> usize {
        self.nand_gates + self.not_gates + self.or_gates
    }
}

/// Verifies a description with the default options.
///
/// See [`validate_with`].
pub fn validate(description: &CircuitDescription) -> Result<Verified, ValidationError> {
    validate_with(description, &VerifyOptions::default())
}

/// Verifies a description: schedules its gates, checks every gate computes
/// what it claims in that order, then checks the declared outputs were
/// produced. Fails fast with the first problem found.
pub fn validate_with(
    description: &CircuitDescription,
    options: &VerifyOptions,
) -> Result<Verified, ValidationError> {
    let n = description.input_count();
    let gates = description.gates();

    if let Some(limit) = options.max_gates {
        if gates.len() > limit {
            return Err(ValidationError::GateBudgetExceeded {
                gates: gates.len(),
                limit,
            });
        }
    }

    let order = schedule(n, gates, description.inputs())?;
    let trace = Validator::new(n).validate(&order, description.inputs())?;

    if options.require_outputs {
        if let Some(missing) = description.outputs().iter().find(|o| !trace.contains(**o)) {
            return Err(ValidationError::MissingOutput {
                missing: n.bits(*missing),
            });
        }
    }

    let stats = CircuitStats::collect(&order, description.inputs());
    debug!(
        inputs = n.get(),
        gates = stats.total_gates(),
        depth = stats.depth,
        "verified circuit"
    );

    Ok(Verified {
        description: description.clone(),
        order,
        trace,
        stats,
    })
}

#[cfg(test)]
mod tests {
    use tcsol_types::InputCount;
    use test_log::test;

    use super::*;

    fn tt(v: u64) -> TruthTable {
        TruthTable::new(v)
    }

    fn not_circuit(outputs: Vec<TruthTable>) -> CircuitDescription {
        let n = InputCount::new(2).unwrap();
        let gates = vec![Gate::not(tt(0b0101), tt(0b1010)).with_delay(Some(3))];
        CircuitDescription::new(n, vec![tt(0b1010)], outputs, gates).unwrap()
    }

    #[test]
    fn test_missing_output() {
        let desc = not_circuit(vec![tt(0b0101), tt(0b0011)]);
        let err = validate(&desc).unwrap_err();
        assert!(
            matches!(err, ValidationError::MissingOutput { missing } if missing.table() == tt(0b0011))
        );

        let lenient = VerifyOptions {
            require_outputs: false,
            ..Default::default()
        };
        assert!(validate_with(&desc, &lenient).is_ok());
    }

    #[test]
    fn test_output_may_be_an_input() {
        let desc = not_circuit(vec![tt(0b1010)]);
        assert!(validate(&desc).is_ok());
    }

    #[test]
    fn test_gate_budget() {
        let desc = not_circuit(vec![]);
        let tight = VerifyOptions {
            max_gates: Some(0),
            ..Default::default()
        };
        assert_eq!(
            validate_with(&desc, &tight).unwrap_err(),
            ValidationError::GateBudgetExceeded { gates: 1, limit: 0 }
        );
    }

    #[test]
    fn test_stats_and_edges() {
        let verified = validate(&not_circuit(vec![tt(0b0101)])).unwrap();
        assert_eq!(
            verified.stats(),
            &CircuitStats {
                not_gates: 1,
                depth: 1,
                max_delay: Some(3),
                ..Default::default()
            }
        );
        assert_eq!(
            verified.edges().collect::<Vec<_>>(),
            vec![(tt(0b1010), tt(0b0101))]
        );
    }
}
