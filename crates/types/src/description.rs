//! Circuit descriptions and their JSON wire form.

use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::{ParseError, ValidationError};
use crate::gate::{Gate, GateKind, GateOp};
use crate::truth_table::{InputCount, TruthTable};

/// A proposed circuit: primary inputs, required outputs and gates.
///
/// Every table is within the mask of `input_count`; this is checked on
/// construction. Nothing else is, see `tcsol-verify` for that.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CircuitDescription {
    input_count: InputCount,
    inputs: Vec<TruthTable>,
    outputs: Vec<TruthTable>,
    gates: Vec<Gate>,
}

impl CircuitDescription {
    /// Creates a description, checking every table against the width.
    pub fn new(
        input_count: InputCount,
        inputs: Vec<TruthTable>,
        outputs: Vec<TruthTable>,
        gates: Vec<Gate>,
    ) -> Result<Self, ValidationError> {
        let all_tables = inputs.iter().chain(&outputs).copied().chain(
            gates
                .iter()
                .flat_map(|g| g.sources().iter().copied().chain([g.output()])),
        );
        for tt in all_tables {
            input_count.check(tt.value())?;
        }

        Ok(Self {
            input_count,
            inputs,
            outputs,
            gates,
        })
    }

    /// Parses the JSON wire form.
    pub fn from_json(s: &str) -> Result<Self, ParseError> {
        let raw: RawCircuit = serde_json::from_str(s)?;
        Ok(Self::try_from(raw)?)
    }

    /// Serializes to the JSON wire form, pretty-printed.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.to_raw())
    }

    /// Converts to the wire form.
    pub fn to_raw(&self) -> RawCircuit {
        RawCircuit {
            input_count: self.input_count.get() as i64,
            inputs: self.inputs.iter().map(|tt| tt.value().into()).collect(),
            outputs: self.outputs.iter().map(|tt| tt.value().into()).collect(),
            gates: self.gates.iter().map(RawGate::from).collect(),
        }
    }

    /// Returns a copy with the gates replaced, e.g. by a schedule of them.
    pub fn with_gates(&self, gates: Vec<Gate>) -> Self {
        Self {
            gates,
            ..self.clone()
        }
    }

    /// The number of circuit inputs.
    pub fn input_count(&self) -> InputCount {
        self.input_count
    }

    /// Primary input tables.
    pub fn inputs(&self) -> &[TruthTable] {
        &self.inputs
    }

    /// Tables that must be produced.
    pub fn outputs(&self) -> &[TruthTable] {
        &self.outputs
    }

    /// Proposed gates, in declaration order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }
}

/// JSON wire form of a circuit description, kept loosely typed so that bad
/// values surface as [`ValidationError`]s rather than parse failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawCircuit {
    /// Number of inputs `n`.
    pub input_count: i64,
    /// Primary input tables.
    pub inputs: Vec<Number>,
    /// Tables that must be produced.
    pub outputs: Vec<Number>,
    /// Proposed gates.
    pub gates: Vec<RawGate>,
}

/// JSON wire form of a gate.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawGate {
    /// `"nand"`, `"not"` or `"or"`.
    pub gate_type: String,
    /// Claimed output table.
    pub truth_table: Number,
    /// Source tables, in order.
    pub sources: Vec<Number>,
    /// Informational delay, carried but not interpreted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delay: Option<u64>,
}

impl From<&Gate> for RawGate {
    fn from(gate: &Gate) -> Self {
        Self {
            gate_type: gate.kind().as_str().to_owned(),
            truth_table: gate.output().value().into(),
            sources: gate.sources().iter().map(|tt| tt.value().into()).collect(),
            delay: gate.delay(),
        }
    }
}

impl TryFrom<RawCircuit> for CircuitDescription {
    type Error = ValidationError;

    fn try_from(raw: RawCircuit) -> Result<Self, Self::Error> {
        let n = InputCount::new(raw.input_count)?;
        let tables = |values: &[Number]| {
            values
                .iter()
                .map(|v| check_number(n, v))
                .collect::<Result<Vec<_>, _>>()
        };

        let inputs = tables(&raw.inputs)?;
        let outputs = tables(&raw.outputs)?;
        let gates = raw
            .gates
            .iter()
            .map(|g| {
                let output = check_number(n, &g.truth_table)?;
                let sources = tables(&g.sources)?;
                Ok(build_gate(&g.gate_type, output, sources)?.with_delay(g.delay))
            })
            .collect::<Result<Vec<_>, ValidationError>>()?;

        Self::new(n, inputs, outputs, gates)
    }
}

fn build_gate(
    gate_type: &str,
    output: TruthTable,
    sources: Vec<TruthTable>,
) -> Result<Gate, ValidationError> {
    let kind = GateKind::from_name(gate_type)
        .ok_or_else(|| ValidationError::InvalidGate(format!("unknown gate type `{gate_type}`")))?;

    if kind == GateKind::Or {
        return Ok(Gate::or(output, sources));
    }

    let op = match (kind, sources.as_slice()) {
        (GateKind::Nand, &[left, right]) => GateOp::Nand([left, right]),
        (GateKind::Not, &[source]) => GateOp::Not(source),
        (kind, found) => {
            return Err(ValidationError::InvalidGate(format!(
                "{kind} gate producing {} expects {} sources, got {}",
                output.value(),
                kind.arity().unwrap_or_default(),
                found.len()
            )));
        }
    };
    Ok(Gate::new(output, op))
}

/// Checks a JSON number is a non-negative integer within the mask.
///
/// Integral floats such as `3.0` are accepted as their integer value.
pub fn check_number(n: InputCount, value: &Number) -> Result<TruthTable, ValidationError> {
    let integral = value.as_u64().or_else(|| {
        value
            .as_f64()
            .filter(|f| *f >= 0.0 && f.fract() == 0.0 && *f < u64::MAX as f64)
            .map(|f| f as u64)
    });

    match integral {
        Some(v) => n.check(v).map_err(|_| invalid(n, value)),
        None => Err(invalid(n, value)),
    }
}

fn invalid(n: InputCount, value: &Number) -> ValidationError {
    ValidationError::InvalidTruthTable {
        value: value.to_string(),
        mask: n.mask(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const XOR: &str = r#"{
        "input_count": 2,
        "inputs": [10, 12],
        "outputs": [6],
        "gates": [
            {"gate_type": "nand", "truth_table": 7, "sources": [10, 12], "delay": 2},
            {"gate_type": "nand", "truth_table": 11, "sources": [10, 7]},
            {"gate_type": "nand", "truth_table": 13, "sources": [12, 7]},
            {"gate_type": "nand", "truth_table": 6, "sources": [11, 13]}
        ]
    }"#;

    fn tt(v: u64) -> TruthTable {
        TruthTable::new(v)
    }

    fn with_gates(gates: &str) -> String {
        format!(r#"{{"input_count": 2, "inputs": [10, 12], "outputs": [], "gates": [{gates}]}}"#)
    }

    #[test]
    fn test_parse_xor() {
        let desc = CircuitDescription::from_json(XOR).unwrap();
        assert_eq!(desc.input_count().get(), 2);
        assert_eq!(desc.inputs(), &[tt(0b1010), tt(0b1100)]);
        assert_eq!(desc.outputs(), &[tt(0b0110)]);
        assert_eq!(desc.gates().len(), 4);
        assert_eq!(
            desc.gates()[0],
            Gate::nand(tt(0b0111), tt(0b1010), tt(0b1100)).with_delay(Some(2))
        );
    }

    #[test]
    fn test_json_round_trip_keeps_delay() {
        let desc = CircuitDescription::from_json(XOR).unwrap();
        let json = desc.to_json_pretty().unwrap();
        assert!(json.contains("\"delay\": 2"));
        assert_eq!(CircuitDescription::from_json(&json).unwrap(), desc);
    }

    #[test]
    fn test_rejects_out_of_range_input_count() {
        let json = r#"{"input_count": 7, "inputs": [], "outputs": [], "gates": []}"#;
        assert!(matches!(
            CircuitDescription::from_json(json),
            Err(ParseError::Invalid(ValidationError::InvalidInputCount(7)))
        ));
    }

    #[test]
    fn test_rejects_bad_tables() {
        for bad in ["16", "-1", "2.5"] {
            let json = with_gates(&format!(
                r#"{{"gate_type": "not", "truth_table": {bad}, "sources": [10]}}"#
            ));
            match CircuitDescription::from_json(&json) {
                Err(ParseError::Invalid(ValidationError::InvalidTruthTable { value, mask })) => {
                    assert_eq!(value, bad);
                    assert_eq!(mask, 0b1111);
                }
                other => panic!("expected invalid truth table for {bad}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_accepts_integral_float() {
        let json = with_gates(r#"{"gate_type": "not", "truth_table": 5.0, "sources": [10]}"#);
        let desc = CircuitDescription::from_json(&json).unwrap();
        assert_eq!(desc.gates()[0], Gate::not(tt(0b0101), tt(0b1010)));
    }

    #[test]
    fn test_rejects_wrong_arity_and_unknown_type() {
        let json = with_gates(r#"{"gate_type": "nand", "truth_table": 7, "sources": [10]}"#);
        assert!(matches!(
            CircuitDescription::from_json(&json),
            Err(ParseError::Invalid(ValidationError::InvalidGate(_)))
        ));

        let json = with_gates(r#"{"gate_type": "xor", "truth_table": 6, "sources": [10, 12]}"#);
        match CircuitDescription::from_json(&json) {
            Err(ParseError::Invalid(ValidationError::InvalidGate(msg))) => {
                assert!(msg.contains("xor"))
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_empty_or_is_kept_for_validation() {
        let json = with_gates(r#"{"gate_type": "or", "truth_table": 0, "sources": []}"#);
        let desc = CircuitDescription::from_json(&json).unwrap();
        assert_eq!(desc.gates()[0].sources(), &[] as &[TruthTable]);
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            CircuitDescription::from_json("{"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn test_new_checks_gate_tables() {
        let n = InputCount::new(2).unwrap();
        let err = CircuitDescription::new(n, vec![], vec![], vec![Gate::not(tt(0x10), tt(1))]);
        assert!(matches!(err, Err(ValidationError::InvalidTruthTable { .. })));
    }
}
