use ahash::{HashMap, HashMapExt, HashSet, HashSetExt};
use tcsol_types::{CircuitDescription, Endian, Gate, InputCount, TruthTable, ValidationError};
use tracing::trace;

/// Builds a circuit description one signal at a time.
///
/// Signals are identified by their truth table. Asking for a NAND or NOT
/// whose result is already known returns the existing signal, and an OR over
/// a set of sources is emitted at most once per set.
///
/// Importers that address signals by position can register them with
/// [`push_signal`](Self::push_signal) and later refer to them by index.
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    n: InputCount,
    inputs: Vec<TruthTable>,
    gates: Vec<Gate>,
    produced: HashSet<TruthTable>,
    ors: HashMap<Vec<TruthTable>, TruthTable>,
    signals: Vec<TruthTable>,
}

impl CircuitBuilder {
    /// Creates an empty builder for circuits over `n` inputs.
    pub fn new(n: InputCount) -> Self {
        Self {
            n,
            inputs: Vec::new(),
            gates: Vec::new(),
            produced: HashSet::new(),
            ors: HashMap::new(),
            signals: Vec::new(),
        }
    }

    /// The input count every table is checked against.
    pub fn input_count(&self) -> InputCount {
        self.n
    }

    /// Declares the projection of input `i` as a primary input.
    pub fn input(&mut self, i: u8, endian: Endian) -> Result<TruthTable, ValidationError> {
        if i >= self.n.get() {
            return Err(ValidationError::InvalidGate(format!(
                "input {i} is out of range for {} inputs",
                self.n
            )));
        }
        self.add_input(TruthTable::input_var(i, self.n, endian).value())
    }

    /// Declares an arbitrary table as a primary input.
    pub fn add_input(&mut self, value: u64) -> Result<TruthTable, ValidationError> {
        let tt = self.n.check(value)?;
        self.declare_input(tt);
        Ok(tt)
    }

    /// The constant-false signal, declared as an input on first use.
    pub fn const_false(&mut self) -> TruthTable {
        let zero = TruthTable::const_false();
        self.declare_input(zero);
        zero
    }

    /// The constant-true signal, declared as an input on first use.
    pub fn const_true(&mut self) -> TruthTable {
        let ones = TruthTable::const_true(self.n);
        self.declare_input(ones);
        ones
    }

    /// `¬(left ∧ right)`.
    pub fn nand(&mut self, left: TruthTable, right: TruthTable) -> TruthTable {
        let output = left.nand(right, self.n);
        self.emit(Gate::nand(output, left, right))
    }

    /// `¬source`.
    pub fn not(&mut self, source: TruthTable) -> TruthTable {
        let output = source.negate(self.n);
        self.emit(Gate::not(output, source))
    }

    /// OR over a set of sources.
    ///
    /// Order and repetition of `sources` don't matter. No sources give the
    /// constant false (see [`const_false`](Self::const_false)), a single source is returned unchanged, and two or more
    /// emit one `or` gate the first time this set is requested.
    pub fn get_or(&mut self, sources: impl IntoIterator<Item = TruthTable>) -> TruthTable {
        let mut set = sources.into_iter().collect::<Vec<_>>();
        set.sort_unstable();
        set.dedup();

        match set.as_slice() {
            [] => self.const_false(),
            [single] => *single,
            _ => {
                if let Some(known) = self.ors.get(&set) {
                    trace!(output = known.value(), "reuse or gate");
                    return *known;
                }
                let output = TruthTable::union(set.iter().copied(), self.n)
                    .unwrap_or_else(TruthTable::const_false);
                if !self.produced.insert(output) {
                    trace!(output = output.value(), "or gate reproduces a known signal");
                }
                self.gates.push(Gate::or(output, set.clone()));
                self.ors.insert(set, output);
                output
            }
        }
    }

    /// Registers a signal in the index table and returns its index.
    pub fn push_signal(&mut self, tt: TruthTable) -> usize {
        self.signals.push(tt);
        self.signals.len() - 1
    }

    /// Looks up a registered signal.
    pub fn signal(&self, index: usize) -> Option<TruthTable> {
        self.signals.get(index).copied()
    }

    /// OR of the registered signals whose indices are set in `bits`, bit 0
    /// being index 0.
    pub fn or_from_bitfield(&mut self, bits: u128) -> Result<TruthTable, ValidationError> {
        let selected = (0..u128::BITS as usize)
            .filter(|i| (bits >> i) & 1 == 1)
            .map(|i| {
                self.signal(i).ok_or_else(|| {
                    ValidationError::InvalidGate(format!(
                        "bitfield {bits:#b} selects signal {i}, but only {} are known",
                        self.signals.len()
                    ))
                })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.get_or(selected))
    }

    /// Gates emitted so far, in emission order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Whether `tt` is an input or the output of an emitted gate.
    pub fn is_produced(&self, tt: TruthTable) -> bool {
        self.produced.contains(&tt)
    }

    /// Completes the description with the given required outputs.
    pub fn finish(self, outputs: Vec<TruthTable>) -> Result<CircuitDescription, ValidationError> {
        CircuitDescription::new(self.n, self.inputs, outputs, self.gates)
    }

    fn declare_input(&mut self, tt: TruthTable) {
        if self.produced.insert(tt) {
            self.inputs.push(tt);
        }
    }

    fn emit(&mut self, gate: Gate) -> TruthTable {
        let output = gate.output();
        if self.produced.insert(output) {
            self.gates.push(gate);
        } else {
            trace!(output = output.value(), "signal already produced");
        }
        output
    }
}
