//! Ripple-carry adder generator.
//!
//! Produces small adders as circuit descriptions, built only from NAND and
//! NOT gates, for exercising the validator and scheduler on circuits with
//! more than one output.

use tcsol_builder::CircuitBuilder;
use tcsol_types::{CircuitDescription, Endian, InputCount, TruthTable, ValidationError};

// The binary parses arguments, the library doesn't.
use {anyhow as _, clap as _};

/// Largest operand width: two operands must fit in the six supported inputs.
pub const MAX_BITS: usize = 3;

/// Generate a `bits`-bit ripple-carry adder.
///
/// # Circuit Design
///
/// **Inputs**: `2 * bits` primary inputs, big-endian projections
/// - Inputs `0..bits`: first operand (A), least significant bit first
/// - Inputs `bits..2*bits`: second operand (B)
///
/// **Outputs**: `bits` sum bits, least significant first, then the carry out.
///
/// # Full Adder Implementation
///
/// ```text
/// half_sum = a XOR b          (4 NANDs, the first being t1 = a NAND b)
/// sum      = half_sum XOR c   (4 NANDs, the first being t2 = half_sum NAND c)
/// carry    = t1 NAND t2
/// ```
///
/// Bit 0 has no carry in, so its carry out is `NOT t1`.
///
/// # Example
///
/// ```
/// use adder::generate_adder;
///
/// let circuit = generate_adder(2).unwrap();
/// assert_eq!(circuit.input_count().get(), 4);
/// assert_eq!(circuit.outputs().len(), 3);
/// ```
///
/// # Errors
///
/// [`ValidationError::InvalidInputCount`] unless `1 <= bits <= MAX_BITS`.
pub fn generate_adder(bits: usize) -> Result<CircuitDescription, ValidationError> {
    let n = InputCount::new(2 * bits as i64)?;
    let mut b = CircuitBuilder::new(n);

    let a = (0..bits)
        .map(|i| b.input(i as u8, Endian::Big))
        .collect::<Result<Vec<_>, _>>()?;
    let y = (0..bits)
        .map(|i| b.input((bits + i) as u8, Endian::Big))
        .collect::<Result<Vec<_>, _>>()?;

    let mut outputs = Vec::with_capacity(bits + 1);
    let mut carry: Option<TruthTable> = None;
    for (a, y) in a.into_iter().zip(y) {
        let (half_sum, t1) = xor(&mut b, a, y);
        let (sum, carry_out) = match carry {
            None => (half_sum, b.not(t1)),
            Some(c) => {
                let (sum, t2) = xor(&mut b, half_sum, c);
                (sum, b.nand(t1, t2))
            }
        };
        outputs.push(sum);
        carry = Some(carry_out);
    }
    outputs.extend(carry);

    b.finish(outputs)
}

/// XOR from four NANDs. Also returns the first NAND, which carry logic
/// reuses.
fn xor(b: &mut CircuitBuilder, x: TruthTable, y: TruthTable) -> (TruthTable, TruthTable) {
    let t = b.nand(x, y);
    let u = b.nand(x, t);
    let v = b.nand(y, t);
    (b.nand(u, v), t)
}
