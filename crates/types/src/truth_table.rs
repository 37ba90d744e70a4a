//! Fixed-width truth tables.
//!
//! A truth table over `n` inputs is a bitstring of `2^n` bits. It is stored in
//! the low bits of a `u64`, which caps `n` at 6. Every operation masks its
//! result to the table width, so no bits ever leak above `mask(n)`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Smallest supported input count.
pub const MIN_INPUTS: u8 = 2;

/// Largest supported input count (64 rows fill a `u64`).
pub const MAX_INPUTS: u8 = 6;

/// Number of circuit inputs, restricted to `MIN_INPUTS..=MAX_INPUTS`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InputCount(u8);

impl InputCount {
    /// Creates an input count, rejecting anything outside the supported range.
    pub fn new(n: i64) -> Result<Self, ValidationError> {
        if (MIN_INPUTS as i64..=MAX_INPUTS as i64).contains(&n) {
            Ok(Self(n as u8))
        } else {
            Err(ValidationError::InvalidInputCount(n))
        }
    }

    /// Returns the raw input count.
    pub const fn get(self) -> u8 {
        self.0
    }

    /// Width of a truth table in bits, `2^n`.
    pub const fn table_bits(self) -> u32 {
        1 << self.0
    }

    /// All-ones mask of the table width, `2^(2^n) - 1`.
    pub const fn mask(self) -> u64 {
        let bits = self.table_bits();
        if bits == u64::BITS {
            u64::MAX
        } else {
            (1u64 << bits) - 1
        }
    }

    /// Checks that `value` fits the table width.
    pub fn check(self, value: u64) -> Result<TruthTable, ValidationError> {
        if value > self.mask() {
            return Err(ValidationError::InvalidTruthTable {
                value: value.to_string(),
                mask: self.mask(),
            });
        }
        Ok(TruthTable(value))
    }

    /// Renders a table as a fixed-width binary string.
    pub const fn bits(self, tt: TruthTable) -> Bits {
        Bits {
            value: tt.0,
            width: self.table_bits(),
        }
    }
}

impl fmt::Display for InputCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Row order used when packing per-assignment outputs into a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endian {
    /// The output for assignment `x` lands on bit `x`.
    #[default]
    Big,
    /// The row list is reversed first: assignment `x` lands on bit
    /// `2^n - 1 - x`.
    Little,
}

/// The truth table of a signal, which is also its identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
#[repr(transparent)]
pub struct TruthTable(u64);

impl TruthTable {
    /// Wraps a raw value without range checking.
    ///
    /// Use [`InputCount::check`] for untrusted values.
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// Returns the raw value.
    pub const fn value(self) -> u64 {
        self.0
    }

    /// The constant-false signal.
    pub const fn const_false() -> Self {
        Self(0)
    }

    /// The constant-true signal for `n` inputs.
    pub const fn const_true(n: InputCount) -> Self {
        Self(n.mask())
    }

    /// `¬(self ∧ other)`, masked.
    #[inline]
    pub const fn nand(self, other: Self, n: InputCount) -> Self {
        Self(!(self.0 & other.0) & n.mask())
    }

    /// `¬self`, masked.
    #[inline]
    pub const fn negate(self, n: InputCount) -> Self {
        Self(!self.0 & n.mask())
    }

    /// `self ∧ other`, masked.
    #[inline]
    pub const fn and(self, other: Self, n: InputCount) -> Self {
        Self(self.0 & other.0 & n.mask())
    }

    /// `self ∨ other`, masked.
    #[inline]
    pub const fn or(self, other: Self, n: InputCount) -> Self {
        Self((self.0 | other.0) & n.mask())
    }

    /// Bitwise union of all `tables`, masked. Returns `None` for an empty
    /// iterator.
    pub fn union(tables: impl IntoIterator<Item = Self>, n: InputCount) -> Option<Self> {
        tables
            .into_iter()
            .reduce(|acc, tt| acc.or(tt, n))
            .map(|tt| Self(tt.0 & n.mask()))
    }

    /// Projection table of input `i`: row `x` is true iff bit `i` of `x` is
    /// set.
    ///
    /// # Panics
    ///
    /// If `i >= n`.
    pub fn input_var(i: u8, n: InputCount, endian: Endian) -> Self {
        assert!(i < n.get(), "input index {i} out of range for {n} inputs");
        let rows = (0..n.table_bits())
            .map(|x| (x >> i) & 1 == 1)
            .collect::<Vec<_>>();
        Self::from_assignments(&rows, endian)
    }

    /// Packs one output bit per input assignment into a table.
    ///
    /// # Panics
    ///
    /// If more than 64 rows are given.
    pub fn from_assignments(rows: &[bool], endian: Endian) -> Self {
        assert!(
            rows.len() <= u64::BITS as usize,
            "too many rows for a truth table: {}",
            rows.len()
        );
        let last = rows.len().saturating_sub(1);
        let value = rows
            .iter()
            .enumerate()
            .filter(|(_, set)| **set)
            .map(|(x, _)| match endian {
                Endian::Big => 1u64 << x,
                Endian::Little => 1u64 << (last - x),
            })
            .fold(0, |acc, bit| acc | bit);
        Self(value)
    }
}

impl From<TruthTable> for u64 {
    fn from(value: TruthTable) -> Self {
        value.0
    }
}

/// A truth table paired with its width, displayed as fixed-width binary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bits {
    value: u64,
    width: u32,
}

impl Bits {
    /// The table being rendered.
    pub const fn table(self) -> TruthTable {
        TruthTable(self.value)
    }

    /// Number of binary digits rendered.
    pub const fn width(self) -> u32 {
        self.width
    }
}

impl fmt::Display for Bits {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:0width$b}", self.value, width = self.width as usize)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(count: i64) -> InputCount {
        InputCount::new(count).unwrap()
    }

    #[test]
    fn test_mask_per_input_count() {
        for count in 2..=6 {
            let expected = if count == 6 {
                u64::MAX
            } else {
                (1u64 << (1u32 << count)) - 1
            };
            assert_eq!(n(count).mask(), expected);
        }
        assert_eq!(n(2).mask(), 0b1111);
        assert_eq!(n(3).mask(), 0xFF);
    }

    #[test]
    fn test_input_count_range() {
        assert!(InputCount::new(1).is_err());
        assert!(InputCount::new(7).is_err());
        assert!(InputCount::new(-2).is_err());
        assert_eq!(
            InputCount::new(0),
            Err(ValidationError::InvalidInputCount(0))
        );
    }

    #[test]
    fn test_check_rejects_values_above_mask() {
        assert_eq!(n(2).check(0b1111), Ok(TruthTable::new(0b1111)));
        assert!(matches!(
            n(2).check(0b1_0000),
            Err(ValidationError::InvalidTruthTable { mask: 0b1111, .. })
        ));
        assert!(n(6).check(u64::MAX).is_ok());
    }

    #[test]
    fn test_ops_stay_masked() {
        let w = n(2);
        let a = TruthTable::new(0b1010);
        let b = TruthTable::new(0b1100);
        assert_eq!(a.nand(b, w), TruthTable::new(0b0111));
        assert_eq!(a.negate(w), TruthTable::new(0b0101));
        assert_eq!(a.and(b, w), TruthTable::new(0b1000));
        assert_eq!(a.or(b, w), TruthTable::new(0b1110));
        assert_eq!(TruthTable::const_false().negate(w), TruthTable::const_true(w));
        assert_eq!(TruthTable::union([], w), None);
        assert_eq!(TruthTable::union([a, b], w), Some(TruthTable::new(0b1110)));
        assert_eq!(
            TruthTable::union([TruthTable::new(0x11)], w),
            Some(TruthTable::new(0b0001))
        );
    }

    #[test]
    fn test_nand_full_width() {
        let w = n(6);
        let zero = TruthTable::const_false();
        assert_eq!(zero.nand(zero, w), TruthTable::new(u64::MAX));
    }

    #[test]
    fn test_input_vars() {
        assert_eq!(TruthTable::input_var(0, n(2), Endian::Big).value(), 0b1010);
        assert_eq!(TruthTable::input_var(1, n(2), Endian::Big).value(), 0b1100);
        assert_eq!(TruthTable::input_var(0, n(2), Endian::Little).value(), 0b0101);
        assert_eq!(TruthTable::input_var(0, n(3), Endian::Big).value(), 0b1010_1010);
        assert_eq!(TruthTable::input_var(2, n(3), Endian::Big).value(), 0b1111_0000);
        assert_eq!(
            TruthTable::input_var(0, n(6), Endian::Big).value(),
            0xAAAA_AAAA_AAAA_AAAA
        );
    }

    #[test]
    fn test_bits_rendering() {
        assert_eq!(n(2).bits(TruthTable::new(0b0111)).to_string(), "0111");
        assert_eq!(n(3).bits(TruthTable::new(1)).to_string(), "00000001");
    }
}
