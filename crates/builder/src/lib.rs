//! Content-addressed construction of circuit descriptions.
//!
//! Converters from other circuit formats build through [`CircuitBuilder`],
//! which computes every gate's truth table itself, so the descriptions it
//! produces pass validation unmodified.
//!
//! ```
//! use tcsol_builder::CircuitBuilder;
//! use tcsol_types::{Endian, InputCount};
//!
//! let mut b = CircuitBuilder::new(InputCount::new(2).unwrap());
//! let x = b.input(0, Endian::Big).unwrap();
//! let y = b.input(1, Endian::Big).unwrap();
//! let either = b.get_or([x, y]);
//! assert_eq!(either.value(), 0b1110);
//! assert_eq!(b.get_or([y, x]), either);
//! assert_eq!(b.gates().len(), 1);
//! ```

mod builder;

pub use builder::*;

#[cfg(test)]
use {tcsol_verify as _, tracing_subscriber as _};
