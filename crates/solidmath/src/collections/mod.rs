//! Collections indexed by strongly-typed integers.

#[macro_use]
pub mod generic_vec;

pub use generic_vec::{GenericVec, IndexNewtype, IndexOutOfRange, IndexOverflow};
