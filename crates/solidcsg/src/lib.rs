//! Constructive solid geometry over implicit primitives: a memoizing set
//! algebra, adaptive box-tree models, and nearest-first ray casting.

mod config;
mod error;
pub mod field;
pub mod model;
pub mod raycast;
pub mod set;
mod slabmap;

pub use config::{ENV_PREFIX, KernelConfig};
pub use error::{KernelError, KernelResult};
pub use field::{Expr, Field, FieldKind, Operator, PrimitiveField, UnaryOp};
pub use model::{
    Decision, DecisionPolicy, Division, DivisionKind, MaxContentsPolicy, Model, ModelCursor,
    ModelNode, SetIndex, SetList,
};
pub use raycast::{Crossing, RayCast, RayHit, RayQuery, RootFinder, SortedIntervalList, Span};
pub use set::*;

/// Structs, traits, and constants.
pub mod prelude {
    pub use crate::field::*;
    pub use crate::model::*;
    pub use crate::raycast::*;
    pub use crate::set::*;
    pub use crate::{KernelConfig, KernelError, KernelResult};
}

#[cfg(test)]
mod tests;
