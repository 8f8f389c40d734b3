//! Compile-time constant value trees.
//!
//! The constant evaluator reduces annotation arguments and static
//! initializers to a [`ConstValue`]: a tree of scalar literals, constructed
//! aggregates, fixed-length arrays, and intrinsic expressions it could not
//! reduce further. Later phases compare and deduplicate these trees by
//! content, never by reference.
//!
//! # Two-phase construction
//!
//! Containers are populated incrementally through [`AggregateBuilder`] and
//! [`ArrayBuilder`], then frozen into a [`ConstValue`] by `finish()`. Only
//! frozen values answer [`content_eq`](ConstValue::content_eq) and
//! [`content_hash`](ConstValue::content_hash), so a half-built tree can never
//! be compared. Frozen values share their children behind `Arc` and are
//! `Send + Sync`; [`ConstCache`] deduplicates them across threads.
//!
//! # Equality
//!
//! | Variant | Content-equal when |
//! |---|---|
//! | `Constant` | literals are equal (floats by bit pattern) |
//! | `Aggregate` | same constructed type, same field set, fields content-equal |
//! | `Array` | same length, elements content-equal index by index |
//! | `Intrinsic` | expressions structurally equal; opaque ones only to themselves |
//!
//! Values of different variants are never equal.

mod builder;
mod cache;
mod display;
mod literal;
mod unresolved;
mod value;

pub use builder::{AggregateBuilder, ArrayBuilder, ConstError};
pub use cache::ConstCache;
pub use display::ConstDisplay;
pub use literal::ScalarLiteral;
pub use unresolved::{OpaqueExpr, UnresolvedExpr};
pub use value::{AggregateValue, ArrayValue, ConstValue};
