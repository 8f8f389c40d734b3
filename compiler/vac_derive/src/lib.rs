//! Synthesized `equals`/`hashCode` for value-aggregate declarations.
//!
//! A value-aggregate (annotation-like class) compares by content: two
//! instances are equal when they have the same type and every property is
//! equal. Array properties compare element-wise through a content primitive
//! that each backend registers per element category.
//!
//! # Architecture
//!
//! - [`plan`]: classifies each property as scalar, array content, or nested
//!   aggregate.
//! - [`ContractSynthesizer`]: builds the two bodies for one declaration.
//! - [`DependencyOrder`]: orders declarations so nested aggregates come first.
//! - [`SynthesisPass`]: runs the synthesizer over a whole module and attaches
//!   the contracts atomically.
//! - [`BodyInterpreter`]: executes synthesized bodies on constant values.
//!
//! The backend seam is [`ArrayContentStrategy`] plus an
//! [`ArrayPrimitiveRegistry`]; nothing else in a synthesized body is
//! target-specific.

mod error;
pub mod eval;
mod options;
pub mod order;
pub mod pass;
pub mod plan;
mod registry;
mod strategy;
mod synth;

#[cfg(test)]
mod test_helpers;

pub use error::{ErrorKind, SynthError};
pub use eval::{BodyInterpreter, EvalError, RtValue};
pub use options::SynthOptions;
pub use order::DependencyOrder;
pub use pass::{PassSummary, SynthesisPass};
pub use plan::{PlanCategory, PropertyClassifier, PropertyPlan};
pub use registry::{ArrayPrimitive, ArrayPrimitiveRegistry};
pub use strategy::ArrayContentStrategy;
pub use synth::{ContractSynthesizer, SynthContext};
