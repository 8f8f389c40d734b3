//! Shared IR for value-aggregate contract synthesis.
//!
//! This crate holds the data every other `vac_*` crate agrees on:
//! - [`Name`] and [`StringInterner`] for interned identifiers
//! - [`Idx`] and [`Pool`] for resolved types
//! - [`ValueAggregateDecl`] and [`Module`] for the front end's declarations
//! - [`MethodBody`] and [`SynthesizedContract`] for generated `equals`/`hashCode`
//!
//! # Design Philosophy
//!
//! - **Intern Everything**: identifiers are `Name(u32)`, types are `Idx(u32)`
//! - **Flatten Everything**: body expressions live in a per-body arena and
//!   refer to each other by [`BodyExprId`]
//! - Backends never see front-end structures, only the body IR

pub mod body;
pub mod decl;
mod interner;
mod name;
pub mod types;

pub use body::{
    BinaryOp, BodyBuilder, BodyExpr, BodyExprId, CallShape, IntrinsicOp, LocalId, MethodBody,
    MethodKind, ParamRole, Stmt, SynthesizedContract,
};
pub use decl::{
    ClassDecl, DeclError, DeclTable, Declaration, Module, Property, ValueAggregateDecl,
};
pub use interner::{InternError, StringInterner};
pub use name::Name;
pub use types::{ElementCategory, Idx, Pool, PrimitiveKind, TypeData, TypeFlags};
