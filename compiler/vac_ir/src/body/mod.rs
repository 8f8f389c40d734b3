//! Target-neutral IR for synthesized method bodies.
//!
//! A [`MethodBody`] is a short statement list over an expression arena.
//! Expressions refer to each other by [`BodyExprId`], and an id may be used by
//! more than one parent (property loads are shared between a null check and
//! the comparison that follows it). Every expression is pure, so sharing never
//! changes meaning.
//!
//! Backends lower this IR into their own representation; the only
//! target-specific node is [`BodyExpr::PrimitiveCall`], whose symbol and
//! [`CallShape`] come from the backend adapter.
//!
//! # Architecture
//!
//! - [`BodyBuilder`]: owns the in-progress body and hands out ids.
//! - [`MethodBody`]: the finished, immutable body.
//! - [`SynthesizedContract`]: the `equals`/`hashCode` pair attached to a
//!   value-aggregate declaration.

mod render;

use smallvec::SmallVec;

use crate::{Idx, Name};

/// Index of an expression in a [`MethodBody`]'s arena.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct BodyExprId(u32);

impl BodyExprId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// A mutable local slot inside a method body.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
#[repr(transparent)]
pub struct LocalId(u32);

impl LocalId {
    #[inline]
    pub fn new(raw: u32) -> Self {
        Self(raw)
    }

    #[inline]
    pub fn raw(self) -> u32 {
        self.0
    }

    #[inline]
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

/// Which synthesized member a body implements.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum MethodKind {
    /// `equals(other): Boolean`
    Equals,
    /// `hashCode(): Int`
    HashCode,
}

impl MethodKind {
    pub fn method_name(self) -> &'static str {
        match self {
            MethodKind::Equals => "equals",
            MethodKind::HashCode => "hashCode",
        }
    }

    /// Parameters visible in a body of this kind.
    pub fn params(self) -> &'static [ParamRole] {
        match self {
            MethodKind::Equals => &[ParamRole::This, ParamRole::Other],
            MethodKind::HashCode => &[ParamRole::This],
        }
    }
}

/// Implicit parameters of a synthesized member.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum ParamRole {
    This,
    Other,
}

/// Binary operators on scalar operands.
///
/// `Add` and `Mul` are 32-bit wrapping integer arithmetic.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BinaryOp {
    /// Native equality of two scalars of the same primitive category.
    Eq,
    Add,
    Mul,
}

/// Meaning of a backend primitive, independent of its spelling.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum IntrinsicOp {
    /// `(a, b) -> Boolean`, element-wise.
    ArrayContentEquals,
    /// `(a) -> Int`, element-wise fold.
    ArrayContentHash,
}

/// How a primitive call passes its operands.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum CallShape {
    /// First argument is the receiver: `a.contentEquals(b)`.
    Extension,
    /// All operands are plain arguments: `equals(a, b)`.
    Static,
}

/// An expression node.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyExpr {
    Param(ParamRole),
    Local(LocalId),
    Bool(bool),
    Int(i32),
    Not(BodyExprId),
    IsNull(BodyExprId),
    /// Runtime type test against the declaration's own type.
    IsInstance { value: BodyExprId, ty: Idx },
    GetProperty {
        receiver: BodyExprId,
        property: Name,
        ty: Idx,
    },
    Binary {
        op: BinaryOp,
        lhs: BodyExprId,
        rhs: BodyExprId,
    },
    If {
        cond: BodyExprId,
        then_value: BodyExprId,
        else_value: BodyExprId,
    },
    /// Native hash of a scalar of type `ty`.
    ScalarHash { operand: BodyExprId, ty: Idx },
    /// Call of another aggregate's synthesized member.
    ContractCall {
        owner: Name,
        method: MethodKind,
        receiver: BodyExprId,
        args: SmallVec<[BodyExprId; 1]>,
    },
    /// Call of a backend-registered primitive.
    PrimitiveCall {
        symbol: Name,
        op: IntrinsicOp,
        shape: CallShape,
        args: SmallVec<[BodyExprId; 2]>,
    },
    /// Constructor call. Opaque to synthesis; only found in bodies the front
    /// end wrote.
    New {
        class: Name,
        args: SmallVec<[BodyExprId; 4]>,
    },
}

/// A statement.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub enum Stmt {
    /// `if (cond) return value`
    ReturnIf { cond: BodyExprId, value: BodyExprId },
    /// `var local = init`
    Let { local: LocalId, init: BodyExprId },
    /// `local = value`
    Assign { local: LocalId, value: BodyExprId },
    Return(BodyExprId),
}

/// A finished method body.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct MethodBody {
    kind: MethodKind,
    exprs: Vec<BodyExpr>,
    stmts: Vec<Stmt>,
    local_count: u32,
}

impl MethodBody {
    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// Look up an expression. `None` only for ids from another body.
    pub fn get(&self, id: BodyExprId) -> Option<&BodyExpr> {
        self.exprs.get(id.index())
    }

    pub fn exprs(&self) -> &[BodyExpr] {
        &self.exprs
    }

    pub fn stmts(&self) -> &[Stmt] {
        &self.stmts
    }

    pub fn local_count(&self) -> u32 {
        self.local_count
    }

    /// Iterate over the primitive calls in this body.
    pub fn primitive_calls(&self) -> impl Iterator<Item = (Name, IntrinsicOp, CallShape)> + '_ {
        self.exprs.iter().filter_map(|e| match e {
            BodyExpr::PrimitiveCall {
                symbol, op, shape, ..
            } => Some((*symbol, *op, *shape)),
            _ => None,
        })
    }
}

/// The synthesized `equals`/`hashCode` pair of one declaration.
///
/// Constructed only with both bodies present, so a declaration can never
/// carry half a contract.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "cache", derive(serde::Serialize, serde::Deserialize))]
pub struct SynthesizedContract {
    pub equals: MethodBody,
    pub hash_code: MethodBody,
}

impl SynthesizedContract {
    pub fn new(equals: MethodBody, hash_code: MethodBody) -> Self {
        debug_assert_eq!(equals.kind(), MethodKind::Equals);
        debug_assert_eq!(hash_code.kind(), MethodKind::HashCode);
        Self { equals, hash_code }
    }

    pub fn body(&self, kind: MethodKind) -> &MethodBody {
        match kind {
            MethodKind::Equals => &self.equals,
            MethodKind::HashCode => &self.hash_code,
        }
    }
}

/// Builder for an in-progress method body.
///
/// Follows the same "allocate node, get id" pattern as the rest of the
/// compiler's IR builders. Consumed by [`finish`](BodyBuilder::finish).
pub struct BodyBuilder {
    kind: MethodKind,
    exprs: Vec<BodyExpr>,
    stmts: Vec<Stmt>,
    next_local: u32,
}

impl BodyBuilder {
    pub fn new(kind: MethodKind) -> Self {
        Self {
            kind,
            exprs: Vec::new(),
            stmts: Vec::new(),
            next_local: 0,
        }
    }

    pub fn kind(&self) -> MethodKind {
        self.kind
    }

    /// Allocate an expression node.
    #[expect(
        clippy::cast_possible_truncation,
        reason = "synthesized bodies never approach u32::MAX nodes"
    )]
    pub fn push(&mut self, expr: BodyExpr) -> BodyExprId {
        let id = BodyExprId::new(self.exprs.len() as u32);
        self.exprs.push(expr);
        id
    }

    pub fn emit(&mut self, stmt: Stmt) {
        self.stmts.push(stmt);
    }

    pub fn fresh_local(&mut self) -> LocalId {
        let id = LocalId::new(self.next_local);
        self.next_local += 1;
        id
    }

    // Expression shorthands

    pub fn param(&mut self, role: ParamRole) -> BodyExprId {
        debug_assert!(
            self.kind.params().contains(&role),
            "{role:?} is not a parameter of {}",
            self.kind.method_name()
        );
        self.push(BodyExpr::Param(role))
    }

    pub fn local(&mut self, local: LocalId) -> BodyExprId {
        self.push(BodyExpr::Local(local))
    }

    pub fn bool(&mut self, value: bool) -> BodyExprId {
        self.push(BodyExpr::Bool(value))
    }

    pub fn int(&mut self, value: i32) -> BodyExprId {
        self.push(BodyExpr::Int(value))
    }

    pub fn not(&mut self, operand: BodyExprId) -> BodyExprId {
        self.push(BodyExpr::Not(operand))
    }

    pub fn is_null(&mut self, operand: BodyExprId) -> BodyExprId {
        self.push(BodyExpr::IsNull(operand))
    }

    pub fn is_instance(&mut self, value: BodyExprId, ty: Idx) -> BodyExprId {
        self.push(BodyExpr::IsInstance { value, ty })
    }

    pub fn get_property(&mut self, receiver: BodyExprId, property: Name, ty: Idx) -> BodyExprId {
        self.push(BodyExpr::GetProperty {
            receiver,
            property,
            ty,
        })
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: BodyExprId, rhs: BodyExprId) -> BodyExprId {
        self.push(BodyExpr::Binary { op, lhs, rhs })
    }

    pub fn if_else(
        &mut self,
        cond: BodyExprId,
        then_value: BodyExprId,
        else_value: BodyExprId,
    ) -> BodyExprId {
        self.push(BodyExpr::If {
            cond,
            then_value,
            else_value,
        })
    }

    pub fn scalar_hash(&mut self, operand: BodyExprId, ty: Idx) -> BodyExprId {
        self.push(BodyExpr::ScalarHash { operand, ty })
    }

    pub fn contract_call(
        &mut self,
        owner: Name,
        method: MethodKind,
        receiver: BodyExprId,
        args: &[BodyExprId],
    ) -> BodyExprId {
        self.push(BodyExpr::ContractCall {
            owner,
            method,
            receiver,
            args: SmallVec::from_slice(args),
        })
    }

    pub fn primitive_call(
        &mut self,
        symbol: Name,
        op: IntrinsicOp,
        shape: CallShape,
        args: &[BodyExprId],
    ) -> BodyExprId {
        self.push(BodyExpr::PrimitiveCall {
            symbol,
            op,
            shape,
            args: SmallVec::from_slice(args),
        })
    }

    pub fn new_object(&mut self, class: Name, args: &[BodyExprId]) -> BodyExprId {
        self.push(BodyExpr::New {
            class,
            args: SmallVec::from_slice(args),
        })
    }

    pub fn finish(self) -> MethodBody {
        MethodBody {
            kind: self.kind,
            exprs: self.exprs,
            stmts: self.stmts,
            local_count: self.next_local,
        }
    }
}
