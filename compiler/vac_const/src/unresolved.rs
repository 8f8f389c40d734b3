//! Expressions the constant evaluator could not reduce.

use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use vac_ir::{Idx, Name};

use crate::ConstValue;

/// Payload of [`ConstValue::Intrinsic`].
///
/// The structured forms compare structurally. [`OpaqueExpr`] has no
/// structural equality and compares by identity; two opaque expressions
/// built separately are never content-equal even when they print the same.
#[derive(Clone, Debug)]
pub enum UnresolvedExpr {
    /// Reference to a symbol whose value is only known at link or run time.
    SymbolRef { symbol: Name, ty: Idx },
    /// Call the evaluator could not fold. Arguments are already evaluated.
    Call {
        callee: Name,
        ty: Idx,
        args: Arc<[ConstValue]>,
    },
    Opaque(OpaqueExpr),
}

impl UnresolvedExpr {
    pub fn call(callee: Name, ty: Idx, args: impl IntoIterator<Item = ConstValue>) -> Self {
        UnresolvedExpr::Call {
            callee,
            ty,
            args: args.into_iter().collect(),
        }
    }

    /// Type the expression produces.
    pub fn ty(&self) -> Idx {
        match self {
            UnresolvedExpr::SymbolRef { ty, .. } | UnresolvedExpr::Call { ty, .. } => *ty,
            UnresolvedExpr::Opaque(op) => op.ty(),
        }
    }

    pub(crate) fn content_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (
                UnresolvedExpr::SymbolRef { symbol: s1, ty: t1 },
                UnresolvedExpr::SymbolRef { symbol: s2, ty: t2 },
            ) => s1 == s2 && t1 == t2,
            (
                UnresolvedExpr::Call {
                    callee: c1,
                    ty: t1,
                    args: a1,
                },
                UnresolvedExpr::Call {
                    callee: c2,
                    ty: t2,
                    args: a2,
                },
            ) => {
                c1 == c2
                    && t1 == t2
                    && a1.len() == a2.len()
                    && a1.iter().zip(a2.iter()).all(|(x, y)| x.content_eq(y))
            }
            (UnresolvedExpr::Opaque(a), UnresolvedExpr::Opaque(b)) => a.same_node(b),
            _ => false,
        }
    }

    pub(crate) fn content_hash_into<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            UnresolvedExpr::SymbolRef { symbol, ty } => {
                symbol.hash(state);
                ty.hash(state);
            }
            UnresolvedExpr::Call { callee, ty, args } => {
                callee.hash(state);
                ty.hash(state);
                args.len().hash(state);
                for arg in args.iter() {
                    arg.content_hash().hash(state);
                }
            }
            UnresolvedExpr::Opaque(op) => op.identity().hash(state),
        }
    }
}

struct OpaqueNode {
    description: String,
    ty: Idx,
}

/// A backend-level expression with no structural equality.
///
/// Clones share the node and are equal to each other; separately built
/// nodes never are. Hashing uses the node address, so opaque values hash
/// differently from run to run.
#[derive(Clone)]
pub struct OpaqueExpr(Arc<OpaqueNode>);

impl OpaqueExpr {
    pub fn new(description: impl Into<String>, ty: Idx) -> Self {
        Self(Arc::new(OpaqueNode {
            description: description.into(),
            ty,
        }))
    }

    pub fn description(&self) -> &str {
        &self.0.description
    }

    pub fn ty(&self) -> Idx {
        self.0.ty
    }

    pub fn same_node(&self, other: &OpaqueExpr) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }

    fn identity(&self) -> usize {
        Arc::as_ptr(&self.0) as usize
    }
}

impl fmt::Debug for OpaqueExpr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("OpaqueExpr")
            .field(&self.0.description)
            .field(&self.0.ty)
            .finish()
    }
}
