//! The backend seam of contract synthesis.

use vac_ir::{BodyBuilder, BodyExprId, CallShape, IntrinsicOp};

use crate::ArrayPrimitive;

/// Emits the expression that realizes array content equality or hashing on
/// one target.
///
/// Everything else in a synthesized body is target-neutral. Implementations
/// must be `Sync`: one strategy is shared by every synthesis worker.
pub trait ArrayContentStrategy: Sync {
    /// Short backend name for logs.
    fn backend_name(&self) -> &'static str;

    /// How the target passes array operands to its primitives.
    fn call_shape(&self) -> CallShape;

    /// `lhs` and `rhs` content-equal, as a `Boolean` expression.
    fn emit_content_equals(
        &self,
        builder: &mut BodyBuilder,
        primitive: ArrayPrimitive,
        lhs: BodyExprId,
        rhs: BodyExprId,
    ) -> BodyExprId {
        builder.primitive_call(
            primitive.symbol,
            IntrinsicOp::ArrayContentEquals,
            self.call_shape(),
            &[lhs, rhs],
        )
    }

    /// Content hash of `array`, as an `Int` expression.
    fn emit_content_hash(
        &self,
        builder: &mut BodyBuilder,
        primitive: ArrayPrimitive,
        array: BodyExprId,
    ) -> BodyExprId {
        builder.primitive_call(
            primitive.symbol,
            IntrinsicOp::ArrayContentHash,
            self.call_shape(),
            &[array],
        )
    }
}
