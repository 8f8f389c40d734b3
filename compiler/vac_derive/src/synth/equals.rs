//! `equals(other)`: type guard, then short-circuit per-property comparison.

use vac_ir::{
    BinaryOp, BodyBuilder, BodyExprId, IntrinsicOp, MethodBody, MethodKind, ParamRole, Stmt,
    ValueAggregateDecl,
};

use super::ContractSynthesizer;
use crate::plan::{PlanCategory, PropertyPlan};
use crate::SynthError;

impl ContractSynthesizer<'_> {
    pub(super) fn build_equals(
        &self,
        decl: &ValueAggregateDecl,
        plans: &[PropertyPlan],
    ) -> Result<MethodBody, SynthError> {
        let mut b = BodyBuilder::new(MethodKind::Equals);
        let this = b.param(ParamRole::This);
        let other = b.param(ParamRole::Other);
        let unequal = b.bool(false);

        let is_same_type = b.is_instance(other, decl.ty);
        let not_same_type = b.not(is_same_type);
        b.emit(Stmt::ReturnIf {
            cond: not_same_type,
            value: unequal,
        });

        for plan in plans {
            let lhs = b.get_property(this, plan.property, plan.declared_ty);
            let rhs = b.get_property(other, plan.property, plan.declared_ty);
            let cmp = self.compare_non_null(&mut b, decl, plan, lhs, rhs)?;
            let cmp = if plan.nullable {
                null_safe_compare(&mut b, lhs, rhs, cmp)
            } else {
                cmp
            };
            let mismatch = b.not(cmp);
            b.emit(Stmt::ReturnIf {
                cond: mismatch,
                value: unequal,
            });
        }

        let equal = b.bool(true);
        b.emit(Stmt::Return(equal));
        Ok(b.finish())
    }

    fn compare_non_null(
        &self,
        b: &mut BodyBuilder,
        decl: &ValueAggregateDecl,
        plan: &PropertyPlan,
        lhs: BodyExprId,
        rhs: BodyExprId,
    ) -> Result<BodyExprId, SynthError> {
        match plan.category {
            PlanCategory::Scalar => Ok(b.binary(BinaryOp::Eq, lhs, rhs)),
            PlanCategory::ArrayContent(category) => {
                let primitive =
                    self.array_primitive(IntrinsicOp::ArrayContentEquals, category, decl, plan)?;
                Ok(self.strategy.emit_content_equals(b, primitive, lhs, rhs))
            }
            PlanCategory::NestedAggregate(owner) => {
                Ok(b.contract_call(owner, MethodKind::Equals, lhs, &[rhs]))
            }
        }
    }
}

/// `if (lhs == null) rhs == null else if (rhs == null) false else cmp`
fn null_safe_compare(
    b: &mut BodyBuilder,
    lhs: BodyExprId,
    rhs: BodyExprId,
    cmp: BodyExprId,
) -> BodyExprId {
    let lhs_null = b.is_null(lhs);
    let rhs_null = b.is_null(rhs);
    let unequal = b.bool(false);
    let both_present = b.if_else(rhs_null, unequal, cmp);
    b.if_else(lhs_null, rhs_null, both_present)
}
