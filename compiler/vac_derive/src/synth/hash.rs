//! `hashCode()`: polynomial fold over the per-property hashes.

use vac_ir::{
    BinaryOp, BodyBuilder, BodyExprId, IntrinsicOp, MethodBody, MethodKind, ParamRole, Stmt,
    ValueAggregateDecl,
};

use super::ContractSynthesizer;
use crate::plan::{PlanCategory, PropertyPlan};
use crate::SynthError;

impl ContractSynthesizer<'_> {
    pub(super) fn build_hash_code(
        &self,
        decl: &ValueAggregateDecl,
        plans: &[PropertyPlan],
    ) -> Result<MethodBody, SynthError> {
        let mut b = BodyBuilder::new(MethodKind::HashCode);
        let this = b.param(ParamRole::This);

        let acc = b.fresh_local();
        let seed = b.int(self.options.hash_seed);
        b.emit(Stmt::Let {
            local: acc,
            init: seed,
        });
        let multiplier = b.int(self.options.hash_multiplier);

        for plan in plans {
            let value = b.get_property(this, plan.property, plan.declared_ty);
            let hash = self.hash_non_null(&mut b, decl, plan, value)?;
            let hash = if plan.nullable {
                let is_null = b.is_null(value);
                let zero = b.int(0);
                b.if_else(is_null, zero, hash)
            } else {
                hash
            };
            let current = b.local(acc);
            let scaled = b.binary(BinaryOp::Mul, current, multiplier);
            let next = b.binary(BinaryOp::Add, scaled, hash);
            b.emit(Stmt::Assign {
                local: acc,
                value: next,
            });
        }

        let result = b.local(acc);
        b.emit(Stmt::Return(result));
        Ok(b.finish())
    }

    fn hash_non_null(
        &self,
        b: &mut BodyBuilder,
        decl: &ValueAggregateDecl,
        plan: &PropertyPlan,
        value: BodyExprId,
    ) -> Result<BodyExprId, SynthError> {
        match plan.category {
            PlanCategory::Scalar => Ok(b.scalar_hash(value, plan.ty)),
            PlanCategory::ArrayContent(category) => {
                let primitive =
                    self.array_primitive(IntrinsicOp::ArrayContentHash, category, decl, plan)?;
                Ok(self.strategy.emit_content_hash(b, primitive, value))
            }
            PlanCategory::NestedAggregate(owner) => {
                Ok(b.contract_call(owner, MethodKind::HashCode, value, &[]))
            }
        }
    }
}
