//! Contract synthesis for a single value-aggregate declaration.
//!
//! Produces the `equals`/`hashCode` pair as target-neutral body IR. The only
//! target-specific expressions are array content calls, which come from the
//! backend's [`ArrayContentStrategy`].
//!
//! # Generated shapes
//!
//! ```text
//! fun equals(other: Any?): Boolean {
//!     if (!(other is Decl)) return false
//!     if (!(<cmp p1>)) return false
//!     ...
//!     return true
//! }
//!
//! fun hashCode(): Int {
//!     var acc = SEED
//!     acc = acc * K + <hash p1>
//!     ...
//!     return acc
//! }
//! ```

mod equals;
mod hash;

use tracing::{debug, trace, warn};
use vac_ir::{
    DeclTable, ElementCategory, IntrinsicOp, MethodBody, Pool, StringInterner,
    SynthesizedContract, ValueAggregateDecl,
};

use crate::plan::{plan_declaration, PropertyClassifier, PropertyPlan};
use crate::{ArrayContentStrategy, ArrayPrimitive, ArrayPrimitiveRegistry, SynthError, SynthOptions};

/// Read-only compilation state shared by every synthesizer of a module.
#[derive(Copy, Clone)]
pub struct SynthContext<'a> {
    pub interner: &'a StringInterner,
    pub pool: &'a Pool,
    pub table: &'a DeclTable<'a>,
}

/// Builds contracts for the declarations of one module.
///
/// Holds a classification cache, so it is not `Sync`; the pass creates one
/// per worker.
pub struct ContractSynthesizer<'a> {
    classifier: PropertyClassifier<'a>,
    interner: &'a StringInterner,
    registry: &'a ArrayPrimitiveRegistry,
    strategy: &'a dyn ArrayContentStrategy,
    options: SynthOptions,
}

impl<'a> ContractSynthesizer<'a> {
    pub fn new(
        cx: SynthContext<'a>,
        registry: &'a ArrayPrimitiveRegistry,
        strategy: &'a dyn ArrayContentStrategy,
        options: SynthOptions,
    ) -> Self {
        Self {
            classifier: PropertyClassifier::new(cx.pool, cx.table),
            interner: cx.interner,
            registry,
            strategy,
            options,
        }
    }

    pub fn options(&self) -> &SynthOptions {
        &self.options
    }

    /// Plans for the flattened property list, in comparison order.
    pub fn plans(&self, decl: &ValueAggregateDecl) -> Result<Vec<PropertyPlan>, SynthError> {
        let plans = plan_declaration(&self.classifier, decl)?;
        for plan in &plans {
            trace!(
                declaration = %self.interner.lookup(decl.name),
                property = %self.interner.lookup(plan.property),
                category = ?plan.category,
                nullable = plan.nullable,
                "planned property"
            );
        }
        Ok(plans)
    }

    pub fn synthesize_equals_body(
        &self,
        decl: &ValueAggregateDecl,
    ) -> Result<MethodBody, SynthError> {
        let plans = self.plans(decl)?;
        self.build_equals(decl, &plans)
    }

    pub fn synthesize_hash_code_body(
        &self,
        decl: &ValueAggregateDecl,
    ) -> Result<MethodBody, SynthError> {
        let plans = self.plans(decl)?;
        self.build_hash_code(decl, &plans)
    }

    /// Both bodies, or an error and neither.
    pub fn synthesize(&self, decl: &ValueAggregateDecl) -> Result<SynthesizedContract, SynthError> {
        let plans = self.plans(decl)?;
        let equals = self.build_equals(decl, &plans)?;
        let hash_code = self.build_hash_code(decl, &plans)?;
        debug!(
            declaration = %self.interner.lookup(decl.name),
            properties = plans.len(),
            backend = self.strategy.backend_name(),
            "synthesized contract"
        );
        Ok(SynthesizedContract::new(equals, hash_code))
    }

    /// The registered primitive for an array property.
    fn array_primitive(
        &self,
        op: IntrinsicOp,
        category: ElementCategory,
        decl: &ValueAggregateDecl,
        plan: &PropertyPlan,
    ) -> Result<ArrayPrimitive, SynthError> {
        self.registry.lookup(op, category).ok_or_else(|| {
            warn!(
                declaration = %self.interner.lookup(decl.name),
                property = %self.interner.lookup(plan.property),
                %category,
                backend = self.strategy.backend_name(),
                "array content primitive not registered"
            );
            SynthError::MissingArrayPrimitive {
                category,
                op,
                declaration: decl.name,
                property: plan.property,
            }
        })
    }
}
