//! Per-property equality plans.
//!
//! Decides, for each property of a value-aggregate, how its values are
//! compared and hashed: natively (`Scalar`), through a backend content
//! primitive (`ArrayContent`), or through another declaration's synthesized
//! contract (`NestedAggregate`).

use std::cell::RefCell;

use rustc_hash::FxHashMap;
use vac_ir::{DeclTable, ElementCategory, Idx, Name, Pool, Property, TypeData, ValueAggregateDecl};

use crate::SynthError;

/// How a property's values are compared.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum PlanCategory {
    /// Native equality and native hash.
    Scalar,
    /// Backend content primitive for the element category.
    ArrayContent(ElementCategory),
    /// The named declaration's synthesized `equals`/`hashCode`.
    NestedAggregate(Name),
}

/// The comparison plan for one property.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct PropertyPlan {
    pub property: Name,
    /// Declared type, nullability included.
    pub declared_ty: Idx,
    /// Declared type with nullability stripped.
    pub ty: Idx,
    pub category: PlanCategory,
    /// Wrap the comparison in a null guard.
    pub nullable: bool,
}

/// Classifies types into plan categories.
///
/// Wraps the type pool and the module's declaration table with a
/// classification cache. Uses `RefCell` because classification takes `&self`;
/// parallel synthesis gives every worker its own classifier.
pub struct PropertyClassifier<'a> {
    pool: &'a Pool,
    table: &'a DeclTable<'a>,
    cache: RefCell<FxHashMap<Idx, Option<PlanCategory>>>,
}

impl<'a> PropertyClassifier<'a> {
    pub fn new(pool: &'a Pool, table: &'a DeclTable<'a>) -> Self {
        Self {
            pool,
            table,
            cache: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn pool(&self) -> &'a Pool {
        self.pool
    }

    pub fn table(&self) -> &'a DeclTable<'a> {
        self.table
    }

    /// Category of a non-null type, or `None` when it cannot be classified.
    pub fn classify(&self, ty: Idx) -> Option<PlanCategory> {
        if ty.is_none() {
            return None;
        }
        if let Some(&cached) = self.cache.borrow().get(&ty) {
            return cached;
        }
        let result = self.classify_uncached(ty);
        self.cache.borrow_mut().insert(ty, result);
        result
    }

    fn classify_uncached(&self, ty: Idx) -> Option<PlanCategory> {
        match self.pool.data(ty)? {
            TypeData::Primitive(_) | TypeData::String | TypeData::Any | TypeData::Enum(_) => {
                Some(PlanCategory::Scalar)
            }
            TypeData::PrimitiveArray(_) | TypeData::Array(_) => self
                .pool
                .element_category(ty)
                .map(PlanCategory::ArrayContent),
            // Plain classes compare with their own equals/hashCode.
            TypeData::Class(_) => Some(
                self.table
                    .aggregate_for_type(self.pool, ty)
                    .map_or(PlanCategory::Scalar, |decl| {
                        PlanCategory::NestedAggregate(decl.name)
                    }),
            ),
            // Plans are computed on non-null types.
            TypeData::Nullable(inner) => self.classify(inner),
            TypeData::Unit | TypeData::Error => None,
        }
    }

    /// Number of cached classifications.
    pub fn cache_len(&self) -> usize {
        self.cache.borrow().len()
    }
}

/// Plan one property of `decl`.
pub fn plan_property(
    classifier: &PropertyClassifier<'_>,
    decl: &ValueAggregateDecl,
    property: &Property,
) -> Result<PropertyPlan, SynthError> {
    let pool = classifier.pool();
    let nullable = pool.is_nullable(property.ty);
    let ty = pool.non_null(property.ty);

    let category = classifier
        .classify(ty)
        .ok_or(SynthError::UnclassifiableType {
            declaration: decl.name,
            property: property.name,
            ty: property.ty,
        })?;

    let is_array = matches!(category, PlanCategory::ArrayContent(_));
    if is_array != property.is_array {
        return Err(SynthError::ArrayFlagMismatch {
            declaration: decl.name,
            property: property.name,
            ty: property.ty,
        });
    }

    Ok(PropertyPlan {
        property: property.name,
        declared_ty: property.ty,
        ty,
        category,
        nullable,
    })
}

/// Plans for the flattened property list of `decl`, in comparison order.
pub fn plan_declaration(
    classifier: &PropertyClassifier<'_>,
    decl: &ValueAggregateDecl,
) -> Result<Vec<PropertyPlan>, SynthError> {
    classifier
        .table()
        .flattened_properties(decl)?
        .iter()
        .map(|property| plan_property(classifier, decl, property))
        .collect()
}
