//! Frozen constant values and their content-equality/content-hash.

use std::hash::{Hash, Hasher};
use std::sync::Arc;

use rustc_hash::{FxHashMap, FxHasher};
use vac_ir::{Idx, Name};
use vac_stack::ensure_sufficient_stack;

use crate::{ScalarLiteral, UnresolvedExpr};

/// A fully built compile-time value.
///
/// `PartialEq`/`Eq`/`Hash` delegate to [`content_eq`](Self::content_eq) and
/// [`content_hash`](Self::content_hash), so values key hash maps by content.
/// Use [`same_instance`](Self::same_instance) for identity.
#[derive(Clone, Debug)]
pub enum ConstValue {
    Constant(ScalarLiteral),
    Aggregate(Arc<AggregateValue>),
    Array(Arc<ArrayValue>),
    Intrinsic(UnresolvedExpr),
}

/// A constructed object whose fields are constants.
#[derive(Debug)]
pub struct AggregateValue {
    pub(crate) constructed_type: Idx,
    /// Population order. Not significant for equality.
    pub(crate) fields: Vec<(Name, ConstValue)>,
    pub(crate) index: FxHashMap<Name, usize>,
}

/// A fixed-length array whose every element is populated.
#[derive(Debug)]
pub struct ArrayValue {
    pub(crate) element_type: Idx,
    pub(crate) elements: Vec<ConstValue>,
}

/// Variant tags mixed into every content hash.
#[derive(Clone, Copy, Hash)]
#[repr(u8)]
enum Tag {
    Constant = 0,
    Aggregate = 1,
    Array = 2,
    Intrinsic = 3,
}

impl ConstValue {
    // Leaf factories

    pub fn constant(literal: ScalarLiteral) -> Self {
        ConstValue::Constant(literal)
    }

    pub fn intrinsic(expression: UnresolvedExpr) -> Self {
        ConstValue::Intrinsic(expression)
    }

    pub fn int(value: i32) -> Self {
        ConstValue::Constant(ScalarLiteral::Int(value))
    }

    pub fn boolean(value: bool) -> Self {
        ConstValue::Constant(ScalarLiteral::Boolean(value))
    }

    pub fn string(value: Name) -> Self {
        ConstValue::Constant(ScalarLiteral::String(value))
    }

    pub fn null(ty: Idx) -> Self {
        ConstValue::Constant(ScalarLiteral::Null(ty))
    }

    /// A complete array from an element sequence.
    pub fn array(element_type: Idx, elements: impl IntoIterator<Item = ConstValue>) -> Self {
        ConstValue::Array(Arc::new(ArrayValue {
            element_type,
            elements: elements.into_iter().collect(),
        }))
    }

    // Accessors

    pub fn as_literal(&self) -> Option<&ScalarLiteral> {
        match self {
            ConstValue::Constant(lit) => Some(lit),
            _ => None,
        }
    }

    pub fn as_aggregate(&self) -> Option<&AggregateValue> {
        match self {
            ConstValue::Aggregate(agg) => Some(agg),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&ArrayValue> {
        match self {
            ConstValue::Array(arr) => Some(arr),
            _ => None,
        }
    }

    pub fn as_intrinsic(&self) -> Option<&UnresolvedExpr> {
        match self {
            ConstValue::Intrinsic(expr) => Some(expr),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ConstValue::Constant(lit) if lit.is_null())
    }

    /// Variant name for diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match self {
            ConstValue::Constant(_) => "constant",
            ConstValue::Aggregate(_) => "aggregate",
            ConstValue::Array(_) => "array",
            ConstValue::Intrinsic(_) => "intrinsic",
        }
    }

    fn tag(&self) -> Tag {
        match self {
            ConstValue::Constant(_) => Tag::Constant,
            ConstValue::Aggregate(_) => Tag::Aggregate,
            ConstValue::Array(_) => Tag::Array,
            ConstValue::Intrinsic(_) => Tag::Intrinsic,
        }
    }

    /// Identity: both handles point at the same node.
    ///
    /// Scalars have no identity and compare by content.
    pub fn same_instance(&self, other: &ConstValue) -> bool {
        match (self, other) {
            (ConstValue::Aggregate(a), ConstValue::Aggregate(b)) => Arc::ptr_eq(a, b),
            (ConstValue::Array(a), ConstValue::Array(b)) => Arc::ptr_eq(a, b),
            (
                ConstValue::Intrinsic(UnresolvedExpr::Opaque(a)),
                ConstValue::Intrinsic(UnresolvedExpr::Opaque(b)),
            ) => a.same_node(b),
            (ConstValue::Constant(a), ConstValue::Constant(b)) => a == b,
            _ => false,
        }
    }

    /// Structural content-equality.
    ///
    /// Mismatched variants are unequal.
    pub fn content_eq(&self, other: &ConstValue) -> bool {
        ensure_sufficient_stack(|| match (self, other) {
            (ConstValue::Constant(a), ConstValue::Constant(b)) => a == b,
            (ConstValue::Aggregate(a), ConstValue::Aggregate(b)) => {
                Arc::ptr_eq(a, b) || a.content_eq(b)
            }
            (ConstValue::Array(a), ConstValue::Array(b)) => Arc::ptr_eq(a, b) || a.content_eq(b),
            (ConstValue::Intrinsic(a), ConstValue::Intrinsic(b)) => a.content_eq(b),
            _ => false,
        })
    }

    /// Content hash consistent with [`content_eq`](Self::content_eq).
    ///
    /// Deterministic across runs for every tree without opaque intrinsics.
    /// Aggregate fields are combined order-independently; array elements in
    /// index order.
    pub fn content_hash(&self) -> u64 {
        ensure_sufficient_stack(|| {
            let mut h = FxHasher::default();
            self.tag().hash(&mut h);
            match self {
                ConstValue::Constant(lit) => lit.hash(&mut h),
                ConstValue::Aggregate(agg) => agg.hash_fields_into(&mut h),
                ConstValue::Array(arr) => {
                    arr.elements.len().hash(&mut h);
                    for elem in &arr.elements {
                        elem.content_hash().hash(&mut h);
                    }
                }
                ConstValue::Intrinsic(expr) => expr.content_hash_into(&mut h),
            }
            h.finish()
        })
    }
}

impl PartialEq for ConstValue {
    fn eq(&self, other: &Self) -> bool {
        self.content_eq(other)
    }
}

impl Eq for ConstValue {}

impl Hash for ConstValue {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_u64(self.content_hash());
    }
}

impl AggregateValue {
    /// The class this value is used as. May be a supertype of the class
    /// actually constructed when the value is boxed.
    pub fn constructed_type(&self) -> Idx {
        self.constructed_type
    }

    pub fn field(&self, name: Name) -> Option<&ConstValue> {
        self.index.get(&name).map(|&i| &self.fields[i].1)
    }

    /// Fields in population order.
    pub fn fields(&self) -> impl ExactSizeIterator<Item = (Name, &ConstValue)> {
        self.fields.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    fn content_eq(&self, other: &AggregateValue) -> bool {
        self.constructed_type == other.constructed_type
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(name, value)| other.field(*name).is_some_and(|o| value.content_eq(o)))
    }

    fn hash_fields_into(&self, h: &mut FxHasher) {
        self.constructed_type.hash(h);
        self.fields.len().hash(h);
        // Wrapping sum of per-field hashes: independent of population order.
        let mut combined: u64 = 0;
        for (name, value) in &self.fields {
            let mut fh = FxHasher::default();
            name.hash(&mut fh);
            value.content_hash().hash(&mut fh);
            combined = combined.wrapping_add(fh.finish());
        }
        combined.hash(h);
    }
}

impl ArrayValue {
    pub fn element_type(&self) -> Idx {
        self.element_type
    }

    pub fn declared_length(&self) -> usize {
        self.elements.len()
    }

    pub fn get(&self, index: usize) -> Option<&ConstValue> {
        self.elements.get(index)
    }

    pub fn elements(&self) -> &[ConstValue] {
        &self.elements
    }

    fn content_eq(&self, other: &ArrayValue) -> bool {
        self.elements.len() == other.elements.len()
            && self
                .elements
                .iter()
                .zip(&other.elements)
                .all(|(a, b)| a.content_eq(b))
    }
}
