//! Backend-registered array content primitives.

use rustc_hash::FxHashMap;
use vac_ir::{ElementCategory, IntrinsicOp, Name};

/// A backend function realizing element-wise array equality or hashing.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct ArrayPrimitive {
    pub symbol: Name,
}

impl ArrayPrimitive {
    pub fn new(symbol: Name) -> Self {
        Self { symbol }
    }
}

/// Content primitives keyed by exact element category.
///
/// Primitive-element arrays are looked up by their own kind; every
/// reference-element array shares the single [`ElementCategory::Reference`]
/// entry.
#[derive(Clone, Debug, Default)]
pub struct ArrayPrimitiveRegistry {
    equals: FxHashMap<ElementCategory, ArrayPrimitive>,
    hash: FxHashMap<ElementCategory, ArrayPrimitive>,
}

impl ArrayPrimitiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the content-equals primitive for `category`, returning the
    /// one it replaces.
    pub fn register_array_content_equals(
        &mut self,
        category: ElementCategory,
        primitive: ArrayPrimitive,
    ) -> Option<ArrayPrimitive> {
        self.equals.insert(category, primitive)
    }

    /// Register the content-hash primitive for `category`, returning the one
    /// it replaces.
    pub fn register_array_content_hash(
        &mut self,
        category: ElementCategory,
        primitive: ArrayPrimitive,
    ) -> Option<ArrayPrimitive> {
        self.hash.insert(category, primitive)
    }

    pub fn lookup(&self, op: IntrinsicOp, category: ElementCategory) -> Option<ArrayPrimitive> {
        match op {
            IntrinsicOp::ArrayContentEquals => self.equals.get(&category).copied(),
            IntrinsicOp::ArrayContentHash => self.hash.get(&category).copied(),
        }
    }

    pub fn content_equals(&self, category: ElementCategory) -> Option<ArrayPrimitive> {
        self.lookup(IntrinsicOp::ArrayContentEquals, category)
    }

    pub fn content_hash(&self, category: ElementCategory) -> Option<ArrayPrimitive> {
        self.lookup(IntrinsicOp::ArrayContentHash, category)
    }

    /// Total registrations over both operations.
    pub fn len(&self) -> usize {
        self.equals.len() + self.hash.len()
    }

    pub fn is_empty(&self) -> bool {
        self.equals.is_empty() && self.hash.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use vac_ir::{PrimitiveKind, StringInterner};

    use super::*;

    #[test]
    fn lookup_is_per_exact_category() {
        let interner = StringInterner::new();
        let mut registry = ArrayPrimitiveRegistry::new();
        let int_eq = ArrayPrimitive::new(interner.intern("IntArray.contentEquals"));
        registry.register_array_content_equals(
            ElementCategory::Primitive(PrimitiveKind::Int),
            int_eq,
        );

        assert_eq!(
            registry.content_equals(ElementCategory::Primitive(PrimitiveKind::Int)),
            Some(int_eq)
        );
        assert_eq!(
            registry.content_equals(ElementCategory::Primitive(PrimitiveKind::Long)),
            None
        );
        assert_eq!(registry.content_equals(ElementCategory::Reference), None);
        assert_eq!(
            registry.content_hash(ElementCategory::Primitive(PrimitiveKind::Int)),
            None
        );
    }

    #[test]
    fn reregistration_replaces() {
        let interner = StringInterner::new();
        let mut registry = ArrayPrimitiveRegistry::new();
        let first = ArrayPrimitive::new(interner.intern("first"));
        let second = ArrayPrimitive::new(interner.intern("second"));

        assert_eq!(
            registry.register_array_content_hash(ElementCategory::Reference, first),
            None
        );
        assert_eq!(
            registry.register_array_content_hash(ElementCategory::Reference, second),
            Some(first)
        );
        assert_eq!(registry.content_hash(ElementCategory::Reference), Some(second));
        assert_eq!(registry.len(), 1);
    }
}
