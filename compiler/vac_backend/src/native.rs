//! Native: runtime entry points, one per element category.

use vac_derive::{ArrayContentStrategy, ArrayPrimitive, ArrayPrimitiveRegistry};
use vac_ir::{CallShape, ElementCategory, StringInterner};

use crate::{element_categories, TargetBackend};

/// `Kotlin_<Kind>Array_contentEquals` and `Kotlin_<Kind>Array_contentHashCode`
/// from the runtime library, called with plain arguments.
#[derive(Copy, Clone, Debug, Default)]
pub struct NativeBackend;

impl NativeBackend {
    /// Runtime symbol for `operation` on arrays of `category`.
    pub fn runtime_symbol(category: ElementCategory, operation: &str) -> String {
        format!("Kotlin_{category}_{operation}")
    }
}

impl ArrayContentStrategy for NativeBackend {
    fn backend_name(&self) -> &'static str {
        "native"
    }

    fn call_shape(&self) -> CallShape {
        CallShape::Static
    }
}

impl TargetBackend for NativeBackend {
    fn register_primitives(&self, interner: &StringInterner, registry: &mut ArrayPrimitiveRegistry) {
        for category in element_categories() {
            let equals = Self::runtime_symbol(category, "contentEquals");
            let hash = Self::runtime_symbol(category, "contentHashCode");
            registry.register_array_content_equals(
                category,
                ArrayPrimitive::new(interner.intern(&equals)),
            );
            registry.register_array_content_hash(
                category,
                ArrayPrimitive::new(interner.intern(&hash)),
            );
        }
    }
}
