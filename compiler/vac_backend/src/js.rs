//! JS: stdlib extension functions, receiver first.

use vac_derive::{ArrayContentStrategy, ArrayPrimitive, ArrayPrimitiveRegistry};
use vac_ir::{CallShape, ElementCategory, StringInterner};

use crate::{element_categories, TargetBackend};

/// `kotlin.collections` `contentEquals`/`contentHashCode` overloads.
///
/// Every primitive array type has its own overload; the single `Array<T>`
/// overload serves all reference-element arrays.
#[derive(Copy, Clone, Debug, Default)]
pub struct JsBackend;

impl JsBackend {
    /// Receiver-qualified symbol of the `operation` overload for `category`.
    pub fn overload_symbol(category: ElementCategory, operation: &str) -> String {
        format!("kotlin.collections.{category}.{operation}")
    }
}

impl ArrayContentStrategy for JsBackend {
    fn backend_name(&self) -> &'static str {
        "js"
    }

    fn call_shape(&self) -> CallShape {
        CallShape::Extension
    }
}

impl TargetBackend for JsBackend {
    fn register_primitives(&self, interner: &StringInterner, registry: &mut ArrayPrimitiveRegistry) {
        for category in element_categories() {
            let equals = Self::overload_symbol(category, "contentEquals");
            let hash = Self::overload_symbol(category, "contentHashCode");
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
