//! JVM: static `java.util.Arrays` methods.

use vac_derive::{ArrayContentStrategy, ArrayPrimitive, ArrayPrimitiveRegistry};
use vac_ir::{CallShape, ElementCategory, PrimitiveKind, StringInterner};

use crate::{element_categories, TargetBackend};

/// `java.util.Arrays.equals(a, b)` and `java.util.Arrays.hashCode(a)`.
///
/// Symbols carry the method descriptor of the overload, so `int[]` and
/// `Object[]` comparisons resolve to different methods.
#[derive(Copy, Clone, Debug, Default)]
pub struct JvmBackend;

impl JvmBackend {
    /// Field descriptor of the array type for `category`.
    pub fn array_descriptor(category: ElementCategory) -> &'static str {
        match category {
            ElementCategory::Primitive(PrimitiveKind::Boolean) => "[Z",
            ElementCategory::Primitive(PrimitiveKind::Byte) => "[B",
            ElementCategory::Primitive(PrimitiveKind::Short) => "[S",
            ElementCategory::Primitive(PrimitiveKind::Char) => "[C",
            ElementCategory::Primitive(PrimitiveKind::Int) => "[I",
            ElementCategory::Primitive(PrimitiveKind::Long) => "[J",
            ElementCategory::Primitive(PrimitiveKind::Float) => "[F",
            ElementCategory::Primitive(PrimitiveKind::Double) => "[D",
            ElementCategory::Reference => "[Ljava/lang/Object;",
        }
    }
}

impl ArrayContentStrategy for JvmBackend {
    fn backend_name(&self) -> &'static str {
        "jvm"
    }

    fn call_shape(&self) -> CallShape {
        CallShape::Static
    }
}

impl TargetBackend for JvmBackend {
    fn register_primitives(&self, interner: &StringInterner, registry: &mut ArrayPrimitiveRegistry) {
        for category in element_categories() {
            let array = Self::array_descriptor(category);
            let equals = format!("java.util.Arrays.equals({array}{array})Z");
            let hash = format!("java.util.Arrays.hashCode({array})I");
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
