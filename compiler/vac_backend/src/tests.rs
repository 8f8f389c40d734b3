use pretty_assertions::{assert_eq, assert_ne};

use vac_ir::{ElementCategory, PrimitiveKind, StringInterner};

use super::*;

#[test]
fn names_round_trip() {
    for backend in Backend::ALL {
        assert_eq!(Backend::from_name(backend.name()), Ok(backend));
        assert_eq!(backend.to_string().parse::<Backend>(), Ok(backend));
    }
}

#[test]
fn unknown_backend_is_rejected() {
    let err = "wasm".parse::<Backend>().unwrap_err();
    assert_eq!(err.name, "wasm");
    assert_eq!(
        err.to_string(),
        "unknown backend `wasm` (expected one of: js, jvm, native)"
    );
}

#[test]
fn every_backend_covers_every_category() {
    let interner = StringInterner::new();
    for backend in Backend::ALL {
        let registry = backend.registry(&interner);
        for category in element_categories() {
            assert!(
                registry.content_equals(category).is_some(),
                "{backend}: no equals for {category}"
            );
            assert!(
                registry.content_hash(category).is_some(),
                "{backend}: no hash for {category}"
            );
        }
    }
}

#[test]
fn native_symbols_follow_runtime_naming() {
    let interner = StringInterner::new();
    let registry = Backend::Native.registry(&interner);
    let int_equals = registry
        .content_equals(ElementCategory::Primitive(PrimitiveKind::Int))
        .unwrap();
    let generic_hash = registry.content_hash(ElementCategory::Reference).unwrap();
    assert_eq!(
        interner.lookup(int_equals.symbol),
        "Kotlin_IntArray_contentEquals"
    );
    assert_eq!(
        interner.lookup(generic_hash.symbol),
        "Kotlin_Array_contentHashCode"
    );
}

#[test]
fn primitive_and_reference_arrays_use_distinct_primitives() {
    let interner = StringInterner::new();
    let int = ElementCategory::Primitive(PrimitiveKind::Int);
    for backend in Backend::ALL {
        let registry = backend.registry(&interner);
        assert_ne!(
            registry.content_equals(int),
            registry.content_equals(ElementCategory::Reference),
            "{backend}"
        );
        assert_ne!(
            registry.content_hash(int),
            registry.content_hash(ElementCategory::Reference),
            "{backend}"
        );
    }
}

#[test]
fn every_category_has_its_own_symbol() {
    let interner = StringInterner::new();
    for backend in Backend::ALL {
        let registry = backend.registry(&interner);
        let mut symbols: Vec<&str> = element_categories()
            .filter_map(|category| registry.content_equals(category))
            .map(|primitive| interner.lookup(primitive.symbol))
            .collect();
        let registered = symbols.len();
        symbols.sort_unstable();
        symbols.dedup();
        assert_eq!(symbols.len(), registered, "{backend}: {symbols:?}");
    }
}

#[test]
fn jvm_symbols_carry_descriptors() {
    let interner = StringInterner::new();
    let registry = Backend::Jvm.registry(&interner);
    let longs = registry
        .content_equals(ElementCategory::Primitive(PrimitiveKind::Long))
        .unwrap();
    let refs = registry.content_hash(ElementCategory::Reference).unwrap();
    assert_eq!(interner.lookup(longs.symbol), "java.util.Arrays.equals([J[J)Z");
    assert_eq!(
        interner.lookup(refs.symbol),
        "java.util.Arrays.hashCode([Ljava/lang/Object;)I"
    );
}

#[test]
fn js_symbols_are_receiver_qualified() {
    let interner = StringInterner::new();
    let registry = Backend::Js.registry(&interner);
    let bytes = registry
        .content_hash(ElementCategory::Primitive(PrimitiveKind::Byte))
        .unwrap();
    let refs = registry.content_equals(ElementCategory::Reference).unwrap();
    assert_eq!(
        interner.lookup(bytes.symbol),
        "kotlin.collections.ByteArray.contentHashCode"
    );
    assert_eq!(
        interner.lookup(refs.symbol),
        "kotlin.collections.Array.contentEquals"
    );
}

#[test]
fn init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}
