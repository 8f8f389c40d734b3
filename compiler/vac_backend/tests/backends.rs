//! Cross-backend behavior of synthesized contracts.
//!
//! The same module is synthesized for every backend and the resulting
//! bodies are executed with the reference interpreter.

use pretty_assertions::{assert_eq, assert_ne};

use vac_backend::{synthesize_for_backend, synthesize_with, Backend, JsBackend, TargetBackend};
use vac_const::{AggregateBuilder, ConstValue};
use vac_derive::{
    ArrayContentStrategy, ArrayPrimitive, ArrayPrimitiveRegistry, BodyInterpreter, ErrorKind,
    PassSummary, SynthError, SynthOptions,
};
use vac_ir::{
    CallShape, Declaration, ElementCategory, Idx, IntrinsicOp, Module, Pool, PrimitiveKind,
    Property, StringInterner, ValueAggregateDecl,
};

struct World {
    interner: StringInterner,
    pool: Pool,
}

impl World {
    fn new() -> Self {
        Self {
            interner: StringInterner::new(),
            pool: Pool::new(),
        }
    }

    fn aggregate(&mut self, name: &str, props: &[(&str, Idx)]) -> ValueAggregateDecl {
        let name = self.interner.intern(name);
        let ty = self.pool.class(name);
        props.iter().fold(ValueAggregateDecl::new(name, ty), |decl, &(prop, ty)| {
            decl.with_property(Property::new(self.interner.intern(prop), ty, &self.pool))
        })
    }

    /// `Point3D`, `Wrapper(inner: Point3D)`, `Marker`, `Tags(names: Array<String>)`.
    fn module(&mut self) -> Module {
        let int_array = self.pool.primitive_array(PrimitiveKind::Int);
        let string_array = self.pool.array(Idx::STRING);
        let point = self.aggregate(
            "Point3D",
            &[
                ("x", Idx::INT),
                ("y", Idx::INT),
                ("z", Idx::INT),
                ("tag", int_array),
            ],
        );
        let point_ty = point.ty;
        let wrapper = self.aggregate("Wrapper", &[("inner", point_ty)]);
        let marker = self.aggregate("Marker", &[]);
        let tags = self.aggregate("Tags", &[("names", string_array)]);

        let mut module = Module::new();
        for decl in [wrapper, point, marker, tags] {
            module.push(Declaration::ValueAggregate(decl));
        }
        module
    }

    fn point(&mut self, coords: [i32; 3], tag: &[i32]) -> ConstValue {
        let ty = self.pool.class(self.interner.intern("Point3D"));
        let mut builder = AggregateBuilder::new(ty);
        for (field, value) in ["x", "y", "z"].into_iter().zip(coords) {
            builder
                .set_field(self.interner.intern(field), ConstValue::int(value))
                .unwrap();
        }
        builder
            .set_field(
                self.interner.intern("tag"),
                ConstValue::array(Idx::INT, tag.iter().copied().map(ConstValue::int)),
            )
            .unwrap();
        builder.finish()
    }

    fn wrap(&mut self, inner: ConstValue) -> ConstValue {
        let ty = self.pool.class(self.interner.intern("Wrapper"));
        AggregateBuilder::new(ty)
            .with_field(self.interner.intern("inner"), inner)
            .unwrap()
            .finish()
    }

    fn tags(&mut self, names: &[&str]) -> ConstValue {
        let ty = self.pool.class(self.interner.intern("Tags"));
        let elements = names
            .iter()
            .map(|s| ConstValue::string(self.interner.intern(s)))
            .collect::<Vec<_>>();
        AggregateBuilder::new(ty)
            .with_field(
                self.interner.intern("names"),
                ConstValue::array(Idx::STRING, elements),
            )
            .unwrap()
            .finish()
    }

    fn synthesized(&mut self, backend: Backend) -> Module {
        let mut module = self.module();
        let summary = synthesize_for_backend(
            &mut module,
            &self.interner,
            &self.pool,
            backend,
            SynthOptions::default(),
        )
        .unwrap();
        assert_eq!(
            summary,
            PassSummary {
                synthesized: 4,
                skipped: 0
            }
        );
        module
    }

    fn render_equals(&self, module: &Module, decl: &str) -> String {
        let decl = module
            .value_aggregate(self.interner.intern(decl))
            .unwrap();
        decl.contract()
            .unwrap()
            .equals
            .render(&self.interner, &self.pool)
    }

    fn render_hash(&self, module: &Module, decl: &str) -> String {
        let decl = module
            .value_aggregate(self.interner.intern(decl))
            .unwrap();
        decl.contract()
            .unwrap()
            .hash_code
            .render(&self.interner, &self.pool)
    }
}

#[test]
fn point3d_behaves_the_same_on_every_backend() {
    let mut hashes = Vec::new();
    for backend in Backend::ALL {
        let mut world = World::new();
        let module = world.synthesized(backend);
        let a = world.point([1, 2, 3], &[3, 4]);
        let b = world.point([1, 2, 3], &[3, 4]);
        let c = world.point([1, 2, 3], &[4, 3]);
        let owner = world.interner.intern("Point3D");
        let interp = BodyInterpreter::new(&module, &world.interner);

        assert!(interp.equals(owner, &a, &b).unwrap(), "{backend}");
        assert!(!interp.equals(owner, &a, &c).unwrap(), "{backend}");
        let hash_a = interp.hash_code(owner, &a).unwrap();
        assert_eq!(hash_a, interp.hash_code(owner, &b).unwrap(), "{backend}");
        hashes.push(hash_a);
    }
    assert_eq!(hashes, vec![32_864; Backend::ALL.len()]);
}

#[test]
fn nested_and_reference_arrays_agree_across_backends() {
    for backend in Backend::ALL {
        let mut world = World::new();
        let module = world.synthesized(backend);
        let p1 = world.point([0, 0, 1], &[7]);
        let p2 = world.point([0, 0, 1], &[7]);
        let p3 = world.point([0, 0, 1], &[]);
        let w1 = world.wrap(p1);
        let w2 = world.wrap(p2);
        let w3 = world.wrap(p3);
        let t1 = world.tags(&["a", "b"]);
        let t2 = world.tags(&["a", "b"]);
        let t3 = world.tags(&["b", "a"]);
        let wrapper = world.interner.intern("Wrapper");
        let tags = world.interner.intern("Tags");
        let interp = BodyInterpreter::new(&module, &world.interner);

        assert!(interp.equals(wrapper, &w1, &w2).unwrap(), "{backend}");
        assert!(!interp.equals(wrapper, &w1, &w3).unwrap(), "{backend}");
        assert_eq!(
            interp.hash_code(wrapper, &w1).unwrap(),
            interp.hash_code(wrapper, &w2).unwrap()
        );
        assert!(interp.equals(tags, &t1, &t2).unwrap(), "{backend}");
        assert!(!interp.equals(tags, &t1, &t3).unwrap(), "{backend}");
        assert_eq!(
            interp.hash_code(tags, &t1).unwrap(),
            interp.hash_code(tags, &t2).unwrap()
        );
    }
}

#[test]
fn marker_hash_is_the_seed() {
    let mut world = World::new();
    let module = world.synthesized(Backend::Native);
    let ty = world.pool.class(world.interner.intern("Marker"));
    let m1 = AggregateBuilder::new(ty).finish();
    let m2 = AggregateBuilder::new(ty).finish();
    let owner = world.interner.intern("Marker");
    let interp = BodyInterpreter::new(&module, &world.interner);

    assert!(interp.equals(owner, &m1, &m2).unwrap());
    assert_eq!(interp.hash_code(owner, &m1).unwrap(), 0);
}

#[test]
fn array_comparisons_use_each_backends_spelling() {
    let cases = [
        (
            Backend::Js,
            "this.tag.contentEquals(other.tag)",
            "this.tag.contentHashCode()",
            "this.names.contentEquals(other.names)",
        ),
        (
            Backend::Jvm,
            "java.util.Arrays.equals(this.tag, other.tag)",
            "java.util.Arrays.hashCode(this.tag)",
            "java.util.Arrays.equals(this.names, other.names)",
        ),
        (
            Backend::Native,
            "Kotlin_IntArray_contentEquals(this.tag, other.tag)",
            "Kotlin_IntArray_contentHashCode(this.tag)",
            "Kotlin_Array_contentEquals(this.names, other.names)",
        ),
    ];
    for (backend, point_equals, point_hash, tags_equals) in cases {
        let mut world = World::new();
        let module = world.synthesized(backend);
        let equals = world.render_equals(&module, "Point3D");
        let hash = world.render_hash(&module, "Point3D");
        let tags = world.render_equals(&module, "Tags");

        assert!(equals.contains(point_equals), "{backend}:\n{equals}");
        assert!(hash.contains(point_hash), "{backend}:\n{hash}");
        assert!(tags.contains(tags_equals), "{backend}:\n{tags}");
    }
}

#[test]
fn emitted_symbols_distinguish_primitive_and_reference_arrays() {
    for backend in Backend::ALL {
        let mut world = World::new();
        let module = world.synthesized(backend);
        let symbol = |decl: &str| {
            let contract = module
                .value_aggregate(world.interner.intern(decl))
                .and_then(|d| d.contract())
                .unwrap();
            contract
                .equals
                .primitive_calls()
                .map(|(symbol, _, _)| symbol)
                .collect::<Vec<_>>()
        };
        let ints = symbol("Point3D");
        let refs = symbol("Tags");

        assert_eq!(ints.len(), 1, "{backend}");
        assert_eq!(refs.len(), 1, "{backend}");
        assert_ne!(ints, refs, "{backend}");
    }
}

#[test]
fn scalar_and_nested_parts_are_backend_neutral() {
    let mut bodies = Vec::new();
    for backend in Backend::ALL {
        let mut world = World::new();
        let module = world.synthesized(backend);
        bodies.push((
            world.render_equals(&module, "Wrapper"),
            world.render_hash(&module, "Wrapper"),
        ));
    }
    assert!(bodies.windows(2).all(|pair| pair[0] == pair[1]));
    assert!(bodies[0].0.contains("this.inner.equals(other.inner)"));
    assert!(bodies[0].1.contains("this.inner.hashCode()"));
}

/// Registers only `IntArray` primitives.
struct PartialBackend;

impl ArrayContentStrategy for PartialBackend {
    fn backend_name(&self) -> &'static str {
        "partial"
    }

    fn call_shape(&self) -> CallShape {
        CallShape::Static
    }
}

impl TargetBackend for PartialBackend {
    fn register_primitives(&self, interner: &StringInterner, registry: &mut ArrayPrimitiveRegistry) {
        let int = ElementCategory::Primitive(PrimitiveKind::Int);
        registry.register_array_content_equals(int, ArrayPrimitive::new(interner.intern("eq")));
        registry.register_array_content_hash(int, ArrayPrimitive::new(interner.intern("hash")));
    }
}

#[test]
fn missing_registration_fails_the_whole_module() {
    let mut world = World::new();
    let mut module = world.module();
    let err = synthesize_with(
        &mut module,
        &world.interner,
        &world.pool,
        &PartialBackend,
        SynthOptions::default(),
    )
    .unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Configuration);
    assert_eq!(
        err,
        SynthError::MissingArrayPrimitive {
            category: ElementCategory::Reference,
            op: IntrinsicOp::ArrayContentEquals,
            declaration: world.interner.intern("Tags"),
            property: world.interner.intern("names"),
        }
    );
    assert!(module.value_aggregates().all(|decl| !decl.has_contract()));
}

#[test]
fn custom_options_reach_every_backend() {
    let options = SynthOptions::default().with_hash_multiplier(17).with_hash_seed(7);
    for backend in Backend::ALL {
        let mut world = World::new();
        let mut module = world.module();
        synthesize_for_backend(&mut module, &world.interner, &world.pool, backend, options)
            .unwrap();
        let p = world.point([1, 2, 3], &[]);
        let owner = world.interner.intern("Point3D");
        let interp = BodyInterpreter::new(&module, &world.interner);

        // (((7*17 + 1)*17 + 2)*17 + 3)*17 + [] content hash (1)
        assert_eq!(interp.hash_code(owner, &p).unwrap(), 590_190, "{backend}");
    }
}

#[test]
fn js_adapter_can_be_driven_directly() {
    let mut world = World::new();
    let mut module = world.module();
    let summary = synthesize_with(
        &mut module,
        &world.interner,
        &world.pool,
        &JsBackend,
        SynthOptions::default().with_parallel(true),
    )
    .unwrap();

    assert_eq!(summary.synthesized, 4);
    assert_eq!(JsBackend.call_shape(), CallShape::Extension);
}
