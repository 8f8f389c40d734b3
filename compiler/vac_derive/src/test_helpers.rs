//! Shared fixtures for unit tests.

use vac_ir::{
    CallShape, DeclTable, Declaration, ElementCategory, Idx, Module, Name, Pool, PrimitiveKind,
    Property, StringInterner, ValueAggregateDecl,
};

use crate::{ArrayContentStrategy, ArrayPrimitive, ArrayPrimitiveRegistry, SynthContext};

/// Extension-call strategy with the JS spellings.
pub(crate) struct TestStrategy;

impl ArrayContentStrategy for TestStrategy {
    fn backend_name(&self) -> &'static str {
        "test"
    }

    fn call_shape(&self) -> CallShape {
        CallShape::Extension
    }
}

pub(crate) struct Fixture {
    pub interner: StringInterner,
    pub pool: Pool,
    pub registry: ArrayPrimitiveRegistry,
}

impl Fixture {
    /// Every element category registered.
    pub fn new() -> Self {
        let mut fx = Self::bare();
        let equals = ArrayPrimitive::new(fx.interner.intern("contentEquals"));
        let hash = ArrayPrimitive::new(fx.interner.intern("contentHashCode"));
        let categories = PrimitiveKind::ALL
            .iter()
            .map(|&kind| ElementCategory::Primitive(kind))
            .chain([ElementCategory::Reference]);
        for category in categories {
            fx.registry.register_array_content_equals(category, equals);
            fx.registry.register_array_content_hash(category, hash);
        }
        fx
    }

    /// Nothing registered.
    pub fn bare() -> Self {
        Self {
            interner: StringInterner::new(),
            pool: Pool::new(),
            registry: ArrayPrimitiveRegistry::new(),
        }
    }

    pub fn cx<'a>(&'a self, table: &'a DeclTable<'a>) -> SynthContext<'a> {
        SynthContext {
            interner: &self.interner,
            pool: &self.pool,
            table,
        }
    }

    pub fn name(&self, s: &str) -> Name {
        self.interner.intern(s)
    }

    pub fn class(&mut self, s: &str) -> Idx {
        let name = self.interner.intern(s);
        self.pool.class(name)
    }

    pub fn aggregate(&mut self, s: &str) -> ValueAggregateDecl {
        let ty = self.class(s);
        ValueAggregateDecl::new(self.name(s), ty)
    }

    pub fn prop(&self, s: &str, ty: Idx) -> Property {
        Property::new(self.name(s), ty, &self.pool)
    }

    pub fn module(decls: impl IntoIterator<Item = ValueAggregateDecl>) -> Module {
        let mut module = Module::new();
        for decl in decls {
            module.push(Declaration::ValueAggregate(decl));
        }
        module
    }

    /// `Point3D(x: Int, y: Int, z: Int, tag: IntArray)`.
    pub fn point3d(&mut self) -> ValueAggregateDecl {
        let tag_ty = self.pool.primitive_array(PrimitiveKind::Int);
        let decl = self.aggregate("Point3D");
        decl.with_property(self.prop("x", Idx::INT))
            .with_property(self.prop("y", Idx::INT))
            .with_property(self.prop("z", Idx::INT))
            .with_property(self.prop("tag", tag_ty))
    }
}
