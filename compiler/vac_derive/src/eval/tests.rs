use pretty_assertions::assert_eq;

use vac_const::{AggregateBuilder, ConstValue, ScalarLiteral};
use vac_ir::{BodyBuilder, Idx, MethodKind, Module, ParamRole, Stmt, StringInterner};

use super::*;
use crate::test_helpers::{Fixture, TestStrategy};
use crate::{SynthOptions, SynthesisPass};

/// `Point3D`, `Wrapper(inner: Point3D)`, `Marker`, `Label(s: String?)`, all
/// synthesized.
fn synthesized(fx: &mut Fixture) -> Module {
    let point = fx.point3d();
    let point_ty = point.ty;
    let maybe_string = fx.pool.nullable(Idx::STRING);
    let wrapper = fx.aggregate("Wrapper");
    let wrapper = wrapper.with_property(fx.prop("inner", point_ty));
    let marker = fx.aggregate("Marker");
    let label = fx.aggregate("Label");
    let label = label.with_property(fx.prop("s", maybe_string));
    let mut module = Fixture::module([point, wrapper, marker, label]);
    SynthesisPass::new(
        &fx.interner,
        &fx.pool,
        &fx.registry,
        &TestStrategy,
        SynthOptions::default(),
    )
    .run(&mut module)
    .unwrap();
    module
}

fn point(fx: &mut Fixture, coords: [i32; 3], tag: &[i32]) -> ConstValue {
    let ty = fx.class("Point3D");
    AggregateBuilder::new(ty)
        .with_field(fx.name("x"), ConstValue::int(coords[0]))
        .and_then(|b| b.with_field(fx.name("y"), ConstValue::int(coords[1])))
        .and_then(|b| b.with_field(fx.name("z"), ConstValue::int(coords[2])))
        .and_then(|b| {
            b.with_field(
                fx.name("tag"),
                ConstValue::array(Idx::INT, tag.iter().copied().map(ConstValue::int)),
            )
        })
        .unwrap()
        .finish()
}

fn single(fx: &mut Fixture, class: &str, field: &str, value: ConstValue) -> ConstValue {
    let ty = fx.class(class);
    AggregateBuilder::new(ty)
        .with_field(fx.name(field), value)
        .unwrap()
        .finish()
}

#[test]
fn point3d_equality_and_hash() {
    let mut fx = Fixture::new();
    let module = synthesized(&mut fx);
    let a = point(&mut fx, [1, 2, 3], &[3, 4]);
    let b = point(&mut fx, [1, 2, 3], &[3, 4]);
    let c = point(&mut fx, [1, 2, 3], &[4, 3]);
    let owner = fx.name("Point3D");
    let interp = BodyInterpreter::new(&module, &fx.interner);

    assert!(interp.equals(owner, &a, &b).unwrap());
    assert!(!interp.equals(owner, &a, &c).unwrap());
    assert_eq!(
        interp.hash_code(owner, &a).unwrap(),
        interp.hash_code(owner, &b).unwrap()
    );
    // ((1*31 + 2)*31 + 3)*31 + ((1*31 + 3)*31 + 4)
    assert_eq!(interp.hash_code(owner, &a).unwrap(), 32_864);
}

#[test]
fn type_guard_rejects_other_classes() {
    let mut fx = Fixture::new();
    let module = synthesized(&mut fx);
    let a = point(&mut fx, [1, 2, 3], &[]);
    let not_a_point = single(&mut fx, "Elsewhere", "x", ConstValue::int(1));
    let interp = BodyInterpreter::new(&module, &fx.interner);

    assert!(!interp.equals(fx.name("Point3D"), &a, &not_a_point).unwrap());
    assert!(!interp
        .equals(fx.name("Point3D"), &a, &ConstValue::int(1))
        .unwrap());
}

#[test]
fn marker_instances_are_always_equal() {
    let mut fx = Fixture::new();
    let module = synthesized(&mut fx);
    let ty = fx.class("Marker");
    let m1 = AggregateBuilder::new(ty).finish();
    let m2 = AggregateBuilder::new(ty).finish();
    let owner = fx.name("Marker");
    let interp = BodyInterpreter::new(&module, &fx.interner);

    assert!(interp.equals(owner, &m1, &m2).unwrap());
    assert_eq!(interp.hash_code(owner, &m1).unwrap(), 0);
}

#[test]
fn wrapper_delegates_to_nested_contract() {
    let mut fx = Fixture::new();
    let module = synthesized(&mut fx);
    let pa = point(&mut fx, [1, 2, 3], &[3, 4]);
    let pb = point(&mut fx, [1, 2, 3], &[3, 4]);
    let pc = point(&mut fx, [1, 2, 3], &[4, 3]);
    let wa = single(&mut fx, "Wrapper", "inner", pa.clone());
    let wb = single(&mut fx, "Wrapper", "inner", pb);
    let wc = single(&mut fx, "Wrapper", "inner", pc);
    let owner = fx.name("Wrapper");
    let interp = BodyInterpreter::new(&module, &fx.interner);

    assert!(interp.equals(owner, &wa, &wb).unwrap());
    assert!(!interp.equals(owner, &wa, &wc).unwrap());
    let inner_hash = interp.hash_code(fx.name("Point3D"), &pa).unwrap();
    assert_eq!(interp.hash_code(owner, &wa).unwrap(), inner_hash);
}

#[test]
fn null_guard_semantics() {
    let mut fx = Fixture::new();
    let module = synthesized(&mut fx);
    let maybe_string = fx.pool.nullable(Idx::STRING);
    let null = single(&mut fx, "Label", "s", ConstValue::null(maybe_string));
    let null2 = single(&mut fx, "Label", "s", ConstValue::null(maybe_string));
    let hi = ConstValue::string(fx.name("hi"));
    let present = single(&mut fx, "Label", "s", hi);
    let owner = fx.name("Label");
    let interp = BodyInterpreter::new(&module, &fx.interner);

    assert!(interp.equals(owner, &null, &null2).unwrap());
    assert!(!interp.equals(owner, &null, &present).unwrap());
    assert!(!interp.equals(owner, &present, &null).unwrap());
    assert!(interp.equals(owner, &present, &present).unwrap());
    assert_eq!(interp.hash_code(owner, &null).unwrap(), 0);
    assert_eq!(
        interp.hash_code(owner, &present).unwrap(),
        i32::from(b'h') * 31 + i32::from(b'i')
    );
}

#[test]
fn missing_contract_is_reported() {
    let fx = Fixture::new();
    let module = Module::new();
    let interp = BodyInterpreter::new(&module, &fx.interner);
    let owner = fx.name("Ghost");

    assert_eq!(
        interp.hash_code(owner, &ConstValue::int(0)),
        Err(EvalError::MissingContract { owner })
    );
}

#[test]
fn absent_other_is_an_error() {
    let fx = Fixture::new();
    let module = Module::new();
    let interp = BodyInterpreter::new(&module, &fx.interner);

    let mut b = BodyBuilder::new(MethodKind::Equals);
    let other = b.param(ParamRole::Other);
    b.emit(Stmt::Return(other));
    let body = b.finish();

    assert_eq!(
        interp.run(&body, &ConstValue::int(0), None).unwrap_err(),
        EvalError::MissingArgument
    );
}

#[test]
fn jvm_scalar_hashes() {
    let interner = StringInterner::new();
    let hash = |lit| scalar_hash(&lit, &interner);

    assert_eq!(hash(ScalarLiteral::Int(-7)), -7);
    assert_eq!(hash(ScalarLiteral::Boolean(true)), 1231);
    assert_eq!(hash(ScalarLiteral::Boolean(false)), 1237);
    assert_eq!(hash(ScalarLiteral::Long(1 << 32)), 1);
    assert_eq!(hash(ScalarLiteral::Long(-1)), 0);
    assert_eq!(hash(ScalarLiteral::Char('A')), 65);
    assert_eq!(hash(ScalarLiteral::Double(0.0)), 0);
    assert_eq!(hash(ScalarLiteral::Float(1.0)), 0x3f80_0000);
    assert_eq!(hash(ScalarLiteral::String(interner.intern(""))), 0);
    assert_eq!(hash(ScalarLiteral::String(interner.intern("ab"))), 3105);
    assert_eq!(hash(ScalarLiteral::Null(Idx::ANY)), 0);
}
