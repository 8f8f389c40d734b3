use pretty_assertions::assert_eq;

use vac_ir::{DeclTable, Idx, Name};

use super::*;
use crate::test_helpers::Fixture;
use crate::ErrorKind;

fn names(fx: &Fixture, level: &[Name]) -> Vec<&'static str> {
    level.iter().map(|&n| fx.interner.lookup(n)).collect()
}

#[test]
fn independent_declarations_share_level_zero() {
    let mut fx = Fixture::new();
    let a = fx.aggregate("A").with_property(fx.prop("n", Idx::INT));
    let b = fx.aggregate("B");
    let module = Fixture::module([a, b]);
    let table = DeclTable::new(&module).unwrap();

    let order = dependency_order(&fx.pool, &table).unwrap();
    assert_eq!(order.levels().len(), 1);
    assert_eq!(names(&fx, &order.levels()[0]), vec!["A", "B"]);
}

#[test]
fn nested_aggregates_come_first() {
    let mut fx = Fixture::new();
    // Declared out of dependency order on purpose.
    let outer_holder = fx.aggregate("Outer");
    let middle = fx.aggregate("Middle");
    let inner = fx.aggregate("Inner").with_property(fx.prop("n", Idx::INT));
    let middle_ty = middle.ty;
    let inner_ty = inner.ty;
    let outer = outer_holder
        .with_property(fx.prop("m", middle_ty))
        .with_property(fx.prop("i", inner_ty));
    let middle = middle.with_property(fx.prop("i", inner_ty));
    let module = Fixture::module([outer, middle, inner]);
    let table = DeclTable::new(&module).unwrap();

    let order = dependency_order(&fx.pool, &table).unwrap();
    let levels: Vec<Vec<&str>> = order.levels().iter().map(|l| names(&fx, l)).collect();
    assert_eq!(levels, vec![vec!["Inner"], vec!["Middle"], vec!["Outer"]]);
    assert_eq!(
        order.iter().map(|n| fx.interner.lookup(n)).collect::<Vec<_>>(),
        vec!["Inner", "Middle", "Outer"]
    );
    assert_eq!(order.len(), 3);
}

#[test]
fn ties_keep_module_order() {
    let mut fx = Fixture::new();
    let leaf = fx.aggregate("Leaf");
    let leaf_ty = leaf.ty;
    let z = fx.aggregate("Z").with_property(fx.prop("l", leaf_ty));
    let y = fx.aggregate("Y").with_property(fx.prop("l", leaf_ty));
    let module = Fixture::module([z, leaf, y]);
    let table = DeclTable::new(&module).unwrap();

    let order = dependency_order(&fx.pool, &table).unwrap();
    assert_eq!(names(&fx, &order.levels()[1]), vec!["Z", "Y"]);
}

#[test]
fn array_of_aggregates_is_not_an_edge() {
    let mut fx = Fixture::new();
    let item = fx.aggregate("Item");
    let items = fx.pool.array(item.ty);
    let bag = fx.aggregate("Bag").with_property(fx.prop("items", items));
    let module = Fixture::module([bag, item]);
    let table = DeclTable::new(&module).unwrap();

    let order = dependency_order(&fx.pool, &table).unwrap();
    assert_eq!(order.levels().len(), 1);
    assert_eq!(names(&fx, &order.levels()[0]), vec!["Bag", "Item"]);
}

#[test]
fn mutual_containment_is_a_cycle() {
    let mut fx = Fixture::new();
    let a = fx.aggregate("A");
    let b = fx.aggregate("B");
    let (a_ty, b_ty) = (a.ty, b.ty);
    let a = a.with_property(fx.prop("b", b_ty));
    let b = b.with_property(fx.prop("a", a_ty));
    let module = Fixture::module([a, b]);
    let table = DeclTable::new(&module).unwrap();

    let err = dependency_order(&fx.pool, &table).unwrap_err();
    assert_eq!(
        err,
        SynthError::NestedAggregateCycle {
            cycle: vec![fx.name("A"), fx.name("B"), fx.name("A")],
        }
    );
    assert_eq!(err.kind(), ErrorKind::InputShape);
}

#[test]
fn nullable_self_reference_is_a_cycle() {
    let mut fx = Fixture::new();
    let node = fx.aggregate("Node");
    let maybe_node = fx.pool.nullable(node.ty);
    let node = node.with_property(fx.prop("next", maybe_node));
    let module = Fixture::module([node]);
    let table = DeclTable::new(&module).unwrap();

    let err = dependency_order(&fx.pool, &table).unwrap_err();
    assert_eq!(
        err,
        SynthError::NestedAggregateCycle {
            cycle: vec![fx.name("Node"), fx.name("Node")],
        }
    );
}

#[test]
fn empty_module_has_no_levels() {
    let fx = Fixture::new();
    let module = vac_ir::Module::new();
    let table = DeclTable::new(&module).unwrap();

    let order = dependency_order(&fx.pool, &table).unwrap();
    assert!(order.is_empty());
    assert_eq!(order.len(), 0);
}
