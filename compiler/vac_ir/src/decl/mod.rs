//! Front-end declarations consumed by contract synthesis.
//!
//! The front end decides which classes are value-aggregates and resolves
//! their properties; synthesis only reads a [`Module`] and attaches a
//! [`SynthesizedContract`] to each [`ValueAggregateDecl`].

use std::fmt;

use rustc_hash::{FxHashMap, FxHashSet};
use smallvec::SmallVec;

use crate::{Idx, MethodBody, Name, Pool, StringInterner, SynthesizedContract};

/// A resolved property of a value-aggregate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Property {
    pub name: Name,
    pub ty: Idx,
    /// Front-end's view of whether `ty` is an array type.
    pub is_array: bool,
}

impl Property {
    /// Create a property, deriving `is_array` from the pool.
    pub fn new(name: Name, ty: Idx, pool: &Pool) -> Self {
        Self {
            name,
            ty,
            is_array: pool.is_array(ty),
        }
    }

    /// Create a property with an explicit array flag, as handed over by a
    /// front end that computes it separately.
    pub fn with_array_flag(name: Name, ty: Idx, is_array: bool) -> Self {
        Self { name, ty, is_array }
    }
}

/// A value-aggregate declaration (annotation-like class).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValueAggregateDecl {
    pub name: Name,
    /// The declaration's own class type.
    pub ty: Idx,
    /// Direct ancestors in resolution order.
    pub ancestors: SmallVec<[Name; 2]>,
    /// Properties declared on this class itself.
    pub properties: Vec<Property>,
    contract: Option<SynthesizedContract>,
}

impl ValueAggregateDecl {
    pub fn new(name: Name, ty: Idx) -> Self {
        Self {
            name,
            ty,
            ancestors: SmallVec::new(),
            properties: Vec::new(),
            contract: None,
        }
    }

    #[must_use]
    pub fn with_ancestor(mut self, ancestor: Name) -> Self {
        self.ancestors.push(ancestor);
        self
    }

    #[must_use]
    pub fn with_property(mut self, property: Property) -> Self {
        self.properties.push(property);
        self
    }

    /// The synthesized contract, once the pass has run.
    pub fn contract(&self) -> Option<&SynthesizedContract> {
        self.contract.as_ref()
    }

    pub fn has_contract(&self) -> bool {
        self.contract.is_some()
    }

    /// Attach (or replace) the synthesized contract.
    ///
    /// Takes the whole pair so a declaration never holds one body without
    /// the other.
    pub fn attach_contract(&mut self, contract: SynthesizedContract) {
        self.contract = Some(contract);
    }
}

/// Any declaration that is not a value-aggregate.
///
/// Carried through untouched. Its member bodies may contain constructor
/// calls; synthesis never looks inside them.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClassDecl {
    pub name: Name,
    pub members: Vec<MethodBody>,
}

impl ClassDecl {
    pub fn new(name: Name) -> Self {
        Self {
            name,
            members: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_member(mut self, body: MethodBody) -> Self {
        self.members.push(body);
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Declaration {
    ValueAggregate(ValueAggregateDecl),
    Class(ClassDecl),
}

impl Declaration {
    pub fn name(&self) -> Name {
        match self {
            Declaration::ValueAggregate(d) => d.name,
            Declaration::Class(d) => d.name,
        }
    }

    pub fn as_value_aggregate(&self) -> Option<&ValueAggregateDecl> {
        match self {
            Declaration::ValueAggregate(d) => Some(d),
            Declaration::Class(_) => None,
        }
    }
}

/// One compilation unit's declarations, in source order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Module {
    pub declarations: Vec<Declaration>,
}

impl Module {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, decl: Declaration) {
        self.declarations.push(decl);
    }

    pub fn value_aggregates(&self) -> impl Iterator<Item = &ValueAggregateDecl> {
        self.declarations.iter().filter_map(Declaration::as_value_aggregate)
    }

    pub fn value_aggregates_mut(&mut self) -> impl Iterator<Item = &mut ValueAggregateDecl> {
        self.declarations.iter_mut().filter_map(|d| match d {
            Declaration::ValueAggregate(d) => Some(d),
            Declaration::Class(_) => None,
        })
    }

    /// Find a value-aggregate by name.
    pub fn value_aggregate(&self, name: Name) -> Option<&ValueAggregateDecl> {
        self.value_aggregates().find(|d| d.name == name)
    }
}

/// Malformed declaration input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DeclError {
    /// Two value-aggregates share a name.
    DuplicateDeclaration { name: Name },
    /// Two value-aggregates share a class type.
    DuplicateType { ty: Idx, first: Name, second: Name },
    /// An ancestor is not a value-aggregate of this module.
    UnknownAncestor { declaration: Name, ancestor: Name },
    /// The ancestor chain loops back on itself.
    AncestorCycle { declaration: Name },
}

impl DeclError {
    /// The message with names resolved through `interner`.
    pub fn render(&self, interner: &StringInterner) -> String {
        match self {
            DeclError::DuplicateDeclaration { name } => format!(
                "duplicate value-aggregate declaration `{}`",
                interner.lookup(*name)
            ),
            DeclError::DuplicateType { first, second, .. } => format!(
                "value-aggregates `{}` and `{}` share one class type",
                interner.lookup(*first),
                interner.lookup(*second)
            ),
            DeclError::UnknownAncestor {
                declaration,
                ancestor,
            } => format!(
                "declaration `{}` names unknown ancestor `{}`",
                interner.lookup(*declaration),
                interner.lookup(*ancestor)
            ),
            DeclError::AncestorCycle { declaration } => format!(
                "ancestor chain of `{}` is cyclic",
                interner.lookup(*declaration)
            ),
        }
    }
}

impl fmt::Display for DeclError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeclError::DuplicateDeclaration { name } => {
                write!(f, "duplicate value-aggregate declaration {name:?}")
            }
            DeclError::DuplicateType { ty, first, second } => write!(
                f,
                "value-aggregates {first:?} and {second:?} share class type {}",
                ty.raw()
            ),
            DeclError::UnknownAncestor {
                declaration,
                ancestor,
            } => write!(
                f,
                "declaration {declaration:?} names unknown ancestor {ancestor:?}"
            ),
            DeclError::AncestorCycle { declaration } => {
                write!(f, "ancestor chain of {declaration:?} is cyclic")
            }
        }
    }
}

impl std::error::Error for DeclError {}

/// Read-only index over a module's value-aggregates.
///
/// Borrowed from the [`Module`] for the duration of synthesis; the module is
/// only mutated again once every contract has been produced.
pub struct DeclTable<'m> {
    decls: Vec<&'m ValueAggregateDecl>,
    by_name: FxHashMap<Name, usize>,
    by_type: FxHashMap<Idx, usize>,
}

impl<'m> DeclTable<'m> {
    pub fn new(module: &'m Module) -> Result<Self, DeclError> {
        let mut table = Self {
            decls: Vec::new(),
            by_name: FxHashMap::default(),
            by_type: FxHashMap::default(),
        };
        for decl in module.value_aggregates() {
            let pos = table.decls.len();
            if table.by_name.insert(decl.name, pos).is_some() {
                return Err(DeclError::DuplicateDeclaration { name: decl.name });
            }
            if let Some(prev) = table.by_type.insert(decl.ty, pos) {
                return Err(DeclError::DuplicateType {
                    ty: decl.ty,
                    first: table.decls[prev].name,
                    second: decl.name,
                });
            }
            table.decls.push(decl);
        }
        Ok(table)
    }

    /// Value-aggregates in module order.
    pub fn decls(&self) -> &[&'m ValueAggregateDecl] {
        &self.decls
    }

    pub fn len(&self) -> usize {
        self.decls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.decls.is_empty()
    }

    pub fn get(&self, name: Name) -> Option<&'m ValueAggregateDecl> {
        self.by_name.get(&name).map(|&i| self.decls[i])
    }

    /// The value-aggregate whose class type is `ty` (nullability ignored).
    pub fn aggregate_for_type(&self, pool: &Pool, ty: Idx) -> Option<&'m ValueAggregateDecl> {
        self.by_type.get(&pool.non_null(ty)).map(|&i| self.decls[i])
    }

    /// Full property list: ancestors first (depth-first, in resolution
    /// order), then the declaration's own properties.
    ///
    /// A property redeclared by a descendant keeps the position of its first
    /// declaration and takes the descendant's type.
    pub fn flattened_properties(
        &self,
        decl: &ValueAggregateDecl,
    ) -> Result<Vec<Property>, DeclError> {
        let mut out: Vec<Property> = Vec::with_capacity(decl.properties.len());
        let mut seen: FxHashMap<Name, usize> = FxHashMap::default();
        let mut visiting: FxHashSet<Name> = FxHashSet::default();
        let mut done: FxHashSet<Name> = FxHashSet::default();
        self.collect(decl, &mut out, &mut seen, &mut visiting, &mut done)?;
        Ok(out)
    }

    fn collect(
        &self,
        decl: &ValueAggregateDecl,
        out: &mut Vec<Property>,
        seen: &mut FxHashMap<Name, usize>,
        visiting: &mut FxHashSet<Name>,
        done: &mut FxHashSet<Name>,
    ) -> Result<(), DeclError> {
        if done.contains(&decl.name) {
            // Diamond: the shared ancestor's properties are already in place.
            return Ok(());
        }
        if !visiting.insert(decl.name) {
            return Err(DeclError::AncestorCycle {
                declaration: decl.name,
            });
        }
        for &ancestor in &decl.ancestors {
            let parent = self.get(ancestor).ok_or(DeclError::UnknownAncestor {
                declaration: decl.name,
                ancestor,
            })?;
            self.collect(parent, out, seen, visiting, done)?;
        }
        for prop in &decl.properties {
            match seen.get(&prop.name) {
                Some(&pos) => out[pos] = *prop,
                None => {
                    seen.insert(prop.name, out.len());
                    out.push(*prop);
                }
            }
        }
        visiting.remove(&decl.name);
        done.insert(decl.name);
        Ok(())
    }
}
