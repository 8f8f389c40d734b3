//! Dependency order between value-aggregates.
//!
//! A declaration depends on every value-aggregate it holds by value
//! (a `NestedAggregate` property). Arrays of aggregates are not edges: their
//! comparison goes through the backend's content primitive.

use rustc_hash::FxHashMap;
use smallvec::SmallVec;
use tracing::debug;
use vac_ir::{DeclTable, Name, Pool, StringInterner};

use crate::plan::{plan_declaration, PlanCategory, PropertyClassifier};
use crate::SynthError;

type Edges = SmallVec<[Name; 4]>;

#[derive(Copy, Clone, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done(usize),
}

/// Topological order of a module's value-aggregates.
///
/// Level `n` holds declarations whose dependencies all sit in levels below
/// `n`. Within a level, declarations keep module order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DependencyOrder {
    levels: Vec<Vec<Name>>,
}

impl DependencyOrder {
    /// Order the declarations of `table`. Fails on any plan error and on
    /// aggregates that contain each other by value.
    pub fn compute(classifier: &PropertyClassifier<'_>) -> Result<Self, SynthError> {
        let table = classifier.table();
        let mut edges: FxHashMap<Name, Edges> = FxHashMap::default();
        for decl in table.decls() {
            let mut deps = Edges::new();
            for plan in plan_declaration(classifier, decl)? {
                if let PlanCategory::NestedAggregate(target) = plan.category {
                    if !deps.contains(&target) {
                        deps.push(target);
                    }
                }
            }
            edges.insert(decl.name, deps);
        }

        let mut marks: FxHashMap<Name, Mark> = FxHashMap::default();
        let mut stack: Vec<Name> = Vec::new();
        for decl in table.decls() {
            visit(decl.name, &edges, &mut marks, &mut stack)?;
        }

        let mut levels: Vec<Vec<Name>> = Vec::new();
        for decl in table.decls() {
            if let Some(&Mark::Done(level)) = marks.get(&decl.name) {
                if levels.len() <= level {
                    levels.resize_with(level + 1, Vec::new);
                }
                levels[level].push(decl.name);
            }
        }
        Ok(Self { levels })
    }

    /// Groups of mutually independent declarations, dependencies first.
    pub fn levels(&self) -> &[Vec<Name>] {
        &self.levels
    }

    /// Flat order: every declaration after all of its dependencies.
    pub fn iter(&self) -> impl Iterator<Item = Name> + '_ {
        self.levels.iter().flatten().copied()
    }

    pub fn len(&self) -> usize {
        self.levels.iter().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub(crate) fn log(&self, interner: &StringInterner) {
        for (level, names) in self.levels.iter().enumerate() {
            debug!(
                level,
                declarations = ?names.iter().map(|&n| interner.lookup(n)).collect::<Vec<_>>(),
                "dependency level"
            );
        }
    }
}

/// Depth-first visit assigning `level = 1 + max(level of dependencies)`.
fn visit(
    name: Name,
    edges: &FxHashMap<Name, Edges>,
    marks: &mut FxHashMap<Name, Mark>,
    stack: &mut Vec<Name>,
) -> Result<usize, SynthError> {
    match marks.get(&name) {
        Some(&Mark::Done(level)) => return Ok(level),
        Some(Mark::Visiting) => {
            let start = stack.iter().position(|&n| n == name).unwrap_or(0);
            let mut cycle = stack[start..].to_vec();
            cycle.push(name);
            return Err(SynthError::NestedAggregateCycle { cycle });
        }
        None => {}
    }

    marks.insert(name, Mark::Visiting);
    stack.push(name);
    let mut level = 0;
    if let Some(deps) = edges.get(&name) {
        for &dep in deps {
            let dep_level = vac_stack::ensure_sufficient_stack(|| visit(dep, edges, marks, stack))?;
            level = level.max(dep_level + 1);
        }
    }
    stack.pop();
    marks.insert(name, Mark::Done(level));
    Ok(level)
}

/// Convenience for callers that only hold a table.
pub fn dependency_order(pool: &Pool, table: &DeclTable<'_>) -> Result<DependencyOrder, SynthError> {
    DependencyOrder::compute(&PropertyClassifier::new(pool, table))
}

#[cfg(test)]
mod tests;
