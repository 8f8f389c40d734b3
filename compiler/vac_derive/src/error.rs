//! Synthesis failures.
//!
//! Every variant is fatal for the compilation unit. Nothing is attached to
//! the module when the pass returns an error.

use std::fmt;

use vac_ir::{DeclError, ElementCategory, Idx, IntrinsicOp, Name, Pool, StringInterner};

/// Which upstream party is at fault.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The backend did not register a primitive it needs, or the options
    /// are unusable.
    Configuration,
    /// An earlier phase handed over data that contradicts itself, such as
    /// a constant tree queried before population (`vac_const::ConstError`).
    InternalConsistency,
    /// The declarations contain something synthesis cannot handle.
    InputShape,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SynthError {
    /// No content primitive is registered for an array element category.
    MissingArrayPrimitive {
        category: ElementCategory,
        op: IntrinsicOp,
        declaration: Name,
        property: Name,
    },
    /// A property's type is the error sentinel, `Unit`, or not in the pool.
    UnclassifiableType {
        declaration: Name,
        property: Name,
        ty: Idx,
    },
    /// The property's `is_array` flag disagrees with its type.
    ArrayFlagMismatch {
        declaration: Name,
        property: Name,
        ty: Idx,
    },
    /// An ancestor names a declaration that is not a value-aggregate of the
    /// module.
    UnknownAggregate { declaration: Name, target: Name },
    /// Value-aggregates that contain each other by value.
    NestedAggregateCycle { cycle: Vec<Name> },
    /// Any other malformed declaration input.
    Declaration(DeclError),
    InvalidOptions { reason: &'static str },
}

impl SynthError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SynthError::MissingArrayPrimitive { .. } | SynthError::InvalidOptions { .. } => {
                ErrorKind::Configuration
            }
            SynthError::UnclassifiableType { .. }
            | SynthError::ArrayFlagMismatch { .. }
            | SynthError::UnknownAggregate { .. }
            | SynthError::NestedAggregateCycle { .. }
            | SynthError::Declaration(_) => ErrorKind::InputShape,
        }
    }

    /// The declaration the error is reported against, if any.
    pub fn declaration(&self) -> Option<Name> {
        match self {
            SynthError::MissingArrayPrimitive { declaration, .. }
            | SynthError::UnclassifiableType { declaration, .. }
            | SynthError::ArrayFlagMismatch { declaration, .. }
            | SynthError::UnknownAggregate { declaration, .. } => Some(*declaration),
            SynthError::NestedAggregateCycle { cycle } => cycle.first().copied(),
            SynthError::Declaration(
                DeclError::DuplicateDeclaration { name: declaration }
                | DeclError::DuplicateType {
                    second: declaration,
                    ..
                }
                | DeclError::AncestorCycle { declaration }
                | DeclError::UnknownAncestor { declaration, .. },
            ) => Some(*declaration),
            SynthError::InvalidOptions { .. } => None,
        }
    }
}

impl SynthError {
    /// The message with declaration, property and type names resolved.
    pub fn render(&self, interner: &StringInterner, pool: &Pool) -> String {
        let name = |n: Name| interner.lookup(n);
        match self {
            SynthError::MissingArrayPrimitive {
                category,
                op,
                declaration,
                property,
            } => format!(
                "no {op:?} primitive registered for {category} \
                 (needed by property `{}` of `{}`)",
                name(*property),
                name(*declaration)
            ),
            SynthError::UnclassifiableType {
                declaration,
                property,
                ty,
            } => format!(
                "cannot classify type `{}` of property `{}` of `{}`",
                pool.display(*ty, interner),
                name(*property),
                name(*declaration)
            ),
            SynthError::ArrayFlagMismatch {
                declaration,
                property,
                ty,
            } => format!(
                "array flag of property `{}` of `{}` disagrees with its type `{}`",
                name(*property),
                name(*declaration),
                pool.display(*ty, interner)
            ),
            SynthError::UnknownAggregate {
                declaration,
                target,
            } => format!(
                "`{}` refers to unknown value-aggregate `{}`",
                name(*declaration),
                name(*target)
            ),
            SynthError::NestedAggregateCycle { cycle } => {
                let path: Vec<&str> = cycle.iter().map(|&n| name(n)).collect();
                format!("value-aggregates contain each other: {}", path.join(" -> "))
            }
            SynthError::Declaration(err) => err.render(interner),
            SynthError::InvalidOptions { .. } => self.to_string(),
        }
    }
}

impl From<DeclError> for SynthError {
    fn from(err: DeclError) -> Self {
        match err {
            DeclError::UnknownAncestor {
                declaration,
                ancestor,
            } => SynthError::UnknownAggregate {
                declaration,
                target: ancestor,
            },
            other => SynthError::Declaration(other),
        }
    }
}

impl fmt::Display for SynthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynthError::MissingArrayPrimitive {
                category,
                op,
                declaration,
                property,
            } => write!(
                f,
                "no {op:?} primitive registered for {category} \
                 (needed by property {property:?} of {declaration:?})"
            ),
            SynthError::UnclassifiableType {
                declaration,
                property,
                ty,
            } => write!(
                f,
                "cannot classify type {} of property {property:?} of {declaration:?}",
                ty.raw()
            ),
            SynthError::ArrayFlagMismatch {
                declaration,
                property,
                ty,
            } => write!(
                f,
                "array flag of property {property:?} of {declaration:?} \
                 disagrees with its type {}",
                ty.raw()
            ),
            SynthError::UnknownAggregate {
                declaration,
                target,
            } => write!(
                f,
                "{declaration:?} refers to unknown value-aggregate {target:?}"
            ),
            SynthError::NestedAggregateCycle { cycle } => {
                write!(f, "value-aggregates contain each other: {cycle:?}")
            }
            SynthError::Declaration(err) => write!(f, "{err}"),
            SynthError::InvalidOptions { reason } => {
                write!(f, "invalid synthesis options: {reason}")
            }
        }
    }
}

impl std::error::Error for SynthError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SynthError::Declaration(err) => Some(err),
            _ => None,
        }
    }
}
