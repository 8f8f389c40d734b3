//! Scalar leaves of a constant value tree.

use std::hash::{Hash, Hasher};

use vac_ir::{Idx, Name};

/// A scalar constant.
///
/// Floating-point literals compare by bit pattern: `NaN` equals itself and
/// `0.0` differs from `-0.0`. This keeps content-equality reflexive for
/// every tree.
#[derive(Clone, Copy, Debug)]
pub enum ScalarLiteral {
    Boolean(bool),
    Byte(i8),
    Short(i16),
    Char(char),
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    /// Interned string contents.
    String(Name),
    EnumEntry { enum_type: Idx, entry: Name },
    /// `null` of a given (nullable) type.
    Null(Idx),
}

impl ScalarLiteral {
    /// The literal's static type.
    pub fn ty(&self) -> Idx {
        match *self {
            ScalarLiteral::Boolean(_) => Idx::BOOLEAN,
            ScalarLiteral::Byte(_) => Idx::BYTE,
            ScalarLiteral::Short(_) => Idx::SHORT,
            ScalarLiteral::Char(_) => Idx::CHAR,
            ScalarLiteral::Int(_) => Idx::INT,
            ScalarLiteral::Long(_) => Idx::LONG,
            ScalarLiteral::Float(_) => Idx::FLOAT,
            ScalarLiteral::Double(_) => Idx::DOUBLE,
            ScalarLiteral::String(_) => Idx::STRING,
            ScalarLiteral::EnumEntry { enum_type, .. } => enum_type,
            ScalarLiteral::Null(ty) => ty,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, ScalarLiteral::Null(_))
    }
}

impl PartialEq for ScalarLiteral {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (ScalarLiteral::Boolean(a), ScalarLiteral::Boolean(b)) => a == b,
            (ScalarLiteral::Byte(a), ScalarLiteral::Byte(b)) => a == b,
            (ScalarLiteral::Short(a), ScalarLiteral::Short(b)) => a == b,
            (ScalarLiteral::Char(a), ScalarLiteral::Char(b)) => a == b,
            (ScalarLiteral::Int(a), ScalarLiteral::Int(b)) => a == b,
            (ScalarLiteral::Long(a), ScalarLiteral::Long(b)) => a == b,
            (ScalarLiteral::Float(a), ScalarLiteral::Float(b)) => a.to_bits() == b.to_bits(),
            (ScalarLiteral::Double(a), ScalarLiteral::Double(b)) => a.to_bits() == b.to_bits(),
            (ScalarLiteral::String(a), ScalarLiteral::String(b)) => a == b,
            (
                ScalarLiteral::EnumEntry {
                    enum_type: t1,
                    entry: e1,
                },
                ScalarLiteral::EnumEntry {
                    enum_type: t2,
                    entry: e2,
                },
            ) => t1 == t2 && e1 == e2,
            (ScalarLiteral::Null(a), ScalarLiteral::Null(b)) => a == b,
            _ => false,
        }
    }
}

impl Eq for ScalarLiteral {}

impl Hash for ScalarLiteral {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            ScalarLiteral::Boolean(b) => b.hash(state),
            ScalarLiteral::Byte(n) => n.hash(state),
            ScalarLiteral::Short(n) => n.hash(state),
            ScalarLiteral::Char(c) => c.hash(state),
            ScalarLiteral::Int(n) => n.hash(state),
            ScalarLiteral::Long(n) => n.hash(state),
            ScalarLiteral::Float(f) => f.to_bits().hash(state),
            ScalarLiteral::Double(f) => f.to_bits().hash(state),
            ScalarLiteral::String(s) => s.hash(state),
            ScalarLiteral::EnumEntry { enum_type, entry } => {
                enum_type.hash(state);
                entry.hash(state);
            }
            ScalarLiteral::Null(ty) => ty.hash(state),
        }
    }
}
