//! Human-readable rendering of constants.

use std::fmt;

use vac_ir::{Pool, StringInterner};

use crate::{ConstValue, ScalarLiteral, UnresolvedExpr};

/// Display adapter returned by [`ConstValue::display`].
pub struct ConstDisplay<'a> {
    value: &'a ConstValue,
    interner: &'a StringInterner,
    pool: &'a Pool,
}

impl ConstValue {
    /// Render as source-like text: `Point(x = 1, tag = [3, 4])`.
    pub fn display<'a>(&'a self, interner: &'a StringInterner, pool: &'a Pool) -> ConstDisplay<'a> {
        ConstDisplay {
            value: self,
            interner,
            pool,
        }
    }
}

impl ConstDisplay<'_> {
    fn child<'b>(&'b self, value: &'b ConstValue) -> ConstDisplay<'b> {
        ConstDisplay {
            value,
            interner: self.interner,
            pool: self.pool,
        }
    }

    fn literal(&self, f: &mut fmt::Formatter<'_>, lit: &ScalarLiteral) -> fmt::Result {
        match *lit {
            ScalarLiteral::Boolean(b) => write!(f, "{b}"),
            ScalarLiteral::Byte(n) => write!(f, "{n}"),
            ScalarLiteral::Short(n) => write!(f, "{n}"),
            ScalarLiteral::Int(n) => write!(f, "{n}"),
            ScalarLiteral::Long(n) => write!(f, "{n}L"),
            ScalarLiteral::Float(x) => write!(f, "{x:?}f"),
            ScalarLiteral::Double(x) => write!(f, "{x:?}"),
            ScalarLiteral::Char(c) => write!(f, "{c:?}"),
            ScalarLiteral::String(s) => write!(f, "{:?}", self.interner.lookup(s)),
            ScalarLiteral::EnumEntry { enum_type, entry } => write!(
                f,
                "{}.{}",
                self.pool.display(enum_type, self.interner),
                self.interner.lookup(entry)
            ),
            ScalarLiteral::Null(_) => write!(f, "null"),
        }
    }
}

impl fmt::Display for ConstDisplay<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            ConstValue::Constant(lit) => self.literal(f, lit),
            ConstValue::Aggregate(agg) => {
                write!(f, "{}(", self.pool.display(agg.constructed_type(), self.interner))?;
                for (i, (name, value)) in agg.fields().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} = {}", self.interner.lookup(name), self.child(value))?;
                }
                write!(f, ")")
            }
            ConstValue::Array(arr) => {
                write!(f, "[")?;
                for (i, value) in arr.elements().iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", self.child(value))?;
                }
                write!(f, "]")
            }
            ConstValue::Intrinsic(UnresolvedExpr::SymbolRef { symbol, .. }) => {
                write!(f, "{}", self.interner.lookup(*symbol))
            }
            ConstValue::Intrinsic(UnresolvedExpr::Call { callee, args, .. }) => {
                write!(f, "{}(", self.interner.lookup(*callee))?;
                for (i, value) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", self.child(value))?;
                }
                write!(f, ")")
            }
            ConstValue::Intrinsic(UnresolvedExpr::Opaque(op)) => {
                write!(f, "<opaque {}>", op.description())
            }
        }
    }
}
