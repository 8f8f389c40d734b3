//! Reference interpreter for synthesized bodies.
//!
//! Executes `equals`/`hashCode` bodies against instances represented as
//! frozen [`ConstValue::Aggregate`] trees. Primitive calls run by their
//! [`IntrinsicOp`], whatever symbol and call shape a backend chose, so bodies
//! synthesized for different targets can be checked against each other.
//!
//! Scalar hashes follow the JVM conventions (`Boolean` 1231/1237,
//! `Long` folded high-to-low, `String` polynomial over UTF-16 units).

use std::fmt;

use vac_const::{ConstValue, ScalarLiteral};
use vac_ir::{
    BinaryOp, BodyExpr, BodyExprId, IntrinsicOp, LocalId, MethodBody, MethodKind, Module, Name,
    ParamRole, Stmt, StringInterner,
};
use vac_stack::ensure_sufficient_stack;

/// A runtime value.
#[derive(Clone, Debug)]
pub enum RtValue {
    Bool(bool),
    Int(i32),
    Value(ConstValue),
}

impl RtValue {
    fn type_name(&self) -> &'static str {
        match self {
            RtValue::Bool(_) => "Boolean",
            RtValue::Int(_) => "Int",
            RtValue::Value(v) => v.kind_name(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum EvalError {
    /// `other` read inside a `hashCode` body, or not supplied.
    MissingArgument,
    UninitializedLocal { local: LocalId },
    DanglingExpr { id: BodyExprId },
    TypeMismatch {
        expected: &'static str,
        found: &'static str,
    },
    /// Property read on an instance that has no such field.
    MissingField { field: Name },
    /// Call of a contract that was never synthesized.
    MissingContract { owner: Name },
    /// An expression form synthesized bodies never contain.
    Unsupported { what: &'static str },
    /// The statement list ended without returning.
    NoReturn,
}

impl fmt::Display for EvalError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EvalError::MissingArgument => write!(f, "body reads a parameter it was not given"),
            EvalError::UninitializedLocal { local } => {
                write!(f, "local l{} read before assignment", local.raw())
            }
            EvalError::DanglingExpr { id } => write!(f, "expression #{} does not exist", id.raw()),
            EvalError::TypeMismatch { expected, found } => {
                write!(f, "expected {expected}, found {found}")
            }
            EvalError::MissingField { field } => write!(f, "instance has no field {field:?}"),
            EvalError::MissingContract { owner } => {
                write!(f, "no synthesized contract for {owner:?}")
            }
            EvalError::Unsupported { what } => write!(f, "cannot evaluate {what}"),
            EvalError::NoReturn => write!(f, "body finished without returning"),
        }
    }
}

impl std::error::Error for EvalError {}

/// Executes synthesized bodies of one module.
pub struct BodyInterpreter<'a> {
    module: &'a Module,
    interner: &'a StringInterner,
}

struct Frame<'f> {
    body: &'f MethodBody,
    this: &'f ConstValue,
    other: Option<&'f ConstValue>,
    locals: Vec<Option<RtValue>>,
}

impl<'a> BodyInterpreter<'a> {
    pub fn new(module: &'a Module, interner: &'a StringInterner) -> Self {
        Self { module, interner }
    }

    /// `this.equals(other)` through `owner`'s synthesized contract.
    pub fn equals(
        &self,
        owner: Name,
        this: &ConstValue,
        other: &ConstValue,
    ) -> Result<bool, EvalError> {
        let body = self.contract_body(owner, MethodKind::Equals)?;
        expect_bool(&self.run(body, this, Some(other))?)
    }

    /// `this.hashCode()` through `owner`'s synthesized contract.
    pub fn hash_code(&self, owner: Name, this: &ConstValue) -> Result<i32, EvalError> {
        let body = self.contract_body(owner, MethodKind::HashCode)?;
        expect_int(&self.run(body, this, None)?)
    }

    /// Execute `body` with the given parameters.
    pub fn run(
        &self,
        body: &MethodBody,
        this: &ConstValue,
        other: Option<&ConstValue>,
    ) -> Result<RtValue, EvalError> {
        let mut frame = Frame {
            body,
            this,
            other,
            locals: vec![None; body.local_count() as usize],
        };
        for stmt in body.stmts() {
            match *stmt {
                Stmt::ReturnIf { cond, value } => {
                    if expect_bool(&self.eval(&frame, cond)?)? {
                        return self.eval(&frame, value);
                    }
                }
                Stmt::Let { local, init: value } | Stmt::Assign { local, value } => {
                    let v = self.eval(&frame, value)?;
                    if let Some(slot) = frame.locals.get_mut(local.index()) {
                        *slot = Some(v);
                    }
                }
                Stmt::Return(value) => return self.eval(&frame, value),
            }
        }
        Err(EvalError::NoReturn)
    }

    fn contract_body(&self, owner: Name, kind: MethodKind) -> Result<&'a MethodBody, EvalError> {
        self.module
            .value_aggregate(owner)
            .and_then(|decl| decl.contract())
            .map(|contract| contract.body(kind))
            .ok_or(EvalError::MissingContract { owner })
    }

    fn eval(&self, frame: &Frame<'_>, id: BodyExprId) -> Result<RtValue, EvalError> {
        let expr = frame.body.get(id).ok_or(EvalError::DanglingExpr { id })?;
        match expr {
            BodyExpr::Param(ParamRole::This) => Ok(RtValue::Value(frame.this.clone())),
            BodyExpr::Param(ParamRole::Other) => frame
                .other
                .map(|v| RtValue::Value(v.clone()))
                .ok_or(EvalError::MissingArgument),
            BodyExpr::Local(local) => frame
                .locals
                .get(local.index())
                .and_then(Clone::clone)
                .ok_or(EvalError::UninitializedLocal { local: *local }),
            BodyExpr::Bool(b) => Ok(RtValue::Bool(*b)),
            BodyExpr::Int(n) => Ok(RtValue::Int(*n)),
            BodyExpr::Not(operand) => Ok(RtValue::Bool(!expect_bool(&self.eval(frame, *operand)?)?)),
            BodyExpr::IsNull(operand) => {
                let v = self.eval(frame, *operand)?;
                Ok(RtValue::Bool(matches!(v, RtValue::Value(ref c) if c.is_null())))
            }
            BodyExpr::IsInstance { value, ty } => {
                let v = self.eval(frame, *value)?;
                let is = match &v {
                    RtValue::Value(ConstValue::Aggregate(agg)) => agg.constructed_type() == *ty,
                    _ => false,
                };
                Ok(RtValue::Bool(is))
            }
            BodyExpr::GetProperty {
                receiver, property, ..
            } => {
                let v = self.eval(frame, *receiver)?;
                let RtValue::Value(ConstValue::Aggregate(agg)) = &v else {
                    return Err(EvalError::TypeMismatch {
                        expected: "aggregate",
                        found: v.type_name(),
                    });
                };
                agg.field(*property)
                    .map(|f| RtValue::Value(f.clone()))
                    .ok_or(EvalError::MissingField { field: *property })
            }
            BodyExpr::Binary { op, lhs, rhs } => {
                let l = self.eval(frame, *lhs)?;
                let r = self.eval(frame, *rhs)?;
                match op {
                    BinaryOp::Eq => Ok(RtValue::Bool(rt_eq(&l, &r))),
                    BinaryOp::Add => Ok(RtValue::Int(expect_int(&l)?.wrapping_add(expect_int(&r)?))),
                    BinaryOp::Mul => Ok(RtValue::Int(expect_int(&l)?.wrapping_mul(expect_int(&r)?))),
                }
            }
            BodyExpr::If {
                cond,
                then_value,
                else_value,
            } => {
                if expect_bool(&self.eval(frame, *cond)?)? {
                    self.eval(frame, *then_value)
                } else {
                    self.eval(frame, *else_value)
                }
            }
            BodyExpr::ScalarHash { operand, .. } => {
                let v = self.eval(frame, *operand)?;
                Ok(RtValue::Int(self.rt_hash(&v)?))
            }
            BodyExpr::ContractCall {
                owner,
                method,
                receiver,
                args,
            } => {
                let RtValue::Value(recv) = self.eval(frame, *receiver)? else {
                    return Err(EvalError::TypeMismatch {
                        expected: "aggregate",
                        found: "scalar",
                    });
                };
                let arg = match args.first() {
                    Some(&a) => match self.eval(frame, a)? {
                        RtValue::Value(v) => Some(v),
                        other => {
                            return Err(EvalError::TypeMismatch {
                                expected: "aggregate",
                                found: other.type_name(),
                            })
                        }
                    },
                    None => None,
                };
                let body = self.contract_body(*owner, *method)?;
                ensure_sufficient_stack(|| self.run(body, &recv, arg.as_ref()))
            }
            BodyExpr::PrimitiveCall { op, args, .. } => {
                let values = args
                    .iter()
                    .map(|&a| self.eval(frame, a))
                    .collect::<Result<Vec<_>, _>>()?;
                self.primitive(*op, &values)
            }
            BodyExpr::New { .. } => Err(EvalError::Unsupported {
                what: "constructor call",
            }),
        }
    }

    fn primitive(&self, op: IntrinsicOp, args: &[RtValue]) -> Result<RtValue, EvalError> {
        match (op, args) {
            (IntrinsicOp::ArrayContentEquals, [a, b]) => {
                let (a, b) = (expect_array(a)?, expect_array(b)?);
                Ok(RtValue::Bool(
                    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.content_eq(y)),
                ))
            }
            (IntrinsicOp::ArrayContentHash, [a]) => {
                let mut acc: i32 = 1;
                for elem in expect_array(a)? {
                    let h = self.value_hash(elem)?;
                    acc = acc.wrapping_mul(31).wrapping_add(h);
                }
                Ok(RtValue::Int(acc))
            }
            _ => Err(EvalError::Unsupported {
                what: "primitive call arity",
            }),
        }
    }

    fn rt_hash(&self, v: &RtValue) -> Result<i32, EvalError> {
        match v {
            RtValue::Bool(b) => Ok(bool_hash(*b)),
            RtValue::Int(n) => Ok(*n),
            RtValue::Value(c) => self.value_hash(c),
        }
    }

    /// Native hash of a value: its own synthesized `hashCode` when it is an
    /// instance of a value-aggregate with a contract.
    fn value_hash(&self, value: &ConstValue) -> Result<i32, EvalError> {
        match value {
            ConstValue::Constant(lit) => Ok(scalar_hash(lit, self.interner)),
            ConstValue::Aggregate(agg) => {
                let owner = self
                    .module
                    .value_aggregates()
                    .find(|d| d.ty == agg.constructed_type() && d.has_contract());
                match owner {
                    Some(decl) => ensure_sufficient_stack(|| self.hash_code(decl.name, value)),
                    None => Ok(fold_u64(value.content_hash())),
                }
            }
            ConstValue::Array(_) | ConstValue::Intrinsic(_) => Ok(fold_u64(value.content_hash())),
        }
    }
}

/// JVM `hashCode` of a scalar literal.
pub fn scalar_hash(lit: &ScalarLiteral, interner: &StringInterner) -> i32 {
    match *lit {
        ScalarLiteral::Boolean(b) => bool_hash(b),
        ScalarLiteral::Byte(n) => i32::from(n),
        ScalarLiteral::Short(n) => i32::from(n),
        ScalarLiteral::Char(c) => {
            // Code unit for BMP chars, high surrogate otherwise.
            let mut units = [0u16; 2];
            i32::from(c.encode_utf16(&mut units)[0])
        }
        ScalarLiteral::Int(n) => n,
        ScalarLiteral::Long(n) => fold_u64(n as u64),
        ScalarLiteral::Float(x) => x.to_bits() as i32,
        ScalarLiteral::Double(x) => fold_u64(x.to_bits()),
        ScalarLiteral::String(s) => string_hash(interner.lookup(s)),
        ScalarLiteral::EnumEntry { entry, .. } => string_hash(interner.lookup(entry)),
        ScalarLiteral::Null(_) => 0,
    }
}

fn bool_hash(b: bool) -> i32 {
    if b {
        1231
    } else {
        1237
    }
}

fn string_hash(s: &str) -> i32 {
    s.encode_utf16()
        .fold(0i32, |h, unit| h.wrapping_mul(31).wrapping_add(i32::from(unit)))
}

#[expect(
    clippy::cast_possible_truncation,
    reason = "folding to 32 bits is the point"
)]
fn fold_u64(bits: u64) -> i32 {
    (bits ^ (bits >> 32)) as i32
}

fn rt_eq(l: &RtValue, r: &RtValue) -> bool {
    match (l, r) {
        (RtValue::Bool(a), RtValue::Bool(b)) => a == b,
        (RtValue::Int(a), RtValue::Int(b)) => a == b,
        (RtValue::Value(a), RtValue::Value(b)) => a.content_eq(b),
        _ => false,
    }
}

fn expect_bool(v: &RtValue) -> Result<bool, EvalError> {
    match v {
        RtValue::Bool(b) => Ok(*b),
        RtValue::Value(ConstValue::Constant(ScalarLiteral::Boolean(b))) => Ok(*b),
        other => Err(EvalError::TypeMismatch {
            expected: "Boolean",
            found: other.type_name(),
        }),
    }
}

fn expect_int(v: &RtValue) -> Result<i32, EvalError> {
    match v {
        RtValue::Int(n) => Ok(*n),
        RtValue::Value(ConstValue::Constant(ScalarLiteral::Int(n))) => Ok(*n),
        other => Err(EvalError::TypeMismatch {
            expected: "Int",
            found: other.type_name(),
        }),
    }
}

fn expect_array(v: &RtValue) -> Result<&[ConstValue], EvalError> {
    match v {
        RtValue::Value(ConstValue::Array(arr)) => Ok(arr.elements()),
        other => Err(EvalError::TypeMismatch {
            expected: "array",
            found: other.type_name(),
        }),
    }
}

#[cfg(test)]
mod tests;
