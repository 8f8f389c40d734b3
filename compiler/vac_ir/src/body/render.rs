//! Pseudo-source rendering of method bodies for logs and tests.

use std::fmt::Write;

use super::{BinaryOp, BodyExpr, BodyExprId, CallShape, MethodBody, MethodKind, ParamRole, Stmt};
use crate::{Pool, StringInterner};

impl MethodBody {
    /// Render this body as Kotlin-like source.
    ///
    /// Output is fully parenthesized; it exists to make generated bodies
    /// readable, not to be parsed back.
    pub fn render(&self, interner: &StringInterner, pool: &Pool) -> String {
        let r = Renderer {
            body: self,
            interner,
            pool,
        };
        let mut out = String::new();
        match self.kind {
            MethodKind::Equals => out.push_str("fun equals(other: Any?): Boolean {\n"),
            MethodKind::HashCode => out.push_str("fun hashCode(): Int {\n"),
        }
        for stmt in &self.stmts {
            out.push_str("    ");
            r.stmt(&mut out, stmt);
            out.push('\n');
        }
        out.push('}');
        out
    }
}

struct Renderer<'a> {
    body: &'a MethodBody,
    interner: &'a StringInterner,
    pool: &'a Pool,
}

impl Renderer<'_> {
    fn stmt(&self, out: &mut String, stmt: &Stmt) {
        match *stmt {
            Stmt::ReturnIf { cond, value } => {
                out.push_str("if (");
                self.expr(out, cond);
                out.push_str(") return ");
                self.expr(out, value);
            }
            Stmt::Let { local, init } => {
                let _ = write!(out, "var l{} = ", local.raw());
                self.expr(out, init);
            }
            Stmt::Assign { local, value } => {
                let _ = write!(out, "l{} = ", local.raw());
                self.expr(out, value);
            }
            Stmt::Return(value) => {
                out.push_str("return ");
                self.expr(out, value);
            }
        }
    }

    fn args(&self, out: &mut String, args: &[BodyExprId]) {
        for (i, &arg) in args.iter().enumerate() {
            if i > 0 {
                out.push_str(", ");
            }
            self.expr(out, arg);
        }
    }

    fn expr(&self, out: &mut String, id: BodyExprId) {
        let Some(expr) = self.body.get(id) else {
            let _ = write!(out, "<invalid #{}>", id.raw());
            return;
        };
        match expr {
            BodyExpr::Param(ParamRole::This) => out.push_str("this"),
            BodyExpr::Param(ParamRole::Other) => out.push_str("other"),
            BodyExpr::Local(local) => {
                let _ = write!(out, "l{}", local.raw());
            }
            BodyExpr::Bool(b) => {
                let _ = write!(out, "{b}");
            }
            BodyExpr::Int(n) => {
                let _ = write!(out, "{n}");
            }
            BodyExpr::Not(operand) => {
                out.push_str("!(");
                self.expr(out, *operand);
                out.push(')');
            }
            BodyExpr::IsNull(operand) => {
                out.push('(');
                self.expr(out, *operand);
                out.push_str(" == null)");
            }
            BodyExpr::IsInstance { value, ty } => {
                self.expr(out, *value);
                let _ = write!(out, " is {}", self.pool.display(*ty, self.interner));
            }
            BodyExpr::GetProperty {
                receiver, property, ..
            } => {
                self.expr(out, *receiver);
                let _ = write!(out, ".{}", self.interner.lookup(*property));
            }
            BodyExpr::Binary { op, lhs, rhs } => {
                let op = match op {
                    BinaryOp::Eq => "==",
                    BinaryOp::Add => "+",
                    BinaryOp::Mul => "*",
                };
                out.push('(');
                self.expr(out, *lhs);
                let _ = write!(out, " {op} ");
                self.expr(out, *rhs);
                out.push(')');
            }
            BodyExpr::If {
                cond,
                then_value,
                else_value,
            } => {
                out.push_str("(if (");
                self.expr(out, *cond);
                out.push_str(") ");
                self.expr(out, *then_value);
                out.push_str(" else ");
                self.expr(out, *else_value);
                out.push(')');
            }
            BodyExpr::ScalarHash { operand, .. } => {
                self.expr(out, *operand);
                out.push_str(".hashCode()");
            }
            BodyExpr::ContractCall {
                method,
                receiver,
                args,
                ..
            } => {
                self.expr(out, *receiver);
                let _ = write!(out, ".{}(", method.method_name());
                self.args(out, args);
                out.push(')');
            }
            BodyExpr::PrimitiveCall {
                symbol,
                shape,
                args,
                ..
            } => {
                let symbol = call_name(self.interner.lookup(*symbol), *shape);
                match (shape, args.split_first()) {
                    (CallShape::Extension, Some((&receiver, rest))) => {
                        self.expr(out, receiver);
                        let _ = write!(out, ".{symbol}(");
                        self.args(out, rest);
                    }
                    _ => {
                        let _ = write!(out, "{symbol}(");
                        self.args(out, args);
                    }
                }
                out.push(')');
            }
            BodyExpr::New { class, args } => {
                let _ = write!(out, "{}(", self.interner.lookup(*class));
                self.args(out, args);
                out.push(')');
            }
        }
    }
}

/// Source spelling of a primitive symbol.
///
/// Symbols name one overload: extension symbols are qualified by receiver
/// type (`kotlin.collections.IntArray.contentEquals`), static symbols may
/// carry a method descriptor (`java.util.Arrays.equals([I[I)Z`). The call
/// site spells only the simple name or the qualified name without the
/// descriptor.
fn call_name(symbol: &str, shape: CallShape) -> &str {
    match shape {
        CallShape::Extension => symbol.rsplit('.').next().unwrap_or(symbol),
        CallShape::Static => symbol.split('(').next().unwrap_or(symbol),
    }
}
