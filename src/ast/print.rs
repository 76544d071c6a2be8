//! Pretty-printer for the AST.

use std::fmt;

use itertools::Itertools;

use super::types::{Dec, ExpKind, Oper, SynTy, VarKind};
use crate::utils::indent;

impl fmt::Display for Oper {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Oper::Plus => "+",
            Oper::Minus => "-",
            Oper::Times => "*",
            Oper::Divide => "/",
            Oper::Eq => "=",
            Oper::Neq => "<>",
            Oper::Lt => "<",
            Oper::Le => "<=",
            Oper::Gt => ">",
            Oper::Ge => ">=",
        };
        write!(f, "{s}")
    }
}

impl fmt::Display for VarKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            VarKind::Simple(name) => write!(f, "{name}"),
            VarKind::Field(var, field) => write!(f, "{}.{field}", var.value),
            VarKind::Subscript(var, index) => write!(f, "{}[{}]", var.value, index.value),
        }
    }
}

impl fmt::Display for ExpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExpKind::Var(var) => write!(f, "{}", var.value),
            ExpKind::Nil => write!(f, "nil"),
            ExpKind::Int(n) => write!(f, "{n}"),
            ExpKind::Str(s) => write!(f, "{s:?}"),
            ExpKind::Call { func, args } => {
                write!(f, "{func}({})", args.iter().map(|a| &a.value).join(", "))
            }
            ExpKind::Op { left, oper, right } => {
                write!(f, "({} {oper} {})", left.value, right.value)
            }
            ExpKind::Record { ty, fields } => {
                let fields = fields
                    .iter()
                    .map(|(name, init)| format!("{} = {}", name.value, init.value))
                    .join(", ");
                write!(f, "{ty} {{ {fields} }}")
            }
            ExpKind::Seq(exps) => {
                write!(f, "({})", exps.iter().map(|e| &e.value).join("; "))
            }
            ExpKind::Assign { var, exp } => write!(f, "{} := {}", var.value, exp.value),
            ExpKind::If { test, then, else_ } => {
                write!(f, "if {} then {}", test.value, then.value)?;
                if let Some(else_) = else_ {
                    write!(f, " else {}", else_.value)?;
                }
                Ok(())
            }
            ExpKind::While { test, body } => {
                write!(f, "while {} do {}", test.value, body.value)
            }
            ExpKind::For {
                var, lo, hi, body, ..
            } => {
                write!(
                    f,
                    "for {var} := {} to {} do {}",
                    lo.value, hi.value, body.value
                )
            }
            ExpKind::Break => write!(f, "break"),
            ExpKind::Let { decs, body } => {
                writeln!(f, "let")?;
                for dec in decs {
                    write!(f, "{}", indent(format!("{dec}\n")))?;
                }
                writeln!(f, "in")?;
                write!(f, "{}", indent(format!("{}\n", body.value)))?;
                write!(f, "end")
            }
            ExpKind::Array { ty, size, init } => {
                write!(f, "{ty}[{}] of {}", size.value, init.value)
            }
        }
    }
}

impl fmt::Display for Dec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Dec::Var(v) => {
                write!(f, "var {}", v.name)?;
                if let Some(ty) = &v.ty {
                    write!(f, " : {}", ty.value)?;
                }
                write!(f, " := {}", v.init.value)
            }
            Dec::Types(decs) => {
                for (i, dec) in decs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    write!(f, "type {} = {}", dec.name.value, dec.ty)?;
                }
                Ok(())
            }
            Dec::Funcs(decs) => {
                for (i, dec) in decs.iter().enumerate() {
                    if i > 0 {
                        writeln!(f)?;
                    }
                    let params = dec
                        .params
                        .iter()
                        .map(|p| format!("{}: {}", p.name, p.ty.value))
                        .join(", ");
                    write!(f, "function {}({params})", dec.name.value)?;
                    if let Some(result) = &dec.result {
                        write!(f, " : {}", result.value)?;
                    }
                    write!(f, " = {}", dec.body.value)?;
                }
                Ok(())
            }
        }
    }
}

impl fmt::Display for SynTy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SynTy::Name(name) => write!(f, "{}", name.value),
            SynTy::Record(fields) => {
                let fields = fields
                    .iter()
                    .map(|field| format!("{}: {}", field.name, field.ty.value))
                    .join(", ");
                write!(f, "{{{fields}}}")
            }
            SynTy::Array(elem) => write!(f, "array of {}", elem.value),
        }
    }
}
