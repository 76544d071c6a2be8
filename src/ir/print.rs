//! Pretty-printer for the tree IR.

use std::fmt;

use itertools::Itertools;

use super::types::{Exp, Label, Stm, Temp};

impl fmt::Display for Temp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "t{}", self.0)
    }
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for Exp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Exp::Const(n) => write!(f, "{n}"),
            Exp::Name(label) => write!(f, "&{label}"),
            Exp::Temp(t) => write!(f, "{t}"),
            Exp::Binop(op, left, right) => write!(f, "{op}({left}, {right})"),
            Exp::Mem(addr) => write!(f, "mem[{addr}]"),
            Exp::Call(func, args) => write!(f, "{func}({})", args.iter().join(", ")),
            Exp::Eseq(stm, exp) => write!(f, "eseq({stm}; {exp})"),
        }
    }
}

impl fmt::Display for Stm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stm::Move(dst, src) => write!(f, "{dst} <- {src}"),
            Stm::Exp(exp) => write!(f, "discard {exp}"),
            Stm::Jump(target, _) => write!(f, "jump {target}"),
            Stm::Cjump(op, left, right, t, fl) => {
                write!(f, "if {op}({left}, {right}) then {t} else {fl}")
            }
            Stm::Seq(a, b) => write!(f, "{a}\n{b}"),
            Stm::Label(label) => write!(f, "{label}:"),
        }
    }
}
