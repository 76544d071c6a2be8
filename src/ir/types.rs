//! Tree IR type definitions.

use serde::Serialize;
use strum::Display;

use crate::utils::{Symbol, Uniq, sym};

/// A symbolic register. Values below [`RESERVED_TEMPS`] denote machine
/// registers named by the target description in [`frame`](crate::frame);
/// everything from there up is allocated by [`Gen::temp`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Temp(pub u32);

pub const RESERVED_TEMPS: u32 = 64;

/// An assembly-level label: a code position or a data-segment address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct Label(pub Symbol);

impl Label {
    /// A label with a fixed, externally visible name (runtime entry points,
    /// the program entry).
    pub fn named(name: impl AsRef<str>) -> Label {
        Label(sym(name))
    }
}

/// Generator for fresh temporaries, labels, and type identities.
///
/// One `Gen` exists per compilation, owned by the translator and threaded by
/// `&mut` everywhere fresh names are needed, so independent compilations
/// never share state.
#[derive(Debug, Serialize)]
pub struct Gen {
    next_temp: u32,
    next_label: u32,
    next_uniq: u32,
}

impl Gen {
    pub fn new() -> Self {
        Gen {
            next_temp: RESERVED_TEMPS,
            next_label: 0,
            next_uniq: 0,
        }
    }

    pub fn temp(&mut self) -> Temp {
        let t = Temp(self.next_temp);
        self.next_temp += 1;
        t
    }

    pub fn label(&mut self) -> Label {
        let l = Label(sym(format!("L{}", self.next_label)));
        self.next_label += 1;
        l
    }

    /// A fresh label whose name keeps a human-readable stem, used for
    /// function entries and string literals.
    pub fn named_label(&mut self, stem: impl AsRef<str>) -> Label {
        let l = Label(sym(format!("{}_{}", stem.as_ref(), self.next_label)));
        self.next_label += 1;
        l
    }

    pub fn uniq(&mut self) -> Uniq {
        let u = Uniq(self.next_uniq);
        self.next_uniq += 1;
        u
    }
}

impl Default for Gen {
    fn default() -> Self {
        Gen::new()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum BinOp {
    Plus,
    Minus,
    Mul,
    Div,
    And,
    Or,
    Lshift,
    Rshift,
    Arshift,
    Xor,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, Serialize)]
#[strum(serialize_all = "lowercase")]
pub enum RelOp {
    Eq,
    Ne,
    Lt,
    Gt,
    Le,
    Ge,
    Ult,
    Ule,
    Ugt,
    Uge,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Exp {
    Const(i64),
    Name(Label),
    Temp(Temp),
    Binop(BinOp, Box<Exp>, Box<Exp>),
    /// An address dereference: a load, except on the left of a [`Stm::Move`]
    /// where it is a store.
    Mem(Box<Exp>),
    Call(Box<Exp>, Vec<Exp>),
    /// Evaluate the statement for effect, then yield the expression.
    /// Eliminated by [`canon::linearize`](super::canon::linearize).
    Eseq(Box<Stm>, Box<Exp>),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Stm {
    Move(Exp, Exp),
    Exp(Exp),
    Jump(Exp, Vec<Label>),
    Cjump(RelOp, Exp, Exp, Label, Label),
    Seq(Box<Stm>, Box<Stm>),
    Label(Label),
}

impl Exp {
    pub fn binop(op: BinOp, left: Exp, right: Exp) -> Exp {
        Exp::Binop(op, Box::new(left), Box::new(right))
    }

    pub fn mem(addr: Exp) -> Exp {
        Exp::Mem(Box::new(addr))
    }

    pub fn call(func: Exp, args: Vec<Exp>) -> Exp {
        Exp::Call(Box::new(func), args)
    }

    pub fn eseq(stm: Stm, exp: Exp) -> Exp {
        Exp::Eseq(Box::new(stm), Box::new(exp))
    }

    /// Address arithmetic: `base + offset`, folding away a zero offset.
    pub fn offset(base: Exp, offset: i64) -> Exp {
        if offset == 0 {
            base
        } else {
            Exp::binop(BinOp::Plus, base, Exp::Const(offset))
        }
    }
}

impl Stm {
    /// Folds a list of statements into nested [`Stm::Seq`]s. An empty list
    /// becomes a no-op.
    pub fn seq(stms: Vec<Stm>) -> Stm {
        let mut iter = stms.into_iter().rev();
        let last = match iter.next() {
            Some(stm) => stm,
            None => Stm::Exp(Exp::Const(0)),
        };
        iter.fold(last, |acc, stm| Stm::Seq(Box::new(stm), Box::new(acc)))
    }

    pub fn jump_to(label: Label) -> Stm {
        Stm::Jump(Exp::Name(label), vec![label])
    }
}
