//! AST construction helpers shared by the integration tests. The real
//! parser lives outside this crate, so tests assemble trees by hand.

#![allow(dead_code)]

use lark::ast::types::{
    Dec, Exp, ExpKind, Field, FunDec, Oper, Span, Spanned, SynTy, TypeDec, Var, VarDec, VarKind,
};
use lark::utils::{Symbol, sym};

pub fn span(start: u32) -> Span {
    Span {
        start,
        end: start + 1,
    }
}

pub fn ex(kind: ExpKind) -> Exp {
    Spanned::new(kind, Span::DUMMY)
}

pub fn ex_at(kind: ExpKind, span: Span) -> Exp {
    Spanned::new(kind, span)
}

pub fn name(s: &str) -> Spanned<Symbol> {
    Spanned::new(sym(s), Span::DUMMY)
}

pub fn int(n: i64) -> Exp {
    ex(ExpKind::Int(n))
}

pub fn string(s: &str) -> Exp {
    ex(ExpKind::Str(s.to_string()))
}

pub fn nil() -> Exp {
    ex(ExpKind::Nil)
}

pub fn simple(s: &str) -> Var {
    Spanned::new(VarKind::Simple(sym(s)), Span::DUMMY)
}

pub fn field(base: Var, f: &str) -> Var {
    Spanned::new(VarKind::Field(Box::new(base), sym(f)), Span::DUMMY)
}

pub fn subscript(base: Var, index: Exp) -> Var {
    Spanned::new(
        VarKind::Subscript(Box::new(base), Box::new(index)),
        Span::DUMMY,
    )
}

pub fn var(s: &str) -> Exp {
    ex(ExpKind::Var(simple(s)))
}

pub fn op(left: Exp, oper: Oper, right: Exp) -> Exp {
    ex(ExpKind::Op {
        left: Box::new(left),
        oper,
        right: Box::new(right),
    })
}

pub fn call(func: &str, args: Vec<Exp>) -> Exp {
    ex(ExpKind::Call {
        func: sym(func),
        args,
    })
}

pub fn assign(var: Var, exp: Exp) -> Exp {
    ex(ExpKind::Assign {
        var,
        exp: Box::new(exp),
    })
}

pub fn seq(exps: Vec<Exp>) -> Exp {
    ex(ExpKind::Seq(exps))
}

pub fn if_then(test: Exp, then: Exp) -> Exp {
    ex(ExpKind::If {
        test: Box::new(test),
        then: Box::new(then),
        else_: None,
    })
}

pub fn if_then_else(test: Exp, then: Exp, else_: Exp) -> Exp {
    ex(ExpKind::If {
        test: Box::new(test),
        then: Box::new(then),
        else_: Some(Box::new(else_)),
    })
}

pub fn while_loop(test: Exp, body: Exp) -> Exp {
    ex(ExpKind::While {
        test: Box::new(test),
        body: Box::new(body),
    })
}

pub fn for_loop(var: &str, lo: Exp, hi: Exp, body: Exp) -> Exp {
    ex(ExpKind::For {
        var: sym(var),
        escape: true,
        lo: Box::new(lo),
        hi: Box::new(hi),
        body: Box::new(body),
    })
}

pub fn let_(decs: Vec<Dec>, body: Exp) -> Exp {
    ex(ExpKind::Let {
        decs,
        body: Box::new(body),
    })
}

pub fn var_dec(name: &str, ty: Option<&str>, init: Exp) -> Dec {
    Dec::Var(VarDec {
        name: sym(name),
        escape: true,
        ty: ty.map(self::name),
        init,
        span: Span::DUMMY,
    })
}

pub fn type_dec(n: &str, ty: SynTy) -> TypeDec {
    TypeDec { name: name(n), ty }
}

pub fn record_ty(fields: Vec<(&str, &str)>) -> SynTy {
    SynTy::Record(
        fields
            .into_iter()
            .map(|(fname, fty)| Field {
                name: sym(fname),
                escape: true,
                ty: name(fty),
                span: Span::DUMMY,
            })
            .collect(),
    )
}

pub fn fun_dec(n: &str, params: Vec<(&str, &str)>, result: Option<&str>, body: Exp) -> FunDec {
    FunDec {
        name: name(n),
        params: params
            .into_iter()
            .map(|(pname, pty)| Field {
                name: sym(pname),
                escape: true,
                ty: name(pty),
                span: Span::DUMMY,
            })
            .collect(),
        result: result.map(name),
        body,
    }
}

pub fn record_exp(ty: &str, fields: Vec<(&str, Exp)>) -> Exp {
    ex(ExpKind::Record {
        ty: sym(ty),
        fields: fields
            .into_iter()
            .map(|(fname, init)| (name(fname), init))
            .collect(),
    })
}

pub fn array_exp(ty: &str, size: Exp, init: Exp) -> Exp {
    ex(ExpKind::Array {
        ty: sym(ty),
        size: Box::new(size),
        init: Box::new(init),
    })
}
