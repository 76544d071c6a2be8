//! The type-and-translate pass.
//!
//! A single recursive walk over the AST that resolves names against the
//! lexically nested environments, enforces the type rules, and builds the
//! tree-IR for every sub-expression as it goes. Each helper returns an
//! [`ExpTy`], the translated fragment paired with its type.

use std::collections::HashSet;

use miette::{Diagnostic, Result, bail, ensure};
use thiserror::Error;

use crate::{
    ast::types::{self as ast, Span, Spanned},
    ir::{BinOp, Exp, Gen, Label, RelOp, Stm},
    semant::{
        env::{self, Entry, FnEntry, ScopeMap, VarEntry},
        types::{Ty, TyKind},
    },
    translate::{Fragment, LevelId, Translator},
    utils::Symbol,
};

#[derive(Diagnostic, Error, Debug)]
pub enum TypeError {
    #[error("undefined variable `{name}`")]
    UndefinedVariable {
        name: Symbol,
        #[label]
        span: Span,
    },

    #[error("undefined function `{name}`")]
    UndefinedFunction {
        name: Symbol,
        #[label]
        span: Span,
    },

    #[error("undefined type `{name}`")]
    UndefinedType {
        name: Symbol,
        #[label]
        span: Span,
    },

    #[error("no field named `{name}`")]
    UndefinedField {
        name: Symbol,
        #[label]
        span: Span,
    },

    #[error("missing field `{name}` in record expression")]
    MissingField {
        name: Symbol,
        #[label]
        span: Span,
    },

    #[error("type mismatch")]
    TypeMismatch {
        expected: Ty,
        actual: Ty,
        #[label("expected `{expected}`, found `{actual}`")]
        span: Span,
    },

    #[error("type mismatch")]
    TypeMismatchCustom {
        expected: String,
        actual: Ty,
        #[label("expected {expected}, found `{actual}`")]
        span: Span,
    },

    #[error("expected {expected} arguments, found {actual}")]
    WrongNumArgs {
        expected: usize,
        actual: usize,
        #[label]
        span: Span,
    },

    #[error("`{name}` is a function, not a variable")]
    FunctionAsValue {
        name: Symbol,
        #[label]
        span: Span,
    },

    #[error("`{name}` is not a function")]
    NotCallable {
        name: Symbol,
        #[label]
        span: Span,
    },

    #[error("You must declare the type of variable {name}")]
    MustDeclareType {
        name: Symbol,
        #[label]
        span: Span,
    },

    #[error("Break is used outside of a loop")]
    BreakOutsideLoop {
        #[label]
        span: Span,
    },

    #[error("cannot assign to loop variable `{name}`")]
    AssignToLoopVar {
        name: Symbol,
        #[label]
        span: Span,
    },

    #[error("`{name}` is declared more than once in its group")]
    DuplicateName {
        name: Symbol,
        #[label]
        span: Span,
    },

    #[error("type alias cycle through `{name}`")]
    TypeCycle {
        name: Symbol,
        #[label]
        span: Span,
    },
}

/// A translated expression and its type.
struct ExpTy {
    exp: Exp,
    ty: Ty,
}

/// A translated l-value. `for` loop variables come back with
/// `assignable: false`.
struct VarTy {
    exp: Exp,
    ty: Ty,
    assignable: bool,
}

/// A binding pushed while processing a `let`, remembered so the scope can
/// be unwound after the body.
enum ScopeKey {
    Var(Symbol),
    Type(Symbol),
}

/// Type-checking context: the two environments plus the translator that
/// owns all frame and fragment state.
pub struct Tcx {
    tr: Translator,
    tenv: ScopeMap<Ty>,
    venv: ScopeMap<Entry>,
}

impl Tcx {
    pub fn new() -> Self {
        let tr = Translator::new();
        let venv = env::base_venv(&tr);
        Tcx {
            tr,
            tenv: env::base_tenv(),
            venv,
        }
    }

    /// Checks and translates a whole program, wrapping the top-level
    /// expression as the `main` procedure.
    pub fn check(mut self, prog: &ast::Exp) -> Result<(Vec<Fragment>, Gen)> {
        let outermost = self.tr.outermost();
        let main = self.tr.new_level(outermost, Label::named("main"), &[]);
        let ExpTy { exp, ty } = self.check_exp(prog, main, None)?;
        let ty = self.actual_ty(ty, prog.span)?;
        self.tr.proc_entry_exit(main, exp, ty == Ty::unit());
        Ok(self.tr.into_fragments())
    }

    /// Chases `Name` references through the type environment until a
    /// structural type appears.
    fn actual_ty(&self, ty: Ty, span: Span) -> Result<Ty> {
        let mut seen = HashSet::new();
        let mut ty = ty;
        while let TyKind::Name(name) = ty.kind() {
            ensure!(
                seen.insert(*name),
                TypeError::TypeCycle { name: *name, span }
            );
            match self.tenv.look(*name) {
                Some(resolved) => ty = *resolved,
                None => bail!(TypeError::UndefinedType { name: *name, span }),
            }
        }
        Ok(ty)
    }

    fn look_ty(&self, name: &Spanned<Symbol>) -> Result<Ty> {
        match self.tenv.look(name.value) {
            Some(ty) => Ok(*ty),
            None => bail!(TypeError::UndefinedType {
                name: name.value,
                span: name.span
            }),
        }
    }

    fn ensure_compatible(&self, expected: Ty, actual: Ty, span: Span) -> Result<()> {
        let expected = self.actual_ty(expected, span)?;
        let actual = self.actual_ty(actual, span)?;
        ensure!(
            expected.compatible(actual),
            TypeError::TypeMismatch {
                expected,
                actual,
                span,
            }
        );
        Ok(())
    }

    fn check_int(&mut self, exp: &ast::Exp, level: LevelId, brk: Option<Label>) -> Result<Exp> {
        let et = self.check_exp(exp, level, brk)?;
        let ty = self.actual_ty(et.ty, exp.span)?;
        ensure!(
            ty == Ty::int(),
            TypeError::TypeMismatch {
                expected: Ty::int(),
                actual: ty,
                span: exp.span,
            }
        );
        Ok(et.exp)
    }

    fn check_exp(&mut self, exp: &ast::Exp, level: LevelId, brk: Option<Label>) -> Result<ExpTy> {
        let span = exp.span;
        let expty = match &exp.value {
            ast::ExpKind::Var(var) => {
                let var = self.check_var(var, level, brk)?;
                ExpTy {
                    exp: var.exp,
                    ty: var.ty,
                }
            }

            ast::ExpKind::Nil => ExpTy {
                exp: self.tr.nil(),
                ty: Ty::nil(),
            },

            ast::ExpKind::Int(n) => ExpTy {
                exp: self.tr.const_int(*n),
                ty: Ty::int(),
            },

            ast::ExpKind::Str(s) => ExpTy {
                exp: self.tr.string(s),
                ty: Ty::string(),
            },

            ast::ExpKind::Call { func, args } => {
                let (flevel, flabel, formals, result) = match self.venv.look(*func) {
                    Some(Entry::Func(f)) => (f.level, f.label, f.formals.clone(), f.result),
                    Some(Entry::Var(_)) => bail!(TypeError::NotCallable { name: *func, span }),
                    None => bail!(TypeError::UndefinedFunction { name: *func, span }),
                };
                ensure!(
                    args.len() == formals.len(),
                    TypeError::WrongNumArgs {
                        expected: formals.len(),
                        actual: args.len(),
                        span,
                    }
                );
                let mut arg_exps = Vec::with_capacity(args.len());
                for (arg, formal) in args.iter().zip(&formals) {
                    let arg_et = self.check_exp(arg, level, brk)?;
                    self.ensure_compatible(*formal, arg_et.ty, arg.span)?;
                    arg_exps.push(arg_et.exp);
                }
                ExpTy {
                    exp: self.tr.call(flevel, flabel, level, arg_exps),
                    ty: result,
                }
            }

            ast::ExpKind::Op { left, oper, right } => self.check_op(left, *oper, right, level, brk)?,

            ast::ExpKind::Record { ty, fields } => {
                let rec_ty = match self.tenv.look(*ty) {
                    Some(ty) => *ty,
                    None => bail!(TypeError::UndefinedType { name: *ty, span }),
                };
                let rec_ty = self.actual_ty(rec_ty, span)?;
                let TyKind::Record {
                    fields: decl_fields,
                    ..
                } = rec_ty.kind()
                else {
                    bail!(TypeError::TypeMismatchCustom {
                        expected: "record".into(),
                        actual: rec_ty,
                        span,
                    })
                };

                // Field names and order must match the declaration exactly.
                let mut inits = Vec::with_capacity(fields.len());
                for ((given_name, given_init), (decl_name, decl_ty)) in
                    fields.iter().zip(decl_fields)
                {
                    ensure!(
                        given_name.value == *decl_name,
                        TypeError::UndefinedField {
                            name: given_name.value,
                            span: given_name.span,
                        }
                    );
                    let init = self.check_exp(given_init, level, brk)?;
                    self.ensure_compatible(*decl_ty, init.ty, given_init.span)?;
                    inits.push(init.exp);
                }
                if fields.len() > decl_fields.len() {
                    let extra = &fields[decl_fields.len()].0;
                    bail!(TypeError::UndefinedField {
                        name: extra.value,
                        span: extra.span,
                    });
                }
                if fields.len() < decl_fields.len() {
                    bail!(TypeError::MissingField {
                        name: decl_fields[fields.len()].0,
                        span,
                    });
                }

                ExpTy {
                    exp: self.tr.record(inits),
                    ty: rec_ty,
                }
            }

            ast::ExpKind::Seq(exps) => {
                let mut ty = Ty::unit();
                let mut irs = Vec::with_capacity(exps.len());
                for exp in exps {
                    let et = self.check_exp(exp, level, brk)?;
                    ty = et.ty;
                    irs.push(et.exp);
                }
                ExpTy {
                    exp: self.tr.seq(irs),
                    ty,
                }
            }

            ast::ExpKind::Assign { var, exp: rhs } => {
                let lhs = self.check_var(var, level, brk)?;
                if !lhs.assignable {
                    let ast::VarKind::Simple(name) = &var.value else {
                        unreachable!("only simple variables can be marked read-only")
                    };
                    bail!(TypeError::AssignToLoopVar {
                        name: *name,
                        span: var.span,
                    });
                }
                let rhs_et = self.check_exp(rhs, level, brk)?;
                self.ensure_compatible(lhs.ty, rhs_et.ty, rhs.span)?;
                ExpTy {
                    exp: self.tr.assign(lhs.exp, rhs_et.exp),
                    ty: Ty::unit(),
                }
            }

            ast::ExpKind::If { test, then, else_ } => {
                let test_exp = self.check_int(test, level, brk)?;
                let then_et = self.check_exp(then, level, brk)?;
                match else_ {
                    None => {
                        let then_ty = self.actual_ty(then_et.ty, then.span)?;
                        ensure!(
                            then_ty == Ty::unit(),
                            TypeError::TypeMismatch {
                                expected: Ty::unit(),
                                actual: then_ty,
                                span: then.span,
                            }
                        );
                        ExpTy {
                            exp: self.tr.if_unit(test_exp, then_et.exp, None),
                            ty: Ty::unit(),
                        }
                    }
                    Some(else_) => {
                        let else_et = self.check_exp(else_, level, brk)?;
                        self.ensure_compatible(then_et.ty, else_et.ty, else_.span)?;
                        let then_ty = self.actual_ty(then_et.ty, then.span)?;
                        let else_ty = self.actual_ty(else_et.ty, else_.span)?;
                        if then_ty == Ty::unit() {
                            ExpTy {
                                exp: self.tr.if_unit(test_exp, then_et.exp, Some(else_et.exp)),
                                ty: Ty::unit(),
                            }
                        } else {
                            let ty = if then_ty == Ty::nil() { else_ty } else { then_ty };
                            ExpTy {
                                exp: self.tr.if_value(test_exp, then_et.exp, else_et.exp),
                                ty,
                            }
                        }
                    }
                }
            }

            ast::ExpKind::While { test, body } => {
                let test_exp = self.check_int(test, level, brk)?;
                let done = self.tr.r#gen.label();
                let body_et = self.check_exp(body, level, Some(done))?;
                let body_ty = self.actual_ty(body_et.ty, body.span)?;
                ensure!(
                    body_ty == Ty::unit(),
                    TypeError::TypeMismatch {
                        expected: Ty::unit(),
                        actual: body_ty,
                        span: body.span,
                    }
                );
                ExpTy {
                    exp: self.tr.while_loop(test_exp, body_et.exp, done),
                    ty: Ty::unit(),
                }
            }

            ast::ExpKind::For {
                var,
                escape,
                lo,
                hi,
                body,
            } => {
                let lo_exp = self.check_int(lo, level, brk)?;
                let hi_exp = self.check_int(hi, level, brk)?;

                // The loop variable is read-only inside the body; the limit
                // is compiler-internal and cannot collide with user names.
                let access = self.tr.alloc_local(level, *escape);
                let limit = self.tr.alloc_local(level, false);
                let done = self.tr.r#gen.label();
                self.venv.enter(
                    *var,
                    Entry::Var(VarEntry {
                        access,
                        ty: Ty::int(),
                        assignable: false,
                    }),
                );
                let body_et = self.check_exp(body, level, Some(done));
                self.venv.leave(*var);
                let body_et = body_et?;
                let body_ty = self.actual_ty(body_et.ty, body.span)?;
                ensure!(
                    body_ty == Ty::unit(),
                    TypeError::TypeMismatch {
                        expected: Ty::unit(),
                        actual: body_ty,
                        span: body.span,
                    }
                );

                let var_exp = self.tr.simple_var(access, level);
                let limit_exp = self.tr.simple_var(limit, level);
                ExpTy {
                    exp: self
                        .tr
                        .for_loop(var_exp, limit_exp, lo_exp, hi_exp, body_et.exp, done),
                    ty: Ty::unit(),
                }
            }

            ast::ExpKind::Break => {
                let done = match brk {
                    Some(done) => done,
                    None => bail!(TypeError::BreakOutsideLoop { span }),
                };
                ExpTy {
                    exp: self.tr.break_to(done),
                    ty: Ty::unit(),
                }
            }

            ast::ExpKind::Let { decs, body } => {
                let mut inits = Vec::new();
                let mut scopes = Vec::new();
                for dec in decs {
                    self.check_dec(dec, level, brk, &mut inits, &mut scopes)?;
                }
                let body_et = self.check_exp(body, level, brk)?;
                for key in scopes.into_iter().rev() {
                    match key {
                        ScopeKey::Var(name) => self.venv.leave(name),
                        ScopeKey::Type(name) => self.tenv.leave(name),
                    }
                }
                ExpTy {
                    exp: self.tr.let_body(inits, body_et.exp),
                    ty: body_et.ty,
                }
            }

            ast::ExpKind::Array { ty, size, init } => {
                let array_ty = match self.tenv.look(*ty) {
                    Some(ty) => *ty,
                    None => bail!(TypeError::UndefinedType { name: *ty, span }),
                };
                let array_ty = self.actual_ty(array_ty, span)?;
                let TyKind::Array { elem, .. } = array_ty.kind() else {
                    bail!(TypeError::TypeMismatchCustom {
                        expected: "array".into(),
                        actual: array_ty,
                        span,
                    })
                };
                let size_exp = self.check_int(size, level, brk)?;
                let init_et = self.check_exp(init, level, brk)?;
                self.ensure_compatible(*elem, init_et.ty, init.span)?;
                ExpTy {
                    exp: self.tr.array(size_exp, init_et.exp),
                    ty: array_ty,
                }
            }
        };
        Ok(expty)
    }

    fn check_op(
        &mut self,
        left: &ast::Exp,
        oper: ast::Oper,
        right: &ast::Exp,
        level: LevelId,
        brk: Option<Label>,
    ) -> Result<ExpTy> {
        use ast::Oper::*;
        let exp = match oper {
            Plus | Minus | Times | Divide => {
                let l = self.check_int(left, level, brk)?;
                let r = self.check_int(right, level, brk)?;
                let op = match oper {
                    Plus => BinOp::Plus,
                    Minus => BinOp::Minus,
                    Times => BinOp::Mul,
                    Divide => BinOp::Div,
                    _ => unreachable!(),
                };
                self.tr.binop(op, l, r)
            }
            Lt | Le | Gt | Ge => {
                let l = self.check_int(left, level, brk)?;
                let r = self.check_int(right, level, brk)?;
                let op = match oper {
                    Lt => RelOp::Lt,
                    Le => RelOp::Le,
                    Gt => RelOp::Gt,
                    Ge => RelOp::Ge,
                    _ => unreachable!(),
                };
                self.tr.relop(op, l, r)
            }
            Eq | Neq => {
                let l = self.check_exp(left, level, brk)?;
                let r = self.check_exp(right, level, brk)?;
                self.ensure_compatible(l.ty, r.ty, right.span)?;
                let l_ty = self.actual_ty(l.ty, left.span)?;
                if l_ty == Ty::string() {
                    self.tr.string_eq(oper == Neq, l.exp, r.exp)
                } else {
                    let op = if oper == Eq { RelOp::Eq } else { RelOp::Ne };
                    self.tr.relop(op, l.exp, r.exp)
                }
            }
        };
        Ok(ExpTy {
            exp,
            ty: Ty::int(),
        })
    }

    fn check_var(&mut self, var: &ast::Var, level: LevelId, brk: Option<Label>) -> Result<VarTy> {
        let span = var.span;
        match &var.value {
            ast::VarKind::Simple(name) => {
                let (access, ty, assignable) = match self.venv.look(*name) {
                    Some(Entry::Var(v)) => (v.access, v.ty, v.assignable),
                    Some(Entry::Func(_)) => {
                        bail!(TypeError::FunctionAsValue { name: *name, span })
                    }
                    None => bail!(TypeError::UndefinedVariable { name: *name, span }),
                };
                Ok(VarTy {
                    exp: self.tr.simple_var(access, level),
                    ty,
                    assignable,
                })
            }

            ast::VarKind::Field(base, field_name) => {
                let base = self.check_var(base, level, brk)?;
                let base_ty = self.actual_ty(base.ty, span)?;
                let TyKind::Record { fields, .. } = base_ty.kind() else {
                    bail!(TypeError::TypeMismatchCustom {
                        expected: "record".into(),
                        actual: base_ty,
                        span,
                    })
                };
                let Some((index, (_, field_ty))) = fields
                    .iter()
                    .enumerate()
                    .find(|(_, (name, _))| name == field_name)
                else {
                    bail!(TypeError::UndefinedField {
                        name: *field_name,
                        span,
                    })
                };
                Ok(VarTy {
                    exp: self.tr.field_var(base.exp, index),
                    ty: *field_ty,
                    assignable: true,
                })
            }

            ast::VarKind::Subscript(base, index) => {
                let base = self.check_var(base, level, brk)?;
                let base_ty = self.actual_ty(base.ty, span)?;
                let TyKind::Array { elem, .. } = base_ty.kind() else {
                    bail!(TypeError::TypeMismatchCustom {
                        expected: "array".into(),
                        actual: base_ty,
                        span,
                    })
                };
                let index_exp = self.check_int(index, level, brk)?;
                Ok(VarTy {
                    exp: self.tr.subscript_var(base.exp, index_exp),
                    ty: *elem,
                    assignable: true,
                })
            }
        }
    }

    fn check_dec(
        &mut self,
        dec: &ast::Dec,
        level: LevelId,
        brk: Option<Label>,
        inits: &mut Vec<Stm>,
        scopes: &mut Vec<ScopeKey>,
    ) -> Result<()> {
        match dec {
            ast::Dec::Var(v) => {
                let init = self.check_exp(&v.init, level, brk)?;
                let ty = match &v.ty {
                    Some(annot) => {
                        // The declared type wins: a nil initializer leaves
                        // the variable with the record type, not `nil`.
                        let declared = self.look_ty(annot)?;
                        self.ensure_compatible(declared, init.ty, v.init.span)?;
                        declared
                    }
                    None => {
                        let init_ty = self.actual_ty(init.ty, v.span)?;
                        ensure!(
                            init_ty != Ty::nil(),
                            TypeError::MustDeclareType {
                                name: v.name,
                                span: v.span,
                            }
                        );
                        init.ty
                    }
                };
                let access = self.tr.alloc_local(level, v.escape);
                self.venv.enter(
                    v.name,
                    Entry::Var(VarEntry {
                        access,
                        ty,
                        assignable: true,
                    }),
                );
                scopes.push(ScopeKey::Var(v.name));
                inits.push(Stm::Move(self.tr.simple_var(access, level), init.exp));
                Ok(())
            }
            ast::Dec::Types(group) => self.check_type_group(group, scopes),
            ast::Dec::Funcs(group) => self.check_fn_group(group, level, scopes),
        }
    }

    /// A maximal contiguous group of type declarations, processed together
    /// so every name is visible in every right-hand side.
    fn check_type_group(&mut self, group: &[ast::TypeDec], scopes: &mut Vec<ScopeKey>) -> Result<()> {
        let mut names = HashSet::new();
        for dec in group {
            ensure!(
                names.insert(dec.name.value),
                TypeError::DuplicateName {
                    name: dec.name.value,
                    span: dec.name.span,
                }
            );
        }

        // Placeholders first: a name reference that resolves to one is
        // chased through the environment later, so nothing here ever
        // mutates a type value to close a cycle.
        for dec in group {
            self.tenv.enter(dec.name.value, Ty::name(dec.name.value));
            scopes.push(ScopeKey::Type(dec.name.value));
        }

        for dec in group {
            let ty = match &dec.ty {
                ast::SynTy::Name(target) => self.look_ty(target)?,
                ast::SynTy::Record(fields) => {
                    let fields = fields
                        .iter()
                        .map(|field| Ok((field.name, self.look_ty(&field.ty)?)))
                        .collect::<Result<Vec<_>>>()?;
                    Ty::record(fields, self.tr.r#gen.uniq())
                }
                ast::SynTy::Array(elem) => Ty::array(self.look_ty(elem)?, self.tr.r#gen.uniq()),
            };
            self.tenv.replace(dec.name.value, ty);
        }

        // A group of pure aliases can close a cycle with no structural
        // type to stop the chase; reject those now.
        for dec in group {
            let mut seen = HashSet::new();
            seen.insert(dec.name.value);
            let mut cur = dec.name.value;
            loop {
                let ty = *self
                    .tenv
                    .look(cur)
                    .expect("group member resolved but not bound");
                match ty.kind() {
                    TyKind::Name(next) => {
                        ensure!(
                            seen.insert(*next),
                            TypeError::TypeCycle {
                                name: dec.name.value,
                                span: dec.name.span,
                            }
                        );
                        cur = *next;
                    }
                    _ => break,
                }
            }
        }

        Ok(())
    }

    /// A maximal contiguous group of function declarations: all signatures
    /// and levels first, then every body under the fully extended
    /// environment.
    fn check_fn_group(
        &mut self,
        group: &[ast::FunDec],
        level: LevelId,
        scopes: &mut Vec<ScopeKey>,
    ) -> Result<()> {
        let mut names = HashSet::new();
        for dec in group {
            ensure!(
                names.insert(dec.name.value),
                TypeError::DuplicateName {
                    name: dec.name.value,
                    span: dec.name.span,
                }
            );
        }

        let mut sigs = Vec::with_capacity(group.len());
        for dec in group {
            let formals = dec
                .params
                .iter()
                .map(|param| self.look_ty(&param.ty))
                .collect::<Result<Vec<_>>>()?;
            let result = match &dec.result {
                Some(result) => self.look_ty(result)?,
                None => Ty::unit(),
            };
            let escapes: Vec<bool> = dec.params.iter().map(|param| param.escape).collect();
            let label = self.tr.r#gen.named_label(dec.name.value.as_str());
            let flevel = self.tr.new_level(level, label, &escapes);
            self.venv.enter(
                dec.name.value,
                Entry::Func(FnEntry {
                    level: flevel,
                    label,
                    formals: formals.clone(),
                    result,
                }),
            );
            scopes.push(ScopeKey::Var(dec.name.value));
            sigs.push((flevel, formals, result));
        }

        for (dec, (flevel, formals, result)) in group.iter().zip(sigs) {
            let accesses = self.tr.formals(flevel);
            for ((param, access), ty) in dec.params.iter().zip(&accesses).zip(&formals) {
                self.venv.enter(
                    param.name,
                    Entry::Var(VarEntry {
                        access: *access,
                        ty: *ty,
                        assignable: true,
                    }),
                );
            }
            let body = self.check_exp(&dec.body, flevel, None);
            for param in &dec.params {
                self.venv.leave(param.name);
            }
            let body = body?;
            self.ensure_compatible(result, body.ty, dec.body.span)?;
            let result = self.actual_ty(result, dec.name.span)?;
            self.tr
                .proc_entry_exit(flevel, body.exp, result == Ty::unit());
        }

        Ok(())
    }
}

impl Default for Tcx {
    fn default() -> Self {
        Tcx::new()
    }
}
