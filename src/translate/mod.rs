//! Translation to the tree IR.
//!
//! The [`Translator`] hides all frame and nesting bookkeeping behind IR
//! constructors: the type checker decides *what* each construct means, this
//! module decides *where* values live and how non-local names are reached
//! through static links. Finished function bodies and string literals
//! accumulate here as [`Fragment`]s.

use std::collections::HashMap;

use index_vec::IndexVec;

use crate::{
    frame::{self, Frame},
    ir::{BinOp, Exp, Gen, Label, RelOp, Stm, canon},
};

index_vec::define_index_type! {
    /// Identifies one function nesting level.
    pub struct LevelId = u32;
}

#[derive(Debug)]
struct LevelData {
    /// `None` only for the outermost sentinel level, where the runtime
    /// library's names live.
    parent: Option<LevelId>,
    frame: Frame,
}

/// Where a variable lives: a frame access within its defining level.
#[derive(Debug, Clone, Copy)]
pub struct Access {
    pub level: LevelId,
    pub slot: frame::Access,
}

/// A unit of generated code, consumed after the whole-program pass ends.
#[derive(Debug)]
pub enum Fragment {
    /// A canonicalized, prologue-wrapped function body. `label` is the
    /// frame label of `level`, duplicated here so consumers that only see
    /// the fragment list can still name the function.
    Proc {
        level: LevelId,
        label: Label,
        body: Vec<Stm>,
    },
    /// A string literal for the data segment.
    Str { label: Label, text: String },
}

pub struct Translator {
    pub r#gen: Gen,
    levels: IndexVec<LevelId, LevelData>,
    frags: Vec<Fragment>,
    strings: HashMap<String, Label>,
}

/// Branch away when `test` is zero. The instruction selector emits one
/// conditional branch to the true label and reaches the false label by
/// fallthrough, so the false label must physically follow the branch.
fn branch_if_zero(test: Exp, zero: Label, nonzero: Label) -> Stm {
    Stm::Cjump(RelOp::Eq, test, Exp::Const(0), zero, nonzero)
}

impl Translator {
    pub fn new() -> Self {
        let mut r#gen = Gen::new();
        let mut levels = IndexVec::new();
        levels.push(LevelData {
            parent: None,
            frame: Frame::new(Label::named("outermost"), &[], &mut r#gen),
        });
        Translator {
            r#gen,
            levels,
            frags: Vec::new(),
            strings: HashMap::new(),
        }
    }

    /// The sentinel level enclosing the whole program.
    pub fn outermost(&self) -> LevelId {
        LevelId::from_usize(0)
    }

    /// Allocates a new function level under `parent`. The implicit static
    /// link is prepended as an escaping formal at index 0.
    pub fn new_level(&mut self, parent: LevelId, label: Label, formal_escapes: &[bool]) -> LevelId {
        let mut escapes = vec![true];
        escapes.extend_from_slice(formal_escapes);
        let frame = Frame::new(label, &escapes, &mut self.r#gen);
        self.levels.push(LevelData {
            parent: Some(parent),
            frame,
        })
    }

    /// The accesses of a level's formals, static link excluded.
    pub fn formals(&self, level: LevelId) -> Vec<Access> {
        self.levels[level].frame.formals()[1..]
            .iter()
            .map(|slot| Access { level, slot: *slot })
            .collect()
    }

    pub fn alloc_local(&mut self, level: LevelId, escape: bool) -> Access {
        let slot = self.levels[level].frame.alloc_local(escape, &mut self.r#gen);
        Access { level, slot }
    }

    pub fn frame_label(&self, level: LevelId) -> Label {
        self.levels[level].frame.label
    }

    /// Frame-pointer expression for `target` as seen from code running in
    /// `from`, following one static link per nesting step. The static link
    /// is formal 0, so each hop is a load at offset zero.
    fn static_link(&self, from: LevelId, target: LevelId) -> Exp {
        let mut exp = Exp::Temp(frame::FP);
        let mut level = from;
        while level != target {
            exp = Exp::mem(exp);
            level = self.levels[level]
                .parent
                .expect("static-link chain escaped the outermost level");
        }
        exp
    }

    /// Reads a variable through however many static links separate its use
    /// from its definition.
    pub fn simple_var(&self, access: Access, use_level: LevelId) -> Exp {
        if use_level != access.level {
            assert!(
                !matches!(access.slot, frame::Access::Reg(_)),
                "non-local access to a register-allocated variable"
            );
        }
        access.slot.exp(self.static_link(use_level, access.level))
    }

    /// `base.f` where `f` is the `index`-th field of the record.
    pub fn field_var(&self, base: Exp, index: usize) -> Exp {
        Exp::mem(Exp::offset(base, index as i64 * frame::WORD_SIZE))
    }

    /// `base[index]`, 0-based. Bounds checking is the runtime's concern;
    /// only the address arithmetic is emitted here.
    pub fn subscript_var(&self, base: Exp, index: Exp) -> Exp {
        Exp::mem(Exp::binop(
            BinOp::Plus,
            base,
            Exp::binop(BinOp::Mul, index, Exp::Const(frame::WORD_SIZE)),
        ))
    }

    pub fn const_int(&self, n: i64) -> Exp {
        Exp::Const(n)
    }

    /// The null record value.
    pub fn nil(&self) -> Exp {
        Exp::Const(0)
    }

    /// The value of a unit-typed expression.
    pub fn no_value(&self) -> Exp {
        Exp::Const(0)
    }

    /// Wraps a statement as a unit-valued expression.
    pub fn stm_exp(&self, stm: Stm) -> Exp {
        Exp::eseq(stm, Exp::Const(0))
    }

    /// Interns a string literal, emitting its data fragment on first sight.
    pub fn string(&mut self, text: &str) -> Exp {
        if let Some(label) = self.strings.get(text) {
            return Exp::Name(*label);
        }
        let label = self.r#gen.named_label("str");
        self.strings.insert(text.to_string(), label);
        self.frags.push(Fragment::Str {
            label,
            text: text.to_string(),
        });
        Exp::Name(label)
    }

    pub fn binop(&self, op: BinOp, left: Exp, right: Exp) -> Exp {
        Exp::binop(op, left, right)
    }

    /// A comparison producing 0 or 1.
    pub fn relop(&mut self, op: RelOp, left: Exp, right: Exp) -> Exp {
        let result = self.r#gen.temp();
        let t = self.r#gen.label();
        let f = self.r#gen.label();
        Exp::eseq(
            Stm::seq(vec![
                Stm::Move(Exp::Temp(result), Exp::Const(1)),
                Stm::Cjump(op, left, right, t, f),
                Stm::Label(f),
                Stm::Move(Exp::Temp(result), Exp::Const(0)),
                Stm::Label(t),
            ]),
            Exp::Temp(result),
        )
    }

    /// String equality compares contents via the runtime.
    pub fn string_eq(&self, negated: bool, left: Exp, right: Exp) -> Exp {
        let eq = frame::external_call("stringEqual", vec![left, right]);
        if negated {
            Exp::binop(BinOp::Xor, eq, Exp::Const(1))
        } else {
            eq
        }
    }

    pub fn assign(&self, dst: Exp, src: Exp) -> Exp {
        self.stm_exp(Stm::Move(dst, src))
    }

    /// `(e1; ...; en)`: the value is the last expression's.
    pub fn seq(&self, mut exps: Vec<Exp>) -> Exp {
        match exps.pop() {
            None => self.no_value(),
            Some(last) => {
                if exps.is_empty() {
                    last
                } else {
                    Exp::eseq(Stm::seq(exps.into_iter().map(Stm::Exp).collect()), last)
                }
            }
        }
    }

    /// A `let`: initialization statements in declaration order, then the
    /// body.
    pub fn let_body(&self, inits: Vec<Stm>, body: Exp) -> Exp {
        if inits.is_empty() {
            body
        } else {
            Exp::eseq(Stm::seq(inits), body)
        }
    }

    /// A statement-shaped conditional (both arms unit-typed).
    pub fn if_unit(&mut self, test: Exp, then: Exp, else_: Option<Exp>) -> Exp {
        let then_label = self.r#gen.label();
        let else_label = self.r#gen.label();
        let stm = match else_ {
            None => Stm::seq(vec![
                branch_if_zero(test, else_label, then_label),
                Stm::Label(then_label),
                Stm::Exp(then),
                Stm::Label(else_label),
            ]),
            Some(else_) => {
                let join = self.r#gen.label();
                Stm::seq(vec![
                    branch_if_zero(test, else_label, then_label),
                    Stm::Label(then_label),
                    Stm::Exp(then),
                    Stm::jump_to(join),
                    Stm::Label(else_label),
                    Stm::Exp(else_),
                    Stm::Label(join),
                ])
            }
        };
        self.stm_exp(stm)
    }

    /// A value-shaped conditional: both arms write a shared temporary.
    pub fn if_value(&mut self, test: Exp, then: Exp, else_: Exp) -> Exp {
        let result = self.r#gen.temp();
        let then_label = self.r#gen.label();
        let else_label = self.r#gen.label();
        let join = self.r#gen.label();
        Exp::eseq(
            Stm::seq(vec![
                branch_if_zero(test, else_label, then_label),
                Stm::Label(then_label),
                Stm::Move(Exp::Temp(result), then),
                Stm::jump_to(join),
                Stm::Label(else_label),
                Stm::Move(Exp::Temp(result), else_),
                Stm::Label(join),
            ]),
            Exp::Temp(result),
        )
    }

    /// `while test do body`. `done` doubles as the target for `break`.
    pub fn while_loop(&mut self, test: Exp, body: Exp, done: Label) -> Exp {
        let test_label = self.r#gen.label();
        let body_label = self.r#gen.label();
        self.stm_exp(Stm::seq(vec![
            Stm::Label(test_label),
            branch_if_zero(test, done, body_label),
            Stm::Label(body_label),
            Stm::Exp(body),
            Stm::jump_to(test_label),
            Stm::Label(done),
        ]))
    }

    /// `for var := lo to hi do body`, already bound to accesses for the
    /// loop variable and the internal limit. The increment only runs while
    /// `var < limit`, which keeps `hi = maxint` from overflowing. Both
    /// guards branch away on the negated condition so the loop code falls
    /// through from the branch.
    pub fn for_loop(
        &mut self,
        var: Exp,
        limit: Exp,
        lo: Exp,
        hi: Exp,
        body: Exp,
        done: Label,
    ) -> Exp {
        let body_label = self.r#gen.label();
        let inc_label = self.r#gen.label();
        self.stm_exp(Stm::seq(vec![
            Stm::Move(var.clone(), lo),
            Stm::Move(limit.clone(), hi),
            Stm::Cjump(RelOp::Gt, var.clone(), limit.clone(), done, body_label),
            Stm::Label(body_label),
            Stm::Exp(body),
            Stm::Cjump(RelOp::Ge, var.clone(), limit, done, inc_label),
            Stm::Label(inc_label),
            Stm::Move(
                var.clone(),
                Exp::binop(BinOp::Plus, var, Exp::Const(1)),
            ),
            Stm::jump_to(body_label),
            Stm::Label(done),
        ]))
    }

    pub fn break_to(&self, done: Label) -> Exp {
        self.stm_exp(Stm::jump_to(done))
    }

    /// A call to a function defined at `callee`, from code running at
    /// `caller`. User functions receive a static link for their defining
    /// scope as a hidden first argument; runtime functions (defined at the
    /// outermost level) take none.
    pub fn call(&self, callee: LevelId, label: Label, caller: LevelId, mut args: Vec<Exp>) -> Exp {
        match self.levels[callee].parent {
            None => Exp::call(Exp::Name(label), args),
            Some(parent) => {
                let link = self.static_link(caller, parent);
                args.insert(0, link);
                Exp::call(Exp::Name(label), args)
            }
        }
    }

    /// `T { f1 = e1, ... }`: allocate, then initialize fields in
    /// declaration order.
    pub fn record(&mut self, inits: Vec<Exp>) -> Exp {
        let r = self.r#gen.temp();
        let mut stms = vec![Stm::Move(
            Exp::Temp(r),
            frame::external_call(
                "allocRecord",
                vec![Exp::Const(inits.len() as i64 * frame::WORD_SIZE)],
            ),
        )];
        for (index, init) in inits.into_iter().enumerate() {
            stms.push(Stm::Move(
                Exp::mem(Exp::offset(
                    Exp::Temp(r),
                    index as i64 * frame::WORD_SIZE,
                )),
                init,
            ));
        }
        Exp::eseq(Stm::seq(stms), Exp::Temp(r))
    }

    /// `T[size] of init`: the runtime allocates and fills the array.
    pub fn array(&self, size: Exp, init: Exp) -> Exp {
        frame::external_call("initArray", vec![size, init])
    }

    /// Completes a function: prologue label, view shift, body (moved into
    /// the return register unless the function is a procedure), then
    /// canonicalization. The finished body joins the fragment list.
    pub fn proc_entry_exit(&mut self, level: LevelId, body: Exp, is_procedure: bool) {
        let frame = &self.levels[level].frame;
        let mut stms = vec![Stm::Label(frame.label)];
        stms.extend(frame.view_shift());
        stms.push(if is_procedure {
            Stm::Exp(body)
        } else {
            Stm::Move(Exp::Temp(frame::RV), body)
        });
        let label = self.levels[level].frame.label;
        let body = canon::linearize(Stm::seq(stms), &mut self.r#gen);
        self.frags.push(Fragment::Proc { level, label, body });
    }

    pub fn fragments(&self) -> &[Fragment] {
        &self.frags
    }

    pub fn into_fragments(self) -> (Vec<Fragment>, Gen) {
        (self.frags, self.r#gen)
    }
}

impl Default for Translator {
    fn default() -> Self {
        Translator::new()
    }
}
