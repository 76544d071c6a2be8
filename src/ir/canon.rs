//! Canonicalization of the tree IR.
//!
//! [`linearize`] rewrites a statement so that no [`Eseq`][Exp::Eseq] remains
//! and every [`Call`][Exp::Call] sits either directly under a `Move` into a
//! temporary or as the sole operand of an [`Exp`][Stm::Exp] statement, then
//! flattens the result into a list of statements with no `Seq` nodes.
//! Everything downstream (instruction selection in particular) assumes this
//! shape.

use super::types::{Exp, Gen, Stm};

/// True when `stm` and `exp` can be reordered without changing observable
/// behavior. Deliberately conservative.
fn commute(stm: &Stm, exp: &Exp) -> bool {
    is_nop(stm) || matches!(exp, Exp::Name(_) | Exp::Const(_))
}

fn is_nop(stm: &Stm) -> bool {
    matches!(stm, Stm::Exp(Exp::Const(_)))
}

/// Sequences two statements, dropping no-ops.
fn join(a: Stm, b: Stm) -> Stm {
    if is_nop(&a) {
        b
    } else if is_nop(&b) {
        a
    } else {
        Stm::Seq(Box::new(a), Box::new(b))
    }
}

fn nop() -> Stm {
    Stm::Exp(Exp::Const(0))
}

/// Pulls the side effects out of a list of sibling expressions, preserving
/// left-to-right evaluation order. Returns a statement performing all the
/// side effects and the residual, effect-free expressions.
fn reorder(mut exps: Vec<Exp>, r#gen: &mut Gen) -> (Stm, Vec<Exp>) {
    if exps.is_empty() {
        return (nop(), Vec::new());
    }
    let head = exps.remove(0);

    // A bare call in operand position gets its result pinned to a fresh
    // temporary so a sibling's side effects cannot clobber it.
    if let Exp::Call(..) = head {
        let t = r#gen.temp();
        let pinned = Exp::eseq(Stm::Move(Exp::Temp(t), head), Exp::Temp(t));
        exps.insert(0, pinned);
        return reorder(exps, r#gen);
    }

    let (head_stm, head_exp) = do_exp(head, r#gen);
    let (rest_stm, mut rest_exps) = reorder(exps, r#gen);
    if commute(&rest_stm, &head_exp) {
        rest_exps.insert(0, head_exp);
        (join(head_stm, rest_stm), rest_exps)
    } else {
        let t = r#gen.temp();
        rest_exps.insert(0, Exp::Temp(t));
        let save = Stm::Move(Exp::Temp(t), head_exp);
        (join(join(head_stm, save), rest_stm), rest_exps)
    }
}

fn reorder_exp(
    exps: Vec<Exp>,
    build: impl FnOnce(Vec<Exp>) -> Exp,
    r#gen: &mut Gen,
) -> (Stm, Exp) {
    let (stm, exps) = reorder(exps, r#gen);
    (stm, build(exps))
}

fn reorder_stm(exps: Vec<Exp>, build: impl FnOnce(Vec<Exp>) -> Stm, r#gen: &mut Gen) -> Stm {
    let (stm, exps) = reorder(exps, r#gen);
    join(stm, build(exps))
}

fn do_stm(stm: Stm, r#gen: &mut Gen) -> Stm {
    match stm {
        Stm::Seq(a, b) => join(do_stm(*a, r#gen), do_stm(*b, r#gen)),
        Stm::Jump(target, labels) => reorder_stm(
            vec![target],
            |mut exps| Stm::Jump(exps.remove(0), labels),
            r#gen,
        ),
        Stm::Cjump(op, left, right, t, f) => reorder_stm(
            vec![left, right],
            |mut exps| {
                let left = exps.remove(0);
                let right = exps.remove(0);
                Stm::Cjump(op, left, right, t, f)
            },
            r#gen,
        ),
        // A call moving into a temporary is already in canonical position;
        // only its callee and arguments need reordering.
        Stm::Move(Exp::Temp(t), Exp::Call(func, args)) => {
            let mut exps = vec![*func];
            exps.extend(args);
            reorder_stm(
                exps,
                |mut exps| {
                    let func = exps.remove(0);
                    Stm::Move(Exp::Temp(t), Exp::call(func, exps))
                },
                r#gen,
            )
        }
        Stm::Move(Exp::Temp(t), src) => reorder_stm(
            vec![src],
            |mut exps| Stm::Move(Exp::Temp(t), exps.remove(0)),
            r#gen,
        ),
        Stm::Move(Exp::Mem(addr), src) => reorder_stm(
            vec![*addr, src],
            |mut exps| {
                let addr = exps.remove(0);
                let src = exps.remove(0);
                Stm::Move(Exp::mem(addr), src)
            },
            r#gen,
        ),
        Stm::Move(Exp::Eseq(pre, dst), src) => {
            do_stm(Stm::Seq(pre, Box::new(Stm::Move(*dst, src))), r#gen)
        }
        Stm::Move(dst, _) => unreachable!("malformed move destination: {dst}"),
        Stm::Exp(Exp::Call(func, args)) => {
            let mut exps = vec![*func];
            exps.extend(args);
            reorder_stm(
                exps,
                |mut exps| {
                    let func = exps.remove(0);
                    Stm::Exp(Exp::call(func, exps))
                },
                r#gen,
            )
        }
        Stm::Exp(exp) => reorder_stm(vec![exp], |mut exps| Stm::Exp(exps.remove(0)), r#gen),
        Stm::Label(_) => stm,
    }
}

fn do_exp(exp: Exp, r#gen: &mut Gen) -> (Stm, Exp) {
    match exp {
        Exp::Binop(op, left, right) => reorder_exp(
            vec![*left, *right],
            |mut exps| {
                let left = exps.remove(0);
                let right = exps.remove(0);
                Exp::binop(op, left, right)
            },
            r#gen,
        ),
        Exp::Mem(addr) => reorder_exp(vec![*addr], |mut exps| Exp::mem(exps.remove(0)), r#gen),
        Exp::Eseq(stm, exp) => {
            let pre = do_stm(*stm, r#gen);
            let (stm, exp) = do_exp(*exp, r#gen);
            // Keep a call hidden behind an eseq out of operand position.
            let (stm, exp) = match exp {
                Exp::Call(..) => {
                    let t = r#gen.temp();
                    (join(stm, Stm::Move(Exp::Temp(t), exp)), Exp::Temp(t))
                }
                exp => (stm, exp),
            };
            (join(pre, stm), exp)
        }
        Exp::Call(func, args) => {
            let mut exps = vec![*func];
            exps.extend(args);
            reorder_exp(
                exps,
                |mut exps| {
                    let func = exps.remove(0);
                    Exp::call(func, exps)
                },
                r#gen,
            )
        }
        Exp::Const(_) | Exp::Name(_) | Exp::Temp(_) => (nop(), exp),
    }
}

fn linear(stm: Stm, out: &mut Vec<Stm>) {
    match stm {
        Stm::Seq(a, b) => {
            linear(*a, out);
            linear(*b, out);
        }
        stm if is_nop(&stm) => {}
        stm => out.push(stm),
    }
}

/// Canonicalizes `stm` into a flat statement list.
pub fn linearize(stm: Stm, r#gen: &mut Gen) -> Vec<Stm> {
    let mut out = Vec::new();
    linear(do_stm(stm, r#gen), &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::super::types::{BinOp, Exp, Gen, Label, RelOp, Stm, Temp};
    use super::linearize;

    fn has_eseq_exp(exp: &Exp) -> bool {
        match exp {
            Exp::Const(_) | Exp::Name(_) | Exp::Temp(_) => false,
            Exp::Binop(_, a, b) => has_eseq_exp(a) || has_eseq_exp(b),
            Exp::Mem(a) => has_eseq_exp(a),
            Exp::Call(f, args) => has_eseq_exp(f) || args.iter().any(has_eseq_exp),
            Exp::Eseq(..) => true,
        }
    }

    fn has_eseq(stm: &Stm) -> bool {
        match stm {
            Stm::Move(a, b) => has_eseq_exp(a) || has_eseq_exp(b),
            Stm::Exp(e) => has_eseq_exp(e),
            Stm::Jump(e, _) => has_eseq_exp(e),
            Stm::Cjump(_, a, b, _, _) => has_eseq_exp(a) || has_eseq_exp(b),
            Stm::Seq(a, b) => has_eseq(a) || has_eseq(b),
            Stm::Label(_) => false,
        }
    }

    /// A call is canonical only as `Move(Temp, Call)` or `Exp(Call)`.
    fn stray_call(stm: &Stm) -> bool {
        fn in_exp(exp: &Exp) -> bool {
            match exp {
                Exp::Const(_) | Exp::Name(_) | Exp::Temp(_) => false,
                Exp::Binop(_, a, b) => in_exp(a) || in_exp(b),
                Exp::Mem(a) => in_exp(a),
                Exp::Call(..) => true,
                Exp::Eseq(..) => true,
            }
        }
        match stm {
            Stm::Move(Exp::Temp(_), Exp::Call(f, args)) => {
                in_exp(f) || args.iter().any(in_exp)
            }
            Stm::Exp(Exp::Call(f, args)) => in_exp(f) || args.iter().any(in_exp),
            Stm::Move(a, b) => in_exp(a) || in_exp(b),
            Stm::Exp(e) => in_exp(e),
            Stm::Jump(e, _) => in_exp(e),
            Stm::Cjump(_, a, b, _, _) => in_exp(a) || in_exp(b),
            Stm::Seq(a, b) => stray_call(a) || stray_call(b),
            Stm::Label(_) => false,
        }
    }

    #[test]
    fn eseq_is_eliminated() {
        let mut r#gen = Gen::new();
        let t = r#gen.temp();
        // t <- eseq(t2 <- 1; t2) + 2
        let t2 = r#gen.temp();
        let stm = Stm::Move(
            Exp::Temp(t),
            Exp::binop(
                BinOp::Plus,
                Exp::eseq(Stm::Move(Exp::Temp(t2), Exp::Const(1)), Exp::Temp(t2)),
                Exp::Const(2),
            ),
        );
        let out = linearize(stm, &mut r#gen);
        assert!(out.iter().all(|s| !has_eseq(s)));
        assert!(out.iter().all(|s| !matches!(s, Stm::Seq(..))));
    }

    #[test]
    fn nested_calls_are_pinned_to_temps() {
        let mut r#gen = Gen::new();
        let f = Label::named("f");
        let g = Label::named("g");
        // discard f(g(1), 2)
        let stm = Stm::Exp(Exp::call(
            Exp::Name(f),
            vec![
                Exp::call(Exp::Name(g), vec![Exp::Const(1)]),
                Exp::Const(2),
            ],
        ));
        let out = linearize(stm, &mut r#gen);
        assert!(out.iter().all(|s| !has_eseq(s)));
        assert!(out.iter().all(|s| !stray_call(s)));
        // The inner call must now be a move into a temporary.
        assert!(
            out.iter()
                .any(|s| matches!(s, Stm::Move(Exp::Temp(_), Exp::Call(..))))
        );
    }

    #[test]
    fn call_behind_eseq_leaves_operand_position() {
        let mut r#gen = Gen::new();
        let f = Label::named("f");
        let done = r#gen.label();
        // if eq(eseq(label; f()), 0) then done else done
        let cond = Exp::eseq(
            Stm::Label(r#gen.label()),
            Exp::call(Exp::Name(f), vec![]),
        );
        let stm = Stm::Cjump(RelOp::Eq, cond, Exp::Const(0), done, done);
        let out = linearize(stm, &mut r#gen);
        assert!(out.iter().all(|s| !stray_call(s)));
    }

    #[test]
    fn evaluation_order_is_preserved() {
        let mut r#gen = Gen::new();
        let (a, b) = (r#gen.temp(), r#gen.temp());
        let dst = r#gen.temp();
        // dst <- eseq(a <- 1; a) + eseq(b <- 2; b): the write to `a` must
        // come before the write to `b` in the flat list.
        let stm = Stm::Move(
            Exp::Temp(dst),
            Exp::binop(
                BinOp::Plus,
                Exp::eseq(Stm::Move(Exp::Temp(a), Exp::Const(1)), Exp::Temp(a)),
                Exp::eseq(Stm::Move(Exp::Temp(b), Exp::Const(2)), Exp::Temp(b)),
            ),
        );
        let out = linearize(stm, &mut r#gen);
        let pos = |t: Temp| {
            out.iter()
                .position(|s| matches!(s, Stm::Move(Exp::Temp(x), _) if *x == t))
                .unwrap()
        };
        assert!(pos(a) < pos(b));
    }
}
