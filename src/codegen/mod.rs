//! Instruction selection.
//!
//! Lowers the canonical IR of one function body to abstract assembly by
//! maximal munch: at each node the largest matching tile wins, and anything
//! without a larger tile falls back to munching its children into fresh
//! temporaries. Operands are positional placeholders (`'d0`, `'s1`, ...)
//! resolved against each instruction's def/use lists at format time, once
//! the allocator has assigned registers.
//!
//! The target has branch delay slots, so every control transfer is followed
//! by a `nop`.

use crate::{
    frame,
    ir::{BinOp, Exp, Gen, Label, RelOp, Stm, Temp},
};

/// One abstract assembly instruction.
#[derive(Debug, Clone)]
pub enum Instr {
    Op {
        asm: String,
        dst: Vec<Temp>,
        src: Vec<Temp>,
        /// Branch targets, for CFG construction during liveness analysis.
        /// `None` means fall-through.
        jump: Option<Vec<Label>>,
    },
    /// A register-to-register move, kept distinct so the allocator can
    /// coalesce it away.
    Move { asm: String, dst: Temp, src: Temp },
    Label { asm: String, label: Label },
}

impl Instr {
    /// Renders the instruction, substituting `name(t)` for each positional
    /// operand placeholder.
    pub fn format(&self, name: &impl Fn(Temp) -> String) -> String {
        let (asm, dsts, srcs): (&str, Vec<Temp>, Vec<Temp>) = match self {
            Instr::Op { asm, dst, src, .. } => (asm, dst.clone(), src.clone()),
            Instr::Move { asm, dst, src } => (asm, vec![*dst], vec![*src]),
            Instr::Label { asm, .. } => return asm.clone(),
        };
        let mut out = String::new();
        let mut chars = asm.chars().peekable();
        while let Some(c) = chars.next() {
            if c != '\'' {
                out.push(c);
                continue;
            }
            let kind = chars.next().expect("dangling operand placeholder");
            let mut digits = String::new();
            while let Some(d) = chars.peek().copied().filter(|d| d.is_ascii_digit()) {
                digits.push(d);
                chars.next();
            }
            let index: usize = digits.parse().expect("operand placeholder needs an index");
            let temp = match kind {
                'd' => dsts[index],
                's' => srcs[index],
                other => panic!("unknown operand placeholder '{other}{index}"),
            };
            out.push_str(&name(temp));
        }
        out
    }
}

/// Names reserved temps after their registers and the rest `t<n>`; the
/// formatting to use before register allocation has run.
pub fn temp_name(t: Temp) -> String {
    frame::register_name(t).unwrap_or_else(|| format!("t{}", t.0))
}

/// Registers clobbered by a call: the caller must assume all of these are
/// redefined across the call site.
fn calldefs() -> Vec<Temp> {
    let mut defs = vec![frame::RV, frame::RA];
    defs.extend(frame::ARG_REGS);
    defs.extend(frame::CALLER_SAVES);
    defs
}

/// Tiles one canonical function body into abstract assembly.
pub fn select(body: &[Stm], r#gen: &mut Gen) -> Vec<Instr> {
    let mut cg = Codegen {
        r#gen,
        instrs: Vec::new(),
    };
    for stm in body {
        cg.munch_stm(stm);
    }
    log::debug!("selected {} instructions", cg.instrs.len());
    cg.instrs
}

struct Codegen<'a> {
    r#gen: &'a mut Gen,
    instrs: Vec<Instr>,
}

impl Codegen<'_> {
    fn emit(&mut self, instr: Instr) {
        self.instrs.push(instr);
    }

    fn op(&mut self, asm: impl Into<String>, dst: Vec<Temp>, src: Vec<Temp>) {
        self.emit(Instr::Op {
            asm: asm.into(),
            dst,
            src,
            jump: None,
        });
    }

    /// Delay-slot padding after a taken control transfer.
    fn nop(&mut self) {
        self.op("nop", vec![], vec![]);
    }

    fn munch_stm(&mut self, stm: &Stm) {
        match stm {
            Stm::Move(dst, src) => self.munch_move(dst, src),

            Stm::Exp(Exp::Call(func, args)) => {
                self.munch_call(func, args);
            }
            Stm::Exp(exp) => {
                self.munch_exp(exp);
            }

            Stm::Jump(Exp::Name(label), _) => {
                self.emit(Instr::Op {
                    asm: format!("j {label}"),
                    dst: vec![],
                    src: vec![],
                    jump: Some(vec![*label]),
                });
                self.nop();
            }
            Stm::Jump(target, labels) => {
                let t = self.munch_exp(target);
                self.emit(Instr::Op {
                    asm: "jr 's0".into(),
                    dst: vec![],
                    src: vec![t],
                    jump: Some(labels.clone()),
                });
                self.nop();
            }

            Stm::Cjump(op, left, right, t, f) => {
                let branch = match op {
                    RelOp::Eq => "beq",
                    RelOp::Ne => "bne",
                    RelOp::Lt => "blt",
                    RelOp::Gt => "bgt",
                    RelOp::Le => "ble",
                    RelOp::Ge => "bge",
                    RelOp::Ult => "bltu",
                    RelOp::Ule => "bleu",
                    RelOp::Ugt => "bgtu",
                    RelOp::Uge => "bgeu",
                };
                let left = self.munch_exp(left);
                let right = self.munch_exp(right);
                // The false label is listed too so liveness sees both
                // successors; execution falls through to it.
                self.emit(Instr::Op {
                    asm: format!("{branch} 's0, 's1, {t}"),
                    dst: vec![],
                    src: vec![left, right],
                    jump: Some(vec![*t, *f]),
                });
                self.nop();
            }

            Stm::Label(label) => self.emit(Instr::Label {
                asm: format!("{label}:"),
                label: *label,
            }),

            Stm::Seq(..) => unreachable!("seq survived canonicalization"),
        }
    }

    fn munch_move(&mut self, dst: &Exp, src: &Exp) {
        match (dst, src) {
            // Stores, with a displacement tile when the address is
            // base + constant.
            (Exp::Mem(addr), src) => {
                let (base, offset) = self.munch_addr(addr);
                let src = self.munch_exp(src);
                self.op(
                    format!("sw 's0, {offset}('s1)"),
                    vec![],
                    vec![src, base],
                );
            }

            // A call already in canonical position: its result lands in the
            // return-value register and is moved on.
            (Exp::Temp(t), Exp::Call(func, args)) => {
                self.munch_call(func, args);
                self.emit(Instr::Move {
                    asm: "move 'd0, 's0".into(),
                    dst: *t,
                    src: frame::RV,
                });
            }

            (Exp::Temp(t), Exp::Const(n)) => {
                self.op(format!("li 'd0, {n}"), vec![*t], vec![]);
            }

            (Exp::Temp(t), Exp::Name(label)) => {
                self.op(format!("la 'd0, {label}"), vec![*t], vec![]);
            }

            (Exp::Temp(t), Exp::Mem(addr)) => {
                let (base, offset) = self.munch_addr(addr);
                self.op(format!("lw 'd0, {offset}('s0)"), vec![*t], vec![base]);
            }

            (Exp::Temp(t), src) => {
                let src = self.munch_exp(src);
                self.emit(Instr::Move {
                    asm: "move 'd0, 's0".into(),
                    dst: *t,
                    src,
                });
            }

            (dst, _) => unreachable!("malformed move destination: {dst}"),
        }
    }

    /// Munches an address into a base register plus constant displacement,
    /// recognizing the `base + const` tile. An absolute address uses the
    /// hardwired zero register as its base.
    fn munch_addr(&mut self, addr: &Exp) -> (Temp, i64) {
        match addr {
            Exp::Binop(BinOp::Plus, base, offset) => match (base.as_ref(), offset.as_ref()) {
                (base, Exp::Const(n)) | (Exp::Const(n), base) => (self.munch_exp(base), *n),
                _ => (self.munch_exp(addr), 0),
            },
            Exp::Const(n) => (frame::ZERO, *n),
            _ => (self.munch_exp(addr), 0),
        }
    }

    fn munch_call(&mut self, func: &Exp, args: &[Exp]) {
        let Exp::Name(label) = func else {
            unreachable!("call through a computed address survived canonicalization")
        };
        let uses = self.munch_args(args);
        self.emit(Instr::Op {
            asm: format!("jal {label}"),
            dst: calldefs(),
            src: uses,
            jump: None,
        });
        self.nop();
    }

    /// Materializes arguments per the calling convention: the first six in
    /// argument registers (listed as uses of the call so liveness keeps
    /// them alive), the rest in outgoing stack slots.
    fn munch_args(&mut self, args: &[Exp]) -> Vec<Temp> {
        let mut uses = Vec::new();
        for (i, arg) in args.iter().enumerate() {
            let src = self.munch_exp(arg);
            if i < frame::ARG_REGS.len() {
                let reg = frame::ARG_REGS[i];
                self.emit(Instr::Move {
                    asm: "move 'd0, 's0".into(),
                    dst: reg,
                    src,
                });
                uses.push(reg);
            } else {
                let offset = i as i64 * frame::WORD_SIZE;
                self.op(
                    format!("sw 's0, {offset}('s1)"),
                    vec![],
                    vec![src, frame::SP],
                );
            }
        }
        uses
    }

    fn munch_exp(&mut self, exp: &Exp) -> Temp {
        match exp {
            Exp::Temp(t) => *t,

            Exp::Const(n) => {
                let t = self.r#gen.temp();
                self.op(format!("li 'd0, {n}"), vec![t], vec![]);
                t
            }

            Exp::Name(label) => {
                let t = self.r#gen.temp();
                self.op(format!("la 'd0, {label}"), vec![t], vec![]);
                t
            }

            Exp::Mem(addr) => {
                let (base, offset) = self.munch_addr(addr);
                let t = self.r#gen.temp();
                self.op(format!("lw 'd0, {offset}('s0)"), vec![t], vec![base]);
                t
            }

            Exp::Binop(op, left, right) => self.munch_binop(*op, left, right),

            Exp::Call(..) => unreachable!("call in operand position survived canonicalization"),
            Exp::Eseq(..) => unreachable!("eseq survived canonicalization"),
        }
    }

    fn munch_binop(&mut self, op: BinOp, left: &Exp, right: &Exp) -> Temp {
        // Immediate forms for commutative addition and subtraction of a
        // constant.
        match (op, left, right) {
            (BinOp::Plus, e, Exp::Const(n)) | (BinOp::Plus, Exp::Const(n), e) => {
                let e = self.munch_exp(e);
                let t = self.r#gen.temp();
                self.op(format!("addi 'd0, 's0, {n}"), vec![t], vec![e]);
                return t;
            }
            (BinOp::Minus, e, Exp::Const(n)) => {
                let e = self.munch_exp(e);
                let t = self.r#gen.temp();
                self.op(format!("addi 'd0, 's0, {}", -n), vec![t], vec![e]);
                return t;
            }
            (BinOp::Lshift, e, Exp::Const(n)) => {
                return self.shift_imm("sll", e, *n);
            }
            (BinOp::Rshift, e, Exp::Const(n)) => {
                return self.shift_imm("srl", e, *n);
            }
            (BinOp::Arshift, e, Exp::Const(n)) => {
                return self.shift_imm("sra", e, *n);
            }
            _ => {}
        }

        let mnemonic = match op {
            BinOp::Plus => "add",
            BinOp::Minus => "sub",
            BinOp::Mul => "mul",
            BinOp::Div => "div",
            BinOp::And => "and",
            BinOp::Or => "or",
            BinOp::Xor => "xor",
            BinOp::Lshift => "sllv",
            BinOp::Rshift => "srlv",
            BinOp::Arshift => "srav",
        };
        let left = self.munch_exp(left);
        let right = self.munch_exp(right);
        let t = self.r#gen.temp();
        self.op(
            format!("{mnemonic} 'd0, 's0, 's1"),
            vec![t],
            vec![left, right],
        );
        t
    }

    fn shift_imm(&mut self, mnemonic: &str, e: &Exp, n: i64) -> Temp {
        let e = self.munch_exp(e);
        let t = self.r#gen.temp();
        self.op(format!("{mnemonic} 'd0, 's0, {n}"), vec![t], vec![e]);
        t
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ir::Gen;

    #[test]
    fn format_substitutes_positional_operands() {
        let instr = Instr::Op {
            asm: "sw 's0, 4('s1)".into(),
            dst: vec![],
            src: vec![Temp(100), frame::SP],
            jump: None,
        };
        assert_eq!(instr.format(&temp_name), "sw t100, 4(sp)");
    }

    #[test]
    fn store_with_displacement_is_one_instruction() {
        let mut r#gen = Gen::new();
        // mem[t100 + 8] <- t101
        let stm = Stm::Move(
            Exp::mem(Exp::offset(Exp::Temp(Temp(100)), 8)),
            Exp::Temp(Temp(101)),
        );
        let instrs = select(&[stm], &mut r#gen);
        assert_eq!(instrs.len(), 1);
        match &instrs[0] {
            Instr::Op { asm, src, .. } => {
                assert_eq!(asm, "sw 's0, 8('s1)");
                assert_eq!(src, &vec![Temp(101), Temp(100)]);
            }
            other => panic!("unexpected instruction: {other:?}"),
        }
    }

    #[test]
    fn branches_carry_both_targets_and_a_delay_slot_nop() {
        let mut r#gen = Gen::new();
        let t = r#gen.label();
        let f = r#gen.label();
        let stm = Stm::Cjump(RelOp::Lt, Exp::Temp(Temp(100)), Exp::Temp(Temp(101)), t, f);
        let instrs = select(&[stm], &mut r#gen);
        assert_eq!(instrs.len(), 2);
        match &instrs[0] {
            Instr::Op { asm, jump, .. } => {
                assert!(asm.starts_with("blt"));
                assert_eq!(jump.as_deref(), Some(&[t, f][..]));
            }
            other => panic!("unexpected instruction: {other:?}"),
        }
        match &instrs[1] {
            Instr::Op { asm, .. } => assert_eq!(asm, "nop"),
            other => panic!("expected delay-slot nop, got: {other:?}"),
        }
    }

    #[test]
    fn call_arguments_flow_through_argument_registers() {
        let mut r#gen = Gen::new();
        // discard f(1, 2, 3, 4, 5, 6, 7): six register args, one stack arg.
        let args = (1..=7).map(Exp::Const).collect();
        let stm = Stm::Exp(Exp::call(Exp::Name(Label::named("f")), args));
        let instrs = select(&[stm], &mut r#gen);

        let moves_to_arg_regs = instrs
            .iter()
            .filter(|i| matches!(i, Instr::Move { dst, .. } if frame::ARG_REGS.contains(dst)))
            .count();
        assert_eq!(moves_to_arg_regs, 6);

        let stack_stores = instrs
            .iter()
            .filter(
                |i| matches!(i, Instr::Op { asm, src, .. } if asm.starts_with("sw") && src.contains(&frame::SP)),
            )
            .count();
        assert_eq!(stack_stores, 1);

        let call = instrs
            .iter()
            .find(|i| matches!(i, Instr::Op { asm, .. } if asm.starts_with("jal")))
            .unwrap();
        match call {
            Instr::Op { dst, src, .. } => {
                // Argument registers are uses; caller-saves are defs.
                assert_eq!(src, &frame::ARG_REGS.to_vec());
                assert!(dst.contains(&frame::RV));
                assert!(frame::CALLER_SAVES.iter().all(|r| dst.contains(r)));
            }
            _ => unreachable!(),
        }
    }

    #[test]
    fn addition_with_a_constant_uses_the_immediate_form() {
        let mut r#gen = Gen::new();
        let dst = r#gen.temp();
        let stm = Stm::Move(
            Exp::Temp(dst),
            Exp::binop(BinOp::Plus, Exp::Temp(Temp(100)), Exp::Const(2)),
        );
        let instrs = select(&[stm], &mut r#gen);
        assert!(instrs.iter().any(
            |i| matches!(i, Instr::Op { asm, .. } if asm.starts_with("addi") && asm.ends_with(", 2"))
        ));
    }
}
