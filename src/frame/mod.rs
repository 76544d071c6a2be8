//! Target description and activation-record layout.
//!
//! The target is a RISC-flavored abstract machine: 4-byte words, six
//! outgoing-argument registers, and branch delay slots (so the instruction
//! selector pads every control transfer with a `nop`). Registers are the
//! reserved low [`Temp`] values; everything above them is a symbolic
//! register for the allocator.

use crate::ir::{Exp, Gen, Label, Stm, Temp};

pub const WORD_SIZE: i64 = 4;

pub const ZERO: Temp = Temp(0);
pub const FP: Temp = Temp(1);
pub const SP: Temp = Temp(2);
pub const RV: Temp = Temp(3);
pub const RA: Temp = Temp(4);

pub const ARG_REGS: [Temp; 6] = [Temp(5), Temp(6), Temp(7), Temp(8), Temp(9), Temp(10)];

pub const CALLER_SAVES: [Temp; 8] = [
    Temp(11),
    Temp(12),
    Temp(13),
    Temp(14),
    Temp(15),
    Temp(16),
    Temp(17),
    Temp(18),
];

pub const CALLEE_SAVES: [Temp; 8] = [
    Temp(19),
    Temp(20),
    Temp(21),
    Temp(22),
    Temp(23),
    Temp(24),
    Temp(25),
    Temp(26),
];

/// The register name for a reserved temp, or `None` for an
/// allocator-assigned temporary.
pub fn register_name(t: Temp) -> Option<String> {
    let name = match t {
        ZERO => "zero".to_string(),
        FP => "fp".to_string(),
        SP => "sp".to_string(),
        RV => "rv".to_string(),
        RA => "ra".to_string(),
        Temp(n @ 5..=10) => format!("a{}", n - 5),
        Temp(n @ 11..=18) => format!("t{}", n - 11),
        Temp(n @ 19..=26) => format!("s{}", n - 19),
        _ => return None,
    };
    Some(name)
}

/// Where a variable lives within one activation: a register, or a frame
/// slot at a fixed offset from the frame pointer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Access {
    Reg(Temp),
    Slot(i64),
}

impl Access {
    /// The r-value of this access given an expression for the owning
    /// frame's frame pointer.
    pub fn exp(self, fp: Exp) -> Exp {
        match self {
            Access::Reg(t) => Exp::Temp(t),
            Access::Slot(offset) => Exp::mem(Exp::offset(fp, offset)),
        }
    }
}

/// Layout of a single function activation. Formals (the static link
/// included, at index 0) occupy the incoming-argument area at positive
/// offsets from the frame pointer; locals grow downward.
#[derive(Debug)]
pub struct Frame {
    pub label: Label,
    formals: Vec<Access>,
    next_local: i64,
}

impl Frame {
    pub fn new(label: Label, escapes: &[bool], r#gen: &mut Gen) -> Frame {
        let formals = escapes
            .iter()
            .enumerate()
            .map(|(i, escape)| {
                if *escape {
                    Access::Slot(i as i64 * WORD_SIZE)
                } else {
                    Access::Reg(r#gen.temp())
                }
            })
            .collect();
        Frame {
            label,
            formals,
            next_local: -WORD_SIZE,
        }
    }

    pub fn formals(&self) -> &[Access] {
        &self.formals
    }

    /// Allocates a local. Escaping locals get a frame slot so nested
    /// functions can reach them through the static link; the rest live in
    /// registers.
    pub fn alloc_local(&mut self, escape: bool, r#gen: &mut Gen) -> Access {
        if escape {
            let access = Access::Slot(self.next_local);
            self.next_local -= WORD_SIZE;
            access
        } else {
            Access::Reg(r#gen.temp())
        }
    }

    /// The prologue moves that shift incoming arguments from the calling
    /// convention's locations into each formal's access.
    pub fn view_shift(&self) -> Vec<Stm> {
        let mut moves = Vec::new();
        for (i, access) in self.formals.iter().enumerate() {
            let incoming = if i < ARG_REGS.len() {
                Exp::Temp(ARG_REGS[i])
            } else {
                // Stack-passed arguments already sit in the incoming area.
                if *access == Access::Slot(i as i64 * WORD_SIZE) {
                    continue;
                }
                Exp::mem(Exp::offset(Exp::Temp(FP), i as i64 * WORD_SIZE))
            };
            moves.push(Stm::Move(access.exp(Exp::Temp(FP)), incoming));
        }
        moves
    }
}

/// A call to a runtime-library entry point. Runtime functions live outside
/// any source-level nesting, so no static link is passed.
pub fn external_call(name: &str, args: Vec<Exp>) -> Exp {
    Exp::call(Exp::Name(Label::named(name)), args)
}

/// Renders a string fragment for the data segment: a word-aligned length
/// word followed by the bytes.
pub fn string_data(label: Label, text: &str) -> String {
    let escaped: String = text
        .bytes()
        .map(|b| match b {
            b'"' => "\\\"".to_string(),
            b'\\' => "\\\\".to_string(),
            b'\n' => "\\n".to_string(),
            b'\t' => "\\t".to_string(),
            0x20..=0x7e => (b as char).to_string(),
            _ => format!("\\x{b:02x}"),
        })
        .collect();
    format!(
        ".align {align}\n{label}: .word {len}\n.ascii \"{escaped}\"\n",
        align = WORD_SIZE,
        len = text.len()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escaping_formals_get_frame_slots() {
        let mut r#gen = Gen::new();
        let frame = Frame::new(Label::named("f"), &[true, true, false], &mut r#gen);
        assert_eq!(frame.formals()[0], Access::Slot(0));
        assert_eq!(frame.formals()[1], Access::Slot(WORD_SIZE));
        assert!(matches!(frame.formals()[2], Access::Reg(_)));
    }

    #[test]
    fn locals_grow_downward() {
        let mut r#gen = Gen::new();
        let mut frame = Frame::new(Label::named("f"), &[true], &mut r#gen);
        assert_eq!(frame.alloc_local(true, &mut r#gen), Access::Slot(-WORD_SIZE));
        assert_eq!(
            frame.alloc_local(true, &mut r#gen),
            Access::Slot(-2 * WORD_SIZE)
        );
    }

    #[test]
    fn string_data_is_length_prefixed() {
        let data = string_data(Label::named("str_0"), "hi\n");
        assert!(data.contains(".align 4"));
        assert!(data.contains("str_0: .word 3"));
        assert!(data.contains(".ascii \"hi\\n\""));
    }
}
