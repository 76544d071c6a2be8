//! Semantic analysis and IR translation core for the Lark language: a
//! small, strongly-typed, expression-oriented language with records,
//! arrays, and lexically nested functions.
//!
//! The pipeline runs in three stages over a parsed syntax tree:
//!
//! 1. [`semant`] type-checks the program while translating every
//!    expression to tree IR, tracking nested-function frames through
//!    [`translate`] and accumulating finished function bodies and string
//!    literals as [fragments](translate::Fragment).
//! 2. [`ir::canon`] flattens each function body into canonical form (no
//!    `Eseq`, calls only in known positions) as part of finishing its
//!    fragment.
//! 3. [`codegen`] tiles each canonical body into abstract assembly with
//!    symbolic registers, ready for register allocation.
//!
//! Lexing, parsing, escape analysis, and register allocation live outside
//! this crate.

pub mod ast;
pub mod codegen;
pub mod frame;
pub mod ir;
pub mod semant;
pub mod translate;
pub mod utils;

pub use semant::{Translation, translate_program};

use translate::Fragment;

/// Renders every string fragment for the data segment.
pub fn data_section(fragments: &[Fragment]) -> String {
    let mut out = String::new();
    for frag in fragments {
        if let Fragment::Str { label, text } = frag {
            out.push_str(&frame::string_data(*label, text));
        }
    }
    out
}
