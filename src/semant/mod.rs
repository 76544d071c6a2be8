//! Semantic analysis: type checking fused with translation to the tree IR.

use miette::Result;

use crate::{ast::types as ast, ir::Gen, translate::Fragment};

mod env;
mod typeck;
pub mod types;

pub use typeck::{Tcx, TypeError};

/// Everything the front half of the compiler produces: the translated
/// fragments plus the name generator, which instruction selection keeps
/// drawing temporaries from.
#[derive(Debug)]
pub struct Translation {
    pub fragments: Vec<Fragment>,
    pub r#gen: Gen,
}

/// Type-checks and translates a whole program. The first error aborts the
/// compilation.
pub fn translate_program(prog: &ast::Exp) -> Result<Translation> {
    let (fragments, r#gen) = Tcx::new().check(prog)?;
    log::debug!("translated {} fragments", fragments.len());
    Ok(Translation { fragments, r#gen })
}
