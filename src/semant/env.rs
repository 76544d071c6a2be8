//! Lexically scoped environments.
//!
//! Both environments are persistent in the shadowing sense only: entering a
//! scope pushes bindings, leaving pops them, and an inner binding hides an
//! outer one with the same name without destroying it.

use std::collections::HashMap;

use crate::{
    ir::Label,
    semant::types::Ty,
    translate::{Access, LevelId, Translator},
    utils::{Symbol, sym},
};

/// A symbol table with shadowing. Bindings pushed for one scope must be
/// popped by that scope, innermost first.
pub struct ScopeMap<T> {
    map: HashMap<Symbol, Vec<T>>,
}

impl<T> ScopeMap<T> {
    pub fn new() -> Self {
        ScopeMap {
            map: HashMap::new(),
        }
    }

    pub fn look(&self, name: Symbol) -> Option<&T> {
        self.map.get(&name)?.last()
    }

    pub fn enter(&mut self, name: Symbol, entry: T) {
        self.map.entry(name).or_default().push(entry);
    }

    pub fn leave(&mut self, name: Symbol) {
        let stack = self
            .map
            .get_mut(&name)
            .expect("leaving a name that was never entered");
        stack.pop().expect("unbalanced scope pop");
    }

    /// Overwrites the innermost binding of `name`. Used when a placeholder
    /// installed for a recursive declaration group is resolved.
    pub fn replace(&mut self, name: Symbol, entry: T) {
        let slot = self
            .map
            .get_mut(&name)
            .and_then(|stack| stack.last_mut())
            .expect("replacing a name that is not bound");
        *slot = entry;
    }
}

impl<T> Default for ScopeMap<T> {
    fn default() -> Self {
        ScopeMap::new()
    }
}

/// What a value-namespace symbol denotes.
pub enum Entry {
    Var(VarEntry),
    Func(FnEntry),
}

pub struct VarEntry {
    pub access: Access,
    pub ty: Ty,
    /// `for` loop variables are read-only within the loop body.
    pub assignable: bool,
}

pub struct FnEntry {
    /// The function's own level; its parent is the defining scope.
    pub level: LevelId,
    pub label: Label,
    pub formals: Vec<Ty>,
    pub result: Ty,
}

/// The initial type environment: the primitive types.
pub fn base_tenv() -> ScopeMap<Ty> {
    let mut tenv = ScopeMap::new();
    tenv.enter(sym("int"), Ty::int());
    tenv.enter(sym("string"), Ty::string());
    tenv
}

/// The initial value environment: the runtime library. These entries live
/// at the outermost level, which is how the translator knows to call them
/// without a static link.
pub fn base_venv(tr: &Translator) -> ScopeMap<Entry> {
    let int = Ty::int();
    let string = Ty::string();
    let unit = Ty::unit();
    let builtins: Vec<(&str, Vec<Ty>, Ty)> = vec![
        ("print", vec![string], unit),
        ("flush", vec![], unit),
        ("getchar", vec![], string),
        ("ord", vec![string], int),
        ("chr", vec![int], string),
        ("size", vec![string], int),
        ("substring", vec![string, int, int], string),
        ("concat", vec![string, string], string),
        ("not", vec![int], int),
        ("exit", vec![int], unit),
    ];

    let mut venv = ScopeMap::new();
    for (name, formals, result) in builtins {
        venv.enter(
            sym(name),
            Entry::Func(FnEntry {
                level: tr.outermost(),
                label: Label::named(name),
                formals,
                result,
            }),
        );
    }
    venv
}
