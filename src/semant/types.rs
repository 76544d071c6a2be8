//! Semantic type definitions.

use std::fmt;

use internment::Intern;
use itertools::Itertools;

use crate::{
    interned,
    utils::{Symbol, Uniq},
};

/// The type of a source expression.
///
/// Record and array types carry a [`Uniq`] identity: equality is nominal,
/// so two structurally identical records declared separately are distinct.
/// `Name` is a reference to a type by name, resolved against the type
/// environment at each use; it is what lets a record mention itself (or a
/// later member of its declaration group) without the representation ever
/// being mutated.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub enum TyKind {
    Int,
    String,
    /// The type of the `nil` literal; compatible with every record type.
    Nil,
    /// The type of statements and value-less expressions.
    Unit,
    Record {
        fields: Vec<(Symbol, Ty)>,
        uniq: Uniq,
    },
    Array {
        elem: Ty,
        uniq: Uniq,
    },
    Name(Symbol),
}

interned!(Ty, TyKind);

impl Ty {
    pub fn new(kind: TyKind) -> Self {
        Ty(Intern::new(kind))
    }

    pub fn int() -> Self {
        Ty::new(TyKind::Int)
    }

    pub fn string() -> Self {
        Ty::new(TyKind::String)
    }

    pub fn nil() -> Self {
        Ty::new(TyKind::Nil)
    }

    pub fn unit() -> Self {
        Ty::new(TyKind::Unit)
    }

    pub fn record(fields: Vec<(Symbol, Ty)>, uniq: Uniq) -> Self {
        Ty::new(TyKind::Record { fields, uniq })
    }

    pub fn array(elem: Ty, uniq: Uniq) -> Self {
        Ty::new(TyKind::Array { elem, uniq })
    }

    pub fn name(sym: Symbol) -> Self {
        Ty::new(TyKind::Name(sym))
    }

    pub fn kind(self) -> &'static TyKind {
        self.0.as_ref()
    }

    pub fn is_record(self) -> bool {
        matches!(self.kind(), TyKind::Record { .. })
    }

    /// Compatibility for assignment, comparison, and argument passing:
    /// identity, widened so `nil` inhabits every record type. Callers must
    /// resolve [`TyKind::Name`] references first.
    pub fn compatible(self, other: Ty) -> bool {
        self == other
            || (self.is_record() && other == Ty::nil())
            || (self == Ty::nil() && other.is_record())
    }
}

impl fmt::Display for Ty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind() {
            TyKind::Int => write!(f, "int"),
            TyKind::String => write!(f, "string"),
            TyKind::Nil => write!(f, "nil"),
            TyKind::Unit => write!(f, "unit"),
            TyKind::Record { fields, uniq } => {
                let fields = fields
                    .iter()
                    .map(|(name, ty)| format!("{name}: {ty}"))
                    .join(", ");
                write!(f, "record{uniq} {{{fields}}}")
            }
            TyKind::Array { elem, uniq } => write!(f, "array{uniq} of {elem}"),
            TyKind::Name(sym) => write!(f, "{sym}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::sym;

    #[test]
    fn record_equality_is_nominal() {
        let fields = vec![(sym("x"), Ty::int())];
        let a = Ty::record(fields.clone(), Uniq(0));
        let b = Ty::record(fields, Uniq(1));
        assert_ne!(a, b);
        assert!(!a.compatible(b));
    }

    #[test]
    fn nil_is_compatible_with_records_only() {
        let rec = Ty::record(vec![(sym("x"), Ty::int())], Uniq(0));
        let arr = Ty::array(Ty::int(), Uniq(1));
        assert!(Ty::nil().compatible(rec));
        assert!(rec.compatible(Ty::nil()));
        assert!(Ty::nil().compatible(Ty::nil()));
        assert!(!Ty::nil().compatible(Ty::int()));
        assert!(!Ty::nil().compatible(Ty::string()));
        assert!(!Ty::nil().compatible(Ty::unit()));
        assert!(!Ty::nil().compatible(arr));
    }
}
