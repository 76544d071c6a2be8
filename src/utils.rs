//! Miscellaneous utilities used across the codebase.

use std::fmt;

pub fn write_comma_separated<T: fmt::Display>(
    f: &mut fmt::Formatter,
    items: impl IntoIterator<Item = T>,
) -> fmt::Result {
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", item)?;
    }
    Ok(())
}

pub fn indent(s: impl AsRef<str>) -> String {
    textwrap::indent(s.as_ref(), "  ")
}

#[macro_export]
/// Generates a wrapper type for an [`Intern`][internment::Intern].
macro_rules! interned {
    ($name:ident, $data:ty) => {
        #[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
        pub struct $name(internment::Intern<$data>);

        impl std::ops::Deref for $name {
            type Target = $data;

            fn deref(&self) -> &Self::Target {
                &self.0
            }
        }
    };
}

interned!(Symbol, String);

impl Symbol {
    pub fn new(s: impl AsRef<str>) -> Self {
        Symbol(internment::Intern::from_ref(s.as_ref()))
    }
}

pub fn sym(s: impl AsRef<str>) -> Symbol {
    Symbol::new(s)
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A freshly minted identity, used to tell apart structurally identical
/// record and array types.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize)]
pub struct Uniq(pub u32);

impl fmt::Display for Uniq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}
