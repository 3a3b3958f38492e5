//! Textual rendering of atoms, sets, families and relations.
//!
//! Every structure renders through the [`Render`] trait with an explicit
//! [`Format`] selector. The selector only changes how atoms are spelled:
//!
//! - [`Format::Numeric`] prints the numeric value of each atom (`{1,5}`),
//! - [`Format::Named`] prints the name of each atom (`{One,Five}`),
//! - [`Format::Generic`] prints the native form of the atom type.
//!
//! The `Display` implementations of the structures use [`Format::Generic`].
//!
//! # Examples
//!
//! ```
//! use finite_topology::element::Atom;
//! use finite_topology::format::{Format, Render};
//! use finite_topology::set::FiniteSet;
//!
//! let set: FiniteSet<Atom> = [Atom::One, Atom::Five].into_iter().collect();
//! assert_eq!(set.display(Format::Numeric).to_string(), "{1,5}");
//! assert_eq!(set.display(Format::Named).to_string(), "{One,Five}");
//! ```

use std::fmt::{self, Display, Formatter, Write};

/// Format selector for [`Render`].
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash, Default)]
pub enum Format {
    /// Numeric value of each atom.
    Numeric,
    /// Name of each atom.
    Named,
    /// Native representation of the atom type.
    #[default]
    Generic,
}

impl Format {
    /// Resolves a one-letter format specifier.
    ///
    /// `N`/`n` select [`Format::Numeric`], `S`/`s` select [`Format::Named`].
    /// Anything else, including the empty string, falls back to [`Format::Generic`].
    pub fn from_specifier(spec: &str) -> Self {
        match spec {
            "N" | "n" => Format::Numeric,
            "S" | "s" => Format::Named,
            _ => Format::Generic,
        }
    }
}

/// Rendering capability of every structure in the crate.
pub trait Render {
    /// Writes `self` in the given format.
    fn render(&self, format: Format, out: &mut dyn Write) -> fmt::Result;

    /// Returns a `Display` adapter rendering `self` in the given format.
    fn display(&self, format: Format) -> Rendered<'_, Self> {
        Rendered { value: self, format }
    }

    /// Renders `self` into a fresh string.
    fn render_to_string(&self, format: Format) -> String {
        let mut out = String::new();
        // Writing into a String never fails.
        let _ = self.render(format, &mut out);
        out
    }
}

/// `Display` adapter returned by [`Render::display`].
pub struct Rendered<'a, T: ?Sized> {
    value: &'a T,
    format: Format,
}

impl<T: Render + ?Sized> Display for Rendered<'_, T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.value.render(self.format, f)
    }
}

/// Writes `items` as a brace-delimited, comma-separated list.
pub(crate) fn render_braced<'a, T, I>(items: I, format: Format, out: &mut dyn Write) -> fmt::Result
where
    T: Render + 'a + ?Sized,
    I: IntoIterator<Item = &'a T>,
{
    out.write_char('{')?;
    for (i, item) in items.into_iter().enumerate() {
        if i > 0 {
            out.write_char(',')?;
        }
        item.render(format, out)?;
    }
    out.write_char('}')
}

macro_rules! render_via_display {
    ($($t:ty),* $(,)?) => {
        $(
            impl Render for $t {
                fn render(&self, _format: Format, out: &mut dyn Write) -> fmt::Result {
                    write!(out, "{}", self)
                }
            }
        )*
    };
}

render_via_display!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize, char, bool, str, String);

impl<T: Render + ?Sized> Render for &T {
    fn render(&self, format: Format, out: &mut dyn Write) -> fmt::Result {
        (**self).render(format, out)
    }
}

impl<A: Render, B: Render> Render for (A, B) {
    fn render(&self, format: Format, out: &mut dyn Write) -> fmt::Result {
        out.write_char('(')?;
        self.0.render(format, out)?;
        out.write_char(',')?;
        self.1.render(format, out)?;
        out.write_char(')')
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_specifier_fallback() {
        assert_eq!(Format::from_specifier("N"), Format::Numeric);
        assert_eq!(Format::from_specifier("n"), Format::Numeric);
        assert_eq!(Format::from_specifier("S"), Format::Named);
        assert_eq!(Format::from_specifier("s"), Format::Named);
        assert_eq!(Format::from_specifier("G"), Format::Generic);
        assert_eq!(Format::from_specifier("D"), Format::Generic);
        assert_eq!(Format::from_specifier("?"), Format::Generic);
        assert_eq!(Format::from_specifier(""), Format::Generic);
    }

    #[test]
    fn test_render_pair() {
        let pair = (1u32, 2u32);
        assert_eq!(pair.render_to_string(Format::Numeric), "(1,2)");
        assert_eq!(pair.display(Format::Generic).to_string(), "(1,2)");
    }

    #[test]
    fn test_render_braced() {
        let items = vec![3i32, 1, 2];
        let mut out = String::new();
        render_braced(items.iter(), Format::Generic, &mut out).unwrap();
        assert_eq!(out, "{3,1,2}");

        let empty: Vec<i32> = Vec::new();
        let mut out = String::new();
        render_braced(empty.iter(), Format::Generic, &mut out).unwrap();
        assert_eq!(out, "{}");
    }
}
