//! Atomic elements of a finite universe.
//!
//! An [`Element`] type fixes a totally ordered universe of at most 32 atoms.
//! The order is given by [`Element::index`] and never changes; every set,
//! family and relation built over the atoms inherits it.
//!
//! Two element types are provided:
//!
//! - [`Atom`]: eleven named atoms `Zero..=Ten`,
//! - [`Point`]: anonymous atoms `x1, x2, ...`, used by the enumerator.

use std::fmt::{self, Debug, Display, Formatter, Write};
use std::hash::Hash;

use crate::error::{Error, Result};
use crate::format::{Format, Render};

/// Upper bound on the size of any element universe (one machine word of bits).
pub const MAX_ATOMS: usize = 32;

/// An atom of a fixed, totally ordered, finite universe.
///
/// # Invariants
///
/// - `COUNT <= MAX_ATOMS`
/// - `index()` is a bijection between the atoms and `0..COUNT`
/// - the derived `Ord` agrees with `index()`
pub trait Element: Copy + Ord + Hash + Debug + Render + Send + Sync + 'static {
    /// Number of atoms in the universe.
    const COUNT: usize;

    /// Position of the atom in the total order.
    fn index(self) -> usize;

    /// Atom at the given position, if any.
    fn from_index(index: usize) -> Option<Self>;

    /// Numeric value used by [`Format::Numeric`].
    fn value(self) -> u32;

    /// Name used by [`Format::Named`].
    fn name(self) -> String;

    /// Atom at the given position, or an error.
    fn try_from_index(index: usize) -> Result<Self> {
        Self::from_index(index).ok_or(Error::ElementOutOfRange {
            index,
            count: Self::COUNT,
        })
    }

    /// Iterates over the whole universe in ascending order.
    fn all() -> Box<dyn Iterator<Item = Self>> {
        Box::new((0..Self::COUNT).filter_map(Self::from_index))
    }
}

/// The eleven named atoms `Zero..=Ten`.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Atom {
    Zero = 0,
    One = 1,
    Two = 2,
    Three = 3,
    Four = 4,
    Five = 5,
    Six = 6,
    Seven = 7,
    Eight = 8,
    Nine = 9,
    Ten = 10,
}

impl Atom {
    const ALL: [Atom; 11] = [
        Atom::Zero,
        Atom::One,
        Atom::Two,
        Atom::Three,
        Atom::Four,
        Atom::Five,
        Atom::Six,
        Atom::Seven,
        Atom::Eight,
        Atom::Nine,
        Atom::Ten,
    ];
}

impl Element for Atom {
    const COUNT: usize = 11;

    fn index(self) -> usize {
        self as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    fn value(self) -> u32 {
        self as u32
    }

    fn name(self) -> String {
        format!("{:?}", self)
    }
}

impl Display for Atom {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// An anonymous atom; `Point(i)` is the `i`-th point of the universe (0-indexed).
///
/// Points render 1-based: `Point(0)` is `1` numerically and `x1` by name.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct Point(u8);

impl Point {
    /// Creates the `index`-th point.
    pub fn new(index: usize) -> Result<Self> {
        Self::try_from_index(index)
    }
}

impl Element for Point {
    const COUNT: usize = MAX_ATOMS;

    fn index(self) -> usize {
        self.0 as usize
    }

    fn from_index(index: usize) -> Option<Self> {
        if index < Self::COUNT {
            Some(Point(index as u8))
        } else {
            None
        }
    }

    fn value(self) -> u32 {
        self.0 as u32 + 1
    }

    fn name(self) -> String {
        format!("x{}", self.value())
    }
}

impl Display for Point {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

impl Render for Atom {
    fn render(&self, format: Format, out: &mut dyn Write) -> fmt::Result {
        match format {
            Format::Numeric => write!(out, "{}", self.value()),
            Format::Named | Format::Generic => out.write_str(&self.name()),
        }
    }
}

impl Render for Point {
    fn render(&self, format: Format, out: &mut dyn Write) -> fmt::Result {
        match format {
            Format::Named => out.write_str(&self.name()),
            Format::Numeric | Format::Generic => write!(out, "{}", self.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    #[test]
    fn test_atom_order_matches_index() {
        let atoms: Vec<Atom> = Atom::all().collect();
        assert_eq!(atoms.len(), Atom::COUNT);
        for (i, atom) in atoms.iter().enumerate() {
            assert_eq!(atom.index(), i);
            assert_eq!(Atom::from_index(i), Some(*atom));
        }
        assert!(atoms.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(Atom::from_index(11), None);
    }

    #[test]
    fn test_atom_render() {
        assert_eq!(Atom::Five.render_to_string(Format::Numeric), "5");
        assert_eq!(Atom::Five.render_to_string(Format::Named), "Five");
        assert_eq!(Atom::Five.render_to_string(Format::Generic), "Five");
    }

    #[test]
    fn test_point() {
        let p = Point::new(0).unwrap();
        assert_eq!(p.value(), 1);
        assert_eq!(p.render_to_string(Format::Named), "x1");
        assert_eq!(p.render_to_string(Format::Generic), "1");
        assert_eq!(Point::new(32), Err(Error::ElementOutOfRange { index: 32, count: 32 }));
    }
}
