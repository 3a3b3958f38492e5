//! Finite sets over an [`Element`] universe, stored as a single bit mask.
//!
//! A [`FiniteSet`] is a value: every algebraic operation returns a fresh set
//! and never touches its operands. Bit `i` of the mask is set iff the atom
//! with index `i` is a member.
//!
//! # Ordering
//!
//! Sets are ordered by cardinality first, then lexicographically by their
//! ascending member sequences. This is the order used for canonical output
//! and for the sorted storage of [`Family`].
//!
//! ```
//! use finite_topology::element::Atom;
//! use finite_topology::set::FiniteSet;
//!
//! let a: FiniteSet<Atom> = [Atom::Two].into_iter().collect();
//! let b: FiniteSet<Atom> = [Atom::One, Atom::Three].into_iter().collect();
//! let c: FiniteSet<Atom> = [Atom::One, Atom::Two].into_iter().collect();
//! assert!(a < b); // smaller cardinality first
//! assert!(c < b); // then earliest differing member
//! ```

use std::cmp::Ordering;
use std::fmt::{self, Debug, Display, Formatter, Write};
use std::hash::{Hash, Hasher};
use std::iter::FusedIterator;
use std::marker::PhantomData;
use std::ops::{BitAnd, BitOr, BitXor, Sub};

use log::{debug, warn};

use crate::element::Element;
use crate::error::{Error, Result};
use crate::family::Family;
use crate::format::{render_braced, Format, Render};

/// Power sets above this many members are logged as expensive.
const LARGE_POWER_SET: usize = 20;

/// A finite set of atoms of type `E`.
pub struct FiniteSet<E> {
    bits: u32,
    _marker: PhantomData<E>,
}

impl<E: Element> FiniteSet<E> {
    /// Mask of every atom of the universe.
    fn universe_mask() -> u32 {
        if E::COUNT >= 32 {
            u32::MAX
        } else {
            (1u32 << E::COUNT) - 1
        }
    }

    const fn raw(bits: u32) -> Self {
        Self {
            bits,
            _marker: PhantomData,
        }
    }

    /// The empty set.
    pub const fn empty() -> Self {
        Self::raw(0)
    }

    /// The set of every atom of `E`.
    pub fn full() -> Self {
        Self::raw(Self::universe_mask())
    }

    /// The set `{element}`.
    pub fn singleton(element: E) -> Self {
        Self::raw(1 << element.index())
    }

    /// Creates a set from its bit mask.
    ///
    /// Fails if a bit at or beyond `E::COUNT` is set.
    pub fn from_bits(bits: u32) -> Result<Self> {
        if bits & !Self::universe_mask() != 0 {
            return Err(Error::StrayBits {
                bits: bits as u64,
                count: E::COUNT,
            });
        }
        Ok(Self::raw(bits))
    }

    /// Creates a set from a possibly absent collection; an absent collection is the empty set.
    pub fn from_optional<I>(elements: Option<I>) -> Self
    where
        I: IntoIterator<Item = E>,
    {
        match elements {
            Some(elements) => elements.into_iter().collect(),
            None => Self::empty(),
        }
    }

    /// The bit mask of the set.
    pub fn bits(&self) -> u32 {
        self.bits
    }

    /// Number of members.
    pub fn cardinality(&self) -> usize {
        self.bits.count_ones() as usize
    }

    pub fn is_empty(&self) -> bool {
        self.bits == 0
    }

    pub fn contains(&self, element: E) -> bool {
        self.bits & (1 << element.index()) != 0
    }

    /// Returns `true` if every member of `self` is a member of `other`.
    pub fn is_subset_of(&self, other: &Self) -> bool {
        self.bits & !other.bits == 0
    }

    pub fn is_superset_of(&self, other: &Self) -> bool {
        other.is_subset_of(self)
    }

    /// Returns a copy of the set with `element` added.
    pub fn with(&self, element: E) -> Self {
        Self::raw(self.bits | (1 << element.index()))
    }

    /// Returns a copy of the set with `element` removed.
    pub fn without(&self, element: E) -> Self {
        Self::raw(self.bits & !(1 << element.index()))
    }

    /// Intersection `self ∩ other`.
    pub fn and(&self, other: &Self) -> Self {
        Self::raw(self.bits & other.bits)
    }

    /// Union `self ∪ other`.
    pub fn or(&self, other: &Self) -> Self {
        Self::raw(self.bits | other.bits)
    }

    /// Difference `self ∖ other`.
    pub fn diff(&self, other: &Self) -> Self {
        Self::raw(self.bits & !other.bits)
    }

    /// Symmetric difference `self △ other`.
    pub fn xor(&self, other: &Self) -> Self {
        Self::raw(self.bits ^ other.bits)
    }

    /// Complement of `self` relative to `universe`, i.e. `universe ∖ self`.
    pub fn complement_in(&self, universe: &Self) -> Self {
        universe.diff(self)
    }

    /// Iterates over the members in ascending order.
    pub fn iter(&self) -> Members<E> {
        Members {
            bits: self.bits,
            _marker: PhantomData,
        }
    }

    /// Smallest member, if any.
    pub fn first(&self) -> Option<E> {
        self.iter().next()
    }

    /// Iterates over every subset of `self`.
    ///
    /// The `i`-th subset contains the `j`-th member of `self` (in iteration
    /// order) iff bit `j` of `i` is set, so the first subset is `∅` and the
    /// last one is `self`.
    pub fn subsets(&self) -> Subsets<E> {
        let members: Vec<u32> = self.iter().map(|e| 1u32 << e.index()).collect();
        let total = 1u64 << members.len();
        Subsets {
            members,
            next: 0,
            total,
            _marker: PhantomData,
        }
    }

    /// The power set `P(self)`, containing `2^|self|` subsets.
    pub fn power_set(&self) -> Family<E> {
        let n = self.cardinality();
        debug!("power_set(cardinality = {})", n);
        if n > LARGE_POWER_SET {
            warn!("materializing a power set of 2^{} subsets", n);
        }
        let mut family = self.indiscrete_family();
        family.extend(self.subsets());
        family
    }

    /// The indiscrete family `{∅, self}`, or `{∅}` when `self` is empty.
    pub fn indiscrete_family(&self) -> Family<E> {
        let mut family = Family::new();
        family.insert(Self::empty());
        family.insert(*self);
        family
    }
}

impl<E> Clone for FiniteSet<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for FiniteSet<E> {}

impl<E> PartialEq for FiniteSet<E> {
    fn eq(&self, other: &Self) -> bool {
        self.bits == other.bits
    }
}

impl<E> Eq for FiniteSet<E> {}

impl<E> Hash for FiniteSet<E> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.bits.hash(state);
    }
}

impl<E> Ord for FiniteSet<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        let by_size = self.bits.count_ones().cmp(&other.bits.count_ones());
        if by_size != Ordering::Equal {
            return by_size;
        }
        let differ = self.bits ^ other.bits;
        if differ == 0 {
            return Ordering::Equal;
        }
        // Both sequences agree below the lowest differing atom; whoever owns it is smaller there.
        let lowest = differ & differ.wrapping_neg();
        if self.bits & lowest != 0 {
            Ordering::Less
        } else {
            Ordering::Greater
        }
    }
}

impl<E> PartialOrd for FiniteSet<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Element> Default for FiniteSet<E> {
    fn default() -> Self {
        Self::empty()
    }
}

impl<E: Element> FromIterator<E> for FiniteSet<E> {
    fn from_iter<T: IntoIterator<Item = E>>(iter: T) -> Self {
        let bits = iter.into_iter().fold(0u32, |acc, e| acc | (1 << e.index()));
        Self::raw(bits)
    }
}

impl<E: Element> IntoIterator for FiniteSet<E> {
    type Item = E;
    type IntoIter = Members<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E: Element> IntoIterator for &FiniteSet<E> {
    type Item = E;
    type IntoIter = Members<E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E: Element> BitAnd for FiniteSet<E> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self::Output {
        self.and(&rhs)
    }
}

impl<E: Element> BitOr for FiniteSet<E> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self::Output {
        self.or(&rhs)
    }
}

impl<E: Element> Sub for FiniteSet<E> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        self.diff(&rhs)
    }
}

impl<E: Element> BitXor for FiniteSet<E> {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self::Output {
        self.xor(&rhs)
    }
}

impl<E: Element> Render for FiniteSet<E> {
    fn render(&self, format: Format, out: &mut dyn Write) -> fmt::Result {
        let members: Vec<E> = self.iter().collect();
        render_braced(members.iter(), format, out)
    }
}

impl<E: Element> Display for FiniteSet<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.render(Format::Generic, f)
    }
}

impl<E: Element> Debug for FiniteSet<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

/// Iterator over the members of a [`FiniteSet`], in ascending order.
pub struct Members<E> {
    bits: u32,
    _marker: PhantomData<E>,
}

impl<E: Element> Iterator for Members<E> {
    type Item = E;

    fn next(&mut self) -> Option<Self::Item> {
        while self.bits != 0 {
            let index = self.bits.trailing_zeros() as usize;
            self.bits &= self.bits - 1; // Clear lowest set bit
            if let Some(element) = E::from_index(index) {
                return Some(element);
            }
        }
        None
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.bits.count_ones() as usize;
        (n, Some(n))
    }
}

impl<E: Element> FusedIterator for Members<E> {}

/// Iterator over the subsets of a [`FiniteSet`], see [`FiniteSet::subsets`].
pub struct Subsets<E> {
    /// Single-bit masks of the members, in iteration order.
    members: Vec<u32>,
    next: u64,
    total: u64,
    _marker: PhantomData<E>,
}

impl<E: Element> Iterator for Subsets<E> {
    type Item = FiniteSet<E>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.next >= self.total {
            return None;
        }
        let index = self.next;
        self.next += 1;
        let bits = self
            .members
            .iter()
            .enumerate()
            .filter(|&(j, _)| index & (1 << j) != 0)
            .fold(0u32, |acc, (_, &m)| acc | m);
        Some(FiniteSet::raw(bits))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let rest = (self.total - self.next) as usize;
        (rest, Some(rest))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::element::{Atom, Point};

    fn set(atoms: &[Atom]) -> FiniteSet<Atom> {
        atoms.iter().copied().collect()
    }

    #[test]
    fn test_algebra() {
        let x = set(&[Atom::One, Atom::Five]);
        let y = set(&[Atom::Two, Atom::Four, Atom::Five]);

        assert_eq!(x.and(&y), set(&[Atom::Five]));
        assert_eq!(x.or(&y), set(&[Atom::One, Atom::Two, Atom::Four, Atom::Five]));
        assert_eq!(x.diff(&y), set(&[Atom::One]));
        assert_eq!(x.xor(&y), set(&[Atom::One, Atom::Two, Atom::Four]));

        assert_eq!(x & y, x.and(&y));
        assert_eq!(x | y, x.or(&y));
        assert_eq!(x - y, x.diff(&y));
        assert_eq!(x ^ y, x.xor(&y));

        // operands are untouched
        assert_eq!(x, set(&[Atom::One, Atom::Five]));
    }

    #[test]
    fn test_algebra_identities() {
        let atoms: Vec<Atom> = Atom::all().collect();
        for a_bits in [0u32, 0b1, 0b1010, 0b111_0000_1111, 0b10101] {
            for b_bits in [0u32, 0b11, 0b1100, 0b100_0000_0001, 0b111] {
                let a = FiniteSet::<Atom>::from_bits(a_bits).unwrap();
                let b = FiniteSet::<Atom>::from_bits(b_bits).unwrap();
                assert_eq!(a.and(&b).or(&a.diff(&b)), a);
                assert_eq!(a.xor(&b), a.or(&b).diff(&a.and(&b)));
                for &e in &atoms {
                    assert_eq!(a.or(&b).contains(e), a.contains(e) || b.contains(e));
                }
            }
        }
    }

    #[test]
    fn test_with_without() {
        let x = set(&[Atom::One, Atom::Five]);
        assert_eq!(x.with(Atom::Three), set(&[Atom::One, Atom::Three, Atom::Five]));
        assert_eq!(x.with(Atom::One), x);
        assert_eq!(x.without(Atom::Five), set(&[Atom::One]));
        assert_eq!(x.without(Atom::Two), x);
        assert_eq!(x.with(Atom::Ten).without(Atom::Ten), x);
        assert_eq!(FiniteSet::<Atom>::empty().with(Atom::Zero).cardinality(), 1);
    }

    #[test]
    fn test_complement_in() {
        let u = set(&[Atom::One, Atom::Two, Atom::Three]);
        let x = set(&[Atom::Two]);
        assert_eq!(x.complement_in(&u), set(&[Atom::One, Atom::Three]));
        assert_eq!(u.complement_in(&u), FiniteSet::empty());
        assert_eq!(FiniteSet::empty().complement_in(&u), u);
        // members outside the universe are dropped
        assert_eq!(set(&[Atom::Two, Atom::Seven]).complement_in(&u), x.complement_in(&u));
    }

    #[test]
    fn test_from_bits_rejects_stray_bits() {
        assert!(FiniteSet::<Atom>::from_bits(1 << 10).is_ok());
        assert_eq!(
            FiniteSet::<Atom>::from_bits(1 << 11),
            Err(Error::StrayBits { bits: 1 << 11, count: 11 })
        );
        assert_eq!(FiniteSet::<Atom>::full().cardinality(), 11);
        assert_eq!(FiniteSet::<Point>::full().cardinality(), 32);
    }

    #[test]
    fn test_from_optional() {
        let none: Option<Vec<Atom>> = None;
        assert!(FiniteSet::from_optional(none).is_empty());
        let some = FiniteSet::from_optional(Some(vec![Atom::Three, Atom::Three]));
        assert_eq!(some, set(&[Atom::Three]));
    }

    #[test]
    fn test_subset() {
        let x = set(&[Atom::One]);
        let y = set(&[Atom::One, Atom::Two]);
        assert!(x.is_subset_of(&y));
        assert!(!y.is_subset_of(&x));
        assert!(y.is_superset_of(&x));
        assert!(FiniteSet::empty().is_subset_of(&x));
        assert!(x.is_subset_of(&x));
    }

    #[test]
    fn test_order() {
        let empty = FiniteSet::<Atom>::empty();
        let two = set(&[Atom::Two]);
        let one_three = set(&[Atom::One, Atom::Three]);
        let one_two = set(&[Atom::One, Atom::Two]);
        let two_three = set(&[Atom::Two, Atom::Three]);

        let mut sets = vec![two_three, one_three, two, one_two, empty];
        sets.sort();
        assert_eq!(sets, vec![empty, two, one_two, one_three, two_three]);
        assert_eq!(one_two.cmp(&one_two), Ordering::Equal);
    }

    #[test]
    fn test_power_set() {
        let s = set(&[Atom::One, Atom::Two]);
        let p = s.power_set();
        println!("P({}) = {}", s, p);
        assert_eq!(p.cardinality(), 4);
        let expected: Vec<FiniteSet<Atom>> =
            vec![set(&[]), set(&[Atom::One]), set(&[Atom::Two]), set(&[Atom::One, Atom::Two])];
        assert_eq!(p.iter().copied().collect::<Vec<_>>(), expected);

        for n in 0..=6 {
            let s: FiniteSet<Point> = (0..n).map(|i| Point::new(i).unwrap()).collect();
            assert_eq!(s.power_set().cardinality(), 1 << n);
        }
    }

    #[test]
    fn test_subsets_follow_member_order() {
        let s = set(&[Atom::Two, Atom::Seven]);
        let subsets: Vec<_> = s.subsets().collect();
        assert_eq!(
            subsets,
            vec![set(&[]), set(&[Atom::Two]), set(&[Atom::Seven]), set(&[Atom::Two, Atom::Seven])]
        );
    }

    #[test]
    fn test_indiscrete_family() {
        assert_eq!(FiniteSet::<Atom>::empty().indiscrete_family().cardinality(), 1);
        let s = set(&[Atom::Three]);
        let family = s.indiscrete_family();
        assert_eq!(family.cardinality(), 2);
        assert!(family.contains(&FiniteSet::empty()));
        assert!(family.contains(&s));
    }

    #[test]
    fn test_render() {
        let s = set(&[Atom::One, Atom::Five]);
        assert_eq!(s.render_to_string(Format::Numeric), "{1,5}");
        assert_eq!(s.render_to_string(Format::Named), "{One,Five}");
        assert_eq!(s.to_string(), "{One,Five}");
        assert_eq!(FiniteSet::<Atom>::empty().to_string(), "{}");
        assert_eq!(format!("{:?}", s), "{One, Five}");
    }
}
