//! Families of subsets and their closure predicates.
//!
//! A [`Family`] is a set of [`FiniteSet`]s. Members are kept sorted in the
//! set order (cardinality, then members), so a family prints canonically
//! and two families with the same members compare equal.
//!
//! Predicates that take an explicit universe `U` (complement closure,
//! finitely additive, topological, discrete, indiscrete) first require every
//! member to be a subset of `U` and fail with
//! [`Error::MemberOutsideUniverse`] otherwise.
//!
//! # Examples
//!
//! ```
//! use finite_topology::element::Atom;
//! use finite_topology::set::FiniteSet;
//!
//! let universe: FiniteSet<Atom> = [Atom::One, Atom::Two].into_iter().collect();
//! let discrete = universe.power_set();
//! let indiscrete = universe.indiscrete_family();
//!
//! assert!(discrete.is_topological(&universe).unwrap());
//! assert!(discrete.is_discrete(&universe).unwrap());
//! assert!(indiscrete.is_indiscrete(&universe).unwrap());
//! ```

use std::cmp::Ordering;
use std::collections::btree_set;
use std::collections::{BTreeSet, HashSet};
use std::fmt::{self, Debug, Display, Formatter, Write};

use log::debug;
use num_bigint::BigUint;

use crate::cancel::{CancelToken, Outcome, Ticker, DEFAULT_CHECK_INTERVAL};
use crate::element::Element;
use crate::endo::EndoRelation;
use crate::error::{Error, Result};
use crate::format::{render_braced, Format, Render};
use crate::property::FamilyProperty;
use crate::set::FiniteSet;

/// A family of subsets of the universe of `E`.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct Family<E> {
    members: BTreeSet<FiniteSet<E>>,
}

impl<E: Element> Family<E> {
    /// The empty family `{}`.
    pub fn new() -> Self {
        Self {
            members: BTreeSet::new(),
        }
    }

    /// Adds a member. Returns `true` if it was not present.
    pub fn insert(&mut self, set: FiniteSet<E>) -> bool {
        self.members.insert(set)
    }

    /// Removes a member. Returns `true` if it was present.
    pub fn remove(&mut self, set: &FiniteSet<E>) -> bool {
        self.members.remove(set)
    }

    pub fn contains(&self, set: &FiniteSet<E>) -> bool {
        self.members.contains(set)
    }

    /// Number of members.
    pub fn cardinality(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Iterates over the members in set order.
    pub fn iter(&self) -> btree_set::Iter<'_, FiniteSet<E>> {
        self.members.iter()
    }

    /// Smallest member in set order.
    pub fn first(&self) -> Option<&FiniteSet<E>> {
        self.members.first()
    }

    /// Largest member in set order.
    pub fn last(&self) -> Option<&FiniteSet<E>> {
        self.members.last()
    }

    /// Decodes a family from the enumerator encoding over `n` atoms.
    ///
    /// Bit `s` of `code` is set iff the subset whose mask is `s` is a member.
    pub fn from_code(n: usize, code: &BigUint) -> Result<Self> {
        let width = 1u64 << n.min(E::COUNT);
        let mut family = Self::new();
        for (word_index, word) in code.iter_u64_digits().enumerate() {
            let mut word = word;
            while word != 0 {
                let s = word_index as u64 * 64 + word.trailing_zeros() as u64;
                word &= word - 1;
                if n > E::COUNT || s >= width {
                    return Err(Error::StrayBits {
                        bits: s,
                        count: n.min(E::COUNT),
                    });
                }
                family.insert(FiniteSet::from_bits(s as u32)?);
            }
        }
        Ok(family)
    }

    /// Encodes the family: bit `s` is set iff the subset with mask `s` is a member.
    pub fn code(&self) -> BigUint {
        let mut code = BigUint::ZERO;
        for set in &self.members {
            code.set_bit(set.bits() as u64, true);
        }
        code
    }

    /// Union of every member; `∅` for the empty family.
    pub fn sum_of_seq(&self) -> FiniteSet<E> {
        self.iter().fold(FiniteSet::empty(), |acc, set| acc.or(set))
    }

    /// Intersection of every member; `None` for the empty family.
    ///
    /// The empty intersection is only defined relative to a universe, see
    /// [`product_within`][Self::product_within].
    pub fn product_of_seq(&self) -> Option<FiniteSet<E>> {
        let mut iter = self.iter();
        let first = *iter.next()?;
        Some(iter.fold(first, |acc, set| acc.and(set)))
    }

    /// Intersection of every member relative to `universe`: the universe itself for the empty family.
    pub fn product_within(&self, universe: &FiniteSet<E>) -> FiniteSet<E> {
        self.iter().fold(*universe, |acc, set| acc.and(set))
    }

    /// The family is non-empty and has `∅` as a member.
    pub fn is_contains_empty(&self) -> bool {
        !self.is_empty() && self.contains(&FiniteSet::empty())
    }

    /// Closed under pairwise intersection (∩-complete).
    pub fn is_product_complete(&self) -> bool {
        self.closed_under(|a, b| a.and(b), &mut Ticker::unbounded()).settled()
    }

    /// Closed under pairwise union (∪-complete).
    pub fn is_sum_complete(&self) -> bool {
        self.closed_under(|a, b| a.or(b), &mut Ticker::unbounded()).settled()
    }

    /// Closed under pairwise difference (∖-complete).
    pub fn is_diff_complete(&self) -> bool {
        self.closed_under(|a, b| a.diff(b), &mut Ticker::unbounded()).settled()
    }

    /// Closed under pairwise symmetric difference (△-complete).
    pub fn is_sym_diff_complete(&self) -> bool {
        self.closed_under(|a, b| a.xor(b), &mut Ticker::unbounded()).settled()
    }

    /// Every atom of every member lies in `universe`.
    pub fn is_universe_ok(&self, universe: &FiniteSet<E>) -> bool {
        self.iter().all(|set| set.is_subset_of(universe))
    }

    /// Closed under complement relative to `universe`.
    pub fn is_complement_complete(&self, universe: &FiniteSet<E>) -> Result<bool> {
        self.require_universe(universe)?;
        Ok(self.iter().all(|set| self.contains(&set.complement_in(universe))))
    }

    /// A finitely additive family (on a finite universe, a σ-algebra):
    /// non-empty, contains `∅` and `universe`, closed under union and complement.
    pub fn is_finitely_additive(&self, universe: &FiniteSet<E>) -> Result<bool> {
        self.require_universe(universe)?;
        Ok(self.is_contains_empty()
            && self.contains(universe)
            && self.is_sum_complete()
            && self.is_complement_complete(universe)?)
    }

    /// A topology on `universe`: non-empty, contains `∅` and `universe`,
    /// closed under union and intersection.
    pub fn is_topological(&self, universe: &FiniteSet<E>) -> Result<bool> {
        Ok(self.is_topological_with(universe, &CancelToken::never())?.settled())
    }

    /// [`is_topological`][Self::is_topological], interruptible through `token`.
    pub fn is_topological_with(&self, universe: &FiniteSet<E>, token: &CancelToken) -> Result<Outcome<bool>> {
        self.require_universe(universe)?;
        debug!("is_topological(|F| = {}, |U| = {})", self.cardinality(), universe.cardinality());
        if !self.is_contains_empty() || !self.contains(universe) {
            return Ok(Outcome::Decided(false));
        }
        let mut ticker = Ticker::new(token, DEFAULT_CHECK_INTERVAL);
        Ok(match self.closed_under(|a, b| a.or(b), &mut ticker) {
            Outcome::Decided(true) => self.closed_under(|a, b| a.and(b), &mut ticker),
            other => other,
        })
    }

    /// The indiscrete topology `{∅, universe}`.
    ///
    /// On the empty universe the only topology is `{∅}`, which is both discrete and indiscrete.
    pub fn is_indiscrete(&self, universe: &FiniteSet<E>) -> Result<bool> {
        let expected = if universe.is_empty() { 1 } else { 2 };
        Ok(self.is_topological(universe)? && self.cardinality() == expected)
    }

    /// The discrete topology `P(universe)`.
    pub fn is_discrete(&self, universe: &FiniteSet<E>) -> Result<bool> {
        Ok(self.is_discrete_with(universe, &CancelToken::never())?.settled())
    }

    /// [`is_discrete`][Self::is_discrete], interruptible through `token`.
    pub fn is_discrete_with(&self, universe: &FiniteSet<E>, token: &CancelToken) -> Result<Outcome<bool>> {
        self.require_universe(universe)?;
        let expected = BigUint::from(1u32) << universe.cardinality();
        if BigUint::from(self.cardinality()) != expected {
            return Ok(Outcome::Decided(false));
        }
        self.is_topological_with(universe, token)
    }

    /// Checks a single named property against `universe`.
    pub fn check(&self, property: FamilyProperty, universe: &FiniteSet<E>) -> Result<bool> {
        Ok(match property {
            FamilyProperty::ContainsEmpty => self.is_contains_empty(),
            FamilyProperty::ProductComplete => self.is_product_complete(),
            FamilyProperty::SumComplete => self.is_sum_complete(),
            FamilyProperty::DiffComplete => self.is_diff_complete(),
            FamilyProperty::SymDiffComplete => self.is_sym_diff_complete(),
            FamilyProperty::UniverseOk => self.is_universe_ok(universe),
            FamilyProperty::ComplementComplete => self.is_complement_complete(universe)?,
            FamilyProperty::FinitelyAdditive => self.is_finitely_additive(universe)?,
            FamilyProperty::Topological => self.is_topological(universe)?,
            FamilyProperty::Indiscrete => self.is_indiscrete(universe)?,
            FamilyProperty::Discrete => self.is_discrete(universe)?,
        })
    }

    /// Every property of [`FamilyProperty::ALL`] that holds for `universe`.
    pub fn classify(&self, universe: &FiniteSet<E>) -> Result<BTreeSet<FamilyProperty>> {
        self.require_universe(universe)?;
        let mut holding = BTreeSet::new();
        for property in FamilyProperty::ALL {
            if self.check(property, universe)? {
                holding.insert(property);
            }
        }
        Ok(holding)
    }

    /// The inclusion order of the members as an endo-relation: `X R Y` iff `X ⊆ Y`.
    ///
    /// The declared universe of the relation is the whole power set of `universe`.
    pub fn subset_relation(&self, universe: &FiniteSet<E>) -> Result<EndoRelation<FiniteSet<E>>> {
        self.require_universe(universe)?;
        let domain: BTreeSet<FiniteSet<E>> = universe.power_set().iter().copied().collect();
        let mut relation = EndoRelation::with_universe(domain);
        for x in self.iter() {
            for y in self.iter().filter(|y| x.is_subset_of(y)) {
                relation.insert(*x, *y)?;
            }
        }
        Ok(relation)
    }

    /// Checks that `op(a, b)` is a member for every ordered pair of members, including `a == b`.
    fn closed_under(&self, op: impl Fn(&FiniteSet<E>, &FiniteSet<E>) -> FiniteSet<E>, ticker: &mut Ticker) -> Outcome<bool> {
        let bits: HashSet<u32> = self.iter().map(|set| set.bits()).collect();
        for a in self.iter() {
            for b in self.iter() {
                if ticker.tick() {
                    return Outcome::Cancelled;
                }
                if !bits.contains(&op(a, b).bits()) {
                    return Outcome::Decided(false);
                }
            }
        }
        Outcome::Decided(true)
    }

    fn require_universe(&self, universe: &FiniteSet<E>) -> Result<()> {
        match self.iter().find(|set| !set.is_subset_of(universe)) {
            Some(member) => Err(Error::MemberOutsideUniverse {
                member: member.render_to_string(Format::Generic),
                universe: universe.render_to_string(Format::Generic),
            }),
            None => Ok(()),
        }
    }
}

impl<E: Element> Default for Family<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: Element> Ord for Family<E> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.cardinality()
            .cmp(&other.cardinality())
            .then_with(|| self.members.iter().cmp(other.members.iter()))
    }
}

impl<E: Element> PartialOrd for Family<E> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<E: Element> FromIterator<FiniteSet<E>> for Family<E> {
    fn from_iter<T: IntoIterator<Item = FiniteSet<E>>>(iter: T) -> Self {
        Self {
            members: iter.into_iter().collect(),
        }
    }
}

impl<E: Element> Extend<FiniteSet<E>> for Family<E> {
    fn extend<T: IntoIterator<Item = FiniteSet<E>>>(&mut self, iter: T) {
        self.members.extend(iter);
    }
}

impl<'a, E: Element> IntoIterator for &'a Family<E> {
    type Item = &'a FiniteSet<E>;
    type IntoIter = btree_set::Iter<'a, FiniteSet<E>>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<E: Element> Render for Family<E> {
    fn render(&self, format: Format, out: &mut dyn Write) -> fmt::Result {
        render_braced(self.iter(), format, out)
    }
}

impl<E: Element> Display for Family<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.render(Format::Generic, f)
    }
}

impl<E: Element> Debug for Family<E> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::element::{Atom, Point};
    use crate::relation::BinaryRelation;

    fn set(atoms: &[Atom]) -> FiniteSet<Atom> {
        atoms.iter().copied().collect()
    }

    fn family(sets: &[&[Atom]]) -> Family<Atom> {
        sets.iter().map(|atoms| set(atoms)).collect()
    }

    #[test]
    fn test_duplicates_collapse() {
        let mut f = Family::new();
        assert!(f.insert(set(&[Atom::One, Atom::Two])));
        assert!(!f.insert(set(&[Atom::Two, Atom::One])));
        assert_eq!(f.cardinality(), 1);
    }

    #[test]
    fn test_sum_and_product() {
        let f = family(&[&[Atom::One, Atom::Two], &[Atom::Two, Atom::Three]]);
        assert_eq!(f.sum_of_seq(), set(&[Atom::One, Atom::Two, Atom::Three]));
        assert_eq!(f.product_of_seq(), Some(set(&[Atom::Two])));

        let empty = Family::<Atom>::new();
        assert_eq!(empty.sum_of_seq(), FiniteSet::empty());
        assert_eq!(empty.product_of_seq(), None);
        let u = set(&[Atom::One, Atom::Two]);
        assert_eq!(empty.product_within(&u), u);
    }

    #[test]
    fn test_closure_predicates() {
        let chain = family(&[&[], &[Atom::One], &[Atom::One, Atom::Two]]);
        assert!(chain.is_contains_empty());
        assert!(chain.is_sum_complete());
        assert!(chain.is_product_complete());
        assert!(!chain.is_sym_diff_complete()); // {1} △ {1,2} = {2}
        assert!(!chain.is_diff_complete());

        let boolean = set(&[Atom::One, Atom::Two]).power_set();
        assert!(boolean.is_diff_complete());
        assert!(boolean.is_sym_diff_complete());

        let antichain = family(&[&[Atom::One], &[Atom::Two]]);
        assert!(!antichain.is_sum_complete());
        assert!(!antichain.is_product_complete());
        assert!(!antichain.is_contains_empty());
        assert!(!Family::<Atom>::new().is_contains_empty());
    }

    #[test]
    fn test_universe_checks() {
        let u = set(&[Atom::One, Atom::Two]);
        let outside = family(&[&[], &[Atom::Three]]);
        assert!(!outside.is_universe_ok(&u));
        assert!(matches!(
            outside.is_complement_complete(&u),
            Err(Error::MemberOutsideUniverse { .. })
        ));
        assert!(outside.is_topological(&u).is_err());
    }

    #[test]
    fn test_complement_involution() {
        let u = set(&[Atom::One, Atom::Two, Atom::Three]);
        let algebra = family(&[&[], &[Atom::One], &[Atom::Two, Atom::Three], &[Atom::One, Atom::Two, Atom::Three]]);
        assert!(algebra.is_complement_complete(&u).unwrap());
        assert!(algebra.is_finitely_additive(&u).unwrap());
        for m in algebra.iter() {
            assert_eq!(m.complement_in(&u).complement_in(&u), *m);
            assert!(m.complement_in(&u).and(m).is_empty());
        }
    }

    #[test]
    fn test_topologies() {
        let u = set(&[Atom::One, Atom::Two]);
        let discrete = u.power_set();
        let indiscrete = u.indiscrete_family();
        let sierpinski = family(&[&[], &[Atom::One], &[Atom::One, Atom::Two]]);

        assert!(discrete.is_topological(&u).unwrap());
        assert!(indiscrete.is_topological(&u).unwrap());
        assert!(sierpinski.is_topological(&u).unwrap());

        assert!(discrete.is_discrete(&u).unwrap());
        assert!(!discrete.is_indiscrete(&u).unwrap());
        assert!(indiscrete.is_indiscrete(&u).unwrap());
        assert!(!sierpinski.is_discrete(&u).unwrap());
        assert!(!sierpinski.is_indiscrete(&u).unwrap());

        // missing ∅ or U
        let no_empty = family(&[&[Atom::One], &[Atom::One, Atom::Two]]);
        let no_universe = family(&[&[], &[Atom::One]]);
        assert!(!no_empty.is_topological(&u).unwrap());
        assert!(!no_universe.is_topological(&u).unwrap());
        assert!(!Family::<Atom>::new().is_topological(&u).unwrap());

        // not closed under union
        let broken = family(&[&[], &[Atom::One], &[Atom::Two], &[Atom::One, Atom::Two, Atom::Three]]);
        let big = set(&[Atom::One, Atom::Two, Atom::Three]);
        assert!(!broken.is_topological(&big).unwrap());
    }

    #[test]
    fn test_empty_universe() {
        let u = FiniteSet::<Atom>::empty();
        let only_empty = u.power_set();
        assert_eq!(only_empty.cardinality(), 1);
        assert!(only_empty.is_topological(&u).unwrap());
        assert!(only_empty.is_discrete(&u).unwrap());
        assert!(only_empty.is_indiscrete(&u).unwrap());
    }

    #[test]
    fn test_discrete_with_cancelled_token() {
        let u: FiniteSet<Point> = (0..8).map(|i| Point::new(i).unwrap()).collect();
        let discrete = u.power_set();
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(discrete.is_discrete_with(&u, &token).unwrap(), Outcome::Cancelled);
        assert_eq!(
            discrete.is_discrete_with(&u, &CancelToken::never()).unwrap(),
            Outcome::Decided(true)
        );
    }

    #[test]
    fn test_classify() {
        let u = set(&[Atom::One, Atom::Two]);
        let properties = u.power_set().classify(&u).unwrap();
        println!("properties = {:?}", properties);
        assert!(properties.contains(&FamilyProperty::Discrete));
        assert!(properties.contains(&FamilyProperty::FinitelyAdditive));
        assert!(!properties.contains(&FamilyProperty::Indiscrete));
        assert!(u.indiscrete_family().check(FamilyProperty::Indiscrete, &u).unwrap());
    }

    #[test]
    fn test_family_order() {
        let a = family(&[&[]]);
        let b = family(&[&[], &[Atom::One]]);
        let c = family(&[&[], &[Atom::Two]]);
        let d = family(&[&[Atom::One], &[Atom::Two]]);
        let mut families = vec![d.clone(), c.clone(), b.clone(), a.clone()];
        families.sort();
        assert_eq!(families, vec![a, b, c, d]);
    }

    #[test]
    fn test_code_roundtrip() {
        let f: Family<Point> = Family::from_code(2, &BigUint::from(0b1011u32)).unwrap();
        assert_eq!(f.cardinality(), 3);
        assert_eq!(f.to_string(), "{{},{1},{1,2}}");
        assert_eq!(f.code(), BigUint::from(0b1011u32));
        assert!(Family::<Point>::from_code(1, &BigUint::from(0b100u32)).is_err());
    }

    #[test]
    fn test_subset_relation() {
        let u = set(&[Atom::Two, Atom::Four, Atom::Five]);
        let p = u.power_set();
        let rel = p.subset_relation(&u).unwrap();
        println!("rel = {}", rel.display(Format::Numeric));
        assert_eq!(rel.universe().len(), 8);
        // |{(X, Y) : X ⊆ Y ⊆ U}| = 3^|U|
        assert_eq!(rel.len(), 27);
        assert!(rel.is_reflexive());
        assert!(rel.is_antisymmetric());
        assert!(rel.is_transitive());
        assert!(rel.is_partial_order());
        assert!(!rel.is_total());

        let chain = family(&[&[], &[Atom::Two]]);
        let rel = chain.subset_relation(&u).unwrap();
        assert_eq!(rel.universe().len(), 8);
        assert_eq!(rel.len(), 3);
        assert!(!rel.is_left_total());
    }

    #[test]
    fn test_render() {
        let f = family(&[&[], &[Atom::One], &[Atom::One, Atom::Five]]);
        assert_eq!(f.render_to_string(Format::Numeric), "{{},{1},{1,5}}");
        assert_eq!(f.render_to_string(Format::Named), "{{},{One},{One,Five}}");
    }
}
