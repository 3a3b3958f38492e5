//! General binary relations between two sets.
//!
//! A [`Relation`] is a set of pairs `(a, b)` together with a domain and a
//! codomain. Each side is either *derived* (it grows with the pairs and is
//! always the minimal covering set) or *declared* (fixed by the caller;
//! inserting a pair it does not cover is an error). The properties shared by
//! every relation live on the [`BinaryRelation`] trait, so endo-relations get
//! them for free.

use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Debug, Display, Formatter, Write};

use log::debug;

use crate::error::{Error, Result};
use crate::format::{render_braced, Format, Render};
use crate::property::{check_general, Classify, Property};

/// Whether a side of a relation follows the pairs or was fixed by the caller.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Side {
    Derived,
    Declared,
}

/// Common interface of binary relations.
///
/// Implementors provide the two sides and the membership test; the general
/// properties are derived from those.
pub trait BinaryRelation {
    type Left: Ord + Clone;
    type Right: Ord + Clone;

    fn domain(&self) -> &BTreeSet<Self::Left>;
    fn codomain(&self) -> &BTreeSet<Self::Right>;

    /// Returns `true` if `x R y`.
    fn relates(&self, x: &Self::Left, y: &Self::Right) -> bool;

    /// Iterates over the pairs in lexicographic order.
    fn pairs(&self) -> Box<dyn Iterator<Item = (&Self::Left, &Self::Right)> + '_>;

    /// Injective: every `y` has at most one `x` with `x R y`.
    fn is_left_unique(&self) -> bool {
        let mut seen: BTreeMap<&Self::Right, &Self::Left> = BTreeMap::new();
        for (x, y) in self.pairs() {
            match seen.entry(y) {
                Entry::Vacant(entry) => {
                    entry.insert(x);
                }
                Entry::Occupied(entry) => {
                    if *entry.get() != x {
                        return false;
                    }
                }
            }
        }
        true
    }

    /// Functional: every `x` has at most one `y` with `x R y`.
    fn is_right_unique(&self) -> bool {
        let mut previous: Option<&Self::Left> = None;
        // Pairs come sorted by `x` first, so duplicates of `x` are adjacent.
        for (x, _) in self.pairs() {
            if previous == Some(x) {
                return false;
            }
            previous = Some(x);
        }
        true
    }

    fn is_one_to_one(&self) -> bool {
        self.is_left_unique() && self.is_right_unique()
    }

    /// Every element of the domain is related to something.
    fn is_left_total(&self) -> bool {
        let covered: BTreeSet<&Self::Left> = self.pairs().map(|(x, _)| x).collect();
        self.domain().iter().all(|x| covered.contains(x))
    }

    /// Surjective: every element of the codomain is reached.
    fn is_right_total(&self) -> bool {
        let covered: BTreeSet<&Self::Right> = self.pairs().map(|(_, y)| y).collect();
        self.codomain().iter().all(|y| covered.contains(y))
    }

    /// Left-total and right-total.
    fn is_correspondence(&self) -> bool {
        self.is_left_total() && self.is_right_total()
    }

    /// Left-total and right-unique.
    fn is_function(&self) -> bool {
        self.is_left_total() && self.is_right_unique()
    }

    /// One-to-one correspondence.
    fn is_bijection(&self) -> bool {
        self.is_one_to_one() && self.is_correspondence()
    }
}

/// A binary relation `R ⊆ A × B`.
#[derive(Clone, PartialEq, Eq)]
pub struct Relation<A, B> {
    pairs: BTreeSet<(A, B)>,
    domain: BTreeSet<A>,
    codomain: BTreeSet<B>,
    domain_side: Side,
    codomain_side: Side,
}

impl<A, B> Relation<A, B>
where
    A: Ord + Clone + Render,
    B: Ord + Clone + Render,
{
    /// The empty relation with both sides derived.
    pub fn new() -> Self {
        Self {
            pairs: BTreeSet::new(),
            domain: BTreeSet::new(),
            codomain: BTreeSet::new(),
            domain_side: Side::Derived,
            codomain_side: Side::Derived,
        }
    }

    /// The empty relation between a declared domain and codomain.
    pub fn with_domains(domain: BTreeSet<A>, codomain: BTreeSet<B>) -> Self {
        Self {
            pairs: BTreeSet::new(),
            domain,
            codomain,
            domain_side: Side::Declared,
            codomain_side: Side::Declared,
        }
    }

    /// A relation with both sides derived from `pairs`.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (A, B)>) -> Self {
        let pairs: BTreeSet<(A, B)> = pairs.into_iter().collect();
        let domain = pairs.iter().map(|(a, _)| a.clone()).collect();
        let codomain = pairs.iter().map(|(_, b)| b.clone()).collect();
        Self {
            pairs,
            domain,
            codomain,
            domain_side: Side::Derived,
            codomain_side: Side::Derived,
        }
    }

    /// Adds `(a, b)`. Returns `true` if the pair was not present.
    ///
    /// Derived sides grow to cover the pair. A declared side that does not
    /// contain `a` (resp. `b`) rejects the pair and leaves the relation unchanged.
    pub fn insert(&mut self, a: A, b: B) -> Result<bool> {
        if self.domain_side == Side::Declared && !self.domain.contains(&a) {
            return Err(violation("domain", &a));
        }
        if self.codomain_side == Side::Declared && !self.codomain.contains(&b) {
            return Err(violation("codomain", &b));
        }
        self.domain.insert(a.clone());
        self.codomain.insert(b.clone());
        Ok(self.pairs.insert((a, b)))
    }

    /// Removes `(a, b)`; derived sides shrink back to the minimal covering set.
    pub fn remove(&mut self, a: &A, b: &B) -> bool {
        let removed = self.pairs.remove(&(a.clone(), b.clone()));
        if removed {
            if self.domain_side == Side::Derived {
                self.regenerate_domain();
            }
            if self.codomain_side == Side::Derived {
                self.regenerate_codomain();
            }
        }
        removed
    }

    /// Declares the domain; it must cover the left side of every pair.
    pub fn set_domain(&mut self, domain: BTreeSet<A>) -> Result<()> {
        if let Some((a, _)) = self.pairs.iter().find(|(a, _)| !domain.contains(a)) {
            return Err(violation("domain", a));
        }
        self.domain = domain;
        self.domain_side = Side::Declared;
        Ok(())
    }

    /// Declares the codomain; it must cover the right side of every pair.
    pub fn set_codomain(&mut self, codomain: BTreeSet<B>) -> Result<()> {
        if let Some((_, b)) = self.pairs.iter().find(|(_, b)| !codomain.contains(b)) {
            return Err(violation("codomain", b));
        }
        self.codomain = codomain;
        self.codomain_side = Side::Declared;
        Ok(())
    }

    /// Replaces the domain by the left sides of the pairs and marks it derived.
    pub fn regenerate_domain(&mut self) {
        self.domain = self.pairs.iter().map(|(a, _)| a.clone()).collect();
        self.domain_side = Side::Derived;
    }

    /// Replaces the codomain by the right sides of the pairs and marks it derived.
    pub fn regenerate_codomain(&mut self) {
        self.codomain = self.pairs.iter().map(|(_, b)| b.clone()).collect();
        self.codomain_side = Side::Derived;
    }

    pub fn domain_side(&self) -> Side {
        self.domain_side
    }

    pub fn codomain_side(&self) -> Side {
        self.codomain_side
    }

    /// `R⁻¹ = {(b, a) : (a, b) ∈ R}`; domain and codomain swap along with their sides.
    pub fn converse(&self) -> Relation<B, A> {
        Relation {
            pairs: self.pairs.iter().map(|(a, b)| (b.clone(), a.clone())).collect(),
            domain: self.codomain.clone(),
            codomain: self.domain.clone(),
            domain_side: self.codomain_side,
            codomain_side: self.domain_side,
        }
    }

    /// `(Domain × Codomain) ∖ R`, over the same declared sides.
    pub fn complement(&self) -> Self {
        debug!("complement(|Dom| = {}, |Cod| = {})", self.domain.len(), self.codomain.len());
        let mut pairs = BTreeSet::new();
        for a in &self.domain {
            for b in &self.codomain {
                if !self.relates(a, b) {
                    pairs.insert((a.clone(), b.clone()));
                }
            }
        }
        Self {
            pairs,
            domain: self.domain.clone(),
            codomain: self.codomain.clone(),
            domain_side: Side::Declared,
            codomain_side: Side::Declared,
        }
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, a: &A, b: &B) -> bool {
        self.relates(a, b)
    }

    pub fn iter(&self) -> impl Iterator<Item = &(A, B)> {
        self.pairs.iter()
    }
}

impl<A, B> BinaryRelation for Relation<A, B>
where
    A: Ord + Clone,
    B: Ord + Clone,
{
    type Left = A;
    type Right = B;

    fn domain(&self) -> &BTreeSet<A> {
        &self.domain
    }

    fn codomain(&self) -> &BTreeSet<B> {
        &self.codomain
    }

    fn relates(&self, x: &A, y: &B) -> bool {
        self.pairs.contains(&(x.clone(), y.clone()))
    }

    fn pairs(&self) -> Box<dyn Iterator<Item = (&A, &B)> + '_> {
        Box::new(self.pairs.iter().map(|(a, b)| (a, b)))
    }
}

impl<A, B> Classify for Relation<A, B>
where
    A: Ord + Clone,
    B: Ord + Clone,
{
    fn check(&self, property: Property) -> Option<bool> {
        check_general(self, property)
    }
}

impl<A, B> Default for Relation<A, B>
where
    A: Ord + Clone + Render,
    B: Ord + Clone + Render,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A, B> FromIterator<(A, B)> for Relation<A, B>
where
    A: Ord + Clone + Render,
    B: Ord + Clone + Render,
{
    fn from_iter<T: IntoIterator<Item = (A, B)>>(iter: T) -> Self {
        Self::from_pairs(iter)
    }
}

impl<A: Render, B: Render> Render for Relation<A, B> {
    fn render(&self, format: Format, out: &mut dyn Write) -> fmt::Result {
        render_braced(self.pairs.iter(), format, out)
    }
}

impl<A: Render, B: Render> Display for Relation<A, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.render(Format::Generic, f)
    }
}

impl<A: Debug, B: Debug> Debug for Relation<A, B> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.pairs.iter()).finish()
    }
}

pub(crate) fn violation(side: &'static str, element: &impl Render) -> Error {
    Error::InvariantViolation {
        side,
        element: element.render_to_string(Format::Generic),
    }
}
