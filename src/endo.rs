//! Endo-relations: binary relations on a single universe.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt::{self, Debug, Display, Formatter, Write};

use log::debug;

use crate::cancel::{CancelToken, Outcome, Ticker, DEFAULT_CHECK_INTERVAL};
use crate::error::{Error, Result};
use crate::format::{render_braced, Format, Render};
use crate::property::{check_general, Classify, Property};
use crate::relation::{violation, BinaryRelation, Side};

/// A relation `R ⊆ U × U`.
///
/// The universe is derived from the pairs unless declared, in which case
/// every pair must have both components in it.
#[derive(Clone, PartialEq, Eq)]
pub struct EndoRelation<T> {
    pairs: BTreeSet<(T, T)>,
    universe: BTreeSet<T>,
    side: Side,
}

impl<T: Ord + Clone + Render> EndoRelation<T> {
    /// The empty relation with a derived universe.
    pub fn new() -> Self {
        Self {
            pairs: BTreeSet::new(),
            universe: BTreeSet::new(),
            side: Side::Derived,
        }
    }

    /// The empty relation on a declared universe.
    pub fn with_universe(universe: BTreeSet<T>) -> Self {
        Self {
            pairs: BTreeSet::new(),
            universe,
            side: Side::Declared,
        }
    }

    /// A relation with the universe derived from `pairs`.
    pub fn from_pairs(pairs: impl IntoIterator<Item = (T, T)>) -> Self {
        let mut relation = Self::new();
        relation.pairs = pairs.into_iter().collect();
        relation.regenerate_universe();
        relation
    }

    /// `S × S` on the universe `S`.
    pub fn cartesian_square(set: &BTreeSet<T>) -> Self {
        let mut relation = Self::with_universe(set.clone());
        for x in set {
            for y in set {
                relation.pairs.insert((x.clone(), y.clone()));
            }
        }
        relation
    }

    /// The identity `{(x, x) : x ∈ S}` on the universe `S`.
    pub fn identity(set: &BTreeSet<T>) -> Self {
        let mut relation = Self::with_universe(set.clone());
        relation.pairs = set.iter().map(|x| (x.clone(), x.clone())).collect();
        relation
    }

    /// Adds `(x, y)`. Returns `true` if the pair was not present.
    pub fn insert(&mut self, x: T, y: T) -> Result<bool> {
        if self.side == Side::Declared {
            if let Some(outside) = [&x, &y].into_iter().find(|e| !self.universe.contains(*e)) {
                return Err(violation("universe", outside));
            }
        }
        self.universe.insert(x.clone());
        self.universe.insert(y.clone());
        Ok(self.pairs.insert((x, y)))
    }

    /// Removes `(x, y)`; a derived universe shrinks back to the minimal covering set.
    pub fn remove(&mut self, x: &T, y: &T) -> bool {
        let removed = self.pairs.remove(&(x.clone(), y.clone()));
        if removed && self.side == Side::Derived {
            self.regenerate_universe();
        }
        removed
    }

    /// Declares the universe; it must cover both components of every pair.
    pub fn set_universe(&mut self, universe: BTreeSet<T>) -> Result<()> {
        let outside = self.pairs.iter().flat_map(|(x, y)| [x, y]).find(|e| !universe.contains(*e));
        if let Some(e) = outside {
            return Err(violation("universe", e));
        }
        self.universe = universe;
        self.side = Side::Declared;
        Ok(())
    }

    /// Replaces the universe by the components of the pairs and marks it derived.
    pub fn regenerate_universe(&mut self) {
        self.universe = self.pairs.iter().flat_map(|(x, y)| [x.clone(), y.clone()]).collect();
        self.side = Side::Derived;
    }

    pub fn universe(&self) -> &BTreeSet<T> {
        &self.universe
    }

    pub fn side(&self) -> Side {
        self.side
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn contains(&self, x: &T, y: &T) -> bool {
        self.pairs.contains(&(x.clone(), y.clone()))
    }

    pub fn iter(&self) -> impl Iterator<Item = &(T, T)> {
        self.pairs.iter()
    }

    /// `R⁻¹` on the same universe.
    pub fn converse(&self) -> Self {
        Self {
            pairs: self.pairs.iter().map(|(x, y)| (y.clone(), x.clone())).collect(),
            universe: self.universe.clone(),
            side: self.side,
        }
    }

    /// `(U × U) ∖ R` on the same universe, which becomes declared.
    pub fn complement(&self) -> Self {
        let mut relation = Self::with_universe(self.universe.clone());
        for x in &self.universe {
            for y in &self.universe {
                if !self.contains(x, y) {
                    relation.pairs.insert((x.clone(), y.clone()));
                }
            }
        }
        relation
    }

    /// `xRx` for every `x ∈ U`.
    pub fn is_reflexive(&self) -> bool {
        self.universe.iter().all(|x| self.contains(x, x))
    }

    /// `xRx` for no `x`.
    pub fn is_irreflexive(&self) -> bool {
        self.pairs.iter().all(|(x, y)| x != y)
    }

    /// `xRy ⇒ x = y`.
    pub fn is_coreflexive(&self) -> bool {
        self.pairs.iter().all(|(x, y)| x == y)
    }

    /// `xRy ⇒ yRx`.
    pub fn is_symmetric(&self) -> bool {
        self.pairs.iter().all(|(x, y)| self.contains(y, x))
    }

    /// `xRy ∧ yRx ⇒ x = y`.
    pub fn is_antisymmetric(&self) -> bool {
        self.pairs.iter().all(|(x, y)| x == y || !self.contains(y, x))
    }

    /// `xRy ⇒ ¬yRx`; in particular irreflexive.
    pub fn is_asymmetric(&self) -> bool {
        self.pairs.iter().all(|(x, y)| !self.contains(y, x))
    }

    /// `xRy ∧ yRz ⇒ xRz`.
    pub fn is_transitive(&self) -> bool {
        let successors = self.successors();
        self.pairs.iter().all(|(x, y)| {
            successors.get(y).map_or(true, |zs| zs.iter().all(|z| self.contains(x, z)))
        })
    }

    /// Connex: `xRy ∨ yRx` for all `x, y ∈ U` (hence reflexive).
    pub fn is_total(&self) -> bool {
        self.all_pairs_of_universe(|x, y| self.contains(x, y) || self.contains(y, x))
    }

    /// Exactly one of `xRy`, `yRx`, `x = y` holds for all `x, y ∈ U`.
    pub fn is_trichotomous(&self) -> bool {
        self.all_pairs_of_universe(|x, y| {
            let holding = [self.contains(x, y), self.contains(y, x), x == y];
            holding.iter().filter(|&&h| h).count() == 1
        })
    }

    /// `xRy ∧ xRz ⇒ yRz`.
    pub fn is_right_euclidean(&self) -> bool {
        self.successors()
            .values()
            .all(|images| images.iter().all(|y| images.iter().all(|z| self.contains(y, z))))
    }

    /// `yRx ∧ zRx ⇒ yRz`.
    pub fn is_left_euclidean(&self) -> bool {
        self.predecessors()
            .values()
            .all(|preimages| preimages.iter().all(|y| preimages.iter().all(|z| self.contains(y, z))))
    }

    /// Every `x ∈ U` has some `y` with `xRy`.
    pub fn is_serial(&self) -> bool {
        self.is_left_total()
    }

    /// Every non-empty `S ⊆ U` has an element without an incoming edge from `S`.
    pub fn is_well_founded(&self) -> bool {
        self.is_well_founded_with(&CancelToken::never()).settled()
    }

    /// [`is_well_founded`][Self::is_well_founded], interruptible through `token`.
    ///
    /// Walks all `2^|U| - 1` non-empty subsets of the universe.
    pub fn is_well_founded_with(&self, token: &CancelToken) -> Outcome<bool> {
        let n = self.universe.len();
        debug!("is_well_founded(|U| = {}, |R| = {})", n, self.pairs.len());

        let position: BTreeMap<&T, usize> = self.universe.iter().enumerate().map(|(i, x)| (x, i)).collect();
        let mut edge = vec![vec![false; n]; n];
        for (x, y) in &self.pairs {
            edge[position[x]][position[y]] = true;
        }

        let mut ticker = Ticker::new(token, DEFAULT_CHECK_INTERVAL);
        let mut included = vec![false; n];
        let mut members: Vec<usize> = Vec::with_capacity(n);
        while advance(&mut included) {
            if ticker.tick() {
                return Outcome::Cancelled;
            }
            members.clear();
            members.extend((0..n).filter(|&i| included[i]));
            let has_minimal = members.iter().any(|&s| members.iter().all(|&x| !edge[x][s]));
            if !has_minimal {
                return Outcome::Decided(false);
            }
        }
        Outcome::Decided(true)
    }

    /// Reflexive, symmetric and transitive.
    pub fn is_equivalence(&self) -> bool {
        self.is_reflexive() && self.is_symmetric() && self.is_transitive()
    }

    /// Reflexive and transitive.
    pub fn is_preorder(&self) -> bool {
        self.is_reflexive() && self.is_transitive()
    }

    /// Reflexive, antisymmetric and transitive.
    pub fn is_partial_order(&self) -> bool {
        self.is_preorder() && self.is_antisymmetric()
    }

    /// Irreflexive and transitive (hence asymmetric).
    pub fn is_strict_partial_order(&self) -> bool {
        self.is_irreflexive() && self.is_transitive()
    }

    /// A total partial order.
    pub fn is_total_order(&self) -> bool {
        self.is_partial_order() && self.is_total()
    }

    /// No `y ∈ U` with `yRx`.
    pub fn is_minimal_element(&self, x: &T) -> Result<bool> {
        self.require_member(x)?;
        Ok(!self.pairs.iter().any(|(_, b)| b == x))
    }

    /// No `y ∈ U` with `xRy`.
    pub fn is_maximal_element(&self, x: &T) -> Result<bool> {
        self.require_member(x)?;
        Ok(!self.pairs.iter().any(|(a, _)| a == x))
    }

    fn require_member(&self, x: &T) -> Result<()> {
        if self.universe.contains(x) {
            Ok(())
        } else {
            Err(Error::NotInUniverse {
                element: x.render_to_string(Format::Generic),
            })
        }
    }

    fn successors(&self) -> BTreeMap<&T, Vec<&T>> {
        let mut map: BTreeMap<&T, Vec<&T>> = BTreeMap::new();
        for (x, y) in &self.pairs {
            map.entry(x).or_default().push(y);
        }
        map
    }

    fn predecessors(&self) -> BTreeMap<&T, Vec<&T>> {
        let mut map: BTreeMap<&T, Vec<&T>> = BTreeMap::new();
        for (x, y) in &self.pairs {
            map.entry(y).or_default().push(x);
        }
        map
    }

    fn all_pairs_of_universe(&self, holds: impl Fn(&T, &T) -> bool) -> bool {
        self.universe.iter().all(|x| self.universe.iter().all(|y| holds(x, y)))
    }
}

/// Binary increment of `bits` (least significant first); returns `false` after wrapping to all-zero.
fn advance(bits: &mut [bool]) -> bool {
    for bit in bits.iter_mut() {
        if *bit {
            *bit = false;
        } else {
            *bit = true;
            return true;
        }
    }
    false
}

impl<T: Ord + Clone> BinaryRelation for EndoRelation<T> {
    type Left = T;
    type Right = T;

    fn domain(&self) -> &BTreeSet<T> {
        &self.universe
    }

    fn codomain(&self) -> &BTreeSet<T> {
        &self.universe
    }

    fn relates(&self, x: &T, y: &T) -> bool {
        self.pairs.contains(&(x.clone(), y.clone()))
    }

    fn pairs(&self) -> Box<dyn Iterator<Item = (&T, &T)> + '_> {
        Box::new(self.pairs.iter().map(|(x, y)| (x, y)))
    }
}

impl<T: Ord + Clone + Render> Classify for EndoRelation<T> {
    fn check(&self, property: Property) -> Option<bool> {
        if let Some(holds) = check_general(self, property) {
            return Some(holds);
        }
        Some(match property {
            Property::Reflexive => self.is_reflexive(),
            Property::Irreflexive => self.is_irreflexive(),
            Property::Coreflexive => self.is_coreflexive(),
            Property::Symmetric => self.is_symmetric(),
            Property::Antisymmetric => self.is_antisymmetric(),
            Property::Asymmetric => self.is_asymmetric(),
            Property::Transitive => self.is_transitive(),
            Property::Total => self.is_total(),
            Property::Trichotomous => self.is_trichotomous(),
            Property::RightEuclidean => self.is_right_euclidean(),
            Property::LeftEuclidean => self.is_left_euclidean(),
            Property::Serial => self.is_serial(),
            Property::WellFounded => self.is_well_founded(),
            Property::Equivalence => self.is_equivalence(),
            Property::Preorder => self.is_preorder(),
            Property::PartialOrder => self.is_partial_order(),
            Property::StrictPartialOrder => self.is_strict_partial_order(),
            Property::TotalOrder => self.is_total_order(),
            _ => return None,
        })
    }
}

impl<T: Ord + Clone + Render> Default for EndoRelation<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Ord + Clone + Render> FromIterator<(T, T)> for EndoRelation<T> {
    fn from_iter<I: IntoIterator<Item = (T, T)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}

impl<T: Render> Render for EndoRelation<T> {
    fn render(&self, format: Format, out: &mut dyn Write) -> fmt::Result {
        render_braced(self.pairs.iter(), format, out)
    }
}

impl<T: Render> Display for EndoRelation<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        self.render(Format::Generic, f)
    }
}

impl<T: Debug> Debug for EndoRelation<T> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.pairs.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    use test_log::test;

    use crate::element::Atom;

    fn universe(items: &[u32]) -> BTreeSet<u32> {
        items.iter().copied().collect()
    }

    fn chain_with_loop() -> EndoRelation<u32> {
        EndoRelation::from_pairs([(1, 2), (2, 3), (3, 4), (4, 5), (5, 5)])
    }

    #[test]
    fn test_chain_with_loop() {
        let r = chain_with_loop();
        assert_eq!(r.universe(), &universe(&[1, 2, 3, 4, 5]));
        assert!(!r.is_reflexive());
        assert!(!r.is_transitive());
        assert!(r.is_function());
        assert!(!r.is_bijection());
        assert!(r.is_serial());
        assert!(!r.is_irreflexive());
        assert!(!r.is_well_founded());
        assert!(r.is_minimal_element(&1).unwrap());
        assert!(!r.is_minimal_element(&5).unwrap());
        assert!(!r.is_maximal_element(&5).unwrap());
        assert_eq!(r.is_minimal_element(&7), Err(Error::NotInUniverse { element: "7".to_string() }));
    }

    #[test]
    fn test_declared_universe() {
        let mut r = EndoRelation::with_universe(universe(&[1, 2]));
        assert!(r.insert(1, 2).unwrap());
        assert!(matches!(r.insert(2, 3), Err(Error::InvariantViolation { side: "universe", .. })));
        assert_eq!(r.len(), 1);

        let mut derived = EndoRelation::from_pairs([(1u32, 2u32), (2, 3)]);
        assert!(derived.set_universe(universe(&[1, 2])).is_err());
        derived.set_universe(universe(&[1, 2, 3, 4])).unwrap();
        assert_eq!(derived.side(), Side::Declared);
        assert!(!derived.is_serial());
        derived.regenerate_universe();
        assert_eq!(derived.universe(), &universe(&[1, 2, 3]));
        assert!(derived.remove(&2, &3));
        assert_eq!(derived.universe(), &universe(&[1, 2]));

        let empty = EndoRelation::<u32>::with_universe(BTreeSet::new());
        assert!(empty.is_empty());
        assert!(empty.is_reflexive());
        assert!(empty.is_well_founded());
    }

    #[test]
    fn test_orders() {
        let u = universe(&[1, 2, 3]);
        let less_eq: EndoRelation<u32> = u
            .iter()
            .flat_map(|&x| u.iter().filter(move |&&y| x <= y).map(move |&y| (x, y)))
            .collect();
        assert!(less_eq.is_partial_order());
        assert!(less_eq.is_total());
        assert!(less_eq.is_total_order());
        assert!(!less_eq.is_trichotomous());
        assert!(!less_eq.is_well_founded());

        let less: EndoRelation<u32> = less_eq.iter().filter(|(x, y)| x != y).cloned().collect();
        let mut less = less;
        less.set_universe(u.clone()).unwrap();
        assert!(less.is_strict_partial_order());
        assert!(less.is_asymmetric());
        assert!(less.is_trichotomous());
        assert!(!less.is_total());
        assert!(less.is_well_founded());
        assert!(less.is_minimal_element(&1).unwrap());
        assert!(less.is_maximal_element(&3).unwrap());
        assert!(!less.is_serial());
    }

    #[test]
    fn test_equivalence_and_euclidean() {
        let u = universe(&[1, 2, 3]);
        let mut parity = EndoRelation::identity(&u);
        parity.insert(1, 3).unwrap();
        parity.insert(3, 1).unwrap();
        assert!(parity.is_equivalence());
        assert!(parity.is_right_euclidean());
        assert!(parity.is_left_euclidean());
        assert!(!parity.is_antisymmetric());

        let identity = EndoRelation::identity(&u);
        assert!(identity.is_coreflexive());
        assert!(identity.is_bijection());
        assert!(identity.is_partial_order());
        assert!(identity.is_equivalence());

        // 1 → 2, 1 → 3 without 2 → 3
        let fan = EndoRelation::from_pairs([(1u32, 2u32), (1, 3)]);
        assert!(!fan.is_right_euclidean());
        assert!(!fan.is_left_euclidean());
        let join = EndoRelation::from_pairs([(2u32, 1u32), (3, 1)]);
        assert!(!join.is_left_euclidean());
        assert!(join.is_transitive());
    }

    #[test]
    fn test_square_complement_converse() {
        let u = universe(&[1, 2]);
        let square = EndoRelation::cartesian_square(&u);
        assert_eq!(square.len(), 4);
        assert!(square.is_equivalence());
        assert!(square.is_total());
        assert!(square.complement().is_empty());

        let r = EndoRelation::from_pairs([(1u32, 2u32)]);
        let complement = r.complement();
        assert_eq!(complement.to_string(), "{(1,1),(2,1),(2,2)}");
        assert_eq!(r.converse().to_string(), "{(2,1)}");
        assert_eq!(r.converse().converse(), r);
    }

    #[test]
    fn test_well_founded_cancelled() {
        // 2^20 subsets, far beyond one polling interval
        let r = EndoRelation::<u32>::with_universe((0..20).collect());
        let token = CancelToken::new();
        token.cancel();
        assert_eq!(r.is_well_founded_with(&token), Outcome::Cancelled);

        let atoms: BTreeSet<Atom> = [Atom::One, Atom::Two, Atom::Three].into_iter().collect();
        let identity = EndoRelation::identity(&atoms);
        assert!(!identity.is_well_founded());
        assert_eq!(
            EndoRelation::from_pairs([(Atom::One, Atom::Two), (Atom::Two, Atom::Three)])
                .is_well_founded_with(&CancelToken::never()),
            Outcome::Decided(true)
        );
    }

    #[test]
    fn test_classify() {
        let r = chain_with_loop();
        let properties = r.classify();
        assert!(properties.contains(&Property::Function));
        assert!(properties.contains(&Property::Serial));
        assert!(!properties.contains(&Property::Transitive));
        assert!(!properties.contains(&Property::WellFounded));
        assert_eq!(r.check(Property::Reflexive), Some(false));
        assert_eq!(r.display(Format::Numeric).to_string(), "{(1,2),(2,3),(3,4),(4,5),(5,5)}");
    }
}
