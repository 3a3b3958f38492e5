//! # finite-topology: Finite Sets, Relations and Topologies in Rust
//!
//! **`finite-topology`** is a small library for exact computations on finite structures:
//! sets over a fixed universe of at most 32 atoms, families of such sets, binary relations,
//! and an exhaustive enumerator of the topologies on `n` labelled points.
//!
//! ## What is a finite topology?
//!
//! A topology on a finite set `U` is a family of subsets of `U` that contains `∅` and `U`
//! and is closed under union and intersection.
//! The number of topologies grows very fast with `|U|`: 1, 1, 4, 29, 355, 6942, 209527, ...
//! Counting them by brute force is the classical stress test for the machinery in this crate.
//!
//! ## Key Features
//!
//! - **Bit-Mask Sets**: A [`FiniteSet`][crate::set::FiniteSet] is a single `u32`; union, intersection, difference and symmetric difference are one instruction.
//! - **Canonical Order**: Sets are ordered by cardinality and then by their members, so families and relations print canonically.
//! - **Relation Engine**: Uniqueness, totality, order-theoretic and Euclidean properties, well-foundedness, and classification by name.
//! - **Parallel Enumerator**: A forward-checking backtracking search over families, split across `rayon` workers and cancellable at any time.
//! - **Self-Checking**: Topology counts are compared against the known values for up to 10 points.
//!
//! ## Basic Usage
//!
//! ```rust
//! use finite_topology::element::Atom;
//! use finite_topology::set::FiniteSet;
//!
//! // 1. Build a universe
//! let u: FiniteSet<Atom> = [Atom::One, Atom::Two].into_iter().collect();
//!
//! // 2. Its power set is the discrete topology
//! let discrete = finite_topology::power_set(&u);
//! assert_eq!(discrete.cardinality(), 4);
//! assert!(finite_topology::topology_check(&discrete, &u).unwrap());
//!
//! // 3. Enumerate every topology on two points
//! let topologies = finite_topology::enumerate_union_closed_families(2).unwrap();
//! assert_eq!(topologies.count, num_bigint::BigUint::from(4u32));
//! assert_eq!(topologies.families.len(), 4);
//! ```
//!
//! ## Core Components
//!
//! - **[`set`]** and **[`family`]**: The set algebra, power sets and the closure predicates on families.
//! - **[`relation`]** and **[`endo`]**: General binary relations and relations on a single universe.
//! - **[`property`]**: Named properties and classification.
//! - **[`enumerate`]**: The family enumerator.
//! - **[`cancel`]**: Cooperative cancellation for the exponential searches.
//! - **[`format`]**: Textual rendering with a numeric, named or generic atom format.

use std::collections::BTreeSet;

pub mod cancel;
pub mod element;
pub mod endo;
pub mod enumerate;
pub mod error;
pub mod family;
pub mod format;
pub mod mask;
pub mod property;
pub mod relation;
pub mod set;

pub use crate::enumerate::{count_topologies, enumerate_union_closed_families};
pub use crate::error::{Error, Result};

use crate::element::Element;
use crate::family::Family;
use crate::property::{Classify, Property};
use crate::set::FiniteSet;

/// The family of all subsets of `set`.
pub fn power_set<E: Element>(set: &FiniteSet<E>) -> Family<E> {
    set.power_set()
}

/// Checks whether `family` is a topology on `universe`.
///
/// Fails with [`Error::MemberOutsideUniverse`] if a member is not a subset of `universe`.
pub fn topology_check<E: Element>(family: &Family<E>, universe: &FiniteSet<E>) -> Result<bool> {
    family.is_topological(universe)
}

/// Every property that holds for `relation`.
///
/// General relations only report the properties of [`Property::GENERAL`].
pub fn classify_relation<R: Classify + ?Sized>(relation: &R) -> BTreeSet<Property> {
    relation.classify()
}
