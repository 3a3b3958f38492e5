//! Named properties of relations and families.
//!
//! Properties have stable kebab-case names (`"left-unique"`,
//! `"well-founded"`, `"topological"`, ...) so that callers can ask for a
//! property by name and print the result of a classification.

use std::collections::BTreeSet;
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;

use crate::error::Error;
use crate::relation::BinaryRelation;

/// A property of a binary relation.
///
/// The first eight apply to every relation; the rest only to endo-relations.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Property {
    LeftUnique,
    RightUnique,
    OneToOne,
    LeftTotal,
    RightTotal,
    Correspondence,
    Function,
    Bijection,
    Reflexive,
    Irreflexive,
    Coreflexive,
    Symmetric,
    Antisymmetric,
    Asymmetric,
    Transitive,
    Total,
    Trichotomous,
    RightEuclidean,
    LeftEuclidean,
    Serial,
    WellFounded,
    Equivalence,
    Preorder,
    PartialOrder,
    StrictPartialOrder,
    TotalOrder,
}

impl Property {
    /// Properties defined for every binary relation.
    pub const GENERAL: [Property; 8] = [
        Property::LeftUnique,
        Property::RightUnique,
        Property::OneToOne,
        Property::LeftTotal,
        Property::RightTotal,
        Property::Correspondence,
        Property::Function,
        Property::Bijection,
    ];

    /// Properties defined only for endo-relations.
    pub const ENDO: [Property; 18] = [
        Property::Reflexive,
        Property::Irreflexive,
        Property::Coreflexive,
        Property::Symmetric,
        Property::Antisymmetric,
        Property::Asymmetric,
        Property::Transitive,
        Property::Total,
        Property::Trichotomous,
        Property::RightEuclidean,
        Property::LeftEuclidean,
        Property::Serial,
        Property::WellFounded,
        Property::Equivalence,
        Property::Preorder,
        Property::PartialOrder,
        Property::StrictPartialOrder,
        Property::TotalOrder,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Property::LeftUnique => "left-unique",
            Property::RightUnique => "right-unique",
            Property::OneToOne => "one-to-one",
            Property::LeftTotal => "left-total",
            Property::RightTotal => "right-total",
            Property::Correspondence => "correspondence",
            Property::Function => "function",
            Property::Bijection => "bijection",
            Property::Reflexive => "reflexive",
            Property::Irreflexive => "irreflexive",
            Property::Coreflexive => "coreflexive",
            Property::Symmetric => "symmetric",
            Property::Antisymmetric => "antisymmetric",
            Property::Asymmetric => "asymmetric",
            Property::Transitive => "transitive",
            Property::Total => "total",
            Property::Trichotomous => "trichotomous",
            Property::RightEuclidean => "right-euclidean",
            Property::LeftEuclidean => "left-euclidean",
            Property::Serial => "serial",
            Property::WellFounded => "well-founded",
            Property::Equivalence => "equivalence",
            Property::Preorder => "preorder",
            Property::PartialOrder => "partial-order",
            Property::StrictPartialOrder => "strict-partial-order",
            Property::TotalOrder => "total-order",
        }
    }

    /// Returns `true` for properties that are only defined for endo-relations.
    pub fn is_endo_only(self) -> bool {
        !Self::GENERAL.contains(&self)
    }

    fn all() -> impl Iterator<Item = Property> {
        Self::GENERAL.into_iter().chain(Self::ENDO)
    }
}

impl Display for Property {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Property {
    type Err = Error;

    /// Parses a property name; case and the choice of `-`, `_` or ` ` as separator do not matter.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::all()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| Error::UnknownProperty(s.to_string()))
    }
}

/// A property of a family of sets relative to a universe.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum FamilyProperty {
    ContainsEmpty,
    ProductComplete,
    SumComplete,
    DiffComplete,
    SymDiffComplete,
    UniverseOk,
    ComplementComplete,
    FinitelyAdditive,
    Topological,
    Indiscrete,
    Discrete,
}

impl FamilyProperty {
    pub const ALL: [FamilyProperty; 11] = [
        FamilyProperty::ContainsEmpty,
        FamilyProperty::ProductComplete,
        FamilyProperty::SumComplete,
        FamilyProperty::DiffComplete,
        FamilyProperty::SymDiffComplete,
        FamilyProperty::UniverseOk,
        FamilyProperty::ComplementComplete,
        FamilyProperty::FinitelyAdditive,
        FamilyProperty::Topological,
        FamilyProperty::Indiscrete,
        FamilyProperty::Discrete,
    ];

    pub fn name(self) -> &'static str {
        match self {
            FamilyProperty::ContainsEmpty => "contains-empty",
            FamilyProperty::ProductComplete => "product-complete",
            FamilyProperty::SumComplete => "sum-complete",
            FamilyProperty::DiffComplete => "diff-complete",
            FamilyProperty::SymDiffComplete => "sym-diff-complete",
            FamilyProperty::UniverseOk => "universe-ok",
            FamilyProperty::ComplementComplete => "complement-complete",
            FamilyProperty::FinitelyAdditive => "finitely-additive",
            FamilyProperty::Topological => "topological",
            FamilyProperty::Indiscrete => "indiscrete",
            FamilyProperty::Discrete => "discrete",
        }
    }
}

impl Display for FamilyProperty {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FamilyProperty {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize(s);
        Self::ALL
            .into_iter()
            .find(|p| p.name() == wanted)
            .ok_or_else(|| Error::UnknownProperty(s.to_string()))
    }
}

fn normalize(name: &str) -> String {
    name.trim()
        .chars()
        .map(|c| match c {
            '_' | ' ' => '-',
            c => c.to_ascii_lowercase(),
        })
        .collect()
}

/// Structures whose relational properties can be listed.
pub trait Classify {
    /// Checks a single property; `None` if it is not defined for this kind of relation.
    fn check(&self, property: Property) -> Option<bool>;

    /// Every defined property that holds.
    fn classify(&self) -> BTreeSet<Property> {
        Property::all().filter(|&p| self.check(p) == Some(true)).collect()
    }
}

/// Checks one of the [`Property::GENERAL`] properties on any relation.
pub(crate) fn check_general<R: BinaryRelation + ?Sized>(relation: &R, property: Property) -> Option<bool> {
    Some(match property {
        Property::LeftUnique => relation.is_left_unique(),
        Property::RightUnique => relation.is_right_unique(),
        Property::OneToOne => relation.is_one_to_one(),
        Property::LeftTotal => relation.is_left_total(),
        Property::RightTotal => relation.is_right_total(),
        Property::Correspondence => relation.is_correspondence(),
        Property::Function => relation.is_function(),
        Property::Bijection => relation.is_bijection(),
        _ => return None,
    })
}
