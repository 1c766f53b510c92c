//! Ternary inclusion/exclusion sets.
//!
//! A [`SelectionSet`] is defined by two optional collections: `included`
//! (absent means "unbounded, everything is in") and `excluded` (absent
//! means "nothing is out"). An item is a member iff it passes both sides.
//! The default value, [`SelectionSet::all`], has neither collection and
//! matches everything.
//!
//! The four set operators combine the optional pairs component-wise. A
//! result side is absent only when **both** operand sides were absent;
//! otherwise an absent side participates as the empty set.

use std::borrow::Borrow;
use std::collections::HashSet;
use std::hash::Hash;
use std::ops::{BitAnd, BitOr, BitXor, Sub};

/// A set defined by optional `included` and `excluded` collections.
///
/// # Example
///
/// ```
/// use strata_registry::SelectionSet;
///
/// let admin_only: SelectionSet<String> =
///     SelectionSet::including(["admin".to_string()]);
/// assert!(admin_only.contains("admin"));
/// assert!(!admin_only.contains("blog"));
///
/// let everything = SelectionSet::<String>::all();
/// assert!(everything.contains("anything"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SelectionSet<T: Eq + Hash + Clone> {
    included: Option<HashSet<T>>,
    excluded: Option<HashSet<T>>,
}

impl<T: Eq + Hash + Clone> SelectionSet<T> {
    /// The unbounded selection: both collections absent, every item is a
    /// member.
    #[must_use]
    pub fn all() -> Self {
        Self {
            included: None,
            excluded: None,
        }
    }

    /// Creates a selection from explicit optional collections.
    #[must_use]
    pub fn new(included: Option<HashSet<T>>, excluded: Option<HashSet<T>>) -> Self {
        Self { included, excluded }
    }

    /// Creates a selection bounded to exactly the given items.
    #[must_use]
    pub fn including(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            included: Some(items.into_iter().collect()),
            excluded: None,
        }
    }

    /// Creates a selection of everything except the given items.
    #[must_use]
    pub fn excluding(items: impl IntoIterator<Item = T>) -> Self {
        Self {
            included: None,
            excluded: Some(items.into_iter().collect()),
        }
    }

    /// Adds `item` to the included side, materializing it if absent.
    ///
    /// On an unbounded selection this narrows membership down to `{item}`.
    #[must_use]
    pub fn with_included(mut self, item: T) -> Self {
        self.included.get_or_insert_with(HashSet::new).insert(item);
        self
    }

    /// Returns `true` if `item` is a member.
    #[must_use]
    pub fn contains<Q>(&self, item: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let admitted = self
            .included
            .as_ref()
            .map_or(true, |included| included.contains(item));
        let barred = self
            .excluded
            .as_ref()
            .is_some_and(|excluded| excluded.contains(item));

        admitted && !barred
    }

    /// Returns `true` if either collection is present.
    #[must_use]
    pub fn is_bounded(&self) -> bool {
        self.included.is_some() || self.excluded.is_some()
    }

    /// Returns the included collection, if bounded on that side.
    #[must_use]
    pub fn included(&self) -> Option<&HashSet<T>> {
        self.included.as_ref()
    }

    /// Returns the excluded collection, if bounded on that side.
    #[must_use]
    pub fn excluded(&self) -> Option<&HashSet<T>> {
        self.excluded.as_ref()
    }

    /// Combines one side of two selections; absent stays absent only when
    /// both inputs were absent.
    fn combine_side(
        lhs: Option<&HashSet<T>>,
        rhs: Option<&HashSet<T>>,
        op: impl Fn(&HashSet<T>, &HashSet<T>) -> HashSet<T>,
    ) -> Option<HashSet<T>> {
        if lhs.is_none() && rhs.is_none() {
            return None;
        }

        let empty = HashSet::new();
        Some(op(lhs.unwrap_or(&empty), rhs.unwrap_or(&empty)))
    }

    fn combine(
        &self,
        other: &Self,
        op: impl Fn(&HashSet<T>, &HashSet<T>) -> HashSet<T>,
    ) -> Self {
        Self {
            included: Self::combine_side(self.included(), other.included(), &op),
            excluded: Self::combine_side(self.excluded(), other.excluded(), &op),
        }
    }

    /// Component-wise union of both sides.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        self.combine(other, |a, b| a.union(b).cloned().collect())
    }

    /// Component-wise intersection of both sides.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        self.combine(other, |a, b| a.intersection(b).cloned().collect())
    }

    /// Component-wise difference of both sides.
    #[must_use]
    pub fn difference(&self, other: &Self) -> Self {
        self.combine(other, |a, b| a.difference(b).cloned().collect())
    }

    /// Component-wise symmetric difference of both sides.
    #[must_use]
    pub fn symmetric_difference(&self, other: &Self) -> Self {
        self.combine(other, |a, b| a.symmetric_difference(b).cloned().collect())
    }
}

impl<T: Eq + Hash + Clone> BitOr for SelectionSet<T> {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        self.union(&rhs)
    }
}

impl<T: Eq + Hash + Clone> BitAnd for SelectionSet<T> {
    type Output = Self;

    fn bitand(self, rhs: Self) -> Self {
        self.intersect(&rhs)
    }
}

impl<T: Eq + Hash + Clone> Sub for SelectionSet<T> {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        self.difference(&rhs)
    }
}

impl<T: Eq + Hash + Clone> BitXor for SelectionSet<T> {
    type Output = Self;

    fn bitxor(self, rhs: Self) -> Self {
        self.symmetric_difference(&rhs)
    }
}
