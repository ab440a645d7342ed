use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

use crate::{Error, Matches, Version};

/// Anything that may carry a [`Version`].
///
/// This lets constraints and [`Versions`] work with richer records
/// (a package, a release, a lockfile entry) without first extracting their versions.
pub trait Versioned {
    /// The version this value carries, if any.
    fn version(&self) -> Option<&Version>;
}

impl Versioned for Version {
    fn version(&self) -> Option<&Version> {
        Some(self)
    }
}

impl Versioned for Option<Version> {
    fn version(&self) -> Option<&Version> {
        self.as_ref()
    }
}

impl<T: Versioned + ?Sized> Versioned for &T {
    fn version(&self) -> Option<&Version> {
        (**self).version()
    }
}

impl<T: Versioned + ?Sized> Versioned for Box<T> {
    fn version(&self) -> Option<&Version> {
        (**self).version()
    }
}

/// The direction in which [`Versions::sort`] orders its items.
#[derive(
    Copy, Clone, Eq, PartialEq, Hash, Debug, Default, strum::Display, EnumString, EnumIter,
)]
#[strum(serialize_all = "snake_case")]
pub enum SortOrder {
    /// Lowest precedence first.
    #[default]
    Ascending,

    /// Highest precedence first.
    Descending,
}

/// An ordered collection of [`Versioned`] items.
///
/// ```
/// # use semrange::{Constraint, SortOrder, Versions, version};
/// let versions = Versions::from_iter([version!(1, 1, 0), version!(0, 8, 7), version!(1, 0, 0)]);
/// let matching = versions
///     .filter(&Constraint::greater_or_equal_to(version!(1, 0, 0)))
///     .sort(SortOrder::Descending);
/// assert_eq!(matching.first().expect("non-empty"), &version!(1, 1, 0));
/// assert_eq!(matching.last().expect("non-empty"), &version!(1, 0, 0));
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Versions<T = Version>(Vec<T>);

impl<T> Default for Versions<T> {
    fn default() -> Self {
        Self(Vec::new())
    }
}

impl<T: Versioned> Versions<T> {
    /// Collect items into a new collection, preserving their order.
    pub fn new(items: impl IntoIterator<Item = T>) -> Self {
        Self(items.into_iter().collect())
    }

    /// Sort items by the precedence of their versions.
    ///
    /// The sort is stable: items of equal precedence keep their relative order.
    /// Items without a version sort before all others in ascending order,
    /// and after all others in descending order.
    pub fn sort(mut self, order: SortOrder) -> Self {
        self.0.sort_by(|a, b| {
            let ord = a.version().cmp(&b.version());
            match order {
                SortOrder::Ascending => ord,
                SortOrder::Descending => ord.reverse(),
            }
        });
        self
    }

    /// Keep only the items that satisfy `constraint`, preserving their order.
    ///
    /// Items without a version never satisfy a constraint.
    pub fn filter<C: Matches>(self, constraint: &C) -> Self {
        Self(
            self.0
                .into_iter()
                .filter(|item| constraint.matches(item))
                .collect(),
        )
    }

    /// The first item, or [`Error::EmptyCollection`].
    pub fn first(&self) -> Result<&T, Error> {
        self.0.first().ok_or(Error::EmptyCollection)
    }

    /// The last item, or [`Error::EmptyCollection`].
    pub fn last(&self) -> Result<&T, Error> {
        self.0.last().ok_or(Error::EmptyCollection)
    }
}

impl<T> Versions<T> {
    /// Iterate over the items in order.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.0.iter()
    }

    /// The number of items.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Report whether the collection has no items.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unpack into the underlying items.
    pub fn into_inner(self) -> Vec<T> {
        self.0
    }
}

impl<T> FromIterator<T> for Versions<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<T> IntoIterator for Versions<T> {
    type Item = T;
    type IntoIter = std::vec::IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a, T> IntoIterator for &'a Versions<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<T> From<Vec<T>> for Versions<T> {
    fn from(items: Vec<T>) -> Self {
        Self(items)
    }
}
