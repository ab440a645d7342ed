use std::str::FromStr;

use enum_assoc::Assoc;
use strum::{EnumIter, EnumString};

use crate::{AnyConstraint, ConstraintError, Error, Matches, Version};

/// How a [`CompositeConstraint`] combines its children.
#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, strum::Display, EnumString, EnumIter, Assoc,
)]
#[strum(ascii_case_insensitive)]
#[func(const fn short_circuits_on(&self) -> bool)]
#[func(const fn separator(&self) -> &'static str)]
pub enum CompositeOperator {
    /// Every child must match.
    #[strum(serialize = "AND")]
    #[assoc(short_circuits_on = false)]
    #[assoc(separator = " ")]
    And,

    /// At least one child must match.
    #[strum(serialize = "OR")]
    #[assoc(short_circuits_on = true)]
    #[assoc(separator = " || ")]
    Or,
}

impl CompositeOperator {
    /// Look up an operator by name, ignoring ASCII case.
    ///
    /// Names other than `AND` and `OR` are reported as
    /// [`ConstraintError::InvalidCompositeOperator`].
    pub fn parse(name: &str) -> Result<Self, Error> {
        Self::from_str(name).map_err(|_| {
            Error::from(ConstraintError::InvalidCompositeOperator {
                operator: name.to_string(),
            })
        })
    }

    /// Combine the results of `constraints` against `version`,
    /// stopping at the first child that decides the outcome.
    pub fn evaluate<'a, M>(self, constraints: impl IntoIterator<Item = &'a M>, version: &Version) -> bool
    where
        M: Matches + 'a,
    {
        let decisive = self.short_circuits_on();
        for constraint in constraints {
            if constraint.matches_version(version) == decisive {
                return decisive;
            }
        }
        !decisive
    }
}

/// A logical `AND` or `OR` over an ordered, non-empty list of constraints.
///
/// Children may be single constraints or further composites, nested to any depth.
/// They are evaluated left to right, and evaluation stops as soon as the outcome is known:
/// `AND` stops at the first child that does not match, `OR` at the first child that does.
///
/// ```
/// # use semrange::{AnyConstraint, CompositeConstraint, Constraint, Matches, version};
/// let range = CompositeConstraint::and(
///     Constraint::greater_or_equal_to(version!(1, 0, 0)),
///     [AnyConstraint::from(Constraint::less_than(version!(1, 1, 0)))],
/// );
/// assert!(!range.matches_version(&version!(0, 8, 7)));
/// assert!(range.matches_version(&version!(1, 0, 0)));
/// assert!(!range.matches_version(&version!(1, 1, 0)));
/// assert_eq!(range.to_string(), ">=1.0.0 <1.1.0");
/// ```
///
/// ## Display
///
/// `AND` joins its children with a space and `OR` joins them with ` || `,
/// mirroring the constraint grammar.
/// The grammar has no grouping syntax, so only composites shaped like
/// the parser's output (an `OR` of `AND`s) render to text that parses back
/// to the same structure.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct CompositeConstraint {
    operator: CompositeOperator,
    constraints: Vec<AnyConstraint>,
}

impl CompositeConstraint {
    /// Combine `first` and the `rest` of the constraints with `operator`.
    pub fn new(
        operator: CompositeOperator,
        first: impl Into<AnyConstraint>,
        rest: impl IntoIterator<Item = AnyConstraint>,
    ) -> Self {
        let constraints = std::iter::once(first.into()).chain(rest).collect();
        Self {
            operator,
            constraints,
        }
    }

    /// Combine constraints with an operator named by `name`: `AND` or `OR`, ignoring ASCII case.
    ///
    /// ```
    /// # use semrange::{CompositeConstraint, CompositeOperator, Constraint, version};
    /// let composite = CompositeConstraint::with_symbol("or", Constraint::equal_to(version!(4, 7, 1)), [])
    ///     .expect("valid operator");
    /// assert_eq!(composite.operator(), CompositeOperator::Or);
    ///
    /// assert!(CompositeConstraint::with_symbol("XOR", Constraint::equal_to(version!(4, 7, 1)), []).is_err());
    /// ```
    pub fn with_symbol(
        name: &str,
        first: impl Into<AnyConstraint>,
        rest: impl IntoIterator<Item = AnyConstraint>,
    ) -> Result<Self, Error> {
        CompositeOperator::parse(name).map(|operator| Self::new(operator, first, rest))
    }

    /// Require every constraint to match.
    pub fn and(first: impl Into<AnyConstraint>, rest: impl IntoIterator<Item = AnyConstraint>) -> Self {
        Self::new(CompositeOperator::And, first, rest)
    }

    /// Require at least one constraint to match.
    pub fn or(first: impl Into<AnyConstraint>, rest: impl IntoIterator<Item = AnyConstraint>) -> Self {
        Self::new(CompositeOperator::Or, first, rest)
    }

    /// Combine a list of constraints, or `None` if the list is empty.
    pub(crate) fn from_vec(
        operator: CompositeOperator,
        constraints: Vec<AnyConstraint>,
    ) -> Option<Self> {
        if constraints.is_empty() {
            return None;
        }
        Some(Self {
            operator,
            constraints,
        })
    }

    /// How the children are combined.
    pub fn operator(&self) -> CompositeOperator {
        self.operator
    }

    /// The children, in evaluation order. Never empty.
    pub fn constraints(&self) -> &[AnyConstraint] {
        &self.constraints
    }

    /// Iterate over the children in evaluation order.
    pub fn iter(&self) -> impl Iterator<Item = &AnyConstraint> {
        self.constraints.iter()
    }
}

impl Matches for CompositeConstraint {
    fn matches_version(&self, version: &Version) -> bool {
        self.operator.evaluate(&self.constraints, version)
    }
}

impl std::fmt::Display for CompositeConstraint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut constraints = self.constraints.iter();
        if let Some(first) = constraints.next() {
            write!(f, "{first}")?;
        }
        for constraint in constraints {
            write!(f, "{}{constraint}", self.operator.separator())?;
        }
        Ok(())
    }
}

impl<'a> IntoIterator for &'a CompositeConstraint {
    type Item = &'a AnyConstraint;
    type IntoIter = std::slice::Iter<'a, AnyConstraint>;

    fn into_iter(self) -> Self::IntoIter {
        self.constraints.iter()
    }
}

impl AsRef<CompositeConstraint> for CompositeConstraint {
    fn as_ref(&self) -> &CompositeConstraint {
        self
    }
}

/// Construct a [`CompositeConstraint`] from one or more constraints.
///
/// ```
/// # use semrange::{CompositeConstraint, Constraint, Matches, constraint, version};
/// let options = semrange::composite!(Or =>
///     constraint!(Equal => version!(4, 7, 1)),
///     constraint!(Equal => version!(5, 0, 0)),
/// );
/// assert!(options.matches_version(&version!(4, 7, 1)));
/// assert!(!options.matches_version(&version!(1, 1, 0)));
/// ```
#[macro_export]
macro_rules! composite {
    ($operator:ident => $first:expr $(, $rest:expr)* $(,)?) => {
        $crate::CompositeConstraint::new(
            $crate::CompositeOperator::$operator,
            $first,
            ::std::vec::Vec::<$crate::AnyConstraint>::from([$($crate::AnyConstraint::from($rest)),*]),
        )
    };
}
