//! # Version Constraints
//!
//! A constraint is a predicate over [`Version`]s.
//! There are two shapes, unified by [`AnyConstraint`]:
//!
//! - [`Constraint`]: a single comparison, like `>=1.2.3`.
//! - [`CompositeConstraint`]: an `AND` or `OR` over other constraints,
//!   like `>=1.2.3 <2.0.0`.
//!
//! Both implement [`Matches`], so callers can evaluate either without caring which they hold.
//!
//! ## Grammar
//!
//! Constraint strings are parsed by [`ConstraintParser`]:
//!
//! - A unit is an optional operator followed by a version: `>=1.2.3`, `!=1.4.0`, `2.0.0`.
//!   A missing operator means `=`.
//! - Units separated by a single space must all match (`AND`).
//! - Groups of units separated by ` || ` are alternatives (`OR`), binding looser than `AND`.
//!
//! ```
//! # use semrange::{AnyConstraint, Matches, version};
//! let constraint: AnyConstraint = ">=1.0.0 <1.1.0 || >=1.2.0".parse().expect("valid constraint");
//! assert!(constraint.matches_version(&version!(1, 0, 5)));
//! assert!(!constraint.matches_version(&version!(1, 1, 0)));
//! assert!(constraint.matches_version(&version!(3, 0, 0)));
//! ```

use std::{borrow::Cow, str::FromStr};

use derive_more::{Display, From};
use derive_new::new;
use documented::Documented;
use duplicate::duplicate;
use getset::{CopyGetters, Getters};
use serde::{Deserialize, Serialize};
use serde_json::json;
use strum::{AsRefStr, EnumIter, EnumString};
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{ObjectBuilder, Type},
};

use crate::{ConstraintError, Error, Version, Versioned};

mod composite;
mod parser;

pub use composite::*;
pub use parser::*;

/// The comparison a [`Constraint`] performs against its operand.
#[derive(
    Copy,
    Clone,
    Eq,
    PartialEq,
    Ord,
    PartialOrd,
    Hash,
    Debug,
    strum::Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
pub enum Operator {
    /// Same precedence as the operand (`=`).
    #[strum(serialize = "=")]
    Equal,

    /// Different precedence than the operand (`!=`).
    #[strum(serialize = "!=")]
    NotEqual,

    /// Higher precedence than the operand (`>`).
    #[strum(serialize = ">")]
    Greater,

    /// Higher or equal precedence than the operand (`>=`).
    #[strum(serialize = ">=")]
    GreaterOrEqual,

    /// Lower precedence than the operand (`<`).
    #[strum(serialize = "<")]
    Less,

    /// Lower or equal precedence than the operand (`<=`).
    #[strum(serialize = "<=")]
    LessOrEqual,
}

impl Operator {
    /// Look up an operator by its symbol.
    ///
    /// ```
    /// # use semrange::Operator;
    /// assert_eq!(Operator::parse(">=").expect("valid operator"), Operator::GreaterOrEqual);
    /// assert!(Operator::parse("~>").is_err());
    /// ```
    pub fn parse(symbol: &str) -> Result<Self, Error> {
        Self::from_str(symbol).map_err(|_| {
            Error::from(ConstraintError::InvalidOperator {
                operator: symbol.to_string(),
            })
        })
    }

    /// Report whether `version` satisfies this operator against `operand`.
    pub fn evaluate(self, version: &Version, operand: &Version) -> bool {
        match self {
            Operator::Equal => version.is_equal_to(operand),
            Operator::NotEqual => version.is_not_equal_to(operand),
            Operator::Greater => version.is_greater_than(operand),
            Operator::GreaterOrEqual => version.is_greater_or_equal_to(operand),
            Operator::Less => version.is_less_than(operand),
            Operator::LessOrEqual => version.is_less_or_equal_to(operand),
        }
    }
}

/// Evaluates whether a version satisfies a constraint.
///
/// Implemented by both [`Constraint`] and [`CompositeConstraint`],
/// and by [`AnyConstraint`] which holds either.
/// Evaluating a constructed constraint never fails.
pub trait Matches {
    /// Report whether `version` satisfies the constraint.
    fn matches_version(&self, version: &Version) -> bool;

    /// Report whether the version carried by `target` satisfies the constraint.
    ///
    /// Targets that carry no version never match.
    fn matches<T: Versioned + ?Sized>(&self, target: &T) -> bool {
        target
            .version()
            .is_some_and(|version| self.matches_version(version))
    }
}

/// A single comparison against an operand version, like `>=1.2.3`.
///
/// ```
/// # use semrange::{Constraint, Matches, Operator, version};
/// let constraint = Constraint::new(Operator::Less, version!(2, 0, 0));
/// assert!(constraint.matches_version(&version!(1, 9, 9)));
/// assert!(!constraint.matches_version(&version!(2, 0, 0)));
/// assert_eq!(constraint.to_string(), "<2.0.0");
/// ```
#[derive(Clone, Eq, PartialEq, Hash, Debug, Display, CopyGetters, Getters, new)]
#[display("{operator}{version}")]
pub struct Constraint {
    /// The comparison to perform.
    #[getset(get_copy = "pub")]
    operator: Operator,

    /// The version compared against.
    #[getset(get = "pub")]
    #[new(into)]
    version: Version,
}

impl Constraint {
    /// Construct a constraint from an operator symbol, like `>=`.
    ///
    /// Symbols other than `=`, `!=`, `>`, `>=`, `<`, `<=`
    /// are reported as [`ConstraintError::InvalidOperator`].
    pub fn with_symbol(symbol: &str, version: impl Into<Version>) -> Result<Self, Error> {
        Operator::parse(symbol).map(|operator| Self::new(operator, version))
    }

    /// Match versions with the same precedence as `version`.
    pub fn equal_to(version: impl Into<Version>) -> Self {
        Self::new(Operator::Equal, version)
    }

    /// Match versions with different precedence than `version`.
    pub fn not_equal_to(version: impl Into<Version>) -> Self {
        Self::new(Operator::NotEqual, version)
    }

    /// Match versions with higher precedence than `version`.
    pub fn greater_than(version: impl Into<Version>) -> Self {
        Self::new(Operator::Greater, version)
    }

    /// Match versions with higher or equal precedence than `version`.
    pub fn greater_or_equal_to(version: impl Into<Version>) -> Self {
        Self::new(Operator::GreaterOrEqual, version)
    }

    /// Match versions with lower precedence than `version`.
    pub fn less_than(version: impl Into<Version>) -> Self {
        Self::new(Operator::Less, version)
    }

    /// Match versions with lower or equal precedence than `version`.
    pub fn less_or_equal_to(version: impl Into<Version>) -> Self {
        Self::new(Operator::LessOrEqual, version)
    }

    /// Parse a constraint string with the default [`ConstraintParser`].
    ///
    /// Depending on the input this may produce a single constraint or a composite;
    /// see the module documentation for the grammar.
    ///
    /// ```
    /// # use semrange::{AnyConstraint, Constraint, Operator, version};
    /// let parsed = Constraint::parse("1.2.0").expect("valid constraint");
    /// assert_eq!(parsed, AnyConstraint::from(Constraint::new(Operator::Equal, version!(1, 2, 0))));
    /// ```
    pub fn parse(input: &str) -> Result<AnyConstraint, Error> {
        ConstraintParser::default().parse(input)
    }
}

impl Matches for Constraint {
    fn matches_version(&self, version: &Version) -> bool {
        self.operator.evaluate(version, &self.version)
    }
}

impl From<&Constraint> for Constraint {
    fn from(c: &Constraint) -> Self {
        c.clone()
    }
}

impl AsRef<Constraint> for Constraint {
    fn as_ref(&self) -> &Constraint {
        self
    }
}

/// Either a single [`Constraint`] or a [`CompositeConstraint`].
///
/// This is what parsing a constraint string produces:
/// a string with a single unit becomes a bare constraint,
/// anything else becomes a composite.
///
/// Serializes as its canonical string form.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Display, From, Documented)]
pub enum AnyConstraint {
    /// A single comparison.
    Constraint(Constraint),

    /// A logical combination of constraints.
    Composite(CompositeConstraint),
}

impl AnyConstraint {
    /// The single comparison, if this is one.
    pub fn as_constraint(&self) -> Option<&Constraint> {
        match self {
            AnyConstraint::Constraint(constraint) => Some(constraint),
            AnyConstraint::Composite(_) => None,
        }
    }

    /// The composite, if this is one.
    pub fn as_composite(&self) -> Option<&CompositeConstraint> {
        match self {
            AnyConstraint::Constraint(_) => None,
            AnyConstraint::Composite(composite) => Some(composite),
        }
    }
}

impl Matches for AnyConstraint {
    fn matches_version(&self, version: &Version) -> bool {
        match self {
            AnyConstraint::Constraint(constraint) => constraint.matches_version(version),
            AnyConstraint::Composite(composite) => composite.matches_version(version),
        }
    }
}

impl From<&Constraint> for AnyConstraint {
    fn from(constraint: &Constraint) -> Self {
        constraint.clone().into()
    }
}

impl From<&CompositeConstraint> for AnyConstraint {
    fn from(composite: &CompositeConstraint) -> Self {
        composite.clone().into()
    }
}

impl FromStr for AnyConstraint {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ConstraintParser::default().parse(s)
    }
}

duplicate! {
    [
        ty;
        [ &str ];
        [ &String ];
        [ String ];
    ]
    impl TryFrom<ty> for AnyConstraint {
        type Error = Error;

        fn try_from(s: ty) -> Result<Self, Self::Error> {
            Self::from_str(&s)
        }
    }
}

impl Serialize for AnyConstraint {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for AnyConstraint {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::from_str(&raw).map_err(serde::de::Error::custom)
    }
}

impl PartialSchema for AnyConstraint {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ObjectBuilder::new()
            .description(Some(Self::DOCS))
            .examples([
                json!("1.2.0"),
                json!(">=1.2.3 <2.0.0"),
                json!(">=1.0.0 <1.1.0 || >=1.2.0"),
            ])
            .min_length(Some(5))
            .schema_type(Type::String)
            .build()
            .into()
    }
}

impl ToSchema for AnyConstraint {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("Constraint")
    }
}

/// Construct a [`Constraint`], guaranteed to be valid at compile time.
///
/// ```
/// # use semrange::{Constraint, Operator, version};
/// let constraint = semrange::constraint!(GreaterOrEqual => version!(1, 0, 0));
/// assert_eq!(constraint, Constraint::new(Operator::GreaterOrEqual, version!(1, 0, 0)));
/// ```
#[macro_export]
macro_rules! constraint {
    ($variant:ident => $($tail:tt)*) => {
        $crate::Constraint::new($crate::Operator::$variant, $($tail)*)
    };
}
