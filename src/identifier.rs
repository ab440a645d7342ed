use std::str::FromStr;

use compact_str::CompactString;
use derive_more::Display;
use duplicate::duplicate;
use lazy_regex::regex_is_match;

use crate::{Error, VersionError, error};

/// A single dot-separated component of a pre-release or build [`Label`].
///
/// Identifiers are non-empty and consist only of ASCII alphanumerics and hyphens.
/// Identifiers made up entirely of digits are "numeric";
/// this distinction only matters when ordering pre-releases.
#[derive(Clone, Eq, PartialEq, Hash, Display, Debug)]
#[display("{_0}")]
pub struct Identifier(CompactString);

impl Identifier {
    /// Validate and construct an identifier.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, Error> {
        let input = input.as_ref();
        if !regex_is_match!(r"^[0-9A-Za-z-]+$", input) {
            error::fatal!(VersionError::InvalidIdentifier {
                identifier: input.to_string(),
            })
        }
        Ok(Self(CompactString::from(input)))
    }

    /// Construct from text the version grammar already matched.
    pub(crate) fn new_unchecked(input: &str) -> Self {
        Self(CompactString::from(input))
    }

    /// View the identifier as a string.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Report whether the identifier consists only of ASCII digits.
    pub fn is_numeric(&self) -> bool {
        self.0.bytes().all(|b| b.is_ascii_digit())
    }
}

impl FromStr for Identifier {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for Identifier {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// An ordered, non-empty sequence of [`Identifier`]s.
///
/// This is the shape of both the pre-release (`1.0.0-alpha.1`) and
/// build metadata (`1.0.0+build.5`) sections of a version.
/// A version without one of these sections holds `None` rather than an empty label.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct Label(Vec<Identifier>);

impl Label {
    /// Validate and construct a label from individual identifiers.
    ///
    /// ```
    /// # use semrange::Label;
    /// let label = Label::new(["alpha", "1"]).expect("valid identifiers");
    /// assert_eq!(label.to_string(), "alpha.1");
    ///
    /// assert!(Label::new(["alpha", ""]).is_err());
    /// ```
    pub fn new<I, S>(identifiers: I) -> Result<Self, Error>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let identifiers = identifiers
            .into_iter()
            .map(Identifier::parse)
            .collect::<Result<Vec<_>, _>>()?;

        if identifiers.is_empty() {
            error::fatal!(VersionError::InvalidIdentifier {
                identifier: String::new(),
            })
        }
        Ok(Self(identifiers))
    }

    /// Parse a dot-separated label, like `alpha.1`.
    pub fn parse(input: impl AsRef<str>) -> Result<Self, Error> {
        Self::new(input.as_ref().split('.'))
    }

    /// Construct from text the version grammar already matched.
    pub(crate) fn new_unchecked(input: &str) -> Self {
        Self(input.split('.').map(Identifier::new_unchecked).collect())
    }

    /// The identifiers in the label, in order.
    pub fn identifiers(&self) -> &[Identifier] {
        &self.0
    }

    /// Iterate over the identifiers in the label.
    pub fn iter(&self) -> impl Iterator<Item = &Identifier> {
        self.0.iter()
    }
}

impl std::fmt::Display for Label {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut identifiers = self.0.iter();
        if let Some(first) = identifiers.next() {
            write!(f, "{first}")?;
        }
        for identifier in identifiers {
            write!(f, ".{identifier}")?;
        }
        Ok(())
    }
}

impl From<Identifier> for Label {
    fn from(identifier: Identifier) -> Self {
        Self(vec![identifier])
    }
}

impl<'a> IntoIterator for &'a Label {
    type Item = &'a Identifier;
    type IntoIter = std::slice::Iter<'a, Identifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl FromStr for Label {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

duplicate! {
    [
        ty;
        [ &str ];
        [ &String ];
        [ String ];
    ]
    impl TryFrom<ty> for Label {
        type Error = Error;

        fn try_from(s: ty) -> Result<Self, Self::Error> {
            Self::parse(s)
        }
    }
}
