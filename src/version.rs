use std::{borrow::Cow, cmp::Ordering, fmt::Display, str::FromStr};

use bon::bon;
use derivative::Derivative;
use documented::Documented;
use duplicate::duplicate;
use getset::CopyGetters;
use nom::{
    Finish, IResult, Parser,
    bytes::complete::take_while1,
    character::complete::char,
    combinator::{eof, opt, recognize},
    multi::separated_list1,
    sequence::{preceded, terminated},
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::{
    PartialSchema, ToSchema,
    openapi::{ObjectBuilder, Type},
};

use crate::{Error, Label, VersionError, precedence};

/// A semantic version: `MAJOR.MINOR.PATCH[-PRE_RELEASE][+BUILD]`.
///
/// ## Parsing
///
/// The grammar is strict and anchored to the whole input:
/// ```ignore
/// core       = NUM "." NUM "." NUM
/// NUM        = "0" | [1-9][0-9]*
/// version    = core ["-" prerelease] ["+" build]
/// prerelease = ident ("." ident)*
/// build      = ident ("." ident)*
/// ident      = [0-9A-Za-z-]+
/// ```
///
/// Parsed versions render back to exactly the text they were parsed from.
///
/// Version numbers are stored as `u64`, the same limit the `semver` crate uses.
/// A number the grammar accepts but which does not fit, such as `18446744073709551616.0.0`,
/// is rejected with [`VersionError::InvalidVersionNumber`].
///
/// ## Ordering
///
/// Versions order by precedence as defined by Semantic Versioning 2.0.0;
/// see [`precedence::compare`](crate::precedence::compare) for details.
/// Build metadata does not participate in ordering, equality, or hashing:
/// `1.0.0+a` and `1.0.0+b` are equal.
///
/// ## Immutability
///
/// A `Version` is never modified after construction.
/// Methods like [`Version::increment_minor`] and [`Version::with_build`] return new values.
#[derive(Clone, Debug, Derivative, CopyGetters, Documented)]
#[derivative(PartialEq, Hash)]
pub struct Version {
    /// The major version number.
    #[getset(get_copy = "pub")]
    major: u64,

    /// The minor version number.
    #[getset(get_copy = "pub")]
    minor: u64,

    /// The patch version number.
    #[getset(get_copy = "pub")]
    patch: u64,

    pre_release: Option<Label>,

    #[derivative(PartialEq = "ignore", Hash = "ignore")]
    build: Option<Label>,
}

impl Eq for Version {}

#[bon]
impl Version {
    /// Build a version from its parts, validating any pre-release or build labels.
    ///
    /// ```
    /// # use semrange::Version;
    /// let version = Version::builder()
    ///     .major(1)
    ///     .minor(2)
    ///     .pre_release("rc.1")
    ///     .build()
    ///     .expect("valid version");
    /// assert_eq!(version.to_string(), "1.2.0-rc.1");
    /// ```
    #[builder]
    pub fn new(
        /// The major version number.
        major: u64,
        /// The minor version number.
        #[builder(default)]
        minor: u64,
        /// The patch version number.
        #[builder(default)]
        patch: u64,
        /// The dot-separated pre-release label, like `alpha.1`.
        #[builder(into)]
        pre_release: Option<String>,
        /// The dot-separated build metadata, like `build.5`.
        #[builder(into)]
        build_metadata: Option<String>,
    ) -> Result<Self, Error> {
        Ok(Self {
            major,
            minor,
            patch,
            pre_release: pre_release.map(Label::parse).transpose()?,
            build: build_metadata.map(Label::parse).transpose()?,
        })
    }
}

impl Version {
    /// Create a normal release version with no pre-release or build metadata.
    pub const fn new_release(major: u64, minor: u64, patch: u64) -> Self {
        Self {
            major,
            minor,
            patch,
            pre_release: None,
            build: None,
        }
    }

    /// Construct a version from explicit parts.
    ///
    /// The numeric parts accept any integer type; negative values (or values too large
    /// to be a version number) are reported as [`VersionError::InvalidVersionNumber`].
    /// Labels are dot-separated identifier lists; invalid identifiers are reported as
    /// [`VersionError::InvalidIdentifier`].
    ///
    /// ```
    /// # use semrange::{Error, Version, VersionError};
    /// let version = Version::from_parts(1, 0, 0, Some("beta.2"), None).expect("valid parts");
    /// assert_eq!(version.to_string(), "1.0.0-beta.2");
    ///
    /// let negative = Version::from_parts(-1, 0, 0, None, None);
    /// assert!(matches!(negative, Err(Error::Version(VersionError::InvalidVersionNumber { .. }))));
    /// ```
    pub fn from_parts<M, N, P>(
        major: M,
        minor: N,
        patch: P,
        pre_release: Option<&str>,
        build: Option<&str>,
    ) -> Result<Self, Error>
    where
        M: TryInto<u64> + Display + Copy,
        N: TryInto<u64> + Display + Copy,
        P: TryInto<u64> + Display + Copy,
    {
        Ok(Self {
            major: number("major", major)?,
            minor: number("minor", minor)?,
            patch: number("patch", patch)?,
            pre_release: pre_release.map(Label::parse).transpose()?,
            build: build.map(Label::parse).transpose()?,
        })
    }

    /// Parse a version from its canonical string form.
    /// For details, see the parsing section on [`Version`].
    pub fn parse(input: impl AsRef<str>) -> Result<Self, Error> {
        parse_version(input.as_ref()).map_err(Error::from)
    }

    /// The pre-release label, if this is a pre-release version.
    pub fn pre_release(&self) -> Option<&Label> {
        self.pre_release.as_ref()
    }

    /// The build metadata, if any.
    pub fn build(&self) -> Option<&Label> {
        self.build.as_ref()
    }

    /// Report whether the version has a pre-release label.
    pub fn is_pre_release(&self) -> bool {
        self.pre_release.is_some()
    }

    /// Report whether this is a major release, like `2.0.0`.
    pub fn is_major_release(&self) -> bool {
        self.major > 0 && self.minor == 0 && self.patch == 0
    }

    /// Report whether this is a minor release, like `2.1.0`.
    pub fn is_minor_release(&self) -> bool {
        self.minor > 0 && self.patch == 0
    }

    /// Report whether this is a patch release, like `2.1.3`.
    pub fn is_patch_release(&self) -> bool {
        self.patch > 0
    }

    /// Report whether `self` has the same precedence as `other`.
    pub fn is_equal_to(&self, other: &Version) -> bool {
        precedence::compare(self, other) == Ordering::Equal
    }

    /// Report whether `self` has different precedence than `other`.
    pub fn is_not_equal_to(&self, other: &Version) -> bool {
        !self.is_equal_to(other)
    }

    /// Report whether `self` has higher precedence than `other`.
    pub fn is_greater_than(&self, other: &Version) -> bool {
        precedence::compare(self, other) == Ordering::Greater
    }

    /// Report whether `self` has higher or equal precedence than `other`.
    pub fn is_greater_or_equal_to(&self, other: &Version) -> bool {
        precedence::compare(self, other) != Ordering::Less
    }

    /// Report whether `self` has lower precedence than `other`.
    pub fn is_less_than(&self, other: &Version) -> bool {
        precedence::compare(self, other) == Ordering::Less
    }

    /// Report whether `self` has lower or equal precedence than `other`.
    pub fn is_less_or_equal_to(&self, other: &Version) -> bool {
        precedence::compare(self, other) != Ordering::Greater
    }

    /// Produce the next major version: `(major + 1).0.0`.
    ///
    /// The current pre-release and build metadata are discarded;
    /// the provided labels (if any) are used instead.
    pub fn increment_major(
        &self,
        pre_release: Option<Label>,
        build: Option<Label>,
    ) -> Result<Self, Error> {
        Ok(Self {
            major: increment("major", self.major)?,
            minor: 0,
            patch: 0,
            pre_release,
            build,
        })
    }

    /// Produce the next minor version: `major.(minor + 1).0`.
    ///
    /// The current pre-release and build metadata are discarded;
    /// the provided labels (if any) are used instead.
    ///
    /// ```
    /// # use semrange::Version;
    /// let version = Version::parse("2.0.0-beta+111").expect("valid version");
    /// let next = version.increment_minor(None, None).expect("no overflow");
    /// assert_eq!(next.to_string(), "2.1.0");
    /// ```
    pub fn increment_minor(
        &self,
        pre_release: Option<Label>,
        build: Option<Label>,
    ) -> Result<Self, Error> {
        Ok(Self {
            major: self.major,
            minor: increment("minor", self.minor)?,
            patch: 0,
            pre_release,
            build,
        })
    }

    /// Produce the next patch version: `major.minor.(patch + 1)`.
    ///
    /// The current pre-release and build metadata are discarded;
    /// the provided labels (if any) are used instead.
    pub fn increment_patch(
        &self,
        pre_release: Option<Label>,
        build: Option<Label>,
    ) -> Result<Self, Error> {
        Ok(Self {
            major: self.major,
            minor: self.minor,
            patch: increment("patch", self.patch)?,
            pre_release,
            build,
        })
    }

    /// Replace the pre-release label.
    ///
    /// Build metadata belongs to a specific release, so it is always cleared.
    pub fn with_pre_release(&self, pre_release: Option<Label>) -> Self {
        Self {
            major: self.major,
            minor: self.minor,
            patch: self.patch,
            pre_release,
            build: None,
        }
    }

    /// Replace the build metadata, keeping the pre-release label.
    pub fn with_build(&self, build: Option<Label>) -> Self {
        Self {
            build,
            ..self.clone()
        }
    }
}

/// `nom` parser for the version grammar.
/// Reports the bare [`VersionError`] so that constraint parsing can wrap it.
#[tracing::instrument(level = "trace")]
pub(crate) fn parse_version(input: &str) -> Result<Version, VersionError> {
    /// Parse a version number: `0`, or digits without a leading zero.
    ///
    /// A leading zero is taken alone, so the digits after it fail at the next separator.
    fn numeric(s: &str) -> IResult<&str, &str> {
        let (rest, digits) = take_while1(|c: char| c.is_ascii_digit()).parse(s)?;
        if digits.len() > 1 && digits.starts_with('0') {
            let (zero, rest) = s.split_at(1);
            return Ok((rest, zero));
        }
        Ok((rest, digits))
    }

    /// Parse a dot-separated list of identifiers.
    fn label(s: &str) -> IResult<&str, &str> {
        let identifier = take_while1(|c: char| c.is_ascii_alphanumeric() || c == '-');
        recognize(separated_list1(char('.'), identifier)).parse(s)
    }

    type Fields<'a> = (&'a str, &'a str, &'a str, Option<&'a str>, Option<&'a str>);

    /// Parse the version fields, requiring the whole input to match.
    fn parse_fields(s: &str) -> IResult<&str, Fields<'_>> {
        let (s, major) = terminated(numeric, char('.')).parse(s)?;
        let (s, minor) = terminated(numeric, char('.')).parse(s)?;
        let (s, patch) = numeric.parse(s)?;
        let (s, pre_release) = opt(preceded(char('-'), label)).parse(s)?;
        let (s, build) = opt(preceded(char('+'), label)).parse(s)?;
        let (s, _) = eof.parse(s)?;
        Ok((s, (major, minor, patch, pre_release, build)))
    }

    match parse_fields.parse_complete(input).finish() {
        Ok((_, (major, minor, patch, pre_release, build))) => Ok(Version {
            major: parse_number("major", major)?,
            minor: parse_number("minor", minor)?,
            patch: parse_number("patch", patch)?,
            pre_release: pre_release.map(Label::new_unchecked),
            build: build.map(Label::new_unchecked),
        }),
        Err(err) => {
            let offset = input.len() - err.input.len();
            tracing::debug!(input, offset, "rejected version string");
            Err(VersionError::InvalidVersionString {
                input: input.to_string(),
                span: (offset, err.input.len()).into(),
            })
        }
    }
}

/// Convert an integer of any type into a version number.
fn number<N>(field: &'static str, value: N) -> Result<u64, Error>
where
    N: TryInto<u64> + Display + Copy,
{
    value.try_into().map_err(|_| {
        Error::from(VersionError::InvalidVersionNumber {
            field,
            value: value.to_string(),
        })
    })
}

/// Convert digits matched by the version grammar into a version number.
fn parse_number(field: &'static str, digits: &str) -> Result<u64, VersionError> {
    digits.parse().map_err(|_| VersionError::InvalidVersionNumber {
        field,
        value: digits.to_string(),
    })
}

/// Add one to a version number.
fn increment(field: &'static str, value: u64) -> Result<u64, Error> {
    value.checked_add(1).ok_or_else(|| {
        Error::from(VersionError::InvalidVersionNumber {
            field,
            value: format!("{value} + 1"),
        })
    })
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if let Some(pre_release) = &self.pre_release {
            write!(f, "-{pre_release}")?;
        }
        if let Some(build) = &self.build {
            write!(f, "+{build}")?;
        }
        Ok(())
    }
}

impl FromStr for Version {
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
    impl TryFrom<ty> for Version {
        type Error = Error;

        fn try_from(s: ty) -> Result<Self, Self::Error> {
            Self::parse(s)
        }
    }
}

impl From<&Version> for Version {
    fn from(version: &Version) -> Self {
        version.clone()
    }
}

impl AsRef<Version> for Version {
    fn as_ref(&self) -> &Version {
        self
    }
}

impl From<semver::Version> for Version {
    fn from(value: semver::Version) -> Self {
        // `semver` validates identifiers with the same character set we do.
        Self {
            major: value.major,
            minor: value.minor,
            patch: value.patch,
            pre_release: (!value.pre.is_empty()).then(|| Label::new_unchecked(value.pre.as_str())),
            build: (!value.build.is_empty()).then(|| Label::new_unchecked(value.build.as_str())),
        }
    }
}

impl From<&semver::Version> for Version {
    fn from(value: &semver::Version) -> Self {
        Self::from(value.clone())
    }
}

impl TryFrom<&Version> for semver::Version {
    type Error = Error;

    fn try_from(version: &Version) -> Result<Self, Self::Error> {
        let rendered = version.to_string();
        semver::Version::parse(&rendered).map_err(|error| {
            Error::from(VersionError::Semver {
                version: rendered,
                error,
            })
        })
    }
}

impl Serialize for Version {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.to_string().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

impl PartialSchema for Version {
    fn schema() -> utoipa::openapi::RefOr<utoipa::openapi::schema::Schema> {
        ObjectBuilder::new()
            .description(Some(Self::DOCS))
            .examples([
                json!("1.0.0"),
                json!("1.0.0-alpha.1"),
                json!("1.0.0-rc.10+build.1234"),
            ])
            .min_length(Some(5))
            .schema_type(Type::String)
            .build()
            .into()
    }
}

impl ToSchema for Version {
    fn name() -> Cow<'static, str> {
        Cow::Borrowed("Version")
    }
}

/// Create a [`Version`] in a manner that is known to not fail at compile time.
///
/// ```
/// # use semrange::Version;
/// let version = semrange::version!(1, 2, 3);
/// assert_eq!(version, Version::new_release(1, 2, 3));
/// assert!(!version.is_pre_release());
/// ```
#[macro_export]
macro_rules! version {
    ($major:expr, $minor:expr, $patch:expr) => {
        $crate::Version::new_release($major, $minor, $patch)
    };

    // This is only meant for use in tests, so it's undocumented.
    // Panics if the provided value fails to parse.
    (parse => $value:expr) => {
        $crate::Version::parse($value).expect("parse version")
    };
}
