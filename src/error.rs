use miette::{Diagnostic, SourceSpan};
use thiserror::Error;

/// Records all errors reported by this library.
#[derive(Error, Diagnostic, Debug)]
#[non_exhaustive]
pub enum Error {
    /// Errors encountered while constructing or parsing a [`Version`](crate::Version).
    #[error(transparent)]
    #[diagnostic(transparent)]
    Version(#[from] VersionError),

    /// Errors encountered while constructing or parsing a constraint.
    #[error(transparent)]
    #[diagnostic(transparent)]
    Constraint(#[from] ConstraintError),

    /// `first` or `last` was requested from an empty [`Versions`](crate::Versions) collection.
    #[error("version collection is empty")]
    EmptyCollection,
}

/// Errors encountered when building or parsing a [`Version`](crate::Version).
#[derive(Error, Diagnostic, Debug)]
#[non_exhaustive]
pub enum VersionError {
    /// A numeric component is negative or does not fit in a version number.
    #[error("invalid {field} version number '{value}'")]
    InvalidVersionNumber {
        /// The component that failed: `major`, `minor`, or `patch`.
        field: &'static str,

        /// The rejected value, rendered as text.
        value: String,
    },

    /// A pre-release or build identifier is empty or contains characters outside `[0-9A-Za-z-]`.
    #[error("invalid identifier '{identifier}': identifiers must be non-empty and contain only [0-9A-Za-z-]")]
    InvalidIdentifier {
        /// The rejected identifier.
        identifier: String,
    },

    /// The input did not match the version grammar.
    #[error("input '{input}' is not a valid version string")]
    InvalidVersionString {
        /// The input originally provided.
        #[source_code]
        input: String,

        /// The location where the grammar stopped matching.
        #[label("unexpected input")]
        span: SourceSpan,
    },

    /// The version could not be represented by the `semver` crate.
    #[error("version '{version}' is not representable as `semver::Version`")]
    Semver {
        /// The rendered version.
        version: String,

        /// The error reported by `semver`.
        #[source]
        error: semver::Error,
    },
}

/// Errors encountered when building or parsing a constraint.
#[derive(Error, Diagnostic, Debug)]
#[non_exhaustive]
pub enum ConstraintError {
    /// The operator symbol is not one of `=`, `!=`, `>`, `>=`, `<`, `<=`.
    #[error("invalid constraint operator '{operator}'")]
    InvalidOperator {
        /// The rejected operator symbol.
        operator: String,
    },

    /// The composite operator is not `AND` or `OR`.
    #[error("invalid composite constraint operator '{operator}'")]
    InvalidCompositeOperator {
        /// The rejected operator.
        operator: String,
    },

    /// The constraint text was empty or only whitespace.
    #[error("constraint string is empty")]
    EmptyConstraintString,

    /// The constraint text did not match the constraint grammar.
    #[error("unparsable constraint string '{input}': {error}")]
    UnparsableConstraintString {
        /// The input originally provided.
        #[source_code]
        input: String,

        /// The fragment of the input that failed.
        #[label("here")]
        span: SourceSpan,

        /// Why the fragment was rejected.
        #[source]
        error: GrammarError,
    },
}

/// Describes which part of the constraint grammar rejected the input.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum GrammarError {
    /// The text before the version is not a supported operator.
    #[error("unsupported operator '{operator}'")]
    Operator {
        /// The operator text as written.
        operator: String,
    },

    /// An operator was not followed by a version.
    #[error("missing version after operator")]
    MissingVersion,

    /// The operand is not a valid version.
    #[error("invalid operand: {0}")]
    Version(#[from] VersionError),

    /// A `||` had no constraints on one of its sides.
    #[error("logical or requires constraints on both sides")]
    EmptyGroup,
}

/// Construct and return a new [`ConstraintError::UnparsableConstraintString`].
///
/// Provide the original input, the span of it that failed, and the reason.
///
/// ```ignore
/// error::unparsable!(input => (offset, len), GrammarError::MissingVersion);
/// ```
macro_rules! unparsable {
    ($input:expr => $span:expr, $error:expr) => {
        $crate::error::ConstraintError::UnparsableConstraintString {
            input: $input.to_string(),
            span: $span.into(),
            error: $error.into(),
        }
    };
}
pub(crate) use unparsable;

/// Shorthand for conversion into [`Error`] and returning.
macro_rules! fatal {
    ($err:expr) => {
        return Err($crate::error::Error::from($err))
    };
}
pub(crate) use fatal;
