use miette::SourceSpan;

use crate::{
    AnyConstraint, CompositeConstraint, CompositeOperator, Constraint, ConstraintError, Error,
    GrammarError, Operator,
    error::{fatal, unparsable},
    version::parse_version,
};

/// Separates alternatives in a constraint string.
const OR: &str = "||";

/// Separates units in a constraint string.
const SEPARATOR: char = ' ';

/// Parses constraint strings into an [`AnyConstraint`].
///
/// The parser holds no state; construct it once and reuse it freely,
/// including across threads.
///
/// ## Grammar
///
/// ```ignore
/// expression = group (" || " group)*
/// group      = unit (" " unit)*
/// unit       = [operator] version
/// operator   = "=" | "!=" | ">" | ">=" | "<" | "<="
/// ```
///
/// The leading run of non-digit characters in a unit is its operator;
/// the rest is parsed as a [`Version`](crate::Version).
/// Units are separated by exactly one space.
///
/// ## Result shape
///
/// - Input without any space is a single unit, returned as [`AnyConstraint::Constraint`].
/// - Input without `||` is an `AND` of its units.
/// - Otherwise the input is an `OR` whose children are each an `AND` of units.
///
/// ```
/// # use semrange::{AnyConstraint, CompositeOperator, ConstraintParser};
/// let parser = ConstraintParser::new();
/// let parsed = parser.parse(">=1.0.0 <1.1.0 || >=1.2.0").expect("valid constraint");
/// let composite = parsed.as_composite().expect("composite");
/// assert_eq!(composite.operator(), CompositeOperator::Or);
/// assert_eq!(composite.constraints().len(), 2);
/// ```
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct ConstraintParser;

impl ConstraintParser {
    /// Create a parser.
    pub const fn new() -> Self {
        Self
    }

    /// Parse `input` as a constraint expression.
    ///
    /// Errors are [`ConstraintError::EmptyConstraintString`] for blank input,
    /// and [`ConstraintError::UnparsableConstraintString`] for anything else;
    /// the latter carries `input` and points at the fragment that failed.
    #[tracing::instrument(level = "debug", skip(self))]
    pub fn parse(&self, input: &str) -> Result<AnyConstraint, Error> {
        self.parse_expression(input)
            .inspect_err(|err| tracing::debug!(%err, "rejected constraint string"))
    }

    fn parse_expression(&self, input: &str) -> Result<AnyConstraint, Error> {
        let leading = input.len() - input.trim_start().len();
        let trimmed = Fragment::new(leading, input.trim());
        if trimmed.text.is_empty() {
            fatal!(ConstraintError::EmptyConstraintString);
        }

        if !trimmed.text.contains(SEPARATOR) {
            return self.parse_unit(input, trimmed).map(AnyConstraint::from);
        }

        let mut alternatives = Vec::new();
        let mut group = Vec::new();
        let mut last_or = None;
        for token in trimmed.split(SEPARATOR) {
            if token.text == OR {
                alternatives.push(close_group(input, token, &mut group)?);
                last_or = Some(token);
            } else {
                group.push(self.parse_unit(input, token)?.into());
            }
        }

        match last_or {
            None => close_group(input, trimmed, &mut group),
            Some(token) => {
                alternatives.push(close_group(input, token, &mut group)?);
                match CompositeConstraint::from_vec(CompositeOperator::Or, alternatives) {
                    Some(composite) => Ok(composite.into()),
                    None => fatal!(unparsable!(input => token.span(), GrammarError::EmptyGroup)),
                }
            }
        }
    }

    /// Parse a single `[operator]version` unit.
    fn parse_unit(&self, input: &str, unit: Fragment<'_>) -> Result<Constraint, Error> {
        let split = unit.text.find(|c: char| c.is_ascii_digit()).unwrap_or(unit.text.len());
        let (symbol, operand) = unit.split_at(split);

        if operand.text.is_empty() {
            fatal!(unparsable!(input => unit.span(), GrammarError::MissingVersion));
        }

        let operator = if symbol.text.is_empty() {
            Operator::Equal
        } else {
            match symbol.text.parse::<Operator>() {
                Ok(operator) => operator,
                Err(_) => fatal!(unparsable!(input => symbol.span(), GrammarError::Operator {
                    operator: symbol.text.to_string(),
                })),
            }
        };

        match parse_version(operand.text) {
            Ok(version) => Ok(Constraint::new(operator, version)),
            Err(err) => fatal!(unparsable!(input => operand.span(), err)),
        }
    }
}

/// A slice of the input along with its byte offset in the input.
#[derive(Copy, Clone, Debug)]
struct Fragment<'a> {
    offset: usize,
    text: &'a str,
}

impl<'a> Fragment<'a> {
    fn new(offset: usize, text: &'a str) -> Self {
        Self { offset, text }
    }

    fn span(&self) -> SourceSpan {
        (self.offset, self.text.len()).into()
    }

    /// Split at byte index `mid` of the fragment's text.
    fn split_at(&self, mid: usize) -> (Self, Self) {
        let (head, tail) = self.text.split_at(mid);
        (Self::new(self.offset, head), Self::new(self.offset + mid, tail))
    }

    /// Split on `separator`, keeping track of where each piece starts.
    fn split(self, separator: char) -> impl Iterator<Item = Fragment<'a>> {
        let mut offset = self.offset;
        self.text.split(separator).map(move |text| {
            let piece = Self::new(offset, text);
            offset += text.len() + separator.len_utf8();
            piece
        })
    }
}

/// Close the current group of units into an `AND`, leaving the group empty.
///
/// An empty group is reported at `at`, the `||` that closed it.
fn close_group(
    input: &str,
    at: Fragment<'_>,
    group: &mut Vec<AnyConstraint>,
) -> Result<AnyConstraint, Error> {
    match CompositeConstraint::from_vec(CompositeOperator::And, std::mem::take(group)) {
        Some(composite) => Ok(composite.into()),
        None => fatal!(unparsable!(input => at.span(), GrammarError::EmptyGroup)),
    }
}
