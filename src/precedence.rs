//! # Version Precedence
//!
//! Implements the total order over [`Version`] defined by Semantic Versioning 2.0.0.
//!
//! Precedence is decided by the first of these rules that distinguishes the two versions:
//!
//! 1. `major`, then `minor`, then `patch`, compared numerically.
//! 2. A normal release has higher precedence than any pre-release of the same core version:
//!    `1.0.0-alpha < 1.0.0`.
//! 3. Pre-release identifiers are compared pairwise from left to right:
//!    - Identifiers consisting only of digits are compared numerically.
//!    - Identifiers with letters or hyphens are compared lexically in ASCII order.
//!    - Numeric identifiers have lower precedence than alphanumeric identifiers.
//! 4. If every shared identifier is equal, the longer pre-release has higher precedence:
//!    `1.0.0-alpha < 1.0.0-alpha.1`.
//!
//! Build metadata never participates: `1.0.0+a` and `1.0.0+b` have the same precedence.
//!
//! ## Reference
//!
//! - https://semver.org/spec/v2.0.0.html#spec-item-11

use std::cmp::Ordering;

use crate::{Identifier, Label, Version};

/// Compare two versions by precedence.
///
/// ```
/// # use std::cmp::Ordering;
/// # use semrange::{Version, precedence};
/// let release = Version::parse("1.0.0").expect("valid version");
/// let alpha = Version::parse("1.0.0-alpha").expect("valid version");
/// assert_eq!(precedence::compare(&release, &alpha), Ordering::Greater);
/// ```
pub fn compare(a: &Version, b: &Version) -> Ordering {
    // Convenience macro for short circuiting pure numeric comparison.
    macro_rules! cmp_numeric {
        ($a:expr, $b:expr) => {
            if let ord @ (Ordering::Greater | Ordering::Less) = $a.cmp(&$b) {
                return ord;
            }
        };
    }

    cmp_numeric!(a.major(), b.major());
    cmp_numeric!(a.minor(), b.minor());
    cmp_numeric!(a.patch(), b.patch());

    match (a.pre_release(), b.pre_release()) {
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (None, None) => Ordering::Equal,
        (Some(a), Some(b)) => a.cmp(b),
    }
}

impl Ord for Version {
    fn cmp(&self, other: &Self) -> Ordering {
        compare(self, other)
    }
}

impl PartialOrd for Version {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Label {
    fn cmp(&self, other: &Self) -> Ordering {
        let mut a_identifiers = self.iter();
        let mut b_identifiers = other.iter();
        loop {
            // All preceding identifiers were equal by the time we get here,
            // so if one side runs out first it is a prefix of the other and sorts lower.
            let (a, b) = match (a_identifiers.next(), b_identifiers.next()) {
                (Some(a), Some(b)) => (a, b),
                (Some(_), None) => return Ordering::Greater,
                (None, Some(_)) => return Ordering::Less,
                (None, None) => return Ordering::Equal,
            };

            if let ord @ (Ordering::Greater | Ordering::Less) = a.cmp(b) {
                return ord;
            }
        }
    }
}

impl PartialOrd for Label {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Identifier {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.is_numeric(), other.is_numeric()) {
            (true, false) => Ordering::Less,
            (false, true) => Ordering::Greater,
            (false, false) => self.as_str().cmp(other.as_str()),
            // Identifiers like `01` and `1` are numerically equal;
            // fall back to their text so the order agrees with equality.
            (true, true) => cmp_digits(self.as_str(), other.as_str())
                .then_with(|| self.as_str().cmp(other.as_str())),
        }
    }
}

impl PartialOrd for Identifier {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Compare two strings of ASCII digits as integers of unbounded size.
fn cmp_digits(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}
