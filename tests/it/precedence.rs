use std::cmp::Ordering;

use itertools::Itertools;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use simple_test_case::test_case;

use semrange::*;

#[test_case("1.0.0", "1.0.0-alpha", Ordering::Greater; "release_beats_pre_release")]
#[test_case("1.0.0-alpha", "1.0.0-1", Ordering::Greater; "alphanumeric_beats_numeric")]
#[test_case("1.0.0-alpha.1", "1.0.0-alpha.beta", Ordering::Less; "numeric_before_alphanumeric")]
#[test_case("1.0.0-alpha.1", "1.0.0-alpha", Ordering::Greater; "longer_wins")]
#[test_case("1.0.0-beta.11", "1.0.0-beta.2", Ordering::Greater; "numeric_identifiers")]
#[test_case("2.0.0", "10.0.0", Ordering::Less; "numeric_major")]
#[test_case("1.10.0", "1.9.0", Ordering::Greater; "numeric_minor")]
#[test_case("1.2.10", "1.2.9", Ordering::Greater; "numeric_patch")]
#[test_case("0.0.10", "0.0.1", Ordering::Greater; "numeric_patch_after_zeros")]
#[test_case("1.0.0+build.1", "1.0.0+build.2", Ordering::Equal; "build_ignored")]
#[test_case("1.0.0-rc.1+a", "1.0.0-rc.1", Ordering::Equal; "build_ignored_with_pre_release")]
#[test]
fn compare(a: &str, b: &str, expected: Ordering) {
    let a = version!(parse => a);
    let b = version!(parse => b);
    pretty_assertions::assert_eq!(precedence::compare(&a, &b), expected, "compare {a} to {b}");
    pretty_assertions::assert_eq!(precedence::compare(&b, &a), expected.reverse(), "compare {b} to {a}");
    pretty_assertions::assert_eq!(a.cmp(&b), expected, "Ord for {a} and {b}");
}

#[test]
fn documented_sequence() {
    let expected = [
        "1.0.0-alpha",
        "1.0.0-alpha.1",
        "1.0.0-alpha.beta",
        "1.0.0-beta",
        "1.0.0-beta.2",
        "1.0.0-beta.11",
        "1.0.0-rc.1",
        "1.0.0",
    ];

    let sorted = expected
        .iter()
        .rev()
        .map(|v| version!(parse => v))
        .sorted()
        .map(|v| v.to_string())
        .collect_vec();
    assert_eq!(sorted, expected);
}

#[test]
fn equal_precedence_is_equal_hash() {
    use std::collections::HashSet;

    let set = ["1.0.0+a", "1.0.0+b", "1.0.0"]
        .iter()
        .map(|v| version!(parse => v))
        .collect::<HashSet<_>>();
    assert_eq!(set.len(), 1);
}

/// Regular expression for versions that exercise pre-release ordering:
/// - Small core numbers, so that cores often collide
/// - Short identifiers drawn from a small alphabet, so that identifiers often collide
/// - Optional build metadata
const VERSIONS: &str = r"[0-2]\.[0-2]\.[0-2](-(0|[1-9]|[ab]|[ab][0-9])(\.(0|[1-9][0-9]?|[ab-]{1,2})){0,2})?(\+[a-z0-9]{1,4})?";

/// Same as [`VERSIONS`], without build metadata.
const VERSIONS_WITHOUT_BUILD: &str = r"[0-2]\.[0-2]\.[0-2](-(0|[1-9]|[ab]|[ab][0-9])(\.(0|[1-9][0-9]?|[ab-]{1,2})){0,2})?";

proptest! {
    /// The order is antisymmetric and agrees with equality.
    #[test]
    fn order_is_antisymmetric(a in VERSIONS, b in VERSIONS) {
        let a = version!(parse => &a);
        let b = version!(parse => &b);
        prop_assert_eq!(a.cmp(&b), b.cmp(&a).reverse());
        prop_assert_eq!(a.cmp(&b) == Ordering::Equal, a == b);
    }
}

proptest! {
    /// The order is transitive.
    #[test]
    fn order_is_transitive(a in VERSIONS, b in VERSIONS, c in VERSIONS) {
        let versions = [version!(parse => &a), version!(parse => &b), version!(parse => &c)];
        for ordering in versions.iter().permutations(3) {
            let (x, y, z) = (ordering[0], ordering[1], ordering[2]);
            if x <= y && y <= z {
                prop_assert!(x <= z, "{x} <= {y} <= {z}");
            }
        }
    }
}

proptest! {
    /// Build metadata never changes the order.
    #[test]
    fn build_is_irrelevant(a in VERSIONS_WITHOUT_BUILD, b in VERSIONS_WITHOUT_BUILD, build in r"[0-9A-Za-z-]{1,8}") {
        let plain = version!(parse => &a);
        let with_build = version!(parse => format!("{a}+{build}"));
        let other = version!(parse => &b);
        prop_assert_eq!(plain.cmp(&other), with_build.cmp(&other));
        prop_assert_eq!(&plain, &with_build);
    }
}

proptest! {
    /// The order agrees with the `semver` crate wherever it accepts the input.
    #[test]
    fn agrees_with_semver(a in VERSIONS_WITHOUT_BUILD, b in VERSIONS_WITHOUT_BUILD) {
        let (Ok(sa), Ok(sb)) = (semver::Version::parse(&a), semver::Version::parse(&b)) else {
            return Ok(());
        };
        let ours = version!(parse => &a).cmp(&version!(parse => &b));
        prop_assert_eq!(ours, sa.cmp(&sb));
    }
}
