use std::str::FromStr;

use assert_matches::assert_matches;
use impls::impls;
use pretty_assertions::assert_eq;
use proptest::prelude::*;
use simple_test_case::test_case;
use static_assertions::const_assert;

use semrange::*;

#[test]
fn trait_impls() {
    const_assert!(impls!(Version: AsRef<Version>));
    const_assert!(impls!(Version: FromStr));
    const_assert!(impls!(Version: From<&'static Version>));
    const_assert!(impls!(Version: TryFrom<&'static str>));
    const_assert!(impls!(Version: TryFrom<String>));
    const_assert!(impls!(Version: From<semver::Version>));
    const_assert!(impls!(Version: Ord & std::hash::Hash));
}

#[test_case("1.0.0"; "release")]
#[test_case("0.0.0"; "zeros")]
#[test_case("1.0.0-alpha"; "pre_release")]
#[test_case("1.0.0-alpha.1"; "dotted_pre_release")]
#[test_case("1.0.0-0.3.7"; "numeric_pre_release")]
#[test_case("1.0.0-x.7.z.92"; "mixed_pre_release")]
#[test_case("1.0.0-x-y-z.--"; "hyphens")]
#[test_case("1.0.0-alpha+001"; "pre_release_and_build")]
#[test_case("1.0.0+20130313144700"; "build")]
#[test_case("1.0.0-beta+exp.sha.5114f85"; "dotted_build")]
#[test_case("1.0.0+21AF26D3----117B344092BD"; "build_hyphens")]
#[test_case("1.0.0-01"; "leading_zero_identifier")]
#[test_case("1.2.10"; "multi_digit_patch")]
#[test_case("0.0.10"; "multi_digit_patch_after_zeros")]
#[test_case("1.2.345"; "three_digit_patch")]
#[test_case("10.20.30"; "multi_digit_core")]
#[test]
fn parse_roundtrip(input: &str) {
    let parsed = Version::parse(input).expect("must parse version");
    pretty_assertions::assert_eq!(parsed.to_string(), input);
}

#[test_case("1.2.10", (1, 2, 10); "trailing_patch")]
#[test_case("0.0.10", (0, 0, 10); "trailing_patch_after_zeros")]
#[test_case("1.2.345", (1, 2, 345); "three_digit_trailing_patch")]
#[test_case("1.2.99+build", (1, 2, 99); "patch_before_build")]
#[test_case("123.456.7890", (123, 456, 7890); "every_number")]
#[test]
fn parses_multi_digit_numbers(input: &str, (major, minor, patch): (u64, u64, u64)) {
    let parsed = Version::parse(input).expect("must parse version");
    pretty_assertions::assert_eq!((parsed.major(), parsed.minor(), parsed.patch()), (major, minor, patch));
}

#[test_case("1.05.2"; "leading_zero_minor")]
#[test_case("01.5.2"; "leading_zero_major")]
#[test_case("1.5.02"; "leading_zero_patch")]
#[test_case("1.5.00"; "double_zero_patch")]
#[test_case("1.5.2.4.4"; "too_many_components")]
#[test_case("1.5"; "too_few_components")]
#[test_case("v1.0.0"; "v_prefix")]
#[test_case("1.0.0-"; "empty_pre_release")]
#[test_case("1.0.0-alpha..1"; "empty_pre_release_identifier")]
#[test_case("1.0.0+"; "empty_build")]
#[test_case("1.0.0+build."; "trailing_build_dot")]
#[test_case("1.0.0-alpha_beta"; "underscore")]
#[test_case(" 1.0.0"; "leading_space")]
#[test_case("1.0.0 "; "trailing_space")]
#[test_case(""; "empty")]
#[test]
fn rejects_version_string(input: &str) {
    assert_matches!(
        Version::parse(input),
        Err(Error::Version(VersionError::InvalidVersionString { input: reported, .. })) if reported == input
    );
}

#[test]
fn from_parts() {
    let version = Version::from_parts(1, 2, 3, Some("rc.1"), Some("build.5")).expect("must build");
    assert_eq!(version.major(), 1);
    assert_eq!(version.minor(), 2);
    assert_eq!(version.patch(), 3);
    assert_eq!(version.to_string(), "1.2.3-rc.1+build.5");

    let labels = version
        .pre_release()
        .expect("must have pre-release")
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>();
    assert_eq!(labels, vec!["rc", "1"]);
}

#[test_case(-1, 0, 0, "major"; "negative_major")]
#[test_case(0, -1, 0, "minor"; "negative_minor")]
#[test_case(0, 0, -1, "patch"; "negative_patch")]
#[test]
fn from_parts_rejects_negative(major: i64, minor: i64, patch: i64, expected: &str) {
    assert_matches!(
        Version::from_parts(major, minor, patch, None, None),
        Err(Error::Version(VersionError::InvalidVersionNumber { field, value })) if field == expected && value == "-1"
    );
}

#[test_case(Some("alpha..1"), None; "empty_pre_release_identifier")]
#[test_case(Some(""), None; "empty_pre_release")]
#[test_case(None, Some("build_1"); "invalid_build_identifier")]
#[test_case(None, Some("build."); "empty_build_identifier")]
#[test]
fn from_parts_rejects_identifier(pre_release: Option<&str>, build: Option<&str>) {
    assert_matches!(
        Version::from_parts(1, 0, 0, pre_release, build),
        Err(Error::Version(VersionError::InvalidIdentifier { .. }))
    );
}

#[test]
fn builder() {
    let version = Version::builder()
        .major(1)
        .minor(2)
        .patch(3)
        .pre_release("alpha")
        .build_metadata("sha.1")
        .build()
        .expect("must build");
    assert_eq!(version, version!(parse => "1.2.3-alpha+sha.1"));

    let version = Version::builder()
        .major(1)
        .maybe_pre_release(None::<String>)
        .build()
        .expect("must build");
    assert_eq!(version, version!(1, 0, 0));
}

#[test_case("0.0.0", false, false, false, false; "zero")]
#[test_case("2.0.0", false, true, false, false; "major")]
#[test_case("2.1.0", false, false, true, false; "minor")]
#[test_case("0.1.0", false, false, true, false; "initial_minor")]
#[test_case("2.1.3", false, false, false, true; "patch")]
#[test_case("2.0.0-rc.1", true, true, false, false; "major_pre_release")]
#[test]
fn release_kind(input: &str, pre: bool, major: bool, minor: bool, patch: bool) {
    let version = version!(parse => input);
    pretty_assertions::assert_eq!(version.is_pre_release(), pre, "is_pre_release");
    pretty_assertions::assert_eq!(version.is_major_release(), major, "is_major_release");
    pretty_assertions::assert_eq!(version.is_minor_release(), minor, "is_minor_release");
    pretty_assertions::assert_eq!(version.is_patch_release(), patch, "is_patch_release");
}

#[test]
fn comparison_predicates() {
    let lower = version!(parse => "1.0.0-alpha");
    let higher = version!(parse => "1.0.0");

    assert!(lower.is_less_than(&higher));
    assert!(lower.is_less_or_equal_to(&higher));
    assert!(lower.is_not_equal_to(&higher));
    assert!(higher.is_greater_than(&lower));
    assert!(higher.is_greater_or_equal_to(&lower));
    assert!(!higher.is_equal_to(&lower));

    let with_build = version!(parse => "1.0.0+build");
    assert!(higher.is_equal_to(&with_build));
    assert!(higher.is_less_or_equal_to(&with_build));
    assert!(higher.is_greater_or_equal_to(&with_build));
}

#[test_case("2.0.0-beta+111", "3.0.0"; "major_from_pre_release")]
#[test_case("1.2.3", "2.0.0"; "major_from_patch")]
#[test]
fn increment_major(input: &str, expected: &str) {
    let next = version!(parse => input).increment_major(None, None).expect("must increment");
    pretty_assertions::assert_eq!(next.to_string(), expected);
}

#[test_case("2.0.0-beta+111", "2.1.0"; "minor_from_pre_release")]
#[test_case("1.2.3", "1.3.0"; "minor_from_patch")]
#[test]
fn increment_minor(input: &str, expected: &str) {
    let next = version!(parse => input).increment_minor(None, None).expect("must increment");
    pretty_assertions::assert_eq!(next.to_string(), expected);
}

#[test_case("2.0.0-beta+111", "2.0.1"; "patch_from_pre_release")]
#[test_case("1.2.3", "1.2.4"; "patch_from_patch")]
#[test]
fn increment_patch(input: &str, expected: &str) {
    let next = version!(parse => input).increment_patch(None, None).expect("must increment");
    pretty_assertions::assert_eq!(next.to_string(), expected);
}

#[test]
fn increment_with_labels() {
    let pre_release = Label::parse("rc.1").expect("must parse label");
    let build = Label::parse("b7").expect("must parse label");
    let next = version!(1, 2, 3)
        .increment_minor(Some(pre_release), Some(build))
        .expect("must increment");
    assert_eq!(next.to_string(), "1.3.0-rc.1+b7");
}

#[test]
fn with_pre_release_clears_build() {
    let version = version!(parse => "1.0.0-alpha+build.1");
    let beta = Label::parse("beta").expect("must parse label");
    assert_eq!(version.with_pre_release(Some(beta)).to_string(), "1.0.0-beta");
    assert_eq!(version.with_pre_release(None).to_string(), "1.0.0");
}

#[test]
fn with_build_keeps_pre_release() {
    let version = version!(parse => "1.0.0-alpha+build.1");
    let build = Label::parse("build.2").expect("must parse label");
    assert_eq!(version.with_build(Some(build)).to_string(), "1.0.0-alpha+build.2");
    assert_eq!(version.with_build(None).to_string(), "1.0.0-alpha");

    // The original is unchanged.
    assert_eq!(version.to_string(), "1.0.0-alpha+build.1");
}

/// Regular expression that matches valid version strings:
/// - Three dot-separated numbers without leading zeros
/// - Optionally a `-` and dot-separated identifiers
/// - Optionally a `+` and dot-separated identifiers
const VALID_VERSIONS: &str = r"(0|[1-9][0-9]{0,8})\.(0|[1-9][0-9]{0,8})\.(0|[1-9][0-9]{0,8})(-[0-9A-Za-z-]{1,6}(\.[0-9A-Za-z-]{1,6}){0,3})?(\+[0-9A-Za-z-]{1,6}(\.[0-9A-Za-z-]{1,6}){0,3})?";

proptest! {
    /// Tests randomly generated strings that match the provided regular expression against the parser.
    /// Validates that the parser succeeds by converting the version back into a string again.
    #[test]
    fn parses_arbitrary_version(input in VALID_VERSIONS) {
        let parsed = Version::parse(&input).expect("must parse version");
        prop_assert_eq!(parsed.to_string(), input);
    }
}

proptest! {
    /// Versions that the `semver` crate accepts convert to it and back without change.
    #[test]
    fn semver_interop(input in VALID_VERSIONS) {
        let parsed = Version::parse(&input).expect("must parse version");
        if let Ok(expected) = semver::Version::parse(&input) {
            let converted = semver::Version::try_from(&parsed).expect("must convert");
            prop_assert_eq!(&converted, &expected);
            prop_assert_eq!(Version::from(converted).to_string(), input);
        }
    }
}
