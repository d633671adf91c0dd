//! Tests for constraint evaluation and constraint sets.

use depfilter_core::{Environment, FilterError, Version, VersionPattern};
use depfilter_test::env::{darwin, linux, matrix, windows};
use depfilter_test::rules::{ANNOTATED, TORCH_ONLY};

use crate::parse::{parse_line, parse_marker};
use crate::{ConstraintSet, Specifier};

fn v(s: &str) -> Version {
    Version::parse(s).unwrap()
}

fn builtin() -> ConstraintSet {
    ConstraintSet::builtin().unwrap()
}

#[test]
fn test_builtin_rules_parse() {
    let rules = builtin();
    assert_eq!(rules.len(), 4);
    let packages: Vec<&str> = rules.iter().map(|c| c.package()).collect();
    assert_eq!(packages, ["onnx", "onnxruntime", "ipython", "torch"]);
}

#[test]
fn test_unconstrained_package_is_never_excluded() {
    let rules = builtin();
    for env in matrix(&["3.8", "3.9", "3.10", "3.11"]) {
        for version in ["0.1", "1.14.0", "2.0.0", "8.13.0"] {
            assert!(!rules.is_excluded("numpy", version, &env).unwrap());
        }
    }
}

#[test]
fn test_onnx_is_excluded_everywhere() {
    let rules = builtin();
    for env in matrix(&["3.7", "3.10", "3.12"]) {
        assert!(rules.is_excluded("onnx", "1.14.0", &env).unwrap(), "{env}");
        assert!(!rules.is_excluded("onnx", "1.14.1", &env).unwrap(), "{env}");
    }
}

#[test]
fn test_onnxruntime_only_on_darwin() {
    let rules = builtin();
    assert!(rules.is_excluded("onnxruntime", "1.14.0", &darwin("3.10")).unwrap());
    assert!(!rules.is_excluded("onnxruntime", "1.14.0", &linux("3.10")).unwrap());
    assert!(!rules.is_excluded("onnxruntime", "1.14.0", &windows("3.10")).unwrap());
}

#[test]
fn test_torch_wildcards_need_both_conditions() {
    let rules = builtin();
    assert!(rules.is_excluded("torch", "1.12.5", &windows("3.10")).unwrap());
    assert!(rules.is_excluded("torch", "1.13.1", &windows("3.10.11")).unwrap());
    assert!(rules.is_excluded("torch", "2.0.0", &windows("3.10")).unwrap());
    assert!(!rules.is_excluded("torch", "2.0.2", &windows("3.10")).unwrap());
    assert!(!rules.is_excluded("torch", "1.11.0", &windows("3.10")).unwrap());

    assert!(!rules.is_excluded("torch", "1.12.5", &windows("3.9")).unwrap());
    assert!(!rules.is_excluded("torch", "1.12.5", &linux("3.10")).unwrap());
}

#[test]
fn test_ipython_below_python_39() {
    let rules = builtin();
    assert!(rules.is_excluded("ipython", "8.13.0", &linux("3.8")).unwrap());
    assert!(rules.is_excluded("ipython", "8.13.0", &linux("3.8.17")).unwrap());
    assert!(!rules.is_excluded("ipython", "8.13.0", &linux("3.9")).unwrap());
    assert!(!rules.is_excluded("ipython", "8.13.1", &linux("3.8")).unwrap());
}

#[test]
fn test_wildcard_matches_prereleases() {
    let rules = builtin();
    assert!(rules.is_excluded("torch", "1.13.0rc1", &windows("3.10")).unwrap());
    assert!(rules.is_excluded("torch", "1.12.1.post2", &windows("3.10")).unwrap());
}

#[test]
fn test_package_lookup_is_normalized() {
    let rules = builtin();
    assert!(rules.is_excluded("ONNX", "1.14.0", &linux("3.10")).unwrap());
    assert!(rules.is_excluded("OnnxRuntime", "1.14", &darwin("3.10")).unwrap());
}

#[test]
fn test_series_candidates() {
    let rules = builtin();
    let env = windows("3.10");
    assert!(rules.is_excluded("torch", "1.12.*", &env).unwrap());
    assert!(rules.is_excluded("torch", "1.13.2.*", &env).unwrap());
    // Only 2.0.0 and 2.0.1 are excluded, not the whole 2.0 series.
    assert!(!rules.is_excluded("torch", "2.0.*", &env).unwrap());
    assert!(!rules.is_excluded("torch", "1.*", &env).unwrap());
    assert!(!rules.is_excluded("torch", "1.12.*", &linux("3.10")).unwrap());
}

#[test]
fn test_invalid_candidate_version() {
    let rules = builtin();
    assert!(matches!(
        rules.is_excluded("torch", "latest", &windows("3.10")),
        Err(FilterError::InvalidVersion(_))
    ));
}

#[test]
fn test_evaluation_is_idempotent() {
    let rules = builtin();
    let env = windows("3.10");
    let first: Vec<bool> = ["1.12.5", "2.0.2", "1.13.0"]
        .iter()
        .map(|version| rules.is_excluded("torch", version, &env).unwrap())
        .collect();
    for _ in 0..10 {
        let again: Vec<bool> = ["1.12.5", "2.0.2", "1.13.0"]
            .iter()
            .map(|version| rules.is_excluded("torch", version, &env).unwrap())
            .collect();
        assert_eq!(first, again);
    }
}

#[test]
fn test_explain_returns_every_excluding_rule() {
    let rules = ConstraintSet::parse("pkg != 1.0\npkg < 2.0; os_name == 'nt'\nother != 1.0\n").unwrap();
    let hits = rules.explain("pkg", &v("1.0"), &windows("3.11"));
    let lines: Vec<usize> = hits.iter().map(|c| c.line()).collect();
    assert_eq!(lines, [1]);

    let hits = rules.explain("pkg", &v("1.5"), &windows("3.11"));
    assert!(hits.is_empty());

    let hits = rules.explain("pkg", &v("3.0"), &windows("3.11"));
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].line(), 2);
    assert!(rules.explain("pkg", &v("3.0"), &linux("3.11")).is_empty());
}

#[test]
fn test_rationale_from_preceding_comments() {
    let rules = ConstraintSet::parse(ANNOTATED).unwrap();
    let constraints: Vec<_> = rules.iter().collect();
    assert_eq!(constraints.len(), 3);

    assert_eq!(
        constraints[0].rationale(),
        Some("first rationale line\nsecond rationale line")
    );
    assert_eq!(constraints[0].line(), 5);

    assert_eq!(constraints[1].package(), "scipy");
    assert_eq!(constraints[1].line(), 7);
    assert_eq!(constraints[1].specifiers().len(), 2);
    assert_eq!(constraints[1].rationale(), None);

    assert_eq!(constraints[2].package(), "onnx-runtime");
    assert_eq!(constraints[2].extras(), ["gpu"]);
}

#[test]
fn test_annotated_rules_evaluate() {
    let rules = ConstraintSet::parse(ANNOTATED).unwrap();
    assert!(rules.is_excluded("scipy", "1.11.1", &linux("3.9")).unwrap());
    assert!(!rules.is_excluded("scipy", "1.11.1", &linux("3.8")).unwrap());
    assert!(rules.is_excluded("onnx_runtime", "1.14.0", &darwin("3.8")).unwrap());
    assert!(rules.is_excluded("onnx-runtime", "1.14.0", &windows("3.8")).unwrap());
    assert!(!rules.is_excluded("onnx-runtime", "1.14.0", &linux("3.8")).unwrap());
}

#[test]
fn test_parse_aborts_on_first_error() {
    let err = ConstraintSet::parse("onnx != 1.14.0\ntorch 1.0\nbad => 1\n").unwrap_err();
    assert!(matches!(err, FilterError::MalformedConstraint { line: 2, .. }));
}

#[test]
fn test_from_file_reports_io_errors() {
    let err = ConstraintSet::from_file("/nonexistent/depfilter/rules.txt").unwrap_err();
    assert!(matches!(err, FilterError::Io(_)));
}

#[test]
fn test_extend_keeps_both_sets() {
    let mut rules = builtin();
    rules.extend(ConstraintSet::parse(TORCH_ONLY).unwrap());
    assert_eq!(rules.len(), 5);
    assert_eq!(rules.constraints_for("torch").count(), 2);
}

#[test]
fn test_ordered_specifiers() {
    let env = linux("3.11");
    let rules = ConstraintSet::parse("lib >=1.2, <2.0\ncompat ~= 1.4.2\n").unwrap();
    assert!(rules.is_excluded("lib", "1.1", &env).unwrap());
    assert!(!rules.is_excluded("lib", "1.9.9", &env).unwrap());
    assert!(rules.is_excluded("lib", "2.0", &env).unwrap());

    assert!(rules.is_excluded("compat", "1.4.1", &env).unwrap());
    assert!(!rules.is_excluded("compat", "1.4.9", &env).unwrap());
    assert!(rules.is_excluded("compat", "1.5.0", &env).unwrap());
}

#[test]
fn test_compatible_release_needs_two_segments() {
    assert!(matches!(
        Specifier::parse("~=1"),
        Err(FilterError::MalformedConstraint { .. })
    ));
}

#[test]
fn test_series_rejected_by_equality_pin() {
    let rules = ConstraintSet::parse("pinned == 2.1.*\n").unwrap();
    let env = linux("3.11");
    assert!(rules.is_excluded("pinned", "2.0.*", &env).unwrap());
    assert!(!rules.is_excluded("pinned", "2.*", &env).unwrap());
    assert!(!rules.is_excluded("pinned", "2.1.4", &env).unwrap());
}

#[test]
fn test_series_rejected_by_ordered_bounds() {
    let rules = ConstraintSet::parse(
        "upper < 2.0\ncapped <= 2.0\nfloor > 1.5\nbase >= 1.5\ncompat ~= 1.4.2\n",
    )
    .unwrap();
    let env = linux("3.11");
    let excluded = |package: &str, version: &str| rules.is_excluded(package, version, &env).unwrap();

    assert!(excluded("upper", "3.5"));
    assert!(excluded("upper", "3.*"));
    assert!(excluded("upper", "2.1.*"));
    assert!(!excluded("upper", "2.*"));
    assert!(!excluded("upper", "2.0.*"));
    assert!(!excluded("upper", "1.*"));

    assert!(excluded("capped", "2.1.*"));
    assert!(!excluded("capped", "2.0.*"));

    assert!(excluded("floor", "1.4.*"));
    assert!(!excluded("floor", "1.5.*"));
    assert!(!excluded("floor", "1.*"));

    assert!(excluded("base", "1.4.*"));
    assert!(excluded("base", "0.*"));
    assert!(!excluded("base", "1.5.*"));

    assert!(excluded("compat", "1.3.*"));
    assert!(excluded("compat", "1.5.*"));
    assert!(excluded("compat", "2.*"));
    assert!(!excluded("compat", "1.4.*"));
    assert!(!excluded("compat", "1.*"));
}

#[test]
fn test_series_result_agrees_with_members() {
    let rules = ConstraintSet::parse("lib >= 1.5, < 3.0\n").unwrap();
    let env = linux("3.11");
    for (series, members) in [
        ("0.*", ["0.1", "0.9.9", "0.0.dev0"]),
        ("3.1.*", ["3.1.dev0", "3.1.0rc1", "3.1.5"]),
        ("4.2.*", ["4.2", "4.2.0rc1", "4.2.7.post1"]),
    ] {
        assert!(rules.is_excluded("lib", series, &env).unwrap(), "{series}");
        for member in members {
            assert!(rules.is_excluded("lib", member, &env).unwrap(), "{member}");
        }
    }
    // 3.0.dev0 still satisfies `< 3.0`.
    assert!(!rules.is_excluded("lib", "3.*", &env).unwrap());
    assert!(!rules.is_excluded("lib", "2.*", &env).unwrap());
    assert!(!rules.is_excluded("lib", "1.*", &env).unwrap());
}

#[test]
fn test_marker_variables() {
    let env = Environment::parse("3.10.4", "Darwin")
        .unwrap()
        .with_machine("arm64");
    let holds = |text: &str| parse_marker(text).unwrap().evaluate(&env);

    assert!(holds("python_version == '3.10'"));
    assert!(holds("python_version >= '3.9' and python_version < '3.11'"));
    assert!(holds("python_version == '3.*'"));
    assert!(holds("python_full_version == '3.10.4'"));
    assert!(!holds("python_full_version == '3.10'"));
    assert!(holds("python_full_version > '3.10'"));
    assert!(holds("sys_platform == 'darwin'"));
    assert!(holds("os_name == 'posix'"));
    assert!(holds("platform_machine == 'arm64'"));
    assert!(holds("platform_system != 'Windows'"));
    assert!(!holds("platform_system == 'darwin'"));
}

#[test]
fn test_missing_machine_never_matches() {
    let env = linux("3.10");
    let marker = parse_marker("platform_machine != 'x86_64'").unwrap();
    assert!(!marker.evaluate(&env));
}

#[test]
fn test_constraint_display_roundtrips_through_parser() {
    let line = "torch !=2.0.1, !=1.12.*; python_version == '3.10' and platform_system == 'Windows'";
    let constraint = parse_line(line, 1).unwrap().unwrap();
    assert_eq!(constraint.to_string(), line);
    let reparsed = parse_line(&constraint.to_string(), 1).unwrap().unwrap();
    assert_eq!(reparsed, constraint);
}

#[test]
fn test_excluded_versions_lists_not_equal_patterns() {
    let constraint = parse_line("lib != 1.0, >= 0.5, != 2.*", 1).unwrap().unwrap();
    let patterns: Vec<&VersionPattern> = constraint.excluded_versions().collect();
    assert_eq!(
        patterns,
        [
            &VersionPattern::parse("1.0").unwrap(),
            &VersionPattern::parse("2.*").unwrap()
        ]
    );
}
