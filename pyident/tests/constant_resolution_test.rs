//! Scope handling of the constant binding tables: module and class level
//! resolution, shadowing, sentinels, and the empty-tuple default-argument
//! exclusion.
#![allow(clippy::unwrap_used)]

use std::path::Path;

use pyident::check::Checker;

fn rule_ids(source: &str) -> Vec<String> {
    let report = Checker::default().check_source(source, Path::new("test.py"));
    assert!(
        report.parse_error.is_none(),
        "unexpected parse error: {:?}",
        report.parse_error
    );
    report
        .findings
        .into_iter()
        .map(|finding| finding.rule_id)
        .collect()
}

#[test]
fn resolved_module_constant_counts_as_constant() {
    let ids = rule_ids("CONST = 24\nresult = CONST is 42\n");
    assert_eq!(ids, vec!["literal-comparison", "comparison-of-constants"]);
}

#[test]
fn two_resolved_constants_fire_only_the_constant_code() {
    // Neither operand is a spelled-out literal, so `literal-comparison`
    // stays silent; the resolved pairing still counts as constants.
    let ids = rule_ids("A = 1\nB = 'b'\nresult = A is B\n");
    assert_eq!(ids, vec!["comparison-of-constants"]);
}

#[test]
fn resolved_constants_never_make_a_comparison_fire_on_their_own() {
    // Resolution feeds only the constant-pairing check; a tuple display
    // against a resolved constant stays a non-finding in both directions.
    assert!(rule_ids("CONST = 24\nresult = () is CONST\n").is_empty());
    assert!(rule_ids("CONST = 24\nresult = CONST is ()\n").is_empty());

    // A resolved constant against an arbitrary runtime value stays silent
    // too: only a spelled-out literal triggers `literal-comparison`.
    assert!(rule_ids("CONST = 24\nresult = CONST is value\n").is_empty());
}

#[test]
fn sentinel_objects_are_never_treated_as_literals() {
    // The right-hand literal still fires on its own, but the sentinel must
    // not upgrade the finding to a constant comparison.
    let ids = rule_ids("MISSING = object()\nresult = MISSING is 42\n");
    assert_eq!(ids, vec!["literal-comparison"]);

    // A sentinel against a tuple display stays silent entirely.
    assert!(rule_ids("MISSING = object()\nresult = () is MISSING\n").is_empty());
}

#[test]
fn ambiguous_bindings_resolve_conservatively() {
    let ids = rule_ids("X = 1\nX = 2\nresult = X is 3\n");
    assert_eq!(ids, vec!["literal-comparison"]);

    let ids = rule_ids("if cond:\n    Y = 1\nelse:\n    Y = object()\nresult = Y is 3\n");
    assert_eq!(ids, vec!["literal-comparison"]);
}

#[test]
fn class_body_sees_its_own_constants() {
    let ids = rule_ids("class C:\n    LIMIT = 10\n    FLAG = LIMIT is 10\n");
    assert_eq!(ids, vec!["literal-comparison", "comparison-of-constants"]);
}

#[test]
fn methods_do_not_see_class_constants() {
    let ids = rule_ids(
        "class C:\n    LIMIT = 10\n    def m(self):\n        return LIMIT is 10\n",
    );
    assert_eq!(ids, vec!["literal-comparison"]);
}

#[test]
fn functions_see_module_constants() {
    let ids = rule_ids("CONST = 24\ndef f():\n    return CONST is 42\n");
    assert_eq!(ids, vec!["literal-comparison", "comparison-of-constants"]);
}

#[test]
fn parameters_shadow_module_constants() {
    let ids = rule_ids("CONST = 24\ndef f(CONST):\n    return CONST is 42\n");
    assert_eq!(ids, vec!["literal-comparison"]);
}

#[test]
fn local_assignments_shadow_module_constants() {
    let ids = rule_ids("CONST = 24\ndef f():\n    CONST = value()\n    return CONST is 42\n");
    assert_eq!(ids, vec!["literal-comparison"]);
}

#[test]
fn comprehension_targets_shadow_module_constants() {
    let ids = rule_ids("C = 1\nys = [C for C in xs if C is 2]\n");
    assert_eq!(ids, vec!["literal-comparison"]);
}

#[test]
fn lambda_parameters_shadow_module_constants() {
    let ids = rule_ids("C = 1\nf = lambda C: C is 2\n");
    assert_eq!(ids, vec!["literal-comparison"]);
}

#[test]
fn match_captures_make_a_constant_ambiguous() {
    // `case CONST:` is a capture pattern rebinding the name, so the module
    // binding no longer resolves.
    let ids = rule_ids(
        "CONST = 24\nmatch value:\n    case CONST:\n        result = CONST is 42\n",
    );
    assert_eq!(ids, vec!["literal-comparison"]);
}

#[test]
fn walrus_targets_make_a_constant_ambiguous() {
    let ids = rule_ids("CONST = 24\nif (CONST := get()):\n    result = CONST is 42\n");
    assert_eq!(ids, vec!["literal-comparison"]);
}

#[test]
fn walrus_bindings_shadow_module_constants_in_functions() {
    let ids = rule_ids("CONST = 24\ndef f(x):\n    if (CONST := x):\n        return CONST is 42\n");
    assert_eq!(ids, vec!["literal-comparison"]);
}

#[test]
fn empty_tuple_default_idiom_is_suppressed() {
    assert!(rule_ids("def f(arg=()):\n    return arg is ()\n").is_empty());
    assert!(rule_ids("def f(arg=()):\n    return () is arg\n").is_empty());
    assert!(rule_ids("def f(arg=()):\n    return arg is not ()\n").is_empty());
}

#[test]
fn exclusion_does_not_generalize_to_other_defaults() {
    // A mutable-default parameter compared against a list display still
    // fires: only the empty-tuple idiom is recognized.
    let ids = rule_ids("def f(arg=[]):\n    return arg is []\n");
    assert_eq!(ids, vec!["literal-comparison"]);

    // An empty-tuple-default parameter compared against a non-tuple literal
    // fires too.
    let ids = rule_ids("def f(arg=()):\n    return arg is []\n");
    assert_eq!(ids, vec!["literal-comparison"]);
}

#[test]
fn exclusion_is_scoped_to_the_parameter() {
    // A different name than the parameter gets no exemption.
    let ids = rule_ids("def f(arg=()):\n    return [] is []\n");
    assert_eq!(ids, vec!["literal-comparison"]);

    // Outside the function, the exclusion does not apply; a plain unresolved
    // name against a tuple display stays silent for the usual reason instead.
    assert!(rule_ids("arg = make()\nresult = arg is ()\n").is_empty());
}

#[test]
fn nested_function_shadowing_hides_the_default_parameter() {
    // The inner parameter is a fresh binding without the empty-tuple
    // default, so the idiom does not apply to it; the comparison still stays
    // silent because tuple displays do not fire on their own.
    let ids = rule_ids(
        "def outer(arg=()):\n    def inner(arg):\n        return arg is ()\n    return inner\n",
    );
    assert!(ids.is_empty());
}

#[test]
fn default_expressions_are_still_checked() {
    // The default value expression itself evaluates in the enclosing scope
    // and is traversed like any other expression.
    let ids = rule_ids("def f(flag=(2 is 2)):\n    return flag\n");
    assert_eq!(ids, vec!["literal-comparison", "comparison-of-constants"]);
}
