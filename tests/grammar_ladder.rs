//! Integration tests for the precedence ladder and the sample scripts
//!
//! The rstest table pins one expression per level of the ladder; the snapshots keep the
//! sexp and treeviz renderings of whole scripts stable.

use dicecalc::calc::parse;
use dicecalc::calc::processor::calc_sources::CalcSources;
use dicecalc::calc::processor::{process_source, ProcessingSpec};
use rstest::rstest;

fn sexp(input: &str) -> String {
    parse(input)
        .unwrap_or_else(|e| panic!("{:?} should parse: {}", input, e))
        .to_string()
}

// ============================================================================
// One expression per level
// ============================================================================

#[rstest]
#[case::assignment("x = 1 + 2", "(= x (+ 1 2))")]
#[case::function_definition("(x) -> x", "(-> [x] x)")]
#[case::tilde_arrow("(a, b.) ~> b", "(~> [a b...] b)")]
#[case::comparison("1 + 2 < 4", "(cmp (+ 1 2) < 4)")]
#[case::comparison_chain("1 < 2 <= 3", "(cmp 1 < 2 <= 3)")]
#[case::logic_or_below_and("a & b | c", "(| (& a b) c)")]
#[case::addition_below_product("1 + 2 * 3", "(+ 1 (* 2 3))")]
#[case::addition_left_assoc("1 - 2 - 3", "(- (- 1 2) 3)")]
#[case::product_below_modulo("10 % 4 * 3", "(* (% 10 4) 3)")]
#[case::power_right_assoc("2 ^ 3 ^ 2", "(^ 2 (^ 3 2))")]
#[case::minus_outside_power("-2 ^ 2", "(neg (^ 2 2))")]
#[case::minus_as_exponent("2 ^ -2", "(^ 2 (neg 2))")]
#[case::superscript("2³", "(^ 2 3)")]
#[case::die_with_times("2d6 + 1", "(+ (d 2 6) 1)")]
#[case::die_without_times("d20", "(d 20)")]
#[case::factorial("3!", "(fact 3)")]
#[case::logical_not("!x", "(not x)")]
#[case::call_single_argument("f(5)", "(call f 5)")]
#[case::call_arguments("f(1, 2)", "(call f [1 2])")]
#[case::call_no_arguments("f()", "(call f [])")]
#[case::wrapped("(1 + 2) * 3", "(* (+ 1 2) 3)")]
fn test_ladder_level(#[case] input: &str, #[case] expected: &str) {
    assert_eq!(sexp(input), expected);
}

#[rstest]
#[case("2^3", "2³")]
#[case("2*3", "2×3")]
#[case("6/3", "6÷3")]
#[case("1+2", "  1 +\n 2 ")]
#[case("x", "x # trailing comment")]
fn test_equivalent_spellings(#[case] plain: &str, #[case] variant: &str) {
    assert_eq!(parse(plain).unwrap(), parse(variant).unwrap());
}

// ============================================================================
// Sample scripts
// ============================================================================

#[test]
fn test_arithmetic_sample_sexp() {
    let output = CalcSources::get_processed("000-arithmetic.c5", "ast-sexp").unwrap();
    insta::assert_snapshot!(output, @r"
    (+ 2 (* 3 4))
    (+ (* 2 3) 4)
    (^ 2 (^ 3 2))
    (neg (^ 2 2))
    (^ 2 (neg 2))
    (* (% 10 4) 3)
    (* (+ 1 2) 3)
    ");
}

#[test]
fn test_dice_sample_sexp() {
    let output = CalcSources::get_processed("010-dice.c5", "ast-sexp").unwrap();
    insta::assert_snapshot!(output, @r"
    (d 2 6)
    (+ (d 20) 5)
    (d (+ 1 1) (fact 3))
    (cmp (d 3 6) > 10)
    ");
}

#[test]
fn test_function_sample_has_definitions_and_calls() {
    let output = CalcSources::get_processed("020-functions.c5", "ast-sexp").unwrap();
    let lines: Vec<&str> = output.lines().collect();
    assert_eq!(lines[0], "(= square (-> [x] (* x x)))");
    assert_eq!(lines[2], "(= all (~> [xs...] xs))");
    assert_eq!(lines[3], "(= now (-> [] 42))");
    assert_eq!(lines[5], "(call sum [1 2])");
    assert_eq!(lines[6], "(call now [])");
    assert_eq!(lines[8], "(call (call curry 10) 3)");
}

#[test]
fn test_script_sample_statements() {
    let ast = CalcSources::get_ast("050-script.c5").unwrap();
    let statements: Vec<String> = ast.statements().iter().map(|s| s.to_string()).collect();
    assert_eq!(
        statements,
        vec![
            "(= fact (-> [n] (fact n)))",
            "(= half (-> [n] (/ n 2)))",
            "(= roll (+ (d 6) (d 6)))",
            "(- (call half (call fact 4)) roll)",
        ]
    );
}

#[test]
fn test_treeviz_output() {
    let spec = ProcessingSpec::from_string("ast-treeviz").unwrap();
    let output = process_source("2d6 + f(x)", None, &spec).unwrap();
    insta::assert_snapshot!(output.trim_end(), @r"
    └─ bin_op: +
      ├─ die: d
      │ ├─ number: 2
      │ └─ number: 6
      └─ function_call: f
        ├─ word: f
        └─ word: x
    ");
}
