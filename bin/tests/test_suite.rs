use frontend::{Frontend, Options, RunError};
use itertools::Itertools;
use lazy_regex::regex;
use test_suite_proc_macro::generate_tests;

use pretty_assertions::assert_eq;

/// Runs a case file and checks its annotations:
///
/// - `// expect: <tree>` is a line of expected output.
/// - `// Error...: <message>` is a diagnostic expected on the annotation's line.
/// - `// [line N] Error...: <message>` is a diagnostic expected on line N, for
///   errors reported somewhere an annotation can't go (e.g. inside a comment).
///
/// Diagnostics are expected in annotation order.
pub fn lox_expect(code: &str) {
    let mut expected_errors = vec![];
    let mut expected_output = vec![];

    let error_on_line_regex = regex!(r"// (\[line \d+\] Error( at '.*'| at end)?: .*)");
    let error_regex = regex!(r"// (Error( at '.*'| at end)?: .*)");
    let output_regex = regex!(r"// expect: (.*)");

    for (i, line) in code.lines().enumerate() {
        if let Some(cap) = error_on_line_regex.captures(line) {
            expected_errors.push(cap[1].to_string());
        } else if let Some(cap) = error_regex.captures(line) {
            expected_errors.push(format!("[line {}] {}", i + 1, &cap[1]));
        } else if let Some(cap) = output_regex.captures(line) {
            expected_output.push(cap[1].to_string());
        }
    }

    let mut output = Vec::new();
    let result = Frontend::new(Options { print_tokens: false }).run_source(code, &mut output);

    assert_eq!(
        String::from_utf8(output).unwrap().lines().collect_vec(),
        expected_output,
        "Actual output (left) does not match expected output (right)"
    );

    match result {
        Ok(()) => assert!(expected_errors.is_empty(), "Expected errors but none occurred"),
        Err(RunError::Diagnostics(diagnostics)) => {
            assert_eq!(
                diagnostics.to_string(),
                expected_errors.join("\n"),
                "Actual errors (left) do not match expected errors (right)"
            );
        }
        Err(e) => panic!("Unexpected error: {:?}", e),
    }
}

generate_tests!();
