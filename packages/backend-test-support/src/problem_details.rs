//! Assertions on serialized problem details without depending on backend types.

use serde::Deserialize;
use serde_json::Value;

/// Mirror of the backend's problem details shape.
#[derive(Debug, Deserialize)]
struct ProblemDetailsLike {
    code: String,
    title: String,
    detail: String,
    retryable: bool,
}

/// Assert that `json` is a problem details body with the given code.
///
/// Panics with the offending body when the shape or any field is off.
pub fn assert_problem_details(
    json: &Value,
    expected_code: &str,
    expected_retryable: bool,
    expected_detail_contains: Option<&str>,
) {
    let problem: ProblemDetailsLike = serde_json::from_value(json.clone())
        .unwrap_or_else(|e| panic!("not a problem details body ({e}): {json}"));

    assert_eq!(problem.code, expected_code, "unexpected code in {json}");
    assert_eq!(
        problem.retryable, expected_retryable,
        "unexpected retryable flag in {json}"
    );
    assert!(!problem.title.is_empty(), "empty title in {json}");
    assert!(
        problem
            .code
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit() || c == '_'),
        "code is not SCREAMING_SNAKE_CASE: {}",
        problem.code
    );
    if let Some(needle) = expected_detail_contains {
        assert!(
            problem.detail.contains(needle),
            "detail {:?} does not mention {needle:?}",
            problem.detail
        );
    }
}
