use crate::assertion::extractor::{extract_json, value_to_text};
use crate::assertion::types::{AssertionResult, AssertionSpec};
use crate::http::ResponseRecord;
use tracing::debug;

/// 状态码缺失（传输失败）时 `actual` 的渲染
const ABSENT: &str = "None";

/// 对响应逐条求值断言，结果与输入一一对应、顺序一致
pub fn evaluate(response: &ResponseRecord, assertions: &[AssertionSpec]) -> Vec<AssertionResult> {
    let results: Vec<AssertionResult> = assertions
        .iter()
        .map(|assertion| evaluate_assertion(assertion, response))
        .collect();

    debug!(
        "Evaluated {} assertions, {} passed",
        results.len(),
        results.iter().filter(|r| r.passed).count()
    );
    results
}

/// 执行单条断言求值
pub fn evaluate_assertion(assertion: &AssertionSpec, response: &ResponseRecord) -> AssertionResult {
    let kind = assertion.kind();
    let expected = assertion.expected_text();

    let (actual, passed) = match assertion {
        AssertionSpec::StatusCode { expected } => match response.status_code {
            Some(code) => {
                let actual = code.to_string();
                let passed = actual == *expected;
                (actual, passed)
            }
            None => (ABSENT.to_string(), false),
        },

        AssertionSpec::ResponseTime { max_ms } => (
            response.elapsed_ms.to_string(),
            response.elapsed_ms <= *max_ms,
        ),

        AssertionSpec::HeaderExists { name } => {
            let present = response.header(name).is_some();
            (present.to_string(), present)
        }

        AssertionSpec::HeaderValue { name, value } => match response.header(name) {
            Some(actual) => (actual.to_string(), actual == value),
            None => (ABSENT.to_string(), false),
        },

        AssertionSpec::JsonPath { path, expected } => match extract_json(response, path) {
            Ok(value) => {
                let actual = value_to_text(value);
                let passed = actual == *expected;
                (actual, passed)
            }
            Err(e) => (e.to_string(), false),
        },
    };

    AssertionResult::new(kind, expected, actual, passed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::parser::parse_assertion;
    use crate::assertion::types::{AssertionKind, JsonPath, RawAssertion};
    use indexmap::IndexMap;

    fn create_test_response(status: u16, body: &str, elapsed_ms: f64) -> ResponseRecord {
        let mut headers = IndexMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("x-request-id".to_string(), "req-123".to_string());

        ResponseRecord::success(status, headers, body.as_bytes(), elapsed_ms)
    }

    fn status(expected: &str) -> AssertionSpec {
        AssertionSpec::StatusCode {
            expected: expected.to_string(),
        }
    }

    fn json_path(expected: &str) -> AssertionSpec {
        parse_assertion(&RawAssertion::new("json_path", expected)).unwrap()
    }

    #[test]
    fn test_evaluate_status_success() {
        let response = create_test_response(200, "{}", 100.0);
        let result = evaluate_assertion(&status("200"), &response);

        assert!(result.passed);
        assert_eq!(result.actual, "200");
        assert_eq!(result.kind, AssertionKind::StatusCode);
    }

    #[test]
    fn test_evaluate_status_failure() {
        let response = create_test_response(404, "{}", 100.0);
        let result = evaluate_assertion(&status("200"), &response);

        assert!(!result.passed);
        assert_eq!(result.actual, "404");
        assert_eq!(result.expected, "200");
    }

    #[test]
    fn test_evaluate_status_on_transport_failure() {
        let response = ResponseRecord::failure("connection refused", 5.0);
        let result = evaluate_assertion(&status("200"), &response);

        assert!(!result.passed);
        assert_eq!(result.actual, "None");
    }

    #[test]
    fn test_evaluate_response_time_boundary() {
        let assertion = AssertionSpec::ResponseTime { max_ms: 100.0 };

        let at_limit = create_test_response(200, "{}", 100.0);
        assert!(evaluate_assertion(&assertion, &at_limit).passed);

        let over = create_test_response(200, "{}", 100.01);
        let result = evaluate_assertion(&assertion, &over);
        assert!(!result.passed);
        assert_eq!(result.actual, "100.01");
        assert_eq!(result.expected, "100");
    }

    #[test]
    fn test_evaluate_header_exists_ignores_name_case() {
        let response = create_test_response(200, "{}", 10.0);

        let exact = AssertionSpec::HeaderExists {
            name: "x-request-id".to_string(),
        };
        let mixed_case = AssertionSpec::HeaderExists {
            name: "X-Request-ID".to_string(),
        };
        let missing = AssertionSpec::HeaderExists {
            name: "X-Missing".to_string(),
        };

        assert!(evaluate_assertion(&exact, &response).passed);
        let result = evaluate_assertion(&mixed_case, &response);
        assert!(result.passed);
        assert_eq!(result.actual, "true");

        let result = evaluate_assertion(&missing, &response);
        assert!(!result.passed);
        assert_eq!(result.actual, "false");
    }

    #[test]
    fn test_evaluate_header_value() {
        let response = create_test_response(200, "{}", 10.0);

        let matching = parse_assertion(&RawAssertion::new(
            "header_value",
            "Content-Type: application/json",
        ))
        .unwrap();
        assert!(evaluate_assertion(&matching, &response).passed);

        // 值比较区分大小写
        let wrong_case = parse_assertion(&RawAssertion::new(
            "header_value",
            "Content-Type: Application/JSON",
        ))
        .unwrap();
        let result = evaluate_assertion(&wrong_case, &response);
        assert!(!result.passed);
        assert_eq!(result.actual, "application/json");

        let missing =
            parse_assertion(&RawAssertion::new("header_value", "X-Missing: 1")).unwrap();
        let result = evaluate_assertion(&missing, &response);
        assert!(!result.passed);
        assert_eq!(result.actual, "None");
    }

    #[test]
    fn test_evaluate_json_path_success() {
        let response = create_test_response(200, r#"{"data":{"items":[{"id":7}]}}"#, 10.0);
        let result = evaluate_assertion(&json_path("data.items[0].id == 7"), &response);

        assert!(result.passed);
        assert_eq!(result.actual, "7");
        assert_eq!(result.expected, "data.items[0].id == 7");
    }

    #[test]
    fn test_evaluate_json_path_not_found() {
        let response = create_test_response(200, r#"{"data":{"items":[]}}"#, 10.0);
        let result = evaluate_assertion(&json_path("data.items[0].id == 7"), &response);

        assert!(!result.passed);
        assert_eq!(result.actual, "Path not found");
    }

    #[test]
    fn test_evaluate_json_path_not_json() {
        let response = create_test_response(200, "<html></html>", 10.0);
        let result = evaluate_assertion(&json_path("data.id == 1"), &response);

        assert!(!result.passed);
        assert_eq!(result.actual, "Not JSON response");
    }

    #[test]
    fn test_evaluate_json_path_compares_strings() {
        let response = create_test_response(200, r#"{"name":"test","ok":true,"n":null}"#, 10.0);

        assert!(evaluate_assertion(&json_path("name == test"), &response).passed);
        // 带引号的期望值不会与字符串原文相等
        assert!(!evaluate_assertion(&json_path(r#"name == "test""#), &response).passed);
        assert!(evaluate_assertion(&json_path("ok == true"), &response).passed);
        assert!(evaluate_assertion(&json_path("n == null"), &response).passed);
    }

    #[test]
    fn test_evaluate_keeps_order_and_count() {
        let response = create_test_response(200, r#"{"id": 1}"#, 50.0);
        let assertions = vec![
            status("201"),
            AssertionSpec::ResponseTime { max_ms: 1000.0 },
            AssertionSpec::JsonPath {
                path: "id".parse::<JsonPath>().unwrap(),
                expected: "1".to_string(),
            },
        ];

        let results = evaluate(&response, &assertions);
        assert_eq!(results.len(), 3);
        assert_eq!(results[0].kind, AssertionKind::StatusCode);
        assert!(!results[0].passed);
        assert_eq!(results[1].kind, AssertionKind::ResponseTime);
        assert!(results[1].passed);
        assert_eq!(results[2].kind, AssertionKind::JsonPath);
        assert!(results[2].passed);
    }
}
