use crate::assertion::types::{AssertError, AssertionKind, AssertionSpec, JsonPath, RawAssertion};
use serde_json::Value;

/// 把原始断言解析为强类型的 [`AssertionSpec`]
///
/// 各类型的 `expected` 编码：
/// - `status_code`: `"200"` 或 `200`
/// - `response_time`: 毫秒数，`1000` 或 `"1000"`
/// - `header_exists`: header 名
/// - `header_value`: `"Content-Type: application/json"`
/// - `json_path`: `"data.items[0].id == 7"`
pub fn parse_assertion(raw: &RawAssertion) -> Result<AssertionSpec, AssertError> {
    let kind: AssertionKind = raw.kind.parse()?;
    let expected = expected_as_text(&raw.expected)?;

    match kind {
        AssertionKind::StatusCode => {
            let expected = non_empty(&expected, "Expected status code")?;
            Ok(AssertionSpec::StatusCode {
                expected: expected.to_string(),
            })
        }

        AssertionKind::ResponseTime => {
            let max_ms = parse_max_ms(&raw.expected, &expected)?;
            Ok(AssertionSpec::ResponseTime { max_ms })
        }

        AssertionKind::HeaderExists => {
            let name = non_empty(&expected, "Header name")?;
            Ok(AssertionSpec::HeaderExists {
                name: name.to_string(),
            })
        }

        AssertionKind::HeaderValue => {
            let (name, value) = parse_header_value(&expected)?;
            Ok(AssertionSpec::HeaderValue { name, value })
        }

        AssertionKind::JsonPath => {
            let (path, expected) = parse_json_path_expectation(&expected)?;
            Ok(AssertionSpec::JsonPath { path, expected })
        }
    }
}

/// 解析 `"Header-Name: value"`，在第一个冒号处分割，两侧去空白
pub fn parse_header_value(input: &str) -> Result<(String, String), AssertError> {
    let (name, value) = input.split_once(':').ok_or_else(|| {
        AssertError::InvalidSyntax(format!(
            "Expected 'Header-Name: value', got '{}'",
            input
        ))
    })?;

    let name = non_empty(name, "Header name")?;
    Ok((name.to_string(), value.trim().to_string()))
}

/// 解析 `"dot.path == value"`，在第一个 `==` 处分割，两侧去空白
pub fn parse_json_path_expectation(input: &str) -> Result<(JsonPath, String), AssertError> {
    let (path, expected) = input.split_once("==").ok_or_else(|| {
        AssertError::InvalidSyntax(format!("Expected 'path == value', got '{}'", input))
    })?;

    Ok((path.parse()?, expected.trim().to_string()))
}

fn expected_as_text(value: &Value) -> Result<String, AssertError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Number(n) => Ok(n.to_string()),
        Value::Null | Value::Bool(_) | Value::Array(_) | Value::Object(_) => Err(
            AssertError::InvalidValue(format!("Expected a string or number, got {}", value)),
        ),
    }
}

fn parse_max_ms(value: &Value, text: &str) -> Result<f64, AssertError> {
    let max_ms = match value {
        Value::Number(n) => n.as_f64(),
        _ => text.trim().parse::<f64>().ok(),
    }
    .filter(|ms| ms.is_finite())
    .ok_or_else(|| {
        AssertError::InvalidValue(format!("'{}' is not a number of milliseconds", text))
    })?;

    Ok(max_ms)
}

fn non_empty<'a>(text: &'a str, what: &str) -> Result<&'a str, AssertError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        Err(AssertError::InvalidValue(format!("{} must not be empty", what)))
    } else {
        Ok(trimmed)
    }
}
