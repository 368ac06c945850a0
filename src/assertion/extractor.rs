use crate::assertion::types::{AssertError, JsonPath};
use crate::http::ResponseRecord;
use serde_json::Value;

/// 按路径从响应的 JSON 内容中取值
pub fn extract_json<'a>(
    response: &'a ResponseRecord,
    path: &JsonPath,
) -> Result<&'a Value, AssertError> {
    let root = response.json().ok_or(AssertError::NotJson)?;
    resolve_path(root, path)
}

/// 逐段解析路径：对象按键查找，数组按下标查找
pub fn resolve_path<'a>(root: &'a Value, path: &JsonPath) -> Result<&'a Value, AssertError> {
    let mut current = root;

    for segment in &path.segments {
        if !segment.key.is_empty() {
            current = current
                .as_object()
                .and_then(|obj| obj.get(&segment.key))
                .ok_or(AssertError::PathNotFound)?;
        }

        for &index in &segment.indices {
            let items = current.as_array().ok_or(AssertError::PathNotFound)?;
            current = index_from(items, index).ok_or(AssertError::PathNotFound)?;
        }
    }

    Ok(current)
}

/// 负下标从末尾计数
fn index_from(items: &[Value], index: i64) -> Option<&Value> {
    let position = if index < 0 {
        items.len().checked_sub(usize::try_from(index.unsigned_abs()).ok()?)?
    } else {
        usize::try_from(index).ok()?
    };
    items.get(position)
}

/// JSON 值的字符串形式：字符串取原文，其余为紧凑 JSON
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::Array(_) | Value::Object(_) => {
            value.to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indexmap::IndexMap;
    use serde_json::json;

    fn path(s: &str) -> JsonPath {
        s.parse().unwrap()
    }

    fn json_response(value: Value) -> ResponseRecord {
        ResponseRecord::success(200, IndexMap::new(), value.to_string().as_bytes(), 10.0)
    }

    #[test]
    fn test_resolve_nested_object() {
        let value = json!({"user": {"id": 123, "name": "test"}});
        assert_eq!(resolve_path(&value, &path("user.id")).unwrap(), &json!(123));
    }

    #[test]
    fn test_resolve_array_index() {
        let value = json!({"data": {"items": [{"id": 7}, {"id": 8}]}});
        assert_eq!(
            resolve_path(&value, &path("data.items[1].id")).unwrap(),
            &json!(8)
        );
        assert_eq!(
            resolve_path(&value, &path("data.items[-1].id")).unwrap(),
            &json!(8)
        );
    }

    #[test]
    fn test_resolve_top_level_array() {
        let value = json!([{"name": "a"}, {"name": "b"}]);
        assert_eq!(
            resolve_path(&value, &path("[1].name")).unwrap(),
            &json!("b")
        );
    }

    #[test]
    fn test_resolve_missing_key() {
        let value = json!({"id": 42});
        assert_eq!(
            resolve_path(&value, &path("missing")),
            Err(AssertError::PathNotFound)
        );
    }

    #[test]
    fn test_resolve_index_out_of_range() {
        let value = json!({"items": []});
        assert_eq!(
            resolve_path(&value, &path("items[0]")),
            Err(AssertError::PathNotFound)
        );
        assert_eq!(
            resolve_path(&value, &path("items[-1]")),
            Err(AssertError::PathNotFound)
        );
    }

    #[test]
    fn test_resolve_through_scalar() {
        let value = json!({"id": 42, "list": "not-a-list"});
        assert_eq!(
            resolve_path(&value, &path("id.inner")),
            Err(AssertError::PathNotFound)
        );
        assert_eq!(
            resolve_path(&value, &path("list[0]")),
            Err(AssertError::PathNotFound)
        );
    }

    #[test]
    fn test_extract_from_text_response() {
        let response = ResponseRecord::success(200, IndexMap::new(), b"plain text", 1.0);
        assert_eq!(
            extract_json(&response, &path("id")),
            Err(AssertError::NotJson)
        );
    }

    #[test]
    fn test_extract_from_failed_response() {
        let response = ResponseRecord::failure("timeout", 1.0);
        assert_eq!(
            extract_json(&response, &path("id")),
            Err(AssertError::NotJson)
        );
    }

    #[test]
    fn test_extract_from_json_response() {
        let response = json_response(json!({"token": "abc"}));
        assert_eq!(
            extract_json(&response, &path("token")).unwrap(),
            &json!("abc")
        );
    }

    #[test]
    fn test_value_to_text() {
        assert_eq!(value_to_text(&json!("hello")), "hello");
        assert_eq!(value_to_text(&json!(7)), "7");
        assert_eq!(value_to_text(&json!(1.5)), "1.5");
        assert_eq!(value_to_text(&json!(true)), "true");
        assert_eq!(value_to_text(&json!(null)), "null");
        assert_eq!(value_to_text(&json!({"a": [1, 2]})), r#"{"a":[1,2]}"#);
    }
}
