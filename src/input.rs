use indexmap::IndexMap;
use serde_json::Value;
use tracing::warn;

/// 解析用户输入的 JSON 对象得到的键值表
///
/// 输入无效时 `map` 为空，`error` 带给用户看的提示。
#[derive(Debug, Clone, PartialEq, Default)]
pub struct JsonMapInput {
    pub map: IndexMap<String, String>,
    pub error: Option<String>,
}

/// 把 headers / params 输入框中的 JSON 文本解析为有序的字符串表
///
/// 空白输入得到空表；字符串值取原文，其他值转为紧凑 JSON。
pub fn parse_json_map(text: &str) -> JsonMapInput {
    if text.trim().is_empty() {
        return JsonMapInput::default();
    }

    match serde_json::from_str::<Value>(text) {
        Ok(Value::Object(object)) => JsonMapInput {
            map: object
                .into_iter()
                .map(|(key, value)| {
                    let value = match value {
                        Value::String(s) => s,
                        other => other.to_string(),
                    };
                    (key, value)
                })
                .collect(),
            error: None,
        },
        Ok(_) | Err(_) => {
            warn!("Rejected JSON map input: {}", text);
            JsonMapInput {
                map: IndexMap::new(),
                error: Some(format!("Invalid JSON: {}", text)),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_blank() {
        let input = parse_json_map("   ");
        assert!(input.map.is_empty());
        assert_eq!(input.error, None);
    }

    #[test]
    fn test_parse_object_keeps_order() {
        let input = parse_json_map(r#"{"X-B": "2", "X-A": "1", "Retry": 3, "Flag": true}"#);
        assert_eq!(input.error, None);

        let pairs: Vec<_> = input
            .map
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
            .collect();
        assert_eq!(
            pairs,
            vec![("X-B", "2"), ("X-A", "1"), ("Retry", "3"), ("Flag", "true")]
        );
    }

    #[test]
    fn test_parse_invalid_json() {
        let input = parse_json_map("{not json");
        assert!(input.map.is_empty());
        assert_eq!(input.error.as_deref(), Some("Invalid JSON: {not json"));
    }

    #[test]
    fn test_parse_non_object() {
        let input = parse_json_map("[1, 2]");
        assert!(input.map.is_empty());
        assert!(input.error.is_some());
    }
}
