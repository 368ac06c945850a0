use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 断言错误类型
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AssertError {
    #[error("Unknown assertion type: {0}")]
    UnknownKind(String),

    #[error("Invalid assertion syntax: {0}")]
    InvalidSyntax(String),

    #[error("Invalid value: {0}")]
    InvalidValue(String),

    /// 响应体不是 JSON
    #[error("Not JSON response")]
    NotJson,

    /// JSON 路径无法解析到值
    #[error("Path not found")]
    PathNotFound,
}

/// 断言类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssertionKind {
    StatusCode,
    ResponseTime,
    HeaderExists,
    HeaderValue,
    JsonPath,
}

impl AssertionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::StatusCode => "status_code",
            Self::ResponseTime => "response_time",
            Self::HeaderExists => "header_exists",
            Self::HeaderValue => "header_value",
            Self::JsonPath => "json_path",
        }
    }
}

impl FromStr for AssertionKind {
    type Err = AssertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "status_code" => Ok(Self::StatusCode),
            "response_time" => Ok(Self::ResponseTime),
            "header_exists" => Ok(Self::HeaderExists),
            "header_value" => Ok(Self::HeaderValue),
            "json_path" => Ok(Self::JsonPath),
            other => Err(AssertError::UnknownKind(other.to_string())),
        }
    }
}

impl fmt::Display for AssertionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 断言的原始输入形式 `{"type": ..., "expected": ...}`
///
/// `expected` 可以是字符串或数字，具体编码取决于断言类型。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawAssertion {
    #[serde(rename = "type")]
    pub kind: String,
    pub expected: serde_json::Value,
}

impl RawAssertion {
    pub fn new(kind: impl Into<String>, expected: impl Into<serde_json::Value>) -> Self {
        Self {
            kind: kind.into(),
            expected: expected.into(),
        }
    }
}

/// JSON 路径中的一段：`key`、`key[0]`、`key[0][-1]` 或 `[2]`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathSegment {
    /// 为空时直接对当前节点取下标
    pub key: String,
    /// 负数从末尾计数
    pub indices: Vec<i64>,
}

/// 点号分隔的 JSON 路径，例如 `data.items[0].id`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JsonPath {
    pub segments: Vec<PathSegment>,
}

impl FromStr for JsonPath {
    type Err = AssertError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let path = s.trim();
        if path.is_empty() {
            return Err(AssertError::InvalidSyntax("JSON path is empty".to_string()));
        }

        let segments = path
            .split('.')
            .map(|part| parse_segment(part, path))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { segments })
    }
}

fn parse_segment(part: &str, path: &str) -> Result<PathSegment, AssertError> {
    let (key, mut rest) = match part.find('[') {
        Some(pos) => (&part[..pos], &part[pos..]),
        None => (part, ""),
    };

    let mut indices = Vec::new();
    while !rest.is_empty() {
        let inner = rest
            .strip_prefix('[')
            .and_then(|r| r.split_once(']'))
            .ok_or_else(|| {
                AssertError::InvalidSyntax(format!("Malformed index in path '{}'", path))
            })?;
        let index = inner.0.trim().parse::<i64>().map_err(|_| {
            AssertError::InvalidSyntax(format!(
                "Index '{}' in path '{}' is not an integer",
                inner.0, path
            ))
        })?;
        indices.push(index);
        rest = inner.1;
    }

    if key.is_empty() && indices.is_empty() {
        return Err(AssertError::InvalidSyntax(format!(
            "Empty segment in path '{}'",
            path
        )));
    }

    Ok(PathSegment {
        key: key.to_string(),
        indices,
    })
}

impl fmt::Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                f.write_str(".")?;
            }
            f.write_str(&segment.key)?;
            for index in &segment.indices {
                write!(f, "[{}]", index)?;
            }
        }
        Ok(())
    }
}

/// 解析后的断言，每种类型带强类型字段
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawAssertion", into = "RawAssertion")]
pub enum AssertionSpec {
    /// 状态码的字符串形式等于 `expected`
    StatusCode { expected: String },
    /// 耗时不超过 `max_ms`（包含边界）
    ResponseTime { max_ms: f64 },
    /// 存在名为 `name` 的 header
    HeaderExists { name: String },
    /// header `name` 的值等于 `value`
    HeaderValue { name: String, value: String },
    /// `path` 处的值的字符串形式等于 `expected`
    JsonPath { path: JsonPath, expected: String },
}

impl AssertionSpec {
    pub fn kind(&self) -> AssertionKind {
        match self {
            Self::StatusCode { .. } => AssertionKind::StatusCode,
            Self::ResponseTime { .. } => AssertionKind::ResponseTime,
            Self::HeaderExists { .. } => AssertionKind::HeaderExists,
            Self::HeaderValue { .. } => AssertionKind::HeaderValue,
            Self::JsonPath { .. } => AssertionKind::JsonPath,
        }
    }

    /// `expected` 的原始编码，例如 `"Content-Type: application/json"`
    pub fn expected_text(&self) -> String {
        match self {
            Self::StatusCode { expected } => expected.clone(),
            Self::ResponseTime { max_ms } => max_ms.to_string(),
            Self::HeaderExists { name } => name.clone(),
            Self::HeaderValue { name, value } => format!("{}: {}", name, value),
            Self::JsonPath { path, expected } => format!("{} == {}", path, expected),
        }
    }
}

impl fmt::Display for AssertionSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind(), self.expected_text())
    }
}

impl TryFrom<RawAssertion> for AssertionSpec {
    type Error = AssertError;

    fn try_from(raw: RawAssertion) -> Result<Self, Self::Error> {
        crate::assertion::parser::parse_assertion(&raw)
    }
}

impl From<AssertionSpec> for RawAssertion {
    fn from(spec: AssertionSpec) -> Self {
        let expected = match &spec {
            AssertionSpec::ResponseTime { max_ms } => number_value(*max_ms),
            AssertionSpec::StatusCode { .. }
            | AssertionSpec::HeaderExists { .. }
            | AssertionSpec::HeaderValue { .. }
            | AssertionSpec::JsonPath { .. } => serde_json::Value::String(spec.expected_text()),
        };
        RawAssertion::new(spec.kind().as_str(), expected)
    }
}

/// 整数毫秒保持整数形式，避免 1000 导出成 1000.0
fn number_value(n: f64) -> serde_json::Value {
    if n.fract() == 0.0 && n.abs() < i64::MAX as f64 {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Value::from(n)
    }
}

/// 断言结果
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AssertionResult {
    pub kind: AssertionKind,
    /// 期望值（原始编码）
    pub expected: String,
    /// 实际值（按断言类型渲染）
    pub actual: String,
    pub passed: bool,
}

impl AssertionResult {
    pub fn new(
        kind: AssertionKind,
        expected: impl Into<String>,
        actual: impl Into<String>,
        passed: bool,
    ) -> Self {
        Self {
            kind,
            expected: expected.into(),
            actual: actual.into(),
            passed,
        }
    }
}

/// 一组断言结果的统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AssertionSummary {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl AssertionSummary {
    pub fn from_results(results: &[AssertionResult]) -> Self {
        let passed = results.iter().filter(|r| r.passed).count();
        Self {
            passed,
            failed: results.len() - passed,
            total: results.len(),
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

impl fmt::Display for AssertionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} Passed", self.passed, self.total)
    }
}
