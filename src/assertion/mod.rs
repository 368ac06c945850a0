mod evaluator;
mod extractor;
mod parser;
/// 断言模块 - 对归一化后的响应做通过/失败检查
mod types;

pub use evaluator::{evaluate, evaluate_assertion};
pub use extractor::{extract_json, resolve_path, value_to_text};
pub use parser::{parse_assertion, parse_header_value, parse_json_path_expectation};
pub use types::{
    AssertError, AssertionKind, AssertionResult, AssertionSpec, AssertionSummary, JsonPath,
    PathSegment, RawAssertion,
};
