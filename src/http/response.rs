use crate::http::types::Status;
use chrono::Local;
use indexmap::IndexMap;
use serde::Serialize;

/// 时间戳格式（本地时间，精确到秒）
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// 响应内容
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResponseContent {
    /// 响应体是合法 JSON
    Json(serde_json::Value),
    /// 非 JSON 响应体的原始文本
    Text(String),
    /// 传输失败时的错误信息
    Error(String),
}

/// 归一化后的响应记录
///
/// 只能通过 [`ResponseRecord::success`] 和 [`ResponseRecord::failure`] 构造，
/// 以保证 `is_json` / `error` 与 `content` 一致。
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResponseRecord {
    /// 传输失败时为空
    pub status_code: Option<u16>,
    /// 耗时（毫秒，保留两位小数）
    pub elapsed_ms: f64,
    /// 响应 header，按收到的顺序，重复的 header 以 ", " 合并
    pub headers: IndexMap<String, String>,
    pub size_bytes: usize,
    pub timestamp: String,
    pub is_json: bool,
    pub content: ResponseContent,
    pub error: bool,
}

impl ResponseRecord {
    /// 构造成功响应；body 能解析为 JSON 时 content 为结构化数据
    pub fn success(
        status_code: u16,
        headers: IndexMap<String, String>,
        body: &[u8],
        elapsed_ms: f64,
    ) -> Self {
        let content = match serde_json::from_slice::<serde_json::Value>(body) {
            Ok(value) => ResponseContent::Json(value),
            Err(_) => ResponseContent::Text(String::from_utf8_lossy(body).into_owned()),
        };

        Self {
            status_code: Some(status_code),
            elapsed_ms: round_ms(elapsed_ms),
            headers,
            size_bytes: body.len(),
            timestamp: now_timestamp(),
            is_json: matches!(content, ResponseContent::Json(_)),
            content,
            error: false,
        }
    }

    /// 构造传输失败的响应记录
    pub fn failure(message: impl Into<String>, elapsed_ms: f64) -> Self {
        Self {
            status_code: None,
            elapsed_ms: round_ms(elapsed_ms),
            headers: IndexMap::new(),
            size_bytes: 0,
            timestamp: now_timestamp(),
            is_json: false,
            content: ResponseContent::Error(message.into()),
            error: true,
        }
    }

    pub fn status(&self) -> Option<Status> {
        self.status_code.map(Status::new)
    }

    pub fn is_success(&self) -> bool {
        self.status().is_some_and(|s| s.is_success())
    }

    /// 结构化 JSON 内容
    pub fn json(&self) -> Option<&serde_json::Value> {
        match &self.content {
            ResponseContent::Json(value) => Some(value),
            ResponseContent::Text(_) | ResponseContent::Error(_) => None,
        }
    }

    /// 按名称查找 header（不区分大小写）
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// 以 KB 为单位的响应大小
    pub fn size_kb(&self) -> f64 {
        self.size_bytes as f64 / 1024.0
    }

    /// 用于展示的内容文本；JSON 会被格式化
    pub fn content_text(&self) -> String {
        match &self.content {
            ResponseContent::Json(value) => {
                serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
            }
            ResponseContent::Text(text) | ResponseContent::Error(text) => text.clone(),
        }
    }
}

fn round_ms(ms: f64) -> f64 {
    (ms * 100.0).round() / 100.0
}

fn now_timestamp() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}
