use chrono::{DateTime, Local};
use serde::Serialize;
use uuid::Uuid;

use crate::assertion::{AssertionResult, AssertionSummary};
use crate::collection::RequestTemplate;
use crate::http::ResponseRecord;

/// 历史记录条目，创建后不再修改
#[derive(Debug, Clone, Serialize)]
pub struct HistoryEntry {
    /// 唯一 ID (UUID v4)
    pub id: String,

    /// 请求快照（变量替换前的原始输入）
    pub request: RequestTemplate,

    pub response: ResponseRecord,

    pub assertion_results: Vec<AssertionResult>,

    /// 记录时间
    pub timestamp: DateTime<Local>,
}

impl HistoryEntry {
    pub fn new(
        request: RequestTemplate,
        response: ResponseRecord,
        assertion_results: Vec<AssertionResult>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            request,
            response,
            assertion_results,
            timestamp: Local::now(),
        }
    }

    pub fn assertion_summary(&self) -> AssertionSummary {
        AssertionSummary::from_results(&self.assertion_results)
    }

    /// 历史列表中 Method/URL 列的内容
    pub fn label(&self) -> String {
        self.request.label()
    }
}

/// 多条历史记录对比时的一行
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonRow {
    /// `METHOD url`
    pub request: String,
    pub status_code: Option<u16>,
    pub elapsed_ms: f64,
    pub size_kb: f64,
}

impl From<&HistoryEntry> for ComparisonRow {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            request: entry.label(),
            status_code: entry.response.status_code,
            elapsed_ms: entry.response.elapsed_ms,
            size_kb: entry.response.size_kb(),
        }
    }
}
