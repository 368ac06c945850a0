use super::model::{ComparisonRow, HistoryEntry};
use crate::assertion::AssertionResult;
use crate::collection::RequestTemplate;
use crate::http::ResponseRecord;
use tracing::debug;

/// 会话内的请求历史，最新的在前
///
/// 不限制条数，也不去重。
#[derive(Debug, Clone, Default)]
pub struct HistoryStore {
    entries: Vec<HistoryEntry>,
}

impl HistoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 记录一次请求，插入到最前面
    pub fn record(
        &mut self,
        request: RequestTemplate,
        response: ResponseRecord,
        assertion_results: Vec<AssertionResult>,
    ) -> &HistoryEntry {
        let entry = HistoryEntry::new(request, response, assertion_results);
        debug!("Recording history entry {}", entry.id);
        self.entries.insert(0, entry);
        &self.entries[0]
    }

    /// 位置 0 是最新的记录
    pub fn get(&self, index: usize) -> Option<&HistoryEntry> {
        self.entries.get(index)
    }

    /// 按位置挑选记录，不存在的位置直接跳过
    pub fn select(&self, indices: &[usize]) -> Vec<&HistoryEntry> {
        indices.iter().filter_map(|&i| self.entries.get(i)).collect()
    }

    /// 对选中的记录生成对比行
    pub fn compare(&self, indices: &[usize]) -> Vec<ComparisonRow> {
        self.select(indices)
            .into_iter()
            .map(ComparisonRow::from)
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
