use crate::history::HistoryEntry;

/// 单个请求是否算作通过
///
/// 传输失败一定不通过；有断言时看断言是否全部通过，没有断言时看状态码是否为 2xx。
pub fn entry_passed(entry: &HistoryEntry) -> bool {
    if entry.response.error {
        return false;
    }
    if entry.assertion_results.is_empty() {
        entry.response.is_success()
    } else {
        entry.assertion_results.iter().all(|a| a.passed)
    }
}

/// 一次集合运行的摘要
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
    pub failed: usize,
    /// 传输失败的请求数（已计入 failed）
    pub errors: usize,
    pub total_elapsed_ms: f64,
    pub total_assertions: usize,
    pub passed_assertions: usize,
    pub failed_assertions: usize,
}

impl RunSummary {
    pub fn from_entries(entries: &[HistoryEntry]) -> Self {
        let passed = entries.iter().filter(|e| entry_passed(e)).count();
        let errors = entries.iter().filter(|e| e.response.error).count();
        let total_elapsed_ms = entries.iter().map(|e| e.response.elapsed_ms).sum();

        let total_assertions = entries.iter().map(|e| e.assertion_results.len()).sum();
        let passed_assertions = entries
            .iter()
            .flat_map(|e| &e.assertion_results)
            .filter(|a| a.passed)
            .count();

        Self {
            total: entries.len(),
            passed,
            failed: entries.len() - passed,
            errors,
            total_elapsed_ms,
            total_assertions,
            passed_assertions,
            failed_assertions: total_assertions - passed_assertions,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assertion::{AssertionKind, AssertionResult};
    use crate::collection::RequestTemplate;
    use crate::http::{Method, ResponseRecord};
    use indexmap::IndexMap;

    fn entry(response: ResponseRecord, results: Vec<AssertionResult>) -> HistoryEntry {
        HistoryEntry::new(
            RequestTemplate::new("r", Method::Get, "http://example.com"),
            response,
            results,
        )
    }

    #[test]
    fn test_summary_counts() {
        let entries = vec![
            entry(
                ResponseRecord::success(404, IndexMap::new(), b"", 100.0),
                vec![AssertionResult::new(AssertionKind::StatusCode, "404", "404", true)],
            ),
            entry(
                ResponseRecord::success(200, IndexMap::new(), b"", 50.0),
                vec![AssertionResult::new(AssertionKind::StatusCode, "201", "200", false)],
            ),
            entry(ResponseRecord::success(204, IndexMap::new(), b"", 25.0), Vec::new()),
            entry(ResponseRecord::failure("refused", 5.0), Vec::new()),
        ];

        let summary = RunSummary::from_entries(&entries);
        assert_eq!(summary.total, 4);
        assert_eq!(summary.passed, 2);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.errors, 1);
        assert_eq!(summary.total_elapsed_ms, 180.0);
        assert_eq!(summary.total_assertions, 2);
        assert_eq!(summary.passed_assertions, 1);
        assert_eq!(summary.failed_assertions, 1);
        assert!(!summary.all_passed());
    }

    #[test]
    fn test_failed_status_without_assertions() {
        let failed = entry(
            ResponseRecord::success(500, IndexMap::new(), b"", 1.0),
            Vec::new(),
        );
        assert!(!entry_passed(&failed));
    }
}
