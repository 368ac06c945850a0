use std::borrow::Cow;
use std::path::Path;
use std::time::Duration;

use tracing::info;

use crate::assertion::evaluate;
use crate::collection::{CollectionStore, ExportDocument, ImportError, RequestTemplate};
use crate::error::Result;
use crate::history::{HistoryEntry, HistoryStore};
use crate::http::{Client, DEFAULT_TIMEOUT, Request};
use crate::variable::{Environment, VariableResolver};

/// 一次会话的全部状态：环境变量、请求集合和历史
///
/// `overlay` 保存配置文件和命令行提供的变量，只参与替换，不会被导出。
#[derive(Debug, Clone)]
pub struct Session {
    pub environment: Environment,
    pub collections: CollectionStore,
    pub history: HistoryStore,
    overlay: Environment,
    timeout: Duration,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self::with_environment(Environment::new())
    }

    pub fn with_environment(environment: Environment) -> Self {
        Self {
            environment,
            collections: CollectionStore::new(),
            history: HistoryStore::new(),
            overlay: Environment::new(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn set_variable(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.environment.insert(name, value);
    }

    /// 设置运行期变量，同名时优先于 `environment`
    pub fn set_overlay(&mut self, overlay: Environment) {
        self.overlay = overlay;
    }

    /// 替换时实际使用的变量表
    pub fn effective_environment(&self) -> Cow<'_, Environment> {
        if self.overlay.is_empty() {
            return Cow::Borrowed(&self.environment);
        }
        let mut merged = self.environment.clone();
        merged.merge(self.overlay.clone());
        Cow::Owned(merged)
    }

    /// 变量替换、构建、发送、断言，然后写入历史
    ///
    /// 历史中保存的是替换前的模板。
    pub async fn send(&mut self, client: &Client, template: &RequestTemplate) -> &HistoryEntry {
        let resolved = VariableResolver::resolve_template(template, &self.effective_environment());
        let request = Request::from_template(&resolved, self.timeout);

        let response = client.execute(request).await;
        let results = evaluate(&response, &template.assertions);

        info!(
            "{} -> {} ({}ms)",
            template.label(),
            response
                .status_code
                .map(|c| c.to_string())
                .unwrap_or_else(|| "error".to_string()),
            response.elapsed_ms
        );

        self.history.record(template.clone(), response, results)
    }

    /// 导出全部集合和环境变量，不含运行期变量
    pub fn export_all(&self) -> ExportDocument {
        ExportDocument {
            collections: self.collections.to_map(),
            environment_variables: self.environment.clone(),
        }
    }

    pub fn export_to_file(&self, path: &Path) -> Result<()> {
        let document = self.export_all();
        std::fs::write(path, document.to_json_pretty()?)?;
        info!(
            "Exported {} collections to {}",
            document.collections.len(),
            path.display()
        );
        Ok(())
    }

    /// 导入文档文本；解析或校验失败时状态保持不变
    pub fn import_all(&mut self, text: &str) -> Result<()> {
        let document = ExportDocument::parse(text)?;
        self.import_document(document)?;
        Ok(())
    }

    pub fn import_from_file(&mut self, path: &Path) -> Result<()> {
        let text = std::fs::read_to_string(path)?;
        self.import_all(&text)
    }

    /// 同名集合和变量被覆盖，其余保留
    pub fn import_document(
        &mut self,
        document: ExportDocument,
    ) -> std::result::Result<(), ImportError> {
        document.validate()?;

        info!(
            "Importing {} collections and {} variables",
            document.collections.len(),
            document.environment_variables.len()
        );
        self.collections.merge(document.collections);
        self.environment.merge(document.environment_variables);
        Ok(())
    }
}
