use crate::Result;
use crate::collection::RequestTemplate;
use crate::error::RuprobeError;
use crate::history::HistoryEntry;
use crate::http::Client;
use crate::session::Session;
use tracing::info;

/// 依次发送集合中保存的请求
pub struct CollectionRunner {
    client: Client,
}

impl CollectionRunner {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// 按保存顺序发送集合中的全部请求
    pub async fn run_collection(
        &self,
        session: &mut Session,
        collection: &str,
    ) -> Result<Vec<HistoryEntry>> {
        let templates: Vec<RequestTemplate> = session
            .collections
            .get(collection)
            .ok_or_else(|| {
                RuprobeError::UserInput(format!("Collection '{}' does not exist", collection))
            })?
            .iter()
            .cloned()
            .collect();

        info!(
            "Running {} requests from collection '{}'",
            templates.len(),
            collection
        );

        let mut entries = Vec::with_capacity(templates.len());
        for template in &templates {
            entries.push(session.send(&self.client, template).await.clone());
        }
        Ok(entries)
    }

    /// 载入集合中某个请求并发送
    pub async fn run_one(
        &self,
        session: &mut Session,
        collection: &str,
        index: usize,
    ) -> Result<HistoryEntry> {
        let template = session.collections.request(collection, index)?.clone();
        Ok(session.send(&self.client, &template).await.clone())
    }
}
