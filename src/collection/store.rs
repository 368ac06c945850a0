use indexmap::IndexMap;
use tracing::{info, warn};

use crate::collection::model::{Collection, RequestTemplate};
use crate::error::{Result, RuprobeError};

/// 按名称管理的请求集合，最多一个处于活动状态
#[derive(Debug, Clone, Default)]
pub struct CollectionStore {
    collections: IndexMap<String, Collection>,
    active: Option<String>,
}

impl CollectionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 新建空集合并设为活动集合
    pub fn create_collection(&mut self, name: &str) -> Result<()> {
        let name = name.trim();
        if name.is_empty() {
            return Err(rejected("Collection name must not be empty".to_string()));
        }
        if self.collections.contains_key(name) {
            return Err(rejected(format!("Collection '{}' already exists", name)));
        }

        self.collections.insert(name.to_string(), Collection::new());
        self.active = Some(name.to_string());
        info!("Created collection '{}'", name);
        Ok(())
    }

    pub fn set_active(&mut self, name: &str) -> Result<()> {
        if !self.collections.contains_key(name) {
            return Err(rejected(format!("Collection '{}' does not exist", name)));
        }
        self.active = Some(name.to_string());
        Ok(())
    }

    pub fn active(&self) -> Option<&str> {
        self.active.as_deref()
    }

    /// 把请求追加到指定集合末尾
    pub fn save_request(&mut self, collection: &str, template: RequestTemplate) -> Result<()> {
        if template.name.trim().is_empty() {
            return Err(rejected("Request name must not be empty".to_string()));
        }

        let Some(target) = self.collections.get_mut(collection) else {
            return Err(rejected(format!("Collection '{}' does not exist", collection)));
        };

        if target.contains_name(&template.name) {
            return Err(rejected(format!(
                "Request '{}' already exists in collection '{}'",
                template.name, collection
            )));
        }

        info!("Saved request '{}' to collection '{}'", template.name, collection);
        target.requests.push(template);
        Ok(())
    }

    pub fn save_to_active(&mut self, template: RequestTemplate) -> Result<()> {
        let Some(active) = self.active.clone() else {
            return Err(rejected(
                "No active collection, create or select one first".to_string(),
            ));
        };
        self.save_request(&active, template)
    }

    /// 按位置删除请求，返回被删除的模板
    pub fn delete_request(&mut self, collection: &str, index: usize) -> Result<RequestTemplate> {
        let target = self.collections.get_mut(collection).ok_or_else(|| {
            rejected(format!("Collection '{}' does not exist", collection))
        })?;

        if index >= target.len() {
            return Err(rejected(format!(
                "Collection '{}' has no request #{}",
                collection,
                index + 1
            )));
        }

        let removed = target.requests.remove(index);
        info!(
            "Deleted request '{}' from collection '{}'",
            removed.name, collection
        );
        Ok(removed)
    }

    /// 载入集合中某个位置的请求
    pub fn request(&self, collection: &str, index: usize) -> Result<&RequestTemplate> {
        let target = self
            .collections
            .get(collection)
            .ok_or_else(|| rejected(format!("Collection '{}' does not exist", collection)))?;

        target.get(index).ok_or_else(|| {
            rejected(format!(
                "Collection '{}' has no request #{}",
                collection,
                index + 1
            ))
        })
    }

    pub fn get(&self, name: &str) -> Option<&Collection> {
        self.collections.get(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Collection)> {
        self.collections.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.collections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.collections.is_empty()
    }

    pub fn to_map(&self) -> IndexMap<String, Collection> {
        self.collections.clone()
    }

    /// 同名集合被整体覆盖，其余并入；没有活动集合时激活第一个
    pub fn merge(&mut self, collections: IndexMap<String, Collection>) {
        for (name, collection) in collections {
            self.collections.insert(name, collection);
        }

        if self.active.is_none() {
            self.active = self.collections.keys().next().cloned();
        }
    }
}

fn rejected(message: String) -> RuprobeError {
    warn!("{}", message);
    RuprobeError::UserInput(message)
}
