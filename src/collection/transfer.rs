use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::collection::model::Collection;
use crate::variable::Environment;

/// 导入失败的原因；任何失败都不会改动现有状态
#[derive(Error, Debug)]
pub enum ImportError {
    #[error("无效的 JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("文档顶层必须是 JSON 对象")]
    NotAnObject,

    #[error("集合名称不能为空")]
    UnnamedCollection,

    #[error("集合 '{collection}' 中第 {index} 个请求缺少名称")]
    UnnamedRequest { collection: String, index: usize },

    #[error("集合 '{collection}' 中存在重名请求 '{name}'")]
    DuplicateRequest { collection: String, name: String },
}

/// 导入/导出文件的内容：全部集合加上环境变量
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ExportDocument {
    #[serde(default)]
    pub collections: IndexMap<String, Collection>,

    #[serde(default)]
    pub environment_variables: Environment,
}

impl ExportDocument {
    /// 解析并整体校验导入文本，失败时不产生任何部分结果
    pub fn parse(text: &str) -> Result<Self, ImportError> {
        let value: Value = serde_json::from_str(text)?;
        if !value.is_object() {
            return Err(ImportError::NotAnObject);
        }

        let document: ExportDocument = serde_json::from_value(value)?;
        document.validate()?;
        Ok(document)
    }

    /// 集合必须有名称；集合内的请求必须有名称且不重名
    pub fn validate(&self) -> Result<(), ImportError> {
        for (collection_name, collection) in &self.collections {
            if collection_name.trim().is_empty() {
                return Err(ImportError::UnnamedCollection);
            }

            if let Some(index) = collection.iter().position(|r| r.name.trim().is_empty()) {
                return Err(ImportError::UnnamedRequest {
                    collection: collection_name.clone(),
                    index: index + 1,
                });
            }

            if let Some(name) = collection.duplicate_name() {
                return Err(ImportError::DuplicateRequest {
                    collection: collection_name.clone(),
                    name: name.to_string(),
                });
            }
        }
        Ok(())
    }

    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
