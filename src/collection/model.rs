use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::assertion::AssertionSpec;
use crate::collection::serialization;
use crate::http::{BasicAuth, Method};

/// 请求模板：用户输入的逻辑请求，保存前不做变量替换
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RequestTemplate {
    /// 在所属集合内唯一；未保存的临时请求可以为空
    #[serde(default)]
    pub name: String,

    #[serde(default)]
    pub method: Method,

    pub url: String,

    #[serde(default)]
    pub headers: IndexMap<String, String>,

    #[serde(default)]
    pub params: IndexMap<String, String>,

    /// 原始 body 文本，是否按 JSON 发送由 content-type 决定
    #[serde(default)]
    pub body: String,

    #[serde(with = "serialization::auth_pair", default)]
    pub auth: Option<BasicAuth>,

    #[serde(rename = "test_assertions", default)]
    pub assertions: Vec<AssertionSpec>,
}

impl RequestTemplate {
    pub fn new(name: impl Into<String>, method: Method, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            method,
            url: url.into(),
            ..Default::default()
        }
    }

    /// 列表和历史中展示用的 `METHOD url`
    pub fn label(&self) -> String {
        format!("{} {}", self.method, self.url)
    }
}

/// 一组有序的请求模板
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Collection {
    pub requests: Vec<RequestTemplate>,
}

impl Collection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.requests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&RequestTemplate> {
        self.requests.get(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &RequestTemplate> {
        self.requests.iter()
    }

    pub fn contains_name(&self, name: &str) -> bool {
        self.requests.iter().any(|r| r.name == name)
    }

    /// 第一个重复出现的请求名
    pub fn duplicate_name(&self) -> Option<&str> {
        self.requests
            .iter()
            .enumerate()
            .find(|(i, r)| self.requests[..*i].iter().any(|prev| prev.name == r.name))
            .map(|(_, r)| r.name.as_str())
    }
}

impl From<Vec<RequestTemplate>> for Collection {
    fn from(requests: Vec<RequestTemplate>) -> Self {
        Self { requests }
    }
}
