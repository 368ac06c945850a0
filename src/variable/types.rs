use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 环境变量表，`{{$name}}` 占位符的取值来源
///
/// 迭代顺序即插入顺序；重复插入同名变量会覆盖旧值并保留原位置。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Environment {
    variables: IndexMap<String, String>,
}

impl Environment {
    /// 创建新的空环境
    pub fn new() -> Self {
        Self::default()
    }

    /// 插入变量
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.variables.insert(key.into(), value.into());
    }

    /// 获取变量值
    pub fn get(&self, key: &str) -> Option<&str> {
        self.variables.get(key).map(|s| s.as_str())
    }

    /// 按键合并：同名覆盖，新变量追加到末尾
    pub fn merge(&mut self, other: Environment) {
        self.variables.extend(other.variables);
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.variables
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// 变量数量
    pub fn len(&self) -> usize {
        self.variables.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Environment {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Environment::new();
        for (k, v) in iter {
            env.insert(k, v);
        }
        env
    }
}

/// 配置文件中的单个命名环境
#[derive(Debug, Clone, Deserialize, Default)]
pub struct EnvironmentProfile {
    #[serde(flatten)]
    pub variables: IndexMap<String, String>,
}

/// `ruprobe.toml` 的完整内容
#[derive(Debug, Clone, Deserialize, Default)]
pub struct ProbeConfig {
    /// 请求超时（秒），缺省为 30
    #[serde(default)]
    pub timeout_secs: Option<u64>,

    /// 所有命名环境
    #[serde(default)]
    pub environments: HashMap<String, EnvironmentProfile>,
}

impl ProbeConfig {
    /// 获取指定环境
    pub fn get_environment(&self, env_name: &str) -> Option<&EnvironmentProfile> {
        self.environments.get(env_name)
    }
}
