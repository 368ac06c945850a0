use crate::http::BasicAuth;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// 认证信息在文件中保存为 `[username, password]`，`["", ""]` 表示未设置
pub mod auth_pair {
    use super::*;

    pub fn serialize<S>(auth: &Option<BasicAuth>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let pair = match auth {
            Some(auth) => (auth.username.as_str(), auth.password.as_str()),
            None => ("", ""),
        };
        pair.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<BasicAuth>, D::Error>
    where
        D: Deserializer<'de>,
    {
        // 缺省或 null 与 ["", ""] 等价
        let pair: Option<(String, String)> = Option::deserialize(deserializer)?;
        Ok(pair.and_then(|(username, password)| BasicAuth::from_fields(&username, &password)))
    }
}
