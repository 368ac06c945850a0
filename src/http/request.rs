use std::time::Duration;

use indexmap::IndexMap;
use tracing::debug;

use crate::collection::RequestTemplate;
use crate::http::types::{BasicAuth, Method, normalize_url};

/// 请求默认超时
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// 出站请求体
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// 声明了 JSON content-type 且 body 能解析为 JSON
    Json(serde_json::Value),
    /// 原样发送的文本
    Text(String),
}

/// 可直接交给 [`crate::http::Client`] 发送的请求
#[derive(Debug, Clone, PartialEq)]
pub struct Request {
    pub method: Method,
    /// 已补全 scheme 的 URL
    pub url: String,
    pub headers: IndexMap<String, String>,
    pub query_params: IndexMap<String, String>,
    pub body: Option<RequestBody>,
    /// 只有用户名和密码都非空时才存在
    pub auth: Option<BasicAuth>,
    pub timeout: Duration,
}

impl Request {
    /// 从（已做变量替换的）模板构建请求
    pub fn from_template(template: &RequestTemplate, timeout: Duration) -> Self {
        RequestBuilder::new(template.method, &template.url)
            .headers(template.headers.clone())
            .params(template.params.clone())
            .body(&template.body)
            .auth(template.auth.clone())
            .timeout(timeout)
            .build()
    }

    /// 带 query 参数的完整 URL；URL 无法解析时原样返回，由发送阶段报错
    pub fn full_url(&self) -> String {
        if self.query_params.is_empty() {
            return self.url.clone();
        }
        url::Url::parse_with_params(&self.url, &self.query_params)
            .map(|u| u.to_string())
            .unwrap_or_else(|_| self.url.clone())
    }
}

/// 把松散的用户输入组装成 [`Request`]
///
/// 构建过程不会失败：非法 JSON body 退化为文本 body，非法 URL 或 header
/// 留到发送时作为传输错误处理。
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    url: String,
    headers: IndexMap<String, String>,
    params: IndexMap<String, String>,
    body: String,
    auth: Option<BasicAuth>,
    timeout: Duration,
}

impl RequestBuilder {
    pub fn new(method: Method, url: &str) -> Self {
        Self {
            method,
            url: url.to_string(),
            headers: IndexMap::new(),
            params: IndexMap::new(),
            body: String::new(),
            auth: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn header(mut self, key: &str, value: &str) -> Self {
        self.headers.insert(key.to_string(), value.to_string());
        self
    }

    pub fn headers(mut self, headers: IndexMap<String, String>) -> Self {
        self.headers.extend(headers);
        self
    }

    pub fn query(mut self, key: &str, value: &str) -> Self {
        self.params.insert(key.to_string(), value.to_string());
        self
    }

    pub fn params(mut self, params: IndexMap<String, String>) -> Self {
        self.params.extend(params);
        self
    }

    pub fn body(mut self, body: &str) -> Self {
        self.body = body.to_string();
        self
    }

    pub fn auth(mut self, auth: Option<BasicAuth>) -> Self {
        self.auth = auth;
        self
    }

    pub fn basic_auth(self, username: &str, password: &str) -> Self {
        self.auth(Some(BasicAuth::new(username, password)))
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn build(self) -> Request {
        let body = self.interpret_body();
        let auth = self.auth.filter(BasicAuth::is_complete);

        Request {
            method: self.method,
            url: normalize_url(&self.url),
            headers: self.headers,
            query_params: self.params,
            body,
            auth,
            timeout: self.timeout,
        }
    }

    /// 是否声明了 JSON content-type（header 名不区分大小写）
    fn declares_json(&self) -> bool {
        self.headers.iter().any(|(name, value)| {
            name.eq_ignore_ascii_case("content-type")
                && value.to_lowercase().contains("application/json")
        })
    }

    fn interpret_body(&self) -> Option<RequestBody> {
        if self.body.is_empty() {
            return None;
        }

        if !self.declares_json() {
            return Some(RequestBody::Text(self.body.clone()));
        }

        match serde_json::from_str(&self.body) {
            Ok(value) => Some(RequestBody::Json(value)),
            Err(e) => {
                debug!("Body is not valid JSON, sending as text: {}", e);
                Some(RequestBody::Text(self.body.clone()))
            }
        }
    }
}
