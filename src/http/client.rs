use std::error::Error as StdError;
use std::time::Instant;

use indexmap::IndexMap;
use reqwest::header::HeaderMap;
use tracing::{info, warn};

use crate::Result;
use crate::http::request::{Request, RequestBody};
use crate::http::response::ResponseRecord;

#[derive(Clone)]
pub struct Client {
    inner: reqwest::Client,
}

impl Client {
    pub fn new() -> Result<Self> {
        Ok(Self {
            inner: reqwest::Client::builder().build()?,
        })
    }

    /// 发送请求并归一化响应
    ///
    /// 传输层失败（连接、DNS、超时、非法 URL 或 header）不会返回错误，
    /// 而是得到 `error == true` 的 [`ResponseRecord`]。两种情况下都会记录耗时。
    pub async fn execute(&self, request: Request) -> ResponseRecord {
        info!("{} {}", request.method, request.full_url());

        let start = Instant::now();
        let outcome = self.send(request).await;
        let elapsed_ms = start.elapsed().as_secs_f64() * 1000.0;

        match outcome {
            Ok((status, headers, body)) => {
                ResponseRecord::success(status, flatten_headers(&headers), &body, elapsed_ms)
            }
            Err(e) => {
                let message = error_chain(&e);
                warn!("Request failed after {:.2}ms: {}", elapsed_ms, message);
                ResponseRecord::failure(message, elapsed_ms)
            }
        }
    }

    async fn send(
        &self,
        request: Request,
    ) -> std::result::Result<(u16, HeaderMap, Vec<u8>), reqwest::Error> {
        let mut req = self
            .inner
            .request(request.method.into(), request.full_url())
            .timeout(request.timeout);

        for (key, value) in &request.headers {
            req = req.header(key.as_str(), value.as_str());
        }

        if let Some(auth) = &request.auth {
            req = req.basic_auth(&auth.username, Some(&auth.password));
        }

        req = match request.body {
            Some(RequestBody::Json(value)) => req.json(&value),
            Some(RequestBody::Text(text)) => req.body(text),
            None => req,
        };

        let response = req.send().await?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let body = response.bytes().await?;

        Ok((status, headers, body.to_vec()))
    }
}

/// 把 HeaderMap 转成有序的字符串表，同名 header 以 ", " 合并
fn flatten_headers(headers: &HeaderMap) -> IndexMap<String, String> {
    let mut map: IndexMap<String, String> = IndexMap::new();
    for (name, value) in headers {
        let value = String::from_utf8_lossy(value.as_bytes()).into_owned();
        map.entry(name.as_str().to_string())
            .and_modify(|existing| {
                existing.push_str(", ");
                existing.push_str(&value);
            })
            .or_insert(value);
    }
    map
}

/// 拼接错误及其 source 链，得到可读的错误信息
fn error_chain(err: &reqwest::Error) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !message.contains(&text) {
            message.push_str(": ");
            message.push_str(&text);
        }
        source = cause.source();
    }
    message
}
