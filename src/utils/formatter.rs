use crate::http::{ResponseContent, ResponseRecord};
use colored::*;

/// compact 模式下超过该长度的 body 只显示大小
const COMPACT_BODY_LIMIT: usize = 200;

pub enum ResponseFormat {
    Compact,
    Verbose,
}

pub struct ResponseFormatter {
    format: ResponseFormat,
    color: bool,
    show_body: bool,
    show_headers: bool,
}

impl ResponseFormatter {
    pub fn new(format: ResponseFormat) -> Self {
        Self {
            format,
            color: true,
            show_body: true,
            show_headers: true,
        }
    }

    pub fn without_color(mut self) -> Self {
        self.color = false;
        self
    }

    pub fn format(&self, response: &ResponseRecord) -> String {
        let mut output = vec![self.status_line(response), self.metrics_line(response)];

        if response.error {
            return output.join("\n");
        }

        match self.format {
            ResponseFormat::Compact => {
                if self.show_body {
                    let body = response.content_text();
                    if !body.is_empty() && body.len() < COMPACT_BODY_LIMIT {
                        output.push(body);
                    } else if !body.is_empty() {
                        output.push(format!("Body: {} bytes", response.size_bytes));
                    }
                }
            }
            ResponseFormat::Verbose => {
                if self.show_headers && !response.headers.is_empty() {
                    output.push(String::new());
                    output.push(self.paint("Headers:", |s| s.blue().bold()));
                    for (key, value) in &response.headers {
                        output.push(self.paint(&format!("   {}: {}", key, value), |s| s.blue()));
                    }
                }

                if self.show_body && response.size_bytes > 0 {
                    output.push(String::new());
                    let title = if response.is_json { "Body (JSON):" } else { "Body:" };
                    output.push(self.paint(title, |s| s.blue().bold()));
                    output.push(response.content_text());
                }
            }
        }

        output.join("\n")
    }

    fn status_line(&self, response: &ResponseRecord) -> String {
        let Some(status) = response.status() else {
            let message = match &response.content {
                ResponseContent::Error(message) => message.as_str(),
                ResponseContent::Json(_) | ResponseContent::Text(_) => "",
            };
            return self.paint(&format!("Request failed: {}", message), |s| s.red().bold());
        };

        let line = format!("HTTP {} {}", status.code(), status.reason_phrase());
        if status.is_success() {
            self.paint(&line, |s| s.green().bold())
        } else if status.is_redirect() {
            self.paint(&line, |s| s.cyan().bold())
        } else if status.is_client_error() {
            self.paint(&line, |s| s.yellow().bold())
        } else if status.is_server_error() {
            self.paint(&line, |s| s.red().bold())
        } else {
            self.paint(&line, |s| s.bold())
        }
    }

    fn metrics_line(&self, response: &ResponseRecord) -> String {
        let line = format!(
            "Time: {}ms  Size: {:.2} KB  At: {}",
            response.elapsed_ms,
            response.size_kb(),
            response.timestamp
        );
        self.paint(&line, |s| s.cyan())
    }

    fn paint(&self, text: &str, style: impl Fn(&str) -> ColoredString) -> String {
        if self.color {
            style(text).to_string()
        } else {
            text.to_string()
        }
    }
}
