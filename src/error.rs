use thiserror::Error;

#[derive(Error, Debug)]
pub enum RuprobeError {
    #[error("解析错误: {0}")]
    ParseError(String),

    #[error("HTTP 请求失败: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO 错误: {0}")]
    IoError(#[from] std::io::Error),

    #[error("JSON 解析错误: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("配置错误: {0}")]
    ConfigError(String),

    #[error("导入失败: {0}")]
    Import(#[from] crate::collection::ImportError),

    /// 用户输入不完整或冲突，调用方应提示用户修改后重试
    #[error("{0}")]
    UserInput(String),

    #[error("{0}")]
    Other(String),
}

impl From<anyhow::Error> for RuprobeError {
    fn from(err: anyhow::Error) -> Self {
        RuprobeError::Other(err.to_string())
    }
}

impl From<crate::assertion::AssertError> for RuprobeError {
    fn from(err: crate::assertion::AssertError) -> Self {
        RuprobeError::ParseError(err.to_string())
    }
}

/// Result type for ruprobe crate
pub type Result<T> = std::result::Result<T, RuprobeError>;
