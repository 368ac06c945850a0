use crate::error::{Result, RuprobeError};
use crate::http::DEFAULT_TIMEOUT;
use crate::variable::resolver::VariableResolver;
use crate::variable::types::{Environment, ProbeConfig};
use std::fs;
use std::path::Path;
use std::time::Duration;

/// 配置文件加载器
pub struct ConfigLoader;

impl ConfigLoader {
    /// 配置文件名
    const CONFIG_FILE: &'static str = "ruprobe.toml";

    /// 从指定路径加载配置文件
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<ProbeConfig> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            RuprobeError::ConfigError(format!("Failed to read config file: {}", e))
        })?;

        toml::from_str(&content)
            .map_err(|e| RuprobeError::ConfigError(format!("Failed to parse config file: {}", e)))
    }

    /// 查找并加载配置文件
    /// 查找顺序：
    /// 1. 当前目录及其父目录
    /// 2. 用户配置目录 ~/.config/ruprobe/
    pub fn find_and_load() -> Option<ProbeConfig> {
        Self::try_load_from_current_dir().or_else(Self::try_load_from_user_dir)
    }

    fn try_load_from_current_dir() -> Option<ProbeConfig> {
        let mut current = std::env::current_dir().ok()?;

        loop {
            let config_path = current.join(Self::CONFIG_FILE);
            if config_path.exists() {
                return Self::load_from_path(&config_path).ok();
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    fn try_load_from_user_dir() -> Option<ProbeConfig> {
        let home = dirs::home_dir()?;
        let config_path = home.join(".config").join("ruprobe").join(Self::CONFIG_FILE);

        if config_path.exists() {
            Self::load_from_path(&config_path).ok()
        } else {
            None
        }
    }

    /// 构建环境变量表
    ///
    /// 优先级从低到高：`base`（例如导入文件中的变量）、配置文件中的命名环境、CLI `--var`。
    pub fn build_environment(
        base: Environment,
        config: &ProbeConfig,
        env_name: Option<&str>,
        cli_vars: &[(String, String)],
    ) -> Result<Environment> {
        let mut environment = base;

        if let Some(name) = env_name {
            let profile = config.get_environment(name).ok_or_else(|| {
                RuprobeError::ConfigError(format!("Environment '{}' not found", name))
            })?;
            for (key, value) in &profile.variables {
                environment.insert(key.clone(), VariableResolver::resolve_env_vars(value));
            }
        }

        for (key, value) in cli_vars {
            environment.insert(key.clone(), value.clone());
        }

        Ok(environment)
    }

    /// 配置中的请求超时
    pub fn timeout(config: &ProbeConfig) -> Duration {
        config
            .timeout_secs
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_TIMEOUT)
    }

    /// 解析 CLI 变量参数 "key=value"
    pub fn parse_cli_var(s: &str) -> Option<(String, String)> {
        s.split_once('=')
            .map(|(k, v)| (k.trim().to_string(), v.trim().to_string()))
    }
}
