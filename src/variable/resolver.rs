use crate::collection::RequestTemplate;
use crate::variable::types::Environment;
use regex::{Captures, Regex};
use std::sync::OnceLock;
use tracing::debug;

const PLACEHOLDER_OPEN: &str = "{{$";
const PLACEHOLDER_CLOSE: &str = "}}";

/// 变量替换器
pub struct VariableResolver;

impl VariableResolver {
    /// 替换文本中所有 `{{$name}}` 占位符
    ///
    /// 单次从左到右扫描：替换进来的值不会再被展开，结果与变量表的迭代顺序无关。
    /// 变量表中不存在的占位符保持原样。
    ///
    /// 注意：如果某个值本身包含已知变量的 `{{$name}}`，该占位符会原样留在结果中，
    /// 即结果里仍可能出现已定义变量的字面占位符。逐个变量依次替换的做法会把它展开。
    pub fn resolve(text: &str, env: &Environment) -> String {
        if text.is_empty() || env.is_empty() || !text.contains(PLACEHOLDER_OPEN) {
            return text.to_string();
        }

        let mut output = String::with_capacity(text.len());
        let mut rest = text;

        while let Some(start) = rest.find(PLACEHOLDER_OPEN) {
            output.push_str(&rest[..start]);
            let after_open = &rest[start + PLACEHOLDER_OPEN.len()..];

            let Some(end) = after_open.find(PLACEHOLDER_CLOSE) else {
                // 没有闭合的占位符，剩余部分原样输出
                output.push_str(&rest[start..]);
                return output;
            };

            let name = &after_open[..end];
            match env.get(name) {
                Some(value) => {
                    output.push_str(value);
                    rest = &after_open[end + PLACEHOLDER_CLOSE.len()..];
                }
                None => {
                    // 只跳过 "{{$"，以便 "{{$a{{$b}}" 中的 b 仍能被替换
                    output.push_str(PLACEHOLDER_OPEN);
                    rest = after_open;
                }
            }
        }

        output.push_str(rest);
        output
    }

    /// 对请求模板中的 URL、header 值、query 参数值和 body 做变量替换
    ///
    /// header 名、参数名以及认证字段不参与替换。
    pub fn resolve_template(template: &RequestTemplate, env: &Environment) -> RequestTemplate {
        debug!(
            "Resolving {} variables for request '{}'",
            env.len(),
            template.name
        );

        RequestTemplate {
            url: Self::resolve(&template.url, env),
            headers: template
                .headers
                .iter()
                .map(|(k, v)| (k.clone(), Self::resolve(v, env)))
                .collect(),
            params: template
                .params
                .iter()
                .map(|(k, v)| (k.clone(), Self::resolve(v, env)))
                .collect(),
            body: Self::resolve(&template.body, env),
            ..template.clone()
        }
    }

    /// 解析并替换系统环境变量 ${VAR}
    pub fn resolve_env_vars(text: &str) -> String {
        static ENV_REGEX: OnceLock<Regex> = OnceLock::new();
        let re = ENV_REGEX
            .get_or_init(|| Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").expect("valid env var regex"));

        re.replace_all(text, |caps: &Captures| {
            let env_name = &caps[1];
            std::env::var(env_name).unwrap_or_else(|_| caps[0].to_string())
        })
        .to_string()
    }
}
