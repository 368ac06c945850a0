use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use comfy_table::Table;
use comfy_table::presets::UTF8_FULL;
use indexmap::IndexMap;

use ruprobe::assertion::{AssertionSpec, RawAssertion, parse_assertion};
use ruprobe::collection::RequestTemplate;
use ruprobe::history::{print_comparison, print_history};
use ruprobe::http::{BasicAuth, Client, Method};
use ruprobe::input::parse_json_map;
use ruprobe::runner::{CollectionRunner, RunSummary, TestReporter};
use ruprobe::session::Session;
use ruprobe::variable::{ConfigLoader, Environment, ProbeConfig};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// 配置文件路径（默认在当前目录及父目录查找 ruprobe.toml）
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// 使用配置文件中的命名环境
    #[arg(long, global = true)]
    pub env: Option<String>,

    /// 设置变量，可多次使用: --var host=api.test
    #[arg(long = "var", value_name = "KEY=VALUE", global = true)]
    pub vars: Vec<String>,

    /// 请求超时（秒），覆盖配置文件
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// 显示详细输出和 debug 日志
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// 发送单个请求
    Send(SendArgs),

    /// 运行集合文件中的请求
    Run {
        /// 导出的集合文件
        file: PathBuf,

        /// 要运行的集合，默认使用活动集合
        #[arg(long)]
        collection: Option<String>,

        /// 只运行第 N 个请求（从 1 开始）
        #[arg(long)]
        request: Option<usize>,

        /// 运行后打印耗时与大小对比
        #[arg(long)]
        compare: bool,
    },

    /// 列出集合文件中的集合和请求
    List {
        file: PathBuf,
    },

    /// 合并多个集合文件，同名集合和变量以后面的文件为准
    Merge {
        #[arg(required = true)]
        files: Vec<PathBuf>,

        #[arg(short, long)]
        output: PathBuf,
    },
}

#[derive(Args, Debug)]
pub struct SendArgs {
    /// HTTP 方法
    pub method: String,

    /// 请求 URL，缺少 scheme 时使用 https://
    pub url: String,

    /// JSON 对象形式的 headers
    #[arg(long, short = 'H')]
    pub headers: Option<String>,

    /// JSON 对象形式的 query 参数
    #[arg(long, short = 'p')]
    pub params: Option<String>,

    /// 请求体原文
    #[arg(long, short = 'd', default_value = "")]
    pub body: String,

    #[arg(long, default_value = "")]
    pub user: String,

    #[arg(long, default_value = "")]
    pub password: String,

    /// 断言，可多次使用: --assert status_code=200
    #[arg(long = "assert", value_name = "TYPE=EXPECTED")]
    pub assertions: Vec<String>,

    /// 发送前导入该文件中的环境变量；配合 --save 时请求也保存到这里
    #[arg(long)]
    pub file: Option<PathBuf>,

    /// 保存请求到 --file 指定文件中的集合
    #[arg(long, requires_all = ["file", "name"])]
    pub collection: Option<String>,

    /// 保存时使用的请求名
    #[arg(long)]
    pub name: Option<String>,
}

pub async fn run(cli: Cli) -> Result<()> {
    let config = load_config(cli.config.as_deref())?;
    let timeout = cli
        .timeout
        .map(Duration::from_secs)
        .unwrap_or_else(|| ConfigLoader::timeout(&config));

    let mut session = Session::new().with_timeout(timeout);
    let client = Client::new().context("Failed to create HTTP client")?;

    match cli.command {
        Commands::Send(args) => {
            if let Some(file) = &args.file
                && file.exists()
            {
                session.import_from_file(file)?;
            }
            apply_environment(&mut session, &config, cli.env.as_deref(), &cli.vars)?;
            send(&mut session, &client, args, cli.verbose).await
        }
        Commands::Run {
            file,
            collection,
            request,
            compare,
        } => {
            session.import_from_file(&file)?;
            apply_environment(&mut session, &config, cli.env.as_deref(), &cli.vars)?;
            run_collection(&mut session, client, collection, request, compare, cli.verbose).await
        }
        Commands::List { file } => {
            session.import_from_file(&file)?;
            list_collections(&session);
            Ok(())
        }
        Commands::Merge { files, output } => {
            for file in &files {
                session
                    .import_from_file(file)
                    .with_context(|| format!("Failed to import {}", file.display()))?;
            }
            session.export_to_file(&output)?;
            println!(
                "{} {} collections into {}",
                "Merged".green().bold(),
                session.collections.len(),
                output.display()
            );
            Ok(())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<ProbeConfig> {
    match path {
        Some(path) => Ok(ConfigLoader::load_from_path(path)?),
        None => Ok(ConfigLoader::find_and_load().unwrap_or_default()),
    }
}

fn apply_environment(
    session: &mut Session,
    config: &ProbeConfig,
    env_name: Option<&str>,
    vars: &[String],
) -> Result<()> {
    let cli_vars = vars
        .iter()
        .map(|v| {
            ConfigLoader::parse_cli_var(v)
                .with_context(|| format!("Invalid variable '{}', expected KEY=VALUE", v))
        })
        .collect::<Result<Vec<_>>>()?;

    session.set_overlay(ConfigLoader::build_environment(
        Environment::new(),
        config,
        env_name,
        &cli_vars,
    )?);
    Ok(())
}

/// 从命令行参数组装请求模板
pub fn build_template(args: &SendArgs) -> Result<RequestTemplate> {
    let method = Method::parse(&args.method)?;
    let mut template = RequestTemplate::new(
        args.name.clone().unwrap_or_default(),
        method,
        args.url.clone(),
    );

    template.headers = json_map_arg(args.headers.as_deref(), "headers");
    template.params = json_map_arg(args.params.as_deref(), "params");
    template.body = args.body.clone();
    template.auth = BasicAuth::from_fields(&args.user, &args.password);
    template.assertions = args
        .assertions
        .iter()
        .map(String::as_str)
        .map(parse_assertion_arg)
        .collect::<Result<Vec<_>>>()?;

    Ok(template)
}

/// 无效的 JSON 只提示，不中断发送
fn json_map_arg(text: Option<&str>, what: &str) -> IndexMap<String, String> {
    let input = parse_json_map(text.unwrap_or_default());
    if let Some(error) = &input.error {
        eprintln!("{} {}: {}", "Warning".yellow().bold(), what, error);
    }
    input.map
}

fn parse_assertion_arg(arg: &str) -> Result<AssertionSpec> {
    let Some((kind, expected)) = arg.split_once('=') else {
        bail!("Invalid assertion '{}', expected TYPE=EXPECTED", arg);
    };
    let spec = parse_assertion(&RawAssertion::new(kind.trim(), expected.trim()))
        .with_context(|| format!("Invalid assertion '{}'", arg))?;
    Ok(spec)
}

async fn send(
    session: &mut Session,
    client: &Client,
    args: SendArgs,
    verbose: bool,
) -> Result<()> {
    let template = build_template(&args)?;

    let entry = session.send(client, &template).await.clone();
    TestReporter::new(verbose).print_entry(1, &entry);

    if let (Some(file), Some(collection)) = (&args.file, &args.collection) {
        if session.collections.get(collection).is_none() {
            session.collections.create_collection(collection)?;
        }
        session.collections.save_request(collection, template)?;
        session.export_to_file(file)?;
        println!(
            "{} request '{}' to {} ({})",
            "Saved".green().bold(),
            entry.request.name,
            collection,
            file.display()
        );
    }

    Ok(())
}

async fn run_collection(
    session: &mut Session,
    client: Client,
    collection: Option<String>,
    request: Option<usize>,
    compare: bool,
    verbose: bool,
) -> Result<()> {
    let Some(collection) = collection.or_else(|| session.collections.active().map(String::from))
    else {
        bail!("No collection to run");
    };

    let runner = CollectionRunner::new(client);
    let reporter = TestReporter::new(verbose);

    let entries = match request {
        Some(0) => bail!("Request numbers start at 1"),
        Some(number) => {
            reporter.print_header(&collection, 1);
            vec![runner.run_one(session, &collection, number - 1).await?]
        }
        None => {
            let total = session.collections.get(&collection).map_or(0, |c| c.len());
            reporter.print_header(&collection, total);
            runner.run_collection(session, &collection).await?
        }
    };

    for (index, entry) in entries.iter().enumerate() {
        reporter.print_entry(index + 1, entry);
    }

    let summary = RunSummary::from_entries(&entries);
    reporter.print_summary(&summary);

    if verbose {
        print_history(session.history.iter());
    }
    if compare {
        let indices: Vec<usize> = (0..session.history.len()).collect();
        print_comparison(&session.history.compare(&indices));
    }

    if !summary.all_passed() {
        bail!("{} of {} requests failed", summary.failed, summary.total);
    }
    Ok(())
}

fn list_collections(session: &Session) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_header(vec!["Collection", "#", "Name", "Request", "Assertions"]);

    for (name, collection) in session.collections.iter() {
        let marker = if session.collections.active() == Some(name) {
            format!("{} *", name)
        } else {
            name.to_string()
        };

        if collection.is_empty() {
            table.add_row(vec![
                marker,
                "-".to_string(),
                String::new(),
                String::new(),
                String::new(),
            ]);
            continue;
        }
        for (index, template) in collection.iter().enumerate() {
            table.add_row(vec![
                marker.clone(),
                (index + 1).to_string(),
                template.name.clone(),
                template.label(),
                template.assertions.len().to_string(),
            ]);
        }
    }

    println!("{}", table);
    println!("{} variables in environment", session.environment.len());
}

#[cfg(test)]
mod tests {
    use super::*;

    fn send_args(args: &[&str]) -> SendArgs {
        let mut argv = vec!["ruprobe", "send"];
        argv.extend_from_slice(args);
        match Cli::try_parse_from(argv).unwrap().command {
            Commands::Send(args) => args,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_config_and_cli_vars_stay_out_of_saved_file() {
        let config: ProbeConfig = toml::from_str(
            r#"
[environments.prod]
api_key = "prod-secret"
"#,
        )
        .unwrap();

        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("c.json");

        let mut session = Session::new();
        session.set_variable("host", "api.test");
        apply_environment(&mut session, &config, Some("prod"), &["tok=cli-secret".to_string()])
            .unwrap();
        assert_eq!(session.effective_environment().get("tok"), Some("cli-secret"));
        assert_eq!(session.effective_environment().get("api_key"), Some("prod-secret"));

        session.collections.create_collection("c").unwrap();
        let args = send_args(&["GET", "{{$host}}/x", "-H", r#"{"X-Key": "{{$api_key}}"}"#]);
        session
            .collections
            .save_to_active(RequestTemplate {
                name: "x".to_string(),
                ..build_template(&args).unwrap()
            })
            .unwrap();
        session.export_to_file(&file).unwrap();

        let written = std::fs::read_to_string(&file).unwrap();
        assert!(!written.contains("prod-secret"));
        assert!(!written.contains("cli-secret"));
        assert!(written.contains("api.test"));
    }

    #[test]
    fn test_parse_send_command() {
        let cli = Cli::try_parse_from([
            "ruprobe", "--env", "dev", "--var", "host=a.test", "send", "post", "a.test/items",
        ])
        .unwrap();
        assert_eq!(cli.env.as_deref(), Some("dev"));
        assert_eq!(cli.vars, vec!["host=a.test"]);
        assert!(matches!(cli.command, Commands::Send(_)));
    }

    #[test]
    fn test_build_template() {
        let args = send_args(&[
            "POST",
            "{{$host}}/items",
            "-H",
            r#"{"Content-Type": "application/json"}"#,
            "-p",
            r#"{"page": 2}"#,
            "-d",
            r#"{"a":1}"#,
            "--user",
            "alice",
            "--assert",
            "status_code=201",
            "--assert",
            "json_path=data.id == 7",
        ]);

        let template = build_template(&args).unwrap();
        assert_eq!(template.method, Method::Post);
        assert_eq!(template.headers["Content-Type"], "application/json");
        assert_eq!(template.params["page"], "2");
        assert_eq!(template.auth, Some(BasicAuth::new("alice", "")));
        assert_eq!(template.assertions.len(), 2);
        assert_eq!(template.assertions[1].expected_text(), "data.id == 7");
    }

    #[test]
    fn test_build_template_invalid_json_map_is_empty() {
        let args = send_args(&["GET", "a.test", "-H", "{oops"]);
        let template = build_template(&args).unwrap();
        assert!(template.headers.is_empty());
        assert_eq!(template.auth, None);
    }

    #[test]
    fn test_build_template_rejects_bad_input() {
        assert!(build_template(&send_args(&["FETCH", "a.test"])).is_err());
        assert!(build_template(&send_args(&["GET", "a.test", "--assert", "status_code"])).is_err());
        assert!(
            build_template(&send_args(&["GET", "a.test", "--assert", "header_value=nocolon"]))
                .is_err()
        );
    }

    #[test]
    fn test_save_requires_file_and_name() {
        let result = Cli::try_parse_from(["ruprobe", "send", "GET", "a.test", "--collection", "c"]);
        assert!(result.is_err());
    }
}
