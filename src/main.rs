//! techsig 命令行：拉取指纹库并输出索引概况

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Context};
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use techsig::{fetch_technology_signatures, ConfigManager, RetryPolicy, DEFAULT_SOURCE_URL};

#[derive(Debug, Parser)]
#[command(name = "techsig", version, about = "Fetch and normalize the Wappalyzer technology database")]
struct CliArgs {
    /// 远程指纹库地址
    #[arg(long, default_value = DEFAULT_SOURCE_URL, conflicts_with = "file")]
    url: String,

    /// 本地指纹库文件（替代远程拉取）
    #[arg(long)]
    file: Option<PathBuf>,

    /// HTTP 超时（秒）
    #[arg(long, default_value_t = 30)]
    timeout: u64,

    /// 失败重试次数
    #[arg(long, default_value_t = 0)]
    retries: u8,

    /// 输出字段解码失败等调试信息
    #[arg(short, long)]
    debug: bool,

    /// 以 JSON 输出指定技术的指纹
    #[arg(long, value_name = "NAME")]
    show: Option<String>,

    /// 列出全部技术名
    #[arg(long)]
    list: bool,
}

fn init_logging(debug: bool) {
    let default_level = if debug { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    init_logging(args.debug);
    debug!("Arguments: {:?}", args);

    let retry = match args.retries {
        0 => RetryPolicy::Never,
        n => RetryPolicy::Times(n),
    };
    let builder = ConfigManager::custom()
        .http_timeout(Duration::from_secs(args.timeout))
        .retry(retry)
        .debug(args.debug);
    let config = match &args.file {
        Some(path) => builder.local_file(path),
        None => builder.remote_url(&args.url),
    }
    .build();

    let index = fetch_technology_signatures(&config)
        .await
        .context("failed to load technology signatures")?;

    if let Some(name) = &args.show {
        let Some(signature) = index.get(name) else {
            bail!("no technology named `{}` in the index", name);
        };
        println!("{}", serde_json::to_string_pretty(signature)?);
        return Ok(());
    }

    if args.list {
        let mut names: Vec<&String> = index.keys().collect();
        names.sort();
        for name in names {
            println!("{}", name);
        }
        return Ok(());
    }

    let patterns: usize = index.values().map(|s| s.matcher.pattern_count()).sum();
    println!("Loaded {} technology signatures ({} patterns)", index.len(), patterns);
    Ok(())
}
