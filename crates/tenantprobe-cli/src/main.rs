use anyhow::{Context, Result};
use clap::builder::NonEmptyStringValueParser;
use clap::Parser;
use std::io::{self, BufWriter};
use std::path::PathBuf;
use std::time::Duration;
use tenantprobe_core::{run_and_write, ProbeOptions, DEFAULT_PLACEHOLDER};
use tracing::info;

/// 命令行入口（基于 clap）
#[derive(Parser, Debug)]
#[command(name = "tenantprobe", version, about = "按公司名猜测 SaaS 租户实例")]
struct Cli {
    /// 目标公司名
    #[arg(long, value_parser = NonEmptyStringValueParser::new())]
    company: String,

    /// 服务配置文件（JSON；.toml 后缀按 TOML 解析）
    #[arg(long)]
    services: PathBuf,

    /// 词表文件（每行一个词）
    #[arg(long)]
    wordlist: PathBuf,

    /// 并发 worker 数（"auto"=CPU 核心数）
    #[arg(long, default_value = "6", value_parser = parse_procs)]
    procs: usize,

    /// 日志详细程度：0=warn 1=info 2=debug 3+=trace；设置 RUST_LOG 时以其为准
    #[arg(short = 'v', long = "verbosity", default_value_t = 1)]
    verbosity: u8,

    /// URL 模板中的占位符
    #[arg(long, default_value = DEFAULT_PLACEHOLDER)]
    placeholder: String,

    /// 建连超时（秒）
    #[arg(long, default_value_t = 30)]
    dial_timeout: u64,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbosity);

    let opts = ProbeOptions {
        workers: cli.procs,
        placeholder: cli.placeholder,
        dial_timeout: Duration::from_secs(cli.dial_timeout),
        ..ProbeOptions::new(cli.company, cli.services, cli.wordlist)
    };

    // 命中行只写 stdout；日志走 stderr
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let stats = run_and_write(&opts, &mut out).context("probe run failed")?;

    info!(matched = stats.matched, attempted = stats.attempted, "done");
    Ok(())
}

fn init_tracing(verbosity: u8) {
    use tracing_subscriber::{EnvFilter, FmtSubscriber};
    let level = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    // RUST_LOG 优先，例如：RUST_LOG=tenantprobe_core=debug
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(io::stderr)
        .finish();
    let _ = tracing::subscriber::set_global_default(subscriber);
}

/// 解析并发参数："auto" 表示 CPU 核数；其余必须是正整数
fn parse_procs(s: &str) -> Result<usize, String> {
    if s.eq_ignore_ascii_case("auto") {
        return Ok(num_cpus::get());
    }
    match s.trim().parse::<usize>() {
        Ok(n) if n >= 1 => Ok(n),
        Ok(_) => Err("worker count must be at least 1".to_string()),
        Err(e) => Err(format!("expected a positive integer or \"auto\": {e}")),
    }
}
