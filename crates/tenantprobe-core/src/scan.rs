//! 探测主流程：加载配置与词表 → 生成请求 → 并发探测
use anyhow::{Context, Result};
use std::io::Write;
use tracing::info;

use crate::candidates::generate_requests;
use crate::dispatch::run_probes;
use crate::error::LoadError;
use crate::options::{ProbeOptions, RunStats};
use crate::probe::{HttpTransport, Transport};
use crate::rules::load_services;
use crate::wordlist::load_wordlist;

/// 按选项执行完整探测，命中行写入 `out`
///
/// 所有加载期错误都在发出任何请求前返回。
pub fn run_and_write(opts: &ProbeOptions, out: &mut dyn Write) -> Result<RunStats> {
    let transport = HttpTransport::new(opts.dial_timeout);
    run_with_transport(opts, &transport, out)
}

/// 与 [`run_and_write`] 相同，但使用调用方提供的传输层
pub fn run_with_transport(opts: &ProbeOptions, transport: &dyn Transport, out: &mut dyn Write) -> Result<RunStats> {
    if opts.company.trim().is_empty() {
        return Err(LoadError::EmptyCompany.into());
    }
    let services = load_services(&opts.services_path).context("load services")?;
    let words = load_wordlist(&opts.wordlist_path).context("load wordlist")?;

    info!(
        company = %opts.company,
        services = services.len(),
        words = words.len(),
        workers = opts.workers,
        "starting probe"
    );

    let requests = generate_requests(&opts.company, &opts.placeholder, &services, &words);
    let stats = run_probes(requests, transport, opts.workers, out)?;

    info!(
        generated = stats.generated,
        attempted = stats.attempted,
        matched = stats.matched,
        failed = stats.failed,
        "probe finished"
    );
    Ok(stats)
}
