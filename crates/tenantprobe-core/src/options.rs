//! 探测选项与统计信息（模块）
use std::path::PathBuf;
use std::time::Duration;

/// 默认并发 worker 数
pub const DEFAULT_WORKERS: usize = 6;
/// URL 模板中的默认占位符
pub const DEFAULT_PLACEHOLDER: &str = "COMPANY";
/// 默认建连超时
pub const DEFAULT_DIAL_TIMEOUT: Duration = Duration::from_secs(30);
/// 底层 TCP keepalive 探测间隔
pub const TCP_KEEPALIVE: Duration = Duration::from_secs(1);

/// 一次运行的全部参数；启动时构造一次，以引用传给各组件
#[derive(Debug, Clone)]
pub struct ProbeOptions {
    /// 目标公司名（整个运行期间固定）
    pub company: String,
    /// 服务配置文件（JSON；扩展名为 .toml 时按 TOML 解析）
    pub services_path: PathBuf,
    /// 词表文件
    pub wordlist_path: PathBuf,
    /// worker 线程数
    pub workers: usize,
    /// URL 模板占位符
    pub placeholder: String,
    /// 建连超时
    pub dial_timeout: Duration,
}

impl ProbeOptions {
    pub fn new(company: impl Into<String>, services_path: impl Into<PathBuf>, wordlist_path: impl Into<PathBuf>) -> Self {
        Self {
            company: company.into(),
            services_path: services_path.into(),
            wordlist_path: wordlist_path.into(),
            workers: DEFAULT_WORKERS,
            placeholder: DEFAULT_PLACEHOLDER.to_string(),
            dial_timeout: DEFAULT_DIAL_TIMEOUT,
        }
    }
}

/// 运行统计（便于 CLI 打印）
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// 生成器产出的请求数
    pub generated: usize,
    /// worker 实际处理的请求数
    pub attempted: usize,
    pub matched: usize,
    pub failed: usize,
}

impl RunStats {
    pub(crate) fn merge(&mut self, other: &RunStats) {
        self.attempted += other.attempted;
        self.matched += other.matched;
        self.failed += other.failed;
    }
}
