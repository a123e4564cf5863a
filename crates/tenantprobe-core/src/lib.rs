//! 公司名 SaaS 实例探测库
//!
//! 设计要点：
//! - 服务模板与匹配规则在启动时加载并编译一次，之后只读共享；非法正则一次性全部报告。
//! - 候选名由“公司名 + 词表词”按固定顺序拼接，替换进每个服务的 URL 模板。
//! - 生成器单线程产出请求，通过无缓冲通道交给固定数量的 worker，天然背压。
//! - 单个请求失败只记日志并丢弃，不影响其他请求。

mod candidates;
mod dispatch;
mod error;
mod matcher;
mod options;
mod probe;
mod rules;
mod scan;
mod types;
mod wordlist;

pub use candidates::{candidates, generate_requests, word_requests, SEPARATOR};
pub use dispatch::run_probes;
pub use error::{LoadError, ProbeError, RuleError};
pub use matcher::CompiledMatchRule;
pub use options::{ProbeOptions, RunStats, DEFAULT_DIAL_TIMEOUT, DEFAULT_PLACEHOLDER, DEFAULT_WORKERS};
pub use probe::{probe, HttpTransport, ProbeOutcome, ProbeResponse, Transport};
pub use rules::{load_services, MatchRule};
pub use scan::{run_and_write, run_with_transport};
pub use types::{ProbeRequest, ServiceSpec};
pub use wordlist::load_wordlist;
