//! 错误类型（加载期致命错误 / 单请求可恢复错误）
use std::path::PathBuf;
use thiserror::Error;

/// 单条规则字段编译失败
#[derive(Debug, Error)]
#[error("service `{service}`: field `{field}`: {source}")]
pub struct RuleError {
    pub service: String,
    pub field: &'static str,
    #[source]
    pub source: regex::Error,
}

/// 加载期错误：任何一种都会在发出网络请求前终止进程
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("parse services json {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("parse services toml {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("company name is empty")]
    EmptyCompany,

    #[error("services not found in file {0}")]
    NoServices(PathBuf),

    /// 一次性汇报全部非法正则，而不是遇到第一条就退出
    #[error("{} invalid rule pattern(s):\n{}", .0.len(), render_rule_errors(.0))]
    InvalidRules(Vec<RuleError>),
}

fn render_rule_errors(errs: &[RuleError]) -> String {
    errs.iter().map(|e| format!("  - {e}")).collect::<Vec<_>>().join("\n")
}

/// 单个探测请求的失败（记录日志后丢弃该请求）
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("build request: {0}")]
    Request(String),

    #[error("send request: {0}")]
    Transport(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("read body: {0}")]
    Body(#[source] std::io::Error),
}
