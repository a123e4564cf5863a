//! 服务配置加载（JSON / TOML）与规则编译
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::error::{LoadError, RuleError};
use crate::matcher::CompiledMatchRule;
use crate::types::ServiceSpec;

/// 声明式匹配规则（原始字符串形式）；所有字段可缺省，缺省即该谓词恒真
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MatchRule {
    /// 0 表示忽略状态码
    pub status: u16,
    /// 响应体正则
    pub response: String,
    pub response_header_key: String,
    pub response_header_value: String,
    /// [键正则, 值正则]，须命中同一行响应头
    pub response_header_key_value: [String; 2],

    // 请求侧字段：探测请求不带自定义头，仅编译校验，不参与匹配
    pub request_url: String,
    pub request_method: String,
    pub request_header_key: String,
    pub request_header_value: String,
    pub request_header_key_value: [String; 2],
}

/// 配置文件中的单个服务条目
#[derive(Debug, Clone, Deserialize)]
struct ServiceEntry {
    name: String,
    method: String,
    url: String,
    #[serde(default)]
    analysis: MatchRule,
}

/// TOML 形式的顶层结构（`[[services]]`）
#[derive(Debug, Deserialize)]
struct ServiceFile {
    #[serde(default)]
    services: Vec<ServiceEntry>,
}

/// 从配置文件加载服务列表，并编译全部规则
///
/// 所有非法正则会被一次性收集进 [`LoadError::InvalidRules`]。
pub fn load_services(path: &Path) -> Result<Vec<ServiceSpec>, LoadError> {
    let txt = std::fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })?;
    let entries = if is_toml(path) {
        toml::from_str::<ServiceFile>(&txt)
            .map_err(|source| LoadError::Toml { path: path.to_path_buf(), source })?
            .services
    } else {
        serde_json::from_str::<Vec<ServiceEntry>>(&txt)
            .map_err(|source| LoadError::Json { path: path.to_path_buf(), source })?
    };

    if entries.is_empty() {
        return Err(LoadError::NoServices(path.to_path_buf()));
    }
    let services = compile_entries(entries)?;
    debug!(count = services.len(), path = %path.display(), "services loaded");
    Ok(services)
}

fn is_toml(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("toml"))
        .unwrap_or(false)
}

fn compile_entries(entries: Vec<ServiceEntry>) -> Result<Vec<ServiceSpec>, LoadError> {
    let mut services = Vec::with_capacity(entries.len());
    let mut errors: Vec<RuleError> = Vec::new();

    for e in entries {
        match CompiledMatchRule::compile(&e.name, &e.analysis) {
            Ok(rule) => {
                if rule.has_request_predicates() {
                    warn!(service = %e.name, "request-side analysis fields are ignored");
                }
                services.push(ServiceSpec { name: e.name, method: e.method, url_template: e.url, rule: Arc::new(rule) });
            }
            Err(mut errs) => errors.append(&mut errs),
        }
    }

    if !errors.is_empty() {
        return Err(LoadError::InvalidRules(errors));
    }
    Ok(services)
}
