//! 响应匹配器
//!
//! 判定分三个有序阶段，任一阶段不通过立即返回：
//! 1. 状态码：配置了则必须完全相等；
//! 2. 响应体：配置了正则才读取响应体，转小写后搜索；
//! 3. 响应头：同一类谓词在各行之间取“或”，不同类之间取“与”。
use regex::Regex;
use reqwest::header::HeaderMap;

use crate::error::{ProbeError, RuleError};
use crate::probe::ProbeResponse;
use crate::rules::MatchRule;

/// 请求侧谓词：仅编译校验，不参与判定
#[derive(Debug, Default)]
struct RequestPredicates {
    url: Option<Regex>,
    method: Option<String>,
    header_key: Option<Regex>,
    header_value: Option<Regex>,
    header_key_value: [Option<Regex>; 2],
}

impl RequestPredicates {
    fn is_empty(&self) -> bool {
        self.url.is_none()
            && self.method.is_none()
            && self.header_key.is_none()
            && self.header_value.is_none()
            && self.header_key_value.iter().all(Option::is_none)
    }
}

/// 编译后的匹配规则；启动时编译一次，之后在 worker 间只读共享
#[derive(Debug, Default)]
pub struct CompiledMatchRule {
    status: Option<u16>,
    body: Option<regex::bytes::Regex>,
    header_key: Option<Regex>,
    header_value: Option<Regex>,
    header_key_value: [Option<Regex>; 2],
    request: RequestPredicates,
}

/// 逐字段编译，收集错误而不是遇错即停
struct Compiler<'a> {
    service: &'a str,
    errors: Vec<RuleError>,
}

impl Compiler<'_> {
    fn regex(&mut self, field: &'static str, pat: &str) -> Option<Regex> {
        if pat.is_empty() {
            return None;
        }
        match Regex::new(pat) {
            Ok(rx) => Some(rx),
            Err(source) => {
                self.errors.push(RuleError { service: self.service.to_string(), field, source });
                None
            }
        }
    }

    fn bytes_regex(&mut self, field: &'static str, pat: &str) -> Option<regex::bytes::Regex> {
        if pat.is_empty() {
            return None;
        }
        match regex::bytes::Regex::new(pat) {
            Ok(rx) => Some(rx),
            Err(source) => {
                self.errors.push(RuleError { service: self.service.to_string(), field, source });
                None
            }
        }
    }
}

impl CompiledMatchRule {
    /// 编译一条规则；返回该规则内全部非法字段
    pub fn compile(service: &str, rule: &MatchRule) -> Result<Self, Vec<RuleError>> {
        let mut c = Compiler { service, errors: Vec::new() };
        let compiled = Self {
            status: (rule.status != 0).then_some(rule.status),
            body: c.bytes_regex("response", &rule.response),
            header_key: c.regex("response_header_key", &rule.response_header_key),
            header_value: c.regex("response_header_value", &rule.response_header_value),
            header_key_value: [
                c.regex("response_header_key_value[0]", &rule.response_header_key_value[0]),
                c.regex("response_header_key_value[1]", &rule.response_header_key_value[1]),
            ],
            request: RequestPredicates {
                url: c.regex("request_url", &rule.request_url),
                method: (!rule.request_method.is_empty()).then(|| rule.request_method.clone()),
                header_key: c.regex("request_header_key", &rule.request_header_key),
                header_value: c.regex("request_header_value", &rule.request_header_value),
                header_key_value: [
                    c.regex("request_header_key_value[0]", &rule.request_header_key_value[0]),
                    c.regex("request_header_key_value[1]", &rule.request_header_key_value[1]),
                ],
            },
        };
        if c.errors.is_empty() { Ok(compiled) } else { Err(c.errors) }
    }

    /// 是否配置了任何请求侧谓词（这些谓词不会被判定）
    pub fn has_request_predicates(&self) -> bool {
        !self.request.is_empty()
    }

    /// 对响应执行完整判定；只有读取响应体失败时返回错误
    pub fn matches(&self, resp: &mut ProbeResponse) -> Result<bool, ProbeError> {
        if !self.status_matches(resp.status) {
            return Ok(false);
        }
        if !self.body_matches(resp)? {
            return Ok(false);
        }
        Ok(self.headers_match(&resp.headers))
    }

    fn status_matches(&self, status: u16) -> bool {
        self.status.map_or(true, |want| want == status)
    }

    /// 未配置响应体正则时不读取响应体
    fn body_matches(&self, resp: &mut ProbeResponse) -> Result<bool, ProbeError> {
        let Some(rx) = &self.body else { return Ok(true) };
        let body = resp.body_bytes().map_err(ProbeError::Body)?;
        Ok(rx.is_match(&lowercase_bytes(body)))
    }

    fn headers_match(&self, headers: &HeaderMap) -> bool {
        let pair_configured = self.header_key_value.iter().any(Option::is_some);
        if self.header_key.is_none() && self.header_value.is_none() && !pair_configured {
            return true;
        }

        // 未配置的类别视为已满足
        let mut verdict = HeaderVerdict {
            key: self.header_key.is_none(),
            value: self.header_value.is_none(),
            pair: !pair_configured,
        };
        for (name, value) in header_lines(headers) {
            let value = value.to_lowercase();
            verdict.key |= matches_or_absent(&self.header_key, name);
            verdict.value |= matches_or_absent(&self.header_value, &value);
            verdict.pair |= matches_or_absent(&self.header_key_value[0], name)
                && matches_or_absent(&self.header_key_value[1], &value);
            if verdict.all() {
                break;
            }
        }
        verdict.all()
    }
}

#[derive(Debug, Clone, Copy)]
struct HeaderVerdict {
    key: bool,
    value: bool,
    pair: bool,
}

impl HeaderVerdict {
    fn all(&self) -> bool {
        self.key && self.value && self.pair
    }
}

fn matches_or_absent(rx: &Option<Regex>, haystack: &str) -> bool {
    rx.as_ref().map_or(true, |rx| rx.is_match(haystack))
}

/// 每个头名一行；多值以 ", " 连接。HeaderMap 中的头名已是小写
fn header_lines(headers: &HeaderMap) -> impl Iterator<Item = (&str, String)> + '_ {
    headers.keys().map(move |name| {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        (name.as_str(), joined)
    })
}

/// 合法 UTF-8 片段按 Unicode 规则转小写，非法字节原样保留
fn lowercase_bytes(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len());
    for chunk in body.utf8_chunks() {
        out.extend_from_slice(chunk.valid().to_lowercase().as_bytes());
        out.extend_from_slice(chunk.invalid());
    }
    out
}
