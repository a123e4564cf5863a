//! 单次探测：发请求、交给匹配器判定
use std::io::{Cursor, Read};
use std::time::Duration;

use reqwest::header::HeaderMap;
use reqwest::{redirect, Method, Url};
use tracing::info;

use crate::error::ProbeError;
use crate::options::TCP_KEEPALIVE;
use crate::types::ProbeRequest;

/// 响应体：首次读取前为传输层的流，读取后替换为缓冲副本
enum Body {
    Stream(Box<dyn Read + Send>),
    Buffered(Vec<u8>),
}

/// 匹配器看到的 HTTP 响应
pub struct ProbeResponse {
    pub status: u16,
    pub headers: HeaderMap,
    body: Body,
}

impl ProbeResponse {
    pub fn new(status: u16, headers: HeaderMap, body: impl Read + Send + 'static) -> Self {
        Self { status, headers, body: Body::Stream(Box::new(body)) }
    }

    pub fn buffered(status: u16, headers: HeaderMap, body: Vec<u8>) -> Self {
        Self { status, headers, body: Body::Buffered(body) }
    }

    /// 读取完整响应体；流只会被消费一次，之后返回同一份缓冲
    pub fn body_bytes(&mut self) -> std::io::Result<&[u8]> {
        if let Body::Stream(reader) = &mut self.body {
            let mut buf = Vec::new();
            reader.read_to_end(&mut buf)?;
            self.body = Body::Buffered(buf);
        }
        match &self.body {
            Body::Buffered(buf) => Ok(buf),
            Body::Stream(_) => unreachable!("body was buffered above"),
        }
    }

    pub fn is_body_buffered(&self) -> bool {
        matches!(self.body, Body::Buffered(_))
    }

    /// 交出响应体供下游读取；已缓冲时返回缓冲内容
    pub fn into_body(self) -> Box<dyn Read + Send> {
        match self.body {
            Body::Stream(reader) => reader,
            Body::Buffered(buf) => Box::new(Cursor::new(buf)),
        }
    }
}

impl std::fmt::Debug for ProbeResponse {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProbeResponse")
            .field("status", &self.status)
            .field("headers", &self.headers)
            .field("buffered", &self.is_body_buffered())
            .finish()
    }
}

/// 传输层抽象：真实实现走 HTTP，测试中可替换为桩
pub trait Transport: Send + Sync {
    fn send(&self, method: &str, url: &str) -> Result<ProbeResponse, ProbeError>;
}

/// 基于 reqwest 阻塞客户端的传输层
///
/// 每个请求新建一个客户端：不校验证书、不跟随重定向、不复用连接。
#[derive(Debug, Clone)]
pub struct HttpTransport {
    dial_timeout: Duration,
}

impl HttpTransport {
    pub fn new(dial_timeout: Duration) -> Self {
        Self { dial_timeout }
    }

    fn client(&self) -> Result<reqwest::blocking::Client, ProbeError> {
        reqwest::blocking::Client::builder()
            .danger_accept_invalid_certs(true)
            .redirect(redirect::Policy::none())
            .pool_max_idle_per_host(0)
            .connect_timeout(self.dial_timeout)
            .tcp_keepalive(TCP_KEEPALIVE)
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| ProbeError::Request(e.to_string()))
    }
}

impl Transport for HttpTransport {
    fn send(&self, method: &str, url: &str) -> Result<ProbeResponse, ProbeError> {
        let method = Method::from_bytes(method.as_bytes()).map_err(|e| ProbeError::Request(e.to_string()))?;
        let url = Url::parse(url).map_err(|e| ProbeError::Request(e.to_string()))?;
        let client = self.client()?;
        let resp = client
            .request(method, url)
            .send()
            .map_err(|e| ProbeError::Transport(Box::new(e)))?;
        let status = resp.status().as_u16();
        let headers = resp.headers().clone();
        Ok(ProbeResponse::new(status, headers, resp))
    }
}

/// 单次探测结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Matched,
    Missed,
    Failed,
}

/// 执行一次探测；失败只记日志，不重试
pub fn probe(request: &ProbeRequest, transport: &dyn Transport) -> ProbeOutcome {
    let mut resp = match transport.send(&request.method, &request.url) {
        Ok(r) => r,
        Err(e) => {
            info!(method = %request.method, url = %request.url, service = %request.service_name, error = %e, "probe failed");
            return ProbeOutcome::Failed;
        }
    };
    match request.rule.matches(&mut resp) {
        Ok(true) => ProbeOutcome::Matched,
        Ok(false) => ProbeOutcome::Missed,
        Err(e) => {
            info!(method = %request.method, url = %request.url, service = %request.service_name, error = %e, "analyze failed");
            ProbeOutcome::Failed
        }
    }
}
