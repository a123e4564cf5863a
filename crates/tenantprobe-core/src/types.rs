//! 公共类型（对外暴露）
use std::sync::Arc;

use crate::matcher::CompiledMatchRule;

/// 已加载并编译的服务模板（启动后只读）
#[derive(Debug, Clone)]
pub struct ServiceSpec {
    pub name: String,
    pub method: String,
    /// 含占位符的 URL 模板
    pub url_template: String,
    pub rule: Arc<CompiledMatchRule>,
}

impl ServiceSpec {
    /// 用候选串替换模板中所有占位符，得到一次探测请求
    pub fn request_for(&self, placeholder: &str, candidate: &str) -> ProbeRequest {
        ProbeRequest {
            service_name: self.name.clone(),
            method: self.method.clone(),
            url: self.url_template.replace(placeholder, candidate),
            rule: Arc::clone(&self.rule),
        }
    }
}

/// 单次探测请求；由生成器创建，只被一个 worker 消费
#[derive(Debug, Clone)]
pub struct ProbeRequest {
    pub service_name: String,
    pub method: String,
    pub url: String,
    pub rule: Arc<CompiledMatchRule>,
}

impl ProbeRequest {
    /// 命中时输出到 stdout 的一行
    pub fn hit_line(&self) -> String {
        format!("{} {}\n", self.method, self.url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(url: &str) -> ServiceSpec {
        ServiceSpec {
            name: "test".into(),
            method: "GET".into(),
            url_template: url.into(),
            rule: Arc::new(CompiledMatchRule::default()),
        }
    }

    #[test]
    fn replaces_every_placeholder() {
        let req = service("https://COMPANY.example.com/COMPANY").request_for("COMPANY", "acme");
        assert_eq!(req.url, "https://acme.example.com/acme");
        assert_eq!(req.service_name, "test");
    }

    #[test]
    fn template_without_placeholder_is_kept() {
        let req = service("https://static.example.com/").request_for("COMPANY", "acme");
        assert_eq!(req.url, "https://static.example.com/");
    }

    #[test]
    fn hit_line_format() {
        let req = service("http://service.com/COMPANY").request_for("COMPANY", "target-api");
        assert_eq!(req.hit_line(), "GET http://service.com/target-api\n");
    }
}
