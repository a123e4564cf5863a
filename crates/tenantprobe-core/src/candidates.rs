//! 候选名生成：公司名 × 词表 × 服务模板
use crate::types::{ProbeRequest, ServiceSpec};

/// 拼接分隔符
pub const SEPARATOR: &str = "-";

/// 单个 (公司名, 词) 组合的候选串，顺序固定：
/// `company+word`、`word+company`、`word-company`、`company-word`。
/// 词为空（去除首尾空白后）时只有公司名本身。不去重。
pub fn candidates(company: &str, word: &str) -> Vec<String> {
    let word = word.trim();
    if word.is_empty() {
        return vec![company.to_string()];
    }
    vec![
        format!("{company}{word}"),
        format!("{word}{company}"),
        format!("{word}{SEPARATOR}{company}"),
        format!("{company}{SEPARATOR}{word}"),
    ]
}

/// 一个词对所有服务展开出的请求：按服务顺序，每个服务内按候选顺序
pub fn word_requests<'a>(
    company: &'a str,
    placeholder: &'a str,
    services: &'a [ServiceSpec],
    word: &'a str,
) -> impl Iterator<Item = ProbeRequest> + 'a {
    services.iter().flat_map(move |svc| {
        candidates(company, word)
            .into_iter()
            .map(move |c| svc.request_for(placeholder, &c))
    })
}

/// 整个运行的请求序列：先跑一次仅公司名的基线，再按词表顺序逐行展开
///
/// 词表中的空行会再次产生基线请求（保持原有行为）。
pub fn generate_requests<'a>(
    company: &'a str,
    placeholder: &'a str,
    services: &'a [ServiceSpec],
    words: &'a [String],
) -> impl Iterator<Item = ProbeRequest> + Send + 'a {
    std::iter::once("")
        .chain(words.iter().map(String::as_str))
        .flat_map(move |word| word_requests(company, placeholder, services, word))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matcher::CompiledMatchRule;
    use std::sync::Arc;

    fn service(name: &str, url: &str) -> ServiceSpec {
        ServiceSpec {
            name: name.into(),
            method: "GET".into(),
            url_template: url.into(),
            rule: Arc::new(CompiledMatchRule::default()),
        }
    }

    fn paths(reqs: impl Iterator<Item = ProbeRequest>, prefix: &str) -> String {
        reqs.map(|r| format!("{};", r.url.trim_start_matches(prefix))).collect()
    }

    #[test]
    fn four_arrangements_in_fixed_order() {
        let svcs = [service("test", "http://s.com/COMPANY")];
        let got = paths(word_requests("target", "COMPANY", &svcs, "api"), "http://s.com/");
        assert_eq!(got, "targetapi;apitarget;api-target;target-api;");
    }

    #[test]
    fn empty_or_blank_word_is_company_only() {
        assert_eq!(candidates("target", ""), vec!["target"]);
        assert_eq!(candidates("target", "  \t"), vec!["target"]);
    }

    #[test]
    fn word_is_trimmed() {
        assert_eq!(candidates("acme", " dev \r")[0], "acmedev");
    }

    #[test]
    fn duplicates_are_kept() {
        let c = candidates("a", "a");
        assert_eq!(c, vec!["aa", "aa", "a-a", "a-a"]);
    }

    #[test]
    fn baseline_then_words_per_service() {
        let svcs = [service("one", "http://one/COMPANY"), service("two", "http://two/COMPANY")];
        let words = vec!["x".to_string()];
        let urls: Vec<String> = generate_requests("c", "COMPANY", &svcs, &words).map(|r| r.url).collect();
        assert_eq!(
            urls,
            vec![
                "http://one/c",
                "http://two/c",
                "http://one/cx",
                "http://one/xc",
                "http://one/x-c",
                "http://one/c-x",
                "http://two/cx",
                "http://two/xc",
                "http://two/x-c",
                "http://two/c-x",
            ]
        );
    }

    #[test]
    fn blank_wordlist_lines_repeat_the_baseline() {
        let svcs = [service("one", "http://one/COMPANY")];
        let words = vec!["".to_string(), "api".to_string(), "   ".to_string()];
        let reqs: Vec<ProbeRequest> = generate_requests("c", "COMPANY", &svcs, &words).collect();
        // 基线 1 + 空行 1 + api 4 + 空白行 1
        assert_eq!(reqs.len(), 7);
        assert_eq!(reqs.iter().filter(|r| r.url == "http://one/c").count(), 3);
    }

    #[test]
    fn request_carries_service_metadata() {
        let mut svc = service("graph", "http://service.com/COMPANY");
        svc.method = "POST".into();
        let svcs = [svc];
        let last = word_requests("target", "COMPANY", &svcs, "graphql").last().unwrap();
        assert_eq!(last.method, "POST");
        assert_eq!(last.service_name, "graph");
        assert_eq!(last.url, "http://service.com/target-graphql");
    }
}
