// src/ingest/titles.rs
use std::time::Duration;

use once_cell::sync::OnceCell;
use regex::Regex;

const FETCH_TIMEOUT: Duration = Duration::from_secs(5);
const USER_AGENT: &str = "aws-newsroom-bot/1.0";

/// Resolves a human-readable title for a cross-reference link. Every
/// failure mode (timeout, non-success status, missing title tag) is
/// "no title available", never an error.
#[async_trait::async_trait]
pub trait TitleSource: Send + Sync {
    async fn title_for(&self, url: &str) -> Option<String>;
}

pub struct HttpTitleSource {
    http: reqwest::Client,
}

impl HttpTitleSource {
    pub fn new() -> Self {
        let http = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_default();
        Self { http }
    }
}

impl Default for HttpTitleSource {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl TitleSource for HttpTitleSource {
    async fn title_for(&self, url: &str) -> Option<String> {
        let resp = match self.http.get(url).send().await {
            Ok(r) => r,
            Err(e) => {
                tracing::debug!(url, error = %e, "title fetch failed");
                return None;
            }
        };
        if !resp.status().is_success() {
            tracing::debug!(url, status = %resp.status(), "title fetch non-success");
            return None;
        }
        let html = resp.text().await.ok()?;
        page_title(&html)
    }
}

/// Extract `<title>` text, dropping the trailing `"| Some Blog Name"`
/// suffix blog pages append.
pub fn page_title(html: &str) -> Option<String> {
    static RE_TITLE: OnceCell<Regex> = OnceCell::new();
    static RE_SUFFIX: OnceCell<Regex> = OnceCell::new();
    let re_title = RE_TITLE.get_or_init(|| Regex::new(r"(?i)<title>([^<]+)</title>").unwrap());
    let re_suffix = RE_SUFFIX.get_or_init(|| Regex::new(r"\s*\|.*$").unwrap());

    let cap = re_title.captures(html)?;
    let title = re_suffix.replace(cap[1].trim(), "").trim().to_string();
    if title.is_empty() {
        None
    } else {
        Some(title)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_and_trims_title() {
        let html = "<html><head><title>  Fast networking lands | AWS News Blog </title></head>";
        assert_eq!(page_title(html).as_deref(), Some("Fast networking lands"));
    }

    #[test]
    fn missing_or_empty_title_is_none() {
        assert_eq!(page_title("<html><body>no head</body></html>"), None);
        assert_eq!(page_title("<title> | AWS News Blog</title>"), None);
    }
}
