//! 通用爬取器
//!
//! 封装带固定请求头的 HTTP GET，供各数据源复用。
//! 响应一律按 UTF-8 解码——目标站点页面均为 UTF-8 编码，
//! 但服务器声明的 charset 不可信。

use reqwest::Client;

use crate::config::HttpConfig;

use super::error::{CollectError, Result};

/// 默认 User-Agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) \
     AppleWebKit/537.36 (KHTML, like Gecko) \
     Chrome/91.0.4472.114 Safari/537.36";

/// 默认 Accept
pub const DEFAULT_ACCEPT: &str = "text/html,application/xhtml+xml,application/xml;q=0.9,\
     image/avif,image/webp,image/apng,*/*;q=0.8,\
     application/signed-exchange;v=b3;q=0.9";

/// 默认 Accept-Language
pub const DEFAULT_ACCEPT_LANGUAGE: &str = "zh-CN,zh;q=0.9,zh-TW;q=0.8";

/// 爬取器
///
/// 持有一个 `reqwest::Client` 和一组基础请求头。
/// 数据源需要的 `Referer` / `Host` 等覆盖项通过 `fetch_with` 逐请求传入。
pub struct Crawler {
    client: Client,
    user_agent: String,
    accept: String,
    accept_language: String,
}

impl Crawler {
    /// 使用默认请求头创建爬取器
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            accept: DEFAULT_ACCEPT.to_string(),
            accept_language: DEFAULT_ACCEPT_LANGUAGE.to_string(),
        }
    }

    /// 使用配置中的请求头创建爬取器
    pub fn from_config(config: &HttpConfig) -> Self {
        Self {
            client: Client::new(),
            user_agent: config.user_agent.clone(),
            accept: config.accept.clone(),
            accept_language: config.accept_language.clone(),
        }
    }

    /// 抓取一个页面，返回 UTF-8 文本
    ///
    /// HTTP 状态非 200 时返回 `CollectError::Network`，
    /// 由调用方决定跳过本页还是中止本次采集。
    pub async fn fetch(&self, url: &str) -> Result<String> {
        self.fetch_with(url, &[]).await
    }

    /// 抓取一个页面，附加数据源特定的请求头（如 `Referer` / `Host`）
    pub async fn fetch_with(&self, url: &str, extra_headers: &[(&str, &str)]) -> Result<String> {
        let bytes = self.get_bytes(url, extra_headers).await?;
        // 强制 UTF-8 解码，忽略服务器声明的 charset
        let (text, _, _) = encoding_rs::UTF_8.decode(&bytes);
        Ok(text.into_owned())
    }

    /// 抓取二进制内容（ZIP 归档、.dat 文件等）
    pub async fn fetch_bytes(&self, url: &str, extra_headers: &[(&str, &str)]) -> Result<Vec<u8>> {
        self.get_bytes(url, extra_headers).await
    }

    async fn get_bytes(&self, url: &str, extra_headers: &[(&str, &str)]) -> Result<Vec<u8>> {
        let mut request = self
            .client
            .get(url)
            .header("User-Agent", &self.user_agent)
            .header("Accept", &self.accept)
            .header("Accept-Language", &self.accept_language);

        for (name, value) in extra_headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            return Err(CollectError::Network(format!(
                "HTTP {} : {}",
                response.status(),
                url
            )));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

impl Default for Crawler {
    fn default() -> Self {
        Self::new()
    }
}

/// 剥掉 JSONP 回调外壳
///
/// 上交所等接口返回 `jsonpCallback97956({...})` 形式的文本，
/// 去掉固定长度的回调前缀和结尾的 `)` 后才是合法 JSON。
pub fn strip_jsonp(text: &str, prefix_len: usize) -> Result<&str> {
    let trimmed = text.trim_end();
    if trimmed.len() <= prefix_len
        || !trimmed.ends_with(')')
        || !trimmed.is_char_boundary(prefix_len)
    {
        return Err(CollectError::StructuralMismatch(format!(
            "JSONP 外壳不完整，长度 {}，前缀 {}",
            trimmed.len(),
            prefix_len
        )));
    }
    Ok(&trimmed[prefix_len..trimmed.len() - 1])
}
