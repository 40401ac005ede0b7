//! 交易所公告采集
//!
//! 列表页分页协议在各交易所站点上是一致的：先抓第 1 页取总页数，
//! 再按页号升序抓完所有列表页，最后逐条抓取详情页。
//! 页面结构差异收敛在 [`NoticeSource`] 的各实现里。
//!
//! 部分失败策略：某一页抓取或解析失败时记一条警告然后继续，
//! 其余页的数据照常保留——一页坏数据不应废掉整次采集。

mod dce;
mod shfe;

pub use dce::DceNoticeSource;
pub use shfe::ShfeNoticeSource;

use std::future::Future;

use crate::models::{Notice, NoticeDetail, NoticeIndexEntry};

use super::crawler::Crawler;
use super::error::Result;

/// 公告数据源的抽取规则
///
/// 每个交易所一份实现：列表页 URL 模板、总页数位置、
/// 列表三元组（标题/日期/链接）的选择器、详情页的选择器。
pub trait NoticeSource {
    /// 数据源名称（日志用）
    fn name(&self) -> &'static str;

    /// 第 `page` 页列表页的地址，`page` 从 1 开始
    fn index_url(&self, page: usize) -> String;

    /// 从第 1 页读取总页数
    fn parse_page_count(&self, html: &str) -> Result<usize>;

    /// 解析列表页
    ///
    /// 标题、日期、链接三组节点数量必须一致，
    /// 否则返回 `StructuralMismatch`，该页贡献零条记录。
    fn parse_index(&self, html: &str) -> Result<Vec<NoticeIndexEntry>>;

    /// 解析详情页
    fn parse_detail(&self, html: &str) -> Result<NoticeDetail>;
}

/// 分页抓取列表页，汇总全部索引条目
///
/// 第 1 页抓取失败时无法得知总页数，直接返回错误；
/// 之后任何一页失败只跳过该页。页号升序访问。
pub async fn crawl_index<S, F, Fut>(source: &S, fetch: F) -> Result<Vec<NoticeIndexEntry>>
where
    S: NoticeSource,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let first_url = source.index_url(1);
    let first_page = fetch(first_url.clone()).await?;
    let page_count = source.parse_page_count(&first_page)?;
    log::info!("{} 公告共 {} 页", source.name(), page_count);

    let mut entries = match source.parse_index(&first_page) {
        Ok(list) => list,
        Err(e) => {
            log::warn!("{} 第 1 页解析失败，跳过: {} ({})", source.name(), e, first_url);
            Vec::new()
        }
    };

    for page in 2..=page_count {
        let url = source.index_url(page);
        let html = match fetch(url.clone()).await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("{} 第 {} 页抓取失败，跳过: {} ({})", source.name(), page, e, url);
                continue;
            }
        };
        match source.parse_index(&html) {
            Ok(mut list) => entries.append(&mut list),
            Err(e) => {
                log::warn!("{} 第 {} 页解析失败，跳过: {} ({})", source.name(), page, e, url);
            }
        }
    }

    Ok(entries)
}

/// 逐条抓取详情页，合并成完整公告
///
/// 条目顺序与列表页一致。单条失败跳过并告警，其余照常。
pub async fn resolve_details<S, F, Fut>(
    source: &S,
    entries: Vec<NoticeIndexEntry>,
    fetch: F,
) -> Vec<Notice>
where
    S: NoticeSource,
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<String>>,
{
    let mut notices = Vec::with_capacity(entries.len());

    for entry in entries {
        let html = match fetch(entry.url.clone()).await {
            Ok(html) => html,
            Err(e) => {
                log::warn!("{} 详情页抓取失败，跳过: {} ({})", source.name(), e, entry.url);
                continue;
            }
        };
        let detail = match source.parse_detail(&html) {
            Ok(detail) => detail,
            Err(e) => {
                log::warn!("{} 详情页解析失败，跳过: {} ({})", source.name(), e, entry.url);
                continue;
            }
        };
        log::debug!("{} 详情页已解析: {}", source.name(), entry.title);
        notices.push(Notice {
            title: entry.title,
            date: entry.date,
            url: entry.url,
            code: detail.code,
            content: detail.content,
        });
    }

    notices
}

/// 完整采集一个公告源：分页索引 + 逐条详情
pub async fn crawl_notices<S: NoticeSource>(crawler: &Crawler, source: &S) -> Result<Vec<Notice>> {
    let entries = crawl_index(source, |url| async move { crawler.fetch(&url).await }).await?;
    log::info!("{} 共 {} 条公告索引", source.name(), entries.len());

    let notices = resolve_details(source, entries, |url| async move { crawler.fetch(&url).await }).await;
    log::info!("{} 共 {} 条公告采集完成", source.name(), notices.len());

    Ok(notices)
}

/// 取字符串最后 `n` 个字符
///
/// 详情页的发布日期是长文本节点的最后 10 个字符（ISO 日期），
/// 前缀包含中文，不能按字节切片。
pub(crate) fn last_n_chars(s: &str, n: usize) -> &str {
    match s.char_indices().rev().nth(n.saturating_sub(1)) {
        Some((idx, _)) => &s[idx..],
        None => s,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::error::CollectError;
    use chrono::NaiveDate;

    /// 行格式 `标题|2021-01-01|/notice/1.html` 的极简数据源，
    /// 用来测试分页与详情的控制流
    struct LineSource;

    impl NoticeSource for LineSource {
        fn name(&self) -> &'static str {
            "fixture"
        }

        fn index_url(&self, page: usize) -> String {
            format!("http://fixture.test/index_{}.html", page)
        }

        fn parse_page_count(&self, html: &str) -> Result<usize> {
            html.lines()
                .find_map(|line| line.strip_prefix("pages="))
                .and_then(|v| v.parse().ok())
                .ok_or_else(|| CollectError::StructuralMismatch("缺少总页数".to_string()))
        }

        fn parse_index(&self, html: &str) -> Result<Vec<NoticeIndexEntry>> {
            let mut entries = Vec::new();
            for line in html.lines().filter(|l| l.contains('|')) {
                let parts: Vec<&str> = line.split('|').collect();
                if parts.len() != 3 {
                    return Err(CollectError::StructuralMismatch(
                        "标题/日期/链接数量不一致".to_string(),
                    ));
                }
                entries.push(NoticeIndexEntry {
                    title: parts[0].to_string(),
                    date: parts[1]
                        .parse()
                        .map_err(|e| CollectError::StructuralMismatch(format!("日期: {}", e)))?,
                    url: format!("http://fixture.test{}", parts[2]),
                });
            }
            Ok(entries)
        }

        fn parse_detail(&self, html: &str) -> Result<NoticeDetail> {
            let mut lines = html.lines();
            let code = lines
                .next()
                .ok_or_else(|| CollectError::StructuralMismatch("详情页为空".to_string()))?;
            Ok(NoticeDetail {
                title: String::new(),
                date: None,
                code: code.to_string(),
                content: lines.map(|l| l.to_string()).collect(),
            })
        }
    }

    fn index_page(page: usize) -> String {
        format!("pages=5\n公告{page}|2021-03-0{page}|/notice/{page}.html")
    }

    /// 第 3 页网络失败，其余 4 页的条目仍然全部返回
    #[tokio::test]
    async fn test_crawl_index_skips_failed_page() {
        let entries = crawl_index(&LineSource, |url: String| async move {
            if url.contains("index_3") {
                Err(CollectError::Network(format!("HTTP 500 : {}", url)))
            } else {
                let page: usize = url
                    .trim_start_matches("http://fixture.test/index_")
                    .trim_end_matches(".html")
                    .parse()
                    .map_err(|_| CollectError::Network(url.clone()))?;
                Ok(index_page(page))
            }
        })
        .await
        .unwrap();

        assert_eq!(entries.len(), 4);
        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["公告1", "公告2", "公告4", "公告5"]);
        // 页号升序
        assert_eq!(
            entries[0].date,
            NaiveDate::from_ymd_opt(2021, 3, 1).unwrap()
        );
    }

    /// 第 1 页抓取失败时拿不到总页数，整次采集中止
    #[tokio::test]
    async fn test_crawl_index_aborts_without_first_page() {
        let result = crawl_index(&LineSource, |url: String| async move {
            Err::<String, _>(CollectError::Network(url))
        })
        .await;
        assert!(matches!(result, Err(CollectError::Network(_))));
    }

    /// 结构不匹配的页贡献零条记录，但不影响其他页
    #[tokio::test]
    async fn test_crawl_index_skips_mismatched_page() {
        let entries = crawl_index(&LineSource, |url: String| async move {
            if url.contains("index_2") {
                // 缺少链接列，结构不匹配
                Ok("pages=3\n坏页|2021-03-02".to_string())
            } else {
                let page: usize = url
                    .trim_start_matches("http://fixture.test/index_")
                    .trim_end_matches(".html")
                    .parse()
                    .map_err(|_| CollectError::Network(url.clone()))?;
                Ok(index_page(page))
            }
        })
        .await
        .unwrap();

        let titles: Vec<&str> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["公告1", "公告3"]);
    }

    /// 单条详情失败只丢那一条，并保持文档顺序
    #[tokio::test]
    async fn test_resolve_details_partial_failure() {
        let entries = vec![
            NoticeIndexEntry {
                title: "甲".to_string(),
                date: NaiveDate::from_ymd_opt(2021, 3, 1).unwrap(),
                url: "http://fixture.test/notice/1.html".to_string(),
            },
            NoticeIndexEntry {
                title: "乙".to_string(),
                date: NaiveDate::from_ymd_opt(2021, 3, 2).unwrap(),
                url: "http://fixture.test/notice/2.html".to_string(),
            },
            NoticeIndexEntry {
                title: "丙".to_string(),
                date: NaiveDate::from_ymd_opt(2021, 3, 3).unwrap(),
                url: "http://fixture.test/notice/3.html".to_string(),
            },
        ];

        let notices = resolve_details(&LineSource, entries, |url: String| async move {
            if url.contains("/notice/2") {
                Err(CollectError::Network(url))
            } else {
                Ok("〔2021〕1号\n第一段\n第二段".to_string())
            }
        })
        .await;

        assert_eq!(notices.len(), 2);
        assert_eq!(notices[0].title, "甲");
        assert_eq!(notices[1].title, "丙");
        assert_eq!(notices[0].code, "〔2021〕1号");
        assert_eq!(notices[0].content, vec!["第一段", "第二段"]);
    }

    /// 中文前缀长文本取最后 10 个字符
    #[test]
    fn test_last_n_chars() {
        assert_eq!(last_n_chars("发布时间：2021-07-15", 10), "2021-07-15");
        assert_eq!(last_n_chars("短", 10), "短");
        assert_eq!(last_n_chars("", 10), "");
    }
}
