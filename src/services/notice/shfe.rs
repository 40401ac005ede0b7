//! 上期所公告源
//!
//! 列表页：<http://www.shfe.com.cn/news/notice/index.html>，
//! 第 2 页起为 `index_{page}.html`。日期带方括号（`[2021-01-01]`），
//! 总页数在页码下拉框的最后一个选项里。

use chrono::NaiveDate;
use scraper::{Html, Selector};
use url::Url;

use crate::models::{NoticeDetail, NoticeIndexEntry};
use crate::services::error::{CollectError, Result};

use super::{last_n_chars, NoticeSource};

/// 站点源
const SHFE_ORIGIN: &str = "http://www.shfe.com.cn";
/// 公告列表首页
const SHFE_NOTICE_INDEX_URL: &str = "http://www.shfe.com.cn/news/notice/index.html";

/// 上期所公告抽取规则
pub struct ShfeNoticeSource;

impl NoticeSource for ShfeNoticeSource {
    fn name(&self) -> &'static str {
        "SHFE"
    }

    fn index_url(&self, page: usize) -> String {
        if page <= 1 {
            SHFE_NOTICE_INDEX_URL.to_string()
        } else {
            format!("{}/news/notice/index_{}.html", SHFE_ORIGIN, page)
        }
    }

    fn parse_page_count(&self, html: &str) -> Result<usize> {
        let document = Html::parse_document(html);
        let option_selector = Selector::parse("div.page-no select option").unwrap();

        let last_option = document
            .select(&option_selector)
            .last()
            .ok_or_else(|| CollectError::StructuralMismatch("未找到页码下拉框".to_string()))?;

        let text = last_option.text().collect::<Vec<_>>().join("");
        text.trim().parse().map_err(|_| {
            CollectError::StructuralMismatch(format!("页码不是数字: {:?}", text.trim()))
        })
    }

    fn parse_index(&self, html: &str) -> Result<Vec<NoticeIndexEntry>> {
        let document = Html::parse_document(html);
        let link_selector = Selector::parse("div.p4.lawbox ul li a").unwrap();
        let date_selector = Selector::parse("div.p4.lawbox ul li span").unwrap();

        let mut titles = Vec::new();
        let mut hrefs = Vec::new();
        for link in document.select(&link_selector) {
            titles.push(link.value().attr("title").unwrap_or("").to_string());
            hrefs.push(link.value().attr("href").unwrap_or("").to_string());
        }

        let dates: Vec<String> = document
            .select(&date_selector)
            .map(|span| span.text().collect::<Vec<_>>().join("").trim().to_string())
            .collect();

        if titles.len() != dates.len() {
            return Err(CollectError::StructuralMismatch(format!(
                "标题 {} 条、日期 {} 条，数量不一致",
                titles.len(),
                dates.len()
            )));
        }
        if titles.len() != hrefs.len() {
            return Err(CollectError::StructuralMismatch(format!(
                "标题 {} 条、链接 {} 条，数量不一致",
                titles.len(),
                hrefs.len()
            )));
        }

        let origin = Url::parse(SHFE_ORIGIN)
            .map_err(|e| CollectError::StructuralMismatch(format!("站点源无效: {}", e)))?;

        let mut entries = Vec::with_capacity(titles.len());
        for ((title, date_text), href) in titles.into_iter().zip(dates).zip(hrefs) {
            // 日期外层是一对方括号：[2021-01-01]
            let date_text = date_text
                .trim_start_matches('[')
                .trim_end_matches(']');
            let date: NaiveDate = date_text.parse().map_err(|e| {
                CollectError::StructuralMismatch(format!("日期 {:?} 解析失败: {}", date_text, e))
            })?;

            let url = origin
                .join(&href)
                .map_err(|e| CollectError::StructuralMismatch(format!("链接 {:?}: {}", href, e)))?;

            entries.push(NoticeIndexEntry {
                title,
                date,
                url: url.to_string(),
            });
        }

        Ok(entries)
    }

    fn parse_detail(&self, html: &str) -> Result<NoticeDetail> {
        let document = Html::parse_document(html);
        let article_selector = Selector::parse("div.article-detail-text").unwrap();
        let title_selector = Selector::parse("h1").unwrap();
        let date_selector = Selector::parse("p.article-date").unwrap();
        let code_selector = Selector::parse(
            r#"p[style="text-align: center;"], p[style="text-align: center"]"#,
        )
        .unwrap();
        let paragraph_selector = Selector::parse("p").unwrap();

        let article = document
            .select(&article_selector)
            .next()
            .ok_or_else(|| CollectError::StructuralMismatch("未找到正文容器".to_string()))?;

        let title = article
            .select(&title_selector)
            .next()
            .map(|h| h.text().collect::<Vec<_>>().join("").trim().to_string())
            .unwrap_or_default();

        // 发布日期是长文本节点的最后 10 个字符
        let date = article
            .select(&date_selector)
            .next()
            .map(|p| p.text().collect::<Vec<_>>().join(""))
            .and_then(|text| last_n_chars(text.trim_end(), 10).parse().ok());

        let code = article
            .select(&code_selector)
            .next()
            .map(|p| {
                p.text()
                    .collect::<Vec<_>>()
                    .join("")
                    .trim_matches('\u{a0}')
                    .to_string()
            })
            .unwrap_or_default();

        // 正文是不带任何属性的段落，带 style/class 的排版段落不算
        let content: Vec<String> = article
            .select(&paragraph_selector)
            .filter(|p| p.value().attrs().next().is_none())
            .map(|p| p.text().collect::<Vec<_>>().join(""))
            .filter(|text| !text.trim().is_empty())
            .collect();

        Ok(NoticeDetail {
            title,
            date,
            code,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const INDEX_HTML: &str = r#"
<html><body>
<div class="p4 lawbox">
  <ul>
    <li><a title="关于调整保证金的通知" href="/news/notice/911.html"></a><span>[2021-07-15]</span></li>
    <li><a title="关于新合约挂牌的公告" href="/news/notice/912.html"></a><span>[2021-07-16]</span></li>
  </ul>
</div>
<div class="page-no">
  <select><option>1</option><option>2</option><option>38</option></select>
</div>
</body></html>"#;

    #[test]
    fn test_parse_index() {
        let entries = ShfeNoticeSource.parse_index(INDEX_HTML).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "关于调整保证金的通知");
        assert_eq!(
            entries[0].date,
            NaiveDate::from_ymd_opt(2021, 7, 15).unwrap()
        );
        assert_eq!(entries[0].url, "http://www.shfe.com.cn/news/notice/911.html");
        assert_eq!(entries[1].url, "http://www.shfe.com.cn/news/notice/912.html");
    }

    #[test]
    fn test_parse_page_count() {
        assert_eq!(ShfeNoticeSource.parse_page_count(INDEX_HTML).unwrap(), 38);
    }

    /// 日期节点比标题少一个，结构不匹配
    #[test]
    fn test_parse_index_mismatch() {
        let html = r#"
<div class="p4 lawbox"><ul>
  <li><a title="甲" href="/a.html"></a><span>[2021-07-15]</span></li>
  <li><a title="乙" href="/b.html"></a></li>
</ul></div>"#;
        let result = ShfeNoticeSource.parse_index(html);
        assert!(matches!(result, Err(CollectError::StructuralMismatch(_))));
    }

    #[test]
    fn test_parse_detail() {
        let html = "
<html><body><div class=\"article-detail-text\">
  <h1>关于调整保证金的通知</h1>
  <p class=\"article-date\">发布时间：2021-07-15</p>
  <p style=\"text-align: center;\">\u{a0}上期发〔2021〕97号\u{a0}</p>
  <p>各会员单位：</p>
  <p class=\"caption\">（配图说明，不属于正文）</p>
  <p>经研究决定，自结算时起调整保证金比例。</p>
</div></body></html>";
        let detail = ShfeNoticeSource.parse_detail(html).unwrap();
        assert_eq!(detail.title, "关于调整保证金的通知");
        assert_eq!(detail.date, NaiveDate::from_ymd_opt(2021, 7, 15));
        assert_eq!(detail.code, "上期发〔2021〕97号");
        assert_eq!(
            detail.content,
            vec!["各会员单位：", "经研究决定，自结算时起调整保证金比例。"]
        );
    }

    /// 没有居中文号段落时 code 为空字符串
    #[test]
    fn test_parse_detail_without_code() {
        let html = r#"
<div class="article-detail-text">
  <h1>通知</h1>
  <p class="article-date">发布时间：2021-07-15</p>
  <p>正文。</p>
</div>"#;
        let detail = ShfeNoticeSource.parse_detail(html).unwrap();
        assert_eq!(detail.code, "");
        assert_eq!(detail.content, vec!["正文。"]);
    }

    #[test]
    fn test_index_url() {
        assert_eq!(
            ShfeNoticeSource.index_url(1),
            "http://www.shfe.com.cn/news/notice/index.html"
        );
        assert_eq!(
            ShfeNoticeSource.index_url(7),
            "http://www.shfe.com.cn/news/notice/index_7.html"
        );
    }
}
