//! 大商所公告源
//!
//! 列表页：`http://www.dce.com.cn/dalianshangpin/ywfw/jystz/ywtz/13305-{page}.html`，
//! 首页也带页号。日期是裸 ISO 文本，总页数在分页控件隐藏输入框的
//! `totalpage` 属性上。

use chrono::NaiveDate;
use scraper::{Html, Selector};
use url::Url;

use crate::models::{NoticeDetail, NoticeIndexEntry};
use crate::services::error::{CollectError, Result};

use super::{last_n_chars, NoticeSource};

/// 站点源
const DCE_ORIGIN: &str = "http://www.dce.com.cn";

/// 大商所公告抽取规则
pub struct DceNoticeSource;

impl NoticeSource for DceNoticeSource {
    fn name(&self) -> &'static str {
        "DCE"
    }

    fn index_url(&self, page: usize) -> String {
        format!("{}/dalianshangpin/ywfw/jystz/ywtz/13305-{}.html", DCE_ORIGIN, page)
    }

    fn parse_page_count(&self, html: &str) -> Result<usize> {
        let document = Html::parse_document(html);
        let input_selector =
            Selector::parse(r#"div.pagination input[name="article_paging_list_hidden"]"#).unwrap();

        let input = document
            .select(&input_selector)
            .next()
            .ok_or_else(|| CollectError::StructuralMismatch("未找到分页控件".to_string()))?;

        let totalpage = input.value().attr("totalpage").ok_or_else(|| {
            CollectError::StructuralMismatch("分页控件缺少 totalpage 属性".to_string())
        })?;

        totalpage.trim().parse().map_err(|_| {
            CollectError::StructuralMismatch(format!("totalpage 不是数字: {:?}", totalpage))
        })
    }

    fn parse_index(&self, html: &str) -> Result<Vec<NoticeIndexEntry>> {
        let document = Html::parse_document(html);
        let link_selector = Selector::parse(r#"ul[opentype="page"] li a"#).unwrap();
        let date_selector = Selector::parse(r#"ul[opentype="page"] li span"#).unwrap();

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

        let origin = Url::parse(DCE_ORIGIN)
            .map_err(|e| CollectError::StructuralMismatch(format!("站点源无效: {}", e)))?;

        let mut entries = Vec::with_capacity(titles.len());
        for ((title, date_text), href) in titles.into_iter().zip(dates).zip(hrefs) {
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
        let title_selector = Selector::parse("div.tit_header h2").unwrap();
        let date_selector = Selector::parse(
            "div.detail_content span.detail_content_footer p.notice_date",
        )
        .unwrap();
        let code_selector = Selector::parse("div.tit_header p.summary.cj_date").unwrap();
        let content_selector = Selector::parse("div.detail_content > p").unwrap();

        let title = document
            .select(&title_selector)
            .next()
            .map(|h| h.text().collect::<Vec<_>>().join("").trim().to_string())
            .ok_or_else(|| CollectError::StructuralMismatch("未找到公告标题".to_string()))?;

        let date = document
            .select(&date_selector)
            .next()
            .map(|p| p.text().collect::<Vec<_>>().join(""))
            .and_then(|text| last_n_chars(text.trim_end(), 10).parse().ok());

        let code = document
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

        let content: Vec<String> = document
            .select(&content_selector)
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
<ul opentype="page">
  <li><a title="关于麦芽大麦期货上市的通知" href="/dalianshangpin/1.html"></a><span>2021-06-01</span></li>
  <li><a title="关于调整交割库的公告" href="/dalianshangpin/2.html"></a><span>2021-06-02</span></li>
</ul>
<div class="pagination">
  <input name="article_paging_list_hidden" totalpage="12" type="hidden"/>
</div>
</body></html>"#;

    #[test]
    fn test_parse_index() {
        let entries = DceNoticeSource.parse_index(INDEX_HTML).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].title, "关于麦芽大麦期货上市的通知");
        assert_eq!(
            entries[0].date,
            NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()
        );
        assert_eq!(entries[0].url, "http://www.dce.com.cn/dalianshangpin/1.html");
    }

    #[test]
    fn test_parse_page_count() {
        assert_eq!(DceNoticeSource.parse_page_count(INDEX_HTML).unwrap(), 12);
    }

    /// 链接比日期多，结构不匹配
    #[test]
    fn test_parse_index_mismatch() {
        let html = r#"
<ul opentype="page">
  <li><a title="甲" href="/a.html"></a><span>2021-06-01</span></li>
  <li><a title="乙" href="/b.html"></a></li>
</ul>"#;
        assert!(matches!(
            DceNoticeSource.parse_index(html),
            Err(CollectError::StructuralMismatch(_))
        ));
    }

    #[test]
    fn test_parse_detail() {
        let html = "
<div class=\"tit_header\">
  <h2>关于调整交割库的公告</h2>
  <p class=\"summary cj_date\">大商所发〔2021〕45号</p>
</div>
<div class=\"detail_content\">
  <p>各会员单位：</p>
  <p>现就交割库调整事项公告如下。</p>
  <span class=\"detail_content_footer\"><p class=\"notice_date\">发布日期：2021-06-02</p></span>
</div>";
        let detail = DceNoticeSource.parse_detail(html).unwrap();
        assert_eq!(detail.title, "关于调整交割库的公告");
        assert_eq!(detail.code, "大商所发〔2021〕45号");
        assert_eq!(detail.date, NaiveDate::from_ymd_opt(2021, 6, 2));
        assert_eq!(
            detail.content,
            vec!["各会员单位：", "现就交割库调整事项公告如下。"]
        );
    }

    #[test]
    fn test_index_url() {
        assert_eq!(
            DceNoticeSource.index_url(1),
            "http://www.dce.com.cn/dalianshangpin/ywfw/jystz/ywtz/13305-1.html"
        );
    }
}
