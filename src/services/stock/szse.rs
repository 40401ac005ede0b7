//! 深交所股票列表
//!
//! 接口返回一个按 TABKEY 索引的 JSON 数组，总页数在
//! `metadata.pagecount`。证券简称字段内嵌 `<u>` 链接片段，
//! 取其内部文本再归一化。请求必须带 `Host` 和 `Referer`。

use std::collections::BTreeMap;

use chrono::NaiveDate;
use regex::Regex;
use serde_json::Value;

use crate::models::StockListing;
use crate::services::crawler::Crawler;
use crate::services::error::{CollectError, Result};
use crate::services::normalize::normalize_security_name;

/// 报表数据接口
const SZSE_REPORT_API: &str = "http://www.szse.cn/api/report/ShowReport/data";
/// 深交所要求的 Host
const SZSE_HOST: &str = "www.szse.cn";
/// 深交所要求的 Referer
const SZSE_REFERER: &str = "http://www.szse.cn/market/product/stock/list/index.html";

/// 深交所板块
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SzseBoard {
    /// A股
    ListedA,
    /// B股
    ListedB,
    /// 中国存托凭证
    ListedCdr,
    /// A+B股
    ListedAB,
    /// 暂停上市
    Paused,
    /// 终止上市
    Terminated,
}

impl SzseBoard {
    fn catalog_id(&self) -> &'static str {
        match self {
            SzseBoard::ListedA | SzseBoard::ListedB | SzseBoard::ListedCdr | SzseBoard::ListedAB => {
                "1110"
            }
            SzseBoard::Paused | SzseBoard::Terminated => "1793_ssgs",
        }
    }

    fn tab_key(&self) -> usize {
        match self {
            SzseBoard::ListedA => 1,
            SzseBoard::ListedB => 2,
            SzseBoard::ListedCdr => 3,
            SzseBoard::ListedAB => 4,
            SzseBoard::Paused => 1,
            SzseBoard::Terminated => 2,
        }
    }

    /// 从查询参数解析板块
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "a" => Some(SzseBoard::ListedA),
            "b" => Some(SzseBoard::ListedB),
            "cdr" => Some(SzseBoard::ListedCdr),
            "ab" => Some(SzseBoard::ListedAB),
            "paused" => Some(SzseBoard::Paused),
            "terminated" => Some(SzseBoard::Terminated),
            _ => None,
        }
    }
}

fn page_url(board: SzseBoard, page: usize) -> String {
    format!(
        "{}?SHOWTYPE=JSON&CATALOGID={}&TABKEY=tab{}&PAGENO={}&random=0.43792128180408896",
        SZSE_REPORT_API,
        board.catalog_id(),
        board.tab_key(),
        page
    )
}

/// 去掉字段里内嵌的 HTML 片段，取纯文本简称
fn extract_name(fragment: &str) -> String {
    let tag_re = Regex::new(r"<[^>]*>").unwrap();
    normalize_security_name(tag_re.replace_all(fragment, "").trim())
}

fn parse_date(item: &Value, key: &str) -> Option<NaiveDate> {
    item[key].as_str().and_then(|s| s.parse().ok())
}

/// 按证券代码首位推断板块（暂停/终止列表没有板块字段）
fn market_from_symbol(symbol: &str) -> &'static str {
    match symbol.chars().next() {
        Some('2') => "B股",
        Some('3') => "创业板",
        _ => "主板",
    }
}

/// 解析一页响应，返回（总页数，本页记录）
fn parse_report_page(raw: &str, board: SzseBoard) -> Result<(usize, Vec<StockListing>)> {
    let root: Value = serde_json::from_str(raw)?;
    let tab = root
        .get(board.tab_key() - 1)
        .ok_or_else(|| CollectError::StructuralMismatch("缺少 TABKEY 对应的数据块".to_string()))?;

    let page_count = tab["metadata"]["pagecount"]
        .as_u64()
        .ok_or_else(|| CollectError::StructuralMismatch("缺少 metadata.pagecount".to_string()))?
        as usize;

    let rows = tab["data"]
        .as_array()
        .ok_or_else(|| CollectError::StructuralMismatch("缺少 data 数组".to_string()))?;

    let mut listings = Vec::with_capacity(rows.len());
    for item in rows {
        let listing = match board {
            SzseBoard::ListedA => StockListing::listed(
                "SZSE",
                item["agdm"].as_str().unwrap_or("").to_string(),
                extract_name(item["agjc"].as_str().unwrap_or("")),
                item["bk"].as_str().unwrap_or("主板").to_string(),
                parse_date(item, "agssrq"),
            ),
            SzseBoard::ListedB => StockListing::listed(
                "SZSE",
                item["bgdm"].as_str().unwrap_or("").to_string(),
                extract_name(item["bgjc"].as_str().unwrap_or("")),
                "B股".to_string(),
                parse_date(item, "bgssrq"),
            ),
            SzseBoard::ListedCdr => StockListing::listed(
                "SZSE",
                item["zqdm"].as_str().unwrap_or("").to_string(),
                extract_name(item["zqjc"].as_str().unwrap_or("")),
                "CDR".to_string(),
                parse_date(item, "ssrq"),
            ),
            SzseBoard::ListedAB => StockListing::listed(
                "SZSE",
                item["agdm"].as_str().unwrap_or("").to_string(),
                extract_name(item["agjc"].as_str().unwrap_or("")),
                "主板".to_string(),
                parse_date(item, "agssrq"),
            ),
            SzseBoard::Paused | SzseBoard::Terminated => {
                let symbol = item["zqdm"].as_str().unwrap_or("").to_string();
                let mut listing = StockListing::listed(
                    "SZSE",
                    symbol.clone(),
                    extract_name(item["zqjc"].as_str().unwrap_or("")),
                    market_from_symbol(&symbol).to_string(),
                    parse_date(item, "ssrq"),
                );
                if board == SzseBoard::Paused {
                    listing.paused_date = parse_date(item, "ztrq");
                } else {
                    listing.terminated_date = parse_date(item, "zzrq");
                }
                listing
            }
        };

        if !listing.symbol.is_empty() {
            listings.push(listing);
        }
    }

    Ok((page_count, listings))
}

/// 采集深交所某一板块的全部股票列表
pub async fn get_stock_listings_from_szse(
    crawler: &Crawler,
    board: SzseBoard,
) -> Result<Vec<StockListing>> {
    let headers = [("Host", SZSE_HOST), ("Referer", SZSE_REFERER)];

    let first_url = page_url(board, 1);
    let raw = crawler.fetch_with(&first_url, &headers).await?;
    let (page_count, mut listings) = parse_report_page(&raw, board)?;
    log::info!("SZSE {:?} 共 {} 页", board, page_count);

    for page in 2..=page_count {
        let url = page_url(board, page);
        let raw = match crawler.fetch_with(&url, &headers).await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("SZSE 第 {} 页抓取失败，跳过: {} ({})", page, e, url);
                continue;
            }
        };
        match parse_report_page(&raw, board) {
            Ok((_, mut rows)) => listings.append(&mut rows),
            Err(e) => log::warn!("SZSE 第 {} 页解析失败，跳过: {} ({})", page, e, url),
        }
    }

    Ok(listings)
}

/// 采集深交所全部板块并按证券代码合并
///
/// A+B 股的证券在 A、B 两个列表里各出现一次，不再单独抓 A+B 板块；
/// 暂停上市记录覆盖同代码的在市记录。
pub async fn get_all_stock_listings_from_szse(crawler: &Crawler) -> Result<Vec<StockListing>> {
    let boards = [
        SzseBoard::ListedA,
        SzseBoard::ListedB,
        SzseBoard::ListedCdr,
        SzseBoard::Paused,
        SzseBoard::Terminated,
    ];

    let mut merged: BTreeMap<String, StockListing> = BTreeMap::new();
    for board in boards {
        let listings = get_stock_listings_from_szse(crawler, board).await?;
        for listing in listings {
            match merged.get(&listing.symbol) {
                None => {
                    merged.insert(listing.symbol.clone(), listing);
                }
                Some(_) if board == SzseBoard::Paused => {
                    merged.insert(listing.symbol.clone(), listing);
                }
                Some(_) => {
                    log::debug!("SZSE {} 已存在，跳过 {:?} 中的重复记录", listing.symbol, board);
                }
            }
        }
    }

    Ok(merged.into_values().collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_A: &str = r#"[
        {"metadata":{"pagecount":57},"data":[
            {"agdm":"000001","agjc":"<u onclick=\"go('000001')\">平安银行</u>","bk":"主板","agssrq":"1991-04-03"},
            {"agdm":"000002","agjc":"<u onclick=\"go('000002')\">万 科Ａ</u>","bk":"主板","agssrq":"1991-01-29"}
        ]},
        {"metadata":{"pagecount":1},"data":[]}
    ]"#;

    #[test]
    fn test_parse_report_page_board_a() {
        let (page_count, listings) = parse_report_page(PAGE_A, SzseBoard::ListedA).unwrap();
        assert_eq!(page_count, 57);
        assert_eq!(listings.len(), 2);
        assert_eq!(listings[0].symbol, "000001");
        assert_eq!(listings[0].name, "平安银行");
        assert_eq!(
            listings[0].listing_date,
            Some(NaiveDate::from_ymd_opt(1991, 4, 3).unwrap())
        );
        // HTML 片段剥掉、全角折半角
        assert_eq!(listings[1].name, "万科A");
    }

    #[test]
    fn test_parse_report_page_terminated() {
        let raw = r#"[
            {"metadata":{"pagecount":1},"data":[]},
            {"metadata":{"pagecount":1},"data":[
                {"zqdm":"300028","zqjc":"华谊嘉信","ssrq":"2009-10-30","zzrq":"2021-05-10"}
            ]}
        ]"#;
        let (_, listings) = parse_report_page(raw, SzseBoard::Terminated).unwrap();
        assert_eq!(listings.len(), 1);
        assert_eq!(listings[0].market, "创业板");
        assert_eq!(
            listings[0].terminated_date,
            Some(NaiveDate::from_ymd_opt(2021, 5, 10).unwrap())
        );
    }

    #[test]
    fn test_parse_report_page_missing_tab() {
        assert!(matches!(
            parse_report_page("[]", SzseBoard::ListedA),
            Err(CollectError::StructuralMismatch(_))
        ));
    }

    #[test]
    fn test_market_from_symbol() {
        assert_eq!(market_from_symbol("000001"), "主板");
        assert_eq!(market_from_symbol("200011"), "B股");
        assert_eq!(market_from_symbol("300028"), "创业板");
    }

    #[test]
    fn test_extract_name() {
        assert_eq!(extract_name("<u onclick=\"x\">云赛Ｂ股</u>"), "云赛B股");
        assert_eq!(extract_name("平安银行"), "平安银行");
    }
}
