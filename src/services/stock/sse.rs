//! 上交所股票列表
//!
//! 接口返回 JSONP（`jsonpCallback97956(...)`），剥壳后按
//! `pageHelp.pageCount` 分页，行数据在 `pageHelp.data`。

use chrono::NaiveDate;
use serde_json::Value;

use crate::models::StockListing;
use crate::services::crawler::{strip_jsonp, Crawler};
use crate::services::error::{CollectError, Result};
use crate::services::normalize::normalize_security_name;

/// 股票列表接口
const SSE_STOCK_LIST_API: &str = "http://query.sse.com.cn/security/stock/getStockListData2.do";
/// 回调前缀 `jsonpCallback97956(` 的固定长度
const SSE_JSONP_PREFIX_LEN: usize = 19;
/// 每页行数
const SSE_PAGE_SIZE: usize = 500;
/// 上交所要求的 Referer
const SSE_REFERER: &str = "http://www.sse.com.cn/";

/// 上交所股票类别
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SseStockType {
    /// 已上市，主板A股
    MainBoardA,
    /// 已上市，主板B股
    MainBoardB,
    /// 已上市，科创板
    StarBoard,
    /// 待上市
    Listing,
    /// 暂停上市
    Paused,
    /// 终止上市
    Terminated,
}

impl SseStockType {
    /// 接口的 stockType 参数值
    fn query_value(&self) -> u8 {
        match self {
            SseStockType::MainBoardA => 1,
            SseStockType::MainBoardB => 2,
            SseStockType::StarBoard => 8,
            SseStockType::Listing => 3,
            SseStockType::Paused => 4,
            SseStockType::Terminated => 5,
        }
    }

    /// 板块名称
    fn market(&self) -> &'static str {
        match self {
            SseStockType::MainBoardA => "主板A股",
            SseStockType::MainBoardB => "主板B股",
            SseStockType::StarBoard => "科创板",
            SseStockType::Listing => "待上市",
            SseStockType::Paused => "暂停上市",
            SseStockType::Terminated => "终止上市",
        }
    }

    /// 从查询参数解析类别
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "main_a" => Some(SseStockType::MainBoardA),
            "main_b" => Some(SseStockType::MainBoardB),
            "star" => Some(SseStockType::StarBoard),
            "listing" => Some(SseStockType::Listing),
            "paused" => Some(SseStockType::Paused),
            "terminated" => Some(SseStockType::Terminated),
            _ => None,
        }
    }
}

fn page_url(stock_type: SseStockType, page: usize) -> String {
    format!(
        "{}?&jsonCallBack=jsonpCallback97956&isPagination=true&stockCode=\
         &csrcCode=&areaName=&stockType={}&pageHelp.cacheSize=1&pageHelp.beginPage={}\
         &pageHelp.pageSize={}&pageHelp.pageNo={}&_=1624790621466",
        SSE_STOCK_LIST_API,
        stock_type.query_value(),
        page,
        SSE_PAGE_SIZE,
        page
    )
}

/// 解析一页 JSONP 响应，返回（总页数，本页记录）
fn parse_listing_page(raw: &str, stock_type: SseStockType) -> Result<(usize, Vec<StockListing>)> {
    let json = strip_jsonp(raw, SSE_JSONP_PREFIX_LEN)?;
    let data: Value = serde_json::from_str(json)?;

    let page_count = data["pageHelp"]["pageCount"]
        .as_u64()
        .ok_or_else(|| CollectError::StructuralMismatch("缺少 pageHelp.pageCount".to_string()))?
        as usize;

    let rows = data["pageHelp"]["data"]
        .as_array()
        .ok_or_else(|| CollectError::StructuralMismatch("缺少 pageHelp.data".to_string()))?;

    let mut listings = Vec::with_capacity(rows.len());
    for item in rows {
        let symbol = item["SECURITY_CODE_A"].as_str().unwrap_or("").to_string();
        if symbol.is_empty() {
            continue;
        }
        let name = normalize_security_name(item["SECURITY_ABBR_A"].as_str().unwrap_or(""));
        let listing_date = item["LISTING_DATE"]
            .as_str()
            .and_then(|s| s.parse::<NaiveDate>().ok());

        listings.push(StockListing::listed(
            "SSE",
            symbol,
            name,
            stock_type.market().to_string(),
            listing_date,
        ));
    }

    Ok((page_count, listings))
}

/// 采集上交所某一类别的全部股票列表
///
/// 第 1 页确定总页数；之后任何一页失败只跳过该页并告警。
pub async fn get_stock_listings_from_sse(
    crawler: &Crawler,
    stock_type: SseStockType,
) -> Result<Vec<StockListing>> {
    let headers = [("Referer", SSE_REFERER)];

    let first_url = page_url(stock_type, 1);
    let raw = crawler.fetch_with(&first_url, &headers).await?;
    let (page_count, mut listings) = parse_listing_page(&raw, stock_type)?;
    log::info!("SSE {} 共 {} 页", stock_type.market(), page_count);

    for page in 2..=page_count {
        let url = page_url(stock_type, page);
        let raw = match crawler.fetch_with(&url, &headers).await {
            Ok(raw) => raw,
            Err(e) => {
                log::warn!("SSE 第 {} 页抓取失败，跳过: {} ({})", page, e, url);
                continue;
            }
        };
        match parse_listing_page(&raw, stock_type) {
            Ok((_, mut rows)) => listings.append(&mut rows),
            Err(e) => log::warn!("SSE 第 {} 页解析失败，跳过: {} ({})", page, e, url),
        }
    }

    Ok(listings)
}
