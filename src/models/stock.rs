//! 股票上市信息数据模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 一条上市证券记录
///
/// 来自交易所上市公司列表接口，名称已做归一化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockListing {
    /// 交易所代码（SSE / SZSE）
    pub exchange: String,
    /// 证券代码
    pub symbol: String,
    /// 证券简称（归一化后）
    pub name: String,
    /// 板块（主板 / 创业板 / B股 ...）
    pub market: String,
    /// 上市日期
    pub listing_date: Option<NaiveDate>,
    /// 暂停上市日期（仅暂停上市列表有值）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paused_date: Option<NaiveDate>,
    /// 终止上市日期（仅终止上市列表有值）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub terminated_date: Option<NaiveDate>,
}

impl StockListing {
    /// 一条在市记录（无暂停/终止日期）
    pub fn listed(
        exchange: &str,
        symbol: String,
        name: String,
        market: String,
        listing_date: Option<NaiveDate>,
    ) -> Self {
        Self {
            exchange: exchange.to_string(),
            symbol,
            name,
            market,
            listing_date,
            paused_date: None,
            terminated_date: None,
        }
    }
}

/// 股票列表查询参数
#[derive(Debug, Deserialize)]
pub struct StockListQuery {
    /// SSE 股票类别（main_a / main_b / star / listing / paused / terminated）
    pub stock_type: Option<String>,
    /// SZSE 板块（a / b / cdr / ab / paused / terminated）
    pub board: Option<String>,
}
