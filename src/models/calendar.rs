//! 交易日历与行业分类数据模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 交易日历中的一天
///
/// 字段对应深证信 `p_public0001` 接口的 F001D–F015C
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TradingDay {
    /// 日期
    pub date: Option<NaiveDate>,
    /// 前一交易日
    pub previous_trading_day: Option<NaiveDate>,
    /// 后一交易日
    pub next_trading_day: Option<NaiveDate>,
    /// 是否周初
    pub is_week_beginning: bool,
    /// 是否周末
    pub is_week_end: bool,
    /// 是否月初
    pub is_month_beginning: bool,
    /// 是否月末
    pub is_month_end: bool,
    /// 是否交易日
    pub is_trading_day: bool,
    /// 是否季末
    pub is_quarter_end: bool,
    /// 是否半年末
    pub is_half_year_end: bool,
    /// 是否年末
    pub is_year_end: bool,
    /// 是否银行间交易日
    pub is_interbank_trading_day: bool,
    /// 是否港交所交易日
    pub is_hkex_trading_day: bool,
    /// 是否港股通交易日
    pub is_ah_trading_day: bool,
    /// 是否陆股通交易日
    pub is_ha_trading_day: bool,
}

/// 行业分类中的一个类目
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndustryCategory {
    /// 父类编码
    pub parent: String,
    /// 类目编码
    pub code: String,
    /// 类目名称
    pub name: String,
    /// 类目名称（英文）
    pub name_en: String,
    /// 终止日期
    pub expiration_date: Option<NaiveDate>,
    /// 行业类型编码
    pub industry_type_code: String,
    /// 行业类型
    pub industry_type: String,
}

/// 交易日历查询参数
#[derive(Debug, Deserialize)]
pub struct CalendarQuery {
    /// 起始日期（ISO）
    pub start: Option<NaiveDate>,
    /// 结束日期（ISO）
    pub end: Option<NaiveDate>,
    /// 仅交易日
    pub state: Option<bool>,
}

/// 行业分类查询参数
#[derive(Debug, Deserialize)]
pub struct IndustryQuery {
    /// 分类标准（csrc / ssic / sws / xcf / sasac / ssic_detail / tx / gics）
    pub classification: Option<String>,
}
