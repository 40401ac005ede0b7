//! 期货合约数据模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 一份期货合约的基础信息
///
/// 来自上期所 `ContractBaseInfo{date}.dat`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuturesContract {
    /// 合约代码（如 cu2109）
    pub instrument_id: String,
    /// 品种代码（合约代码的字母前缀）
    pub product: String,
    /// 交割月份（合约代码的数字后缀）
    pub delivery_month: String,
    /// 挂牌日
    pub listing_date: Option<NaiveDate>,
    /// 到期日
    pub expiration_date: Option<NaiveDate>,
    /// 开始交割日
    pub delivery_begin_date: Option<NaiveDate>,
    /// 最后交割日
    pub delivery_end_date: Option<NaiveDate>,
    /// 挂牌基准价
    pub basis_price: f64,
}

/// 日行情汇总里的一条品种-合约记录
///
/// 来自上期所 `kx{date}.dat` 的 `o_curinstrument`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FuturesDailyItem {
    /// 品种代码（如 cu）
    pub product_id: String,
    /// 品种中文名
    pub product_name: String,
    /// 交割月份
    pub delivery_month: String,
}

/// 期货数据查询参数
#[derive(Debug, Deserialize)]
pub struct FuturesQuery {
    /// 交易日（YYYYMMDD 或 ISO）
    pub date: Option<String>,
}
