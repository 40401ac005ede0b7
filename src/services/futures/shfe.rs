//! 上期所期货参考数据
//!
//! 三个数据面：合约基础信息（`ContractBaseInfo{date}.dat`）、
//! 日行情汇总（`kx{date}.dat`）、年度行情 ZIP 归档。
//! 前两个是伪装成 .dat 的 JSON 文件。

use std::fs;
use std::path::{Path, PathBuf};

use chrono::NaiveDate;
use serde_json::Value;

use crate::models::{FuturesContract, FuturesDailyItem};
use crate::services::crawler::Crawler;
use crate::services::error::{CollectError, Result};

use super::common::{extract_delivery_month, extract_product_code};

/// 合约基础信息接口
const SHFE_CONTRACT_URL: &str = "http://www.shfe.com.cn/data/instrument/ContractBaseInfo";
/// 日行情汇总接口
const SHFE_DAILY_URL: &str = "http://www.shfe.com.cn/data/dailydata/kx/kx";
/// 年度归档接口
const SHFE_YEAR_ARCHIVE_URL: &str = "http://www.shfe.com.cn/historyData/MarketData_Year_";
/// 上期所要求的 Referer
const SHFE_REFERER: &str = "http://www.shfe.com.cn/";

/// 日行情数据最早可用日
const SHFE_DAILY_BEGIN: &str = "2002-01-07";
/// 年度归档最早可用年份
const SHFE_ARCHIVE_BEGIN_YEAR: i32 = 2009;

/// 日行情汇总中跳过的品种代码
const PRODUCT_SKIP_LIST: [&str; 1] = ["sc_tas"];
/// 日行情汇总中跳过的交割月份行
const DELIVERY_SKIP_LIST: [&str; 1] = ["小计"];

/// 解析 YYYYMMDD 紧凑日期
fn parse_compact_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y%m%d").ok()
}

/// 把 ISO 或紧凑格式的交易日统一成 YYYYMMDD
fn format_trade_date(date: &str) -> String {
    date.replace('-', "")
}

/// 解析合约基础信息响应
fn parse_contract_base_info(raw: &str) -> Result<Vec<FuturesContract>> {
    let data: Value = serde_json::from_str(raw)?;
    let items = data["ContractBaseInfo"]
        .as_array()
        .ok_or_else(|| CollectError::StructuralMismatch("缺少 ContractBaseInfo 数组".to_string()))?;

    let mut contracts = Vec::with_capacity(items.len());
    for item in items {
        let instrument_id = item["INSTRUMENTID"].as_str().unwrap_or("").trim().to_string();
        if instrument_id.is_empty() {
            continue;
        }
        contracts.push(FuturesContract {
            product: extract_product_code(&instrument_id),
            delivery_month: extract_delivery_month(&instrument_id),
            listing_date: item["OPENDATE"].as_str().and_then(parse_compact_date),
            expiration_date: item["EXPIREDATE"].as_str().and_then(parse_compact_date),
            delivery_begin_date: item["STARTDELIVDATE"].as_str().and_then(parse_compact_date),
            delivery_end_date: item["ENDDELIVDATE"].as_str().and_then(parse_compact_date),
            basis_price: item["BASISPRICE"]
                .as_str()
                .and_then(|s| s.trim().parse().ok())
                .or_else(|| item["BASISPRICE"].as_f64())
                .unwrap_or(0.0),
            instrument_id,
        });
    }

    Ok(contracts)
}

/// 采集某交易日的合约基础信息
pub async fn get_contracts_from_shfe(
    crawler: &Crawler,
    date: &str,
) -> Result<Vec<FuturesContract>> {
    let url = format!("{}{}.dat", SHFE_CONTRACT_URL, format_trade_date(date));
    let raw = crawler.fetch_with(&url, &[("Referer", SHFE_REFERER)]).await?;
    let contracts = parse_contract_base_info(&raw)?;
    log::info!("SHFE {} 合约基础信息 {} 条", date, contracts.len());
    Ok(contracts)
}

/// 解析日行情汇总响应
///
/// 跳过空品种、黑名单品种（`sc_tas`）和小计行。
fn parse_daily_items(raw: &str) -> Result<Vec<FuturesDailyItem>> {
    let data: Value = serde_json::from_str(raw)?;
    let items = data["o_curinstrument"]
        .as_array()
        .ok_or_else(|| CollectError::StructuralMismatch("缺少 o_curinstrument 数组".to_string()))?;

    let mut rows = Vec::with_capacity(items.len());
    for item in items {
        let product_id = item["PRODUCTGROUPID"].as_str().unwrap_or("").trim().to_string();
        if product_id.is_empty() || PRODUCT_SKIP_LIST.contains(&product_id.as_str()) {
            continue;
        }

        let delivery_month = item["DELIVERYMONTH"].as_str().unwrap_or("").trim().to_string();
        if DELIVERY_SKIP_LIST.contains(&delivery_month.as_str()) {
            continue;
        }

        rows.push(FuturesDailyItem {
            product_id,
            product_name: item["PRODUCTNAME"].as_str().unwrap_or("").trim().to_string(),
            delivery_month,
        });
    }

    Ok(rows)
}

/// 采集某交易日的日行情汇总（品种与在市合约）
///
/// 最早可用日为 2002-01-07，更早的日期是配置错误。
pub async fn get_daily_items_from_shfe(
    crawler: &Crawler,
    date: &str,
) -> Result<Vec<FuturesDailyItem>> {
    let compact = format_trade_date(date);
    if let Ok(day) = NaiveDate::parse_from_str(&compact, "%Y%m%d") {
        let begin: NaiveDate = SHFE_DAILY_BEGIN.parse().map_err(|_| {
            CollectError::Configuration("最早可用日常量无效".to_string())
        })?;
        if day < begin {
            return Err(CollectError::Configuration(format!(
                "SHFE 在 {} 之前没有日行情数据，请求的是 {}",
                SHFE_DAILY_BEGIN, day
            )));
        }
    }

    let url = format!("{}{}.dat", SHFE_DAILY_URL, compact);
    let raw = crawler.fetch_with(&url, &[("Referer", SHFE_REFERER)]).await?;
    let rows = parse_daily_items(&raw)?;
    log::info!("SHFE {} 日行情汇总 {} 条", date, rows.len());
    Ok(rows)
}

/// 下载某年的年度行情归档并校验
///
/// 归档落盘到数据目录，打开并逐一列出条目确认 ZIP 完整；
/// 打不开的归档按数据损坏上报。
pub async fn download_year_archive(
    crawler: &Crawler,
    data_dir: &Path,
    year: i32,
) -> Result<PathBuf> {
    if year < SHFE_ARCHIVE_BEGIN_YEAR {
        return Err(CollectError::Configuration(format!(
            "SHFE 在 {} 年之前没有年度归档，请求的是 {}",
            SHFE_ARCHIVE_BEGIN_YEAR, year
        )));
    }

    let url = format!("{}{}.zip", SHFE_YEAR_ARCHIVE_URL, year);
    let bytes = crawler
        .fetch_bytes(&url, &[("Referer", SHFE_REFERER)])
        .await?;

    fs::create_dir_all(data_dir)?;
    let path = data_dir.join(format!("SHFE_{}.zip", year));
    fs::write(&path, &bytes)?;

    let file = fs::File::open(&path)?;
    let mut archive = zip::ZipArchive::new(file)
        .map_err(|e| CollectError::DataCorruption(format!("ZIP 归档无法打开: {}", e)))?;
    for index in 0..archive.len() {
        let entry = archive
            .by_index(index)
            .map_err(|e| CollectError::DataCorruption(format!("ZIP 条目 {} 无法读取: {}", index, e)))?;
        log::debug!("SHFE_{}.zip 条目: {}", year, entry.name());
    }

    log::info!("SHFE {} 年度归档已保存到 {}", year, path.display());
    Ok(path)
}
