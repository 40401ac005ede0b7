//! 深证信（深圳证券信息有限公司）数据 API
//!
//! 所有接口都带 `access_token` 查询参数，token 用
//! `client_credentials` 方式另行换取。token 提供者作为显式依赖
//! 注入各采集函数，便于测试替换，不做进程级单例。

use chrono::NaiveDate;
use reqwest::Client;
use serde_json::Value;

use crate::config::CninfoConfig;
use crate::models::{IndustryCategory, TradingDay};
use crate::services::error::{CollectError, Result};

/// 数据接口地址模板
const CNINFO_API_URL: &str = "http://webapi.cninfo.com.cn/api/{category}/{interface}";
/// token 换取接口
const CNINFO_TOKEN_URL: &str = "http://webapi.cninfo.com.cn/api-cloud-platform/oauth2/token";

/// 行业分类标准
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndustryClassification {
    /// 证监会行业分类标准
    Csrc,
    /// 巨潮行业分类标准
    Ssic,
    /// 申银万国行业分类标准
    Sws,
    /// 新财富行业分类标准
    Xcf,
    /// 国资委行业分类标准
    Sasac,
    /// 巨潮产业细分标准
    SsicDetail,
    /// 天相行业分类标准
    Tx,
    /// 全球行业分类标准（GICS）
    Gics,
}

impl IndustryClassification {
    /// 接口的 indtype 参数值
    fn query_value(&self) -> &'static str {
        match self {
            IndustryClassification::Csrc => "008001",
            IndustryClassification::Ssic => "008002",
            IndustryClassification::Sws => "008003",
            IndustryClassification::Xcf => "008004",
            IndustryClassification::Sasac => "008005",
            IndustryClassification::SsicDetail => "008006",
            IndustryClassification::Tx => "008007",
            IndustryClassification::Gics => "008008",
        }
    }

    /// 从查询参数解析分类标准
    pub fn from_query(value: &str) -> Option<Self> {
        match value {
            "csrc" => Some(IndustryClassification::Csrc),
            "ssic" => Some(IndustryClassification::Ssic),
            "sws" => Some(IndustryClassification::Sws),
            "xcf" => Some(IndustryClassification::Xcf),
            "sasac" => Some(IndustryClassification::Sasac),
            "ssic_detail" => Some(IndustryClassification::SsicDetail),
            "tx" => Some(IndustryClassification::Tx),
            "gics" => Some(IndustryClassification::Gics),
            _ => None,
        }
    }
}

/// token 提供者
///
/// 持有凭证并缓存换取到的 access_token；凭证缺失或换取失败是
/// `Configuration` 错误——该数据源无法继续采集。
pub struct CninfoTokenProvider {
    client: Client,
    access_key: String,
    access_secret: String,
    cached_token: Option<String>,
}

impl CninfoTokenProvider {
    /// 从配置创建 token 提供者
    pub fn new(config: &CninfoConfig) -> Self {
        Self {
            client: Client::new(),
            access_key: config.access_key.clone(),
            access_secret: config.access_secret.clone(),
            cached_token: None,
        }
    }

    /// 取 access_token，首次调用时向服务器换取并缓存
    pub async fn access_token(&mut self) -> Result<String> {
        if let Some(ref token) = self.cached_token {
            return Ok(token.clone());
        }

        if self.access_key.is_empty() || self.access_secret.is_empty() {
            return Err(CollectError::Configuration(
                "缺少深证信 access_key / access_secret 配置".to_string(),
            ));
        }

        let response = self
            .client
            .post(CNINFO_TOKEN_URL)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.access_key.as_str()),
                ("client_secret", self.access_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| CollectError::Configuration(format!("token 换取请求失败: {}", e)))?;

        if !response.status().is_success() {
            return Err(CollectError::Configuration(format!(
                "token 换取失败: HTTP {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| CollectError::Configuration(format!("token 响应无法解析: {}", e)))?;

        let token = body["access_token"]
            .as_str()
            .ok_or_else(|| {
                CollectError::Configuration("token 响应缺少 access_token 字段".to_string())
            })?
            .to_string();

        self.cached_token = Some(token.clone());
        Ok(token)
    }
}

fn interface_url(category: &str, interface: &str, token: &str) -> String {
    format!(
        "{}?access_token={}",
        CNINFO_API_URL
            .replace("{category}", category)
            .replace("{interface}", interface),
        token
    )
}

fn parse_date_field(record: &Value, key: &str) -> Option<NaiveDate> {
    record[key].as_str().and_then(|s| s.parse().ok())
}

fn parse_flag(record: &Value, key: &str) -> bool {
    record[key].as_str() == Some("1")
}

/// 解析交易日历响应
fn parse_calendar_records(raw: &Value) -> Result<Vec<TradingDay>> {
    let records = raw["records"]
        .as_array()
        .ok_or_else(|| CollectError::StructuralMismatch("缺少 records 数组".to_string()))?;

    Ok(records
        .iter()
        .map(|record| TradingDay {
            date: parse_date_field(record, "F001D"),
            previous_trading_day: parse_date_field(record, "F011D"),
            next_trading_day: parse_date_field(record, "F012D"),
            is_week_beginning: parse_flag(record, "F002C"),
            is_week_end: parse_flag(record, "F003C"),
            is_month_beginning: parse_flag(record, "F004C"),
            is_month_end: parse_flag(record, "F005C"),
            is_trading_day: parse_flag(record, "F006C"),
            is_quarter_end: parse_flag(record, "F007C"),
            is_half_year_end: parse_flag(record, "F008C"),
            is_year_end: parse_flag(record, "F009C"),
            is_interbank_trading_day: parse_flag(record, "F010C"),
            is_hkex_trading_day: parse_flag(record, "F013C"),
            is_ah_trading_day: parse_flag(record, "F014C"),
            is_ha_trading_day: parse_flag(record, "F015C"),
        })
        .collect())
}

/// 获取交易日历（`p_public0001`）
pub async fn get_trading_calendar(
    token_provider: &mut CninfoTokenProvider,
    date_start: Option<NaiveDate>,
    date_end: Option<NaiveDate>,
    state: Option<bool>,
) -> Result<Vec<TradingDay>> {
    let token = token_provider.access_token().await?;
    let mut url = interface_url("stock", "p_public0001", &token);

    if let Some(start) = date_start {
        url.push_str(&format!("&sdate={}", start));
    }
    if let Some(end) = date_end {
        url.push_str(&format!("&edate={}", end));
    }
    if let Some(state) = state {
        url.push_str(&format!("&state={}", if state { "1" } else { "0" }));
    }

    let response = token_provider.client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(CollectError::Network(format!(
            "HTTP {} : {}",
            response.status(),
            url
        )));
    }

    let raw: Value = serde_json::from_str(&response.text().await?)?;
    let days = parse_calendar_records(&raw)?;
    log::info!("深证信交易日历共 {} 条", days.len());
    Ok(days)
}

/// 解析行业分类响应
fn parse_industry_records(raw: &Value) -> Result<Vec<IndustryCategory>> {
    let records = raw["records"]
        .as_array()
        .ok_or_else(|| CollectError::StructuralMismatch("缺少 records 数组".to_string()))?;

    Ok(records
        .iter()
        .map(|record| IndustryCategory {
            parent: record["PARENTCODE"].as_str().unwrap_or("").to_string(),
            code: record["SORTCODE"].as_str().unwrap_or("").to_string(),
            name: record["SORTNAME"].as_str().unwrap_or("").to_string(),
            name_en: record["F001V"].as_str().unwrap_or("").to_string(),
            expiration_date: parse_date_field(record, "F002D"),
            industry_type_code: record["F003V"].as_str().unwrap_or("").to_string(),
            industry_type: record["F004V"].as_str().unwrap_or("").to_string(),
        })
        .collect())
}

/// 获取行业分类（`p_public0002`）
pub async fn get_industry_categories(
    token_provider: &mut CninfoTokenProvider,
    classification: IndustryClassification,
) -> Result<Vec<IndustryCategory>> {
    let token = token_provider.access_token().await?;
    let url = format!(
        "{}&indtype={}",
        interface_url("stock", "p_public0002", &token),
        classification.query_value()
    );

    let response = token_provider.client.get(&url).send().await?;
    if !response.status().is_success() {
        return Err(CollectError::Network(format!(
            "HTTP {} : {}",
            response.status(),
            url
        )));
    }

    let raw: Value = serde_json::from_str(&response.text().await?)?;
    let categories = parse_industry_records(&raw)?;
    log::info!("深证信行业分类（{:?}）共 {} 条", classification, categories.len());
    Ok(categories)
}
