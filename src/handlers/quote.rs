use actix_web::{web, HttpResponse, Result};

use crate::config::AppConfig;
use crate::models::{ApiResponse, Candle, QuoteQuery, QuoteTable};
use crate::services::tdx::{read_quote, TdxExchange, TdxPeriod};

/// 读取通达信本地行情
///
/// `shape=records`（默认）返回K线对象数组，`shape=table` 返回列式表
pub async fn local_quotes(
    path: web::Path<(String, String)>,
    query: web::Query<QuoteQuery>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    let (exchange_raw, symbol) = path.into_inner();

    let exchange = match TdxExchange::from_query(&exchange_raw) {
        Some(exchange) => exchange,
        None => {
            let response =
                ApiResponse::<Vec<Candle>>::error(format!("未知交易所: {}", exchange_raw));
            return Ok(HttpResponse::BadRequest().json(response));
        }
    };

    let period = match query.period.as_deref() {
        None => TdxPeriod::Day,
        Some(value) => match TdxPeriod::from_query(value) {
            Some(period) => period,
            None => {
                let response = ApiResponse::<Vec<Candle>>::error(format!("未知周期: {}", value));
                return Ok(HttpResponse::BadRequest().json(response));
            }
        },
    };

    match read_quote(&config.tdx.root, exchange, &symbol, period) {
        Ok(candles) => match query.shape.as_deref() {
            Some("table") => {
                let table = QuoteTable::from_candles(&candles, period.is_intraday());
                Ok(HttpResponse::Ok().json(ApiResponse::success(table)))
            }
            _ => Ok(HttpResponse::Ok().json(ApiResponse::success_list(candles))),
        },
        Err(e) => {
            let response = ApiResponse::<Vec<Candle>>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/quotes").route("/{exchange}/{symbol}", web::get().to(local_quotes)),
    );
}
