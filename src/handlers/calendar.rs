use actix_web::{web, HttpResponse, Result};

use crate::config::AppConfig;
use crate::models::{ApiResponse, CalendarQuery, IndustryCategory, IndustryQuery, TradingDay};
use crate::services::calendar::{
    get_industry_categories, get_trading_calendar, CninfoTokenProvider, IndustryClassification,
};

/// 交易日历
pub async fn trading_calendar(
    query: web::Query<CalendarQuery>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    let mut token_provider = CninfoTokenProvider::new(&config.cninfo);

    match get_trading_calendar(&mut token_provider, query.start, query.end, query.state).await {
        Ok(days) => Ok(HttpResponse::Ok().json(ApiResponse::success_list(days))),
        Err(e) => {
            let response = ApiResponse::<Vec<TradingDay>>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

/// 行业分类
pub async fn industry_categories(
    query: web::Query<IndustryQuery>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    let classification = match query.classification.as_deref() {
        None => IndustryClassification::Csrc,
        Some(value) => match IndustryClassification::from_query(value) {
            Some(classification) => classification,
            None => {
                let response = ApiResponse::<Vec<IndustryCategory>>::error(format!(
                    "未知分类标准: {}",
                    value
                ));
                return Ok(HttpResponse::BadRequest().json(response));
            }
        },
    };

    let mut token_provider = CninfoTokenProvider::new(&config.cninfo);
    match get_industry_categories(&mut token_provider, classification).await {
        Ok(categories) => Ok(HttpResponse::Ok().json(ApiResponse::success_list(categories))),
        Err(e) => {
            let response = ApiResponse::<Vec<IndustryCategory>>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/calendar", web::get().to(trading_calendar))
        .route("/industry", web::get().to(industry_categories));
}
