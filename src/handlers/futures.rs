use actix_web::{web, HttpResponse, Result};

use crate::config::AppConfig;
use crate::models::{ApiResponse, FuturesContract, FuturesDailyItem, FuturesQuery};
use crate::services::crawler::Crawler;
use crate::services::futures::{
    download_year_archive, get_contracts_from_shfe, get_daily_items_from_shfe,
};

/// 上期所合约基础信息
pub async fn shfe_contracts(
    query: web::Query<FuturesQuery>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    let date = match query.date.as_deref() {
        Some(date) => date.to_string(),
        None => {
            let response =
                ApiResponse::<Vec<FuturesContract>>::error("缺少 date 参数".to_string());
            return Ok(HttpResponse::BadRequest().json(response));
        }
    };

    let crawler = Crawler::from_config(&config.http);
    match get_contracts_from_shfe(&crawler, &date).await {
        Ok(contracts) => Ok(HttpResponse::Ok().json(ApiResponse::success_list(contracts))),
        Err(e) => {
            let response = ApiResponse::<Vec<FuturesContract>>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

/// 上期所日行情汇总（品种与在市合约）
pub async fn shfe_daily(
    query: web::Query<FuturesQuery>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    let date = match query.date.as_deref() {
        Some(date) => date.to_string(),
        None => {
            let response =
                ApiResponse::<Vec<FuturesDailyItem>>::error("缺少 date 参数".to_string());
            return Ok(HttpResponse::BadRequest().json(response));
        }
    };

    let crawler = Crawler::from_config(&config.http);
    match get_daily_items_from_shfe(&crawler, &date).await {
        Ok(items) => Ok(HttpResponse::Ok().json(ApiResponse::success_list(items))),
        Err(e) => {
            let response = ApiResponse::<Vec<FuturesDailyItem>>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

/// 下载上期所年度行情归档
pub async fn shfe_year_archive(
    path: web::Path<i32>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    let year = path.into_inner();
    let crawler = Crawler::from_config(&config.http);

    match download_year_archive(&crawler, &config.path.data_dir, year).await {
        Ok(saved) => Ok(HttpResponse::Ok().json(ApiResponse::success(saved.display().to_string()))),
        Err(e) => {
            let response = ApiResponse::<String>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/futures/shfe")
            .route("/contracts", web::get().to(shfe_contracts))
            .route("/daily", web::get().to(shfe_daily))
            .route("/archive/{year}", web::get().to(shfe_year_archive)),
    );
}
