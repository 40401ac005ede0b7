use actix_web::{web, HttpResponse, Result};

use crate::config::AppConfig;
use crate::models::{ApiResponse, StockListQuery, StockListing};
use crate::services::crawler::Crawler;
use crate::services::stock::{
    get_all_stock_listings_from_szse, get_stock_listings_from_sse, get_stock_listings_from_szse,
    SseStockType, SzseBoard,
};

/// 上交所股票列表
pub async fn list_sse_stocks(
    query: web::Query<StockListQuery>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    let stock_type = match query
        .stock_type
        .as_deref()
        .map(SseStockType::from_query)
    {
        Some(Some(stock_type)) => stock_type,
        None => SseStockType::MainBoardA,
        Some(None) => {
            let response = ApiResponse::<Vec<StockListing>>::error(format!(
                "未知股票类别: {:?}",
                query.stock_type
            ));
            return Ok(HttpResponse::BadRequest().json(response));
        }
    };

    let crawler = Crawler::from_config(&config.http);
    match get_stock_listings_from_sse(&crawler, stock_type).await {
        Ok(listings) => Ok(HttpResponse::Ok().json(ApiResponse::success_list(listings))),
        Err(e) => {
            let response = ApiResponse::<Vec<StockListing>>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

/// 深交所股票列表
///
/// 不带 `board` 参数时采集全部板块并按证券代码合并
pub async fn list_szse_stocks(
    query: web::Query<StockListQuery>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    let crawler = Crawler::from_config(&config.http);

    let result = match query.board.as_deref() {
        None => get_all_stock_listings_from_szse(&crawler).await,
        Some(value) => match SzseBoard::from_query(value) {
            Some(board) => get_stock_listings_from_szse(&crawler, board).await,
            None => {
                let response =
                    ApiResponse::<Vec<StockListing>>::error(format!("未知板块: {}", value));
                return Ok(HttpResponse::BadRequest().json(response));
            }
        },
    };

    match result {
        Ok(listings) => Ok(HttpResponse::Ok().json(ApiResponse::success_list(listings))),
        Err(e) => {
            let response = ApiResponse::<Vec<StockListing>>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/stocks")
            .route("/sse", web::get().to(list_sse_stocks))
            .route("/szse", web::get().to(list_szse_stocks)),
    );
}
