use actix_web::{web, HttpResponse, Result};

use crate::config::AppConfig;
use crate::models::{ApiResponse, Notice};
use crate::services::crawler::Crawler;
use crate::services::notice::{crawl_notices, DceNoticeSource, ShfeNoticeSource};

/// 采集一个交易所的全部公告
pub async fn get_notices(
    path: web::Path<String>,
    config: web::Data<AppConfig>,
) -> Result<HttpResponse> {
    let exchange = path.into_inner();
    let crawler = Crawler::from_config(&config.http);

    let result = match exchange.to_lowercase().as_str() {
        "shfe" => crawl_notices(&crawler, &ShfeNoticeSource).await,
        "dce" => crawl_notices(&crawler, &DceNoticeSource).await,
        _ => {
            let response =
                ApiResponse::<Vec<Notice>>::error(format!("未知公告源: {}", exchange));
            return Ok(HttpResponse::BadRequest().json(response));
        }
    };

    match result {
        Ok(notices) => Ok(HttpResponse::Ok().json(ApiResponse::success_list(notices))),
        Err(e) => {
            let response = ApiResponse::<Vec<Notice>>::error(e.to_string());
            Ok(HttpResponse::InternalServerError().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/notices").route("/{exchange}", web::get().to(get_notices)));
}
