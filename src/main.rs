//! 投研数据采集后端服务
//!
//! 从各交易所/数据商站点采集参考数据（股票列表、期货合约、
//! 交易日历、公告），并读取通达信本地行情文件，
//! 以 RESTful API 对外提供归一化后的记录

mod config;     // 配置加载
mod handlers;   // HTTP 请求处理器
mod middleware; // 中间件
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{web, App, HttpServer, middleware::Logger};
use env_logger::Env;

use crate::config::AppConfig;
use crate::middleware::ApiKeyMiddleware;

/// 应用程序入口
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let app_config = AppConfig::load();

    // 初始化日志系统，级别来自配置
    env_logger::init_from_env(Env::default().default_filter_or(app_config.log.level.as_str()));

    if app_config.api.api_key.is_empty() {
        log::warn!("未配置 API Key，接口不启用认证");
    }

    log::info!("启动投研数据采集服务，监听 {}", app_config.bind_addr());

    let bind_addr = app_config.bind_addr();
    let workers = app_config.server.workers;
    let shared_config = web::Data::new(app_config);

    // 创建并启动 HTTP 服务器
    let mut server = HttpServer::new({
        let shared_config = shared_config.clone();
        move || {
            App::new()
                .app_data(shared_config.clone())
                .wrap(Logger::default())  // 请求日志中间件
                .wrap(ApiKeyMiddleware::new(shared_config.api.api_key.clone()))
                .configure(handlers::config)  // 配置路由
        }
    })
    .bind(bind_addr)?;

    if workers > 0 {
        server = server.workers(workers);
    }

    server.run().await
}
