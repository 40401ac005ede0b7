pub mod calendar;
pub mod futures;
pub mod health;
pub mod notice;
pub mod quote;
pub mod stock;

use actix_web::web;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(health::config)
            .configure(notice::config)
            .configure(stock::config)
            .configure(calendar::config)
            .configure(futures::config)
            .configure(quote::config),
    );
}
