//! 期货参考数据采集

mod common;
pub mod shfe;

pub use shfe::{download_year_archive, get_contracts_from_shfe, get_daily_items_from_shfe};
