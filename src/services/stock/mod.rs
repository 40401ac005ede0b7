//! 交易所股票列表采集

pub mod sse;
pub mod szse;

pub use sse::{get_stock_listings_from_sse, SseStockType};
pub use szse::{get_all_stock_listings_from_szse, get_stock_listings_from_szse, SzseBoard};
