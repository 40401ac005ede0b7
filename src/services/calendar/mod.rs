//! 深证信数据 API（巨潮 webapi.cninfo.com.cn）

pub mod cninfo;

pub use cninfo::{
    get_industry_categories, get_trading_calendar, CninfoTokenProvider, IndustryClassification,
};
