//! 业务逻辑服务模块
//!
//! 按数据源封装采集与解析逻辑

pub mod calendar;  // 深证信交易日历与行业分类
pub mod crawler;   // 通用爬取器
pub mod error;     // 采集错误类型
pub mod futures;   // 期货参考数据
pub mod normalize; // 名称归一化
pub mod notice;    // 交易所公告
pub mod stock;     // 股票列表
pub mod tdx;       // 通达信本地行情
