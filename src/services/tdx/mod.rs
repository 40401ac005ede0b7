//! 通达信本地行情文件读取
//!
//! 独立于网络采集的并行管线：对 vipdoc 目录下的定长记录
//! 行情文件做二进制解码。

mod layout;
mod quote;

pub use layout::{TdxExchange, TdxPeriod, TDX_RECORD_SIZE};
pub use quote::{decode_quotes, quote_file_path, read_quote, QuoteIter};
