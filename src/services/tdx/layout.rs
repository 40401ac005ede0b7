//! 通达信文件布局描述
//!
//! 交易所决定 vipdoc 子目录和文件名前缀，周期决定子目录、
//! 扩展名和记录布局（日线/分钟线两种，均为 32 字节小端定长记录）。

/// 定长记录大小（字节），日线与分钟线布局相同
pub const TDX_RECORD_SIZE: usize = 32;

/// 通达信里的交易所
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TdxExchange {
    /// 上海证券交易所
    Sse,
    /// 深圳证券交易所
    Szse,
    /// 郑州商品交易所
    Czce,
    /// 大连商品交易所
    Dce,
    /// 上海期货交易所
    Shfe,
    /// 香港交易所
    Hkex,
    /// 中国金融期货交易所
    Cffex,
    /// 上海国际能源交易中心
    Ine,
}

impl TdxExchange {
    /// vipdoc 下的子目录名
    pub fn directory(&self) -> &'static str {
        match self {
            TdxExchange::Sse => "sh",
            TdxExchange::Szse => "sz",
            TdxExchange::Czce
            | TdxExchange::Dce
            | TdxExchange::Shfe
            | TdxExchange::Hkex
            | TdxExchange::Cffex
            | TdxExchange::Ine => "ds",
        }
    }

    /// 文件名前缀
    pub fn prefix(&self) -> &'static str {
        match self {
            TdxExchange::Sse | TdxExchange::Szse => "",
            TdxExchange::Czce => "28#",
            TdxExchange::Dce => "29#",
            TdxExchange::Shfe | TdxExchange::Ine => "30#",
            TdxExchange::Hkex => "31#",
            TdxExchange::Cffex => "47#",
        }
    }

    /// 从路径参数解析交易所
    pub fn from_query(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "sse" => Some(TdxExchange::Sse),
            "szse" => Some(TdxExchange::Szse),
            "czce" => Some(TdxExchange::Czce),
            "dce" => Some(TdxExchange::Dce),
            "shfe" => Some(TdxExchange::Shfe),
            "hkex" => Some(TdxExchange::Hkex),
            "cffex" => Some(TdxExchange::Cffex),
            "ine" => Some(TdxExchange::Ine),
            _ => None,
        }
    }
}

/// 通达信里的K线周期
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TdxPeriod {
    /// 1分钟线
    Minute1,
    /// 5分钟线
    Minute5,
    /// 日线
    Day,
}

impl TdxPeriod {
    /// 周期对应的子目录名
    pub fn directory(&self) -> &'static str {
        match self {
            TdxPeriod::Minute1 => "minline",
            TdxPeriod::Minute5 => "fzline",
            TdxPeriod::Day => "lday",
        }
    }

    /// 文件扩展名
    pub fn suffix(&self) -> &'static str {
        match self {
            TdxPeriod::Minute1 => "lc1",
            TdxPeriod::Minute5 => "lc5",
            TdxPeriod::Day => "day",
        }
    }

    /// 是否分钟级布局
    pub fn is_intraday(&self) -> bool {
        !matches!(self, TdxPeriod::Day)
    }

    /// 从查询参数解析周期
    pub fn from_query(value: &str) -> Option<Self> {
        match value.to_lowercase().as_str() {
            "day" => Some(TdxPeriod::Day),
            "min1" => Some(TdxPeriod::Minute1),
            "min5" => Some(TdxPeriod::Minute5),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exchange_directory_and_prefix() {
        assert_eq!(TdxExchange::Sse.directory(), "sh");
        assert_eq!(TdxExchange::Sse.prefix(), "");
        assert_eq!(TdxExchange::Shfe.directory(), "ds");
        assert_eq!(TdxExchange::Shfe.prefix(), "30#");
        assert_eq!(TdxExchange::Cffex.prefix(), "47#");
    }

    #[test]
    fn test_period_descriptor() {
        assert_eq!(TdxPeriod::Day.directory(), "lday");
        assert_eq!(TdxPeriod::Day.suffix(), "day");
        assert!(!TdxPeriod::Day.is_intraday());
        assert_eq!(TdxPeriod::Minute5.directory(), "fzline");
        assert_eq!(TdxPeriod::Minute5.suffix(), "lc5");
        assert!(TdxPeriod::Minute1.is_intraday());
    }

    #[test]
    fn test_from_query() {
        assert_eq!(TdxExchange::from_query("SHFE"), Some(TdxExchange::Shfe));
        assert_eq!(TdxExchange::from_query("unknown"), None);
        assert_eq!(TdxPeriod::from_query("min5"), Some(TdxPeriod::Minute5));
        assert_eq!(TdxPeriod::from_query("hour"), None);
    }
}
