//! K线（蜡烛）数据模型
//!
//! 同一份解码结果提供三种纯表现形式：字段名键控的 [`Candle`]
//! 结构（JSON 对象）、有序元组行、以及列式的 [`QuoteTable`]。

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};

/// 一根K线
///
/// `time` 仅分钟线有值；`open_interest` 仅提供持仓量的数据源有值
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    /// 日期
    pub date: NaiveDate,
    /// 时间（仅分钟线）
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time: Option<NaiveTime>,
    /// 开盘价
    pub open: f64,
    /// 最高价
    pub high: f64,
    /// 最低价
    pub low: f64,
    /// 收盘价
    pub close: f64,
    /// 成交额
    pub amount: f64,
    /// 成交量
    pub volume: u64,
    /// 持仓量
    #[serde(skip_serializing_if = "Option::is_none")]
    pub open_interest: Option<f64>,
}

impl Candle {
    /// 日线元组行：(date, open, high, low, close, amount, volume)
    pub fn day_row(&self) -> (NaiveDate, f64, f64, f64, f64, f64, u64) {
        (
            self.date,
            self.open,
            self.high,
            self.low,
            self.close,
            self.amount,
            self.volume,
        )
    }

    /// 分钟线元组行：(date, time, open, high, low, close, amount, volume)
    ///
    /// 日线K线没有时间字段，返回 `None`
    pub fn minute_row(&self) -> Option<(NaiveDate, NaiveTime, f64, f64, f64, f64, f64, u64)> {
        self.time.map(|time| {
            (
                self.date,
                time,
                self.open,
                self.high,
                self.low,
                self.close,
                self.amount,
                self.volume,
            )
        })
    }
}

/// 列式K线表
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteTable {
    /// 列名，按列顺序
    pub columns: Vec<String>,
    /// 日期列
    pub date: Vec<NaiveDate>,
    /// 时间列（日线为空）
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub time: Vec<NaiveTime>,
    /// 开盘价列
    pub open: Vec<f64>,
    /// 最高价列
    pub high: Vec<f64>,
    /// 最低价列
    pub low: Vec<f64>,
    /// 收盘价列
    pub close: Vec<f64>,
    /// 成交额列
    pub amount: Vec<f64>,
    /// 成交量列
    pub volume: Vec<u64>,
}

impl QuoteTable {
    /// 日线表的列名
    pub const DAY_COLUMNS: [&'static str; 7] =
        ["date", "open", "high", "low", "close", "amount", "volume"];
    /// 分钟线表的列名
    pub const MINUTE_COLUMNS: [&'static str; 8] =
        ["date", "time", "open", "high", "low", "close", "amount", "volume"];

    /// 把一串K线摆成列式表
    pub fn from_candles(candles: &[Candle], intraday: bool) -> Self {
        let columns = if intraday {
            Self::MINUTE_COLUMNS.iter().map(|c| c.to_string()).collect()
        } else {
            Self::DAY_COLUMNS.iter().map(|c| c.to_string()).collect()
        };

        Self {
            columns,
            date: candles.iter().map(|c| c.date).collect(),
            time: if intraday {
                candles.iter().filter_map(|c| c.time).collect()
            } else {
                Vec::new()
            },
            open: candles.iter().map(|c| c.open).collect(),
            high: candles.iter().map(|c| c.high).collect(),
            low: candles.iter().map(|c| c.low).collect(),
            close: candles.iter().map(|c| c.close).collect(),
            amount: candles.iter().map(|c| c.amount).collect(),
            volume: candles.iter().map(|c| c.volume).collect(),
        }
    }

    /// 行数
    pub fn len(&self) -> usize {
        self.date.len()
    }

    /// 是否为空
    pub fn is_empty(&self) -> bool {
        self.date.is_empty()
    }
}

/// K线查询参数
#[derive(Debug, Deserialize)]
pub struct QuoteQuery {
    /// 周期（day / min1 / min5），默认日线
    pub period: Option<String>,
    /// 输出形式（records / table），默认 records
    pub shape: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_candle(day: u32, time: Option<NaiveTime>) -> Candle {
        Candle {
            date: NaiveDate::from_ymd_opt(2021, 7, day).unwrap(),
            time,
            open: 35.50,
            high: 36.00,
            low: 35.00,
            close: 35.80,
            amount: 1.25e8,
            volume: 12345,
            open_interest: None,
        }
    }

    /// 三种表现形式只是同一份数值的不同摆放
    #[test]
    fn test_day_row_and_table() {
        let candles = vec![sample_candle(15, None), sample_candle(16, None)];

        let row = candles[0].day_row();
        assert_eq!(row.0, NaiveDate::from_ymd_opt(2021, 7, 15).unwrap());
        assert_eq!(row.1, 35.50);
        assert_eq!(row.6, 12345);
        // 日线没有时间字段，分钟行形式不可用
        assert_eq!(candles[0].minute_row(), None);

        let table = QuoteTable::from_candles(&candles, false);
        assert_eq!(table.columns, QuoteTable::DAY_COLUMNS);
        assert_eq!(table.len(), 2);
        assert!(table.time.is_empty());
        assert_eq!(table.close, vec![35.80, 35.80]);
    }

    #[test]
    fn test_minute_row_and_table() {
        let time = NaiveTime::from_hms_opt(9, 30, 0);
        let candles = vec![sample_candle(15, time)];

        let row = candles[0].minute_row().unwrap();
        assert_eq!(row.1, time.unwrap());

        let table = QuoteTable::from_candles(&candles, true);
        assert_eq!(table.columns, QuoteTable::MINUTE_COLUMNS);
        assert_eq!(table.time, vec![time.unwrap()]);
    }
}
