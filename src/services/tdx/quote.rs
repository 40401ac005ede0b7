//! 行情文件解码
//!
//! 两种 32 字节小端定长记录：
//!
//! - 日线：`date:u32(YYYYMMDD) open:u32 high:u32 low:u32 close:u32
//!   amount:f32 volume:u32 reserved:u32`，价格放大 100 倍存储
//! - 分钟线：`date:u16(打包) time:u16(打包) open:f32 high:f32 low:f32
//!   close:f32 amount:f32 volume:u32 reserved:u32`，价格原样存储
//!
//! 打包日期：`year = v / 2048 + 2004`，`month = (v % 2048) / 100`，
//! `day = (v % 2048) % 100`；打包时间：`hour = v / 60`，`minute = v % 60`。
//!
//! 缓冲区长度必须恰好是记录大小的整数倍，出现余数说明文件已损坏，
//! 直接上报而不是悄悄截断。

use std::path::{Path, PathBuf};
use std::slice::ChunksExact;

use chrono::{NaiveDate, NaiveTime};

use crate::models::Candle;
use crate::services::error::{CollectError, Result};

use super::layout::{TdxExchange, TdxPeriod, TDX_RECORD_SIZE};

fn read_u16(record: &[u8], offset: usize) -> u16 {
    u16::from_le_bytes([record[offset], record[offset + 1]])
}

fn read_u32(record: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([
        record[offset],
        record[offset + 1],
        record[offset + 2],
        record[offset + 3],
    ])
}

fn read_f32(record: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        record[offset],
        record[offset + 1],
        record[offset + 2],
        record[offset + 3],
    ])
}

/// 日线价格：放大 100 倍的整数还原成两位小数
fn scale_price(raw: u32) -> f64 {
    f64::from(raw) / 100.0
}

/// 解码 YYYYMMDD 整数日期
fn decode_compact_date(raw: u32) -> Result<NaiveDate> {
    let year = (raw / 10000) as i32;
    let month = (raw % 10000) / 100;
    let day = raw % 100;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| CollectError::DataCorruption(format!("日期字段无效: {}", raw)))
}

/// 解码分钟线的打包日期
fn decode_packed_date(raw: u16) -> Result<NaiveDate> {
    let raw = u32::from(raw);
    let year = (raw / 2048 + 2004) as i32;
    let month = (raw % 2048) / 100;
    let day = (raw % 2048) % 100;
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| CollectError::DataCorruption(format!("打包日期字段无效: {}", raw)))
}

/// 解码分钟线的打包时间
fn decode_packed_time(raw: u16) -> Result<NaiveTime> {
    let raw = u32::from(raw);
    NaiveTime::from_hms_opt(raw / 60, raw % 60, 0)
        .ok_or_else(|| CollectError::DataCorruption(format!("打包时间字段无效: {}", raw)))
}

fn decode_day_record(record: &[u8]) -> Result<Candle> {
    Ok(Candle {
        date: decode_compact_date(read_u32(record, 0))?,
        time: None,
        open: scale_price(read_u32(record, 4)),
        high: scale_price(read_u32(record, 8)),
        low: scale_price(read_u32(record, 12)),
        close: scale_price(read_u32(record, 16)),
        amount: f64::from(read_f32(record, 20)),
        volume: u64::from(read_u32(record, 24)),
        open_interest: None,
    })
}

fn decode_minute_record(record: &[u8]) -> Result<Candle> {
    Ok(Candle {
        date: decode_packed_date(read_u16(record, 0))?,
        time: Some(decode_packed_time(read_u16(record, 2))?),
        open: f64::from(read_f32(record, 4)),
        high: f64::from(read_f32(record, 8)),
        low: f64::from(read_f32(record, 12)),
        close: f64::from(read_f32(record, 16)),
        amount: f64::from(read_f32(record, 20)),
        volume: u64::from(read_u32(record, 24)),
        open_interest: None,
    })
}

/// 按固定步长惰性解码缓冲区
///
/// 可重复调用：同一缓冲区两次解码产出完全相同的序列。
pub struct QuoteIter<'a> {
    chunks: ChunksExact<'a, u8>,
    period: TdxPeriod,
}

impl Iterator for QuoteIter<'_> {
    type Item = Result<Candle>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.chunks.next()?;
        Some(if self.period.is_intraday() {
            decode_minute_record(record)
        } else {
            decode_day_record(record)
        })
    }
}

/// 解码一个行情缓冲区
///
/// 长度不是记录大小整数倍时返回 `DataCorruption`。
pub fn decode_quotes(raw: &[u8], period: TdxPeriod) -> Result<QuoteIter<'_>> {
    if raw.len() % TDX_RECORD_SIZE != 0 {
        return Err(CollectError::DataCorruption(format!(
            "缓冲区 {} 字节不是记录大小 {} 的整数倍，余 {} 字节",
            raw.len(),
            TDX_RECORD_SIZE,
            raw.len() % TDX_RECORD_SIZE
        )));
    }

    Ok(QuoteIter {
        chunks: raw.chunks_exact(TDX_RECORD_SIZE),
        period,
    })
}

/// 拼出行情文件在 vipdoc 下的路径
///
/// `<root>/vipdoc/<交易所目录>/<周期目录>/<前缀><交易所目录><代码>.<扩展名>`
pub fn quote_file_path(
    tdx_root: &Path,
    exchange: TdxExchange,
    symbol: &str,
    period: TdxPeriod,
) -> PathBuf {
    tdx_root
        .join("vipdoc")
        .join(exchange.directory())
        .join(period.directory())
        .join(format!(
            "{}{}{}.{}",
            exchange.prefix(),
            exchange.directory(),
            symbol,
            period.suffix()
        ))
}

/// 读取并解码一个本地行情文件
///
/// 通达信安装目录不存在视为配置错误；文件读取失败是 IO 错误。
pub fn read_quote(
    tdx_root: &Path,
    exchange: TdxExchange,
    symbol: &str,
    period: TdxPeriod,
) -> Result<Vec<Candle>> {
    if !tdx_root.exists() {
        return Err(CollectError::Configuration(format!(
            "通达信目录不存在: {}",
            tdx_root.display()
        )));
    }

    let path = quote_file_path(tdx_root, exchange, symbol, period);
    let raw = std::fs::read(&path)?;
    log::info!("读取行情文件 {}，{} 字节", path.display(), raw.len());

    decode_quotes(&raw, period)?.collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 拼一条日线记录
    fn day_record(
        date: u32,
        open: u32,
        high: u32,
        low: u32,
        close: u32,
        amount: f32,
        volume: u32,
    ) -> Vec<u8> {
        let mut record = Vec::with_capacity(TDX_RECORD_SIZE);
        record.extend_from_slice(&date.to_le_bytes());
        record.extend_from_slice(&open.to_le_bytes());
        record.extend_from_slice(&high.to_le_bytes());
        record.extend_from_slice(&low.to_le_bytes());
        record.extend_from_slice(&close.to_le_bytes());
        record.extend_from_slice(&amount.to_le_bytes());
        record.extend_from_slice(&volume.to_le_bytes());
        record.extend_from_slice(&0u32.to_le_bytes());
        record
    }

    /// 拼一条分钟线记录
    fn minute_record(
        date: u16,
        time: u16,
        open: f32,
        high: f32,
        low: f32,
        close: f32,
        amount: f32,
        volume: u32,
    ) -> Vec<u8> {
        let mut record = Vec::with_capacity(TDX_RECORD_SIZE);
        record.extend_from_slice(&date.to_le_bytes());
        record.extend_from_slice(&time.to_le_bytes());
        record.extend_from_slice(&open.to_le_bytes());
        record.extend_from_slice(&high.to_le_bytes());
        record.extend_from_slice(&low.to_le_bytes());
        record.extend_from_slice(&close.to_le_bytes());
        record.extend_from_slice(&amount.to_le_bytes());
        record.extend_from_slice(&volume.to_le_bytes());
        record.extend_from_slice(&0u32.to_le_bytes());
        record
    }

    /// 日线价格放大 100 倍存储：3550 还原成 35.50
    #[test]
    fn test_decode_day_price_scaling() {
        let raw = day_record(20210715, 3550, 3600, 3500, 3580, 1.25e8, 12345);
        let candles: Vec<Candle> = decode_quotes(&raw, TdxPeriod::Day)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(candles.len(), 1);
        let candle = &candles[0];
        assert_eq!(candle.date, NaiveDate::from_ymd_opt(2021, 7, 15).unwrap());
        assert_eq!(candle.time, None);
        assert_eq!(candle.open, 35.50);
        assert_eq!(candle.high, 36.00);
        assert_eq!(candle.low, 35.00);
        assert_eq!(candle.close, 35.80);
        assert_eq!(candle.volume, 12345);
    }

    /// 同一缓冲区两次解码产出相同序列
    #[test]
    fn test_decode_is_restartable() {
        let mut raw = day_record(20210715, 3550, 3600, 3500, 3580, 1.25e8, 12345);
        raw.extend(day_record(20210716, 3580, 3620, 3560, 3610, 9.8e7, 23456));

        let first: Vec<Candle> = decode_quotes(&raw, TdxPeriod::Day)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();
        let second: Vec<Candle> = decode_quotes(&raw, TdxPeriod::Day)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        assert_eq!(first.len(), 2);
        assert_eq!(first, second);
    }

    /// 打包日期 35328 对应 2021-05-12，打包时间 570 对应 09:30
    #[test]
    fn test_decode_minute_packed_date_time() {
        // 35328 = 17 * 2048 + 5 * 100 + 12
        let raw = minute_record(35328, 570, 4200.0, 4212.5, 4195.0, 4201.5, 3.6e7, 887);
        let candles: Vec<Candle> = decode_quotes(&raw, TdxPeriod::Minute1)
            .unwrap()
            .collect::<Result<_>>()
            .unwrap();

        let candle = &candles[0];
        assert_eq!(candle.date, NaiveDate::from_ymd_opt(2021, 5, 12).unwrap());
        assert_eq!(candle.time, NaiveTime::from_hms_opt(9, 30, 0));
        // 分钟线价格原样透传，不做缩放
        assert_eq!(candle.open, 4200.0);
        assert_eq!(candle.high, 4212.5);
        assert_eq!(candle.volume, 887);
    }

    /// 长度有余数的缓冲区是数据损坏，不允许截断继续
    #[test]
    fn test_decode_trailing_bytes_is_corruption() {
        let mut raw = day_record(20210715, 3550, 3600, 3500, 3580, 1.25e8, 12345);
        raw.extend_from_slice(&[0u8, 1]);

        assert!(matches!(
            decode_quotes(&raw, TdxPeriod::Day),
            Err(CollectError::DataCorruption(_))
        ));
    }

    /// 整倍数缓冲区里解不出日期的记录同样按损坏上报
    #[test]
    fn test_decode_invalid_date_is_corruption() {
        let raw = day_record(20211350, 3550, 3600, 3500, 3580, 1.25e8, 12345);
        let result: Result<Vec<Candle>> =
            decode_quotes(&raw, TdxPeriod::Day).unwrap().collect();
        assert!(matches!(result, Err(CollectError::DataCorruption(_))));
    }

    #[test]
    fn test_quote_file_path() {
        let path = quote_file_path(
            Path::new("C:/new_tdx"),
            TdxExchange::Shfe,
            "cu2109",
            TdxPeriod::Day,
        );
        assert_eq!(
            path,
            Path::new("C:/new_tdx/vipdoc/ds/lday/30#dscu2109.day")
        );

        let path = quote_file_path(
            Path::new("/opt/tdx"),
            TdxExchange::Sse,
            "600000",
            TdxPeriod::Minute5,
        );
        assert_eq!(path, Path::new("/opt/tdx/vipdoc/sh/fzline/sh600000.lc5"));
    }
}
