//! 采集错误类型
//!
//! 区分可恢复错误（跳过当前页/条目，继续采集）与致命错误
//! （该数据源无法继续，整体中止）

use thiserror::Error;

/// 采集过程中的错误分类
///
/// - `Network` / `StructuralMismatch`：页面粒度可恢复，跳过后继续
/// - `DataCorruption`：本次解码失败，必须上报，不允许截断掩盖
/// - `Configuration`：凭证缺失或换取 token 失败，该数据源整体中止
#[derive(Debug, Error)]
pub enum CollectError {
    /// HTTP 状态码非 200 或传输失败
    #[error("网络请求失败: {0}")]
    Network(String),

    /// 页面结构与抽取规则不一致（如标题/日期/链接数量不等）
    #[error("页面结构不匹配: {0}")]
    StructuralMismatch(String),

    /// 二进制数据损坏（长度不是记录大小的整数倍，或字段无法解码）
    #[error("数据损坏: {0}")]
    DataCorruption(String),

    /// 配置缺失或凭证无效
    #[error("配置错误: {0}")]
    Configuration(String),

    /// 本地文件读写失败
    #[error("IO 错误: {0}")]
    Io(#[from] std::io::Error),
}

impl From<reqwest::Error> for CollectError {
    fn from(err: reqwest::Error) -> Self {
        CollectError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for CollectError {
    fn from(err: serde_json::Error) -> Self {
        CollectError::StructuralMismatch(format!("JSON 解析失败: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, CollectError>;
