//! 交易所公告数据模型

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// 公告列表页中的一条索引
///
/// 由列表页解析产生，详情抓取完成后即丢弃
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NoticeIndexEntry {
    /// 公告标题
    pub title: String,
    /// 发布日期
    pub date: NaiveDate,
    /// 详情页绝对地址
    pub url: String,
}

/// 详情页解析片段
///
/// 标题、日期与列表页重复，合并时以列表页为准
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NoticeDetail {
    /// 详情页标题
    pub title: String,
    /// 详情页发布日期
    pub date: Option<NaiveDate>,
    /// 文号（居中段落，可能不存在）
    pub code: String,
    /// 正文段落，按文档顺序
    pub content: Vec<String>,
}

/// 一条完整公告
///
/// 列表页条目与详情页片段合并后的结果，交给下游持久化
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    /// 公告标题
    pub title: String,
    /// 发布日期
    pub date: NaiveDate,
    /// 详情页绝对地址
    pub url: String,
    /// 文号（可能为空字符串）
    pub code: String,
    /// 正文段落
    pub content: Vec<String>,
}
