//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::services::crawler::{DEFAULT_ACCEPT, DEFAULT_ACCEPT_LANGUAGE, DEFAULT_USER_AGENT};

/// 服务器配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// 监听地址
    #[serde(default = "default_host")]
    pub host: String,
    /// 监听端口
    #[serde(default = "default_port")]
    pub port: u16,
    /// 工作线程数（0 表示使用 CPU 核心数）
    #[serde(default)]
    pub workers: usize,
}

/// API 配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiConfig {
    /// API Key（为空则不启用认证）
    #[serde(default)]
    pub api_key: String,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 基础请求头配置
///
/// 各数据源共用的 HTTP 头；`Referer` / `Host` 等覆盖项由数据源逐请求传入
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// User-Agent
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    /// Accept
    #[serde(default = "default_accept")]
    pub accept: String,
    /// Accept-Language
    #[serde(default = "default_accept_language")]
    pub accept_language: String,
}

/// 深证信数据 API 凭证
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CninfoConfig {
    /// access_key
    #[serde(default)]
    pub access_key: String,
    /// access_secret
    #[serde(default)]
    pub access_secret: String,
}

/// 通达信本地安装配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TdxConfig {
    /// 安装目录（vipdoc 的父目录）
    #[serde(default = "default_tdx_root")]
    pub root: PathBuf,
}

/// 本地数据目录配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathConfig {
    /// 下载文件落盘目录
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// API 配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
    /// 基础请求头
    #[serde(default)]
    pub http: HttpConfig,
    /// 深证信凭证
    #[serde(default)]
    pub cninfo: CninfoConfig,
    /// 通达信安装
    #[serde(default)]
    pub tdx: TdxConfig,
    /// 本地路径
    #[serde(default)]
    pub path: PathConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_log_level() -> String { "info".to_string() }
fn default_user_agent() -> String { DEFAULT_USER_AGENT.to_string() }
fn default_accept() -> String { DEFAULT_ACCEPT.to_string() }
fn default_accept_language() -> String { DEFAULT_ACCEPT_LANGUAGE.to_string() }
fn default_tdx_root() -> PathBuf { PathBuf::from("C:/new_tdx") }
fn default_data_dir() -> PathBuf { PathBuf::from("data_downloaded") }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            user_agent: default_user_agent(),
            accept: default_accept(),
            accept_language: default_accept_language(),
        }
    }
}

impl Default for TdxConfig {
    fn default() -> Self {
        Self {
            root: default_tdx_root(),
        }
    }
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
        }
    }
}

impl AppConfig {
    /// 从 JSON 文件加载配置
    pub fn from_file<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let content = fs::read_to_string(path)?;
        let config: AppConfig = serde_json::from_str(&content)?;
        Ok(config)
    }

    /// 加载配置，优先从文件，失败则使用默认值
    pub fn load() -> Self {
        let config_paths = ["config.json", "config/config.json"];

        for path in config_paths {
            if Path::new(path).exists() {
                match Self::from_file(path) {
                    Ok(config) => {
                        log::info!("从 {} 加载配置成功", path);
                        return config;
                    }
                    Err(e) => {
                        log::warn!("加载配置文件 {} 失败: {}", path, e);
                    }
                }
            }
        }

        log::info!("使用默认配置");
        Self::default()
    }

    /// 获取服务器绑定地址
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.server.host, self.server.port)
    }
}
