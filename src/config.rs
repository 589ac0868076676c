//! 配置模块
//!
//! 支持从 JSON 文件加载系统配置

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::models::{default_indices, IndexDescriptor};
use crate::services::common::{ALLORIGINS_RAW_API, YAHOO_CHART_API};

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

/// 行情接口配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// 请求超时时间（秒）
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
    /// 连接超时时间（秒）
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,
    /// 上游行情接口地址（不含代码）
    #[serde(default = "default_upstream_base")]
    pub upstream_base: String,
    /// CORS 中转地址，为空则直连上游
    #[serde(default = "default_cors_proxy")]
    pub cors_proxy: Option<String>,
    /// 采样间隔
    #[serde(default = "default_interval")]
    pub interval: String,
    /// 回看范围
    #[serde(default = "default_range")]
    pub range: String,
}

/// 看板配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DashboardConfig {
    /// 行情刷新周期（秒）
    #[serde(default = "default_refresh_secs")]
    pub refresh_secs: u64,
    /// 时钟刷新周期（秒）
    #[serde(default = "default_clock_secs")]
    pub clock_secs: u64,
    /// 页面自动刷新周期（秒，0 表示不刷新）
    #[serde(default = "default_page_refresh_secs")]
    pub page_refresh_secs: u64,
    /// 时钟时区（IANA 名称），为空则使用本机时区
    #[serde(default)]
    pub timezone: Option<String>,
    /// 图表画布宽度（像素）
    #[serde(default = "default_chart_width")]
    pub chart_width: u32,
    /// 图表画布高度（像素）
    #[serde(default = "default_chart_height")]
    pub chart_height: u32,
    /// 跟踪的指数
    #[serde(default = "default_indices")]
    pub indices: Vec<IndexDescriptor>,
}

/// 日志配置
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    /// 日志级别: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,
}

/// 应用配置
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// 服务器配置
    #[serde(default)]
    pub server: ServerConfig,
    /// 行情接口配置
    #[serde(default)]
    pub api: ApiConfig,
    /// 看板配置
    #[serde(default)]
    pub dashboard: DashboardConfig,
    /// 日志配置
    #[serde(default)]
    pub log: LogConfig,
}

// 默认值函数
fn default_host() -> String { "0.0.0.0".to_string() }
fn default_port() -> u16 { 8080 }
fn default_timeout() -> u64 { 30 }
fn default_connect_timeout() -> u64 { 10 }
fn default_upstream_base() -> String { YAHOO_CHART_API.to_string() }
fn default_cors_proxy() -> Option<String> { Some(ALLORIGINS_RAW_API.to_string()) }
fn default_interval() -> String { "5m".to_string() }
fn default_range() -> String { "1d".to_string() }
fn default_refresh_secs() -> u64 { 60 }
fn default_clock_secs() -> u64 { 1 }
fn default_page_refresh_secs() -> u64 { 60 }
fn default_chart_width() -> u32 { 600 }
fn default_chart_height() -> u32 { 400 }
fn default_log_level() -> String { "info".to_string() }

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: 0,
        }
    }
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            connect_timeout_secs: default_connect_timeout(),
            upstream_base: default_upstream_base(),
            cors_proxy: default_cors_proxy(),
            interval: default_interval(),
            range: default_range(),
        }
    }
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            refresh_secs: default_refresh_secs(),
            clock_secs: default_clock_secs(),
            page_refresh_secs: default_page_refresh_secs(),
            timezone: None,
            chart_width: default_chart_width(),
            chart_height: default_chart_height(),
            indices: default_indices(),
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.bind_addr(), "0.0.0.0:8080");
        assert_eq!(config.dashboard.refresh_secs, 60);
        assert_eq!(config.dashboard.clock_secs, 1);
        assert_eq!(config.dashboard.page_refresh_secs, 60);
        assert_eq!(config.dashboard.indices.len(), 4);
        assert_eq!(config.api.interval, "5m");
        assert_eq!(config.api.range, "1d");
        assert!(config.api.cors_proxy.is_some());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{
            "server": { "port": 9000 },
            "api": { "cors_proxy": null },
            "dashboard": { "timezone": "Asia/Seoul", "indices": [
                { "id": "kospi", "name": "코스피", "symbol": "^KS11" }
            ] }
        }"#;
        let config: AppConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.host, "0.0.0.0");
        assert!(config.api.cors_proxy.is_none());
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.dashboard.timezone.as_deref(), Some("Asia/Seoul"));
        assert_eq!(config.dashboard.indices.len(), 1);
        assert_eq!(config.dashboard.chart_height, 400);
        assert_eq!(config.dashboard.page_refresh_secs, 60);
        assert_eq!(config.log.level, "info");
    }
}
