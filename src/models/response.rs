//! 通用 API 响应模型
//!
//! 定义统一的 API 响应格式以及看板视图

use chrono::Utc;
use chrono_tz::Asia::Seoul;
use serde::Serialize;

use super::chart::Rgba;

/// 获取首尔时间（UTC+9）
fn get_seoul_time() -> chrono::DateTime<chrono_tz::Tz> {
    Utc::now().with_timezone(&Seoul)
}

/// 统一 API 响应结构
///
/// - success: 请求是否成功
/// - data: 响应数据（成功时有值）
/// - message: 响应消息
/// - timestamp: 响应时间戳（首尔时间）
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    /// 请求是否成功
    pub success: bool,
    /// 响应数据
    pub data: Option<T>,
    /// 响应消息
    pub message: String,
    /// 响应时间戳（ISO 8601 格式）
    pub timestamp: String,
}

impl<T> ApiResponse<T> {
    /// 创建成功响应
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: "Success".to_string(),
            timestamp: get_seoul_time().to_rfc3339(),
        }
    }

    /// 创建错误响应
    pub fn error(message: String) -> Self {
        Self {
            success: false,
            data: None,
            message,
            timestamp: get_seoul_time().to_rfc3339(),
        }
    }
}

/// 单个指数的展示视图
#[derive(Debug, Clone, Serialize)]
pub struct IndexView {
    pub id: String,
    pub name: String,
    pub symbol: String,
    pub price_text: Option<String>,
    pub price_class: Option<String>,
    pub change_text: Option<String>,
    pub change_class: Option<String>,
    pub prices: Vec<f64>,
    pub line_color: Rgba,
    /// 最后一个有效样本时间（RFC 3339）
    pub last_updated: Option<String>,
}

/// 整个看板视图
#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub clock: String,
    pub indices: Vec<IndexView>,
}

