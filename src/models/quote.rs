//! 行情快照模型
//!
//! 包含归一化后的快照以及上游 chart 接口的原始响应结构

use serde::{Deserialize, Serialize};

/// 单次抓取的行情快照
///
/// 每次刷新都会重新生成，不跨周期保留
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteSnapshot {
    /// 按时间排序、已剔除空值的价格序列
    pub prices: Vec<f64>,
    /// 当前价格
    pub current_price: f64,
    /// 前收盘价
    pub previous_close: f64,
    /// 最后一个有效样本的时间戳（秒），无样本时为空
    pub last_updated: Option<i64>,
}

// ==================== 上游响应结构 ====================

#[derive(Debug, Deserialize)]
pub struct ChartResponse {
    pub chart: Option<ChartBody>,
}

#[derive(Debug, Deserialize)]
pub struct ChartBody {
    pub result: Option<Vec<ChartResult>>,
    pub error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
pub struct ChartError {
    pub code: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ChartResult {
    pub meta: Option<ChartMeta>,
    pub timestamp: Option<Vec<i64>>,
    pub indicators: Option<Indicators>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartMeta {
    pub regular_market_price: Option<f64>,
    pub chart_previous_close: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct Indicators {
    pub quote: Option<Vec<QuoteSeries>>,
}

#[derive(Debug, Default, Deserialize)]
pub struct QuoteSeries {
    pub close: Option<Vec<Option<f64>>>,
}
