//! 指数描述模型
//!
//! 看板跟踪的指数在启动时确定，运行期间不变

use serde::{Deserialize, Serialize};

/// 指数描述
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDescriptor {
    /// 稳定标识（用于页面元素 id）
    pub id: String,
    /// 显示名称
    pub name: String,
    /// 上游行情代码
    pub symbol: String,
}

impl IndexDescriptor {
    pub fn new(id: &str, name: &str, symbol: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            symbol: symbol.to_string(),
        }
    }

    /// 图表画布 id，如 `kospiChart`
    pub fn surface_id(&self) -> String {
        format!("{}Chart", self.id)
    }

    /// 价格容器 id，如 `kospi-price`
    pub fn price_container_id(&self) -> String {
        format!("{}-price", self.id)
    }
}

/// 默认跟踪的四个指数
pub fn default_indices() -> Vec<IndexDescriptor> {
    vec![
        IndexDescriptor::new("kospi", "코스피", "^KS11"),
        IndexDescriptor::new("kosdaq", "코스닥", "^KQ11"),
        IndexDescriptor::new("nasdaq", "나스닥", "^IXIC"),
        IndexDescriptor::new("sp500", "S&P 500", "^GSPC"),
    ]
}
