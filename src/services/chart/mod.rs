//! 图表渲染服务
//!
//! 每个指数一个折线图，用涨跌颜色表示相对前收盘价的走势

mod svg;

pub use svg::render_svg;

use std::collections::BTreeMap;

use crate::models::{
    ChartState, ChartStyle, Dataset, Fill, IndexDescriptor, QuoteSnapshot, Sign, Surface,
    COLOR_UP, FILL_ALPHA,
};

/// 指数 id -> 图表状态
pub type ChartRegistry = BTreeMap<String, ChartState>;

/// 图表渲染器
///
/// 自身不持有图表状态，状态由调用方以 [`ChartRegistry`] 传入
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    /// 画布宽度（像素）
    width: u32,
    /// 画布高度（像素）
    height: u32,
}

impl ChartRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// 为指数构造初始图表：独立的视觉配置副本、空数据集
    pub fn init(&self, index: &IndexDescriptor) -> ChartState {
        let surface = Surface {
            id: index.surface_id(),
            width: self.width,
            height: self.height,
        };
        let dataset = Dataset {
            label: index.name.clone(),
            data: Vec::new(),
            border_color: COLOR_UP,
            background: Fill::Solid { color: COLOR_UP.with_alpha(FILL_ALPHA) },
            fill: true,
        };

        ChartState::new(surface, ChartStyle::base(), dataset)
    }

    /// 为所有指数构造图表
    pub fn init_all(&self, indices: &[IndexDescriptor]) -> ChartRegistry {
        indices
            .iter()
            .map(|index| (index.id.clone(), self.init(index)))
            .collect()
    }

    /// 用行情快照更新图表
    ///
    /// 替换价格序列，按涨跌重设线条颜色与渐变填充；返回是否找到该图表
    pub fn update(&self, registry: &mut ChartRegistry, id: &str, snapshot: &QuoteSnapshot) -> bool {
        let Some(chart) = registry.get_mut(id) else {
            log::warn!("图表 {} 不存在，跳过更新", id);
            return false;
        };

        let sign = Sign::of(snapshot.current_price, snapshot.previous_close);
        let color = sign.color();
        let height = f64::from(chart.surface().height);

        chart.set_series(snapshot.prices.clone());
        chart.set_colors(color, Fill::fade(color, height));

        log::debug!("图表 {} 已更新: {} 个数据点, {:?}", id, chart.labels().len(), sign);
        true
    }
}
