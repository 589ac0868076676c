//! 价格展示服务
//!
//! 更新每个指数的当前价格与涨跌幅文字，并按涨跌设置样式类

use crate::models::{IndexDescriptor, PriceBoard, PriceSlot, Sign};
use crate::services::common::format_grouped;

/// 为所有指数构造完整的价格展示位
pub fn init_board(indices: &[IndexDescriptor]) -> PriceBoard {
    indices
        .iter()
        .map(|index| (index.id.clone(), PriceSlot::full()))
        .collect()
}

/// 当前价格文字：千分位分组，两位小数
pub fn format_price(current: f64) -> String {
    format_grouped(current)
}

/// 涨跌幅文字，如 `+2.00%`、`-0.35%`
///
/// 前收盘价为 0 或结果不是有限值时输出 `N/A`
pub fn format_change(current: f64, previous_close: f64) -> String {
    if previous_close == 0.0 {
        return "N/A".to_string();
    }

    let percent = (current - previous_close) / previous_close * 100.0;
    if !percent.is_finite() {
        return "N/A".to_string();
    }

    let sign = if Sign::of(current, previous_close).is_positive() { "+" } else { "" };
    format!("{}{:.2}%", sign, percent)
}

/// 更新单个指数的价格展示
///
/// 展示位或其中任一节点缺失时不做任何修改，返回 false
pub fn update(board: &mut PriceBoard, id: &str, current: f64, previous_close: f64) -> bool {
    let Some(PriceSlot { price: Some(price), change: Some(change) }) = board.get_mut(id) else {
        log::debug!("指数 {} 缺少价格展示节点，跳过", id);
        return false;
    };

    let class = Sign::of(current, previous_close).text_class();

    price.text = format_price(current);
    price.class = format!("current-price {}", class);

    change.text = format_change(current, previous_close);
    change.class = format!("change-percent {}", class);

    true
}
