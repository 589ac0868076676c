//! 文字展示模型
//!
//! 服务端维护的页面文字节点：价格、涨跌幅与时钟

use serde::Serialize;
use std::collections::BTreeMap;

/// 页面文字节点
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TextNode {
    pub text: String,
    pub class: String,
}

impl TextNode {
    pub fn new(class: &str) -> Self {
        Self {
            text: String::new(),
            class: class.to_string(),
        }
    }
}

/// 单个指数的价格展示位
///
/// 布局可以缺省任意一个节点
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriceSlot {
    /// 当前价格（`.current-price`）
    pub price: Option<TextNode>,
    /// 涨跌幅（`.change-percent`）
    pub change: Option<TextNode>,
}

impl PriceSlot {
    /// 完整布局：价格与涨跌幅节点都存在
    pub fn full() -> Self {
        Self {
            price: Some(TextNode::new("current-price")),
            change: Some(TextNode::new("change-percent")),
        }
    }
}

/// 指数 id -> 价格展示位
pub type PriceBoard = BTreeMap<String, PriceSlot>;
