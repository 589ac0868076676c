//! 业务逻辑服务模块
//!
//! 行情抓取、图表渲染、价格展示、时钟与刷新循环

pub mod chart;     // 图表渲染
pub mod clock;     // 时钟
pub mod common;    // 公共常量和辅助函数
pub mod dashboard; // 刷新循环
pub mod display;   // 价格展示
pub mod quote;     // 行情抓取
