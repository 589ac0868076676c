//! 行情数据服务模块
//!
//! 按指数代码获取日内分时行情，归一化为行情快照

pub mod yahoo;

pub use yahoo::QuoteFetcher;
