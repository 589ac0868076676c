//! 时钟服务
//!
//! 24 小时制显示当前时间（ko-KR，hour12: false）

use anyhow::{anyhow, Result};
use chrono::{DateTime, Local, TimeZone, Utc};
use chrono_tz::Tz;

use crate::models::TextNode;

/// 时钟节点 id
pub const CLOCK_NODE_ID: &str = "current-time";

/// 时钟
#[derive(Debug, Clone)]
pub struct Clock {
    /// 指定时区，为空则使用本机时区
    tz: Option<Tz>,
}

impl Clock {
    /// 按 IANA 时区名创建时钟
    pub fn new(timezone: Option<&str>) -> Result<Self> {
        let tz = match timezone {
            Some(name) => Some(
                name.parse::<Tz>()
                    .map_err(|e| anyhow!("无效的时区 {}: {}", name, e))?,
            ),
            None => None,
        };
        Ok(Self { tz })
    }

    /// 时钟所用时区
    pub fn tz(&self) -> Option<Tz> {
        self.tz
    }

    /// 格式化指定时刻
    pub fn format_at(&self, now: DateTime<Utc>) -> String {
        match self.tz {
            Some(tz) => format_time(&now.with_timezone(&tz)),
            None => format_time(&now.with_timezone(&Local)),
        }
    }

    /// 将当前时间写入时钟节点
    pub fn tick(&self, node: &mut TextNode) {
        node.text = self.format_at(Utc::now());
    }
}

fn format_time<T: TimeZone>(dt: &DateTime<T>) -> String
where
    T::Offset: std::fmt::Display,
{
    dt.format("%H:%M:%S").to_string()
}
