//! 看板刷新服务
//!
//! 负责刷新节奏：行情每 60 秒按指数顺序逐个刷新，时钟每秒刷新。
//! 两个定时器各自运行在单独的任务中，同一定时器的周期不会重叠。

use anyhow::Result;
use chrono::{TimeZone, Utc};
use chrono_tz::Tz;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::config::AppConfig;
use crate::models::{DashboardView, IndexDescriptor, IndexView, PriceBoard, QuoteSnapshot, TextNode};
use crate::services::chart::{ChartRegistry, ChartRenderer};
use crate::services::clock::Clock;
use crate::services::display;
use crate::services::quote::QuoteFetcher;

/// 看板状态
///
/// 图表、价格文字与时钟节点均由刷新任务写入，HTTP 处理器只读
#[derive(Debug, Clone)]
pub struct DashboardState {
    pub indices: Vec<IndexDescriptor>,
    pub charts: ChartRegistry,
    pub prices: PriceBoard,
    pub clock: TextNode,
    /// 指数 id -> 最后一个有效样本时间戳
    pub last_updated: BTreeMap<String, Option<i64>>,
    /// 展示时间所用时区，为空则使用本机时区
    pub tz: Option<Tz>,
}

pub type SharedState = Arc<RwLock<DashboardState>>;

impl DashboardState {
    /// 构造所有图表与价格展示位
    pub fn new(indices: Vec<IndexDescriptor>, renderer: &ChartRenderer, tz: Option<Tz>) -> Self {
        Self {
            charts: renderer.init_all(&indices),
            prices: display::init_board(&indices),
            clock: TextNode::new("clock"),
            last_updated: BTreeMap::new(),
            indices,
            tz,
        }
    }

    /// 将一次快照应用到图表与价格文字
    pub fn apply(&mut self, renderer: &ChartRenderer, id: &str, snapshot: &QuoteSnapshot) {
        renderer.update(&mut self.charts, id, snapshot);
        display::update(&mut self.prices, id, snapshot.current_price, snapshot.previous_close);
        self.last_updated.insert(id.to_string(), snapshot.last_updated);
    }

    pub fn index(&self, id: &str) -> Option<&IndexDescriptor> {
        self.indices.iter().find(|i| i.id == id)
    }

    /// 单个指数的展示视图
    pub fn index_view(&self, id: &str) -> Option<IndexView> {
        let index = self.index(id)?;
        let chart = self.charts.get(id)?;
        let slot = self.prices.get(id);
        let price = slot.and_then(|s| s.price.as_ref());
        let change = slot.and_then(|s| s.change.as_ref());

        Some(IndexView {
            id: index.id.clone(),
            name: index.name.clone(),
            symbol: index.symbol.clone(),
            price_text: price.map(|n| n.text.clone()),
            price_class: price.map(|n| n.class.clone()),
            change_text: change.map(|n| n.text.clone()),
            change_class: change.map(|n| n.class.clone()),
            prices: chart.data().to_vec(),
            line_color: chart.dataset().border_color,
            last_updated: self
                .last_updated
                .get(id)
                .copied()
                .flatten()
                .and_then(|ts| format_timestamp(ts, self.tz)),
        })
    }

    /// 整个看板视图
    pub fn view(&self) -> DashboardView {
        DashboardView {
            clock: self.clock.text.clone(),
            indices: self
                .indices
                .iter()
                .filter_map(|i| self.index_view(&i.id))
                .collect(),
        }
    }
}

fn format_timestamp(ts: i64, tz: Option<Tz>) -> Option<String> {
    let utc = Utc.timestamp_opt(ts, 0).single()?;
    Some(match tz {
        Some(tz) => utc.with_timezone(&tz).to_rfc3339(),
        None => utc.with_timezone(&chrono::Local).to_rfc3339(),
    })
}

/// 单轮刷新结果
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RefreshSummary {
    pub updated: usize,
    pub failed: usize,
}

/// 看板刷新循环
pub struct Dashboard {
    fetcher: QuoteFetcher,
    renderer: ChartRenderer,
    clock: Clock,
    state: SharedState,
    refresh_interval: Duration,
    clock_interval: Duration,
}

impl Dashboard {
    /// 按配置创建看板，同时构造所有图表
    pub fn new(config: &AppConfig) -> Result<Self> {
        let renderer = ChartRenderer::new(config.dashboard.chart_width, config.dashboard.chart_height);
        let clock = Clock::new(config.dashboard.timezone.as_deref())?;
        let state = DashboardState::new(config.dashboard.indices.clone(), &renderer, clock.tz());

        Ok(Self {
            fetcher: QuoteFetcher::new(&config.api)?,
            clock,
            renderer,
            state: Arc::new(RwLock::new(state)),
            refresh_interval: Duration::from_secs(config.dashboard.refresh_secs.max(1)),
            clock_interval: Duration::from_secs(config.dashboard.clock_secs.max(1)),
        })
    }

    pub fn state(&self) -> SharedState {
        self.state.clone()
    }

    /// 刷新单个指数；抓取失败时保留原有展示
    pub async fn refresh_index(&self, index: &IndexDescriptor) -> bool {
        // 请求期间不持有锁
        let Some(snapshot) = self.fetcher.fetch(&index.symbol).await else {
            log::warn!("{}（{}）本轮未获取到数据，保留上次展示", index.name, index.symbol);
            return false;
        };

        let mut state = self.state.write().await;
        state.apply(&self.renderer, &index.id, &snapshot);
        true
    }

    /// 顺序刷新所有指数，前一个完成后才请求下一个
    pub async fn refresh_all(&self) -> RefreshSummary {
        let indices = self.state.read().await.indices.clone();
        let mut summary = RefreshSummary::default();

        for index in &indices {
            if self.refresh_index(index).await {
                summary.updated += 1;
            } else {
                summary.failed += 1;
            }
        }

        log::info!("行情刷新完成: 成功 {}，失败 {}", summary.updated, summary.failed);
        summary
    }

    /// 刷新时钟节点
    pub async fn tick_clock(&self) {
        let mut state = self.state.write().await;
        self.clock.tick(&mut state.clock);
    }

    /// 启动刷新任务与时钟任务
    ///
    /// 两个定时器的首次触发都是立即的，因此启动后马上进行一轮完整刷新
    pub fn start(self) -> (JoinHandle<()>, JoinHandle<()>) {
        let dashboard = Arc::new(self);

        let refresher = dashboard.clone();
        let refresh_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(refresher.refresh_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                refresher.refresh_all().await;
            }
        });

        let ticker = dashboard;
        let clock_task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(ticker.clock_interval);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                interval.tick().await;
                ticker.tick_clock().await;
            }
        });

        (refresh_task, clock_task)
    }
}
