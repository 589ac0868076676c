//! 市场指数看板服务
//!
//! 每 60 秒从雅虎财经拉取四个指数的日内分时行情，
//! 在服务端维护图表与价格展示，并以 HTML 页面和 JSON 接口输出

mod config;     // 配置
mod handlers;   // HTTP 请求处理器
mod models;     // 数据模型定义
mod services;   // 业务逻辑服务

use actix_web::{middleware::Logger, web, App, HttpServer};
use env_logger::Env;

use crate::config::AppConfig;
use crate::handlers::page::PageOptions;
use crate::services::dashboard::Dashboard;

/// 应用程序入口
///
/// 启动刷新任务与时钟任务，然后启动 HTTP 服务器
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    let config = AppConfig::load();

    // 初始化日志系统，RUST_LOG 优先，否则使用配置中的级别
    env_logger::init_from_env(Env::default().default_filter_or(config.log.level.as_str()));

    let dashboard = Dashboard::new(&config).map_err(|e| {
        log::error!("初始化看板失败: {:#}", e);
        std::io::Error::new(std::io::ErrorKind::InvalidInput, e.to_string())
    })?;
    let state = dashboard.state();
    let page = PageOptions {
        refresh_secs: config.dashboard.page_refresh_secs,
    };

    log::info!(
        "启动市场指数看板: {} 个指数，刷新周期 {} 秒",
        config.dashboard.indices.len(),
        config.dashboard.refresh_secs
    );
    let _tasks = dashboard.start();

    let bind_addr = config.bind_addr();
    log::info!("监听 {}", bind_addr);

    let mut server = HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())  // 添加请求日志中间件
            .app_data(web::Data::new(state.clone()))
            .app_data(web::Data::new(page.clone()))
            .configure(handlers::config)  // 配置路由
    });
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    server.bind(bind_addr)?.run().await
}
