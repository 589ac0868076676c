//! 看板页面
//!
//! GET / 返回完整 HTML：时钟、每个指数的价格文字与 SVG 图表

use actix_web::{web, HttpResponse, Result};
use std::fmt::Write;

use crate::models::TextNode;
use crate::services::chart::render_svg;
use crate::services::clock::CLOCK_NODE_ID;
use crate::services::common::escape_html;
use crate::services::dashboard::{DashboardState, SharedState};

/// 页面选项
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// 浏览器自动刷新周期（秒，0 表示不刷新）
    pub refresh_secs: u64,
}

const STYLE: &str = r#"
body{margin:0;background:#0b0e11;color:#eaecef;font-family:-apple-system,'Noto Sans KR',sans-serif}
header{display:flex;justify-content:space-between;align-items:center;padding:16px 24px;border-bottom:1px solid rgba(255,255,255,0.05)}
#current-time{font-family:'JetBrains Mono',monospace;color:#8b92a5}
main{display:grid;grid-template-columns:repeat(auto-fit,minmax(420px,1fr));gap:16px;padding:24px}
.card{background:#17191e;border-radius:12px;padding:16px}
.card h2{margin:0 0 8px;font-size:16px;color:#8b92a5}
.price{display:flex;gap:12px;align-items:baseline;margin-bottom:8px;font-family:'JetBrains Mono',monospace}
.current-price{font-size:24px;font-weight:600}
.text-up{color:#2ebd85}
.text-down{color:#f6465d}
svg.chart{width:100%;height:auto;display:block}
.pt:hover circle{r:6px}
"#;

fn text_span(node: &TextNode) -> String {
    format!(
        r#"<span class="{}">{}</span>"#,
        escape_html(&node.class),
        escape_html(&node.text)
    )
}

/// 生成看板页面
pub fn render_page(state: &DashboardState, options: &PageOptions) -> String {
    let mut html = String::from("<!DOCTYPE html><html lang=\"ko\"><head><meta charset=\"utf-8\">");
    if options.refresh_secs > 0 {
        let _ = write!(html, r#"<meta http-equiv="refresh" content="{}">"#, options.refresh_secs);
    }
    let _ = write!(
        html,
        "<title>실시간 시장 지수</title><style>{}</style></head><body>",
        STYLE
    );
    let _ = write!(
        html,
        r#"<header><h1>실시간 시장 지수</h1><span id="{}">{}</span></header><main>"#,
        CLOCK_NODE_ID,
        escape_html(&state.clock.text)
    );

    for index in &state.indices {
        let _ = write!(
            html,
            r#"<section class="card"><h2>{}</h2><div id="{}" class="price">"#,
            escape_html(&index.name),
            escape_html(&index.price_container_id())
        );
        if let Some(slot) = state.prices.get(&index.id) {
            if let Some(price) = &slot.price {
                html.push_str(&text_span(price));
            }
            if let Some(change) = &slot.change {
                html.push_str(&text_span(change));
            }
        }
        html.push_str("</div>");
        if let Some(chart) = state.charts.get(&index.id) {
            html.push_str(&render_svg(chart));
        }
        html.push_str("</section>");
    }

    html.push_str("</main></body></html>");
    html
}

pub async fn dashboard_page(
    state: web::Data<SharedState>,
    options: web::Data<PageOptions>,
) -> Result<HttpResponse> {
    let state = state.read().await;
    let html = render_page(&state, &options);
    Ok(HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html))
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(dashboard_page));
}
