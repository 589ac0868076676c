//! 看板接口处理器
//!
//! ## API 列表
//! - GET /dashboard - 时钟与所有指数的展示视图
//! - GET /indices/{id} - 单个指数的展示视图
//! - GET /indices/{id}/chart - 单个指数的图表配置与数据

use actix_web::{web, HttpResponse, Result};

use crate::models::{ApiResponse, IndexView};
use crate::services::dashboard::SharedState;

pub async fn get_dashboard(state: web::Data<SharedState>) -> Result<HttpResponse> {
    let state = state.read().await;
    let response = ApiResponse::success(state.view());
    Ok(HttpResponse::Ok().json(response))
}

pub async fn get_index(
    state: web::Data<SharedState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let state = state.read().await;

    match state.index_view(&id) {
        Some(view) => Ok(HttpResponse::Ok().json(ApiResponse::success(view))),
        None => {
            let response = ApiResponse::<IndexView>::error(format!("未知的指数: {}", id));
            Ok(HttpResponse::NotFound().json(response))
        }
    }
}

pub async fn get_index_chart(
    state: web::Data<SharedState>,
    path: web::Path<String>,
) -> Result<HttpResponse> {
    let id = path.into_inner();
    let state = state.read().await;

    match state.charts.get(&id) {
        Some(chart) => Ok(HttpResponse::Ok().json(ApiResponse::success(chart))),
        None => {
            let response = ApiResponse::<()>::error(format!("未知的指数: {}", id));
            Ok(HttpResponse::NotFound().json(response))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.route("/dashboard", web::get().to(get_dashboard)).service(
        web::scope("/indices")
            .route("/{id}", web::get().to(get_index))
            .route("/{id}/chart", web::get().to(get_index_chart)),
    );
}
