pub mod handlers;

use crate::ai::AiService;
use crate::db::CatalogStore;
use crate::service::{AssessmentService, TenderService};
use axum::{
    extract::Request,
    middleware::{self, Next},
    response::Response,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::RwLock;
use tower::ServiceBuilder;

pub use handlers::*;

/// 共享状态: 费率库 + 外部能力相关服务
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<CatalogStore>>,
    pub ai: AiService,
    pub tender: Arc<TenderService>,
    pub assessment: Arc<AssessmentService>,
}

impl AppState {
    pub fn new(store: CatalogStore, ai: AiService) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            tender: Arc::new(TenderService::new(ai.clone())),
            assessment: Arc::new(AssessmentService::new(ai.clone())),
            ai,
        }
    }
}

/// 构建路由
pub fn router(state: AppState) -> Router {
    let catalog_routes = Router::new()
        .route("/api/catalog", get(list_catalog).post(add_item))
        .route("/api/catalog/facilities", get(list_facilities))
        .route("/api/catalog/backup", get(backup_catalog))
        .route("/api/catalog/restore", post(restore_catalog))
        .route("/api/catalog/export.csv", get(export_catalog_csv))
        .route("/api/catalog/parse", post(parse_rates))
        .route("/api/catalog/:id", put(update_item).delete(delete_item));

    let estimate_routes = Router::new()
        .route("/api/estimate", post(estimate))
        .route("/api/estimate/facility", post(estimate_by_facility))
        .route("/api/analysis", post(analyze_site))
        .route("/api/tender", post(build_tender_quote))
        .route("/api/tender/export.csv", post(export_tender_csv));

    Router::new()
        .route("/health", get(health_check))
        .merge(catalog_routes)
        .merge(estimate_routes)
        .with_state(state)
        .layer(ServiceBuilder::new().layer(middleware::from_fn(log_requests)))
}

/// 请求日志: 方法, 路径, 状态码, 耗时
async fn log_requests(req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(req).await;
    let status = response.status();
    let elapsed = start.elapsed();
    if status.is_server_error() {
        tracing::warn!("{} {} -> {} ({:.2?})", method, path, status.as_u16(), elapsed);
    } else {
        tracing::info!("{} {} -> {} ({:.2?})", method, path, status.as_u16(), elapsed);
    }
    response
}
