use smartrate_rust::{router, AiService, AppConfig, AppState, CatalogStore, GeminiClient};
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::fmt::time::ChronoLocal;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 初始化日志 - 使用本地时间格式
    tracing_subscriber::fmt()
        .with_timer(ChronoLocal::new("%Y-%m-%d %H:%M:%S".to_string()))
        .with_target(true)
        .with_level(true)
        .init();

    // 加载配置
    let config = AppConfig::load()?;
    info!("Starting server with config: {:?}", config);

    // 加载费率库
    let mut store = if config.catalog.seed_if_missing {
        CatalogStore::open_or_seed(&config.catalog.path)?
    } else {
        CatalogStore::open(&config.catalog.path)?
    };
    if store.is_dirty() {
        store.save().await?;
    }
    info!("Catalog loaded: {} items from {}", store.len(), store.path().display());

    // 外部 AI 服务
    let model = GeminiClient::new(&config.ai)?;
    let ai = AiService::new(Arc::new(model));
    info!("AI model: {}", config.ai.model);

    let app = router(AppState::new(store, ai));

    // 启动服务器
    let addr = format!("{}:{}", config.server.host, config.server.port);
    info!("Server listening on {}", addr);
    info!("API Endpoints:");
    info!("  GET  /api/catalog            - list / search rates");
    info!("  POST /api/estimate           - flat estimate");
    info!("  POST /api/estimate/facility  - facility-grouped estimate");
    info!("  POST /api/analysis           - site photo assessment");
    info!("  POST /api/tender             - tender quote");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
