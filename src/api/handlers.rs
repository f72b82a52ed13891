use super::AppState;
use crate::db::{export, queries};
use crate::error::{AppError, AppResult};
use crate::models::{
    CatalogItem, Estimate, FacilityEstimateSet, FacilityGroup, NewCatalogItem, SiteAnalysisRequest,
    SiteAssessment, TenderLine, TenderQuote, WorkItem, WorkType,
};
use crate::service::aggregator;
use axum::{
    extract::{Json, Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use bigdecimal::{BigDecimal, Zero};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// 统一响应体
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub message: String,
    pub data: Option<T>,
}

impl<T: Serialize> ApiResponse<T> {
    fn ok(message: impl Into<String>, data: T) -> Json<Self> {
        Json(Self {
            success: true,
            message: message.into(),
            data: Some(data),
        })
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::AnalysisFailed(_) => StatusCode::BAD_GATEWAY,
            AppError::EmptyCatalog | AppError::InvalidImport(_) | AppError::InvalidInput(_) => {
                StatusCode::BAD_REQUEST
            }
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Storage(_) | AppError::Json(_) | AppError::Csv(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };
        if status.is_server_error() {
            tracing::error!("Request failed: {}", self);
        } else {
            tracing::warn!("Request rejected: {}", self);
        }

        let body = ApiResponse::<()> {
            success: false,
            message: format!("Error: {}", self),
            data: None,
        };
        (status, Json(body)).into_response()
    }
}

fn attachment(content_type: &'static str, file_name: String, body: Vec<u8>) -> Response {
    (
        [
            (header::CONTENT_TYPE, content_type.to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", file_name),
            ),
        ],
        body,
    )
        .into_response()
}

fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

fn validate_new_item(item: &NewCatalogItem) -> AppResult<()> {
    if item.name.trim().is_empty() {
        return Err(AppError::InvalidInput("name is required".into()));
    }
    if item.rate < BigDecimal::zero() {
        return Err(AppError::InvalidInput("rate must not be negative".into()));
    }
    Ok(())
}

/// 健康检查
pub async fn health_check() -> &'static str {
    "OK"
}

#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// 费率库列表/搜索
pub async fn list_catalog(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Json<ApiResponse<Vec<CatalogItem>>> {
    let store = state.store.read().await;
    let q = query.q.unwrap_or_default();
    let items: Vec<CatalogItem> = queries::search(store.items(), &q).into_iter().cloned().collect();
    ApiResponse::ok(format!("{} of {} items", items.len(), store.len()), items)
}

pub async fn list_facilities(State(state): State<AppState>) -> Json<ApiResponse<Vec<String>>> {
    let store = state.store.read().await;
    let facilities: Vec<String> = queries::facilities(store.items()).into_iter().collect();
    ApiResponse::ok(format!("{} facilities", facilities.len()), facilities)
}

pub async fn add_item(
    State(state): State<AppState>,
    Json(new): Json<NewCatalogItem>,
) -> AppResult<(StatusCode, Json<ApiResponse<CatalogItem>>)> {
    validate_new_item(&new)?;
    let mut store = state.store.write().await;
    let item = store.commit(|s| Ok(s.add(new))).await?;
    tracing::info!("Added catalog item {} ({})", item.id, item.name);
    Ok((StatusCode::CREATED, ApiResponse::ok("Item added", item)))
}

pub async fn update_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(new): Json<NewCatalogItem>,
) -> AppResult<Json<ApiResponse<CatalogItem>>> {
    validate_new_item(&new)?;
    let mut store = state.store.write().await;
    let item = store.commit(|s| s.update(&id, new)).await?;
    tracing::info!("Updated catalog item {}", id);
    Ok(ApiResponse::ok("Item updated", item))
}

pub async fn delete_item(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> AppResult<Json<ApiResponse<String>>> {
    let mut store = state.store.write().await;
    store
        .commit(|s| {
            if s.delete(&id) {
                Ok(())
            } else {
                Err(AppError::NotFound(format!("catalog item {}", id)))
            }
        })
        .await?;
    tracing::info!("Deleted catalog item {}", id);
    Ok(ApiResponse::ok("Item deleted", id))
}

/// JSON 备份下载
pub async fn backup_catalog(State(state): State<AppState>) -> AppResult<Response> {
    let store = state.store.read().await;
    let body = export::to_backup_json(store.items())?;
    Ok(attachment(
        "application/json",
        format!("smartrate_backup_{}.json", today()),
        body.into_bytes(),
    ))
}

/// 备份恢复: 整体替换; 文件无效时费率库不变
pub async fn restore_catalog(
    State(state): State<AppState>,
    body: String,
) -> AppResult<Json<ApiResponse<usize>>> {
    let items = export::parse_backup(&body)?;
    let count = items.len();
    let mut store = state.store.write().await;
    store
        .commit(|s| {
            s.replace_all(items);
            Ok(())
        })
        .await?;
    tracing::info!("Restored {} catalog items", count);
    Ok(ApiResponse::ok(format!("Restored {} items", count), count))
}

pub async fn export_catalog_csv(State(state): State<AppState>) -> AppResult<Response> {
    let store = state.store.read().await;
    let body = export::catalog_csv(store.items())?;
    Ok(attachment(
        "text/csv; charset=utf-8",
        format!("SmartRate_Database_{}.csv", today()),
        body,
    ))
}

#[derive(Debug, Deserialize)]
pub struct ParseRatesRequest {
    pub text: String,
    /// 为 true 时直接写入费率库
    #[serde(default)]
    pub commit: bool,
}

/// 从文本批量解析费率
pub async fn parse_rates(
    State(state): State<AppState>,
    Json(req): Json<ParseRatesRequest>,
) -> AppResult<Json<ApiResponse<Vec<NewCatalogItem>>>> {
    if req.text.trim().is_empty() {
        return Err(AppError::InvalidInput("text is empty".into()));
    }
    let parsed = state.ai.parse_rates(&req.text).await.map_err(|e| {
        tracing::error!("Bulk rate parsing error: {}", e);
        AppError::from(e)
    })?;

    if req.commit && !parsed.is_empty() {
        let mut store = state.store.write().await;
        store.commit(|s| Ok(s.add_many(parsed.clone()))).await?;
        tracing::info!("Imported {} parsed rates", parsed.len());
    }

    Ok(ApiResponse::ok(format!("Parsed {} rates", parsed.len()), parsed))
}

#[derive(Debug, Deserialize)]
pub struct EstimateRequest {
    pub items: Vec<WorkItem>,
}

fn validate_work_items<'a>(items: impl IntoIterator<Item = &'a WorkItem>) -> AppResult<()> {
    items
        .into_iter()
        .try_for_each(|w| w.validate().map_err(AppError::InvalidInput))
}

/// 平铺估算
pub async fn estimate(
    State(state): State<AppState>,
    Json(req): Json<EstimateRequest>,
) -> AppResult<Json<ApiResponse<Estimate>>> {
    validate_work_items(&req.items)?;
    let store = state.store.read().await;
    let est = aggregator::aggregate(&req.items, store.items());
    Ok(ApiResponse::ok(
        format!("{} lines, {} unmatched", est.lines.len(), est.unmatched_count()),
        est,
    ))
}

#[derive(Debug, Deserialize)]
pub struct FacilityEstimateRequest {
    pub groups: Vec<FacilityGroup>,
}

/// 按设施分组估算
pub async fn estimate_by_facility(
    State(state): State<AppState>,
    Json(req): Json<FacilityEstimateRequest>,
) -> AppResult<Json<ApiResponse<FacilityEstimateSet>>> {
    validate_work_items(req.groups.iter().flat_map(|g| &g.items))?;
    let store = state.store.read().await;
    let set = aggregator::aggregate_by_facility(&req.groups, store.items());
    Ok(ApiResponse::ok(format!("{} facilities", set.facilities.len()), set))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisRequest {
    /// base64 或 data URL (data:image/jpeg;base64,...)
    pub image: String,
    #[serde(default)]
    pub mime_type: Option<String>,
    #[serde(default)]
    pub work_type: WorkType,
    #[serde(default)]
    pub facilities: Vec<String>,
    #[serde(default)]
    pub dimensions: IndexMap<String, String>,
}

/// 拆分 data URL, 返回 (mime, base64 数据)
pub fn split_data_url(image: &str) -> (Option<&str>, &str) {
    match image.strip_prefix("data:").and_then(|rest| rest.split_once(',')) {
        Some((meta, data)) => (meta.split(';').next().filter(|m| !m.is_empty()), data),
        None => (None, image),
    }
}

impl AnalysisRequest {
    pub fn into_site_request(self) -> AppResult<SiteAnalysisRequest> {
        let (url_mime, data) = split_data_url(&self.image);
        let mime_type = self
            .mime_type
            .clone()
            .or_else(|| url_mime.map(str::to_string))
            .ok_or_else(|| AppError::InvalidInput("mime type is required".into()))?;
        let image = STANDARD
            .decode(data.trim())
            .map_err(|e| AppError::InvalidInput(format!("image is not valid base64: {}", e)))?;

        Ok(SiteAnalysisRequest {
            image,
            mime_type,
            work_type: self.work_type,
            facilities: self.facilities.into_iter().collect(),
            dimensions: self.dimensions,
        })
    }
}

/// 现场图片分析 + 估算
pub async fn analyze_site(
    State(state): State<AppState>,
    Json(req): Json<AnalysisRequest>,
) -> AppResult<Json<ApiResponse<SiteAssessment>>> {
    let request = req.into_site_request()?;
    let catalog = state.store.read().await.snapshot();
    let assessment = state.assessment.assess(&catalog, &request).await?;
    Ok(ApiResponse::ok(
        format!("{} problems found", assessment.problems.len()),
        assessment,
    ))
}

#[derive(Debug, Deserialize)]
pub struct TenderRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub items: Option<Vec<TenderLine>>,
}

/// 招标报价: 文本或已结构化条目
pub async fn build_tender_quote(
    State(state): State<AppState>,
    Json(req): Json<TenderRequest>,
) -> AppResult<Json<ApiResponse<TenderQuote>>> {
    let catalog = state.store.read().await.snapshot();
    let quote = match (req.items, req.text) {
        (Some(items), _) => state.tender.build_quote_from_lines(&catalog, items).await?,
        (None, Some(text)) => state.tender.build_quote(&catalog, &text).await?,
        (None, None) => return Err(AppError::InvalidInput("either text or items is required".into())),
    };
    Ok(ApiResponse::ok(
        format!("Quoted {} items, total {}", quote.lines.len(), export::money(&quote.total)),
        quote,
    ))
}

pub async fn export_tender_csv(Json(quote): Json<TenderQuote>) -> AppResult<Response> {
    let body = export::tender_csv(&quote)?;
    Ok(attachment(
        "text/csv; charset=utf-8",
        format!("SmartRate_Quotation_{}.csv", today()),
        body,
    ))
}
