use crate::ai::AiService;
use crate::db::queries;
use crate::error::{AppError, AppResult};
use crate::models::{
    AnalysisItems, CatalogItem, EstimateView, SiteAnalysisRequest, SiteAssessment,
};
use crate::service::aggregator;

/// 现场评估: 图片分析 + 按费率库定价
pub struct AssessmentService {
    ai: AiService,
}

impl AssessmentService {
    pub fn new(ai: AiService) -> Self {
        Self { ai }
    }

    pub async fn assess(
        &self,
        catalog: &[CatalogItem],
        request: &SiteAnalysisRequest,
    ) -> AppResult<SiteAssessment> {
        if request.image.is_empty() {
            return Err(AppError::InvalidInput("image is empty".into()));
        }
        if !request.mime_type.starts_with("image/") {
            return Err(AppError::InvalidInput(format!(
                "unsupported mime type {}",
                request.mime_type
            )));
        }

        let subset = queries::by_facilities(catalog, &request.facilities);
        tracing::info!(
            "Analyzing site image ({} bytes, {} facilities, {} catalog items in scope)",
            request.image.len(),
            request.facilities.len(),
            subset.len()
        );

        let analysis = self.ai.analyze_site(request, &subset).await.map_err(|e| {
            tracing::error!("Vision analysis error: {}", e);
            AppError::from(e)
        })?;

        // 定价使用完整费率库, 只按名称匹配
        let estimate = match &analysis.items {
            AnalysisItems::Flat(bom) => EstimateView::Flat(aggregator::aggregate(bom, catalog)),
            AnalysisItems::Grouped(groups) => {
                EstimateView::Grouped(aggregator::aggregate_by_facility(groups, catalog))
            }
        };

        tracing::info!(
            "Site analysis done: {} problems, estimate total {}",
            analysis.problems.len(),
            estimate.total()
        );

        Ok(SiteAssessment {
            summary: analysis.summary,
            problems: analysis.problems,
            estimate,
        })
    }
}
