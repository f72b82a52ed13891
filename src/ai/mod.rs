//! 外部生成式 AI 能力边界
//!
//! 模型本身是黑盒: 给定提示词 (可带图片) 与响应结构, 返回 JSON。
//! 本模块负责构造请求、调用模型、并把不可信的 JSON 校验成强类型结果。

pub mod gemini;
pub mod prompt;
pub mod schema;

use crate::error::AiError;
use crate::models::{MatchCandidate, NewCatalogItem, SiteAnalysis, SiteAnalysisRequest, TenderLine, CatalogItem};
use async_trait::async_trait;
use std::sync::Arc;

pub use gemini::GeminiClient;

/// 内联图片
#[derive(Debug, Clone)]
pub struct InlineImage {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// 一次结构化生成请求
#[derive(Debug, Clone)]
pub struct GenerateRequest {
    pub prompt: String,
    pub image: Option<InlineImage>,
    pub response_schema: serde_json::Value,
}

/// 生成式模型: 返回符合 response_schema 的 JSON (不保证)
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    async fn generate_json(&self, request: GenerateRequest) -> Result<serde_json::Value, AiError>;
}

/// 四种外部能力: 图片分析 / 语义匹配 / 招标解析 / 费率解析
#[derive(Clone)]
pub struct AiService {
    model: Arc<dyn GenerativeModel>,
}

impl AiService {
    pub fn new(model: Arc<dyn GenerativeModel>) -> Self {
        Self { model }
    }

    pub async fn analyze_site(
        &self,
        request: &SiteAnalysisRequest,
        subset: &[CatalogItem],
    ) -> Result<SiteAnalysis, AiError> {
        let req = prompt::site_analysis(request, subset);
        let value = self.model.generate_json(req).await?;
        schema::site_analysis(value, request.is_grouped())
    }

    /// 返回模型选中的 ID, 空字符串视为无匹配
    pub async fn find_best_match(
        &self,
        name: &str,
        scope: &str,
        candidates: &[MatchCandidate],
    ) -> Result<Option<String>, AiError> {
        let req = prompt::best_match(name, scope, candidates)?;
        let value = self.model.generate_json(req).await?;
        schema::match_id(value)
    }

    pub async fn parse_bulk_items(&self, text: &str) -> Result<Vec<TenderLine>, AiError> {
        let value = self.model.generate_json(prompt::bulk_items(text)).await?;
        schema::tender_lines(value)
    }

    pub async fn parse_rates(&self, text: &str) -> Result<Vec<NewCatalogItem>, AiError> {
        let value = self.model.generate_json(prompt::bulk_rates(text)).await?;
        schema::rates(value)
    }
}
