use crate::ai::AiService;
use crate::error::{AppError, AppResult};
use crate::models::{CatalogItem, MatchStatus, TenderLine, TenderQuote, TenderQuoteLine};
use crate::service::matcher::{MatchOutcome, SemanticMatcher};
use bigdecimal::{BigDecimal, Zero};

/// 招标报价服务: 文本 -> 条目 -> 逐条匹配 -> 报价
pub struct TenderService {
    ai: AiService,
    matcher: SemanticMatcher,
}

impl TenderService {
    pub fn new(ai: AiService) -> Self {
        Self {
            matcher: SemanticMatcher::new(ai.clone()),
            ai,
        }
    }

    /// 从招标文本生成报价
    pub async fn build_quote(&self, catalog: &[CatalogItem], text: &str) -> AppResult<TenderQuote> {
        if text.trim().is_empty() {
            return Err(AppError::InvalidInput("tender text is empty".into()));
        }
        if catalog.is_empty() {
            return Err(AppError::EmptyCatalog);
        }

        let lines = self.ai.parse_bulk_items(text).await?;
        tracing::info!("Parsed {} tender items", lines.len());
        self.build_quote_from_lines(catalog, lines).await
    }

    /// 对已结构化的条目逐条匹配 (顺序调用, 不并发)
    pub async fn build_quote_from_lines(
        &self,
        catalog: &[CatalogItem],
        lines: Vec<TenderLine>,
    ) -> AppResult<TenderQuote> {
        if catalog.is_empty() {
            return Err(AppError::EmptyCatalog);
        }

        let total_items = lines.len();
        let mut matched_count = 0;
        let mut semantic_count = 0;
        let mut total = BigDecimal::zero();
        let mut out = Vec::with_capacity(total_items);

        for (idx, line) in lines.into_iter().enumerate() {
            let outcome = self
                .matcher
                .resolve(catalog, &line.name, &line.requested_scope)
                .await;
            if let MatchOutcome::Semantic(_) = outcome {
                semantic_count += 1;
            }

            // 缺失或非正数量按 1 计
            let quantity = line
                .quantity
                .filter(|q| *q > BigDecimal::zero())
                .unwrap_or_else(|| BigDecimal::from(1));

            let matched = outcome.into_item();
            let status = if matched.is_some() {
                matched_count += 1;
                MatchStatus::Matched
            } else {
                MatchStatus::NoMatch
            };
            let rate = matched.as_ref().map(|m| m.rate.clone()).unwrap_or_else(BigDecimal::zero);
            let line_total = &quantity * &rate;
            total += line_total.clone();

            out.push(TenderQuoteLine {
                id: uuid::Uuid::new_v4().to_string(),
                name: line.name,
                quantity,
                requested_scope: line.requested_scope,
                estimated_rate: line.estimated_rate,
                matched,
                status,
                line_total,
            });

            let current_idx = idx + 1;
            if current_idx % 100 == 0 || current_idx == 1 {
                tracing::info!(
                    "Tender进度: {}/{}, 已匹配: {}",
                    current_idx, total_items, matched_count
                );
            }
        }

        tracing::info!(
            "报价完成: 总条目: {}, 已匹配: {} (语义: {}), 合计: {}",
            total_items, matched_count, semantic_count, total
        );

        Ok(TenderQuote { lines: out, total })
    }
}
