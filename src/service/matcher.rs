use crate::ai::AiService;
use crate::db::queries;
use crate::models::CatalogItem;

/// 精确匹配: 名称忽略大小写完全相等, 重名时取费率库中第一个
pub fn match_exact<'a>(catalog: &'a [CatalogItem], name: &str) -> Option<&'a CatalogItem> {
    let key = name.to_lowercase();
    catalog.iter().find(|c| c.name.to_lowercase() == key)
}

/// 匹配结果及来源
#[derive(Debug, Clone, PartialEq)]
pub enum MatchOutcome {
    Exact(CatalogItem),
    Semantic(CatalogItem),
    NoMatch,
}

impl MatchOutcome {
    pub fn item(&self) -> Option<&CatalogItem> {
        match self {
            MatchOutcome::Exact(item) | MatchOutcome::Semantic(item) => Some(item),
            MatchOutcome::NoMatch => None,
        }
    }

    pub fn into_item(self) -> Option<CatalogItem> {
        match self {
            MatchOutcome::Exact(item) | MatchOutcome::Semantic(item) => Some(item),
            MatchOutcome::NoMatch => None,
        }
    }
}

/// 语义匹配: 先走精确匹配, 未命中再调用外部能力
pub struct SemanticMatcher {
    ai: AiService,
}

impl SemanticMatcher {
    pub fn new(ai: AiService) -> Self {
        Self { ai }
    }

    /// 外部调用失败、返回空 ID 或返回费率库中不存在的 ID, 均视为无匹配
    pub async fn resolve(&self, catalog: &[CatalogItem], name: &str, scope: &str) -> MatchOutcome {
        if let Some(hit) = match_exact(catalog, name) {
            return MatchOutcome::Exact(hit.clone());
        }
        if catalog.is_empty() {
            return MatchOutcome::NoMatch;
        }

        let candidates = queries::match_candidates(catalog);
        let id = match self.ai.find_best_match(name, scope, &candidates).await {
            Ok(Some(id)) => id,
            Ok(None) => {
                tracing::debug!("No semantic match for '{}'", name);
                return MatchOutcome::NoMatch;
            }
            Err(e) => {
                tracing::warn!("Semantic matching for '{}' failed: {}", name, e);
                return MatchOutcome::NoMatch;
            }
        };

        match queries::find_by_id(catalog, &id) {
            Some(item) => MatchOutcome::Semantic(item.clone()),
            None => {
                tracing::warn!("Semantic match for '{}' returned unknown id {}, ignoring", name, id);
                MatchOutcome::NoMatch
            }
        }
    }
}
