use crate::models::{CatalogItem, MatchCandidate};
use indexmap::IndexSet;

/// 按 ID 查询
pub fn find_by_id<'a>(items: &'a [CatalogItem], id: &str) -> Option<&'a CatalogItem> {
    items.iter().find(|i| i.id == id)
}

/// 名称或设施包含关键字 (忽略大小写), 空关键字返回全部
pub fn search<'a>(items: &'a [CatalogItem], query: &str) -> Vec<&'a CatalogItem> {
    let q = query.to_lowercase();
    items
        .iter()
        .filter(|i| i.name.to_lowercase().contains(&q) || i.source.to_lowercase().contains(&q))
        .collect()
}

/// 选中设施可见的费率子集; 未选设施时返回全部
pub fn by_facilities(items: &[CatalogItem], facilities: &IndexSet<String>) -> Vec<CatalogItem> {
    if facilities.is_empty() {
        return items.to_vec();
    }
    items
        .iter()
        .filter(|i| facilities.contains(&i.source))
        .cloned()
        .collect()
}

/// 费率库中出现的设施, 按首次出现顺序
pub fn facilities(items: &[CatalogItem]) -> IndexSet<String> {
    items.iter().map(|i| i.source.clone()).collect()
}

/// 语义匹配候选列表
pub fn match_candidates(items: &[CatalogItem]) -> Vec<MatchCandidate> {
    items.iter().map(MatchCandidate::from).collect()
}
