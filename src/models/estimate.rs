use super::CatalogItem;
use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// 估算明细行 (匹配到的单价在此处复制一份, 不随费率库变化)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateLine {
    pub item: String,
    pub unit: String,
    #[serde(deserialize_with = "crate::models::decimal::deserialize")]
    pub quantity: BigDecimal,
    #[serde(deserialize_with = "crate::models::decimal::deserialize")]
    pub rate: BigDecimal,
    #[serde(deserialize_with = "crate::models::decimal::deserialize")]
    pub line_total: BigDecimal,
    pub matched_id: Option<String>,
    pub matched_name: Option<String>,
}

impl EstimateLine {
    pub fn priced(item: &str, unit: &str, quantity: &BigDecimal, matched: Option<&CatalogItem>) -> Self {
        let rate = matched.map(|m| m.rate.clone()).unwrap_or_else(BigDecimal::zero);
        let line_total = quantity * &rate;
        Self {
            item: item.to_string(),
            unit: unit.to_string(),
            quantity: quantity.clone(),
            rate,
            line_total,
            matched_id: matched.map(|m| m.id.clone()),
            matched_name: matched.map(|m| m.name.clone()),
        }
    }

    pub fn is_matched(&self) -> bool {
        self.matched_id.is_some()
    }
}

/// 平铺估算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Estimate {
    pub lines: Vec<EstimateLine>,
    #[serde(deserialize_with = "crate::models::decimal::deserialize")]
    pub total: BigDecimal,
}

impl Estimate {
    pub fn unmatched_count(&self) -> usize {
        self.lines.iter().filter(|l| !l.is_matched()).count()
    }
}

/// 单个设施的估算
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityEstimate {
    pub facility: String,
    pub lines: Vec<EstimateLine>,
    #[serde(deserialize_with = "crate::models::decimal::deserialize")]
    pub subtotal: BigDecimal,
}

/// 按设施分组的估算结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FacilityEstimateSet {
    pub facilities: Vec<FacilityEstimate>,
    #[serde(deserialize_with = "crate::models::decimal::deserialize")]
    pub grand_total: BigDecimal,
}

/// 现场评估附带的估算: 平铺或分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum EstimateView {
    Flat(Estimate),
    Grouped(FacilityEstimateSet),
}

impl EstimateView {
    pub fn total(&self) -> &BigDecimal {
        match self {
            EstimateView::Flat(e) => &e.total,
            EstimateView::Grouped(g) => &g.grand_total,
        }
    }
}
