use super::CatalogItem;
use bigdecimal::BigDecimal;
use serde::{Deserialize, Serialize};

/// 招标文本解析出的条目
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderLine {
    pub name: String,
    #[serde(default, deserialize_with = "crate::models::decimal::deserialize_option")]
    pub quantity: Option<BigDecimal>,
    #[serde(default)]
    pub requested_scope: String,
    #[serde(default, deserialize_with = "crate::models::decimal::deserialize_option")]
    pub estimated_rate: Option<BigDecimal>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum MatchStatus {
    Matched,
    NoMatch,
}

impl MatchStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchStatus::Matched => "matched",
            MatchStatus::NoMatch => "no-match",
        }
    }
}

/// 报价明细行
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TenderQuoteLine {
    pub id: String,
    pub name: String,
    #[serde(deserialize_with = "crate::models::decimal::deserialize")]
    pub quantity: BigDecimal,
    pub requested_scope: String,
    #[serde(default, deserialize_with = "crate::models::decimal::deserialize_option")]
    pub estimated_rate: Option<BigDecimal>,
    pub matched: Option<CatalogItem>,
    pub status: MatchStatus,
    #[serde(deserialize_with = "crate::models::decimal::deserialize")]
    pub line_total: BigDecimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TenderQuote {
    pub lines: Vec<TenderQuoteLine>,
    #[serde(deserialize_with = "crate::models::decimal::deserialize")]
    pub total: BigDecimal,
}
