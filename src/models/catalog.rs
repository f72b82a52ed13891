use bigdecimal::BigDecimal;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

/// 费率库条目 (CatalogItem)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    pub id: String,
    pub name: String,
    pub unit: String,
    #[serde(deserialize_with = "crate::models::decimal::deserialize")]
    pub rate: BigDecimal,
    pub scope_of_work: String,
    /// 分类/设施 (如 "Canopy")
    pub source: String,
    /// 创建时间, 毫秒时间戳
    pub timestamp: i64,
}

/// 可编辑部分 (新增/编辑/批量解析)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewCatalogItem {
    pub name: String,
    pub unit: String,
    #[serde(deserialize_with = "crate::models::decimal::deserialize")]
    pub rate: BigDecimal,
    pub scope_of_work: String,
    pub source: String,
}

impl CatalogItem {
    /// 用新 ID 和当前时间创建条目
    pub fn create(new: NewCatalogItem) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            name: new.name,
            unit: new.unit,
            rate: new.rate,
            scope_of_work: new.scope_of_work,
            source: new.source,
            timestamp: Utc::now().timestamp_millis(),
        }
    }

    /// 原地编辑, 保留 id 与 timestamp
    pub fn apply(&mut self, new: NewCatalogItem) {
        self.name = new.name;
        self.unit = new.unit;
        self.rate = new.rate;
        self.scope_of_work = new.scope_of_work;
        self.source = new.source;
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.timestamp).single()
    }
}

/// 语义匹配候选 {id, name}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatchCandidate {
    pub id: String,
    pub name: String,
}

impl From<&CatalogItem> for MatchCandidate {
    fn from(item: &CatalogItem) -> Self {
        Self {
            id: item.id.clone(),
            name: item.name.clone(),
        }
    }
}
