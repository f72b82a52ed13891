use bigdecimal::{BigDecimal, Zero};
use serde::{Deserialize, Serialize};

/// AI 识别出的工作项 (一项需求一条)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    pub item: String,
    pub unit: String,
    #[serde(deserialize_with = "crate::models::decimal::deserialize")]
    pub quantity: BigDecimal,
    pub estimated_scope: String,
}

impl WorkItem {
    /// 名称非空, 数量为正
    pub fn validate(&self) -> Result<(), String> {
        if self.item.trim().is_empty() {
            return Err("work item with empty name".to_string());
        }
        if self.quantity <= BigDecimal::zero() {
            return Err(format!(
                "work item '{}' has non-positive quantity {}",
                self.item, self.quantity
            ));
        }
        Ok(())
    }
}

/// 按设施分组的工作项
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FacilityGroup {
    pub facility: String,
    pub items: Vec<WorkItem>,
}
