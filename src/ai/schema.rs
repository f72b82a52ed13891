//! 模型输出校验: 不信任字段存在性, 结构不符直接拒绝

use crate::error::AiError;
use crate::models::{
    decimal, AnalysisItems, FacilityGroup, NewCatalogItem, Problem, SiteAnalysis, TenderLine,
    WorkItem,
};
use bigdecimal::{BigDecimal, Zero};
use serde::Deserialize;
use serde_json::Value;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSiteAnalysis {
    summary: String,
    problems: Vec<Problem>,
    #[serde(default)]
    bom: Option<Vec<WorkItem>>,
    #[serde(default)]
    facility_estimates: Option<Vec<FacilityGroup>>,
}

fn schema_err(msg: impl Into<String>) -> AiError {
    AiError::Schema(msg.into())
}

fn check_work_item(item: &WorkItem) -> Result<(), AiError> {
    item.validate().map_err(AiError::Schema)
}

/// 校验图片分析结果; 两种形态都给出时以请求的形态为准
pub fn site_analysis(value: Value, grouped: bool) -> Result<SiteAnalysis, AiError> {
    if !value.is_object() {
        return Err(schema_err("analysis response is not an object"));
    }
    let raw: RawSiteAnalysis =
        serde_json::from_value(value).map_err(|e| schema_err(e.to_string()))?;

    let items = match (raw.bom, raw.facility_estimates) {
        (Some(bom), Some(groups)) => {
            if grouped {
                AnalysisItems::Grouped(groups)
            } else {
                AnalysisItems::Flat(bom)
            }
        }
        (Some(bom), None) => AnalysisItems::Flat(bom),
        (None, Some(groups)) => AnalysisItems::Grouped(groups),
        (None, None) => return Err(schema_err("response has neither bom nor facilityEstimates")),
    };

    match &items {
        AnalysisItems::Flat(bom) => bom.iter().try_for_each(check_work_item)?,
        AnalysisItems::Grouped(groups) => {
            for group in groups {
                if group.facility.trim().is_empty() {
                    return Err(schema_err("facility estimate with empty facility label"));
                }
                group.items.iter().try_for_each(check_work_item)?;
            }
        }
    }

    Ok(SiteAnalysis {
        summary: raw.summary,
        problems: raw.problems,
        items,
    })
}

/// 语义匹配结果 `{id}`; 空 ID 视为无匹配
pub fn match_id(value: Value) -> Result<Option<String>, AiError> {
    match value.get("id") {
        Some(Value::String(id)) if id.trim().is_empty() => Ok(None),
        Some(Value::String(id)) => Ok(Some(id.clone())),
        Some(Value::Null) | None => Ok(None),
        Some(other) => Err(schema_err(format!("match id is not a string: {}", other))),
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawTenderLine {
    #[serde(alias = "item")]
    name: String,
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    quantity: Option<BigDecimal>,
    #[serde(default, alias = "estimatedScope")]
    requested_scope: Option<String>,
    #[serde(default, deserialize_with = "decimal::deserialize_option")]
    estimated_rate: Option<BigDecimal>,
}

/// 招标解析结果: 必须是数组
pub fn tender_lines(value: Value) -> Result<Vec<TenderLine>, AiError> {
    if !value.is_array() {
        return Err(schema_err("tender items response is not an array"));
    }
    let raw: Vec<RawTenderLine> =
        serde_json::from_value(value).map_err(|e| schema_err(e.to_string()))?;

    raw.into_iter()
        .map(|r| {
            if r.name.trim().is_empty() {
                return Err(schema_err("tender item with empty name"));
            }
            Ok(TenderLine {
                name: r.name,
                quantity: r.quantity,
                requested_scope: r.requested_scope.unwrap_or_default(),
                estimated_rate: r.estimated_rate,
            })
        })
        .collect()
}

/// 费率解析结果: 必须是数组, 单价不可为负
pub fn rates(value: Value) -> Result<Vec<NewCatalogItem>, AiError> {
    if !value.is_array() {
        return Err(schema_err("rates response is not an array"));
    }
    let items: Vec<NewCatalogItem> =
        serde_json::from_value(value).map_err(|e| schema_err(e.to_string()))?;

    for item in &items {
        if item.name.trim().is_empty() {
            return Err(schema_err("rate item with empty name"));
        }
        if item.rate < BigDecimal::zero() {
            return Err(schema_err(format!("rate for '{}' is negative", item.name)));
        }
    }
    Ok(items)
}
