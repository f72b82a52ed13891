use super::{GenerateRequest, InlineImage};
use crate::models::{CatalogItem, MatchCandidate, ProblemCategory, Severity, SiteAnalysisRequest};
use serde_json::{json, Value};
use std::fmt::Write;

fn work_item_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "item": { "type": "STRING" },
            "unit": { "type": "STRING" },
            "quantity": { "type": "NUMBER" },
            "estimatedScope": { "type": "STRING" }
        },
        "required": ["item", "unit", "quantity", "estimatedScope"]
    })
}

fn problem_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "category": { "type": "STRING", "enum": ProblemCategory::ALL },
            "description": { "type": "STRING" },
            "severity": { "type": "STRING", "enum": Severity::ALL }
        },
        "required": ["category", "description", "severity"]
    })
}

/// 图片分析的响应结构: 选了设施时按设施分组, 否则平铺 bom
pub fn site_analysis_schema(grouped: bool) -> Value {
    let problems = json!({ "type": "ARRAY", "items": problem_schema() });
    if grouped {
        json!({
            "type": "OBJECT",
            "properties": {
                "summary": { "type": "STRING" },
                "problems": problems,
                "facilityEstimates": {
                    "type": "ARRAY",
                    "items": {
                        "type": "OBJECT",
                        "properties": {
                            "facility": { "type": "STRING" },
                            "items": { "type": "ARRAY", "items": work_item_schema() }
                        },
                        "required": ["facility", "items"]
                    }
                }
            },
            "required": ["summary", "problems", "facilityEstimates"]
        })
    } else {
        json!({
            "type": "OBJECT",
            "properties": {
                "summary": { "type": "STRING" },
                "problems": problems,
                "bom": { "type": "ARRAY", "items": work_item_schema() }
            },
            "required": ["summary", "problems", "bom"]
        })
    }
}

/// 构造现场图片分析请求
pub fn site_analysis(request: &SiteAnalysisRequest, subset: &[CatalogItem]) -> GenerateRequest {
    let mut prompt = String::new();
    prompt.push_str(
        "Act as an expert petrol pump facility inspector and site engineer. Analyze this site image.\n",
    );
    let _ = writeln!(prompt, "Work type: {}.", request.work_type.label());

    if request.is_grouped() {
        prompt.push_str("Facilities in scope:\n");
        for facility in &request.facilities {
            match request.dimensions.get(facility).filter(|d| !d.trim().is_empty()) {
                Some(dims) => {
                    let _ = writeln!(prompt, "- {} (dimensions: {})", facility, dims.trim());
                }
                None => {
                    let _ = writeln!(prompt, "- {}", facility);
                }
            }
        }
    }

    prompt.push_str(
        "1. Identify specific problems/defects in:\n\
         \x20  - Civil works (pavement cracks, canopy damage, paint, drainage)\n\
         \x20  - Electrical works (lighting, exposed wiring, DU display, earthing)\n\
         \x20  - Mechanical works (DU nozzles, hoses, air towers, STP issues)\n\
         \x20  - Safety (fire extinguishers, signage, hazards)\n",
    );

    if request.is_grouped() {
        prompt.push_str(
            "2. For each facility in scope, list the repair/maintenance work items with quantities \
             derived from the given dimensions.\n",
        );
    } else {
        prompt.push_str(
            "2. Generate a structured Bill of Materials (BOM) for the necessary repair/maintenance work.\n",
        );
    }

    if !subset.is_empty() {
        prompt.push_str(
            "Use item names copied verbatim from this rate database; use the matching unit:\n",
        );
        for item in subset {
            let _ = writeln!(
                prompt,
                "- {} | unit: {} | facility: {} | scope: {}",
                item.name, item.unit, item.source, item.scope_of_work
            );
        }
    }

    prompt.push_str("Return the analysis in a strict JSON format.");

    GenerateRequest {
        prompt,
        image: Some(InlineImage {
            mime_type: request.mime_type.clone(),
            data: request.image.clone(),
        }),
        response_schema: site_analysis_schema(request.is_grouped()),
    }
}

/// 构造语义匹配请求
pub fn best_match(
    name: &str,
    scope: &str,
    candidates: &[MatchCandidate],
) -> Result<GenerateRequest, serde_json::Error> {
    let listing = serde_json::to_string(candidates)?;
    let prompt = format!(
        "Match this tender requirement to the most appropriate database item.\n\
         Tender Item Name: {name}\n\
         Requested Scope: {scope}\n\n\
         Available Database Items:\n\
         {listing}\n\n\
         Analyze the technical similarity. Return the \"id\" of the best match.\n\
         If no match is found, return an empty string."
    );

    Ok(GenerateRequest {
        prompt,
        image: None,
        response_schema: json!({
            "type": "OBJECT",
            "properties": {
                "id": {
                    "type": "STRING",
                    "description": "The ID of the matching item or an empty string if no reasonable match is found."
                }
            },
            "required": ["id"]
        }),
    })
}

/// 构造招标文本解析请求
pub fn bulk_items(text: &str) -> GenerateRequest {
    GenerateRequest {
        prompt: format!(
            "Extract items from this tender/quotation text into a structured list.\n\
             For each item, identify the name, quantity, requested scope of work, and estimated \
             rate/price if mentioned.\n\n\
             Text:\n{text}"
        ),
        image: None,
        response_schema: json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "quantity": { "type": "NUMBER" },
                    "requestedScope": { "type": "STRING" },
                    "estimatedRate": { "type": "NUMBER" }
                },
                "required": ["name", "quantity", "requestedScope"]
            }
        }),
    }
}

/// 构造费率文本解析请求
pub fn bulk_rates(text: &str) -> GenerateRequest {
    GenerateRequest {
        prompt: format!(
            "Extract Schedule of Rates (SOR) items from the following text.\n\
             For each item, identify the name, unit of measurement, rate in ₹, scope of work \
             description, and source reference.\n\n\
             Text:\n{text}"
        ),
        image: None,
        response_schema: json!({
            "type": "ARRAY",
            "items": {
                "type": "OBJECT",
                "properties": {
                    "name": { "type": "STRING" },
                    "unit": { "type": "STRING" },
                    "rate": { "type": "NUMBER" },
                    "scopeOfWork": { "type": "STRING" },
                    "source": { "type": "STRING" }
                },
                "required": ["name", "unit", "rate", "scopeOfWork", "source"]
            }
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::WorkType;
    use bigdecimal::BigDecimal;
    use indexmap::{IndexMap, IndexSet};

    fn canopy_item() -> CatalogItem {
        CatalogItem {
            id: "c1".into(),
            name: "Profile roofing sheet".into(),
            unit: "m²".into(),
            rate: BigDecimal::from(953),
            scope_of_work: "Galvalume sheets".into(),
            source: "Canopy".into(),
            timestamp: 0,
        }
    }

    fn request(facilities: &[&str]) -> SiteAnalysisRequest {
        let facilities: IndexSet<String> = facilities.iter().map(|f| f.to_string()).collect();
        let mut dimensions = IndexMap::new();
        dimensions.insert("Canopy".to_string(), "24m x 18m".to_string());
        SiteAnalysisRequest {
            image: vec![1, 2, 3],
            mime_type: "image/jpeg".into(),
            work_type: WorkType::Repair,
            facilities,
            dimensions,
        }
    }

    #[test]
    fn grouped_prompt_lists_facilities_and_catalog() {
        let req = site_analysis(&request(&["Canopy", "Kerb Wall"]), &[canopy_item()]);
        assert!(req.prompt.contains("- Canopy (dimensions: 24m x 18m)"));
        assert!(req.prompt.contains("- Kerb Wall\n"));
        assert!(req.prompt.contains("Profile roofing sheet | unit: m²"));
        assert!(req.prompt.contains("repair of damaged works"));
        assert!(req.response_schema["properties"]["facilityEstimates"].is_object());
        assert_eq!(req.image.unwrap().mime_type, "image/jpeg");
    }

    #[test]
    fn flat_prompt_asks_for_bom() {
        let req = site_analysis(&request(&[]), &[]);
        assert!(req.prompt.contains("Bill of Materials"));
        assert!(req.response_schema["properties"]["bom"].is_object());
        assert!(req.response_schema["properties"]["facilityEstimates"].is_null());
    }

    #[test]
    fn match_prompt_embeds_candidates() {
        let candidates = vec![MatchCandidate { id: "c1".into(), name: "Ridge sheet".into() }];
        let req = best_match("ridge cap", "canopy ridge", &candidates).unwrap();
        assert!(req.prompt.contains(r#"[{"id":"c1","name":"Ridge sheet"}]"#));
        assert!(req.prompt.contains("Tender Item Name: ridge cap"));
        assert!(req.image.is_none());
    }
}
