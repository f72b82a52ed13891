use crate::models::{
    CatalogItem, Estimate, EstimateLine, FacilityEstimate, FacilityEstimateSet, FacilityGroup,
    WorkItem,
};
use crate::service::matcher::match_exact;
use bigdecimal::{BigDecimal, Zero};

fn price_lines(work_items: &[WorkItem], catalog: &[CatalogItem]) -> (Vec<EstimateLine>, BigDecimal) {
    let mut total = BigDecimal::zero();
    let lines: Vec<EstimateLine> = work_items
        .iter()
        .map(|w| {
            let matched = match_exact(catalog, &w.item);
            if matched.is_none() {
                tracing::debug!("'{}' has no catalog match, priced at zero", w.item);
            }
            let line = EstimateLine::priced(&w.item, &w.unit, &w.quantity, matched);
            total += line.line_total.clone();
            line
        })
        .collect();
    (lines, total)
}

/// 平铺估算: 单价取精确匹配的费率, 未匹配为 0; 保持输入顺序
pub fn aggregate(work_items: &[WorkItem], catalog: &[CatalogItem]) -> Estimate {
    let (lines, total) = price_lines(work_items, catalog);
    Estimate { lines, total }
}

/// 按设施分组估算: 小计为组内行合计, 总计为小计之和
pub fn aggregate_by_facility(groups: &[FacilityGroup], catalog: &[CatalogItem]) -> FacilityEstimateSet {
    let mut grand_total = BigDecimal::zero();
    let facilities: Vec<FacilityEstimate> = groups
        .iter()
        .map(|g| {
            let (lines, subtotal) = price_lines(&g.items, catalog);
            grand_total += subtotal.clone();
            FacilityEstimate {
                facility: g.facility.clone(),
                lines,
                subtotal,
            }
        })
        .collect();

    FacilityEstimateSet {
        facilities,
        grand_total,
    }
}
