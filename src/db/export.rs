use crate::error::{AppError, AppResult};
use crate::models::{CatalogItem, TenderQuote};
use bigdecimal::BigDecimal;
use csv::{QuoteStyle, Terminator, WriterBuilder};

const UTF8_BOM: &[u8] = b"\xEF\xBB\xBF";

const CATALOG_HEADERS: [&str; 6] = [
    "Item Name",
    "Unit",
    "Rate (₹)",
    "Scope of Work",
    "Source Reference",
    "Date Added",
];

const TENDER_HEADERS: [&str; 10] = [
    "Tender Item",
    "Quantity",
    "Requested Scope",
    "Estimated Rate (₹)",
    "Quoted Rate (₹)",
    "Unit",
    "Total Quoted (₹)",
    "Matched Database Item",
    "Source",
    "Status",
];

/// JSON 备份 (格式化数组)
pub fn to_backup_json(items: &[CatalogItem]) -> serde_json::Result<String> {
    serde_json::to_string_pretty(items)
}

/// 解析 JSON 备份; 非数组或条目结构不符时拒绝
pub fn parse_backup(raw: &str) -> AppResult<Vec<CatalogItem>> {
    let value: serde_json::Value =
        serde_json::from_str(raw).map_err(|e| AppError::InvalidImport(e.to_string()))?;
    if !value.is_array() {
        return Err(AppError::InvalidImport("expected a JSON array of catalog items".into()));
    }
    serde_json::from_value(value).map_err(|e| AppError::InvalidImport(e.to_string()))
}

/// 金额保留两位小数
pub fn money(v: &BigDecimal) -> String {
    v.round(2).with_scale(2).to_string()
}

fn or_na(v: Option<String>) -> String {
    v.unwrap_or_else(|| "N/A".to_string())
}

fn csv_writer() -> csv::Writer<Vec<u8>> {
    WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .terminator(Terminator::CRLF)
        .from_writer(UTF8_BOM.to_vec())
}

fn finish(writer: csv::Writer<Vec<u8>>) -> AppResult<Vec<u8>> {
    writer
        .into_inner()
        .map_err(|e| AppError::Storage(e.into_error()))
}

/// 导出费率库 CSV (名称, 单位, 单价, 工作内容, 设施, 日期)
pub fn catalog_csv(items: &[CatalogItem]) -> AppResult<Vec<u8>> {
    let mut writer = csv_writer();
    writer.write_record(CATALOG_HEADERS)?;

    for item in items {
        let date = item
            .created_at()
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_default();
        writer.write_record([
            item.name.clone(),
            item.unit.clone(),
            item.rate.to_string(),
            item.scope_of_work.clone(),
            item.source.clone(),
            date,
        ])?;
    }

    writer.flush()?;
    finish(writer)
}

/// 导出招标报价 CSV
pub fn tender_csv(quote: &TenderQuote) -> AppResult<Vec<u8>> {
    let mut writer = csv_writer();
    writer.write_record(TENDER_HEADERS)?;

    for line in &quote.lines {
        let matched = line.matched.as_ref();
        writer.write_record([
            line.name.clone(),
            line.quantity.to_string(),
            line.requested_scope.clone(),
            or_na(line.estimated_rate.as_ref().map(|r| r.to_string())),
            or_na(matched.map(|m| m.rate.to_string())),
            or_na(matched.map(|m| m.unit.clone())),
            money(&line.line_total),
            or_na(matched.map(|m| m.name.clone())),
            matched.map(|m| m.source.clone()).unwrap_or_default(),
            line.status.as_str().to_uppercase(),
        ])?;
    }

    writer.flush()?;
    finish(writer)
}
