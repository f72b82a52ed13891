use crate::models::{CatalogItem, NewCatalogItem};
use bigdecimal::BigDecimal;
use std::str::FromStr;

/// 内置费率表: (名称, 单位, 单价, 工作内容, 设施)
const INITIAL_RATES: &[(&str, &str, &str, &str, &str)] = &[
    // Driveway Works
    ("Earthwork (soil)", "m³", "163.85", "Excavation in soil for driveway construction", "Driveway Works"),
    ("Filling excavated earth", "m³", "197.91", "Refilling and ramming of excavated earth in layers", "Driveway Works"),
    ("CC 1:4:8 (40 mm)", "m³", "5216.62", "Cement concrete 1:4:8 with 40mm graded stone aggregate", "Driveway Works"),
    ("Brick work CM 1:6", "m³", "5548.07", "Brick work with common burnt clay bricks in cement mortar 1:6", "Driveway Works"),
    ("Plaster 12 mm CM 1:4", "m²", "248.82", "12mm cement plaster of mix 1:4", "Driveway Works"),
    ("RCC 1:2:4", "m³", "6116.75", "Reinforced cement concrete 1:2:4 excluding steel", "Driveway Works"),
    ("WMM", "m³", "2379.99", "Wet Mix Macadam for road base", "Driveway Works"),
    ("M40 pavers 80 mm", "m²", "1009.18", "80mm thick M40 grade interlock pavers", "Driveway Works"),
    // Culvert & Approach
    ("CC 1:3:6", "m³", "5519.95", "Cement concrete 1:3:6 for culvert foundations", "Culvert & Approach"),
    ("RCC (Culvert)", "m³", "6954.39", "Reinforced cement concrete for culvert slabs/walls", "Culvert & Approach"),
    ("Suspended slab shuttering", "m²", "624.46", "Centering and shuttering for suspended slabs", "Culvert & Approach"),
    ("TMT steel Fe500D", "kg", "75.24", "Thermo-mechanically treated reinforcement bars", "Culvert & Approach"),
    ("Structural steel", "kg", "118.04", "Fabrication and hoisting of structural steel members", "Culvert & Approach"),
    ("GSB (CBR 30)", "m³", "2268.53", "Granular Sub-Base with CBR value 30", "Culvert & Approach"),
    // Canopy
    ("Profile roofing sheet", "m²", "953.93", "Pre-painted galvalume profile roofing sheets", "Canopy"),
    ("Ridge sheet", "m", "375.10", "Matching ridge pieces for canopy roofing", "Canopy"),
    ("Flashing sheet", "m", "332.12", "Side/End flashing for canopy waterproofing", "Canopy"),
    ("Structural steel (Canopy)", "kg", "91.68", "Heavy structural steel for canopy framing", "Canopy"),
    ("Metal false ceiling", "m²", "1352.12", "Aluminium/Steel linear false ceiling system", "Canopy"),
    ("RWP 110 mm", "m", "274.86", "110mm Rain Water Pipe for drainage", "Canopy"),
    ("RWP 160 mm", "m", "728.41", "160mm Heavy duty Rain Water Pipe", "Canopy"),
    ("Enamel paint", "m²", "159.62", "Two coats of synthetic enamel paint over primer", "Canopy"),
    ("Cu cable 3C×1.5", "m", "112.13", "3 Core 1.5 sqmm copper cable for canopy lighting", "Canopy"),
    ("Cu cable 3C×2.5", "m", "137.42", "3 Core 2.5 sqmm copper cable", "Canopy"),
    ("LED linear 80 W IP65", "each", "11006.90", "80W IP65 rated linear LED canopy light fixture", "Canopy"),
    ("GI flashing sheet 18G", "m²", "3456.85", "18 Gauge Galvanized Iron flashing", "Canopy"),
    ("Aluminium gutter", "m", "938.64", "Heavy duty aluminium gutter for canopy drainage", "Canopy"),
    // Hoarding Board
    ("Extra lift (Hoarding)", "m³", "81.46", "Additional charge for lift in excavation", "Hoarding Board"),
    ("Column shuttering", "m²", "661.09", "Shuttering for hoarding columns", "Hoarding Board"),
    ("MS tube", "kg", "129.25", "Medium/Heavy MS tubes for hoarding frame", "Hoarding Board"),
    ("Anchor bolt set", "each", "218.13", "Foundation anchor bolt with nuts/washers", "Hoarding Board"),
    ("LED 30 W IP65", "each", "2506.53", "30W IP65 LED floodlight for hoarding", "Hoarding Board"),
    // Kerb Wall
    ("Cement primer", "m²", "54.07", "Water thinnable cement primer application", "Kerb Wall"),
    ("Exterior acrylic paint", "m²", "148.40", "Two coats of exterior acrylic emulsion", "Kerb Wall"),
    ("Precast kerb stone", "m³", "7547.18", "M25 grade precast concrete kerb stones", "Kerb Wall"),
    // Miscellaneous
    ("Mass concrete shuttering", "m²", "256.66", "Basic shuttering for mass concrete works", "Miscellaneous"),
    ("Anchor bolt 16 mm", "each", "94.50", "16mm foundation bolt", "Miscellaneous"),
    // Non-Civil
    ("Granite cladding (black)", "m²", "3449.33", "Black granite cladding for DU islands", "Non-Civil"),
    ("Granite slab", "m²", "3799.97", "Polished granite slabs for facility tops", "Non-Civil"),
    ("Manhole 900 mm", "each", "130945.00", "900mm diameter heavy duty manhole cover and frame", "Non-Civil"),
    // Electrification
    ("Cu cable 3C×1.5 (FRLS)", "m", "103.64", "3 Core 1.5 sqmm FRLS Copper cable", "Electrification"),
    ("Cu cable 3C×2.5 FRLS", "m", "137.42", "3 Core 2.5 sqmm FRLS Copper cable", "Electrification"),
    ("Al cable 3.5C×35", "m", "218.82", "3.5 Core 35 sqmm Aluminium Armoured cable", "Electrification"),
    ("Earthing GI strip 50×10", "m", "366.16", "50x10mm GI strip for earthing", "Electrification"),
    ("GI wire 8 SWG", "m", "35.32", "8 SWG Galvanized Iron wire", "Electrification"),
    ("Medium RO Electrical Panel", "each", "216848.28", "Main electrical control panel for petrol pump", "Electrification"),
    ("LED Yard light 100 W", "each", "7097.05", "100W IP66 LED Yard light fixture", "Electrification"),
    ("Octagonal pole 5 m", "each", "9663.45", "5m Hot Dip Galvanized octagonal pole", "Electrification"),
    ("Octagonal pole 7 m", "each", "10797.62", "7m Hot Dip Galvanized octagonal pole", "Electrification"),
    // Air Facility
    ("Air compressor 5 HP", "each", "54183.99", "5HP reciprocating air compressor", "Air Facility"),
    ("Digital tyre inflator", "each", "52744.53", "Automatic digital tyre inflation system", "Air Facility"),
];

/// 构建内置费率表
pub fn initial_catalog() -> Vec<CatalogItem> {
    INITIAL_RATES
        .iter()
        .filter_map(|(name, unit, rate, scope, source)| {
            let rate = BigDecimal::from_str(rate).ok()?;
            Some(CatalogItem::create(NewCatalogItem {
                name: name.to_string(),
                unit: unit.to_string(),
                rate,
                scope_of_work: scope.to_string(),
                source: source.to_string(),
            }))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn every_seed_rate_parses() {
        assert_eq!(initial_catalog().len(), INITIAL_RATES.len());
    }

    #[test]
    fn seed_ids_are_unique() {
        let items = initial_catalog();
        let ids: HashSet<_> = items.iter().map(|i| i.id.clone()).collect();
        assert_eq!(ids.len(), items.len());
    }

    #[test]
    fn seed_contains_tmt_steel() {
        let items = initial_catalog();
        let tmt = items.iter().find(|i| i.name == "TMT steel Fe500D").unwrap();
        assert_eq!(tmt.rate, BigDecimal::from_str("75.24").unwrap());
        assert_eq!(tmt.unit, "kg");
    }
}
