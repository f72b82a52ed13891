use super::{EstimateView, FacilityGroup, WorkItem};
use indexmap::{IndexMap, IndexSet};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ProblemCategory {
    Civil,
    Electrical,
    Mechanical,
    Safety,
    General,
}

impl ProblemCategory {
    pub const ALL: [&'static str; 5] = ["Civil", "Electrical", "Mechanical", "Safety", "General"];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Low,
    Medium,
    High,
}

impl Severity {
    pub const ALL: [&'static str; 3] = ["Low", "Medium", "High"];
}

/// 现场发现的问题
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Problem {
    pub category: ProblemCategory,
    pub description: String,
    pub severity: Severity,
}

/// 作业类型
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkType {
    Repair,
    #[default]
    Maintenance,
    NewWork,
    Inspection,
}

impl WorkType {
    pub fn label(&self) -> &'static str {
        match self {
            WorkType::Repair => "repair of damaged works",
            WorkType::Maintenance => "routine maintenance",
            WorkType::NewWork => "new construction work",
            WorkType::Inspection => "condition inspection",
        }
    }
}

/// 现场图片分析请求上下文
#[derive(Debug, Clone)]
pub struct SiteAnalysisRequest {
    pub image: Vec<u8>,
    pub mime_type: String,
    pub work_type: WorkType,
    /// 选中的设施 (保序去重)
    pub facilities: IndexSet<String>,
    /// 设施 -> 尺寸描述
    pub dimensions: IndexMap<String, String>,
}

impl SiteAnalysisRequest {
    pub fn is_grouped(&self) -> bool {
        !self.facilities.is_empty()
    }
}

/// 工作项: 平铺 BOM 或按设施分组
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "items", rename_all = "snake_case")]
pub enum AnalysisItems {
    Flat(Vec<WorkItem>),
    Grouped(Vec<FacilityGroup>),
}

/// 经过校验的 AI 分析结果
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAnalysis {
    pub summary: String,
    pub problems: Vec<Problem>,
    pub items: AnalysisItems,
}

/// 现场评估: 分析 + 定价
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SiteAssessment {
    pub summary: String,
    pub problems: Vec<Problem>,
    pub estimate: EstimateView,
}
