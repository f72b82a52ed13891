pub mod analysis;
pub mod catalog;
pub mod decimal;
pub mod estimate;
pub mod tender;
pub mod work_item;

pub use analysis::{
    AnalysisItems, Problem, ProblemCategory, Severity, SiteAnalysis, SiteAnalysisRequest,
    SiteAssessment, WorkType,
};
pub use catalog::{CatalogItem, MatchCandidate, NewCatalogItem};
pub use estimate::{Estimate, EstimateLine, EstimateView, FacilityEstimate, FacilityEstimateSet};
pub use tender::{MatchStatus, TenderLine, TenderQuote, TenderQuoteLine};
pub use work_item::{FacilityGroup, WorkItem};
