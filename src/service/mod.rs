pub mod aggregator;
pub mod assessment;
pub mod matcher;
pub mod tender;

pub use assessment::AssessmentService;
pub use matcher::{match_exact, MatchOutcome, SemanticMatcher};
pub use tender::TenderService;
