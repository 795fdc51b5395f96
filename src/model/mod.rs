pub mod config;
pub mod criteria;
pub mod extracted;
pub mod paper;
pub mod screening;

pub use config::{Config, ScreeningConfig};
pub use criteria::{
    Assessment, CriteriaEntry, CriteriaMap, Criterion, CriterionAssessment, MalformedInputError,
    MissingCriterionPolicy, DUAL_COMPONENT,
};
pub use paper::Paper;
pub use screening::{AssessmentCounts, Decision, ScreeningResult};
