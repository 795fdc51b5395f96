pub mod cache;
pub mod cache_keys;
pub mod dual;
pub mod export;
pub mod extraction;
pub mod llm;
pub mod screening;
pub mod stats;

pub use cache::ScreeningCache;
pub use dual::DualScreeningService;
pub use extraction::CriteriaExtractionService;
pub use llm::LlmClient;
pub use screening::ScreeningService;
