// ABOUTME: Core domain crate for kaizen.
// ABOUTME: Exposes the value records, request contracts, validation trait, and pipeline errors.

pub mod error;
pub mod model;

pub use error::{PipelineError, ProviderError};
pub use model::{
    AgentGenerationResult, AgentRecord, AnalysisResult, AnalyzeRequest, CompanyFacts,
    MetricRecord, ProblemRecord, SimulateRequest, SimulationResult, Validate,
};
