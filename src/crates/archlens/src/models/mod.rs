//! Request and response contracts
//!
//! - `request`: inbound evaluation request schema and validation
//! - `response`: the structured critique the model must return

pub mod request;
pub mod response;

pub use request::{
    ClosedSet, EvaluationContext, EvaluationRequest, FieldViolation, FocusArea, RagConfig,
    RagSource, SystemType, ValidationError,
};
pub use response::{
    ArchitectureBreakdown, ArchitectureComponent, CostTradeoff, DataFlow, EvaluationResult,
    FailureMode, InfraCostEstimate, ReliabilityAnalysis, ScalabilityAnalysis, ScalabilityRisk,
    SchemaError, REQUIRED_SECTIONS,
};
