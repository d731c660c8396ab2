//! Scratch-and-dent purchase compiler.
//!
//! Eight modules run in a fixed order: damage classification, pricing, the safety gate,
//! warranty, return policy, negotiation, logistics, and the verdict. A failing blocker in the
//! safety gate or return policy filter halts the pipeline with a forced `WALK_AWAY`. Every
//! rule evaluated along the way is recorded in the trace together with the compiler, schema,
//! and ruleset versions.

pub mod cache;
pub mod domain;
pub mod hash;
pub mod modules;
mod orchestrator;
pub mod registry;
pub mod router;
pub mod rules;
pub mod service;
pub mod trace;
pub mod validation;

#[cfg(test)]
mod tests;

pub use cache::{CacheError, CacheKey, TraceCache};
pub use domain::{
    ApplianceInfo, ApplianceType, BuyerContext, BuyerInput, DamageInfo, DamageLocation,
    DamageSeverity, DamageTier, DamageType, InspectionResults, InstallationInfo, InstallationType,
    ManufacturerCoverage, PriceFlexibility, PurchasePurpose, RetailerInfo, RetailerType,
    ReturnPolicyInfo, RiskTolerance, VisibleSide, WarrantyInfo,
};
pub use modules::{
    Confidence, DamageAssessment, DeliveryRecommendation, DiscountRating, FinancialAssessment,
    LogisticsPlan, NegotiationAssessment, NegotiationProbability, Recommendation,
    ReturnPolicyAssessment, ReturnRating, RiskLevel, SafetyGateResult, Verdict,
    WarrantyEvaluation, WarrantyScore,
};
pub use orchestrator::{compile, Assessment, CompilerOptions, CompilerOutput};
pub use registry::{COMPILER_VERSION, RULESET_VERSION, SCHEMA_VERSION};
pub use router::evaluation_router;
pub use rules::{ModuleName, ModuleOutput, RuleResult, Severity};
pub use service::{EvaluationRequest, EvaluationService, EvaluationServiceError};
pub use trace::CompilerTrace;
pub use validation::{validate_request, InputError};
