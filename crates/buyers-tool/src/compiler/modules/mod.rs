pub mod damage;
pub mod logistics;
pub mod negotiation;
pub mod pricing;
pub mod returns;
pub mod safety;
pub mod verdict;
pub mod warranty;

pub use damage::DamageAssessment;
pub use logistics::{DeliveryRecommendation, LogisticsPlan};
pub use negotiation::{NegotiationAssessment, NegotiationProbability};
pub use pricing::{DiscountRating, FinancialAssessment};
pub use returns::{ReturnPolicyAssessment, ReturnRating};
pub use safety::SafetyGateResult;
pub use verdict::{Confidence, Recommendation, Verdict};
pub use warranty::{RiskLevel, WarrantyEvaluation, WarrantyScore};
