//! Stable catalog of rule identifiers, ruleset thresholds, and pipeline order.
//!
//! Rule IDs follow `{MODULE}.{CATEGORY}.{NAME}_V{n}` and are never reused. A rule whose logic
//! changes is published under a new version suffix; the old entry stays here marked
//! deprecated so historical traces still resolve.

use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{DamageTier, RiskTolerance};
use super::rules::{ModuleName, Severity};

/// Orchestration and output formatting changes.
pub const COMPILER_VERSION: &str = "1.0.0";
/// Input and output shape changes.
pub const SCHEMA_VERSION: &str = "1.0.0";
/// Threshold and business-rule changes.
pub const RULESET_VERSION: &str = "1.0.0";

/// Canonical module execution order.
pub const EXECUTION_ORDER: [ModuleName; 8] = [
    ModuleName::DamageClassifier,
    ModuleName::PricingEngine,
    ModuleName::SafetyGate,
    ModuleName::WarrantyEvaluator,
    ModuleName::ReturnPolicyFilter,
    ModuleName::NegotiationEngine,
    ModuleName::LogisticsSolver,
    ModuleName::VerdictCompiler,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum RuleStatus {
    Active,
    Deprecated {
        #[serde(rename = "supersededBy")]
        superseded_by: &'static str,
    },
}

/// Registry metadata for one rule identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleDef {
    pub id: &'static str,
    pub severity: Severity,
    pub module: ModuleName,
    pub description: &'static str,
    pub status: RuleStatus,
}

const fn active(
    id: &'static str,
    severity: Severity,
    module: ModuleName,
    description: &'static str,
) -> RuleDef {
    RuleDef {
        id,
        severity,
        module,
        description,
        status: RuleStatus::Active,
    }
}

#[cfg(test)]
pub(crate) const fn deprecated(
    id: &'static str,
    severity: Severity,
    module: ModuleName,
    description: &'static str,
    superseded_by: &'static str,
) -> RuleDef {
    RuleDef {
        id,
        severity,
        module,
        description,
        status: RuleStatus::Deprecated { superseded_by },
    }
}

pub const DAMAGE_TIER_CLASSIFICATION: RuleDef = active(
    "DAMAGE.TIER.CLASSIFICATION_V1",
    Severity::Info,
    ModuleName::DamageClassifier,
    "Assigns the damage visibility tier from the recorded locations",
);
pub const DAMAGE_VISIBILITY_INSTALLATION: RuleDef = active(
    "DAMAGE.VISIBILITY.INSTALLATION_CHECK_V1",
    Severity::Warning,
    ModuleName::DamageClassifier,
    "Checks whether visible damage faces an exposed side of the installation",
);

pub const PRICING_DISCOUNT_CALCULATION: RuleDef = active(
    "PRICING.DISCOUNT.CALCULATION_V1",
    Severity::Info,
    ModuleName::PricingEngine,
    "Computes the discount off retail and the savings versus buying new",
);
pub const PRICING_DISCOUNT_RATING: RuleDef = active(
    "PRICING.DISCOUNT.RATING_V1",
    Severity::Info,
    ModuleName::PricingEngine,
    "Rates the discount as excellent, good, fair, or poor",
);
pub const PRICING_TIER_EXPECTATION: RuleDef = active(
    "PRICING.DISCOUNT.TIER_EXPECTATION_V1",
    Severity::Warning,
    ModuleName::PricingEngine,
    "Requires the discount to reach the minimum expected for the damage tier",
);

pub const SAFETY_RUST: RuleDef = active(
    "SAFETY.HAZARD.RUST_V1",
    Severity::Blocker,
    ModuleName::SafetyGate,
    "Rust on the cabinet or internals",
);
pub const SAFETY_WATER_STAINING: RuleDef = active(
    "SAFETY.HAZARD.WATER_STAINING_V1",
    Severity::Blocker,
    ModuleName::SafetyGate,
    "Water staining indicating flood or leak exposure",
);
pub const SAFETY_DAMAGED_CORD: RuleDef = active(
    "SAFETY.HAZARD.DAMAGED_CORD_V1",
    Severity::Blocker,
    ModuleName::SafetyGate,
    "Frayed, cut, or crushed power cord",
);
pub const SAFETY_ODOR: RuleDef = active(
    "SAFETY.HAZARD.ODOR_V1",
    Severity::Blocker,
    ModuleName::SafetyGate,
    "Burning, chemical, or mildew odor",
);
pub const SAFETY_MISSING_PARTS: RuleDef = active(
    "SAFETY.HAZARD.MISSING_PARTS_V1",
    Severity::Blocker,
    ModuleName::SafetyGate,
    "Missing shelves, racks, knobs, or safety components",
);
pub const SAFETY_PRIOR_REPAIRS: RuleDef = active(
    "SAFETY.CONDITION.PRIOR_REPAIRS_V1",
    Severity::Warning,
    ModuleName::SafetyGate,
    "Evidence of prior repairs",
);
pub const SAFETY_UNUSUAL_SOUNDS: RuleDef = active(
    "SAFETY.CONDITION.UNUSUAL_SOUNDS_V1",
    Severity::Warning,
    ModuleName::SafetyGate,
    "Grinding, rattling, or buzzing during operation",
);
pub const SAFETY_POWER_ON: RuleDef = active(
    "SAFETY.FUNCTION.POWER_ON_V1",
    Severity::Info,
    ModuleName::SafetyGate,
    "Unit powers on during inspection",
);

pub const WARRANTY_SCORE: RuleDef = active(
    "WARRANTY.SCORE.ASSESSMENT_V1",
    Severity::Info,
    ModuleName::WarrantyEvaluator,
    "Scores warranty coverage from manufacturer, retailer, and labor terms",
);
pub const WARRANTY_REPAIR_RISK: RuleDef = active(
    "WARRANTY.COVERAGE.REPAIR_RISK_V1",
    Severity::Warning,
    ModuleName::WarrantyEvaluator,
    "Short coverage without labor must be offset by savings of three typical repairs",
);
pub const WARRANTY_LABOR_EXCLUDED: RuleDef = active(
    "WARRANTY.COVERAGE.LABOR_EXCLUDED_V1",
    Severity::Warning,
    ModuleName::WarrantyEvaluator,
    "Warranty does not cover labor",
);
pub const WARRANTY_MANUFACTURER_UNKNOWN: RuleDef = active(
    "WARRANTY.COVERAGE.MANUFACTURER_UNKNOWN_V1",
    Severity::Warning,
    ModuleName::WarrantyEvaluator,
    "Manufacturer warranty status could not be confirmed",
);

pub const RETURN_FINAL_SALE_NO_WARRANTY: RuleDef = active(
    "RETURN.POLICY.FINAL_SALE_NO_WARRANTY_V1",
    Severity::Blocker,
    ModuleName::ReturnPolicyFilter,
    "Final sale with no warranty leaves no recourse",
);
pub const RETURN_FINAL_SALE: RuleDef = active(
    "RETURN.POLICY.FINAL_SALE_V1",
    Severity::Warning,
    ModuleName::ReturnPolicyFilter,
    "Final sale backed only by warranty coverage",
);
pub const RETURN_SHORT_WINDOW: RuleDef = active(
    "RETURN.WINDOW.SHORT_WINDOW_V1",
    Severity::Warning,
    ModuleName::ReturnPolicyFilter,
    "Return window too short to surface hidden defects",
);
pub const RETURN_RESTOCKING_FEE: RuleDef = active(
    "RETURN.FEE.RESTOCKING_V1",
    Severity::Info,
    ModuleName::ReturnPolicyFilter,
    "Restocking fee charged on returns",
);
pub const RETURN_RATING: RuleDef = active(
    "RETURN.POLICY.RATING_V1",
    Severity::Info,
    ModuleName::ReturnPolicyFilter,
    "Overall return policy rating",
);

pub const NEGOTIATION_FEASIBILITY: RuleDef = active(
    "NEGOTIATION.FEASIBILITY.RETAILER_V1",
    Severity::Info,
    ModuleName::NegotiationEngine,
    "Whether the retailer type negotiates on price",
);
pub const NEGOTIATION_PROBABILITY: RuleDef = active(
    "NEGOTIATION.PROBABILITY.SCORE_V1",
    Severity::Info,
    ModuleName::NegotiationEngine,
    "Additive likelihood that a counter-offer succeeds",
);
pub const NEGOTIATION_TARGET_PRICE: RuleDef = active(
    "NEGOTIATION.TARGET.PRICE_V1",
    Severity::Info,
    ModuleName::NegotiationEngine,
    "Suggested target price from the midpoint of the expected discount",
);

pub const LOGISTICS_DELIVERY: RuleDef = active(
    "LOGISTICS.DELIVERY.METHOD_V1",
    Severity::Info,
    ModuleName::LogisticsSolver,
    "Professional versus self delivery recommendation",
);
pub const LOGISTICS_TRANSPORT_REFRIGERATOR: RuleDef = active(
    "LOGISTICS.TRANSPORT.REFRIGERATOR_V1",
    Severity::Info,
    ModuleName::LogisticsSolver,
    "Refrigerator transport requirements",
);
pub const LOGISTICS_TRANSPORT_WASHER: RuleDef = active(
    "LOGISTICS.TRANSPORT.WASHER_V1",
    Severity::Info,
    ModuleName::LogisticsSolver,
    "Washer transport requirements",
);
pub const LOGISTICS_TRANSPORT_RANGE: RuleDef = active(
    "LOGISTICS.TRANSPORT.RANGE_V1",
    Severity::Info,
    ModuleName::LogisticsSolver,
    "Range transport requirements",
);
pub const LOGISTICS_TRANSPORT_GENERAL: RuleDef = active(
    "LOGISTICS.TRANSPORT.GENERAL_V1",
    Severity::Info,
    ModuleName::LogisticsSolver,
    "Transport requirements for dryers, dishwashers, and microwaves",
);
pub const LOGISTICS_INSTALLATION_NOTES: RuleDef = active(
    "LOGISTICS.INSTALLATION.NOTES_V1",
    Severity::Info,
    ModuleName::LogisticsSolver,
    "Installation checklist for the appliance and installation type",
);

pub const VERDICT_RECOMMENDATION: RuleDef = active(
    "VERDICT.AGGREGATE.RECOMMENDATION_V1",
    Severity::Info,
    ModuleName::VerdictCompiler,
    "Aggregates failed blockers and warnings into the final recommendation",
);

/// Every rule ever published, active and deprecated.
pub const ALL_RULES: &[RuleDef] = &[
    DAMAGE_TIER_CLASSIFICATION,
    DAMAGE_VISIBILITY_INSTALLATION,
    PRICING_DISCOUNT_CALCULATION,
    PRICING_DISCOUNT_RATING,
    PRICING_TIER_EXPECTATION,
    SAFETY_RUST,
    SAFETY_WATER_STAINING,
    SAFETY_DAMAGED_CORD,
    SAFETY_ODOR,
    SAFETY_MISSING_PARTS,
    SAFETY_PRIOR_REPAIRS,
    SAFETY_UNUSUAL_SOUNDS,
    SAFETY_POWER_ON,
    WARRANTY_SCORE,
    WARRANTY_REPAIR_RISK,
    WARRANTY_LABOR_EXCLUDED,
    WARRANTY_MANUFACTURER_UNKNOWN,
    RETURN_FINAL_SALE_NO_WARRANTY,
    RETURN_FINAL_SALE,
    RETURN_SHORT_WINDOW,
    RETURN_RESTOCKING_FEE,
    RETURN_RATING,
    NEGOTIATION_FEASIBILITY,
    NEGOTIATION_PROBABILITY,
    NEGOTIATION_TARGET_PRICE,
    LOGISTICS_DELIVERY,
    LOGISTICS_TRANSPORT_REFRIGERATOR,
    LOGISTICS_TRANSPORT_WASHER,
    LOGISTICS_TRANSPORT_RANGE,
    LOGISTICS_TRANSPORT_GENERAL,
    LOGISTICS_INSTALLATION_NOTES,
    VERDICT_RECOMMENDATION,
];

pub fn all_rule_ids() -> Vec<&'static str> {
    ALL_RULES.iter().map(|rule| rule.id).collect()
}

pub fn rule_metadata() -> BTreeMap<&'static str, &'static RuleDef> {
    ALL_RULES.iter().map(|rule| (rule.id, rule)).collect()
}

pub fn lookup(rule_id: &str) -> Option<&'static RuleDef> {
    ALL_RULES.iter().find(|rule| rule.id == rule_id)
}

/// Expected discount range (percent off retail) indexed by tier number minus one.
pub const TIER_DISCOUNT_RANGES: [[f64; 2]; 3] = [[15.0, 25.0], [25.0, 35.0], [35.0, 50.0]];

pub fn expected_discount_range(tier: DamageTier) -> [f64; 2] {
    TIER_DISCOUNT_RANGES[usize::from(tier.number()) - 1]
}

/// Failed-warning count at which the verdict becomes SKIP, indexed by risk tolerance.
pub const RISK_TOLERANCE_SKIP_THRESHOLDS: [u32; 3] = [2, 3, 4];

pub fn skip_threshold(tolerance: RiskTolerance) -> u32 {
    RISK_TOLERANCE_SKIP_THRESHOLDS[tolerance.index()]
}

/// Numeric thresholds owned by the ruleset. Changing any value bumps [`RULESET_VERSION`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RulesetThresholds {
    pub discount_excellent_percent: f64,
    pub discount_good_percent: f64,
    pub discount_fair_percent: f64,
    pub warranty_excellent_months: u32,
    pub warranty_acceptable_months: u32,
    pub warranty_limited_months: u32,
    pub typical_repair_cost: f64,
    pub repair_cost_multiplier: f64,
    pub return_short_window_days: u32,
    pub return_acceptable_window_days: u32,
    pub return_excellent_window_days: u32,
    pub return_max_restocking_fee_percent: f64,
    pub inventory_aged_days: u32,
    pub inventory_stale_days: u32,
    pub negotiation_high_score: u32,
    pub negotiation_medium_score: u32,
    pub negotiation_low_score: u32,
    pub blocker_threshold: u32,
    pub caution_warning_threshold: u32,
}

pub const THRESHOLDS: RulesetThresholds = RulesetThresholds {
    discount_excellent_percent: 40.0,
    discount_good_percent: 30.0,
    discount_fair_percent: 20.0,
    warranty_excellent_months: 12,
    warranty_acceptable_months: 6,
    warranty_limited_months: 3,
    typical_repair_cost: 300.0,
    repair_cost_multiplier: 3.0,
    return_short_window_days: 7,
    return_acceptable_window_days: 14,
    return_excellent_window_days: 30,
    return_max_restocking_fee_percent: 15.0,
    inventory_aged_days: 30,
    inventory_stale_days: 60,
    negotiation_high_score: 5,
    negotiation_medium_score: 3,
    negotiation_low_score: 1,
    blocker_threshold: 1,
    caution_warning_threshold: 1,
};

impl RulesetThresholds {
    /// Savings that offset the risk of paying for repairs out of pocket.
    pub fn repair_savings_floor(&self) -> f64 {
        self.typical_repair_cost * self.repair_cost_multiplier
    }

    pub fn as_map(&self) -> BTreeMap<&'static str, f64> {
        BTreeMap::from([
            ("discountExcellentPercent", self.discount_excellent_percent),
            ("discountGoodPercent", self.discount_good_percent),
            ("discountFairPercent", self.discount_fair_percent),
            ("warrantyExcellentMonths", f64::from(self.warranty_excellent_months)),
            ("warrantyAcceptableMonths", f64::from(self.warranty_acceptable_months)),
            ("warrantyLimitedMonths", f64::from(self.warranty_limited_months)),
            ("typicalRepairCost", self.typical_repair_cost),
            ("repairCostMultiplier", self.repair_cost_multiplier),
            ("returnShortWindowDays", f64::from(self.return_short_window_days)),
            (
                "returnAcceptableWindowDays",
                f64::from(self.return_acceptable_window_days),
            ),
            (
                "returnExcellentWindowDays",
                f64::from(self.return_excellent_window_days),
            ),
            (
                "returnMaxRestockingFeePercent",
                self.return_max_restocking_fee_percent,
            ),
            ("inventoryAgedDays", f64::from(self.inventory_aged_days)),
            ("inventoryStaleDays", f64::from(self.inventory_stale_days)),
            ("negotiationHighScore", f64::from(self.negotiation_high_score)),
            ("negotiationMediumScore", f64::from(self.negotiation_medium_score)),
            ("negotiationLowScore", f64::from(self.negotiation_low_score)),
            ("blockerThreshold", f64::from(self.blocker_threshold)),
            ("cautionWarningThreshold", f64::from(self.caution_warning_threshold)),
        ])
    }
}

/// Read-only snapshot of the registry for audit endpoints and the CLI.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistryCatalog {
    pub compiler_version: &'static str,
    pub schema_version: &'static str,
    pub ruleset_version: &'static str,
    pub execution_order: Vec<ModuleName>,
    pub rules: Vec<RuleDef>,
    pub thresholds: BTreeMap<&'static str, f64>,
    pub tier_discount_ranges: BTreeMap<u8, [f64; 2]>,
    pub risk_tolerance_skip_thresholds: BTreeMap<&'static str, u32>,
}

pub fn catalog() -> RegistryCatalog {
    RegistryCatalog {
        compiler_version: COMPILER_VERSION,
        schema_version: SCHEMA_VERSION,
        ruleset_version: RULESET_VERSION,
        execution_order: EXECUTION_ORDER.to_vec(),
        rules: ALL_RULES.to_vec(),
        thresholds: THRESHOLDS.as_map(),
        tier_discount_ranges: DamageTier::ALL
            .iter()
            .map(|tier| (tier.number(), expected_discount_range(*tier)))
            .collect(),
        risk_tolerance_skip_thresholds: RiskTolerance::ALL
            .iter()
            .map(|tolerance| (tolerance.label(), skip_threshold(*tolerance)))
            .collect(),
    }
}
