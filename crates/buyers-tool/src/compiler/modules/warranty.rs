use serde::{Deserialize, Serialize};

use crate::compiler::domain::{ManufacturerCoverage, WarrantyInfo};
use crate::compiler::registry::{
    THRESHOLDS, WARRANTY_LABOR_EXCLUDED, WARRANTY_MANUFACTURER_UNKNOWN, WARRANTY_REPAIR_RISK,
    WARRANTY_SCORE,
};
use crate::compiler::rules::{ModuleOutput, RuleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarrantyScore {
    Excellent,
    Acceptable,
    Limited,
    Unacceptable,
}

impl WarrantyScore {
    pub const fn risk_level(self) -> RiskLevel {
        match self {
            WarrantyScore::Excellent | WarrantyScore::Acceptable => RiskLevel::Low,
            WarrantyScore::Limited => RiskLevel::Medium,
            WarrantyScore::Unacceptable => RiskLevel::High,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            WarrantyScore::Excellent => "excellent",
            WarrantyScore::Acceptable => "acceptable",
            WarrantyScore::Limited => "limited",
            WarrantyScore::Unacceptable => "unacceptable",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyEvaluation {
    pub score: WarrantyScore,
    pub risk_level: RiskLevel,
    pub coverage_gaps: Vec<String>,
}

impl WarrantyEvaluation {
    pub(crate) fn not_evaluated() -> Self {
        let score = WarrantyScore::Unacceptable;
        Self {
            score,
            risk_level: score.risk_level(),
            coverage_gaps: vec!["Warranty coverage was not evaluated".to_string()],
        }
    }
}

pub fn score(warranty: &WarrantyInfo) -> WarrantyScore {
    let manufacturer = warranty.manufacturer_covered.is_covered();
    let months = warranty.retailer_warranty_months;

    if manufacturer && months >= THRESHOLDS.warranty_excellent_months && warranty.labor_included {
        WarrantyScore::Excellent
    } else if manufacturer
        || (months >= THRESHOLDS.warranty_acceptable_months && warranty.labor_included)
    {
        WarrantyScore::Acceptable
    } else if months >= THRESHOLDS.warranty_limited_months {
        WarrantyScore::Limited
    } else {
        WarrantyScore::Unacceptable
    }
}

fn coverage_gaps(warranty: &WarrantyInfo) -> Vec<String> {
    let mut gaps = Vec::new();
    match warranty.manufacturer_covered {
        ManufacturerCoverage::Unknown => {
            gaps.push("Manufacturer warranty status is unknown".to_string())
        }
        ManufacturerCoverage::NotCovered => {
            gaps.push("No manufacturer warranty coverage".to_string())
        }
        ManufacturerCoverage::Covered => {}
    }

    let months = warranty.retailer_warranty_months;
    if months == 0 {
        gaps.push("No retailer warranty".to_string());
    } else if months < THRESHOLDS.warranty_acceptable_months {
        gaps.push(format!(
            "Retailer warranty of {months} month(s) is shorter than {} months",
            THRESHOLDS.warranty_acceptable_months
        ));
    }

    if !warranty.labor_included {
        gaps.push("Labor is not covered".to_string());
    }
    if !warranty.parts_included {
        gaps.push("Parts are not covered".to_string());
    }
    gaps
}

pub fn evaluate(warranty: &WarrantyInfo, savings_vs_new: f64) -> ModuleOutput<WarrantyEvaluation> {
    let score = score(warranty);
    let risk_level = score.risk_level();
    let mut rules = Vec::new();

    rules.push(RuleResult::emit(
        &WARRANTY_SCORE,
        true,
        format!(
            "Warranty coverage scores {} ({} months retailer, labor {})",
            score.label(),
            warranty.retailer_warranty_months,
            if warranty.labor_included {
                "included"
            } else {
                "excluded"
            }
        ),
        &[
            "warranty.manufacturerCovered",
            "warranty.retailerWarrantyMonths",
            "warranty.laborIncluded",
        ],
        &["warrantyEvaluation.score", "warrantyEvaluation.riskLevel"],
    ));

    if warranty.retailer_warranty_months < THRESHOLDS.warranty_acceptable_months
        && !warranty.labor_included
    {
        let floor = THRESHOLDS.repair_savings_floor();
        let covered = savings_vs_new >= floor;
        rules.push(RuleResult::emit(
            &WARRANTY_REPAIR_RISK,
            covered,
            if covered {
                format!(
                    "Savings of ${savings_vs_new:.0} cover {:.0} typical repairs (${floor:.0}) despite short coverage",
                    THRESHOLDS.repair_cost_multiplier
                )
            } else {
                format!(
                    "Savings of ${savings_vs_new:.0} do not cover {:.0} typical repairs (${floor:.0}) with short coverage and no labor",
                    THRESHOLDS.repair_cost_multiplier
                )
            },
            &[
                "warranty.retailerWarrantyMonths",
                "warranty.laborIncluded",
                "financial.savingsVsNew",
            ],
            &["warrantyEvaluation.riskLevel"],
        ));
    }

    if !warranty.labor_included {
        rules.push(RuleResult::emit(
            &WARRANTY_LABOR_EXCLUDED,
            false,
            "Warranty excludes labor; service calls will be paid out of pocket",
            &["warranty.laborIncluded"],
            &["warrantyEvaluation.coverageGaps"],
        ));
    }

    if warranty.manufacturer_covered == ManufacturerCoverage::Unknown {
        rules.push(RuleResult::emit(
            &WARRANTY_MANUFACTURER_UNKNOWN,
            false,
            "Manufacturer warranty status is unknown; confirm with the manufacturer using the serial number",
            &["warranty.manufacturerCovered"],
            &["warrantyEvaluation.coverageGaps"],
        ));
    }

    ModuleOutput::new(
        WarrantyEvaluation {
            score,
            risk_level,
            coverage_gaps: coverage_gaps(warranty),
        },
        rules,
    )
}
