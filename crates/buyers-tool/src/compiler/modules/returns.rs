use serde::{Deserialize, Serialize};

use crate::compiler::domain::{ReturnPolicyInfo, WarrantyInfo};
use crate::compiler::registry::{
    RETURN_FINAL_SALE, RETURN_FINAL_SALE_NO_WARRANTY, RETURN_RATING, RETURN_RESTOCKING_FEE,
    RETURN_SHORT_WINDOW, THRESHOLDS,
};
use crate::compiler::rules::{ModuleOutput, RuleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReturnRating {
    Excellent,
    Acceptable,
    Risky,
    RedFlag,
}

impl ReturnRating {
    pub const fn label(self) -> &'static str {
        match self {
            ReturnRating::Excellent => "excellent",
            ReturnRating::Acceptable => "acceptable",
            ReturnRating::Risky => "risky",
            ReturnRating::RedFlag => "red_flag",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnPolicyAssessment {
    pub rating: ReturnRating,
    pub has_warranty: bool,
    pub concerns: Vec<String>,
}

impl ReturnPolicyAssessment {
    pub(crate) fn not_evaluated() -> Self {
        Self {
            rating: ReturnRating::RedFlag,
            has_warranty: false,
            concerns: vec!["Return policy was not evaluated".to_string()],
        }
    }
}

pub fn has_warranty(warranty: &WarrantyInfo) -> bool {
    warranty.retailer_warranty_months > 0 || warranty.manufacturer_covered.is_covered()
}

pub fn rate(policy: &ReturnPolicyInfo, has_warranty: bool) -> ReturnRating {
    let window = policy.window_days;
    let fee = policy.restocking_fee_percent;

    if policy.final_sale && !has_warranty {
        ReturnRating::RedFlag
    } else if policy.final_sale || window < THRESHOLDS.return_short_window_days {
        ReturnRating::Risky
    } else if window >= THRESHOLDS.return_excellent_window_days && fee == 0.0 {
        ReturnRating::Excellent
    } else if window >= THRESHOLDS.return_acceptable_window_days
        || (window >= THRESHOLDS.return_short_window_days
            && fee <= THRESHOLDS.return_max_restocking_fee_percent)
    {
        ReturnRating::Acceptable
    } else {
        ReturnRating::Risky
    }
}

pub fn evaluate(
    policy: &ReturnPolicyInfo,
    warranty: &WarrantyInfo,
) -> ModuleOutput<ReturnPolicyAssessment> {
    let has_warranty = has_warranty(warranty);
    let rating = rate(policy, has_warranty);
    let short_window = policy.window_days < THRESHOLDS.return_short_window_days;
    let fee = policy.restocking_fee_percent;

    let mut concerns = Vec::new();
    if policy.final_sale {
        concerns.push("Final sale; returns are not accepted".to_string());
    }
    if short_window {
        concerns.push(format!(
            "Return window of {} day(s) is shorter than {} days",
            policy.window_days, THRESHOLDS.return_short_window_days
        ));
    }
    if fee > 0.0 {
        concerns.push(format!("Restocking fee of {fee:.0}% applies to returns"));
    }

    let mut rules = Vec::new();
    if rating == ReturnRating::RedFlag {
        rules.push(RuleResult::emit(
            &RETURN_FINAL_SALE_NO_WARRANTY,
            false,
            "Final sale with no warranty; any defect after purchase is entirely your cost",
            &[
                "returnPolicy.finalSale",
                "warranty.retailerWarrantyMonths",
                "warranty.manufacturerCovered",
            ],
            &["returnPolicyAssessment.rating"],
        ));
    } else if policy.final_sale {
        rules.push(RuleResult::emit(
            &RETURN_FINAL_SALE,
            false,
            "Final sale; only the warranty protects against defects",
            &["returnPolicy.finalSale", "warranty.retailerWarrantyMonths"],
            &["returnPolicyAssessment.rating"],
        ));
    }

    if short_window {
        rules.push(RuleResult::emit(
            &RETURN_SHORT_WINDOW,
            false,
            format!(
                "Return window of {} day(s) leaves little time to find hidden defects",
                policy.window_days
            ),
            &["returnPolicy.windowDays"],
            &["returnPolicyAssessment.rating"],
        ));
    }

    if fee > 0.0 {
        rules.push(RuleResult::emit(
            &RETURN_RESTOCKING_FEE,
            fee <= THRESHOLDS.return_max_restocking_fee_percent,
            format!("Restocking fee of {fee:.0}% is charged on returns"),
            &["returnPolicy.restockingFeePercent"],
            &["returnPolicyAssessment.concerns"],
        ));
    }

    rules.push(RuleResult::emit(
        &RETURN_RATING,
        matches!(rating, ReturnRating::Excellent | ReturnRating::Acceptable),
        format!("Return policy rates {}", rating.label()),
        &[
            "returnPolicy.windowDays",
            "returnPolicy.restockingFeePercent",
            "returnPolicy.finalSale",
        ],
        &["returnPolicyAssessment.rating"],
    ));

    ModuleOutput::new(
        ReturnPolicyAssessment {
            rating,
            has_warranty,
            concerns,
        },
        rules,
    )
}
