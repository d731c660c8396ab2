use serde::{Deserialize, Serialize};

use crate::compiler::domain::{ApplianceInfo, DamageTier};
use crate::compiler::registry::{
    expected_discount_range, PRICING_DISCOUNT_CALCULATION, PRICING_DISCOUNT_RATING,
    PRICING_TIER_EXPECTATION, THRESHOLDS,
};
use crate::compiler::rules::{ModuleOutput, RuleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountRating {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl DiscountRating {
    pub fn from_percent(discount_percent: f64) -> Self {
        if discount_percent >= THRESHOLDS.discount_excellent_percent {
            DiscountRating::Excellent
        } else if discount_percent >= THRESHOLDS.discount_good_percent {
            DiscountRating::Good
        } else if discount_percent >= THRESHOLDS.discount_fair_percent {
            DiscountRating::Fair
        } else {
            DiscountRating::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DiscountRating::Excellent => "excellent",
            DiscountRating::Good => "good",
            DiscountRating::Fair => "fair",
            DiscountRating::Poor => "poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialAssessment {
    pub retail_price: f64,
    pub asking_price: f64,
    pub discount_percent: f64,
    pub savings_vs_new: f64,
    pub discount_rating: DiscountRating,
    pub expected_discount_range: [f64; 2],
    pub fair_price_estimate: [f64; 2],
    pub meets_tier_expectation: bool,
}

/// Percent off retail rounded to one decimal; zero when retail is not positive.
pub fn discount_percent(retail_price: f64, asking_price: f64) -> f64 {
    if retail_price <= 0.0 {
        return 0.0;
    }
    let raw = (retail_price - asking_price) / retail_price * 100.0;
    (raw * 10.0).round() / 10.0
}

pub fn evaluate(appliance: &ApplianceInfo, tier: DamageTier) -> ModuleOutput<FinancialAssessment> {
    let retail = appliance.retail_price;
    let asking = appliance.asking_price;

    let discount = discount_percent(retail, asking);
    let savings_vs_new = retail - asking;
    let rating = DiscountRating::from_percent(discount);
    let range = expected_discount_range(tier);
    let fair_price_estimate = [
        (retail * (1.0 - range[1] / 100.0)).round(),
        (retail * (1.0 - range[0] / 100.0)).round(),
    ];
    let meets_tier_expectation = discount >= range[0];

    let rules = vec![
        RuleResult::emit(
            &PRICING_DISCOUNT_CALCULATION,
            true,
            format!(
                "Asking ${asking:.0} against retail ${retail:.0} is {discount:.1}% off (saves ${savings_vs_new:.0})"
            ),
            &["appliance.retailPrice", "appliance.askingPrice"],
            &["financial.discountPercent", "financial.savingsVsNew"],
        ),
        RuleResult::emit(
            &PRICING_DISCOUNT_RATING,
            true,
            format!("Discount of {discount:.1}% rates {}", rating.label()),
            &["financial.discountPercent"],
            &["financial.discountRating"],
        ),
        RuleResult::emit(
            &PRICING_TIER_EXPECTATION,
            meets_tier_expectation,
            if meets_tier_expectation {
                format!(
                    "Discount of {discount:.1}% meets the {:.0}-{:.0}% expected for tier {} damage",
                    range[0],
                    range[1],
                    tier.number()
                )
            } else {
                format!(
                    "Discount of {discount:.1}% is below the {:.0}% minimum expected for tier {} damage",
                    range[0],
                    tier.number()
                )
            },
            &["financial.discountPercent", "damageAssessment.tier"],
            &["financial.expectedDiscountRange", "financial.fairPriceEstimate"],
        ),
    ];

    ModuleOutput::new(
        FinancialAssessment {
            retail_price: retail,
            asking_price: asking,
            discount_percent: discount,
            savings_vs_new,
            discount_rating: rating,
            expected_discount_range: range,
            fair_price_estimate,
            meets_tier_expectation,
        },
        rules,
    )
}
