use serde::{Deserialize, Serialize};

use crate::compiler::domain::{BuyerInput, DamageTier, PriceFlexibility, RetailerType};
use crate::compiler::registry::{
    NEGOTIATION_FEASIBILITY, NEGOTIATION_PROBABILITY, NEGOTIATION_TARGET_PRICE, THRESHOLDS,
};
use crate::compiler::rules::{ModuleOutput, RuleResult};

use super::pricing::FinancialAssessment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NegotiationProbability {
    High,
    Medium,
    Low,
    Unlikely,
}

impl NegotiationProbability {
    pub fn from_score(score: u32) -> Self {
        if score >= THRESHOLDS.negotiation_high_score {
            NegotiationProbability::High
        } else if score >= THRESHOLDS.negotiation_medium_score {
            NegotiationProbability::Medium
        } else if score >= THRESHOLDS.negotiation_low_score {
            NegotiationProbability::Low
        } else {
            NegotiationProbability::Unlikely
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            NegotiationProbability::High => "high",
            NegotiationProbability::Medium => "medium",
            NegotiationProbability::Low => "low",
            NegotiationProbability::Unlikely => "unlikely",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NegotiationAssessment {
    pub possible: bool,
    pub probability: NegotiationProbability,
    pub probability_score: u32,
    pub suggested_target_price: f64,
    pub leverage_points: Vec<String>,
    pub alternative_asks: Vec<String>,
}

impl NegotiationAssessment {
    pub(crate) fn not_evaluated(asking_price: f64) -> Self {
        Self {
            possible: false,
            probability: NegotiationProbability::Unlikely,
            probability_score: 0,
            suggested_target_price: asking_price,
            leverage_points: Vec::new(),
            alternative_asks: Vec::new(),
        }
    }
}

/// Additive likelihood score; each factor is independent.
pub fn probability_score(input: &BuyerInput, tier: DamageTier, financial: &FinancialAssessment) -> u32 {
    let mut score = 0;

    score += match input.retailer.kind {
        RetailerType::Independent | RetailerType::Liquidation => 2,
        RetailerType::Outlet => 1,
        RetailerType::BigBox => 0,
    };

    score += match input.retailer.inventory_age_days {
        Some(days) if days > THRESHOLDS.inventory_stale_days => 2,
        Some(days) if days > THRESHOLDS.inventory_aged_days => 1,
        _ => 0,
    };

    score += match tier {
        DamageTier::ProminentlyVisible => 2,
        DamageTier::PartiallyVisible => 1,
        DamageTier::Hidden => 0,
    };

    if !financial.meets_tier_expectation {
        score += 2;
    }

    score
}

fn leverage_points(input: &BuyerInput, tier: DamageTier, financial: &FinancialAssessment) -> Vec<String> {
    let mut points = Vec::new();

    if let Some(days) = input.retailer.inventory_age_days {
        if days > THRESHOLDS.inventory_aged_days {
            points.push(format!(
                "Unit has been in inventory for {days} days; the retailer wants it off the floor"
            ));
        }
    }

    if tier != DamageTier::Hidden {
        let types = input
            .damage
            .types
            .iter()
            .map(|kind| kind.label())
            .collect::<Vec<_>>();
        if types.is_empty() {
            points.push(format!("Damage is {} once installed", tier.label().to_lowercase()));
        } else {
            points.push(format!(
                "Damage ({}) is {} once installed",
                types.join(", "),
                tier.label().to_lowercase()
            ));
        }
    }

    if !financial.meets_tier_expectation {
        points.push(format!(
            "Current discount of {:.1}% is below the {:.0}% typical for this damage",
            financial.discount_percent, financial.expected_discount_range[0]
        ));
    }

    if !input.warranty.labor_included {
        points.push("Warranty excludes labor, shifting repair risk to you".to_string());
    }

    points
}

fn alternative_asks(input: &BuyerInput) -> Vec<String> {
    let mut asks = vec![
        "Free delivery and installation".to_string(),
        "Haul-away of your old appliance at no charge".to_string(),
    ];
    if input.warranty.extended_available {
        asks.push("Extended warranty included at no cost".to_string());
    }
    if !input.warranty.labor_included {
        asks.push("Written labor coverage for the first year".to_string());
    }
    if input.buyer.price_flexibility == PriceFlexibility::Firm {
        asks.push("Hold at your target price and be prepared to walk away".to_string());
    }
    asks
}

pub fn evaluate(
    input: &BuyerInput,
    tier: DamageTier,
    financial: &FinancialAssessment,
) -> ModuleOutput<NegotiationAssessment> {
    let possible = input.retailer.kind != RetailerType::BigBox;
    let score = probability_score(input, tier, financial);
    let probability = if possible {
        NegotiationProbability::from_score(score)
    } else {
        NegotiationProbability::Unlikely
    };

    let range = financial.expected_discount_range;
    let midpoint = (range[0] + range[1]) / 2.0;
    let suggested_target_price = (input.appliance.retail_price * (1.0 - midpoint / 100.0)).round();

    let rules = vec![
        RuleResult::emit(
            &NEGOTIATION_FEASIBILITY,
            true,
            if possible {
                format!(
                    "{} retailers usually have room to negotiate",
                    input.retailer.kind.label()
                )
            } else {
                "Big-box retailers rarely negotiate floor-model pricing".to_string()
            },
            &["retailer.type"],
            &["negotiation.possible"],
        ),
        RuleResult::emit(
            &NEGOTIATION_PROBABILITY,
            true,
            format!(
                "Negotiation score {score} gives {} odds of a lower price",
                probability.label()
            ),
            &[
                "retailer.type",
                "retailer.inventoryAgeDays",
                "damageAssessment.tier",
                "financial.discountPercent",
            ],
            &["negotiation.probability"],
        ),
        RuleResult::emit(
            &NEGOTIATION_TARGET_PRICE,
            true,
            format!(
                "Target ${suggested_target_price:.0}, the midpoint of the {:.0}-{:.0}% expected discount",
                range[0], range[1]
            ),
            &["appliance.retailPrice", "financial.expectedDiscountRange"],
            &["negotiation.suggestedTargetPrice"],
        ),
    ];

    ModuleOutput::new(
        NegotiationAssessment {
            possible,
            probability,
            probability_score: score,
            suggested_target_price,
            leverage_points: leverage_points(input, tier, financial),
            alternative_asks: alternative_asks(input),
        },
        rules,
    )
}
