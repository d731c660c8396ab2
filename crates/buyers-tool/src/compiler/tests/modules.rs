use std::collections::BTreeSet;

use super::common::*;
use crate::compiler::domain::{
    ApplianceType, DamageLocation, DamageTier, InstallationType, ManufacturerCoverage,
    RetailerType, VisibleSide,
};
use crate::compiler::modules::safety::INSPECTION_ADVISORY;
use crate::compiler::modules::{
    damage, logistics, negotiation, pricing, returns, safety, warranty, DeliveryRecommendation,
    DiscountRating, NegotiationProbability, ReturnRating, RiskLevel, WarrantyScore,
};
use crate::compiler::Severity;

fn damage_at(locations: &[DamageLocation]) -> crate::compiler::DamageInfo {
    let mut info = baseline_input().damage;
    info.locations = locations.iter().copied().collect();
    info
}

#[test]
fn tier_follows_the_most_visible_location() {
    assert_eq!(
        damage::classify_tier(&damage_at(&[DamageLocation::Back])),
        DamageTier::Hidden
    );
    assert_eq!(
        damage::classify_tier(&damage_at(&[DamageLocation::LeftSide])),
        DamageTier::PartiallyVisible
    );
    assert_eq!(
        damage::classify_tier(&damage_at(&[DamageLocation::Back, DamageLocation::FrontDoor])),
        DamageTier::ProminentlyVisible
    );
    assert_eq!(
        damage::classify_tier(&damage_at(&[DamageLocation::Bottom, DamageLocation::RightSide])),
        DamageTier::PartiallyVisible
    );
}

#[test]
fn empty_damage_list_is_hidden() {
    let output = damage::classify(&damage_at(&[]), &baseline_input().installation);

    assert_eq!(output.result.tier, DamageTier::Hidden);
    assert!(output.result.acceptable_for_installation);
    assert!(output.rules[0].message.contains("no damage locations recorded"));
}

#[test]
fn built_in_installation_hides_side_damage() {
    let mut installation = baseline_input().installation;
    installation.kind = InstallationType::BuiltIn;
    installation.visible_sides = BTreeSet::from([VisibleSide::Front]);

    let output = damage::classify(&damage_at(&[DamageLocation::LeftSide]), &installation);

    assert_eq!(output.result.tier, DamageTier::PartiallyVisible);
    assert!(output.result.exposed_locations.is_empty());
    assert!(output.result.acceptable_for_installation);
    assert!(output.rules.iter().all(|rule| rule.passed));
}

#[test]
fn exposed_front_damage_fails_installation_check() {
    let output = damage::classify(
        &damage_at(&[DamageLocation::FrontDoor]),
        &baseline_input().installation,
    );

    assert_eq!(output.result.exposed_locations, vec![DamageLocation::FrontDoor]);
    assert!(!output.result.acceptable_for_installation);
    let check = &output.rules[1];
    assert_eq!(check.rule_id, "DAMAGE.VISIBILITY.INSTALLATION_CHECK_V1");
    assert_eq!(check.severity, Severity::Warning);
    assert!(!check.passed);
}

#[test]
fn top_damage_facing_an_open_top_stays_acceptable() {
    let mut installation = baseline_input().installation;
    installation.visible_sides.insert(VisibleSide::Top);

    let output = damage::classify(&damage_at(&[DamageLocation::Top]), &installation);

    assert_eq!(output.result.tier, DamageTier::Hidden);
    assert_eq!(output.result.exposed_locations, vec![DamageLocation::Top]);
    assert!(output.result.acceptable_for_installation);
}

#[test]
fn discount_is_rounded_to_one_decimal() {
    assert_eq!(pricing::discount_percent(1000.0, 600.0), 40.0);
    assert_eq!(pricing::discount_percent(999.0, 666.0), 33.3);
    assert_eq!(pricing::discount_percent(0.0, 100.0), 0.0);
    assert_eq!(pricing::discount_percent(500.0, 650.0), -30.0);
}

#[test]
fn pricing_rates_forty_percent_as_excellent() {
    let appliance = baseline_input().appliance;

    let output = pricing::evaluate(&appliance, DamageTier::Hidden);
    let financial = output.result;

    assert_eq!(financial.discount_percent, 40.0);
    assert_eq!(financial.discount_rating, DiscountRating::Excellent);
    assert_eq!(financial.savings_vs_new, 400.0);
    assert_eq!(financial.expected_discount_range, [15.0, 25.0]);
    assert_eq!(financial.fair_price_estimate, [750.0, 850.0]);
    assert!(financial.meets_tier_expectation);
    assert_eq!(output.rules.len(), 3);
    assert!(output.rules.iter().all(|rule| rule.passed));
}

#[test]
fn pricing_flags_discount_below_tier_minimum() {
    let mut appliance = baseline_input().appliance;
    appliance.asking_price = 700.0;

    let output = pricing::evaluate(&appliance, DamageTier::ProminentlyVisible);

    assert_eq!(output.result.discount_rating, DiscountRating::Good);
    assert!(!output.result.meets_tier_expectation);
    let expectation = output
        .rules
        .iter()
        .find(|rule| rule.rule_id == "PRICING.DISCOUNT.TIER_EXPECTATION_V1")
        .expect("tier expectation rule emitted");
    assert!(expectation.is_failed_warning());
    assert!(expectation.message.contains("35%"));
}

#[test]
fn missing_inspection_passes_with_advisory_and_no_rules() {
    let output = safety::inspect(None);

    assert!(output.result.passed);
    assert!(!output.result.inspected);
    assert_eq!(output.result.advisory.as_deref(), Some(INSPECTION_ADVISORY));
    assert!(output.rules.is_empty());
}

#[test]
fn clean_inspection_emits_every_check() {
    let output = safety::inspect(Some(&clean_inspection()));

    assert!(output.result.passed);
    assert_eq!(output.rules.len(), 8);
    assert!(output.rules.iter().all(|rule| rule.passed));
    assert!(output.result.blockers.is_empty());
    assert!(output.result.warnings.is_empty());
}

#[test]
fn condition_findings_warn_without_blocking() {
    let mut inspection = clean_inspection();
    inspection.prior_repairs = true;
    inspection.unusual_sounds = true;

    let output = safety::inspect(Some(&inspection));

    assert!(output.result.passed);
    assert_eq!(output.result.warnings.len(), 2);
    assert_eq!(
        output.rules.iter().filter(|rule| rule.is_failed_warning()).count(),
        2
    );
}

#[test]
fn failed_power_on_is_informational() {
    let mut inspection = clean_inspection();
    inspection.powers_on = false;

    let output = safety::inspect(Some(&inspection));

    assert!(output.result.passed);
    assert_eq!(output.result.warnings.len(), 1);
    let power = output
        .rules
        .iter()
        .find(|rule| rule.rule_id == "SAFETY.FUNCTION.POWER_ON_V1")
        .expect("power check emitted");
    assert_eq!(power.severity, Severity::Info);
    assert!(!power.passed);
}

#[test]
fn warranty_scores_follow_coverage_ladder() {
    let mut info = baseline_input().warranty;
    assert_eq!(warranty::score(&info), WarrantyScore::Excellent);

    info.retailer_warranty_months = 0;
    info.labor_included = false;
    assert_eq!(warranty::score(&info), WarrantyScore::Acceptable);

    info.manufacturer_covered = ManufacturerCoverage::NotCovered;
    info.retailer_warranty_months = 6;
    info.labor_included = true;
    assert_eq!(warranty::score(&info), WarrantyScore::Acceptable);

    info.retailer_warranty_months = 3;
    info.labor_included = false;
    assert_eq!(warranty::score(&info), WarrantyScore::Limited);
    assert_eq!(WarrantyScore::Limited.risk_level(), RiskLevel::Medium);

    info.manufacturer_covered = ManufacturerCoverage::Unknown;
    info.retailer_warranty_months = 0;
    assert_eq!(warranty::score(&info), WarrantyScore::Unacceptable);
}

#[test]
fn short_coverage_without_labor_needs_savings_buffer() {
    let mut info = baseline_input().warranty;
    info.manufacturer_covered = ManufacturerCoverage::Unknown;
    info.retailer_warranty_months = 3;
    info.labor_included = false;

    let thin = warranty::evaluate(&info, 400.0);
    let ids: Vec<&str> = thin.rules.iter().map(|rule| rule.rule_id.as_str()).collect();
    assert_eq!(
        ids,
        vec![
            "WARRANTY.SCORE.ASSESSMENT_V1",
            "WARRANTY.COVERAGE.REPAIR_RISK_V1",
            "WARRANTY.COVERAGE.LABOR_EXCLUDED_V1",
            "WARRANTY.COVERAGE.MANUFACTURER_UNKNOWN_V1",
        ]
    );
    assert!(thin.rules[1].is_failed_warning());
    assert!(thin
        .result
        .coverage_gaps
        .iter()
        .any(|gap| gap.contains("unknown")));

    let cushioned = warranty::evaluate(&info, 900.0);
    assert!(cushioned.rules[1].passed);
}

#[test]
fn return_policy_ratings() {
    let mut policy = baseline_input().return_policy;
    assert_eq!(returns::rate(&policy, true), ReturnRating::Excellent);

    policy.window_days = 14;
    policy.restocking_fee_percent = 20.0;
    assert_eq!(returns::rate(&policy, true), ReturnRating::Acceptable);

    policy.window_days = 10;
    policy.restocking_fee_percent = 10.0;
    assert_eq!(returns::rate(&policy, true), ReturnRating::Acceptable);

    policy.restocking_fee_percent = 20.0;
    assert_eq!(returns::rate(&policy, true), ReturnRating::Risky);

    policy.window_days = 5;
    policy.restocking_fee_percent = 0.0;
    assert_eq!(returns::rate(&policy, true), ReturnRating::Risky);

    policy.final_sale = true;
    assert_eq!(returns::rate(&policy, true), ReturnRating::Risky);
    assert_eq!(returns::rate(&policy, false), ReturnRating::RedFlag);
}

#[test]
fn final_sale_without_warranty_emits_blocker() {
    let input = final_sale_without_warranty();

    let output = returns::evaluate(&input.return_policy, &input.warranty);

    assert_eq!(output.result.rating, ReturnRating::RedFlag);
    assert!(!output.result.has_warranty);
    assert_eq!(output.rules[0].rule_id, "RETURN.POLICY.FINAL_SALE_NO_WARRANTY_V1");
    assert!(output.rules[0].is_failed_blocker());
    assert!(output
        .rules
        .iter()
        .any(|rule| rule.rule_id == "RETURN.WINDOW.SHORT_WINDOW_V1" && !rule.passed));
}

#[test]
fn final_sale_with_warranty_still_reports_short_window() {
    let mut input = baseline_input();
    input.return_policy.final_sale = true;
    input.return_policy.window_days = 3;

    let output = returns::evaluate(&input.return_policy, &input.warranty);

    assert_eq!(output.result.rating, ReturnRating::Risky);
    assert_eq!(output.result.concerns.len(), 2);
    assert!(output.result.concerns[1].contains("3 day(s)"));
    let ids: Vec<&str> = output.rules.iter().map(|rule| rule.rule_id.as_str()).collect();
    assert_eq!(
        ids,
        [
            "RETURN.POLICY.FINAL_SALE_V1",
            "RETURN.WINDOW.SHORT_WINDOW_V1",
            "RETURN.POLICY.RATING_V1",
        ]
    );
    assert!(output.rules[1].is_failed_warning());
}

#[test]
fn short_window_and_fee_are_reported() {
    let mut input = baseline_input();
    input.return_policy.window_days = 3;
    input.return_policy.restocking_fee_percent = 25.0;

    let output = returns::evaluate(&input.return_policy, &input.warranty);

    assert_eq!(output.result.rating, ReturnRating::Risky);
    assert_eq!(output.result.concerns.len(), 2);
    let window = output
        .rules
        .iter()
        .find(|rule| rule.rule_id == "RETURN.WINDOW.SHORT_WINDOW_V1")
        .expect("short window rule");
    assert!(window.is_failed_warning());
    let fee = output
        .rules
        .iter()
        .find(|rule| rule.rule_id == "RETURN.FEE.RESTOCKING_V1")
        .expect("restocking fee rule");
    assert_eq!(fee.severity, Severity::Info);
    assert!(!fee.passed);
}

#[test]
fn negotiation_scores_independent_aged_inventory_as_medium() {
    let input = baseline_input();
    let financial = pricing::evaluate(&input.appliance, DamageTier::Hidden).result;

    let output = negotiation::evaluate(&input, DamageTier::Hidden, &financial);

    assert!(output.result.possible);
    assert_eq!(output.result.probability_score, 3);
    assert_eq!(output.result.probability, NegotiationProbability::Medium);
    assert_eq!(output.result.suggested_target_price, 800.0);
    assert!(output
        .result
        .leverage_points
        .iter()
        .any(|point| point.contains("45 days")));
    assert!(output.rules.iter().all(|rule| rule.passed));
}

#[test]
fn negotiation_stacks_every_leverage_factor() {
    let mut input = three_warning_input(crate::compiler::RiskTolerance::Moderate);
    input.retailer.kind = RetailerType::Liquidation;
    input.retailer.inventory_age_days = Some(90);
    let financial = pricing::evaluate(&input.appliance, DamageTier::ProminentlyVisible).result;

    let score = negotiation::probability_score(&input, DamageTier::ProminentlyVisible, &financial);

    assert_eq!(score, 8);
    assert_eq!(NegotiationProbability::from_score(score), NegotiationProbability::High);
}

#[test]
fn big_box_retailers_do_not_negotiate() {
    let mut input = baseline_input();
    input.retailer.kind = RetailerType::BigBox;
    let financial = pricing::evaluate(&input.appliance, DamageTier::Hidden).result;

    let output = negotiation::evaluate(&input, DamageTier::Hidden, &financial);

    assert!(!output.result.possible);
    assert_eq!(output.result.probability, NegotiationProbability::Unlikely);
}

#[test]
fn logistics_picks_transport_rule_per_appliance() {
    let mut input = baseline_input();

    let fridge = logistics::plan(&input.appliance, &input.installation);
    assert_eq!(fridge.result.delivery, DeliveryRecommendation::Professional);
    assert_eq!(fridge.rules[1].rule_id, "LOGISTICS.TRANSPORT.REFRIGERATOR_V1");

    input.appliance.kind = ApplianceType::Dryer;
    let dryer = logistics::plan(&input.appliance, &input.installation);
    assert_eq!(dryer.result.delivery, DeliveryRecommendation::Either);
    assert_eq!(dryer.rules[1].rule_id, "LOGISTICS.TRANSPORT.GENERAL_V1");

    input.appliance.kind = ApplianceType::Washer;
    input.installation.kind = InstallationType::Stacked;
    let stacked = logistics::plan(&input.appliance, &input.installation);
    assert_eq!(stacked.result.delivery, DeliveryRecommendation::Professional);
    assert_eq!(stacked.rules[1].rule_id, "LOGISTICS.TRANSPORT.WASHER_V1");
    assert!(stacked
        .result
        .installation_notes
        .iter()
        .any(|note| note.contains("stacking kit")));
}
