use std::collections::BTreeSet;

use crate::compiler::compile;
use crate::compiler::registry::{
    self, all_rule_ids, catalog, lookup, RuleStatus, ALL_RULES, EXECUTION_ORDER,
};
use crate::compiler::rules::{ModuleName, Severity};
use crate::compiler::{DamageTier, RiskTolerance, RULESET_VERSION};

use super::common::*;

#[test]
fn rule_ids_are_unique() {
    let ids = all_rule_ids();
    let unique: BTreeSet<&str> = ids.iter().copied().collect();
    assert_eq!(ids.len(), unique.len());
}

#[test]
fn rule_ids_follow_naming_convention() {
    for rule in ALL_RULES {
        let segments: Vec<&str> = rule.id.split('.').collect();
        assert_eq!(segments.len(), 3, "{}", rule.id);
        assert_eq!(segments[0], rule.module.rule_prefix(), "{}", rule.id);
        let version = segments[2]
            .rsplit_once("_V")
            .map(|(_, version)| version)
            .unwrap_or_default();
        assert!(
            !version.is_empty() && version.chars().all(|c| c.is_ascii_digit()),
            "{} lacks a version suffix",
            rule.id
        );
    }
}

#[test]
fn published_rules_are_active_or_superseded_by_active_rules() {
    for rule in ALL_RULES {
        if let RuleStatus::Deprecated { superseded_by } = rule.status {
            let next = lookup(superseded_by)
                .unwrap_or_else(|| panic!("{} successor missing", rule.id));
            assert_eq!(next.status, RuleStatus::Active);
            assert_ne!(next.id, rule.id);
        }
    }
}

#[test]
fn deprecated_entry_keeps_its_id_and_names_successor() {
    let retired = registry::deprecated(
        "PRICING.DISCOUNT.RATING_V0",
        Severity::Info,
        ModuleName::PricingEngine,
        "Retired discount rating",
        registry::PRICING_DISCOUNT_RATING.id,
    );

    let value = serde_json::to_value(retired).expect("rule serializes");
    assert_eq!(value["id"], "PRICING.DISCOUNT.RATING_V0");
    assert_eq!(value["status"]["state"], "deprecated");
    assert_eq!(value["status"]["supersededBy"], "PRICING.DISCOUNT.RATING_V1");
    assert!(lookup("PRICING.DISCOUNT.RATING_V0").is_none());
}

#[test]
fn emitted_rules_are_registered_and_active() {
    let inputs = [
        baseline_input(),
        three_warning_input(RiskTolerance::Low),
        final_sale_without_warranty(),
    ];

    for input in inputs {
        let output = compile(&input, &options());
        for rule in &output.trace.rules {
            let definition = lookup(&rule.rule_id)
                .unwrap_or_else(|| panic!("{} is not registered", rule.rule_id));
            assert_eq!(definition.status, RuleStatus::Active);
            assert_eq!(definition.severity, rule.severity);
        }
    }
}

#[test]
fn lookup_tables_match_ruleset() {
    assert_eq!(
        registry::expected_discount_range(DamageTier::PartiallyVisible),
        [25.0, 35.0]
    );
    assert_eq!(registry::skip_threshold(RiskTolerance::High), 4);
    assert_eq!(registry::THRESHOLDS.repair_savings_floor(), 900.0);
}

#[test]
fn catalog_exposes_versions_and_order() {
    let snapshot = catalog();

    assert_eq!(snapshot.ruleset_version, RULESET_VERSION);
    assert_eq!(snapshot.execution_order, EXECUTION_ORDER.to_vec());
    assert_eq!(snapshot.rules.len(), ALL_RULES.len());
    assert_eq!(snapshot.tier_discount_ranges[&3], [35.0, 50.0]);
    assert_eq!(snapshot.risk_tolerance_skip_thresholds["low"], 2);

    let value = serde_json::to_value(&snapshot).expect("catalog serializes");
    assert_eq!(value["rules"][0]["status"]["state"], "active");
    assert_eq!(value["thresholds"]["returnMaxRestockingFeePercent"], 15.0);
}
