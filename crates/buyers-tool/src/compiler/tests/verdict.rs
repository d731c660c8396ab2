use crate::compiler::modules::verdict::{self, decide, VerdictThresholds};
use crate::compiler::registry::{RETURN_SHORT_WINDOW, SAFETY_RUST, WARRANTY_LABOR_EXCLUDED};
use crate::compiler::rules::RuleResult;
use crate::compiler::{Confidence, Recommendation, RiskTolerance};

fn failed_warning(message: &str) -> RuleResult {
    RuleResult::emit(&WARRANTY_LABOR_EXCLUDED, false, message, &[], &[])
}

#[test]
fn thresholds_follow_risk_tolerance() {
    let low = VerdictThresholds::for_tolerance(RiskTolerance::Low);
    let moderate = VerdictThresholds::for_tolerance(RiskTolerance::Moderate);
    let high = VerdictThresholds::for_tolerance(RiskTolerance::High);

    assert_eq!((low.skip, moderate.skip, high.skip), (2, 3, 4));
    assert_eq!(low.blocker, 1);
    assert_eq!(low.caution, 1);
}

#[test]
fn decision_ladder() {
    let thresholds = VerdictThresholds::for_tolerance(RiskTolerance::Moderate);

    assert_eq!(decide(1, 0, thresholds), Recommendation::WalkAway);
    assert_eq!(decide(0, 3, thresholds), Recommendation::Skip);
    assert_eq!(decide(0, 2, thresholds), Recommendation::ProceedWithCaution);
    assert_eq!(decide(0, 0, thresholds), Recommendation::Proceed);
}

#[test]
fn caution_summary_lists_failed_warnings_in_order() {
    let rules = vec![
        failed_warning("Labor is excluded"),
        RuleResult::emit(&RETURN_SHORT_WINDOW, true, "Window is fine", &[], &[]),
        failed_warning("Second concern"),
    ];

    let output = verdict::compile(&rules, RiskTolerance::High);

    assert_eq!(output.result.recommendation, Recommendation::ProceedWithCaution);
    assert_eq!(output.result.confidence, Confidence::Low);
    assert_eq!(
        output.result.summary,
        "Proceed with caution: Labor is excluded; Second concern"
    );
    assert_eq!(output.rules.len(), 1);
    assert_eq!(output.rules[0].rule_id, "VERDICT.AGGREGATE.RECOMMENDATION_V1");
}

#[test]
fn single_warning_yields_medium_confidence() {
    let output = verdict::compile(&[failed_warning("Only one")], RiskTolerance::Moderate);

    assert_eq!(output.result.recommendation, Recommendation::ProceedWithCaution);
    assert_eq!(output.result.confidence, Confidence::Medium);
}

#[test]
fn halted_verdict_is_forced_walk_away() {
    let blocker = RuleResult::emit(&SAFETY_RUST, false, "Rust found", &[], &[]);
    let rules = vec![failed_warning("Labor is excluded"), blocker.clone()];

    let verdict = verdict::halted(&blocker, &rules, RiskTolerance::Low);

    assert_eq!(verdict.recommendation, Recommendation::WalkAway);
    assert_eq!(verdict.confidence, Confidence::High);
    assert!(verdict.forced_by_halt);
    assert_eq!(verdict.failed_blockers, 1);
    assert_eq!(verdict.failed_warnings, 1);
    assert_eq!(verdict.summary, "Walk away: Rust found");
}
