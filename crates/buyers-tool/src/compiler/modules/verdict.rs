use serde::{Deserialize, Serialize};

use crate::compiler::domain::RiskTolerance;
use crate::compiler::registry::{skip_threshold, THRESHOLDS, VERDICT_RECOMMENDATION};
use crate::compiler::rules::{ModuleOutput, RuleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Recommendation {
    WalkAway,
    Skip,
    ProceedWithCaution,
    Proceed,
}

impl Recommendation {
    pub const fn label(self) -> &'static str {
        match self {
            Recommendation::WalkAway => "WALK_AWAY",
            Recommendation::Skip => "SKIP",
            Recommendation::ProceedWithCaution => "PROCEED_WITH_CAUTION",
            Recommendation::Proceed => "PROCEED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Confidence {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Verdict {
    pub recommendation: Recommendation,
    pub confidence: Confidence,
    pub summary: String,
    pub failed_blockers: u32,
    pub failed_warnings: u32,
    pub skip_threshold: u32,
    /// True when the pipeline halted on a blocker before aggregation ran.
    pub forced_by_halt: bool,
}

/// Verdict thresholds after applying the buyer's risk tolerance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictThresholds {
    pub blocker: u32,
    pub skip: u32,
    pub caution: u32,
}

impl VerdictThresholds {
    pub fn for_tolerance(tolerance: RiskTolerance) -> Self {
        Self {
            blocker: THRESHOLDS.blocker_threshold,
            skip: skip_threshold(tolerance),
            caution: THRESHOLDS.caution_warning_threshold,
        }
    }
}

pub fn decide(failed_blockers: u32, failed_warnings: u32, thresholds: VerdictThresholds) -> Recommendation {
    if failed_blockers >= thresholds.blocker {
        Recommendation::WalkAway
    } else if failed_warnings >= thresholds.skip {
        Recommendation::Skip
    } else if failed_warnings >= thresholds.caution {
        Recommendation::ProceedWithCaution
    } else {
        Recommendation::Proceed
    }
}

fn confidence(recommendation: Recommendation, failed_warnings: u32) -> Confidence {
    match recommendation {
        Recommendation::WalkAway | Recommendation::Proceed => Confidence::High,
        Recommendation::Skip | Recommendation::ProceedWithCaution => {
            if failed_warnings == 1 {
                Confidence::Medium
            } else {
                Confidence::Low
            }
        }
    }
}

fn summarize(
    recommendation: Recommendation,
    dominant_blocker: Option<&RuleResult>,
    warnings: &[&RuleResult],
) -> String {
    let joined = warnings
        .iter()
        .map(|rule| rule.message.as_str())
        .collect::<Vec<_>>()
        .join("; ");
    match recommendation {
        Recommendation::WalkAway => match dominant_blocker {
            Some(rule) => format!("Walk away: {}", rule.message),
            None => "Walk away: a blocking issue was found".to_string(),
        },
        Recommendation::Skip => format!("Skip this deal: {joined}"),
        Recommendation::ProceedWithCaution => format!("Proceed with caution: {joined}"),
        Recommendation::Proceed => {
            "Proceed: no blocking issues or warnings were found".to_string()
        }
    }
}

/// Aggregates every rule emitted so far into the final recommendation.
pub fn compile(rules: &[RuleResult], tolerance: RiskTolerance) -> ModuleOutput<Verdict> {
    let blockers: Vec<&RuleResult> = rules.iter().filter(|rule| rule.is_failed_blocker()).collect();
    let warnings: Vec<&RuleResult> = rules.iter().filter(|rule| rule.is_failed_warning()).collect();
    let failed_blockers = blockers.len() as u32;
    let failed_warnings = warnings.len() as u32;

    let thresholds = VerdictThresholds::for_tolerance(tolerance);
    let recommendation = decide(failed_blockers, failed_warnings, thresholds);
    let summary = summarize(recommendation, blockers.first().copied(), &warnings);

    let rule = RuleResult::emit(
        &VERDICT_RECOMMENDATION,
        true,
        format!(
            "{} from {failed_blockers} blocker(s) and {failed_warnings} warning(s) at {} risk tolerance (skip at {})",
            recommendation.label(),
            tolerance.label(),
            thresholds.skip
        ),
        &["buyer.riskTolerance"],
        &["verdict.recommendation", "verdict.confidence"],
    );

    ModuleOutput::new(
        Verdict {
            recommendation,
            confidence: confidence(recommendation, failed_warnings),
            summary,
            failed_blockers,
            failed_warnings,
            skip_threshold: thresholds.skip,
            forced_by_halt: false,
        },
        vec![rule],
    )
}

/// Verdict used when the pipeline halts before aggregation.
pub fn halted(blocker: &RuleResult, rules: &[RuleResult], tolerance: RiskTolerance) -> Verdict {
    let failed_blockers = rules.iter().filter(|rule| rule.is_failed_blocker()).count() as u32;
    let failed_warnings = rules.iter().filter(|rule| rule.is_failed_warning()).count() as u32;

    Verdict {
        recommendation: Recommendation::WalkAway,
        confidence: Confidence::High,
        summary: summarize(Recommendation::WalkAway, Some(blocker), &[]),
        failed_blockers,
        failed_warnings,
        skip_threshold: skip_threshold(tolerance),
        forced_by_halt: true,
    }
}
