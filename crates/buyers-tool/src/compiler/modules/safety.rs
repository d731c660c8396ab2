use serde::{Deserialize, Serialize};

use crate::compiler::domain::InspectionResults;
use crate::compiler::registry::{
    RuleDef, SAFETY_DAMAGED_CORD, SAFETY_MISSING_PARTS, SAFETY_ODOR, SAFETY_POWER_ON,
    SAFETY_PRIOR_REPAIRS, SAFETY_RUST, SAFETY_UNUSUAL_SOUNDS, SAFETY_WATER_STAINING,
};
use crate::compiler::rules::{ModuleOutput, RuleResult, Severity};

pub const INSPECTION_ADVISORY: &str =
    "No inspection results provided; inspect the unit in person for rust, water staining, cord damage, odors, and missing parts before buying";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SafetyGateResult {
    pub passed: bool,
    pub inspected: bool,
    pub blockers: Vec<String>,
    pub warnings: Vec<String>,
    /// Out-of-band guidance; never counted as a rule.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advisory: Option<String>,
}

struct InspectionCheck {
    rule: RuleDef,
    field: &'static str,
    flagged: fn(&InspectionResults) -> bool,
    flagged_message: &'static str,
    clear_message: &'static str,
}

// Blockers first, in evaluation order, then warnings.
const CHECKS: [InspectionCheck; 7] = [
    InspectionCheck {
        rule: SAFETY_RUST,
        field: "inspection.rustPresent",
        flagged: |inspection| inspection.rust_present,
        flagged_message: "Rust found; corrosion spreads and can compromise seals and wiring",
        clear_message: "No rust found",
    },
    InspectionCheck {
        rule: SAFETY_WATER_STAINING,
        field: "inspection.waterStaining",
        flagged: |inspection| inspection.water_staining,
        flagged_message: "Water staining found; the unit may have flood or leak exposure",
        clear_message: "No water staining found",
    },
    InspectionCheck {
        rule: SAFETY_DAMAGED_CORD,
        field: "inspection.cordDamaged",
        flagged: |inspection| inspection.cord_damaged,
        flagged_message: "Power cord is damaged; shock and fire hazard",
        clear_message: "Power cord is intact",
    },
    InspectionCheck {
        rule: SAFETY_ODOR,
        field: "inspection.odorPresent",
        flagged: |inspection| inspection.odor_present,
        flagged_message: "Burning, chemical, or mildew odor detected",
        clear_message: "No unusual odor detected",
    },
    InspectionCheck {
        rule: SAFETY_MISSING_PARTS,
        field: "inspection.missingParts",
        flagged: |inspection| inspection.missing_parts,
        flagged_message: "Parts are missing; replacements may be costly or unavailable",
        clear_message: "No missing parts",
    },
    InspectionCheck {
        rule: SAFETY_PRIOR_REPAIRS,
        field: "inspection.priorRepairs",
        flagged: |inspection| inspection.prior_repairs,
        flagged_message: "Evidence of prior repairs; ask for service records",
        clear_message: "No evidence of prior repairs",
    },
    InspectionCheck {
        rule: SAFETY_UNUSUAL_SOUNDS,
        field: "inspection.unusualSounds",
        flagged: |inspection| inspection.unusual_sounds,
        flagged_message: "Unusual sounds during operation; possible motor or bearing wear",
        clear_message: "Operates without unusual sounds",
    },
];

pub fn inspect(inspection: Option<&InspectionResults>) -> ModuleOutput<SafetyGateResult> {
    let Some(inspection) = inspection else {
        return ModuleOutput::new(
            SafetyGateResult {
                passed: true,
                inspected: false,
                blockers: Vec::new(),
                warnings: Vec::new(),
                advisory: Some(INSPECTION_ADVISORY.to_string()),
            },
            Vec::new(),
        );
    };

    let mut rules = Vec::with_capacity(CHECKS.len() + 1);
    let mut blockers = Vec::new();
    let mut warnings = Vec::new();

    for check in &CHECKS {
        let flagged = (check.flagged)(inspection);
        let message = if flagged {
            check.flagged_message
        } else {
            check.clear_message
        };
        if flagged {
            if check.rule.severity == Severity::Blocker {
                blockers.push(message.to_string());
            } else {
                warnings.push(message.to_string());
            }
        }
        rules.push(RuleResult::emit(
            &check.rule,
            !flagged,
            message,
            &[check.field],
            &["safetyGate.passed"],
        ));
    }

    let power_message = if inspection.powers_on {
        "Unit powers on"
    } else {
        "Unit did not power on during inspection; confirm the outlet and ask for a demonstration"
    };
    if !inspection.powers_on {
        warnings.push(power_message.to_string());
    }
    rules.push(RuleResult::emit(
        &SAFETY_POWER_ON,
        inspection.powers_on,
        power_message,
        &["inspection.powersOn"],
        &["safetyGate.warnings"],
    ));

    ModuleOutput::new(
        SafetyGateResult {
            passed: blockers.is_empty(),
            inspected: true,
            blockers,
            warnings,
            advisory: None,
        },
        rules,
    )
}
