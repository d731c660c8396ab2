use serde::{Deserialize, Serialize};

use super::registry::RuleDef;

/// How much weight a failed rule carries in the final verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Blocker,
    Warning,
    Info,
}

impl Severity {
    pub const fn label(self) -> &'static str {
        match self {
            Severity::Blocker => "blocker",
            Severity::Warning => "warning",
            Severity::Info => "info",
        }
    }
}

/// Pipeline stages in canonical execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ModuleName {
    DamageClassifier,
    PricingEngine,
    SafetyGate,
    WarrantyEvaluator,
    ReturnPolicyFilter,
    NegotiationEngine,
    LogisticsSolver,
    VerdictCompiler,
}

impl ModuleName {
    pub const fn label(self) -> &'static str {
        match self {
            ModuleName::DamageClassifier => "DamageClassifier",
            ModuleName::PricingEngine => "PricingEngine",
            ModuleName::SafetyGate => "SafetyGate",
            ModuleName::WarrantyEvaluator => "WarrantyEvaluator",
            ModuleName::ReturnPolicyFilter => "ReturnPolicyFilter",
            ModuleName::NegotiationEngine => "NegotiationEngine",
            ModuleName::LogisticsSolver => "LogisticsSolver",
            ModuleName::VerdictCompiler => "VerdictCompiler",
        }
    }

    /// First dot-segment of every rule ID owned by the module.
    pub const fn rule_prefix(self) -> &'static str {
        match self {
            ModuleName::DamageClassifier => "DAMAGE",
            ModuleName::PricingEngine => "PRICING",
            ModuleName::SafetyGate => "SAFETY",
            ModuleName::WarrantyEvaluator => "WARRANTY",
            ModuleName::ReturnPolicyFilter => "RETURN",
            ModuleName::NegotiationEngine => "NEGOTIATION",
            ModuleName::LogisticsSolver => "LOGISTICS",
            ModuleName::VerdictCompiler => "VERDICT",
        }
    }
}

/// A single evaluated rule. Immutable once emitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleResult {
    pub rule_id: String,
    pub severity: Severity,
    pub passed: bool,
    pub message: String,
    pub inputs_used: Vec<String>,
    pub outputs_affected: Vec<String>,
}

impl RuleResult {
    pub(crate) fn emit(
        rule: &RuleDef,
        passed: bool,
        message: impl Into<String>,
        inputs_used: &[&str],
        outputs_affected: &[&str],
    ) -> Self {
        Self {
            rule_id: rule.id.to_string(),
            severity: rule.severity,
            passed,
            message: message.into(),
            inputs_used: inputs_used.iter().map(|field| field.to_string()).collect(),
            outputs_affected: outputs_affected.iter().map(|field| field.to_string()).collect(),
        }
    }

    pub fn is_failed_blocker(&self) -> bool {
        self.severity == Severity::Blocker && !self.passed
    }

    pub fn is_failed_warning(&self) -> bool {
        self.severity == Severity::Warning && !self.passed
    }

    /// Owning module prefix taken from the first dot-segment of the rule ID.
    pub fn module_prefix(&self) -> &str {
        self.rule_id.split('.').next().unwrap_or_default()
    }
}

/// Unit every pipeline module returns.
#[derive(Debug, Clone, PartialEq)]
pub struct ModuleOutput<T> {
    pub result: T,
    pub rules: Vec<RuleResult>,
}

impl<T> ModuleOutput<T> {
    pub fn new(result: T, rules: Vec<RuleResult>) -> Self {
        Self { result, rules }
    }
}
