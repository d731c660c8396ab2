use std::ops::Range;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::domain::BuyerInput;
use super::hash::input_hash;
use super::modules::{
    damage, logistics, negotiation, pricing, returns, safety, verdict, warranty,
    DamageAssessment, FinancialAssessment, LogisticsPlan, NegotiationAssessment,
    ReturnPolicyAssessment, SafetyGateResult, Verdict, WarrantyEvaluation,
};
use super::registry::{COMPILER_VERSION, RULESET_VERSION, SCHEMA_VERSION};
use super::rules::{ModuleName, ModuleOutput, RuleResult};
use super::trace::CompilerTrace;

/// Caller-supplied options; the timestamp is never generated internally.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOptions {
    pub timestamp: String,
}

impl CompilerOptions {
    pub fn at(timestamp: impl Into<String>) -> Self {
        Self {
            timestamp: timestamp.into(),
        }
    }
}

/// Result slot for a module that may have been skipped by a halt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Assessment<T> {
    Evaluated(T),
    NotEvaluated {
        /// Conservative stand-in so consumers never see an absent field.
        placeholder: T,
        #[serde(rename = "haltedAt")]
        halted_at: ModuleName,
    },
}

impl<T> Assessment<T> {
    pub fn is_evaluated(&self) -> bool {
        matches!(self, Assessment::Evaluated(_))
    }

    /// The evaluated value, or the placeholder when the module never ran.
    pub fn value(&self) -> &T {
        match self {
            Assessment::Evaluated(value) => value,
            Assessment::NotEvaluated { placeholder, .. } => placeholder,
        }
    }

    fn resolve(value: Option<T>, halted_at: ModuleName, placeholder: impl FnOnce() -> T) -> Self {
        match value {
            Some(value) => Assessment::Evaluated(value),
            None => Assessment::NotEvaluated {
                placeholder: placeholder(),
                halted_at,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerOutput {
    pub verdict: Verdict,
    pub financial: FinancialAssessment,
    pub damage_assessment: DamageAssessment,
    pub warranty_evaluation: Assessment<WarrantyEvaluation>,
    pub safety_gate: SafetyGateResult,
    pub negotiation: Assessment<NegotiationAssessment>,
    pub logistics: Assessment<LogisticsPlan>,
    pub return_policy_assessment: Assessment<ReturnPolicyAssessment>,
    #[serde(rename = "_trace")]
    pub trace: CompilerTrace,
}

/// Append-only record of the rules each executed module emitted.
#[derive(Debug, Default)]
struct RuleLedger {
    rules: Vec<RuleResult>,
    spans: Vec<(ModuleName, Range<usize>)>,
}

impl RuleLedger {
    fn record<T>(&mut self, module: ModuleName, output: ModuleOutput<T>) -> T {
        let start = self.rules.len();
        self.rules.extend(output.rules);
        debug!(
            module = module.label(),
            rules = self.rules.len() - start,
            "module evaluated"
        );
        self.spans.push((module, start..self.rules.len()));
        output.result
    }

    fn rules(&self) -> &[RuleResult] {
        &self.rules
    }

    /// First failing blocker emitted by `module`, if any.
    fn halting_blocker(&self, module: ModuleName) -> Option<&RuleResult> {
        self.spans
            .iter()
            .find(|(name, _)| *name == module)
            .and_then(|(_, span)| {
                self.rules[span.clone()]
                    .iter()
                    .find(|rule| rule.is_failed_blocker())
            })
    }

    fn into_trace(
        self,
        halt: Option<(ModuleName, String)>,
        options: &CompilerOptions,
        input_hash: String,
    ) -> CompilerTrace {
        let (halted_at_module, halted_by_rule_id) = match halt {
            Some((module, rule_id)) => (Some(module), Some(rule_id)),
            None => (None, None),
        };
        CompilerTrace {
            execution_order: self.spans.iter().map(|(module, _)| *module).collect(),
            rules: self.rules,
            halted_at_module,
            halted_by_rule_id,
            compiler_version: COMPILER_VERSION.to_string(),
            schema_version: SCHEMA_VERSION.to_string(),
            ruleset_version: RULESET_VERSION.to_string(),
            timestamp: options.timestamp.clone(),
            input_hash,
        }
    }
}

/// Outputs of the modules that always run, plus whatever ran before a halt.
struct Draft {
    damage: DamageAssessment,
    financial: FinancialAssessment,
    safety_gate: SafetyGateResult,
    warranty: Option<WarrantyEvaluation>,
    return_policy: Option<ReturnPolicyAssessment>,
}

impl Draft {
    fn halt(
        self,
        module: ModuleName,
        blocker: RuleResult,
        ledger: RuleLedger,
        input: &BuyerInput,
        options: &CompilerOptions,
        input_hash: String,
    ) -> CompilerOutput {
        info!(
            %input_hash,
            module = module.label(),
            rule_id = %blocker.rule_id,
            "pipeline halted on blocker"
        );

        let verdict = verdict::halted(&blocker, ledger.rules(), input.buyer.risk_tolerance);
        let trace = ledger.into_trace(Some((module, blocker.rule_id)), options, input_hash);

        CompilerOutput {
            verdict,
            financial: self.financial,
            damage_assessment: self.damage,
            warranty_evaluation: Assessment::resolve(
                self.warranty,
                module,
                WarrantyEvaluation::not_evaluated,
            ),
            safety_gate: self.safety_gate,
            negotiation: Assessment::NotEvaluated {
                placeholder: NegotiationAssessment::not_evaluated(input.appliance.asking_price),
                halted_at: module,
            },
            logistics: Assessment::NotEvaluated {
                placeholder: LogisticsPlan::not_evaluated(),
                halted_at: module,
            },
            return_policy_assessment: Assessment::resolve(
                self.return_policy,
                module,
                ReturnPolicyAssessment::not_evaluated,
            ),
            trace,
        }
    }
}

/// Runs the full pipeline for one input. Identical arguments always yield identical output.
pub fn compile(input: &BuyerInput, options: &CompilerOptions) -> CompilerOutput {
    let input_hash = input_hash(input);
    debug!(%input_hash, timestamp = %options.timestamp, "compiling buyer input");

    let mut ledger = RuleLedger::default();

    let damage = ledger.record(
        ModuleName::DamageClassifier,
        damage::classify(&input.damage, &input.installation),
    );
    let financial = ledger.record(
        ModuleName::PricingEngine,
        pricing::evaluate(&input.appliance, damage.tier),
    );
    let safety_gate = ledger.record(
        ModuleName::SafetyGate,
        safety::inspect(input.inspection.as_ref()),
    );

    if let Some(blocker) = ledger.halting_blocker(ModuleName::SafetyGate).cloned() {
        let draft = Draft {
            damage,
            financial,
            safety_gate,
            warranty: None,
            return_policy: None,
        };
        return draft.halt(
            ModuleName::SafetyGate,
            blocker,
            ledger,
            input,
            options,
            input_hash,
        );
    }

    let warranty = ledger.record(
        ModuleName::WarrantyEvaluator,
        warranty::evaluate(&input.warranty, financial.savings_vs_new),
    );
    let return_policy = ledger.record(
        ModuleName::ReturnPolicyFilter,
        returns::evaluate(&input.return_policy, &input.warranty),
    );

    if let Some(blocker) = ledger.halting_blocker(ModuleName::ReturnPolicyFilter).cloned() {
        let draft = Draft {
            damage,
            financial,
            safety_gate,
            warranty: Some(warranty),
            return_policy: Some(return_policy),
        };
        return draft.halt(
            ModuleName::ReturnPolicyFilter,
            blocker,
            ledger,
            input,
            options,
            input_hash,
        );
    }

    let negotiation = ledger.record(
        ModuleName::NegotiationEngine,
        negotiation::evaluate(input, damage.tier, &financial),
    );
    let logistics = ledger.record(
        ModuleName::LogisticsSolver,
        logistics::plan(&input.appliance, &input.installation),
    );
    let verdict_output = verdict::compile(ledger.rules(), input.buyer.risk_tolerance);
    let verdict = ledger.record(ModuleName::VerdictCompiler, verdict_output);

    debug!(
        %input_hash,
        recommendation = verdict.recommendation.label(),
        "pipeline completed"
    );

    CompilerOutput {
        verdict,
        financial,
        damage_assessment: damage,
        warranty_evaluation: Assessment::Evaluated(warranty),
        safety_gate,
        negotiation: Assessment::Evaluated(negotiation),
        logistics: Assessment::Evaluated(logistics),
        return_policy_assessment: Assessment::Evaluated(return_policy),
        trace: ledger.into_trace(None, options, input_hash),
    }
}
