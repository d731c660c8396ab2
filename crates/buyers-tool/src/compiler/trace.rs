use std::collections::BTreeMap;
use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::rules::{ModuleName, RuleResult, Severity};

/// Ordered audit record of one compile call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompilerTrace {
    pub rules: Vec<RuleResult>,
    pub execution_order: Vec<ModuleName>,
    pub halted_at_module: Option<ModuleName>,
    pub halted_by_rule_id: Option<String>,
    pub compiler_version: String,
    pub schema_version: String,
    pub ruleset_version: String,
    pub timestamp: String,
    pub input_hash: String,
}

impl CompilerTrace {
    pub fn halted(&self) -> bool {
        self.halted_at_module.is_some()
    }

    /// Failed blocker and warning rules, in execution order.
    pub fn failed_rules(&self) -> Vec<&RuleResult> {
        self.rules
            .iter()
            .filter(|rule| !rule.passed && rule.severity != Severity::Info)
            .collect()
    }

    /// Rules grouped by the first dot-segment of their ID.
    pub fn rules_by_module(&self) -> BTreeMap<&str, Vec<&RuleResult>> {
        let mut groups: BTreeMap<&str, Vec<&RuleResult>> = BTreeMap::new();
        for rule in &self.rules {
            groups.entry(rule.module_prefix()).or_default().push(rule);
        }
        groups
    }

    /// Single-line form for log aggregation.
    pub fn compact_summary(&self) -> String {
        let failed = self.failed_rules();
        let halted = match (&self.halted_at_module, &self.halted_by_rule_id) {
            (Some(module), Some(rule_id)) => format!("{}:{rule_id}", module.label()),
            (Some(module), None) => module.label().to_string(),
            _ => "none".to_string(),
        };
        format!(
            "hash={} compiler={} schema={} ruleset={} modules={} rules={} failed={} halted={} at={}",
            self.input_hash,
            self.compiler_version,
            self.schema_version,
            self.ruleset_version,
            self.execution_order.len(),
            self.rules.len(),
            failed.len(),
            halted,
            self.timestamp
        )
    }

    /// Multi-line form for display.
    pub fn summary(&self) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Compiler trace {}", self.input_hash);
        let _ = writeln!(
            out,
            "  versions: compiler {} / schema {} / ruleset {}",
            self.compiler_version, self.schema_version, self.ruleset_version
        );
        let _ = writeln!(out, "  timestamp: {}", self.timestamp);
        let order = self
            .execution_order
            .iter()
            .map(|module| module.label())
            .collect::<Vec<_>>()
            .join(" -> ");
        let _ = writeln!(out, "  executed: {order}");
        if let Some(module) = &self.halted_at_module {
            let _ = writeln!(
                out,
                "  halted at {} by {}",
                module.label(),
                self.halted_by_rule_id.as_deref().unwrap_or("unknown rule")
            );
        }

        for (module, rules) in self.rules_by_module_in_order() {
            let _ = writeln!(out, "  [{module}]");
            for rule in rules {
                let mark = if rule.passed { "PASS" } else { "FAIL" };
                let _ = writeln!(
                    out,
                    "    {mark} {:<7} {} - {}",
                    rule.severity.label(),
                    rule.rule_id,
                    rule.message
                );
            }
        }

        let failed = self.failed_rules();
        let _ = write!(
            out,
            "  {} rule(s) evaluated, {} failed",
            self.rules.len(),
            failed.len()
        );
        out
    }

    fn rules_by_module_in_order(&self) -> Vec<(&str, Vec<&RuleResult>)> {
        let mut groups: Vec<(&str, Vec<&RuleResult>)> = Vec::new();
        for rule in &self.rules {
            let prefix = rule.module_prefix();
            match groups.last_mut() {
                Some((current, rules)) if *current == prefix => rules.push(rule),
                _ => groups.push((prefix, vec![rule])),
            }
        }
        groups
    }
}
