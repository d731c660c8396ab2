use crate::infra::parse_timestamp;
use buyers_tool::compiler::registry::catalog;
use buyers_tool::compiler::{
    compile, validate_request, ApplianceInfo, ApplianceType, Assessment, BuyerContext,
    BuyerInput, CompilerOptions, CompilerOutput, DamageInfo, DamageLocation, DamageSeverity,
    DamageType, InspectionResults, InstallationInfo, InstallationType, ManufacturerCoverage,
    PriceFlexibility, PurchasePurpose, RetailerInfo, RetailerType, ReturnPolicyInfo,
    RiskTolerance, VisibleSide, WarrantyInfo,
};
use buyers_tool::error::AppError;
use chrono::{SecondsFormat, Utc};
use clap::Args;
use std::collections::BTreeSet;
use std::fmt::Write as _;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EvaluateArgs {
    /// Path to a JSON buyer input file
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Compile timestamp recorded in the trace (RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) timestamp: Option<String>,
    /// Print the full compiler output as JSON instead of the readable report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RulesArgs {
    /// Print the registry catalog as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Compile timestamp recorded in every trace (RFC 3339). Defaults to now.
    #[arg(long, value_parser = parse_timestamp)]
    pub(crate) timestamp: Option<String>,
    /// Include the rule-by-rule trace for each scenario
    #[arg(long)]
    pub(crate) trace: bool,
}

pub(crate) struct Scenario {
    pub(crate) name: &'static str,
    pub(crate) input: BuyerInput,
}

fn now_rfc3339() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn run_evaluate(args: EvaluateArgs) -> Result<(), AppError> {
    let EvaluateArgs {
        input,
        timestamp,
        json,
    } = args;

    let raw = std::fs::read_to_string(&input)?;
    let input: BuyerInput = serde_json::from_str(&raw)?;
    let options = CompilerOptions::at(timestamp.unwrap_or_else(now_rfc3339));
    validate_request(&input, &options)?;

    let output = compile(&input, &options);
    if json {
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        print!("{}", render_report(&output));
        println!("{}", output.trace.summary());
    }
    Ok(())
}

pub(crate) fn run_rules(args: RulesArgs) -> Result<(), AppError> {
    let snapshot = catalog();
    if args.json {
        println!("{}", serde_json::to_string_pretty(&snapshot)?);
        return Ok(());
    }

    println!(
        "Rule registry (compiler {} / schema {} / ruleset {})",
        snapshot.compiler_version, snapshot.schema_version, snapshot.ruleset_version
    );
    for module in &snapshot.execution_order {
        println!("{}", module.label());
        for rule in snapshot.rules.iter().filter(|rule| rule.module == *module) {
            let status = match rule.status {
                buyers_tool::compiler::registry::RuleStatus::Active => String::new(),
                buyers_tool::compiler::registry::RuleStatus::Deprecated { superseded_by } => {
                    format!(" (deprecated, see {superseded_by})")
                }
            };
            println!(
                "  {:<7} {}{} - {}",
                rule.severity.label(),
                rule.id,
                status,
                rule.description
            );
        }
    }
    println!("Thresholds:");
    for (name, value) in &snapshot.thresholds {
        println!("  {name}: {value}");
    }
    Ok(())
}

pub(crate) fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { timestamp, trace } = args;
    let options = CompilerOptions::at(timestamp.unwrap_or_else(now_rfc3339));

    println!("Scratch-and-dent buyer's tool demo");
    for scenario in scenarios() {
        validate_request(&scenario.input, &options)?;
        let output = compile(&scenario.input, &options);
        println!("\n== {} ==", scenario.name);
        print!("{}", render_report(&output));
        if trace {
            println!("{}", output.trace.summary());
        } else {
            println!("  {}", output.trace.compact_summary());
        }
    }
    Ok(())
}

/// Buyer-facing summary of one compile. Skipped modules are reported as such.
pub(crate) fn render_report(output: &CompilerOutput) -> String {
    let mut out = String::new();
    let verdict = &output.verdict;
    let _ = writeln!(
        out,
        "Recommendation: {} ({:?} confidence)",
        verdict.recommendation.label(),
        verdict.confidence
    );
    let _ = writeln!(out, "  {}", verdict.summary);

    let financial = &output.financial;
    let _ = writeln!(
        out,
        "Price: ${:.0} asking vs ${:.0} retail, {:.1}% off ({}), fair range ${:.0}-${:.0}",
        financial.asking_price,
        financial.retail_price,
        financial.discount_percent,
        financial.discount_rating.label(),
        financial.fair_price_estimate[0],
        financial.fair_price_estimate[1]
    );
    let _ = writeln!(
        out,
        "Damage: tier {} ({}){}",
        output.damage_assessment.tier.number(),
        output.damage_assessment.tier_label,
        if output.damage_assessment.acceptable_for_installation {
            ""
        } else {
            ", visible once installed"
        }
    );

    let safety = &output.safety_gate;
    if let Some(advisory) = &safety.advisory {
        let _ = writeln!(out, "Safety: not inspected. {advisory}");
    } else if safety.passed {
        let _ = writeln!(out, "Safety: passed ({} warning(s))", safety.warnings.len());
    } else {
        let _ = writeln!(out, "Safety: FAILED - {}", safety.blockers.join("; "));
    }

    match &output.warranty_evaluation {
        Assessment::Evaluated(warranty) => {
            let _ = writeln!(
                out,
                "Warranty: {} ({:?} risk)",
                warranty.score.label(),
                warranty.risk_level
            );
        }
        Assessment::NotEvaluated { halted_at, .. } => {
            let _ = writeln!(out, "Warranty: skipped after {}", halted_at.label());
        }
    }
    match &output.return_policy_assessment {
        Assessment::Evaluated(policy) => {
            let _ = writeln!(out, "Returns: {}", policy.rating.label());
        }
        Assessment::NotEvaluated { halted_at, .. } => {
            let _ = writeln!(out, "Returns: skipped after {}", halted_at.label());
        }
    }
    match &output.negotiation {
        Assessment::Evaluated(negotiation) if negotiation.possible => {
            let _ = writeln!(
                out,
                "Negotiation: {} odds, target ${:.0}",
                negotiation.probability.label(),
                negotiation.suggested_target_price
            );
        }
        Assessment::Evaluated(_) => {
            let _ = writeln!(out, "Negotiation: unlikely at this retailer");
        }
        Assessment::NotEvaluated { halted_at, .. } => {
            let _ = writeln!(out, "Negotiation: skipped after {}", halted_at.label());
        }
    }
    if let Assessment::Evaluated(logistics) = &output.logistics {
        let _ = writeln!(out, "Delivery: {}", logistics.delivery_reason);
    }
    out
}

fn sample_warranty(months: u32, labor_included: bool) -> WarrantyInfo {
    WarrantyInfo {
        manufacturer_covered: ManufacturerCoverage::Covered,
        retailer_warranty_months: months,
        labor_included,
        parts_included: true,
        extended_available: true,
    }
}

fn sample_buyer(risk_tolerance: RiskTolerance) -> BuyerContext {
    BuyerContext {
        purpose: PurchasePurpose::PrimaryResidence,
        risk_tolerance,
        price_flexibility: PriceFlexibility::Flexible,
    }
}

fn clean_inspection() -> InspectionResults {
    InspectionResults {
        rust_present: false,
        water_staining: false,
        cord_damaged: false,
        odor_present: false,
        missing_parts: false,
        prior_repairs: false,
        unusual_sounds: false,
        powers_on: true,
    }
}

pub(crate) fn scenarios() -> Vec<Scenario> {
    let freestanding = InstallationInfo {
        kind: InstallationType::Freestanding,
        visible_sides: BTreeSet::from([VisibleSide::Front, VisibleSide::Left, VisibleSide::Right]),
    };

    vec![
        Scenario {
            name: "Refrigerator dented on the back at an independent dealer",
            input: BuyerInput {
                appliance: ApplianceInfo {
                    kind: ApplianceType::Refrigerator,
                    brand: "Frostline".to_string(),
                    model: "FL-2250".to_string(),
                    retail_price: 1899.0,
                    asking_price: 1149.0,
                },
                damage: DamageInfo {
                    locations: BTreeSet::from([DamageLocation::Back]),
                    severity: DamageSeverity::Moderate,
                    types: BTreeSet::from([DamageType::Dent]),
                },
                retailer: RetailerInfo {
                    kind: RetailerType::Independent,
                    inventory_age_days: Some(40),
                },
                warranty: sample_warranty(12, true),
                return_policy: ReturnPolicyInfo {
                    window_days: 30,
                    restocking_fee_percent: 0.0,
                    final_sale: false,
                },
                installation: freestanding.clone(),
                buyer: sample_buyer(RiskTolerance::Moderate),
                inspection: Some(clean_inspection()),
            },
        },
        Scenario {
            name: "Range with a chipped door at a big-box outlet",
            input: BuyerInput {
                appliance: ApplianceInfo {
                    kind: ApplianceType::Range,
                    brand: "Hearthmark".to_string(),
                    model: "HM-30G".to_string(),
                    retail_price: 1200.0,
                    asking_price: 900.0,
                },
                damage: DamageInfo {
                    locations: BTreeSet::from([DamageLocation::FrontDoor]),
                    severity: DamageSeverity::Minor,
                    types: BTreeSet::from([DamageType::Chip]),
                },
                retailer: RetailerInfo {
                    kind: RetailerType::BigBox,
                    inventory_age_days: None,
                },
                warranty: sample_warranty(12, false),
                return_policy: ReturnPolicyInfo {
                    window_days: 14,
                    restocking_fee_percent: 15.0,
                    final_sale: false,
                },
                installation: freestanding.clone(),
                buyer: sample_buyer(RiskTolerance::High),
                inspection: None,
            },
        },
        Scenario {
            name: "Washer with water staining at a liquidator",
            input: BuyerInput {
                appliance: ApplianceInfo {
                    kind: ApplianceType::Washer,
                    brand: "Spinwell".to_string(),
                    model: "SW-800".to_string(),
                    retail_price: 900.0,
                    asking_price: 400.0,
                },
                damage: DamageInfo {
                    locations: BTreeSet::from([DamageLocation::LeftSide]),
                    severity: DamageSeverity::Moderate,
                    types: BTreeSet::from([DamageType::Scratch]),
                },
                retailer: RetailerInfo {
                    kind: RetailerType::Liquidation,
                    inventory_age_days: Some(95),
                },
                warranty: sample_warranty(3, false),
                return_policy: ReturnPolicyInfo {
                    window_days: 7,
                    restocking_fee_percent: 0.0,
                    final_sale: false,
                },
                installation: freestanding.clone(),
                buyer: sample_buyer(RiskTolerance::Moderate),
                inspection: Some(InspectionResults {
                    water_staining: true,
                    ..clean_inspection()
                }),
            },
        },
        Scenario {
            name: "Final-sale dryer with no warranty",
            input: BuyerInput {
                appliance: ApplianceInfo {
                    kind: ApplianceType::Dryer,
                    brand: "Tumbleaire".to_string(),
                    model: "TA-7E".to_string(),
                    retail_price: 750.0,
                    asking_price: 350.0,
                },
                damage: DamageInfo {
                    locations: BTreeSet::from([DamageLocation::Top, DamageLocation::Bottom]),
                    severity: DamageSeverity::Minor,
                    types: BTreeSet::from([DamageType::Scratch]),
                },
                retailer: RetailerInfo {
                    kind: RetailerType::Outlet,
                    inventory_age_days: Some(20),
                },
                warranty: WarrantyInfo {
                    manufacturer_covered: ManufacturerCoverage::NotCovered,
                    retailer_warranty_months: 0,
                    labor_included: false,
                    parts_included: false,
                    extended_available: false,
                },
                return_policy: ReturnPolicyInfo {
                    window_days: 0,
                    restocking_fee_percent: 0.0,
                    final_sale: true,
                },
                installation: InstallationInfo {
                    kind: InstallationType::Stacked,
                    visible_sides: BTreeSet::from([VisibleSide::Front]),
                },
                buyer: sample_buyer(RiskTolerance::Low),
                inspection: Some(clean_inspection()),
            },
        },
    ]
}
