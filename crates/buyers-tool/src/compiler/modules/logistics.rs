use serde::{Deserialize, Serialize};

use crate::compiler::domain::{ApplianceInfo, ApplianceType, InstallationInfo, InstallationType};
use crate::compiler::registry::{
    RuleDef, LOGISTICS_DELIVERY, LOGISTICS_INSTALLATION_NOTES, LOGISTICS_TRANSPORT_GENERAL,
    LOGISTICS_TRANSPORT_RANGE, LOGISTICS_TRANSPORT_REFRIGERATOR, LOGISTICS_TRANSPORT_WASHER,
};
use crate::compiler::rules::{ModuleOutput, RuleResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeliveryRecommendation {
    Professional,
    Either,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogisticsPlan {
    pub delivery: DeliveryRecommendation,
    pub delivery_reason: String,
    pub transport_requirements: Vec<String>,
    pub installation_notes: Vec<String>,
}

impl LogisticsPlan {
    pub(crate) fn not_evaluated() -> Self {
        Self {
            delivery: DeliveryRecommendation::Professional,
            delivery_reason: "not evaluated".to_string(),
            transport_requirements: Vec::new(),
            installation_notes: Vec::new(),
        }
    }
}

pub fn delivery(
    appliance: ApplianceType,
    installation: InstallationType,
) -> (DeliveryRecommendation, &'static str) {
    if installation == InstallationType::Stacked {
        return (
            DeliveryRecommendation::Professional,
            "Stacked installations need two installers and a manufacturer stacking kit",
        );
    }
    match appliance {
        ApplianceType::Refrigerator => (
            DeliveryRecommendation::Professional,
            "Refrigerators are heavy, must stay upright, and often need a water line connection",
        ),
        ApplianceType::Range => (
            DeliveryRecommendation::Professional,
            "Ranges may need a gas line or 240V hookup that should be done by a professional",
        ),
        ApplianceType::Washer
        | ApplianceType::Dryer
        | ApplianceType::Dishwasher
        | ApplianceType::Microwave => (
            DeliveryRecommendation::Either,
            "Self transport works with a helper and a truck; professional delivery adds haul-away",
        ),
    }
}

fn transport_rule(appliance: ApplianceType) -> &'static RuleDef {
    match appliance {
        ApplianceType::Refrigerator => &LOGISTICS_TRANSPORT_REFRIGERATOR,
        ApplianceType::Washer => &LOGISTICS_TRANSPORT_WASHER,
        ApplianceType::Range => &LOGISTICS_TRANSPORT_RANGE,
        ApplianceType::Dryer | ApplianceType::Dishwasher | ApplianceType::Microwave => {
            &LOGISTICS_TRANSPORT_GENERAL
        }
    }
}

fn transport_requirements(appliance: ApplianceType) -> &'static [&'static str] {
    match appliance {
        ApplianceType::Refrigerator => &[
            "Keep the unit upright during transport",
            "Secure doors closed with straps, not tape on the finish",
            "Let it stand upright for 4 hours before plugging in",
            "Use an appliance dolly rated for 300 lb or more",
        ],
        ApplianceType::Washer => &[
            "Install drum shipping bolts before moving",
            "Drain remaining water from the pump and hoses",
            "Use an appliance dolly and moving blankets",
        ],
        ApplianceType::Range => &[
            "Remove grates, racks, and knobs before moving",
            "Secure the oven door closed",
            "Disconnect gas or power only with the supply shut off",
        ],
        ApplianceType::Dryer => &[
            "Secure the drum and door for transport",
            "Bring a new vent hose and clamps",
        ],
        ApplianceType::Dishwasher => &[
            "Drain residual water before moving",
            "Keep the unit upright and protect the door hinges",
        ],
        ApplianceType::Microwave => &[
            "Remove the glass turntable and pack it separately",
            "Transport in a padded box or blanket",
        ],
    }
}

fn appliance_installation_notes(appliance: ApplianceType) -> &'static [&'static str] {
    match appliance {
        ApplianceType::Refrigerator => &[
            "Confirm door swing clearance and opening dimensions",
            "Have a water line shutoff available for the ice maker",
        ],
        ApplianceType::Washer => &[
            "Verify hot and cold supply valves and a standpipe drain",
            "Level the unit to prevent walking during spin",
        ],
        ApplianceType::Dryer => &[
            "Confirm 240V outlet type or gas supply",
            "Use rigid or semi-rigid metal venting",
        ],
        ApplianceType::Range => &[
            "Install the anti-tip bracket",
            "Confirm 240V outlet or gas connection type",
        ],
        ApplianceType::Dishwasher => &[
            "Confirm hot water supply, drain connection, and dedicated circuit",
            "Check cabinet opening height and depth",
        ],
        ApplianceType::Microwave => &["Confirm a dedicated outlet within cord reach"],
    }
}

fn installation_type_notes(installation: InstallationType) -> &'static [&'static str] {
    match installation {
        InstallationType::Freestanding => &["Leave ventilation space on the sides and back"],
        InstallationType::BuiltIn => &[
            "Measure the cabinet cutout; built-in fit tolerances are tight",
            "Side damage will be hidden by cabinetry once installed",
        ],
        InstallationType::Stacked => &[
            "Use the manufacturer stacking kit for the exact model pair",
            "Confirm ceiling height clears the stacked units",
        ],
        InstallationType::UnderCounter => &[
            "Confirm counter height and depth clearance",
            "Only the front panel remains visible under a counter",
        ],
    }
}

pub fn plan(appliance: &ApplianceInfo, installation: &InstallationInfo) -> ModuleOutput<LogisticsPlan> {
    let (delivery, reason) = delivery(appliance.kind, installation.kind);
    let transport: Vec<String> = transport_requirements(appliance.kind)
        .iter()
        .map(|item| item.to_string())
        .collect();
    let notes: Vec<String> = appliance_installation_notes(appliance.kind)
        .iter()
        .chain(installation_type_notes(installation.kind))
        .map(|item| item.to_string())
        .collect();

    let rules = vec![
        RuleResult::emit(
            &LOGISTICS_DELIVERY,
            true,
            format!(
                "{} delivery recommended: {reason}",
                match delivery {
                    DeliveryRecommendation::Professional => "Professional",
                    DeliveryRecommendation::Either => "Self or professional",
                }
            ),
            &["appliance.type", "installation.type"],
            &["logistics.delivery"],
        ),
        RuleResult::emit(
            transport_rule(appliance.kind),
            true,
            format!(
                "{} transport checklist has {} item(s)",
                appliance.kind.label(),
                transport.len()
            ),
            &["appliance.type"],
            &["logistics.transportRequirements"],
        ),
        RuleResult::emit(
            &LOGISTICS_INSTALLATION_NOTES,
            true,
            format!(
                "{} installation of a {} has {} checklist item(s)",
                installation.kind.label(),
                appliance.kind.label(),
                notes.len()
            ),
            &["appliance.type", "installation.type"],
            &["logistics.installationNotes"],
        ),
    ];

    ModuleOutput::new(
        LogisticsPlan {
            delivery,
            delivery_reason: reason.to_string(),
            transport_requirements: transport,
            installation_notes: notes,
        },
        rules,
    )
}
