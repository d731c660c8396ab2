use serde::{Deserialize, Serialize};

use crate::compiler::domain::{DamageInfo, DamageLocation, DamageTier, InstallationInfo};
use crate::compiler::registry::{DAMAGE_TIER_CLASSIFICATION, DAMAGE_VISIBILITY_INSTALLATION};
use crate::compiler::rules::{ModuleOutput, RuleResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageAssessment {
    pub tier: DamageTier,
    pub tier_label: String,
    /// Damaged locations whose side stays exposed in the planned installation.
    pub exposed_locations: Vec<DamageLocation>,
    pub acceptable_for_installation: bool,
}

pub fn classify_tier(damage: &DamageInfo) -> DamageTier {
    // An empty location set is vacuously hidden.
    if damage.locations.iter().all(|location| location.is_hidden()) {
        DamageTier::Hidden
    } else if damage.locations.iter().any(|location| location.is_prominent()) {
        DamageTier::ProminentlyVisible
    } else {
        DamageTier::PartiallyVisible
    }
}

pub fn classify(damage: &DamageInfo, installation: &InstallationInfo) -> ModuleOutput<DamageAssessment> {
    let tier = classify_tier(damage);

    let exposed_locations: Vec<DamageLocation> = damage
        .locations
        .iter()
        .copied()
        .filter(|location| {
            location
                .visible_side()
                .map(|side| installation.visible_sides.contains(&side))
                .unwrap_or(false)
        })
        .collect();

    let visible_in_installation = !exposed_locations.is_empty() && tier != DamageTier::Hidden;

    let located = if damage.locations.is_empty() {
        "no damage locations recorded".to_string()
    } else {
        damage
            .locations
            .iter()
            .map(|location| location.label())
            .collect::<Vec<_>>()
            .join(", ")
    };

    let mut rules = Vec::with_capacity(2);
    rules.push(RuleResult::emit(
        &DAMAGE_TIER_CLASSIFICATION,
        true,
        format!(
            "Tier {} ({}): {} damage at {}",
            tier.number(),
            tier.label(),
            damage.severity.label(),
            located
        ),
        &["damage.locations", "damage.severity"],
        &["damageAssessment.tier"],
    ));

    let visibility_message = if visible_in_installation {
        let exposed = exposed_locations
            .iter()
            .map(|location| location.label())
            .collect::<Vec<_>>()
            .join(", ");
        format!("Damage at {exposed} will be visible once installed")
    } else if exposed_locations.is_empty() {
        "Damage is not on a side left exposed by the installation".to_string()
    } else {
        "Damage faces an exposed side but sits in a hidden zone".to_string()
    };

    rules.push(RuleResult::emit(
        &DAMAGE_VISIBILITY_INSTALLATION,
        !visible_in_installation,
        visibility_message,
        &["damage.locations", "installation.visibleSides"],
        &["damageAssessment.acceptableForInstallation"],
    ));

    ModuleOutput::new(
        DamageAssessment {
            tier,
            tier_label: tier.label().to_string(),
            exposed_locations,
            acceptable_for_installation: !visible_in_installation,
        },
        rules,
    )
}
