use std::collections::BTreeSet;
use std::fmt;

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Structured facts about a prospective scratch-and-dent purchase.
///
/// Sets use ordered collections so the serialized form is canonical and the input hash is stable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerInput {
    pub appliance: ApplianceInfo,
    pub damage: DamageInfo,
    pub retailer: RetailerInfo,
    pub warranty: WarrantyInfo,
    pub return_policy: ReturnPolicyInfo,
    pub installation: InstallationInfo,
    pub buyer: BuyerContext,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inspection: Option<InspectionResults>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplianceInfo {
    #[serde(rename = "type")]
    pub kind: ApplianceType,
    pub brand: String,
    pub model: String,
    pub retail_price: f64,
    pub asking_price: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplianceType {
    Refrigerator,
    Washer,
    Dryer,
    Range,
    Dishwasher,
    Microwave,
}

impl ApplianceType {
    pub const fn label(self) -> &'static str {
        match self {
            ApplianceType::Refrigerator => "refrigerator",
            ApplianceType::Washer => "washer",
            ApplianceType::Dryer => "dryer",
            ApplianceType::Range => "range",
            ApplianceType::Dishwasher => "dishwasher",
            ApplianceType::Microwave => "microwave",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageInfo {
    pub locations: BTreeSet<DamageLocation>,
    pub severity: DamageSeverity,
    #[serde(default)]
    pub types: BTreeSet<DamageType>,
}

/// Where on the cabinet the cosmetic damage sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageLocation {
    Back,
    Bottom,
    Top,
    LeftSide,
    RightSide,
    FrontDoor,
    FrontPanel,
    ControlPanel,
    Handle,
}

impl DamageLocation {
    /// Locations that are normally concealed once the unit is in place.
    pub const fn is_hidden(self) -> bool {
        matches!(
            self,
            DamageLocation::Back | DamageLocation::Bottom | DamageLocation::Top
        )
    }

    pub const fn is_prominent(self) -> bool {
        matches!(
            self,
            DamageLocation::FrontDoor
                | DamageLocation::FrontPanel
                | DamageLocation::ControlPanel
                | DamageLocation::Handle
        )
    }

    /// Physical side a location faces; back and bottom never face the room.
    pub const fn visible_side(self) -> Option<VisibleSide> {
        match self {
            DamageLocation::FrontDoor
            | DamageLocation::FrontPanel
            | DamageLocation::ControlPanel
            | DamageLocation::Handle => Some(VisibleSide::Front),
            DamageLocation::LeftSide => Some(VisibleSide::Left),
            DamageLocation::RightSide => Some(VisibleSide::Right),
            DamageLocation::Top => Some(VisibleSide::Top),
            DamageLocation::Back | DamageLocation::Bottom => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DamageLocation::Back => "back",
            DamageLocation::Bottom => "bottom",
            DamageLocation::Top => "top",
            DamageLocation::LeftSide => "left_side",
            DamageLocation::RightSide => "right_side",
            DamageLocation::FrontDoor => "front_door",
            DamageLocation::FrontPanel => "front_panel",
            DamageLocation::ControlPanel => "control_panel",
            DamageLocation::Handle => "handle",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageSeverity {
    Minor,
    Moderate,
    Severe,
}

impl DamageSeverity {
    pub const fn label(self) -> &'static str {
        match self {
            DamageSeverity::Minor => "minor",
            DamageSeverity::Moderate => "moderate",
            DamageSeverity::Severe => "severe",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    Dent,
    Scratch,
    Chip,
    Crack,
    Discoloration,
}

impl DamageType {
    pub const fn label(self) -> &'static str {
        match self {
            DamageType::Dent => "dent",
            DamageType::Scratch => "scratch",
            DamageType::Chip => "chip",
            DamageType::Crack => "crack",
            DamageType::Discoloration => "discoloration",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RetailerInfo {
    #[serde(rename = "type")]
    pub kind: RetailerType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub inventory_age_days: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetailerType {
    BigBox,
    Independent,
    Liquidation,
    Outlet,
}

impl RetailerType {
    pub const fn label(self) -> &'static str {
        match self {
            RetailerType::BigBox => "big_box",
            RetailerType::Independent => "independent",
            RetailerType::Liquidation => "liquidation",
            RetailerType::Outlet => "outlet",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WarrantyInfo {
    pub manufacturer_covered: ManufacturerCoverage,
    pub retailer_warranty_months: u32,
    pub labor_included: bool,
    pub parts_included: bool,
    pub extended_available: bool,
}

/// Manufacturer coverage as captured on the intake form: `true`, `false`, or `"unknown"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManufacturerCoverage {
    Covered,
    NotCovered,
    Unknown,
}

impl ManufacturerCoverage {
    pub const fn is_covered(self) -> bool {
        matches!(self, ManufacturerCoverage::Covered)
    }
}

impl Serialize for ManufacturerCoverage {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            ManufacturerCoverage::Covered => serializer.serialize_bool(true),
            ManufacturerCoverage::NotCovered => serializer.serialize_bool(false),
            ManufacturerCoverage::Unknown => serializer.serialize_str("unknown"),
        }
    }
}

impl<'de> Deserialize<'de> for ManufacturerCoverage {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct CoverageVisitor;

        impl<'de> Visitor<'de> for CoverageVisitor {
            type Value = ManufacturerCoverage;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("true, false, or \"unknown\"")
            }

            fn visit_bool<E>(self, value: bool) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                Ok(if value {
                    ManufacturerCoverage::Covered
                } else {
                    ManufacturerCoverage::NotCovered
                })
            }

            fn visit_str<E>(self, value: &str) -> Result<Self::Value, E>
            where
                E: de::Error,
            {
                match value.trim().to_ascii_lowercase().as_str() {
                    "true" | "yes" => Ok(ManufacturerCoverage::Covered),
                    "false" | "no" => Ok(ManufacturerCoverage::NotCovered),
                    "unknown" => Ok(ManufacturerCoverage::Unknown),
                    other => Err(E::invalid_value(de::Unexpected::Str(other), &self)),
                }
            }
        }

        deserializer.deserialize_any(CoverageVisitor)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReturnPolicyInfo {
    pub window_days: u32,
    pub restocking_fee_percent: f64,
    pub final_sale: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InstallationInfo {
    #[serde(rename = "type")]
    pub kind: InstallationType,
    #[serde(default)]
    pub visible_sides: BTreeSet<VisibleSide>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InstallationType {
    Freestanding,
    BuiltIn,
    Stacked,
    UnderCounter,
}

impl InstallationType {
    pub const fn label(self) -> &'static str {
        match self {
            InstallationType::Freestanding => "freestanding",
            InstallationType::BuiltIn => "built_in",
            InstallationType::Stacked => "stacked",
            InstallationType::UnderCounter => "under_counter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VisibleSide {
    Front,
    Left,
    Right,
    Top,
}

impl VisibleSide {
    pub const fn label(self) -> &'static str {
        match self {
            VisibleSide::Front => "front",
            VisibleSide::Left => "left",
            VisibleSide::Right => "right",
            VisibleSide::Top => "top",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BuyerContext {
    pub purpose: PurchasePurpose,
    pub risk_tolerance: RiskTolerance,
    pub price_flexibility: PriceFlexibility,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PurchasePurpose {
    PrimaryResidence,
    RentalProperty,
    SecondaryAppliance,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTolerance {
    Low,
    Moderate,
    High,
}

impl RiskTolerance {
    pub const ALL: [RiskTolerance; 3] = [
        RiskTolerance::Low,
        RiskTolerance::Moderate,
        RiskTolerance::High,
    ];

    pub(crate) const fn index(self) -> usize {
        match self {
            RiskTolerance::Low => 0,
            RiskTolerance::Moderate => 1,
            RiskTolerance::High => 2,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            RiskTolerance::Low => "low",
            RiskTolerance::Moderate => "moderate",
            RiskTolerance::High => "high",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriceFlexibility {
    Firm,
    Flexible,
    VeryFlexible,
}

/// Results of a hands-on inspection; every flag except `powers_on` marks a problem when true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionResults {
    pub rust_present: bool,
    pub water_staining: bool,
    pub cord_damaged: bool,
    pub odor_present: bool,
    pub missing_parts: bool,
    pub prior_repairs: bool,
    pub unusual_sounds: bool,
    pub powers_on: bool,
}

/// Visibility tier of the damage once the appliance is installed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum DamageTier {
    Hidden,
    PartiallyVisible,
    ProminentlyVisible,
}

impl DamageTier {
    pub const ALL: [DamageTier; 3] = [
        DamageTier::Hidden,
        DamageTier::PartiallyVisible,
        DamageTier::ProminentlyVisible,
    ];

    pub const fn number(self) -> u8 {
        match self {
            DamageTier::Hidden => 1,
            DamageTier::PartiallyVisible => 2,
            DamageTier::ProminentlyVisible => 3,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            DamageTier::Hidden => "Hidden",
            DamageTier::PartiallyVisible => "Partially Visible",
            DamageTier::ProminentlyVisible => "Prominently Visible",
        }
    }
}

impl From<DamageTier> for u8 {
    fn from(value: DamageTier) -> Self {
        value.number()
    }
}

impl TryFrom<u8> for DamageTier {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(DamageTier::Hidden),
            2 => Ok(DamageTier::PartiallyVisible),
            3 => Ok(DamageTier::ProminentlyVisible),
            other => Err(format!("damage tier must be 1, 2, or 3 (got {other})")),
        }
    }
}
