use std::collections::{BTreeSet, HashMap};
use std::sync::{Arc, Mutex};

use axum::response::Response;
use serde_json::Value;

use crate::compiler::cache::{CacheError, CacheKey, TraceCache};
use crate::compiler::domain::{
    ApplianceInfo, ApplianceType, BuyerContext, BuyerInput, DamageInfo, DamageLocation,
    DamageSeverity, DamageType, InspectionResults, InstallationInfo, InstallationType,
    ManufacturerCoverage, PriceFlexibility, PurchasePurpose, RetailerInfo, RetailerType,
    ReturnPolicyInfo, RiskTolerance, VisibleSide, WarrantyInfo,
};
use crate::compiler::{
    evaluation_router, CompilerOptions, CompilerOutput, EvaluationRequest, EvaluationService,
};

pub(super) const TIMESTAMP: &str = "2025-06-01T12:00:00Z";

pub(super) fn options() -> CompilerOptions {
    CompilerOptions::at(TIMESTAMP)
}

pub(super) fn clean_inspection() -> InspectionResults {
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

/// Refrigerator with a dent on the back, strong warranty, generous returns, and a clean
/// inspection. Nothing in it should fail.
pub(super) fn baseline_input() -> BuyerInput {
    BuyerInput {
        appliance: ApplianceInfo {
            kind: ApplianceType::Refrigerator,
            brand: "Frostline".to_string(),
            model: "FL-2250".to_string(),
            retail_price: 1000.0,
            asking_price: 600.0,
        },
        damage: DamageInfo {
            locations: BTreeSet::from([DamageLocation::Back]),
            severity: DamageSeverity::Minor,
            types: BTreeSet::from([DamageType::Dent]),
        },
        retailer: RetailerInfo {
            kind: RetailerType::Independent,
            inventory_age_days: Some(45),
        },
        warranty: WarrantyInfo {
            manufacturer_covered: ManufacturerCoverage::Covered,
            retailer_warranty_months: 12,
            labor_included: true,
            parts_included: true,
            extended_available: false,
        },
        return_policy: ReturnPolicyInfo {
            window_days: 30,
            restocking_fee_percent: 0.0,
            final_sale: false,
        },
        installation: InstallationInfo {
            kind: InstallationType::Freestanding,
            visible_sides: BTreeSet::from([VisibleSide::Front, VisibleSide::Left, VisibleSide::Right]),
        },
        buyer: BuyerContext {
            purpose: PurchasePurpose::PrimaryResidence,
            risk_tolerance: RiskTolerance::Moderate,
            price_flexibility: PriceFlexibility::Flexible,
        },
        inspection: Some(clean_inspection()),
    }
}

/// Baseline altered to fail exactly three warnings: exposed front damage, a discount below
/// the tier 3 minimum, and a warranty without labor.
pub(super) fn three_warning_input(tolerance: RiskTolerance) -> BuyerInput {
    let mut input = baseline_input();
    input.damage.locations = BTreeSet::from([DamageLocation::FrontDoor]);
    input.appliance.asking_price = 700.0;
    input.warranty.labor_included = false;
    input.buyer.risk_tolerance = tolerance;
    input
}

pub(super) fn final_sale_without_warranty() -> BuyerInput {
    let mut input = baseline_input();
    input.return_policy.final_sale = true;
    input.return_policy.window_days = 0;
    input.warranty.manufacturer_covered = ManufacturerCoverage::NotCovered;
    input.warranty.retailer_warranty_months = 0;
    input
}

pub(super) fn request(input: BuyerInput) -> EvaluationRequest {
    EvaluationRequest {
        input,
        options: options(),
    }
}

pub(super) fn rule_ids(output: &CompilerOutput) -> Vec<&str> {
    output
        .trace
        .rules
        .iter()
        .map(|rule| rule.rule_id.as_str())
        .collect()
}

#[derive(Default, Clone)]
pub(super) struct MemoryCache {
    pub(super) entries: Arc<Mutex<HashMap<CacheKey, CompilerOutput>>>,
}

impl MemoryCache {
    pub(super) fn len(&self) -> usize {
        self.entries.lock().expect("cache mutex poisoned").len()
    }
}

impl TraceCache for MemoryCache {
    fn store(&self, key: CacheKey, output: CompilerOutput) -> Result<bool, CacheError> {
        let mut guard = self.entries.lock().expect("cache mutex poisoned");
        Ok(guard.insert(key, output).is_some())
    }

    fn fetch(&self, key: &CacheKey) -> Result<Option<CompilerOutput>, CacheError> {
        let guard = self.entries.lock().expect("cache mutex poisoned");
        Ok(guard.get(key).cloned())
    }
}

pub(super) struct UnavailableCache;

impl TraceCache for UnavailableCache {
    fn store(&self, _key: CacheKey, _output: CompilerOutput) -> Result<bool, CacheError> {
        Err(CacheError::Unavailable("offline".into()))
    }

    fn fetch(&self, _key: &CacheKey) -> Result<Option<CompilerOutput>, CacheError> {
        Err(CacheError::Unavailable("offline".into()))
    }
}

pub(super) fn build_service() -> (EvaluationService<MemoryCache>, Arc<MemoryCache>) {
    let cache = Arc::new(MemoryCache::default());
    let service = EvaluationService::new(cache.clone());
    (service, cache)
}

pub(super) fn router_with_service(service: EvaluationService<MemoryCache>) -> axum::Router {
    evaluation_router(Arc::new(service))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 1 << 20)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
