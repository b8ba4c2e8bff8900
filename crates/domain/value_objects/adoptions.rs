use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::domain::{
    entities::{
        adoptions::{AdoptionEntity, InsertAdoptionEntity},
        bamboo_plants::InsertBambooPlantEntity,
    },
    value_objects::enums::payment_statuses::PaymentStatus,
};

/// Species provisioned for every new adoption.
pub const DEFAULT_SPECIES: &str = "Dendrocalamus asper";

/// Everything written when a payment turns into an adoption. Persisted as one unit:
/// plant, adoption, occupancy increment, first growth record and environment snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct AdoptionDraft {
    /// `bamboo_plant_id` is filled in by storage once the plant row exists.
    pub adoption: InsertAdoptionEntity,
    pub plant: InsertBambooPlantEntity,
    pub initial_growth: GrowthSeed,
    pub environment: EnvironmentSeed,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GrowthSeed {
    pub recorded_at: DateTime<Utc>,
    pub height: f64,
    pub diameter: f64,
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnvironmentSeed {
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
    pub soil_ph: f64,
    pub rainfall: f64,
}

impl Default for EnvironmentSeed {
    /// Baseline readings for a freshly planted tropical clump.
    fn default() -> Self {
        Self {
            temperature: 28.0,
            humidity: 75.0,
            soil_moisture: 60.0,
            soil_ph: 6.5,
            rainfall: 0.0,
        }
    }
}

/// Result of persisting an [`AdoptionDraft`].
#[derive(Debug, Clone, PartialEq)]
pub enum AdoptionCreation {
    Created(AdoptionEntity),
    /// Another trigger won the race on `payment_reference_no`; nothing was written.
    AlreadyExists(AdoptionEntity),
}

#[derive(Debug, Clone, PartialEq)]
pub enum ReconciliationOutcome {
    /// The payment is not settled yet. Callers retry later.
    NotPayable { status: PaymentStatus },
    Materialized {
        adoption: AdoptionEntity,
        newly_created: bool,
    },
}

impl ReconciliationOutcome {
    pub fn adoption(&self) -> Option<&AdoptionEntity> {
        match self {
            ReconciliationOutcome::NotPayable { .. } => None,
            ReconciliationOutcome::Materialized { adoption, .. } => Some(adoption),
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, PartialEq)]
pub struct SyncReport {
    pub scanned: usize,
    pub created: usize,
    pub already_present: usize,
    pub not_payable: usize,
    pub failed: Vec<String>,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct AdoptionDto {
    pub id: i32,
    pub package_id: Option<i32>,
    pub location_id: Option<i32>,
    pub bamboo_plant_id: Option<i32>,
    pub package_name: Option<String>,
    pub package_price_minor: Option<i32>,
    pub package_period: Option<String>,
    pub package_features: Vec<String>,
    pub location_name: Option<String>,
    pub payment_reference_no: Option<String>,
    pub adopted_at: DateTime<Utc>,
    pub is_active: bool,
    pub certificate_issued: bool,
}

impl From<AdoptionEntity> for AdoptionDto {
    fn from(value: AdoptionEntity) -> Self {
        let package_features = value
            .package_features
            .as_deref()
            .and_then(|raw| serde_json::from_str(raw).ok())
            .unwrap_or_default();

        Self {
            id: value.id,
            package_id: value.package_id,
            location_id: value.location_id,
            bamboo_plant_id: value.bamboo_plant_id,
            package_name: value.package_name,
            package_price_minor: value.package_price_minor,
            package_period: value.package_period,
            package_features,
            location_name: value.location_name,
            payment_reference_no: value.payment_reference_no,
            adopted_at: value.adopted_at,
            is_active: value.is_active,
            certificate_issued: value.certificate_issued,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ReconciliationDto {
    pub reference_no: String,
    pub status: PaymentStatus,
    pub adoption: Option<AdoptionDto>,
    pub newly_created: bool,
}
