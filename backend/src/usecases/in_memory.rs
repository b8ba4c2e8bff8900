//! Repository fakes backed by one locked in-memory state, for use-case scenario tests.

use adoption_core::{
    domain::{
        entities::{
            adoptions::AdoptionEntity,
            bamboo_plants::BambooPlantEntity,
            growth_records::{GrowthRecordEntity, InsertGrowthRecordEntity},
            locations::{InsertLocationEntity, LocationEntity, UpdateLocationEntity},
            packages::{InsertPackageEntity, PackageEntity, UpdatePackageEntity},
            payments::{InsertPaymentEntity, PaymentEntity},
            users::{InsertUserEntity, UserEntity},
        },
        repositories::{
            adoptions::AdoptionRepository, locations::LocationRepository,
            packages::PackageRepository, payments::PaymentRepository, plants::PlantRepository,
            users::UserRepository,
        },
        value_objects::{
            adoptions::{AdoptionCreation, AdoptionDraft},
            enums::{payment_statuses::PaymentStatus, plant_statuses::PlantStatus},
            payments::{GatewayBillStatus, PaymentTransition},
        },
    },
    payments::toyyibpay_client::{BillRequest, CreatedBill, GatewayError},
};
use anyhow::{Result, bail};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
};

use crate::usecases::payments::PaymentGateway;

#[derive(Default)]
pub struct StoreState {
    next_id: i32,
    pub payments: Vec<PaymentEntity>,
    pub adoptions: Vec<AdoptionEntity>,
    pub users: Vec<UserEntity>,
    pub packages: Vec<PackageEntity>,
    pub locations: Vec<LocationEntity>,
    pub plants: Vec<BambooPlantEntity>,
    pub growth_records: Vec<GrowthRecordEntity>,
    pub environment_rows: usize,
    /// The next draft write fails as if the transaction rolled back.
    pub fail_next_draft: bool,
}

impl StoreState {
    fn next_id(&mut self) -> i32 {
        self.next_id += 1;
        self.next_id
    }

    fn push_growth_records(&mut self, records: Vec<InsertGrowthRecordEntity>) -> usize {
        let count = records.len();
        for record in records {
            let id = self.next_id();
            self.growth_records.push(GrowthRecordEntity {
                id,
                bamboo_plant_id: record.bamboo_plant_id,
                recorded_at: record.recorded_at,
                height: record.height,
                diameter: record.diameter,
                notes: record.notes,
                is_synthetic: record.is_synthetic,
                created_at: Utc::now(),
            });
        }
        count
    }
}

#[derive(Default)]
pub struct InMemoryStore {
    state: Mutex<StoreState>,
}

impl InMemoryStore {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn state(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub fn seed_package(&self, name: &str, period: &str, price_minor: i32) -> PackageEntity {
        let mut state = self.state();
        let package = PackageEntity {
            id: state.next_id(),
            name: name.to_string(),
            description: None,
            price_minor,
            period: period.to_string(),
            features: vec!["Certificate".to_string()],
            is_active: true,
            sort_order: 0,
        };
        state.packages.push(package.clone());
        package
    }

    pub fn seed_location(&self, name: &str, capacity: i32) -> LocationEntity {
        let mut state = self.state();
        let location = LocationEntity {
            id: state.next_id(),
            name: name.to_string(),
            address: format!("{name}, Selangor"),
            latitude: 3.1,
            longitude: 101.6,
            capacity,
            current_count: 0,
            features: Vec::new(),
            is_active: true,
        };
        state.locations.push(location.clone());
        location
    }

    pub fn seed_payment(
        &self,
        reference_no: &str,
        status: PaymentStatus,
        package_type: &str,
        location_ref: &str,
    ) -> PaymentEntity {
        let mut state = self.state();
        let now = Utc::now();
        let payment = PaymentEntity {
            id: state.next_id(),
            reference_no: reference_no.to_string(),
            bill_code: Some(format!("bill-{reference_no}")),
            transaction_id: None,
            status: status.to_string(),
            amount_minor: 9000,
            customer_name: "Siti Aminah".to_string(),
            customer_email: "siti@example.my".to_string(),
            customer_phone: "0123456789".to_string(),
            clerk_id: "user_siti".to_string(),
            package_type: package_type.to_string(),
            location_ref: location_ref.to_string(),
            paid_at: (status == PaymentStatus::Success).then_some(now),
            created_at: now,
            updated_at: now,
        };
        state.payments.push(payment.clone());
        payment
    }

    pub fn location(&self, location_id: i32) -> Option<LocationEntity> {
        self.state()
            .locations
            .iter()
            .find(|location| location.id == location_id)
            .cloned()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryStore {
    async fn insert(&self, payment: InsertPaymentEntity) -> Result<PaymentEntity> {
        let mut state = self.state();
        if state
            .payments
            .iter()
            .any(|existing| existing.reference_no == payment.reference_no)
        {
            bail!("duplicate reference_no {}", payment.reference_no);
        }
        let now = Utc::now();
        let entity = PaymentEntity {
            id: state.next_id(),
            reference_no: payment.reference_no,
            bill_code: None,
            transaction_id: None,
            status: payment.status,
            amount_minor: payment.amount_minor,
            customer_name: payment.customer_name,
            customer_email: payment.customer_email,
            customer_phone: payment.customer_phone,
            clerk_id: payment.clerk_id,
            package_type: payment.package_type,
            location_ref: payment.location_ref,
            paid_at: None,
            created_at: now,
            updated_at: now,
        };
        state.payments.push(entity.clone());
        Ok(entity)
    }

    async fn find_by_reference_no(&self, reference_no: &str) -> Result<Option<PaymentEntity>> {
        Ok(self
            .state()
            .payments
            .iter()
            .find(|payment| payment.reference_no == reference_no)
            .cloned())
    }

    async fn attach_bill_code(&self, reference_no: &str, bill_code: &str) -> Result<()> {
        let mut state = self.state();
        match state
            .payments
            .iter_mut()
            .find(|payment| payment.reference_no == reference_no)
        {
            Some(payment) => {
                payment.bill_code = Some(bill_code.to_string());
                Ok(())
            }
            None => bail!("payment {reference_no} not found"),
        }
    }

    async fn apply_transition(
        &self,
        reference_no: &str,
        transition: PaymentTransition,
    ) -> Result<Option<PaymentEntity>> {
        tokio::task::yield_now().await;
        let mut state = self.state();
        let Some(payment) = state.payments.iter_mut().find(|payment| {
            payment.reference_no == reference_no
                && payment.status == PaymentStatus::Pending.to_string()
        }) else {
            return Ok(None);
        };

        payment.status = transition.status.to_string();
        payment.transaction_id = transition.transaction_id.or(payment.transaction_id.take());
        payment.paid_at = transition.paid_at.or(payment.paid_at);
        payment.updated_at = Utc::now();
        Ok(Some(payment.clone()))
    }

    async fn list_success_without_adoption(&self, limit: i64) -> Result<Vec<PaymentEntity>> {
        let state = self.state();
        Ok(state
            .payments
            .iter()
            .filter(|payment| payment.status == PaymentStatus::Success.to_string())
            .filter(|payment| {
                !state.adoptions.iter().any(|adoption| {
                    adoption.payment_reference_no.as_deref() == Some(payment.reference_no.as_str())
                })
            })
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }

    async fn list_pending_with_bill(
        &self,
        created_before: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<PaymentEntity>> {
        Ok(self
            .state()
            .payments
            .iter()
            .filter(|payment| payment.status == PaymentStatus::Pending.to_string())
            .filter(|payment| payment.bill_code.is_some() && payment.created_at < created_before)
            .take(limit.max(0) as usize)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl AdoptionRepository for InMemoryStore {
    async fn find_by_payment_reference_no(
        &self,
        reference_no: &str,
    ) -> Result<Option<AdoptionEntity>> {
        tokio::task::yield_now().await;
        Ok(self
            .state()
            .adoptions
            .iter()
            .find(|adoption| adoption.payment_reference_no.as_deref() == Some(reference_no))
            .cloned())
    }

    async fn create_from_draft(&self, draft: AdoptionDraft) -> Result<AdoptionCreation> {
        tokio::task::yield_now().await;
        let mut state = self.state();

        if state.fail_next_draft {
            state.fail_next_draft = false;
            bail!("connection reset while writing adoption");
        }

        if let Some(reference_no) = draft.adoption.payment_reference_no.as_deref() {
            if let Some(existing) = state
                .adoptions
                .iter()
                .find(|adoption| adoption.payment_reference_no.as_deref() == Some(reference_no))
            {
                return Ok(AdoptionCreation::AlreadyExists(existing.clone()));
            }
        }

        let now = Utc::now();
        let plant_id = state.next_id();
        state.plants.push(BambooPlantEntity {
            id: plant_id,
            code: draft.plant.code,
            species: draft.plant.species,
            location_id: draft.plant.location_id,
            planted_at: draft.plant.planted_at,
            current_height: draft.plant.current_height,
            co2_absorbed: draft.plant.co2_absorbed,
            status: draft.plant.status,
            created_at: now,
        });

        let adoption = AdoptionEntity {
            id: state.next_id(),
            user_id: draft.adoption.user_id,
            package_id: draft.adoption.package_id,
            location_id: draft.adoption.location_id,
            bamboo_plant_id: Some(plant_id),
            package_name: draft.adoption.package_name,
            package_price_minor: draft.adoption.package_price_minor,
            package_period: draft.adoption.package_period,
            package_features: draft.adoption.package_features,
            location_name: draft.adoption.location_name,
            payment_reference_no: draft.adoption.payment_reference_no,
            adopted_at: now,
            is_active: draft.adoption.is_active,
            certificate_issued: false,
            created_at: now,
            updated_at: now,
        };
        state.adoptions.push(adoption.clone());

        if let Some(location_id) = adoption.location_id {
            if let Some(location) = state
                .locations
                .iter_mut()
                .find(|location| location.id == location_id)
            {
                location.current_count += 1;
            }
        }

        let record_id = state.next_id();
        state.growth_records.push(GrowthRecordEntity {
            id: record_id,
            bamboo_plant_id: plant_id,
            recorded_at: draft.initial_growth.recorded_at,
            height: draft.initial_growth.height,
            diameter: draft.initial_growth.diameter,
            notes: draft.initial_growth.notes,
            is_synthetic: false,
            created_at: now,
        });
        state.environment_rows += 1;

        Ok(AdoptionCreation::Created(adoption))
    }

    async fn find_by_id(&self, adoption_id: i32) -> Result<Option<AdoptionEntity>> {
        Ok(self
            .state()
            .adoptions
            .iter()
            .find(|adoption| adoption.id == adoption_id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<AdoptionEntity>> {
        Ok(self
            .state()
            .adoptions
            .iter()
            .filter(|adoption| adoption.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn list_all(&self) -> Result<Vec<AdoptionEntity>> {
        Ok(self.state().adoptions.clone())
    }

    async fn set_active(&self, adoption_id: i32, is_active: bool) -> Result<Option<AdoptionEntity>> {
        let mut state = self.state();
        Ok(state
            .adoptions
            .iter_mut()
            .find(|adoption| adoption.id == adoption_id)
            .map(|adoption| {
                adoption.is_active = is_active;
                adoption.clone()
            }))
    }
}

#[async_trait]
impl UserRepository for InMemoryStore {
    async fn find_by_clerk_id(&self, clerk_id: &str) -> Result<Option<UserEntity>> {
        Ok(self
            .state()
            .users
            .iter()
            .find(|user| user.clerk_id == clerk_id)
            .cloned())
    }

    async fn find_or_create(&self, user: InsertUserEntity) -> Result<UserEntity> {
        let mut state = self.state();
        if let Some(existing) = state.users.iter().find(|existing| existing.clerk_id == user.clerk_id) {
            return Ok(existing.clone());
        }
        let now = Utc::now();
        let entity = UserEntity {
            id: state.next_id(),
            clerk_id: user.clerk_id,
            email: user.email,
            name: user.name,
            created_at: now,
            updated_at: now,
        };
        state.users.push(entity.clone());
        Ok(entity)
    }
}

#[async_trait]
impl PackageRepository for InMemoryStore {
    async fn find_by_id(&self, package_id: i32) -> Result<Option<PackageEntity>> {
        Ok(self
            .state()
            .packages
            .iter()
            .find(|package| package.id == package_id)
            .cloned())
    }

    async fn find_by_period(&self, period: &str) -> Result<Option<PackageEntity>> {
        let state = self.state();
        let mut matches: Vec<&PackageEntity> = state
            .packages
            .iter()
            .filter(|package| package.period == period)
            .collect();
        matches.sort_by_key(|package| (!package.is_active, package.sort_order, package.id));
        Ok(matches.first().map(|package| (*package).clone()))
    }

    async fn list_active(&self) -> Result<Vec<PackageEntity>> {
        Ok(self
            .state()
            .packages
            .iter()
            .filter(|package| package.is_active)
            .cloned()
            .collect())
    }

    async fn insert(&self, package: InsertPackageEntity) -> Result<PackageEntity> {
        let mut state = self.state();
        let entity = PackageEntity {
            id: state.next_id(),
            name: package.name,
            description: package.description,
            price_minor: package.price_minor,
            period: package.period,
            features: serde_json::from_str(&package.features)?,
            is_active: package.is_active,
            sort_order: package.sort_order,
        };
        state.packages.push(entity.clone());
        Ok(entity)
    }

    async fn update(
        &self,
        package_id: i32,
        changes: UpdatePackageEntity,
    ) -> Result<Option<PackageEntity>> {
        let mut state = self.state();
        let Some(package) = state.packages.iter_mut().find(|package| package.id == package_id) else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            package.name = name;
        }
        if let Some(description) = changes.description {
            package.description = description;
        }
        if let Some(price_minor) = changes.price_minor {
            package.price_minor = price_minor;
        }
        if let Some(period) = changes.period {
            package.period = period;
        }
        if let Some(features) = changes.features {
            package.features = serde_json::from_str(&features)?;
        }
        if let Some(is_active) = changes.is_active {
            package.is_active = is_active;
        }
        if let Some(sort_order) = changes.sort_order {
            package.sort_order = sort_order;
        }
        Ok(Some(package.clone()))
    }
}

#[async_trait]
impl LocationRepository for InMemoryStore {
    async fn find_by_id(&self, location_id: i32) -> Result<Option<LocationEntity>> {
        Ok(self.location(location_id))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<LocationEntity>> {
        Ok(self
            .state()
            .locations
            .iter()
            .find(|location| location.name == name)
            .cloned())
    }

    async fn list_active(&self) -> Result<Vec<LocationEntity>> {
        Ok(self
            .state()
            .locations
            .iter()
            .filter(|location| location.is_active)
            .cloned()
            .collect())
    }

    async fn insert(&self, location: InsertLocationEntity) -> Result<LocationEntity> {
        let mut state = self.state();
        let entity = LocationEntity {
            id: state.next_id(),
            name: location.name,
            address: location.address,
            latitude: location.latitude,
            longitude: location.longitude,
            capacity: location.capacity,
            current_count: 0,
            features: serde_json::from_str(&location.features)?,
            is_active: location.is_active,
        };
        state.locations.push(entity.clone());
        Ok(entity)
    }

    async fn update(
        &self,
        location_id: i32,
        changes: UpdateLocationEntity,
    ) -> Result<Option<LocationEntity>> {
        let mut state = self.state();
        let Some(location) = state
            .locations
            .iter_mut()
            .find(|location| location.id == location_id)
        else {
            return Ok(None);
        };
        if let Some(name) = changes.name {
            location.name = name;
        }
        if let Some(capacity) = changes.capacity {
            location.capacity = capacity;
        }
        if let Some(is_active) = changes.is_active {
            location.is_active = is_active;
        }
        Ok(Some(location.clone()))
    }
}

#[async_trait]
impl PlantRepository for InMemoryStore {
    async fn find_by_id(&self, plant_id: i32) -> Result<Option<BambooPlantEntity>> {
        Ok(self
            .state()
            .plants
            .iter()
            .find(|plant| plant.id == plant_id)
            .cloned())
    }

    async fn list_growth_records(&self, plant_id: i32) -> Result<Vec<GrowthRecordEntity>> {
        let mut records: Vec<GrowthRecordEntity> = self
            .state()
            .growth_records
            .iter()
            .filter(|record| record.bamboo_plant_id == plant_id)
            .cloned()
            .collect();
        records.sort_by_key(|record| (record.recorded_at, record.id));
        Ok(records)
    }

    async fn backfill_growth_records(
        &self,
        plant_id: i32,
        records: Vec<InsertGrowthRecordEntity>,
    ) -> Result<usize> {
        tokio::task::yield_now().await;
        let mut state = self.state();
        if !state.plants.iter().any(|plant| plant.id == plant_id) {
            bail!("plant {plant_id} not found");
        }
        let already_backfilled = state
            .growth_records
            .iter()
            .any(|record| record.bamboo_plant_id == plant_id && record.is_synthetic);
        if already_backfilled {
            return Ok(0);
        }
        Ok(state.push_growth_records(records))
    }

    async fn replace_synthetic_growth_records(
        &self,
        plant_id: i32,
        records: Vec<InsertGrowthRecordEntity>,
    ) -> Result<usize> {
        let mut state = self.state();
        state
            .growth_records
            .retain(|record| !(record.bamboo_plant_id == plant_id && record.is_synthetic));
        Ok(state.push_growth_records(records))
    }

    async fn update_growth_summary(
        &self,
        plant_id: i32,
        current_height: f64,
        co2_absorbed: f64,
        status: PlantStatus,
    ) -> Result<()> {
        let mut state = self.state();
        match state.plants.iter_mut().find(|plant| plant.id == plant_id) {
            Some(plant) => {
                plant.current_height = current_height;
                plant.co2_absorbed = co2_absorbed;
                plant.status = status.to_string();
                Ok(())
            }
            None => bail!("plant {plant_id} not found"),
        }
    }
}

/// Gateway whose bills settle however the test says.
#[derive(Default)]
pub struct ScriptedGateway {
    statuses: Mutex<HashMap<String, GatewayBillStatus>>,
    created: Mutex<Vec<BillRequest>>,
}

impl ScriptedGateway {
    pub fn settle(&self, bill_code: &str, status: PaymentStatus) {
        let settled = GatewayBillStatus {
            status,
            paid_amount_minor: None,
            transaction_id: Some(format!("TP-{bill_code}")),
            paid_at: (status == PaymentStatus::Success).then(Utc::now),
        };
        self.statuses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .insert(bill_code.to_string(), settled);
    }

    pub fn created_bills(&self) -> Vec<BillRequest> {
        self.created
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl PaymentGateway for ScriptedGateway {
    async fn create_bill(&self, request: &BillRequest) -> Result<CreatedBill, GatewayError> {
        let mut created = self
            .created
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        created.push(request.clone());
        let bill_code = format!("bc{}", created.len());
        Ok(CreatedBill {
            payment_url: format!("https://dev.toyyibpay.com/{bill_code}"),
            bill_code,
        })
    }

    async fn get_status(&self, bill_code: &str) -> Result<GatewayBillStatus, GatewayError> {
        Ok(self
            .statuses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .get(bill_code)
            .cloned()
            .unwrap_or_else(GatewayBillStatus::pending))
    }
}
