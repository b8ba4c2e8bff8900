use adoption_core::domain::{
    entities::{bamboo_plants::BambooPlantEntity, growth_records::InsertGrowthRecordEntity},
    repositories::{
        adoptions::AdoptionRepository, plants::PlantRepository, users::UserRepository,
    },
    value_objects::{
        enums::plant_statuses::PlantStatus,
        growth::{GrowthSnapshot, growth_at, timeline},
        plants::{GrowthOverviewDto, GrowthRecordDto},
    },
};
use chrono::{Duration, NaiveDate, NaiveTime, Utc};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum GrowthError {
    #[error("adoption {0} not found")]
    AdoptionNotFound(i32),
    #[error("plant not found")]
    PlantNotFound,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl GrowthError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            GrowthError::AdoptionNotFound(_) | GrowthError::PlantNotFound => StatusCode::NOT_FOUND,
            GrowthError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, GrowthError>;

pub struct GrowthUseCase {
    adoption_repo: Arc<dyn AdoptionRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
    plant_repo: Arc<dyn PlantRepository + Send + Sync>,
}

impl GrowthUseCase {
    pub fn new(
        adoption_repo: Arc<dyn AdoptionRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
        plant_repo: Arc<dyn PlantRepository + Send + Sync>,
    ) -> Self {
        Self {
            adoption_repo,
            user_repo,
            plant_repo,
        }
    }

    /// Current growth of the caller's adopted plant. The first view of a plant
    /// without simulated history backfills its weekly timeline.
    pub async fn growth_for_adoption(
        &self,
        clerk_id: &str,
        adoption_id: i32,
    ) -> UseCaseResult<GrowthOverviewDto> {
        let user = self
            .user_repo
            .find_by_clerk_id(clerk_id)
            .await?
            .ok_or(GrowthError::AdoptionNotFound(adoption_id))?;

        let adoption = self
            .adoption_repo
            .find_by_id(adoption_id)
            .await?
            .filter(|adoption| adoption.user_id == user.id)
            .ok_or(GrowthError::AdoptionNotFound(adoption_id))?;

        let plant_id = adoption.bamboo_plant_id.ok_or(GrowthError::PlantNotFound)?;
        let plant = self
            .plant_repo
            .find_by_id(plant_id)
            .await?
            .ok_or(GrowthError::PlantNotFound)?;

        let days = days_since_planting(plant.planted_at, Utc::now().date_naive());
        let current = growth_at(days);

        let mut records = self.plant_repo.list_growth_records(plant.id).await?;
        if days > 0 && !records.iter().any(|record| record.is_synthetic) {
            let backfill = timeline_records(&plant, days);
            let inserted = self
                .plant_repo
                .backfill_growth_records(plant.id, backfill)
                .await
                .map_err(|err| {
                    error!(plant_id = plant.id, db_error = ?err, "growth: failed to backfill timeline");
                    GrowthError::Internal(err)
                })?;
            if inserted > 0 {
                self.store_summary(plant.id, &current).await?;
                info!(plant_id = plant.id, days, inserted, "growth: timeline backfilled");
            }

            records = self.plant_repo.list_growth_records(plant.id).await?;
        }

        Ok(GrowthOverviewDto {
            adoption_id: adoption.id,
            plant_id: plant.id,
            plant_code: plant.code,
            species: plant.species,
            planted_at: plant.planted_at,
            days_since_planting: days,
            current,
            records: records.into_iter().map(GrowthRecordDto::from).collect(),
        })
    }

    /// Throws away the plant's simulated records and writes a fresh timeline.
    pub async fn regenerate_timeline(&self, plant_id: i32) -> UseCaseResult<usize> {
        let plant = self
            .plant_repo
            .find_by_id(plant_id)
            .await?
            .ok_or(GrowthError::PlantNotFound)?;

        let days = days_since_planting(plant.planted_at, Utc::now().date_naive());
        let written = self
            .plant_repo
            .replace_synthetic_growth_records(plant.id, timeline_records(&plant, days))
            .await?;
        self.store_summary(plant.id, &growth_at(days)).await?;

        info!(plant_id, days, written, "growth: timeline regenerated");
        Ok(written)
    }

    async fn store_summary(&self, plant_id: i32, snapshot: &GrowthSnapshot) -> UseCaseResult<()> {
        self.plant_repo
            .update_growth_summary(
                plant_id,
                snapshot.height,
                snapshot.co2_absorbed,
                PlantStatus::from_stage(snapshot.stage),
            )
            .await?;
        Ok(())
    }
}

fn days_since_planting(planted_at: NaiveDate, today: NaiveDate) -> i64 {
    (today - planted_at).num_days()
}

fn timeline_records(plant: &BambooPlantEntity, days: i64) -> Vec<InsertGrowthRecordEntity> {
    let planted = plant.planted_at.and_time(NaiveTime::default()).and_utc();

    timeline(days)
        .into_iter()
        .map(|entry| InsertGrowthRecordEntity {
            bamboo_plant_id: plant.id,
            recorded_at: planted + Duration::days(entry.day),
            height: entry.snapshot.height,
            diameter: entry.snapshot.diameter,
            notes: Some(entry.note),
            is_synthetic: true,
        })
        .collect()
}
