use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::{
        bamboo_plants::BambooPlantEntity,
        growth_records::{GrowthRecordEntity, InsertGrowthRecordEntity},
    },
    value_objects::enums::plant_statuses::PlantStatus,
};

#[automock]
#[async_trait]
pub trait PlantRepository {
    async fn find_by_id(&self, plant_id: i32) -> Result<Option<BambooPlantEntity>>;

    /// Ordered by `recorded_at` ascending.
    async fn list_growth_records(&self, plant_id: i32) -> Result<Vec<GrowthRecordEntity>>;

    /// Writes `records` only while the plant has no synthetic records, checked and
    /// written under a lock on the plant row. Returns 0 when another caller got there first.
    async fn backfill_growth_records(
        &self,
        plant_id: i32,
        records: Vec<InsertGrowthRecordEntity>,
    ) -> Result<usize>;

    /// Drops the plant's synthetic records and writes `records` in their place, atomically.
    async fn replace_synthetic_growth_records(
        &self,
        plant_id: i32,
        records: Vec<InsertGrowthRecordEntity>,
    ) -> Result<usize>;

    async fn update_growth_summary(
        &self,
        plant_id: i32,
        current_height: f64,
        co2_absorbed: f64,
        status: PlantStatus,
    ) -> Result<()>;
}
