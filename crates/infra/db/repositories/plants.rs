use anyhow::Result;
use async_trait::async_trait;
use diesel::{
    Connection, OptionalExtension, RunQueryDsl, delete, dsl::exists, insert_into, prelude::*,
    select, update,
};
use std::sync::Arc;

use crate::domain;
use crate::infra::db::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{bamboo_plants, growth_records},
};
use domain::{
    entities::{
        bamboo_plants::BambooPlantEntity,
        growth_records::{GrowthRecordEntity, InsertGrowthRecordEntity},
    },
    repositories::plants::PlantRepository,
    value_objects::enums::plant_statuses::PlantStatus,
};

pub struct PlantPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PlantPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PlantRepository for PlantPostgres {
    async fn find_by_id(&self, plant_id: i32) -> Result<Option<BambooPlantEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let plant = bamboo_plants::table
            .find(plant_id)
            .select(BambooPlantEntity::as_select())
            .first::<BambooPlantEntity>(&mut conn)
            .optional()?;

        Ok(plant)
    }

    async fn list_growth_records(&self, plant_id: i32) -> Result<Vec<GrowthRecordEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let records = growth_records::table
            .filter(growth_records::bamboo_plant_id.eq(plant_id))
            .order((growth_records::recorded_at.asc(), growth_records::id.asc()))
            .select(GrowthRecordEntity::as_select())
            .load::<GrowthRecordEntity>(&mut conn)?;

        Ok(records)
    }

    async fn backfill_growth_records(
        &self,
        plant_id: i32,
        records: Vec<InsertGrowthRecordEntity>,
    ) -> Result<usize> {
        if records.is_empty() {
            return Ok(0);
        }
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = conn.transaction::<usize, diesel::result::Error, _>(|tx| {
            // Concurrent first views queue up here until the winner commits.
            bamboo_plants::table
                .find(plant_id)
                .select(bamboo_plants::id)
                .for_update()
                .first::<i32>(tx)?;

            let already_backfilled = select(exists(
                growth_records::table
                    .filter(growth_records::bamboo_plant_id.eq(plant_id))
                    .filter(growth_records::is_synthetic.eq(true)),
            ))
            .get_result::<bool>(tx)?;
            if already_backfilled {
                return Ok(0);
            }

            insert_into(growth_records::table)
                .values(&records)
                .execute(tx)
        })?;

        Ok(inserted)
    }

    async fn replace_synthetic_growth_records(
        &self,
        plant_id: i32,
        records: Vec<InsertGrowthRecordEntity>,
    ) -> Result<usize> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let inserted = conn.transaction::<usize, diesel::result::Error, _>(|tx| {
            delete(
                growth_records::table
                    .filter(growth_records::bamboo_plant_id.eq(plant_id))
                    .filter(growth_records::is_synthetic.eq(true)),
            )
            .execute(tx)?;

            if records.is_empty() {
                return Ok(0);
            }

            insert_into(growth_records::table)
                .values(&records)
                .execute(tx)
        })?;

        Ok(inserted)
    }

    async fn update_growth_summary(
        &self,
        plant_id: i32,
        current_height: f64,
        co2_absorbed: f64,
        status: PlantStatus,
    ) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        update(bamboo_plants::table.find(plant_id))
            .set((
                bamboo_plants::current_height.eq(current_height),
                bamboo_plants::co2_absorbed.eq(co2_absorbed),
                bamboo_plants::status.eq(status.to_string()),
            ))
            .execute(&mut conn)?;

        Ok(())
    }
}
