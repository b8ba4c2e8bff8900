use anyhow::Result;
use async_trait::async_trait;
use chrono::Utc;
use diesel::{
    Connection, OptionalExtension, RunQueryDsl,
    insert_into,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
    update,
};
use std::sync::Arc;
use tracing::info;

use crate::domain;
use crate::infra::db::postgres::{
    postgres_connection::PgPoolSquad,
    schema::{adoptions, bamboo_plants, environmental_data, growth_records, locations},
};
use domain::{
    entities::{
        adoptions::AdoptionEntity, environmental_data::InsertEnvironmentalDataEntity,
        growth_records::InsertGrowthRecordEntity,
    },
    repositories::adoptions::AdoptionRepository,
    value_objects::adoptions::{AdoptionCreation, AdoptionDraft},
};

pub struct AdoptionPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl AdoptionPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl AdoptionRepository for AdoptionPostgres {
    async fn find_by_payment_reference_no(
        &self,
        reference_no: &str,
    ) -> Result<Option<AdoptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let adoption = adoptions::table
            .filter(adoptions::payment_reference_no.eq(reference_no))
            .select(AdoptionEntity::as_select())
            .first::<AdoptionEntity>(&mut conn)
            .optional()?;

        Ok(adoption)
    }

    async fn create_from_draft(&self, draft: AdoptionDraft) -> Result<AdoptionCreation> {
        let mut conn = Arc::clone(&self.db_pool).get()?;
        let reference_no = draft.adoption.payment_reference_no.clone();

        let result = conn.transaction::<AdoptionEntity, DieselError, _>(|tx| {
            let plant_id: i32 = insert_into(bamboo_plants::table)
                .values(&draft.plant)
                .returning(bamboo_plants::id)
                .get_result::<i32>(tx)?;

            let mut adoption = draft.adoption;
            adoption.bamboo_plant_id = Some(plant_id);
            let created = insert_into(adoptions::table)
                .values(&adoption)
                .returning(AdoptionEntity::as_returning())
                .get_result::<AdoptionEntity>(tx)?;

            if let Some(location_id) = created.location_id {
                update(locations::table.find(location_id))
                    .set((
                        locations::current_count.eq(locations::current_count + 1),
                        locations::updated_at.eq(Utc::now()),
                    ))
                    .execute(tx)?;
            }

            insert_into(growth_records::table)
                .values(&InsertGrowthRecordEntity {
                    bamboo_plant_id: plant_id,
                    recorded_at: draft.initial_growth.recorded_at,
                    height: draft.initial_growth.height,
                    diameter: draft.initial_growth.diameter,
                    notes: draft.initial_growth.notes,
                    is_synthetic: false,
                })
                .execute(tx)?;

            insert_into(environmental_data::table)
                .values(&InsertEnvironmentalDataEntity {
                    bamboo_plant_id: plant_id,
                    temperature: draft.environment.temperature,
                    humidity: draft.environment.humidity,
                    soil_moisture: draft.environment.soil_moisture,
                    soil_ph: draft.environment.soil_ph,
                    rainfall: draft.environment.rainfall,
                })
                .execute(tx)?;

            Ok(created)
        });

        match result {
            Ok(created) => Ok(AdoptionCreation::Created(created)),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, details)) => {
                let Some(reference_no) = reference_no else {
                    anyhow::bail!("adoption insert violated a unique constraint: {}", details.message());
                };

                // The transaction rolled back; whoever committed first owns this payment.
                let existing = adoptions::table
                    .filter(adoptions::payment_reference_no.eq(&reference_no))
                    .select(AdoptionEntity::as_select())
                    .first::<AdoptionEntity>(&mut conn)
                    .optional()?;

                match existing {
                    Some(existing) => {
                        info!(
                            %reference_no,
                            adoption_id = existing.id,
                            "adoptions: lost insert race, returning existing adoption"
                        );
                        Ok(AdoptionCreation::AlreadyExists(existing))
                    }
                    None => anyhow::bail!(
                        "adoption insert for {} violated a unique constraint: {}",
                        reference_no,
                        details.message()
                    ),
                }
            }
            Err(err) => Err(err.into()),
        }
    }

    async fn find_by_id(&self, adoption_id: i32) -> Result<Option<AdoptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let adoption = adoptions::table
            .find(adoption_id)
            .select(AdoptionEntity::as_select())
            .first::<AdoptionEntity>(&mut conn)
            .optional()?;

        Ok(adoption)
    }

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<AdoptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = adoptions::table
            .filter(adoptions::user_id.eq(user_id))
            .order(adoptions::adopted_at.desc())
            .select(AdoptionEntity::as_select())
            .load::<AdoptionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn list_all(&self) -> Result<Vec<AdoptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let results = adoptions::table
            .order(adoptions::adopted_at.desc())
            .select(AdoptionEntity::as_select())
            .load::<AdoptionEntity>(&mut conn)?;

        Ok(results)
    }

    async fn set_active(
        &self,
        adoption_id: i32,
        is_active: bool,
    ) -> Result<Option<AdoptionEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let updated = update(adoptions::table.find(adoption_id))
            .set((
                adoptions::is_active.eq(is_active),
                adoptions::updated_at.eq(Utc::now()),
            ))
            .returning(AdoptionEntity::as_returning())
            .get_result::<AdoptionEntity>(&mut conn)
            .optional()?;

        Ok(updated)
    }
}
