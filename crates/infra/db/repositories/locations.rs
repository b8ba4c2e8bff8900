use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::domain;
use crate::infra::db::postgres::{postgres_connection::PgPoolSquad, schema::locations};
use domain::{
    entities::locations::{
        InsertLocationEntity, LocationEntity, LocationRow, UpdateLocationEntity,
    },
    repositories::locations::LocationRepository,
};

pub struct LocationPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl LocationPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl LocationRepository for LocationPostgres {
    async fn find_by_id(&self, location_id: i32) -> Result<Option<LocationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = locations::table
            .find(location_id)
            .select(LocationRow::as_select())
            .first::<LocationRow>(&mut conn)
            .optional()?;

        Ok(row.map(LocationEntity::from))
    }

    async fn find_by_name(&self, name: &str) -> Result<Option<LocationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = locations::table
            .filter(locations::name.eq(name))
            .select(LocationRow::as_select())
            .first::<LocationRow>(&mut conn)
            .optional()?;

        Ok(row.map(LocationEntity::from))
    }

    async fn list_active(&self) -> Result<Vec<LocationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = locations::table
            .filter(locations::is_active.eq(true))
            .order(locations::name.asc())
            .select(LocationRow::as_select())
            .load::<LocationRow>(&mut conn)?;

        Ok(rows.into_iter().map(LocationEntity::from).collect())
    }

    async fn insert(&self, location: InsertLocationEntity) -> Result<LocationEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = insert_into(locations::table)
            .values(&location)
            .returning(LocationRow::as_returning())
            .get_result::<LocationRow>(&mut conn)?;

        Ok(row.into())
    }

    async fn update(
        &self,
        location_id: i32,
        changes: UpdateLocationEntity,
    ) -> Result<Option<LocationEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = update(locations::table.find(location_id))
            .set(&changes)
            .returning(LocationRow::as_returning())
            .get_result::<LocationRow>(&mut conn)
            .optional()?;

        Ok(row.map(LocationEntity::from))
    }
}
