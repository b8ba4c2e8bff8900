use anyhow::Result;
use async_trait::async_trait;
use diesel::{OptionalExtension, RunQueryDsl, insert_into, prelude::*, update};
use std::sync::Arc;

use crate::domain;
use crate::infra::db::postgres::{postgres_connection::PgPoolSquad, schema::packages};
use domain::{
    entities::packages::{InsertPackageEntity, PackageEntity, PackageRow, UpdatePackageEntity},
    repositories::packages::PackageRepository,
};

pub struct PackagePostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl PackagePostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl PackageRepository for PackagePostgres {
    async fn find_by_id(&self, package_id: i32) -> Result<Option<PackageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = packages::table
            .find(package_id)
            .select(PackageRow::as_select())
            .first::<PackageRow>(&mut conn)
            .optional()?;

        Ok(row.map(PackageEntity::from))
    }

    async fn find_by_period(&self, period: &str) -> Result<Option<PackageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = packages::table
            .filter(packages::period.eq(period))
            .order((
                packages::is_active.desc(),
                packages::sort_order.asc(),
                packages::id.asc(),
            ))
            .select(PackageRow::as_select())
            .first::<PackageRow>(&mut conn)
            .optional()?;

        Ok(row.map(PackageEntity::from))
    }

    async fn list_active(&self) -> Result<Vec<PackageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = packages::table
            .filter(packages::is_active.eq(true))
            .order((packages::sort_order.asc(), packages::id.asc()))
            .select(PackageRow::as_select())
            .load::<PackageRow>(&mut conn)?;

        Ok(rows.into_iter().map(PackageEntity::from).collect())
    }

    async fn insert(&self, package: InsertPackageEntity) -> Result<PackageEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = insert_into(packages::table)
            .values(&package)
            .returning(PackageRow::as_returning())
            .get_result::<PackageRow>(&mut conn)?;

        Ok(row.into())
    }

    async fn update(
        &self,
        package_id: i32,
        changes: UpdatePackageEntity,
    ) -> Result<Option<PackageEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let row = update(packages::table.find(package_id))
            .set(&changes)
            .returning(PackageRow::as_returning())
            .get_result::<PackageRow>(&mut conn)
            .optional()?;

        Ok(row.map(PackageEntity::from))
    }
}
