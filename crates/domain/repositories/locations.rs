use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::locations::{
    InsertLocationEntity, LocationEntity, UpdateLocationEntity,
};

#[automock]
#[async_trait]
pub trait LocationRepository {
    async fn find_by_id(&self, location_id: i32) -> Result<Option<LocationEntity>>;

    async fn find_by_name(&self, name: &str) -> Result<Option<LocationEntity>>;

    async fn list_active(&self) -> Result<Vec<LocationEntity>>;

    async fn insert(&self, location: InsertLocationEntity) -> Result<LocationEntity>;

    async fn update(
        &self,
        location_id: i32,
        changes: UpdateLocationEntity,
    ) -> Result<Option<LocationEntity>>;
}
