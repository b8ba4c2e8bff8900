use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::packages::{InsertPackageEntity, PackageEntity, UpdatePackageEntity};

#[automock]
#[async_trait]
pub trait PackageRepository {
    async fn find_by_id(&self, package_id: i32) -> Result<Option<PackageEntity>>;

    /// Exact match on the period keyword; active packages first, then by sort order.
    async fn find_by_period(&self, period: &str) -> Result<Option<PackageEntity>>;

    async fn list_active(&self) -> Result<Vec<PackageEntity>>;

    async fn insert(&self, package: InsertPackageEntity) -> Result<PackageEntity>;

    async fn update(
        &self,
        package_id: i32,
        changes: UpdatePackageEntity,
    ) -> Result<Option<PackageEntity>>;
}
