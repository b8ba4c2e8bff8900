use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::entities::users::{InsertUserEntity, UserEntity};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn find_by_clerk_id(&self, clerk_id: &str) -> Result<Option<UserEntity>>;

    /// Lookup-then-insert keyed on `clerk_id`; a concurrent insert of the same
    /// subject resolves to the row that won.
    async fn find_or_create(&self, user: InsertUserEntity) -> Result<UserEntity>;
}
