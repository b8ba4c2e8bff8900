use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::adoptions::AdoptionEntity,
    value_objects::adoptions::{AdoptionCreation, AdoptionDraft},
};

#[automock]
#[async_trait]
pub trait AdoptionRepository {
    async fn find_by_payment_reference_no(
        &self,
        reference_no: &str,
    ) -> Result<Option<AdoptionEntity>>;

    /// Writes the whole draft atomically. A uniqueness clash on the payment
    /// reference comes back as [`AdoptionCreation::AlreadyExists`], not as an error.
    async fn create_from_draft(&self, draft: AdoptionDraft) -> Result<AdoptionCreation>;

    async fn find_by_id(&self, adoption_id: i32) -> Result<Option<AdoptionEntity>>;

    async fn list_by_user(&self, user_id: i32) -> Result<Vec<AdoptionEntity>>;

    async fn list_all(&self) -> Result<Vec<AdoptionEntity>>;

    async fn set_active(&self, adoption_id: i32, is_active: bool)
    -> Result<Option<AdoptionEntity>>;
}
