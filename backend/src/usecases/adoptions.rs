use adoption_core::domain::{
    repositories::{adoptions::AdoptionRepository, users::UserRepository},
    value_objects::adoptions::AdoptionDto,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum AdoptionError {
    #[error("adoption {0} not found")]
    NotFound(i32),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl AdoptionError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            AdoptionError::NotFound(_) => StatusCode::NOT_FOUND,
            AdoptionError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, AdoptionError>;

pub struct AdoptionUseCase {
    adoption_repo: Arc<dyn AdoptionRepository + Send + Sync>,
    user_repo: Arc<dyn UserRepository + Send + Sync>,
}

impl AdoptionUseCase {
    pub fn new(
        adoption_repo: Arc<dyn AdoptionRepository + Send + Sync>,
        user_repo: Arc<dyn UserRepository + Send + Sync>,
    ) -> Self {
        Self {
            adoption_repo,
            user_repo,
        }
    }

    /// A caller with no local user row simply has no adoptions yet.
    pub async fn list_for_user(&self, clerk_id: &str) -> UseCaseResult<Vec<AdoptionDto>> {
        let Some(user) = self.user_repo.find_by_clerk_id(clerk_id).await? else {
            return Ok(Vec::new());
        };

        let adoptions = self
            .adoption_repo
            .list_by_user(user.id)
            .await
            .map_err(|err| {
                error!(user_id = user.id, db_error = ?err, "adoptions: failed to list user adoptions");
                AdoptionError::Internal(err)
            })?;

        Ok(adoptions.into_iter().map(AdoptionDto::from).collect())
    }

    pub async fn list_all(&self) -> UseCaseResult<Vec<AdoptionDto>> {
        let adoptions = self.adoption_repo.list_all().await?;
        Ok(adoptions.into_iter().map(AdoptionDto::from).collect())
    }

    /// Soft enable/disable; adoptions are never deleted.
    pub async fn set_active(&self, adoption_id: i32, is_active: bool) -> UseCaseResult<AdoptionDto> {
        let adoption = self
            .adoption_repo
            .set_active(adoption_id, is_active)
            .await?
            .ok_or(AdoptionError::NotFound(adoption_id))?;

        info!(adoption_id, is_active, "adoptions: active flag changed");
        Ok(adoption.into())
    }
}
