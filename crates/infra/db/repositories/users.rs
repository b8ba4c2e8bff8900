use anyhow::Result;
use async_trait::async_trait;
use diesel::{
    OptionalExtension, RunQueryDsl,
    insert_into,
    prelude::*,
    result::{DatabaseErrorKind, Error as DieselError},
};
use std::sync::Arc;
use tracing::info;

use crate::{
    domain,
    infra::db::postgres::{postgres_connection::PgPoolSquad, schema::users},
};
use domain::{
    entities::users::{InsertUserEntity, UserEntity},
    repositories::users::UserRepository,
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn find_by_clerk_id(&self, clerk_id: &str) -> Result<Option<UserEntity>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let user = users::table
            .filter(users::clerk_id.eq(clerk_id))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?;

        Ok(user)
    }

    async fn find_or_create(&self, user: InsertUserEntity) -> Result<UserEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        if let Some(existing) = users::table
            .filter(users::clerk_id.eq(&user.clerk_id))
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?
        {
            return Ok(existing);
        }

        match insert_into(users::table)
            .values(&user)
            .returning(UserEntity::as_returning())
            .get_result::<UserEntity>(&mut conn)
        {
            Ok(created) => Ok(created),
            Err(DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                info!(
                    clerk_id = %user.clerk_id,
                    "users: concurrent insert detected, using existing row"
                );
                let existing = users::table
                    .filter(users::clerk_id.eq(&user.clerk_id))
                    .select(UserEntity::as_select())
                    .first::<UserEntity>(&mut conn)?;
                Ok(existing)
            }
            Err(err) => Err(err.into()),
        }
    }
}
