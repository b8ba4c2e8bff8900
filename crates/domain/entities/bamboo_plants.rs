use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::bamboo_plants;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, PartialEq)]
#[diesel(table_name = bamboo_plants)]
pub struct BambooPlantEntity {
    pub id: i32,
    pub code: String,
    pub species: String,
    pub location_id: Option<i32>,
    pub planted_at: NaiveDate,
    pub current_height: f64,
    pub co2_absorbed: f64,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, PartialEq)]
#[diesel(table_name = bamboo_plants)]
pub struct InsertBambooPlantEntity {
    pub code: String,
    pub species: String,
    pub location_id: Option<i32>,
    pub planted_at: NaiveDate,
    pub current_height: f64,
    pub co2_absorbed: f64,
    pub status: String,
}
