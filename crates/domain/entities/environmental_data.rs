use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::environmental_data;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, PartialEq)]
#[diesel(table_name = environmental_data)]
pub struct EnvironmentalDataEntity {
    pub id: i32,
    pub bamboo_plant_id: i32,
    pub recorded_at: DateTime<Utc>,
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
    pub soil_ph: f64,
    pub rainfall: f64,
}

#[derive(Debug, Clone, Insertable, PartialEq)]
#[diesel(table_name = environmental_data)]
pub struct InsertEnvironmentalDataEntity {
    pub bamboo_plant_id: i32,
    pub temperature: f64,
    pub humidity: f64,
    pub soil_moisture: f64,
    pub soil_ph: f64,
    pub rainfall: f64,
}
