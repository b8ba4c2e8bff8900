use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::growth_records;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, PartialEq)]
#[diesel(table_name = growth_records)]
pub struct GrowthRecordEntity {
    pub id: i32,
    pub bamboo_plant_id: i32,
    pub recorded_at: DateTime<Utc>,
    pub height: f64,
    pub diameter: f64,
    pub notes: Option<String>,
    pub is_synthetic: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable, PartialEq)]
#[diesel(table_name = growth_records)]
pub struct InsertGrowthRecordEntity {
    pub bamboo_plant_id: i32,
    pub recorded_at: DateTime<Utc>,
    pub height: f64,
    pub diameter: f64,
    pub notes: Option<String>,
    pub is_synthetic: bool,
}
