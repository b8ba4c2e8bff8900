use chrono::NaiveDate;
use serde::Serialize;

use crate::domain::{
    entities::growth_records::GrowthRecordEntity, value_objects::growth::GrowthSnapshot,
};

#[derive(Debug, Serialize)]
pub struct GrowthRecordDto {
    pub recorded_at: chrono::DateTime<chrono::Utc>,
    pub height: f64,
    pub diameter: f64,
    pub notes: Option<String>,
}

impl From<GrowthRecordEntity> for GrowthRecordDto {
    fn from(value: GrowthRecordEntity) -> Self {
        Self {
            recorded_at: value.recorded_at,
            height: value.height,
            diameter: value.diameter,
            notes: value.notes,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct GrowthOverviewDto {
    pub adoption_id: i32,
    pub plant_id: i32,
    pub plant_code: String,
    pub species: String,
    pub planted_at: NaiveDate,
    pub days_since_planting: i64,
    pub current: GrowthSnapshot,
    pub records: Vec<GrowthRecordDto>,
}
