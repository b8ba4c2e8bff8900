use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::locations;

#[derive(Debug, Clone, PartialEq)]
pub struct LocationEntity {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: i32,
    pub current_count: i32,
    pub features: Vec<String>,
    pub is_active: bool,
}

impl LocationEntity {
    pub fn remaining_capacity(&self) -> i32 {
        (self.capacity - self.current_count).max(0)
    }

    pub fn is_full(&self) -> bool {
        self.current_count >= self.capacity
    }
}

/// Raw row used for Diesel queries. Features stay as JSON text and are parsed into a list.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = locations)]
pub struct LocationRow {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: i32,
    pub current_count: i32,
    pub features: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LocationRow> for LocationEntity {
    fn from(value: LocationRow) -> Self {
        let features = serde_json::from_str(&value.features).unwrap_or_default();

        Self {
            id: value.id,
            name: value.name,
            address: value.address,
            latitude: value.latitude,
            longitude: value.longitude,
            capacity: value.capacity,
            current_count: value.current_count,
            features,
            is_active: value.is_active,
        }
    }
}

#[derive(Debug, Clone, Insertable, PartialEq)]
#[diesel(table_name = locations)]
pub struct InsertLocationEntity {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: i32,
    pub features: String,
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, AsChangeset, PartialEq)]
#[diesel(table_name = locations)]
pub struct UpdateLocationEntity {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity: Option<i32>,
    pub features: Option<String>,
    pub is_active: Option<bool>,
    pub updated_at: Option<DateTime<Utc>>,
}
