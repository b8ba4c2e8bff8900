use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::packages;

#[derive(Debug, Clone, PartialEq)]
pub struct PackageEntity {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i32,
    pub period: String,
    pub features: Vec<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

impl PackageEntity {
    /// Feature list in its stored JSON form.
    pub fn features_json(&self) -> String {
        serde_json::to_string(&self.features).unwrap_or_else(|_| "[]".to_string())
    }
}

/// Raw row used for Diesel queries. Features stay as JSON text and are parsed into a list.
#[derive(Debug, Clone, Identifiable, Selectable, Queryable)]
#[diesel(table_name = packages)]
pub struct PackageRow {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i32,
    pub period: String,
    pub features: String,
    pub is_active: bool,
    pub sort_order: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<PackageRow> for PackageEntity {
    fn from(value: PackageRow) -> Self {
        let features = serde_json::from_str(&value.features).unwrap_or_default();

        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            price_minor: value.price_minor,
            period: value.period,
            features,
            is_active: value.is_active,
            sort_order: value.sort_order,
        }
    }
}

#[derive(Debug, Clone, Insertable, PartialEq)]
#[diesel(table_name = packages)]
pub struct InsertPackageEntity {
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i32,
    pub period: String,
    pub features: String,
    pub is_active: bool,
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, AsChangeset, PartialEq)]
#[diesel(table_name = packages)]
pub struct UpdatePackageEntity {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub price_minor: Option<i32>,
    pub period: Option<String>,
    pub features: Option<String>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
    pub updated_at: Option<DateTime<Utc>>,
}
