use chrono::{DateTime, Utc};
use diesel::prelude::*;

use crate::infra::db::postgres::schema::adoptions;

#[derive(Debug, Clone, Identifiable, Selectable, Queryable, PartialEq)]
#[diesel(table_name = adoptions)]
pub struct AdoptionEntity {
    pub id: i32,
    pub user_id: i32,
    pub package_id: Option<i32>,
    pub location_id: Option<i32>,
    pub bamboo_plant_id: Option<i32>,
    pub package_name: Option<String>,
    pub package_price_minor: Option<i32>,
    pub package_period: Option<String>,
    pub package_features: Option<String>,
    pub location_name: Option<String>,
    pub payment_reference_no: Option<String>,
    pub adopted_at: DateTime<Utc>,
    pub is_active: bool,
    pub certificate_issued: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Package and location fields are snapshots taken when the adoption is created.
#[derive(Debug, Clone, Insertable, PartialEq)]
#[diesel(table_name = adoptions)]
pub struct InsertAdoptionEntity {
    pub user_id: i32,
    pub package_id: Option<i32>,
    pub location_id: Option<i32>,
    pub bamboo_plant_id: Option<i32>,
    pub package_name: Option<String>,
    pub package_price_minor: Option<i32>,
    pub package_period: Option<String>,
    pub package_features: Option<String>,
    pub location_name: Option<String>,
    pub payment_reference_no: Option<String>,
    pub is_active: bool,
}
