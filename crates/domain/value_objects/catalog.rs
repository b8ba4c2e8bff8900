use serde::{Deserialize, Serialize};

use crate::domain::entities::{locations::LocationEntity, packages::PackageEntity};

#[derive(Debug, Serialize, PartialEq)]
pub struct PackageDto {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i32,
    pub period: String,
    pub features: Vec<String>,
    pub is_active: bool,
    pub sort_order: i32,
}

impl From<PackageEntity> for PackageDto {
    fn from(value: PackageEntity) -> Self {
        Self {
            id: value.id,
            name: value.name,
            description: value.description,
            price_minor: value.price_minor,
            period: value.period,
            features: value.features,
            is_active: value.is_active,
            sort_order: value.sort_order,
        }
    }
}

#[derive(Debug, Serialize, PartialEq)]
pub struct LocationDto {
    pub id: i32,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: i32,
    pub current_count: i32,
    pub remaining_capacity: i32,
    pub features: Vec<String>,
    pub is_active: bool,
}

impl From<LocationEntity> for LocationDto {
    fn from(value: LocationEntity) -> Self {
        Self {
            remaining_capacity: value.remaining_capacity(),
            id: value.id,
            name: value.name,
            address: value.address,
            latitude: value.latitude,
            longitude: value.longitude,
            capacity: value.capacity,
            current_count: value.current_count,
            features: value.features,
            is_active: value.is_active,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePackageRequest {
    pub name: String,
    pub description: Option<String>,
    pub price_minor: i32,
    pub period: String,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePackageRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price_minor: Option<i32>,
    pub period: Option<String>,
    pub features: Option<Vec<String>>,
    pub is_active: Option<bool>,
    pub sort_order: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateLocationRequest {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub capacity: i32,
    #[serde(default)]
    pub features: Vec<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateLocationRequest {
    pub name: Option<String>,
    pub address: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub capacity: Option<i32>,
    pub features: Option<Vec<String>>,
    pub is_active: Option<bool>,
}

fn default_true() -> bool {
    true
}
