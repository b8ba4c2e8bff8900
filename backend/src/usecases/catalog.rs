use adoption_core::domain::{
    entities::{
        locations::{InsertLocationEntity, UpdateLocationEntity},
        packages::{InsertPackageEntity, UpdatePackageEntity},
    },
    repositories::{locations::LocationRepository, packages::PackageRepository},
    value_objects::{
        catalog::{
            CreateLocationRequest, CreatePackageRequest, LocationDto, PackageDto,
            UpdateLocationRequest, UpdatePackageRequest,
        },
        enums::package_periods::PackagePeriod,
    },
};
use chrono::Utc;
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("{0} not found")]
    NotFound(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl CatalogError {
    pub fn status_code(&self) -> axum::http::StatusCode {
        use axum::http::StatusCode;
        match self {
            CatalogError::NotFound(_) => StatusCode::NOT_FOUND,
            CatalogError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            CatalogError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

pub type UseCaseResult<T> = std::result::Result<T, CatalogError>;

pub struct CatalogUseCase {
    package_repo: Arc<dyn PackageRepository + Send + Sync>,
    location_repo: Arc<dyn LocationRepository + Send + Sync>,
}

impl CatalogUseCase {
    pub fn new(
        package_repo: Arc<dyn PackageRepository + Send + Sync>,
        location_repo: Arc<dyn LocationRepository + Send + Sync>,
    ) -> Self {
        Self {
            package_repo,
            location_repo,
        }
    }

    pub async fn list_packages(&self) -> UseCaseResult<Vec<PackageDto>> {
        let packages = self.package_repo.list_active().await.map_err(|err| {
            error!(db_error = ?err, "catalog: failed to list packages");
            CatalogError::Internal(err)
        })?;
        Ok(packages.into_iter().map(PackageDto::from).collect())
    }

    pub async fn list_locations(&self) -> UseCaseResult<Vec<LocationDto>> {
        let locations = self.location_repo.list_active().await.map_err(|err| {
            error!(db_error = ?err, "catalog: failed to list locations");
            CatalogError::Internal(err)
        })?;
        Ok(locations.into_iter().map(LocationDto::from).collect())
    }

    pub async fn create_package(&self, request: CreatePackageRequest) -> UseCaseResult<PackageDto> {
        let name = required_text("name", &request.name)?;
        let period = parse_period(&request.period)?;
        validate_price(request.price_minor)?;

        let package = self
            .package_repo
            .insert(InsertPackageEntity {
                name,
                description: request.description,
                price_minor: request.price_minor,
                period: period.to_string(),
                features: features_json(&request.features)?,
                is_active: request.is_active,
                sort_order: request.sort_order,
            })
            .await?;

        info!(package_id = package.id, period = %package.period, "catalog: package created");
        Ok(package.into())
    }

    pub async fn update_package(
        &self,
        package_id: i32,
        request: UpdatePackageRequest,
    ) -> UseCaseResult<PackageDto> {
        let name = request
            .name
            .as_deref()
            .map(|name| required_text("name", name))
            .transpose()?;
        let period = request
            .period
            .as_deref()
            .map(|period| parse_period(period).map(|p| p.to_string()))
            .transpose()?;
        if let Some(price_minor) = request.price_minor {
            validate_price(price_minor)?;
        }
        let features = request
            .features
            .as_deref()
            .map(features_json)
            .transpose()?;

        let changes = UpdatePackageEntity {
            name,
            description: request.description.map(Some),
            price_minor: request.price_minor,
            period,
            features,
            is_active: request.is_active,
            sort_order: request.sort_order,
            updated_at: Some(Utc::now()),
        };

        let package = self
            .package_repo
            .update(package_id, changes)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("package {package_id}")))?;

        info!(package_id, "catalog: package updated");
        Ok(package.into())
    }

    pub async fn create_location(
        &self,
        request: CreateLocationRequest,
    ) -> UseCaseResult<LocationDto> {
        let name = required_text("name", &request.name)?;
        let address = required_text("address", &request.address)?;
        validate_capacity(request.capacity)?;
        validate_coordinates(request.latitude, request.longitude)?;

        let location = self
            .location_repo
            .insert(InsertLocationEntity {
                name,
                address,
                latitude: request.latitude,
                longitude: request.longitude,
                capacity: request.capacity,
                features: features_json(&request.features)?,
                is_active: request.is_active,
            })
            .await?;

        info!(location_id = location.id, name = %location.name, "catalog: location created");
        Ok(location.into())
    }

    pub async fn update_location(
        &self,
        location_id: i32,
        request: UpdateLocationRequest,
    ) -> UseCaseResult<LocationDto> {
        let name = request
            .name
            .as_deref()
            .map(|name| required_text("name", name))
            .transpose()?;
        let address = request
            .address
            .as_deref()
            .map(|address| required_text("address", address))
            .transpose()?;
        if let Some(capacity) = request.capacity {
            validate_capacity(capacity)?;
        }
        if let (Some(latitude), Some(longitude)) = (request.latitude, request.longitude) {
            validate_coordinates(latitude, longitude)?;
        }
        let features = request
            .features
            .as_deref()
            .map(features_json)
            .transpose()?;

        let changes = UpdateLocationEntity {
            name,
            address,
            latitude: request.latitude,
            longitude: request.longitude,
            capacity: request.capacity,
            features,
            is_active: request.is_active,
            updated_at: Some(Utc::now()),
        };

        let location = self
            .location_repo
            .update(location_id, changes)
            .await?
            .ok_or_else(|| CatalogError::NotFound(format!("location {location_id}")))?;

        info!(location_id, "catalog: location updated");
        Ok(location.into())
    }
}

fn required_text(field: &str, value: &str) -> UseCaseResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(CatalogError::InvalidInput(format!("{field} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn parse_period(raw: &str) -> UseCaseResult<PackagePeriod> {
    PackagePeriod::from_str(raw.trim()).ok_or_else(|| {
        CatalogError::InvalidInput(format!(
            "period must be monthly, quarterly or yearly, got {raw:?}"
        ))
    })
}

fn validate_price(price_minor: i32) -> UseCaseResult<()> {
    if price_minor <= 0 {
        return Err(CatalogError::InvalidInput(
            "price must be greater than zero".to_string(),
        ));
    }
    Ok(())
}

fn validate_capacity(capacity: i32) -> UseCaseResult<()> {
    if capacity < 0 {
        return Err(CatalogError::InvalidInput(
            "capacity must not be negative".to_string(),
        ));
    }
    Ok(())
}

fn validate_coordinates(latitude: f64, longitude: f64) -> UseCaseResult<()> {
    if !(-90.0..=90.0).contains(&latitude) || !(-180.0..=180.0).contains(&longitude) {
        return Err(CatalogError::InvalidInput(
            "coordinates are out of range".to_string(),
        ));
    }
    Ok(())
}

fn features_json(features: &[String]) -> UseCaseResult<String> {
    serde_json::to_string(features).map_err(|err| CatalogError::Internal(err.into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use adoption_core::domain::{
        entities::{locations::LocationEntity, packages::PackageEntity},
        repositories::{locations::MockLocationRepository, packages::MockPackageRepository},
    };
    use mockall::predicate::eq;

    fn package_from(insert: InsertPackageEntity) -> PackageEntity {
        PackageEntity {
            id: 1,
            name: insert.name,
            description: insert.description,
            price_minor: insert.price_minor,
            period: insert.period,
            features: serde_json::from_str(&insert.features).unwrap(),
            is_active: insert.is_active,
            sort_order: insert.sort_order,
        }
    }

    fn usecase(
        package_repo: MockPackageRepository,
        location_repo: MockLocationRepository,
    ) -> CatalogUseCase {
        CatalogUseCase::new(Arc::new(package_repo), Arc::new(location_repo))
    }

    #[tokio::test]
    async fn create_package_normalises_input() {
        let mut package_repo = MockPackageRepository::new();
        package_repo
            .expect_insert()
            .times(1)
            .withf(|insert: &InsertPackageEntity| {
                insert.name == "Monthly Sprout"
                    && insert.period == "monthly"
                    && insert.features == r#"["Certificate","Photo updates"]"#
            })
            .returning(|insert| Ok(package_from(insert)));

        let package = usecase(package_repo, MockLocationRepository::new())
            .create_package(CreatePackageRequest {
                name: "  Monthly Sprout ".to_string(),
                description: None,
                price_minor: 3000,
                period: "monthly".to_string(),
                features: vec!["Certificate".to_string(), "Photo updates".to_string()],
                is_active: true,
                sort_order: 1,
            })
            .await
            .unwrap();

        assert_eq!(package.name, "Monthly Sprout");
        assert_eq!(package.features.len(), 2);
    }

    #[tokio::test]
    async fn unknown_period_is_rejected() {
        let mut package_repo = MockPackageRepository::new();
        package_repo.expect_insert().never();

        let err = usecase(package_repo, MockLocationRepository::new())
            .create_package(CreatePackageRequest {
                name: "Weekly".to_string(),
                description: None,
                price_minor: 500,
                period: "weekly".to_string(),
                features: Vec::new(),
                is_active: true,
                sort_order: 0,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn updating_missing_package_is_not_found() {
        let mut package_repo = MockPackageRepository::new();
        package_repo
            .expect_update()
            .with(eq(404), mockall::predicate::always())
            .returning(|_, _| Ok(None));

        let err = usecase(package_repo, MockLocationRepository::new())
            .update_package(
                404,
                UpdatePackageRequest {
                    is_active: Some(false),
                    ..UpdatePackageRequest::default()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::NotFound(_)));
        assert_eq!(err.status_code(), axum::http::StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn locations_report_remaining_capacity() {
        let mut location_repo = MockLocationRepository::new();
        location_repo.expect_list_active().returning(|| {
            Ok(vec![LocationEntity {
                id: 7,
                name: "Kebun Bambu Selatan".to_string(),
                address: "Jalan Bambu".to_string(),
                latitude: 3.1,
                longitude: 101.6,
                capacity: 50,
                current_count: 48,
                features: Vec::new(),
                is_active: true,
            }])
        });

        let locations = usecase(MockPackageRepository::new(), location_repo)
            .list_locations()
            .await
            .unwrap();

        assert_eq!(locations[0].remaining_capacity, 2);
    }

    #[tokio::test]
    async fn negative_capacity_is_rejected() {
        let mut location_repo = MockLocationRepository::new();
        location_repo.expect_insert().never();

        let err = usecase(MockPackageRepository::new(), location_repo)
            .create_location(CreateLocationRequest {
                name: "Hutan Utara".to_string(),
                address: "Jalan Utara".to_string(),
                latitude: 5.0,
                longitude: 100.3,
                capacity: -1,
                features: Vec::new(),
                is_active: true,
            })
            .await
            .unwrap_err();

        assert!(matches!(err, CatalogError::InvalidInput(_)));
    }
}
