use anyhow::Result;
use adoption_core::domain::{
    entities::{locations::LocationEntity, packages::PackageEntity},
    repositories::{locations::LocationRepository, packages::PackageRepository},
    value_objects::references::ReferenceLookup,
};
use std::sync::Arc;
use tracing::debug;

/// Resolves the free-text package and location references stored on a payment.
/// A miss is `Ok(None)`; only storage failures are errors.
pub struct ReferenceResolver {
    package_repo: Arc<dyn PackageRepository + Send + Sync>,
    location_repo: Arc<dyn LocationRepository + Send + Sync>,
}

impl ReferenceResolver {
    pub fn new(
        package_repo: Arc<dyn PackageRepository + Send + Sync>,
        location_repo: Arc<dyn LocationRepository + Send + Sync>,
    ) -> Self {
        Self {
            package_repo,
            location_repo,
        }
    }

    /// Period keyword first, then numeric id.
    pub async fn resolve_package(&self, raw: &str) -> Result<Option<PackageEntity>> {
        for lookup in ReferenceLookup::candidates(raw) {
            let found = match &lookup {
                ReferenceLookup::ByName(period) => self.package_repo.find_by_period(period).await?,
                ReferenceLookup::ById(id) => self.package_repo.find_by_id(*id).await?,
            };

            if let Some(package) = found {
                debug!(%lookup, package_id = package.id, "reference_resolver: package resolved");
                return Ok(Some(package));
            }
        }

        debug!(raw, "reference_resolver: package reference did not resolve");
        Ok(None)
    }

    /// Exact name first, then numeric id.
    pub async fn resolve_location(&self, raw: &str) -> Result<Option<LocationEntity>> {
        for lookup in ReferenceLookup::candidates(raw) {
            let found = match &lookup {
                ReferenceLookup::ByName(name) => self.location_repo.find_by_name(name).await?,
                ReferenceLookup::ById(id) => self.location_repo.find_by_id(*id).await?,
            };

            if let Some(location) = found {
                debug!(%lookup, location_id = location.id, "reference_resolver: location resolved");
                return Ok(Some(location));
            }
        }

        debug!(raw, "reference_resolver: location reference did not resolve");
        Ok(None)
    }
}
