use adoption_core::{
    infra::db::{
        postgres::postgres_connection::PgPoolSquad,
        repositories::{
            adoptions::AdoptionPostgres, locations::LocationPostgres, packages::PackagePostgres,
            payments::PaymentPostgres, plants::PlantPostgres, users::UserPostgres,
        },
    },
    payments::toyyibpay_client::ToyyibPayClient,
};
use anyhow::Result;
use std::sync::Arc;

use crate::{
    config::config_model::ToyyibPay,
    usecases::{
        adoptions::AdoptionUseCase,
        catalog::CatalogUseCase,
        growth::GrowthUseCase,
        payments::{PaymentGateway, PaymentUseCase},
        reconciliation::ReconciliationUseCase,
        reference_resolver::ReferenceResolver,
    },
};

/// Use cases wired against Postgres and the live gateway. Shared by the HTTP
/// server and the reconciliation worker.
#[derive(Clone)]
pub struct UseCases {
    pub adoptions: Arc<AdoptionUseCase>,
    pub catalog: Arc<CatalogUseCase>,
    pub growth: Arc<GrowthUseCase>,
    pub payments: Arc<PaymentUseCase>,
    pub reconciliation: Arc<ReconciliationUseCase>,
}

impl UseCases {
    pub fn build(db_pool: Arc<PgPoolSquad>, toyyibpay: &ToyyibPay) -> Result<Self> {
        let gateway: Arc<dyn PaymentGateway> =
            Arc::new(ToyyibPayClient::new(toyyibpay.client_config()?)?);

        let payment_repository = Arc::new(PaymentPostgres::new(Arc::clone(&db_pool)));
        let adoption_repository = Arc::new(AdoptionPostgres::new(Arc::clone(&db_pool)));
        let user_repository = Arc::new(UserPostgres::new(Arc::clone(&db_pool)));
        let package_repository = Arc::new(PackagePostgres::new(Arc::clone(&db_pool)));
        let location_repository = Arc::new(LocationPostgres::new(Arc::clone(&db_pool)));
        let plant_repository = Arc::new(PlantPostgres::new(Arc::clone(&db_pool)));

        let resolver = Arc::new(ReferenceResolver::new(
            package_repository.clone(),
            location_repository.clone(),
        ));
        let reconciliation = Arc::new(ReconciliationUseCase::new(
            payment_repository.clone(),
            adoption_repository.clone(),
            user_repository.clone(),
            Arc::clone(&resolver),
        ));
        let payments = Arc::new(PaymentUseCase::new(
            payment_repository,
            resolver,
            gateway,
            Arc::clone(&reconciliation),
        ));

        Ok(Self {
            adoptions: Arc::new(AdoptionUseCase::new(
                adoption_repository.clone(),
                user_repository.clone(),
            )),
            catalog: Arc::new(CatalogUseCase::new(package_repository, location_repository)),
            growth: Arc::new(GrowthUseCase::new(
                adoption_repository,
                user_repository,
                plant_repository,
            )),
            payments,
            reconciliation,
        })
    }
}
