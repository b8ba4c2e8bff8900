//! Reconciliation and payment flows run end to end against the in-memory store.

use adoption_core::domain::value_objects::{
    adoptions::ReconciliationOutcome,
    enums::payment_statuses::PaymentStatus,
    payments::{GatewayCallbackForm, GatewayReturnQuery, PayerInfo},
};
use std::sync::Arc;

use crate::usecases::{
    growth::GrowthUseCase,
    in_memory::{InMemoryStore, ScriptedGateway},
    payments::PaymentUseCase,
    reconciliation::ReconciliationUseCase,
    reference_resolver::ReferenceResolver,
};

fn reconciliation(store: &Arc<InMemoryStore>) -> Arc<ReconciliationUseCase> {
    let resolver = Arc::new(ReferenceResolver::new(store.clone(), store.clone()));
    Arc::new(ReconciliationUseCase::new(
        store.clone(),
        store.clone(),
        store.clone(),
        resolver,
    ))
}

fn payments(store: &Arc<InMemoryStore>, gateway: Arc<ScriptedGateway>) -> PaymentUseCase {
    let resolver = Arc::new(ReferenceResolver::new(store.clone(), store.clone()));
    PaymentUseCase::new(store.clone(), resolver, gateway, reconciliation(store))
}

fn materialized(outcome: ReconciliationOutcome) -> (i32, bool) {
    match outcome {
        ReconciliationOutcome::Materialized {
            adoption,
            newly_created,
        } => (adoption.id, newly_created),
        other => panic!("expected an adoption, got {other:?}"),
    }
}

#[tokio::test]
async fn repeated_triggers_create_one_adoption() {
    let store = InMemoryStore::new();
    store.seed_package("Quarterly", "quarterly", 9000);
    let location = store.seed_location("Kebun Bambu Selatan", 10);
    store.seed_payment("BMB1", PaymentStatus::Success, "quarterly", "Kebun Bambu Selatan");
    let usecase = reconciliation(&store);

    let (first_id, first_new) = materialized(usecase.ensure_adoption_for_payment("BMB1").await.unwrap());
    assert!(first_new);

    for _ in 0..4 {
        let (id, newly_created) =
            materialized(usecase.ensure_adoption_for_payment("BMB1").await.unwrap());
        assert_eq!(id, first_id);
        assert!(!newly_created);
    }

    let state = store.state();
    assert_eq!(state.adoptions.len(), 1);
    assert_eq!(state.plants.len(), 1);
    assert_eq!(state.growth_records.len(), 1);
    assert_eq!(state.environment_rows, 1);
    drop(state);
    assert_eq!(store.location(location.id).unwrap().current_count, 1);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn concurrent_triggers_agree_on_one_adoption() {
    let store = InMemoryStore::new();
    store.seed_package("Monthly", "monthly", 3000);
    let location = store.seed_location("Hutan Utara", 5);
    store.seed_payment("BMB2", PaymentStatus::Success, "monthly", "Hutan Utara");
    let usecase = reconciliation(&store);

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let usecase = Arc::clone(&usecase);
            tokio::spawn(async move { usecase.ensure_adoption_for_payment("BMB2").await })
        })
        .collect();

    let mut results = Vec::new();
    for handle in handles {
        results.push(materialized(handle.await.unwrap().unwrap()));
    }

    let first_id = results[0].0;
    assert!(results.iter().all(|(id, _)| *id == first_id));
    assert_eq!(results.iter().filter(|(_, newly_created)| *newly_created).count(), 1);
    assert_eq!(store.state().adoptions.len(), 1);
    assert_eq!(store.state().plants.len(), 1);
    assert_eq!(store.location(location.id).unwrap().current_count, 1);
}

#[tokio::test]
async fn unsettled_payments_create_nothing() {
    let store = InMemoryStore::new();
    store.seed_location("Kebun Bambu Selatan", 10);
    store.seed_payment("BMB3", PaymentStatus::Pending, "monthly", "Kebun Bambu Selatan");
    store.seed_payment("BMB4", PaymentStatus::Failed, "monthly", "Kebun Bambu Selatan");
    let usecase = reconciliation(&store);

    let pending = usecase.ensure_adoption_for_payment("BMB3").await.unwrap();
    assert_eq!(
        pending,
        ReconciliationOutcome::NotPayable {
            status: PaymentStatus::Pending
        }
    );
    let failed = usecase.ensure_adoption_for_payment("BMB4").await.unwrap();
    assert!(failed.adoption().is_none());

    let state = store.state();
    assert!(state.adoptions.is_empty());
    assert!(state.plants.is_empty());
    assert!(state.users.is_empty());
}

#[tokio::test]
async fn package_references_resolve_by_keyword_id_or_not_at_all() {
    let store = InMemoryStore::new();
    let monthly = store.seed_package("Monthly", "monthly", 3000);
    let yearly = store.seed_package("Yearly", "yearly", 30000);
    store.seed_location("Kebun Bambu Selatan", 10);
    store.seed_payment("BMB5", PaymentStatus::Success, "monthly", "Kebun Bambu Selatan");
    store.seed_payment(
        "BMB6",
        PaymentStatus::Success,
        &yearly.id.to_string(),
        "Kebun Bambu Selatan",
    );
    store.seed_payment("BMB7", PaymentStatus::Success, "nonexistent", "Kebun Bambu Selatan");
    let usecase = reconciliation(&store);

    let by_keyword = usecase.ensure_adoption_for_payment("BMB5").await.unwrap();
    assert_eq!(by_keyword.adoption().unwrap().package_id, Some(monthly.id));
    assert_eq!(
        by_keyword.adoption().unwrap().package_price_minor,
        Some(monthly.price_minor)
    );

    let by_id = usecase.ensure_adoption_for_payment("BMB6").await.unwrap();
    assert_eq!(by_id.adoption().unwrap().package_id, Some(yearly.id));

    let unresolved = usecase.ensure_adoption_for_payment("BMB7").await.unwrap();
    let adoption = unresolved.adoption().unwrap();
    assert_eq!(adoption.package_id, None);
    assert_eq!(adoption.package_price_minor, Some(9000));
    assert_eq!(adoption.package_period.as_deref(), Some("nonexistent"));
}

#[tokio::test]
async fn each_adoption_takes_one_spot_at_its_location() {
    let store = InMemoryStore::new();
    store.seed_package("Monthly", "monthly", 3000);
    let location = store.seed_location("Kebun Bambu Selatan", 10);
    let usecase = reconciliation(&store);

    for reference_no in ["BMB10", "BMB11", "BMB12"] {
        store.seed_payment(reference_no, PaymentStatus::Success, "monthly", &location.id.to_string());
        usecase.ensure_adoption_for_payment(reference_no).await.unwrap();
        usecase.ensure_adoption_for_payment(reference_no).await.unwrap();
    }

    assert_eq!(store.location(location.id).unwrap().current_count, 3);
    assert_eq!(store.state().plants.len(), 3);
}

#[tokio::test]
async fn failed_write_leaves_nothing_and_retry_succeeds() {
    let store = InMemoryStore::new();
    store.seed_package("Monthly", "monthly", 3000);
    let location = store.seed_location("Kebun Bambu Selatan", 10);
    store.seed_payment("BMB13", PaymentStatus::Success, "monthly", "Kebun Bambu Selatan");
    store.state().fail_next_draft = true;
    let usecase = reconciliation(&store);

    assert!(usecase.ensure_adoption_for_payment("BMB13").await.is_err());
    assert!(store.state().adoptions.is_empty());
    assert!(store.state().plants.is_empty());
    assert_eq!(store.location(location.id).unwrap().current_count, 0);

    let (_, newly_created) = materialized(usecase.ensure_adoption_for_payment("BMB13").await.unwrap());
    assert!(newly_created);
    assert_eq!(store.location(location.id).unwrap().current_count, 1);
}

#[tokio::test]
async fn sweep_picks_up_settled_payments_without_adoptions() {
    let store = InMemoryStore::new();
    store.seed_package("Monthly", "monthly", 3000);
    store.seed_location("Kebun Bambu Selatan", 10);
    store.seed_payment("BMB20", PaymentStatus::Success, "monthly", "Kebun Bambu Selatan");
    store.seed_payment("BMB21", PaymentStatus::Success, "monthly", "Kebun Bambu Selatan");
    store.seed_payment("BMB22", PaymentStatus::Pending, "monthly", "Kebun Bambu Selatan");
    let usecase = reconciliation(&store);
    usecase.ensure_adoption_for_payment("BMB20").await.unwrap();

    let report = usecase.sync_missing_adoptions(50).await.unwrap();
    assert_eq!(report.scanned, 1);
    assert_eq!(report.created, 1);
    assert!(report.failed.is_empty());

    let again = usecase.sync_missing_adoptions(50).await.unwrap();
    assert_eq!(again.scanned, 0);
    assert_eq!(store.state().adoptions.len(), 2);
}

#[tokio::test]
async fn paid_quarterly_adoption_end_to_end() {
    let store = InMemoryStore::new();
    store.seed_package("Quarterly", "quarterly", 9000);
    let location = store.seed_location("Kebun Bambu Selatan", 10);
    let gateway = Arc::new(ScriptedGateway::default());
    let usecase = payments(&store, Arc::clone(&gateway));

    let created = usecase
        .create_payment(
            PayerInfo {
                clerk_id: "user_siti".to_string(),
                name: "Siti Aminah".to_string(),
                email: "siti@example.my".to_string(),
                phone: "0123456789".to_string(),
            },
            "quarterly",
            "Kebun Bambu Selatan",
        )
        .await
        .unwrap();
    assert_eq!(created.amount_minor, 9000);
    assert_eq!(gateway.created_bills().len(), 1);

    let pending = usecase
        .poll_status("user_siti", &created.reference_no)
        .await
        .unwrap();
    assert_eq!(pending.status, PaymentStatus::Pending);
    assert!(store.state().adoptions.is_empty());

    gateway.settle(&created.bill_code, PaymentStatus::Success);
    let settled = usecase
        .poll_status("user_siti", &created.reference_no)
        .await
        .unwrap();
    assert_eq!(settled.status, PaymentStatus::Success);
    let adoption_id = settled.adoption_id.unwrap();

    let callback = usecase
        .handle_callback(GatewayCallbackForm {
            refno: Some("TP-1".to_string()),
            status: "1".to_string(),
            reason: None,
            billcode: Some(created.bill_code.clone()),
            order_id: created.reference_no.clone(),
            amount: Some("90.00".to_string()),
            transaction_time: None,
        })
        .await
        .unwrap();
    assert_eq!(callback.adoption_id, Some(adoption_id));

    let state = store.state();
    assert_eq!(state.adoptions.len(), 1);
    let adoption = &state.adoptions[0];
    assert_eq!(adoption.package_period.as_deref(), Some("quarterly"));
    assert_eq!(adoption.package_price_minor, Some(9000));
    assert_eq!(adoption.location_name.as_deref(), Some("Kebun Bambu Selatan"));
    assert_eq!(adoption.location_id, Some(location.id));
    assert_eq!(state.users.len(), 1);
    drop(state);
    assert_eq!(store.location(location.id).unwrap().current_count, 1);
}

#[tokio::test]
async fn repeated_return_visits_adopt_once() {
    let store = InMemoryStore::new();
    store.seed_package("Yearly", "yearly", 30000);
    let location = store.seed_location("Kebun Bambu Selatan", 10);
    let gateway = Arc::new(ScriptedGateway::default());
    let usecase = payments(&store, Arc::clone(&gateway));

    let created = usecase
        .create_payment(
            PayerInfo {
                clerk_id: "user_siti".to_string(),
                name: "Siti Aminah".to_string(),
                email: "siti@example.my".to_string(),
                phone: "0123456789".to_string(),
            },
            "yearly",
            "Kebun Bambu Selatan",
        )
        .await
        .unwrap();
    gateway.settle(&created.bill_code, PaymentStatus::Success);

    let return_visit = || GatewayReturnQuery {
        status_id: Some("1".to_string()),
        billcode: Some(created.bill_code.clone()),
        order_id: created.reference_no.clone(),
        msg: Some("ok".to_string()),
        transaction_id: None,
    };

    let first = usecase.confirm_return(return_visit()).await.unwrap();
    assert_eq!(first.status, PaymentStatus::Success);
    let adoption_id = first.adoption_id.unwrap();

    let second = usecase.confirm_return(return_visit()).await.unwrap();
    assert_eq!(second.adoption_id, Some(adoption_id));

    assert_eq!(store.state().adoptions.len(), 1);
    assert_eq!(store.location(location.id).unwrap().current_count, 1);
}

#[tokio::test]
async fn cancelled_payment_is_never_adopted() {
    let store = InMemoryStore::new();
    store.seed_package("Monthly", "monthly", 3000);
    store.seed_location("Kebun Bambu Selatan", 10);
    let gateway = Arc::new(ScriptedGateway::default());
    let usecase = payments(&store, Arc::clone(&gateway));

    let created = usecase
        .create_payment(
            PayerInfo {
                clerk_id: "user_siti".to_string(),
                name: "Siti Aminah".to_string(),
                email: "siti@example.my".to_string(),
                phone: "0123456789".to_string(),
            },
            "monthly",
            "Kebun Bambu Selatan",
        )
        .await
        .unwrap();

    let cancelled = usecase
        .cancel_payment("user_siti", &created.reference_no)
        .await
        .unwrap();
    assert_eq!(cancelled.status, PaymentStatus::Cancelled);

    gateway.settle(&created.bill_code, PaymentStatus::Success);
    let polled = usecase
        .poll_status("user_siti", &created.reference_no)
        .await
        .unwrap();
    assert_eq!(polled.status, PaymentStatus::Cancelled);
    assert!(store.state().adoptions.is_empty());
}

#[tokio::test]
async fn first_growth_view_backfills_the_timeline_once() {
    let store = InMemoryStore::new();
    store.seed_package("Monthly", "monthly", 3000);
    store.seed_location("Kebun Bambu Selatan", 10);
    store.seed_payment("BMB30", PaymentStatus::Success, "monthly", "Kebun Bambu Selatan");
    let outcome = reconciliation(&store)
        .ensure_adoption_for_payment("BMB30")
        .await
        .unwrap();
    let adoption = outcome.adoption().unwrap().clone();

    // Planted 23 days ago.
    {
        let mut state = store.state();
        let plant = state
            .plants
            .iter_mut()
            .find(|plant| Some(plant.id) == adoption.bamboo_plant_id)
            .unwrap();
        plant.planted_at = chrono::Utc::now().date_naive() - chrono::Duration::days(23);
    }

    let growth = GrowthUseCase::new(store.clone(), store.clone(), store.clone());
    let first = growth
        .growth_for_adoption("user_siti", adoption.id)
        .await
        .unwrap();
    assert_eq!(first.days_since_planting, 23);
    // Seed record plus days 7, 14, 21 and 23.
    assert_eq!(first.records.len(), 5);

    let second = growth
        .growth_for_adoption("user_siti", adoption.id)
        .await
        .unwrap();
    assert_eq!(second.records.len(), 5);

    assert!(matches!(
        growth.growth_for_adoption("someone_else", adoption.id).await,
        Err(crate::usecases::growth::GrowthError::AdoptionNotFound(_))
    ));
}

#[tokio::test]
async fn concurrent_first_views_backfill_one_timeline() {
    let store = InMemoryStore::new();
    store.seed_package("Monthly", "monthly", 3000);
    store.seed_location("Kebun Bambu Selatan", 10);
    store.seed_payment("BMB31", PaymentStatus::Success, "monthly", "Kebun Bambu Selatan");
    let adoption = reconciliation(&store)
        .ensure_adoption_for_payment("BMB31")
        .await
        .unwrap()
        .adoption()
        .unwrap()
        .clone();
    let plant_id = adoption.bamboo_plant_id.unwrap();
    {
        let mut state = store.state();
        let plant = state
            .plants
            .iter_mut()
            .find(|plant| plant.id == plant_id)
            .unwrap();
        plant.planted_at = chrono::Utc::now().date_naive() - chrono::Duration::days(23);
    }

    let growth = GrowthUseCase::new(store.clone(), store.clone(), store.clone());
    let (first, second) = tokio::join!(
        growth.growth_for_adoption("user_siti", adoption.id),
        growth.growth_for_adoption("user_siti", adoption.id)
    );
    first.unwrap();
    second.unwrap();

    let synthetic = store
        .state()
        .growth_records
        .iter()
        .filter(|record| record.bamboo_plant_id == plant_id && record.is_synthetic)
        .count();
    // Days 7, 14, 21 and 23, written once.
    assert_eq!(synthetic, 4);
}
