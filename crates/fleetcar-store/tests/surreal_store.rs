//! SurrealDB (mem://) を使った MembershipStore の結合テスト

use fleetcar_core::{FleetError, FleetId, RequestContext, Vin};
use fleetcar_store::{ConnectOptions, MembershipStore, SurrealMembershipStore};
use std::sync::Arc;

const FLEET: &str = "xk48jpgz";
const OTHER_FLEET: &str = "xk49jpgz";
const VIN_A: &str = "WVWAA71K08W201030";
const VIN_B: &str = "WVWAA71K08W201031";
const VIN_C: &str = "3B7HF13Y81G193584";

async fn store_with_fleets(fleets: &[&str]) -> SurrealMembershipStore {
    let store = SurrealMembershipStore::connect(&ConnectOptions::in_memory())
        .await
        .expect("in-memory store connects");
    let ctx = RequestContext::new();
    for fleet in fleets {
        store.add_fleet(&ctx, &FleetId::from(*fleet)).await.unwrap();
    }
    store
}

fn fleet(id: &str) -> FleetId {
    FleetId::from(id)
}

fn vin(id: &str) -> Vin {
    Vin::from(id)
}

#[tokio::test]
async fn test_new_fleet_is_empty() {
    let store = store_with_fleets(&[FLEET]).await;
    let ctx = RequestContext::new();

    let vins = store.get_cars_for_fleet(&ctx, &fleet(FLEET)).await.unwrap();
    assert!(vins.is_empty());
}

#[tokio::test]
async fn test_add_fleet_twice_fails() {
    let store = store_with_fleets(&[FLEET]).await;
    let ctx = RequestContext::new();

    let err = store.add_fleet(&ctx, &fleet(FLEET)).await.unwrap_err();
    assert!(matches!(err, FleetError::FleetAlreadyExists(f) if f.as_str() == FLEET));
}

#[tokio::test]
async fn test_add_then_list_keeps_insertion_order() {
    let store = store_with_fleets(&[FLEET]).await;
    let ctx = RequestContext::new();

    for v in [VIN_B, VIN_A, VIN_C] {
        store
            .add_car_to_fleet(&ctx, &fleet(FLEET), &vin(v))
            .await
            .unwrap();
    }

    let vins = store.get_cars_for_fleet(&ctx, &fleet(FLEET)).await.unwrap();
    assert_eq!(vins, vec![vin(VIN_B), vin(VIN_A), vin(VIN_C)]);
}

#[tokio::test]
async fn test_add_is_idempotent() {
    let store = store_with_fleets(&[FLEET]).await;
    let ctx = RequestContext::new();

    store
        .add_car_to_fleet(&ctx, &fleet(FLEET), &vin(VIN_A))
        .await
        .unwrap();
    let err = store
        .add_car_to_fleet(&ctx, &fleet(FLEET), &vin(VIN_A))
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::CarAlreadyInFleet { .. }));

    let vins = store.get_cars_for_fleet(&ctx, &fleet(FLEET)).await.unwrap();
    assert_eq!(vins, vec![vin(VIN_A)]);
}

#[tokio::test]
async fn test_remove_is_symmetric() {
    let store = store_with_fleets(&[FLEET]).await;
    let ctx = RequestContext::new();

    store
        .add_car_to_fleet(&ctx, &fleet(FLEET), &vin(VIN_A))
        .await
        .unwrap();
    store
        .add_car_to_fleet(&ctx, &fleet(FLEET), &vin(VIN_B))
        .await
        .unwrap();
    store
        .remove_car_from_fleet(&ctx, &fleet(FLEET), &vin(VIN_A))
        .await
        .unwrap();

    let vins = store.get_cars_for_fleet(&ctx, &fleet(FLEET)).await.unwrap();
    assert_eq!(vins, vec![vin(VIN_B)]);
    assert!(
        !store
            .is_car_in_fleet(&ctx, &fleet(FLEET), &vin(VIN_A))
            .await
            .unwrap()
    );
}

#[tokio::test]
async fn test_remove_never_added_car() {
    let store = store_with_fleets(&[FLEET]).await;
    let ctx = RequestContext::new();

    let err = store
        .remove_car_from_fleet(&ctx, &fleet(FLEET), &vin(VIN_C))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        FleetError::CarNotInFleet { fleet_id, vin: v } if fleet_id.as_str() == FLEET && v.as_str() == VIN_C
    ));
}

#[tokio::test]
async fn test_unknown_fleet_is_reported_everywhere() {
    let store = store_with_fleets(&[FLEET]).await;
    let ctx = RequestContext::new();
    let unknown = fleet("jJd9jb8I");

    assert!(matches!(
        store.get_cars_for_fleet(&ctx, &unknown).await,
        Err(FleetError::FleetNotFound(_))
    ));
    assert!(matches!(
        store.add_car_to_fleet(&ctx, &unknown, &vin(VIN_A)).await,
        Err(FleetError::FleetNotFound(_))
    ));
    assert!(matches!(
        store.remove_car_from_fleet(&ctx, &unknown, &vin(VIN_A)).await,
        Err(FleetError::FleetNotFound(_))
    ));
    assert!(matches!(
        store.is_car_in_fleet(&ctx, &unknown, &vin(VIN_A)).await,
        Err(FleetError::FleetNotFound(_))
    ));

    // 失敗した UPDATE がレコードを作っていないこと
    assert!(matches!(
        store.get_cars_for_fleet(&ctx, &unknown).await,
        Err(FleetError::FleetNotFound(_))
    ));
}

#[tokio::test]
async fn test_fleets_are_isolated() {
    let store = store_with_fleets(&[FLEET, OTHER_FLEET]).await;
    let ctx = RequestContext::new();

    store
        .add_car_to_fleet(&ctx, &fleet(FLEET), &vin(VIN_A))
        .await
        .unwrap();

    assert!(
        store
            .get_cars_for_fleet(&ctx, &fleet(OTHER_FLEET))
            .await
            .unwrap()
            .is_empty()
    );
    assert!(
        !store
            .is_car_in_fleet(&ctx, &fleet(OTHER_FLEET), &vin(VIN_A))
            .await
            .unwrap()
    );

    // 同じ VIN を別フリートに入れることは制限しない
    store
        .add_car_to_fleet(&ctx, &fleet(OTHER_FLEET), &vin(VIN_A))
        .await
        .unwrap();
    store
        .remove_car_from_fleet(&ctx, &fleet(OTHER_FLEET), &vin(VIN_A))
        .await
        .unwrap();
    assert!(
        store
            .is_car_in_fleet(&ctx, &fleet(FLEET), &vin(VIN_A))
            .await
            .unwrap()
    );
}

const WRITERS: usize = 16;

fn numbered_vin(n: usize) -> Vin {
    Vin::from(format!("WVWAA71K08W2010{n:02}"))
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_adds_of_same_vin() {
    let store = Arc::new(store_with_fleets(&[FLEET]).await);

    let mut handles = Vec::new();
    for _ in 0..WRITERS {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let ctx = RequestContext::new();
            store
                .add_car_to_fleet(&ctx, &fleet(FLEET), &vin(VIN_A))
                .await
        }));
    }

    let mut successes = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(()) => successes += 1,
            Err(FleetError::CarAlreadyInFleet { .. }) => {}
            Err(e) => panic!("unexpected error: {e}"),
        }
    }
    assert_eq!(successes, 1);

    let ctx = RequestContext::new();
    let vins = store.get_cars_for_fleet(&ctx, &fleet(FLEET)).await.unwrap();
    assert_eq!(vins, vec![vin(VIN_A)]);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_adds_of_distinct_vins() {
    let store = Arc::new(store_with_fleets(&[FLEET]).await);

    let mut handles = Vec::new();
    for n in 0..WRITERS {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let ctx = RequestContext::new();
            store
                .add_car_to_fleet(&ctx, &fleet(FLEET), &numbered_vin(n))
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let ctx = RequestContext::new();
    let mut vins = store.get_cars_for_fleet(&ctx, &fleet(FLEET)).await.unwrap();
    vins.sort();
    let expected: Vec<Vin> = (0..WRITERS).map(numbered_vin).collect();
    assert_eq!(vins, expected);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn test_concurrent_removes_of_distinct_vins() {
    let store = Arc::new(store_with_fleets(&[FLEET]).await);
    let ctx = RequestContext::new();
    for n in 0..WRITERS {
        store
            .add_car_to_fleet(&ctx, &fleet(FLEET), &numbered_vin(n))
            .await
            .unwrap();
    }

    let mut handles = Vec::new();
    for n in 0..WRITERS {
        let store = Arc::clone(&store);
        handles.push(tokio::spawn(async move {
            let ctx = RequestContext::new();
            store
                .remove_car_from_fleet(&ctx, &fleet(FLEET), &numbered_vin(n))
                .await
        }));
    }

    for handle in handles {
        handle.await.unwrap().unwrap();
    }

    let vins = store.get_cars_for_fleet(&ctx, &fleet(FLEET)).await.unwrap();
    assert!(vins.is_empty());
}

#[tokio::test]
async fn test_collection_prefix_separates_tables() {
    let plain = store_with_fleets(&[FLEET]).await;
    let ctx = RequestContext::new();
    plain
        .add_car_to_fleet(&ctx, &fleet(FLEET), &vin(VIN_A))
        .await
        .unwrap();

    let options = ConnectOptions {
        collection_prefix: "test_".to_string(),
        ..ConnectOptions::in_memory()
    };
    let prefixed = SurrealMembershipStore::connect(&options).await.unwrap();
    assert_eq!(prefixed.table(), "test_fleet");
    prefixed.add_fleet(&ctx, &fleet(FLEET)).await.unwrap();
    assert!(
        prefixed
            .get_cars_for_fleet(&ctx, &fleet(FLEET))
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn test_drop_fleets() {
    let store = store_with_fleets(&[FLEET, OTHER_FLEET]).await;
    let ctx = RequestContext::new();

    store.drop_fleets().await.unwrap();

    assert!(matches!(
        store.get_cars_for_fleet(&ctx, &fleet(FLEET)).await,
        Err(FleetError::FleetNotFound(_))
    ));
    store.add_fleet(&ctx, &fleet(FLEET)).await.unwrap();
}

#[tokio::test]
async fn test_cancelled_context_short_circuits() {
    let store = store_with_fleets(&[FLEET]).await;
    let ctx = RequestContext::new();
    ctx.cancel();

    let err = store
        .add_car_to_fleet(&ctx, &fleet(FLEET), &vin(VIN_A))
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::Cancelled));

    let fresh = RequestContext::new();
    assert!(
        store
            .get_cars_for_fleet(&fresh, &fleet(FLEET))
            .await
            .unwrap()
            .is_empty()
    );
}
