//! テスト用 InMemoryMembershipStore の振る舞いが本物と揃っていることの確認

use fleetcar_core::{FleetError, FleetId, RequestContext, Vin};
use fleetcar_store::MembershipStore;
use fleetcar_store::mock::InMemoryMembershipStore;

#[tokio::test]
async fn test_mock_matches_store_semantics() {
    let store = InMemoryMembershipStore::new().with_fleet("xk48jpgz", &[]);
    let ctx = RequestContext::new();
    let fleet = FleetId::from("xk48jpgz");
    let vin = Vin::from("WVWAA71K08W201030");

    store.add_car_to_fleet(&ctx, &fleet, &vin).await.unwrap();
    assert!(matches!(
        store.add_car_to_fleet(&ctx, &fleet, &vin).await,
        Err(FleetError::CarAlreadyInFleet { .. })
    ));
    assert!(store.is_car_in_fleet(&ctx, &fleet, &vin).await.unwrap());

    store.remove_car_from_fleet(&ctx, &fleet, &vin).await.unwrap();
    assert!(matches!(
        store.remove_car_from_fleet(&ctx, &fleet, &vin).await,
        Err(FleetError::CarNotInFleet { .. })
    ));
    assert!(matches!(
        store.add_fleet(&ctx, &fleet).await,
        Err(FleetError::FleetAlreadyExists(_))
    ));

    assert_eq!(
        store.calls(),
        vec![
            "add_car_to_fleet",
            "add_car_to_fleet",
            "is_car_in_fleet",
            "remove_car_from_fleet",
            "remove_car_from_fleet",
            "add_fleet",
        ]
    );
}

#[tokio::test]
async fn test_mock_failure_injection() {
    let store = InMemoryMembershipStore::new().with_fleet("xk48jpgz", &[]);
    store.fail_with("database error");

    let err = store
        .get_cars_for_fleet(&RequestContext::new(), &FleetId::from("xk48jpgz"))
        .await
        .unwrap_err();
    assert!(matches!(err, FleetError::Store(_)));
    assert_eq!(err.to_string(), "membership store error: database error");
}
