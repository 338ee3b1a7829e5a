mod common;

use common::{build_test_context, sample_seed};
use evset_client::config::ClientConfig;
use evset_client::EventSettingsClient;
use evset_common::profile::FieldProfiles;
use evset_common::types::{ConditionType, Level};
use evset_editor::store::ConditionEdit;
use evset_editor::sync::SyncController;

async fn spawn_server() -> (common::TestContext, String) {
    let ctx = build_test_context(sample_seed()).expect("context should build");
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("listener should bind");
    let addr = listener.local_addr().expect("local addr");
    let app = ctx.app.clone();
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server should run");
    });
    (ctx, format!("http://{addr}"))
}

async fn controller(base_url: &str) -> SyncController<EventSettingsClient> {
    let client = EventSettingsClient::new(ClientConfig::new(base_url)).expect("client should build");
    let profiles = FieldProfiles::new(client.field_profiles().await.expect("profiles"))
        .expect("served profiles should be valid");
    SyncController::new(client, profiles)
}

#[tokio::test]
async fn edit_session_against_live_server() {
    let (ctx, base_url) = spawn_server().await;
    let mut sync = controller(&base_url).await;

    assert_eq!(sync.load("freezer").await.unwrap(), 3);
    assert!(!sync.store().is_dirty());

    // New row lands at the top of the draft.
    let store = sync.store_mut();
    store.add_new("freezer");
    store.update(0, ConditionEdit::FieldKey("co2".into()));
    store.update(0, ConditionEdit::Level(Level::Caution));
    store.update(0, ConditionEdit::ThresholdValue(Some(1500.0)));
    // Existing temperature WARNING row becomes a range.
    let warning = store
        .draft()
        .iter()
        .position(|c| c.id == Some(1))
        .unwrap();
    store.update(warning, ConditionEdit::ConditionType(ConditionType::Range));
    store.update(warning, ConditionEdit::LeftValue(Some(-25.0)));
    store.update(warning, ConditionEdit::RightValue(Some(-15.0)));
    assert!(store.validate().is_valid());

    let summary = sync.save_all().await.expect("save should succeed");
    assert_eq!(summary.created, 1);
    assert_eq!(summary.updated, 1);
    assert!(!sync.store().is_dirty());
    assert_eq!(sync.store().draft()[0].id, Some(5));

    {
        let repo = ctx.state.repo();
        assert_eq!(repo.len(), 5);
        assert_eq!(repo.get(5).unwrap().threshold_value(), Some(1500.0));
        assert_eq!(repo.get(1).unwrap().right_value(), Some(-15.0));
    }

    // A reload shows the server's canonical order.
    sync.load("freezer").await.unwrap();
    let ids: Vec<_> = sync.store().draft().iter().map(|c| c.id.unwrap()).collect();
    assert_eq!(ids, vec![5, 3, 1, 2]);

    sync.delete_one(3).await.expect("delete should succeed");
    assert!(ctx.state.repo().get(3).is_none());
    assert_eq!(sync.store().draft().len(), 3);

    sync.store_mut()
        .update(0, ConditionEdit::Activate(false));
    sync.cancel_all();
    assert!(sync.store().draft()[0].activate);
    assert!(!sync.store().is_dirty());
}

#[tokio::test]
async fn rejected_request_surfaces_server_message() {
    let (ctx, base_url) = spawn_server().await;
    let mut sync = controller(&base_url).await;
    sync.load("freezer").await.unwrap();

    // Removed behind the editor's back.
    assert!(ctx.state.repo().delete(2));

    let err = sync.delete_one(2).await.unwrap_err();
    assert!(err.message().contains("event setting 2 not found"));
    assert_eq!(
        sync.store().api_error(),
        Some(err.message())
    );
    assert_eq!(sync.store().draft().len(), 3);
}
