use crate::frontend::server_state::ServerState;
use std::sync::Arc;

#[test]
fn test_server_state_new_initializes_correctly() {
    let server_state = ServerState::new();
    assert!(!server_state.is_shutting_down());
}

#[test]
fn test_server_state_clone_shares_shutdown_flag() {
    let server_state = ServerState::new();
    let clone = server_state.clone();

    server_state.signal_shutdown();
    assert!(server_state.is_shutting_down());
    assert!(clone.is_shutting_down());
}

#[tokio::test]
async fn test_server_state_visible_across_tasks() {
    use crate::logging::init_for_tests;
    init_for_tests();

    let server_state = Arc::new(ServerState::new());
    let state = Arc::clone(&server_state);
    tokio::spawn(async move { state.signal_shutdown() })
        .await
        .unwrap();

    assert!(server_state.is_shutting_down());
}
