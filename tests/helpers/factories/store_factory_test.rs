use crate::engine::store::{NamespaceStore, RunStore};
use crate::test_helpers::factory::Factory;

#[tokio::test]
async fn test_store_factory() {
    let store = Factory::store()
        .namespace(2, "team-a")
        .experiment(2, "Team A", 2)
        .runs(Factory::run().create_list(2))
        .create();

    assert_eq!(store.count_all().await.unwrap(), 2);
    let ns = store.get_by_code("team-a").await.unwrap().expect("namespace");
    assert_eq!(ns.id, 2);
    assert!(store.get_by_code("default").await.unwrap().is_some());
}
