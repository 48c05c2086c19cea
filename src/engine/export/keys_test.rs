use crate::engine::errors::ExportError;
use crate::engine::export::{Include, discover_keys};
use crate::engine::types::AttributeKind;
use crate::test_helpers::factory::Factory;
use crate::test_helpers::faulty_store::{Fault, FaultyStore};

fn ids(ids: &[&str]) -> Vec<String> {
    ids.iter().map(|s| s.to_string()).collect()
}

#[tokio::test]
async fn discovers_sorted_keys_per_kind() {
    let store = Factory::store()
        .run(
            Factory::run()
                .id("a")
                .row_num(1)
                .param("lr", "0.1")
                .tag("team", "ml")
                .metric("loss", 0.1)
                .create(),
        )
        .run(
            Factory::run()
                .id("b")
                .row_num(2)
                .param("batch", "32")
                .metric("acc", 0.9)
                .create(),
        )
        .create();

    let keys = discover_keys(&*store, &ids(&["a", "b"]), Include::default())
        .await
        .unwrap();
    assert_eq!(keys.params, vec!["batch", "lr"]);
    assert_eq!(keys.tags, vec!["team"]);
    assert_eq!(keys.metrics, vec!["acc", "loss"]);
}

#[tokio::test]
async fn exclusions_skip_blocks() {
    let store = Factory::store()
        .run(
            Factory::run()
                .id("a")
                .param("lr", "0.1")
                .tag("team", "ml")
                .metric("loss", 0.1)
                .create(),
        )
        .create();

    let keys = discover_keys(
        &*store,
        &ids(&["a"]),
        Include {
            params: false,
            traces: true,
        },
    )
    .await
    .unwrap();
    assert!(keys.params.is_empty());
    assert!(keys.tags.is_empty());
    assert_eq!(keys.metrics, vec!["loss"]);

    let keys = discover_keys(
        &*store,
        &ids(&["a"]),
        Include {
            params: true,
            traces: false,
        },
    )
    .await
    .unwrap();
    assert_eq!(keys.params, vec!["lr"]);
    assert!(keys.metrics.is_empty());
}

#[tokio::test]
async fn empty_page_does_not_touch_the_store() {
    let store = FaultyStore::new(
        Factory::store().create(),
        Some(Fault::Keys(AttributeKind::Param)),
    );
    let keys = discover_keys(&store, &[], Include::default()).await.unwrap();
    assert!(keys.is_empty());
    assert_eq!(store.calls(), 0);
}

#[tokio::test]
async fn store_failures_name_the_kind() {
    let inner = Factory::store().run(Factory::run().id("a").create()).create();

    for (kind, message) in [
        (AttributeKind::Param, "error finding param keys"),
        (AttributeKind::Tag, "error finding tag keys"),
        (AttributeKind::Metric, "error finding metric keys"),
    ] {
        let store = FaultyStore::new(inner.clone(), Some(Fault::Keys(kind)));
        let err = discover_keys(&store, &ids(&["a"]), Include::default())
            .await
            .unwrap_err();
        assert!(matches!(err, ExportError::Keys { kind: k, .. } if k == kind));
        assert!(err.to_string().starts_with(message), "{err}");
    }
}
