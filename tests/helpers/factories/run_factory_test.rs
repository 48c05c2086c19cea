use crate::engine::types::{LifecycleStage, RunStatus};
use crate::test_helpers::factory::Factory;

#[test]
fn test_run_factory() {
    let run = Factory::run()
        .id("abc")
        .row_num(7)
        .status(RunStatus::Finished)
        .archived()
        .param("lr", "0.1")
        .tag("team", "ml")
        .nan_metric("loss")
        .create();

    assert_eq!(run.id, "abc");
    assert_eq!(run.row_num, 7);
    assert_eq!(run.lifecycle_stage, LifecycleStage::Deleted);
    assert!(!run.is_active());
    assert_eq!(run.param("lr"), Some("0.1"));
    assert_eq!(run.tag("team"), Some("ml"));
    assert!(run.metric("loss").unwrap().export_value().is_nan());
    assert_eq!(run.metric("loss").unwrap().run_uuid, "abc");
}

#[test]
fn test_run_factory_create_list_descends() {
    let runs = Factory::run().metric("acc", 0.9).create_list(3);
    let rows: Vec<i64> = runs.iter().map(|r| r.row_num).collect();
    assert_eq!(rows, vec![3, 2, 1]);
    assert_eq!(runs[1].id, "run-2");
    assert_eq!(runs[1].latest_metrics[0].run_uuid, "run-2");
}
