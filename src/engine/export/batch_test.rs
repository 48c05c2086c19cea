use std::collections::HashMap;

use arrow_array::{
    Array, BooleanArray, Float64Array, RecordBatch, StringArray, TimestampMillisecondArray,
};

use crate::engine::errors::ExportError;
use crate::engine::export::{
    BatchAccumulator, ColumnKind, ColumnSource, ExportColumn, ExportSchema, KeySets,
};
use crate::engine::types::{Experiment, RunStatus};
use crate::test_helpers::factory::Factory;

fn schema_with(metrics: &[&str], params: &[&str], tags: &[&str]) -> ExportSchema {
    let owned = |keys: &[&str]| -> Vec<String> { keys.iter().map(|k| k.to_string()).collect() };
    ExportSchema::build(
        &KeySets {
            metrics: owned(metrics),
            params: owned(params),
            tags: owned(tags),
        },
        None,
    )
}

fn column<'a, T: 'static>(batch: &'a RecordBatch, name: &str) -> &'a T {
    batch
        .column_by_name(name)
        .expect("column present")
        .as_any()
        .downcast_ref::<T>()
        .expect("column type")
}

#[test]
fn flushes_full_batches_and_trailing_remainder() {
    let mut acc = BatchAccumulator::new(schema_with(&[], &[], &[]), 1000).unwrap();
    let runs = Factory::run().create_list(2500);

    let mut sizes = Vec::new();
    for run in &runs {
        if let Some(batch) = acc.append(run).unwrap() {
            sizes.push(batch.num_rows());
        }
    }
    assert_eq!(acc.pending(), 500);
    if let Some(batch) = acc.finish().unwrap() {
        sizes.push(batch.num_rows());
    }
    assert_eq!(sizes, vec![1000, 1000, 500]);
    assert!(acc.finish().unwrap().is_none());
}

#[test]
fn exact_multiple_has_no_trailing_batch() {
    let mut acc = BatchAccumulator::new(schema_with(&[], &[], &[]), 2).unwrap();
    let runs = Factory::run().create_list(4);
    let full = runs
        .iter()
        .filter_map(|run| acc.append(run).unwrap())
        .count();
    assert_eq!(full, 2);
    assert!(acc.finish().unwrap().is_none());
}

#[test]
fn zero_rows_produce_no_batch() {
    let mut acc = BatchAccumulator::new(schema_with(&["loss"], &[], &[]), 1000).unwrap();
    assert!(acc.finish().unwrap().is_none());
}

#[test]
fn batch_size_is_clamped() {
    let schema = schema_with(&[], &[], &[]);
    assert_eq!(BatchAccumulator::new(schema.clone(), 5000).unwrap().batch_size(), 1000);
    assert_eq!(BatchAccumulator::new(schema, 0).unwrap().batch_size(), 1);
}

#[test]
fn projects_fixed_columns() {
    let mut run = Factory::run()
        .id("r1")
        .name("first")
        .times(Some(1_700_000_000_000), None)
        .status(RunStatus::Finished)
        .archived()
        .create();
    run.experiment = Some(Experiment {
        id: 1,
        name: "Default".into(),
        namespace_id: 1,
    });
    let running = Factory::run().id("r2").times(None, Some(5)).create();

    let mut acc = BatchAccumulator::new(schema_with(&[], &[], &[]), 10).unwrap();
    assert!(acc.append(&run).unwrap().is_none());
    assert!(acc.append(&running).unwrap().is_none());
    let batch = acc.finish().unwrap().expect("batch");

    assert_eq!(column::<StringArray>(&batch, "run_id").value(0), "r1");
    assert_eq!(column::<StringArray>(&batch, "name").value(0), "first");
    assert_eq!(column::<StringArray>(&batch, "experiment_name").value(0), "Default");
    assert_eq!(column::<StringArray>(&batch, "experiment_name").value(1), "");

    let created = column::<TimestampMillisecondArray>(&batch, "creation_time");
    assert_eq!(created.value(0), 1_700_000_000_000);
    assert!(created.is_null(1));
    let ended = column::<TimestampMillisecondArray>(&batch, "end_time");
    assert!(ended.is_null(0));
    assert_eq!(ended.value(1), 5);

    let archived = column::<BooleanArray>(&batch, "archived");
    assert!(archived.value(0));
    assert!(!archived.value(1));
    let active = column::<BooleanArray>(&batch, "active");
    assert!(!active.value(0));
    assert!(active.value(1));
}

#[test]
fn nan_metric_is_present_and_missing_metric_is_null() {
    let runs = vec![
        Factory::run().id("a").nan_metric("loss").create(),
        Factory::run().id("b").create(),
        Factory::run().id("c").metric("loss", 0.5).create(),
    ];
    let mut acc = BatchAccumulator::new(schema_with(&["loss"], &[], &[]), 1000).unwrap();
    for run in &runs {
        assert!(acc.append(run).unwrap().is_none());
    }
    let batch = acc.finish().unwrap().expect("batch");

    let loss = column::<Float64Array>(&batch, "metrics:loss");
    assert!(loss.is_valid(0));
    assert!(loss.value(0).is_nan());
    assert!(loss.is_null(1));
    assert_eq!(loss.value(2), 0.5);
}

#[test]
fn params_and_tags_null_where_absent() {
    let runs = vec![
        Factory::run().param("lr", "0.1").create(),
        Factory::run().tag("team", "ml").create(),
    ];
    let mut acc = BatchAccumulator::new(schema_with(&[], &["lr"], &["team"]), 1000).unwrap();
    for run in &runs {
        acc.append(run).unwrap();
    }
    let batch = acc.finish().unwrap().expect("batch");

    let lr = column::<StringArray>(&batch, "params:lr");
    assert_eq!(lr.value(0), "0.1");
    assert!(lr.is_null(1));
    let team = column::<StringArray>(&batch, "tags:team");
    assert!(team.is_null(0));
    assert_eq!(team.value(1), "ml");
}

#[test]
fn every_batch_has_every_column() {
    let runs = vec![
        Factory::run().id("a").param("only_a", "1").create(),
        Factory::run().id("b").param("only_b", "2").create(),
    ];
    let schema = schema_with(&[], &["only_a", "only_b"], &[]);
    let mut acc = BatchAccumulator::new(schema.clone(), 1).unwrap();

    let batches: Vec<RecordBatch> = runs
        .iter()
        .filter_map(|run| acc.append(run).unwrap())
        .collect();
    assert_eq!(batches.len(), 2);
    for batch in &batches {
        assert_eq!(batch.num_columns(), schema.len());
    }
    assert!(column::<StringArray>(&batches[0], "params:only_b").is_null(0));
    assert!(column::<StringArray>(&batches[1], "params:only_a").is_null(0));
}

#[test]
fn rejects_column_kind_that_does_not_match_its_source() {
    let schema = ExportSchema::from_columns(
        vec![ExportColumn {
            name: "archived".into(),
            kind: ColumnKind::Utf8,
            source: ColumnSource::Archived,
        }],
        HashMap::new(),
    );
    let err = BatchAccumulator::new(schema, 10).err().expect("schema error");
    assert!(matches!(
        err,
        ExportError::Schema {
            expected: "Boolean",
            found: "Utf8",
            ..
        }
    ));
}
