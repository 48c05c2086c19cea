mod namespace;
mod run;

pub use namespace::{DEFAULT_NAMESPACE_CODE, Experiment, Namespace};
pub use run::{AttributeKind, LatestMetric, LifecycleStage, Param, Run, RunStatus, Tag};
