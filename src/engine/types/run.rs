use std::fmt;

use serde::{Deserialize, Serialize};

use super::Experiment;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LifecycleStage {
    #[default]
    Active,
    Deleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RunStatus {
    #[default]
    Running,
    Scheduled,
    Finished,
    Failed,
    Killed,
}

impl RunStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            RunStatus::Running => "RUNNING",
            RunStatus::Scheduled => "SCHEDULED",
            RunStatus::Finished => "FINISHED",
            RunStatus::Failed => "FAILED",
            RunStatus::Killed => "KILLED",
        }
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Param {
    pub key: String,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub key: String,
    pub value: String,
}

/// Most recent value recorded for one metric key of one run.
///
/// `is_nan` marks a value that was logged as NaN; `value` is meaningless
/// when it is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestMetric {
    pub key: String,
    pub value: f64,
    #[serde(default)]
    pub is_nan: bool,
    #[serde(default)]
    pub run_uuid: String,
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default)]
    pub step: i64,
}

impl LatestMetric {
    /// Value as it should be exported: NaN-flagged entries are present but undefined.
    pub fn export_value(&self) -> f64 {
        if self.is_nan { f64::NAN } else { self.value }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Run {
    pub id: String,
    pub name: String,
    pub row_num: i64,
    pub experiment_id: i64,
    /// Populated by the fetch join; absent on stored rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experiment: Option<Experiment>,
    #[serde(default)]
    pub start_time: Option<i64>,
    #[serde(default)]
    pub end_time: Option<i64>,
    #[serde(default)]
    pub lifecycle_stage: LifecycleStage,
    #[serde(default)]
    pub status: RunStatus,
    #[serde(default)]
    pub params: Vec<Param>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub latest_metrics: Vec<LatestMetric>,
}

impl Run {
    pub fn is_archived(&self) -> bool {
        self.lifecycle_stage == LifecycleStage::Deleted
    }

    pub fn is_active(&self) -> bool {
        self.status == RunStatus::Running
    }

    pub fn experiment_name(&self) -> &str {
        self.experiment
            .as_ref()
            .map(|exp| exp.name.as_str())
            .unwrap_or_default()
    }

    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|p| p.key == key)
            .map(|p| p.value.as_str())
    }

    pub fn tag(&self, key: &str) -> Option<&str> {
        self.tags
            .iter()
            .find(|t| t.key == key)
            .map(|t| t.value.as_str())
    }

    pub fn metric(&self, key: &str) -> Option<&LatestMetric> {
        self.latest_metrics.iter().find(|m| m.key == key)
    }
}

/// Per-run attribute collections that become dynamic columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    Metric,
    Param,
    Tag,
}

impl AttributeKind {
    /// Singular name, used in error messages.
    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeKind::Metric => "metric",
            AttributeKind::Param => "param",
            AttributeKind::Tag => "tag",
        }
    }

    /// Prefix namespacing the kind's columns in the export schema.
    pub fn column_prefix(&self) -> &'static str {
        match self {
            AttributeKind::Metric => "metrics:",
            AttributeKind::Param => "params:",
            AttributeKind::Tag => "tags:",
        }
    }

    pub fn keys_of<'a>(&self, run: &'a Run) -> Box<dyn Iterator<Item = &'a str> + 'a> {
        match self {
            AttributeKind::Metric => Box::new(run.latest_metrics.iter().map(|m| m.key.as_str())),
            AttributeKind::Param => Box::new(run.params.iter().map(|p| p.key.as_str())),
            AttributeKind::Tag => Box::new(run.tags.iter().map(|t| t.key.as_str())),
        }
    }
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
