use crate::engine::types::{LatestMetric, LifecycleStage, Param, Run, RunStatus, Tag};

pub struct RunFactory {
    run: Run,
}

impl RunFactory {
    pub fn new() -> Self {
        let suffix: u32 = rand::random();
        Self {
            run: Run {
                id: format!("run-{suffix:08x}"),
                name: "test run".to_string(),
                row_num: 1,
                experiment_id: 1,
                experiment: None,
                start_time: Some(1_700_000_000_000),
                end_time: None,
                lifecycle_stage: LifecycleStage::Active,
                status: RunStatus::Running,
                params: Vec::new(),
                tags: Vec::new(),
                latest_metrics: Vec::new(),
            },
        }
    }

    pub fn id(mut self, id: &str) -> Self {
        self.run.id = id.to_string();
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.run.name = name.to_string();
        self
    }

    pub fn row_num(mut self, row_num: i64) -> Self {
        self.run.row_num = row_num;
        self
    }

    pub fn experiment(mut self, experiment_id: i64) -> Self {
        self.run.experiment_id = experiment_id;
        self
    }

    pub fn times(mut self, start: Option<i64>, end: Option<i64>) -> Self {
        self.run.start_time = start;
        self.run.end_time = end;
        self
    }

    pub fn status(mut self, status: RunStatus) -> Self {
        self.run.status = status;
        self
    }

    pub fn archived(mut self) -> Self {
        self.run.lifecycle_stage = LifecycleStage::Deleted;
        self
    }

    pub fn param(mut self, key: &str, value: &str) -> Self {
        self.run.params.push(Param {
            key: key.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn tag(mut self, key: &str, value: &str) -> Self {
        self.run.tags.push(Tag {
            key: key.to_string(),
            value: value.to_string(),
        });
        self
    }

    pub fn metric(mut self, key: &str, value: f64) -> Self {
        self.push_metric(key, value, false);
        self
    }

    pub fn nan_metric(mut self, key: &str) -> Self {
        self.push_metric(key, 0.0, true);
        self
    }

    fn push_metric(&mut self, key: &str, value: f64, is_nan: bool) {
        self.run.latest_metrics.push(LatestMetric {
            key: key.to_string(),
            value,
            is_nan,
            run_uuid: self.run.id.clone(),
            timestamp: 1_700_000_000_000,
            step: 1,
        });
    }

    pub fn create(self) -> Run {
        self.run
    }

    /// `count` runs with descending row numbers starting at `count`.
    pub fn create_list(self, count: usize) -> Vec<Run> {
        (0..count)
            .map(|i| {
                let mut run = self.run.clone();
                run.id = format!("run-{}", i + 1);
                run.name = format!("run {}", i + 1);
                run.row_num = (count - i) as i64;
                for metric in &mut run.latest_metrics {
                    metric.run_uuid = run.id.clone();
                }
                run
            })
            .collect()
    }
}
