// Incremental aggregation: fold one sample into the running mean and extrema.

use crate::models::{Extremum, Metric, MetricStats, NetworkSample, RunningStats};
use chrono::{DateTime, Local};

impl RunningStats {
    /// Fold `sample` in, stamping any extremum it sets with `now`.
    ///
    /// All three means use the pre-update count, which is incremented once at the end.
    /// Ties with the current max or min re-stamp it.
    pub fn update(&mut self, sample: &NetworkSample, now: DateTime<Local>) {
        let count = self.count;
        for metric in Metric::ALL {
            self.metric_mut(metric)
                .fold(sample.value(metric), count, now);
        }
        self.count += 1;
    }
}

impl MetricStats {
    fn fold(&mut self, value: f64, count: u64, now: DateTime<Local>) {
        let recorded = Extremum {
            value,
            recorded_at: now,
        };
        if self.max.is_none_or(|max| value >= max.value) {
            self.max = Some(recorded);
        }
        if self.min.is_none_or(|min| value <= min.value) {
            self.min = Some(recorded);
        }
        let n = count as f64;
        self.avg = (value + self.avg * n) / (n + 1.0);
    }
}
