// Domain models: one measurement and the running statistics folded from them.

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One measurement triple from a single run of the measurement tool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkSample {
    /// Latency in milliseconds.
    pub ping: f64,
    /// Download throughput in Mbit/s.
    pub download: f64,
    /// Upload throughput in Mbit/s.
    pub upload: f64,
}

impl NetworkSample {
    pub fn new(ping: f64, download: f64, upload: f64) -> Self {
        Self {
            ping,
            download,
            upload,
        }
    }

    pub fn value(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Ping => self.ping,
            Metric::Download => self.download,
            Metric::Upload => self.upload,
        }
    }
}

/// The three measured quantities, in tool output order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    Ping,
    Download,
    Upload,
}

impl Metric {
    pub const ALL: [Metric; 3] = [Metric::Ping, Metric::Download, Metric::Upload];

    pub fn label(self) -> &'static str {
        match self {
            Metric::Ping => "Ping",
            Metric::Download => "Download",
            Metric::Upload => "Upload",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Metric::Ping => "ms",
            Metric::Download | Metric::Upload => "Mbit/s",
        }
    }
}

impl std::fmt::Display for Metric {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// An extreme value and the time of the update that recorded it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Extremum {
    pub value: f64,
    pub recorded_at: DateTime<Local>,
}

/// Mean and extrema for one metric. `max`/`min` are `None` until the first sample.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricStats {
    pub avg: f64,
    pub max: Option<Extremum>,
    pub min: Option<Extremum>,
}

/// Session-wide statistics. `count` is shared by all three metrics so their means never drift.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunningStats {
    pub count: u64,
    pub ping: MetricStats,
    pub download: MetricStats,
    pub upload: MetricStats,
}

impl RunningStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn metric(&self, metric: Metric) -> &MetricStats {
        match metric {
            Metric::Ping => &self.ping,
            Metric::Download => &self.download,
            Metric::Upload => &self.upload,
        }
    }

    pub(crate) fn metric_mut(&mut self, metric: Metric) -> &mut MetricStats {
        match metric {
            Metric::Ping => &mut self.ping,
            Metric::Download => &mut self.download,
            Metric::Upload => &mut self.upload,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }
}
