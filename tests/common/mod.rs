// Shared test helpers: scripted collectors and a recording sink.
#![allow(dead_code)]

use speedtracker::collector::Collector;
use speedtracker::error::{ParseError, SampleError};
use speedtracker::models::{Metric, NetworkSample};
use speedtracker::report::ReportSink;
use std::collections::VecDeque;
use std::future::Future;
use std::io;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::{Notify, mpsc};
use tokio::time::{Duration, Instant};

pub fn sample(ping: f64, download: f64, upload: f64) -> NetworkSample {
    NetworkSample::new(ping, download, upload)
}

pub fn parse_failure() -> SampleError {
    SampleError::Parse {
        tool: "speedtest".into(),
        source: ParseError::MissingLine {
            metric: Metric::Upload,
            lines: 2,
        },
    }
}

/// Returns scripted results in order, then a fixed sample once the script runs out.
/// Records the (paused-clock) start time of every call.
#[derive(Clone, Default)]
pub struct FakeCollector {
    script: Arc<Mutex<VecDeque<Result<NetworkSample, SampleError>>>>,
    starts: Arc<Mutex<Vec<Instant>>>,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: Arc<AtomicUsize>,
    delay: Option<Duration>,
}

impl FakeCollector {
    pub fn new(script: Vec<Result<NetworkSample, SampleError>>) -> Self {
        Self {
            script: Arc::new(Mutex::new(script.into())),
            ..Default::default()
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.starts.lock().unwrap().len()
    }

    pub fn starts(&self) -> Vec<Instant> {
        self.starts.lock().unwrap().clone()
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }
}

impl Collector for FakeCollector {
    fn collect(&self) -> impl Future<Output = Result<NetworkSample, SampleError>> + Send {
        let next = self.script.lock().unwrap().pop_front();
        self.starts.lock().unwrap().push(Instant::now());
        let in_flight = self.in_flight.clone();
        let max_in_flight = self.max_in_flight.clone();
        let delay = self.delay;
        async move {
            let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            max_in_flight.fetch_max(now, Ordering::SeqCst);
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            in_flight.fetch_sub(1, Ordering::SeqCst);
            next.unwrap_or_else(|| Ok(sample(10.0, 50.0, 20.0)))
        }
    }
}

/// Blocks every collection until `release` is notified; signals `started` on entry.
#[derive(Clone, Default)]
pub struct GatedCollector {
    pub started: Arc<Notify>,
    pub release: Arc<Notify>,
}

impl Collector for GatedCollector {
    fn collect(&self) -> impl Future<Output = Result<NetworkSample, SampleError>> + Send {
        let started = self.started.clone();
        let release = self.release.clone();
        async move {
            started.notify_one();
            release.notified().await;
            Ok(sample(12.0, 40.0, 10.0))
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SinkEvent {
    Progress(String),
    Clear,
    Show(String),
}

/// Records every sink call and forwards shown reports over a channel.
pub struct RecordingSink {
    pub events: Vec<SinkEvent>,
    reports_tx: mpsc::UnboundedSender<String>,
}

impl RecordingSink {
    pub fn new() -> (Self, mpsc::UnboundedReceiver<String>) {
        let (reports_tx, reports_rx) = mpsc::unbounded_channel();
        (
            Self {
                events: Vec::new(),
                reports_tx,
            },
            reports_rx,
        )
    }

    pub fn reports(&self) -> Vec<&str> {
        self.events
            .iter()
            .filter_map(|e| match e {
                SinkEvent::Show(r) => Some(r.as_str()),
                _ => None,
            })
            .collect()
    }
}

impl ReportSink for RecordingSink {
    fn progress(&mut self, message: &str) -> io::Result<()> {
        self.events.push(SinkEvent::Progress(message.to_string()));
        Ok(())
    }

    fn clear(&mut self) -> io::Result<()> {
        self.events.push(SinkEvent::Clear);
        Ok(())
    }

    fn show(&mut self, report: &str) -> io::Result<()> {
        self.events.push(SinkEvent::Show(report.to_string()));
        let _ = self.reports_tx.send(report.to_string());
        Ok(())
    }
}
