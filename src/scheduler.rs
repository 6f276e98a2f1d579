// Sampling loop: one collect -> aggregate -> report cycle at startup, then one per tick,
// until shutdown is signalled or a collection fails.

use crate::collector::Collector;
use crate::config::{AppConfig, ReportFormat};
use crate::models::RunningStats;
use crate::report::{ReportSink, Reporter};
use chrono::Local;
use tokio::sync::oneshot;
use tokio::time::{Duration, MissedTickBehavior, interval};
use tracing::{debug, error, info, instrument};

const STARTING_MESSAGE: &str = "Starting speedtracker...";
const CYCLE_MESSAGE: &str = "Getting new data...";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running,
    Stopped,
}

/// Scheduler timing and output config.
#[derive(Debug, Clone)]
pub struct SchedulerConfig {
    pub interval: Duration,
    pub format: ReportFormat,
}

impl From<&AppConfig> for SchedulerConfig {
    fn from(config: &AppConfig) -> Self {
        Self {
            interval: Duration::from_secs(config.sampling.interval_secs),
            format: config.display.format,
        }
    }
}

/// Single owner of the session's RunningStats. Cycles never overlap: a slow
/// collection delays the next tick instead of running alongside it.
pub struct Scheduler<C, S> {
    collector: C,
    sink: S,
    reporter: Reporter,
    interval: Duration,
    state: SchedulerState,
    stats: RunningStats,
    cycles: u64,
}

impl<C: Collector, S: ReportSink> Scheduler<C, S> {
    pub fn new(collector: C, sink: S, config: SchedulerConfig) -> Self {
        Self {
            collector,
            sink,
            reporter: Reporter::new(config.format),
            interval: config.interval,
            state: SchedulerState::Idle,
            stats: RunningStats::new(),
            cycles: 0,
        }
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn stats(&self) -> &RunningStats {
        &self.stats
    }

    /// Cycles started so far, including a failed one.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    /// Run until `shutdown_rx` fires (or its sender is dropped) and return the final
    /// statistics. Shutdown is only observed between cycles. A collection error stops
    /// the loop and is returned.
    #[instrument(skip_all, fields(interval_secs = self.interval.as_secs()))]
    pub async fn run(
        &mut self,
        mut shutdown_rx: oneshot::Receiver<()>,
    ) -> anyhow::Result<RunningStats> {
        self.state = SchedulerState::Running;

        let mut tick = interval(self.interval);
        tick.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick completes immediately; the startup cycle consumes it.
        tick.tick().await;
        if let Err(e) = self.cycle(STARTING_MESSAGE).await {
            self.state = SchedulerState::Stopped;
            return Err(e);
        }

        loop {
            tokio::select! {
                biased;
                _ = &mut shutdown_rx => {
                    debug!("Scheduler shutting down");
                    break;
                }
                _ = tick.tick() => {
                    if let Err(e) = self.cycle(CYCLE_MESSAGE).await {
                        self.state = SchedulerState::Stopped;
                        return Err(e);
                    }
                }
            }
        }

        self.state = SchedulerState::Stopped;
        info!(
            samples = self.stats.count,
            cycles = self.cycles,
            "sampling stopped"
        );
        Ok(self.stats.clone())
    }

    async fn cycle(&mut self, message: &str) -> anyhow::Result<()> {
        self.cycles += 1;
        let cycle = self.cycles;
        debug!(cycle, "cycle start");
        self.sink.progress(message)?;

        let sample = self.collector.collect().await.inspect_err(|e| {
            error!(
                error = %e,
                operation = "collect_sample",
                cycle,
                "sample collection failed"
            );
        })?;

        self.stats.update(&sample, Local::now());
        let report = self.reporter.render(&self.stats)?;
        self.sink.clear()?;
        self.sink.show(&report)?;
        debug!(cycle, samples = self.stats.count, "cycle complete");
        Ok(())
    }
}
