// Rendering of RunningStats and the display seam the scheduler writes through.

use crate::config::ReportFormat;
use crate::models::{Extremum, Metric, RunningStats};
use std::fmt::Write as _;
use std::io::{self, Write};

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S %:z";

/// ANSI: clear screen, cursor home.
const CLEAR_SEQUENCE: &str = "\x1b[2J\x1b[H";

/// Turns a stats snapshot into text. Pure: same stats, same output.
#[derive(Debug, Clone, Copy, Default)]
pub struct Reporter {
    format: ReportFormat,
}

impl Reporter {
    pub fn new(format: ReportFormat) -> Self {
        Self { format }
    }

    pub fn render(&self, stats: &RunningStats) -> anyhow::Result<String> {
        match self.format {
            ReportFormat::Text => Ok(render_text(stats)),
            ReportFormat::Json => Ok(serde_json::to_string_pretty(stats)?),
        }
    }
}

/// Averages, then maxima with timestamps, then minima with timestamps.
pub fn render_text(stats: &RunningStats) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "\nNetwork Data ({} samples):\n", stats.count);

    let averages: Vec<String> = Metric::ALL
        .iter()
        .map(|&m| format!("Avg {}: {:.3}{}", m, stats.metric(m).avg, m.unit()))
        .collect();
    let _ = writeln!(out, "{}", averages.join("\t"));

    let _ = writeln!(out, "\nMaximum Stats:");
    for m in Metric::ALL {
        let _ = writeln!(out, "{}", extremum_line(m, stats.metric(m).max.as_ref()));
    }

    let _ = writeln!(out, "\nMinimum Stats:");
    for m in Metric::ALL {
        let _ = writeln!(out, "{}", extremum_line(m, stats.metric(m).min.as_ref()));
    }
    out
}

fn extremum_line(metric: Metric, extremum: Option<&Extremum>) -> String {
    match extremum {
        Some(e) => format!(
            "{}: {:.3}{}\t{}",
            metric,
            e.value,
            metric.unit(),
            e.recorded_at.format(TIMESTAMP_FORMAT)
        ),
        None => format!("{}: n/a", metric),
    }
}

/// Where reports go. Kept behind a trait so the cycle can run without a terminal.
pub trait ReportSink: Send {
    /// Status line shown while a measurement is in flight.
    fn progress(&mut self, _message: &str) -> io::Result<()> {
        Ok(())
    }

    /// Drop the previous report before the next one is shown.
    fn clear(&mut self) -> io::Result<()>;

    fn show(&mut self, report: &str) -> io::Result<()>;
}

/// Writes reports to a terminal (stdout by default), optionally clearing it between cycles.
pub struct TerminalSink<W: Write + Send = io::Stdout> {
    out: W,
    clear_screen: bool,
}

impl TerminalSink {
    pub fn stdout(clear_screen: bool) -> Self {
        Self::with_writer(io::stdout(), clear_screen)
    }
}

impl<W: Write + Send> TerminalSink<W> {
    pub fn with_writer(out: W, clear_screen: bool) -> Self {
        Self { out, clear_screen }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write + Send> ReportSink for TerminalSink<W> {
    fn progress(&mut self, message: &str) -> io::Result<()> {
        writeln!(self.out, "{}", message)?;
        self.out.flush()
    }

    fn clear(&mut self) -> io::Result<()> {
        if self.clear_screen {
            self.out.write_all(CLEAR_SEQUENCE.as_bytes())?;
        }
        Ok(())
    }

    fn show(&mut self, report: &str) -> io::Result<()> {
        writeln!(self.out, "{}", report)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_sink_skips_clear_when_disabled() {
        let mut sink = TerminalSink::with_writer(Vec::new(), false);
        sink.clear().unwrap();
        sink.show("report").unwrap();
        assert_eq!(String::from_utf8(sink.into_inner()).unwrap(), "report\n");
    }

    #[test]
    fn terminal_sink_clears_before_report() {
        let mut sink = TerminalSink::with_writer(Vec::new(), true);
        sink.clear().unwrap();
        sink.show("report").unwrap();
        let out = String::from_utf8(sink.into_inner()).unwrap();
        assert!(out.starts_with(CLEAR_SEQUENCE));
        assert!(out.ends_with("report\n"));
    }
}
