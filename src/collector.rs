// Sample collection: run the measurement tool once and parse its terse output.

use crate::config::SamplingConfig;
use crate::error::{ParseError, SampleError};
use crate::models::{Metric, NetworkSample};
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::process::Command;
use tracing::instrument;

/// Install hint shown when the default tool is missing.
pub const INSTALL_HINT: &str = "install speedtest-cli first, e.g. `brew install speedtest-cli` or `pip install speedtest-cli`";

/// Source of samples driven by the scheduler.
pub trait Collector: Send {
    fn collect(&self) -> impl Future<Output = Result<NetworkSample, SampleError>> + Send;
}

/// Runs an external command (by default `speedtest --simple`) per sample.
#[derive(Debug, Clone)]
pub struct CommandCollector {
    program: String,
    args: Vec<String>,
    timeout: Option<Duration>,
}

impl CommandCollector {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            timeout: None,
        }
    }

    pub fn from_config(config: &SamplingConfig) -> Self {
        Self {
            program: config.command.clone(),
            args: config.args.clone(),
            timeout: config.timeout_secs.map(Duration::from_secs),
        }
    }

    /// Bound each invocation; the child is killed when the deadline passes.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    #[instrument(skip(self), fields(tool = %self.program, operation = "collect_sample"))]
    pub async fn run(&self) -> Result<NetworkSample, SampleError> {
        let mut cmd = Command::new(&self.program);
        cmd.args(&self.args).kill_on_drop(true);
        // Own process group: terminal SIGINT goes to us only, the in-flight run finishes.
        #[cfg(unix)]
        cmd.process_group(0);

        let result = match self.timeout {
            Some(timeout) => tokio::time::timeout(timeout, cmd.output())
                .await
                .map_err(|_| SampleError::Timeout {
                    tool: self.program.clone(),
                    timeout,
                })?,
            None => cmd.output().await,
        };
        let output = result.map_err(|e| SampleError::Execution {
            tool: self.program.clone(),
            reason: match e.kind() {
                std::io::ErrorKind::NotFound => "command not found".to_string(),
                _ => e.to_string(),
            },
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(SampleError::Execution {
                tool: self.program.clone(),
                reason: format!("{} ({})", output.status, stderr.trim()),
            });
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let sample = parse_output(&stdout).map_err(|source| SampleError::Parse {
            tool: self.program.clone(),
            source,
        })?;
        tracing::debug!(
            ping = sample.ping,
            download = sample.download,
            upload = sample.upload,
            "sample collected"
        );
        Ok(sample)
    }
}

impl Collector for CommandCollector {
    fn collect(&self) -> impl Future<Output = Result<NetworkSample, SampleError>> + Send {
        self.run()
    }
}

/// Parse terse tool output: lines in order ping, download, upload; the second
/// whitespace token of each line is the value. Lines past the third are ignored.
pub fn parse_output(output: &str) -> Result<NetworkSample, ParseError> {
    let lines: Vec<&str> = output.lines().collect();
    let value = |metric: Metric, index: usize| -> Result<f64, ParseError> {
        let line = lines.get(index).ok_or(ParseError::MissingLine {
            metric,
            lines: lines.len(),
        })?;
        let token = line
            .split_whitespace()
            .nth(1)
            .ok_or_else(|| ParseError::MissingValue {
                metric,
                line: line.to_string(),
            })?;
        token
            .parse::<f64>()
            .ok()
            .filter(|v| v.is_finite())
            .ok_or_else(|| ParseError::InvalidNumber {
                metric,
                token: token.to_string(),
            })
    };

    Ok(NetworkSample {
        ping: value(Metric::Ping, 0)?,
        download: value(Metric::Download, 1)?,
        upload: value(Metric::Upload, 2)?,
    })
}

/// Find `program` on PATH (or check it directly when it contains a path separator).
pub fn locate_tool(program: &str) -> Result<PathBuf, SampleError> {
    let missing = || SampleError::ToolMissing {
        tool: program.to_string(),
    };
    let direct = Path::new(program);
    if direct.components().count() > 1 {
        return direct
            .is_file()
            .then(|| direct.to_path_buf())
            .ok_or_else(missing);
    }

    let path_var = std::env::var_os("PATH").ok_or_else(missing)?;
    std::env::split_paths(&path_var)
        .flat_map(|dir| candidates(&dir, program))
        .find(|candidate| candidate.is_file())
        .ok_or_else(missing)
}

fn candidates(dir: &Path, program: &str) -> Vec<PathBuf> {
    let mut out = vec![dir.join(program)];
    if cfg!(windows) {
        out.push(dir.join(format!("{}.exe", program)));
    }
    out
}
