use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Config file looked up in the working directory when neither `--config` nor `CONFIG_FILE` is set.
pub const DEFAULT_CONFIG_FILE: &str = "speedtracker.toml";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub sampling: SamplingConfig,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SamplingConfig {
    /// Seconds between cycles.
    pub interval_secs: u64,
    pub command: String,
    pub args: Vec<String>,
    /// Deadline per invocation; unset means wait as long as the tool takes.
    pub timeout_secs: Option<u64>,
    /// Fail at startup when `command` is not on PATH instead of warning and continuing.
    pub require_tool: bool,
}

impl Default for SamplingConfig {
    fn default() -> Self {
        Self {
            interval_secs: 15,
            command: "speedtest".into(),
            args: vec!["--simple".into()],
            timeout_secs: None,
            require_tool: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    pub clear_screen: bool,
    pub format: ReportFormat,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            clear_screen: true,
            format: ReportFormat::Text,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportFormat {
    #[default]
    Text,
    Json,
}

impl AppConfig {
    /// Resolve the config file: explicit path, then `CONFIG_FILE`, then
    /// `speedtracker.toml` if present, else defaults.
    pub fn load(explicit: Option<&Path>) -> anyhow::Result<Self> {
        let path = explicit
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os("CONFIG_FILE").map(PathBuf::from));
        let path = match path {
            Some(p) => p,
            None => {
                let fallback = PathBuf::from(DEFAULT_CONFIG_FILE);
                if !fallback.is_file() {
                    return Ok(Self::default());
                }
                fallback
            }
        };
        let s = std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("reading {}: {}", path.display(), e))?;
        Self::load_from_str(&s)
    }

    /// Parse and validate config from a string (e.g. for tests).
    pub fn load_from_str(s: &str) -> anyhow::Result<Self> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Apply command-line overrides and re-validate.
    pub fn with_interval(mut self, interval_secs: Option<u64>) -> anyhow::Result<Self> {
        if let Some(secs) = interval_secs {
            self.sampling.interval_secs = secs;
        }
        self.validate()?;
        Ok(self)
    }

    fn validate(&self) -> anyhow::Result<()> {
        anyhow::ensure!(
            self.sampling.interval_secs > 0,
            "sampling.interval_secs must be > 0, got {}",
            self.sampling.interval_secs
        );
        anyhow::ensure!(
            !self.sampling.command.trim().is_empty(),
            "sampling.command must be non-empty"
        );
        if let Some(timeout) = self.sampling.timeout_secs {
            anyhow::ensure!(
                timeout > 0,
                "sampling.timeout_secs must be > 0 when set, got {}",
                timeout
            );
        }
        Ok(())
    }
}
