use anyhow::Result;
use clap::Parser;
use speedtracker::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = cli::Args::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let app_config = config::AppConfig::load(args.config.as_deref())?.with_interval(args.interval)?;

    // Quiet only affects the banner; cycle reports still print.
    if args.quiet {
        println!("Okay, its quiet time.");
    } else {
        println!("{}", version::banner());
    }

    match collector::locate_tool(&app_config.sampling.command) {
        Ok(path) => tracing::debug!(tool = %path.display(), "measurement tool found"),
        Err(e) if app_config.sampling.require_tool => {
            tracing::error!(error = %e, hint = collector::INSTALL_HINT, "measurement tool missing");
            return Err(e.into());
        }
        Err(e) => {
            tracing::warn!(error = %e, hint = collector::INSTALL_HINT, "measurement tool missing; continuing");
        }
    }

    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    tokio::spawn(async move {
        wait_for_signal().await;
        tracing::info!("Received shutdown signal");
        let _ = shutdown_tx.send(());
    });

    let mut scheduler = scheduler::Scheduler::new(
        collector::CommandCollector::from_config(&app_config.sampling),
        report::TerminalSink::stdout(app_config.display.clear_screen),
        scheduler::SchedulerConfig::from(&app_config),
    );
    let stats = scheduler.run(shutdown_rx).await?;

    tracing::info!(
        samples = stats.count,
        avg_ping = stats.ping.avg,
        avg_download = stats.download.avg,
        avg_upload = stats.upload.avg,
        "session summary"
    );
    Ok(())
}

async fn wait_for_signal() {
    #[cfg(unix)]
    {
        let mut sigterm =
            match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                Ok(s) => s,
                Err(_) => {
                    let _ = tokio::signal::ctrl_c().await;
                    return;
                }
            };
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {}
            _ = sigterm.recv() => {}
        }
    }
    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
