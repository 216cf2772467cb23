//! Tracing setup: console layer on stderr plus an optional rolling JSON file sink.

use std::path::Path;

use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::FILE_GUARD;

pub fn init_tracing(
    json: bool,
    level: Option<&str>,
    logging: &carstate_config::Logging,
) -> eyre::Result<()> {
    let level = level.or(logging.level.as_deref()).unwrap_or("info");
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    // stdout carries command output; logs always go to stderr
    let console = if json {
        fmt::layer().json().with_writer(std::io::stderr).boxed()
    } else {
        fmt::layer()
            .with_target(false)
            .with_writer(std::io::stderr)
            .boxed()
    };

    let file = match logging.file.as_deref() {
        Some(path) => {
            let appender = rolling_appender(Path::new(path), logging.rotation.as_deref());
            let (writer, guard) = tracing_appender::non_blocking(appender);
            let _ = FILE_GUARD.set(guard);
            Some(fmt::layer().json().with_ansi(false).with_writer(writer))
        }
        None => None,
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(console)
        .with(file)
        .try_init()
        .map_err(|e| eyre::eyre!("install tracing subscriber: {e}"))
}

fn rolling_appender(
    path: &Path,
    rotation: Option<&str>,
) -> tracing_appender::rolling::RollingFileAppender {
    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let name = path
        .file_name()
        .map_or_else(|| "carstate.log".into(), |n| n.to_os_string());
    match rotation {
        Some("daily") => tracing_appender::rolling::daily(dir, name),
        Some("hourly") => tracing_appender::rolling::hourly(dir, name),
        _ => tracing_appender::rolling::never(dir, name),
    }
}
