//! Tracing subscriber bootstrap.

use anyhow::{anyhow, Context};
use shelf_kernel::settings::{LogFormat, TelemetrySettings};
use tracing_subscriber::EnvFilter;

/// Install the global tracing subscriber.
///
/// `RUST_LOG` takes precedence over the configured filter directive. Logs go to
/// stderr so command output on stdout stays machine readable. Fails if a global
/// subscriber is already installed.
pub fn init(settings: &TelemetrySettings) -> anyhow::Result<()> {
    let filter = build_filter(settings)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true);

    match settings.log_format {
        LogFormat::Json => builder.json().try_init(),
        LogFormat::Pretty => builder.try_init(),
    }
    .map_err(|e| anyhow!(e))
    .context("failed to install tracing subscriber")?;

    tracing::debug!(
        target: "shelf-telemetry",
        format = ?settings.log_format,
        "tracing initialized"
    );
    Ok(())
}

fn build_filter(settings: &TelemetrySettings) -> anyhow::Result<EnvFilter> {
    if let Ok(filter) = EnvFilter::try_from_default_env() {
        return Ok(filter);
    }

    EnvFilter::try_new(&settings.filter)
        .with_context(|| format!("invalid log filter '{}'", settings.filter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_malformed_filter() {
        if std::env::var_os("RUST_LOG").is_some() {
            return;
        }
        let settings = TelemetrySettings {
            log_format: LogFormat::Pretty,
            filter: "shelf=notalevel".to_string(),
        };
        assert!(build_filter(&settings).is_err());
    }

    #[test]
    fn accepts_default_filter() {
        assert!(build_filter(&TelemetrySettings::default()).is_ok());
    }
}
