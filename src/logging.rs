use tracing_subscriber::EnvFilter;

use crate::config::LoggingSettings;

/// Install the global tracing subscriber
///
/// `RUST_LOG` takes precedence over the configured level. Calling this
/// twice is harmless; the second subscriber is dropped.
pub fn init(settings: &LoggingSettings) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&settings.level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_level(true);

    let installed = match settings.format.as_str() {
        "pretty" => subscriber.pretty().try_init(),
        "full" => subscriber.try_init(),
        _ => subscriber.compact().try_init(),
    };

    if installed.is_err() {
        tracing::debug!("Tracing subscriber already installed");
    }
}
