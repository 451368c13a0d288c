use crate::config::SystemConfig;

/// Installs the global fmt subscriber. `RUST_LOG` wins over `config.log_level`.
///
/// Call once, from `main`.
pub fn setup_tracing(config: &SystemConfig) {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_timer(tracing_subscriber::fmt::time::uptime())
        .compact()
        .init();
}
