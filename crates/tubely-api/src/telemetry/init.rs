use tracing_subscriber::{
    fmt::format::Format, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter,
};

const DEFAULT_DIRECTIVES: &str = "tubely=debug,tower_http=debug";

/// Install the global subscriber with a `RUST_LOG` filter.
///
/// Production logs are JSON lines; everything else gets the compact console format.
pub fn init_telemetry(environment: &str) -> Result<(), Box<dyn std::error::Error>> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_DIRECTIVES.into());
    let production = matches!(environment.to_lowercase().as_str(), "production" | "prod");

    if production {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                tracing_subscriber::fmt::layer()
                    .json()
                    .with_current_span(true)
                    .with_span_list(false),
            )
            .try_init()?;
    } else {
        let console_fmt = tracing_subscriber::fmt::layer().event_format(
            Format::default()
                .compact()
                .with_target(false)
                .without_time(),
        );
        tracing_subscriber::registry()
            .with(filter)
            .with(console_fmt)
            .try_init()?;
    }

    tracing::info!(environment = %environment, "Tracing initialized");
    Ok(())
}
