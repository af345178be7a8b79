use clap::Parser;
use slotboard::domain::ports::AvailabilityService;
use slotboard::utils::{logger, validation::Validate};
use slotboard::{
    AvailabilityEngine, BoardSettings, CliConfig, HttpBookingSource, HttpHoursSource, TokenCache,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = CliConfig::parse();

    logger::init_cli_logger(cli.verbose);

    tracing::info!("Starting slotboard");
    if cli.verbose {
        tracing::debug!("CLI config: {:?}", cli);
    }

    let settings = BoardSettings::from_file(&cli.config)?;
    if let Err(e) = settings.validate() {
        tracing::error!("Configuration validation failed: {}", e);
        eprintln!("Configuration validation failed: {}", e);
        std::process::exit(1);
    }

    let tz = settings.timezone()?;
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(settings.request_timeout_seconds()))
        .build()?;

    let tokens = Arc::new(TokenCache::new(
        client.clone(),
        settings.auth.base_url.clone(),
        settings.token_paths(),
        settings.auth.client_id.clone(),
        settings.auth.client_secret.clone(),
        settings.token_safety_margin_seconds(),
    ));

    let hours_source = HttpHoursSource::new(
        client.clone(),
        settings.upstream.base_url.clone(),
        settings.upstream.location_id.clone(),
        tokens.clone(),
    );
    let booking_source = HttpBookingSource::new(
        client,
        settings.upstream.base_url.clone(),
        settings.upstream.resource_id.clone(),
        tokens,
    );

    let engine: Arc<dyn AvailabilityService> = Arc::new(AvailabilityEngine::new(
        hours_source,
        booking_source,
        tz,
        settings.fallback_window(),
    ));
    let router = slotboard::app::routes::build_router(engine);

    let port = cli.port.unwrap_or_else(|| settings.listen_port());
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Listening on port {} (timezone {})", port, tz);

    axum::serve(listener, router).await?;

    Ok(())
}
