use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init_cli_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slotboard=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("slotboard=info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .with_line_number(false)
                .compact(),
        )
        .init();
}

/// Clip an upstream response body for log output.
pub fn truncated(body: &str) -> String {
    const MAX_CHARS: usize = 256;
    if body.chars().count() <= MAX_CHARS {
        body.to_string()
    } else {
        let mut clipped: String = body.chars().take(MAX_CHARS).collect();
        clipped.push('…');
        clipped
    }
}
