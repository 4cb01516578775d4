use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Default filter directive for a verbosity count (`-v`, `-vv`)
pub fn default_directive(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "decp_budget=info",
        1 => "decp_budget=debug",
        _ => "decp_budget=trace",
    }
}

/// Initializes logging to stderr.
///
/// `RUST_LOG` takes precedence over the verbosity flag. Stdout is left to
/// the command output (run summaries, configuration).
pub fn init_logging(verbosity: u8) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(verbosity)));

    let console_layer = fmt::layer().with_target(false).with_writer(std::io::stderr);

    // A subscriber may already be installed (tests calling into the CLI twice)
    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .try_init();
}
