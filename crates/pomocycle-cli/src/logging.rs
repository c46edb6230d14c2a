use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// Install the tracing subscriber.
///
/// `RUST_LOG` wins when set; otherwise `info`, or `debug` with `--verbose`.
/// Output goes to stderr so stdout stays clean for status lines and JSON.
pub fn init_logging(verbose: bool) {
    let default = if verbose {
        "pomocycle=debug,pomocycle_core=debug"
    } else {
        "pomocycle=info,pomocycle_core=info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .with(filter)
        .init();
}
