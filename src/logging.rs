// Logging setup.
// Installs a tracing subscriber on stderr so stdout stays free for the page.

use tracing_subscriber::EnvFilter;

/// Create an environment filter based on verbosity level
pub fn create_env_filter(verbosity: u8) -> EnvFilter {
    if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else {
        EnvFilter::new(verbosity_directives(verbosity))
    }
}

fn verbosity_directives(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "repocards=warn",
        1 => "repocards=info",
        2 => "repocards=debug",
        // -vvv: include HTTP client internals
        _ => "repocards=trace,reqwest=debug,hyper=debug",
    }
}

/// Initialize console logging.
pub fn init_logging(verbosity: u8) {
    tracing_subscriber::fmt()
        .with_env_filter(create_env_filter(verbosity))
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();
}
