use tracing_subscriber::{
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
    EnvFilter,
};
use std::env;
use std::fs;
use std::io;

/// Initialize logging with console and file output
pub fn init_logging() {
    let log_level = env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
    let enable_backtrace = env::var("RUST_BACKTRACE").unwrap_or_else(|_| "0".to_string()) == "1";

    // Remove existing log.txt file if it exists
    if let Err(e) = fs::remove_file("log.txt") {
        if e.kind() != io::ErrorKind::NotFound {
            eprintln!("Warning: Failed to remove existing log.txt: {}", e);
        }
    }

    let log_file = fs::File::create("log.txt").expect("Failed to create log.txt");

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let mut filter = EnvFilter::new(&log_level);
        filter = filter.add_directive("tumblebox=debug".parse().unwrap());
        filter
    });

    let subscriber = tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer()
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_ansi(true)
        )
        .with(fmt::layer()
            .with_writer(log_file)
            .with_span_events(FmtSpan::CLOSE)
            .with_target(true)
            .with_ansi(false) // No ANSI codes in file
        );

    subscriber.init();

    // Set up panic hook for better error reporting
    std::panic::set_hook(Box::new(move |panic_info| {
        tracing::error!("Panic occurred: {}", panic_info);

        if let Some(location) = panic_info.location() {
            tracing::error!(
                "Panic location: {}:{}:{}",
                location.file(),
                location.line(),
                location.column()
            );
        }

        if enable_backtrace {
            tracing::error!("Backtrace:\n{:?}", std::backtrace::Backtrace::capture());
        }
    }));

    tracing::info!("Logging initialized with level: {}", log_level);
    tracing::info!("File logging enabled: log.txt (session-based, cleaned on startup)");
}
