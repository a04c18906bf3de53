use std::{env, error::Error, fs::OpenOptions, net::SocketAddr, process::exit, sync::Arc};

use axum::{
    Router,
    extract::{MatchedPath, Request},
    middleware,
};
use axum_server::Handle;
use clap::Parser;
use rusqlite::Connection;
use time::Duration;
use tower_http::trace::TraceLayer;
use tracing::Span;

#[cfg(debug_assertions)]
use tower_livereload::LiveReloadLayer;

use tracing_subscriber::{EnvFilter, Layer, filter, layer::SubscriberExt, util::SubscriberInitExt};

use expense_tracker::{AppState, build_router, graceful_shutdown, logging_middleware};

/// Serve the expense tracker on localhost.
///
/// The key for the session cookies is derived from the `SECRET` environment variable.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// SQLite database file. It is created if it does not exist.
    #[arg(long)]
    db_path: String,

    #[arg(short, long, default_value_t = 3000)]
    port: u16,

    /// Canonical timezone name that decides what "today" is, e.g. "Pacific/Auckland".
    #[arg(long, default_value = "Etc/UTC")]
    timezone: String,

    /// Minutes of inactivity before a session ends, unless "remember me" was ticked.
    #[arg(long, default_value_t = 5)]
    cookie_minutes: i64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    setup_logging()?;

    let Ok(secret) = env::var("SECRET") else {
        eprintln!("Set the SECRET environment variable to a long random string.");
        exit(1);
    };

    let connection = Connection::open(&args.db_path)?;
    let state = AppState::new(connection, &secret, &args.timezone)?
        .with_cookie_duration(Duration::minutes(args.cookie_minutes));

    let router = with_request_spans(build_router(state))
        .layer(middleware::from_fn(logging_middleware));

    #[cfg(debug_assertions)]
    let router = router.layer(LiveReloadLayer::new());

    let handle = Handle::new();
    tokio::spawn(graceful_shutdown(handle.clone()));

    let addr = SocketAddr::from(([127, 0, 0, 1], args.port));
    tracing::info!("Serving {} on http://{addr}", args.db_path);

    axum_server::bind(addr)
        .handle(handle)
        .serve(router.into_make_service())
        .await?;

    Ok(())
}

/// Log to stdout at the level set by `RUST_LOG` (info by default) and keep a
/// debug-level copy in `debug.log`.
fn setup_logging() -> Result<(), Box<dyn Error>> {
    let stdout_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let stdout_log = tracing_subscriber::fmt::layer()
        .pretty()
        .with_filter(stdout_filter);

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")?;
    let file_log = tracing_subscriber::fmt::layer()
        .with_ansi(false)
        .with_writer(Arc::new(log_file))
        .with_filter(filter::LevelFilter::DEBUG);

    tracing_subscriber::registry()
        .with(stdout_log)
        .with(file_log)
        .try_init()?;

    Ok(())
}

/// Put every log line emitted while handling a request inside a span naming the route.
fn with_request_spans(router: Router) -> Router {
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request| -> Span {
            let route = request
                .extensions()
                .get::<MatchedPath>()
                .map(MatchedPath::as_str);

            tracing::debug_span!("request", method = %request.method(), uri = %request.uri(), route)
        })
        // Handlers log their own errors.
        .on_failure(());

    router.layer(trace_layer)
}
