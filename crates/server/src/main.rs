use clap::Parser;
use tollgate_core::{config, Strategy};
use tollgate_server::api::create_router;
use tollgate_server::api::handlers::AppState;
use tollgate_server::api::metrics;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "tollgate",
    about = "HTTP endpoint guarded by a token bucket rate limiter"
)]
struct Args {
    /// Port to listen on
    #[arg(short, long, env = "TOLLGATE_PORT", default_value_t = config::DEFAULT_PORT)]
    port: u16,

    /// Bucket capacity (maximum burst of requests)
    #[arg(long, env = "TOLLGATE_CAPACITY", default_value_t = config::DEFAULT_CAPACITY)]
    capacity: u32,

    /// Tokens restored per second
    #[arg(long, env = "TOLLGATE_REFILL_RATE", default_value_t = config::DEFAULT_REFILL_RATE)]
    refill_rate: f64,

    /// Limiter implementation: token-bucket or governor
    #[arg(long, env = "TOLLGATE_STRATEGY", default_value_t = Strategy::default())]
    strategy: Strategy,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive(
                    "tollgate_server=info"
                        .parse()
                        .expect("valid directive literal"),
                )
                .add_directive(
                    "tollgate_core=info"
                        .parse()
                        .expect("valid directive literal"),
                ),
        )
        .init();

    let args = Args::parse();

    if args.port == 0 {
        eprintln!("Error: port must be > 0");
        std::process::exit(1);
    }

    let limiter = args
        .strategy
        .build(args.capacity, args.refill_rate)
        .unwrap_or_else(|e| {
            eprintln!("Error: invalid rate limit configuration: {}", e);
            std::process::exit(1);
        });

    let prometheus_handle =
        metrics_exporter_prometheus::PrometheusBuilder::new().install_recorder()?;
    metrics::record_bucket_settings(args.capacity, args.refill_rate);

    let state = AppState::new(limiter, args.capacity, args.refill_rate, prometheus_handle);
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", args.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        port = args.port,
        capacity = args.capacity,
        refill_rate = args.refill_rate,
        strategy = %args.strategy,
        "tollgate ready"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(wait_for_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn wait_for_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("Received SIGINT"),
        _ = terminate => tracing::info!("Received SIGTERM"),
    }

    tracing::info!("Shutting down gracefully, draining in-flight requests...");
}
