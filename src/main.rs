//! Entry point: loads configuration, bootstraps the composition root, and
//! serves the REST and gRPC surfaces concurrently until shutdown.

use std::net::SocketAddr;

use tonic::transport::Server as GrpcServer;
use tracing::{info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use hodei_pdp_api::bootstrap::bootstrap;
use hodei_pdp_api::config::Config;
use hodei_pdp_api::{grpc, handlers};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::from_env();
    config.validate().map_err(|e| -> Box<dyn std::error::Error> { e.into() })?;

    initialize_logging(&config)?;

    info!("starting PDP API");
    info!(address = %config.server_address(), grpc_address = %config.grpc_address(), "configuration loaded");

    let app_state = bootstrap(&config).await.map_err(|e| {
        eprintln!("bootstrap failed: {e}");
        e
    })?;

    let router = handlers::build_router(app_state.clone(), &config);
    let listener = tokio::net::TcpListener::bind(config.server_address()).await?;
    let rest_addr = listener.local_addr()?;

    let grpc_addr: SocketAddr = config.grpc_address().parse()?;
    let grpc_service = grpc::PdpService::new(app_state.clone(), config.auth.clone());

    info!(%rest_addr, "REST listener bound");
    info!(%grpc_addr, "gRPC listener bound");

    let rest_server = axum::serve(listener, router).with_graceful_shutdown(shutdown_signal());
    let grpc_server = GrpcServer::builder()
        .add_service(grpc_service)
        .serve_with_shutdown(grpc_addr, shutdown_signal());

    let (rest_result, grpc_result) = tokio::join!(rest_server, grpc_server);
    rest_result?;
    grpc_result?;

    app_state.cluster_registry.deregister().await;
    info!("shut down gracefully");
    Ok(())
}

fn initialize_logging(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("hodei_pdp_api={0},policies={0},kernel={0}", config.logging.level)));

    match config.logging.format.as_str() {
        "json" => {
            tracing_subscriber::registry().with(env_filter).with(fmt::layer().json()).init();
        }
        "compact" => {
            tracing_subscriber::registry().with(env_filter).with(fmt::layer().compact()).init();
        }
        _ => {
            tracing_subscriber::registry().with(env_filter).with(fmt::layer().pretty()).init();
        }
    }

    Ok(())
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        signal::ctrl_c().await.expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => warn!("received Ctrl+C"),
        _ = terminate => warn!("received SIGTERM"),
    }

    info!("starting graceful shutdown");
}
