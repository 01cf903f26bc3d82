use crate::cli::ServeArgs;
use crate::infra::{
    demo_agents, demo_listings, AppState, InMemoryAuthProvider, InMemoryMediaStore,
    InMemoryRemoteStore,
};
use crate::routes::{with_console_routes, ConsoleState};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use estate_console::catalog::CatalogService;
use estate_console::config::{AppConfig, AppEnvironment};
use estate_console::error::AppError;
use estate_console::telemetry;
use std::sync::atomic::Ordering;
use std::sync::{Arc, Mutex};
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(config.environment, &config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = if config.environment == AppEnvironment::Production {
        Arc::new(InMemoryRemoteStore::default())
    } else {
        Arc::new(InMemoryRemoteStore::seeded(demo_listings(), demo_agents()))
    };
    let mut catalog = CatalogService::new(store, config.capabilities);
    catalog.refresh()?;

    let console_state = ConsoleState {
        catalog: Arc::new(Mutex::new(catalog)),
        media: Arc::new(InMemoryMediaStore::default()),
        auth: Arc::new(InMemoryAuthProvider::default()),
    };

    let app = with_console_routes(console_state)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "estate console backend ready");

    axum::serve(listener, app).await?;
    Ok(())
}
