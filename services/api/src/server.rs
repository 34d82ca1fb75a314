use crate::cli::ServeArgs;
use crate::infra::{seed_demo_event, AppState, InMemoryEditingStore};
use crate::routes::with_editing_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use confedit::config::AppConfig;
use confedit::editing::EditingService;
use confedit::error::AppError;
use confedit::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let store = Arc::new(InMemoryEditingStore::default());
    let editing_service = Arc::new(EditingService::new(store.clone()));
    if args.seed_demo {
        let seed = seed_demo_event(&store, &editing_service)
            .map_err(|err| std::io::Error::other(err.to_string()))?;
        info!(event_id = seed.event_id.0, "seeded demo event");
    }

    let app = with_editing_routes(editing_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "contribution editing service ready");

    axum::serve(listener, app).await?;
    Ok(())
}
