use dynprice_api::{app, AppState};
use dynprice_core::PricingEngine;
use std::net::SocketAddr;
use std::path::Path;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "dynprice_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = dynprice_store::Config::load().expect("Failed to load config");
    tracing::info!("Starting dynprice API on port {}", config.server.port);

    // A service without a model must not come up at all.
    let model = dynprice_store::load_model(Path::new(&config.model.path))
        .expect("Failed to load scoring model");

    let engine = PricingEngine::new(Arc::new(model), config.pricing.clone().into())
        .expect("Invalid pricing configuration");

    let app_state = AppState {
        engine: Arc::new(engine),
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
