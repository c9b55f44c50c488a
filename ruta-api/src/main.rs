use std::net::SocketAddr;
use std::sync::Arc;

use ruta_api::{app, AppState};
use ruta_engine::{
    BookingFinalizer, LeaseReconciler, LockCoordinator, SeatNotifier, SelectionService, TokenSigner,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ruta_api=debug,tower_http=debug,axum::rejection=trace".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ruta_store::app_config::Config::load().expect("Failed to load config");
    tracing::info!("Starting Ruta API on port {}", config.server.port);

    let db = ruta_store::DbClient::new(&config.database.url)
        .await
        .expect("Failed to connect to Postgres");
    db.migrate().await.expect("Failed to run migrations");
    let db = Arc::new(db);

    let redis = ruta_store::RedisClient::new(&config.redis.url)
        .await
        .expect("Failed to connect to Redis");

    let notifier = SeatNotifier::new(256);
    let signer = TokenSigner::new(config.auth.token_secret.clone());

    let coordinator = Arc::new(LockCoordinator::new(
        db.pool.clone(),
        signer.clone(),
        notifier.clone(),
        config.booking_rules.lease_seconds,
    ));
    let finalizer = Arc::new(BookingFinalizer::new(
        db.pool.clone(),
        signer,
        notifier.clone(),
    ));
    let selection = Arc::new(SelectionService::new(
        Arc::new(redis),
        notifier.clone(),
        config.booking_rules.selection_ttl_seconds,
    ));

    // Background safety net for abandoned leases
    let _reconciler = LeaseReconciler::new(
        db.pool.clone(),
        notifier.clone(),
        config.booking_rules.reconcile_interval_seconds,
    )
    .spawn();

    let app_state = AppState {
        db,
        coordinator,
        finalizer,
        selection,
        notifier,
    };

    let app = app(app_state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server.port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await.unwrap();
    axum::serve(listener, app).await.unwrap();
}
