use axum::Router;
use bus_radar::cache::GeoCache;
use bus_radar::config::Config;
use bus_radar::db::{BusRepository, PgBusRepository};
use bus_radar::services::google_maps::GoogleMapsClient;
use bus_radar::services::location_resolver::LocationResolver;
use bus_radar::services::path_provider::PathProvider;
use bus_radar::services::route_matcher::RouteMatcher;
use bus_radar::AppState;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "bus_radar=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = Config::from_env().map_err(|e| format!("Failed to load configuration: {}", e))?;

    tracing::info!("Starting bus-radar API server");

    // Create database connection pool
    tracing::info!("Connecting to database...");
    let db_pool = bus_radar::db::create_pool(&config.database_url).await?;
    tracing::info!("Database connection established");

    // Maps provider: one client serves both geocoding and directions
    let timeout = config.matcher.provider_timeout;
    let maps_client = Arc::new(match config.google_maps_base_url {
        Some(ref base_url) => GoogleMapsClient::with_config(
            config.google_maps_api_key.clone(),
            base_url.clone(),
            timeout,
        ),
        None => GoogleMapsClient::new(config.google_maps_api_key.clone(), timeout),
    });
    if !maps_client.has_credential() {
        tracing::warn!(
            "GOOGLE_MAPS_API_KEY not set: routes use straight-line paths and place names cannot be resolved"
        );
    }

    // Initialize services
    let bus_repo: Arc<dyn BusRepository> = Arc::new(PgBusRepository::new(db_pool));
    let geo_cache = Arc::new(GeoCache::new(
        maps_client.clone(),
        config.geocode_cache_max_entries,
    ));
    let resolver = LocationResolver::new(geo_cache.clone());
    let path_provider = PathProvider::new(maps_client, timeout);
    let matcher = RouteMatcher::new(path_provider, config.matcher.concurrency);

    // Create application state
    let state = Arc::new(AppState {
        bus_repo,
        geo_cache,
        resolver,
        matcher,
        matcher_config: config.matcher.clone(),
    });

    // Build router with CORS and tracing
    let app = Router::new()
        .nest("/api/v1", bus_radar::routes::create_router(state))
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = config.server_address();
    tracing::info!("Server listening on http://{}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
