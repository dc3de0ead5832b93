use dotenvy::dotenv;
use meal_planner::{
    api::{self, AppState},
    config::{database, settings},
    core::{
        catalog::seed_meals,
        ranking::{HttpMealRanker, MealRanker, NoopRanker},
    },
    errors::Result,
};
use std::{sync::Arc, time::Duration};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // 1. Initialize tracing (as early as possible)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // 2. Load .env file; env vars can also be set externally
    dotenv().ok();
    info!("Attempted to load .env file.");

    // 3. Load config.toml (missing file means defaults) with env overrides
    let app_config = settings::load_default_config()
        .inspect_err(|e| error!("Failed to load configuration: {}", e))?;

    // 4. Connect and ensure the schema
    let db = database::create_connection()
        .await
        .inspect_err(|e| error!("Failed to connect to database: {}", e))?;
    database::create_tables(&db)
        .await
        .inspect(|()| info!("Database initialized successfully."))
        .inspect_err(|e| error!("Failed to create tables: {}", e))?;

    // 5. Seed catalog meals from configuration
    seed_meals(&db, &app_config.meals)
        .await
        .inspect_err(|e| error!("Failed to seed catalog meals: {}", e))?;

    // 6. Ranking is optional
    let ranker: Arc<dyn MealRanker> = match app_config.ranking.url.as_deref() {
        Some(url) => Arc::new(HttpMealRanker::new(
            url,
            Duration::from_millis(app_config.ranking.timeout_ms),
        )?),
        None => {
            warn!("No ranking service configured; plans keep catalog order");
            Arc::new(NoopRanker)
        }
    };

    // 7. Serve
    let state = Arc::new(AppState {
        db,
        ranker,
        stores: app_config.stores,
    });
    let listener = tokio::net::TcpListener::bind(&app_config.server.bind_address)
        .await
        .inspect_err(|e| error!("Failed to bind {}: {}", app_config.server.bind_address, e))?;
    info!("Meal planner listening on {}", app_config.server.bind_address);

    axum::serve(listener, api::router(state)).await?;
    Ok(())
}
