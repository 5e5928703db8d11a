use std::sync::Arc;

use anyhow::Context;
use dotenv::dotenv;
use sqlx::postgres::PgPoolOptions;
use taxmitra::{config::Config, db::userdb::UserExt, db::DBClient, routes::create_router, AppState};

#[tokio::main]
async fn main() {
    dotenv().ok();

    let config = match Config::init() {
        Ok(config) => config,
        Err(err) => {
            eprintln!("🔥 Invalid configuration: {}", err);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_max_level(config.log_level)
        .init();

    if let Err(err) = run(config).await {
        tracing::error!("🔥 {:#}", err);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> anyhow::Result<()> {
    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to the database")?;
    tracing::info!("✅ Connection to the database is successful!");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run database migrations")?;

    let db_client = DBClient::new(pool);
    db_client
        .ensure_admin(&config.admin_email)
        .await
        .context("Failed to seed the administrator account")?;

    let port = config.port;
    let app_state = AppState {
        env: config,
        db_client,
    };
    let app = create_router(Arc::new(app_state));

    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port))
        .await
        .with_context(|| format!("Failed to bind port {}", port))?;
    tracing::info!("🚀 Server is running on http://localhost:{}", port);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
