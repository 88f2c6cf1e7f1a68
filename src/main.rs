use std::str::FromStr;

use rocket::{Build, Rocket, figment::Figment};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use tracing::{error, info};

use campus_registry::env::{database_url, load_environment, server_port};
use campus_registry::init_rocket;
use campus_registry::telemetry::init_tracing;

#[rocket::launch]
async fn rocket() -> Rocket<Build> {
    init_tracing();

    if let Err(e) = load_environment() {
        error!("Failed to load environment files: {}", e);
        panic!("Environment loading failed: {}", e);
    }

    let database_url = database_url();

    let connect_options = SqliteConnectOptions::from_str(&database_url)
        .expect("Invalid DATABASE_URL")
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await
        .expect("Failed to connect to SQLite database");

    info!("Running database migrations...");
    match sqlx::migrate!("./migrations").run(&pool).await {
        Ok(_) => info!("Migrations completed successfully"),
        Err(e) => {
            error!("Failed to run migrations: {}", e);
            panic!("Database migration failed: {}", e);
        }
    }

    let figment = Figment::from(rocket::Config::figment())
        .merge(("port", server_port()))
        .merge(("address", "0.0.0.0"));

    init_rocket(pool).configure(figment)
}
