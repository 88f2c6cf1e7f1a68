use std::path::Path;

use tracing::{info, warn};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_DATABASE_URL: &str = "sqlite://registry.db";

/// Loads `.env` if one is present next to the binary. Missing files are
/// fine; a present-but-unreadable file is not.
pub fn load_environment() -> Result<(), Box<dyn std::error::Error>> {
    let path = ".env";
    if !Path::new(path).exists() {
        warn!("Environment file {} not found, skipping", path);
        return Ok(());
    }

    dotenvy::from_filename_override(path)?;
    info!("Loaded environment from: {}", path);
    Ok(())
}

/// `PORT`, defaulting to 3000. An unparseable value falls back to the
/// default rather than refusing to start.
pub fn server_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|raw| raw.parse().ok())
        .unwrap_or(DEFAULT_PORT)
}

/// `DATABASE_URL`, defaulting to a local file-backed SQLite store.
pub fn database_url() -> String {
    std::env::var("DATABASE_URL").unwrap_or_else(|_| DEFAULT_DATABASE_URL.to_string())
}
