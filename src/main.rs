use tracing::{error, info};

use college::file::FileStorage;
use college::web::WebServer;
use college::{Config, Database};

#[tokio::main]
async fn main() {
    // Environment overrides may come from a .env file
    let _ = dotenvy::dotenv();

    let config = match Config::load_with_env("config.toml").and_then(|c| c.validate().map(|_| c))
    {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Invalid configuration: {e}");
            std::process::exit(1);
        }
    };

    if let Err(e) = college::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        college::logging::init_console_only(&config.logging.level);
    }

    info!(production = config.server.production, "College admissions backend");

    let db = match Database::open(&config.database.path).await {
        Ok(db) => db,
        Err(e) => {
            error!(path = %config.database.path, error = %e, "Failed to open database");
            std::process::exit(1);
        }
    };

    let storage = match FileStorage::new(&config.files.storage_path) {
        Ok(storage) => storage,
        Err(e) => {
            error!(path = %config.files.storage_path, error = %e, "Failed to prepare file storage");
            std::process::exit(1);
        }
    };

    let server = match WebServer::new(&config, db, storage) {
        Ok(server) => server,
        Err(e) => {
            error!(error = %e, "Failed to configure web server");
            std::process::exit(1);
        }
    };

    if let Err(e) = server.run().await {
        error!(error = %e, "Web server stopped");
        std::process::exit(1);
    }
}
