use rgen_vision::{logger, server, Config, InferenceManager};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env()?;
    logger::init_with_config(config.logger.clone())?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    logger::log_startup_info(env!("CARGO_PKG_NAME"), env!("CARGO_PKG_VERSION"), &config);
    logger::log_config_info(&config);

    let service = match InferenceManager::from_config(&config).await {
        Ok(service) => service,
        Err(e) => {
            log::error!("❌ Failed to initialize {} backend: {}", config.provider, e);
            return Err(e.into());
        }
    };

    log::info!("🔧 Press Ctrl+C to stop the server");
    server::run(config.server, service).await?;

    Ok(())
}
