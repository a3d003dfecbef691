use std::sync::Arc;

use anyhow::Result;
use tracing::info;

mod advisor;
mod cache;
mod config;
mod extractor;
mod formatter;
mod gemini;
mod models;
mod prompt;
mod scoring;
mod scrapers;
mod traits;
mod web;

use advisor::PhoneAdvisor;
use cache::CachedSource;
use config::AppConfig;
use gemini::GeminiClient;
use scrapers::FlipkartScraper;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt::init();

    info!("Starting Phone Advisor");

    let config = AppConfig::from_env()?;

    let scraper = FlipkartScraper::new(config.scraper.clone())?;
    let source = CachedSource::new(scraper, config.cache_capacity);
    let generator = GeminiClient::new(
        config.gemini_api_key.clone(),
        &config.gemini_model,
        config.gemini_timeout,
    )?;

    let advisor = PhoneAdvisor::new(Arc::new(source), Arc::new(generator));
    let app = web::router(web::AppState { advisor });

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(
        "Listening on {} (model {}, cache capacity {})",
        addr, config.gemini_model, config.cache_capacity
    );

    axum::serve(listener, app).await?;
    Ok(())
}
