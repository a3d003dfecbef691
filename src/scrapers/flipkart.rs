//! Flipkart search results scraper

use std::time::Duration;

use anyhow::{Result, anyhow};
use async_trait::async_trait;
use reqwest::Client;
use tracing::{info, warn};

use crate::extractor::CardExtractor;
use crate::models::Product;
use crate::traits::{
    ListingSource, ScraperConfig, SiteSelectors, StrategySpec, default_max_products,
    default_timeout_secs,
};

impl ScraperConfig {
    /// Built-in configuration for Flipkart's mobile search results
    pub fn flipkart() -> Self {
        Self {
            name: "Flipkart".to_string(),
            base_url: "https://www.flipkart.com".to_string(),
            search_url_pattern: "https://www.flipkart.com/search?q={query}&sort=price_asc"
                .to_string(),
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64)".to_string(),
            timeout_secs: default_timeout_secs(),
            max_products: default_max_products(),
            selectors: SiteSelectors {
                product_container: "a.CGtC98".to_string(),
                title: vec![
                    StrategySpec::attr("div.Otbq5D img", "alt"),
                    StrategySpec::text("div.KzDlHZ"),
                ],
                price: vec![
                    StrategySpec::text("div.Nx9bqj, div.CxhGGd"),
                    StrategySpec::text("div._30jeq3"),
                ],
                link: vec![StrategySpec::own_attr("href")],
                image: vec![StrategySpec::attr("img.DByuf4", "src")],
                rating: vec![StrategySpec::text("div.XQDdHH")],
                discount: vec![StrategySpec::text("div.UkUFwK span")],
                reviews: vec![StrategySpec::text("span.Wphh3N")],
                specs: "li".to_string(),
            },
        }
    }
}

/// Scraper implementation for Flipkart-style search pages
pub struct FlipkartScraper {
    client: Client,
    config: ScraperConfig,
    extractor: CardExtractor,
}

impl FlipkartScraper {
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        let extractor = CardExtractor::new(&config)?;

        Ok(Self {
            client,
            config,
            extractor,
        })
    }

    /// Search URL for `query`, words joined with `+`
    pub fn build_search_url(&self, query: &str) -> String {
        let encoded = query
            .split_whitespace()
            .map(|word| urlencoding::encode(word).into_owned())
            .collect::<Vec<_>>()
            .join("+");
        self.config.search_url_pattern.replace("{query}", &encoded)
    }

    async fn fetch_html(&self, url: &str) -> Result<String> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(anyhow!(
                "Failed to fetch search page from {}: {}",
                self.config.name,
                response.status()
            ));
        }

        Ok(response.text().await?)
    }
}

#[async_trait]
impl ListingSource for FlipkartScraper {
    async fn search(&self, query: &str) -> Result<Vec<Product>> {
        let url = self.build_search_url(query);
        info!("Fetching URL: {}", url);

        let html = self.fetch_html(&url).await.inspect_err(|e| {
            warn!("Scraping error on {}: {:#}", self.config.name, e);
        })?;

        Ok(self.extractor.extract(&html))
    }
}
