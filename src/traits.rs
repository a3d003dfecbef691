//! Traits and configuration for site-agnostic scraping and text generation

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::gemini::GenerationError;
use crate::models::Product;

/// Configuration for a search results scraper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScraperConfig {
    /// Display name for the website
    pub name: String,
    /// Base URL prefixed to relative product links
    pub base_url: String,
    /// Search URL pattern with {query} placeholder
    pub search_url_pattern: String,
    /// Browser-like User-Agent sent with every request
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Maximum number of products kept from one results page
    #[serde(default = "default_max_products")]
    pub max_products: usize,
    pub selectors: SiteSelectors,
}

pub(crate) fn default_timeout_secs() -> u64 {
    10
}

pub(crate) fn default_max_products() -> usize {
    20
}

/// Where each product field lives inside a result card.
///
/// Every field is an ordered fallback chain: the first strategy that yields a
/// non-empty value wins.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SiteSelectors {
    /// Container selector for individual result cards
    pub product_container: String,
    pub title: Vec<StrategySpec>,
    pub price: Vec<StrategySpec>,
    pub link: Vec<StrategySpec>,
    pub image: Vec<StrategySpec>,
    #[serde(default)]
    pub rating: Vec<StrategySpec>,
    #[serde(default)]
    pub discount: Vec<StrategySpec>,
    #[serde(default)]
    pub reviews: Vec<StrategySpec>,
    /// Selector for the individual spec/feature lines
    pub specs: String,
}

/// One way of pulling a field out of a card
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StrategySpec {
    /// Trimmed text of the first element matching `selector`
    Text { selector: String },
    /// Attribute `attr` of the first element matching `selector`
    Attr { selector: String, attr: String },
    /// Attribute `attr` of the card element itself
    OwnAttr { attr: String },
}

impl StrategySpec {
    pub fn text(selector: &str) -> Self {
        Self::Text {
            selector: selector.to_string(),
        }
    }

    pub fn attr(selector: &str, attr: &str) -> Self {
        Self::Attr {
            selector: selector.to_string(),
            attr: attr.to_string(),
        }
    }

    pub fn own_attr(attr: &str) -> Self {
        Self::OwnAttr {
            attr: attr.to_string(),
        }
    }
}

impl ScraperConfig {
    /// Load a scraper configuration from a TOML file
    pub fn from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read selectors file {path}"))?;
        let config: ScraperConfig = toml::from_str(&content)
            .with_context(|| format!("Failed to parse selectors file {path}"))?;
        Ok(config)
    }
}

/// Trait for anything that can turn a free-text query into product listings
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Search for products matching `query`
    ///
    /// # Returns
    /// * `Result<Vec<Product>>` - Products in page order, or the fetch error
    async fn search(&self, query: &str) -> Result<Vec<Product>>;
}

/// Trait for a single-shot text generation backend
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerationError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_parses_from_toml() {
        let raw = r#"
            name = "Shop"
            base_url = "https://shop.example"
            search_url_pattern = "https://shop.example/s?q={query}"
            user_agent = "Mozilla/5.0"
            max_products = 5

            [selectors]
            product_container = "div.card"
            specs = "ul.features li"
            title = [{ kind = "text", selector = "h2" }]
            price = [
                { kind = "text", selector = "span.price" },
                { kind = "attr", selector = "span.price", attr = "data-value" },
            ]
            link = [{ kind = "own_attr", attr = "data-href" }]
            image = [{ kind = "attr", selector = "img", attr = "src" }]
        "#;

        let config: ScraperConfig = toml::from_str(raw).unwrap();
        assert_eq!(config.max_products, 5);
        assert_eq!(config.timeout_secs, 10);
        assert_eq!(config.selectors.price[1], StrategySpec::attr("span.price", "data-value"));
        assert_eq!(config.selectors.link[0], StrategySpec::own_attr("data-href"));
        assert!(config.selectors.rating.is_empty());
    }
}
