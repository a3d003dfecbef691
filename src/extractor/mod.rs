//! Turns a search results page into [`Product`] records
//!
//! Extraction is tolerant: a field that cannot be found falls back to its
//! sentinel (`"N/A"` for the title, empty strings for links, `0` for the
//! price, `None` for the optional extras) and never drops the card.

mod strategy;

use std::collections::HashSet;

use anyhow::Result;
use scraper::{Html, Selector};
use tracing::{info, warn};

use crate::models::Product;
use crate::traits::ScraperConfig;

use strategy::FieldChain;

const MISSING_TITLE: &str = "N/A";

/// Compiled card extractor for one site configuration
pub struct CardExtractor {
    container: Selector,
    title: FieldChain,
    price: FieldChain,
    link: FieldChain,
    image: FieldChain,
    rating: FieldChain,
    discount: FieldChain,
    reviews: FieldChain,
    specs: Selector,
    base_url: String,
    max_products: usize,
}

impl CardExtractor {
    pub fn new(config: &ScraperConfig) -> Result<Self> {
        let selectors = &config.selectors;

        Ok(Self {
            container: strategy::parse_selector(&selectors.product_container)?,
            title: FieldChain::compile(&selectors.title)?,
            price: FieldChain::compile(&selectors.price)?,
            link: FieldChain::compile(&selectors.link)?,
            image: FieldChain::compile(&selectors.image)?,
            rating: FieldChain::compile(&selectors.rating)?,
            discount: FieldChain::compile(&selectors.discount)?,
            reviews: FieldChain::compile(&selectors.reviews)?,
            specs: strategy::parse_selector(&selectors.specs)?,
            base_url: config.base_url.clone(),
            max_products: config.max_products,
        })
    }

    /// Extract up to `max_products` unique products from `html`, in page order
    pub fn extract(&self, html: &str) -> Vec<Product> {
        let document = Html::parse_document(html);

        let mut products = Vec::new();
        let mut seen_titles = HashSet::new();
        let mut cards = 0;

        for card in document.select(&self.container) {
            if products.len() >= self.max_products {
                break;
            }
            cards += 1;

            let title = self
                .title
                .extract(card)
                .unwrap_or_else(|| MISSING_TITLE.to_string());

            // First occurrence wins
            if !seen_titles.insert(title.clone()) {
                continue;
            }

            let url = self
                .link
                .extract(card)
                .map(|href| absolutize(&self.base_url, &href))
                .unwrap_or_default();

            let specs = card
                .select(&self.specs)
                .map(|li| li.text().collect::<String>().trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();

            products.push(Product {
                title,
                price: self.price.extract(card).map_or(0, |p| parse_price(&p)),
                specs,
                url,
                image: self.image.extract(card).unwrap_or_default(),
                rating: self.rating.extract(card),
                discount: self.discount.extract(card),
                reviews: self.reviews.extract(card),
            });
        }

        if cards == 0 {
            warn!("No result cards matched the container selector");
        }
        info!(
            "Extracted {} products from {} cards",
            products.len(),
            cards
        );
        products
    }
}

/// Parse a displayed price like `₹15,999` into whole units, 0 if unparsable
pub fn parse_price(text: &str) -> u64 {
    let cleaned: String = text
        .replace('₹', "")
        .chars()
        .filter(|c| *c != ',' && !c.is_whitespace())
        .collect();

    cleaned.parse().unwrap_or(0)
}

fn absolutize(base_url: &str, href: &str) -> String {
    if href.starts_with("http") {
        href.to_string()
    } else if href.starts_with("//") {
        format!("https:{href}")
    } else {
        format!("{base_url}{href}")
    }
}
