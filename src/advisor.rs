use std::sync::Arc;

use tracing::{info, warn};

use crate::formatter::{SafeHtml, format_response};
use crate::models::{ScoredProduct, UserPreference};
use crate::prompt::{build_prompt, build_query};
use crate::scoring::rank;
use crate::traits::{ListingSource, TextGenerator};

pub const FETCH_FAILED: &str = "Failed to fetch phone data from Flipkart. Please try again later.";
pub const GENERATION_FAILED: &str = "Error generating recommendations. Please try again.";

/// What the results section of the page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Formatted model output
    Recommendation(SafeHtml),
    /// Static message shown in place of a recommendation
    Failure(&'static str),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recommendation {
    pub ranked: Vec<ScoredProduct>,
    pub verdict: Verdict,
}

/// Runs fetch, rank, prompt, generate and format for one submission
#[derive(Clone)]
pub struct PhoneAdvisor {
    source: Arc<dyn ListingSource>,
    generator: Arc<dyn TextGenerator>,
}

impl PhoneAdvisor {
    pub fn new(source: Arc<dyn ListingSource>, generator: Arc<dyn TextGenerator>) -> Self {
        Self { source, generator }
    }

    pub async fn recommend(&self, pref: &UserPreference) -> Recommendation {
        let query = build_query(pref);
        info!("Generated query: {}", query);

        let products = match self.source.search(&query).await {
            Ok(products) => products,
            Err(e) => {
                warn!("Search failed for '{}': {:#}", query, e);
                Vec::new()
            }
        };

        // A failed fetch and a page with no recognisable cards look the same here
        if products.is_empty() {
            return Recommendation {
                ranked: Vec::new(),
                verdict: Verdict::Failure(FETCH_FAILED),
            };
        }

        let ranked = rank(&products, pref);
        info!(
            "Ranked {} products, top score {}",
            products.len(),
            ranked.first().map_or(0, |s| s.score)
        );

        let prompt = build_prompt(pref, &ranked);
        let verdict = match self.generator.generate(&prompt).await {
            Ok(text) => Verdict::Recommendation(format_response(&text)),
            Err(e) => {
                warn!("Gemini API call failed: {}", e);
                Verdict::Failure(GENERATION_FAILED)
            }
        };

        Recommendation { ranked, verdict }
    }
}
