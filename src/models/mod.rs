//! Data models for phone listings, shopper preferences and Gemini payloads

use serde::{Deserialize, Serialize};

/// A phone listing scraped from a search results page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub title: String,
    /// Price in whole rupees, 0 when the card carried no parsable price
    pub price: u64,
    pub specs: Vec<String>,
    pub url: String,
    pub image: String,
    pub rating: Option<String>,
    pub discount: Option<String>,
    pub reviews: Option<String>,
}

impl Product {
    /// Lowercased, space-joined spec list used for threshold and substring matching
    pub fn spec_text(&self) -> String {
        self.specs.join(" ").to_lowercase()
    }
}

/// What the shopper asked for, built once per form submission
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserPreference {
    pub age: String,
    pub gender: String,
    pub budget: u64,
    pub usage: String,
    pub brands: String,
    pub ram: String,
    pub rom: String,
    pub camera: String,
    pub processor: String,
    pub display: String,
    pub battery: String,
    pub ir: bool,
    pub nfc: bool,
}

/// Raw form submission as posted by the browser
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PreferenceForm {
    pub age: String,
    pub gender: String,
    pub budget: String,
    pub usage: String,
    pub brands: String,
    pub ram: String,
    pub rom: String,
    pub camera: String,
    pub processor: String,
    pub display: String,
    pub battery: String,
    pub ir: Option<String>,
    pub nfc: Option<String>,
}

/// Whether a checkbox value counts as ticked (`yes`, any case)
pub fn is_yes(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| v.eq_ignore_ascii_case("yes"))
}

impl TryFrom<PreferenceForm> for UserPreference {
    type Error = std::num::ParseIntError;

    fn try_from(form: PreferenceForm) -> Result<Self, Self::Error> {
        let budget = form.budget.trim().parse()?;

        Ok(Self {
            ir: is_yes(&form.ir),
            nfc: is_yes(&form.nfc),
            age: form.age,
            gender: form.gender,
            budget,
            usage: form.usage,
            brands: form.brands,
            ram: form.ram,
            rom: form.rom,
            camera: form.camera,
            processor: form.processor,
            display: form.display,
            battery: form.battery,
        })
    }
}

/// A product paired with its suitability score for one ranking pass
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoredProduct {
    pub product: Product,
    pub score: u32,
}

/// Gemini `generateContent` request body
#[derive(Debug, Serialize)]
pub struct GeminiRequest {
    pub contents: Vec<GeminiContent>,
}

/// One turn of content, request or response side
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiContent {
    #[serde(default)]
    pub parts: Vec<GeminiPart>,
}

/// A single text part
#[derive(Debug, Serialize, Deserialize)]
pub struct GeminiPart {
    #[serde(default)]
    pub text: String,
}

/// Gemini `generateContent` response body, only the fields we read
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiResponse {
    #[serde(default)]
    pub candidates: Vec<GeminiCandidate>,
    pub prompt_feedback: Option<GeminiPromptFeedback>,
}

#[derive(Debug, Deserialize)]
pub struct GeminiCandidate {
    pub content: Option<GeminiContent>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GeminiPromptFeedback {
    pub block_reason: Option<String>,
}
