//! Heuristic suitability scoring and top-N ranking

use std::sync::LazyLock;

use regex::Regex;

use crate::models::{Product, ScoredProduct, UserPreference};

/// Number of products handed to the recommendation prompt
pub const TOP_N: usize = 3;

const BASE_IN_BUDGET: u32 = 20;
const RAM_POINTS: u32 = 15;
const ROM_POINTS: u32 = 15;
const CAMERA_POINTS: u32 = 10;
const BATTERY_POINTS: u32 = 5;
const DISPLAY_POINTS: u32 = 5;
const PROCESSOR_POINTS: u32 = 10;
const IR_POINTS: u32 = 5;
const NFC_POINTS: u32 = 5;
const BRAND_POINTS: u32 = 10;

const IR_MARKER: &str = "ir blaster";
const NFC_MARKER: &str = "nfc";

static FIRST_INTEGER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+").expect("valid integer pattern"));

// Matched against lowercased spec text. A decimal like "6.1 inch" yields the
// digits after the point.
static GB: LazyLock<Regex> = LazyLock::new(|| unit_pattern("gb"));
static MP: LazyLock<Regex> = LazyLock::new(|| unit_pattern("mp"));
static MAH: LazyLock<Regex> = LazyLock::new(|| unit_pattern("mah"));
static INCH: LazyLock<Regex> = LazyLock::new(|| unit_pattern("inch"));

fn unit_pattern(unit: &str) -> Regex {
    Regex::new(&format!(r"(\d+)\s*{unit}")).expect("valid unit pattern")
}

/// First integer found anywhere in `text`
fn first_integer(text: &str) -> Option<u64> {
    FIRST_INTEGER.find(text)?.as_str().parse().ok()
}

/// First integer immediately followed (optionally after whitespace) by the unit
/// that `unit` was built for
fn number_before_unit(text: &str, unit: &Regex) -> Option<u64> {
    unit.captures(text)?.get(1)?.as_str().parse().ok()
}

/// Whether the spec text advertises at least the number the shopper asked for
fn meets_threshold(spec_text: &str, wanted: &str, unit: &Regex) -> bool {
    match (first_integer(wanted), number_before_unit(spec_text, unit)) {
        (Some(wanted), Some(found)) => found >= wanted,
        _ => false,
    }
}

/// Score how well `product` fits `pref`.
///
/// Anything over budget scores zero no matter what else matches.
pub fn score(product: &Product, pref: &UserPreference) -> u32 {
    if product.price > pref.budget {
        return 0;
    }

    let specs = product.spec_text();
    let mut score = BASE_IN_BUDGET;

    let thresholds = [
        (&pref.ram, &*GB, RAM_POINTS),
        (&pref.rom, &*GB, ROM_POINTS),
        (&pref.camera, &*MP, CAMERA_POINTS),
        (&pref.battery, &*MAH, BATTERY_POINTS),
        (&pref.display, &*INCH, DISPLAY_POINTS),
    ];
    for (wanted, unit, points) in thresholds {
        if meets_threshold(&specs, wanted, unit) {
            score += points;
        }
    }

    if specs.contains(&pref.processor.to_lowercase()) {
        score += PROCESSOR_POINTS;
    }
    if pref.ir && specs.contains(IR_MARKER) {
        score += IR_POINTS;
    }
    if pref.nfc && specs.contains(NFC_MARKER) {
        score += NFC_POINTS;
    }
    if product
        .title
        .to_lowercase()
        .contains(&pref.brands.to_lowercase())
    {
        score += BRAND_POINTS;
    }

    score
}

/// Score every product and keep the best [`TOP_N`], highest first.
///
/// Equal scores keep their fetch order.
pub fn rank(products: &[Product], pref: &UserPreference) -> Vec<ScoredProduct> {
    let mut scored: Vec<ScoredProduct> = products
        .iter()
        .map(|product| ScoredProduct {
            score: score(product, pref),
            product: product.clone(),
        })
        .collect();

    // sort_by is stable
    scored.sort_by(|a, b| b.score.cmp(&a.score));
    scored.truncate(TOP_N);
    scored
}
