//! Search query and recommendation prompt construction
//!
//! Preference values are interpolated verbatim; they come from the same
//! request's form and are only ever shown back to that user or the model.

use crate::models::{ScoredProduct, UserPreference};

/// Free-text search query for the listing source, also used as the cache key
pub fn build_query(pref: &UserPreference) -> String {
    let parts = [
        format!("smartphones under {}", pref.budget),
        pref.brands.trim().to_string(),
        with_suffix(&pref.ram, "RAM"),
        with_suffix(&pref.rom, "ROM"),
        pref.processor.trim().to_string(),
        pref.camera.trim().to_string(),
        pref.display.trim().to_string(),
        if pref.ir { "IR blaster".to_string() } else { String::new() },
        if pref.nfc { "NFC".to_string() } else { String::new() },
    ];

    parts
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn with_suffix(value: &str, suffix: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        String::new()
    } else {
        format!("{value} {suffix}")
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "yes" } else { "no" }
}

/// Prompt asking the model to rank and justify the shortlisted phones
pub fn build_prompt(pref: &UserPreference, ranked: &[ScoredProduct]) -> String {
    let mut phones = String::new();
    for (idx, ScoredProduct { product, score }) in ranked.iter().enumerate() {
        phones.push_str(&format!(
            "\n{}. **{}**\n   - Score: {}\n   - Price: ₹{}\n   - Specs: {}\n   - URL: {}\n   - Image: {}\n",
            idx + 1,
            product.title,
            score,
            product.price,
            product.specs.join(", "),
            product.url,
            product.image,
        ));
    }

    format!(
        "You are a professional smartphone advisor AI. A user is looking for phones with the following preferences:

- Age: {age}, Gender: {gender}
- Budget: ₹{budget}
- Usage: {usage}
- Brand Preference: {brands}
- RAM: {ram}, Storage: {rom}
- Camera: {camera}, Processor: {processor}
- Display: {display}, Battery: {battery}
- IR Blaster: {ir}, NFC: {nfc}

Here are the top {count} phones from Flipkart with their calculated scores and specifications:
{phones}
Instructions:
- Rank them from 1 to {count} (best to decent)
- Justify rankings using the user's preferences and specs
- Highlight strengths, limitations, and give a 1-line review for each

Be concise, clear, and helpful.
",
        age = pref.age,
        gender = pref.gender,
        budget = pref.budget,
        usage = pref.usage,
        brands = pref.brands,
        ram = pref.ram,
        rom = pref.rom,
        camera = pref.camera,
        processor = pref.processor,
        display = pref.display,
        battery = pref.battery,
        ir = yes_no(pref.ir),
        nfc = yes_no(pref.nfc),
        count = ranked.len(),
    )
}
