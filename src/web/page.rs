//! HTML rendering for the single advisor page

use html_escape::{encode_double_quoted_attribute as attr, encode_text as text};

use crate::formatter::SafeHtml;
use crate::models::{PreferenceForm, ScoredProduct, is_yes};

/// Content of the results panel under the form
pub enum Notice<'a> {
    Nothing,
    /// Plain message, escaped on output
    Message(&'a str),
    /// Pre-formatted recommendation, inserted as-is
    Markup(&'a SafeHtml),
}

const TEXT_FIELDS: [(&str, &str); 11] = [
    ("age", "Age"),
    ("gender", "Gender"),
    ("budget", "Budget (₹)"),
    ("usage", "Primary usage"),
    ("brands", "Preferred brand"),
    ("ram", "RAM (e.g. 8GB)"),
    ("rom", "Storage (e.g. 128GB)"),
    ("camera", "Camera (e.g. 50MP)"),
    ("processor", "Processor"),
    ("display", "Display (inches)"),
    ("battery", "Battery (mAh)"),
];

fn field_value<'a>(form: &'a PreferenceForm, name: &str) -> &'a str {
    match name {
        "age" => &form.age,
        "gender" => &form.gender,
        "budget" => &form.budget,
        "usage" => &form.usage,
        "brands" => &form.brands,
        "ram" => &form.ram,
        "rom" => &form.rom,
        "camera" => &form.camera,
        "processor" => &form.processor,
        "display" => &form.display,
        "battery" => &form.battery,
        _ => "",
    }
}

fn checked(value: &Option<String>) -> &'static str {
    if is_yes(value) {
        " checked"
    } else {
        ""
    }
}

fn render_form(out: &mut String, form: &PreferenceForm) {
    out.push_str(
        r#"<form method="post" action="/" class="grid grid-cols-2 gap-4 bg-white p-6 rounded shadow">"#,
    );
    for (name, label) in TEXT_FIELDS {
        out.push_str(&format!(
            r#"<label class="flex flex-col text-sm">{label}<input class="border rounded p-2" type="text" name="{name}" value="{value}" required></label>"#,
            value = attr(field_value(form, name)),
        ));
    }
    out.push_str(&format!(
        r#"<label class="text-sm"><input type="checkbox" name="ir" value="yes"{}> IR blaster</label>"#,
        checked(&form.ir)
    ));
    out.push_str(&format!(
        r#"<label class="text-sm"><input type="checkbox" name="nfc" value="yes"{}> NFC</label>"#,
        checked(&form.nfc)
    ));
    out.push_str(
        r#"<button class="col-span-2 bg-indigo-600 text-white rounded p-2" type="submit">Find phones</button></form>"#,
    );
}

fn render_products(out: &mut String, ranked: &[ScoredProduct]) {
    if ranked.is_empty() {
        return;
    }

    out.push_str(r#"<section class="grid grid-cols-3 gap-4 mt-6">"#);
    for ScoredProduct { product, score } in ranked {
        out.push_str(r#"<article class="bg-white p-4 rounded shadow">"#);
        if !product.image.is_empty() {
            out.push_str(&format!(
                r#"<img class="h-40 mx-auto" src="{}" alt="{}">"#,
                attr(&product.image),
                attr(&product.title)
            ));
        }
        out.push_str(&format!(
            r#"<h2 class="font-semibold mt-2">{}</h2><p>₹{} · score {}</p>"#,
            text(&product.title),
            product.price,
            score
        ));
        for extra in [&product.rating, &product.discount, &product.reviews]
            .into_iter()
            .flatten()
        {
            out.push_str(&format!(
                r#"<p class="text-xs text-gray-600">{}</p>"#,
                text(extra)
            ));
        }
        if !product.url.is_empty() {
            out.push_str(&format!(
                r#"<a class="text-indigo-600 text-sm" href="{}" target="_blank" rel="noopener">View on Flipkart</a>"#,
                attr(&product.url)
            ));
        }
        out.push_str("</article>");
    }
    out.push_str("</section>");
}

/// Full page: form (pre-filled with `form`), ranked products and the notice
pub fn render(form: &PreferenceForm, ranked: &[ScoredProduct], notice: Notice<'_>) -> String {
    let mut out = String::from(
        r#"<!DOCTYPE html><html lang="en"><head><meta charset="utf-8"><title>Phone Advisor</title><script src="https://cdn.tailwindcss.com"></script></head><body class="bg-gray-100"><main class="max-w-5xl mx-auto p-6"><h1 class="text-2xl font-bold mb-4">📱 Phone Advisor</h1>"#,
    );

    render_form(&mut out, form);
    render_products(&mut out, ranked);

    match notice {
        Notice::Nothing => {}
        Notice::Message(message) => {
            out.push_str(&format!(
                r#"<div class="mt-6 p-4 bg-red-50 text-red-700 rounded">{}</div>"#,
                text(message)
            ));
        }
        Notice::Markup(html) => {
            out.push_str(r#"<div class="mt-6 p-4 bg-white rounded shadow">"#);
            out.push_str(html.as_str());
            out.push_str("</div>");
        }
    }

    out.push_str("</main></body></html>");
    out
}
