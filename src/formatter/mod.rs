//! Converts the model's lightly structured text into display markup.
//!
//! Best effort only: this recognises the handful of conventions the prompt asks
//! for (bold, bullets, section and ranking headings, a few labels) and leaves
//! anything else as escaped text. It is not a Markdown parser.

use std::sync::LazyLock;

use regex::Regex;

/// Markup that is already safe to embed in a page without further escaping
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SafeHtml(String);

impl SafeHtml {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// A single pattern rewrite, applied to the whole text
struct Rewrite {
    pattern: Regex,
    replacement: &'static str,
}

impl Rewrite {
    fn new(pattern: &str, replacement: &'static str) -> Self {
        Self {
            pattern: Regex::new(pattern).expect("valid rewrite pattern"),
            replacement,
        }
    }
}

/// Applied in order; headings and labels run before bold so they can swallow
/// the `**` the model likes to wrap them in.
static REWRITES: LazyLock<Vec<Rewrite>> = LazyLock::new(|| {
    vec![
        Rewrite::new(
            r"(?im)^\s*(?:\*\*)?Recommendation[^:\n]*:(?:\*\*)?",
            r#"<h3 class="text-lg font-bold text-indigo-700 mt-4">📌 Recommendation</h3>"#,
        ),
        Rewrite::new(
            r"(?im)^\s*(?:\*\*)?Analysis[^:\n]*:(?:\*\*)?",
            r#"<h3 class="text-lg font-bold text-blue-700 mt-4">🧠 Analysis</h3>"#,
        ),
        Rewrite::new(
            r"(?im)^\s*(?:\*\*)?Ranking[^:\n]*:(?:\*\*)?",
            r#"<h3 class="text-lg font-bold text-yellow-600 mt-4">📊 Ranking</h3>"#,
        ),
        Rewrite::new(
            r"(?m)^\s*(?:\*\*)?1\.\s+(.*?):(?:\*\*)?",
            r#"<h4 class="text-md font-semibold text-green-700 mt-3">🥇 ${1}</h4>"#,
        ),
        Rewrite::new(
            r"(?m)^\s*(?:\*\*)?2\.\s+(.*?):(?:\*\*)?",
            r#"<h4 class="text-md font-semibold text-yellow-700 mt-3">🥈 ${1}</h4>"#,
        ),
        Rewrite::new(
            r"(?m)^\s*(?:\*\*)?3\.\s+(.*?):(?:\*\*)?",
            r#"<h4 class="text-md font-semibold text-red-700 mt-3">🥉 ${1}</h4>"#,
        ),
        Rewrite::new(
            r"(?i)(?:\*\*)?overall review\s*:\s*(?:\*\*)?\s*",
            r#"<strong class="block text-gray-800 mt-1">⭐ Overall Review:</strong> "#,
        ),
        Rewrite::new(
            r"(?i)(?:\*\*)?reasons\s*:\s*(?:\*\*)?\s*",
            r#"<strong class="block text-green-700">✔️ Reasons:</strong> "#,
        ),
        Rewrite::new(
            r"(?i)(?:\*\*)?(?:problems/)?limitations\s*:\s*(?:\*\*)?\s*",
            r#"<strong class="block text-red-600">❌ Limitations:</strong> "#,
        ),
        Rewrite::new(r"\*\*(.+?)\*\*", "<strong>${1}</strong>"),
    ]
});

fn bullet_item(line: &str) -> Option<&str> {
    let trimmed = line.trim_start();
    trimmed
        .strip_prefix("* ")
        .or_else(|| trimmed.strip_prefix("- "))
        .map(str::trim)
}

/// Group bullet lines into `<ul>` blocks and collapse blank-line runs to `<br>`.
///
/// Every opened list is closed, even if the text ends mid-list.
fn structure_lines(text: &str) -> String {
    let mut out: Vec<String> = Vec::new();
    let mut in_list = false;

    for line in text.lines() {
        if let Some(item) = bullet_item(line) {
            if !in_list {
                out.push("<ul class=\"list-disc ml-5\">".to_string());
                in_list = true;
            }
            out.push(format!("<li>{item}</li>"));
            continue;
        }

        if in_list {
            out.push("</ul>".to_string());
            in_list = false;
        }

        if line.trim().is_empty() {
            if out.last().is_some_and(|l| l != "<br>") {
                out.push("<br>".to_string());
            }
        } else {
            out.push(line.to_string());
        }
    }

    if in_list {
        out.push("</ul>".to_string());
    }
    out.join("\n")
}

/// Format raw model output for display
pub fn format_response(raw: &str) -> SafeHtml {
    let escaped = html_escape::encode_text(raw.trim());
    let mut body = structure_lines(&escaped);

    for rewrite in REWRITES.iter() {
        body = rewrite
            .pattern
            .replace_all(&body, rewrite.replacement)
            .into_owned();
    }

    SafeHtml(format!(
        "<div class=\"space-y-2 text-sm leading-relaxed text-gray-800\">\n{body}\n</div>"
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn formatted(raw: &str) -> String {
        format_response(raw).as_str().to_string()
    }

    #[test]
    fn test_bold() {
        let html = formatted("The **Galaxy A35** wins.");
        assert!(html.contains("The <strong>Galaxy A35</strong> wins."));
    }

    #[test]
    fn test_escapes_model_markup() {
        let html = formatted("Try <script>alert(1)</script> & enjoy");
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt; &amp; enjoy"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_bullets_are_grouped_into_balanced_lists() {
        let html = formatted("Pros:\n* Big battery\n- Bright screen\nCons:\n* Heavy");

        assert!(html.contains(
            "<ul class=\"list-disc ml-5\">\n<li>Big battery</li>\n<li>Bright screen</li>\n</ul>\nCons:"
        ));
        assert_eq!(html.matches("<ul").count(), 2);
        assert_eq!(html.matches("</ul>").count(), 2);
    }

    #[test]
    fn test_blank_line_runs_become_single_break() {
        let html = formatted("first\n\n\n\nsecond");
        assert!(html.contains("first\n<br>\nsecond"));
    }

    #[test]
    fn test_section_and_rank_headings() {
        let html = formatted("**Ranking:**\n1. Galaxy A35: best camera\n2. Moto G85: smooth\n3. Redmi 13: cheap");

        assert!(html.contains("📊 Ranking</h3>"));
        assert!(html.contains("🥇 Galaxy A35</h4> best camera"));
        assert!(html.contains("🥈 Moto G85</h4> smooth"));
        assert!(html.contains("🥉 Redmi 13</h4> cheap"));
        assert!(!html.contains("**"));
    }

    #[test]
    fn test_labels_inside_bullets() {
        let html = formatted("* **Reasons:** great value\n* Problems/Limitations: no charger");

        assert!(html.contains("<li><strong class=\"block text-green-700\">✔️ Reasons:</strong> great value</li>"));
        assert!(html.contains("❌ Limitations:</strong> no charger</li>"));
    }

    #[test]
    fn test_output_is_wrapped() {
        let html = formatted("  hello  ");
        assert!(html.starts_with("<div class=\"space-y-2"));
        assert!(html.ends_with("\nhello\n</div>"));
    }
}
