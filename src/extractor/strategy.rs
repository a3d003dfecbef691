//! Field extraction strategies compiled from [`StrategySpec`] configuration

use anyhow::{Result, anyhow};
use scraper::{ElementRef, Selector};

use crate::traits::StrategySpec;

/// Attempts to pull one value out of a result card
pub trait FieldStrategy: Send + Sync {
    /// Returns the value, or `None` if this strategy found nothing usable
    fn attempt(&self, card: ElementRef<'_>) -> Option<String>;
}

struct TextOf {
    selector: Selector,
}

impl FieldStrategy for TextOf {
    fn attempt(&self, card: ElementRef<'_>) -> Option<String> {
        let el = card.select(&self.selector).next()?;
        non_empty(el.text().collect::<String>())
    }
}

struct AttrOf {
    selector: Selector,
    attr: String,
}

impl FieldStrategy for AttrOf {
    fn attempt(&self, card: ElementRef<'_>) -> Option<String> {
        let el = card.select(&self.selector).next()?;
        el.value().attr(&self.attr).and_then(|v| non_empty(v.to_string()))
    }
}

struct OwnAttr {
    attr: String,
}

impl FieldStrategy for OwnAttr {
    fn attempt(&self, card: ElementRef<'_>) -> Option<String> {
        card.value()
            .attr(&self.attr)
            .and_then(|v| non_empty(v.to_string()))
    }
}

fn non_empty(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub(crate) fn parse_selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| anyhow!("Failed to parse selector {css:?}: {e:?}"))
}

/// Ordered fallback chain for a single field
pub struct FieldChain {
    strategies: Vec<Box<dyn FieldStrategy>>,
}

impl FieldChain {
    pub fn compile(specs: &[StrategySpec]) -> Result<Self> {
        let strategies = specs
            .iter()
            .map(|spec| -> Result<Box<dyn FieldStrategy>> {
                let strategy: Box<dyn FieldStrategy> = match spec {
                    StrategySpec::Text { selector } => Box::new(TextOf {
                        selector: parse_selector(selector)?,
                    }),
                    StrategySpec::Attr { selector, attr } => Box::new(AttrOf {
                        selector: parse_selector(selector)?,
                        attr: attr.clone(),
                    }),
                    StrategySpec::OwnAttr { attr } => Box::new(OwnAttr { attr: attr.clone() }),
                };
                Ok(strategy)
            })
            .collect::<Result<Vec<_>>>()?;

        Ok(Self { strategies })
    }

    /// First value produced by any strategy, in configured order
    pub fn extract(&self, card: ElementRef<'_>) -> Option<String> {
        self.strategies.iter().find_map(|s| s.attempt(card))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn card_of(html: &str) -> Html {
        Html::parse_fragment(html)
    }

    fn first_card(doc: &Html) -> ElementRef<'_> {
        doc.select(&parse_selector("div.card").unwrap()).next().unwrap()
    }

    #[test]
    fn test_chain_falls_back_in_order() {
        let doc = card_of(r#"<div class="card"><span class="b">second</span></div>"#);
        let chain = FieldChain::compile(&[
            StrategySpec::text("span.a"),
            StrategySpec::text("span.b"),
        ])
        .unwrap();

        assert_eq!(chain.extract(first_card(&doc)), Some("second".to_string()));
    }

    #[test]
    fn test_blank_values_count_as_absent() {
        let doc = card_of(
            r#"<div class="card" data-id="  "><img alt="" src="x.png"><p>  </p></div>"#,
        );
        let chain = FieldChain::compile(&[
            StrategySpec::own_attr("data-id"),
            StrategySpec::attr("img", "alt"),
            StrategySpec::text("p"),
        ])
        .unwrap();

        assert_eq!(chain.extract(first_card(&doc)), None);
    }

    #[test]
    fn test_own_attr_reads_card_itself() {
        let doc = card_of(r#"<div class="card" data-href="/p/1"><a href="/other">x</a></div>"#);
        let chain = FieldChain::compile(&[StrategySpec::own_attr("data-href")]).unwrap();

        assert_eq!(chain.extract(first_card(&doc)), Some("/p/1".to_string()));
    }

    #[test]
    fn test_invalid_selector_is_rejected() {
        assert!(FieldChain::compile(&[StrategySpec::text("div[")]).is_err());
    }
}
