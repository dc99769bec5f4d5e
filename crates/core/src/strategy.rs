// ABOUTME: Ordered fallback strategy chains for pulling single text fields out of a parsed page.
// ABOUTME: Strategies are tried in declared order; the first non-empty cleaned value wins, else the field default.

//! Field extraction strategy chains.
//!
//! A [`FieldSpec`] names a field and lists [`Strategy`] values from most precise
//! (and most fragile) to least precise:
//!
//! 1. a selector scoped to a known structural marker,
//! 2. a generic class or tag selector,
//! 3. a metadata tag attribute,
//! 4. a regex over the raw document text.
//!
//! Key behaviors:
//! - Evaluation short-circuits: strategies after the winner are never run.
//! - Every candidate is cleaned (markup stripped, entities decoded, whitespace
//!   collapsed); a value that cleans to nothing counts as no match.
//! - Invalid selectors never match rather than failing the chain.
//! - When nothing matches the field takes its default string. That is a
//!   successful extraction, not an error.

use std::fmt;
use std::sync::Arc;

use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::text::clean_field_value;

/// A fetched document, parsed once and shared by every strategy and collector.
pub struct Page {
    doc: Html,
    raw: String,
    url: Url,
}

impl Page {
    pub fn parse(raw: &str, url: Url) -> Self {
        Self {
            doc: Html::parse_document(raw),
            raw: raw.to_string(),
            url,
        }
    }

    pub fn document(&self) -> &Html {
        &self.doc
    }

    /// The undecoded document text, used by pattern strategies and the raw-text media scan.
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn url(&self) -> &Url {
        &self.url
    }
}

/// A caller-supplied extraction function.
pub type StrategyFn = Arc<dyn Fn(&Page) -> Option<String> + Send + Sync>;

/// One way of recovering a field value from a page.
#[derive(Clone)]
pub enum Strategy {
    /// Inner text of the first matching element with non-empty text.
    Text(String),
    /// Attribute value of the first matching element that carries a non-empty one.
    Attr { selector: String, attr: String },
    /// Regex over the raw document. Capture group 1 if present, else the whole match.
    Pattern(Regex),
    /// Arbitrary pure function of the page.
    Custom(StrategyFn),
}

impl fmt::Debug for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Strategy::Text(css) => f.debug_tuple("Text").field(css).finish(),
            Strategy::Attr { selector, attr } => f
                .debug_struct("Attr")
                .field("selector", selector)
                .field("attr", attr)
                .finish(),
            Strategy::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Strategy::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

impl Strategy {
    pub fn text(selector: impl Into<String>) -> Self {
        Strategy::Text(selector.into())
    }

    pub fn attr(selector: impl Into<String>, attr: impl Into<String>) -> Self {
        Strategy::Attr {
            selector: selector.into(),
            attr: attr.into(),
        }
    }

    /// Compiles `pattern` into a raw-text strategy.
    pub fn pattern(pattern: &str) -> Result<Self, regex::Error> {
        Ok(Strategy::Pattern(Regex::new(pattern)?))
    }

    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&Page) -> Option<String> + Send + Sync + 'static,
    {
        Strategy::Custom(Arc::new(f))
    }

    /// Runs this strategy against `page`, returning a cleaned non-empty value.
    pub fn apply(&self, page: &Page) -> Option<String> {
        match self {
            Strategy::Text(css) => first_text(page.document(), css),
            Strategy::Attr { selector, attr } => first_attr(page.document(), selector, attr),
            Strategy::Pattern(re) => first_capture(page.raw(), re),
            Strategy::Custom(f) => f(page).and_then(|v| clean_field_value(&v)),
        }
    }
}

fn first_text(doc: &Html, css: &str) -> Option<String> {
    let sel = Selector::parse(css).ok()?;
    doc.select(&sel).find_map(|el| {
        let text = el.text().collect::<String>();
        clean_field_value(&text)
    })
}

fn first_attr(doc: &Html, css: &str, attr: &str) -> Option<String> {
    let sel = Selector::parse(css).ok()?;
    doc.select(&sel)
        .find_map(|el| el.value().attr(attr).and_then(clean_field_value))
}

fn first_capture(raw: &str, re: &Regex) -> Option<String> {
    re.captures_iter(raw).find_map(|caps| {
        let m = caps.get(1).or_else(|| caps.get(0))?;
        clean_field_value(m.as_str())
    })
}

/// The winning value of a chain and the position of the strategy that produced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldMatch {
    pub value: String,
    pub strategy_index: usize,
}

/// A named field with its ordered strategies and the default used when all of them miss.
#[derive(Debug, Clone)]
pub struct FieldSpec {
    name: String,
    strategies: Vec<Strategy>,
    default: String,
}

impl FieldSpec {
    /// # Panics
    ///
    /// Panics if `default` is empty or only whitespace, since `extract` must never yield an empty value.
    pub fn new(name: impl Into<String>, default: impl Into<String>) -> Self {
        let name = name.into();
        let default = default.into();
        assert!(
            !default.trim().is_empty(),
            "field `{}` needs a non-empty default",
            name
        );
        Self {
            name,
            strategies: Vec::new(),
            default,
        }
    }

    /// Appends a strategy with lower priority than every strategy already added.
    pub fn then(mut self, strategy: Strategy) -> Self {
        self.strategies.push(strategy);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn default_value(&self) -> &str {
        &self.default
    }

    pub fn strategies(&self) -> &[Strategy] {
        &self.strategies
    }

    /// Evaluates strategies in order and stops at the first hit.
    pub fn first_match(&self, page: &Page) -> Option<FieldMatch> {
        self.strategies
            .iter()
            .enumerate()
            .find_map(|(strategy_index, strategy)| {
                strategy.apply(page).map(|value| FieldMatch {
                    value,
                    strategy_index,
                })
            })
    }

    /// The field value, falling back to the default string. Never empty.
    pub fn extract(&self, page: &Page) -> String {
        match self.first_match(page) {
            Some(m) => {
                tracing::debug!(field = %self.name, strategy = m.strategy_index, "field matched");
                m.value
            }
            None => {
                tracing::debug!(field = %self.name, "no strategy matched, using default");
                self.default.clone()
            }
        }
    }
}
