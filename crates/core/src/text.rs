// ABOUTME: Text cleanup for extracted field values: tag stripping, entity decoding, whitespace collapse.
// ABOUTME: Every strategy result passes through clean_field_value before it can win a chain.

use std::borrow::Cow;

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<[^>]*>").unwrap());
static NUMERIC_ENTITY_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"&#(?:[xX]([0-9a-fA-F]{1,6})|([0-9]{1,7}));").unwrap());

const NAMED_ENTITIES: &[(&str, &str)] = &[
    ("&lt;", "<"),
    ("&gt;", ">"),
    ("&quot;", "\""),
    ("&apos;", "'"),
    ("&#39;", "'"),
    ("&nbsp;", " "),
    ("&hellip;", "…"),
    ("&mdash;", "—"),
    ("&ndash;", "–"),
    ("&ldquo;", "\u{201C}"),
    ("&rdquo;", "\u{201D}"),
    ("&lsquo;", "\u{2018}"),
    ("&rsquo;", "\u{2019}"),
    ("&middot;", "·"),
];

/// Collapses runs of whitespace into single spaces and trims the ends.
pub fn collapse_whitespace(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Decodes named and numeric HTML entities. `&amp;` is decoded last so that
/// `&amp;lt;` stays a literal `&lt;`.
pub fn decode_entities(s: &str) -> String {
    if !s.contains('&') {
        return s.to_string();
    }

    let mut out = s.to_string();
    for (entity, replacement) in NAMED_ENTITIES {
        if out.contains(entity) {
            out = out.replace(entity, replacement);
        }
    }

    let decoded: Cow<'_, str> = NUMERIC_ENTITY_RE.replace_all(&out, |caps: &Captures| {
        let code = match (caps.get(1), caps.get(2)) {
            (Some(hex), _) => u32::from_str_radix(hex.as_str(), 16).ok(),
            (_, Some(dec)) => dec.as_str().parse::<u32>().ok(),
            _ => None,
        };
        match code.and_then(char::from_u32) {
            Some(c) => c.to_string(),
            None => caps[0].to_string(),
        }
    });

    decoded.replace("&amp;", "&")
}

/// Removes markup from `s`, decodes entities and collapses whitespace.
pub fn strip_markup(s: &str) -> String {
    let without_tags = TAG_RE.replace_all(s, " ");
    collapse_whitespace(&decode_entities(&without_tags))
}

/// Cleans a raw strategy result. Returns `None` when nothing is left, which the
/// chain treats as "no match".
pub fn clean_field_value(raw: &str) -> Option<String> {
    let cleaned = strip_markup(raw);
    if cleaned.is_empty() {
        None
    } else {
        Some(cleaned)
    }
}
