//! Query and brand normalization.
//!
//! `normalize` is the comparison form used everywhere else: lowercase ASCII
//! alphanumerics separated by single spaces. Brand canonicalization and
//! synonym expansion both operate on that form.

use itertools::Itertools;
use unicode_normalization::{char::is_combining_mark, UnicodeNormalization};

/// Brand aliases seen in distributor data and user input, keyed by their
/// normalized spelling. Order matters for the prefix/substring pass.
const BRAND_ALIASES: &[(&str, &str)] = &[
    ("perfect choice", "Perfect Choice"),
    ("perfectchoice", "Perfect Choice"),
    ("pchoice", "Perfect Choice"),
    ("p choice", "Perfect Choice"),
    ("perfecto grote", "Perfect Choice"),
    ("perfecto", "Perfect Choice"),
    ("grote", "Perfect Choice"),
    ("acteck", "Acteck"),
    ("ax", "Acteck"),
    ("haken", "Haken"),
    ("hak", "Haken"),
];

/// Search-term synonyms. A key token is replaced by its synonym set.
const PRODUCT_SYNONYMS: &[(&str, &[&str])] = &[
    ("kit", &["set", "combo", "pack", "bundle"]),
    ("teclado", &["keyboard"]),
    ("mouse", &["ratón", "raton"]),
    ("alámbrico", &["cable", "cabled", "wired"]),
    ("inalámbrico", &["wireless", "sin cable"]),
    ("audífonos", &["auriculares", "headphones", "headset"]),
    ("bt", &["bluetooth"]),
    ("tws", &["true wireless", "true wireless stereo"]),
    ("derrames", &["spills", "liquid", "water"]),
    ("resistente", &["resistant", "spillproof", "waterproof"]),
    ("usb", &["universal serial bus"]),
];

/// Minimum token length for the prefix/substring brand pass; shorter tokens
/// only match exactly.
const MIN_FUZZY_BRAND_TOKEN: usize = 3;

/// Lowercase, strip diacritics, collapse every non-alphanumeric run to a
/// single space and trim.
pub fn normalize(text: &str) -> String {
    let folded: String = text
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .map(|c| if c.is_ascii_alphanumeric() { c } else { ' ' })
        .collect();
    folded.split_whitespace().join(" ")
}

/// Map a brand name onto its canonical alias.
///
/// Exact normalized match first, then a prefix/substring match on the first
/// token; anything unmatched comes back title-cased.
pub fn normalize_brand(name: &str) -> String {
    let normalized = normalize(name);
    if normalized.is_empty() {
        return String::new();
    }

    if let Some((_, canonical)) = BRAND_ALIASES.iter().find(|(key, _)| *key == normalized) {
        return canonical.to_string();
    }

    let first = normalized.split(' ').next().unwrap_or_default();
    if let Some((_, canonical)) = BRAND_ALIASES.iter().find(|(key, _)| *key == first) {
        return canonical.to_string();
    }
    if first.len() >= MIN_FUZZY_BRAND_TOKEN {
        let hit = BRAND_ALIASES.iter().find(|(key, _)| {
            key.starts_with(first) || (key.len() >= MIN_FUZZY_BRAND_TOKEN && first.contains(key))
        });
        if let Some((_, canonical)) = hit {
            return canonical.to_string();
        }
    }

    title_case(name)
}

/// Replace synonym-table tokens by their synonym set; other tokens pass
/// through. Duplicates are dropped keeping first occurrence, so the output is
/// deterministic for a given input. Lossy by construction: a key token does
/// not survive its own expansion.
pub fn expand_synonyms(query: &str) -> String {
    normalize(query)
        .split(' ')
        .filter(|t| !t.is_empty())
        .flat_map(|token| match synonyms_for(token) {
            Some(set) => set.iter().map(|s| normalize(s)).collect::<Vec<_>>(),
            None => vec![token.to_string()],
        })
        .unique()
        .join(" ")
}

fn synonyms_for(token: &str) -> Option<&'static [&'static str]> {
    PRODUCT_SYNONYMS
        .iter()
        .find(|(key, _)| normalize(key) == token)
        .map(|(_, set)| *set)
}

/// Capitalize the first letter of every alphabetic run and lowercase the rest.
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut at_word_start = true;
    for c in text.trim().chars() {
        if c.is_alphabetic() {
            if at_word_start {
                out.extend(c.to_uppercase());
            } else {
                out.extend(c.to_lowercase());
            }
            at_word_start = false;
        } else {
            out.push(c);
            at_word_start = true;
        }
    }
    out
}
