//! SKU candidate derivation: query classification, spelling variants, and
//! part-number harvesting from web search hits.

use std::sync::OnceLock;

use indexmap::IndexSet;
use itertools::Itertools;
use regex::Regex;

use super::text::normalize;
use crate::web_search::WebHit;

/// Queries shorter than this (in chars) with few tokens are tried as SKUs.
pub const SHORT_QUERY_MAX_CHARS: usize = 30;
pub const SHORT_QUERY_MAX_TOKENS: usize = 3;

const DETAIL_MIN_WORDS: usize = 5;

/// Whole-token technical indicators (matched on the normalized query).
const TECH_TOKENS: &[&str] = &[
    "mm", "gb", "tb", "ghz", "mhz", "hz", "mah", "pulgadas", "pulg", "hd", "4k", "8k", "sonido",
    "audio", "estereo", "stereo", "bluetooth", "wifi",
];

/// Multi-word indicators (matched as a phrase on the normalized query).
const TECH_PHRASES: &[&str] = &["full hd"];

fn unit_token_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^\d+(mm|gb|tb|ghz|mhz|hz|w|v|mah|p|k)$").expect("static regex")
    })
}

fn sku_shape_res() -> &'static [Regex; 3] {
    static RES: OnceLock<[Regex; 3]> = OnceLock::new();
    RES.get_or_init(|| {
        [
            // G59007H
            Regex::new(r"\b[a-z]{2,}\d{4,}\b").expect("static regex"),
            // 2500ax
            Regex::new(r"\b\d+[a-z]+\d*\b").expect("static regex"),
            // ax2500
            Regex::new(r"\b[a-z]+\d+[a-z]*\b").expect("static regex"),
        ]
    })
}

fn url_segment_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^([A-Za-z0-9]{6,})(-|$)").expect("static regex"))
}

/// A query short enough to be tried directly as a part number.
pub fn looks_like_sku(query: &str) -> bool {
    let q = query.trim();
    !q.is_empty()
        && q.chars().count() < SHORT_QUERY_MAX_CHARS
        && q.split_whitespace().count() <= SHORT_QUERY_MAX_TOKENS
}

/// A query carrying several specifications, e.g.
/// "BOCINAS ACTECK PARA COMPUTO AX-2500 / 3.5 mm / Sonido Estereo".
pub fn is_detailed_query(query: &str) -> bool {
    let q = query.trim();
    if q.is_empty() {
        return false;
    }

    let parts = q
        .split(['/', '|', ',', '-'])
        .filter(|p| !p.trim().is_empty())
        .count();
    if parts >= 2 || q.split_whitespace().count() >= DETAIL_MIN_WORDS {
        return true;
    }

    let normalized = normalize(q);
    if TECH_PHRASES.iter().any(|p| normalized.contains(p)) {
        return true;
    }
    normalized
        .split(' ')
        .any(|tok| TECH_TOKENS.contains(&tok) || unit_token_re().is_match(tok))
}

/// Spelling variants of a raw SKU in a fixed order, duplicates removed.
/// Downstream callers take at most the first few.
pub fn generate_variants(raw_sku: &str) -> Vec<String> {
    let sku = raw_sku.trim();
    if sku.is_empty() {
        return Vec::new();
    }
    [
        sku.to_string(),
        sku.to_uppercase(),
        sku.to_lowercase(),
        sku.replace(' ', ""),
        sku.replace('-', ""),
        sku.replace('_', ""),
    ]
    .into_iter()
    .filter(|v| !v.is_empty())
    .unique()
    .collect()
}

/// Harvest part-number-shaped tokens from web hits: three regex shapes over
/// titles and snippets, plus path segments of distributor links. Results are
/// upper-cased and deduplicated in first-seen order.
pub fn harvest_part_numbers(hits: &[WebHit], distributor_domain: &str) -> IndexSet<String> {
    let mut out = IndexSet::new();

    for hit in hits {
        let text = format!("{} {}", hit.title, hit.snippet).to_lowercase();
        for re in sku_shape_res() {
            for m in re.find_iter(&text) {
                out.insert(m.as_str().to_uppercase());
            }
        }
    }

    for hit in hits.iter().filter(|h| h.link.contains(distributor_domain)) {
        let segments: Vec<&str> = hit.link.split('/').collect();
        // A path token counts when it is followed by '/' or '-'.
        for (idx, segment) in segments.iter().enumerate().skip(1) {
            let Some(caps) = url_segment_re().captures(segment) else {
                continue;
            };
            let dashed = caps.get(2).is_some_and(|m| m.as_str() == "-");
            let followed_by_slash = idx + 1 < segments.len();
            if dashed || followed_by_slash {
                out.insert(caps[1].to_uppercase());
            }
        }
    }

    out
}
