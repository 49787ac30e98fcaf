//! Heuristic filter for image URLs coming from the distributor or a search
//! provider. No network access; the URL text alone decides.

use url::Url;

const BLOCKED_DOMAINS: &[&str] = &[
    "facebook.com",
    "instagram.com",
    "pinterest.com",
    "twitter.com",
    "youtube.com",
];

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".bmp"];

const IMAGE_INDICATORS: &[&str] = &["/images/", "image", "img", "photo"];

/// Marker the distributor embeds in stand-in image URLs.
const PLACEHOLDER_MARKER: &str = "placeholder";

pub fn is_valid_image_url(raw: &str) -> bool {
    let Ok(url) = Url::parse(raw.trim()) else {
        return false;
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }

    let lower = raw.to_lowercase();
    if BLOCKED_DOMAINS.iter().any(|d| lower.contains(d)) {
        return false;
    }

    let path = url.path().to_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| path.ends_with(ext))
        || IMAGE_INDICATORS.iter().any(|ind| lower.contains(ind))
}

/// A distributor-supplied image worth showing as-is.
pub fn is_usable_native_image(raw: &str) -> bool {
    !raw.to_lowercase().contains(PLACEHOLDER_MARKER) && is_valid_image_url(raw)
}
