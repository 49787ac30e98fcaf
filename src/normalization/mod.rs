pub mod sku;
pub mod text;

pub use sku::{generate_variants, is_detailed_query, looks_like_sku};
pub use text::{expand_synonyms, normalize, normalize_brand};
