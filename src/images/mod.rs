//! Image resolution: URL validation, static lookup tables, external search
//! providers and the fallback chain that ties them together.

pub mod providers;
pub mod resolver;
pub mod tables;
pub mod validate;

pub use providers::{providers_from_keys, ImageSearchProvider};
pub use resolver::{ImageResolver, ImageSource, ResolvedImage};
