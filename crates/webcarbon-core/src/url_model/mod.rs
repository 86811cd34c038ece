//! URL validation and resource-reference resolution.
//!
//! Validation gates every measurement before any network call. Resolution
//! turns the `src`/`href` values found in a page into fetchable URLs.

mod resolve;
mod validate;

pub use resolve::resolve_reference;
pub use validate::{is_valid_url, normalize_url, validate_url};
