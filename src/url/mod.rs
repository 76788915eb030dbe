//! URL handling module for Sumi-Lens
//!
//! This module provides normalization of frontier keys, resolution of link
//! hrefs against their page, and internal/external host classification.

mod domain;
mod normalize;

pub use domain::{extract_host, is_internal};
pub use normalize::{normalize_url, resolve_link};

/// Link classification relative to the page it appeared on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinkScope {
    /// Same host and port as the page
    Internal,
    /// Any other host
    External,
}

impl LinkScope {
    /// Classifies `link` relative to `page`
    pub fn classify(page: &::url::Url, link: &::url::Url) -> Self {
        if is_internal(page, link) {
            Self::Internal
        } else {
            Self::External
        }
    }
}
