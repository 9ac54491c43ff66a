//! Error kinds shared by feed fetching and article rendering.

use thiserror::Error;

/// Failures produced while fetching a feed or building an article card.
///
/// The fetch kinds (`Network`, `Decode`, `InvalidFeed`) propagate to the
/// caller of the single-feed fetch. `Render` is caught per article and only
/// skips that article.
#[derive(Debug, Error)]
pub enum Error {
    /// Transport or request failure talking to the conversion endpoint.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The endpoint answered but the body was not valid JSON.
    #[error("malformed feed response: {0}")]
    Decode(#[from] serde_json::Error),

    /// A well-formed response whose status field was not "ok".
    #[error("feed {url} returned status \"{status}\"")]
    InvalidFeed { url: String, status: String },

    /// An article is missing a field required for display.
    #[error("article is missing its {field}")]
    Render { field: &'static str },
}

pub type Result<T> = std::result::Result<T, Error>;
