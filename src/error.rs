use thiserror::Error;

/// Failures on the way from URL to page text. Extraction gaps and duplicate
/// rows are not errors: malformed candidates are skipped and duplicate emails
/// are absorbed by the store's INSERT OR IGNORE.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("no URL provided")]
    EmptyUrl,

    #[error("request to {url} failed: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("{url} returned HTTP {status}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
    },
}
