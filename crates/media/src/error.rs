/// Errors from staging or transferring media.
#[derive(Debug, thiserror::Error)]
pub enum MediaError {
    /// Reading or writing the staged file failed.
    #[error("Staging I/O failed: {0}")]
    Io(#[from] std::io::Error),

    /// The HTTP request itself failed (network, DNS, TLS, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The media host returned a non-2xx status code.
    #[error("Media host error ({status}): {body}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The media host answered 2xx with a body we could not use.
    #[error("Unexpected media host response: {0}")]
    InvalidResponse(String),
}
