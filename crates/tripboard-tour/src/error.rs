use thiserror::Error;

/// Errors returned by the tourism API client.
#[derive(Debug, Error)]
pub enum TourApiError {
    /// Network or TLS failure, or a non-2xx status, from the HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered with a non-success `resultCode`.
    #[error("tour API error {code}: {message}")]
    ApiError { code: String, message: String },

    /// The response body could not be deserialized into the expected type.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The gateway answered with an XML error document that could not be read.
    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
