use thiserror::Error;

/// Startup configuration errors.
///
/// These are fatal: an unknown provider or a missing credential means the
/// run cannot proceed, and nothing is retried.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// Provider identifier not in the supported set
    #[error("Unknown provider '{0}' (expected one of: openai, together.ai, groq, vertex)")]
    UnknownProvider(String),

    /// Required credential missing from the environment
    #[error("Missing credential for {provider}: set {env}")]
    MissingCredential {
        provider: &'static str,
        env: &'static str,
    },

    /// Model spec did not parse as `<provider>:<model_id>`
    #[error("Invalid model spec '{0}' (expected <provider>:<model_id>)")]
    InvalidModelSpec(String),

    /// Could not obtain a Vertex access token from gcloud
    #[error("Failed to obtain Vertex access token: {0}")]
    VertexToken(String),

    /// Could not construct the HTTP client
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(String),
}

/// Errors from a single chat-completion request.
///
/// Callers driving a batch are expected to catch these at the item boundary
/// and record an error marker rather than aborting siblings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ProviderError {
    /// Transport-level failure (connect, timeout, body read)
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-success status from the API
    #[error("API returned HTTP {status}: {body}")]
    Api { status: u16, body: String },

    /// Response carried no choices
    #[error("Response contained no choices")]
    EmptyResponse,

    /// Response body did not decode into the canonical message shape
    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// Other provider error
    #[error("{0}")]
    Other(String),
}
