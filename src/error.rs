use thiserror::Error;

/// Crate-wide error taxonomy.
///
/// `NoTableMatched` is the only fatal detection error: every other
/// sub-detector degrades to an empty result instead of failing. AI-path
/// errors (`Translation`, `Http`, `MalformedResponse`, `NotConfigured`) are
/// recovered by falling back to the rule-based path and only surface when
/// the rule path fails too.
#[derive(Debug, Error)]
pub enum NlqueryError {
    #[error(
        "Could not identify any tables in your query. Please mention one of the known table names."
    )]
    NoTableMatched,

    #[error("AI translation failed: {0}")]
    Translation(String),

    #[error("Query execution failed: {0}")]
    Execution(String),

    #[error("Could not reach the database: {0}")]
    Connectivity(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Malformed response from the AI collaborator: {0}")]
    MalformedResponse(String),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),
}
