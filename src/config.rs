use std::env;

pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-1.5-flash";

/// Environment-driven configuration for the two external collaborators:
/// the query-execution RPC endpoint and the AI translation service.
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Base URL of the backing store exposing the `execute_sql` RPC.
    pub rpc_url: String,
    /// API key sent with every RPC call.
    pub rpc_api_key: String,
    /// API key for the AI translation service. `None` disables the AI path.
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
}

impl Config {
    /// Read configuration from `NLQUERY_RPC_URL`, `NLQUERY_API_KEY`,
    /// `GEMINI_API_KEY`, `GEMINI_MODEL` and `GEMINI_BASE_URL`.
    ///
    /// Missing RPC variables produce empty strings here; the clients reject
    /// them with `NotConfigured` at construction time so the caller gets one
    /// clear error instead of a failed request.
    pub fn from_env() -> Self {
        Self {
            rpc_url: env::var("NLQUERY_RPC_URL").unwrap_or_default(),
            rpc_api_key: env::var("NLQUERY_API_KEY").unwrap_or_default(),
            gemini_api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            gemini_model: env::var("GEMINI_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_MODEL.to_string()),
            gemini_base_url: env::var("GEMINI_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_GEMINI_BASE_URL.to_string()),
        }
    }
}
