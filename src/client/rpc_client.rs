use std::time::Duration;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::client::QueryScope;
use crate::config::Config;
use crate::error::NlqueryError;

/// A result row: flat key/value record, column order preserved.
pub type Row = IndexMap<String, Value>;

/// Client for the backing store's `execute_sql` RPC.
///
/// Accepts one SQL string per call (trailing semicolons stripped — the RPC
/// rejects them) plus optional organization/doctor scope identifiers.
pub struct RpcClient {
    base_url: String,
    api_key: String,
    client: reqwest::Client,
}

#[derive(Serialize)]
struct ExecuteSqlRequest<'a> {
    sql_query: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    org_scope: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    doctor_scope: Option<String>,
}

impl RpcClient {
    pub fn new(base_url: &str, api_key: &str) -> Result<Self, NlqueryError> {
        if base_url.is_empty() || api_key.is_empty() {
            return Err(NlqueryError::NotConfigured("database RPC endpoint"));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, NlqueryError> {
        Self::new(&config.rpc_url, &config.rpc_api_key)
    }

    pub fn from_env() -> Result<Self, NlqueryError> {
        Self::from_config(&Config::from_env())
    }

    /// Execute one SQL statement and return its rows.
    pub async fn execute(&self, sql: &str, scope: &QueryScope) -> Result<Vec<Row>, NlqueryError> {
        let stripped = sql.trim().trim_end_matches(';').trim_end();
        let url = format!("{}/rest/v1/rpc/execute_sql", self.base_url);
        let body = ExecuteSqlRequest {
            sql_query: stripped,
            org_scope: scope.organization_param(),
            doctor_scope: scope.doctor_param(),
        };

        debug!(sql = %stripped, "executing query");
        let response = self
            .client
            .post(&url)
            .header("apikey", &self.api_key)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() || e.is_timeout() {
                    NlqueryError::Connectivity(e.to_string())
                } else {
                    NlqueryError::Http(e)
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            error!(%status, message = %message, "query execution rejected");
            return Err(classify_execution_error(&message, status.as_u16()));
        }

        let rows: Vec<Row> = response
            .json()
            .await
            .map_err(|e| NlqueryError::Execution(format!("malformed rows payload: {e}")))?;
        Ok(rows)
    }

    /// Lightweight connectivity probe.
    pub async fn check_connection(&self) -> bool {
        self.execute("SELECT 1 as connected", &QueryScope::unscoped())
            .await
            .is_ok()
    }
}

/// Network-flavored error messages are connectivity problems; everything
/// else is a plain execution error carrying the store's message.
fn classify_execution_error(message: &str, status: u16) -> NlqueryError {
    let lower = message.to_lowercase();
    if lower.contains("network") || lower.contains("connection") {
        NlqueryError::Connectivity(message.to_string())
    } else {
        NlqueryError::Execution(format!("status {status}: {message}"))
    }
}
