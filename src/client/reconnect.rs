use std::time::Duration;

use tracing::{info, warn};

use crate::client::RpcClient;
use crate::error::NlqueryError;

pub const MAX_RECONNECT_ATTEMPTS: u32 = 5;
const BASE_BACKOFF_MS: u64 = 1_000;
const MAX_BACKOFF_MS: u64 = 30_000;

/// Exponential backoff delay for a given attempt: 1s, 2s, 4s, ... capped at
/// 30s.
pub fn backoff_delay(attempt: u32) -> Duration {
    let ms = BASE_BACKOFF_MS
        .saturating_mul(1u64 << attempt.min(10))
        .min(MAX_BACKOFF_MS);
    Duration::from_millis(ms)
}

/// Try to re-establish connectivity, sleeping with exponential backoff
/// between probes. Returns the number of attempts used on success.
///
/// This loop exists only for the connectivity check; query execution and AI
/// calls are never retried here.
pub async fn reconnect_with_backoff(client: &RpcClient) -> Result<u32, NlqueryError> {
    for attempt in 0..MAX_RECONNECT_ATTEMPTS {
        let delay = backoff_delay(attempt);
        warn!(attempt = attempt + 1, delay_ms = delay.as_millis() as u64, "attempting to reconnect");
        tokio::time::sleep(delay).await;

        if client.check_connection().await {
            info!(attempts = attempt + 1, "reconnected");
            return Ok(attempt + 1);
        }
    }
    Err(NlqueryError::Connectivity(
        "maximum reconnection attempts reached".to_string(),
    ))
}
