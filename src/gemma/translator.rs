use async_trait::async_trait;

use crate::error::NlqueryError;
use crate::schema::SchemaModel;

/// Seam between the orchestrator and the AI translation collaborator, so
/// the orchestrator can be exercised with a stub.
#[async_trait]
pub trait Translator: Send + Sync {
    /// Translate a natural-language query to SQL given the schema.
    async fn translate_to_sql(
        &self,
        text: &str,
        schema: &SchemaModel,
    ) -> Result<String, NlqueryError>;

    /// Explain a SQL statement in plain language.
    async fn explain_sql(&self, sql: &str) -> Result<String, NlqueryError>;
}
