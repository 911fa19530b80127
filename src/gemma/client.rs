use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Config;
use crate::error::NlqueryError;
use crate::gemma::Translator;
use crate::schema::SchemaModel;

/// HTTP client for a Gemini-style `generateContent` endpoint.
///
/// Only the connect timeout is bounded; generation itself runs without a
/// request timeout, matching the behavior of the rest of the pipeline.
#[derive(Debug)]
pub struct GemmaClient {
    base_url: String,
    api_key: String,
    model: String,
    client: reqwest::Client,
}

impl GemmaClient {
    pub fn new(base_url: &str, api_key: &str, model: &str) -> Result<Self, NlqueryError> {
        if api_key.is_empty() {
            return Err(NlqueryError::NotConfigured("Gemini API key"));
        }
        let client = reqwest::Client::builder()
            .connect_timeout(Duration::from_secs(10))
            .build()?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            model: model.to_string(),
            client,
        })
    }

    pub fn from_config(config: &Config) -> Result<Self, NlqueryError> {
        let api_key = config
            .gemini_api_key
            .as_deref()
            .ok_or(NlqueryError::NotConfigured("Gemini API key"))?;
        Self::new(&config.gemini_base_url, api_key, &config.gemini_model)
    }

    pub fn from_env() -> Result<Self, NlqueryError> {
        Self::from_config(&Config::from_env())
    }

    fn translation_prompt(text: &str, schema: &SchemaModel) -> String {
        format!(
            "You are a SQL query generator. Convert the following natural language query to SQL.\n\n\
             Database Schema:\n{}\n\
             Natural Language Query: \"{}\"\n\n\
             Return only the SQL query without any explanation or markdown formatting.",
            schema.prompt_context(),
            text
        )
    }

    fn explanation_prompt(sql: &str) -> String {
        format!(
            "Explain the following SQL query in simple terms:\n\n\
             SQL Query: {sql}\n\n\
             Provide a concise explanation that a non-technical person would understand."
        )
    }

    async fn generate(&self, prompt: &str) -> Result<String, NlqueryError> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.base_url, self.model, self.api_key
        );
        let body = GenerateContentRequest {
            contents: vec![Content {
                parts: vec![Part { text: prompt.to_string() }],
            }],
        };

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(NlqueryError::Translation(format!(
                "generateContent returned {status}: {body}"
            )));
        }

        let parsed: GenerateContentResponse = response
            .json()
            .await
            .map_err(|e| NlqueryError::MalformedResponse(e.to_string()))?;

        parsed
            .candidates
            .into_iter()
            .next()
            .and_then(|c| c.content.parts.into_iter().next())
            .map(|p| p.text)
            .ok_or_else(|| NlqueryError::MalformedResponse("response carried no candidates".to_string()))
    }
}

#[async_trait]
impl Translator for GemmaClient {
    async fn translate_to_sql(
        &self,
        text: &str,
        schema: &SchemaModel,
    ) -> Result<String, NlqueryError> {
        let prompt = Self::translation_prompt(text, schema);
        let raw = self.generate(&prompt).await?;
        let sql = clean_sql_response(&raw)?;
        debug!(sql = %sql, "AI translation produced SQL");
        Ok(sql)
    }

    async fn explain_sql(&self, sql: &str) -> Result<String, NlqueryError> {
        let prompt = Self::explanation_prompt(sql);
        self.generate(&prompt).await
    }
}

#[derive(Serialize)]
struct GenerateContentRequest {
    contents: Vec<Content>,
}

#[derive(Serialize)]
struct Content {
    parts: Vec<Part>,
}

#[derive(Serialize)]
struct Part {
    text: String,
}

#[derive(Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: CandidateContent,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Deserialize)]
struct ResponsePart {
    text: String,
}

/// Clean a model response into a bare SQL statement: strip markdown code
/// fences, drop any prose before the first SELECT, and ensure a trailing
/// semicolon. A response with no SELECT token at all is malformed.
pub fn clean_sql_response(text: &str) -> Result<String, NlqueryError> {
    let stripped = text.replace("```sql", "").replace("```", "");
    let stripped = stripped.trim();

    let select_at = stripped
        .to_lowercase()
        .find("select")
        .ok_or_else(|| NlqueryError::MalformedResponse("no SELECT in AI response".to_string()))?;

    let mut sql = stripped[select_at..].trim().to_string();
    if !sql.ends_with(';') {
        sql.push(';');
    }
    Ok(sql)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::fixtures::clinic_schema;

    #[test]
    fn clean_strips_fences_and_prose() {
        let raw = "Here is your query:\n```sql\nSELECT * FROM doctors\n```";
        assert_eq!(clean_sql_response(raw).expect("should clean"), "SELECT * FROM doctors;");
    }

    #[test]
    fn clean_keeps_existing_semicolon() {
        assert_eq!(
            clean_sql_response("SELECT name FROM patients;").expect("should clean"),
            "SELECT name FROM patients;"
        );
    }

    #[test]
    fn clean_rejects_non_sql() {
        let err = clean_sql_response("I cannot answer that.").unwrap_err();
        assert!(matches!(err, NlqueryError::MalformedResponse(_)));
    }

    #[test]
    fn empty_api_key_is_not_configured() {
        let err = GemmaClient::new("https://example.test", "", "gemini-1.5-flash").unwrap_err();
        assert!(matches!(err, NlqueryError::NotConfigured(_)));
    }

    #[test]
    fn translation_prompt_embeds_schema_and_query() {
        let prompt = GemmaClient::translation_prompt("show all doctors", &clinic_schema());
        assert!(prompt.contains("Table: doctors"));
        assert!(prompt.contains("\"show all doctors\""));
        assert!(prompt.contains("without any explanation"));
    }
}
