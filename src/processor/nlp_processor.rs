use tracing::{debug, warn};

use crate::enhancer::{enhance_doctor_queries, enhance_patient_queries};
use crate::error::NlqueryError;
use crate::gemma::Translator;
use crate::generator::SqlGenerator;
use crate::intent::{IntentDetector, QueryIntent};
use crate::processor::QueryExplanation;
use crate::schema::SchemaModel;

/// How the SQL was produced, kept as data rather than control flow so
/// callers can tell the AI path from the heuristic one.
#[derive(Debug, Clone, PartialEq)]
pub enum TranslationOutcome {
    /// The AI collaborator produced the SQL.
    Translated { sql: String },
    /// The rule-based path produced the SQL after the AI path failed or was
    /// never configured.
    Fallback { sql: String, reason: String },
}

impl TranslationOutcome {
    pub fn sql(&self) -> &str {
        match self {
            TranslationOutcome::Translated { sql } => sql,
            TranslationOutcome::Fallback { sql, .. } => sql,
        }
    }

    pub fn used_ai(&self) -> bool {
        matches!(self, TranslationOutcome::Translated { .. })
    }
}

/// A fully processed query: the raw translation outcome, the enhanced SQL
/// that should actually run, and a natural-language explanation.
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedQuery {
    pub outcome: TranslationOutcome,
    pub sql: String,
    pub explanation: String,
}

/// Sequences the translation of one natural-language query.
///
/// AI path first when a translator is configured; rule path (intent
/// detection + SQL generation) on AI failure or when no translator exists.
/// The only fatal error is a rule-path failure to identify any table.
pub struct NlpProcessor {
    detector: IntentDetector,
    translator: Option<Box<dyn Translator>>,
}

impl NlpProcessor {
    /// Rule-path-only processor.
    pub fn new(schema: SchemaModel) -> Self {
        Self {
            detector: IntentDetector::new(schema),
            translator: None,
        }
    }

    pub fn with_translator(schema: SchemaModel, translator: Box<dyn Translator>) -> Self {
        Self {
            detector: IntentDetector::new(schema),
            translator: Some(translator),
        }
    }

    pub fn schema(&self) -> &SchemaModel {
        self.detector.schema()
    }

    /// Run the heuristic pipeline alone.
    pub fn rule_based_sql(&self, text: &str) -> Result<(String, QueryIntent), NlqueryError> {
        let intent = self.detector.detect(text)?;
        let sql = SqlGenerator::render(&intent);
        Ok((sql, intent))
    }

    /// Translate text to SQL, preferring the AI path.
    pub async fn translate(&self, text: &str) -> Result<TranslationOutcome, NlqueryError> {
        if let Some(translator) = &self.translator {
            match translator.translate_to_sql(text, self.detector.schema()).await {
                Ok(sql) => {
                    debug!("AI path produced the translation");
                    return Ok(TranslationOutcome::Translated { sql });
                }
                Err(error) => {
                    warn!(%error, "AI path failed, falling back to rule path");
                    let (sql, _) = self.rule_based_sql(text)?;
                    return Ok(TranslationOutcome::Fallback { sql, reason: error.to_string() });
                }
            }
        }

        let (sql, _) = self.rule_based_sql(text)?;
        Ok(TranslationOutcome::Fallback {
            sql,
            reason: "no AI translator configured".to_string(),
        })
    }

    /// Full pipeline: translate, enhance, explain.
    pub async fn process(&self, text: &str) -> Result<ProcessedQuery, NlqueryError> {
        let outcome = self.translate(text).await?;
        let sql = enhance_patient_queries(&enhance_doctor_queries(outcome.sql()));
        let explanation = self.explain(text, &sql).await;
        Ok(ProcessedQuery {
            outcome,
            sql,
            explanation,
        })
    }

    /// Explain the SQL through the AI collaborator, falling back to the
    /// templated explanation built from a fresh detection pass.
    pub async fn explain(&self, text: &str, sql: &str) -> String {
        if let Some(translator) = &self.translator {
            match translator.explain_sql(sql).await {
                Ok(explanation) => return explanation,
                Err(error) => {
                    warn!(%error, "AI explanation failed, using templated fallback");
                }
            }
        }
        self.templated_explanation(text)
    }

    fn templated_explanation(&self, text: &str) -> String {
        match self.detector.detect(text) {
            Ok(intent) => QueryExplanation::from_intent(&intent).to_string(),
            Err(_) => format!("This query answers: \"{text}\"."),
        }
    }
}

#[cfg(test)]
mod tests {
    use async_trait::async_trait;

    use super::*;
    use crate::schema::fixtures::clinic_schema;

    /// Scripted stand-in for the AI collaborator.
    struct StubTranslator {
        sql: Option<&'static str>,
        explanation: Option<&'static str>,
    }

    #[async_trait]
    impl Translator for StubTranslator {
        async fn translate_to_sql(
            &self,
            _text: &str,
            _schema: &SchemaModel,
        ) -> Result<String, NlqueryError> {
            self.sql
                .map(str::to_string)
                .ok_or_else(|| NlqueryError::Translation("stub offline".to_string()))
        }

        async fn explain_sql(&self, _sql: &str) -> Result<String, NlqueryError> {
            self.explanation
                .map(str::to_string)
                .ok_or_else(|| NlqueryError::Translation("stub offline".to_string()))
        }
    }

    #[tokio::test]
    async fn ai_path_success_is_tagged_translated() {
        let processor = NlpProcessor::with_translator(
            clinic_schema(),
            Box::new(StubTranslator {
                sql: Some("SELECT name FROM doctors;"),
                explanation: Some("Lists doctor names."),
            }),
        );
        let outcome = processor.translate("doctor names").await.expect("should translate");
        assert!(outcome.used_ai());
        assert_eq!(outcome.sql(), "SELECT name FROM doctors;");
    }

    #[tokio::test]
    async fn ai_failure_falls_back_with_reason() {
        let processor = NlpProcessor::with_translator(
            clinic_schema(),
            Box::new(StubTranslator { sql: None, explanation: None }),
        );
        let outcome = processor
            .translate("show me all patients")
            .await
            .expect("rule path should succeed");
        match outcome {
            TranslationOutcome::Fallback { sql, reason } => {
                assert!(sql.starts_with("SELECT id, name, age"));
                assert!(reason.contains("stub offline"));
            }
            other => panic!("expected fallback, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn no_translator_uses_rule_path() {
        let processor = NlpProcessor::new(clinic_schema());
        let outcome = processor
            .translate("how many doctors are there")
            .await
            .expect("rule path should succeed");
        assert!(!outcome.used_ai());
        assert_eq!(outcome.sql(), "SELECT COUNT(*) as count FROM doctors;");
    }

    #[tokio::test]
    async fn undetectable_table_is_fatal() {
        let processor = NlpProcessor::new(clinic_schema());
        let err = processor.translate("what is the meaning of life").await.unwrap_err();
        assert!(matches!(&err, NlqueryError::NoTableMatched));
        assert!(err.to_string().contains("Could not identify any tables"));
    }

    #[tokio::test]
    async fn process_enhances_and_explains() {
        let processor = NlpProcessor::new(clinic_schema());
        let processed = processor.process("show me all doctors").await.expect("should process");
        assert!(processed.sql.contains("LEFT JOIN organizations"));
        assert!(processed.sql.contains("organization_name"));
        assert!(processed.explanation.starts_with("This query"));
        assert!(!processed.outcome.used_ai());
    }

    #[tokio::test]
    async fn explanation_falls_back_when_ai_explain_fails() {
        let processor = NlpProcessor::with_translator(
            clinic_schema(),
            Box::new(StubTranslator {
                sql: Some("SELECT name FROM patients;"),
                explanation: None,
            }),
        );
        let processed = processor.process("patient names").await.expect("should process");
        assert!(processed.outcome.used_ai());
        assert!(processed.explanation.starts_with("This query"));
    }
}
