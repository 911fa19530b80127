//! Natural-language to SQL translation engine.
//!
//! Free text goes through the orchestrator (`NlpProcessor`), which prefers
//! an AI-backed translation and falls back to the heuristic rule path
//! (intent detection + SQL generation). Generated SQL is post-processed by
//! the enhancers, repaired by the validator on execution errors, and run
//! through the `execute_sql` RPC client.

pub mod error;
pub use error::NlqueryError;

pub mod config;
pub use config::Config;

pub mod schema;
pub use schema::{Column, ForeignKey, SchemaModel, Table};

pub mod intent;
pub use intent::{IntentDetector, QueryIntent};

pub mod generator;
pub use generator::SqlGenerator;

pub mod sql;
pub use sql::SqlClauses;

pub mod enhancer;
pub use enhancer::{enhance_doctor_queries, enhance_patient_queries};

pub mod validator;
pub use validator::{Validation, validate_and_repair};

pub mod gemma;
pub use gemma::{GemmaClient, Translator};

pub mod processor;
pub use processor::{NlpProcessor, ProcessedQuery, QueryExplanation, TranslationOutcome};

pub mod client;
pub use client::{QueryScope, Row, RpcClient};
