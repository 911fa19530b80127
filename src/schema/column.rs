use serde::{Deserialize, Serialize};

fn default_nullable() -> bool {
    true
}

/// A single column as reported by the schema-introspection collaborator.
///
/// `ty` is a free-form type string ("integer", "text", "timestamp with time
/// zone", ...) — the detector never interprets it beyond display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Column {
    pub name: String,
    #[serde(rename = "type")]
    pub ty: String,
    #[serde(default, alias = "isPrimary")]
    pub is_primary_key: bool,
    #[serde(default = "default_nullable")]
    pub is_nullable: bool,
    #[serde(default)]
    pub is_foreign: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Column {
    pub fn new(name: &str, ty: &str) -> Self {
        Self {
            name: name.to_string(),
            ty: ty.to_string(),
            is_primary_key: false,
            is_nullable: true,
            is_foreign: false,
            description: None,
        }
    }

    pub fn primary_key(mut self) -> Self {
        self.is_primary_key = true;
        self.is_nullable = false;
        self
    }

    pub fn not_null(mut self) -> Self {
        self.is_nullable = false;
        self
    }

    pub fn foreign(mut self) -> Self {
        self.is_foreign = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_flags() {
        let col = Column::new("id", "integer").primary_key();
        assert!(col.is_primary_key);
        assert!(!col.is_nullable);
        assert!(!col.is_foreign);
    }

    #[test]
    fn deserializes_is_primary_alias() {
        let col: Column =
            serde_json::from_str(r#"{"name":"id","type":"integer","isPrimary":true}"#)
                .expect("column should deserialize");
        assert!(col.is_primary_key);
        assert!(col.is_nullable);
    }
}
