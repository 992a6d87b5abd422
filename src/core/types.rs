use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::errors::{AppError, AppResult};

/// One LINE block, flattened.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct LineRecord {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

/// A KEY block paired with the text of its VALUE counterpart.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct FormField {
    pub key: String,
    pub value: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct TableCell {
    pub text: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

pub type TableRow = Vec<TableCell>;
pub type Table = Vec<TableRow>;

/// A QUERY block answered by a QUERY_RESULT block. Confidence belongs to the
/// answer, not the question.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
#[serde(rename_all = "PascalCase")]
pub struct QueryAnswer {
    pub query: String,
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ProcessedDocument {
    pub text: Vec<LineRecord>,
    pub forms: Vec<FormField>,
    pub tables: Vec<Table>,
    pub queries: Vec<QueryAnswer>,
}

impl ProcessedDocument {
    pub fn is_empty(&self) -> bool {
        self.record_count() == 0
    }

    /// Tables count once each, regardless of their size.
    pub fn record_count(&self) -> usize {
        self.text.len() + self.forms.len() + self.tables.len() + self.queries.len()
    }
}

/// JSON Schema of the resolver output, for consumers that validate it.
pub fn output_schema() -> AppResult<Value> {
    serde_json::to_value(schemars::schema_for!(ProcessedDocument))
        .map_err(|err| AppError::Serialization(format!("cannot render output schema: {err}")))
}
