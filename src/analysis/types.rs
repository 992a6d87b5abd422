use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::trace;

use crate::core::errors::{AppError, AppResult};

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BlockType {
    Line,
    Word,
    KeyValueSet,
    Query,
    QueryResult,
    Table,
    Row,
    Cell,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RelationshipType {
    Child,
    Value,
    Answer,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntityType {
    Key,
    Value,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Relationship {
    #[serde(rename = "Type", default, deserialize_with = "lenient")]
    pub kind: Option<RelationshipType>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub ids: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct QueryDetail {
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub alias: Option<String>,
}

/// One block of an analysis result. Every field is optional on the wire, and
/// a field of the wrong JSON type reads as absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Block {
    #[serde(default, deserialize_with = "lenient")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub block_type: Option<BlockType>,
    #[serde(default, deserialize_with = "lenient")]
    pub text: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub entity_types: Vec<EntityType>,
    #[serde(default, deserialize_with = "lenient")]
    pub query: Option<QueryDetail>,
    #[serde(default, deserialize_with = "lenient_seq")]
    pub relationships: Vec<Relationship>,
}

impl Block {
    pub fn is(&self, kind: BlockType) -> bool {
        self.block_type == Some(kind)
    }

    pub fn has_entity(&self, entity: EntityType) -> bool {
        self.entity_types.contains(&entity)
    }

    /// Target ids of every edge of `kind`, in edge order.
    pub fn related_ids(&self, kind: RelationshipType) -> impl Iterator<Item = &str> + '_ {
        self.relationships
            .iter()
            .filter(move |rel| rel.kind == Some(kind))
            .flat_map(|rel| rel.ids.iter().map(String::as_str))
    }
}

fn lenient<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    Ok(serde_json::from_value(Value::deserialize(deserializer)?).ok())
}

/// Non-arrays read as empty; entries that do not decode are dropped.
fn lenient_seq<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let items = match Value::deserialize(deserializer)? {
        Value::Array(items) => items,
        _ => return Ok(Vec::new()),
    };
    Ok(items
        .into_iter()
        .filter_map(|item| serde_json::from_value(item).ok())
        .collect())
}

/// Pulls the `Blocks` sequence out of a raw analysis result. Only a missing
/// or non-array `Blocks` fails; elements that are not objects are skipped.
pub fn parse_blocks(data: &Value) -> AppResult<Vec<Block>> {
    let items = data
        .get("Blocks")
        .and_then(Value::as_array)
        .ok_or_else(|| AppError::InvalidInput("missing Blocks in analysis output".to_string()))?;

    Ok(items
        .iter()
        .filter_map(|item| match Block::deserialize(item) {
            Ok(block) => Some(block),
            Err(err) => {
                trace!(%err, "skipping undecodable block");
                None
            }
        })
        .collect())
}
