//! Block graph resolver.
//!
//! Turns the flat, id-linked block list of an analysis result into
//! [`ProcessedDocument`] records:
//!   LINE → text, KEY_VALUE_SET(KEY) → forms, QUERY → queries,
//!   TABLE → ROW → CELL → tables (only when enabled).
//!
//! Dangling ids never fail a call. They degrade to an empty string or an
//! omitted record, depending on the extractor.

use serde_json::Value;
use tracing::{debug, trace};

use crate::analysis::index::BlockIndex;
use crate::analysis::types::{parse_blocks, Block, BlockType, EntityType, RelationshipType};
use crate::core::config::ResolverConfig;
use crate::core::errors::AppResult;
use crate::core::types::{
    FormField, LineRecord, ProcessedDocument, QueryAnswer, Table, TableCell, TableRow,
};

pub fn resolve(data: &Value, config: &ResolverConfig) -> AppResult<ProcessedDocument> {
    let blocks = parse_blocks(data)?;
    Ok(resolve_blocks(&blocks, config))
}

/// One pass over `blocks`, with point lookups into an index built from the
/// same slice.
pub fn resolve_blocks(blocks: &[Block], config: &ResolverConfig) -> ProcessedDocument {
    let index = BlockIndex::build(blocks);
    let mut results = ProcessedDocument::default();

    for block in blocks {
        match block.block_type {
            Some(BlockType::Line) => {
                if let Some(line) = extract_line(block) {
                    results.text.push(line);
                }
            }
            Some(BlockType::KeyValueSet) => {
                if let Some(field) = extract_form_field(block, &index) {
                    results.forms.push(field);
                }
            }
            Some(BlockType::Query) => {
                if let Some(answer) = extract_query_answer(block, &index) {
                    results.queries.push(answer);
                }
            }
            Some(BlockType::Table) if config.tables_enabled => {
                results.tables.push(extract_table(block, &index));
            }
            _ => {}
        }
    }

    debug!(
        blocks = blocks.len(),
        indexed = index.len(),
        lines = results.text.len(),
        forms = results.forms.len(),
        queries = results.queries.len(),
        tables = results.tables.len(),
        "resolved analysis blocks"
    );

    results
}

// ── Lines ─────────────────────────────────────────────────────────────────────

pub fn extract_line(block: &Block) -> Option<LineRecord> {
    let text = block.text.as_deref().filter(|text| !text.is_empty())?;
    Some(LineRecord {
        text: text.to_string(),
        confidence: block.confidence,
    })
}

// ── Forms ─────────────────────────────────────────────────────────────────────

/// Only KEY-role blocks produce a field, and only when their key text is
/// non-empty. A missing value yields `Value: ""`.
pub fn extract_form_field(block: &Block, index: &BlockIndex<'_>) -> Option<FormField> {
    if !block.has_entity(EntityType::Key) {
        return None;
    }
    let key = extract_text(block, index);
    if key.is_empty() {
        return None;
    }
    Some(FormField {
        key,
        value: extract_value(block, index),
        confidence: block.confidence,
    })
}

/// Text of the first VALUE target. Later targets are ignored even when the
/// first one is dangling.
pub fn extract_value(block: &Block, index: &BlockIndex<'_>) -> String {
    let Some(value_id) = block.related_ids(RelationshipType::Value).next() else {
        return String::new();
    };
    match index.get(value_id) {
        Some(value_block) => extract_text(value_block, index),
        None => {
            trace!(block = ?block.id, value_id, "dangling VALUE edge");
            String::new()
        }
    }
}

// ── Queries ───────────────────────────────────────────────────────────────────

/// Unlike forms, an unanswered query produces no record at all.
pub fn extract_query_answer(block: &Block, index: &BlockIndex<'_>) -> Option<QueryAnswer> {
    let Some(answer) = find_query_result(block, index) else {
        trace!(block = ?block.id, "query has no QUERY_RESULT answer");
        return None;
    };
    let query = block
        .query
        .as_ref()
        .and_then(|query| query.text.clone())
        .unwrap_or_default();
    Some(QueryAnswer {
        query,
        result: answer.text.clone().unwrap_or_default(),
        confidence: answer.confidence,
    })
}

/// First ANSWER target, across all edges, that resolves to a QUERY_RESULT.
pub fn find_query_result<'a>(block: &Block, index: &BlockIndex<'a>) -> Option<&'a Block> {
    block
        .related_ids(RelationshipType::Answer)
        .filter_map(|id| index.get(id))
        .find(|candidate| candidate.is(BlockType::QueryResult))
}

// ── Tables ────────────────────────────────────────────────────────────────────

/// TABLE → ROW → CELL, each level in CHILD edge order. A table without rows
/// is still returned, as an empty grid.
pub fn extract_table(block: &Block, index: &BlockIndex<'_>) -> Table {
    children_of_type(block, index, BlockType::Row)
        .map(|row| extract_row(row, index))
        .collect()
}

fn extract_row(row: &Block, index: &BlockIndex<'_>) -> TableRow {
    children_of_type(row, index, BlockType::Cell)
        .map(|cell| TableCell {
            text: extract_text(cell, index),
            confidence: cell.confidence,
        })
        .collect()
}

// ── Text composition ──────────────────────────────────────────────────────────

/// Space-joined text of the WORD children reached through CHILD edges.
pub fn extract_text(block: &Block, index: &BlockIndex<'_>) -> String {
    let words: Vec<&str> = children_of_type(block, index, BlockType::Word)
        .filter_map(|word| word.text.as_deref())
        .collect();
    words.join(" ").trim().to_string()
}

fn children_of_type<'a, 'b>(
    block: &'b Block,
    index: &'b BlockIndex<'a>,
    kind: BlockType,
) -> impl Iterator<Item = &'a Block> + 'b
where
    'a: 'b,
{
    block
        .related_ids(RelationshipType::Child)
        .filter_map(move |id| {
            let child = index.get(id);
            if child.is_none() {
                trace!(block = ?block.id, child_id = id, "dangling CHILD edge");
            }
            child
        })
        .filter(move |child| child.is(kind))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(value: Value) -> Vec<Block> {
        serde_json::from_value(value).expect("blocks should decode")
    }

    #[test]
    fn extract_text_skips_non_word_children_and_dangling_ids() {
        let input = blocks(serde_json::json!([
            {
                "Id": "line",
                "BlockType": "LINE",
                "Relationships": [
                    { "Type": "CHILD", "Ids": ["w1", "sel", "gone", "w2"] }
                ]
            },
            { "Id": "w1", "BlockType": "WORD", "Text": "Invoice" },
            { "Id": "sel", "BlockType": "SELECTION_ELEMENT" },
            { "Id": "w2", "BlockType": "WORD", "Text": "Number" }
        ]));
        let index = BlockIndex::build(&input);

        assert_eq!(extract_text(&input[0], &index), "Invoice Number");
    }

    #[test]
    fn extract_text_trims_outer_whitespace() {
        let input = blocks(serde_json::json!([
            {
                "Id": "k",
                "BlockType": "KEY_VALUE_SET",
                "Relationships": [{ "Type": "CHILD", "Ids": ["w1", "w2"] }]
            },
            { "Id": "w1", "BlockType": "WORD", "Text": " Due" },
            { "Id": "w2", "BlockType": "WORD", "Text": "date: " }
        ]));
        let index = BlockIndex::build(&input);

        assert_eq!(extract_text(&input[0], &index), "Due date:");
    }

    #[test]
    fn extract_value_uses_only_the_first_target() {
        let input = blocks(serde_json::json!([
            {
                "Id": "k",
                "BlockType": "KEY_VALUE_SET",
                "EntityTypes": ["KEY"],
                "Relationships": [
                    { "Type": "VALUE", "Ids": ["missing", "v2"] }
                ]
            },
            {
                "Id": "v2",
                "BlockType": "KEY_VALUE_SET",
                "EntityTypes": ["VALUE"],
                "Relationships": [{ "Type": "CHILD", "Ids": ["w"] }]
            },
            { "Id": "w", "BlockType": "WORD", "Text": "never read" }
        ]));
        let index = BlockIndex::build(&input);

        assert_eq!(extract_value(&input[0], &index), "");
    }

    #[test]
    fn find_query_result_skips_targets_of_other_types() {
        let input = blocks(serde_json::json!([
            {
                "Id": "q",
                "BlockType": "QUERY",
                "Relationships": [
                    { "Type": "ANSWER", "Ids": ["gone", "line"] },
                    { "Type": "ANSWER", "Ids": ["r1", "r2"] }
                ]
            },
            { "Id": "line", "BlockType": "LINE", "Text": "not an answer" },
            { "Id": "r1", "BlockType": "QUERY_RESULT", "Text": "first" },
            { "Id": "r2", "BlockType": "QUERY_RESULT", "Text": "second" }
        ]));
        let index = BlockIndex::build(&input);

        let answer = find_query_result(&input[0], &index).expect("answer should resolve");
        assert_eq!(answer.text.as_deref(), Some("first"));
    }

    #[test]
    fn extract_row_keeps_empty_cells() {
        let input = blocks(serde_json::json!([
            {
                "Id": "row",
                "BlockType": "ROW",
                "Relationships": [{ "Type": "CHILD", "Ids": ["c1", "c2"] }]
            },
            { "Id": "c1", "BlockType": "CELL", "Confidence": 40.5 },
            {
                "Id": "c2",
                "BlockType": "CELL",
                "Confidence": 88.0,
                "Relationships": [{ "Type": "CHILD", "Ids": ["w"] }]
            },
            { "Id": "w", "BlockType": "WORD", "Text": "42" }
        ]));
        let index = BlockIndex::build(&input);

        let row = extract_row(&input[0], &index);
        assert_eq!(
            row,
            vec![
                TableCell {
                    text: String::new(),
                    confidence: Some(40.5),
                },
                TableCell {
                    text: "42".to_string(),
                    confidence: Some(88.0),
                },
            ]
        );
    }
}
