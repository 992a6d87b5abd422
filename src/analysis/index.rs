use std::collections::HashMap;

use crate::analysis::types::Block;

/// Id → block lookup over one analysis result. Borrowed from the block list
/// it was built from and never mutated after construction.
#[derive(Debug, Clone, Default)]
pub struct BlockIndex<'a> {
    by_id: HashMap<&'a str, &'a Block>,
}

impl<'a> BlockIndex<'a> {
    /// Blocks without an id are skipped; a repeated id keeps the last block.
    pub fn build(blocks: &'a [Block]) -> Self {
        let by_id = blocks
            .iter()
            .filter_map(|block| match block.id.as_deref() {
                Some(id) if !id.is_empty() => Some((id, block)),
                _ => None,
            })
            .collect();
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Block> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}
