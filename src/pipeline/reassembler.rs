use std::collections::BTreeMap;

use crate::pipeline::batcher::Batch;

// Pieces arrive in batch order, which for any one origin equals splitter
// order, so reconstruction is a plain ordered concatenation.
pub fn reassemble(
    batches: &[Batch],
    results: &[Vec<String>],
    original_count: usize,
) -> Vec<String> {
    let mut pieces: BTreeMap<usize, Vec<String>> = BTreeMap::new();

    for (batch, outputs) in batches.iter().zip(results) {
        for (item, output) in batch.iter().zip(outputs) {
            pieces.entry(item.origin).or_default().push(output.clone());
        }
    }

    (0..original_count)
        .map(|origin| {
            pieces
                .remove(&origin)
                .map(|parts| parts.concat())
                .unwrap_or_default()
        })
        .collect()
}
