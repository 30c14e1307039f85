use std::future::Future;
use std::time::Duration;

use tokio::time::sleep;

use crate::pipeline::batcher::Batch;
use crate::utils::{ProxyError, Result};

// Batches go upstream one at a time; issuing them concurrently would defeat
// the static inter-batch throttle and the upstream rate limit.
pub async fn dispatch_batches<F, Fut>(
    batches: &[Batch],
    target_lang: &str,
    inter_batch_delay: Duration,
    mut call: F,
) -> Result<Vec<Vec<String>>>
where
    F: FnMut(Vec<String>, String) -> Fut,
    Fut: Future<Output = Result<Vec<String>>>,
{
    let mut results = Vec::with_capacity(batches.len());

    for batch in batches {
        let texts: Vec<String> = batch.iter().map(|item| item.text.clone()).collect();
        let outputs = call(texts, target_lang.to_string()).await?;

        if outputs.len() != batch.len() {
            return Err(ProxyError::BatchCountMismatch {
                expected: batch.len(),
                got: outputs.len(),
            });
        }

        results.push(outputs);

        if !inter_batch_delay.is_zero() {
            sleep(inter_batch_delay).await;
        }
    }

    Ok(results)
}
