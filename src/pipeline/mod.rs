pub mod batcher;
pub mod dispatcher;
pub mod reassembler;
pub mod splitter;

pub use batcher::{pack_batches, Batch, TextItem};
pub use dispatcher::dispatch_batches;
pub use reassembler::reassemble;
pub use splitter::{char_count, split_text};

use std::future::Future;
use std::time::Duration;

use crate::utils::{ProxyError, Result};

#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    pub max_call_chars: usize,
    pub inter_batch_delay: Duration,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            max_call_chars: 50_000,
            inter_batch_delay: Duration::ZERO,
        }
    }
}

#[derive(Debug, Clone)]
pub struct PipelineOutcome {
    pub translations: Vec<String>,
    pub item_count: usize,
    pub batch_count: usize,
}

pub async fn translate_texts<F, Fut>(
    texts: &[String],
    target_lang: &str,
    options: &PipelineOptions,
    call: F,
) -> Result<PipelineOutcome>
where
    F: FnMut(Vec<String>, String) -> Fut,
    Fut: Future<Output = Result<Vec<String>>>,
{
    if target_lang.trim().is_empty() {
        return Err(ProxyError::InvalidInput("targetLang is required".to_string()));
    }

    // Empty originals never become items; they reappear as "" after
    // reassembly.
    let mut items = Vec::new();
    for (origin, text) in texts.iter().enumerate() {
        if text.is_empty() {
            continue;
        }
        for piece in split_text(text, options.max_call_chars) {
            items.push(TextItem::new(origin, piece));
        }
    }

    let item_count = items.len();
    let batches = pack_batches(items, options.max_call_chars);
    let results =
        dispatch_batches(&batches, target_lang, options.inter_batch_delay, call).await?;
    let translations = reassemble(&batches, &results, texts.len());

    Ok(PipelineOutcome {
        translations,
        item_count,
        batch_count: batches.len(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn owned(texts: &[&str]) -> Vec<String> {
        texts.iter().map(|t| t.to_string()).collect()
    }

    async fn identity_pipeline(texts: &[String], max_call_chars: usize) -> PipelineOutcome {
        let options = PipelineOptions {
            max_call_chars,
            inter_batch_delay: Duration::ZERO,
        };
        translate_texts(texts, "nl", &options, |batch, _| async move { Ok(batch) })
            .await
            .unwrap()
    }

    #[tokio::test]
    async fn missing_target_lang_is_rejected_before_any_call() {
        let err = translate_texts(
            &owned(&["hello"]),
            "  ",
            &PipelineOptions::default(),
            |_, _| async move { panic!("must not be called") },
        )
        .await
        .unwrap_err();

        assert!(matches!(err, ProxyError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn identity_call_reproduces_the_input() {
        let texts = owned(&["hello world", "second text"]);
        let outcome = identity_pipeline(&texts, 50).await;
        assert_eq!(outcome.translations, texts);
        assert_eq!(outcome.item_count, 2);
        assert_eq!(outcome.batch_count, 1);
    }

    #[tokio::test]
    async fn empty_originals_survive_without_reaching_the_batcher() {
        let texts = owned(&["", "a", ""]);
        let outcome = identity_pipeline(&texts, 50).await;
        assert_eq!(outcome.translations, texts);
        assert_eq!(outcome.item_count, 1);
    }

    #[tokio::test]
    async fn empty_input_is_a_no_op() {
        let outcome = identity_pipeline(&[], 50).await;
        assert!(outcome.translations.is_empty());
        assert_eq!(outcome.batch_count, 0);
    }

    #[tokio::test]
    async fn oversized_text_is_split_and_reassembled_exactly() {
        let text = "The quick brown fox. Jumps over the lazy dog! Does it? ".repeat(40);
        let texts = owned(&[text.as_str()]);
        let outcome = identity_pipeline(&texts, 100).await;

        assert_eq!(outcome.translations, texts);
        assert!(outcome.item_count > 1);
        assert!(outcome.batch_count > 1);
    }
}
