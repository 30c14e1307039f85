use std::time::Duration;

use deepl_batch_proxy::pipeline::{
    char_count, pack_batches, split_text, translate_texts, PipelineOptions, TextItem,
};
use deepl_batch_proxy::ProxyError;

const MAX_CALL_CHARS: usize = 50_000;

fn options() -> PipelineOptions {
    PipelineOptions {
        max_call_chars: MAX_CALL_CHARS,
        inter_batch_delay: Duration::ZERO,
    }
}

fn owned(texts: &[&str]) -> Vec<String> {
    texts.iter().map(|t| t.to_string()).collect()
}

// ASCII sentence filler of an exact character length.
fn sentence_text(target_chars: usize) -> String {
    let sentences = [
        "The proxy splits oversized passages at sentence boundaries. ",
        "Every character must survive the round trip! ",
        "Does the batcher keep the running total under the limit? ",
        "Newlines count as boundaries too.\n",
    ];

    let mut text = String::new();
    let mut i = 0;
    while text.len() < target_chars {
        text.push_str(sentences[i % sentences.len()]);
        i += 1;
    }
    text.truncate(target_chars);
    text
}

async fn identity_translate(texts: &[String]) -> Vec<String> {
    translate_texts(texts, "nl", &options(), |batch, _| async move { Ok(batch) })
        .await
        .unwrap()
        .translations
}

#[tokio::test]
async fn short_single_text_passes_through() {
    let texts = owned(&["hello world"]);
    assert_eq!(identity_translate(&texts).await, texts);
}

#[tokio::test]
async fn empty_originals_keep_their_slots() {
    let texts = owned(&["", "a", ""]);
    assert_eq!(identity_translate(&texts).await, texts);
}

#[tokio::test]
async fn oversized_sentence_text_splits_within_bounds_and_round_trips() {
    let text = sentence_text(60_000);
    assert_eq!(char_count(&text), 60_000);

    let pieces = split_text(&text, MAX_CALL_CHARS);
    assert!(pieces.len() >= 2);
    for piece in &pieces {
        assert!(char_count(piece) <= MAX_CALL_CHARS);
    }
    assert_eq!(pieces.concat(), text);

    let items: Vec<TextItem> = pieces
        .into_iter()
        .map(|piece| TextItem::new(0, piece))
        .collect();
    for batch in pack_batches(items, MAX_CALL_CHARS) {
        let total: usize = batch.iter().map(TextItem::char_count).sum();
        assert!(total <= MAX_CALL_CHARS);
    }

    let texts = vec![text];
    assert_eq!(identity_translate(&texts).await, texts);
}

#[tokio::test]
async fn interleaved_batches_map_back_to_their_origins() {
    let texts = vec!["a".repeat(35_000), "b".repeat(30_000), "c".repeat(45_000)];

    let items: Vec<TextItem> = texts
        .iter()
        .enumerate()
        .map(|(origin, text)| TextItem::new(origin, text.clone()))
        .collect();
    let batches = pack_batches(items, MAX_CALL_CHARS);
    assert!(batches.len() >= 2);
    for batch in &batches {
        let total: usize = batch.iter().map(TextItem::char_count).sum();
        assert!(total <= MAX_CALL_CHARS);
    }

    assert_eq!(identity_translate(&texts).await, texts);
}

#[tokio::test]
async fn spaceless_text_hard_cuts_at_the_limit_and_round_trips() {
    let text = "x".repeat(65_000);

    let pieces = split_text(&text, MAX_CALL_CHARS);
    assert_eq!(pieces.len(), 2);
    assert_eq!(char_count(&pieces[0]), MAX_CALL_CHARS);
    assert_eq!(char_count(&pieces[1]), 15_000);

    let texts = vec![text];
    assert_eq!(identity_translate(&texts).await, texts);
}

#[tokio::test]
async fn count_mismatch_fails_without_partial_output() {
    let texts = owned(&["first", "second"]);

    let err = translate_texts(&texts, "nl", &options(), |mut batch, _| async move {
        batch.pop();
        Ok(batch)
    })
    .await
    .unwrap_err();

    assert!(matches!(err, ProxyError::BatchCountMismatch { .. }));
}

#[tokio::test]
async fn unicode_and_empties_round_trip() {
    let texts = owned(&[
        "",
        "Línea con acentos: áéíóú ñ ç — fin.\nY otra línea.",
        "Français: Voilà! Ça va? Très bien...",
        "",
    ]);

    let tight = PipelineOptions {
        max_call_chars: 9,
        inter_batch_delay: Duration::ZERO,
    };
    let outcome = translate_texts(&texts, "es", &tight, |batch, _| async move { Ok(batch) })
        .await
        .unwrap();

    assert_eq!(outcome.translations, texts);
    assert!(outcome.batch_count >= 2);
}

#[tokio::test]
async fn output_order_matches_input_order() {
    let texts: Vec<String> = (0..20)
        .map(|i| format!("text number {i} with some padding. ").repeat(i % 5))
        .collect();

    let tight = PipelineOptions {
        max_call_chars: 25,
        inter_batch_delay: Duration::ZERO,
    };
    let outcome = translate_texts(&texts, "de", &tight, |batch, _| async move { Ok(batch) })
        .await
        .unwrap();

    assert_eq!(outcome.translations.len(), texts.len());
    assert_eq!(outcome.translations, texts);
}
