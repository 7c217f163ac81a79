/*!
 * Tests for the per-string translation pipeline
 */

use std::collections::BTreeMap;
use std::sync::Arc;

use pot_translate::errors::StoreError;
use pot_translate::providers::MockTranslator;
use pot_translate::storage::{KeyValueStore, MemoryStore};
use pot_translate::translation::{
    DictionaryResolver, ErrorLog, OutcomeSource, ReviewSinks, TranslationCache, TranslationPipeline,
};

use crate::common;

/// Store that can be read but refuses every write
struct ReadOnlyStore;

impl KeyValueStore for ReadOnlyStore {
    fn load(&self) -> Result<BTreeMap<String, String>, StoreError> {
        Ok(BTreeMap::new())
    }

    fn save(&self, _entries: &BTreeMap<String, String>) -> Result<(), StoreError> {
        Err(StoreError::Io {
            path: "read-only".into(),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "read-only"),
        })
    }

    fn describe(&self) -> String {
        "read-only".to_string()
    }
}

#[tokio::test]
async fn test_translate_withPlaceholder_shouldProtectAndRestore() {
    let translator = MockTranslator::echo().with_custom_response(|req| req.text.replace("Hello", "Olá"));
    let (pipeline, stores) = common::test_pipeline(translator.clone(), &[], &[]);

    let result = pipeline.translate("Hello %s").await;

    assert_eq!(result, "Olá %s");
    let requests = translator.requests();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].text, "Hello ##PH0##");
    assert_eq!(requests[0].from, "en");
    assert_eq!(requests[0].to, "pt");
    assert_eq!(stores.cache.snapshot().get("Hello %s").map(String::as_str), Some("Olá %s"));
}

#[tokio::test]
async fn test_translate_withBracketedText_shouldNeverCallTranslator() {
    let translator = MockTranslator::working();
    let text = "[DO_NOT_TRANSLATE]";
    let pipeline = TranslationPipeline::new(
        Arc::new(translator.clone()),
        DictionaryResolver::new(common::map(&[(text, "nope")]), common::map(&[(text, "nope")])),
        TranslationCache::load(Arc::new(MemoryStore::with_entries([(text, "cached")]))),
        ReviewSinks::load(Arc::new(MemoryStore::new()), Arc::new(MemoryStore::new())),
        ErrorLog::in_memory(),
        "en",
        "pt",
    );

    let outcome = pipeline.translate_detailed(text).await;

    assert_eq!(outcome.text, text);
    assert_eq!(outcome.source, OutcomeSource::Exempt);
    assert_eq!(translator.request_count(), 0);
}

#[tokio::test]
async fn test_translate_withPhraseMatch_shouldBypassCache() {
    let translator = MockTranslator::working();
    let (pipeline, stores) = common::test_pipeline(translator.clone(), &[], &[("Cancel", "Cancelar")]);

    let outcome = pipeline.translate_detailed("cancel").await;

    assert_eq!(outcome.text, "Cancelar");
    assert_eq!(outcome.source, OutcomeSource::Phrase);
    assert_eq!(translator.request_count(), 0);
    assert_eq!(pipeline.cache().stats().0 + pipeline.cache().stats().1, 0);
    assert_eq!(stores.cache.save_count(), 0);
}

#[tokio::test]
async fn test_translate_withFailingTranslator_shouldFallBackAndLog() {
    let (pipeline, stores) = common::test_pipeline(MockTranslator::failing(), &[], &[]);

    let outcome = pipeline.translate_detailed("Retry").await;

    assert_eq!(outcome.text, "Retry");
    assert_eq!(outcome.source, OutcomeSource::Fallback);

    let records = pipeline.error_log().records();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].original, "Retry");
    assert_eq!(records[0].target_language, "pt");
    assert!(records[0].error.contains("Simulated translator failure"));

    assert!(pipeline.cache().is_empty());
    assert!(stores.unchanged.snapshot().is_empty());
}

#[tokio::test]
async fn test_translate_twice_shouldReturnIdenticalResultFromCache() {
    let translator = MockTranslator::working();
    let (pipeline, _stores) = common::test_pipeline(translator.clone(), &[("Zeny", "Zenys")], &[]);

    let first = pipeline.translate_detailed("Pay 10 Zeny <b>now</b>").await;
    let second = pipeline.translate_detailed("Pay 10 Zeny <b>now</b>").await;

    assert_eq!(first.source, OutcomeSource::Translated);
    assert_eq!(second.source, OutcomeSource::Cached);
    assert_eq!(first.text, second.text);
    assert_eq!(first.text, "[pt] Pay 10 Zenys <b>now</b>");
    assert_eq!(translator.request_count(), 1);
}

#[tokio::test]
async fn test_translate_withOverlappingWords_shouldSendLongestAsOneToken() {
    let translator = MockTranslator::echo();
    let (pipeline, _stores) =
        common::test_pipeline(translator.clone(), &[("log", "registro"), ("login", "entrar")], &[]);

    let result = pipeline.translate("login failed").await;

    assert_eq!(translator.requests()[0].text, "##WD0## failed");
    assert_eq!(result, "entrar failed");
}

#[tokio::test]
async fn test_translate_withExactWordAndWhitespace_shouldApplyOverride() {
    let translator = MockTranslator::echo().with_custom_response(|_| "something else".to_string());
    let (pipeline, stores) = common::test_pipeline(translator, &[("Zeny", "Zenys")], &[]);

    let result = pipeline.translate("Zeny ").await;

    assert_eq!(result, "Zenys");
    // The cache is keyed by the raw string, whitespace included
    assert_eq!(stores.cache.snapshot().get("Zeny ").map(String::as_str), Some("Zenys"));
}

#[tokio::test]
async fn test_translate_withUnchangedResult_shouldRecordForReview() {
    let (pipeline, stores) = common::test_pipeline(MockTranslator::echo(), &[], &[]);

    pipeline.translate("OK").await;
    pipeline.translate("Hello %s").await;

    let unchanged = stores.unchanged.snapshot();
    assert!(unchanged.contains_key("OK"));
    assert!(unchanged.contains_key("Hello %s"));

    let needs_review = stores.needs_review.snapshot();
    assert!(!needs_review.contains_key("OK"));
    assert_eq!(needs_review.get("Hello %s").map(String::as_str), Some("Hello %s"));
}

#[tokio::test]
async fn test_translate_withIntermittentTranslator_shouldOnlyFailAffectedStrings() {
    let (pipeline, _stores) = common::test_pipeline(MockTranslator::intermittent(2), &[], &[]);

    let first = pipeline.translate_detailed("One").await;
    let second = pipeline.translate_detailed("Two").await;
    let third = pipeline.translate_detailed("Three").await;

    assert_eq!(first.source, OutcomeSource::Translated);
    assert_eq!(second.source, OutcomeSource::Fallback);
    assert_eq!(second.text, "Two");
    assert_eq!(third.source, OutcomeSource::Translated);
    assert_eq!(pipeline.error_log().len(), 1);
}

#[tokio::test]
async fn test_translate_withUnwritableStores_shouldStillReturnTranslation() {
    let pipeline = TranslationPipeline::new(
        Arc::new(MockTranslator::working()),
        DictionaryResolver::default(),
        TranslationCache::load(Arc::new(ReadOnlyStore)),
        ReviewSinks::load(Arc::new(ReadOnlyStore), Arc::new(ReadOnlyStore)),
        ErrorLog::in_memory(),
        "en",
        "pt",
    );

    let outcome = pipeline.translate_detailed("Hello @npc").await;

    assert_eq!(outcome.text, "[pt] Hello @npc");
    assert_eq!(outcome.source, OutcomeSource::Translated);
    assert!(pipeline.error_log().is_empty());
}

#[tokio::test]
async fn test_translate_withEscapedNewline_shouldKeepEscapeOutOfRequest() {
    let translator = MockTranslator::echo();
    let (pipeline, _stores) = common::test_pipeline(translator.clone(), &[], &[]);

    let result = pipeline.translate("First\\nSecond").await;

    assert_eq!(translator.requests()[0].text, "First##ESC0##Second");
    assert_eq!(result, "First\\nSecond");
}

#[tokio::test]
async fn test_translate_withTextBetweenTags_shouldTranslateInsteadOfFallingBack() {
    let translator = MockTranslator::working();
    let (pipeline, _stores) = common::test_pipeline(translator.clone(), &[], &[]);

    let outcome = pipeline.translate_detailed("<b>at 10</b>").await;

    assert_eq!(translator.requests()[0].text, "##XML0##at 10##XML1##");
    assert_eq!(outcome.source, OutcomeSource::Translated);
    assert_eq!(outcome.text, "[pt] <b>at 10</b>");
    assert!(pipeline.error_log().is_empty());
}

#[tokio::test]
async fn test_translate_withDictionaryWordInsideTag_shouldNotSendTag() {
    let translator = MockTranslator::echo();
    let (pipeline, _stores) = common::test_pipeline(translator.clone(), &[("Zeny", "Zenys")], &[]);

    let result = pipeline.translate("Pay <item=Zeny> now").await;

    assert_eq!(translator.requests()[0].text, "Pay ##XML0## now");
    assert_eq!(result, "Pay <item=Zenys> now");
}
