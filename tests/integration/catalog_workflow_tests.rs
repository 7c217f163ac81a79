/*!
 * Integration tests for catalog rewriting through the pipeline
 */

use indicatif::ProgressBar;
use std::time::{Duration, Instant};

use pot_translate::catalog::CatalogRewriter;
use pot_translate::providers::MockTranslator;

use crate::common;

fn prefixing() -> MockTranslator {
    MockTranslator::echo().with_custom_response(|req| format!("PT:{}", req.text))
}

#[tokio::test]
async fn test_rewrite_withSampleCatalog_shouldFillBlankSlots() {
    let translator = prefixing();
    let (pipeline, _stores) = common::test_pipeline(translator.clone(), &[], &[("Cancel", "Cancelar")]);
    let rewriter = CatalogRewriter::new(&pipeline, Duration::ZERO);

    let (output, report) = rewriter
        .rewrite(common::SAMPLE_CATALOG, &ProgressBar::hidden())
        .await;

    assert!(output.contains("msgid \"Hello %s\"\nmsgstr \"PT:Hello %s\"\n"));
    assert!(output.contains("msgid \"Cancel\"\nmsgstr \"Cancelar\"\n"));
    assert!(output.contains("msgid \"[DO_NOT_TRANSLATE]\"\nmsgstr \"[DO_NOT_TRANSLATE]\"\n"));
    assert!(output.contains("msgid \"Goodbye\"\nmsgstr \"Tchau\"\n"));
    // Header untouched
    assert!(output.starts_with("msgid \"\"\nmsgstr \"\"\n\"Content-Type: text/plain; charset=UTF-8\\n\"\n"));

    assert_eq!(report.entries, 4);
    assert_eq!(report.translated, 1);
    assert_eq!(report.dictionary, 1);
    assert_eq!(report.exempt, 1);
    assert_eq!(report.already_filled, 1);
    assert_eq!(report.filled(), 3);
    assert_eq!(translator.request_count(), 1);
}

#[tokio::test]
async fn test_rewrite_withNothingToFill_shouldReturnDocumentUnchanged() {
    let (pipeline, _stores) = common::test_pipeline(prefixing(), &[], &[]);
    let rewriter = CatalogRewriter::new(&pipeline, Duration::ZERO);
    let document = "# comment\nmsgid \"Yes\"\nmsgstr \"Sim\"\n\nmsgid \"Orphan\"\n";

    let (output, report) = rewriter.rewrite(document, &ProgressBar::hidden()).await;

    assert_eq!(output, document);
    assert_eq!(report.already_filled, 1);
    assert_eq!(report.unpaired, 1);
}

#[tokio::test]
async fn test_rewrite_withDuplicateOriginals_shouldFillEachOwnSlot() {
    let translator = prefixing();
    let (pipeline, _stores) = common::test_pipeline(translator.clone(), &[], &[]);
    let rewriter = CatalogRewriter::new(&pipeline, Duration::ZERO);
    let document = "msgid \"Ok\"\nmsgstr \"Certo\"\n\nmsgid \"Ok\"\nmsgstr \"\"\n\nmsgid \"Ok\"\nmsgstr \"\"\n";

    let (output, report) = rewriter.rewrite(document, &ProgressBar::hidden()).await;

    assert_eq!(
        output,
        "msgid \"Ok\"\nmsgstr \"Certo\"\n\nmsgid \"Ok\"\nmsgstr \"PT:Ok\"\n\nmsgid \"Ok\"\nmsgstr \"PT:Ok\"\n"
    );
    assert_eq!(report.translated, 1);
    assert_eq!(report.cached, 1);
    assert_eq!(translator.request_count(), 1);
}

#[tokio::test]
async fn test_rewrite_withCrlfDocument_shouldKeepLineEndings() {
    let (pipeline, _stores) = common::test_pipeline(prefixing(), &[], &[]);
    let rewriter = CatalogRewriter::new(&pipeline, Duration::ZERO);
    let document = "msgid \"Hi\"\r\nmsgstr \"\"\r\n";

    let (output, _report) = rewriter.rewrite(document, &ProgressBar::hidden()).await;

    assert_eq!(output, "msgid \"Hi\"\r\nmsgstr \"PT:Hi\"\r\n");
}

#[tokio::test]
async fn test_rewrite_withMultilineOriginal_shouldTranslateJoinedText() {
    let translator = MockTranslator::echo();
    let (pipeline, _stores) = common::test_pipeline(translator.clone(), &[], &[]);
    let rewriter = CatalogRewriter::new(&pipeline, Duration::ZERO);
    let document = "msgid \"\"\n\"Line one\\n\"\n\"Line two\"\nmsgstr \"\"\n";

    let (output, _report) = rewriter.rewrite(document, &ProgressBar::hidden()).await;

    assert_eq!(translator.requests()[0].text, "Line one##ESC0##Line two");
    assert!(output.ends_with("msgstr \"Line one\\nLine two\"\n"));
}

#[tokio::test]
async fn test_rewrite_withQuotesInTranslation_shouldEscapeThem() {
    let translator = MockTranslator::echo().with_custom_response(|_| "Diga \"oi\"".to_string());
    let (pipeline, _stores) = common::test_pipeline(translator, &[], &[]);
    let rewriter = CatalogRewriter::new(&pipeline, Duration::ZERO);

    let (output, _report) = rewriter
        .rewrite("msgid \"Say hi\"\nmsgstr \"\"\n", &ProgressBar::hidden())
        .await;

    assert_eq!(output, "msgid \"Say hi\"\nmsgstr \"Diga \\\"oi\\\"\"\n");
}

#[tokio::test]
async fn test_rewrite_withFailingTranslator_shouldFillOriginalText() {
    let (pipeline, _stores) = common::test_pipeline(MockTranslator::failing(), &[], &[]);
    let rewriter = CatalogRewriter::new(&pipeline, Duration::ZERO);

    let (output, report) = rewriter
        .rewrite("msgid \"Retry\"\nmsgstr \"\"\n", &ProgressBar::hidden())
        .await;

    assert_eq!(output, "msgid \"Retry\"\nmsgstr \"Retry\"\n");
    assert_eq!(report.fallback, 1);
    assert_eq!(pipeline.error_log().len(), 1);
}

#[tokio::test]
async fn test_rewrite_withDelay_shouldWaitAfterTranslatedStrings() {
    let (pipeline, _stores) = common::test_pipeline(prefixing(), &[], &[("Cancel", "Cancelar")]);
    let rewriter = CatalogRewriter::new(&pipeline, Duration::from_millis(30));

    let start = Instant::now();
    let (_output, report) = rewriter
        .rewrite(common::SAMPLE_CATALOG, &ProgressBar::hidden())
        .await;

    assert_eq!(report.translated, 1);
    assert!(start.elapsed() >= Duration::from_millis(30));
}
