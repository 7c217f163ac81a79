/*!
 * Per-string translation pipeline.
 *
 * Every source string passes through a fixed sequence of gates:
 *
 * 1. bracket exemption (`[DO_NOT_TRANSLATE]` is returned as-is)
 * 2. phrase dictionary
 * 3. translation cache
 * 4. protect, substitute dictionary words, call the translator
 * 5. restore, apply the exact word override, cache and flag for review
 *
 * A failed external call or a corrupted token never aborts the run: the failure is
 * logged and the original string is returned.
 */

use log::{debug, error, warn};
use std::sync::Arc;

use crate::errors::TranslationError;
use crate::providers::{TranslateRequest, Translator};

use super::cache::{TranslationCache, truncate_text};
use super::dictionary::DictionaryResolver;
use super::review::{ErrorLog, FailureRecord, ReviewSinks, needs_review};
use super::vault::{ProtectedText, TokenVault};

/// Which gate produced a result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutcomeSource {
    /// Bracket-enclosed input, returned unchanged
    Exempt,
    /// Phrase dictionary hit
    Phrase,
    /// Translation cache hit
    Cached,
    /// Fresh translation from the external service
    Translated,
    /// The translation failed and the original was returned
    Fallback,
}

impl OutcomeSource {
    /// Whether the external translator was called for this string
    pub fn reached_translator(self) -> bool {
        matches!(self, OutcomeSource::Translated | OutcomeSource::Fallback)
    }
}

/// Result of translating one string
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub text: String,
    pub source: OutcomeSource,
}

impl TranslationOutcome {
    fn new(text: impl Into<String>, source: OutcomeSource) -> Self {
        Self {
            text: text.into(),
            source,
        }
    }
}

/// Orchestrates dictionaries, cache, vault and translator for single strings
pub struct TranslationPipeline {
    translator: Arc<dyn Translator>,
    dictionary: DictionaryResolver,
    vault: TokenVault,
    cache: TranslationCache,
    reviews: ReviewSinks,
    error_log: ErrorLog,
    source_language: String,
    target_language: String,
}

impl TranslationPipeline {
    pub fn new(
        translator: Arc<dyn Translator>,
        dictionary: DictionaryResolver,
        cache: TranslationCache,
        reviews: ReviewSinks,
        error_log: ErrorLog,
        source_language: impl Into<String>,
        target_language: impl Into<String>,
    ) -> Self {
        let vault = dictionary.vault();
        Self {
            translator,
            dictionary,
            vault,
            cache,
            reviews,
            error_log,
            source_language: source_language.into(),
            target_language: target_language.into(),
        }
    }

    /// Translate one string, returning only the text
    pub async fn translate(&self, text: &str) -> String {
        self.translate_detailed(text).await.text
    }

    /// Translate one string and report which gate produced the result
    pub async fn translate_detailed(&self, text: &str) -> TranslationOutcome {
        if is_bracket_enclosed(text) {
            debug!("Exempt from translation: '{}'", truncate_text(text, 40));
            return TranslationOutcome::new(text, OutcomeSource::Exempt);
        }

        if let Some(phrase) = self.dictionary.phrase(text) {
            debug!("Phrase dictionary hit for '{}'", truncate_text(text, 40));
            return TranslationOutcome::new(phrase, OutcomeSource::Phrase);
        }

        if let Some(cached) = self.cache.get(text) {
            return TranslationOutcome::new(cached, OutcomeSource::Cached);
        }

        let protected = self.vault.protect(text);
        let outgoing = self.dictionary.substitute_words(protected.text());

        match self.call_and_restore(text, &protected, &outgoing).await {
            Ok(translated) => {
                debug!(
                    "Translated '{}' -> '{}'",
                    truncate_text(text, 40),
                    truncate_text(&translated, 40)
                );
                self.record_success(text, &translated);
                TranslationOutcome::new(translated, OutcomeSource::Translated)
            }
            Err(e) => {
                error!("Failed to translate '{}': {}", truncate_text(text, 60), e);
                self.error_log.record(FailureRecord::new(
                    text,
                    &outgoing,
                    &self.source_language,
                    &self.target_language,
                    &e,
                ));
                TranslationOutcome::new(text, OutcomeSource::Fallback)
            }
        }
    }

    async fn call_and_restore(
        &self,
        original: &str,
        protected: &ProtectedText,
        outgoing: &str,
    ) -> Result<String, TranslationError> {
        let request = TranslateRequest::new(outgoing, &self.source_language, &self.target_language);
        let translated = self.translator.translate(&request).await?;
        let restored = self.vault.restore(protected, &translated)?;

        Ok(match self.dictionary.exact_word(original) {
            Some(value) => value.to_string(),
            None => restored,
        })
    }

    /// Persist a fresh translation. Store failures are reported and otherwise ignored.
    fn record_success(&self, original: &str, translated: &str) {
        if let Err(e) = self.cache.store(original, translated) {
            warn!("Failed to persist translation cache: {}", e);
        }

        if translated == original {
            if let Err(e) = self.reviews.unchanged.record(original, translated) {
                warn!("Failed to persist {} review list: {}", self.reviews.unchanged.label(), e);
            }
        }

        if needs_review(original) {
            if let Err(e) = self.reviews.needs_review.record(original, translated) {
                warn!("Failed to persist {} review list: {}", self.reviews.needs_review.label(), e);
            }
        }
    }

    pub fn cache(&self) -> &TranslationCache {
        &self.cache
    }

    pub fn reviews(&self) -> &ReviewSinks {
        &self.reviews
    }

    pub fn error_log(&self) -> &ErrorLog {
        &self.error_log
    }
}

/// Whether the trimmed text is one bracket pair whose opening `[` closes at the very end.
///
/// `[a] and [b]` is not exempt: its first bracket closes early.
pub fn is_bracket_enclosed(text: &str) -> bool {
    let trimmed = text.trim();
    if !trimmed.starts_with('[') || !trimmed.ends_with(']') {
        return false;
    }

    let mut depth = 0usize;
    for (offset, c) in trimmed.char_indices() {
        match c {
            '[' => depth += 1,
            ']' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return offset + c.len_utf8() == trimmed.len();
                }
            }
            _ => {}
        }
    }

    false
}
