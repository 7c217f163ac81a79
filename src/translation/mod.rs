/*!
 * Protect/translate/restore machinery for single strings.
 *
 * It is split into several submodules:
 *
 * - `vault`: Reversible token protection of substrings the translator must not touch
 * - `dictionary`: Manual phrase and word overrides
 * - `cache`: Memoized translations backed by a key-value store
 * - `review`: Review sinks and the error log
 * - `pipeline`: The per-string orchestration of all of the above
 */

// Re-export main types for easier usage
pub use self::cache::TranslationCache;
pub use self::dictionary::DictionaryResolver;
pub use self::pipeline::{OutcomeSource, TranslationOutcome, TranslationPipeline};
pub use self::review::{ErrorLog, FailureRecord, ReviewSink, ReviewSinks};
pub use self::vault::{ProtectedText, ProtectionKind, ProtectionToken, TokenVault};

// Submodules
pub mod cache;
pub mod dictionary;
pub mod pipeline;
pub mod review;
pub mod vault;
