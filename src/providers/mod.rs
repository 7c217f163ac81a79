/*!
 * The external translation capability.
 *
 * The pipeline only depends on the [`Translator`] trait:
 * - `google`: HTTP client for the public Google Translate endpoint
 * - `mock`: scripted translator for tests and offline runs
 */

use async_trait::async_trait;
use std::fmt::Debug;

use crate::errors::ProviderError;

/// One translation request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslateRequest {
    /// Text to translate, already shielded by the vault
    pub text: String,
    /// Source language code
    pub from: String,
    /// Target language code
    pub to: String,
}

impl TranslateRequest {
    pub fn new(text: impl Into<String>, from: impl Into<String>, to: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            from: from.into(),
            to: to.into(),
        }
    }
}

/// Common trait for all translation backends
///
/// Implementations own their transport (timeouts, proxy, retries); a returned
/// error means the request is given up on.
#[async_trait]
pub trait Translator: Send + Sync + Debug {
    /// Translate a single text
    ///
    /// # Arguments
    /// * `request` - The text and language pair
    ///
    /// # Returns
    /// * `Result<String, ProviderError>` - The translated text or the final error
    async fn translate(&self, request: &TranslateRequest) -> Result<String, ProviderError>;

    /// Short backend name used in logs
    fn name(&self) -> &str;
}

pub mod google;
pub mod mock;

pub use google::GoogleTranslate;
pub use mock::{MockBehavior, MockTranslator};
