/*!
 * Tests for the error taxonomy
 */

use pot_translate::errors::{ProviderError, TokenError, TranslationError};
use pot_translate::translation::ProtectionKind;

#[test]
fn test_isRetryable_shouldOnlyAcceptTransientFailures() {
    assert!(ProviderError::ConnectionError("reset".into()).is_retryable());
    assert!(ProviderError::Timeout("30s".into()).is_retryable());
    assert!(ProviderError::RateLimitExceeded("slow down".into()).is_retryable());
    assert!(ProviderError::ApiError { status_code: 503, message: String::new() }.is_retryable());

    assert!(!ProviderError::ApiError { status_code: 400, message: String::new() }.is_retryable());
    assert!(!ProviderError::ParseError("bad json".into()).is_retryable());
    assert!(!ProviderError::RequestFailed("bad url".into()).is_retryable());
}

#[test]
fn test_tokenError_display_shouldNameKindAndIndex() {
    let error = TokenError::IndexOutOfRange {
        kind: ProtectionKind::Placeholder,
        index: 4,
        len: 1,
    };

    assert_eq!(error.to_string(), "PH token index 4 is out of range (1 recorded)");
}

#[test]
fn test_translationError_from_shouldWrapSources() {
    let provider: TranslationError = ProviderError::Timeout("30s".into()).into();
    assert!(matches!(provider, TranslationError::Provider(ProviderError::Timeout(_))));

    let token: TranslationError = TokenError::MalformedIndex {
        kind: ProtectionKind::XmlTag,
        raw: "x".into(),
    }
    .into();
    assert!(token.to_string().starts_with("Token restore error"));
}
