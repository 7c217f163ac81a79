use anyhow::{Result, anyhow};
use isolang::Language;

/// Language utilities for ISO language code handling
///
/// Codes are ISO 639-1 (2-letter) or ISO 639-2 (3-letter), optionally followed by
/// a region or script subtag as accepted by the translation endpoint (`pt-BR`, `zh-TW`).
/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// ISO 639-2/B codes that differ from their 639-2/T form
const BIBLIOGRAPHIC_CODES: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

fn bibliographic_to_terminology(code: &str) -> Option<&'static str> {
    BIBLIOGRAPHIC_CODES
        .iter()
        .find(|(b, _)| *b == code)
        .map(|(_, t)| *t)
}

/// Split `pt-BR` / `pt_BR` into its language and subtag parts
pub fn split_region(code: &str) -> (&str, Option<&str>) {
    match code.trim().split_once(['-', '_']) {
        Some((language, region)) => (language, Some(region)),
        None => (code.trim(), None),
    }
}

fn is_valid_subtag(subtag: &str) -> bool {
    let len = subtag.len();
    (len == 2 && subtag.chars().all(|c| c.is_ascii_alphabetic()))
        || (len == 3 && subtag.chars().all(|c| c.is_ascii_digit()))
        || (len == 4 && subtag.chars().all(|c| c.is_ascii_alphabetic()))
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code with an optional subtag
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let (language, subtag) = split_region(code);
    if let Some(subtag) = subtag {
        if !is_valid_subtag(subtag) {
            return Err(anyhow!("Invalid region in language code: {}", code));
        }
    }

    let normalized_code = language.to_lowercase();

    // Check for ISO 639-1 (2-letter) code
    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part1);
        }
    }
    // Check for ISO 639-2 (3-letter) code
    else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2T);
        }
        if bibliographic_to_terminology(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2B);
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format, dropping any subtag
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let (language, _) = split_region(code);
    let normalized_code = language.to_lowercase();

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }
        if let Some(part2t) = bibliographic_to_terminology(&normalized_code) {
            return Ok(part2t.to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Normalize a code to the form sent to the translator: ISO 639-1 where one exists,
/// ISO 639-2/T otherwise, with the subtag kept in canonical case (`pt-BR`, `zh-Hant`)
pub fn normalize_for_translator(code: &str) -> Result<String> {
    validate_language_code(code)?;
    let (_, subtag) = split_region(code);
    let part2t = normalize_to_part2t(code)?;

    let language = Language::from_639_3(&part2t)
        .and_then(|lang| lang.to_639_1())
        .map(str::to_string)
        .unwrap_or(part2t);

    Ok(match subtag {
        Some(subtag) if subtag.len() == 4 => {
            let mut chars = subtag.chars();
            let first = chars.next().map(|c| c.to_ascii_uppercase()).unwrap_or_default();
            format!("{}-{}{}", language, first, chars.as_str().to_lowercase())
        }
        Some(subtag) => format!("{}-{}", language, subtag.to_uppercase()),
        None => language,
    })
}

/// Check if two language codes match (represent the same language and subtag)
pub fn language_codes_match(code1: &str, code2: &str) -> bool {
    match (normalize_for_translator(code1), normalize_for_translator(code2)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}
