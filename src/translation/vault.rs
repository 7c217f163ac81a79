/*!
 * Reversible protection of substrings the external translator must not alter.
 *
 * Protection runs as an ordered list of layers. Each layer replaces every match
 * of its category with a numbered token `##<TAG><n>##` and records the value the
 * token stands for. A layer may swallow tokens of earlier layers, as in a tag
 * `<item=##WD0##>`, so its recorded value can itself contain tokens.
 *
 * Restoration scans the translated text once from left to right, so every `##`
 * belongs to exactly one token. Each token is replaced by its recorded value, and
 * tokens inside that value are expanded in turn, innermost layer first.
 *
 * Layer order (outermost first):
 * - `Literal`: text that already looks like a token, so the document can never collide with one
 * - `WordDict`: whole-word word-dictionary keys, recorded with their target-language value
 * - `XmlTag`: inline markup such as `<br>` or `<color=#FF0000>`
 * - `AtCommand`: `@command` tokens
 * - `Placeholder`: printf-style format specifiers
 * - `Escape`: carriage returns and backslash escape sequences
 */

use once_cell::sync::Lazy;
use regex::{Captures, Regex};
use std::fmt;

use crate::errors::TokenError;

/// Any token-shaped substring, tolerant of whitespace and case the way a translator may mangle it
static TOKEN_LIKE_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)##\s*(LIT|WD|XML|AT|PH|ESC)\s*(\d+)\s*##").unwrap()
});

/// A token exactly as this module generates it
static GENERATED_TOKEN_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"##(LIT|WD|XML|AT|PH|ESC)(\d+)##").unwrap()
});

static XML_TAG_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").unwrap());

static AT_COMMAND_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"@[a-zA-Z0-9_]+").unwrap());

static PLACEHOLDER_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)%(?:\d+\$)?-?\d*(?:\.\d+)?[sdifux%]").unwrap()
});

static ESCAPE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\r|\\[nrt"\\]"#).unwrap());

/// Category of a protected substring
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtectionKind {
    Literal,
    WordDict,
    XmlTag,
    AtCommand,
    Placeholder,
    Escape,
}

impl ProtectionKind {
    /// Protection order; restoration uses the reverse
    pub const ORDER: [ProtectionKind; 6] = [
        ProtectionKind::Literal,
        ProtectionKind::WordDict,
        ProtectionKind::XmlTag,
        ProtectionKind::AtCommand,
        ProtectionKind::Placeholder,
        ProtectionKind::Escape,
    ];

    /// Tag name embedded in the token
    pub fn tag(self) -> &'static str {
        match self {
            Self::Literal => "LIT",
            Self::WordDict => "WD",
            Self::XmlTag => "XML",
            Self::AtCommand => "AT",
            Self::Placeholder => "PH",
            Self::Escape => "ESC",
        }
    }

    /// Kind for a tag name, ignoring case
    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ORDER
            .into_iter()
            .find(|kind| kind.tag().eq_ignore_ascii_case(tag))
    }

    /// Build the token for the given index
    pub fn token(self, index: usize) -> String {
        format!("##{}{}##", self.tag(), index)
    }

    /// Whether recorded values are cut from the text and may enclose earlier tokens.
    ///
    /// `Literal` values are token-shaped text and `WordDict` values come from the
    /// dictionary; both are substituted verbatim.
    fn encloses_tokens(self) -> bool {
        !matches!(self, Self::Literal | Self::WordDict)
    }
}

impl fmt::Display for ProtectionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag())
    }
}

/// One protected substring
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectionToken {
    pub kind: ProtectionKind,
    pub index: usize,
    /// Value substituted back on restore. For `WordDict` this is the dictionary's target value.
    pub original_value: String,
}

impl ProtectionToken {
    pub fn token(&self) -> String {
        self.kind.token(self.index)
    }
}

/// Values recorded by one protection layer
#[derive(Debug, Clone, PartialEq, Eq)]
struct ProtectionLayer {
    kind: ProtectionKind,
    values: Vec<String>,
}

/// Result of one protection pass: the shielded text plus the stack of layers needed to undo it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedText {
    text: String,
    layers: Vec<ProtectionLayer>,
}

impl ProtectedText {
    /// The text with every protected substring replaced by a token
    pub fn text(&self) -> &str {
        &self.text
    }

    /// All tokens created by this pass, in protection order
    pub fn tokens(&self) -> Vec<ProtectionToken> {
        self.layers
            .iter()
            .flat_map(|layer| {
                layer.values.iter().enumerate().map(|(index, value)| ProtectionToken {
                    kind: layer.kind,
                    index,
                    original_value: value.clone(),
                })
            })
            .collect()
    }

    /// Number of tokens created for one kind
    pub fn count(&self, kind: ProtectionKind) -> usize {
        self.values(kind).len()
    }

    fn values(&self, kind: ProtectionKind) -> &[String] {
        self.layers
            .iter()
            .find(|layer| layer.kind == kind)
            .map(|layer| layer.values.as_slice())
            .unwrap_or_default()
    }

    /// Whether the pass protected anything at all
    pub fn is_empty(&self) -> bool {
        self.layers.iter().all(|layer| layer.values.is_empty())
    }
}

/// A word-dictionary key compiled for whole-word, case-sensitive matching
#[derive(Debug, Clone)]
struct WordRule {
    pattern: Regex,
    value: String,
}

/// Protects and restores substrings around an external translation call.
///
/// The vault itself is immutable and can be shared across strings; every call to
/// [`TokenVault::protect`] starts a fresh token numbering.
#[derive(Debug, Clone, Default)]
pub struct TokenVault {
    word_rules: Vec<WordRule>,
}

impl TokenVault {
    /// Create a vault without word-dictionary protection
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a vault protecting the given word-dictionary keys, longest key first
    pub fn with_words<'a, I>(words: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut entries: Vec<(&str, &str)> = words
            .into_iter()
            .filter(|(key, _)| !key.is_empty())
            .collect();
        entries.sort_by(|a, b| {
            b.0.chars()
                .count()
                .cmp(&a.0.chars().count())
                .then_with(|| a.0.cmp(b.0))
        });

        let word_rules = entries
            .into_iter()
            .filter_map(|(key, value)| {
                Regex::new(&whole_word_pattern(key))
                    .ok()
                    .map(|pattern| WordRule {
                        pattern,
                        value: value.to_string(),
                    })
            })
            .collect();

        Self { word_rules }
    }

    /// Shield every protectable substring of `text`
    pub fn protect(&self, text: &str) -> ProtectedText {
        let mut current = text.to_string();
        let mut layers = Vec::with_capacity(ProtectionKind::ORDER.len());

        for kind in ProtectionKind::ORDER {
            let mut values = Vec::new();
            current = match kind {
                ProtectionKind::Literal => {
                    replace_matches(&current, &TOKEN_LIKE_REGEX, kind, &mut values, |m| {
                        m.to_string()
                    })
                }
                ProtectionKind::WordDict => {
                    let mut text = current;
                    for rule in &self.word_rules {
                        text = map_outside_tokens(&text, |segment| {
                            replace_matches(segment, &rule.pattern, kind, &mut values, |_| {
                                rule.value.clone()
                            })
                        });
                    }
                    text
                }
                // Tokens never contain `<` or `>`, so a tag may enclose them but never cut one
                ProtectionKind::XmlTag => {
                    replace_matches(&current, &XML_TAG_REGEX, kind, &mut values, |m| m.to_string())
                }
                ProtectionKind::AtCommand => map_outside_tokens(&current, |segment| {
                    replace_matches(segment, &AT_COMMAND_REGEX, kind, &mut values, |m| {
                        m.to_string()
                    })
                }),
                ProtectionKind::Placeholder => map_outside_tokens(&current, |segment| {
                    replace_matches(segment, &PLACEHOLDER_REGEX, kind, &mut values, |m| {
                        m.to_string()
                    })
                }),
                ProtectionKind::Escape => map_outside_tokens(&current, |segment| {
                    replace_matches(segment, &ESCAPE_REGEX, kind, &mut values, |m| m.to_string())
                }),
            };
            layers.push(ProtectionLayer { kind, values });
        }

        ProtectedText {
            text: current,
            layers,
        }
    }

    /// Substitute recorded values back into `translated`.
    ///
    /// Only whole tokens found in one left-to-right scan are replaced; text between two
    /// tokens is never read as a token. A token whose index was never recorded fails
    /// the whole string.
    pub fn restore(&self, protected: &ProtectedText, translated: &str) -> Result<String, TokenError> {
        expand_tokens(translated, &TOKEN_LIKE_REGEX, protected)
    }
}

/// Apply `f` to the parts of `text` that are not tokens generated by a vault
pub fn map_outside_tokens<F>(text: &str, mut f: F) -> String
where
    F: FnMut(&str) -> String,
{
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for token in GENERATED_TOKEN_REGEX.find_iter(text) {
        result.push_str(&f(&text[last..token.start()]));
        result.push_str(token.as_str());
        last = token.end();
    }
    result.push_str(&f(&text[last..]));

    result
}

fn whole_word_pattern(key: &str) -> String {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut pattern = String::new();

    if key.chars().next().is_some_and(is_word) {
        pattern.push_str(r"\b");
    }
    pattern.push_str(&regex::escape(key));
    if key.chars().last().is_some_and(is_word) {
        pattern.push_str(r"\b");
    }

    pattern
}

fn replace_matches<F>(
    text: &str,
    pattern: &Regex,
    kind: ProtectionKind,
    values: &mut Vec<String>,
    value_for: F,
) -> String
where
    F: Fn(&str) -> String,
{
    pattern
        .replace_all(text, |caps: &Captures| {
            let token = kind.token(values.len());
            values.push(value_for(&caps[0]));
            token
        })
        .into_owned()
}

fn expand_tokens(text: &str, pattern: &Regex, protected: &ProtectedText) -> Result<String, TokenError> {
    let mut result = String::with_capacity(text.len());
    let mut last = 0;

    for caps in pattern.captures_iter(text) {
        let (Some(whole), Some(tag), Some(raw)) = (caps.get(0), caps.get(1), caps.get(2)) else {
            continue;
        };
        let Some(kind) = ProtectionKind::from_tag(tag.as_str()) else {
            continue;
        };

        let index: usize = raw.as_str().parse().map_err(|_| TokenError::MalformedIndex {
            kind,
            raw: raw.as_str().to_string(),
        })?;
        let values = protected.values(kind);
        let value = values.get(index).ok_or(TokenError::IndexOutOfRange {
            kind,
            index,
            len: values.len(),
        })?;

        result.push_str(&text[last..whole.start()]);
        if kind.encloses_tokens() {
            // Recorded values hold tokens exactly as generated, all from earlier layers
            result.push_str(&expand_tokens(value, &GENERATED_TOKEN_REGEX, protected)?);
        } else {
            result.push_str(value);
        }
        last = whole.end();
    }
    result.push_str(&text[last..]);

    Ok(result)
}
