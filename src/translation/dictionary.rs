/*!
 * Manual translation overrides.
 *
 * Two dictionaries are loaded once at start and never mutated during a run:
 * - the phrase dictionary, matched case-insensitively against a whole string
 * - the word dictionary, matched case-sensitively against whole strings or word tokens
 */

use log::{debug, warn};
use std::collections::{BTreeMap, HashMap};

use crate::storage::KeyValueStore;

use super::vault::{TokenVault, map_outside_tokens};

/// Read-only resolver over the phrase and word dictionaries
#[derive(Debug, Clone, Default)]
pub struct DictionaryResolver {
    /// Word dictionary, keyed exactly as configured
    words: BTreeMap<String, String>,

    /// Lowercased phrase key -> replacement
    phrases: HashMap<String, String>,

    /// Trimmed word key -> replacement, for the exact-override rule
    trimmed_words: HashMap<String, String>,
}

impl DictionaryResolver {
    /// Build a resolver from in-memory dictionaries
    pub fn new(words: BTreeMap<String, String>, phrases: BTreeMap<String, String>) -> Self {
        let mut lowered = HashMap::with_capacity(phrases.len());
        for (key, value) in phrases {
            // First key in sorted order wins when two keys differ only by case
            lowered.entry(key.to_lowercase()).or_insert(value);
        }

        let mut trimmed_words = HashMap::with_capacity(words.len());
        for (key, value) in &words {
            trimmed_words
                .entry(key.trim().to_string())
                .or_insert_with(|| value.clone());
        }

        Self {
            words,
            phrases: lowered,
            trimmed_words,
        }
    }

    /// Load both dictionaries; an unreadable store is treated as an empty dictionary
    pub fn load(words: &dyn KeyValueStore, phrases: &dyn KeyValueStore) -> Self {
        let words_map = load_or_empty(words, "word dictionary");
        let phrases_map = load_or_empty(phrases, "phrase dictionary");
        debug!(
            "Loaded {} dictionary words and {} dictionary phrases",
            words_map.len(),
            phrases_map.len()
        );
        Self::new(words_map, phrases_map)
    }

    /// Case-insensitive whole-string phrase lookup
    pub fn phrase(&self, text: &str) -> Option<&str> {
        self.phrases.get(&text.to_lowercase()).map(String::as_str)
    }

    /// Exact override: the trimmed input equals a trimmed word key
    pub fn exact_word(&self, text: &str) -> Option<&str> {
        self.trimmed_words.get(text.trim()).map(String::as_str)
    }

    /// Word substitution used on text headed for the translator.
    ///
    /// An exact key match on the whole text returns the value outright. Otherwise the
    /// text between vault tokens is split on word boundaries and every piece found
    /// verbatim in the dictionary is replaced; the tokens themselves are left alone.
    pub fn substitute_words(&self, text: &str) -> String {
        if text.is_empty() {
            return String::new();
        }
        if let Some(value) = self.words.get(text) {
            return value.clone();
        }

        map_outside_tokens(text, |segment| {
            split_word_boundaries(segment)
                .into_iter()
                .map(|piece| self.words.get(piece).map_or(piece, String::as_str))
                .collect()
        })
    }

    /// A vault protecting every word key
    pub fn vault(&self) -> TokenVault {
        TokenVault::with_words(self.words.iter().map(|(k, v)| (k.as_str(), v.as_str())))
    }

    pub fn word_count(&self) -> usize {
        self.words.len()
    }

    pub fn phrase_count(&self) -> usize {
        self.phrases.len()
    }
}

fn load_or_empty(store: &dyn KeyValueStore, label: &str) -> BTreeMap<String, String> {
    match store.load() {
        Ok(map) => map,
        Err(e) => {
            warn!("Ignoring {} ({}): {}", label, store.describe(), e);
            BTreeMap::new()
        }
    }
}

/// Split text into alternating runs of word and non-word characters
fn split_word_boundaries(text: &str) -> Vec<&str> {
    let is_word = |c: char| c.is_alphanumeric() || c == '_';
    let mut pieces = Vec::new();
    let mut start = 0;
    let mut current: Option<bool> = None;

    for (offset, c) in text.char_indices() {
        let word = is_word(c);
        if current.is_some_and(|w| w != word) {
            pieces.push(&text[start..offset]);
            start = offset;
        }
        current = Some(word);
    }
    if start < text.len() {
        pieces.push(&text[start..]);
    }

    pieces
}
