/*!
 * Sinks for translations that a human should look at, plus the error log.
 *
 * - "unchanged": the final translation is identical to the source
 * - "needs-review": the source contains characters outside the safe set
 *   (letters, marks, digits, whitespace and common punctuation)
 *
 * Review sinks are keyed by the original string; a recurring original overwrites
 * its previous record. The error log is append-only.
 */

use chrono::{DateTime, Local};
use log::warn;
use once_cell::sync::Lazy;
use parking_lot::{Mutex, RwLock};
use regex::Regex;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::errors::StoreError;
use crate::file_utils::FileManager;
use crate::storage::KeyValueStore;

/// Anything outside letters, marks, digits, whitespace and common punctuation
static UNSAFE_CHAR_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r#"[^\p{L}\p{M}\p{N}\s.,;:!?'"()\-]"#).unwrap()
});

/// Whether a source string contains characters a reviewer should double-check
pub fn needs_review(original: &str) -> bool {
    UNSAFE_CHAR_REGEX.is_match(original)
}

/// A persisted `original -> translation` review list
pub struct ReviewSink {
    label: &'static str,
    entries: Arc<RwLock<BTreeMap<String, String>>>,
    backend: Arc<dyn KeyValueStore>,
}

impl ReviewSink {
    /// Load the sink; a malformed store starts empty
    pub fn load(label: &'static str, backend: Arc<dyn KeyValueStore>) -> Self {
        let entries = backend.load().unwrap_or_else(|e| {
            warn!("Starting with an empty {} review list ({}): {}", label, backend.describe(), e);
            BTreeMap::new()
        });

        Self {
            label,
            entries: Arc::new(RwLock::new(entries)),
            backend,
        }
    }

    /// Record a translation and persist the whole list
    pub fn record(&self, original: &str, translation: &str) -> Result<(), StoreError> {
        self.entries
            .write()
            .insert(original.to_string(), translation.to_string());
        let snapshot = self.entries.read().clone();
        self.backend.save(&snapshot)
    }

    pub fn get(&self, original: &str) -> Option<String> {
        self.entries.read().get(original).cloned()
    }

    pub fn label(&self) -> &'static str {
        self.label
    }

    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

impl Clone for ReviewSink {
    fn clone(&self) -> Self {
        Self {
            label: self.label,
            entries: self.entries.clone(),
            backend: self.backend.clone(),
        }
    }
}

/// The two review sinks written by the pipeline
#[derive(Clone)]
pub struct ReviewSinks {
    pub unchanged: ReviewSink,
    pub needs_review: ReviewSink,
}

impl ReviewSinks {
    pub fn load(unchanged: Arc<dyn KeyValueStore>, needs_review: Arc<dyn KeyValueStore>) -> Self {
        Self {
            unchanged: ReviewSink::load("unchanged", unchanged),
            needs_review: ReviewSink::load("needs-review", needs_review),
        }
    }
}

/// Diagnostic record of one failed translation
#[derive(Debug, Clone)]
pub struct FailureRecord {
    pub timestamp: DateTime<Local>,
    /// Source string as it entered the pipeline
    pub original: String,
    /// Text actually handed to the translator, after protection
    pub sent_text: String,
    pub source_language: String,
    pub target_language: String,
    /// Display form of the error
    pub error: String,
    /// Debug form of the error
    pub detail: String,
}

impl FailureRecord {
    pub fn new<E: std::fmt::Display + std::fmt::Debug>(
        original: &str,
        sent_text: &str,
        source_language: &str,
        target_language: &str,
        error: &E,
    ) -> Self {
        Self {
            timestamp: Local::now(),
            original: original.to_string(),
            sent_text: sent_text.to_string(),
            source_language: source_language.to_string(),
            target_language: target_language.to_string(),
            error: error.to_string(),
            detail: format!("{:?}", error),
        }
    }

    /// Single-line form written to the log file
    pub fn to_log_line(&self) -> String {
        format!(
            "Failed to translate {:?} ({} -> {}): {} | sent: {:?} | detail: {}",
            self.original,
            self.source_language,
            self.target_language,
            self.error,
            self.sent_text,
            self.detail
        )
    }
}

/// Append-only sink for failed translations
#[derive(Clone, Default)]
pub struct ErrorLog {
    path: Option<PathBuf>,
    records: Arc<Mutex<Vec<FailureRecord>>>,
}

impl ErrorLog {
    /// Error log appended to a file
    pub fn file<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: Some(path.as_ref().to_path_buf()),
            records: Arc::default(),
        }
    }

    /// Error log kept only in memory
    pub fn in_memory() -> Self {
        Self::default()
    }

    /// Append one record. A failing log file is reported but never fatal.
    pub fn record(&self, record: FailureRecord) {
        if let Some(path) = &self.path {
            if let Err(e) = FileManager::append_to_log_file(path, &record.to_log_line()) {
                warn!("Failed to write error log {:?}: {}", path, e);
            }
        }
        self.records.lock().push(record);
    }

    /// Records appended during this run
    pub fn records(&self) -> Vec<FailureRecord> {
        self.records.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }
}
