/*!
 * Catalog rewriting for PO/POT documents.
 *
 * Only two line shapes matter:
 * - `msgid "..."` opens an entry; following `"..."` lines continue the literal
 * - `msgstr "..."` is the translation slot of the entry it follows
 *
 * Each `msgid` is paired with the first `msgstr` after it and before the next
 * `msgid`, so repeated originals never fill each other's slots. Only blank slots
 * (`msgstr ""` with no continuation lines) are filled; everything else in the
 * document is copied through byte for byte.
 */

use indicatif::ProgressBar;
use log::{debug, trace};
use once_cell::sync::Lazy;
use regex::Regex;
use std::time::Duration;

use crate::translation::cache::truncate_text;
use crate::translation::{OutcomeSource, TranslationPipeline};

static MSGID_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^msgid\s+"(.*)"\s*$"#).unwrap());

static MSGSTR_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^msgstr\s+"(.*)"\s*$"#).unwrap());

static CONTINUATION_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r#"^\s*"(.*)"\s*$"#).unwrap());

/// Translation slot state of one entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// No `msgstr` follows the `msgid`
    Missing,
    /// The `msgstr` already carries text
    Filled,
    /// A blank `msgstr ""` on the given line
    Blank(usize),
}

/// One `msgid` and its paired slot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Zero-based line of the `msgid` keyword
    pub line: usize,
    /// Literal content, still PO-escaped, continuation lines concatenated
    pub msgid: String,
    pub slot: Slot,
}

/// Counters for one rewritten document
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RewriteReport {
    /// Entries with a non-empty original
    pub entries: usize,
    /// Fresh translations from the external service
    pub translated: usize,
    pub cached: usize,
    /// Phrase dictionary hits
    pub dictionary: usize,
    /// Bracket-exempt strings
    pub exempt: usize,
    /// Failures that fell back to the original
    pub fallback: usize,
    /// Entries whose slot already had a translation
    pub already_filled: usize,
    /// Entries without a `msgstr`
    pub unpaired: usize,
}

impl RewriteReport {
    /// Number of slots written
    pub fn filled(&self) -> usize {
        self.translated + self.cached + self.dictionary + self.exempt + self.fallback
    }

    pub fn merge(&mut self, other: &RewriteReport) {
        self.entries += other.entries;
        self.translated += other.translated;
        self.cached += other.cached;
        self.dictionary += other.dictionary;
        self.exempt += other.exempt;
        self.fallback += other.fallback;
        self.already_filled += other.already_filled;
        self.unpaired += other.unpaired;
    }
}

/// A parsed document: its raw lines plus the entries found in it
#[derive(Debug, Clone)]
pub struct Catalog<'a> {
    lines: Vec<&'a str>,
    entries: Vec<CatalogEntry>,
}

impl<'a> Catalog<'a> {
    /// Locate every `msgid` and pair it with its slot
    pub fn parse(document: &'a str) -> Self {
        let lines: Vec<&str> = document.split_inclusive('\n').collect();
        let mut entries: Vec<CatalogEntry> = Vec::new();
        // Whether the most recent entry already met its msgstr
        let mut slot_seen = true;

        let mut i = 0;
        while i < lines.len() {
            let content = line_content(lines[i]);

            if let Some(caps) = MSGID_REGEX.captures(content) {
                let mut msgid = caps[1].to_string();
                let start = i;
                i += 1;
                while let Some(more) = lines.get(i).and_then(|l| CONTINUATION_REGEX.captures(line_content(l))) {
                    msgid.push_str(&more[1]);
                    i += 1;
                }

                entries.push(CatalogEntry {
                    line: start,
                    msgid,
                    slot: Slot::Missing,
                });
                slot_seen = false;
                continue;
            }

            if let Some(caps) = MSGSTR_REGEX.captures(content) {
                if !slot_seen {
                    let continued = lines
                        .get(i + 1)
                        .is_some_and(|l| CONTINUATION_REGEX.is_match(line_content(l)));
                    if let Some(entry) = entries.last_mut() {
                        entry.slot = if caps[1].is_empty() && !continued {
                            Slot::Blank(i)
                        } else {
                            Slot::Filled
                        };
                    }
                    slot_seen = true;
                }
            }

            i += 1;
        }

        Self { lines, entries }
    }

    pub fn entries(&self) -> &[CatalogEntry] {
        &self.entries
    }

    /// Entries that carry a translatable original
    pub fn translatable(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| !e.msgid.trim().is_empty())
    }

    /// Replace the blank slot on `line` with `translation`, keeping the line ending
    fn fill(&self, output: &mut [String], line: usize, translation: &str) {
        let original = self.lines[line];
        let content = line_content(original);
        let ending = &original[content.len()..];
        output[line] = format!("msgstr \"{}\"{}", escape_po_string(translation), ending);
    }
}

/// Fills blank translation slots of a document through the pipeline
pub struct CatalogRewriter<'p> {
    pipeline: &'p TranslationPipeline,
    delay: Duration,
}

impl<'p> CatalogRewriter<'p> {
    pub fn new(pipeline: &'p TranslationPipeline, delay: Duration) -> Self {
        Self { pipeline, delay }
    }

    /// Translate every original with a blank slot and return the rewritten document.
    ///
    /// `progress` is advanced once per translatable entry.
    pub async fn rewrite(&self, document: &str, progress: &ProgressBar) -> (String, RewriteReport) {
        let catalog = Catalog::parse(document);
        let mut output: Vec<String> = catalog.lines.iter().map(|l| l.to_string()).collect();
        let mut report = RewriteReport::default();

        let translatable: Vec<&CatalogEntry> = catalog.translatable().collect();
        progress.set_length(translatable.len() as u64);

        for entry in translatable {
            report.entries += 1;
            progress.set_message(truncate_text(entry.msgid.trim(), 30));

            match entry.slot {
                Slot::Missing => {
                    debug!("No msgstr for msgid on line {}", entry.line + 1);
                    report.unpaired += 1;
                }
                Slot::Filled => {
                    trace!("Keeping existing translation on line {}", entry.line + 1);
                    report.already_filled += 1;
                }
                Slot::Blank(line) => {
                    let outcome = self.pipeline.translate_detailed(entry.msgid.trim()).await;
                    catalog.fill(&mut output, line, &outcome.text);

                    match outcome.source {
                        OutcomeSource::Exempt => report.exempt += 1,
                        OutcomeSource::Phrase => report.dictionary += 1,
                        OutcomeSource::Cached => report.cached += 1,
                        OutcomeSource::Translated => report.translated += 1,
                        OutcomeSource::Fallback => report.fallback += 1,
                    }

                    if outcome.source.reached_translator() && !self.delay.is_zero() {
                        tokio::time::sleep(self.delay).await;
                    }
                }
            }

            progress.inc(1);
        }

        (output.concat(), report)
    }
}

fn line_content(line: &str) -> &str {
    line.trim_end_matches(['\n', '\r'])
}

/// Escape text for a PO string literal.
///
/// Existing escape sequences are kept; bare quotes and raw line breaks are escaped.
pub fn escape_po_string(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    let mut chars = text.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                escaped.push('\\');
                match chars.next() {
                    Some(next) => escaped.push(next),
                    // A dangling backslash would escape the closing quote
                    None => escaped.push('\\'),
                }
            }
            '"' => escaped.push_str("\\\""),
            '\n' => escaped.push_str("\\n"),
            '\r' => escaped.push_str("\\r"),
            _ => escaped.push(c),
        }
    }

    escaped
}
