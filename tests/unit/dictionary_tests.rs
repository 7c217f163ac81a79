/*!
 * Tests for the phrase and word dictionaries
 */

use anyhow::Result;

use pot_translate::storage::{JsonFileStore, MemoryStore};
use pot_translate::translation::{DictionaryResolver, ProtectionKind};

use crate::common;

#[test]
fn test_load_withJsonStores_shouldReadBothDictionaries() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let words = common::create_test_file(temp_dir.path(), "words.json", r#"{"Zeny": "Zenys", "HP": "PV"}"#)?;
    let phrases = common::create_test_file(temp_dir.path(), "phrases.json", r#"{"Cancel": "Cancelar"}"#)?;

    let resolver = DictionaryResolver::load(&JsonFileStore::new(&words), &JsonFileStore::new(&phrases));

    assert_eq!(resolver.word_count(), 2);
    assert_eq!(resolver.phrase_count(), 1);
    assert_eq!(resolver.phrase("CANCEL"), Some("Cancelar"));
    Ok(())
}

#[test]
fn test_load_withMalformedStore_shouldTreatAsEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let words = common::create_test_file(temp_dir.path(), "words.json", "[1, 2, 3]")?;
    let phrases = common::create_test_file(temp_dir.path(), "phrases.json", r#"{"Ok": "Certo"}"#)?;

    let resolver = DictionaryResolver::load(&JsonFileStore::new(&words), &JsonFileStore::new(&phrases));

    assert_eq!(resolver.word_count(), 0);
    assert_eq!(resolver.phrase("ok"), Some("Certo"));
    Ok(())
}

#[test]
fn test_load_withMissingStores_shouldBeEmpty() -> Result<()> {
    let temp_dir = common::create_temp_dir()?;
    let resolver = DictionaryResolver::load(
        &JsonFileStore::new(temp_dir.path().join("none.json")),
        &JsonFileStore::new(temp_dir.path().join("none2.json")),
    );

    assert_eq!(resolver.word_count(), 0);
    assert_eq!(resolver.phrase_count(), 0);
    Ok(())
}

#[test]
fn test_phrase_withCaseCollision_shouldKeepFirstSortedKey() {
    let phrases = MemoryStore::with_entries([("Cancel", "Cancelar"), ("CANCEL", "CANCELAR")]);
    let resolver = DictionaryResolver::load(&MemoryStore::new(), &phrases);

    // "CANCEL" sorts before "Cancel"
    assert_eq!(resolver.phrase("cancel"), Some("CANCELAR"));
    assert_eq!(resolver.phrase_count(), 1);
}

#[test]
fn test_vault_shouldProtectDictionaryWords() {
    let resolver = DictionaryResolver::new(
        common::map(&[("Poring", "Poring"), ("Prontera", "Prontera")]),
        common::map(&[]),
    );

    let protected = resolver.vault().protect("A Poring appeared in Prontera");

    // Longer keys are protected first
    assert_eq!(protected.text(), "A ##WD1## appeared in ##WD0##");
    assert_eq!(protected.count(ProtectionKind::WordDict), 2);
}

#[test]
fn test_substituteWords_withPunctuation_shouldKeepSeparators() {
    let resolver = DictionaryResolver::new(common::map(&[("HP", "PV"), ("SP", "PM")]), common::map(&[]));

    assert_eq!(resolver.substitute_words("HP/SP: full!"), "PV/PM: full!");
    assert_eq!(resolver.substitute_words(""), "");
}
