/*!
 * Key-value persistence for dictionaries, the translation cache and review sinks.
 *
 * Every store holds a flat `string -> string` map. Writers always rewrite the full
 * map, so a store reflects the last successful `save` in its entirety. The design
 * assumes one active process per store.
 *
 * - `json_store`: pretty-printed JSON object on disk
 * - `memory`: shared in-memory map for tests and dry runs
 */

use std::collections::BTreeMap;

use crate::errors::StoreError;

pub mod json_store;
pub mod memory;

// Re-export main types
pub use json_store::JsonFileStore;
pub use memory::MemoryStore;

/// A persisted `string -> string` map
pub trait KeyValueStore: Send + Sync {
    /// Read the whole map. A store that does not exist yet is empty.
    fn load(&self) -> Result<BTreeMap<String, String>, StoreError>;

    /// Replace the whole map
    fn save(&self, entries: &BTreeMap<String, String>) -> Result<(), StoreError>;

    /// Human-readable location used in log messages
    fn describe(&self) -> String;
}
