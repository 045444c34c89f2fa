use std::collections::BTreeMap;
use std::collections::btree_map::Entry;

use crate::dat::{DatFile, DatGame};
use crate::normalize::{Normalizer, file_stem};

/// One catalog record reduced to what cover matching needs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    /// Primary display name (`game@name`)
    pub name: String,
    /// `<description>` text, if any
    pub description: Option<String>,
    /// ROM file name (`rom@name`), if any
    pub alternate_name: Option<String>,
    /// Upper-cased serial the cover gets renamed to
    pub identifier: String,
}

impl CatalogEntry {
    /// Build an entry from a DAT game. Returns `None` when the game has no
    /// name or no ROM carries a serial.
    pub fn from_game(game: &DatGame) -> Option<Self> {
        if game.name.trim().is_empty() {
            return None;
        }
        let rom = game.serial_rom()?;
        let identifier = rom.serial.as_deref()?.trim().to_uppercase();

        Some(Self {
            name: game.name.clone(),
            description: game.description.clone().filter(|d| !d.trim().is_empty()),
            alternate_name: Some(rom.name.clone()).filter(|n| !n.trim().is_empty()),
            identifier,
        })
    }

    /// Name sources in lookup priority: name, description, ROM file stem.
    fn name_sources(&self) -> impl Iterator<Item = &str> {
        [
            Some(self.name.as_str()),
            self.description.as_deref(),
            self.alternate_name.as_deref().map(file_stem),
        ]
        .into_iter()
        .flatten()
    }
}

/// Frozen mapping from normalized name key to identifier.
///
/// The first entry to produce a key owns it: entries are applied in catalog
/// order and, within an entry, in name-source priority order.
#[derive(Debug, Default)]
pub struct CoverIndex {
    by_key: BTreeMap<String, String>,
    entries: usize,
    skipped: usize,
}

impl CoverIndex {
    /// Build an index from a parsed DAT file.
    pub fn from_dat(dat: &DatFile, normalizer: &Normalizer) -> Self {
        let mut skipped = 0usize;
        let entries = dat.games.iter().filter_map(|game| {
            let entry = CatalogEntry::from_game(game);
            if entry.is_none() {
                log::debug!("Skipping catalog game without name or serial: {:?}", game.name);
                skipped += 1;
            }
            entry
        });
        let mut index = Self::from_entries(entries, normalizer);
        index.skipped = skipped;
        index
    }

    /// Build an index from catalog entries in order.
    pub fn from_entries<I>(entries: I, normalizer: &Normalizer) -> Self
    where
        I: IntoIterator<Item = CatalogEntry>,
    {
        let mut index = Self::default();
        for entry in entries {
            for source in entry.name_sources() {
                for key in normalizer.generate_keys(source) {
                    index.insert_if_absent(key, &entry.identifier);
                }
            }
            index.entries += 1;
        }
        index
    }

    /// Insert `key -> identifier` unless the key is already taken.
    /// Returns `true` when the key was inserted.
    fn insert_if_absent(&mut self, key: String, identifier: &str) -> bool {
        match self.by_key.entry(key) {
            Entry::Vacant(slot) => {
                slot.insert(identifier.to_string());
                true
            }
            Entry::Occupied(existing) => {
                if existing.get() != identifier {
                    log::debug!(
                        "Key {:?} already maps to {}, ignoring {}",
                        existing.key(),
                        existing.get(),
                        identifier
                    );
                }
                false
            }
        }
    }

    /// Look up the identifier for a normalized key. Empty keys never match.
    pub fn lookup(&self, key: &str) -> Option<&str> {
        if key.is_empty() {
            return None;
        }
        self.by_key.get(key).map(String::as_str)
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.by_key.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_key.is_empty()
    }

    /// Number of catalog entries that contributed keys.
    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Number of catalog games skipped for lacking a name or serial.
    pub fn skipped(&self) -> usize {
        self.skipped
    }
}

#[cfg(test)]
#[path = "tests/index_tests.rs"]
mod tests;
