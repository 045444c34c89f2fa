//! Name normalization and variant key generation.
//!
//! Cover packs are named after the game title, which rarely matches the
//! catalog name byte for byte:
//! ```text
//! catalog:  Pokémon - Emerald Version (USA, Europe)
//! cover:    Pokemon - Emerald Version.png
//! ```
//! Both sides are reduced to a comparison key (`pokemonemeraldversion`), and
//! the catalog side additionally produces keys with trailing language and
//! region groups removed.

use std::collections::BTreeSet;
use std::path::Path;

use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

/// Language tokens recognised inside a trailing `(En,Fr,De)` group.
/// Compared after lower-casing and removing hyphens (`pt-BR` -> `ptbr`).
const LANGUAGE_TOKENS: &[&str] = &[
    "en", "fr", "de", "es", "it", "pt", "ptbr", "nl", "sv", "no", "da", "fi", "ru", "ja", "ko",
    "zh", "zhs", "zht", "pl", "cs", "hu", "el", "tr",
];

/// Region names recognised inside a trailing `(USA, Europe)` group.
const KNOWN_REGIONS: &[&str] = &[
    "USA",
    "Japan",
    "Europe",
    "World",
    "Australia",
    "Korea",
    "China",
    "Taiwan",
    "Asia",
    "UK",
];

/// Reduces titles and file names to comparison keys.
#[derive(Debug, Clone, Copy)]
pub struct Normalizer {
    /// Replace U+FFFD with `e` before folding accents.
    ///
    /// Some cover packs were extracted with a broken code page, turning
    /// `Pokémon` into `Pok�mon`. The lost letter is almost always `é`.
    pub recover_replacement_char: bool,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            recover_replacement_char: true,
        }
    }
}

impl Normalizer {
    /// Normalize a title into a key: fold accents, lower-case, keep `[a-z0-9]`.
    ///
    /// Returns an empty string when nothing usable is left.
    pub fn normalize(&self, text: &str) -> String {
        let recovered;
        let text = if self.recover_replacement_char && text.contains('\u{FFFD}') {
            recovered = text.replace('\u{FFFD}', "e");
            recovered.as_str()
        } else {
            text
        };

        text.nfd()
            .filter(|c| !is_combining_mark(*c))
            .flat_map(char::to_lowercase)
            .filter(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
            .collect()
    }

    /// Normalize a file name: directory components and the extension are
    /// dropped before normalizing the remaining stem.
    pub fn normalize_file_name(&self, file_name: &str) -> String {
        self.normalize(file_stem(file_name))
    }

    /// All keys worth indexing for a catalog title.
    ///
    /// Produces the key of the full title, of the title with trailing
    /// language groups stripped, with trailing region groups stripped, and
    /// with both stripped. Empty keys are dropped.
    pub fn generate_keys(&self, title: &str) -> BTreeSet<String> {
        let base = title.trim();
        if base.is_empty() {
            return BTreeSet::new();
        }

        let no_lang = strip_trailing_groups(base, is_language_group);
        let no_region = strip_trailing_groups(base, is_region_group);
        let no_lang_or_region = strip_qualifier_groups(no_lang);

        [base, no_lang, no_region, no_lang_or_region]
            .into_iter()
            .map(|variant| self.normalize(variant))
            .filter(|key| !key.is_empty())
            .collect()
    }
}

/// Normalize a title with the default settings.
pub fn normalize_name(text: &str) -> String {
    Normalizer::default().normalize(text)
}

/// Normalize a file name with the default settings.
pub fn normalize_file_name(file_name: &str) -> String {
    Normalizer::default().normalize_file_name(file_name)
}

/// Generate variant keys with the default settings.
pub fn generate_keys(title: &str) -> BTreeSet<String> {
    Normalizer::default().generate_keys(title)
}

/// Base name of a path-like string without its extension.
pub(crate) fn file_stem(file_name: &str) -> &str {
    Path::new(file_name)
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or(file_name)
}

/// Repeatedly remove the last parenthesized group while `predicate` accepts
/// its content. Stops at the first group that is empty or rejected, even if
/// a group further left would qualify.
pub fn strip_trailing_groups<'a>(name: &'a str, predicate: fn(&str) -> bool) -> &'a str {
    let mut current = name.trim();
    while let Some((head, group)) = split_trailing_group(current) {
        if !predicate(group) {
            break;
        }
        current = head.trim_end();
    }
    current.trim()
}

/// Strip language groups, then region groups, until neither applies.
///
/// Handles both `Game (USA) (En,Fr)` and `Game (En,Fr)(USA)` orderings.
pub fn strip_qualifier_groups(name: &str) -> &str {
    let mut current = name.trim();
    loop {
        let next = strip_trailing_groups(
            strip_trailing_groups(current, is_language_group),
            is_region_group,
        );
        if next == current {
            return current;
        }
        current = next;
    }
}

/// Split `"Title (A) (B)"` into `("Title (A) ", "B")`.
///
/// The group is the content between the final `)` and the first `(` after
/// the previous `)`, so a stray `(` inside the group belongs to the group.
fn split_trailing_group(name: &str) -> Option<(&str, &str)> {
    let body = name.trim_end().strip_suffix(')')?;
    let search_from = body.rfind(')').map_or(0, |i| i + 1);
    let open = search_from + body[search_from..].find('(')?;
    Some((&body[..open], &body[open + 1..]))
}

fn group_tokens(group: &str) -> Vec<String> {
    group
        .split(',')
        .map(|t| t.trim().to_lowercase())
        .filter(|t| !t.is_empty())
        .collect()
}

/// `En,Fr,De`, `pt-BR`, or any list of bare two-letter tokens.
pub fn is_language_group(group: &str) -> bool {
    let tokens = group_tokens(group);
    !tokens.is_empty()
        && tokens.iter().all(|t| {
            let t = t.replace('-', "");
            LANGUAGE_TOKENS.contains(&t.as_str())
                || (t.chars().count() == 2 && t.chars().all(char::is_alphabetic))
        })
}

/// `USA`, `USA, Europe`, `Japan` ...
pub fn is_region_group(group: &str) -> bool {
    let tokens = group_tokens(group);
    !tokens.is_empty()
        && tokens
            .iter()
            .all(|t| KNOWN_REGIONS.iter().any(|r| r.eq_ignore_ascii_case(t)))
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;
