use super::*;
use crate::dat::{DatFile, DatGame, DatRom};
use crate::normalize::normalize_file_name;

fn game(name: &str, description: Option<&str>, rom_name: &str, serial: Option<&str>) -> DatGame {
    DatGame {
        name: name.into(),
        description: description.map(Into::into),
        region: None,
        roms: vec![DatRom {
            name: rom_name.into(),
            serial: serial.map(Into::into),
        }],
    }
}

fn make_test_dat() -> DatFile {
    DatFile {
        name: "Test".into(),
        description: "Test".into(),
        version: "1".into(),
        games: vec![
            game(
                "Super Game (USA)",
                Some("Super Game (USA)"),
                "Super Game (USA).gba",
                Some("abcd"),
            ),
            game(
                "Pokemon - Ruby Version (USA, Europe) (Rev 1)",
                None,
                "Pokemon - Ruby Version (USA, Europe) (Rev 1).gba",
                Some("AXVE"),
            ),
            game("Unserialed Demo (World)", None, "Unserialed Demo (World).gba", None),
            game(
                "Kuru Kuru Kururin (Europe)",
                Some("Kururin"),
                "Kuru Kuru Kururin (Europe).gba",
                Some("AKKP"),
            ),
        ],
    }
}

fn index() -> CoverIndex {
    CoverIndex::from_dat(&make_test_dat(), &Normalizer::default())
}

#[test]
fn test_cover_key_matches_no_region_variant() {
    let index = index();
    let key = normalize_file_name("Super Game.jpg");
    assert_eq!(index.lookup(&key), Some("ABCD"));
}

#[test]
fn test_full_name_key_also_matches() {
    let index = index();
    assert_eq!(index.lookup(&normalize_file_name("Super Game (USA).png")), Some("ABCD"));
}

#[test]
fn test_revision_blocks_region_stripping() {
    let index = index();
    // "(Rev 1)" is last, so the region group before it stays in every variant
    assert_eq!(index.lookup(&normalize_file_name("Pokemon - Ruby Version.png")), None);
    assert_eq!(
        index.lookup(&normalize_file_name(
            "Pokemon - Ruby Version (USA, Europe) (Rev 1).png"
        )),
        Some("AXVE")
    );
}

#[test]
fn test_description_is_a_name_source() {
    let index = index();
    assert_eq!(index.lookup(&normalize_file_name("Kururin.bmp")), Some("AKKP"));
}

#[test]
fn test_rom_name_is_a_name_source_without_extension() {
    let dat = DatFile {
        games: vec![game("Title A", None, "Alternate Title (Japan).gba", Some("ALTJ"))],
        ..Default::default()
    };
    let index = CoverIndex::from_dat(&dat, &Normalizer::default());
    assert_eq!(index.lookup("alternatetitle"), Some("ALTJ"));
    assert_eq!(index.lookup("alternatetitlejapan"), Some("ALTJ"));
    assert_eq!(index.lookup("alternatetitlejapangba"), None);
}

#[test]
fn test_games_without_serial_are_skipped() {
    let index = index();
    assert_eq!(index.lookup("unserialeddemo"), None);
    assert_eq!(index.entry_count(), 3);
    assert_eq!(index.skipped(), 1);
}

#[test]
fn test_games_without_name_are_skipped() {
    let dat = DatFile {
        games: vec![game("   ", Some("Nameless"), "Nameless.gba", Some("NONE"))],
        ..Default::default()
    };
    let index = CoverIndex::from_dat(&dat, &Normalizer::default());
    assert!(index.is_empty());
    assert_eq!(index.skipped(), 1);
}

#[test]
fn test_multi_rom_game_uses_first_rom() {
    let mut disc = game(
        "Two Disc Game (USA)",
        None,
        "Two Disc Game (USA) (Disc 1).bin",
        Some("DSC1"),
    );
    disc.roms.push(DatRom {
        name: "Two Disc Game (USA) (Disc 2).bin".into(),
        serial: Some("DSC2".into()),
    });
    let mut late_serial = game(
        "Late Serial (USA)",
        None,
        "Late Serial (USA) (Track 1).bin",
        None,
    );
    late_serial.roms.push(DatRom {
        name: "Late Serial (USA) (Track 2).bin".into(),
        serial: Some("LATE".into()),
    });
    let dat = DatFile {
        games: vec![disc, late_serial],
        ..Default::default()
    };

    let index = CoverIndex::from_dat(&dat, &Normalizer::default());
    assert_eq!(index.lookup("twodiscgame"), Some("DSC1"));
    assert_eq!(index.lookup("lateserial"), None);
    assert_eq!(index.entry_count(), 1);
    assert_eq!(index.skipped(), 1);
}

#[test]
fn test_identifiers_are_upper_cased() {
    let index = index();
    assert_eq!(index.lookup("supergame"), Some("ABCD"));
}

#[test]
fn test_first_writer_wins_across_entries() {
    let dat = DatFile {
        games: vec![
            game("Same Game (USA)", None, "a.gba", Some("FRST")),
            game("Same Game (Europe)", None, "b.gba", Some("SCND")),
        ],
        ..Default::default()
    };
    let index = CoverIndex::from_dat(&dat, &Normalizer::default());
    assert_eq!(index.lookup("samegame"), Some("FRST"));
    assert_eq!(index.lookup("samegameusa"), Some("FRST"));
    assert_eq!(index.lookup("samegameeurope"), Some("SCND"));
}

#[test]
fn test_first_writer_wins_across_name_sources() {
    // The second entry's primary name collides with the first entry's description
    let entries = vec![
        CatalogEntry {
            name: "Alpha".into(),
            description: Some("Beta".into()),
            alternate_name: None,
            identifier: "AAAA".into(),
        },
        CatalogEntry {
            name: "Beta".into(),
            description: None,
            alternate_name: None,
            identifier: "BBBB".into(),
        },
    ];
    let index = CoverIndex::from_entries(entries, &Normalizer::default());
    assert_eq!(index.lookup("alpha"), Some("AAAA"));
    assert_eq!(index.lookup("beta"), Some("AAAA"));
}

#[test]
fn test_insert_if_absent() {
    let mut index = CoverIndex::default();
    assert!(index.insert_if_absent("key".into(), "ONE"));
    assert!(!index.insert_if_absent("key".into(), "TWO"));
    assert_eq!(index.lookup("key"), Some("ONE"));
    assert_eq!(index.len(), 1);
}

#[test]
fn test_empty_key_never_matches() {
    let index = index();
    assert_eq!(index.lookup(""), None);
}

#[test]
fn test_catalog_entry_from_game() {
    let entry = CatalogEntry::from_game(&game(
        "Super Game (USA)",
        Some(" "),
        "Super Game (USA).gba",
        Some(" abcd "),
    ))
    .unwrap();
    assert_eq!(entry.identifier, "ABCD");
    assert_eq!(entry.description, None);
    assert_eq!(entry.alternate_name.as_deref(), Some("Super Game (USA).gba"));
}
