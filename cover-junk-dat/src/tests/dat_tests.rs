use super::*;

// -- XML tests --

const SAMPLE_XML_DAT: &str = r#"<?xml version="1.0"?>
<!DOCTYPE datafile SYSTEM "http://www.logiqx.com/Dats/datafile.dtd">
<datafile>
    <header>
        <name>Nintendo - Game Boy Advance</name>
        <description>Nintendo - Game Boy Advance (20260124-113814)</description>
        <version>20260124-113814</version>
    </header>
    <game name="Pokemon - Emerald Version (USA, Europe)">
        <description>Pokemon - Emerald Version (USA, Europe)</description>
        <rom name="Pokemon - Emerald Version (USA, Europe).gba" size="16777216" crc="1f1c08fb" serial="BPEE"/>
    </game>
    <game name="Mario &amp; Luigi - Superstar Saga (USA)">
        <description>Mario &amp; Luigi - Superstar Saga (USA)</description>
        <rom name="Mario &amp; Luigi - Superstar Saga (USA).gba" size="8388608" crc="b3a07c4a" serial="A88E"/>
    </game>
    <game name="Homebrew Demo (World)">
        <rom name="Homebrew Demo (World).gba" size="1024" crc="00000000"/>
    </game>
</datafile>"#;

#[test]
fn test_parse_xml_dat() {
    let dat = parse_dat(SAMPLE_XML_DAT.as_bytes()).unwrap();
    assert_eq!(dat.name, "Nintendo - Game Boy Advance");
    assert_eq!(dat.version, "20260124-113814");
    assert_eq!(dat.games.len(), 3);

    let emerald = &dat.games[0];
    assert_eq!(emerald.name, "Pokemon - Emerald Version (USA, Europe)");
    assert_eq!(
        emerald.description.as_deref(),
        Some("Pokemon - Emerald Version (USA, Europe)")
    );
    assert_eq!(emerald.roms[0].name, "Pokemon - Emerald Version (USA, Europe).gba");
    assert_eq!(emerald.roms[0].serial.as_deref(), Some("BPEE"));
}

#[test]
fn test_parse_xml_unescapes_entities() {
    let dat = parse_dat(SAMPLE_XML_DAT.as_bytes()).unwrap();
    let mario = &dat.games[1];
    assert_eq!(mario.name, "Mario & Luigi - Superstar Saga (USA)");
    assert_eq!(
        mario.description.as_deref(),
        Some("Mario & Luigi - Superstar Saga (USA)")
    );
    assert_eq!(mario.roms[0].name, "Mario & Luigi - Superstar Saga (USA).gba");
}

#[test]
fn test_parse_xml_game_without_serial() {
    let dat = parse_dat(SAMPLE_XML_DAT.as_bytes()).unwrap();
    let demo = &dat.games[2];
    assert!(demo.description.is_none());
    assert!(demo.roms[0].serial.is_none());
    assert!(demo.serial_rom().is_none());
}

#[test]
fn test_parse_xml_rom_with_closing_tag() {
    let xml = r#"<?xml version="1.0"?>
<datafile>
    <game name="Test Game">
        <rom name="Test Game.gba" serial="TEST"></rom>
    </game>
</datafile>"#;
    let dat = parse_dat(xml.as_bytes()).unwrap();
    assert_eq!(dat.games[0].roms.len(), 1);
    assert_eq!(dat.games[0].roms[0].serial.as_deref(), Some("TEST"));
}

#[test]
fn test_parse_empty_xml() {
    let xml = r#"<?xml version="1.0"?><datafile></datafile>"#;
    assert!(parse_dat(xml.as_bytes()).is_err());
}

#[test]
fn test_parse_malformed_xml() {
    let xml = r#"<?xml version="1.0"?><datafile><game name="A"></rom></datafile>"#;
    assert!(parse_dat(xml.as_bytes()).is_err());
}

#[test]
fn test_parse_empty_input() {
    assert!(parse_dat("   \n".as_bytes()).is_err());
}

#[test]
fn test_serial_rom_is_first_rom_only() {
    let mut game = DatGame {
        name: "Game".into(),
        roms: vec![
            DatRom {
                name: "Game (Track 1).bin".into(),
                serial: Some("AAAA".into()),
            },
            DatRom {
                name: "Game (Track 2).bin".into(),
                serial: Some("BBBB".into()),
            },
        ],
        ..Default::default()
    };
    assert_eq!(game.serial_rom().unwrap().name, "Game (Track 1).bin");

    // A blank serial on the first ROM is not replaced by a later one
    game.roms[0].serial = Some("  ".into());
    assert!(game.serial_rom().is_none());
}

#[test]
fn test_parse_truncated_xml() {
    let xml = r#"<?xml version="1.0"?>
<datafile>
    <header><name>Nintendo - Game Boy Advance</name></header>
    <game name="A (USA)"><rom name="A (USA).gba" serial="AAAA"/></game>
    <game name="B (USA)">
        <rom name="B (USA).gba" serial="BBBB"/>"#;
    assert!(matches!(
        parse_dat(xml.as_bytes()),
        Err(DatError::InvalidDat(_))
    ));
}

#[test]
fn test_parse_unclosed_root_xml() {
    let xml = r#"<datafile><game name="A (USA)"><rom name="A.gba" serial="AAAA"/></game>"#;
    assert!(parse_dat(xml.as_bytes()).is_err());
}

// -- ClrMamePro tests --

const SAMPLE_CLR_DAT: &str = r#"clrmamepro (
	name "Nintendo - Game Boy Advance"
	description "Nintendo - Game Boy Advance"
	version 20260124-113814
)

game (
	name "Golden Sun (USA, Europe)"
	description "Golden Sun (USA, Europe)"
	region "USA"
	serial "AGSE"
	rom ( name "Golden Sun (USA, Europe).gba" size 8388608 crc A2F43929 md5 4187A797E33BC96A96993220DA6F09F7 )
)

game (
	name "Advance Wars (USA)"
	rom ( name "Advance Wars (USA).gba" size 8388608 crc 5AD0E571 serial "AWRE" )
)
"#;

#[test]
fn test_parse_clrmamepro_dat() {
    let dat = parse_dat(SAMPLE_CLR_DAT.as_bytes()).unwrap();
    assert_eq!(dat.name, "Nintendo - Game Boy Advance");
    assert_eq!(dat.version, "20260124-113814");
    assert_eq!(dat.games.len(), 2);

    let gs = &dat.games[0];
    assert_eq!(gs.name, "Golden Sun (USA, Europe)");
    assert_eq!(gs.description.as_deref(), Some("Golden Sun (USA, Europe)"));
    assert_eq!(gs.region.as_deref(), Some("USA"));
    assert_eq!(gs.roms[0].name, "Golden Sun (USA, Europe).gba");
}

#[test]
fn test_clrmamepro_game_serial_propagation() {
    let dat = parse_dat(SAMPLE_CLR_DAT.as_bytes()).unwrap();
    // ROM line has no serial, game-level one is propagated
    assert_eq!(dat.games[0].roms[0].serial.as_deref(), Some("AGSE"));
    // ROM-level serial is kept as-is
    assert_eq!(dat.games[1].roms[0].serial.as_deref(), Some("AWRE"));
}

#[test]
fn test_parse_empty_clrmamepro() {
    assert!(parse_dat("clrmamepro (\n)\n".as_bytes()).is_err());
}

#[test]
fn test_tokenize_quoted_rom() {
    let tokens = tokenize_rom_line(r#"name "Game (USA, Europe).gba" size 524288 crc ABCD1234"#);
    assert_eq!(
        tokens,
        vec!["name", "Game (USA, Europe).gba", "size", "524288", "crc", "ABCD1234"]
    );
}

#[test]
fn test_parse_kv_strips_quotes() {
    assert_eq!(
        parse_kv(r#"name "Some Game (Japan)""#),
        Some(("name".to_string(), "Some Game (Japan)".to_string()))
    );
    assert_eq!(
        parse_kv("version 20240101"),
        Some(("version".to_string(), "20240101".to_string()))
    );
    assert_eq!(parse_kv("orphan"), None);
}
