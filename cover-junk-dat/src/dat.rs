use std::io::{BufRead, Read};
use std::path::Path;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::error::DatError;

/// A parsed No-Intro catalog (Logiqx XML or ClrMamePro).
#[derive(Debug, Clone, Default)]
pub struct DatFile {
    pub name: String,
    pub description: String,
    pub version: String,
    pub games: Vec<DatGame>,
}

/// A single game record from a catalog.
#[derive(Debug, Clone, Default)]
pub struct DatGame {
    /// Display name, e.g. "Pokemon - Emerald Version (USA, Europe)".
    pub name: String,
    /// Free-text `<description>` child, often identical to the name.
    pub description: Option<String>,
    /// Region string, only present in LibRetro enhanced ClrMamePro DATs.
    pub region: Option<String>,
    pub roms: Vec<DatRom>,
}

/// The parts of a ROM entry the cover matcher cares about.
#[derive(Debug, Clone, Default)]
pub struct DatRom {
    /// ROM file name including extension.
    pub name: String,
    /// Serial / game code, e.g. "BPEE".
    pub serial: Option<String>,
}

impl DatGame {
    /// The first ROM, when it carries a non-empty serial. Later ROMs of a
    /// multi-ROM game never supply the serial.
    pub fn serial_rom(&self) -> Option<&DatRom> {
        self.roms
            .first()
            .filter(|r| r.serial.as_deref().is_some_and(|s| !s.trim().is_empty()))
    }
}

/// Parse a DAT, auto-detecting the format from the first non-whitespace byte.
pub fn parse_dat<R: BufRead>(mut reader: R) -> Result<DatFile, DatError> {
    let mut peeked = Vec::new();
    let mut byte = [0u8; 1];
    loop {
        if reader.read(&mut byte)? == 0 {
            return Err(DatError::invalid_dat("Empty DAT file"));
        }
        peeked.push(byte[0]);
        if !byte[0].is_ascii_whitespace() {
            break;
        }
    }

    let buffered = std::io::BufReader::new(std::io::Cursor::new(peeked).chain(reader));
    if byte[0] == b'<' {
        parse_xml(buffered)
    } else {
        parse_clrmamepro(buffered)
    }
}

/// Parse a DAT from a file path.
pub fn parse_dat_file(path: &Path) -> Result<DatFile, DatError> {
    let file = std::fs::File::open(path)?;
    parse_dat(std::io::BufReader::new(file))
}

// ---------------------------------------------------------------------------
// Logiqx XML
// ---------------------------------------------------------------------------

fn parse_xml<R: BufRead>(reader: R) -> Result<DatFile, DatError> {
    let mut xml = Reader::from_reader(reader);
    xml.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut dat = DatFile::default();
    let mut in_header = false;
    let mut current_tag = String::new();
    let mut current_game: Option<DatGame> = None;
    let mut depth = 0usize;

    loop {
        match xml.read_event_into(&mut buf)? {
            Event::Start(ref e) => {
                depth += 1;
                let tag = tag_name(e);
                match tag.as_str() {
                    "header" => in_header = true,
                    "game" => current_game = Some(start_game(e)?),
                    "rom" => push_rom(&mut current_game, e)?,
                    _ => current_tag = tag,
                }
            }
            Event::Empty(ref e) => match tag_name(e).as_str() {
                "game" => dat.games.push(start_game(e)?),
                "rom" => push_rom(&mut current_game, e)?,
                _ => {}
            },
            Event::Text(ref e) => {
                let text = e.unescape()?.to_string();
                if in_header {
                    match current_tag.as_str() {
                        "name" => dat.name = text,
                        "description" => dat.description = text,
                        "version" => dat.version = text,
                        _ => {}
                    }
                } else if let Some(ref mut game) = current_game {
                    if current_tag == "description" {
                        game.description = Some(text);
                    }
                }
            }
            Event::End(ref e) => {
                depth = depth.saturating_sub(1);
                let tag = String::from_utf8_lossy(e.name().as_ref()).to_string();
                match tag.as_str() {
                    "header" => in_header = false,
                    "game" => {
                        if let Some(game) = current_game.take() {
                            dat.games.push(game);
                        }
                    }
                    _ => current_tag.clear(),
                }
            }
            Event::Eof => {
                if depth > 0 || current_game.is_some() {
                    return Err(DatError::invalid_dat("Unexpected end of XML DAT"));
                }
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    if dat.name.is_empty() && dat.games.is_empty() {
        return Err(DatError::invalid_dat(
            "No header or games found in XML DAT file",
        ));
    }

    Ok(dat)
}

fn tag_name(e: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(e.name().as_ref()).to_string()
}

fn start_game(e: &BytesStart<'_>) -> Result<DatGame, DatError> {
    let mut game = DatGame::default();
    for attr in e.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == b"name" {
            game.name = attr.unescape_value()?.to_string();
        }
    }
    Ok(game)
}

fn push_rom(game: &mut Option<DatGame>, e: &BytesStart<'_>) -> Result<(), DatError> {
    let Some(game) = game else {
        return Ok(());
    };
    let mut rom = DatRom::default();
    for attr in e.attributes() {
        let attr = attr?;
        let value = attr.unescape_value()?.to_string();
        match attr.key.as_ref() {
            b"name" => rom.name = value,
            b"serial" => rom.serial = Some(value),
            _ => {}
        }
    }
    game.roms.push(rom);
    Ok(())
}

// ---------------------------------------------------------------------------
// ClrMamePro
// ---------------------------------------------------------------------------

/// Parse a ClrMamePro text DAT.
///
/// ```text
/// game (
///     name "Game Name (Region)"
///     description "Game Name (Region)"
///     serial "ABCD"
///     rom ( name "Game Name (Region).gba" size 12345 crc AABBCCDD serial "ABCD" )
/// )
/// ```
fn parse_clrmamepro<R: BufRead>(reader: R) -> Result<DatFile, DatError> {
    let mut dat = DatFile::default();
    let mut block: Option<String> = None;
    let mut current_game: Option<DatGame> = None;
    let mut game_serial: Option<String> = None;

    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }

        let Some(block_type) = block.as_deref() else {
            if let Some(kind) = detect_block_start(trimmed) {
                if kind == "game" {
                    current_game = Some(DatGame::default());
                }
                block = Some(kind);
            }
            continue;
        };

        if trimmed == ")" {
            if let Some(mut game) = current_game.take() {
                // Game-level serial applies to ROMs without their own
                if let Some(serial) = game_serial.take() {
                    for rom in game.roms.iter_mut().filter(|r| r.serial.is_none()) {
                        rom.serial = Some(serial.clone());
                    }
                }
                dat.games.push(game);
            }
            block = None;
            continue;
        }

        let Some((key, value)) = parse_kv(trimmed) else {
            continue;
        };
        match block_type {
            "clrmamepro" => match key.as_str() {
                "name" => dat.name = value,
                "description" => dat.description = value,
                "version" => dat.version = value,
                _ => {}
            },
            "game" => {
                if let Some(ref mut game) = current_game {
                    match key.as_str() {
                        "name" => game.name = value,
                        "description" => game.description = Some(value),
                        "region" => game.region = Some(value),
                        "serial" => game_serial = Some(value),
                        "rom" => {
                            if let Some(rom) = parse_clr_rom_inline(&value) {
                                game.roms.push(rom);
                            }
                        }
                        _ => {}
                    }
                }
            }
            _ => {}
        }
    }

    if dat.name.is_empty() && dat.games.is_empty() {
        return Err(DatError::invalid_dat(
            "No header or games found in ClrMamePro DAT file",
        ));
    }

    Ok(dat)
}

/// Detect a block start like `clrmamepro (` or `game (`.
fn detect_block_start(line: &str) -> Option<String> {
    let kind = line.trim_end().strip_suffix('(')?.trim();
    if !kind.is_empty() && kind.chars().all(|c| c.is_alphanumeric() || c == '_') {
        Some(kind.to_lowercase())
    } else {
        None
    }
}

/// Split `name "Some Value"` into key and unquoted value. For `rom ( ... )`
/// the value is the content between the outer parens.
fn parse_kv(line: &str) -> Option<(String, String)> {
    if let Some(rest) = line.strip_prefix("rom") {
        let rest = rest.trim();
        if let Some(inner) = rest.strip_prefix('(').and_then(|r| r.strip_suffix(')')) {
            return Some(("rom".to_string(), inner.trim().to_string()));
        }
    }

    let (key, raw) = line.split_once(|c: char| c.is_ascii_whitespace())?;
    let raw = raw.trim();
    let value = raw
        .strip_prefix('"')
        .and_then(|v| v.strip_suffix('"'))
        .unwrap_or(raw);
    Some((key.to_string(), value.to_string()))
}

/// Parse `name "Game (Region).ext" size 12345 crc AB serial "XXXX"`.
fn parse_clr_rom_inline(inner: &str) -> Option<DatRom> {
    let tokens = tokenize_rom_line(inner);
    let mut rom = DatRom::default();

    for pair in tokens.chunks(2) {
        if let [key, value] = pair {
            match key.as_str() {
                "name" => rom.name = value.clone(),
                "serial" => rom.serial = Some(value.clone()),
                _ => {}
            }
        }
    }

    if rom.name.is_empty() {
        return None;
    }
    Some(rom)
}

/// Tokenize a ROM line, keeping quoted strings intact.
fn tokenize_rom_line(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    loop {
        while chars.peek().is_some_and(|c| c.is_ascii_whitespace()) {
            chars.next();
        }
        let Some(&first) = chars.peek() else {
            break;
        };

        let mut token = String::new();
        if first == '"' {
            chars.next();
            for c in chars.by_ref() {
                if c == '"' {
                    break;
                }
                token.push(c);
            }
        } else {
            while let Some(&c) = chars.peek() {
                if c.is_ascii_whitespace() {
                    break;
                }
                token.push(c);
                chars.next();
            }
        }
        tokens.push(token);
    }

    tokens
}

#[cfg(test)]
#[path = "tests/dat_tests.rs"]
mod tests;
