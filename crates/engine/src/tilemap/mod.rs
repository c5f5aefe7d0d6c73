mod compositor;
mod tmj;
mod tmx;
mod types;

use std::fmt;

pub use compositor::TileMap;
pub use types::{
    LayerDescription, MapDescription, TilesetDescription, TilesetSource, EMPTY_GID,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapErrorCode {
    NotUtf8,
    XmlMalformed,
    JsonMalformed,
    InvalidRoot,
    MissingAttribute,
    MissingElement,
    InvalidValue,
    TileCountMismatch,
    UnsupportedEncoding,
    InfiniteMap,
    ExternalTileset,
}

/// A map file the game cannot build a world from.
#[derive(Debug, Clone)]
pub struct MapFormatError {
    pub code: MapErrorCode,
    pub message: String,
    pub location: Option<SourceLocation>,
}

impl MapFormatError {
    pub(crate) fn new(code: MapErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            location: None,
        }
    }
}

impl fmt::Display for MapFormatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.location {
            Some(loc) => write!(
                f,
                "{:?}: {} (line={}, column={})",
                self.code, self.message, loc.line, loc.column
            ),
            None => write!(f, "{:?}: {}", self.code, self.message),
        }
    }
}

impl std::error::Error for MapFormatError {}

/// Parses a Tiled map, either TMX (XML) or TMJ (JSON). A leading `{` selects JSON.
pub fn parse_map_description(bytes: &[u8]) -> Result<MapDescription, MapFormatError> {
    let raw = std::str::from_utf8(bytes).map_err(|error| {
        MapFormatError::new(
            MapErrorCode::NotUtf8,
            format!("map description is not valid UTF-8: {error}"),
        )
    })?;
    let raw = raw.trim_start_matches('\u{feff}');
    if raw.trim_start().starts_with('{') {
        tmj::parse_tmj(raw)
    } else {
        tmx::parse_tmx(raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sniffs_json_and_xml() {
        let xml = br#"<map width="1" height="1" tilewidth="8" tileheight="8"/>"#;
        let json = br#"  {"width":1,"height":1,"tilewidth":8,"tileheight":8}"#;
        assert_eq!(parse_map_description(xml).expect("xml").tile_width, 8);
        assert_eq!(parse_map_description(json).expect("json").tile_height, 8);
    }

    #[test]
    fn invalid_utf8_is_rejected() {
        let err = parse_map_description(&[0xff, 0xfe, 0x00]).expect_err("err");
        assert_eq!(err.code, MapErrorCode::NotUtf8);
    }

    #[test]
    fn display_includes_location() {
        let err = MapFormatError {
            code: MapErrorCode::MissingAttribute,
            message: "missing width".to_string(),
            location: Some(SourceLocation { line: 3, column: 7 }),
        };
        assert_eq!(
            err.to_string(),
            "MissingAttribute: missing width (line=3, column=7)"
        );
    }
}
