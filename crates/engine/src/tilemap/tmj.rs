use serde::Deserialize;
use tracing::debug;

use super::types::{
    strip_flip_flags, LayerDescription, MapDescription, TilesetDescription, TilesetSource,
};
use super::{MapErrorCode, MapFormatError, SourceLocation};

#[derive(Debug, Deserialize)]
struct TmjMap {
    width: u32,
    height: u32,
    tilewidth: u32,
    tileheight: u32,
    #[serde(default)]
    infinite: bool,
    #[serde(default)]
    layers: Vec<TmjLayer>,
    #[serde(default)]
    tilesets: Vec<TmjTileset>,
}

#[derive(Debug, Deserialize)]
struct TmjLayer {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    name: String,
    #[serde(default = "default_visible")]
    visible: bool,
    #[serde(default = "default_opacity")]
    opacity: f32,
    #[serde(default)]
    data: Option<TmjLayerData>,
    #[serde(default)]
    encoding: Option<String>,
    #[serde(default)]
    compression: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TmjLayerData {
    Tiles(Vec<u32>),
    Encoded(String),
}

#[derive(Debug, Deserialize)]
struct TmjTileset {
    firstgid: u32,
    #[serde(default)]
    source: Option<String>,
    #[serde(default)]
    name: String,
    #[serde(default)]
    tilewidth: u32,
    #[serde(default)]
    tileheight: u32,
    #[serde(default)]
    tilecount: Option<u32>,
    #[serde(default)]
    columns: u32,
    #[serde(default)]
    image: Option<String>,
    #[serde(default)]
    tiles: Vec<TmjTile>,
}

#[derive(Debug, Deserialize)]
struct TmjTile {
    id: u32,
    #[serde(default)]
    image: Option<String>,
}

fn default_visible() -> bool {
    true
}

fn default_opacity() -> f32 {
    1.0
}

pub(super) fn parse_tmj(raw: &str) -> Result<MapDescription, MapFormatError> {
    let map: TmjMap = serde_json::from_str(raw).map_err(|error| MapFormatError {
        code: MapErrorCode::JsonMalformed,
        message: format!("malformed map JSON: {error}"),
        location: Some(SourceLocation {
            line: error.line(),
            column: error.column(),
        }),
    })?;

    if map.infinite {
        return Err(MapFormatError::new(
            MapErrorCode::InfiniteMap,
            "infinite maps are not supported; resize the map to a fixed size".to_string(),
        ));
    }
    if map.tilewidth == 0 || map.tileheight == 0 {
        return Err(MapFormatError::new(
            MapErrorCode::InvalidValue,
            "map tilewidth and tileheight must be greater than zero".to_string(),
        ));
    }

    let tilesets = map
        .tilesets
        .into_iter()
        .map(convert_tileset)
        .collect::<Result<Vec<_>, _>>()?;

    let expected = map.width as usize * map.height as usize;
    let mut layers = Vec::new();
    for layer in map.layers {
        if layer.kind != "tilelayer" {
            debug!(kind = %layer.kind, name = %layer.name, "map_layer_ignored");
            continue;
        }
        layers.push(convert_layer(layer, expected)?);
    }

    Ok(MapDescription {
        width: map.width,
        height: map.height,
        tile_width: map.tilewidth,
        tile_height: map.tileheight,
        layers,
        tilesets,
    })
}

fn convert_tileset(tileset: TmjTileset) -> Result<TilesetDescription, MapFormatError> {
    if let Some(source) = tileset.source {
        return Err(MapFormatError::new(
            MapErrorCode::ExternalTileset,
            format!("external tileset '{source}' is not supported; embed the tileset in the map"),
        ));
    }
    if tileset.firstgid == 0 || tileset.tilewidth == 0 || tileset.tileheight == 0 {
        return Err(MapFormatError::new(
            MapErrorCode::InvalidValue,
            format!(
                "tileset '{}' needs a positive firstgid, tilewidth and tileheight",
                tileset.name
            ),
        ));
    }

    let source = match tileset.image {
        Some(image) => TilesetSource::Sheet { image },
        None => TilesetSource::Collection {
            tiles: tileset
                .tiles
                .into_iter()
                .filter_map(|tile| tile.image.map(|image| (tile.id, image)))
                .collect(),
        },
    };
    let tile_count = match (&source, tileset.tilecount) {
        (_, Some(count)) => count,
        (TilesetSource::Collection { tiles }, None) => tiles.len() as u32,
        (TilesetSource::Sheet { .. }, None) => {
            return Err(MapFormatError::new(
                MapErrorCode::MissingAttribute,
                format!("sheet tileset '{}' is missing tilecount", tileset.name),
            ))
        }
    };

    Ok(TilesetDescription {
        name: tileset.name,
        first_gid: tileset.firstgid,
        tile_width: tileset.tilewidth,
        tile_height: tileset.tileheight,
        tile_count,
        columns: tileset.columns,
        source,
    })
}

fn convert_layer(layer: TmjLayer, expected: usize) -> Result<LayerDescription, MapFormatError> {
    if let Some(compression) = layer.compression.filter(|value| !value.is_empty()) {
        return Err(MapFormatError::new(
            MapErrorCode::UnsupportedEncoding,
            format!("compressed layer data ('{compression}') is not supported; save as CSV"),
        ));
    }
    if let Some(encoding) = layer.encoding.filter(|value| value != "csv") {
        return Err(MapFormatError::new(
            MapErrorCode::UnsupportedEncoding,
            format!("layer encoding '{encoding}' is not supported; save as CSV"),
        ));
    }

    let tiles: Vec<u32> = match layer.data {
        Some(TmjLayerData::Tiles(tiles)) => tiles.into_iter().map(strip_flip_flags).collect(),
        Some(TmjLayerData::Encoded(payload)) => {
            return Err(MapFormatError::new(
                MapErrorCode::UnsupportedEncoding,
                format!(
                    "layer '{}' stores {} bytes of encoded data; save as CSV",
                    layer.name,
                    payload.len()
                ),
            ))
        }
        None => {
            return Err(MapFormatError::new(
                MapErrorCode::MissingElement,
                format!("layer '{}' has no data", layer.name),
            ))
        }
    };
    if tiles.len() != expected {
        return Err(MapFormatError::new(
            MapErrorCode::TileCountMismatch,
            format!(
                "layer '{}' has {} tiles, expected {expected}",
                layer.name,
                tiles.len()
            ),
        ));
    }

    Ok(LayerDescription {
        name: layer.name,
        visible: layer.visible,
        opacity: layer.opacity.clamp(0.0, 1.0),
        tiles,
    })
}
