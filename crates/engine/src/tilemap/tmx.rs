use roxmltree::{Document, Node};
use tracing::debug;

use super::types::{
    strip_flip_flags, LayerDescription, MapDescription, TilesetDescription, TilesetSource,
};
use super::{MapErrorCode, MapFormatError, SourceLocation};

pub(super) fn parse_tmx(raw: &str) -> Result<MapDescription, MapFormatError> {
    let doc = Document::parse(raw).map_err(|error| MapFormatError {
        code: MapErrorCode::XmlMalformed,
        message: format!("malformed XML: {error}"),
        location: Some(SourceLocation {
            line: error.pos().row as usize,
            column: error.pos().col as usize,
        }),
    })?;

    let root = doc.root_element();
    if root.tag_name().name() != "map" {
        return Err(error_at_node(
            MapErrorCode::InvalidRoot,
            format!("root element must be <map>, found <{}>", root.tag_name().name()),
            &doc,
            root,
        ));
    }
    if root.attribute("infinite") == Some("1") {
        return Err(error_at_node(
            MapErrorCode::InfiniteMap,
            "infinite maps are not supported; resize the map to a fixed size".to_string(),
            &doc,
            root,
        ));
    }

    let width = required_u32(&doc, root, "width")?;
    let height = required_u32(&doc, root, "height")?;
    let tile_width = required_positive_u32(&doc, root, "tilewidth")?;
    let tile_height = required_positive_u32(&doc, root, "tileheight")?;

    let mut layers = Vec::new();
    let mut tilesets = Vec::new();
    for child in root.children().filter(|node| node.is_element()) {
        match child.tag_name().name() {
            "tileset" => tilesets.push(parse_tileset(&doc, child)?),
            "layer" => layers.push(parse_layer(&doc, child, width, height)?),
            "objectgroup" | "imagelayer" | "group" => {
                debug!(
                    kind = child.tag_name().name(),
                    name = child.attribute("name").unwrap_or_default(),
                    "map_layer_ignored"
                );
            }
            _ => {}
        }
    }

    Ok(MapDescription {
        width,
        height,
        tile_width,
        tile_height,
        layers,
        tilesets,
    })
}

fn parse_tileset(doc: &Document<'_>, node: Node<'_, '_>) -> Result<TilesetDescription, MapFormatError> {
    if let Some(source) = node.attribute("source") {
        return Err(error_at_node(
            MapErrorCode::ExternalTileset,
            format!("external tileset '{source}' is not supported; embed the tileset in the map"),
            doc,
            node,
        ));
    }

    let first_gid = required_positive_u32(doc, node, "firstgid")?;
    let tile_width = required_positive_u32(doc, node, "tilewidth")?;
    let tile_height = required_positive_u32(doc, node, "tileheight")?;
    let columns = optional_u32(doc, node, "columns")?.unwrap_or(0);
    let name = node.attribute("name").unwrap_or_default().to_string();

    let sheet_image = node
        .children()
        .find(|child| child.is_element() && child.tag_name().name() == "image");
    let source = match sheet_image {
        Some(image) => TilesetSource::Sheet {
            image: required_str(doc, image, "source")?.to_string(),
        },
        None => {
            let mut tiles = Vec::new();
            for tile in node
                .children()
                .filter(|child| child.is_element() && child.tag_name().name() == "tile")
            {
                let id = required_u32(doc, tile, "id")?;
                let Some(image) = tile
                    .children()
                    .find(|child| child.is_element() && child.tag_name().name() == "image")
                else {
                    continue;
                };
                tiles.push((id, required_str(doc, image, "source")?.to_string()));
            }
            TilesetSource::Collection { tiles }
        }
    };

    let tile_count = match (&source, optional_u32(doc, node, "tilecount")?) {
        (_, Some(count)) => count,
        (TilesetSource::Collection { tiles }, None) => tiles.len() as u32,
        (TilesetSource::Sheet { .. }, None) => {
            return Err(error_at_node(
                MapErrorCode::MissingAttribute,
                "missing required attribute 'tilecount' on sheet <tileset>".to_string(),
                doc,
                node,
            ))
        }
    };

    Ok(TilesetDescription {
        name,
        first_gid,
        tile_width,
        tile_height,
        tile_count,
        columns,
        source,
    })
}

fn parse_layer(
    doc: &Document<'_>,
    node: Node<'_, '_>,
    map_width: u32,
    map_height: u32,
) -> Result<LayerDescription, MapFormatError> {
    let name = node.attribute("name").unwrap_or_default().to_string();
    let visible = node.attribute("visible") != Some("0");
    let opacity = match node.attribute("opacity") {
        Some(raw) => parse_opacity(doc, node, raw)?,
        None => 1.0,
    };

    let Some(data) = node
        .children()
        .find(|child| child.is_element() && child.tag_name().name() == "data")
    else {
        return Err(error_at_node(
            MapErrorCode::MissingElement,
            format!("layer '{name}' has no <data> element"),
            doc,
            node,
        ));
    };
    if let Some(compression) = data.attribute("compression") {
        return Err(error_at_node(
            MapErrorCode::UnsupportedEncoding,
            format!("compressed layer data ('{compression}') is not supported; save as CSV"),
            doc,
            data,
        ));
    }

    let tiles = match data.attribute("encoding") {
        None => data
            .children()
            .filter(|child| child.is_element() && child.tag_name().name() == "tile")
            .map(|tile| optional_u32(doc, tile, "gid").map(|gid| strip_flip_flags(gid.unwrap_or(0))))
            .collect::<Result<Vec<_>, _>>()?,
        Some("csv") => parse_csv(doc, data)?,
        Some(other) => {
            return Err(error_at_node(
                MapErrorCode::UnsupportedEncoding,
                format!("layer encoding '{other}' is not supported; save as CSV"),
                doc,
                data,
            ))
        }
    };

    let expected = map_width as usize * map_height as usize;
    if tiles.len() != expected {
        return Err(error_at_node(
            MapErrorCode::TileCountMismatch,
            format!(
                "layer '{name}' has {} tiles, expected {expected} ({map_width}x{map_height})",
                tiles.len()
            ),
            doc,
            node,
        ));
    }

    Ok(LayerDescription {
        name,
        visible,
        opacity,
        tiles,
    })
}

fn parse_csv(doc: &Document<'_>, data: Node<'_, '_>) -> Result<Vec<u32>, MapFormatError> {
    let text = data.text().unwrap_or_default();
    text.split(',')
        .map(str::trim)
        .filter(|cell| !cell.is_empty())
        .map(|cell| {
            cell.parse::<u32>().map(strip_flip_flags).map_err(|_| {
                error_at_node(
                    MapErrorCode::InvalidValue,
                    format!("tile id '{cell}' is not a valid number"),
                    doc,
                    data,
                )
            })
        })
        .collect()
}

fn parse_opacity(doc: &Document<'_>, node: Node<'_, '_>, raw: &str) -> Result<f32, MapFormatError> {
    let parsed = raw.parse::<f32>().map_err(|_| {
        error_at_node(
            MapErrorCode::InvalidValue,
            format!("opacity '{raw}' is not a valid number"),
            doc,
            node,
        )
    })?;
    if !parsed.is_finite() {
        return Err(error_at_node(
            MapErrorCode::InvalidValue,
            "opacity must be finite".to_string(),
            doc,
            node,
        ));
    }
    Ok(parsed.clamp(0.0, 1.0))
}

fn required_str<'a>(
    doc: &Document<'_>,
    node: Node<'a, '_>,
    attribute: &str,
) -> Result<&'a str, MapFormatError> {
    match node.attribute(attribute) {
        Some(value) if !value.trim().is_empty() => Ok(value),
        _ => Err(error_at_node(
            MapErrorCode::MissingAttribute,
            format!(
                "missing required attribute '{attribute}' on <{}>",
                node.tag_name().name()
            ),
            doc,
            node,
        )),
    }
}

fn optional_u32(
    doc: &Document<'_>,
    node: Node<'_, '_>,
    attribute: &str,
) -> Result<Option<u32>, MapFormatError> {
    let Some(raw) = node.attribute(attribute) else {
        return Ok(None);
    };
    raw.trim().parse::<u32>().map(Some).map_err(|_| {
        error_at_node(
            MapErrorCode::InvalidValue,
            format!(
                "attribute '{attribute}' on <{}> must be a non-negative integer, got '{raw}'",
                node.tag_name().name()
            ),
            doc,
            node,
        )
    })
}

fn required_u32(doc: &Document<'_>, node: Node<'_, '_>, attribute: &str) -> Result<u32, MapFormatError> {
    optional_u32(doc, node, attribute)?.ok_or_else(|| {
        error_at_node(
            MapErrorCode::MissingAttribute,
            format!(
                "missing required attribute '{attribute}' on <{}>",
                node.tag_name().name()
            ),
            doc,
            node,
        )
    })
}

fn required_positive_u32(
    doc: &Document<'_>,
    node: Node<'_, '_>,
    attribute: &str,
) -> Result<u32, MapFormatError> {
    let value = required_u32(doc, node, attribute)?;
    if value == 0 {
        return Err(error_at_node(
            MapErrorCode::InvalidValue,
            format!(
                "attribute '{attribute}' on <{}> must be greater than zero",
                node.tag_name().name()
            ),
            doc,
            node,
        ));
    }
    Ok(value)
}

fn error_at_node(
    code: MapErrorCode,
    message: String,
    doc: &Document<'_>,
    node: Node<'_, '_>,
) -> MapFormatError {
    let pos = doc.text_pos_at(node.range().start);
    MapFormatError {
        code,
        message,
        location: Some(SourceLocation {
            line: pos.row as usize,
            column: pos.col as usize,
        }),
    }
}
