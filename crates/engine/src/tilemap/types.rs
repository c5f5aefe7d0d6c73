/// Global tile id of an empty cell.
pub const EMPTY_GID: u32 = 0;

const FLIP_FLAGS_MASK: u32 = 0xF000_0000;

/// Drops the flip/rotation flags Tiled stores in the top four bits of a GID.
pub(crate) fn strip_flip_flags(raw_gid: u32) -> u32 {
    raw_gid & !FLIP_FLAGS_MASK
}

/// A parsed map file. Dimensions are in tiles; tile sizes in pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct MapDescription {
    pub width: u32,
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub layers: Vec<LayerDescription>,
    pub tilesets: Vec<TilesetDescription>,
}

impl MapDescription {
    /// Every image the tilesets reference, as written in the map, without duplicates.
    pub fn image_sources(&self) -> Vec<String> {
        let mut sources: Vec<String> = Vec::new();
        for tileset in &self.tilesets {
            let referenced: Vec<&String> = match &tileset.source {
                TilesetSource::Sheet { image } => vec![image],
                TilesetSource::Collection { tiles } => tiles.iter().map(|(_, image)| image).collect(),
            };
            for image in referenced {
                if !sources.iter().any(|existing| existing == image) {
                    sources.push(image.clone());
                }
            }
        }
        sources
    }
}

/// One tile layer. `tiles` is row-major, `width * height` long, flip flags already removed.
#[derive(Debug, Clone, PartialEq)]
pub struct LayerDescription {
    pub name: String,
    pub visible: bool,
    pub opacity: f32,
    pub tiles: Vec<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TilesetDescription {
    pub name: String,
    pub first_gid: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    pub tile_count: u32,
    /// Zero when the file leaves it out; the compositor then treats the sheet as one row.
    pub columns: u32,
    pub source: TilesetSource,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TilesetSource {
    /// One shared sheet sliced into `tile_width x tile_height` cells.
    Sheet { image: String },
    /// Independently imaged tiles as `(local id, image source)`.
    Collection { tiles: Vec<(u32, String)> },
}
