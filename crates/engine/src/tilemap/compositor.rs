use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, warn};

use super::types::{LayerDescription, MapDescription, TilesetSource, EMPTY_GID};
use crate::app::{DrawParams, Image, ImageRegion, PixelRect, RenderTarget};

/// A map ready to draw: its layers plus an image region for every resolvable GID.
#[derive(Debug, Clone)]
pub struct TileMap {
    width_tiles: u32,
    height_tiles: u32,
    tile_width: u32,
    tile_height: u32,
    layers: Vec<LayerDescription>,
    tile_images: HashMap<u32, ImageRegion>,
}

impl TileMap {
    /// `images` is keyed by the image source exactly as written in the map.
    /// Tilesets whose image is absent stay unrenderable.
    pub fn new(description: MapDescription, images: &HashMap<String, Arc<Image>>) -> Self {
        let mut tile_images = HashMap::new();

        for tileset in &description.tilesets {
            match &tileset.source {
                TilesetSource::Sheet { image } => {
                    let Some(sheet) = images.get(image) else {
                        warn!(
                            tileset = %tileset.name,
                            image = %image,
                            "tilemap_tileset_image_missing"
                        );
                        continue;
                    };
                    let sheet = ImageRegion::full(Arc::clone(sheet));
                    let columns = if tileset.columns == 0 {
                        tileset.tile_count
                    } else {
                        tileset.columns
                    }
                    .max(1);
                    for index in 0..tileset.tile_count {
                        let column = index % columns;
                        let row = index / columns;
                        let region = sheet.sub_region(PixelRect::new(
                            (column * tileset.tile_width) as i32,
                            (row * tileset.tile_height) as i32,
                            tileset.tile_width,
                            tileset.tile_height,
                        ));
                        tile_images.insert(tileset.first_gid.saturating_add(index), region);
                    }
                }
                TilesetSource::Collection { tiles } => {
                    for (local_id, source) in tiles {
                        let Some(image) = images.get(source) else {
                            warn!(
                                tileset = %tileset.name,
                                tile_id = local_id,
                                image = %source,
                                "tilemap_tile_image_missing"
                            );
                            continue;
                        };
                        tile_images.insert(
                            tileset.first_gid.saturating_add(*local_id),
                            ImageRegion::full(Arc::clone(image)),
                        );
                    }
                }
            }
        }

        debug!(
            width_tiles = description.width,
            height_tiles = description.height,
            layers = description.layers.len(),
            tile_images = tile_images.len(),
            "tilemap_built"
        );

        Self {
            width_tiles: description.width,
            height_tiles: description.height,
            tile_width: description.tile_width,
            tile_height: description.tile_height,
            layers: description.layers,
            tile_images,
        }
    }

    /// World width in pixels.
    pub fn width(&self) -> u32 {
        self.width_tiles.saturating_mul(self.tile_width)
    }

    /// World height in pixels.
    pub fn height(&self) -> u32 {
        self.height_tiles.saturating_mul(self.tile_height)
    }

    pub fn tile_size(&self) -> (u32, u32) {
        (self.tile_width, self.tile_height)
    }

    pub fn layers(&self) -> &[LayerDescription] {
        &self.layers
    }

    pub fn tile_image(&self, gid: u32) -> Option<&ImageRegion> {
        if gid == EMPTY_GID {
            return None;
        }
        self.tile_images.get(&gid)
    }

    /// Draws visible layers in file order, each cell at its grid position minus the offset.
    pub fn draw(&self, target: &mut dyn RenderTarget, offset_x: f32, offset_y: f32) {
        for layer in self.layers.iter().filter(|layer| layer.visible) {
            for tile_y in 0..self.height_tiles {
                for tile_x in 0..self.width_tiles {
                    let index = (tile_y * self.width_tiles + tile_x) as usize;
                    let Some(&gid) = layer.tiles.get(index) else {
                        continue;
                    };
                    let Some(image) = self.tile_image(gid) else {
                        continue;
                    };
                    let mut params = DrawParams::at(
                        (tile_x * self.tile_width) as f32 - offset_x,
                        (tile_y * self.tile_height) as f32 - offset_y,
                    );
                    if layer.opacity < 1.0 {
                        params = params.scale_alpha(layer.opacity);
                    }
                    target.draw_image(image, &params);
                }
            }
        }
    }
}
