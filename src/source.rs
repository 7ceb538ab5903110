//! TMX loading.
//!
//! Parses a Tiled map with the `tiled` crate and copies what the binary format
//! needs into the [`crate::model`] types.

use std::path::Path;

use log::{debug, info};

use crate::error::{ExportError, Result, SOURCE_COULDNT_OPEN, SOURCE_PARSING_ERROR};
use crate::model::{
    MapObject, ObjectGroup, Orientation, PropertyBag, PropertyValue, TileLayer, TileMap,
    TileMetadata, Tileset,
};

impl From<tiled::Error> for ExportError {
    fn from(err: tiled::Error) -> Self {
        let code = match &err {
            tiled::Error::ResourceLoadingError { .. } => SOURCE_COULDNT_OPEN,
            _ => SOURCE_PARSING_ERROR,
        };
        ExportError::Source {
            code,
            message: err.to_string(),
        }
    }
}

/// Load a TMX map from disk.
pub fn load_map(path: &Path) -> Result<TileMap> {
    info!("converting file {}", path.display());
    let mut loader = tiled::Loader::new();
    let map = loader.load_tmx_map(path)?;
    debug!("map version: {}", map.version());
    Ok(convert_map(&map))
}

fn convert_map(map: &tiled::Map) -> TileMap {
    let mut out = TileMap::new(map.width, map.height, map.tile_width, map.tile_height);
    out.orientation = match map.orientation {
        tiled::Orientation::Orthogonal => Orientation::Orthogonal,
        tiled::Orientation::Isometric => Orientation::Isometric,
        tiled::Orientation::Staggered => Orientation::Staggered,
        tiled::Orientation::Hexagonal => Orientation::Hexagonal,
    };
    out.infinite = map.infinite();
    out.tilesets = map.tilesets().iter().map(|ts| convert_tileset(ts)).collect();

    for layer in map.layers() {
        match layer.layer_type() {
            tiled::LayerType::Tiles(tiled::TileLayer::Finite(tiles)) => {
                out.layers.push(convert_tile_layer(&layer.name, &tiles));
            }
            tiled::LayerType::Objects(objects) => {
                let objects = objects.objects().map(|obj| convert_object(&obj)).collect();
                out.object_groups.push(ObjectGroup::new(layer.name.clone(), objects));
            }
            _ => {}
        }
    }

    out
}

fn convert_tile_layer(name: &str, layer: &tiled::FiniteTileLayer) -> TileLayer {
    let (width, height) = (layer.width(), layer.height());
    let mut cells = Vec::with_capacity(width as usize * height as usize);
    for y in 0..height {
        for x in 0..width {
            let id = layer
                .get_tile(x as i32, y as i32)
                .map(|tile| tile.id())
                .unwrap_or(0);
            cells.push(id);
        }
    }
    TileLayer::new(name, width, height, cells)
}

fn convert_tileset(tileset: &tiled::Tileset) -> Tileset {
    let tiles = tileset
        .tiles()
        .map(|(id, tile)| TileMetadata {
            id,
            kind: tile.user_type.clone().unwrap_or_default(),
            properties: convert_properties(&tile.properties),
        })
        .collect();

    Tileset {
        name: tileset.name.clone(),
        image_size: tileset
            .image
            .as_ref()
            .map(|image| (image.width.max(0) as u32, image.height.max(0) as u32)),
        tile_width: tileset.tile_width,
        tile_height: tileset.tile_height,
        tiles,
    }
}

fn convert_object(obj: &tiled::Object) -> MapObject {
    let (width, height) = match obj.shape {
        tiled::ObjectShape::Rect { width, height }
        | tiled::ObjectShape::Ellipse { width, height } => (width, height),
        _ => (0.0, 0.0),
    };
    MapObject {
        id: obj.id(),
        name: obj.name.clone(),
        kind: obj.user_type.clone(),
        x: obj.x,
        y: obj.y,
        width,
        height,
        properties: convert_properties(&obj.properties),
    }
}

fn convert_properties(properties: &tiled::Properties) -> PropertyBag {
    properties
        .iter()
        .filter_map(|(key, value)| Some((key.clone(), convert_value(value)?)))
        .collect()
}

fn convert_value(value: &tiled::PropertyValue) -> Option<PropertyValue> {
    Some(match value {
        tiled::PropertyValue::StringValue(s) | tiled::PropertyValue::FileValue(s) => {
            PropertyValue::Literal(s.clone())
        }
        tiled::PropertyValue::IntValue(i) => PropertyValue::Numeric(*i as i64),
        tiled::PropertyValue::ObjectValue(id) => PropertyValue::Numeric(*id as i64),
        tiled::PropertyValue::FloatValue(f) => PropertyValue::Numeric(*f as i64),
        tiled::PropertyValue::BoolValue(b) => PropertyValue::Literal(b.to_string()),
        _ => return None,
    })
}

// ============================================================================
// Tests
// ============================================================================
