//! Read-only in-memory map model consumed by the encoders.
//!
//! Holds only what the binary format needs. [`crate::source`] fills it from a
//! parsed TMX document.

pub mod properties;

use std::collections::HashMap;

use serde::Serialize;

pub use properties::{PropertyBag, PropertyValue};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Orthogonal,
    Isometric,
    Staggered,
    Hexagonal,
}

/// A whole map as loaded from the source document.
#[derive(Debug, Clone)]
pub struct TileMap {
    pub orientation: Orientation,
    /// Map width in tiles.
    pub width: u32,
    /// Map height in tiles.
    pub height: u32,
    pub tile_width: u32,
    pub tile_height: u32,
    /// True for maps stored as chunks rather than fixed-size layers.
    pub infinite: bool,
    /// Tile layers in document order.
    pub layers: Vec<TileLayer>,
    /// Tilesets in document order. Only the first one is exported.
    pub tilesets: Vec<Tileset>,
    /// Object groups in document order.
    pub object_groups: Vec<ObjectGroup>,
}

impl TileMap {
    /// Empty orthogonal map with the given size in tiles.
    pub fn new(width: u32, height: u32, tile_width: u32, tile_height: u32) -> Self {
        Self {
            orientation: Orientation::Orthogonal,
            width,
            height,
            tile_width,
            tile_height,
            infinite: false,
            layers: Vec::new(),
            tilesets: Vec::new(),
            object_groups: Vec::new(),
        }
    }

    /// First object group whose name matches exactly.
    pub fn object_group(&self, name: &str) -> Option<&ObjectGroup> {
        self.object_groups.iter().find(|g| g.name == name)
    }
}

/// A finite tile layer. Cells hold local tile ids of the first tileset, with
/// 0 for empty cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileLayer {
    pub name: String,
    pub width: u32,
    pub height: u32,
    cells: Vec<u32>,
}

impl TileLayer {
    /// Build a layer from row-major cells. Missing trailing cells read as 0.
    pub fn new(name: impl Into<String>, width: u32, height: u32, cells: Vec<u32>) -> Self {
        Self {
            name: name.into(),
            width,
            height,
            cells,
        }
    }

    /// Build a layer from rows of cells, e.g. `[[1, 2], [3, 4]]`.
    pub fn from_rows<const W: usize>(name: impl Into<String>, rows: &[[u32; W]]) -> Self {
        let cells = rows.iter().flat_map(|r| r.iter().copied()).collect();
        Self::new(name, W as u32, rows.len() as u32, cells)
    }

    pub fn tile_id(&self, x: u32, y: u32) -> u32 {
        if x >= self.width || y >= self.height {
            return 0;
        }
        let idx = y as usize * self.width as usize + x as usize;
        self.cells.get(idx).copied().unwrap_or(0)
    }
}

/// Authored metadata of one tileset tile.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileMetadata {
    pub id: u32,
    /// The tile's own type/class field (empty when unset).
    pub kind: String,
    pub properties: PropertyBag,
}

impl TileMetadata {
    pub fn new(id: u32, properties: PropertyBag) -> Self {
        Self {
            id,
            kind: String::new(),
            properties,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tileset {
    pub name: String,
    /// Source image size in pixels. `None` for image-collection tilesets.
    pub image_size: Option<(u32, u32)>,
    pub tile_width: u32,
    pub tile_height: u32,
    /// Sparse list of tiles that carry authored metadata.
    pub tiles: Vec<TileMetadata>,
}

impl Tileset {
    pub fn new(
        name: impl Into<String>,
        image_width: u32,
        image_height: u32,
        tile_width: u32,
        tile_height: u32,
    ) -> Self {
        Self {
            name: name.into(),
            image_size: Some((image_width, image_height)),
            tile_width,
            tile_height,
            tiles: Vec::new(),
        }
    }

    pub fn with_tile(mut self, tile: TileMetadata) -> Self {
        self.tiles.push(tile);
        self
    }

    /// Number of addressable tile slots: whole tiles across times whole tiles
    /// down. `None` when the slot geometry is undefined.
    pub fn slot_count(&self) -> Option<u32> {
        let (w, h) = self.image_size?;
        if self.tile_width == 0 || self.tile_height == 0 {
            return None;
        }
        Some((w / self.tile_width) * (h / self.tile_height))
    }

    /// Authored tiles keyed by id. The first entry wins for duplicated ids.
    pub fn tiles_by_id(&self) -> HashMap<u32, &TileMetadata> {
        let mut index = HashMap::with_capacity(self.tiles.len());
        for tile in &self.tiles {
            index.entry(tile.id).or_insert(tile);
        }
        index
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ObjectGroup {
    pub name: String,
    pub objects: Vec<MapObject>,
}

impl ObjectGroup {
    pub fn new(name: impl Into<String>, objects: Vec<MapObject>) -> Self {
        Self {
            name: name.into(),
            objects,
        }
    }
}

/// An object placed in an object group. Positions are in pixels.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MapObject {
    pub id: u32,
    pub name: String,
    /// The object's own type/class field (empty when unset).
    pub kind: String,
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub properties: PropertyBag,
}

impl MapObject {
    pub fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = kind.into();
        self
    }

    pub fn with_size(mut self, width: f32, height: f32) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_properties(mut self, properties: PropertyBag) -> Self {
        self.properties = properties;
        self
    }
}
