//! Map size and layer grids.
//!
//! Map width and height are written as big-endian words, followed by every
//! selected layer's cells in the schema's traversal order. Cell values are raw
//! tile ids at the schema's cell width.

use std::io::Write;

use log::info;

use super::{Emitter, OverflowGuard};
use crate::error::{PreconditionError, Result};
use crate::model::{TileLayer, TileMap};
use crate::schema::{FieldWidth, LayerSelection, SchemaConfig, Traversal};

/// Cell coordinates `(x, y)` of a `width × height` grid in traversal order.
pub fn cell_order(
    width: u32,
    height: u32,
    traversal: Traversal,
) -> impl Iterator<Item = (u32, u32)> {
    let (outer, inner) = match traversal {
        Traversal::RowMajor => (height, width),
        Traversal::ColumnMajor => (width, height),
    };
    (0..outer).flat_map(move |o| {
        (0..inner).map(move |i| match traversal {
            Traversal::RowMajor => (i, o),
            Traversal::ColumnMajor => (o, i),
        })
    })
}

/// Layers the schema exports, in document order.
pub fn selected_layers<'a>(map: &'a TileMap, schema: &SchemaConfig) -> Result<&'a [TileLayer]> {
    if map.layers.is_empty() {
        return Err(PreconditionError::NoLayer.into());
    }
    Ok(match schema.layers {
        LayerSelection::First => &map.layers[..1],
        LayerSelection::All => &map.layers[..],
    })
}

pub fn encode_layer<W: Write>(
    out: &mut Emitter<W>,
    layer: &TileLayer,
    schema: &SchemaConfig,
    guard: &mut OverflowGuard,
) -> Result<()> {
    let max = schema.cell_width.max_value() as i64;
    for (x, y) in cell_order(layer.width, layer.height, schema.traversal) {
        let tile_id = layer.tile_id(x, y);
        guard.check("tile_id", tile_id as i64, max)?;
        match schema.cell_width {
            FieldWidth::Byte => out.write_byte(tile_id as u8)?,
            FieldWidth::Word => out.write_word(tile_id as u16)?,
        }
    }
    Ok(())
}

/// Write the map size and all selected layer grids. Returns the number of
/// layers written. Layer sizes are assumed to match the map.
pub fn encode_grids<W: Write>(
    out: &mut Emitter<W>,
    map: &TileMap,
    schema: &SchemaConfig,
    guard: &mut OverflowGuard,
) -> Result<usize> {
    let layers = selected_layers(map, schema)?;

    info!("Map size: {}x{}", map.width, map.height);
    guard.check("map_width", map.width as i64, u16::MAX as i64)?;
    guard.check("map_height", map.height as i64, u16::MAX as i64)?;
    out.write_word(map.width as u16)?;
    out.write_word(map.height as u16)?;

    info!(
        "Writing {} layer(s), {} cells, {} byte(s) per cell",
        layers.len(),
        schema.traversal,
        schema.cell_width.bytes()
    );
    for layer in layers {
        encode_layer(out, layer, schema, guard)?;
    }

    Ok(layers.len())
}
