//! One export run: source map in, binary map file out.
//!
//! Sections are written in a fixed order: tile table, map size, layer grids,
//! actor group, area group. Every precondition is checked before the sink is
//! opened, so a rejected map never leaves an output file behind.

use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use log::info;
use serde::Serialize;

use crate::encode::grid::{encode_grids, selected_layers};
use crate::encode::objects::{encode_actor_group, encode_area_group, GroupStats};
use crate::encode::tiles::encode_tile_table;
use crate::encode::{Emitter, OverflowGuard};
use crate::error::{ExportError, PreconditionError, Result};
use crate::model::{Orientation, TileMap};
use crate::schema::{SchemaConfig, Traversal};
use crate::source;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub schema: String,
    pub tile_count: u32,
    /// Tile slots with a type other than none.
    pub classified_tiles: u32,
    pub map_width: u32,
    pub map_height: u32,
    pub layers: usize,
    pub traversal: Traversal,
    /// Bytes per grid cell.
    pub cell_width: usize,
    pub actors: GroupStats,
    pub areas: GroupStats,
    /// Out-of-range values that were truncated, per field.
    pub truncated: BTreeMap<&'static str, u64>,
    pub bytes_written: u64,
}

/// Reject maps the binary format cannot represent.
pub fn check_preconditions(map: &TileMap, schema: &SchemaConfig) -> Result<()> {
    if map.orientation != Orientation::Orthogonal {
        return Err(PreconditionError::NotOrthogonal.into());
    }
    if map.infinite {
        return Err(PreconditionError::Infinite.into());
    }

    let tileset = map.tilesets.first().ok_or(PreconditionError::NoTileset)?;
    if tileset.image_size.is_none() {
        return Err(PreconditionError::TilesetWithoutImage(tileset.name.clone()).into());
    }
    if tileset.tile_width == 0 || tileset.tile_height == 0 {
        return Err(PreconditionError::ZeroTileSize(tileset.name.clone()).into());
    }

    for layer in selected_layers(map, schema)? {
        if layer.width != map.width || layer.height != map.height {
            return Err(PreconditionError::LayerSizeMismatch {
                name: layer.name.clone(),
                width: layer.width,
                height: layer.height,
                map_width: map.width,
                map_height: map.height,
            }
            .into());
        }
    }
    Ok(())
}

/// Encode `map` into `writer`. Nothing is written if a precondition fails.
pub fn encode<W: Write>(map: &TileMap, schema: &SchemaConfig, writer: W) -> Result<ExportSummary> {
    check_preconditions(map, schema)?;
    write_map(map, schema, writer)
}

/// Write every section of an already checked map.
fn write_map<W: Write>(map: &TileMap, schema: &SchemaConfig, writer: W) -> Result<ExportSummary> {
    let mut out = Emitter::new(writer);
    let mut guard = OverflowGuard::new(schema.overflow);

    let tileset = &map.tilesets[0];
    let tiles = encode_tile_table(&mut out, tileset, schema, &mut guard)?;
    let layers = encode_grids(&mut out, map, schema, &mut guard)?;
    if map.object_groups.is_empty() {
        info!("No object group(s) defined");
    } else {
        info!("Found {} object group(s)", map.object_groups.len());
    }
    let actors = encode_actor_group(&mut out, map, schema, &mut guard)?;
    let areas = encode_area_group(&mut out, map, schema, &mut guard)?;
    out.flush()?;

    guard.warn_truncations();
    Ok(ExportSummary {
        schema: schema.name.clone(),
        tile_count: tiles.tile_count,
        classified_tiles: tiles.classified,
        map_width: map.width,
        map_height: map.height,
        layers,
        traversal: schema.traversal,
        cell_width: schema.cell_width.bytes(),
        actors,
        areas,
        truncated: guard.truncated().clone(),
        bytes_written: out.written(),
    })
}

pub fn encode_to_vec(map: &TileMap, schema: &SchemaConfig) -> Result<(Vec<u8>, ExportSummary)> {
    let mut bytes = Vec::new();
    let summary = encode(map, schema, &mut bytes)?;
    Ok((bytes, summary))
}

/// Write `map` to a file at `output`.
pub fn export_to_path(map: &TileMap, schema: &SchemaConfig, output: &Path) -> Result<ExportSummary> {
    check_preconditions(map, schema)?;

    let file = File::create(output).map_err(|e| ExportError::sink(output, e))?;
    let summary = write_map(map, schema, BufWriter::new(file)).map_err(|e| match e {
        ExportError::Write(binrw::Error::Io(io)) => ExportError::sink(output, io),
        other => other,
    })?;

    info!("Wrote {} bytes to {}", summary.bytes_written, output.display());
    Ok(summary)
}

/// Load `source` and write its binary form to `output`.
pub fn export_file(source: &Path, output: &Path, schema: &SchemaConfig) -> Result<ExportSummary> {
    let map = source::load_map(source)?;
    export_to_path(&map, schema, output)
}

// ============================================================================
// Tests
// ============================================================================
