//! Tile table: a slot count followed by one record per tileset slot.
//!
//! Record layout: type byte, then a big-endian mask word when the schema has
//! masks. Slots without authored metadata are zero-filled.

use std::io::Write;

use binrw::binwrite;
use log::{debug, info};

use super::{Emitter, OverflowGuard};
use crate::classify::{self, TileType, MAX_BACKGROUND_REF};
use crate::error::{PreconditionError, Result};
use crate::model::{TileMetadata, Tileset};
use crate::schema::{FieldWidth, SchemaConfig};

#[binwrite]
#[bw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TileRecord {
    pub type_byte: u8,
    pub mask: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileTableStats {
    /// Number of slots written.
    pub tile_count: u32,
    /// Slots that resolved to a tile type other than none.
    pub classified: u32,
}

/// Resolve one slot's record from its authored metadata, if any.
pub fn tile_record(
    tile: Option<&TileMetadata>,
    schema: &SchemaConfig,
    guard: &mut OverflowGuard,
) -> Result<TileRecord> {
    let mask = schema.has_mask.then_some(0u16);
    let Some(tile) = tile else {
        return Ok(TileRecord { type_byte: 0, mask });
    };

    let props = &tile.properties;
    let type_name = props
        .literal("type")
        .map(|name| name.into_owned())
        .unwrap_or_else(|| tile.kind.clone());
    let tile_type = classify::tile_type(&type_name);

    let mut type_byte = tile_type.code();
    if tile_type == TileType::Overlay {
        let bg = props.numeric("bg_tile").unwrap_or(0);
        guard.check("bg_tile", bg, MAX_BACKGROUND_REF)?;
        type_byte |= (bg as u8) << 1;
    }

    let mask = match mask {
        Some(_) => {
            let value = props.hex("mask").unwrap_or(0);
            guard.check("mask", value, u16::MAX as i64)?;
            Some(value as u16)
        }
        None => None,
    };

    debug!("tile: {} {}(0x{:x})", tile.id, type_name, type_byte);
    Ok(TileRecord { type_byte, mask })
}

pub fn encode_tile_table<W: Write>(
    out: &mut Emitter<W>,
    tileset: &Tileset,
    schema: &SchemaConfig,
    guard: &mut OverflowGuard,
) -> Result<TileTableStats> {
    let tile_count = tileset.slot_count().ok_or_else(|| {
        if tileset.image_size.is_none() {
            PreconditionError::TilesetWithoutImage(tileset.name.clone())
        } else {
            PreconditionError::ZeroTileSize(tileset.name.clone())
        }
    })?;
    info!("Number of tiles: {}", tile_count);

    let width = schema.tile_count_width;
    guard.check("tile_count", tile_count as i64, width.max_value() as i64)?;
    match width {
        FieldWidth::Byte => out.write_byte(tile_count as u8)?,
        FieldWidth::Word => out.write_word(tile_count as u16)?,
    }

    let authored = tileset.tiles_by_id();
    let mut classified = 0;
    for slot in 0..tile_count {
        let record = tile_record(authored.get(&slot).copied(), schema, guard)?;
        if record.type_byte != 0 {
            classified += 1;
        }
        out.write_record(&record)?;
    }

    Ok(TileTableStats {
        tile_count,
        classified,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExportError;
    use crate::model::PropertyBag;
    use crate::schema::OverflowPolicy;

    fn tile(id: u32, props: PropertyBag) -> TileMetadata {
        TileMetadata::new(id, props)
    }

    fn encode(tileset: &Tileset, schema: &SchemaConfig) -> (Vec<u8>, TileTableStats) {
        let mut out = Emitter::new(Vec::new());
        let mut guard = OverflowGuard::new(schema.overflow);
        let stats = encode_tile_table(&mut out, tileset, schema, &mut guard).unwrap();
        (out.into_inner(), stats)
    }

    #[test]
    fn test_every_slot_gets_a_record() {
        let ts = Tileset::new("t", 64, 48, 16, 16)
            .with_tile(tile(3, PropertyBag::new().with_literal("type", "floor")));
        let (bytes, stats) = encode(&ts, &SchemaConfig::classic());
        assert_eq!(stats.tile_count, 12);
        assert_eq!(stats.classified, 1);
        assert_eq!(bytes.len(), 1 + 12);
        assert_eq!(bytes[0], 12);
        assert_eq!(bytes[1 + 3], TileType::Floor.code());
        assert!(bytes[1..].iter().enumerate().all(|(i, &b)| i == 3 || b == 0));
    }

    #[test]
    fn test_overlay_packs_background_reference() {
        let props = PropertyBag::new()
            .with_literal("type", "overlay")
            .with_literal("bg_tile", "5");
        let mut guard = OverflowGuard::default();
        let record = tile_record(Some(&tile(0, props)), &SchemaConfig::classic(), &mut guard).unwrap();
        assert_eq!(record.type_byte, TileType::Overlay.code() | (5 << 1));
        assert_eq!(record.type_byte, 0x0B);
        assert_eq!(record.mask, None);
    }

    #[test]
    fn test_background_reference_only_for_overlay() {
        let props = PropertyBag::new()
            .with_literal("type", "metal")
            .with_numeric("bg_tile", 9);
        let mut guard = OverflowGuard::default();
        let record = tile_record(Some(&tile(0, props)), &SchemaConfig::classic(), &mut guard).unwrap();
        assert_eq!(record.type_byte, TileType::Metal.code());
    }

    #[test]
    fn test_background_overflow_policy() {
        let props = PropertyBag::new()
            .with_literal("type", "overlay")
            .with_numeric("bg_tile", 200);
        let t = tile(0, props);

        let mut guard = OverflowGuard::new(OverflowPolicy::Truncate);
        let record = tile_record(Some(&t), &SchemaConfig::classic(), &mut guard).unwrap();
        assert_eq!(record.type_byte, 0x91);
        assert_eq!(guard.truncated()["bg_tile"], 1);

        let mut guard = OverflowGuard::new(OverflowPolicy::Reject);
        let err = tile_record(Some(&t), &SchemaConfig::classic(), &mut guard).unwrap_err();
        assert!(matches!(err, ExportError::Overflow { field: "bg_tile", .. }));
    }

    #[test]
    fn test_mask_schema_writes_words() {
        let ts = Tileset::new("t", 32, 16, 16, 16)
            .with_tile(tile(
                1,
                PropertyBag::new()
                    .with_literal("type", "rock")
                    .with_literal("mask", "0x8001"),
            ));
        let (bytes, stats) = encode(&ts, &SchemaConfig::masked());
        assert_eq!(stats.tile_count, 2);
        assert_eq!(bytes, vec![0x00, 0x02, 0x00, 0x00, 0x00, 0x04, 0x80, 0x01]);
    }

    #[test]
    fn test_mask_without_classification() {
        let props = PropertyBag::new().with_literal("mask", "ff");
        let mut guard = OverflowGuard::default();
        let record = tile_record(Some(&tile(0, props)), &SchemaConfig::masked(), &mut guard).unwrap();
        assert_eq!(record, TileRecord { type_byte: 0, mask: Some(0xff) });
    }

    #[test]
    fn test_tile_class_used_when_property_missing() {
        let mut t = tile(0, PropertyBag::new());
        t.kind = "special_2".to_string();
        let mut guard = OverflowGuard::default();
        let record = tile_record(Some(&t), &SchemaConfig::classic(), &mut guard).unwrap();
        assert_eq!(record.type_byte, TileType::Special2.code());
    }

    #[test]
    fn test_byte_count_truncates() {
        let ts = Tileset::new("big", 16 * 20, 16 * 13, 16, 16);
        let (bytes, stats) = encode(&ts, &SchemaConfig::classic());
        assert_eq!(stats.tile_count, 260);
        assert_eq!(bytes[0], 4);
        assert_eq!(bytes.len(), 1 + 260);
    }

    #[test]
    fn test_word_count() {
        let ts = Tileset::new("big", 16 * 20, 16 * 13, 16, 16);
        let (bytes, _) = encode(&ts, &SchemaConfig::layered());
        assert_eq!(&bytes[..2], &[0x01, 0x04]);
        assert_eq!(bytes.len(), 2 + 260);
    }

    #[test]
    fn test_missing_image_is_precondition() {
        let mut ts = Tileset::new("collection", 0, 0, 16, 16);
        ts.image_size = None;
        let mut out = Emitter::new(Vec::new());
        let mut guard = OverflowGuard::default();
        let err = encode_tile_table(&mut out, &ts, &SchemaConfig::classic(), &mut guard).unwrap_err();
        assert!(matches!(
            err,
            ExportError::Precondition(PreconditionError::TilesetWithoutImage(_))
        ));
    }
}
