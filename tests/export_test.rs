// End-to-end export of the TMX fixture through each schema preset.

use std::fs;

use tempfile::TempDir;
use tmx2bin_lib::error::ExportError;
use tmx2bin_lib::export::{self, encode_to_vec};
use tmx2bin_lib::schema::{OverflowPolicy, SchemaConfig, Traversal};
use tmx2bin_lib::source::load_map;

#[path = "common/mod.rs"]
mod common;

use common::{fixture, hex_dump, tmx_with_orientation};

#[test]
fn classic_export_bytes() {
    let map = load_map(&fixture("level.tmx")).expect("Failed to load fixture");
    let (bytes, summary) = encode_to_vec(&map, &SchemaConfig::classic()).unwrap();

    insta::assert_snapshot!(hex_dump(&bytes), @"08 00 04 03 02 00 06 00 00 00 04 00 03 01 01 01 01 01 03 02 01 01 01 01 01 00 01 02 03 00 10 00 20 00 01 01 00 02 00 05 00 06 02 00 00 00 10 00 20 00 10");

    assert_eq!(summary.tile_count, 8);
    assert_eq!(summary.classified_tiles, 4);
    assert_eq!(summary.layers, 1);
    assert_eq!(summary.actors.name, "enemies");
    assert_eq!(summary.actors.records, 1);
    assert_eq!(summary.areas.records, 1);
    assert_eq!(summary.bytes_written, 51);
}

#[test]
fn classic_column_major_grid() {
    let map = load_map(&fixture("level.tmx")).unwrap();
    let schema = SchemaConfig::classic().with_traversal(Traversal::ColumnMajor);
    let (bytes, summary) = encode_to_vec(&map, &schema).unwrap();

    assert_eq!(summary.traversal, Traversal::ColumnMajor);
    // 9 bytes of tile table, 4 bytes of map size
    assert_eq!(
        hex_dump(&bytes[13..25]),
        "01 01 01 01 03 01 01 02 01 01 01 01"
    );
}

#[test]
fn layered_export_writes_every_layer_and_indexed_actors() {
    let map = load_map(&fixture("level.tmx")).unwrap();
    let (bytes, summary) = encode_to_vec(&map, &SchemaConfig::layered()).unwrap();

    assert_eq!(summary.layers, 2);
    assert_eq!(summary.actors.name, "objects");
    assert_eq!(bytes.len(), 2 + 8 + 4 + 24 + 24 + 10 + 18);
    assert_eq!(&bytes[..2], &[0x00, 0x08]);

    // second layer: only (1, 1) holds local tile 5
    let detail = &bytes[2 + 8 + 4 + 24..2 + 8 + 4 + 48];
    assert_eq!(&detail[10..12], &[0x00, 0x05]);
    assert!(detail.iter().enumerate().all(|(i, &b)| i == 11 || b == 0));

    let actors = &bytes[2 + 8 + 4 + 48..2 + 8 + 4 + 48 + 10];
    assert_eq!(hex_dump(actors), "00 01 04 03 01 00 00 30 00 10");
}

#[test]
fn masked_export_carries_mask_words() {
    let map = load_map(&fixture("level.tmx")).unwrap();
    let (bytes, _) = encode_to_vec(&map, &SchemaConfig::masked()).unwrap();

    let table = &bytes[2..2 + 8 * 3];
    insta::assert_snapshot!(hex_dump(table), @"00 00 00 04 00 00 03 00 00 02 00 00 00 00 00 06 0f 0f 00 00 00 00 00 00");
}

#[test]
fn export_file_matches_in_memory_encoding() {
    let tmp = TempDir::new().unwrap();
    let output = tmp.path().join("level.bin");
    let schema = SchemaConfig::classic();

    let summary = export::export_file(&fixture("level.tmx"), &output, &schema).unwrap();
    let written = fs::read(&output).unwrap();

    let map = load_map(&fixture("level.tmx")).unwrap();
    let (expected, _) = encode_to_vec(&map, &schema).unwrap();
    assert_eq!(written, expected);
    assert_eq!(summary.bytes_written, written.len() as u64);
}

#[test]
fn strict_schema_rejects_oversized_ids() {
    let mut map = load_map(&fixture("level.tmx")).unwrap();
    map.layers[0] = tmx2bin_lib::model::TileLayer::new("ground", 4, 3, vec![300; 12]);

    let lenient = SchemaConfig::classic();
    let (_, summary) = encode_to_vec(&map, &lenient).unwrap();
    assert_eq!(summary.truncated.get("tile_id"), Some(&12));

    let strict = SchemaConfig::classic().with_overflow(OverflowPolicy::Reject);
    let err = encode_to_vec(&map, &strict).unwrap_err();
    assert!(matches!(err, ExportError::Overflow { field: "tile_id", .. }));
}

#[test]
fn non_orthogonal_map_leaves_no_output() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("iso.tmx");
    let output = tmp.path().join("iso.bin");
    fs::write(&source, tmx_with_orientation("isometric")).unwrap();

    let err = export::export_file(&source, &output, &SchemaConfig::classic()).unwrap_err();
    assert_eq!(err.to_string(), "error: map orientation must be orthogonal");
    assert_eq!(err.exit_code(), 1);
    assert!(!output.exists());
}

#[test]
fn missing_source_reports_parser_code() {
    let tmp = TempDir::new().unwrap();
    let err = export::export_file(
        &tmp.path().join("nope.tmx"),
        &tmp.path().join("out.bin"),
        &SchemaConfig::classic(),
    )
    .unwrap_err();
    assert_eq!(err.exit_code(), 1);
    assert!(err.to_string().starts_with("error code: 1\nerror text: "));
}
