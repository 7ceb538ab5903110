// Common test utilities and helpers
#![allow(dead_code)]

use std::path::PathBuf;

/// Path to a TMX map under tests/fixtures
pub fn fixture(filename: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests/fixtures");
    path.push(filename);

    assert!(path.exists(), "Test fixture not found: {}", path.display());
    path
}

/// Space-separated lowercase hex, e.g. `04 00 0a`
pub fn hex_dump(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect::<Vec<_>>()
        .join(" ")
}

/// A minimal 2x1 TMX document with the given orientation.
pub fn tmx_with_orientation(orientation: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<map version="1.10" orientation="{}" renderorder="right-down" width="2" height="1" tilewidth="16" tileheight="16" infinite="0" nextlayerid="2" nextobjectid="1">
 <tileset firstgid="1" name="t" tilewidth="16" tileheight="16" tilecount="4" columns="2">
  <image source="t.png" width="32" height="32"/>
 </tileset>
 <layer id="1" name="ground" width="2" height="1">
  <data encoding="csv">
1,2
</data>
 </layer>
</map>
"#,
        orientation
    )
}
