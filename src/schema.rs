//! Binary layout variants.
//!
//! A [`SchemaConfig`] fully determines the byte layout of one export run. The
//! three presets cover the layouts the runtime understands; a JSON file can
//! describe any other combination.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

pub use crate::classify::{ActorKindSet, AreaKindSet};

/// Width of a count or cell field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum FieldWidth {
    Byte,
    Word,
}

impl FieldWidth {
    pub fn bytes(self) -> usize {
        match self {
            FieldWidth::Byte => 1,
            FieldWidth::Word => 2,
        }
    }

    /// Largest value the field can hold.
    pub fn max_value(self) -> u32 {
        match self {
            FieldWidth::Byte => u8::MAX as u32,
            FieldWidth::Word => u16::MAX as u32,
        }
    }
}

impl TryFrom<u8> for FieldWidth {
    type Error = String;

    fn try_from(width: u8) -> std::result::Result<Self, Self::Error> {
        match width {
            1 => Ok(FieldWidth::Byte),
            2 => Ok(FieldWidth::Word),
            other => Err(format!("field width must be 1 or 2 bytes, got {}", other)),
        }
    }
}

impl From<FieldWidth> for u8 {
    fn from(width: FieldWidth) -> u8 {
        width.bytes() as u8
    }
}

/// Which tile layers are written after the map size.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LayerSelection {
    First,
    All,
}

/// Cell order inside one layer grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Traversal {
    /// y outer, x inner.
    #[default]
    RowMajor,
    /// x outer, y inner.
    ColumnMajor,
}

impl fmt::Display for Traversal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Traversal::RowMajor => write!(f, "row-major"),
            Traversal::ColumnMajor => write!(f, "column-major"),
        }
    }
}

/// Name of the object group holding actors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorGroupRole {
    Enemies,
    Objects,
}

impl ActorGroupRole {
    pub fn group_name(self) -> &'static str {
        match self {
            ActorGroupRole::Enemies => "enemies",
            ActorGroupRole::Objects => "objects",
        }
    }
}

/// Name of the object group holding areas.
pub const AREA_GROUP: &str = "areas";

/// Field layout of one actor record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorFieldSet {
    /// type, direction, x, y. Type comes from the `type` property; numbers
    /// are written as-is.
    Basic,
    /// type, index, param, direction, x, y. Type comes from the object's own
    /// type field.
    Indexed,
}

/// What to do with values that do not fit their field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OverflowPolicy {
    /// Keep the low bits and log a warning.
    #[default]
    Truncate,
    /// Abort the export.
    Reject,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaConfig {
    #[serde(default = "default_name")]
    pub name: String,
    pub cell_width: FieldWidth,
    pub tile_count_width: FieldWidth,
    pub has_mask: bool,
    pub layers: LayerSelection,
    #[serde(default)]
    pub traversal: Traversal,
    pub actor_group: ActorGroupRole,
    pub actor_fields: ActorFieldSet,
    #[serde(default)]
    pub actor_kinds: ActorKindSet,
    #[serde(default)]
    pub area_kinds: AreaKindSet,
    #[serde(default)]
    pub overflow: OverflowPolicy,
}

fn default_name() -> String {
    "custom".to_string()
}

/// Named presets accepted by `--schema`.
pub const PRESET_NAMES: [&str; 3] = ["classic", "layered", "masked"];

impl SchemaConfig {
    /// The single-layer legacy layout: byte cells, byte tile count,
    /// "enemies" group with basic actor records.
    pub fn classic() -> Self {
        Self {
            name: "classic".to_string(),
            cell_width: FieldWidth::Byte,
            tile_count_width: FieldWidth::Byte,
            has_mask: false,
            layers: LayerSelection::First,
            traversal: Traversal::RowMajor,
            actor_group: ActorGroupRole::Enemies,
            actor_fields: ActorFieldSet::Basic,
            actor_kinds: ActorKindSet::Enemy,
            area_kinds: AreaKindSet::Door,
            overflow: OverflowPolicy::Truncate,
        }
    }

    /// Multi-layer layout with word cells and indexed "objects" records.
    pub fn layered() -> Self {
        Self {
            name: "layered".to_string(),
            cell_width: FieldWidth::Word,
            tile_count_width: FieldWidth::Word,
            has_mask: false,
            layers: LayerSelection::All,
            traversal: Traversal::RowMajor,
            actor_group: ActorGroupRole::Objects,
            actor_fields: ActorFieldSet::Indexed,
            actor_kinds: ActorKindSet::All,
            area_kinds: AreaKindSet::DoorAndDamage,
            overflow: OverflowPolicy::Truncate,
        }
    }

    /// `layered` plus a 2-byte mask word in every tile record.
    pub fn masked() -> Self {
        Self {
            name: "masked".to_string(),
            has_mask: true,
            ..Self::layered()
        }
    }

    pub fn preset(name: &str) -> Option<Self> {
        match name {
            "classic" => Some(Self::classic()),
            "layered" => Some(Self::layered()),
            "masked" => Some(Self::masked()),
            _ => None,
        }
    }

    /// Load a schema description from a JSON file.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read schema file: {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("Failed to parse schema file: {}", path.display()))
    }

    pub fn with_cell_width(mut self, width: FieldWidth) -> Self {
        self.cell_width = width;
        self
    }

    pub fn with_traversal(mut self, traversal: Traversal) -> Self {
        self.traversal = traversal;
        self
    }

    pub fn with_overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }
}

impl Default for SchemaConfig {
    fn default() -> Self {
        Self::classic()
    }
}

impl FromStr for SchemaConfig {
    type Err = anyhow::Error;

    fn from_str(name: &str) -> Result<Self> {
        Self::preset(name).ok_or_else(|| {
            anyhow!(
                "Unknown schema '{}', expected one of {}",
                name,
                PRESET_NAMES.join(", ")
            )
        })
    }
}

// ============================================================================
// Tests
// ============================================================================
