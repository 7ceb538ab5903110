//! String → enum classifiers for tile, actor, area and direction names.
//!
//! Every classifier is total: names are matched exactly (case-sensitive, no
//! trimming) and anything unrecognized maps to the enum's unknown sentinel.

use std::str::FromStr;

use binrw::BinWrite;
use serde::{Deserialize, Serialize};
use strum::{EnumIter, EnumString};

/// Tile classification stored in the tile table.
///
/// Every kind except `Overlay` keeps bit 0 clear: an overlay tile carries its
/// background tile reference in bits 1-7 of the same byte.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum TileType {
    #[strum(disabled)]
    None = 0x00,
    Overlay = 0x01,
    Floor = 0x02,
    Rock = 0x04,
    Metal = 0x06,
    #[strum(serialize = "special_1")]
    Special1 = 0x08,
    #[strum(serialize = "special_2")]
    Special2 = 0x0A,
}

/// Bit 0 of a tile type byte; set only for overlays.
pub const OVERLAY_FLAG: u8 = TileType::Overlay as u8;

/// Largest background reference that fits beside [`OVERLAY_FLAG`].
pub const MAX_BACKGROUND_REF: i64 = 0x7F;

impl TileType {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Kind of a dynamic gameplay entity in the actor group.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ActorKind {
    #[strum(disabled)]
    Unknown = 0,
    Enemy = 1,
    Item = 2,
    Light = 3,
    Switch = 4,
    Spawn = 5,
}

impl ActorKind {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Which actor kinds a schema recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActorKindSet {
    /// Only "enemy"; the legacy enemies group.
    #[default]
    Enemy,
    All,
}

impl ActorKindSet {
    pub fn contains(self, kind: ActorKind) -> bool {
        match kind {
            ActorKind::Unknown | ActorKind::Enemy => true,
            _ => self == ActorKindSet::All,
        }
    }
}

/// Kind of a trigger region in the area group.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, BinWrite)]
#[bw(repr = u8)]
#[strum(serialize_all = "snake_case")]
pub enum AreaKind {
    #[strum(disabled)]
    Unknown = 0,
    Door = 1,
    Damage = 2,
}

impl AreaKind {
    pub fn code(self) -> u8 {
        self as u8
    }
}

/// Which area kinds a schema recognizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AreaKindSet {
    /// Only doors; "damage" classifies as unknown.
    #[default]
    Door,
    DoorAndDamage,
}

impl AreaKindSet {
    pub fn contains(self, kind: AreaKind) -> bool {
        match kind {
            AreaKind::Unknown | AreaKind::Door => true,
            AreaKind::Damage => self == AreaKindSet::DoorAndDamage,
        }
    }
}

/// Facing direction. The discriminants are the wire codes.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumString, EnumIter, BinWrite)]
#[bw(repr = u8)]
pub enum Direction {
    #[strum(serialize = "N")]
    North = 0,
    #[strum(serialize = "W")]
    West = 1,
    #[strum(serialize = "S")]
    South = 2,
    #[strum(serialize = "E")]
    East = 3,
    #[strum(serialize = "NW")]
    NorthWest = 4,
    #[strum(serialize = "SW")]
    SouthWest = 5,
    #[strum(serialize = "NE")]
    NorthEast = 6,
    #[strum(serialize = "SE")]
    SouthEast = 7,
    #[strum(disabled)]
    Invalid = 8,
}

impl Direction {
    pub fn code(self) -> u8 {
        self as u8
    }
}

pub fn tile_type(name: &str) -> TileType {
    TileType::from_str(name).unwrap_or(TileType::None)
}

pub fn actor_kind(name: &str, set: ActorKindSet) -> ActorKind {
    match ActorKind::from_str(name) {
        Ok(kind) if set.contains(kind) => kind,
        _ => ActorKind::Unknown,
    }
}

pub fn area_kind(name: &str, set: AreaKindSet) -> AreaKind {
    match AreaKind::from_str(name) {
        Ok(kind) if set.contains(kind) => kind,
        _ => AreaKind::Unknown,
    }
}

pub fn direction(name: &str) -> Direction {
    Direction::from_str(name).unwrap_or(Direction::Invalid)
}
