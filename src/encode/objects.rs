//! Actor and area object groups.
//!
//! Each group is a big-endian count word followed by one fixed-layout record
//! per object. A group that is missing or has no objects is just `00 00`.

use std::io::Write;

use binrw::binwrite;
use log::{debug, info};
use serde::Serialize;

use super::{Emitter, OverflowGuard};
use crate::classify::{self, AreaKind, Direction};
use crate::error::{ExportError, Result};
use crate::model::{MapObject, TileMap};
use crate::schema::{ActorFieldSet, SchemaConfig, AREA_GROUP};

#[binwrite]
#[bw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActorRecord {
    pub kind: u8,
    pub index: Option<u8>,
    pub param: Option<u8>,
    pub direction: Direction,
    pub x: u16,
    pub y: u16,
}

#[binwrite]
#[bw(big)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaRecord {
    pub kind: AreaKind,
    pub level: u16,
    pub start_x: u16,
    pub start_y: u16,
    pub direction: Direction,
    pub x: u16,
    pub y: u16,
    pub width: u16,
    pub height: u16,
}

/// What was written for one object group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStats {
    pub name: &'static str,
    /// Whether a group with that name exists in the map.
    pub found: bool,
    pub records: u32,
}

/// Integer part of a pixel coordinate, wrapped to 16 bits.
fn coord(value: f32) -> u16 {
    value as i32 as u16
}

fn numeric(obj: &MapObject, key: &str) -> i64 {
    obj.properties.numeric(key).unwrap_or(0)
}

fn direction(obj: &MapObject) -> Direction {
    classify::direction(&obj.properties.literal("direction").unwrap_or_default())
}

/// The object's own type field, or its `type` property when that is empty.
fn kind_name(obj: &MapObject) -> String {
    if !obj.kind.is_empty() {
        return obj.kind.clone();
    }
    obj.properties
        .literal("type")
        .map(|name| name.into_owned())
        .unwrap_or_default()
}

/// Legacy actor type: anything starting with a number passes through,
/// other names are classified.
fn basic_actor_kind(obj: &MapObject, schema: &SchemaConfig) -> i64 {
    match obj.properties.numeric("type") {
        Some(n) => n,
        None => {
            let name = obj.properties.literal("type").unwrap_or_default();
            classify::actor_kind(&name, schema.actor_kinds).code() as i64
        }
    }
}

fn byte_field(guard: &mut OverflowGuard, field: &'static str, value: i64) -> Result<u8> {
    guard.check(field, value, u8::MAX as i64)?;
    Ok(value as u8)
}

pub fn actor_record(
    obj: &MapObject,
    schema: &SchemaConfig,
    guard: &mut OverflowGuard,
) -> Result<ActorRecord> {
    let (kind, index, param) = match schema.actor_fields {
        ActorFieldSet::Basic => {
            let kind = basic_actor_kind(obj, schema);
            (byte_field(guard, "actor_type", kind)?, None, None)
        }
        ActorFieldSet::Indexed => (
            classify::actor_kind(&kind_name(obj), schema.actor_kinds).code(),
            Some(byte_field(guard, "actor_index", numeric(obj, "index"))?),
            Some(byte_field(guard, "actor_param", numeric(obj, "param"))?),
        ),
    };

    let record = ActorRecord {
        kind,
        index,
        param,
        direction: direction(obj),
        x: coord(obj.x),
        y: coord(obj.y),
    };
    debug!(
        "actor: {} type={} dir={} x={} y={}",
        obj.name,
        record.kind,
        record.direction.code(),
        record.x,
        record.y
    );
    Ok(record)
}

pub fn area_record(obj: &MapObject, schema: &SchemaConfig) -> AreaRecord {
    let record = AreaRecord {
        kind: classify::area_kind(&kind_name(obj), schema.area_kinds),
        level: numeric(obj, "level") as u16,
        start_x: numeric(obj, "start_x") as u16,
        start_y: numeric(obj, "start_y") as u16,
        direction: direction(obj),
        x: coord(obj.x),
        y: coord(obj.y),
        width: coord(obj.width),
        height: coord(obj.height),
    };
    debug!(
        "area: {} type={} level={} start={},{} dir={} at {},{} size {}x{}",
        obj.name,
        record.kind.code(),
        record.level,
        record.start_x,
        record.start_y,
        record.direction.code(),
        record.x,
        record.y,
        record.width,
        record.height
    );
    record
}

/// Write the count word and records for the group named `name`.
fn encode_group<W, F>(
    out: &mut Emitter<W>,
    map: &TileMap,
    name: &'static str,
    guard: &mut OverflowGuard,
    mut write_one: F,
) -> Result<GroupStats>
where
    W: Write,
    F: FnMut(&mut Emitter<W>, &MapObject, &mut OverflowGuard) -> Result<()>,
{
    let Some(group) = map.object_group(name) else {
        info!("Object group '{}' not found", name);
        out.write_word(0)?;
        return Ok(GroupStats {
            name,
            found: false,
            records: 0,
        });
    };

    let count = group.objects.len();
    info!("Number of {}: {}", name, count);
    // a truncated count would desynchronize every following record
    if count > u16::MAX as usize {
        return Err(ExportError::Overflow {
            field: "object_count",
            value: count as i64,
            max: u16::MAX as i64,
        });
    }
    out.write_word(count as u16)?;
    for obj in &group.objects {
        write_one(out, obj, guard)?;
    }

    Ok(GroupStats {
        name,
        found: true,
        records: count as u32,
    })
}

pub fn encode_actor_group<W: Write>(
    out: &mut Emitter<W>,
    map: &TileMap,
    schema: &SchemaConfig,
    guard: &mut OverflowGuard,
) -> Result<GroupStats> {
    let name = schema.actor_group.group_name();
    encode_group(out, map, name, guard, |out, obj, guard| {
        out.write_record(&actor_record(obj, schema, guard)?)
    })
}

pub fn encode_area_group<W: Write>(
    out: &mut Emitter<W>,
    map: &TileMap,
    schema: &SchemaConfig,
    guard: &mut OverflowGuard,
) -> Result<GroupStats> {
    encode_group(out, map, AREA_GROUP, guard, |out, obj, _| {
        out.write_record(&area_record(obj, schema))
    })
}
