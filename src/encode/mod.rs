pub mod emitter;
pub mod grid;
pub mod objects;
pub mod tiles;

use std::collections::BTreeMap;

use log::warn;

use crate::error::{ExportError, Result};
use crate::schema::OverflowPolicy;

pub use emitter::Emitter;

/// Applies the schema's overflow policy to values headed for narrow fields.
///
/// In truncate mode the number of out-of-range values is tallied per field so
/// a run reports them once instead of per cell.
#[derive(Debug, Default)]
pub struct OverflowGuard {
    policy: OverflowPolicy,
    truncated: BTreeMap<&'static str, u64>,
}

impl OverflowGuard {
    pub fn new(policy: OverflowPolicy) -> Self {
        Self {
            policy,
            truncated: BTreeMap::new(),
        }
    }

    /// Check `value` against `0..=max`.
    pub fn check(&mut self, field: &'static str, value: i64, max: i64) -> Result<()> {
        if (0..=max).contains(&value) {
            return Ok(());
        }
        match self.policy {
            OverflowPolicy::Reject => Err(ExportError::Overflow { field, value, max }),
            OverflowPolicy::Truncate => {
                *self.truncated.entry(field).or_insert(0) += 1;
                Ok(())
            }
        }
    }

    pub fn truncated(&self) -> &BTreeMap<&'static str, u64> {
        &self.truncated
    }

    pub fn warn_truncations(&self) {
        for (field, count) in &self.truncated {
            warn!("{} {} value(s) out of range were truncated", count, field);
        }
    }
}
