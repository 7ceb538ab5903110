use std::borrow::Cow;
use std::collections::BTreeMap;

/// A single custom property value.
///
/// Tiled distinguishes many property types; the exporter only cares whether a
/// value is text or a number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PropertyValue {
    Literal(String),
    Numeric(i64),
}

/// Read-only custom properties of a tile or object.
///
/// Lookups never fail; they return `None` when the key is absent and leave the
/// default to the caller.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyBag {
    entries: BTreeMap<String, PropertyValue>,
}

impl PropertyBag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.entries.insert(key.into(), value);
    }

    pub fn with_literal(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(key, PropertyValue::Literal(value.into()));
        self
    }

    pub fn with_numeric(mut self, key: impl Into<String>, value: i64) -> Self {
        self.insert(key, PropertyValue::Numeric(value));
        self
    }

    pub fn get(&self, key: &str) -> Option<&PropertyValue> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Text form of a property. Numeric values are rendered in decimal.
    pub fn literal(&self, key: &str) -> Option<Cow<'_, str>> {
        match self.entries.get(key)? {
            PropertyValue::Literal(s) => Some(Cow::Borrowed(s.as_str())),
            PropertyValue::Numeric(n) => Some(Cow::Owned(n.to_string())),
        }
    }

    /// Numeric form of a property.
    ///
    /// Literals are read like C `atoi`: optional leading whitespace and sign,
    /// then decimal digits up to the first non-digit. A literal without any
    /// leading digits yields `None`.
    pub fn numeric(&self, key: &str) -> Option<i64> {
        match self.entries.get(key)? {
            PropertyValue::Numeric(n) => Some(*n),
            PropertyValue::Literal(s) => parse_leading_int(s),
        }
    }

    /// A property holding a hexadecimal bit pattern, e.g. `"0x00FF"` or `"ff"`.
    ///
    /// Numeric values are taken as-is.
    pub fn hex(&self, key: &str) -> Option<i64> {
        match self.entries.get(key)? {
            PropertyValue::Numeric(n) => Some(*n),
            PropertyValue::Literal(s) => parse_leading_hex(s),
        }
    }
}

impl<K: Into<String>> FromIterator<(K, PropertyValue)> for PropertyBag {
    fn from_iter<I: IntoIterator<Item = (K, PropertyValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

fn split_sign(s: &str) -> (bool, &str) {
    let s = s.trim_start();
    if let Some(rest) = s.strip_prefix('-') {
        (true, rest)
    } else {
        (false, s.strip_prefix('+').unwrap_or(s))
    }
}

fn accumulate(digits: &str, radix: u32) -> Option<i64> {
    let mut value: i64 = 0;
    let mut seen = false;
    for c in digits.chars() {
        let Some(d) = c.to_digit(radix) else { break };
        value = value.saturating_mul(radix as i64).saturating_add(d as i64);
        seen = true;
    }
    seen.then_some(value)
}

pub(crate) fn parse_leading_int(s: &str) -> Option<i64> {
    let (negative, digits) = split_sign(s);
    let value = accumulate(digits, 10)?;
    Some(if negative { -value } else { value })
}

pub(crate) fn parse_leading_hex(s: &str) -> Option<i64> {
    let (negative, rest) = split_sign(s);
    let digits = rest
        .strip_prefix("0x")
        .or_else(|| rest.strip_prefix("0X"))
        .unwrap_or(rest);
    let value = accumulate(digits, 16)?;
    Some(if negative { -value } else { value })
}
