//! The wire tree: the generic key-value form that sits between typed
//! entities and bytes.
//!
//! A [`WireMap`] is an *ordered* list of entries. Order matters: the binary
//! codec writes entries exactly as they appear, so producing a canonical
//! encoding means putting the entries into canonical order first. That is
//! what [`canonicalize`] and [`sort_canonical`] do.
//!
//! ## Canonical key order
//!
//! Keys are ordered in three tiers: integer keys first, then string keys,
//! then byte-string keys. Within a tier, integers compare numerically and
//! strings/byte-strings compare bytewise. Other implementations of the
//! protocol sort the same way; a different order yields different bytes and
//! therefore different ids and signatures.

use std::cmp::Ordering;

/// A node in the wire tree.
#[derive(Debug, Clone, PartialEq)]
pub enum WireValue {
    Nil,
    Bool(bool),
    /// Non-negative integer.
    UInt(u64),
    /// Negative integer. Non-negative values always use [`WireValue::UInt`].
    Int(i64),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<WireValue>),
    Map(WireMap),
}

impl WireValue {
    /// Wire type name used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::Nil => "nil",
            Self::Bool(_) => "bool",
            Self::UInt(_) | Self::Int(_) => "integer",
            Self::String(_) => "string",
            Self::Bytes(_) => "bytes",
            Self::Array(_) => "array",
            Self::Map(_) => "map",
        }
    }

    /// `true` for values the canonical form leaves out: null, zero, false,
    /// empty string, empty bytes, empty array, empty map.
    ///
    /// A non-empty map is never default-like here; [`canonicalize`] strips
    /// it only if it becomes empty after its own entries are stripped.
    pub fn is_default_like(&self) -> bool {
        match self {
            Self::Nil => true,
            Self::Bool(b) => !b,
            Self::UInt(n) => *n == 0,
            Self::Int(n) => *n == 0,
            Self::String(s) => s.is_empty(),
            Self::Bytes(b) => b.is_empty(),
            Self::Array(a) => a.is_empty(),
            Self::Map(m) => m.is_empty(),
        }
    }

    pub fn as_map(&self) -> Option<&WireMap> {
        match self {
            Self::Map(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(b) => Some(b),
            _ => None,
        }
    }

    pub fn as_u64(&self) -> Option<u64> {
        match self {
            Self::UInt(n) => Some(*n),
            _ => None,
        }
    }

    /// Position of this value's type in the canonical key order.
    fn key_tier(&self) -> u8 {
        match self {
            Self::UInt(_) | Self::Int(_) => 0,
            Self::String(_) => 1,
            Self::Bytes(_) => 2,
            _ => 3,
        }
    }
}

impl From<u64> for WireValue {
    fn from(n: u64) -> Self {
        Self::UInt(n)
    }
}

impl From<i64> for WireValue {
    fn from(n: i64) -> Self {
        if n >= 0 {
            Self::UInt(n as u64)
        } else {
            Self::Int(n)
        }
    }
}

impl From<bool> for WireValue {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for WireValue {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for WireValue {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Vec<u8>> for WireValue {
    fn from(b: Vec<u8>) -> Self {
        Self::Bytes(b)
    }
}

impl From<WireMap> for WireValue {
    fn from(m: WireMap) -> Self {
        Self::Map(m)
    }
}

// ---------------------------------------------------------------------------
// WireMap
// ---------------------------------------------------------------------------

/// Ordered map from wire key to value.
///
/// Keys are usually strings, but integer keys occur in nested signature
/// structures, so any [`WireValue`] may be a key. Decoded maps keep every
/// entry they were given; lookups return the last entry for a key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WireMap {
    entries: Vec<(WireValue, WireValue)>,
}

impl WireMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace. A replaced entry keeps its original position.
    pub fn insert(&mut self, key: impl Into<WireValue>, value: WireValue) {
        let key = key.into();
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Append without checking for an existing key. Used by decoders.
    pub fn push(&mut self, key: WireValue, value: WireValue) {
        self.entries.push((key, value));
    }

    /// Look up a string key.
    pub fn get(&self, key: &str) -> Option<&WireValue> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.as_str() == Some(key))
            .map(|(_, v)| v)
    }

    /// Look up an integer key.
    pub fn get_int(&self, key: u64) -> Option<&WireValue> {
        self.entries
            .iter()
            .rev()
            .find(|(k, _)| k.as_u64() == Some(key))
            .map(|(_, v)| v)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &(WireValue, WireValue)> {
        self.entries.iter()
    }

    /// String keys in entry order. Non-string keys are skipped.
    pub fn keys(&self) -> Vec<&str> {
        self.entries.iter().filter_map(|(k, _)| k.as_str()).collect()
    }

    pub fn into_entries(self) -> Vec<(WireValue, WireValue)> {
        self.entries
    }
}

impl FromIterator<(WireValue, WireValue)> for WireMap {
    fn from_iter<I: IntoIterator<Item = (WireValue, WireValue)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Canonicalization
// ---------------------------------------------------------------------------

/// Canonical comparison of two map keys.
pub fn compare_keys(a: &WireValue, b: &WireValue) -> Ordering {
    a.key_tier().cmp(&b.key_tier()).then_with(|| match (a, b) {
        (WireValue::UInt(x), WireValue::UInt(y)) => x.cmp(y),
        (WireValue::Int(x), WireValue::Int(y)) => x.cmp(y),
        (WireValue::Int(_), WireValue::UInt(_)) => Ordering::Less,
        (WireValue::UInt(_), WireValue::Int(_)) => Ordering::Greater,
        (WireValue::String(x), WireValue::String(y)) => x.as_bytes().cmp(y.as_bytes()),
        (WireValue::Bytes(x), WireValue::Bytes(y)) => x.cmp(y),
        _ => Ordering::Equal,
    })
}

/// Strip default-like entries and sort keys, recursively.
///
/// Maps nested inside arrays are canonicalized too, but array elements are
/// never removed: an array's positions are meaningful.
pub fn canonicalize(value: WireValue) -> WireValue {
    match value {
        WireValue::Map(map) => {
            let mut entries: Vec<(WireValue, WireValue)> = map
                .into_entries()
                .into_iter()
                .map(|(k, v)| (k, canonicalize(v)))
                .filter(|(_, v)| !v.is_default_like())
                .collect();
            entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
            WireValue::Map(entries.into_iter().collect())
        }
        WireValue::Array(items) => WireValue::Array(items.into_iter().map(canonicalize).collect()),
        other => other,
    }
}

/// Sort keys and drop nulls, recursively, leaving every other value alone.
///
/// Entity encoders have already applied each field's omit policy, so
/// values that are present are present on purpose; this pass only fixes
/// their order.
pub fn sort_canonical(value: WireValue) -> WireValue {
    match value {
        WireValue::Map(map) => {
            let mut entries: Vec<(WireValue, WireValue)> = map
                .into_entries()
                .into_iter()
                .filter(|(_, v)| *v != WireValue::Nil)
                .map(|(k, v)| (k, sort_canonical(v)))
                .collect();
            entries.sort_by(|(a, _), (b, _)| compare_keys(a, b));
            WireValue::Map(entries.into_iter().collect())
        }
        WireValue::Array(items) => WireValue::Array(items.into_iter().map(sort_canonical).collect()),
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<(WireValue, WireValue)>) -> WireMap {
        entries.into_iter().collect()
    }

    #[test]
    fn three_tier_key_order() {
        let tree = WireValue::Map(map(vec![
            (WireValue::Bytes(vec![0x01]), WireValue::UInt(1)),
            (WireValue::from("b"), WireValue::UInt(2)),
            (WireValue::UInt(7), WireValue::UInt(3)),
            (WireValue::from("a"), WireValue::UInt(4)),
            (WireValue::UInt(2), WireValue::UInt(5)),
            (WireValue::Bytes(vec![0x00]), WireValue::UInt(6)),
        ]));

        let sorted = canonicalize(tree);
        let keys: Vec<WireValue> = sorted
            .as_map()
            .unwrap()
            .iter()
            .map(|(k, _)| k.clone())
            .collect();
        assert_eq!(
            keys,
            vec![
                WireValue::UInt(2),
                WireValue::UInt(7),
                WireValue::from("a"),
                WireValue::from("b"),
                WireValue::Bytes(vec![0x00]),
                WireValue::Bytes(vec![0x01]),
            ]
        );
    }

    #[test]
    fn string_keys_sort_bytewise() {
        // Uppercase sorts before lowercase.
        let tree = WireValue::Map(map(vec![
            (WireValue::from("c"), WireValue::UInt(1)),
            (WireValue::from("S"), WireValue::UInt(1)),
            (WireValue::from("P"), WireValue::UInt(1)),
        ]));
        let sorted = canonicalize(tree);
        assert_eq!(sorted.as_map().unwrap().keys(), vec!["P", "S", "c"]);
    }

    #[test]
    fn strips_default_like_values() {
        let tree = WireValue::Map(map(vec![
            (WireValue::from("zero"), WireValue::UInt(0)),
            (WireValue::from("nil"), WireValue::Nil),
            (WireValue::from("false"), WireValue::Bool(false)),
            (WireValue::from("empty_str"), WireValue::from("")),
            (WireValue::from("empty_bytes"), WireValue::Bytes(vec![])),
            (WireValue::from("empty_arr"), WireValue::Array(vec![])),
            (WireValue::from("keep"), WireValue::UInt(9)),
        ]));
        let canonical = canonicalize(tree);
        assert_eq!(canonical.as_map().unwrap().keys(), vec!["keep"]);
    }

    #[test]
    fn strips_maps_that_become_empty() {
        let inner = map(vec![(WireValue::from("t"), WireValue::UInt(0))]);
        let tree = WireValue::Map(map(vec![
            (WireValue::from("apar"), WireValue::Map(inner)),
            (WireValue::from("fee"), WireValue::UInt(1000)),
        ]));
        let canonical = canonicalize(tree);
        assert_eq!(canonical.as_map().unwrap().keys(), vec!["fee"]);
    }

    #[test]
    fn array_positions_survive() {
        let tree = WireValue::Array(vec![WireValue::UInt(0), WireValue::UInt(3)]);
        assert_eq!(canonicalize(tree.clone()), tree);
    }

    #[test]
    fn sort_canonical_keeps_zero() {
        let tree = WireValue::Map(map(vec![
            (WireValue::from("thr"), WireValue::UInt(0)),
            (WireValue::from("nil"), WireValue::Nil),
            (WireValue::from("a"), WireValue::UInt(1)),
        ]));
        let sorted = sort_canonical(tree);
        assert_eq!(sorted.as_map().unwrap().keys(), vec!["a", "thr"]);
    }

    #[test]
    fn insert_replaces_in_place() {
        let mut m = WireMap::new();
        m.insert("a", WireValue::UInt(1));
        m.insert("b", WireValue::UInt(2));
        m.insert("a", WireValue::UInt(3));
        assert_eq!(m.keys(), vec!["a", "b"]);
        assert_eq!(m.get("a"), Some(&WireValue::UInt(3)));
    }

    #[test]
    fn lookup_prefers_last_duplicate() {
        let mut m = WireMap::new();
        m.push(WireValue::from("k"), WireValue::UInt(1));
        m.push(WireValue::from("k"), WireValue::UInt(2));
        assert_eq!(m.get("k"), Some(&WireValue::UInt(2)));
        assert_eq!(m.len(), 2);
    }

    #[test]
    fn integer_key_lookup() {
        let mut m = WireMap::new();
        m.insert(WireValue::UInt(5), WireValue::from("five"));
        assert_eq!(m.get_int(5), Some(&WireValue::from("five")));
        assert!(m.get("5").is_none());
    }

    #[test]
    fn negative_ints_sort_before_positive() {
        assert_eq!(
            compare_keys(&WireValue::Int(-1), &WireValue::UInt(0)),
            Ordering::Less
        );
    }
}
