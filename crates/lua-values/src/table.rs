use crate::string::LuaStr;
use crate::value::LuaValue;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

/// Shared handle to a table; this is what `LuaValue::Table` carries and
/// what metatable slots hold.
pub type TableRef = Arc<RwLock<LuaTable>>;

/// A Lua table: an associative array keyed by any non-nil, non-NaN value.
///
/// Stores integer keys 1..n in a compact `array` part for fast sequential
/// access; everything else goes into the `hash` part. All operations here
/// are raw: metatable dispatch is layered on top in [`crate::dispatch`].
#[derive(Debug, Clone, Default)]
pub struct LuaTable {
    pub array: Vec<LuaValue>, // 1-indexed: array[i-1] = t[i]
    pub hash: HashMap<HashKey, LuaValue>,
    metatable: Option<TableRef>,
}

/// Keys that can be stored in the hash part of a table.
///
/// Floats with an exact integral value normalize to `Int`, which keeps
/// hashing consistent with cross-kind numeric equality.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HashKey {
    Int(i64),
    Str(Arc<LuaStr>),
    Bool(bool),
}

impl HashKey {
    pub fn from_value(v: &LuaValue) -> Option<HashKey> {
        match v {
            LuaValue::Integer(n) => Some(HashKey::Int(*n)),
            LuaValue::Str(s) => Some(HashKey::Str(s.clone())),
            LuaValue::Boolean(b) => Some(HashKey::Bool(*b)),
            LuaValue::Float(f) => {
                // Only coerce if float is an exact integer
                let n = *f as i64;
                if n as f64 == *f {
                    Some(HashKey::Int(n))
                } else {
                    None // NaN / non-integer floats not usable as keys
                }
            }
            _ => None,
        }
    }
}

impl LuaTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a table from alternating key/value pairs, the shape table
    /// constructors produce.
    pub fn from_pairs(pairs: &[(LuaValue, LuaValue)]) -> Self {
        let mut t = Self::new();
        for (k, v) in pairs {
            t.set(k.clone(), v.clone());
        }
        t
    }

    pub fn get_metatable(&self) -> Option<TableRef> {
        self.metatable.clone()
    }

    pub fn set_metatable(&mut self, mt: Option<TableRef>) {
        self.metatable = mt;
    }

    /// Read `t[key]`. Returns `LuaValue::Nil` for missing keys.
    pub fn get(&self, key: &LuaValue) -> LuaValue {
        // Integer keys 1..array.len() go to the array part
        if let LuaValue::Integer(i) = key {
            let i = *i;
            if i >= 1 && i as usize <= self.array.len() {
                return self.array[(i - 1) as usize].clone();
            }
        }
        if let LuaValue::Float(f) = key {
            let i = *f as i64;
            if i as f64 == *f && i >= 1 && i as usize <= self.array.len() {
                return self.array[(i - 1) as usize].clone();
            }
        }
        HashKey::from_value(key)
            .and_then(|hk| self.hash.get(&hk))
            .cloned()
            .unwrap_or(LuaValue::Nil)
    }

    /// Write `t[key] = val`. Setting to nil deletes the entry, so a slot
    /// holding nil is indistinguishable from one never written.
    pub fn set(&mut self, key: LuaValue, val: LuaValue) {
        if let LuaValue::Integer(i) = &key {
            let i = *i;
            if i >= 1 {
                let idx = (i - 1) as usize;
                if idx < self.array.len() {
                    self.array[idx] = val;
                    return;
                } else if idx == self.array.len() {
                    self.array.push(val);
                    // Drain consecutive integer keys from hash into array
                    self.rehash_sequence();
                    return;
                }
            }
        }
        if let LuaValue::Float(f) = &key {
            let f = *f;
            let i = f as i64;
            if i as f64 == f {
                self.set(LuaValue::Integer(i), val);
                return;
            }
        }
        if let Some(hk) = HashKey::from_value(&key) {
            if matches!(val, LuaValue::Nil) {
                self.hash.remove(&hk);
            } else {
                self.hash.insert(hk, val);
            }
        }
    }

    /// Lua-style length: the border of the array sequence (largest n where t[n] ~= nil).
    pub fn length(&self) -> i64 {
        self.array.len() as i64
    }

    /// Append `val` to the array part (equivalent to `t[#t+1] = val`).
    pub fn push(&mut self, val: LuaValue) {
        self.array.push(val);
    }

    /// After a new integer key extends the array part, pull consecutive keys
    /// from the hash part into the array to keep the invariant.
    fn rehash_sequence(&mut self) {
        loop {
            let next = (self.array.len() + 1) as i64;
            let hk = HashKey::Int(next);
            if let Some(v) = self.hash.remove(&hk) {
                self.array.push(v);
            } else {
                break;
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_read_as_nil() {
        let t = LuaTable::new();
        assert_eq!(t.get(&LuaValue::Integer(1)), LuaValue::Nil);
        assert_eq!(t.get(&LuaValue::str("absent")), LuaValue::Nil);
        assert_eq!(t.get(&LuaValue::Boolean(true)), LuaValue::Nil);
    }

    #[test]
    fn string_keys_round_trip() {
        let mut t = LuaTable::new();
        t.set(LuaValue::str("aa"), LuaValue::str("aaa"));
        assert_eq!(t.get(&LuaValue::str("aa")), LuaValue::str("aaa"));
        assert_eq!(t.get(&LuaValue::str("bb")), LuaValue::Nil);
    }

    #[test]
    fn integer_keys_use_array_part() {
        let mut t = LuaTable::new();
        t.set(LuaValue::Integer(1), LuaValue::str("a"));
        t.set(LuaValue::Integer(2), LuaValue::str("b"));
        assert_eq!(t.array.len(), 2);
        assert_eq!(t.get(&LuaValue::Integer(2)), LuaValue::str("b"));
        // float key with integral value aliases the integer key
        assert_eq!(t.get(&LuaValue::Float(2.0)), LuaValue::str("b"));
        assert_eq!(t.length(), 2);
    }

    #[test]
    fn sparse_then_filled_rehashes_into_array() {
        let mut t = LuaTable::new();
        t.set(LuaValue::Integer(2), LuaValue::str("b"));
        t.set(LuaValue::Integer(3), LuaValue::str("c"));
        assert_eq!(t.length(), 0); // no border yet
        t.set(LuaValue::Integer(1), LuaValue::str("a"));
        assert_eq!(t.length(), 3); // hash entries drained into the array
        assert_eq!(t.get(&LuaValue::Integer(3)), LuaValue::str("c"));
    }

    #[test]
    fn setting_nil_deletes_the_slot() {
        let mut t = LuaTable::new();
        t.set(LuaValue::str("k"), LuaValue::Integer(1));
        t.set(LuaValue::str("k"), LuaValue::Nil);
        assert_eq!(t.get(&LuaValue::str("k")), LuaValue::Nil);
        assert!(t.hash.is_empty());
    }

    #[test]
    fn non_integral_float_keys_are_rejected() {
        let mut t = LuaTable::new();
        t.set(LuaValue::Float(1.5), LuaValue::str("x"));
        assert_eq!(t.get(&LuaValue::Float(1.5)), LuaValue::Nil);
        t.set(LuaValue::Float(f64::NAN), LuaValue::str("x"));
        assert!(t.hash.is_empty() && t.array.is_empty());
    }

    #[test]
    fn from_pairs_builds_both_parts() {
        let t = LuaTable::from_pairs(&[
            (LuaValue::str("cc"), LuaValue::str("ccc")),
            (LuaValue::Integer(1), LuaValue::str("one")),
        ]);
        assert_eq!(t.get(&LuaValue::str("cc")), LuaValue::str("ccc"));
        assert_eq!(t.get(&LuaValue::Integer(1)), LuaValue::str("one"));
    }
}
