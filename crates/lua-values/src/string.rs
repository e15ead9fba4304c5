//! Immutable byte strings and the per-session interner.

use crate::value::LuaValue;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// An immutable Lua string: a raw byte sequence, not text-encoding-aware.
///
/// Strings are shared via `Arc<LuaStr>`; equality and hashing go by byte
/// content, so two independently-built strings with the same bytes compare
/// equal. Interned strings additionally share one allocation, which gives
/// `LuaValue` equality a pointer fast path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LuaStr {
    bytes: Box<[u8]>,
}

impl LuaStr {
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Self {
            bytes: bytes.into(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }
}

impl From<&str> for LuaStr {
    fn from(s: &str) -> Self {
        Self::from_bytes(s.as_bytes())
    }
}

impl fmt::Display for LuaStr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", String::from_utf8_lossy(&self.bytes))
    }
}

/// Canonicalizes equal-content strings to a single shared instance.
///
/// Scoped to one compiler or interpreter state — never shared across
/// states. The compiler interns every literal it produces so that equality
/// checks during execution can short-circuit on pointer identity.
#[derive(Debug, Default)]
pub struct StringInterner {
    strings: HashMap<Box<[u8]>, Arc<LuaStr>>,
}

impl StringInterner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the canonical `Str` value for `bytes`.
    ///
    /// The same content interned twice in one scope yields the identical
    /// instance both times.
    pub fn intern(&mut self, bytes: &[u8]) -> LuaValue {
        if let Some(s) = self.strings.get(bytes) {
            return LuaValue::Str(s.clone());
        }
        let s = Arc::new(LuaStr::from_bytes(bytes));
        self.strings.insert(bytes.into(), s.clone());
        LuaValue::Str(s)
    }

    /// Number of distinct strings interned so far.
    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
