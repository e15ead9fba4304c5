//! Metatable-driven indexed get/set.
//!
//! The chain walk treats every kind uniformly: a table first tries its own
//! raw storage, then its metatable's `__index`/`__newindex`; every other
//! kind goes straight to whatever metatable the registry answers for it.
//! Installing a shared metatable on booleans therefore makes `true`
//! indexable exactly like a table would be.

use crate::error::LuaError;
use crate::metatable::{MetatableRegistry, INDEX, NEWINDEX};
use crate::value::LuaValue;
use crate::varargs::Varargs;

/// Upper bound on metatable-chain hops. A self-referential `__index` or
/// `__newindex` chain fails past this instead of spinning forever.
const MAXTAGLOOP: usize = 100;

fn metatag(reg: &MetatableRegistry, value: &LuaValue, tag: &str) -> LuaValue {
    match reg.metatable_of(value) {
        Some(mt) => mt.read().unwrap().get(&LuaValue::str(tag)),
        None => LuaValue::Nil,
    }
}

/// Resolve `value[key]` through the metatable chain.
///
/// Reads never fail on absent keys or kinds without a metatable; they
/// resolve to `Nil`. A `__index` function is invoked with `(value, key)`
/// and its first result returned; any other `__index` value is indexed in
/// turn.
pub fn get(reg: &MetatableRegistry, value: &LuaValue, key: &LuaValue) -> Result<LuaValue, LuaError> {
    let mut current = value.clone();
    for _ in 0..MAXTAGLOOP {
        if let LuaValue::Table(t) = &current {
            let raw = t.read().unwrap().get(key);
            if !raw.is_nil() {
                return Ok(raw);
            }
        }
        match metatag(reg, &current, INDEX) {
            LuaValue::Nil => return Ok(LuaValue::Nil),
            LuaValue::Function(f) => {
                let results = f.call(Varargs::from_values(vec![current, key.clone()]))?;
                return Ok(results.arg1());
            }
            handler => current = handler,
        }
    }
    Err(LuaError::Runtime("loop in gettable".into()))
}

/// Resolve `value[key] = newval` through the metatable chain.
///
/// A raw slot already holding a non-nil value is written directly,
/// bypassing `__newindex` (a slot cleared to nil counts as absent). A
/// `__newindex` function is invoked with `(value, key, newval)` and no raw
/// write happens; any other `__newindex` value becomes the next write
/// target. Writing to a non-table with no handler anywhere in the chain
/// fails.
pub fn set(
    reg: &MetatableRegistry,
    value: &LuaValue,
    key: &LuaValue,
    newval: LuaValue,
) -> Result<(), LuaError> {
    let mut current = value.clone();
    for _ in 0..MAXTAGLOOP {
        if let LuaValue::Table(t) = &current {
            let occupied = !t.read().unwrap().get(key).is_nil();
            if occupied {
                t.write().unwrap().set(key.clone(), newval);
                return Ok(());
            }
        }
        match metatag(reg, &current, NEWINDEX) {
            LuaValue::Nil => {
                return match &current {
                    LuaValue::Table(t) => {
                        t.write().unwrap().set(key.clone(), newval);
                        Ok(())
                    }
                    v => Err(LuaError::AttemptToIndex(v.type_name())),
                };
            }
            LuaValue::Function(f) => {
                f.call(Varargs::from_values(vec![current, key.clone(), newval]))?;
                return Ok(());
            }
            handler => current = handler,
        }
    }
    Err(LuaError::Runtime("loop in settable".into()))
}

/// Read a table's own storage, bypassing all metatable logic.
pub fn raw_get(value: &LuaValue, key: &LuaValue) -> Result<LuaValue, LuaError> {
    match value {
        LuaValue::Table(t) => Ok(t.read().unwrap().get(key)),
        v => Err(LuaError::TypeError {
            expected: "table",
            got: v.type_name(),
        }),
    }
}

/// Write a table's own storage, bypassing all metatable logic.
pub fn raw_set(value: &LuaValue, key: LuaValue, newval: LuaValue) -> Result<(), LuaError> {
    match value {
        LuaValue::Table(t) => {
            t.write().unwrap().set(key, newval);
            Ok(())
        }
        v => Err(LuaError::TypeError {
            expected: "table",
            got: v.type_name(),
        }),
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
