//! Per-kind shared metatables and the uniform metatable lookup.
//!
//! Tables and userdata carry their metatable on the instance; every other
//! kind that supports one shares a single per-kind slot owned by the
//! registry. Replacing a shared slot changes dispatch for all values of
//! that kind at once, present and future.

use crate::table::TableRef;
use crate::value::LuaValue;

/// Reserved metatable key controlling read-miss fallback.
pub const INDEX: &str = "__index";
/// Reserved metatable key controlling write-miss fallback.
pub const NEWINDEX: &str = "__newindex";

/// The shared metatable slots of one interpreter state.
///
/// Each state owns exactly one registry (and one string interner); sharing
/// either across concurrently-running states is undefined. Keeping the
/// slots on an explicit struct instead of statics means tests and embedders
/// get isolation for free.
#[derive(Debug, Default)]
pub struct MetatableRegistry {
    pub nil: Option<TableRef>,
    pub boolean: Option<TableRef>,
    /// One slot for both Integer and Float.
    pub number: Option<TableRef>,
    pub function: Option<TableRef>,
    pub thread: Option<TableRef>,
}

impl MetatableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// The metatable governing `value`, if any: the instance slot for
    /// tables and userdata, the shared per-kind slot otherwise. Strings
    /// have no metatable in this core (the string library installs one
    /// externally).
    pub fn metatable_of(&self, value: &LuaValue) -> Option<TableRef> {
        match value {
            LuaValue::Nil => self.nil.clone(),
            LuaValue::Boolean(_) => self.boolean.clone(),
            LuaValue::Integer(_) | LuaValue::Float(_) => self.number.clone(),
            LuaValue::Str(_) => None,
            LuaValue::Table(t) => t.read().unwrap().get_metatable(),
            LuaValue::Function(_) => self.function.clone(),
            LuaValue::Thread(_) => self.thread.clone(),
            LuaValue::UserData(u) => u.metatable(),
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────
