//! `lua-values` — the value-and-dispatch core of a Lua runtime.
//!
//! This crate defines:
//! - [`LuaValue`]: the dynamically-typed Lua value enum
//! - [`LuaTable`]: raw table storage (array + hash parts)
//! - [`MetatableRegistry`]: per-kind shared metatables for one interpreter state
//! - [`dispatch`]: `__index`/`__newindex` chain resolution over raw access
//! - [`Varargs`]: the variadic argument / multiple-return protocol
//! - [`StringInterner`]: canonical instances for equal-content strings
//! - [`LuaError`]: the unified error type
//!
//! The lexer, compiler, bytecode interpreter, and standard library are
//! collaborators that consume these types; they live in sibling crates.

pub mod dispatch;
pub mod error;
pub mod metatable;
pub mod string;
pub mod table;
pub mod value;
pub mod varargs;

pub use error::LuaError;
pub use metatable::{MetatableRegistry, INDEX, NEWINDEX};
pub use string::{LuaStr, StringInterner};
pub use table::{HashKey, LuaTable, TableRef};
pub use value::{Callable, LuaUserData, LuaValue};
pub use varargs::Varargs;
