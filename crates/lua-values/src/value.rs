use crate::error::LuaError;
use crate::string::LuaStr;
use crate::table::{LuaTable, TableRef};
use crate::varargs::Varargs;
use std::any::Any;
use std::sync::{Arc, RwLock};

/// Anything invocable from Lua: native host functions and, via the
/// interpreter's own impl, compiled closures. Metamethod dispatch calls
/// through this trait without knowing which one it has.
pub trait Callable: Send + Sync {
    fn call(&self, args: Varargs) -> Result<Varargs, LuaError>;
}

impl<F> Callable for F
where
    F: Fn(Varargs) -> Result<Varargs, LuaError> + Send + Sync,
{
    fn call(&self, args: Varargs) -> Result<Varargs, LuaError> {
        self(args)
    }
}

/// An opaque host object carried inside the runtime, with its own
/// mutable metatable slot.
pub struct LuaUserData {
    data: Box<dyn Any + Send + Sync>,
    metatable: RwLock<Option<TableRef>>,
}

impl LuaUserData {
    pub fn new(data: Box<dyn Any + Send + Sync>) -> Self {
        Self {
            data,
            metatable: RwLock::new(None),
        }
    }

    pub fn with_metatable(data: Box<dyn Any + Send + Sync>, mt: TableRef) -> Self {
        Self {
            data,
            metatable: RwLock::new(Some(mt)),
        }
    }

    pub fn data(&self) -> &(dyn Any + Send + Sync) {
        &*self.data
    }

    pub fn metatable(&self) -> Option<TableRef> {
        self.metatable.read().unwrap().clone()
    }

    pub fn set_metatable(&self, mt: Option<TableRef>) {
        *self.metatable.write().unwrap() = mt;
    }
}

/// All Lua value types, mirroring the Lua 5.4 type system.
#[derive(Clone)]
pub enum LuaValue {
    Nil,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    /// An immutable byte string (interned strings share one `Arc`).
    Str(Arc<LuaStr>),
    /// A Lua table (array + hash parts, reference-counted + interior mutability).
    Table(TableRef),
    /// A native Rust function or a compiled closure, behind the `Callable` seam.
    Function(Arc<dyn Callable>),
    /// A coroutine handle; ids are allocated by the interpreter.
    Thread(u64),
    /// An opaque host object plus optional metatable.
    UserData(Arc<LuaUserData>),
}

impl LuaValue {
    /// Returns the Lua type name string as per the reference manual.
    pub fn type_name(&self) -> &'static str {
        match self {
            LuaValue::Nil => "nil",
            LuaValue::Boolean(_) => "boolean",
            LuaValue::Integer(_) => "number",
            LuaValue::Float(_) => "number",
            LuaValue::Str(_) => "string",
            LuaValue::Table(_) => "table",
            LuaValue::Function(_) => "function",
            LuaValue::Thread(_) => "thread",
            LuaValue::UserData(_) => "userdata",
        }
    }

    /// Returns `true` if the value is truthy in Lua's sense
    /// (everything except `nil` and `false` is truthy).
    pub fn is_truthy(&self) -> bool {
        !matches!(self, LuaValue::Nil | LuaValue::Boolean(false))
    }

    pub fn is_nil(&self) -> bool {
        matches!(self, LuaValue::Nil)
    }

    /// Create a string value from UTF-8 text (uninterned).
    pub fn str(s: &str) -> Self {
        LuaValue::Str(Arc::new(LuaStr::from(s)))
    }

    /// Create a string value from raw bytes (uninterned).
    pub fn str_bytes(bytes: &[u8]) -> Self {
        LuaValue::Str(Arc::new(LuaStr::from_bytes(bytes)))
    }

    /// Create a new empty table value.
    pub fn new_table() -> Self {
        LuaValue::Table(Arc::new(RwLock::new(LuaTable::new())))
    }

    /// Wrap a callable (native function or closure) as a function value.
    pub fn function(f: impl Callable + 'static) -> Self {
        LuaValue::Function(Arc::new(f))
    }

    /// Wrap a host object as userdata with no metatable.
    pub fn userdata(data: Box<dyn Any + Send + Sync>) -> Self {
        LuaValue::UserData(Arc::new(LuaUserData::new(data)))
    }

    /// Wrap a host object as userdata carrying `mt`.
    pub fn userdata_with_metatable(data: Box<dyn Any + Send + Sync>, mt: TableRef) -> Self {
        LuaValue::UserData(Arc::new(LuaUserData::with_metatable(data, mt)))
    }

    /// Read the instance metatable slot. Only tables and userdata own one;
    /// every other kind answers `None` here (shared per-kind metatables
    /// live on the `MetatableRegistry`).
    pub fn metatable(&self) -> Option<TableRef> {
        match self {
            LuaValue::Table(t) => t.read().unwrap().get_metatable(),
            LuaValue::UserData(u) => u.metatable(),
            _ => None,
        }
    }

    /// Replace the instance metatable slot and return the value itself.
    ///
    /// Fails with a type error on kinds without an instance slot; their
    /// shared metatables are replaced on the registry instead.
    pub fn set_metatable(&self, mt: Option<TableRef>) -> Result<LuaValue, LuaError> {
        match self {
            LuaValue::Table(t) => {
                t.write().unwrap().set_metatable(mt);
                Ok(self.clone())
            }
            LuaValue::UserData(u) => {
                u.set_metatable(mt);
                Ok(self.clone())
            }
            v => Err(LuaError::TypeError {
                expected: "table or userdata",
                got: v.type_name(),
            }),
        }
    }
}

impl PartialEq for LuaValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (LuaValue::Nil, LuaValue::Nil) => true,
            (LuaValue::Boolean(a), LuaValue::Boolean(b)) => a == b,
            (LuaValue::Integer(a), LuaValue::Integer(b)) => a == b,
            (LuaValue::Float(a), LuaValue::Float(b)) => a == b,
            // An integer and a float are equal iff they denote the same
            // mathematical value.
            (LuaValue::Integer(a), LuaValue::Float(b)) => (*a as f64) == *b,
            (LuaValue::Float(a), LuaValue::Integer(b)) => *a == (*b as f64),
            // Interned strings hit the pointer fast path.
            (LuaValue::Str(a), LuaValue::Str(b)) => Arc::ptr_eq(a, b) || a == b,
            // Reference kinds compare by identity only.
            (LuaValue::Table(a), LuaValue::Table(b)) => Arc::ptr_eq(a, b),
            (LuaValue::Function(a), LuaValue::Function(b)) => {
                std::ptr::eq(Arc::as_ptr(a) as *const (), Arc::as_ptr(b) as *const ())
            }
            (LuaValue::Thread(a), LuaValue::Thread(b)) => a == b,
            (LuaValue::UserData(a), LuaValue::UserData(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl std::fmt::Debug for LuaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LuaValue::Nil => write!(f, "LuaValue::Nil"),
            LuaValue::Boolean(b) => write!(f, "LuaValue::Boolean({b})"),
            LuaValue::Integer(n) => write!(f, "LuaValue::Integer({n})"),
            LuaValue::Float(n) => write!(f, "LuaValue::Float({n})"),
            LuaValue::Str(s) => write!(f, "LuaValue::Str({:?})", s.as_bytes()),
            LuaValue::Table(t) => write!(f, "LuaValue::Table({:p})", Arc::as_ptr(t)),
            LuaValue::Function(c) => {
                write!(f, "LuaValue::Function({:p})", Arc::as_ptr(c) as *const ())
            }
            LuaValue::Thread(id) => write!(f, "LuaValue::Thread({id})"),
            LuaValue::UserData(u) => write!(f, "LuaValue::UserData({:p})", Arc::as_ptr(u)),
        }
    }
}

impl std::fmt::Display for LuaValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LuaValue::Nil => write!(f, "nil"),
            LuaValue::Boolean(b) => write!(f, "{b}"),
            LuaValue::Integer(n) => write!(f, "{n}"),
            LuaValue::Float(n) => {
                // Lua displays 1.0 as "1.0", not "1"
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{n:.1}")
                } else {
                    write!(f, "{n}")
                }
            }
            LuaValue::Str(s) => write!(f, "{s}"),
            LuaValue::Table(t) => write!(f, "table: {:p}", Arc::as_ptr(t)),
            LuaValue::Function(c) => write!(f, "function: {:p}", Arc::as_ptr(c) as *const ()),
            LuaValue::Thread(id) => write!(f, "thread: {id}"),
            LuaValue::UserData(u) => write!(f, "userdata: {:p}", Arc::as_ptr(u)),
        }
    }
}
