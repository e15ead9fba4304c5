use thiserror::Error;

/// All errors that can occur within the value-and-dispatch core.
#[derive(Debug, Error, PartialEq)]
pub enum LuaError {
    /// A runtime error (equivalent to Lua's `error()` function).
    #[error("runtime error: {0}")]
    Runtime(String),

    /// Wrong type used for an operation.
    #[error("type error: expected {expected}, got {got}")]
    TypeError {
        expected: &'static str,
        got: &'static str,
    },

    /// Caller misuse of an API argument, e.g. `subargs(0)`.
    #[error("bad argument #{position}: {message}")]
    BadArgument {
        position: u32,
        message: &'static str,
    },

    /// Assignment into a non-table value with no `__newindex` handler.
    #[error("attempt to index a {0} value")]
    AttemptToIndex(&'static str),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bad_argument_message() {
        let e = LuaError::BadArgument {
            position: 1,
            message: "start must be > 0",
        };
        assert_eq!(e.to_string(), "bad argument #1: start must be > 0");
    }

    #[test]
    fn attempt_to_index_message() {
        let e = LuaError::AttemptToIndex("boolean");
        assert_eq!(e.to_string(), "attempt to index a boolean value");
    }
}
