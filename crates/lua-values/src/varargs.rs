//! The variadic-argument / multiple-return-value protocol.
//!
//! A `Varargs` is an ordered, immutable, possibly-empty sequence of values
//! addressed with 1-based indices. Several backing representations exist so
//! that producers can pick whichever matches their natural shape (a fixed
//! argument array, an incremental cons chain, a window over a shared stack
//! slice); consumers can never observe which one they were handed.

use crate::error::LuaError;
use crate::value::LuaValue;
use std::sync::Arc;

/// Zero or more Lua values.
#[derive(Clone, Debug)]
pub enum Varargs {
    /// The empty sequence.
    None,
    /// Exactly one value.
    Single(LuaValue),
    /// A plain backing array.
    Array(Arc<[LuaValue]>),
    /// A backing array followed by more values.
    ArrayWithTail {
        values: Arc<[LuaValue]>,
        more: Arc<Varargs>,
    },
    /// One value followed by more values (cons form).
    Pair { head: LuaValue, tail: Arc<Varargs> },
    /// A window into a shared backing array: `count` values beginning at
    /// 1-based `start`, followed by more values. Slicing produces these
    /// without copying.
    Window {
        values: Arc<[LuaValue]>,
        start: usize,
        count: usize,
        more: Arc<Varargs>,
    },
}

impl Varargs {
    /// The canonical empty sequence.
    pub fn none() -> Varargs {
        Varargs::None
    }

    /// Build from an owned list of values.
    pub fn from_values(mut values: Vec<LuaValue>) -> Varargs {
        match values.len() {
            0 => Varargs::None,
            1 => Varargs::Single(values.pop().unwrap_or(LuaValue::Nil)),
            _ => Varargs::Array(values.into()),
        }
    }

    /// Build from a list of values followed by a continuation.
    pub fn with_tail(values: Vec<LuaValue>, more: Varargs) -> Varargs {
        if more.narg() == 0 {
            return Varargs::from_values(values);
        }
        if values.is_empty() {
            return more;
        }
        Varargs::ArrayWithTail {
            values: values.into(),
            more: Arc::new(more),
        }
    }

    /// Build from a head value followed by a continuation.
    pub fn pair(head: LuaValue, tail: Varargs) -> Varargs {
        if tail.narg() == 0 {
            Varargs::Single(head)
        } else {
            Varargs::Pair {
                head,
                tail: Arc::new(tail),
            }
        }
    }

    /// Build a window over a shared backing array: `count` values starting
    /// at 1-based `start`, then `more`.
    pub fn windowed(values: Arc<[LuaValue]>, start: usize, count: usize, more: Varargs) -> Varargs {
        if count == 0 {
            return more;
        }
        debug_assert!(start >= 1 && start - 1 + count <= values.len());
        Varargs::Window {
            values,
            start,
            count,
            more: Arc::new(more),
        }
    }

    /// Number of values in the sequence.
    pub fn narg(&self) -> usize {
        match self {
            Varargs::None => 0,
            Varargs::Single(_) => 1,
            Varargs::Array(values) => values.len(),
            Varargs::ArrayWithTail { values, more } => values.len() + more.narg(),
            Varargs::Pair { tail, .. } => 1 + tail.narg(),
            Varargs::Window { count, more, .. } => count + more.narg(),
        }
    }

    /// The first value, or `Nil` when empty. Equivalent to `arg(1)`.
    pub fn arg1(&self) -> LuaValue {
        self.arg(1)
    }

    /// The value at 1-based position `i`, or `Nil` for any position
    /// outside `[1, narg()]`. Out-of-range reads never fail.
    pub fn arg(&self, i: i64) -> LuaValue {
        if i < 1 {
            return LuaValue::Nil;
        }
        match self {
            Varargs::None => LuaValue::Nil,
            Varargs::Single(v) => {
                if i == 1 {
                    v.clone()
                } else {
                    LuaValue::Nil
                }
            }
            Varargs::Array(values) => values
                .get((i - 1) as usize)
                .cloned()
                .unwrap_or(LuaValue::Nil),
            Varargs::ArrayWithTail { values, more } => {
                if (i as usize) <= values.len() {
                    values[(i - 1) as usize].clone()
                } else {
                    more.arg(i - values.len() as i64)
                }
            }
            Varargs::Pair { head, tail } => {
                if i == 1 {
                    head.clone()
                } else {
                    tail.arg(i - 1)
                }
            }
            Varargs::Window {
                values,
                start,
                count,
                more,
            } => {
                if (i as usize) <= *count {
                    values[start - 1 + (i - 1) as usize].clone()
                } else {
                    more.arg(i - *count as i64)
                }
            }
        }
    }

    /// The logical suffix beginning at 1-based `start`.
    ///
    /// `start` past the end yields the empty sequence; `start < 1` is
    /// caller misuse and fails. Slicing is chainable:
    /// `v.subargs(a)?.subargs(b)?` equals `v.subargs(a + b - 1)?`.
    pub fn subargs(&self, start: i64) -> Result<Varargs, LuaError> {
        if start < 1 {
            return Err(LuaError::BadArgument {
                position: 1,
                message: "start must be > 0",
            });
        }
        if start == 1 {
            return Ok(self.clone());
        }
        Ok(match self {
            Varargs::None => Varargs::None,
            Varargs::Single(_) => Varargs::None,
            Varargs::Array(values) => {
                if start as usize > values.len() {
                    Varargs::None
                } else {
                    Varargs::windowed(
                        values.clone(),
                        start as usize,
                        values.len() - (start as usize - 1),
                        Varargs::None,
                    )
                }
            }
            Varargs::ArrayWithTail { values, more } => {
                if start as usize <= values.len() {
                    Varargs::windowed(
                        values.clone(),
                        start as usize,
                        values.len() - (start as usize - 1),
                        (**more).clone(),
                    )
                } else {
                    more.subargs(start - values.len() as i64)?
                }
            }
            Varargs::Pair { tail, .. } => {
                if start == 2 {
                    (**tail).clone()
                } else {
                    tail.subargs(start - 1)?
                }
            }
            Varargs::Window {
                values,
                start: first,
                count,
                more,
            } => {
                if start as usize <= *count {
                    Varargs::windowed(
                        values.clone(),
                        first + (start as usize - 1),
                        count - (start as usize - 1),
                        (**more).clone(),
                    )
                } else {
                    more.subargs(start - *count as i64)?
                }
            }
        })
    }

    /// Iterate the values in order.
    pub fn iter(&self) -> impl Iterator<Item = LuaValue> + '_ {
        (1..=self.narg() as i64).map(move |i| self.arg(i))
    }

    /// Copy out into an owned vector.
    pub fn to_vec(&self) -> Vec<LuaValue> {
        self.iter().collect()
    }
}

impl From<LuaValue> for Varargs {
    fn from(v: LuaValue) -> Varargs {
        Varargs::Single(v)
    }
}

/// Structural, representation-blind equality: two sequences are equal iff
/// they have the same length and the same value at every position.
impl PartialEq for Varargs {
    fn eq(&self, other: &Self) -> bool {
        if self.narg() != other.narg() {
            return false;
        }
        (1..=self.narg() as i64).all(|i| self.arg(i) == other.arg(i))
    }
}

// ── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn val(s: &str) -> LuaValue {
        LuaValue::str(s)
    }

    fn list(names: &[&str]) -> Vec<LuaValue> {
        names.iter().map(|n| val(n)).collect()
    }

    fn array(names: &[&str]) -> Varargs {
        Varargs::from_values(list(names))
    }

    /// Shared backing array [z, a, b, c, d, e, f, g, h]; windows carve
    /// a..g (positions 2..8) out of it.
    fn backing() -> Arc<[LuaValue]> {
        list(&["z", "a", "b", "c", "d", "e", "f", "g", "h"]).into()
    }

    fn a_g() -> Varargs {
        array(&["a", "b", "c", "d", "e", "f", "g"])
    }

    fn b_e() -> Varargs {
        array(&["b", "c", "d", "e"])
    }

    fn c_g() -> Varargs {
        array(&["c", "d", "e", "f", "g"])
    }

    fn c_e() -> Varargs {
        array(&["c", "d", "e"])
    }

    fn d_e() -> Varargs {
        array(&["d", "e"])
    }

    fn e_g() -> Varargs {
        array(&["e", "f", "g"])
    }

    fn f_g() -> Varargs {
        array(&["f", "g"])
    }

    fn just_g() -> Varargs {
        Varargs::from(val("g"))
    }

    fn a_g_window() -> Varargs {
        Varargs::windowed(backing(), 2, 7, Varargs::none())
    }

    fn expect_equals(x: &Varargs, y: &Varargs) {
        assert_eq!(x.narg(), y.narg());
        assert_eq!(x.arg1(), y.arg1());
        assert_eq!(x.arg(0), y.arg(0));
        assert_eq!(x.arg(-1), y.arg(-1));
        assert_eq!(x.arg(2), y.arg(2));
        assert_eq!(x.arg(3), y.arg(3));
        for i in 4..(x.narg() as i64 + 2) {
            assert_eq!(x.arg(i), y.arg(i));
        }
        assert_eq!(x, y);
    }

    fn standard_tests_a_g(v: &Varargs) {
        expect_equals(&a_g(), v);
        expect_equals(&a_g(), &v.subargs(1).unwrap());
        expect_equals(&c_g(), &v.subargs(3).unwrap().subargs(1).unwrap());
        expect_equals(&e_g(), &v.subargs(5).unwrap());
        expect_equals(&e_g(), &v.subargs(5).unwrap().subargs(1).unwrap());
        expect_equals(&f_g(), &v.subargs(6).unwrap());
        expect_equals(&f_g(), &v.subargs(6).unwrap().subargs(1).unwrap());
        expect_equals(&just_g(), &v.subargs(7).unwrap());
        expect_equals(&just_g(), &v.subargs(7).unwrap().subargs(1).unwrap());
        expect_equals(&Varargs::none(), &v.subargs(8).unwrap());
        expect_equals(&Varargs::none(), &v.subargs(8).unwrap().subargs(1).unwrap());
        standard_tests_c_g(&v.subargs(3).unwrap());
    }

    fn standard_tests_c_g(v: &Varargs) {
        expect_equals(&c_g(), &v.subargs(1).unwrap());
        expect_equals(&e_g(), &v.subargs(3).unwrap());
        expect_equals(&e_g(), &v.subargs(3).unwrap().subargs(1).unwrap());
        expect_equals(&f_g(), &v.subargs(4).unwrap());
        expect_equals(&f_g(), &v.subargs(4).unwrap().subargs(1).unwrap());
        expect_equals(&just_g(), &v.subargs(5).unwrap());
        expect_equals(&just_g(), &v.subargs(5).unwrap().subargs(1).unwrap());
        expect_equals(&Varargs::none(), &v.subargs(6).unwrap());
        expect_equals(&Varargs::none(), &v.subargs(6).unwrap().subargs(1).unwrap());
        standard_tests_e_g(&v.subargs(3).unwrap());
    }

    fn standard_tests_e_g(v: &Varargs) {
        expect_equals(&e_g(), &v.subargs(1).unwrap());
        expect_equals(&f_g(), &v.subargs(2).unwrap());
        expect_equals(&f_g(), &v.subargs(2).unwrap().subargs(1).unwrap());
        expect_equals(&just_g(), &v.subargs(3).unwrap());
        expect_equals(&just_g(), &v.subargs(3).unwrap().subargs(1).unwrap());
        expect_equals(&Varargs::none(), &v.subargs(4).unwrap());
        expect_equals(&Varargs::none(), &v.subargs(4).unwrap().subargs(1).unwrap());
        standard_tests_f_g(&v.subargs(2).unwrap());
    }

    fn standard_tests_f_g(v: &Varargs) {
        expect_equals(&f_g(), &v.subargs(1).unwrap());
        expect_equals(&just_g(), &v.subargs(2).unwrap());
        expect_equals(&just_g(), &v.subargs(2).unwrap().subargs(1).unwrap());
        expect_equals(&Varargs::none(), &v.subargs(3).unwrap());
        expect_equals(&Varargs::none(), &v.subargs(3).unwrap().subargs(1).unwrap());
    }

    fn expect_neg_subargs_error(v: &Varargs) {
        let expected = "bad argument #1: start must be > 0";
        assert_eq!(v.subargs(0).unwrap_err().to_string(), expected);
        assert_eq!(v.subargs(-1).unwrap_err().to_string(), expected);
    }

    #[test]
    fn sanity() {
        let b = backing();
        expect_equals(&a_g(), &a_g());
        expect_equals(&a_g_window(), &a_g_window());
        expect_equals(&a_g(), &a_g_window());
        expect_equals(&b_e(), &Varargs::windowed(b.clone(), 3, 4, Varargs::none()));
        expect_equals(&c_g(), &Varargs::windowed(b.clone(), 4, 5, Varargs::none()));
        expect_equals(&c_e(), &Varargs::windowed(b.clone(), 4, 3, Varargs::none()));
        expect_equals(&d_e(), &Varargs::pair(val("d"), Varargs::from(val("e"))));
        expect_equals(&e_g(), &Varargs::windowed(b, 6, 3, Varargs::none()));
        expect_equals(&f_g(), &Varargs::pair(val("f"), Varargs::from(val("g"))));
        expect_equals(&Varargs::from(val("a")), &Varargs::from(val("a")));
        expect_equals(&Varargs::none(), &Varargs::none());
        expect_equals(&Varargs::from(LuaValue::Nil), &Varargs::from(LuaValue::Nil));
    }

    #[test]
    fn negative_subargs_fail_on_every_representation() {
        let b = backing();
        expect_neg_subargs_error(&a_g());
        expect_neg_subargs_error(&a_g_window());
        expect_neg_subargs_error(&b_e());
        expect_neg_subargs_error(&Varargs::windowed(b.clone(), 3, 4, Varargs::none()));
        expect_neg_subargs_error(&Varargs::pair(val("d"), Varargs::from(val("e"))));
        expect_neg_subargs_error(&Varargs::with_tail(list(&["a", "b"]), e_g()));
        expect_neg_subargs_error(&Varargs::from(val("a")));
        expect_neg_subargs_error(&Varargs::none());
        expect_neg_subargs_error(&Varargs::from(LuaValue::Nil));
    }

    #[test]
    fn subargs_on_array_and_window_forms() {
        standard_tests_a_g(&a_g());
        standard_tests_a_g(&a_g_window());
        standard_tests_c_g(&c_g());
        standard_tests_c_g(&Varargs::windowed(backing(), 4, 5, Varargs::none()));
        standard_tests_e_g(&e_g());
        standard_tests_e_g(&Varargs::windowed(backing(), 6, 3, Varargs::none()));
        standard_tests_f_g(&f_g());
        standard_tests_f_g(&Varargs::pair(val("f"), Varargs::from(val("g"))));
    }

    #[test]
    fn array_with_tail_at_every_split() {
        let names = ["a", "b", "c", "d", "e", "f", "g"];
        for split in 1..names.len() {
            let head = list(&names[..split]);
            let tail = Varargs::from_values(list(&names[split..]));
            standard_tests_a_g(&Varargs::with_tail(head, tail));
        }
    }

    #[test]
    fn nested_pairs() {
        let v = Varargs::pair(
            val("a"),
            Varargs::pair(
                val("b"),
                Varargs::pair(
                    val("c"),
                    Varargs::pair(
                        val("d"),
                        Varargs::pair(val("e"), Varargs::pair(val("f"), Varargs::from(val("g")))),
                    ),
                ),
            ),
        );
        standard_tests_a_g(&v);
    }

    #[test]
    fn chained_windows_at_every_split() {
        let b = backing();
        // a..g lives at positions 2..8 of the backing array
        for split in 1..7 {
            let more = Varargs::windowed(b.clone(), 2 + split, 7 - split, Varargs::none());
            standard_tests_a_g(&Varargs::windowed(b.clone(), 2, split, more));
        }
    }

    #[test]
    fn subargs_chaining_is_associative() {
        let forms = [
            a_g(),
            a_g_window(),
            Varargs::with_tail(list(&["a", "b", "c"]), array(&["d", "e", "f", "g"])),
        ];
        for v in &forms {
            for a in 1..=8_i64 {
                for b in 1..=8_i64 {
                    assert_eq!(
                        v.subargs(a).unwrap().subargs(b).unwrap(),
                        v.subargs(a + b - 1).unwrap()
                    );
                }
            }
        }
    }

    #[test]
    fn empty_sequence_behavior() {
        let none = Varargs::none();
        assert_eq!(none.narg(), 0);
        assert_eq!(none.arg1(), LuaValue::Nil);
        assert_eq!(none.arg(1), LuaValue::Nil);
        expect_equals(&Varargs::none(), &none.subargs(1).unwrap());
        expect_equals(&Varargs::none(), &none.subargs(2).unwrap());
    }

    #[test]
    fn single_nil_is_not_empty() {
        let v = Varargs::from(LuaValue::Nil);
        assert_eq!(v.narg(), 1);
        assert_eq!(v.arg1(), LuaValue::Nil);
        assert_ne!(v.narg(), Varargs::none().narg());
    }

    #[test]
    fn constructors_normalize_empty_parts() {
        expect_equals(&Varargs::none(), &Varargs::from_values(vec![]));
        expect_equals(&a_g(), &Varargs::with_tail(list(&["a", "b"]), c_g()));
        // empty head defers to the tail; empty tail defers to the head
        expect_equals(&e_g(), &Varargs::with_tail(vec![], e_g()));
        expect_equals(&just_g(), &Varargs::pair(val("g"), Varargs::none()));
        expect_equals(&e_g(), &Varargs::windowed(backing(), 6, 0, e_g()));
    }

    #[test]
    fn iteration_matches_positional_access() {
        let v = a_g_window();
        let collected = v.to_vec();
        assert_eq!(collected.len(), 7);
        for (i, item) in collected.iter().enumerate() {
            assert_eq!(*item, v.arg(i as i64 + 1));
        }
    }
}
