use std::fmt;
use std::ops::Not;

use super::Value;
use super::value::Quoted;

/// A pure test over a controller field's current value.
///
/// Built with [`value()`] or parsed from the DSL `when` clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Predicate {
    Eq(Value),
    Neq(Value),
    OneOf(Vec<Value>),
    /// Case-sensitive substring test. Never matches checkbox values.
    Contains(String),
    /// Substring test after upper-casing both sides. Never matches checkbox values.
    ContainsIgnoreCase(String),
    And(Box<Predicate>, Box<Predicate>),
    Or(Box<Predicate>, Box<Predicate>),
    Not(Box<Predicate>),
}

impl Predicate {
    /// Evaluate the predicate against a controller value.
    #[must_use]
    pub fn matches(&self, current: &Value) -> bool {
        match self {
            Predicate::Eq(expected) => current == expected,
            Predicate::Neq(expected) => current != expected,
            Predicate::OneOf(options) => options.contains(current),
            Predicate::Contains(needle) => current
                .as_text()
                .is_some_and(|text| text.contains(needle.as_str())),
            Predicate::ContainsIgnoreCase(needle) => current.as_text().is_some_and(|text| {
                text.to_uppercase()
                    .contains(needle.to_uppercase().as_str())
            }),
            Predicate::And(a, b) => a.matches(current) && b.matches(current),
            Predicate::Or(a, b) => a.matches(current) || b.matches(current),
            Predicate::Not(inner) => !inner.matches(current),
        }
    }

    #[must_use]
    pub fn and(self, other: Predicate) -> Predicate {
        Predicate::And(Box::new(self), Box::new(other))
    }

    #[must_use]
    pub fn or(self, other: Predicate) -> Predicate {
        Predicate::Or(Box::new(self), Box::new(other))
    }
}

impl Not for Predicate {
    type Output = Predicate;

    fn not(self) -> Predicate {
        Predicate::Not(Box::new(self))
    }
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Predicate::Eq(v) => write!(f, "value == {v}"),
            Predicate::Neq(v) => write!(f, "value != {v}"),
            Predicate::OneOf(options) => {
                write!(f, "value in [")?;
                for (i, v) in options.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                write!(f, "]")
            }
            Predicate::Contains(s) => write!(f, "value contains {}", Quoted(s)),
            Predicate::ContainsIgnoreCase(s) => write!(f, "value icontains {}", Quoted(s)),
            Predicate::And(a, b) => write!(f, "({a} AND {b})"),
            Predicate::Or(a, b) => write!(f, "({a} OR {b})"),
            Predicate::Not(inner) => write!(f, "(NOT {inner})"),
        }
    }
}

/// Intermediate builder for predicates over the controller value.
/// Created by [`value()`]; a test method turns it into a [`Predicate`].
#[derive(Debug, Clone, Copy)]
pub struct ValueExpr;

impl ValueExpr {
    #[must_use]
    pub fn eq(self, expected: impl Into<Value>) -> Predicate {
        Predicate::Eq(expected.into())
    }

    #[must_use]
    pub fn neq(self, expected: impl Into<Value>) -> Predicate {
        Predicate::Neq(expected.into())
    }

    #[must_use]
    pub fn one_of<V: Into<Value>>(self, options: impl IntoIterator<Item = V>) -> Predicate {
        Predicate::OneOf(options.into_iter().map(Into::into).collect())
    }

    #[must_use]
    pub fn contains(self, needle: &str) -> Predicate {
        Predicate::Contains(needle.to_owned())
    }

    #[must_use]
    pub fn icontains(self, needle: &str) -> Predicate {
        Predicate::ContainsIgnoreCase(needle.to_owned())
    }

    /// Shorthand for `eq(true)` on checkbox controllers.
    #[must_use]
    pub fn is_checked(self) -> Predicate {
        Predicate::Eq(Value::Bool(true))
    }
}

#[must_use]
pub fn value() -> ValueExpr {
    ValueExpr
}
